use crate::{comments::CommentData, users::AuthorData};

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct PostData {
    pub id: i32,
    pub text: String,
    pub created_at: String,
    pub author: String,
    pub group: Option<String>,
    pub image: Option<String>,
}

/// A single post with its author and the discussion below it
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PostViewData {
    pub post: PostData,
    pub author: AuthorData,
    pub comments: Vec<CommentData>,
}
