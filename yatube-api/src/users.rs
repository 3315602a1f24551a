use crate::{posts::PostData, PageData};

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct AuthorData {
    pub id: i32,
    pub username: String,
    pub display_name: String,
    pub posts_count: i64,
    pub followers_count: i64,
    pub following_count: i64,
}

/// An author's profile, as seen by the current viewer
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ProfileData {
    pub author: AuthorData,
    pub following: bool,
    pub posts: PageData<PostData>,
}
