#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct CommentData {
    pub id: i32,
    pub post_id: i32,
    pub author: String,
    pub text: String,
    pub created_at: String,
}
