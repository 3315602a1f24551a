use crate::{posts::PostData, PageData};

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct GroupData {
    pub id: i32,
    pub title: String,
    pub slug: String,
    pub description: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GroupPageData {
    pub group: GroupData,
    pub posts: PageData<PostData>,
}
