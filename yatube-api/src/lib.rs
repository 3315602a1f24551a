#[macro_use]
extern crate serde_derive;

pub mod comments;
pub mod groups;
pub mod posts;
pub mod users;

/// One page of a paginated listing
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct PageData<T> {
    pub items: Vec<T>,
    pub total_pages: i32,
    pub current_page: i32,
    pub has_next: bool,
    pub has_previous: bool,
}
