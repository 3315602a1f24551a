use crate::{
    cache::PageCache,
    db_conn::DbConn,
    routes::{errors::ErrorPage, session::CurrentUser},
};
use rocket::{serde::json::Json, State};
use yatube_api::{posts::PostData, PageData};
use yatube_models::{feed::Feed, pagination::Page, posts::Post};

pub type IndexCache = PageCache<PageData<PostData>>;

#[get("/?<page>")]
pub fn index(
    conn: DbConn,
    cache: &State<IndexCache>,
    page: Option<&str>,
) -> Result<Json<PageData<PostData>>, ErrorPage> {
    let page = Page::from_query(page);
    let data = cache.get_or_try_insert_with(page.number(), || -> Result<_, ErrorPage> {
        Ok(Post::page(&conn, page)?.to_api(|p| p.to_api(&conn))?)
    })?;
    Ok(Json(data))
}

#[get("/follow?<page>")]
pub fn follow_index(
    user: CurrentUser,
    conn: DbConn,
    page: Option<&str>,
) -> Result<Json<PageData<PostData>>, ErrorPage> {
    let page = Feed::for_conn(&conn).page(Some(&user.0), Page::from_query(page))?;
    Ok(Json(page.to_api(|p| p.to_api(&conn))?))
}
