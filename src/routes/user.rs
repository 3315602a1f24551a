use crate::{
    db_conn::DbConn,
    routes::{errors::ErrorPage, session::CurrentUser},
};
use rocket::{response::Redirect, serde::json::Json};
use tracing::info;
use yatube_api::users::ProfileData;
use yatube_models::{follows::Follow, pagination::Page, posts::Post, users::User, Error};

#[get("/<name>?<page>", rank = 2)]
pub fn details(
    name: &str,
    account: Option<CurrentUser>,
    conn: DbConn,
    page: Option<&str>,
) -> Result<Json<ProfileData>, ErrorPage> {
    let author = User::find_by_username(&conn, name)?;
    let following = match account {
        Some(account) => account.is_following(&conn, author.id)?,
        None => false,
    };
    let posts = Post::page_for_author(&conn, &author, Page::from_query(page))?;
    Ok(Json(ProfileData {
        author: author.to_api(&conn)?,
        following,
        posts: posts.to_api(|p| p.to_api(&conn))?,
    }))
}

#[post("/<name>/follow")]
pub fn follow(name: &str, user: CurrentUser, conn: DbConn) -> Result<Redirect, ErrorPage> {
    let author = User::find_by_username(&conn, name)?;
    match Follow::follow(&conn, &user, &author) {
        // following yourself is silently ignored
        Ok(_) | Err(Error::Validation(_)) => {}
        Err(e) => return Err(e.into()),
    }
    Ok(Redirect::to(uri!(details(name = name, page = _))))
}

#[post("/<name>/unfollow")]
pub fn unfollow(name: &str, user: CurrentUser, conn: DbConn) -> Result<Redirect, ErrorPage> {
    let author = User::find_by_username(&conn, name)?;
    if Follow::unfollow(&conn, user.id, author.id)? {
        info!("{} unfollowed {}", user.username, author.username);
    }
    Ok(Redirect::to(uri!(details(name = name, page = _))))
}
