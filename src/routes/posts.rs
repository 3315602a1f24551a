use crate::{
    db_conn::DbConn,
    routes::{errors::ErrorPage, field_error, invalid_form, session::CurrentUser, RespondOrRedirect},
};
use rocket::{response::Redirect, serde::json::Json};
use serde_json::json;
use tracing::info;
use validator::Validate;
use yatube_api::posts::PostViewData;
use yatube_models::{
    groups::Group,
    posts::{NewPost, Post, PostChanges},
    Error,
};

#[derive(Clone, Default, Serialize, Deserialize, Validate)]
pub struct PostForm {
    #[validate(length(min = 1, message = "Your post can't be empty"))]
    pub text: String,
    #[serde(default)]
    pub group: Option<i32>,
    #[serde(default)]
    pub image: Option<String>,
}

impl PostForm {
    fn cleaned(mut self) -> Self {
        self.text = self.text.trim().to_owned();
        self.image = self.image.filter(|i| !i.trim().is_empty());
        self
    }
}

/// Turns the errors the store reports about a post back into form errors.
fn post_form_error(form: &PostForm, err: Error) -> Result<RespondOrRedirect, ErrorPage> {
    match err {
        Error::Validation(msg) => Ok(invalid_form(form, field_error("text", "invalid", msg))),
        // the only other thing the form can point to
        Error::NotFound if form.group.is_some() => Ok(invalid_form(
            form,
            field_error("group", "unknown_group", "This group doesn't exist".to_owned()),
        )),
        e => Err(e.into()),
    }
}

#[get("/new")]
pub fn new(_user: CurrentUser, conn: DbConn) -> Result<RespondOrRedirect, ErrorPage> {
    let groups = Group::list(&conn)?
        .iter()
        .map(Group::to_api)
        .collect::<Vec<_>>();
    Ok(Json(json!({
        "form": PostForm::default(),
        "groups": groups,
    }))
    .into())
}

#[post("/new", data = "<form>")]
pub fn create(
    user: CurrentUser,
    form: Json<PostForm>,
    conn: DbConn,
) -> Result<RespondOrRedirect, ErrorPage> {
    let form = form.into_inner().cleaned();
    if let Err(errors) = form.validate() {
        return Ok(invalid_form(&form, errors));
    }

    let new = NewPost::new(user.id, &form.text, form.group, form.image.clone());
    match Post::create(&conn, new) {
        Ok(_) => Ok(Redirect::to(uri!(super::timelines::index(page = _))).into()),
        Err(e) => post_form_error(&form, e),
    }
}

#[get("/<name>/<id>", rank = 2)]
pub fn details(name: &str, id: i32, conn: DbConn) -> Result<Json<PostViewData>, ErrorPage> {
    let post = Post::find_for_author(&conn, name, id)?;
    Ok(Json(post.to_view_api(&conn)?))
}

#[post("/<name>/<id>/edit", data = "<form>")]
pub fn update(
    name: &str,
    id: i32,
    user: CurrentUser,
    form: Json<PostForm>,
    conn: DbConn,
) -> Result<RespondOrRedirect, ErrorPage> {
    let post = Post::find_for_author(&conn, name, id)?;
    if !post.is_author(&user) {
        return Ok(Redirect::to(uri!(details(name = name, id = id))).into());
    }

    let form = form.into_inner().cleaned();
    if let Err(errors) = form.validate() {
        return Ok(invalid_form(&form, errors));
    }
    let changes = PostChanges {
        text: form.text.clone(),
        group_id: form.group,
        image: form.image.clone(),
    };
    match post.update(&conn, &user, changes) {
        Ok(_) => Ok(Redirect::to(uri!(details(name = name, id = id))).into()),
        Err(e) => post_form_error(&form, e),
    }
}

#[post("/<name>/<id>/delete")]
pub fn delete(
    name: &str,
    id: i32,
    user: CurrentUser,
    conn: DbConn,
) -> Result<Redirect, ErrorPage> {
    let post = Post::find_for_author(&conn, name, id)?;
    if !post.is_author(&user) {
        return Ok(Redirect::to(uri!(details(name = name, id = id))));
    }
    post.delete(&conn, &user)?;
    info!("{} deleted post {}", user.username, id);
    Ok(Redirect::to(uri!(super::user::details(name = name, page = _))))
}
