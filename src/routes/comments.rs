use crate::{
    db_conn::DbConn,
    routes::{errors::ErrorPage, field_error, invalid_form, session::CurrentUser, RespondOrRedirect},
};
use rocket::{response::Redirect, serde::json::Json};
use validator::Validate;
use yatube_models::{comments::Comment, posts::Post, Error};

#[derive(Default, Serialize, Deserialize, Validate)]
pub struct NewCommentForm {
    #[validate(length(min = 1, message = "Your comment can't be empty"))]
    pub text: String,
}

#[post("/<name>/<id>/comment", data = "<form>")]
pub fn create(
    name: &str,
    id: i32,
    user: CurrentUser,
    form: Json<NewCommentForm>,
    conn: DbConn,
) -> Result<RespondOrRedirect, ErrorPage> {
    let post = Post::find_for_author(&conn, name, id)?;
    let mut form = form.into_inner();
    form.text = form.text.trim().to_owned();
    if let Err(errors) = form.validate() {
        return Ok(invalid_form(&form, errors));
    }

    match Comment::create(&conn, &post, &user, &form.text) {
        Ok(_) => Ok(Redirect::to(uri!(super::posts::details(name = name, id = id))).into()),
        Err(Error::Validation(msg)) => {
            Ok(invalid_form(&form, field_error("text", "invalid", msg)))
        }
        Err(e) => Err(e.into()),
    }
}
