use crate::{
    db_conn::DbConn,
    routes::{errors::ErrorPage, field_error, invalid_form, RespondOrRedirect},
};
use rocket::{response::Redirect, serde::json::Json};
use validator::Validate;
use yatube_api::groups::GroupPageData;
use yatube_models::{
    groups::{Group, NewGroup},
    pagination::Page,
    posts::Post,
    Error,
};

#[get("/group/<slug>?<page>")]
pub fn details(
    slug: &str,
    conn: DbConn,
    page: Option<&str>,
) -> Result<Json<GroupPageData>, ErrorPage> {
    let group = Group::find_by_slug(&conn, slug)?;
    let posts = Post::page_for_group(&conn, &group, Page::from_query(page))?;
    Ok(Json(GroupPageData {
        group: group.to_api(),
        posts: posts.to_api(|p| p.to_api(&conn))?,
    }))
}

#[derive(Default, Serialize, Deserialize, Validate)]
pub struct NewGroupForm {
    #[validate(length(min = 1, max = 200, message = "The title should be 1 to 200 characters long"))]
    pub title: String,
    #[serde(default)]
    #[validate(length(max = 100, message = "The slug can't be longer than 100 characters"))]
    pub slug: Option<String>,
    #[serde(default)]
    pub description: String,
}

#[post("/group/new", data = "<form>")]
pub fn create(form: Json<NewGroupForm>, conn: DbConn) -> Result<RespondOrRedirect, ErrorPage> {
    let mut form = form.into_inner();
    form.title = form.title.trim().to_owned();
    if let Err(errors) = form.validate() {
        return Ok(invalid_form(&form, errors));
    }

    let new = NewGroup::new(&form.title, form.slug.as_deref(), &form.description);
    match Group::create(&conn, new) {
        Ok(group) => {
            Ok(Redirect::to(uri!(details(slug = group.slug.as_str(), page = _))).into())
        }
        Err(Error::DuplicateSlug(slug)) => Ok(invalid_form(
            &form,
            field_error(
                "slug",
                "duplicate_slug",
                format!("The slug \"{}\" is already used by another group", slug),
            ),
        )),
        Err(Error::Validation(msg)) => Ok(invalid_form(
            &form,
            field_error("slug", "invalid_slug", msg),
        )),
        Err(e) => Err(e.into()),
    }
}
