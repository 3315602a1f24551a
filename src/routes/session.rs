use crate::{db_conn::DbConn, routes::USER_HEADER};
use rocket::{
    http::Status,
    outcome::try_outcome,
    request::{self, FromRequest, Outcome},
    Request,
};
use std::ops::Deref;
use tracing::warn;
use yatube_models::{users::User, Error};

/// The person making the request, named by the identity header.
///
/// Requests without a known user fail with `401 Unauthorized`; use an
/// `Option<CurrentUser>` where anonymous visitors are welcome.
pub struct CurrentUser(pub User);

#[rocket::async_trait]
impl<'r> FromRequest<'r> for CurrentUser {
    type Error = ();

    async fn from_request(request: &'r Request<'_>) -> request::Outcome<Self, Self::Error> {
        let username = match request.headers().get_one(USER_HEADER).map(str::trim) {
            Some(name) if !name.is_empty() => name,
            _ => return Outcome::Error((Status::Unauthorized, ())),
        };
        let conn = try_outcome!(request.guard::<DbConn>().await);
        match User::find_by_username(&conn, username) {
            Ok(user) => Outcome::Success(CurrentUser(user)),
            Err(Error::NotFound) => Outcome::Error((Status::Unauthorized, ())),
            Err(e) => {
                warn!("Couldn't load the current user: {}", e);
                Outcome::Error((Status::InternalServerError, ()))
            }
        }
    }
}

impl Deref for CurrentUser {
    type Target = User;

    fn deref(&self) -> &User {
        &self.0
    }
}
