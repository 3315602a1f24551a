use rocket::{
    http::Status,
    response::{self, Responder},
    serde::json::Json,
    Request,
};
use serde_json::{json, Value};
use tracing::{error, warn};
use yatube_models::Error;

#[derive(Debug)]
pub struct ErrorPage(pub Error);

impl From<Error> for ErrorPage {
    fn from(err: Error) -> ErrorPage {
        ErrorPage(err)
    }
}

impl<'r> Responder<'r, 'static> for ErrorPage {
    fn respond_to(self, _req: &'r Request<'_>) -> response::Result<'static> {
        match self.0 {
            Error::NotFound => Err(Status::NotFound),
            Error::Unauthorized => Err(Status::Forbidden),
            Error::Validation(_) | Error::DuplicateSlug(_) | Error::UserAlreadyExists => {
                warn!("{}", self.0);
                Err(Status::UnprocessableEntity)
            }
            Error::Db(_) | Error::DbPool | Error::Io(_) => {
                error!("{}", self.0);
                Err(Status::InternalServerError)
            }
        }
    }
}

fn error_body(status: Status, message: &str) -> Json<Value> {
    Json(json!({
        "status": status.code,
        "error": message,
    }))
}

#[catch(401)]
pub fn unauthorized() -> Json<Value> {
    error_body(Status::Unauthorized, "You need to be logged in to do that")
}

#[catch(403)]
pub fn forbidden() -> Json<Value> {
    error_body(Status::Forbidden, "You are not allowed to do that")
}

#[catch(404)]
pub fn not_found() -> Json<Value> {
    error_body(Status::NotFound, "Page not found")
}

#[catch(422)]
pub fn unprocessable_entity() -> Json<Value> {
    error_body(Status::UnprocessableEntity, "The submitted data is invalid")
}

#[catch(500)]
pub fn server_error() -> Json<Value> {
    error_body(Status::InternalServerError, "Something went wrong on our side")
}
