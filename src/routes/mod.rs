use rocket::{
    http::Status,
    response::{status, Redirect},
    serde::json::Json,
};
use serde::Serialize;
use serde_json::{json, Value};
use std::borrow::Cow;
use validator::{ValidationError, ValidationErrors};

/// Header carrying the username of the person making the request
pub const USER_HEADER: &str = "X-Yatube-User";

#[derive(Responder)]
pub enum RespondOrRedirect {
    Response(Json<Value>),
    Invalid(status::Custom<Json<Value>>),
    Redirect(Redirect),
}

impl From<Redirect> for RespondOrRedirect {
    fn from(redirect: Redirect) -> Self {
        RespondOrRedirect::Redirect(redirect)
    }
}

impl From<Json<Value>> for RespondOrRedirect {
    fn from(json: Json<Value>) -> Self {
        RespondOrRedirect::Response(json)
    }
}

/// Sends the submitted form back, with what is wrong with it.
pub fn invalid_form<F: Serialize>(form: &F, errors: ValidationErrors) -> RespondOrRedirect {
    RespondOrRedirect::Invalid(status::Custom(
        Status::UnprocessableEntity,
        Json(json!({
            "form": form,
            "errors": errors,
        })),
    ))
}

/// A single error on `field`, as the validator would have reported it.
pub fn field_error(field: &'static str, code: &'static str, message: String) -> ValidationErrors {
    let mut errors = ValidationErrors::new();
    let mut error = ValidationError::new(code);
    error.message = Some(Cow::from(message));
    errors.add(field, error);
    errors
}

pub mod about;
pub mod comments;
pub mod errors;
pub mod groups;
pub mod posts;
pub mod session;
pub mod timelines;
pub mod user;
