use rocket::http::Status;
use rocket::serde::json::Json;
use rocket::Request;
use thoughtnet_common::errors::ThoughtnetError;
use thoughtnet_common::http::responses::{ErrorResponse, MessageResponse};
use tracing::error;

pub const WRONG_ROUTE: &str = "Wrong route!";

#[derive(Responder, Debug)]
pub enum ThoughtnetResponse {
    #[response(status = 400)]
    BadRequest(Json<ErrorResponse>),
    #[response(status = 404)]
    NotFound(Json<MessageResponse>),
    #[response(status = 500)]
    InternalError(Json<ErrorResponse>),
}

impl From<ThoughtnetError> for ThoughtnetResponse {
    fn from(err: ThoughtnetError) -> Self {
        if err.is_client_error() {
            ThoughtnetResponse::BadRequest(Json(ErrorResponse::new(err.to_string())))
        } else if err.is_not_found() {
            ThoughtnetResponse::NotFound(Json(MessageResponse::new(err.to_string())))
        } else {
            ThoughtnetResponse::InternalError(Json(ErrorResponse::new(err.to_string())))
        }
    }
}

/**
 * Build an error mapper that prefixes server faults with what was being attempted
 * @notice - client errors and not-found keep their own message
 *
 * @param action - e.g. "Error creating thought"
 */
pub fn failed(action: &'static str) -> impl Fn(ThoughtnetError) -> ThoughtnetResponse {
    move |err| {
        if err.is_client_error() || err.is_not_found() {
            return err.into();
        }
        error!("{}: {}", action, err);
        ThoughtnetResponse::InternalError(Json(ErrorResponse::new(format!(
            "{}: {}",
            action, err
        ))))
    }
}

/// Any unmatched path, under /api or not, answers 200 with a plain-text notice
#[catch(404)]
pub fn wrong_route() -> (Status, &'static str) {
    (Status::Ok, WRONG_ROUTE)
}

#[catch(400)]
pub fn bad_request(req: &Request) -> Json<ErrorResponse> {
    Json(ErrorResponse::new(format!(
        "Malformed request body for {} {}",
        req.method(),
        req.uri()
    )))
}

#[catch(422)]
pub fn unprocessable_entity(req: &Request) -> Json<ErrorResponse> {
    Json(ErrorResponse::new(format!(
        "Request body for {} {} has fields of the wrong type",
        req.method(),
        req.uri()
    )))
}

#[catch(500)]
pub fn internal_error() -> Json<ErrorResponse> {
    Json(ErrorResponse::new(
        ThoughtnetError::InternalError.to_string(),
    ))
}
