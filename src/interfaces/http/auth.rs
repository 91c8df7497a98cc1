//! Caller identity extraction.
//!
//! Identity verification itself belongs to the external provider; by the time
//! a request reaches this service, the verifying proxy has placed the stable
//! user id in the `x-user-id` header. Every mutating route trusts that id as
//! the authenticated caller.

use actix_web::dev::Payload;
use actix_web::http::StatusCode;
use actix_web::{FromRequest, HttpRequest, HttpResponse, ResponseError};
use serde_json::json;
use std::fmt;
use std::future::{Ready, ready};

pub const USER_ID_HEADER: &str = "x-user-id";

/// The authenticated caller's identity-provider user id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedUser(pub String);

impl AuthenticatedUser {
    pub fn id(&self) -> &str {
        &self.0
    }
}

#[derive(Debug)]
pub struct NotAuthenticated;

impl fmt::Display for NotAuthenticated {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Not authenticated")
    }
}

impl ResponseError for NotAuthenticated {
    // Domain errors ride the envelope, not the status line.
    fn status_code(&self) -> StatusCode {
        StatusCode::OK
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::Ok().json(json!({ "success": false, "message": "Not authenticated" }))
    }
}

impl FromRequest for AuthenticatedUser {
    type Error = NotAuthenticated;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let user_id = req
            .headers()
            .get(USER_ID_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(str::trim)
            .filter(|id| !id.is_empty());

        ready(match user_id {
            Some(id) => Ok(AuthenticatedUser(id.to_owned())),
            None => Err(NotAuthenticated),
        })
    }
}
