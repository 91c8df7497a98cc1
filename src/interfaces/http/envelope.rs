//! Uniform response envelope: `{success, message?, ...payload}`.
//!
//! Domain errors are carried in the envelope, not in HTTP status codes;
//! callers inspect `success`. Only transport-level problems (unroutable
//! paths, oversized bodies) surface as non-200 responses.

use crate::error::SettlementError;
use actix_web::HttpResponse;
use serde_json::{Value, json};
use tracing::error;

pub fn ok(message: &str) -> HttpResponse {
    ok_with(json!({ "message": message }))
}

/// Success envelope with extra payload fields merged in.
pub fn ok_with(mut payload: Value) -> HttpResponse {
    if let Value::Object(map) = &mut payload {
        map.insert("success".into(), Value::Bool(true));
    }
    HttpResponse::Ok().json(payload)
}

pub fn fail_message(message: &str) -> HttpResponse {
    HttpResponse::Ok().json(json!({ "success": false, "message": message }))
}

/// Translates a domain error into the failure envelope. Unexpected errors are
/// logged in full server-side and reported generically to the client.
pub fn fail(err: &SettlementError) -> HttpResponse {
    match err {
        SettlementError::Internal(source) => {
            error!(error = %source, "unexpected error while handling request");
            fail_message("Internal server error")
        }
        other => fail_message(&other.to_string()),
    }
}
