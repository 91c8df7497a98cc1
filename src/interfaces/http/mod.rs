//! HTTP boundary: actix-web handlers over the application services.
//!
//! Every domain error is translated into the `{success:false, message}`
//! envelope here; nothing below this layer knows about HTTP.

pub mod auth;
pub mod envelope;
pub mod handlers;

use crate::application::coordinator::SettlementCoordinator;
use crate::application::enrollment::EnrollmentApplier;
use crate::application::identity::IdentitySync;
use crate::application::progress::ProgressTracker;
use crate::application::rating::RatingService;
use actix_web::web;

/// Request-scoped view of the application services, shared via `web::Data`.
#[derive(Clone)]
pub struct AppState {
    pub identity: IdentitySync,
    pub coordinator: SettlementCoordinator,
    pub applier: EnrollmentApplier,
    pub tracker: ProgressTracker,
    pub ratings: RatingService,
}

/// Body extraction failures (malformed JSON, missing fields) also ride the
/// envelope, per the uniform-response contract.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| {
        actix_web::error::InternalError::from_response(
            err,
            envelope::fail_message("Invalid Details"),
        )
        .into()
    })
}

/// Mounts the service routes. The user-facing surface lives under
/// `/api/user`, mirroring the upstream gateway's layout.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(handlers::root).service(
        web::scope("/api/user")
            .app_data(json_config())
            .service(handlers::sync_user)
            .service(handlers::update_user)
            .service(handlers::get_user_data)
            .service(handlers::enrolled_courses)
            .service(handlers::purchase_course)
            .service(handlers::complete_purchase)
            .service(handlers::check_purchase_status)
            .service(handlers::update_course_progress)
            .service(handlers::get_course_progress)
            .service(handlers::add_rating),
    );
}
