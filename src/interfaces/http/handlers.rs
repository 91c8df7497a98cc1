use super::AppState;
use super::auth::AuthenticatedUser;
use super::envelope;
use crate::application::coordinator::SettlementOutcome;
use crate::application::identity::{IdentityProfile, SyncOutcome};
use crate::domain::progress::MarkOutcome;
use crate::error::SettlementError;
use actix_web::http::header;
use actix_web::{HttpRequest, HttpResponse, Responder, get, post, web};
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

// Fallback origin for the post-payment redirect when the client sends no
// Origin header (e.g. non-browser callers). Matches the dev frontend.
const DEFAULT_ORIGIN: &str = "http://localhost:5173";

#[get("/")]
pub async fn root() -> impl Responder {
    "API Working"
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncBody {
    email: String,
    name: String,
    #[serde(default)]
    image_url: String,
}

#[post("/sync")]
pub async fn sync_user(
    state: web::Data<AppState>,
    caller: AuthenticatedUser,
    body: web::Json<SyncBody>,
) -> HttpResponse {
    let body = body.into_inner();
    let profile = IdentityProfile {
        email: body.email,
        name: body.name,
        image_url: body.image_url,
    };
    match state.identity.sync(caller.id(), profile).await {
        Ok(SyncOutcome::Created(user)) => envelope::ok_with(json!({
            "message": "User synced successfully",
            "user": user,
        })),
        Ok(SyncOutcome::AlreadySynced(user)) => envelope::ok_with(json!({
            "message": "User already synced",
            "user": user,
        })),
        Err(err) => envelope::fail(&err),
    }
}

#[post("/update")]
pub async fn update_user(
    state: web::Data<AppState>,
    caller: AuthenticatedUser,
    body: web::Json<SyncBody>,
) -> HttpResponse {
    let body = body.into_inner();
    let profile = IdentityProfile {
        email: body.email,
        name: body.name,
        image_url: body.image_url,
    };
    match state.identity.update(caller.id(), profile).await {
        Ok(user) => envelope::ok_with(json!({
            "message": "User updated successfully",
            "user": user,
        })),
        Err(err) => envelope::fail(&err),
    }
}

#[get("/data")]
pub async fn get_user_data(state: web::Data<AppState>, caller: AuthenticatedUser) -> HttpResponse {
    match state.identity.get(caller.id()).await {
        Ok(user) => envelope::ok_with(json!({ "user": user })),
        Err(err) => envelope::fail(&err),
    }
}

#[get("/enrolled-courses")]
pub async fn enrolled_courses(
    state: web::Data<AppState>,
    caller: AuthenticatedUser,
) -> HttpResponse {
    match state.applier.enrolled_courses(caller.id()).await {
        Ok(courses) => envelope::ok_with(json!({ "enrolledCourses": courses })),
        Err(err) => envelope::fail(&err),
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseBody {
    course_id: String,
}

#[post("/purchase")]
pub async fn purchase_course(
    req: HttpRequest,
    state: web::Data<AppState>,
    caller: AuthenticatedUser,
    body: web::Json<PurchaseBody>,
) -> HttpResponse {
    let origin = req
        .headers()
        .get(header::ORIGIN)
        .and_then(|value| value.to_str().ok())
        .unwrap_or(DEFAULT_ORIGIN);

    match state
        .coordinator
        .initiate(caller.id(), &body.course_id, origin)
        .await
    {
        Ok(handle) => envelope::ok_with(json!({
            "session_url": handle.redirect_url,
            "purchaseId": handle.purchase_id,
        })),
        Err(err) => envelope::fail(&err),
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletePurchaseBody {
    purchase_id: Uuid,
    // Echoed back by the processor redirect; retained for log correlation.
    #[serde(default)]
    session_id: Option<String>,
}

#[post("/complete-purchase")]
pub async fn complete_purchase(
    state: web::Data<AppState>,
    caller: AuthenticatedUser,
    body: web::Json<CompletePurchaseBody>,
) -> HttpResponse {
    if let Some(session_id) = &body.session_id {
        tracing::debug!(purchase_id = %body.purchase_id, session_id, "completion triggered");
    }
    match state.coordinator.complete(body.purchase_id, caller.id()).await {
        Ok(SettlementOutcome::Completed) => envelope::ok("Purchase completed successfully"),
        Ok(SettlementOutcome::AlreadyCompleted) => envelope::ok("Purchase already completed"),
        Err(err) => envelope::fail(&err),
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckStatusBody {
    purchase_id: Uuid,
}

#[post("/check-purchase-status")]
pub async fn check_purchase_status(
    state: web::Data<AppState>,
    caller: AuthenticatedUser,
    body: web::Json<CheckStatusBody>,
) -> HttpResponse {
    match state
        .coordinator
        .check_status(body.purchase_id, caller.id())
        .await
    {
        Ok(status) => envelope::ok_with(json!({ "status": status.as_str() })),
        Err(err) => envelope::fail(&err),
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProgressBody {
    course_id: String,
    lecture_id: String,
}

#[post("/update-course-progress")]
pub async fn update_course_progress(
    state: web::Data<AppState>,
    caller: AuthenticatedUser,
    body: web::Json<UpdateProgressBody>,
) -> HttpResponse {
    match state
        .tracker
        .mark_lecture_complete(caller.id(), &body.course_id, &body.lecture_id)
        .await
    {
        Ok(MarkOutcome::Recorded) => envelope::ok("Progress Updated"),
        Ok(MarkOutcome::AlreadyCompleted) => envelope::ok("Lecture Already Completed"),
        Err(err) => envelope::fail(&err),
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetProgressBody {
    course_id: String,
}

#[post("/get-course-progress")]
pub async fn get_course_progress(
    state: web::Data<AppState>,
    caller: AuthenticatedUser,
    body: web::Json<GetProgressBody>,
) -> HttpResponse {
    match state.tracker.summary(caller.id(), &body.course_id).await {
        Ok(summary) => envelope::ok_with(json!({
            "progressData": {
                "userId": summary.record.user_id,
                "courseId": summary.record.course_id,
                "lectureCompleted": summary.record.completed_lectures,
                "percentComplete": summary.percent_complete,
                "isCompleted": summary.is_completed,
            }
        })),
        Err(err) => envelope::fail(&err),
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddRatingBody {
    course_id: String,
    rating: i64,
}

#[post("/add-rating")]
pub async fn add_rating(
    state: web::Data<AppState>,
    caller: AuthenticatedUser,
    body: web::Json<AddRatingBody>,
) -> HttpResponse {
    let Ok(rating) = u8::try_from(body.rating) else {
        return envelope::fail(&SettlementError::validation("Invalid Details"));
    };
    match state
        .ratings
        .add_or_update(caller.id(), &body.course_id, rating)
        .await
    {
        Ok(()) => envelope::ok("Rating added"),
        Err(err) => envelope::fail(&err),
    }
}
