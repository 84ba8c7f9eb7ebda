use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Router,
};
use chrono::{Local, NaiveDate};
use serde::Deserialize;
use serde_json::json;

use super::domain::{ChildId, ChildProfile, DayLog};
use super::repository::StateStore;
use super::service::{ProgressionService, ProgressionServiceError};

/// Router builder exposing the progression and legacy-shop endpoints.
///
/// Engine-level skips come back as HTTP 200 with `result: "skipped"` and a
/// reason; only store failures map to 5xx.
pub fn progression_router<S>(service: Arc<ProgressionService<S>>) -> Router
where
    S: StateStore + 'static,
{
    Router::new()
        .route("/api/v1/children/:child_id", put(upsert_child_handler::<S>))
        .route(
            "/api/v1/children/:child_id/progression",
            get(progression_handler::<S>),
        )
        .route("/api/v1/children/:child_id/log", post(log_handler::<S>))
        .route("/api/v1/children/:child_id/timer", post(timer_handler::<S>))
        .route("/api/v1/children/:child_id/chest", get(chest_handler::<S>))
        .route(
            "/api/v1/children/:child_id/chest/open",
            post(open_chest_handler::<S>),
        )
        .route(
            "/api/v1/children/:child_id/family-claims",
            post(family_claim_handler::<S>),
        )
        .route(
            "/api/v1/children/:child_id/shop/redeem",
            post(redeem_handler::<S>),
        )
        .with_state(service)
}

#[derive(Debug, Deserialize)]
pub(crate) struct TodayQuery {
    /// Override the reference "today" (streak/league anchor). Defaults to
    /// the local date; exposed for deterministic clients and tests.
    pub(crate) today: Option<NaiveDate>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct UpsertChildRequest {
    pub(crate) date_of_birth: Option<NaiveDate>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct LogRequest {
    pub(crate) date: NaiveDate,
    #[serde(default)]
    pub(crate) am: bool,
    #[serde(default)]
    pub(crate) pm: bool,
    pub(crate) today: Option<NaiveDate>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct TimerRequest {
    pub(crate) date: NaiveDate,
    pub(crate) seconds: u32,
    pub(crate) target_seconds: Option<u32>,
    pub(crate) today: Option<NaiveDate>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct OpenChestRequest {
    pub(crate) date: NaiveDate,
    pub(crate) choice_id: String,
    pub(crate) today: Option<NaiveDate>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct FamilyClaimRequest {
    pub(crate) milestone_key: String,
    pub(crate) option_id: String,
    #[serde(default)]
    pub(crate) option_label: String,
    pub(crate) today: Option<NaiveDate>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RedeemRequest {
    pub(crate) item_id: String,
    pub(crate) today: Option<NaiveDate>,
}

fn today_or_local(today: Option<NaiveDate>) -> NaiveDate {
    today.unwrap_or_else(|| Local::now().date_naive())
}

fn service_error(error: ProgressionServiceError) -> Response {
    let payload = json!({ "error": error.to_string() });
    (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
}

pub(crate) async fn upsert_child_handler<S>(
    State(service): State<Arc<ProgressionService<S>>>,
    Path(child_id): Path<String>,
    axum::Json(request): axum::Json<UpsertChildRequest>,
) -> Response
where
    S: StateStore + 'static,
{
    let profile = ChildProfile {
        id: ChildId::new(child_id),
        date_of_birth: request.date_of_birth,
    };
    match service.upsert_child(profile.clone()) {
        Ok(()) => (StatusCode::OK, axum::Json(profile)).into_response(),
        Err(error) => service_error(error),
    }
}

pub(crate) async fn progression_handler<S>(
    State(service): State<Arc<ProgressionService<S>>>,
    Path(child_id): Path<String>,
    Query(query): Query<TodayQuery>,
) -> Response
where
    S: StateStore + 'static,
{
    let id = ChildId::new(child_id);
    match service.progression(&id, today_or_local(query.today)) {
        Ok(view) => (StatusCode::OK, axum::Json(view)).into_response(),
        Err(error) => service_error(error),
    }
}

pub(crate) async fn log_handler<S>(
    State(service): State<Arc<ProgressionService<S>>>,
    Path(child_id): Path<String>,
    axum::Json(request): axum::Json<LogRequest>,
) -> Response
where
    S: StateStore + 'static,
{
    let id = ChildId::new(child_id);
    let log = DayLog {
        am: request.am,
        pm: request.pm,
    };
    match service.log_brushing(&id, request.date, log, today_or_local(request.today)) {
        Ok(view) => (StatusCode::OK, axum::Json(view)).into_response(),
        Err(error) => service_error(error),
    }
}

pub(crate) async fn timer_handler<S>(
    State(service): State<Arc<ProgressionService<S>>>,
    Path(child_id): Path<String>,
    axum::Json(request): axum::Json<TimerRequest>,
) -> Response
where
    S: StateStore + 'static,
{
    let id = ChildId::new(child_id);
    match service.timer_complete(
        &id,
        request.date,
        request.seconds,
        request.target_seconds,
        today_or_local(request.today),
    ) {
        Ok(view) => (StatusCode::OK, axum::Json(view)).into_response(),
        Err(error) => service_error(error),
    }
}

/// The chest endpoint regenerates the deterministic option set; nothing is
/// persisted by a read.
pub(crate) async fn chest_handler<S>(
    State(service): State<Arc<ProgressionService<S>>>,
    Path(child_id): Path<String>,
    Query(query): Query<TodayQuery>,
) -> Response
where
    S: StateStore + 'static,
{
    let id = ChildId::new(child_id);
    let date = today_or_local(query.today);
    match service.progression(&id, date) {
        Ok(view) => (StatusCode::OK, axum::Json(view.chest)).into_response(),
        Err(error) => service_error(error),
    }
}

pub(crate) async fn open_chest_handler<S>(
    State(service): State<Arc<ProgressionService<S>>>,
    Path(child_id): Path<String>,
    axum::Json(request): axum::Json<OpenChestRequest>,
) -> Response
where
    S: StateStore + 'static,
{
    let id = ChildId::new(child_id);
    match service.open_chest(
        &id,
        request.date,
        &request.choice_id,
        today_or_local(request.today),
    ) {
        Ok(view) => (StatusCode::OK, axum::Json(view)).into_response(),
        Err(error) => service_error(error),
    }
}

pub(crate) async fn family_claim_handler<S>(
    State(service): State<Arc<ProgressionService<S>>>,
    Path(child_id): Path<String>,
    axum::Json(request): axum::Json<FamilyClaimRequest>,
) -> Response
where
    S: StateStore + 'static,
{
    let id = ChildId::new(child_id);
    match service.claim_family_reward(
        &id,
        &request.milestone_key,
        &request.option_id,
        &request.option_label,
        today_or_local(request.today),
    ) {
        Ok(view) => (StatusCode::OK, axum::Json(view)).into_response(),
        Err(error) => service_error(error),
    }
}

pub(crate) async fn redeem_handler<S>(
    State(service): State<Arc<ProgressionService<S>>>,
    Path(child_id): Path<String>,
    axum::Json(request): axum::Json<RedeemRequest>,
) -> Response
where
    S: StateStore + 'static,
{
    let id = ChildId::new(child_id);
    match service.redeem_shop_item(&id, &request.item_id, today_or_local(request.today)) {
        Ok(view) => (StatusCode::OK, axum::Json(view)).into_response(),
        Err(error) => service_error(error),
    }
}
