use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;

use super::comments::CommentError;
use super::domain::{
    CitizenId, CitizenProfile, CommentId, ConstituencyId, CountyId, Feedback, LeaderId, WardId,
};
use super::moderation::ModerationError;
use super::ratings::RatingError;
use super::repository::{
    CommentRepository, LeaderDirectory, LeaderFilter, ProfileStore, RatingRepository,
    RepositoryError,
};
use super::service::{CivicService, EngineError};

/// Explicit identity token header; the router resolves it through the profile
/// store and hands the profile to the core. No ambient session state.
pub const CITIZEN_HEADER: &str = "x-citizen-id";

pub struct CivicRouterState<L, R, C, P> {
    pub service: Arc<CivicService<L, R, C>>,
    pub profiles: Arc<P>,
}

impl<L, R, C, P> Clone for CivicRouterState<L, R, C, P> {
    fn clone(&self) -> Self {
        Self {
            service: self.service.clone(),
            profiles: self.profiles.clone(),
        }
    }
}

/// Router builder exposing the engine over HTTP.
pub fn civic_router<L, R, C, P>(
    service: Arc<CivicService<L, R, C>>,
    profiles: Arc<P>,
) -> Router
where
    L: LeaderDirectory + 'static,
    R: RatingRepository + 'static,
    C: CommentRepository + 'static,
    P: ProfileStore + 'static,
{
    let state = CivicRouterState { service, profiles };

    Router::new()
        .route("/api/v1/counties", get(counties_handler::<L, R, C, P>))
        .route(
            "/api/v1/counties/:county_id/constituencies",
            get(constituencies_handler::<L, R, C, P>),
        )
        .route(
            "/api/v1/constituencies/:constituency_id/wards",
            get(wards_handler::<L, R, C, P>),
        )
        .route(
            "/api/v1/leaders/resolve",
            post(resolve_handler::<L, R, C, P>),
        )
        .route(
            "/api/v1/leaders/:leader_id",
            get(leader_page_handler::<L, R, C, P>),
        )
        .route(
            "/api/v1/leaders/:leader_id/feedback",
            post(feedback_handler::<L, R, C, P>),
        )
        .route(
            "/api/v1/moderation/stats",
            get(moderation_stats_handler::<L, R, C, P>),
        )
        .route(
            "/api/v1/moderation/comments/:comment_id/hidden",
            post(set_hidden_handler::<L, R, C, P>),
        )
        .route(
            "/api/v1/moderation/export",
            get(moderation_export_handler::<L, R, C, P>),
        )
        .with_state(state)
}

#[derive(Debug, Deserialize)]
pub(crate) struct ResolveRequest {
    #[serde(default)]
    pub(crate) citizen_id: Option<CitizenId>,
    #[serde(default)]
    pub(crate) county_id: Option<CountyId>,
    #[serde(default)]
    pub(crate) constituency_id: Option<ConstituencyId>,
    #[serde(default)]
    pub(crate) ward_id: Option<WardId>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct FeedbackRequest {
    pub(crate) citizen_id: CitizenId,
    #[serde(flatten)]
    pub(crate) feedback: Feedback,
}

#[derive(Debug, Deserialize)]
pub(crate) struct HiddenRequest {
    pub(crate) hidden: bool,
}

async fn counties_handler<L, R, C, P>(
    State(state): State<CivicRouterState<L, R, C, P>>,
) -> Response
where
    L: LeaderDirectory + 'static,
    R: RatingRepository + 'static,
    C: CommentRepository + 'static,
    P: ProfileStore + 'static,
{
    let counties = state.service.hierarchy().counties().to_vec();
    (StatusCode::OK, Json(counties)).into_response()
}

async fn constituencies_handler<L, R, C, P>(
    State(state): State<CivicRouterState<L, R, C, P>>,
    Path(county_id): Path<String>,
) -> Response
where
    L: LeaderDirectory + 'static,
    R: RatingRepository + 'static,
    C: CommentRepository + 'static,
    P: ProfileStore + 'static,
{
    let constituencies: Vec<_> = state
        .service
        .hierarchy()
        .constituencies_of(&CountyId(county_id))
        .into_iter()
        .cloned()
        .collect();
    (StatusCode::OK, Json(constituencies)).into_response()
}

async fn wards_handler<L, R, C, P>(
    State(state): State<CivicRouterState<L, R, C, P>>,
    Path(constituency_id): Path<String>,
) -> Response
where
    L: LeaderDirectory + 'static,
    R: RatingRepository + 'static,
    C: CommentRepository + 'static,
    P: ProfileStore + 'static,
{
    let wards: Vec<_> = state
        .service
        .hierarchy()
        .wards_of(&ConstituencyId(constituency_id))
        .into_iter()
        .cloned()
        .collect();
    (StatusCode::OK, Json(wards)).into_response()
}

async fn resolve_handler<L, R, C, P>(
    State(state): State<CivicRouterState<L, R, C, P>>,
    Json(request): Json<ResolveRequest>,
) -> Response
where
    L: LeaderDirectory + 'static,
    R: RatingRepository + 'static,
    C: CommentRepository + 'static,
    P: ProfileStore + 'static,
{
    let profile = match request.citizen_id {
        Some(citizen_id) => match state.profiles.fetch(&citizen_id) {
            Ok(Some(profile)) => profile,
            Ok(None) => return unknown_identity_response(&citizen_id),
            Err(err) => return engine_error_response(EngineError::from(err)),
        },
        None => {
            let mut profile = CitizenProfile::new(CitizenId("guest".to_string()));
            profile.county_id = request.county_id;
            profile.constituency_id = request.constituency_id;
            profile.ward_id = request.ward_id;
            profile
        }
    };

    match state.service.resolve_leaders(&profile) {
        Ok(leaders) => (StatusCode::OK, Json(leaders)).into_response(),
        Err(err) => engine_error_response(err),
    }
}

async fn leader_page_handler<L, R, C, P>(
    State(state): State<CivicRouterState<L, R, C, P>>,
    Path(leader_id): Path<String>,
) -> Response
where
    L: LeaderDirectory + 'static,
    R: RatingRepository + 'static,
    C: CommentRepository + 'static,
    P: ProfileStore + 'static,
{
    match state.service.leader_page(&LeaderId(leader_id)) {
        Ok(view) => (StatusCode::OK, Json(view)).into_response(),
        Err(err) => engine_error_response(err),
    }
}

async fn feedback_handler<L, R, C, P>(
    State(state): State<CivicRouterState<L, R, C, P>>,
    Path(leader_id): Path<String>,
    Json(request): Json<FeedbackRequest>,
) -> Response
where
    L: LeaderDirectory + 'static,
    R: RatingRepository + 'static,
    C: CommentRepository + 'static,
    P: ProfileStore + 'static,
{
    let author = match state.profiles.fetch(&request.citizen_id) {
        Ok(Some(profile)) => profile,
        Ok(None) => return unknown_identity_response(&request.citizen_id),
        Err(err) => return engine_error_response(EngineError::from(err)),
    };

    match state
        .service
        .submit_feedback(&author, &LeaderId(leader_id), request.feedback)
    {
        Ok(receipt) => (StatusCode::CREATED, Json(receipt)).into_response(),
        Err(err) => engine_error_response(err),
    }
}

async fn moderation_stats_handler<L, R, C, P>(
    State(state): State<CivicRouterState<L, R, C, P>>,
    headers: HeaderMap,
    Query(filter): Query<LeaderFilter>,
) -> Response
where
    L: LeaderDirectory + 'static,
    R: RatingRepository + 'static,
    C: CommentRepository + 'static,
    P: ProfileStore + 'static,
{
    let caller = match caller_profile(&state, &headers) {
        Ok(profile) => profile,
        Err(response) => return response,
    };

    match state.service.moderation().stats_for(&caller, &filter) {
        Ok(stats) => (StatusCode::OK, Json(stats)).into_response(),
        Err(err) => engine_error_response(EngineError::from(err)),
    }
}

async fn set_hidden_handler<L, R, C, P>(
    State(state): State<CivicRouterState<L, R, C, P>>,
    headers: HeaderMap,
    Path(comment_id): Path<u64>,
    Json(request): Json<HiddenRequest>,
) -> Response
where
    L: LeaderDirectory + 'static,
    R: RatingRepository + 'static,
    C: CommentRepository + 'static,
    P: ProfileStore + 'static,
{
    let caller = match caller_profile(&state, &headers) {
        Ok(profile) => profile,
        Err(response) => return response,
    };

    match state.service.moderation().set_comment_hidden(
        &caller,
        &CommentId(comment_id),
        request.hidden,
    ) {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({ "comment_id": comment_id, "hidden": request.hidden })),
        )
            .into_response(),
        Err(err) => engine_error_response(EngineError::from(err)),
    }
}

async fn moderation_export_handler<L, R, C, P>(
    State(state): State<CivicRouterState<L, R, C, P>>,
    headers: HeaderMap,
    Query(filter): Query<LeaderFilter>,
) -> Response
where
    L: LeaderDirectory + 'static,
    R: RatingRepository + 'static,
    C: CommentRepository + 'static,
    P: ProfileStore + 'static,
{
    let caller = match caller_profile(&state, &headers) {
        Ok(profile) => profile,
        Err(response) => return response,
    };

    let mut buffer = Vec::new();
    match state
        .service
        .moderation()
        .write_csv(&caller, &filter, &mut buffer)
    {
        Ok(()) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "text/csv; charset=utf-8")],
            buffer,
        )
            .into_response(),
        Err(err) => engine_error_response(EngineError::from(err)),
    }
}

fn caller_profile<L, R, C, P>(
    state: &CivicRouterState<L, R, C, P>,
    headers: &HeaderMap,
) -> Result<CitizenProfile, Response>
where
    P: ProfileStore,
{
    let Some(token) = headers
        .get(CITIZEN_HEADER)
        .and_then(|value| value.to_str().ok())
    else {
        let payload = json!({ "error": format!("missing {CITIZEN_HEADER} header") });
        return Err((StatusCode::UNAUTHORIZED, Json(payload)).into_response());
    };

    let citizen_id = CitizenId(token.to_string());
    match state.profiles.fetch(&citizen_id) {
        Ok(Some(profile)) => Ok(profile),
        Ok(None) => Err(unknown_identity_response(&citizen_id)),
        Err(err) => Err(engine_error_response(EngineError::from(err))),
    }
}

fn unknown_identity_response(citizen_id: &CitizenId) -> Response {
    let payload = json!({ "error": format!("unknown citizen '{}'", citizen_id.0) });
    (StatusCode::UNAUTHORIZED, Json(payload)).into_response()
}

fn engine_error_response(err: EngineError) -> Response {
    let status = match &err {
        EngineError::LeaderNotFound(_) => StatusCode::NOT_FOUND,
        EngineError::InvalidLocation => StatusCode::UNPROCESSABLE_ENTITY,
        EngineError::Rating(RatingError::InvalidScore { .. }) => StatusCode::UNPROCESSABLE_ENTITY,
        EngineError::Comment(CommentError::EmptyBody | CommentError::InvalidParent(_)) => {
            StatusCode::UNPROCESSABLE_ENTITY
        }
        EngineError::Moderation(ModerationError::Unauthorized) => StatusCode::UNAUTHORIZED,
        EngineError::Moderation(ModerationError::Comments(CommentError::Repository(
            RepositoryError::NotFound,
        ))) => StatusCode::NOT_FOUND,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };

    let body = Json(json!({ "error": err.to_string() }));
    (status, body).into_response()
}
