use std::sync::Arc;

use axum::extract::{Path, State};
use axum::routing::{get, post};
use axum::{Extension, Json, Router, middleware};
use munch_api::*;

use crate::errors::ApiError;
use crate::middlewares::{TokenState, auth};
use crate::services::{TokenClaims, VoteService};

#[derive(Clone)]
pub struct VoteState {
    pub vote_service: Arc<VoteService>,
}

pub fn vote_router(vote_state: VoteState, token_state: TokenState) -> Router {
    Router::new()
        .route("/api/groups/:join_code/votes", post(cast_vote))
        .route("/api/groups/:join_code/results", get(get_results))
        .route_layer(middleware::from_fn_with_state(token_state, auth))
        .with_state(vote_state)
}

#[utoipa::path(
    post,
    path = "/api/groups/{join_code}/votes",
    tag = "vote",
    params(
        ("join_code" = String, Path, description = "Group join code")
    ),
    request_body = CastVoteRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Vote recorded, replacing any earlier one", body = VoteResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Not a member of this group"),
        (status = 404, description = "Group or restaurant not found"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn cast_vote(
    Extension(token_data): Extension<TokenClaims>,
    State(state): State<VoteState>,
    Path(join_code): Path<String>,
    Json(body): Json<CastVoteRequest>,
) -> Result<Json<VoteResponse>, ApiError> {
    let vote = state
        .vote_service
        .cast_vote(&join_code, &token_data.sub, body.restaurant_id, body.value)
        .await?;

    Ok(Json(vote.into()))
}

#[utoipa::path(
    get,
    path = "/api/groups/{join_code}/results",
    tag = "vote",
    params(
        ("join_code" = String, Path, description = "Group join code")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Ranked restaurants", body = ResultsResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Not a member of this group"),
        (status = 404, description = "Group not found"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn get_results(
    Extension(token_data): Extension<TokenClaims>,
    State(state): State<VoteState>,
    Path(join_code): Path<String>,
) -> Result<Json<ResultsResponse>, ApiError> {
    let results = state
        .vote_service
        .results(&join_code, &token_data.sub)
        .await?;

    Ok(Json(results.into()))
}
