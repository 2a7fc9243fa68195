use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Extension, Json, Router, middleware};
use munch_api::*;

use crate::errors::ApiError;
use crate::middlewares::{TokenState, auth};
use crate::services::{MembershipService, TokenClaims};

#[derive(Clone)]
pub struct MembershipState {
    pub membership_service: Arc<MembershipService>,
}

pub fn membership_router(membership_state: MembershipState, token_state: TokenState) -> Router {
    Router::new()
        .route("/api/memberships", post(join_group))
        .route("/api/groups/:join_code/members", get(get_group_members))
        .route_layer(middleware::from_fn_with_state(token_state, auth))
        .with_state(membership_state)
}

#[utoipa::path(
    post,
    path = "/api/memberships",
    tag = "membership",
    request_body = JoinGroupRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 201, description = "Joined the group", body = JoinGroupResponse),
        (status = 200, description = "Already a member", body = JoinGroupResponse),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "No active group with this code"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn join_group(
    Extension(token_data): Extension<TokenClaims>,
    State(state): State<MembershipState>,
    Json(body): Json<JoinGroupRequest>,
) -> Result<(StatusCode, Json<JoinGroupResponse>), ApiError> {
    let outcome = state
        .membership_service
        .join(&body.join_code, &token_data.sub)
        .await?;

    let status = if outcome.created {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };

    Ok((
        status,
        Json(JoinGroupResponse {
            group: outcome.group.into(),
            member: outcome.member.into(),
            created: outcome.created,
        }),
    ))
}

#[utoipa::path(
    get,
    path = "/api/groups/{join_code}/members",
    tag = "membership",
    params(
        ("join_code" = String, Path, description = "Group join code")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Members of the group, host first", body = Vec<MemberResponse>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Not a member of this group"),
        (status = 404, description = "Group not found"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn get_group_members(
    Extension(token_data): Extension<TokenClaims>,
    State(state): State<MembershipState>,
    Path(join_code): Path<String>,
) -> Result<Json<Vec<MemberResponse>>, ApiError> {
    let members = state
        .membership_service
        .members(&join_code, &token_data.sub)
        .await?;

    Ok(Json(members.into_iter().map(Into::into).collect()))
}
