use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, post, put};
use axum::{Extension, Json, Router, middleware};
use munch_api::*;

use crate::errors::ApiError;
use crate::middlewares::{TokenState, auth};
use crate::services::{GroupService, TokenClaims};

#[derive(Clone)]
pub struct GroupState {
    pub group_service: Arc<GroupService>,
}

pub fn group_router(group_state: GroupState, token_state: TokenState) -> Router {
    Router::new()
        .route("/api/groups", get(get_user_groups).post(create_group))
        .route("/api/groups/:join_code", get(get_group))
        .route("/api/groups/:join_code/active", put(set_group_active))
        .route("/api/groups/:join_code/restaurants", get(get_group_restaurants))
        .route(
            "/api/groups/:join_code/restaurants/refresh",
            post(refresh_group_restaurants),
        )
        .route_layer(middleware::from_fn_with_state(token_state, auth))
        .with_state(group_state)
}

#[utoipa::path(
    post,
    path = "/api/groups",
    tag = "group",
    request_body = CreateGroupRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 201, description = "Group created, candidate restaurants attached", body = CreateGroupResponse),
        (status = 400, description = "Invalid request parameters"),
        (status = 401, description = "Unauthorized"),
        (status = 409, description = "Group name already exists"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn create_group(
    Extension(token_data): Extension<TokenClaims>,
    State(state): State<GroupState>,
    Json(body): Json<CreateGroupRequest>,
) -> Result<(StatusCode, Json<CreateGroupResponse>), ApiError> {
    let created = state.group_service.create_group(&token_data.sub, &body).await?;

    let response = CreateGroupResponse {
        ingestion: IngestionResponse::from(&created.ingestion),
        group: created.group.into(),
        host: created.host.into(),
    };

    Ok((StatusCode::CREATED, Json(response)))
}

#[utoipa::path(
    get,
    path = "/api/groups",
    tag = "group",
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Groups of the current user, newest first", body = Vec<GroupSummaryResponse>),
        (status = 401, description = "Unauthorized"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn get_user_groups(
    Extension(token_data): Extension<TokenClaims>,
    State(state): State<GroupState>,
) -> Result<Json<Vec<GroupSummaryResponse>>, ApiError> {
    let groups = state.group_service.user_groups(&token_data.sub).await?;

    let response = groups
        .into_iter()
        .map(|item| GroupSummaryResponse {
            group: item.group.into(),
            member_count: item.member_count,
        })
        .collect();

    Ok(Json(response))
}

#[utoipa::path(
    get,
    path = "/api/groups/{join_code}",
    tag = "group",
    params(
        ("join_code" = String, Path, description = "Group join code")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Group details", body = GroupResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Not a member of this group"),
        (status = 404, description = "Group not found"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn get_group(
    Extension(token_data): Extension<TokenClaims>,
    State(state): State<GroupState>,
    Path(join_code): Path<String>,
) -> Result<Json<GroupResponse>, ApiError> {
    let (group, _) = state
        .group_service
        .membership(&join_code, &token_data.sub)
        .await?;

    Ok(Json(group.into()))
}

#[utoipa::path(
    put,
    path = "/api/groups/{join_code}/active",
    tag = "group",
    params(
        ("join_code" = String, Path, description = "Group join code")
    ),
    request_body = SetActiveRequest,
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Group updated", body = GroupResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Only the host can change this"),
        (status = 404, description = "Group not found"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn set_group_active(
    Extension(token_data): Extension<TokenClaims>,
    State(state): State<GroupState>,
    Path(join_code): Path<String>,
    Json(body): Json<SetActiveRequest>,
) -> Result<Json<GroupResponse>, ApiError> {
    let group = state
        .group_service
        .set_active(&join_code, &token_data.sub, body.is_active)
        .await?;

    Ok(Json(group.into()))
}

#[utoipa::path(
    get,
    path = "/api/groups/{join_code}/restaurants",
    tag = "group",
    params(
        ("join_code" = String, Path, description = "Group join code")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Candidate restaurants of the group", body = Vec<RestaurantResponse>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Not a member of this group"),
        (status = 404, description = "Group not found"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn get_group_restaurants(
    Extension(token_data): Extension<TokenClaims>,
    State(state): State<GroupState>,
    Path(join_code): Path<String>,
) -> Result<Json<Vec<RestaurantResponse>>, ApiError> {
    let restaurants = state
        .group_service
        .restaurants(&join_code, &token_data.sub)
        .await?;

    Ok(Json(restaurants.into_iter().map(Into::into).collect()))
}

#[utoipa::path(
    post,
    path = "/api/groups/{join_code}/restaurants/refresh",
    tag = "group",
    params(
        ("join_code" = String, Path, description = "Group join code")
    ),
    security(
        ("bearer_auth" = [])
    ),
    responses(
        (status = 200, description = "Restaurants fetched again", body = IngestionResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Only the host can refresh"),
        (status = 404, description = "Group not found"),
        (status = 502, description = "Restaurants could not be stored")
    )
)]
pub async fn refresh_group_restaurants(
    Extension(token_data): Extension<TokenClaims>,
    State(state): State<GroupState>,
    Path(join_code): Path<String>,
) -> Result<Json<IngestionResponse>, ApiError> {
    let report = state
        .group_service
        .refresh_restaurants(&join_code, &token_data.sub)
        .await?;

    Ok(Json(IngestionResponse::from(&report)))
}
