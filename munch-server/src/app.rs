use std::sync::Arc;

use anyhow::Context;
use axum::routing::get;
use axum::{Json, Router};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::configs::{SchemaManager, Settings, Storage};
use crate::handles::*;
use crate::middlewares::TokenState;
use crate::services::{
    GeoapifyClient, GroupService, MembershipService, PlacesProvider, PlacesService, TokenService,
    VoteService,
};

#[derive(OpenApi)]
#[openapi(
    paths(
        create_group,
        get_user_groups,
        get_group,
        set_group_active,
        get_group_restaurants,
        refresh_group_restaurants,
        join_group,
        get_group_members,
        cast_vote,
        get_results,
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "group", description = "Group creation and candidate restaurants"),
        (name = "membership", description = "Joining groups by code"),
        (name = "vote", description = "Votes, vetoes and results")
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
            );
        }
    }
}

pub async fn create_app(settings: &Arc<Settings>) -> anyhow::Result<Router> {
    let storage = Arc::new(
        Storage::new(settings.database.clone(), SchemaManager::default())
            .await
            .context("failed to open database")?,
    );

    if settings.places.api_key.is_none() {
        tracing::warn!("places API key is not configured, sample venues will be served");
    }
    let client = GeoapifyClient::new(&settings.places).context("failed to build places client")?;
    let provider: Arc<dyn PlacesProvider> = Arc::new(client);

    Ok(build_router(settings, storage, provider))
}

/// Wires services and routes over an existing storage and places provider.
pub fn build_router(
    settings: &Settings,
    storage: Arc<Storage>,
    provider: Arc<dyn PlacesProvider>,
) -> Router {
    let places_service = Arc::new(PlacesService::new(provider, settings.places.limit));
    let token_service = Arc::new(TokenService::new(settings.auth.clone()));

    let token_state = TokenState {
        token_service: token_service.clone(),
    };

    let group_state = GroupState {
        group_service: Arc::new(GroupService::new(storage.clone(), places_service)),
    };
    let membership_state = MembershipState {
        membership_service: Arc::new(MembershipService::new(storage.clone())),
    };
    let vote_state = VoteState {
        vote_service: Arc::new(VoteService::new(storage.clone(), &settings.voting)),
    };

    Router::new()
        .route("/api/openapi.json", get(|| async { Json(ApiDoc::openapi()) }))
        .merge(group_router(group_state, token_state.clone()))
        .merge(membership_router(membership_state, token_state.clone()))
        .merge(vote_router(vote_state, token_state))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}
