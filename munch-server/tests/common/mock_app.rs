use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use serde_json::Value;
use tower::ServiceExt;

use munch_server::app::build_router;
use munch_server::configs::{Auth, Database, Logger, Places, Server, Settings, Storage, Voting};
use munch_server::services::{PlacesProvider, TokenService};
use munch_server::tests::{StaticPlaces, setup_test_db};

pub struct MockApp {
    pub storage: Arc<Storage>,
    pub router: Router,
    pub token_service: Arc<TokenService>,
}

pub fn test_settings(places: Places, voting: Voting) -> Settings {
    Settings {
        server: Server {
            host: String::from("127.0.0.1"),
            port: 0,
        },
        logger: Logger {
            level: String::from("debug"),
        },
        database: Database {
            migration_path: None,
            clean_start: true,
            url: String::from("sqlite::memory:"),
        },
        auth: Auth {
            secret: String::from("test"),
            expiration: 1000,
        },
        places,
        voting,
    }
}

pub fn test_places() -> Places {
    Places {
        base_url: String::from("http://127.0.0.1:9"),
        api_key: None,
        limit: 20,
        timeout_secs: 2,
    }
}

impl MockApp {
    /// App whose provider knows 25 venues, more than the search limit.
    pub async fn new() -> Self {
        Self::with_provider(Arc::new(StaticPlaces::numbered(25)), Voting::default()).await
    }

    pub async fn with_provider(provider: Arc<dyn PlacesProvider>, voting: Voting) -> Self {
        Self::with_settings(provider, test_settings(test_places(), voting)).await
    }

    pub async fn with_settings(provider: Arc<dyn PlacesProvider>, settings: Settings) -> Self {
        let storage = setup_test_db().await;
        let token_service = Arc::new(TokenService::new(settings.auth.clone()));
        let router = build_router(&settings, storage.clone(), provider);

        Self {
            storage,
            router,
            token_service,
        }
    }

    pub fn token(&self, user_id: &str) -> String {
        self.token_service.generate_token(user_id).unwrap().token
    }

    /// Sends a JSON request as `user_id` and returns the status with the decoded body.
    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        user_id: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut request = Request::builder().uri(uri).method(method);

        if let Some(user_id) = user_id {
            request = request.header("Authorization", format!("Bearer {}", self.token(user_id)));
        }

        let request = match body {
            Some(body) => request
                .header("Content-Type", "application/json")
                .body(Body::from(serde_json::to_string(&body).unwrap()))
                .unwrap(),
            None => request.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };

        (status, body)
    }
}
