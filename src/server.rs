// http gateway - generate, history, and users over json

use axum::{
    Json, Router,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use uuid::Uuid;

use crate::api::{ErrorBody, GenerateRequest, GenerateResponse, UserList};
use crate::config::Config;
use crate::core::{Exchange, Generator, Store, Validation, build_client};
use crate::Error;

const DEFAULT_LIMIT: i64 = 10;

struct AppState {
    generator: Generator,
    store: Store,
}

#[derive(Deserialize)]
struct HistoryParams {
    limit: Option<i64>,
    offset: Option<i64>,
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
}

/// Error reply: a status plus `{"detail": ...}`.
struct ApiError {
    status: StatusCode,
    detail: String,
}

impl ApiError {
    fn unprocessable(detail: impl Into<String>) -> Self {
        Self {
            status: StatusCode::UNPROCESSABLE_ENTITY,
            detail: detail.into(),
        }
    }

    fn internal(context: &str, e: &Error) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            detail: format!("{context}: {e}"),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(ErrorBody { detail: self.detail })).into_response()
    }
}

pub struct Server;

impl Server {
    pub async fn run(config: Config, host: &str, port: u16) -> Result<(), Error> {
        let client = build_client(&config.llm)?;
        let generator = Generator::new(client);
        let store = Store::connect(&config.database_url).await?;

        tracing::info!(
            provider = config.llm.provider.name(),
            model = generator.model(),
            store = store.dialect_name(),
            "gateway configured"
        );

        let app = Self::router(generator, store);

        let addr = format!("{host}:{port}");
        let listener = tokio::net::TcpListener::bind(&addr)
            .await
            .map_err(|e| Error::Server(e.to_string()))?;

        tracing::info!("server running at http://{addr}");

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(|e| Error::Server(e.to_string()))?;

        Ok(())
    }

    /// All routes, wired to `generator` and `store`.
    pub fn router(generator: Generator, store: Store) -> Router {
        let state = Arc::new(AppState { generator, store });

        Router::new()
            .route("/health", get(health))
            .route("/generate", post(generate))
            .route("/history/{user_id}", get(history))
            .route("/users", get(users))
            .layer(TraceLayer::new_for_http())
            .layer(CorsLayer::permissive())
            .with_state(state)
    }
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        tracing::info!("shutting down");
    }
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

async fn generate(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<GenerateRequest>, JsonRejection>,
) -> Result<Json<GenerateResponse>, ApiError> {
    let Json(req) = payload.map_err(|e| ApiError::unprocessable(e.body_text()))?;

    let validation = Validation::required(&req.user_id, &req.query);
    if !validation.is_ok() {
        return Err(ApiError::unprocessable(validation.message()));
    }

    tracing::info!(user_id = %req.user_id, query = %req.query, "processing generate");

    let context = "Failed to generate responses";

    let pair = state
        .generator
        .generate(&req.query, &req.user_id)
        .await
        .map_err(|e| {
            tracing::error!(user_id = %req.user_id, error = %e, "generation failed");
            ApiError::internal(context, &e)
        })?;

    let id = Uuid::new_v4();

    state
        .store
        .insert(id, &req.user_id, &req.query, &pair.casual, &pair.formal)
        .await
        .map_err(|e| {
            tracing::error!(user_id = %req.user_id, error = %e, "storing exchange failed");
            ApiError::internal(context, &e)
        })?;

    tracing::info!(user_id = %req.user_id, %id, "completed generate");

    Ok(Json(GenerateResponse {
        id,
        user_id: req.user_id,
        query: req.query,
        casual_response: pair.casual,
        formal_response: pair.formal,
    }))
}

async fn history(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
    params: Result<Query<HistoryParams>, QueryRejection>,
) -> Result<Json<Vec<Exchange>>, ApiError> {
    let Query(params) = params.map_err(|e| ApiError::unprocessable(e.body_text()))?;

    let limit = params.limit.unwrap_or(DEFAULT_LIMIT);
    let offset = params.offset.unwrap_or(0);
    if limit < 0 || offset < 0 {
        return Err(ApiError::unprocessable(
            "limit and offset must be non-negative",
        ));
    }

    tracing::info!(%user_id, limit, offset, "fetching history");

    let records = state
        .store
        .list_by_user(&user_id, limit, offset)
        .await
        .map_err(|e| {
            tracing::error!(%user_id, error = %e, "fetching history failed");
            ApiError::internal("Failed to retrieve history", &e)
        })?;

    Ok(Json(records))
}

async fn users(State(state): State<Arc<AppState>>) -> Result<Json<UserList>, ApiError> {
    tracing::info!("fetching all user ids");

    let user_ids = state.store.list_user_ids().await.map_err(|e| {
        tracing::error!(error = %e, "fetching user ids failed");
        ApiError::internal("Failed to retrieve user_ids", &e)
    })?;

    Ok(Json(UserList { user_ids }))
}
