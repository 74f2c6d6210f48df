use axum::extract::rejection::JsonRejection;
use axum::extract::{Request, State};
use axum::http::HeaderValue;
use axum::middleware::{self, Next};
use axum::response::Response;
use axum::routing::post;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use uuid::Uuid;

use moonwallet_advisor::ChatCompletions;
use moonwallet_core::{sort_newest_first, HandlerError, Transaction};
use moonwallet_import::ImportReport;
use moonwallet_plaid::PlaidApi;
use moonwallet_storage::DbPool;

use crate::auth::AuthenticatedUser;
use crate::error::ApiError;

/// Shared per-process state. The provider clients are stateless handles,
/// built once in `main` and injected here.
#[derive(Clone)]
pub struct AppState {
    pub db: DbPool,
    pub plaid: Arc<dyn PlaidApi>,
    pub chat: Arc<dyn ChatCompletions>,
    pub jwt_secret: String,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/initiate_plaid_link", post(initiate_plaid_link))
        .route("/store_plaid_data", post(store_plaid_data))
        .route("/get_transactions", post(get_transactions))
        .route("/get_ai_assistance", post(get_ai_assistance))
        .layer(middleware::from_fn(request_id))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Echo the caller's request id, or mint one, on every response.
async fn request_id(request: Request, next: Next) -> Response {
    let id = request
        .headers()
        .get("x-request-id")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
        .unwrap_or_else(|| Uuid::new_v4().to_string());

    let mut response = next.run(request).await;
    if let Ok(value) = HeaderValue::from_str(&id) {
        response.headers_mut().insert("x-request-id", value);
    }
    response
}

// ── Wire types ────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct LinkResponse {
    link_token: String,
}

#[derive(Debug, Default, Deserialize)]
struct StoreDataRequest {
    #[serde(default)]
    public_token: Option<String>,
}

#[derive(Debug, Serialize)]
struct StoreDataResponse {
    success: bool,
    #[serde(flatten)]
    report: ImportReport,
}

#[derive(Debug, Serialize)]
struct TransactionsResponse {
    transactions: Vec<Transaction>,
}

#[derive(Debug, Default, Deserialize)]
struct AssistanceRequest {
    #[serde(default)]
    message: Option<String>,
}

#[derive(Debug, Serialize)]
struct AssistanceResponse {
    response: String,
}

// ── Handlers ──────────────────────────────────────────────────────────────────

/// Create a link token for the caller and persist it on their profile.
async fn initiate_plaid_link(
    State(state): State<AppState>,
    AuthenticatedUser(user_id): AuthenticatedUser,
) -> Result<Json<LinkResponse>, ApiError> {
    let link_token = state
        .plaid
        .create_link_token(&user_id)
        .await
        .map_err(HandlerError::from)?;

    moonwallet_storage::store_link_token(&state.db, &user_id, &link_token)
        .await
        .map_err(|e| HandlerError::Store(e.to_string()))?;

    tracing::info!(user = %user_id, "link token created");
    Ok(Json(LinkResponse { link_token }))
}

/// Exchange the public token and import the caller's accounts, balances and
/// transactions. `success` is true only if every sub-step landed.
async fn store_plaid_data(
    State(state): State<AppState>,
    AuthenticatedUser(user_id): AuthenticatedUser,
    body: Result<Json<StoreDataRequest>, JsonRejection>,
) -> Result<Json<StoreDataResponse>, ApiError> {
    let public_token = body
        .map(|Json(b)| b.public_token)
        .ok()
        .flatten()
        .unwrap_or_default();

    let report =
        moonwallet_import::import_user_data(&state.db, state.plaid.as_ref(), &user_id, &public_token)
            .await?;

    Ok(Json(StoreDataResponse {
        success: report.is_complete(),
        report,
    }))
}

/// All persisted transactions for the caller, newest first.
async fn get_transactions(
    State(state): State<AppState>,
    AuthenticatedUser(user_id): AuthenticatedUser,
) -> Result<Json<TransactionsResponse>, ApiError> {
    let mut transactions = moonwallet_storage::get_transactions(&state.db, &user_id)
        .await
        .map_err(|e| HandlerError::Store(e.to_string()))?;

    sort_newest_first(&mut transactions);
    Ok(Json(TransactionsResponse { transactions }))
}

/// Generate financial advice grounded in the caller's persisted data.
async fn get_ai_assistance(
    State(state): State<AppState>,
    AuthenticatedUser(user_id): AuthenticatedUser,
    body: Result<Json<AssistanceRequest>, JsonRejection>,
) -> Result<Json<AssistanceResponse>, ApiError> {
    let message = body
        .map(|Json(b)| b.message)
        .ok()
        .flatten()
        .unwrap_or_default();

    let response =
        moonwallet_advisor::advise(&state.db, state.chat.as_ref(), &user_id, &message).await?;
    Ok(Json(AssistanceResponse { response }))
}

// ── Tests ─────────────────────────────────────────────────────────────────────
