// src/api.rs
use crate::contract::Record;
use crate::error::StakeError;
use crate::stake::StakeClient;
use crate::utils::normalize_address;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use axum::{Router, routing::get};
use ethers::providers::Middleware;
use serde::Serialize;
use serde_json::json;
use std::sync::Arc;
use tracing::error;

pub fn router<M>(client: Arc<StakeClient<M>>) -> Router
where
    M: Middleware + 'static,
{
    Router::new()
        .route("/pools/{pid}", get(pool::<M>))
        .route("/users/{address}/{pid}", get(user::<M>))
        .route("/rewards/{pid}/{address}", get(reward::<M>))
        .with_state(client)
}

#[derive(Serialize)]
struct RewardResponse {
    pid: u64,
    user: String,
    reward: String,
}

struct ApiError(StakeError);

impl ApiError {
    fn status_code(&self) -> StatusCode {
        match self.0 {
            StakeError::InvalidAddress(_) => StatusCode::BAD_REQUEST,
            StakeError::CallReverted(_) => StatusCode::UNPROCESSABLE_ENTITY,
            StakeError::Decode(_) => StatusCode::BAD_GATEWAY,
            StakeError::Transport(_) => StatusCode::SERVICE_UNAVAILABLE,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_code(&self) -> &'static str {
        match self.0 {
            StakeError::Transport(_) => "TRANSPORT_ERROR",
            StakeError::Decode(_) => "DECODE_ERROR",
            StakeError::InvalidAddress(_) => "INVALID_ADDRESS",
            StakeError::Signing(_) => "SIGNING_ERROR",
            StakeError::RejectedTransaction { .. } => "REJECTED_TRANSACTION",
            StakeError::CallReverted(_) => "CALL_REVERTED",
            StakeError::Artifact(_) => "ARTIFACT_ERROR",
            StakeError::Config(_) => "CONFIG_ERROR",
        }
    }
}

impl From<StakeError> for ApiError {
    fn from(err: StakeError) -> Self {
        ApiError(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            error!(error = %self.0, "Request failed");
        }
        let body = json!({ "error": self.0.to_string(), "code": self.error_code() });
        (status, Json(body)).into_response()
    }
}

async fn pool<M: Middleware + 'static>(
    State(client): State<Arc<StakeClient<M>>>,
    Path(pid): Path<u64>,
) -> Result<Json<Record>, ApiError> {
    Ok(Json(client.read_pool(pid).await?))
}

async fn user<M: Middleware + 'static>(
    State(client): State<Arc<StakeClient<M>>>,
    Path((address, pid)): Path<(String, u64)>,
) -> Result<Json<Record>, ApiError> {
    Ok(Json(client.read_user(&address, pid).await?))
}

async fn reward<M: Middleware + 'static>(
    State(client): State<Arc<StakeClient<M>>>,
    Path((pid, address)): Path<(u64, String)>,
) -> Result<Json<RewardResponse>, ApiError> {
    let reward = client.calculate_reward(pid, &address).await?;
    Ok(Json(RewardResponse {
        pid,
        user: normalize_address(&address)?,
        reward: reward.to_string(),
    }))
}
