//! HTTP request handlers.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};

use billpay_types::{AppError, BillPaymentRepository, BillPaymentRequest};

use crate::BillPaymentService;

/// Application state shared across handlers.
pub struct AppState<R: BillPaymentRepository> {
    pub service: BillPaymentService<R>,
}

/// Wrapper to implement IntoResponse for AppError (orphan rule workaround).
pub struct ApiError(pub AppError);

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        ApiError(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self.0 {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            AppError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg.clone()),
        };

        let body = serde_json::json!({
            "error": message,
            "code": status.as_u16()
        });

        (status, Json(body)).into_response()
    }
}

/// Health check endpoint.
pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "healthy" }))
}

/// Get the current balance of an account.
#[tracing::instrument(skip(state), fields(account_id = %id))]
pub async fn get_balance<R: BillPaymentRepository>(
    State(state): State<Arc<AppState<R>>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let balance = state.service.get_balance(&id).await?;
    Ok(Json(balance))
}

/// Pay off the full balance of an account.
#[tracing::instrument(skip(state), fields(account_id = %req.account_id))]
pub async fn process_payment<R: BillPaymentRepository>(
    State(state): State<Arc<AppState<R>>>,
    Json(req): Json<BillPaymentRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let response = state
        .service
        .process_payment(&req.account_id, req.confirm_payment)
        .await?;
    Ok(Json(response))
}
