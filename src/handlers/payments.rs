use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::HeaderMap;
use axum::Json;
use serde::Deserialize;

use super::{actor_id, check_auth};
use crate::errors::AppError;
use crate::models::{Payment, PaymentMethod};
use crate::state::AppState;

// GET /api/payments/:id
pub async fn get_payment(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<i64>,
) -> Result<Json<Payment>, AppError> {
    check_auth(&headers, &state.config.admin_token)?;

    Ok(Json(state.payments.get(id).await?))
}

// PUT /api/payments/:id/finalize
#[derive(Deserialize)]
pub struct FinalizePayment {
    pub method: PaymentMethod,
}

pub async fn finalize_payment(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<i64>,
    Json(body): Json<FinalizePayment>,
) -> Result<Json<Payment>, AppError> {
    check_auth(&headers, &state.config.admin_token)?;

    let payment = state
        .payments
        .finalize(id, body.method, actor_id(&headers))
        .await?;
    Ok(Json(payment))
}
