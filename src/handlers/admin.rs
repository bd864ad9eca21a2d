use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::HeaderMap;
use axum::Json;
use serde::Deserialize;

use crate::errors::AppError;
use crate::models::{Booking, BookingStatus};
use crate::state::AppState;

/// Shared-secret gate for the admin surface. The token travels in the
/// `admin-token` header; the comparison must not short-circuit on the
/// first differing byte.
fn check_auth(headers: &HeaderMap, expected_token: &str) -> Result<(), AppError> {
    let token = headers
        .get("admin-token")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");

    if !constant_time_eq(token.as_bytes(), expected_token.as_bytes()) {
        return Err(AppError::Unauthorized);
    }
    Ok(())
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut diff = 0u8;
    for (x, y) in a.iter().zip(b) {
        diff |= x ^ y;
    }
    diff == 0
}

// GET /api/bookings
pub async fn list_bookings(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<Vec<Booking>>, AppError> {
    check_auth(&headers, &state.config.admin_token)?;

    let bookings = state.store.list().await.map_err(AppError::Storage)?;
    Ok(Json(bookings))
}

// PATCH /api/bookings/:id
#[derive(Deserialize)]
pub struct UpdateStatusRequest {
    pub status: BookingStatus,
}

pub async fn update_booking(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(body): Json<UpdateStatusRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    check_auth(&headers, &state.config.admin_token)?;

    let updated = state
        .store
        .update_status(&id, body.status)
        .await
        .map_err(AppError::Storage)?;

    // An absent id is a no-op success, not a 404.
    if !updated {
        tracing::debug!(%id, "status update for unknown booking id");
    }
    Ok(Json(serde_json::json!({ "ok": true })))
}

// DELETE /api/bookings/:id
pub async fn delete_booking(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, AppError> {
    check_auth(&headers, &state.config.admin_token)?;

    let removed = state.store.delete(&id).await.map_err(AppError::Storage)?;
    if !removed {
        tracing::debug!(%id, "delete for unknown booking id");
    }
    Ok(Json(serde_json::json!({ "ok": true })))
}
