use std::sync::Arc;

use axum::extract::State;
use axum::Json;

use crate::errors::AppError;
use crate::models::{Booking, BookingPayload};
use crate::services;
use crate::state::AppState;

// POST /api/bookings
pub async fn create_booking(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<BookingPayload>,
) -> Result<Json<Booking>, AppError> {
    let booking = services::booking::create_booking(&state, payload).await?;
    Ok(Json(booking))
}
