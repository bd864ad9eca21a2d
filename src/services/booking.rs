use crate::errors::AppError;
use crate::models::{Booking, BookingPayload};
use crate::services::notify;
use crate::state::AppState;

/// Validates a submission, persists it and dispatches both notification
/// emails. The owner notification is the business-critical side: if it
/// fails the whole request fails, even though the booking is already
/// persisted (a retry then creates a duplicate). The customer confirmation
/// is best effort and never fails the request.
pub async fn create_booking(state: &AppState, payload: BookingPayload) -> Result<Booking, AppError> {
    let request = payload.validate().map_err(AppError::Validation)?;

    let booking = state
        .store
        .create(request)
        .await
        .map_err(AppError::Storage)?;

    tracing::info!(id = %booking.id, name = %booking.name, "booking created");

    let owner_email = notify::owner_notification(&booking);
    state
        .mailer
        .send(
            &state.config.owner_email,
            &owner_email.subject,
            &owner_email.body,
        )
        .await
        .map_err(AppError::Notification)?;

    match &booking.email {
        Some(customer) => {
            let confirmation = notify::customer_confirmation(&booking);
            if let Err(e) = state
                .mailer
                .send(customer, &confirmation.subject, &confirmation.body)
                .await
            {
                tracing::warn!(error = %e, to = %customer, "failed to send customer confirmation");
            }
        }
        None => {
            tracing::debug!(id = %booking.id, "no customer email on booking, skipping confirmation");
        }
    }

    Ok(booking)
}
