use crate::models::BookingRequest;

/// The form only needs to know "failed, retry available": any transport
/// error or non-success status collapses into this.
#[derive(Debug, thiserror::Error)]
#[error("booking submission failed")]
pub struct SubmissionError;

pub struct BookingApi {
    base_url: String,
    client: reqwest::Client,
}

impl BookingApi {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            client: reqwest::Client::new(),
        }
    }

    /// Posts the whole submission as a single request. No retries here;
    /// retrying is a user decision.
    pub async fn submit(&self, request: &BookingRequest) -> Result<(), SubmissionError> {
        let url = format!("{}/api/bookings", self.base_url);
        let response = self
            .client
            .post(&url)
            .json(request)
            .send()
            .await
            .map_err(|_| SubmissionError)?;

        if response.status().is_success() {
            Ok(())
        } else {
            Err(SubmissionError)
        }
    }
}
