pub mod resend;

use async_trait::async_trait;

/// Outbound email dispatch. Delivery is fire-and-check: success means the
/// provider accepted the message, nothing more.
#[async_trait]
pub trait EmailProvider: Send + Sync {
    async fn send(&self, to: &str, subject: &str, body: &str) -> anyhow::Result<()>;
}
