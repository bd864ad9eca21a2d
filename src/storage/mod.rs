pub mod memory;
pub mod sqlite;

use async_trait::async_trait;

use crate::models::{Booking, BookingRequest, BookingStatus};

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

/// Persistence collaborator for booking records. One implementation is
/// chosen at process start; request handling never branches on which.
#[async_trait]
pub trait BookingStore: Send + Sync {
    /// Persists a validated request, assigning the id, pending status and
    /// creation timestamp. Returns the stored record.
    async fn create(&self, request: BookingRequest) -> anyhow::Result<Booking>;

    /// All bookings, newest first.
    async fn list(&self) -> anyhow::Result<Vec<Booking>>;

    /// Returns whether a record was updated. An absent id is not an error.
    async fn update_status(&self, id: &str, status: BookingStatus) -> anyhow::Result<bool>;

    /// Returns whether a record was removed. An absent id is not an error.
    async fn delete(&self, id: &str) -> anyhow::Result<bool>;
}
