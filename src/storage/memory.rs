use std::sync::Mutex;

use async_trait::async_trait;

use crate::models::{Booking, BookingRequest, BookingStatus};

use super::BookingStore;

/// Transient fallback store for when no database is configured or the
/// configured one cannot be opened. Entries vanish on restart; the startup
/// log makes that visible to operators. The mutex serializes appends, so
/// concurrent submissions cannot interleave.
pub struct MemoryStore {
    bookings: Mutex<Vec<Booking>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            bookings: Mutex::new(Vec::new()),
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BookingStore for MemoryStore {
    async fn create(&self, request: BookingRequest) -> anyhow::Result<Booking> {
        let booking = Booking::from_request(request);
        self.bookings.lock().unwrap().insert(0, booking.clone());
        Ok(booking)
    }

    async fn list(&self) -> anyhow::Result<Vec<Booking>> {
        let mut bookings = self.bookings.lock().unwrap().clone();
        // Entries are kept newest-first already; the stable sort keeps that
        // order for records created within the same instant.
        bookings.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(bookings)
    }

    async fn update_status(&self, id: &str, status: BookingStatus) -> anyhow::Result<bool> {
        let mut bookings = self.bookings.lock().unwrap();
        match bookings.iter_mut().find(|b| b.id == id) {
            Some(booking) => {
                booking.status = status;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete(&self, id: &str) -> anyhow::Result<bool> {
        let mut bookings = self.bookings.lock().unwrap();
        let before = bookings.len();
        bookings.retain(|b| b.id != id);
        Ok(bookings.len() < before)
    }
}
