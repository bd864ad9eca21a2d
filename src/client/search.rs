use crate::models::Booking;

/// Case-insensitive substring filter over name and address, applied to an
/// already-fetched list. Display-layer concern only; the server never sees
/// the query.
pub fn filter_bookings<'a>(bookings: &'a [Booking], query: &str) -> Vec<&'a Booking> {
    let needle = query.to_lowercase();
    bookings
        .iter()
        .filter(|b| {
            b.name.to_lowercase().contains(&needle) || b.address.to_lowercase().contains(&needle)
        })
        .collect()
}
