pub mod booking;

pub use booking::{
    Booking, BookingPayload, BookingRequest, BookingStatus, Frequency, Language, TimeOfDay,
};
