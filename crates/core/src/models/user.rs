use serde::{Deserialize, Serialize};

use super::{BookingId, UserId};

/// A registered customer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    id: UserId,
    /// Login name, unique within the directory.
    pub username: String,
    /// Contact email, unique within the directory.
    pub email: String,
    /// Digit-only phone number.
    pub phone_number: String,
    #[serde(default)]
    past_trips: Vec<String>,
    #[serde(default)]
    bookings: Vec<BookingId>,
}

impl User {
    /// Build a user without any trips or bookings.
    pub fn new(
        username: impl Into<String>,
        email: impl Into<String>,
        phone_number: impl Into<String>,
    ) -> Self {
        Self {
            id: UserId::new(),
            username: username.into(),
            email: email.into(),
            phone_number: phone_number.into(),
            past_trips: Vec::new(),
            bookings: Vec::new(),
        }
    }

    /// Stable key of this user.
    pub fn id(&self) -> UserId {
        self.id
    }

    /// Free-text records of completed trips.
    pub fn past_trips(&self) -> &[String] {
        &self.past_trips
    }

    /// Record a completed trip.
    pub fn add_past_trip(&mut self, trip: impl Into<String>) {
        self.past_trips.push(trip.into());
    }

    /// Bookings currently held, in creation order.
    pub fn bookings(&self) -> &[BookingId] {
        &self.bookings
    }

    /// Whether the user holds the given booking.
    pub fn holds(&self, booking: BookingId) -> bool {
        self.bookings.contains(&booking)
    }

    pub(crate) fn push_booking(&mut self, booking: BookingId) {
        self.bookings.push(booking);
    }

    pub(crate) fn drop_booking(&mut self, booking: BookingId) -> bool {
        match self.bookings.iter().position(|id| *id == booking) {
            Some(pos) => {
                self.bookings.remove(pos);
                true
            }
            None => false,
        }
    }
}
