use std::{fmt, str::FromStr};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{BookingId, JetId, UserId};
use crate::error::ValidationError;

/// Whether the jet flies back to the origin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TripType {
    /// Single leg.
    OneWay,
    /// Outbound and return legs.
    RoundTrip,
}

impl TripType {
    /// Cost multiplier applied to the flight hours.
    pub fn multiplier(self) -> f64 {
        match self {
            TripType::OneWay => 1.0,
            TripType::RoundTrip => 2.0,
        }
    }

    /// User-facing label.
    pub fn label(self) -> &'static str {
        match self {
            TripType::OneWay => "One-way",
            TripType::RoundTrip => "Round-trip",
        }
    }
}

impl fmt::Display for TripType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for TripType {
    type Err = ValidationError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        match input.trim().to_ascii_lowercase().as_str() {
            "one-way" | "oneway" | "one way" => Ok(TripType::OneWay),
            "round-trip" | "roundtrip" | "round trip" => Ok(TripType::RoundTrip),
            other => Err(ValidationError::UnknownTripType(other.to_string())),
        }
    }
}

/// Price of `hours` of flight at `hourly_rate` for the given trip type.
pub(crate) fn trip_cost(hourly_rate: f64, hours: u32, trip_type: TripType) -> f64 {
    hourly_rate * f64::from(hours) * trip_type.multiplier()
}

/// An active reservation of one jet by one user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Booking {
    id: BookingId,
    user: UserId,
    jet: JetId,
    /// Departure airport or city.
    pub departure: String,
    /// Arrival airport or city.
    pub destination: String,
    /// One-way or round-trip.
    pub trip_type: TripType,
    /// Day the booking was made.
    pub booking_date: NaiveDate,
    /// Day of the flight.
    pub flight_date: NaiveDate,
    duration_hours: u32,
    hourly_rate: f64,
    tendered: Option<f64>,
}

impl Booking {
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new(
        user: UserId,
        jet: JetId,
        hourly_rate: f64,
        departure: String,
        destination: String,
        trip_type: TripType,
        booking_date: NaiveDate,
        flight_date: NaiveDate,
        duration_hours: u32,
    ) -> Self {
        Self {
            id: BookingId::new(),
            user,
            jet,
            departure,
            destination,
            trip_type,
            booking_date,
            flight_date,
            duration_hours,
            hourly_rate,
            tendered: None,
        }
    }

    /// Stable key of this booking.
    pub fn id(&self) -> BookingId {
        self.id
    }

    /// The customer holding the booking.
    pub fn user(&self) -> UserId {
        self.user
    }

    /// The reserved jet.
    pub fn jet(&self) -> JetId {
        self.jet
    }

    /// Flight hours per leg.
    pub fn duration_hours(&self) -> u32 {
        self.duration_hours
    }

    /// Jet rate captured when the booking was made.
    pub fn hourly_rate(&self) -> f64 {
        self.hourly_rate
    }

    /// Total price, derived from rate, duration and trip type.
    pub fn total_cost(&self) -> f64 {
        trip_cost(self.hourly_rate, self.duration_hours, self.trip_type)
    }

    /// Change handed back when the customer paid with a budget above the cost.
    pub fn change_due(&self) -> Option<f64> {
        self.tendered.map(|tendered| tendered - self.total_cost())
    }

    pub(crate) fn record_tendered(&mut self, tendered: f64) {
        self.tendered = Some(tendered);
    }

    /// Reschedule to a new duration. Zero hours is rejected.
    pub(crate) fn set_duration(&mut self, hours: u32) -> Result<(), ValidationError> {
        if hours == 0 {
            return Err(ValidationError::Duration);
        }
        self.duration_hours = hours;
        Ok(())
    }

    /// One-line route summary, e.g. `JFK → LAX`.
    pub fn route(&self) -> String {
        format!("{} → {}", self.departure, self.destination)
    }
}
