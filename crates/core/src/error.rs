//! Error types for the rental domain.

use thiserror::Error;

use crate::models::{BookingId, JetId, UserId};

/// Rejected front-end input.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    /// Required text was blank.
    #[error("input cannot be empty")]
    Empty,
    /// Username shorter than four characters.
    #[error("username must be at least 4 characters long")]
    UsernameTooShort,
    /// Email without a `local@domain.tld` shape.
    #[error("email must contain '@' and a domain (e.g. @something.com)")]
    Email,
    /// Phone number without exactly eleven digits.
    #[error("phone number must be exactly 11 digits long, got {0}")]
    Phone(usize),
    /// Location text containing digits.
    #[error("location cannot contain numbers")]
    Location,
    /// Seat count outside 1..=20.
    #[error("seat capacity must be between 1 and 20")]
    SeatCapacity,
    /// Hourly rate outside the accepted band.
    #[error("hourly rate must be between $1,000 and $20,000")]
    HourlyRate,
    /// Flight duration of zero hours.
    #[error("flight duration must be greater than 0")]
    Duration,
    /// Text that is not a whole number.
    #[error("'{0}' is not a whole number")]
    Integer(String),
    /// Text that is not a number.
    #[error("'{0}' is not a valid amount")]
    Amount(String),
    /// Flight date not in `YYYY-MM-DD` form.
    #[error("'{0}' is not a date in YYYY-MM-DD form")]
    Date(String),
    /// Unrecognised jet type label.
    #[error("unknown jet type '{0}'")]
    UnknownJetType(String),
    /// Unrecognised trip type label.
    #[error("unknown trip type '{0}'")]
    UnknownTripType(String),
}

/// Registration failures.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RegistrationError {
    /// A field failed validation.
    #[error(transparent)]
    Invalid(#[from] ValidationError),
    /// The username belongs to someone else.
    #[error("username '{0}' is already taken")]
    UsernameTaken(String),
    /// The email belongs to someone else.
    #[error("email '{0}' is already registered")]
    EmailTaken(String),
}

/// Catalog lookup failures.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CatalogError {
    /// No jet carries the key.
    #[error("jet {0} not found")]
    NotFound(JetId),
}

/// Booking ledger failures. None of them leave partial state behind.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LedgerError {
    /// The jet is already booked.
    #[error("jet {0} is not available for booking")]
    JetUnavailable(JetId),
    /// The jet key does not resolve in the catalog.
    #[error("jet {0} not found")]
    UnknownJet(JetId),
    /// The user key does not resolve in the directory.
    #[error("user {0} not found")]
    UnknownUser(UserId),
    /// Zero-hour flight.
    #[error("flight duration must be greater than 0")]
    InvalidDuration,
    /// The booking is not in the ledger.
    #[error("booking {0} not found")]
    NotFound(BookingId),
    /// Catalog, directory and ledger disagree about a booking.
    #[error("booking {booking} is inconsistent: {reason}")]
    Inconsistent {
        /// Booking whose references do not line up.
        booking: BookingId,
        /// What did not line up.
        reason: &'static str,
    },
}

/// Failures surfaced by the rental desk.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DeskError {
    /// Ledger rejected the operation.
    #[error(transparent)]
    Ledger(#[from] LedgerError),
    /// Catalog rejected the operation.
    #[error(transparent)]
    Catalog(#[from] CatalogError),
    /// Input failed validation.
    #[error(transparent)]
    Invalid(#[from] ValidationError),
    /// The tendered budget does not cover the quote.
    #[error("insufficient funds: cost is {cost:.2}, budget is {tendered:.2}")]
    InsufficientFunds {
        /// Quoted price.
        cost: f64,
        /// Budget offered.
        tendered: f64,
    },
    /// Active bookings still reference the jet.
    #[error("jet {jet} still has {bookings} active booking(s)")]
    JetInUse {
        /// Jet that cannot be removed.
        jet: JetId,
        /// Bookings referencing it.
        bookings: usize,
    },
    /// Active bookings still reference the user.
    #[error("user {user} still has {bookings} active booking(s)")]
    UserInUse {
        /// User that cannot be removed.
        user: UserId,
        /// Bookings referencing them.
        bookings: usize,
    },
    /// No user carries the key.
    #[error("user {0} not found")]
    UnknownUser(UserId),
}
