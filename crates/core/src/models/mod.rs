//! Shared domain models.

mod booking;
mod jet;
mod user;

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub(crate) use booking::trip_cost;
pub use booking::{Booking, TripType};
pub use jet::{Jet, JetType, JetUpdate};
pub use user::User;

macro_rules! entity_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            /// Generate a fresh random identifier.
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                // Short form is enough to tell records apart on screen.
                let text = self.0.simple().to_string();
                f.write_str(&text[..8])
            }
        }
    };
}

entity_id!(
    /// Stable key of a jet in the catalog.
    JetId
);
entity_id!(
    /// Stable key of a registered user.
    UserId
);
entity_id!(
    /// Stable key of an active booking.
    BookingId
);

/// Format a dollar amount with thousands separators and two decimals.
pub fn format_currency(amount: f64) -> String {
    let negative = amount < 0.0;
    let cents = (amount.abs() * 100.0).round() as u64;
    let whole = (cents / 100).to_string();
    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (idx, ch) in whole.chars().enumerate() {
        if idx > 0 && (whole.len() - idx) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    let sign = if negative { "-" } else { "" };
    format!("{sign}${grouped}.{:02}", cents % 100)
}
