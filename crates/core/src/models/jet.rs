use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use super::{format_currency, JetId};
use crate::error::ValidationError;

/// Size class of a jet, in descending range order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum JetType {
    /// Intercontinental cabins.
    UltraLongRange,
    /// Large cabin jets.
    LargeJet,
    /// Super mid-size cabins.
    SuperMidSize,
    /// Mid-size cabins.
    MidSize,
    /// Light jets.
    LightJet,
}

impl JetType {
    /// All jet types in menu order.
    pub const ALL: [JetType; 5] = [
        JetType::UltraLongRange,
        JetType::LargeJet,
        JetType::SuperMidSize,
        JetType::MidSize,
        JetType::LightJet,
    ];

    /// User-facing label.
    pub fn label(self) -> &'static str {
        match self {
            JetType::UltraLongRange => "Ultra Long Range",
            JetType::LargeJet => "Large Jet",
            JetType::SuperMidSize => "Super Mid-Size",
            JetType::MidSize => "Mid-Size",
            JetType::LightJet => "Light Jet",
        }
    }

    /// Next type in menu order, wrapping around.
    pub fn next(self) -> Self {
        let idx = Self::ALL.iter().position(|ty| *ty == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }
}

impl fmt::Display for JetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for JetType {
    type Err = ValidationError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let needle = input.trim();
        Self::ALL
            .into_iter()
            .find(|ty| ty.label().eq_ignore_ascii_case(needle))
            .ok_or_else(|| ValidationError::UnknownJetType(needle.to_string()))
    }
}

/// A rentable aircraft.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Jet {
    id: JetId,
    /// Manufacturer and model, e.g. `Gulfstream G650`.
    pub model: String,
    /// Size class.
    pub jet_type: JetType,
    /// Passenger seats.
    pub seat_capacity: u32,
    /// Rental price in dollars per flight hour.
    pub hourly_rate: f64,
    available: bool,
}

impl Jet {
    /// Build an available jet with a fresh identifier.
    pub fn new(
        model: impl Into<String>,
        jet_type: JetType,
        seat_capacity: u32,
        hourly_rate: f64,
    ) -> Self {
        Self {
            id: JetId::new(),
            model: model.into(),
            jet_type,
            seat_capacity,
            hourly_rate,
            available: true,
        }
    }

    /// Stable key of this jet.
    pub fn id(&self) -> JetId {
        self.id
    }

    /// Whether the jet can currently be booked.
    pub fn is_available(&self) -> bool {
        self.available
    }

    pub(crate) fn set_available(&mut self, available: bool) {
        self.available = available;
    }

    /// Apply an admin edit; unset fields keep their value.
    pub fn apply(&mut self, update: JetUpdate) {
        if let Some(model) = update.model {
            self.model = model;
        }
        if let Some(jet_type) = update.jet_type {
            self.jet_type = jet_type;
        }
        if let Some(capacity) = update.seat_capacity {
            self.seat_capacity = capacity;
        }
        if let Some(rate) = update.hourly_rate {
            self.hourly_rate = rate;
        }
    }
}

impl fmt::Display for Jet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} · {} · {} seats · {}/hr · {}",
            self.model,
            self.jet_type,
            self.seat_capacity,
            format_currency(self.hourly_rate),
            if self.available { "available" } else { "booked" }
        )
    }
}

/// Admin edit of a jet's descriptive fields.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct JetUpdate {
    /// Replacement model name.
    pub model: Option<String>,
    /// Replacement size class.
    pub jet_type: Option<JetType>,
    /// Replacement seat count.
    pub seat_capacity: Option<u32>,
    /// Replacement hourly rate.
    pub hourly_rate: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_type_labels_case_insensitively() {
        assert_eq!("light jet".parse::<JetType>().ok(), Some(JetType::LightJet));
        assert_eq!(
            " Super Mid-Size ".parse::<JetType>().ok(),
            Some(JetType::SuperMidSize)
        );
        assert!("Airship".parse::<JetType>().is_err());
    }

    #[test]
    fn type_cycle_wraps() {
        assert_eq!(JetType::LightJet.next(), JetType::UltraLongRange);
        assert_eq!(JetType::UltraLongRange.next(), JetType::LargeJet);
    }

    #[test]
    fn update_keeps_unset_fields() {
        let mut jet = Jet::new("Cessna Citation X", JetType::SuperMidSize, 8, 5_500.0);
        jet.apply(JetUpdate {
            hourly_rate: Some(6_000.0),
            ..JetUpdate::default()
        });
        assert_eq!(jet.model, "Cessna Citation X");
        assert_eq!(jet.seat_capacity, 8);
        assert_eq!(jet.hourly_rate, 6_000.0);
        assert!(jet.is_available());
    }
}
