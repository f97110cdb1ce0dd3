//! Stateless filters composed over the catalog.

use std::str::FromStr;

use tracing::debug;

use crate::{
    catalog::{JetCatalog, JetQuery},
    error::ValidationError,
    models::{Jet, JetType},
};

/// Inclusive hourly-rate band. A reversed range is silently swapped.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BudgetRange {
    min: f64,
    max: f64,
    swapped: bool,
}

impl BudgetRange {
    /// Build a range from two bounds in either order.
    pub fn new(min: f64, max: f64) -> Self {
        if min > max {
            Self {
                min: max,
                max: min,
                swapped: true,
            }
        } else {
            Self {
                min,
                max,
                swapped: false,
            }
        }
    }

    /// Lower bound.
    pub fn min(&self) -> f64 {
        self.min
    }

    /// Upper bound.
    pub fn max(&self) -> f64 {
        self.max
    }

    /// Whether the bounds were given in reverse order.
    pub fn was_swapped(&self) -> bool {
        self.swapped
    }

    /// Whether `rate` lies within the band.
    pub fn contains(&self, rate: f64) -> bool {
        rate >= self.min && rate <= self.max
    }
}

/// Jets of the given size class.
pub fn by_type(catalog: &JetCatalog, jet_type: JetType) -> Vec<&Jet> {
    catalog.find_jets(&JetQuery::any().of_type(jet_type))
}

/// Jets whose type label matches case-insensitively; blank text matches all.
pub fn by_type_name<'a>(
    catalog: &'a JetCatalog,
    name: &str,
) -> Result<Vec<&'a Jet>, ValidationError> {
    if name.trim().is_empty() {
        return Ok(catalog.find_jets(&JetQuery::any()));
    }
    let jet_type = JetType::from_str(name)?;
    Ok(by_type(catalog, jet_type))
}

/// Jets seating at least `min_capacity` passengers.
pub fn by_capacity(catalog: &JetCatalog, min_capacity: u32) -> Vec<&Jet> {
    catalog.find_jets(&JetQuery::any().min_capacity(min_capacity))
}

/// Jets that can be booked right now.
pub fn available(catalog: &JetCatalog) -> Vec<&Jet> {
    catalog.find_jets(&JetQuery::any().available())
}

/// Jets whose hourly rate falls within `range`.
pub fn by_budget(catalog: &JetCatalog, range: BudgetRange) -> Vec<&Jet> {
    if range.was_swapped() {
        debug!(min = range.min, max = range.max, "Budget range normalised");
    }
    catalog
        .find_jets(&JetQuery::any())
        .into_iter()
        .filter(|jet| range.contains(jet.hourly_rate))
        .collect()
}

/// Jets matching `query` whose rate also falls within `range`, if one is given.
pub fn search<'a>(
    catalog: &'a JetCatalog,
    query: &JetQuery,
    range: Option<BudgetRange>,
) -> Vec<&'a Jet> {
    catalog
        .find_jets(query)
        .into_iter()
        .filter(|jet| range.map_or(true, |range| range.contains(jet.hourly_rate)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> JetCatalog {
        [
            Jet::new("Embraer Phenom 300", JetType::LightJet, 6, 3_200.0),
            Jet::new("Cessna Citation X", JetType::SuperMidSize, 8, 5_500.0),
            Jet::new("Gulfstream G650", JetType::UltraLongRange, 18, 12_000.0),
            Jet::new("Bombardier Global 7500", JetType::UltraLongRange, 14, 15_000.0),
        ]
        .into_iter()
        .collect()
    }

    fn rates(jets: &[&Jet]) -> Vec<f64> {
        jets.iter().map(|jet| jet.hourly_rate).collect()
    }

    #[test]
    fn reversed_budget_is_swapped() {
        let catalog = catalog();
        let range = BudgetRange::new(10_000.0, 2_000.0);
        assert!(range.was_swapped());
        assert_eq!((range.min(), range.max()), (2_000.0, 10_000.0));
        assert_eq!(rates(&by_budget(&catalog, range)), vec![3_200.0, 5_500.0]);
    }

    #[test]
    fn budget_bounds_are_inclusive() {
        let catalog = catalog();
        let range = BudgetRange::new(5_500.0, 12_000.0);
        assert!(!range.was_swapped());
        assert_eq!(rates(&by_budget(&catalog, range)), vec![5_500.0, 12_000.0]);
    }

    #[test]
    fn type_name_is_case_insensitive() {
        let catalog = catalog();
        assert_eq!(by_type_name(&catalog, "ultra long range").unwrap().len(), 2);
        assert_eq!(by_type_name(&catalog, "").unwrap().len(), 4);
        assert!(by_type_name(&catalog, "blimp").is_err());
        assert!(by_type(&catalog, JetType::MidSize).is_empty());
    }

    #[test]
    fn capacity_threshold() {
        let catalog = catalog();
        assert_eq!(by_capacity(&catalog, 8).len(), 3);
        assert_eq!(by_capacity(&catalog, 0).len(), 4);
    }

    #[test]
    fn search_composes_query_and_budget() {
        let catalog = catalog();
        let query = JetQuery::any().of_type(JetType::UltraLongRange);
        let hits = search(&catalog, &query, Some(BudgetRange::new(0.0, 13_000.0)));
        assert_eq!(rates(&hits), vec![12_000.0]);
        assert_eq!(search(&catalog, &query, None).len(), 2);
        assert_eq!(available(&catalog).len(), 4);
    }
}
