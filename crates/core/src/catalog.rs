//! The jet catalog.

use tracing::debug;

use crate::{
    error::CatalogError,
    models::{Jet, JetId, JetType, JetUpdate},
};

/// Criteria for [`JetCatalog::find_jets`]. The default matches every jet.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct JetQuery {
    /// Restrict to one size class.
    pub jet_type: Option<JetType>,
    /// Minimum seat count.
    pub min_capacity: u32,
    /// Exclude jets that are already booked.
    pub available_only: bool,
}

impl JetQuery {
    /// Query matching every jet.
    pub fn any() -> Self {
        Self::default()
    }

    /// Restrict to one size class.
    pub fn of_type(mut self, jet_type: JetType) -> Self {
        self.jet_type = Some(jet_type);
        self
    }

    /// Require at least `seats` seats.
    pub fn min_capacity(mut self, seats: u32) -> Self {
        self.min_capacity = seats;
        self
    }

    /// Exclude booked jets.
    pub fn available(mut self) -> Self {
        self.available_only = true;
        self
    }

    /// Whether `jet` satisfies every criterion.
    pub fn matches(&self, jet: &Jet) -> bool {
        let type_matches = self.jet_type.map_or(true, |ty| jet.jet_type == ty);
        let capacity_matches = jet.seat_capacity >= self.min_capacity;
        let availability_matches = !self.available_only || jet.is_available();
        type_matches && capacity_matches && availability_matches
    }
}

/// Ordered collection of every jet known to the business.
#[derive(Debug, Clone, Default)]
pub struct JetCatalog {
    jets: Vec<Jet>,
}

impl JetCatalog {
    /// Empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a jet. Duplicate models are allowed.
    pub fn add(&mut self, jet: Jet) -> JetId {
        let id = jet.id();
        self.jets.push(jet);
        id
    }

    /// Remove the jet with the given key.
    pub fn remove(&mut self, id: JetId) -> Option<Jet> {
        let pos = self.position(id)?;
        Some(self.jets.remove(pos))
    }

    /// Remove the first jet whose model matches case-insensitively.
    ///
    /// Later jets sharing the model name are left in place.
    pub fn remove_by_model(&mut self, model: &str) -> Option<Jet> {
        let needle = model.trim();
        let pos = self
            .jets
            .iter()
            .position(|jet| jet.model.eq_ignore_ascii_case(needle))?;
        Some(self.jets.remove(pos))
    }

    /// Jets matching `query`, in catalog order.
    pub fn find_jets(&self, query: &JetQuery) -> Vec<&Jet> {
        let matches: Vec<&Jet> = self.jets.iter().filter(|jet| query.matches(jet)).collect();
        debug!(?query, matched = matches.len(), "Catalog query");
        matches
    }

    /// Positional lookup (0-based).
    pub fn by_index(&self, index: usize) -> Option<&Jet> {
        self.jets.get(index)
    }

    /// Lookup by key.
    pub fn get(&self, id: JetId) -> Option<&Jet> {
        self.jets.iter().find(|jet| jet.id() == id)
    }

    pub(crate) fn get_mut(&mut self, id: JetId) -> Option<&mut Jet> {
        self.jets.iter_mut().find(|jet| jet.id() == id)
    }

    /// Apply an admin edit to the jet with the given key.
    pub fn update(&mut self, id: JetId, update: JetUpdate) -> Result<&Jet, CatalogError> {
        let jet = self.get_mut(id).ok_or(CatalogError::NotFound(id))?;
        jet.apply(update);
        Ok(jet)
    }

    /// All jets in catalog order.
    pub fn iter(&self) -> impl Iterator<Item = &Jet> {
        self.jets.iter()
    }

    /// Number of jets.
    pub fn count(&self) -> usize {
        self.jets.len()
    }

    /// Whether the catalog holds no jets.
    pub fn is_empty(&self) -> bool {
        self.jets.is_empty()
    }

    fn position(&self, id: JetId) -> Option<usize> {
        self.jets.iter().position(|jet| jet.id() == id)
    }
}

impl FromIterator<Jet> for JetCatalog {
    fn from_iter<I: IntoIterator<Item = Jet>>(iter: I) -> Self {
        Self {
            jets: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fleet() -> JetCatalog {
        [
            Jet::new("Gulfstream G650", JetType::UltraLongRange, 18, 12_000.0),
            Jet::new("Cessna Citation X", JetType::SuperMidSize, 8, 5_500.0),
            Jet::new("Embraer Phenom 300", JetType::LightJet, 6, 3_200.0),
            Jet::new("Bombardier Global 7500", JetType::UltraLongRange, 14, 15_000.0),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn added_jets_are_available() {
        let mut catalog = JetCatalog::new();
        let id = catalog.add(Jet::new("Dassault Falcon 8X", JetType::LargeJet, 16, 9_800.0));
        assert_eq!(catalog.count(), 1);
        assert!(catalog.get(id).is_some_and(Jet::is_available));
    }

    #[test]
    fn find_jets_combines_criteria() {
        let catalog = fleet();
        let ulr = catalog.find_jets(&JetQuery::any().of_type(JetType::UltraLongRange));
        assert_eq!(ulr.len(), 2);

        let big_ulr = catalog.find_jets(
            &JetQuery::any()
                .of_type(JetType::UltraLongRange)
                .min_capacity(15),
        );
        assert_eq!(big_ulr.len(), 1);
        assert_eq!(big_ulr[0].model, "Gulfstream G650");

        assert_eq!(catalog.find_jets(&JetQuery::any()).len(), 4);
        assert_eq!(catalog.find_jets(&JetQuery::any().min_capacity(30)).len(), 0);
    }

    #[test]
    fn available_only_excludes_booked_jets() {
        let mut catalog = fleet();
        let booked = catalog.by_index(1).map(Jet::id).unwrap();
        catalog.get_mut(booked).unwrap().set_available(false);

        let available = catalog.find_jets(&JetQuery::any().available());
        assert_eq!(available.len(), 3);
        assert!(available.iter().all(|jet| jet.id() != booked));

        // Without the flag booked jets are still listed.
        assert_eq!(catalog.find_jets(&JetQuery::any()).len(), 4);
    }

    #[test]
    fn remove_by_model_takes_first_match_only() {
        let mut catalog = fleet();
        let first = catalog.add(Jet::new("Twin", JetType::MidSize, 9, 4_800.0));
        let second = catalog.add(Jet::new("Twin", JetType::MidSize, 9, 4_900.0));

        let removed = catalog.remove_by_model("twin").unwrap();
        assert_eq!(removed.id(), first);
        assert!(catalog.get(second).is_some());
        assert!(catalog.remove_by_model("Concorde").is_none());
    }

    #[test]
    fn remove_and_index_lookup() {
        let mut catalog = fleet();
        let id = catalog.by_index(0).map(Jet::id).unwrap();
        assert!(catalog.remove(id).is_some());
        assert!(catalog.remove(id).is_none());
        assert_eq!(catalog.count(), 3);
        assert!(catalog.by_index(3).is_none());
        assert_eq!(
            catalog.by_index(0).map(|jet| jet.model.as_str()),
            Some("Cessna Citation X")
        );
    }

    #[test]
    fn update_unknown_jet_fails() {
        let mut catalog = fleet();
        let missing = JetId::new();
        assert_eq!(
            catalog.update(missing, JetUpdate::default()).err(),
            Some(CatalogError::NotFound(missing))
        );
        let id = catalog.by_index(2).map(Jet::id).unwrap();
        let jet = catalog
            .update(
                id,
                JetUpdate {
                    seat_capacity: Some(7),
                    ..JetUpdate::default()
                },
            )
            .unwrap();
        assert_eq!(jet.seat_capacity, 7);
    }
}
