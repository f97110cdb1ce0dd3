//! The booking ledger.
//!
//! Creating or cancelling a booking touches three collections: the jet's
//! availability in the catalog, the global booking list, and the user's own
//! booking list. Both operations check every precondition before the first
//! mutation, so a failure leaves all three untouched.

use chrono::NaiveDate;
use tracing::{info, warn};

use crate::{
    catalog::JetCatalog,
    directory::UserDirectory,
    error::LedgerError,
    models::{Booking, BookingId, JetId, TripType, UserId},
};

/// Everything needed to book a jet.
#[derive(Debug, Clone, PartialEq)]
pub struct BookingRequest {
    /// Customer making the booking.
    pub user: UserId,
    /// Jet to reserve.
    pub jet: JetId,
    /// Departure airport or city.
    pub departure: String,
    /// Arrival airport or city.
    pub destination: String,
    /// One-way or round-trip.
    pub trip_type: TripType,
    /// Day the booking is made.
    pub booking_date: NaiveDate,
    /// Day of the flight.
    pub flight_date: NaiveDate,
    /// Flight hours per leg.
    pub duration_hours: u32,
    /// Budget handed over by the customer, if any.
    pub amount_tendered: Option<f64>,
}

/// Global list of active bookings.
#[derive(Debug, Clone, Default)]
pub struct BookingLedger {
    bookings: Vec<Booking>,
}

impl BookingLedger {
    /// Empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Book a jet for a user.
    pub fn create(
        &mut self,
        catalog: &mut JetCatalog,
        directory: &mut UserDirectory,
        request: BookingRequest,
    ) -> Result<&Booking, LedgerError> {
        if request.duration_hours == 0 {
            return Err(LedgerError::InvalidDuration);
        }
        let jet = catalog
            .get(request.jet)
            .ok_or(LedgerError::UnknownJet(request.jet))?;
        if directory.get(request.user).is_none() {
            return Err(LedgerError::UnknownUser(request.user));
        }
        if !jet.is_available() {
            warn!(jet = %request.jet, model = %jet.model, "Booking rejected: jet unavailable");
            return Err(LedgerError::JetUnavailable(request.jet));
        }

        let mut booking = Booking::new(
            request.user,
            request.jet,
            jet.hourly_rate,
            request.departure,
            request.destination,
            request.trip_type,
            request.booking_date,
            request.flight_date,
            request.duration_hours,
        );
        if let Some(tendered) = request.amount_tendered {
            booking.record_tendered(tendered);
        }
        let id = booking.id();

        // Preconditions hold; the lookups below were just checked.
        if let Some(jet) = catalog.get_mut(request.jet) {
            jet.set_available(false);
        }
        if let Some(user) = directory.get_mut(request.user) {
            user.push_booking(id);
        }
        info!(
            booking = %id,
            user = %request.user,
            jet = %request.jet,
            cost = booking.total_cost(),
            "Booking created"
        );
        self.bookings.push(booking);
        Ok(&self.bookings[self.bookings.len() - 1])
    }

    /// Cancel a booking, releasing the jet and removing it from the user's list.
    pub fn cancel(
        &mut self,
        catalog: &mut JetCatalog,
        directory: &mut UserDirectory,
        id: BookingId,
    ) -> Result<Booking, LedgerError> {
        let pos = self
            .bookings
            .iter()
            .position(|booking| booking.id() == id)
            .ok_or(LedgerError::NotFound(id))?;
        let booking = &self.bookings[pos];

        if catalog.get(booking.jet()).is_none() {
            return Err(inconsistent(id, "referenced jet is no longer in the catalog"));
        }
        match directory.get(booking.user()) {
            None => return Err(inconsistent(id, "referenced user is no longer registered")),
            Some(user) if !user.holds(id) => {
                return Err(inconsistent(id, "user does not hold the booking"))
            }
            Some(_) => {}
        }

        let booking = self.bookings.remove(pos);
        if let Some(jet) = catalog.get_mut(booking.jet()) {
            jet.set_available(true);
        }
        if let Some(user) = directory.get_mut(booking.user()) {
            user.drop_booking(id);
        }
        info!(booking = %id, user = %booking.user(), jet = %booking.jet(), "Booking cancelled");
        Ok(booking)
    }

    /// Change the flight hours of a booking. Cost and change due follow the
    /// new duration; the jet and user links are untouched.
    pub fn reschedule(&mut self, id: BookingId, hours: u32) -> Result<&Booking, LedgerError> {
        let booking = self
            .bookings
            .iter_mut()
            .find(|booking| booking.id() == id)
            .ok_or(LedgerError::NotFound(id))?;
        booking
            .set_duration(hours)
            .map_err(|_| LedgerError::InvalidDuration)?;
        info!(booking = %id, hours, cost = booking.total_cost(), "Booking rescheduled");
        Ok(&*booking)
    }

    /// Bookings held by `user`, in creation order.
    pub fn find_by_user(&self, user: UserId) -> Vec<&Booking> {
        self.bookings
            .iter()
            .filter(|booking| booking.user() == user)
            .collect()
    }

    /// Bookings reserving `jet`, in creation order.
    pub fn find_by_jet(&self, jet: JetId) -> Vec<&Booking> {
        self.bookings
            .iter()
            .filter(|booking| booking.jet() == jet)
            .collect()
    }

    /// Lookup by key.
    pub fn get(&self, id: BookingId) -> Option<&Booking> {
        self.bookings.iter().find(|booking| booking.id() == id)
    }

    /// All bookings in creation order.
    pub fn iter(&self) -> impl Iterator<Item = &Booking> {
        self.bookings.iter()
    }

    /// Number of active bookings.
    pub fn count(&self) -> usize {
        self.bookings.len()
    }

    /// Whether there are no active bookings.
    pub fn is_empty(&self) -> bool {
        self.bookings.is_empty()
    }
}

fn inconsistent(booking: BookingId, reason: &'static str) -> LedgerError {
    warn!(%booking, reason, "Ledger invariant violated");
    LedgerError::Inconsistent { booking, reason }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Jet, JetType, User};

    struct Fixture {
        catalog: JetCatalog,
        directory: UserDirectory,
        ledger: BookingLedger,
        jet: JetId,
        user: UserId,
    }

    fn fixture() -> Fixture {
        let mut catalog = JetCatalog::new();
        let jet = catalog.add(Jet::new("Cessna Citation X", JetType::SuperMidSize, 8, 5_500.0));
        catalog.add(Jet::new("Embraer Phenom 300", JetType::LightJet, 6, 3_200.0));
        let mut directory = UserDirectory::new();
        let user = directory.add(User::new("john_doe", "john@example.com", "12345678901"));
        Fixture {
            catalog,
            directory,
            ledger: BookingLedger::new(),
            jet,
            user,
        }
    }

    fn request(fx: &Fixture, trip_type: TripType, hours: u32) -> BookingRequest {
        let date = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        BookingRequest {
            user: fx.user,
            jet: fx.jet,
            departure: "JFK".to_string(),
            destination: "LAX".to_string(),
            trip_type,
            booking_date: date,
            flight_date: date + chrono::Days::new(7),
            duration_hours: hours,
            amount_tendered: None,
        }
    }

    #[test]
    fn create_links_all_three_collections() {
        let mut fx = fixture();
        let req = request(&fx, TripType::OneWay, 4);
        let booking = fx
            .ledger
            .create(&mut fx.catalog, &mut fx.directory, req)
            .unwrap();
        let id = booking.id();
        assert_eq!(booking.total_cost(), 22_000.0);

        assert!(!fx.catalog.get(fx.jet).unwrap().is_available());
        assert!(fx.ledger.get(id).is_some());
        assert!(fx.directory.get(fx.user).unwrap().holds(id));
        assert_eq!(fx.ledger.count(), 1);
    }

    #[test]
    fn round_trip_doubles_cost() {
        let mut fx = fixture();
        let req = request(&fx, TripType::RoundTrip, 4);
        let booking = fx
            .ledger
            .create(&mut fx.catalog, &mut fx.directory, req)
            .unwrap();
        assert_eq!(booking.total_cost(), 44_000.0);
    }

    #[test]
    fn records_change_from_tendered_amount() {
        let mut fx = fixture();
        let mut req = request(&fx, TripType::OneWay, 4);
        req.amount_tendered = Some(30_000.0);
        let booking = fx
            .ledger
            .create(&mut fx.catalog, &mut fx.directory, req)
            .unwrap();
        assert_eq!(booking.change_due(), Some(8_000.0));
    }

    #[test]
    fn reschedule_recomputes_cost_and_change() {
        let mut fx = fixture();
        let mut req = request(&fx, TripType::OneWay, 4);
        req.amount_tendered = Some(40_000.0);
        let id = fx
            .ledger
            .create(&mut fx.catalog, &mut fx.directory, req)
            .unwrap()
            .id();

        let booking = fx.ledger.reschedule(id, 6).unwrap();
        assert_eq!(booking.duration_hours(), 6);
        assert_eq!(booking.total_cost(), 33_000.0);
        assert_eq!(booking.change_due(), Some(7_000.0));

        assert_eq!(fx.ledger.reschedule(id, 0).unwrap_err(), LedgerError::InvalidDuration);
        assert_eq!(fx.ledger.get(id).unwrap().duration_hours(), 6);

        let missing = BookingId::new();
        assert_eq!(
            fx.ledger.reschedule(missing, 2).unwrap_err(),
            LedgerError::NotFound(missing)
        );
        assert!(!fx.catalog.get(fx.jet).unwrap().is_available());
    }

    #[test]
    fn unavailable_jet_changes_nothing() {
        let mut fx = fixture();
        let req = request(&fx, TripType::OneWay, 4);
        let first = fx
            .ledger
            .create(&mut fx.catalog, &mut fx.directory, req.clone())
            .unwrap()
            .id();

        let err = fx
            .ledger
            .create(&mut fx.catalog, &mut fx.directory, req)
            .unwrap_err();
        assert_eq!(err, LedgerError::JetUnavailable(fx.jet));
        assert_eq!(fx.ledger.count(), 1);
        assert_eq!(fx.directory.get(fx.user).unwrap().bookings(), &[first]);
        assert!(!fx.catalog.get(fx.jet).unwrap().is_available());
    }

    #[test]
    fn rejects_unknown_references_and_zero_duration() {
        let mut fx = fixture();
        let mut req = request(&fx, TripType::OneWay, 0);
        assert_eq!(
            fx.ledger
                .create(&mut fx.catalog, &mut fx.directory, req.clone())
                .unwrap_err(),
            LedgerError::InvalidDuration
        );

        req.duration_hours = 2;
        req.user = UserId::new();
        assert_eq!(
            fx.ledger
                .create(&mut fx.catalog, &mut fx.directory, req.clone())
                .unwrap_err(),
            LedgerError::UnknownUser(req.user)
        );
        // The jet must stay available after a rejected request.
        assert!(fx.catalog.get(fx.jet).unwrap().is_available());

        req.user = fx.user;
        req.jet = JetId::new();
        assert_eq!(
            fx.ledger
                .create(&mut fx.catalog, &mut fx.directory, req.clone())
                .unwrap_err(),
            LedgerError::UnknownJet(req.jet)
        );
        assert!(fx.ledger.is_empty());
    }

    #[test]
    fn cancel_reverses_create() {
        let mut fx = fixture();
        let req = request(&fx, TripType::OneWay, 4);
        let id = fx
            .ledger
            .create(&mut fx.catalog, &mut fx.directory, req)
            .unwrap()
            .id();
        let before = fx.ledger.count();

        let cancelled = fx
            .ledger
            .cancel(&mut fx.catalog, &mut fx.directory, id)
            .unwrap();
        assert_eq!(cancelled.id(), id);
        assert!(fx.ledger.find_by_user(fx.user).is_empty());
        assert!(fx.directory.get(fx.user).unwrap().bookings().is_empty());
        assert!(fx.catalog.get(fx.jet).unwrap().is_available());
        assert_eq!(fx.ledger.count(), before - 1);
    }

    #[test]
    fn cancel_unknown_booking_fails() {
        let mut fx = fixture();
        let id = BookingId::new();
        assert_eq!(
            fx.ledger
                .cancel(&mut fx.catalog, &mut fx.directory, id)
                .unwrap_err(),
            LedgerError::NotFound(id)
        );
    }

    #[test]
    fn cancel_twice_fails_second_time() {
        let mut fx = fixture();
        let req = request(&fx, TripType::OneWay, 1);
        let id = fx
            .ledger
            .create(&mut fx.catalog, &mut fx.directory, req)
            .unwrap()
            .id();
        fx.ledger
            .cancel(&mut fx.catalog, &mut fx.directory, id)
            .unwrap();
        assert!(matches!(
            fx.ledger.cancel(&mut fx.catalog, &mut fx.directory, id),
            Err(LedgerError::NotFound(_))
        ));
    }

    #[test]
    fn cancel_with_dangling_jet_is_refused_without_mutation() {
        let mut fx = fixture();
        let req = request(&fx, TripType::OneWay, 3);
        let id = fx
            .ledger
            .create(&mut fx.catalog, &mut fx.directory, req)
            .unwrap()
            .id();
        fx.catalog.remove(fx.jet);

        let err = fx
            .ledger
            .cancel(&mut fx.catalog, &mut fx.directory, id)
            .unwrap_err();
        assert!(matches!(err, LedgerError::Inconsistent { booking, .. } if booking == id));
        assert_eq!(fx.ledger.count(), 1);
        assert!(fx.directory.get(fx.user).unwrap().holds(id));
    }

    #[test]
    fn cancel_when_user_lost_booking_is_refused() {
        let mut fx = fixture();
        let req = request(&fx, TripType::OneWay, 3);
        let id = fx
            .ledger
            .create(&mut fx.catalog, &mut fx.directory, req)
            .unwrap()
            .id();
        fx.directory.get_mut(fx.user).unwrap().drop_booking(id);

        assert!(matches!(
            fx.ledger.cancel(&mut fx.catalog, &mut fx.directory, id),
            Err(LedgerError::Inconsistent { .. })
        ));
        assert!(!fx.catalog.get(fx.jet).unwrap().is_available());
        assert!(fx.ledger.get(id).is_some());
    }

    #[test]
    fn finds_by_user_and_jet() {
        let mut fx = fixture();
        let other_jet = fx.catalog.by_index(1).map(Jet::id).unwrap();
        let other_user = fx
            .directory
            .add(User::new("alice_smith", "alice@example.com", "98765432109"));

        let req = request(&fx, TripType::OneWay, 2);
        fx.ledger
            .create(&mut fx.catalog, &mut fx.directory, req)
            .unwrap();
        let mut req = request(&fx, TripType::RoundTrip, 2);
        req.user = other_user;
        req.jet = other_jet;
        fx.ledger
            .create(&mut fx.catalog, &mut fx.directory, req)
            .unwrap();

        assert_eq!(fx.ledger.find_by_user(fx.user).len(), 1);
        assert_eq!(fx.ledger.find_by_user(other_user).len(), 1);
        assert_eq!(fx.ledger.find_by_jet(other_jet)[0].user(), other_user);
        assert!(fx.ledger.find_by_jet(JetId::new()).is_empty());
    }
}
