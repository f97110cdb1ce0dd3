//! The rental desk: one owned context over catalog, directory and ledger.

use std::path::Path;

use anyhow::Result;
use chrono::{Days, Local, NaiveDate};
use tracing::{info, warn};

use crate::{
    archive::UserArchive,
    catalog::JetCatalog,
    config::{AdminCredentials, AppConfig},
    directory::UserDirectory,
    error::{CatalogError, DeskError, LedgerError, RegistrationError},
    import::{self, CatalogSource},
    ledger::{BookingLedger, BookingRequest},
    models::{
        trip_cost, Booking, BookingId, Jet, JetId, JetType, JetUpdate, TripType, User, UserId,
    },
    validation,
};

/// Result of looking up a login name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginOutcome {
    /// The admin username; a password is still required.
    Admin,
    /// A registered customer.
    User(UserId),
    /// Nobody by that name.
    Unknown,
}

/// Application context threaded through the front end.
#[derive(Debug, Clone)]
pub struct RentalDesk {
    catalog: JetCatalog,
    directory: UserDirectory,
    ledger: BookingLedger,
    admin: AdminCredentials,
    catalog_source: CatalogSource,
}

impl RentalDesk {
    /// Desk over an existing catalog with no users or bookings.
    pub fn new(catalog: JetCatalog, admin: AdminCredentials) -> Self {
        Self {
            catalog,
            directory: UserDirectory::new(),
            ledger: BookingLedger::new(),
            admin,
            catalog_source: CatalogSource::Defaults,
        }
    }

    /// Build the startup desk: catalog import (or default fleet), user
    /// archive restore, and optional sample data.
    pub fn bootstrap(config: &AppConfig) -> Self {
        let (catalog, source) = import::load_or_default(&config.catalog_path);
        let mut desk = Self::new(catalog, config.admin.clone());
        desk.catalog_source = source;

        let archive = UserArchive::new(&config.users_path);
        if archive.exists() {
            if let Err(err) = archive.restore_into(&mut desk.directory) {
                warn!("Failed to restore users: {err:#}");
            }
        }
        if config.seed_sample_data {
            desk.seed_sample_data(Local::now().date_naive());
        }
        info!(
            jets = desk.catalog.count(),
            users = desk.directory.count(),
            bookings = desk.ledger.count(),
            "Rental desk ready"
        );
        desk
    }

    /// Add the demo customers and a booking on the first jet.
    pub fn seed_sample_data(&mut self, today: NaiveDate) {
        let mut john = User::new("john_doe", "john@example.com", "12345678901");
        john.add_past_trip("New York to Los Angeles on 2023-09-10");
        let alice = User::new("alice_smith", "alice@example.com", "98765432109");

        let mut seeded = Vec::new();
        for user in [john, alice] {
            if self.directory.find_by_username(&user.username).is_some()
                || self.directory.find_by_email(&user.email).is_some()
            {
                continue;
            }
            seeded.push(self.directory.add(user));
        }

        let (Some(&user), Some(jet)) = (seeded.first(), self.catalog.by_index(0).map(Jet::id))
        else {
            return;
        };
        let request = BookingRequest {
            user,
            jet,
            departure: "JFK".to_string(),
            destination: "LAX".to_string(),
            trip_type: TripType::OneWay,
            booking_date: today,
            flight_date: today + Days::new(7),
            duration_hours: 5,
            amount_tendered: None,
        };
        if let Err(err) = self
            .ledger
            .create(&mut self.catalog, &mut self.directory, request)
        {
            warn!("Sample booking skipped: {err}");
        }
    }

    /// The jet catalog.
    pub fn catalog(&self) -> &JetCatalog {
        &self.catalog
    }

    /// The user directory.
    pub fn directory(&self) -> &UserDirectory {
        &self.directory
    }

    /// The booking ledger.
    pub fn ledger(&self) -> &BookingLedger {
        &self.ledger
    }

    /// Where the catalog was loaded from.
    pub fn catalog_source(&self) -> &CatalogSource {
        &self.catalog_source
    }

    /// Classify a login name.
    pub fn login(&self, username: &str) -> LoginOutcome {
        let username = username.trim();
        if username == self.admin.username {
            return LoginOutcome::Admin;
        }
        match self.directory.find_by_username(username) {
            Some(user) => LoginOutcome::User(user.id()),
            None => LoginOutcome::Unknown,
        }
    }

    /// Check the admin username/password pair.
    pub fn authenticate_admin(&self, username: &str, password: &str) -> bool {
        let ok = username.trim() == self.admin.username && password.trim() == self.admin.password;
        if !ok {
            warn!("Admin authentication failed");
        }
        ok
    }

    /// Register a customer.
    pub fn register(
        &mut self,
        username: &str,
        email: &str,
        phone: &str,
    ) -> Result<UserId, RegistrationError> {
        // Reserved: login always classifies this name as admin.
        if username.trim() == self.admin.username {
            warn!("Registration rejected: admin username");
            return Err(RegistrationError::UsernameTaken(username.trim().to_string()));
        }
        self.directory.register(username, email, phone)
    }

    /// Price of flying `jet` for `hours` per leg.
    pub fn quote(&self, jet: JetId, trip_type: TripType, hours: u32) -> Result<f64, DeskError> {
        let jet = self.catalog.get(jet).ok_or(LedgerError::UnknownJet(jet))?;
        validation::duration(hours)?;
        Ok(trip_cost(jet.hourly_rate, hours, trip_type))
    }

    /// Book a jet. A tendered budget below the quote is refused before the
    /// ledger is touched.
    pub fn book(&mut self, request: BookingRequest) -> Result<BookingId, DeskError> {
        if let Some(tendered) = request.amount_tendered {
            let cost = self.quote(request.jet, request.trip_type, request.duration_hours)?;
            if tendered < cost {
                warn!(cost, tendered, "Booking rejected: insufficient funds");
                return Err(DeskError::InsufficientFunds { cost, tendered });
            }
        }
        let booking = self
            .ledger
            .create(&mut self.catalog, &mut self.directory, request)?;
        Ok(booking.id())
    }

    /// Cancel a booking and release its jet.
    pub fn cancel_booking(&mut self, id: BookingId) -> Result<Booking, DeskError> {
        Ok(self
            .ledger
            .cancel(&mut self.catalog, &mut self.directory, id)?)
    }

    /// Change the flight hours of a booking.
    pub fn reschedule_booking(&mut self, id: BookingId, hours: u32) -> Result<&Booking, DeskError> {
        Ok(self.ledger.reschedule(id, hours)?)
    }

    /// Bookings held by `user`.
    pub fn bookings_for(&self, user: UserId) -> Vec<&Booking> {
        self.ledger.find_by_user(user)
    }

    /// Look up a user.
    pub fn user(&self, id: UserId) -> Option<&User> {
        self.directory.get(id)
    }

    /// Look up a jet.
    pub fn jet(&self, id: JetId) -> Option<&Jet> {
        self.catalog.get(id)
    }

    /// Add a validated jet to the catalog.
    pub fn add_jet(
        &mut self,
        model: &str,
        jet_type: JetType,
        seat_capacity: u32,
        hourly_rate: f64,
    ) -> Result<JetId, DeskError> {
        let model = validation::model(model)?;
        let seats = validation::seat_capacity(seat_capacity)?;
        let rate = validation::hourly_rate(hourly_rate)?;
        let id = self.catalog.add(Jet::new(model.clone(), jet_type, seats, rate));
        info!(%id, %model, "Jet added");
        Ok(id)
    }

    /// Edit a jet's descriptive fields after validating them.
    pub fn update_jet(&mut self, id: JetId, mut update: JetUpdate) -> Result<&Jet, DeskError> {
        if let Some(model) = update.model.take() {
            update.model = Some(validation::model(&model)?);
        }
        if let Some(seats) = update.seat_capacity {
            validation::seat_capacity(seats)?;
        }
        if let Some(rate) = update.hourly_rate {
            validation::hourly_rate(rate)?;
        }
        let jet = self.catalog.update(id, update)?;
        info!(%id, model = %jet.model, "Jet updated");
        Ok(jet)
    }

    /// Remove a jet, refusing while bookings still reference it.
    pub fn retire_jet(&mut self, id: JetId) -> Result<Jet, DeskError> {
        let bookings = self.ledger.find_by_jet(id).len();
        if bookings > 0 {
            return Err(DeskError::JetInUse { jet: id, bookings });
        }
        let jet = self
            .catalog
            .remove(id)
            .ok_or(CatalogError::NotFound(id))?;
        info!(%id, model = %jet.model, "Jet removed");
        Ok(jet)
    }

    /// Remove a user, refusing while they hold bookings.
    pub fn remove_user(&mut self, id: UserId) -> Result<User, DeskError> {
        let bookings = self.ledger.find_by_user(id).len();
        if bookings > 0 {
            return Err(DeskError::UserInUse { user: id, bookings });
        }
        self.directory.remove(id).ok_or(DeskError::UnknownUser(id))
    }

    /// Write the user archive.
    pub fn save_users(&self, path: impl AsRef<Path>) -> Result<usize> {
        UserArchive::new(path.as_ref()).save(&self.directory)
    }

    /// Merge the user archive into the directory.
    pub fn load_users(&mut self, path: impl AsRef<Path>) -> Result<usize> {
        UserArchive::new(path.as_ref()).restore_into(&mut self.directory)
    }
}
