use std::{io, thread, time::Duration};

use anyhow::{Context, Result};
use chrono::Local;
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{
        Block, Borders, Cell, Clear, List, ListItem, ListState, Paragraph, Row, Table, TableState,
        Tabs, Wrap,
    },
    Frame, Terminal,
};
use tokio::sync::mpsc;
use tracing::{debug, error, info};
use wingman_core::{
    import::{self, CatalogSource},
    models::format_currency,
    query, validation, AppConfig, Booking, BookingId, BookingRequest, BudgetRange, DeskError, Jet,
    JetId, JetQuery, JetType, JetUpdate, LoginOutcome, RentalDesk, TripType, UserId,
    ValidationError,
};

use crate::form::{Field, FieldKind, Form, FormAction};

const TICK_RATE: Duration = Duration::from_millis(250);
const MENU_ITEMS: [&str; 4] = ["Browse Jets", "Login", "Register", "Quit"];
const DASHBOARD_ITEMS: [&str; 3] = ["Browse & Book Jets", "My Bookings", "Logout"];
const TRIP_OPTIONS: [&str; 2] = ["One-way", "Round-trip"];

// Booking form field order.
const BOOK_DEPARTURE: usize = 0;
const BOOK_DESTINATION: usize = 1;
const BOOK_TRIP: usize = 2;
const BOOK_DATE: usize = 3;
const BOOK_HOURS: usize = 4;
const BOOK_BUDGET: usize = 5;

#[derive(Debug, Clone)]
struct Theme {
    primary_fg: Color,
    accent: Color,
    muted: Color,
    selection_bg: Color,
    success: Color,
    warning: Color,
    danger: Color,
    header_bg: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            primary_fg: Color::White,
            accent: Color::Cyan,
            muted: Color::DarkGray,
            selection_bg: Color::DarkGray,
            success: Color::LightGreen,
            warning: Color::Yellow,
            danger: Color::LightRed,
            header_bg: Color::Blue,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Screen {
    Menu,
    Browse,
    Dashboard,
    Bookings,
    Admin,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Session {
    Guest,
    Customer(UserId),
    Admin,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AdminTab {
    Jets,
    Users,
    Bookings,
}

impl AdminTab {
    const ALL: [AdminTab; 3] = [AdminTab::Jets, AdminTab::Users, AdminTab::Bookings];

    fn title(self) -> &'static str {
        match self {
            AdminTab::Jets => "Jets",
            AdminTab::Users => "Users",
            AdminTab::Bookings => "Bookings",
        }
    }

    fn index(self) -> usize {
        Self::ALL.iter().position(|tab| *tab == self).unwrap_or(0)
    }

    fn shifted(self, delta: isize) -> Self {
        let len = Self::ALL.len() as isize;
        Self::ALL[(self.index() as isize + delta).rem_euclid(len) as usize]
    }
}

/// Filters applied to the jet browser.
#[derive(Debug, Clone, Copy, Default)]
struct JetFilter {
    jet_type: Option<JetType>,
    min_capacity: u32,
    budget: Option<BudgetRange>,
    available_only: bool,
}

impl JetFilter {
    fn query(&self) -> JetQuery {
        JetQuery {
            jet_type: self.jet_type,
            min_capacity: self.min_capacity,
            available_only: self.available_only,
        }
    }

    fn cycle_type(&mut self) {
        self.jet_type = match self.jet_type {
            None => Some(JetType::ALL[0]),
            Some(JetType::LightJet) => None,
            Some(current) => Some(current.next()),
        };
    }

    fn describe(&self) -> String {
        let mut parts = Vec::new();
        if let Some(ty) = self.jet_type {
            parts.push(format!("type {ty}"));
        }
        if self.min_capacity > 0 {
            parts.push(format!("≥ {} seats", self.min_capacity));
        }
        if let Some(range) = self.budget {
            parts.push(format!(
                "{} – {}/hr",
                format_currency(range.min()),
                format_currency(range.max())
            ));
        }
        if self.available_only {
            parts.push("available only".to_string());
        }
        if parts.is_empty() {
            "none".to_string()
        } else {
            parts.join(", ")
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
enum FormKind {
    Login,
    AdminPassword { username: String },
    Register,
    Capacity,
    Budget,
    Booking { jet: JetId },
    Reschedule { booking: BookingId },
    AddJet,
    EditJet { jet: JetId },
}

#[derive(Debug, Clone)]
struct ActiveForm {
    kind: FormKind,
    form: Form,
}

enum FormOutcome {
    Close(String),
    Replace(ActiveForm, String),
    Stay(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ConfirmAction {
    CancelBooking(BookingId),
    DeleteJet(JetId),
    RemoveUser(UserId),
}

impl ConfirmAction {
    fn declined(self) -> &'static str {
        match self {
            ConfirmAction::CancelBooking(_) => "Cancellation aborted.",
            ConfirmAction::DeleteJet(_) => "Jet deletion aborted.",
            ConfirmAction::RemoveUser(_) => "User removal aborted.",
        }
    }
}

#[derive(Debug, Clone)]
struct Confirm {
    action: ConfirmAction,
    message: String,
}

enum AppEvent {
    Input(Event),
    Tick,
}

/// Terminal front end over the rental desk.
pub struct WingmanApp {
    desk: RentalDesk,
    config: AppConfig,
    theme: Theme,
    screen: Screen,
    session: Session,
    filter: JetFilter,
    menu_cursor: usize,
    dashboard_cursor: usize,
    jet_cursor: usize,
    booking_cursor: usize,
    admin_tab: AdminTab,
    admin_cursor: usize,
    form: Option<ActiveForm>,
    confirm: Option<Confirm>,
    status: String,
    should_quit: bool,
}

impl WingmanApp {
    pub fn new(desk: RentalDesk, config: AppConfig) -> Self {
        let status = match desk.catalog_source() {
            CatalogSource::File(path) => format!(
                "Loaded {} jets from {}",
                desk.catalog().count(),
                path.display()
            ),
            CatalogSource::Defaults => format!(
                "Jet catalog not found; using the default fleet of {} jets",
                desk.catalog().count()
            ),
        };
        Self {
            desk,
            config,
            theme: Theme::default(),
            screen: Screen::Menu,
            session: Session::Guest,
            filter: JetFilter::default(),
            menu_cursor: 0,
            dashboard_cursor: 0,
            jet_cursor: 0,
            booking_cursor: 0,
            admin_tab: AdminTab::Jets,
            admin_cursor: 0,
            form: None,
            confirm: None,
            status,
            should_quit: false,
        }
    }

    pub async fn run(&mut self) -> Result<()> {
        let mut stdout = io::stdout();
        enable_raw_mode().context("failed to enter raw mode")?;
        execute!(stdout, EnterAlternateScreen).context("failed to enter alternate screen")?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend).context("failed to create terminal")?;
        terminal.hide_cursor()?;
        terminal.clear()?;

        let (event_tx, mut event_rx) = mpsc::channel::<AppEvent>(128);
        spawn_input_thread(event_tx);

        loop {
            terminal.draw(|frame| self.draw(frame))?;
            if self.should_quit {
                break;
            }
            match event_rx.recv().await {
                Some(AppEvent::Input(Event::Key(key))) => self.handle_key(key),
                Some(AppEvent::Input(_)) | Some(AppEvent::Tick) => {}
                None => break,
            }
        }

        restore_terminal(&mut terminal)?;
        info!("Session closed");
        Ok(())
    }

    fn set_status(&mut self, message: impl Into<String>) {
        self.status = message.into();
    }

    fn customer(&self) -> Option<UserId> {
        match self.session {
            Session::Customer(id) => Some(id),
            Session::Guest | Session::Admin => None,
        }
    }

    fn visible_jets(&self) -> Vec<&Jet> {
        query::search(self.desk.catalog(), &self.filter.query(), self.filter.budget)
    }

    fn my_bookings(&self) -> Vec<&Booking> {
        self.customer()
            .map(|user| self.desk.bookings_for(user))
            .unwrap_or_default()
    }

    fn admin_len(&self) -> usize {
        match self.admin_tab {
            AdminTab::Jets => self.desk.catalog().count(),
            AdminTab::Users => self.desk.directory().count(),
            AdminTab::Bookings => self.desk.ledger().count(),
        }
    }

    fn logout(&mut self) {
        if self.session != Session::Guest {
            info!("Logged out");
        }
        self.session = Session::Guest;
        self.screen = Screen::Menu;
        self.filter = JetFilter::default();
        self.set_status("Logged out successfully.");
    }

    // ----- input -----

    fn handle_key(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }
        if self.confirm.is_some() {
            self.handle_confirm_key(key);
            return;
        }
        if self.form.is_some() {
            self.handle_form_key(key);
            return;
        }
        match self.screen {
            Screen::Menu => self.handle_menu_key(key),
            Screen::Browse => self.handle_browse_key(key),
            Screen::Dashboard => self.handle_dashboard_key(key),
            Screen::Bookings => self.handle_bookings_key(key),
            Screen::Admin => self.handle_admin_key(key),
        }
    }

    fn handle_menu_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc | KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('j') | KeyCode::Down => {
                self.menu_cursor = step(self.menu_cursor, 1, MENU_ITEMS.len())
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.menu_cursor = step(self.menu_cursor, -1, MENU_ITEMS.len())
            }
            KeyCode::Enter => match self.menu_cursor {
                0 => self.open_browser(false),
                1 => self.open_form(FormKind::Login, login_form(None)),
                2 => self.open_form(FormKind::Register, register_form(None)),
                _ => self.should_quit = true,
            },
            _ => {}
        }
    }

    fn handle_dashboard_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('j') | KeyCode::Down => {
                self.dashboard_cursor = step(self.dashboard_cursor, 1, DASHBOARD_ITEMS.len())
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.dashboard_cursor = step(self.dashboard_cursor, -1, DASHBOARD_ITEMS.len())
            }
            KeyCode::Enter => match self.dashboard_cursor {
                0 => self.open_browser(true),
                1 => {
                    self.screen = Screen::Bookings;
                    self.booking_cursor = 0;
                    if self.my_bookings().is_empty() {
                        self.set_status("You have no current bookings.");
                    } else {
                        self.set_status("Select a booking to view; d cancels it");
                    }
                }
                _ => self.logout(),
            },
            KeyCode::Esc => self.logout(),
            _ => {}
        }
    }

    fn open_browser(&mut self, for_booking: bool) {
        self.screen = Screen::Browse;
        self.jet_cursor = 0;
        self.filter.available_only = for_booking;
        let count = self.visible_jets().len();
        self.set_status(format!("{count} jets listed • Enter to book"));
    }

    fn handle_browse_key(&mut self, key: KeyEvent) {
        let len = self.visible_jets().len();
        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('j') | KeyCode::Down => self.jet_cursor = step(self.jet_cursor, 1, len),
            KeyCode::Char('k') | KeyCode::Up => self.jet_cursor = step(self.jet_cursor, -1, len),
            KeyCode::PageDown => self.jet_cursor = step(self.jet_cursor, 10, len),
            KeyCode::PageUp => self.jet_cursor = step(self.jet_cursor, -10, len),
            KeyCode::Char('g') | KeyCode::Home => self.jet_cursor = 0,
            KeyCode::Char('G') | KeyCode::End => self.jet_cursor = len.saturating_sub(1),
            KeyCode::Char('t') => {
                self.filter.cycle_type();
                self.filters_changed();
            }
            KeyCode::Char('a') => {
                self.filter.available_only = !self.filter.available_only;
                self.filters_changed();
            }
            KeyCode::Char('x') => {
                self.filter = JetFilter::default();
                self.filters_changed();
            }
            KeyCode::Char('c') => self.open_form(FormKind::Capacity, capacity_form(&self.filter)),
            KeyCode::Char('b') => self.open_form(FormKind::Budget, budget_form(&self.filter)),
            KeyCode::Enter => self.start_booking(),
            KeyCode::Esc => match self.session {
                Session::Customer(_) => {
                    self.screen = Screen::Dashboard;
                    self.set_status("Back to dashboard");
                }
                Session::Admin => self.screen = Screen::Admin,
                Session::Guest => {
                    self.screen = Screen::Menu;
                    self.set_status("Returned to main menu");
                }
            },
            _ => {}
        }
    }

    fn filters_changed(&mut self) {
        self.jet_cursor = 0;
        let count = self.visible_jets().len();
        debug!(filter = %self.filter.describe(), count, "Jet filter applied");
        if count == 0 {
            self.set_status("No jets found matching your criteria.");
        } else {
            self.set_status(format!("{count} jets match: {}", self.filter.describe()));
        }
    }

    fn start_booking(&mut self) {
        let selected = self
            .visible_jets()
            .get(self.jet_cursor)
            .map(|jet| (jet.id(), jet.is_available(), jet.model.clone()));
        let Some((jet, available, model)) = selected else {
            self.set_status("No jet selected.");
            return;
        };
        match self.session {
            Session::Guest => {
                self.set_status("Please login first to book a jet.");
                self.open_form(FormKind::Login, login_form(None));
            }
            Session::Admin => self.set_status("Admin accounts cannot book jets."),
            Session::Customer(_) if !available => {
                self.set_status(format!("Sorry, {model} is not available for booking."))
            }
            Session::Customer(_) => {
                self.open_form(FormKind::Booking { jet }, booking_form(&model));
            }
        }
    }

    fn handle_bookings_key(&mut self, key: KeyEvent) {
        let bookings: Vec<BookingId> = self.my_bookings().iter().map(|b| b.id()).collect();
        match key.code {
            KeyCode::Char('j') | KeyCode::Down => {
                self.booking_cursor = step(self.booking_cursor, 1, bookings.len())
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.booking_cursor = step(self.booking_cursor, -1, bookings.len())
            }
            KeyCode::Char('d') | KeyCode::Delete => match bookings.get(self.booking_cursor) {
                Some(&id) => self.ask(
                    ConfirmAction::CancelBooking(id),
                    "Are you sure you want to cancel this booking?",
                ),
                None => self.set_status("You have no current bookings to cancel."),
            },
            KeyCode::Char('r') => match bookings.get(self.booking_cursor) {
                Some(&id) => {
                    let hours = self
                        .desk
                        .ledger()
                        .get(id)
                        .map(|booking| booking.duration_hours().to_string())
                        .unwrap_or_default();
                    self.open_form(
                        FormKind::Reschedule { booking: id },
                        Form::new(
                            "Reschedule Booking",
                            vec![Field::text("New flight duration (hours)").with_value(hours)],
                        ),
                    );
                }
                None => self.set_status("You have no current bookings to reschedule."),
            },
            KeyCode::Char('b') => self.open_browser(true),
            KeyCode::Esc => {
                self.screen = Screen::Dashboard;
                self.set_status("Back to dashboard");
            }
            _ => {}
        }
    }

    fn handle_admin_key(&mut self, key: KeyEvent) {
        let len = self.admin_len();
        match key.code {
            KeyCode::Tab | KeyCode::Right => self.switch_tab(self.admin_tab.shifted(1)),
            KeyCode::BackTab | KeyCode::Left => self.switch_tab(self.admin_tab.shifted(-1)),
            KeyCode::Char('1') => self.switch_tab(AdminTab::Jets),
            KeyCode::Char('2') => self.switch_tab(AdminTab::Users),
            KeyCode::Char('3') => self.switch_tab(AdminTab::Bookings),
            KeyCode::Char('j') | KeyCode::Down => self.admin_cursor = step(self.admin_cursor, 1, len),
            KeyCode::Char('k') | KeyCode::Up => self.admin_cursor = step(self.admin_cursor, -1, len),
            KeyCode::Esc => self.logout(),
            KeyCode::Char('s') => self.save_users(),
            KeyCode::Char('l') => self.load_users(),
            KeyCode::Char('w') => self.export_catalog(),
            code => match self.admin_tab {
                AdminTab::Jets => self.handle_admin_jets_key(code),
                AdminTab::Users => self.handle_admin_users_key(code),
                AdminTab::Bookings => self.handle_admin_bookings_key(code),
            },
        }
    }

    fn switch_tab(&mut self, tab: AdminTab) {
        self.admin_tab = tab;
        self.admin_cursor = 0;
        self.set_status(format!("{} ({})", tab.title(), self.admin_len()));
    }

    fn handle_admin_jets_key(&mut self, code: KeyCode) {
        let selected = self
            .desk
            .catalog()
            .by_index(self.admin_cursor)
            .map(|jet| (jet.id(), jet.model.clone()));
        match code {
            KeyCode::Char('n') => self.open_form(FormKind::AddJet, jet_form("Add New Jet", None)),
            KeyCode::Char('e') | KeyCode::Enter => {
                if let Some((id, _)) = selected {
                    let form = jet_form("Edit Jet", self.desk.jet(id));
                    self.open_form(FormKind::EditJet { jet: id }, form);
                }
            }
            KeyCode::Char('d') | KeyCode::Delete => {
                if let Some((id, model)) = selected {
                    self.ask(
                        ConfirmAction::DeleteJet(id),
                        format!("Delete jet model '{model}'?"),
                    );
                }
            }
            _ => {}
        }
    }

    fn handle_admin_users_key(&mut self, code: KeyCode) {
        let selected = self
            .desk
            .directory()
            .iter()
            .nth(self.admin_cursor)
            .map(|user| (user.id(), user.username.clone()));
        if let (KeyCode::Char('d') | KeyCode::Delete, Some((id, username))) = (code, selected) {
            self.ask(
                ConfirmAction::RemoveUser(id),
                format!("Remove user '{username}'?"),
            );
        }
    }

    fn handle_admin_bookings_key(&mut self, code: KeyCode) {
        let selected = self.desk.ledger().iter().nth(self.admin_cursor).map(Booking::id);
        if let (KeyCode::Char('d') | KeyCode::Delete, Some(id)) = (code, selected) {
            self.ask(
                ConfirmAction::CancelBooking(id),
                "Are you sure you want to cancel this booking?",
            );
        }
    }

    fn save_users(&mut self) {
        match self.desk.save_users(&self.config.users_path) {
            Ok(count) => self.set_status(format!(
                "Saved {count} users to {}",
                self.config.users_path.display()
            )),
            Err(err) => {
                error!(?err, "Saving users failed");
                self.set_status(format!("Error saving users: {err:#}"));
            }
        }
    }

    fn load_users(&mut self) {
        let path = self.config.users_path.clone();
        match self.desk.load_users(&path) {
            Ok(added) => self.set_status(format!("Loaded {added} new users from {}", path.display())),
            Err(err) => {
                error!(?err, "Loading users failed");
                self.set_status(format!("Error loading users: {err:#}"));
            }
        }
    }

    fn export_catalog(&mut self) {
        let path = self.config.catalog_path.clone();
        match import::write_catalog(&path, self.desk.catalog()) {
            Ok(()) => self.set_status(format!(
                "Wrote {} jets to {}",
                self.desk.catalog().count(),
                path.display()
            )),
            Err(err) => {
                error!(?err, "Catalog export failed");
                self.set_status(format!("Error writing catalog: {err:#}"));
            }
        }
    }

    // ----- confirmations -----

    fn ask(&mut self, action: ConfirmAction, message: impl Into<String>) {
        self.confirm = Some(Confirm {
            action,
            message: message.into(),
        });
    }

    fn handle_confirm_key(&mut self, key: KeyEvent) {
        let Some(confirm) = self.confirm.take() else {
            return;
        };
        match key.code {
            KeyCode::Char('y') | KeyCode::Char('Y') => self.apply_confirm(confirm.action),
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                self.set_status(confirm.action.declined())
            }
            _ => self.confirm = Some(confirm),
        }
    }

    fn apply_confirm(&mut self, action: ConfirmAction) {
        let result = match action {
            ConfirmAction::CancelBooking(id) => self
                .desk
                .cancel_booking(id)
                .map(|booking| format!("Booking {} cancelled.", booking.route())),
            ConfirmAction::DeleteJet(id) => self
                .desk
                .retire_jet(id)
                .map(|jet| format!("Jet model '{}' removed successfully.", jet.model)),
            ConfirmAction::RemoveUser(id) => self
                .desk
                .remove_user(id)
                .map(|user| format!("User '{}' removed.", user.username)),
        };
        match result {
            Ok(message) => {
                if self.screen == Screen::Bookings {
                    let remaining = self.my_bookings().len();
                    self.booking_cursor = self.booking_cursor.min(remaining.saturating_sub(1));
                } else {
                    self.admin_cursor = self.admin_cursor.min(self.admin_len().saturating_sub(1));
                }
                self.set_status(message);
            }
            Err(err) => self.set_status(format!("Failed: {err}")),
        }
    }

    // ----- forms -----

    fn open_form(&mut self, kind: FormKind, form: Form) {
        self.form = Some(ActiveForm { kind, form });
    }

    fn handle_form_key(&mut self, key: KeyEvent) {
        let Some(mut active) = self.form.take() else {
            return;
        };
        match active.form.handle_key(key) {
            FormAction::Continue => self.form = Some(active),
            FormAction::Cancel => self.set_status(format!("{} cancelled", active.form.title)),
            FormAction::Submit => match self.submit_form(&active) {
                FormOutcome::Close(message) => self.set_status(message),
                FormOutcome::Replace(next, message) => {
                    self.form = Some(next);
                    self.set_status(message);
                }
                FormOutcome::Stay(message) => {
                    active.form.fail(message);
                    self.form = Some(active);
                }
            },
        }
    }

    fn submit_form(&mut self, active: &ActiveForm) -> FormOutcome {
        let form = &active.form;
        let outcome = match &active.kind {
            FormKind::Login => Ok(self.submit_login(form)),
            FormKind::AdminPassword { username } => Ok(self.submit_admin(username, form)),
            FormKind::Register => self.submit_register(form),
            FormKind::Capacity => self.submit_capacity(form),
            FormKind::Budget => self.submit_budget(form),
            FormKind::Booking { jet } => self.submit_booking(*jet, form),
            FormKind::Reschedule { booking } => self.submit_reschedule(*booking, form),
            FormKind::AddJet => self.submit_add_jet(form),
            FormKind::EditJet { jet } => self.submit_edit_jet(*jet, form),
        };
        outcome.unwrap_or_else(FormOutcome::Stay)
    }

    fn submit_login(&mut self, form: &Form) -> FormOutcome {
        let username = form.value(0).trim().to_string();
        if username.is_empty() {
            return FormOutcome::Stay("Username cannot be empty.".to_string());
        }
        match self.desk.login(&username) {
            LoginOutcome::Admin => FormOutcome::Replace(
                ActiveForm {
                    kind: FormKind::AdminPassword { username },
                    form: Form::new("Admin Login", vec![Field::secret("Admin password")]),
                },
                "Enter admin password".to_string(),
            ),
            LoginOutcome::User(id) => {
                info!(%username, "User logged in");
                self.session = Session::Customer(id);
                self.screen = Screen::Dashboard;
                self.dashboard_cursor = 0;
                FormOutcome::Close(format!("Login successful! Welcome, {username}."))
            }
            LoginOutcome::Unknown => FormOutcome::Replace(
                ActiveForm {
                    kind: FormKind::Register,
                    form: register_form(Some(&username)),
                },
                "User not found. Register below or press Esc.".to_string(),
            ),
        }
    }

    fn submit_admin(&mut self, username: &str, form: &Form) -> FormOutcome {
        if self.desk.authenticate_admin(username, form.value(0)) {
            info!("Admin logged in");
            self.session = Session::Admin;
            self.screen = Screen::Admin;
            self.admin_tab = AdminTab::Jets;
            self.admin_cursor = 0;
            FormOutcome::Close("Admin login successful!".to_string())
        } else {
            FormOutcome::Close("Incorrect admin credentials.".to_string())
        }
    }

    fn submit_register(&mut self, form: &Form) -> Result<FormOutcome, String> {
        self.desk
            .register(form.value(0), form.value(1), form.value(2))
            .map_err(|err| err.to_string())?;
        Ok(FormOutcome::Close(
            "Registration successful! You can now log in.".to_string(),
        ))
    }

    fn submit_capacity(&mut self, form: &Form) -> Result<FormOutcome, String> {
        let text = form.value(0);
        self.filter.min_capacity = if text.trim().is_empty() {
            0
        } else {
            validation::whole_number(text).map_err(|err| err.to_string())?
        };
        self.filters_changed();
        Ok(FormOutcome::Close(self.status.clone()))
    }

    fn submit_budget(&mut self, form: &Form) -> Result<FormOutcome, String> {
        if form.value(0).trim().is_empty() && form.value(1).trim().is_empty() {
            self.filter.budget = None;
            self.filters_changed();
            return Ok(FormOutcome::Close(self.status.clone()));
        }
        let min = validation::amount(form.value(0)).map_err(|err| err.to_string())?;
        let max = validation::amount(form.value(1)).map_err(|err| err.to_string())?;
        let range = BudgetRange::new(min, max);
        self.filter.budget = Some(range);
        self.filters_changed();
        if range.was_swapped() {
            return Ok(FormOutcome::Close(format!(
                "Minimum budget was greater than maximum; swapped. {}",
                self.status
            )));
        }
        Ok(FormOutcome::Close(self.status.clone()))
    }

    fn submit_booking(&mut self, jet: JetId, form: &Form) -> Result<FormOutcome, String> {
        let user = self
            .customer()
            .ok_or_else(|| "Please login first to book a jet.".to_string())?;
        let invalid = |err: ValidationError| err.to_string();
        let departure = validation::location(form.value(BOOK_DEPARTURE)).map_err(invalid)?;
        let destination = validation::location(form.value(BOOK_DESTINATION)).map_err(invalid)?;
        let trip_type = form
            .value(BOOK_TRIP)
            .parse::<TripType>()
            .map_err(invalid)?;
        let flight_date = validation::flight_date(form.value(BOOK_DATE)).map_err(invalid)?;
        let hours = validation::whole_number(form.value(BOOK_HOURS))
            .and_then(validation::duration)
            .map_err(invalid)?;
        let budget = validation::amount(form.value(BOOK_BUDGET)).map_err(invalid)?;

        let request = BookingRequest {
            user,
            jet,
            departure,
            destination,
            trip_type,
            booking_date: Local::now().date_naive(),
            flight_date,
            duration_hours: hours,
            amount_tendered: Some(budget),
        };
        let id = match self.desk.book(request) {
            Ok(id) => id,
            Err(DeskError::InsufficientFunds { cost, .. }) => {
                return Err(format!(
                    "Insufficient funds. The total cost is {}.",
                    format_currency(cost)
                ))
            }
            Err(err) => return Err(err.to_string()),
        };

        let summary = self
            .desk
            .ledger()
            .get(id)
            .map(|booking| {
                format!(
                    "Booking successful! {} for {}, change due {}.",
                    booking.route(),
                    format_currency(booking.total_cost()),
                    format_currency(booking.change_due().unwrap_or(0.0))
                )
            })
            .unwrap_or_else(|| "Booking successful!".to_string());
        self.screen = Screen::Bookings;
        self.booking_cursor = self
            .my_bookings()
            .iter()
            .position(|booking| booking.id() == id)
            .unwrap_or(0);
        Ok(FormOutcome::Close(summary))
    }

    fn submit_reschedule(&mut self, id: BookingId, form: &Form) -> Result<FormOutcome, String> {
        let hours = validation::whole_number(form.value(0))
            .and_then(validation::duration)
            .map_err(|err| err.to_string())?;
        let booking = self
            .desk
            .reschedule_booking(id, hours)
            .map_err(|err| err.to_string())?;
        let mut message = format!(
            "Booking {} now {} hours, total {}",
            booking.route(),
            hours,
            format_currency(booking.total_cost())
        );
        if let Some(change) = booking.change_due() {
            message.push_str(&format!(", change due {}", format_currency(change)));
        }
        Ok(FormOutcome::Close(message))
    }

    fn submit_add_jet(&mut self, form: &Form) -> Result<FormOutcome, String> {
        let (model, jet_type, seats, rate) = read_jet_form(form)?;
        self.desk
            .add_jet(&model, jet_type, seats, rate)
            .map_err(|err| err.to_string())?;
        self.admin_tab = AdminTab::Jets;
        self.admin_cursor = self.desk.catalog().count().saturating_sub(1);
        Ok(FormOutcome::Close(format!("New jet '{model}' added successfully!")))
    }

    fn submit_edit_jet(&mut self, jet: JetId, form: &Form) -> Result<FormOutcome, String> {
        let (model, jet_type, seats, rate) = read_jet_form(form)?;
        let update = JetUpdate {
            model: Some(model),
            jet_type: Some(jet_type),
            seat_capacity: Some(seats),
            hourly_rate: Some(rate),
        };
        let jet = self
            .desk
            .update_jet(jet, update)
            .map_err(|err| err.to_string())?;
        Ok(FormOutcome::Close(format!("Jet '{}' updated.", jet.model)))
    }

    // ----- drawing -----

    fn draw(&self, frame: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Min(8),
                Constraint::Length(4),
            ])
            .split(frame.size());

        self.render_header(frame, chunks[0]);
        match self.screen {
            Screen::Menu => self.draw_menu(frame, chunks[1]),
            Screen::Browse => self.draw_browse(frame, chunks[1]),
            Screen::Dashboard => self.draw_dashboard(frame, chunks[1]),
            Screen::Bookings => self.draw_bookings(frame, chunks[1]),
            Screen::Admin => self.draw_admin(frame, chunks[1]),
        }
        self.render_status(frame, chunks[2]);

        if let Some(active) = &self.form {
            self.render_form(frame, active);
        }
        if let Some(confirm) = &self.confirm {
            self.render_confirm(frame, confirm);
        }
    }

    fn render_header(&self, frame: &mut Frame, area: Rect) {
        let who = match self.session {
            Session::Guest => "guest".to_string(),
            Session::Admin => "admin".to_string(),
            Session::Customer(id) => self
                .desk
                .user(id)
                .map(|user| user.username.clone())
                .unwrap_or_else(|| "unknown".to_string()),
        };
        let line = Line::from(vec![
            Span::styled(
                " ✈ Welcome to Wingman! ",
                Style::default()
                    .bg(self.theme.header_bg)
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                "  More Than a Jet. Your Travel Buddy.",
                Style::default().fg(self.theme.muted),
            ),
            Span::raw("   "),
            Span::styled(
                format!("[{who}]"),
                Style::default().fg(self.theme.accent),
            ),
        ]);
        let paragraph = Paragraph::new(line)
            .block(Block::default().borders(Borders::ALL))
            .alignment(Alignment::Left);
        frame.render_widget(paragraph, area);
    }

    fn draw_menu(&self, frame: &mut Frame, area: Rect) {
        let height = (MENU_ITEMS.len() as u16).saturating_mul(2).saturating_add(2);
        let menu_area = centered_rect(32, height, area);
        let lines = menu_lines(&self.theme, &MENU_ITEMS, self.menu_cursor);
        let menu = Paragraph::new(lines)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title("Private Jet Rental"),
            )
            .alignment(Alignment::Center);
        frame.render_widget(menu, menu_area);
    }

    fn draw_browse(&self, frame: &mut Frame, area: Rect) {
        let body = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(62), Constraint::Percentage(38)])
            .split(area);

        let jets = self.visible_jets();
        self.render_jet_table(frame, body[0], &jets, self.jet_cursor, "Jets");

        let mut lines = vec![
            Line::from(Span::styled(
                format!("Filters: {}", self.filter.describe()),
                Style::default().fg(self.theme.warning),
            )),
            Line::from(""),
        ];
        match jets.get(self.jet_cursor) {
            Some(jet) => lines.extend(self.jet_detail_lines(jet)),
            None => lines.push(Line::from(Span::styled(
                "No jets found matching your criteria.",
                Style::default().fg(self.theme.danger),
            ))),
        }
        lines.push(Line::from(""));
        lines.push(help_line(&[
            ("t", "type"),
            ("c", "capacity"),
            ("b", "budget"),
            ("a", "available"),
            ("x", "clear"),
            ("Enter", "book"),
            ("Esc", "back"),
        ]));
        let paragraph = Paragraph::new(lines)
            .block(Block::default().borders(Borders::ALL).title("Jet Details"))
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, body[1]);
    }

    fn jet_detail_lines(&self, jet: &Jet) -> Vec<Line<'static>> {
        let (label, color) = availability(&self.theme, jet);
        vec![
            Line::from(Span::styled(
                jet.model.clone(),
                Style::default().add_modifier(Modifier::BOLD),
            )),
            Line::from(format!("Type: {}", jet.jet_type)),
            Line::from(format!("Capacity: {} seats", jet.seat_capacity)),
            Line::from(format!("Rate: {}/hour", format_currency(jet.hourly_rate))),
            Line::from(vec![
                Span::raw("Status: "),
                Span::styled(label, Style::default().fg(color)),
            ]),
        ]
    }

    fn render_jet_table(
        &self,
        frame: &mut Frame,
        area: Rect,
        jets: &[&Jet],
        cursor: usize,
        title: &str,
    ) {
        let header = Row::new(["#", "Model", "Type", "Seats", "Rate/hr", "Status"])
            .style(
                Style::default()
                    .fg(self.theme.accent)
                    .add_modifier(Modifier::BOLD),
            );
        let rows: Vec<Row> = jets
            .iter()
            .enumerate()
            .map(|(idx, jet)| {
                let (label, color) = availability(&self.theme, jet);
                Row::new(vec![
                    Cell::from(format!("{}", idx + 1)),
                    Cell::from(jet.model.clone()),
                    Cell::from(jet.jet_type.label()),
                    Cell::from(jet.seat_capacity.to_string()),
                    Cell::from(format_currency(jet.hourly_rate)),
                    Cell::from(Span::styled(label, Style::default().fg(color))),
                ])
            })
            .collect();
        let widths = [
            Constraint::Length(3),
            Constraint::Min(18),
            Constraint::Length(16),
            Constraint::Length(5),
            Constraint::Length(11),
            Constraint::Length(9),
        ];
        let table = Table::new(rows, widths)
            .header(header)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(format!("{title} ({})", jets.len())),
            )
            .highlight_style(Style::default().bg(self.theme.selection_bg))
            .highlight_symbol("▶ ");
        let mut state = TableState::default();
        if !jets.is_empty() {
            state.select(Some(cursor.min(jets.len() - 1)));
        }
        frame.render_stateful_widget(table, area, &mut state);
    }

    fn draw_dashboard(&self, frame: &mut Frame, area: Rect) {
        let body = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
            .split(area);

        let menu = Paragraph::new(menu_lines(
            &self.theme,
            &DASHBOARD_ITEMS,
            self.dashboard_cursor,
        ))
        .block(Block::default().borders(Borders::ALL).title("User Dashboard"));
        frame.render_widget(menu, body[0]);

        let mut lines = Vec::new();
        if let Some(user) = self.customer().and_then(|id| self.desk.user(id)) {
            lines.push(Line::from(Span::styled(
                format!("Welcome, {}!", user.username),
                Style::default()
                    .fg(self.theme.accent)
                    .add_modifier(Modifier::BOLD),
            )));
            lines.push(Line::from(""));
            lines.push(Line::from(format!("Username: {}", user.username)));
            lines.push(Line::from(format!("Email: {}", user.email)));
            lines.push(Line::from(format!("Phone: {}", user.phone_number)));
            lines.push(Line::from(format!("Past Trips: {}", user.past_trips().len())));
            for trip in user.past_trips() {
                lines.push(Line::from(Span::styled(
                    format!("  • {trip}"),
                    Style::default().fg(self.theme.muted),
                )));
            }
            lines.push(Line::from(format!(
                "Current Bookings: {}",
                user.bookings().len()
            )));
        }
        let profile = Paragraph::new(lines)
            .block(Block::default().borders(Borders::ALL).title("Profile"))
            .wrap(Wrap { trim: true });
        frame.render_widget(profile, body[1]);
    }

    fn draw_bookings(&self, frame: &mut Frame, area: Rect) {
        let body = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(area);
        let bookings = self.my_bookings();
        self.render_booking_list(frame, body[0], &bookings, self.booking_cursor, "Your Bookings");

        let mut lines = match bookings.get(self.booking_cursor) {
            Some(booking) => self.booking_detail_lines(booking),
            None => vec![Line::from("You have no current bookings.")],
        };
        lines.push(Line::from(""));
        lines.push(help_line(&[
            ("d", "cancel booking"),
            ("r", "reschedule"),
            ("b", "book"),
            ("Esc", "back"),
        ]));
        let paragraph = Paragraph::new(lines)
            .block(Block::default().borders(Borders::ALL).title("Booking Details"))
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, body[1]);
    }

    fn render_booking_list(
        &self,
        frame: &mut Frame,
        area: Rect,
        bookings: &[&Booking],
        cursor: usize,
        title: &str,
    ) {
        let items: Vec<ListItem> = bookings
            .iter()
            .enumerate()
            .map(|(idx, booking)| {
                let jet = self
                    .desk
                    .jet(booking.jet())
                    .map(|jet| jet.model.clone())
                    .unwrap_or_else(|| "retired jet".to_string());
                let user = self
                    .desk
                    .user(booking.user())
                    .map(|user| user.username.clone())
                    .unwrap_or_default();
                let mut spans = vec![
                    Span::styled(
                        format!("{}. ", idx + 1),
                        Style::default().fg(self.theme.warning),
                    ),
                    Span::raw(format!(
                        "From {} to {} on {} ",
                        booking.departure, booking.destination, booking.flight_date
                    )),
                    Span::styled(format!("({jet})"), Style::default().fg(self.theme.muted)),
                ];
                if self.session == Session::Admin {
                    spans.push(Span::styled(
                        format!(" · {user}"),
                        Style::default().fg(self.theme.accent),
                    ));
                }
                ListItem::new(Line::from(spans))
            })
            .collect();
        let list = List::new(items)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(format!("{title} ({})", bookings.len())),
            )
            .highlight_style(Style::default().bg(self.theme.selection_bg))
            .highlight_symbol("▶ ");
        let mut state = ListState::default();
        if !bookings.is_empty() {
            state.select(Some(cursor.min(bookings.len() - 1)));
        }
        frame.render_stateful_widget(list, area, &mut state);
    }

    fn booking_detail_lines(&self, booking: &Booking) -> Vec<Line<'static>> {
        let user = self
            .desk
            .user(booking.user())
            .map(|user| user.username.clone())
            .unwrap_or_else(|| "unknown".to_string());
        let jet = self
            .desk
            .jet(booking.jet())
            .map(|jet| format!("{} ({})", jet.model, jet.jet_type))
            .unwrap_or_else(|| "retired jet".to_string());
        let mut lines = vec![
            Line::from(format!("User: {user}")),
            Line::from(format!("Jet: {jet}")),
            Line::from(format!("Route: {} to {}", booking.departure, booking.destination)),
            Line::from(format!("Trip Type: {}", booking.trip_type)),
            Line::from(format!("Booking Date: {}", booking.booking_date)),
            Line::from(format!("Flight Date: {}", booking.flight_date)),
            Line::from(format!("Flight Duration: {} hours", booking.duration_hours())),
            Line::from(Span::styled(
                format!("Total Cost: {}", format_currency(booking.total_cost())),
                Style::default()
                    .fg(self.theme.success)
                    .add_modifier(Modifier::BOLD),
            )),
        ];
        if let Some(change) = booking.change_due() {
            lines.push(Line::from(format!("Change Due: {}", format_currency(change))));
        }
        lines
    }

    fn draw_admin(&self, frame: &mut Frame, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Min(5),
                Constraint::Length(3),
            ])
            .split(area);

        let titles: Vec<Line> = AdminTab::ALL
            .iter()
            .enumerate()
            .map(|(idx, tab)| Line::from(format!("{} {}", idx + 1, tab.title())))
            .collect();
        let tabs = Tabs::new(titles)
            .select(self.admin_tab.index())
            .block(Block::default().borders(Borders::ALL).title("Admin Dashboard"))
            .highlight_style(
                Style::default()
                    .fg(self.theme.accent)
                    .add_modifier(Modifier::BOLD),
            );
        frame.render_widget(tabs, chunks[0]);

        let help = match self.admin_tab {
            AdminTab::Jets => {
                self.render_jet_table(
                    frame,
                    chunks[1],
                    &self.desk.catalog().iter().collect::<Vec<_>>(),
                    self.admin_cursor,
                    "All Jets",
                );
                help_line(&[
                    ("n", "add"),
                    ("e", "edit"),
                    ("d", "delete"),
                    ("w", "write CSV"),
                    ("Esc", "logout"),
                ])
            }
            AdminTab::Users => {
                self.render_user_list(frame, chunks[1]);
                help_line(&[
                    ("s", "save users"),
                    ("l", "load users"),
                    ("d", "remove"),
                    ("Esc", "logout"),
                ])
            }
            AdminTab::Bookings => {
                self.render_booking_list(
                    frame,
                    chunks[1],
                    &self.desk.ledger().iter().collect::<Vec<_>>(),
                    self.admin_cursor,
                    "All Bookings",
                );
                help_line(&[("d", "cancel booking"), ("Esc", "logout")])
            }
        };
        frame.render_widget(
            Paragraph::new(help).block(Block::default().borders(Borders::ALL)),
            chunks[2],
        );
    }

    fn render_user_list(&self, frame: &mut Frame, area: Rect) {
        let items: Vec<ListItem> = self
            .desk
            .directory()
            .iter()
            .map(|user| {
                ListItem::new(Line::from(vec![
                    Span::styled(
                        format!("{:<16}", user.username),
                        Style::default().add_modifier(Modifier::BOLD),
                    ),
                    Span::raw(format!(" {:<28}", user.email)),
                    Span::styled(
                        format!(" {}", user.phone_number),
                        Style::default().fg(self.theme.muted),
                    ),
                    Span::styled(
                        format!("  {} booking(s)", user.bookings().len()),
                        Style::default().fg(self.theme.accent),
                    ),
                ]))
            })
            .collect();
        let total = items.len();
        let list = List::new(items)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(format!("Registered Users ({total})")),
            )
            .highlight_style(Style::default().bg(self.theme.selection_bg))
            .highlight_symbol("▶ ");
        let mut state = ListState::default();
        if total > 0 {
            state.select(Some(self.admin_cursor.min(total - 1)));
        }
        frame.render_stateful_widget(list, area, &mut state);
    }

    fn render_status(&self, frame: &mut Frame, area: Rect) {
        let secondary = format!(
            "Jets: {} ({} available) • Users: {} • Bookings: {}",
            self.desk.catalog().count(),
            query::available(self.desk.catalog()).len(),
            self.desk.directory().count(),
            self.desk.ledger().count()
        );
        let paragraph = Paragraph::new(vec![
            Line::from(self.status.clone()),
            Line::from(Span::styled(secondary, Style::default().fg(self.theme.muted))),
        ])
        .block(Block::default().borders(Borders::ALL).title("Status"))
        .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, area);
    }

    fn render_form(&self, frame: &mut Frame, active: &ActiveForm) {
        let form = &active.form;
        let extra = if matches!(active.kind, FormKind::Booking { .. }) { 2 } else { 0 };
        let height = (form.fields.len() as u16 * 2 + 5 + extra).min(frame.size().height);
        let area = centered_rect(64, height, frame.size());
        frame.render_widget(Clear, area);

        let mut lines = Vec::new();
        let mut cursor_pos = None;
        for (idx, field) in form.fields.iter().enumerate() {
            let focused = idx == form.focus;
            let label_style = if focused {
                Style::default()
                    .fg(self.theme.accent)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(self.theme.primary_fg)
            };
            lines.push(Line::from(Span::styled(field.label, label_style)));
            lines.push(Line::from(vec![
                Span::styled("> ", Style::default().fg(self.theme.accent)),
                Span::raw(field.display()),
            ]));
            if focused && !matches!(field.kind, FieldKind::Choice { .. }) {
                cursor_pos = Some((lines.len() - 1, field.cursor()));
            }
        }
        if let FormKind::Booking { jet } = &active.kind {
            lines.push(Line::from(""));
            lines.push(self.quote_line(*jet, form));
        }
        if let Some(err) = &form.error {
            lines.push(Line::from(Span::styled(
                err.clone(),
                Style::default().fg(self.theme.danger),
            )));
        } else {
            lines.push(Line::from(""));
        }
        lines.push(help_line(&[
            ("Enter", "next/submit"),
            ("Tab", "field"),
            ("←/→", "choose"),
            ("Esc", "cancel"),
        ]));

        let paragraph = Paragraph::new(lines).block(
            Block::default()
                .borders(Borders::ALL)
                .title(form.title.clone()),
        );
        frame.render_widget(paragraph, area);

        if let Some((row, col)) = cursor_pos {
            let x = (area.x + 3 + col as u16).min(area.x + area.width.saturating_sub(2));
            let y = area.y + 1 + row as u16;
            if y < area.y + area.height.saturating_sub(1) {
                frame.set_cursor(x, y);
            }
        }
    }

    fn quote_line(&self, jet: JetId, form: &Form) -> Line<'static> {
        let trip = form.value(BOOK_TRIP).parse::<TripType>().ok();
        let hours = validation::whole_number(form.value(BOOK_HOURS)).ok();
        match (trip, hours) {
            (Some(trip), Some(hours)) => match self.desk.quote(jet, trip, hours) {
                Ok(cost) => Line::from(Span::styled(
                    format!("Total cost for this booking: {}", format_currency(cost)),
                    Style::default()
                        .fg(self.theme.success)
                        .add_modifier(Modifier::BOLD),
                )),
                Err(err) => Line::from(Span::styled(
                    err.to_string(),
                    Style::default().fg(self.theme.muted),
                )),
            },
            _ => Line::from(Span::styled(
                "Enter a duration to see the total cost",
                Style::default().fg(self.theme.muted),
            )),
        }
    }

    fn render_confirm(&self, frame: &mut Frame, confirm: &Confirm) {
        let area = centered_rect(56, 6, frame.size());
        frame.render_widget(Clear, area);
        let paragraph = Paragraph::new(vec![
            Line::from(confirm.message.clone()),
            Line::from(""),
            help_line(&[("y", "yes"), ("n", "no")]),
        ])
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Confirm")
                .border_style(Style::default().fg(self.theme.warning)),
        )
        .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, area);
    }
}

fn login_form(username: Option<&str>) -> Form {
    Form::new(
        "User Login",
        vec![Field::text("Username").with_value(username.unwrap_or_default())],
    )
}

fn register_form(username: Option<&str>) -> Form {
    Form::new(
        "User Registration",
        vec![
            Field::text("Username (at least 4 characters)")
                .with_value(username.unwrap_or_default()),
            Field::text("Email"),
            Field::text("Phone number (11 digits)"),
        ],
    )
}

fn capacity_form(filter: &JetFilter) -> Form {
    let current = if filter.min_capacity > 0 {
        filter.min_capacity.to_string()
    } else {
        String::new()
    };
    Form::new(
        "Filter by Capacity",
        vec![Field::text("Minimum seat capacity (blank clears)").with_value(current)],
    )
}

fn budget_form(filter: &JetFilter) -> Form {
    let (min, max) = filter
        .budget
        .map(|range| (range.min().to_string(), range.max().to_string()))
        .unwrap_or_default();
    Form::new(
        "Filter by Budget",
        vec![
            Field::text("Minimum hourly budget ($)").with_value(min),
            Field::text("Maximum hourly budget ($)").with_value(max),
        ],
    )
}

fn booking_form(model: &str) -> Form {
    Form::new(
        format!("Book {model}"),
        vec![
            Field::text("Departure location (e.g. JFK, LAX)"),
            Field::text("Destination location"),
            Field::choice("Trip type", TRIP_OPTIONS.to_vec(), 0),
            Field::text("Flight date (YYYY-MM-DD)"),
            Field::text("Estimated flight duration (hours)"),
            Field::text("Your available budget ($)"),
        ],
    )
}

fn jet_form(title: &str, jet: Option<&Jet>) -> Form {
    let labels: Vec<&'static str> = JetType::ALL.iter().map(|ty| ty.label()).collect();
    let selected = jet
        .and_then(|jet| JetType::ALL.iter().position(|ty| *ty == jet.jet_type))
        .unwrap_or(0);
    let (model, seats, rate) = jet
        .map(|jet| {
            (
                jet.model.clone(),
                jet.seat_capacity.to_string(),
                jet.hourly_rate.to_string(),
            )
        })
        .unwrap_or_default();
    Form::new(
        title,
        vec![
            Field::text("Jet model (e.g. Gulfstream G650)").with_value(model),
            Field::choice("Jet type", labels, selected),
            Field::text("Seat capacity (1-20)").with_value(seats),
            Field::text("Hourly rate ($1,000 - $20,000)").with_value(rate),
        ],
    )
}

fn read_jet_form(form: &Form) -> Result<(String, JetType, u32, f64), String> {
    let model = validation::model(form.value(0)).map_err(|err| err.to_string())?;
    let jet_type = form
        .value(1)
        .parse::<JetType>()
        .map_err(|err| err.to_string())?;
    let seats = validation::whole_number(form.value(2))
        .and_then(validation::seat_capacity)
        .map_err(|err| err.to_string())?;
    let rate = validation::amount(form.value(3))
        .and_then(validation::hourly_rate)
        .map_err(|err| err.to_string())?;
    Ok((model, jet_type, seats, rate))
}

fn availability(theme: &Theme, jet: &Jet) -> (&'static str, Color) {
    if jet.is_available() {
        ("Yes", theme.success)
    } else {
        ("Booked", theme.danger)
    }
}

fn menu_lines(theme: &Theme, items: &[&str], cursor: usize) -> Vec<Line<'static>> {
    items
        .iter()
        .enumerate()
        .map(|(idx, item)| {
            if idx == cursor {
                Line::from(Span::styled(
                    format!("▶ {}. {item}", idx + 1),
                    Style::default()
                        .fg(theme.accent)
                        .add_modifier(Modifier::BOLD),
                ))
            } else {
                Line::from(Span::styled(
                    format!("  {}. {item}", idx + 1),
                    Style::default().fg(theme.primary_fg),
                ))
            }
        })
        .collect()
}

fn help_line(keys: &[(&str, &str)]) -> Line<'static> {
    let mut spans = Vec::with_capacity(keys.len() * 2);
    for (key, action) in keys {
        spans.push(Span::styled(
            key.to_string(),
            Style::default().add_modifier(Modifier::BOLD),
        ));
        spans.push(Span::raw(format!(" {action}  ")));
    }
    Line::from(spans)
}

fn step(current: usize, delta: isize, len: usize) -> usize {
    if len == 0 {
        return 0;
    }
    (current as isize + delta).clamp(0, len as isize - 1) as usize
}

fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width, height)
}

fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
    disable_raw_mode().context("failed to disable raw mode")?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)
        .context("failed to leave alternate screen")?;
    terminal.show_cursor()?;
    Ok(())
}

fn spawn_input_thread(sender: mpsc::Sender<AppEvent>) {
    thread::spawn(move || loop {
        match event::poll(TICK_RATE) {
            Ok(true) => match event::read() {
                Ok(evt) => {
                    if sender.blocking_send(AppEvent::Input(evt)).is_err() {
                        break;
                    }
                }
                Err(_) => break,
            },
            Ok(false) => {
                if sender.blocking_send(AppEvent::Tick).is_err() {
                    break;
                }
            }
            Err(_) => break,
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;
    use wingman_core::config::AdminCredentials;

    fn app() -> WingmanApp {
        let mut desk = RentalDesk::new(import::default_fleet(), AdminCredentials::default());
        desk.seed_sample_data(Local::now().date_naive());
        WingmanApp::new(desk, AppConfig::default())
    }

    fn press(app: &mut WingmanApp, code: KeyCode) {
        app.handle_key(KeyEvent::new(code, KeyModifiers::NONE));
    }

    fn type_text(app: &mut WingmanApp, text: &str) {
        for ch in text.chars() {
            press(app, KeyCode::Char(ch));
        }
    }

    fn login(app: &mut WingmanApp, username: &str) {
        app.open_form(FormKind::Login, login_form(None));
        type_text(app, username);
        press(app, KeyCode::Enter);
    }

    #[test]
    fn step_clamps() {
        assert_eq!(step(0, -1, 3), 0);
        assert_eq!(step(2, 1, 3), 2);
        assert_eq!(step(1, 10, 0), 0);
    }

    #[test]
    fn type_filter_cycles_back_to_none() {
        let mut filter = JetFilter::default();
        for _ in 0..JetType::ALL.len() {
            filter.cycle_type();
            assert!(filter.jet_type.is_some());
        }
        filter.cycle_type();
        assert!(filter.jet_type.is_none());
    }

    #[test]
    fn customer_login_opens_dashboard() {
        let mut app = app();
        login(&mut app, "john_doe");
        assert_eq!(app.screen, Screen::Dashboard);
        assert!(app.customer().is_some());
        assert!(app.form.is_none());
    }

    #[test]
    fn unknown_login_offers_registration() {
        let mut app = app();
        login(&mut app, "newbie");
        let active = app.form.as_ref().expect("registration form");
        assert_eq!(active.kind, FormKind::Register);
        assert_eq!(active.form.value(0), "newbie");
    }

    #[test]
    fn admin_login_requires_password() {
        let mut app = app();
        login(&mut app, "A@dMin");
        assert!(matches!(
            app.form.as_ref().map(|f| &f.kind),
            Some(FormKind::AdminPassword { .. })
        ));
        type_text(&mut app, "admin123");
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.session, Session::Admin);
        assert_eq!(app.screen, Screen::Admin);
    }

    #[test]
    fn reversed_budget_filter_is_swapped() {
        let mut app = app();
        app.open_browser(false);
        press(&mut app, KeyCode::Char('b'));
        type_text(&mut app, "10000");
        press(&mut app, KeyCode::Enter);
        type_text(&mut app, "2000");
        press(&mut app, KeyCode::Enter);
        let rates: Vec<f64> = app.visible_jets().iter().map(|j| j.hourly_rate).collect();
        assert_eq!(rates, vec![5_500.0, 3_200.0, 9_800.0]);
        assert!(app.status.contains("swapped"));
    }

    #[test]
    fn booking_flow_reprompts_on_low_budget_then_books() {
        let mut app = app();
        login(&mut app, "alice_smith");
        app.open_browser(true);
        // First available jet is the Cessna Citation X at 5,500/hr.
        press(&mut app, KeyCode::Enter);
        assert!(matches!(
            app.form.as_ref().map(|f| &f.kind),
            Some(FormKind::Booking { .. })
        ));
        type_text(&mut app, "LHR");
        press(&mut app, KeyCode::Enter);
        type_text(&mut app, "CDG");
        press(&mut app, KeyCode::Enter);
        press(&mut app, KeyCode::Enter);
        type_text(&mut app, "2030-05-01");
        press(&mut app, KeyCode::Enter);
        type_text(&mut app, "4");
        press(&mut app, KeyCode::Enter);
        type_text(&mut app, "1000");
        press(&mut app, KeyCode::Enter);

        let active = app.form.as_ref().expect("form stays open");
        assert!(active
            .form
            .error
            .as_deref()
            .is_some_and(|err| err.contains("Insufficient funds")));

        type_text(&mut app, "00");
        press(&mut app, KeyCode::Enter);
        assert!(app.form.is_none());
        assert_eq!(app.screen, Screen::Bookings);
        let bookings = app.my_bookings();
        assert_eq!(bookings.len(), 1);
        assert_eq!(bookings[0].total_cost(), 22_000.0);
        assert_eq!(bookings[0].change_due(), Some(78_000.0));
    }

    #[test]
    fn declining_confirm_names_the_action() {
        let mut app = app();
        login(&mut app, "A@dMin");
        type_text(&mut app, "admin123");
        press(&mut app, KeyCode::Enter);
        app.admin_cursor = 4;
        press(&mut app, KeyCode::Char('d'));
        assert!(app.confirm.is_some());
        press(&mut app, KeyCode::Char('n'));
        assert_eq!(app.status, "Jet deletion aborted.");
        assert_eq!(app.desk.catalog().count(), 5);
    }

    #[test]
    fn admin_removal_keeps_booking_cursor() {
        let mut app = app();
        login(&mut app, "A@dMin");
        type_text(&mut app, "admin123");
        press(&mut app, KeyCode::Enter);
        app.booking_cursor = 1;
        app.admin_cursor = 4;
        press(&mut app, KeyCode::Char('d'));
        press(&mut app, KeyCode::Char('y'));
        assert_eq!(app.desk.catalog().count(), 4);
        assert_eq!(app.admin_cursor, 3);
        assert_eq!(app.booking_cursor, 1);
    }

    #[test]
    fn reschedule_form_updates_duration() {
        let mut app = app();
        login(&mut app, "john_doe");
        app.screen = Screen::Bookings;
        press(&mut app, KeyCode::Char('r'));
        assert!(matches!(
            app.form.as_ref().map(|f| &f.kind),
            Some(FormKind::Reschedule { .. })
        ));
        press(&mut app, KeyCode::Backspace);
        type_text(&mut app, "3");
        press(&mut app, KeyCode::Enter);
        assert!(app.form.is_none());
        // Gulfstream G650 at 12,000/hr, one way.
        let booking = app.my_bookings()[0];
        assert_eq!(booking.duration_hours(), 3);
        assert_eq!(booking.total_cost(), 36_000.0);
    }

    #[test]
    fn cancelling_booking_needs_confirmation() {
        let mut app = app();
        login(&mut app, "john_doe");
        app.screen = Screen::Bookings;
        press(&mut app, KeyCode::Char('d'));
        assert!(app.confirm.is_some());
        press(&mut app, KeyCode::Char('n'));
        assert_eq!(app.my_bookings().len(), 1);

        press(&mut app, KeyCode::Char('d'));
        press(&mut app, KeyCode::Char('y'));
        assert!(app.my_bookings().is_empty());
        assert!(app.desk.catalog().by_index(0).unwrap().is_available());
    }
}
