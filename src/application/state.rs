//! Application state for the account area.
//!
//! The account area is a home list of workflows. Opening one starts a
//! navigation flow inside the overlay host; everything after that (drilling
//! into a chat, confirming a payment, backing out) goes through the
//! [`Session`].

use crate::application::{
    ConfirmationConfig, Dismissal, HostConfig, HostMode, LayoutSettings, Press, Session,
    Transition,
};
use crate::domain::{
    ApplicationDraft, ApplicationRef, ChatroomRef, Direction, FetchKind, FrameTicket, Job,
    LoaderEvent, NavError, Operation, Payload, PaymentIntent, ProfileField, RentalRef, StepKey,
};
use tracing::{debug, warn};

/// Actions carried by confirmation dialog buttons.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppAction {
    WithdrawApplication(String),
    EndRental(String),
    ConfirmPayment(PaymentIntent),
}

/// Workflows listed on the account home screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HomeEntry {
    Chats,
    TenantApplication,
    ApplicationReview,
    Rentals,
    Profile,
    Wallet,
    BookingPayment,
    Support,
}

impl HomeEntry {
    pub const ALL: [HomeEntry; 8] = [
        HomeEntry::Chats,
        HomeEntry::TenantApplication,
        HomeEntry::ApplicationReview,
        HomeEntry::Rentals,
        HomeEntry::Profile,
        HomeEntry::Wallet,
        HomeEntry::BookingPayment,
        HomeEntry::Support,
    ];

    pub fn label(self) -> &'static str {
        match self {
            HomeEntry::Chats => "Messages",
            HomeEntry::TenantApplication => "My rental application",
            HomeEntry::ApplicationReview => "Applications to review",
            HomeEntry::Rentals => "Manage rentals",
            HomeEntry::Profile => "Edit profile",
            HomeEntry::Wallet => "Wallet",
            HomeEntry::BookingPayment => "Pay for booking",
            HomeEntry::Support => "Help & support",
        }
    }
}

/// Main application state.
///
/// Background work is not started here. Calls that need data queue a
/// [`Job`]; the event loop drains them with [`App::take_jobs`], runs them
/// elsewhere and feeds the results back through
/// [`App::handle_loader_event`].
///
/// # Examples
///
/// ```
/// use navdeck::application::{App, HomeEntry};
/// use navdeck::domain::StepKey;
///
/// let mut app = App::default();
/// app.open_entry(HomeEntry::Chats);
/// assert_eq!(app.session.navigator().current_page(), Some(StepKey::Chats));
/// assert_eq!(app.take_jobs().len(), 1);
/// ```
#[derive(Debug)]
pub struct App {
    /// Navigator, host and dialog for the account area
    pub session: Session<AppAction>,
    /// Host sizing and breakpoint
    pub layout: LayoutSettings,
    /// Slide-in progress of the current frame
    pub transition: Transition,
    /// Highlighted entry on the home list
    pub home_selected: usize,
    /// Highlighted row inside the current frame
    pub list_selected: usize,
    /// Temporary status message to display
    pub status_message: Option<String>,
    /// Whether a user session is active
    pub signed_in: bool,
    /// Terminal width in columns
    pub viewport_width: u16,
    /// Terminal height in rows
    pub viewport_height: u16,
    /// Last row seen while dragging the bottom sheet handle
    pub drag_anchor: Option<u16>,
    pending_jobs: Vec<Job>,
    pending_operation: Option<Operation>,
    exit_remaining: Option<u8>,
}

impl Default for App {
    fn default() -> Self {
        Self::new(Session::default(), LayoutSettings::default())
    }
}

impl App {
    pub fn new(session: Session<AppAction>, layout: LayoutSettings) -> Self {
        Self {
            session,
            layout,
            transition: Transition::new(layout.transition_ticks),
            home_selected: 0,
            list_selected: 0,
            status_message: None,
            signed_in: true,
            viewport_width: 120,
            viewport_height: 40,
            drag_anchor: None,
            pending_jobs: Vec::new(),
            pending_operation: None,
            exit_remaining: None,
        }
    }

    pub fn update_viewport(&mut self, width: u16, height: u16) {
        self.viewport_width = width;
        self.viewport_height = height;
    }

    pub fn host_mode(&self) -> HostMode {
        HostMode::for_width(self.viewport_width, self.layout.breakpoint_cols)
    }

    /// True when no flow is on screen.
    pub fn is_home(&self) -> bool {
        !self.session.is_showing()
    }

    /// Frames kept on screen after the host closed, with ticks left.
    pub fn exit_progress(&self) -> Option<(u8, u8)> {
        self.exit_remaining
            .map(|remaining| (remaining, self.layout.transition_ticks.max(1)))
    }

    pub fn take_jobs(&mut self) -> Vec<Job> {
        std::mem::take(&mut self.pending_jobs)
    }

    /// Advances animations. Called once per event loop iteration.
    pub fn tick(&mut self) {
        self.transition.observe(self.session.navigator());
        self.transition.tick();

        let exiting = self.session.is_exiting();
        self.exit_remaining = match (exiting, self.exit_remaining) {
            (false, _) => None,
            (true, None) => Some(self.layout.transition_ticks),
            (true, Some(0)) => {
                self.session.finish_exit();
                None
            }
            (true, Some(n)) => Some(n - 1),
        };
    }

    pub fn move_home(&mut self, delta: isize) {
        self.home_selected = step_index(self.home_selected, delta, HomeEntry::ALL.len());
    }

    pub fn move_list(&mut self, delta: isize) {
        self.list_selected = step_index(self.list_selected, delta, self.current_list_len());
    }

    fn current_list_len(&self) -> usize {
        match self.session.navigator().data_passed() {
            Some(Payload::Chats(list)) => list.conversations.len(),
            Some(Payload::Chatroom(room)) => room.messages.len(),
            _ => 0,
        }
    }

    pub fn open_selected(&mut self) {
        if let Some(entry) = HomeEntry::ALL.get(self.home_selected).copied() {
            self.open_entry(entry);
        }
    }

    /// Starts the workflow behind a home entry.
    ///
    /// Signed-out users are sent to the auth step first.
    pub fn open_entry(&mut self, entry: HomeEntry) {
        self.status_message = None;
        self.list_selected = 0;

        if !self.signed_in && entry != HomeEntry::Support {
            self.start_flow(StepKey::Auth, None, HostConfig::new("Sign in").height(10), false);
            return;
        }

        match entry {
            HomeEntry::Chats => {
                if let Some(ticket) = self.start_flow(
                    StepKey::Chats,
                    None,
                    HostConfig::new("Your conversations").height(18),
                    false,
                ) {
                    self.queue_fetch(ticket, FetchKind::ChatList);
                }
            }
            HomeEntry::TenantApplication => {
                self.start_flow(
                    StepKey::TenantApplication,
                    Some(Payload::TenantApplication(ApplicationDraft {
                        listing_id: "lst-204".to_string(),
                        move_in: Some("2026-11-01".to_string()),
                        occupants: 2,
                    })),
                    HostConfig::new("Rental application form").height(24).width(72),
                    false,
                );
            }
            HomeEntry::ApplicationReview => {
                self.start_flow(
                    StepKey::ApplicationReview,
                    Some(Payload::ApplicationReview(ApplicationRef {
                        application_id: "app-88".to_string(),
                        applicant: "Jordan Reyes".to_string(),
                    })),
                    HostConfig::new("Review tenant application"),
                    false,
                );
            }
            HomeEntry::Rentals => {
                self.start_flow(
                    StepKey::RentalManagement,
                    Some(Payload::RentalManagement(RentalRef {
                        rental_id: "rent-12".to_string(),
                        property: "Loft on 5th Street".to_string(),
                    })),
                    HostConfig::new("Manage rental"),
                    false,
                );
            }
            HomeEntry::Profile => {
                self.start_flow(
                    StepKey::ProfileEdit,
                    Some(Payload::ProfileEdit(ProfileField {
                        field: "phone".to_string(),
                        current: "+1 555 0100".to_string(),
                    })),
                    HostConfig::new("Edit profile").height(12),
                    false,
                );
            }
            HomeEntry::Wallet => {
                if let Some(ticket) = self.start_flow(
                    StepKey::Wallet,
                    None,
                    HostConfig::new("Wallet balance").height(12),
                    false,
                ) {
                    self.queue_fetch(ticket, FetchKind::Wallet);
                }
            }
            HomeEntry::BookingPayment => {
                self.start_flow(
                    StepKey::BookingPayment,
                    Some(Payload::BookingPayment(default_payment())),
                    HostConfig::new("Booking payment").height(14),
                    false,
                );
            }
            HomeEntry::Support => self.deep_link_support(),
        }
    }

    fn start_flow(
        &mut self,
        step: StepKey,
        payload: Option<Payload>,
        host_config: HostConfig,
        locked: bool,
    ) -> Option<FrameTicket> {
        match self.session.open_flow(step, payload, host_config, locked) {
            Ok(ticket) => Some(ticket),
            Err(err) => {
                warn!(%step, error = %err, "could not open flow");
                self.status_message = Some(format!("Could not open {}: {}", step, err));
                None
            }
        }
    }

    fn queue_fetch(&mut self, ticket: FrameTicket, kind: FetchKind) {
        self.pending_jobs.push(Job::Fetch { ticket, kind });
    }

    /// Enter inside the host: follow the highlighted item one level deeper.
    pub fn drill_down(&mut self) {
        let Some(step) = self.session.navigator().current_page() else {
            return;
        };

        match step {
            StepKey::Chats => {
                let chat_id = match self.session.navigator().data_passed() {
                    Some(Payload::Chats(list)) => list
                        .conversations
                        .get(self.list_selected)
                        .map(|c| c.chat_id.clone()),
                    _ => None,
                };
                if let Some(chat_id) = chat_id {
                    self.open_chatroom(chat_id);
                }
            }
            StepKey::RentalManagement => {
                let chat_id = match self.session.navigator().data_passed() {
                    Some(Payload::RentalManagement(rental)) => format!("chat-{}", rental.rental_id),
                    _ => return,
                };
                self.open_chatroom(chat_id);
            }
            StepKey::ApplicationReview => {
                let draft = ApplicationDraft {
                    listing_id: "lst-204".to_string(),
                    move_in: None,
                    occupants: 1,
                };
                self.session.push_with(Payload::TenantApplication(draft));
                self.list_selected = 0;
            }
            StepKey::Wallet => {
                self.session.push_with(Payload::BookingPayment(default_payment()));
                self.list_selected = 0;
            }
            StepKey::ProfileEdit => {
                self.session.push(StepKey::Auth);
                self.list_selected = 0;
            }
            StepKey::Auth => {
                self.signed_in = true;
                self.status_message = Some("Signed in".to_string());
                self.go_back();
            }
            StepKey::Chatroom
            | StepKey::SupportPage
            | StepKey::TenantApplication
            | StepKey::BookingPayment => {}
        }
    }

    fn open_chatroom(&mut self, chat_id: String) {
        let ticket = self
            .session
            .push_with(Payload::Chatroom(ChatroomRef::new(chat_id.clone())));
        self.list_selected = 0;
        self.queue_fetch(ticket, FetchKind::Chatroom(chat_id));
    }

    pub fn go_back(&mut self) {
        self.session.pop();
        self.list_selected = 0;
    }

    /// Shows the support page in place, without a slide.
    pub fn deep_link_support(&mut self) {
        if self.session.is_showing() {
            self.session.jump(StepKey::SupportPage);
        } else if self
            .start_flow(StepKey::SupportPage, None, HostConfig::new("Help and support"), false)
            .is_some()
        {
            self.session.set_direction(Direction::None);
        }
        self.list_selected = 0;
    }

    /// Escape or a click outside the host.
    pub fn dismiss_outside(&mut self) -> Dismissal {
        let result = self.session.dismiss_outside();
        if result == Dismissal::Refused {
            self.status_message = Some("Please wait for the current action to finish".to_string());
        }
        result
    }

    /// Asks for confirmation of the destructive action on the current step.
    pub fn request_destructive(&mut self) {
        let config = match self.session.navigator().data_passed() {
            Some(Payload::TenantApplication(draft)) => ConfirmationConfig::new(
                "Withdraw application?",
                format!("Your application for {} will be withdrawn.", draft.listing_id),
            )
            .submit(
                "Withdraw",
                AppAction::WithdrawApplication(draft.listing_id.clone()),
            )
            .close("Keep it"),
            Some(Payload::RentalManagement(rental)) => ConfirmationConfig::new(
                "End rental?",
                format!("{} will be listed as available again.", rental.property),
            )
            .submit("End rental", AppAction::EndRental(rental.rental_id.clone()))
            .close("Cancel"),
            _ => return,
        };
        self.session.confirmation_mut().open_confirmation(config);
    }

    /// Asks for confirmation before charging the booking on screen.
    pub fn request_payment(&mut self) {
        let intent = match self.session.navigator().data_passed() {
            Some(Payload::BookingPayment(intent)) => intent.clone(),
            _ => return,
        };
        let config = ConfirmationConfig::new(
            format!("Pay for booking {}?", intent.booking_id),
            format!("{} will be charged to your card on file.", format_cents(intent.amount_cents)),
        )
        .submit("Pay now", AppAction::ConfirmPayment(intent))
        .close("Not yet");
        self.session.confirmation_mut().open_confirmation(config);
    }

    pub fn confirm_submit(&mut self) {
        if let Press::Accepted(Some(action)) = self.session.confirmation_mut().press_submit() {
            self.dispatch(action);
        }
    }

    pub fn confirm_close(&mut self) {
        if let Press::Accepted(Some(action)) = self.session.confirmation_mut().press_close() {
            self.dispatch(action);
        }
    }

    /// Runs a dialog action. Server work is queued and the dialog shows as
    /// loading until [`App::handle_loader_event`] sees the result.
    pub fn dispatch(&mut self, action: AppAction) {
        let operation = match action {
            AppAction::WithdrawApplication(listing_id) => Operation::WithdrawApplication(listing_id),
            AppAction::EndRental(rental_id) => Operation::EndRental(rental_id),
            AppAction::ConfirmPayment(intent) => {
                self.session.lock();
                Operation::PayBooking(intent)
            }
        };
        debug!(?operation, "dispatching");
        self.session.confirmation_mut().set_loading(true);
        self.pending_operation = Some(operation.clone());
        self.pending_jobs.push(Job::Perform(operation));
    }

    pub fn handle_loader_event(&mut self, event: LoaderEvent) {
        match event {
            LoaderEvent::Fetched { ticket, payload } => {
                match self.session.deliver(ticket, payload) {
                    Ok(()) => {}
                    Err(NavError::StaleFrame(id)) => {
                        debug!(frame = %id, "ignoring result for closed step");
                    }
                    Err(err) => warn!(error = %err, "rejected delivery"),
                }
            }
            LoaderEvent::FetchFailed { ticket, reason } => {
                if self.session.navigator().is_live(ticket) {
                    self.status_message = Some(format!("Could not load {}: {}", ticket.step, reason));
                }
            }
            LoaderEvent::Completed { operation, result } => {
                self.finish_operation(operation, result);
            }
        }
    }

    fn finish_operation(&mut self, operation: Operation, result: Result<String, String>) {
        if self.pending_operation.as_ref() != Some(&operation) {
            debug!(?operation, "ignoring result for abandoned operation");
            return;
        }
        self.pending_operation = None;

        if matches!(operation, Operation::PayBooking(_)) {
            self.session.unlock();
        }
        let dialog = self.session.confirmation_mut();
        dialog.set_loading(false);

        match result {
            Ok(message) => {
                dialog.close_confirmation();
                self.status_message = Some(message);
                self.go_back();
            }
            Err(reason) => {
                dialog.open_confirmation(ConfirmationConfig::new("Something went wrong", reason));
            }
        }
    }

    /// Ends the user session and tears down every overlay, including a
    /// locked payment host or a loading dialog.
    pub fn sign_out(&mut self) {
        self.session.force_close_all();
        self.pending_operation = None;
        self.signed_in = false;
        self.list_selected = 0;
        self.status_message = Some("Signed out".to_string());
    }

    pub fn toggle_session(&mut self) {
        if self.signed_in {
            self.sign_out();
        } else {
            self.open_entry(HomeEntry::Profile);
        }
    }
}

fn default_payment() -> PaymentIntent {
    PaymentIntent {
        booking_id: "bk-1042".to_string(),
        amount_cents: 48_000,
    }
}

pub fn format_cents(cents: i64) -> String {
    let sign = if cents < 0 { "-" } else { "" };
    let abs = cents.unsigned_abs();
    format!("{}${}.{:02}", sign, abs / 100, abs % 100)
}

fn step_index(current: usize, delta: isize, len: usize) -> usize {
    if len == 0 {
        return 0;
    }
    let max = len - 1;
    current.saturating_add_signed(delta).min(max)
}
