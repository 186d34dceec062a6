//! Root controller tying the navigator, confirmation dialog and host
//! together. One `Session` is built at startup and passed to whoever needs
//! it; there are no globals.

use crate::application::{
    ConfirmationController, Dismissal, Host, HostConfig, HostState, Navigator,
};
use crate::domain::{Direction, FrameTicket, NavError, NavResult, Payload, StepKey};
use tracing::info;

/// Navigation session for the account area.
///
/// Keeps the invariant that an open host always has at least one frame:
/// popping the last frame closes the host. Closing the host by gesture or
/// [`Session::close`] keeps the frames around so the exit can still render
/// them until [`Session::finish_exit`] is called. Frames pushed while the
/// host is closed, before any open, are kept for the next open.
#[derive(Debug)]
pub struct Session<A> {
    navigator: Navigator,
    confirmation: ConfirmationController<A>,
    host: Host,
    exiting: bool,
}

impl<A: Clone> Default for Session<A> {
    fn default() -> Self {
        Self::new(Host::default())
    }
}

impl<A: Clone> Session<A> {
    pub fn new(host: Host) -> Self {
        Self {
            navigator: Navigator::new(),
            confirmation: ConfirmationController::new(),
            host,
            exiting: false,
        }
    }

    /// Starts a workflow: drops frames left over from a previous exit,
    /// pushes the first step and opens the host. Opening over an already
    /// open host never lifts its lock.
    ///
    /// # Errors
    ///
    /// Fails without changing anything when `payload` belongs to a
    /// different step than `step`, or when `host_config` is invalid.
    pub fn open_flow(
        &mut self,
        step: StepKey,
        payload: Option<Payload>,
        host_config: HostConfig,
        locked: bool,
    ) -> NavResult<FrameTicket> {
        if let Some(found) = payload.as_ref().map(Payload::step) {
            if found != step {
                return Err(NavError::PayloadMismatch {
                    expected: step,
                    found,
                });
            }
        }
        host_config.validate()?;

        if self.exiting {
            self.navigator.reset();
            self.exiting = false;
        }
        let ticket = match payload {
            Some(payload) => self.navigator.push_with(payload),
            None => self.navigator.push(step),
        };
        self.host.open(host_config, locked)?;
        Ok(ticket)
    }

    /// Shows the host over the frames already on the stack.
    ///
    /// # Errors
    ///
    /// [`NavError::EmptyStack`] when there is nothing to show, frames kept
    /// only for an exit included, or [`NavError::InvalidHostConfig`] for a
    /// bad config.
    pub fn open(&mut self, host_config: HostConfig, locked: bool) -> NavResult<()> {
        host_config.validate()?;
        if self.exiting || self.navigator.is_empty() {
            return Err(NavError::EmptyStack);
        }
        self.host.open(host_config, locked)
    }

    /// Closes the host even while locked. The frames stay until
    /// [`Session::finish_exit`].
    pub fn close(&mut self) {
        self.host.close();
        self.exiting = !self.navigator.is_empty();
    }

    pub fn push(&mut self, step: StepKey) -> FrameTicket {
        self.navigator.push(step)
    }

    pub fn push_with(&mut self, payload: Payload) -> FrameTicket {
        self.navigator.push_with(payload)
    }

    pub fn jump(&mut self, step: StepKey) -> FrameTicket {
        self.navigator.jump(step)
    }

    pub fn jump_with(&mut self, payload: Payload) -> FrameTicket {
        self.navigator.jump_with(payload)
    }

    /// Goes back one step. Leaving the last step closes the host.
    pub fn pop(&mut self) {
        self.navigator.pop();
        if self.navigator.is_empty() {
            self.host.close();
            self.exiting = false;
        }
    }

    pub fn set_direction(&mut self, direction: Direction) {
        self.navigator.set_direction(direction);
    }

    /// See [`Navigator::deliver`].
    pub fn deliver(&mut self, ticket: FrameTicket, payload: Payload) -> NavResult<()> {
        self.navigator.deliver(ticket, payload)
    }

    pub fn lock(&mut self) {
        self.host.lock();
    }

    pub fn unlock(&mut self) {
        self.host.unlock();
    }

    /// Outside click against the host. The dialog, when open, sits above the
    /// host and takes the gesture instead.
    pub fn dismiss_outside(&mut self) -> Dismissal {
        if self.confirmation.is_open() {
            return if self.confirmation.dismiss_outside().is_ignored() {
                Dismissal::Refused
            } else {
                Dismissal::Closed
            };
        }
        let result = self.host.dismiss_outside();
        self.note_gesture(result)
    }

    pub fn drag_by(&mut self, rows: i32) {
        self.host.drag_by(rows);
    }

    pub fn release_drag(&mut self) -> Dismissal {
        let result = self.host.release_drag();
        self.note_gesture(result)
    }

    fn note_gesture(&mut self, result: Dismissal) -> Dismissal {
        if result == Dismissal::Closed {
            self.exiting = !self.navigator.is_empty();
        }
        result
    }

    /// Clears frames retained for the exit once the host is fully closed.
    pub fn finish_exit(&mut self) {
        if self.exiting && !self.host.is_open() {
            self.navigator.reset();
        }
        self.exiting = false;
    }

    /// True while the host is closed but its frames are kept for the exit.
    pub fn is_exiting(&self) -> bool {
        self.exiting
    }

    /// Tears down the navigator, host and dialog together, ignoring any
    /// lock or in-flight loading. Used on sign-out and auth failure.
    pub fn force_close_all(&mut self) {
        info!(
            frames = self.navigator.len(),
            host = ?self.host.state(),
            dialog_open = self.confirmation.is_open(),
            "force closing session overlays"
        );
        self.navigator.reset();
        self.host.close();
        self.confirmation.reset();
        self.exiting = false;
    }

    /// True when the host is open and has a frame to show.
    pub fn is_showing(&self) -> bool {
        self.host.is_open() && !self.navigator.is_empty()
    }

    pub fn host_state(&self) -> HostState {
        self.host.state()
    }

    pub fn navigator(&self) -> &Navigator {
        &self.navigator
    }

    pub fn host(&self) -> &Host {
        &self.host
    }

    pub fn confirmation(&self) -> &ConfirmationController<A> {
        &self.confirmation
    }

    pub fn confirmation_mut(&mut self) -> &mut ConfirmationController<A> {
        &mut self.confirmation
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ConfirmationConfig;
    use crate::domain::{ChatList, ChatroomRef, ConversationSummary, PaymentIntent};

    type TestSession = Session<&'static str>;

    fn chats_config() -> HostConfig {
        HostConfig::new("Your conversations")
    }

    #[test]
    fn test_open_flow_opens_host() {
        let mut session = TestSession::default();
        session.open_flow(StepKey::Chats, None, chats_config(), false).unwrap();

        assert!(session.is_showing());
        assert_eq!(session.host_state(), HostState::OpenUnlocked);
        assert_eq!(session.navigator().current_page(), Some(StepKey::Chats));
    }

    #[test]
    fn test_open_flow_rejects_mismatched_payload() {
        let mut session = TestSession::default();
        let result = session.open_flow(
            StepKey::Wallet,
            Some(Payload::Chats(ChatList::default())),
            chats_config(),
            false,
        );

        assert!(matches!(result, Err(NavError::PayloadMismatch { .. })));
        assert!(session.navigator().is_empty());
        assert_eq!(session.host_state(), HostState::Closed);
    }

    #[test]
    fn test_open_flow_invalid_host_leaves_stack_alone() {
        let mut session = TestSession::default();
        let result = session.open_flow(StepKey::Chats, None, HostConfig::default(), false);

        assert!(result.is_err());
        assert!(session.navigator().is_empty());
    }

    #[test]
    fn test_open_flow_drops_retained_frames() {
        let mut session = TestSession::default();
        session.open_flow(StepKey::Chats, None, chats_config(), false).unwrap();
        session.push(StepKey::Chatroom);
        assert_eq!(session.dismiss_outside(), Dismissal::Closed);
        // Retained for the exit animation
        assert_eq!(session.navigator().len(), 2);

        session
            .open_flow(StepKey::Wallet, None, HostConfig::new("Wallet"), false)
            .unwrap();
        assert_eq!(session.navigator().len(), 1);
        assert_eq!(session.navigator().current_page(), Some(StepKey::Wallet));
    }

    #[test]
    fn test_open_flow_while_open_stacks() {
        let mut session = TestSession::default();
        session.open_flow(StepKey::Chats, None, chats_config(), false).unwrap();
        session
            .open_flow(StepKey::SupportPage, None, HostConfig::new("Support"), false)
            .unwrap();

        assert_eq!(session.navigator().len(), 2);
        assert_eq!(session.navigator().previous_page(), Some(StepKey::Chats));
    }

    #[test]
    fn test_open_over_prepopulated_stack() {
        let mut session = TestSession::default();
        session.push(StepKey::Chats);
        session.push(StepKey::Chatroom);
        assert!(!session.is_showing());

        session.open(chats_config(), false).unwrap();
        assert!(session.is_showing());
        assert_eq!(session.navigator().len(), 2);
        assert_eq!(session.navigator().previous_page(), Some(StepKey::Chats));
    }

    #[test]
    fn test_open_flow_keeps_prepopulated_frames() {
        let mut session = TestSession::default();
        session.push(StepKey::Chats);
        session.push(StepKey::Chatroom);

        session
            .open_flow(StepKey::SupportPage, None, HostConfig::new("Support"), false)
            .unwrap();
        assert_eq!(session.navigator().len(), 3);
        assert_eq!(session.navigator().previous_page(), Some(StepKey::Chatroom));
    }

    #[test]
    fn test_open_empty_stack_refused() {
        let mut session = TestSession::default();
        assert_eq!(session.open(chats_config(), false), Err(NavError::EmptyStack));
        assert_eq!(session.host_state(), HostState::Closed);
    }

    #[test]
    fn test_finish_exit_keeps_prepopulated_frames() {
        let mut session = TestSession::default();
        session.push(StepKey::Wallet);
        session.finish_exit();
        assert_eq!(session.navigator().len(), 1);
        assert!(!session.is_exiting());
    }

    #[test]
    fn test_open_flow_never_lifts_lock() {
        let mut session = TestSession::default();
        session
            .open_flow(
                StepKey::BookingPayment,
                Some(Payload::BookingPayment(PaymentIntent {
                    booking_id: "b1".to_string(),
                    amount_cents: 48_000,
                })),
                HostConfig::new("Pay for booking"),
                true,
            )
            .unwrap();
        session
            .open_flow(StepKey::SupportPage, None, HostConfig::new("Support"), false)
            .unwrap();

        assert_eq!(session.dismiss_outside(), Dismissal::Refused);
        assert_eq!(session.host_state(), HostState::OpenLocked);
    }

    #[test]
    fn test_close_while_locked() {
        let mut session = TestSession::default();
        session.open_flow(StepKey::Chats, None, chats_config(), true).unwrap();
        session.push(StepKey::Chatroom);
        session
            .confirmation_mut()
            .open_confirmation(ConfirmationConfig::new("Leave chat?", "Drafts are lost"));

        session.close();
        assert_eq!(session.host_state(), HostState::Closed);
        assert!(session.is_exiting());
        // Frames stay for the exit, the dialog is left to its owner
        assert_eq!(session.navigator().len(), 2);
        assert!(session.confirmation().is_open());

        session.finish_exit();
        assert!(session.navigator().is_empty());
    }

    #[test]
    fn test_open_during_exit_refused() {
        let mut session = TestSession::default();
        session.open_flow(StepKey::Chats, None, chats_config(), false).unwrap();
        session.push(StepKey::Chatroom);
        session.dismiss_outside();
        assert!(session.is_exiting());

        assert_eq!(session.open(chats_config(), false), Err(NavError::EmptyStack));
        assert_eq!(session.host_state(), HostState::Closed);
        assert_eq!(session.navigator().len(), 2);
    }

    #[test]
    fn test_finish_exit_clears_after_close() {
        let mut session = TestSession::default();
        session.open_flow(StepKey::Chats, None, chats_config(), false).unwrap();

        session.finish_exit();
        assert_eq!(session.navigator().len(), 1);

        session.dismiss_outside();
        session.finish_exit();
        assert!(session.navigator().is_empty());
    }

    #[test]
    fn test_pop_last_frame_closes_host() {
        let mut session = TestSession::default();
        session.open_flow(StepKey::Chats, None, chats_config(), false).unwrap();
        session.push(StepKey::Chatroom);

        session.pop();
        assert!(session.is_showing());

        session.pop();
        assert!(!session.is_showing());
        assert_eq!(session.host_state(), HostState::Closed);

        // Mashing back on an empty stack stays quiet
        session.pop();
        session.pop();
        assert!(session.navigator().is_empty());
    }

    #[test]
    fn test_lock_then_dismiss() {
        let mut session = TestSession::default();
        session.open_flow(StepKey::Chats, None, chats_config(), false).unwrap();

        session.lock();
        assert_eq!(session.dismiss_outside(), Dismissal::Refused);
        assert!(session.host().is_open());

        session.unlock();
        assert_eq!(session.dismiss_outside(), Dismissal::Closed);
        assert!(!session.host().is_open());
    }

    #[test]
    fn test_force_close_all_while_locked() {
        let mut session = TestSession::default();
        session
            .open_flow(
                StepKey::BookingPayment,
                Some(Payload::BookingPayment(PaymentIntent {
                    booking_id: "b1".to_string(),
                    amount_cents: 48_000,
                })),
                HostConfig::new("Pay for booking"),
                true,
            )
            .unwrap();
        session
            .confirmation_mut()
            .open_confirmation(ConfirmationConfig::new("Paying", "Please wait"));
        session.confirmation_mut().set_loading(true);

        session.force_close_all();

        assert_eq!(session.host_state(), HostState::Closed);
        assert!(session.navigator().is_empty());
        assert!(!session.confirmation().is_open());
        assert!(!session.confirmation().is_loading());
    }

    #[test]
    fn test_dialog_takes_outside_dismiss_first() {
        let mut session = TestSession::default();
        session.open_flow(StepKey::Chats, None, chats_config(), false).unwrap();
        session
            .confirmation_mut()
            .open_confirmation(ConfirmationConfig::new("Delete chat?", "Cannot be undone"));

        assert_eq!(session.dismiss_outside(), Dismissal::Closed);
        assert!(!session.confirmation().is_open());
        assert!(session.host().is_open());
    }

    #[test]
    fn test_loading_dialog_blocks_outside_dismiss() {
        let mut session = TestSession::default();
        session.open_flow(StepKey::Chats, None, chats_config(), false).unwrap();
        session
            .confirmation_mut()
            .open_confirmation(ConfirmationConfig::new("Deleting", "..."));
        session.confirmation_mut().set_loading(true);

        assert_eq!(session.dismiss_outside(), Dismissal::Refused);
        assert!(session.confirmation().is_open());
        assert!(session.host().is_open());
    }

    #[test]
    fn test_chat_list_arrives_after_push() {
        let mut session = TestSession::default();
        let ticket = session
            .open_flow(StepKey::Chats, None, chats_config(), false)
            .unwrap();
        assert!(session.navigator().data_passed().is_none());

        let list = ChatList {
            conversations: vec![ConversationSummary {
                chat_id: "c1".to_string(),
                counterpart: "Maya".to_string(),
                last_message: "Is parking included?".to_string(),
                unread: 2,
            }],
        };
        session.deliver(ticket, Payload::Chats(list.clone())).unwrap();

        assert_eq!(session.navigator().data_passed(), Some(&Payload::Chats(list)));
    }

    #[test]
    fn test_chatroom_result_after_pop_is_dropped() {
        let mut session = TestSession::default();
        session.open_flow(StepKey::Chats, None, chats_config(), false).unwrap();
        let ticket = session.push_with(Payload::Chatroom(ChatroomRef::new("c1")));
        session.pop();

        let result = session.deliver(ticket, Payload::Chatroom(ChatroomRef::new("c1")));
        assert_eq!(result, Err(NavError::StaleFrame(ticket.id)));
        assert_eq!(session.navigator().current_page(), Some(StepKey::Chats));
        assert!(session.navigator().data_passed().is_none());
    }
}
