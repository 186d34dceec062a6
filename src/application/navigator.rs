//! View-stack navigator driving every multi-step account workflow.
//!
//! The navigator owns an ordered list of frames. Frames are only ever
//! appended to or removed from the top, and only the top two frames and the
//! stack length are observable from outside.

use crate::domain::{
    Direction, Frame, FrameId, FrameTicket, NavError, NavResult, Payload, StepKey,
};
use std::collections::HashMap;
use tracing::{debug, warn};

/// Stack of active steps plus the transition direction of the last change.
///
/// Payloads attached at push time are never modified. Data that arrives
/// later (a fetched chat thread, a refreshed wallet) is recorded with
/// [`Navigator::deliver`] against the frame's ticket and shadows the pushed
/// payload in [`Navigator::data_passed`].
///
/// # Examples
///
/// ```
/// use navdeck::application::Navigator;
/// use navdeck::domain::{Direction, StepKey};
///
/// let mut nav = Navigator::new();
/// nav.push(StepKey::Chats);
/// nav.push(StepKey::Chatroom);
/// assert_eq!(nav.current_page(), Some(StepKey::Chatroom));
/// assert_eq!(nav.previous_page(), Some(StepKey::Chats));
///
/// nav.pop();
/// assert_eq!(nav.current_page(), Some(StepKey::Chats));
/// assert_eq!(nav.direction(), Direction::Backward);
/// ```
#[derive(Debug, Default)]
pub struct Navigator {
    frames: Vec<Frame>,
    delivered: HashMap<FrameId, Payload>,
    direction: Direction,
    last_id: u64,
}

impl Navigator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pushes a step without a payload and marks the transition as forward.
    ///
    /// Pushing is always legal, including re-pushing the step that is
    /// already on top; each push creates an independent frame.
    pub fn push(&mut self, step: StepKey) -> FrameTicket {
        self.push_frame(step, None, Direction::Forward)
    }

    /// Pushes the step the payload belongs to, carrying the payload.
    pub fn push_with(&mut self, payload: Payload) -> FrameTicket {
        self.push_frame(payload.step(), Some(payload), Direction::Forward)
    }

    /// Pushes a step without a sliding transition.
    ///
    /// Used for deep links (e.g. straight to the support page) where the
    /// view should appear in place.
    pub fn jump(&mut self, step: StepKey) -> FrameTicket {
        self.push_frame(step, None, Direction::None)
    }

    /// Like [`Navigator::jump`], carrying a payload.
    pub fn jump_with(&mut self, payload: Payload) -> FrameTicket {
        self.push_frame(payload.step(), Some(payload), Direction::None)
    }

    fn push_frame(
        &mut self,
        step: StepKey,
        payload: Option<Payload>,
        direction: Direction,
    ) -> FrameTicket {
        self.last_id += 1;
        let id = FrameId::new(self.last_id);
        self.frames.push(Frame { id, step, payload });
        self.direction = direction;
        debug!(frame = %id, %step, depth = self.frames.len(), "push");
        FrameTicket { id, step }
    }

    /// Removes the top frame and marks the transition as backward.
    ///
    /// Popping an empty stack is a no-op and leaves the direction alone.
    /// Any payload delivered to the popped frame is discarded with it.
    pub fn pop(&mut self) -> Option<Frame> {
        let frame = self.frames.pop()?;
        self.delivered.remove(&frame.id);
        self.direction = Direction::Backward;
        debug!(frame = %frame.id, step = %frame.step, depth = self.frames.len(), "pop");
        Some(frame)
    }

    /// Overrides the transition direction without touching the stack.
    pub fn set_direction(&mut self, direction: Direction) {
        self.direction = direction;
    }

    /// Drops every frame and delivered payload.
    ///
    /// Frame ids keep increasing across resets so tickets handed out before
    /// the reset can never match a later frame.
    pub fn reset(&mut self) {
        if !self.frames.is_empty() {
            debug!(dropped = self.frames.len(), "reset navigator");
        }
        self.frames.clear();
        self.delivered.clear();
        self.direction = Direction::None;
    }

    /// Records data that arrived after the frame was pushed.
    ///
    /// # Errors
    ///
    /// Returns [`NavError::StaleFrame`] when the frame has been popped or
    /// reset away; the payload is dropped. Returns
    /// [`NavError::PayloadMismatch`] when the payload belongs to another step.
    pub fn deliver(&mut self, ticket: FrameTicket, payload: Payload) -> NavResult<()> {
        if !self.is_live(ticket) {
            warn!(frame = %ticket.id, step = %ticket.step, "dropping stale delivery");
            return Err(NavError::StaleFrame(ticket.id));
        }
        if payload.step() != ticket.step {
            return Err(NavError::PayloadMismatch {
                expected: ticket.step,
                found: payload.step(),
            });
        }
        debug!(frame = %ticket.id, step = %ticket.step, "delivered payload");
        self.delivered.insert(ticket.id, payload);
        Ok(())
    }

    /// Whether the ticket's frame is still somewhere on the stack.
    pub fn is_live(&self, ticket: FrameTicket) -> bool {
        self.frames.iter().any(|f| f.id == ticket.id)
    }

    /// Whether the ticket's frame is the top frame.
    pub fn is_current(&self, ticket: FrameTicket) -> bool {
        self.frames.last().is_some_and(|f| f.id == ticket.id)
    }

    pub fn current_page(&self) -> Option<StepKey> {
        self.frames.last().map(|f| f.step)
    }

    pub fn previous_page(&self) -> Option<StepKey> {
        self.frames.iter().rev().nth(1).map(|f| f.step)
    }

    pub fn current_ticket(&self) -> Option<FrameTicket> {
        self.frames.last().map(|f| FrameTicket {
            id: f.id,
            step: f.step,
        })
    }

    /// Payload of the top frame: the latest delivery if any, otherwise
    /// whatever was pushed with it.
    pub fn data_passed(&self) -> Option<&Payload> {
        let top = self.frames.last()?;
        self.delivered.get(&top.id).or(top.payload.as_ref())
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}
