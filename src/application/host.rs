//! Open/lock state of the overlay that hosts the navigator's top frame.
//!
//! The same state drives both physical hosts: a side panel on wide
//! terminals and a draggable bottom sheet on narrow ones. Only the
//! dismissal gestures differ; the lock contract is identical.

use crate::domain::{NavError, NavResult};
use tracing::{debug, warn};

/// Per-open request sizing and labelling for the host.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct HostConfig {
    /// Sheet height in rows. Falls back to the configured percentage.
    pub height: Option<u16>,
    /// Panel width in columns. Falls back to the configured panel width.
    pub width: Option<u16>,
    /// Accessible description of the hosted content. Required.
    pub aria_label: String,
}

impl HostConfig {
    pub fn new(aria_label: impl Into<String>) -> Self {
        Self {
            aria_label: aria_label.into(),
            ..Self::default()
        }
    }

    pub fn height(mut self, rows: u16) -> Self {
        self.height = Some(rows);
        self
    }

    pub fn width(mut self, cols: u16) -> Self {
        self.width = Some(cols);
        self
    }

    pub fn validate(&self) -> NavResult<()> {
        if self.aria_label.trim().is_empty() {
            return Err(NavError::InvalidHostConfig(
                "aria label must not be empty".to_string(),
            ));
        }
        if self.height == Some(0) || self.width == Some(0) {
            return Err(NavError::InvalidHostConfig(
                "host size must be non-zero".to_string(),
            ));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostMode {
    SidePanel,
    BottomSheet,
}

impl HostMode {
    /// Narrow viewports get the bottom sheet.
    pub fn for_width(width: u16, breakpoint: u16) -> Self {
        if width < breakpoint {
            HostMode::BottomSheet
        } else {
            HostMode::SidePanel
        }
    }
}

/// Viewport-dependent sizing shared by every open request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayoutSettings {
    /// Terminals narrower than this get the bottom sheet.
    pub breakpoint_cols: u16,
    pub side_panel_width: u16,
    pub sheet_height_percent: u16,
    pub transition_ticks: u8,
}

impl Default for LayoutSettings {
    fn default() -> Self {
        Self {
            breakpoint_cols: 100,
            side_panel_width: 56,
            sheet_height_percent: 60,
            transition_ticks: 4,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HostState {
    Closed,
    OpenLocked,
    OpenUnlocked,
}

/// Result of a dismissal gesture against the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dismissal {
    /// The host closed.
    Closed,
    /// The host is locked; the gesture was suppressed.
    Refused,
    /// Nothing to do: the host was not open or the drag was too short.
    Ignored,
}

/// Overlay host state.
///
/// # Examples
///
/// ```
/// use navdeck::application::{Dismissal, Host, HostConfig, HostState};
///
/// let mut host = Host::new(3);
/// host.open(HostConfig::new("Booking payment"), true).unwrap();
/// assert_eq!(host.dismiss_outside(), Dismissal::Refused);
/// assert_eq!(host.state(), HostState::OpenLocked);
///
/// host.unlock();
/// assert_eq!(host.dismiss_outside(), Dismissal::Closed);
/// assert_eq!(host.state(), HostState::Closed);
/// ```
#[derive(Debug)]
pub struct Host {
    open: bool,
    close_on_interact_outside: bool,
    config: HostConfig,
    drag_offset: u16,
    drag_close_threshold: u16,
}

impl Default for Host {
    fn default() -> Self {
        Self::new(3)
    }
}

impl Host {
    pub fn new(drag_close_threshold: u16) -> Self {
        Self {
            open: false,
            close_on_interact_outside: true,
            config: HostConfig::default(),
            drag_offset: 0,
            drag_close_threshold: drag_close_threshold.max(1),
        }
    }

    /// Opens the host with `config`, locked or not as the caller decides.
    ///
    /// Opening an already open host replaces its config but can only add a
    /// lock, never lift one; that takes [`Host::unlock`] or [`Host::close`].
    ///
    /// # Errors
    ///
    /// Returns [`NavError::InvalidHostConfig`] and leaves the host untouched
    /// when the config has no ARIA label or a zero size.
    pub fn open(&mut self, config: HostConfig, locked: bool) -> NavResult<()> {
        config.validate()?;
        debug!(label = %config.aria_label, locked, "host opened");
        self.config = config;
        self.close_on_interact_outside = if self.open {
            self.close_on_interact_outside && !locked
        } else {
            !locked
        };
        self.drag_offset = 0;
        self.open = true;
        Ok(())
    }

    /// Closes the host regardless of the lock. The lock resets to its
    /// default so the next open starts unlocked unless asked otherwise.
    pub fn close(&mut self) {
        if self.open {
            debug!(label = %self.config.aria_label, "host closed");
        }
        self.open = false;
        self.close_on_interact_outside = true;
        self.drag_offset = 0;
    }

    pub fn lock(&mut self) {
        self.close_on_interact_outside = false;
        self.drag_offset = 0;
    }

    pub fn unlock(&mut self) {
        self.close_on_interact_outside = true;
    }

    /// Click or tap outside the host.
    pub fn dismiss_outside(&mut self) -> Dismissal {
        if !self.open {
            return Dismissal::Ignored;
        }
        if !self.close_on_interact_outside {
            warn!(label = %self.config.aria_label, "outside dismiss refused while locked");
            return Dismissal::Refused;
        }
        self.close();
        Dismissal::Closed
    }

    /// Moves the sheet by `rows` (positive is down). Suppressed while locked.
    pub fn drag_by(&mut self, rows: i32) {
        if !self.open || !self.close_on_interact_outside {
            return;
        }
        let next = i32::from(self.drag_offset) + rows;
        self.drag_offset = u16::try_from(next.max(0)).unwrap_or(u16::MAX);
    }

    /// Ends a drag. Past the threshold the sheet closes, otherwise it snaps
    /// back.
    pub fn release_drag(&mut self) -> Dismissal {
        if !self.open {
            return Dismissal::Ignored;
        }
        if !self.close_on_interact_outside {
            self.drag_offset = 0;
            return Dismissal::Refused;
        }
        if self.drag_offset >= self.drag_close_threshold {
            self.close();
            return Dismissal::Closed;
        }
        self.drag_offset = 0;
        Dismissal::Ignored
    }

    pub fn state(&self) -> HostState {
        match (self.open, self.close_on_interact_outside) {
            (false, _) => HostState::Closed,
            (true, false) => HostState::OpenLocked,
            (true, true) => HostState::OpenUnlocked,
        }
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn is_locked(&self) -> bool {
        !self.close_on_interact_outside
    }

    pub fn close_on_interact_outside(&self) -> bool {
        self.close_on_interact_outside
    }

    pub fn config(&self) -> &HostConfig {
        &self.config
    }

    pub fn drag_offset(&self) -> u16 {
        self.drag_offset
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn open_host(locked: bool) -> Host {
        let mut host = Host::new(3);
        host.open(HostConfig::new("Chats"), locked).unwrap();
        host
    }

    #[test]
    fn test_host_default() {
        let host = Host::default();
        assert_eq!(host.state(), HostState::Closed);
        assert!(host.close_on_interact_outside());
        assert_eq!(host.drag_offset(), 0);
    }

    #[test]
    fn test_open_requires_aria_label() {
        let mut host = Host::default();
        let result = host.open(HostConfig::new("   "), false);

        assert!(matches!(result, Err(NavError::InvalidHostConfig(_))));
        assert_eq!(host.state(), HostState::Closed);
    }

    #[test]
    fn test_open_rejects_zero_size() {
        let mut host = Host::default();
        assert!(host.open(HostConfig::new("Wallet").height(0), false).is_err());
        assert!(host.open(HostConfig::new("Wallet").width(0), false).is_err());
        assert!(!host.is_open());
    }

    #[test]
    fn test_open_keeps_caller_sizes() {
        let mut host = Host::default();
        host.open(HostConfig::new("Application").height(30).width(70), false)
            .unwrap();

        assert_eq!(host.config().height, Some(30));
        assert_eq!(host.config().width, Some(70));
    }

    #[test]
    fn test_unlocked_outside_dismiss_closes() {
        let mut host = open_host(false);
        assert_eq!(host.state(), HostState::OpenUnlocked);
        assert_eq!(host.dismiss_outside(), Dismissal::Closed);
        assert_eq!(host.state(), HostState::Closed);
    }

    #[test]
    fn test_locked_outside_dismiss_refused() {
        let mut host = open_host(true);
        assert_eq!(host.dismiss_outside(), Dismissal::Refused);
        assert_eq!(host.dismiss_outside(), Dismissal::Refused);
        assert_eq!(host.state(), HostState::OpenLocked);
    }

    #[test]
    fn test_lock_flips_in_place() {
        let mut host = open_host(false);
        host.lock();
        assert_eq!(host.state(), HostState::OpenLocked);
        host.unlock();
        assert_eq!(host.state(), HostState::OpenUnlocked);
        assert!(host.is_open());
    }

    #[test]
    fn test_close_overrides_lock() {
        let mut host = open_host(true);
        host.close();
        assert_eq!(host.state(), HostState::Closed);
        // Lock does not leak into the next open
        assert!(host.close_on_interact_outside());
    }

    #[test]
    fn test_reopen_keeps_lock() {
        let mut host = open_host(true);
        host.open(HostConfig::new("Support"), false).unwrap();
        assert_eq!(host.state(), HostState::OpenLocked);
        assert_eq!(host.config().aria_label, "Support");
        assert_eq!(host.dismiss_outside(), Dismissal::Refused);

        // Reopening can still add a lock
        let mut host = open_host(false);
        host.open(HostConfig::new("Payment"), true).unwrap();
        assert_eq!(host.state(), HostState::OpenLocked);
    }

    #[test]
    fn test_dismiss_when_closed() {
        let mut host = Host::default();
        assert_eq!(host.dismiss_outside(), Dismissal::Ignored);
        assert_eq!(host.release_drag(), Dismissal::Ignored);
    }

    #[test]
    fn test_drag_past_threshold_closes() {
        let mut host = open_host(false);
        host.drag_by(2);
        host.drag_by(2);
        assert_eq!(host.drag_offset(), 4);
        assert_eq!(host.release_drag(), Dismissal::Closed);
        assert!(!host.is_open());
    }

    #[test]
    fn test_short_drag_snaps_back() {
        let mut host = open_host(false);
        host.drag_by(2);
        assert_eq!(host.release_drag(), Dismissal::Ignored);
        assert_eq!(host.drag_offset(), 0);
        assert!(host.is_open());
    }

    #[test]
    fn test_drag_up_never_negative() {
        let mut host = open_host(false);
        host.drag_by(-5);
        assert_eq!(host.drag_offset(), 0);
    }

    #[test]
    fn test_locked_drag_is_suppressed() {
        let mut host = open_host(true);
        host.drag_by(10);
        assert_eq!(host.drag_offset(), 0);
        assert_eq!(host.release_drag(), Dismissal::Refused);
        assert_eq!(host.state(), HostState::OpenLocked);
    }

    #[test]
    fn test_mode_breakpoint() {
        assert_eq!(HostMode::for_width(79, 80), HostMode::BottomSheet);
        assert_eq!(HostMode::for_width(80, 80), HostMode::SidePanel);
        assert_eq!(HostMode::for_width(200, 80), HostMode::SidePanel);
    }
}
