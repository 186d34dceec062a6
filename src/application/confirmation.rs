//! Single app-wide confirmation dialog.
//!
//! There is at most one dialog. Opening it while it is already open replaces
//! its configuration; there is no queue. While `loading` is set the dialog
//! cannot be dismissed and neither button responds.

use tracing::{debug, warn};

const DEFAULT_CLOSE_TEXT: &str = "done";
const DEFAULT_SUBMIT_TEXT: &str = "confirm";

/// What a caller asks the dialog to show.
///
/// `A` is the caller's action type. Actions are handed back when the
/// matching button is pressed and the caller dispatches them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfirmationConfig<A> {
    pub title: String,
    pub description: String,
    pub submit_btn_text: Option<String>,
    pub submit_btn_action: Option<A>,
    pub disable_submit_btn: bool,
    pub close_btn_text: Option<String>,
    pub close_btn_action: Option<A>,
    pub disable_close_btn: bool,
    pub loading: bool,
}

impl<A> Default for ConfirmationConfig<A> {
    fn default() -> Self {
        Self {
            title: String::new(),
            description: String::new(),
            submit_btn_text: None,
            submit_btn_action: None,
            disable_submit_btn: false,
            close_btn_text: None,
            close_btn_action: None,
            disable_close_btn: false,
            loading: false,
        }
    }
}

impl<A> ConfirmationConfig<A> {
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            ..Self::default()
        }
    }

    pub fn submit(mut self, text: impl Into<String>, action: A) -> Self {
        self.submit_btn_text = Some(text.into());
        self.submit_btn_action = Some(action);
        self
    }

    pub fn close(mut self, text: impl Into<String>) -> Self {
        self.close_btn_text = Some(text.into());
        self
    }

    pub fn close_action(mut self, action: A) -> Self {
        self.close_btn_action = Some(action);
        self
    }

    pub fn disable_submit(mut self, disabled: bool) -> Self {
        self.disable_submit_btn = disabled;
        self
    }

    pub fn disable_close(mut self, disabled: bool) -> Self {
        self.disable_close_btn = disabled;
        self
    }
}

/// Outcome of a button press or dismiss gesture.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Press<A> {
    /// The gesture was refused; nothing changed.
    Ignored,
    /// The gesture went through, carrying the button's action if it has one.
    Accepted(Option<A>),
}

impl<A> Press<A> {
    pub fn is_ignored(&self) -> bool {
        matches!(self, Press::Ignored)
    }
}

/// Holder for the dialog's configuration and open state.
///
/// # Examples
///
/// ```
/// use navdeck::application::{ConfirmationConfig, ConfirmationController, Press};
///
/// let mut dialog = ConfirmationController::new();
/// dialog.open_confirmation(
///     ConfirmationConfig::new("End rental?", "The tenant will be notified.")
///         .submit("End rental", "end-rental"),
/// );
///
/// dialog.set_loading(true);
/// assert!(dialog.press_close().is_ignored());
/// assert!(dialog.is_open());
///
/// dialog.set_loading(false);
/// assert_eq!(dialog.press_close(), Press::Accepted(None));
/// assert!(!dialog.is_open());
/// ```
#[derive(Debug)]
pub struct ConfirmationController<A> {
    open: bool,
    config: ConfirmationConfig<A>,
}

impl<A> Default for ConfirmationController<A> {
    fn default() -> Self {
        Self {
            open: false,
            config: ConfirmationConfig::default(),
        }
    }
}

impl<A: Clone> ConfirmationController<A> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Shows the dialog with `config`, replacing whatever was there.
    pub fn open_confirmation(&mut self, config: ConfirmationConfig<A>) {
        if self.open {
            debug!(replaced = %self.config.title, title = %config.title, "confirmation replaced");
        } else {
            debug!(title = %config.title, "confirmation opened");
        }
        self.config = config;
        self.open = true;
    }

    /// Hides the dialog unconditionally and clears `loading`.
    ///
    /// This is the programmatic close used once an action has finished or
    /// when everything is being torn down; gestures go through
    /// [`ConfirmationController::press_close`] and
    /// [`ConfirmationController::dismiss_outside`] instead.
    pub fn close_confirmation(&mut self) {
        self.open = false;
        self.config.loading = false;
    }

    /// Closes the dialog and forgets its configuration.
    pub fn reset(&mut self) {
        self.open = false;
        self.config = ConfirmationConfig::default();
    }

    pub fn set_loading(&mut self, loading: bool) {
        self.config.loading = loading;
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn is_loading(&self) -> bool {
        self.config.loading
    }

    pub fn config(&self) -> &ConfirmationConfig<A> {
        &self.config
    }

    /// True when there is no submit button, only the close action. A submit
    /// button needs both its text and its action.
    pub fn is_informational(&self) -> bool {
        self.config.submit_btn_text.is_none() || self.config.submit_btn_action.is_none()
    }

    pub fn submit_label(&self) -> &str {
        self.config
            .submit_btn_text
            .as_deref()
            .unwrap_or(DEFAULT_SUBMIT_TEXT)
    }

    pub fn close_label(&self) -> &str {
        self.config
            .close_btn_text
            .as_deref()
            .unwrap_or(DEFAULT_CLOSE_TEXT)
    }

    pub fn submit_enabled(&self) -> bool {
        self.open
            && !self.config.loading
            && !self.config.disable_submit_btn
            && !self.is_informational()
    }

    pub fn close_enabled(&self) -> bool {
        self.open && !self.config.loading && !self.config.disable_close_btn
    }

    /// Fires the submit action. The dialog stays open; the caller decides
    /// when to set `loading` and when to close.
    pub fn press_submit(&mut self) -> Press<A> {
        if !self.submit_enabled() {
            return Press::Ignored;
        }
        Press::Accepted(self.config.submit_btn_action.clone())
    }

    /// Closes the dialog through its close button, handing back the close
    /// action if one was configured.
    pub fn press_close(&mut self) -> Press<A> {
        if !self.close_enabled() {
            return Press::Ignored;
        }
        self.open = false;
        Press::Accepted(self.config.close_btn_action.clone())
    }

    /// Click or tap outside the dialog. Refused while loading.
    pub fn dismiss_outside(&mut self) -> Press<A> {
        if !self.open {
            return Press::Ignored;
        }
        if self.config.loading {
            warn!(title = %self.config.title, "outside dismiss refused while loading");
            return Press::Ignored;
        }
        self.open = false;
        Press::Accepted(None)
    }

    /// Runs the submit action through `op` with `loading` held for its
    /// duration.
    ///
    /// `loading` is cleared on both outcomes. On success the dialog closes;
    /// on failure it stays open so the user can retry or close it. Returns
    /// `None` without calling `op` when submit is not currently enabled.
    pub fn run_submit<T, E, F>(&mut self, op: F) -> Option<Result<T, E>>
    where
        F: FnOnce(Option<A>) -> Result<T, E>,
    {
        if !self.submit_enabled() {
            return None;
        }
        let action = self.config.submit_btn_action.clone();
        self.config.loading = true;
        let result = op(action);
        self.config.loading = false;
        match &result {
            Ok(_) => self.open = false,
            Err(_) => warn!(title = %self.config.title, "confirmation action failed"),
        }
        Some(result)
    }
}
