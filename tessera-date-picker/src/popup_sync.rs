//! Open/closed state of the calendar popup attached to the date field.
//!
//! ## Usage
//!
//! Share one [`PopupSyncController`] between the field and the popup. The
//! field asks to open on focus, click or Enter; the popup asks to close on
//! Escape, an outside click or a successful day selection.
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::debug;

use crate::callback::{Callback, notify};

/// Interactive and validation state of the date field.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum FieldState {
    /// Normal, editable field.
    #[default]
    Enabled,
    /// Editable field showing a warning.
    Warning {
        /// Text shown under the field.
        helper_text: String,
    },
    /// Editable field showing an error.
    Error {
        /// Text shown under the field.
        helper_text: String,
    },
    /// Field that ignores all input.
    Disabled,
    /// Field that shows its value but cannot be changed.
    ReadOnly,
}

impl FieldState {
    /// Returns true when the field accepts input and may open the popup.
    pub fn is_interactive(&self) -> bool {
        matches!(
            self,
            FieldState::Enabled | FieldState::Warning { .. } | FieldState::Error { .. }
        )
    }

    /// Returns the helper text, for the states that carry one.
    pub fn helper_text(&self) -> Option<&str> {
        match self {
            FieldState::Warning { helper_text } | FieldState::Error { helper_text } => {
                Some(helper_text)
            }
            _ => None,
        }
    }
}

/// Visibility of the calendar popup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PopupState {
    /// The calendar is not mounted.
    #[default]
    Closed,
    /// The calendar is shown under the field.
    Open,
}

/// Field interaction that asks for the popup to open.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenTrigger {
    /// The field gained focus.
    Focus,
    /// The field was clicked.
    Click,
    /// Enter was pressed in the field.
    EnterKey,
}

/// Reason the popup is asked to close.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DismissReason {
    /// Escape pressed while focus is inside the calendar.
    EscapeKey,
    /// Click outside both the field and the popup.
    OutsideClick,
    /// A day was selected successfully.
    DaySelected,
}

#[derive(Default)]
struct PopupInner {
    state: PopupState,
    on_expanded_change: Option<Callback<bool>>,
}

/// Shared state for controlling calendar popup visibility.
#[derive(Clone, Default)]
pub struct PopupSyncController {
    inner: Arc<RwLock<PopupInner>>,
}

impl PopupSyncController {
    /// Creates a new closed controller.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the listener told whenever the popup opens or closes.
    pub fn set_on_expanded_change(&self, listener: Option<Callback<bool>>) {
        self.inner.write().on_expanded_change = listener;
    }

    /// Returns the current popup state.
    pub fn state(&self) -> PopupState {
        self.inner.read().state
    }

    /// Returns whether the popup is currently open.
    pub fn is_open(&self) -> bool {
        self.state() == PopupState::Open
    }

    /// Opens the popup in response to `trigger`.
    ///
    /// Ignored when already open or when `field` is not interactive. Returns
    /// true when the popup actually opened.
    pub fn request_open(&self, trigger: OpenTrigger, field: &FieldState) -> bool {
        if !field.is_interactive() {
            debug!(?trigger, ?field, "open suppressed, field not interactive");
            return false;
        }
        self.transition(PopupState::Open, || debug!(?trigger, "calendar popup opened"))
    }

    /// Closes the popup for `reason`. Returns true when it was open.
    pub fn dismiss(&self, reason: DismissReason) -> bool {
        self.transition(PopupState::Closed, || debug!(?reason, "calendar popup closed"))
    }

    /// Closes the popup if `field` stopped being interactive.
    pub fn sync_field_state(&self, field: &FieldState) -> bool {
        if field.is_interactive() {
            return false;
        }
        self.transition(PopupState::Closed, || {
            debug!(?field, "calendar popup closed, field no longer interactive")
        })
    }

    fn transition(&self, target: PopupState, log: impl FnOnce()) -> bool {
        let listener = {
            let mut inner = self.inner.write();
            if inner.state == target {
                return false;
            }
            inner.state = target;
            inner.on_expanded_change.clone()
        };
        log();
        // The lock is released so listeners may query the controller.
        notify(listener.as_ref(), target == PopupState::Open);
        true
    }
}
