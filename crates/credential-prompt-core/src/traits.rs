//! Trait definitions for pluggable components.
//!
//! [`PromptSurface`] is the interface between the prompt logic and whatever
//! actually draws the form: a terminal, a GUI dialog, or a scripted test
//! double. The prompt drives the surface; the surface reports what the user
//! did as [`SurfaceEvent`]s.

use crate::form::FormLayout;
use crate::secret::SecretBuffer;

/// Error type for surface operations.
#[derive(Debug, thiserror::Error)]
pub enum SurfaceError {
    /// Reading input or writing output failed.
    #[error("surface I/O failed: {0}")]
    Io(#[from] std::io::Error),

    /// The input source closed before the user answered.
    #[error("input closed before the prompt was answered")]
    InputClosed,

    /// Generic UI error.
    #[error("UI error: {0}")]
    Ui(String),
}

/// Something the user did on the surface.
#[derive(Debug)]
pub enum SurfaceEvent {
    /// The username field now holds this text.
    UsernameEdited(String),

    /// The secret field now holds this text.
    SecretEdited(SecretBuffer),

    /// The user pressed the confirm action.
    ConfirmRequested,

    /// The user cancelled or dismissed the form.
    CancelRequested,
}

/// Trait for prompt surface implementations.
///
/// All methods block. A surface is used for exactly one prompt: `show` is
/// called once, events are pulled until the prompt resolves, then `close`
/// is called.
///
/// # Example (Cancelling Surface)
///
/// ```
/// use credential_prompt_core::form::FormLayout;
/// use credential_prompt_core::{PromptSurface, SurfaceError, SurfaceEvent};
///
/// struct AlwaysCancel;
///
/// impl PromptSurface for AlwaysCancel {
///     fn show(&mut self, _layout: &FormLayout) -> Result<(), SurfaceError> {
///         Ok(())
///     }
///     fn set_confirm_enabled(&mut self, _enabled: bool) {}
///     fn confirm_rejected(&mut self) {}
///     fn next_event(&mut self) -> Result<SurfaceEvent, SurfaceError> {
///         Ok(SurfaceEvent::CancelRequested)
///     }
///     fn close(&mut self) {}
/// }
/// ```
pub trait PromptSurface {
    /// Declare the fields, labels, message and note, and display them.
    fn show(&mut self, layout: &FormLayout) -> Result<(), SurfaceError>;

    /// Enable or disable the confirm action.
    ///
    /// Called with `false` right after `show`, then on every transition.
    fn set_confirm_enabled(&mut self, enabled: bool);

    /// A confirm request arrived while the confirm action was disabled.
    fn confirm_rejected(&mut self);

    /// Block until the user does something.
    fn next_event(&mut self) -> Result<SurfaceEvent, SurfaceError>;

    /// Tear the form down. No further calls follow.
    fn close(&mut self);
}
