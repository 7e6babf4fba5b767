//! Scripted prompt surface for testing.
//!
//! [`ScriptedSurface`] replays a fixed sequence of user actions and records
//! everything the prompt told it, so prompt flows can be tested without a
//! terminal or display server.

use std::collections::VecDeque;

use crate::form::FormLayout;
use crate::secret::SecretBuffer;
use crate::traits::{PromptSurface, SurfaceError, SurfaceEvent};

/// A prompt surface driven by a script of user actions.
///
/// When the script runs out the surface answers
/// [`SurfaceEvent::CancelRequested`], like a user closing the window.
///
/// # Example
///
/// ```
/// use credential_prompt_core::scripted::ScriptedSurface;
///
/// let surface = ScriptedSurface::new()
///     .type_username("alice")
///     .type_secret("hunter2")
///     .confirm();
/// ```
#[derive(Debug, Default)]
pub struct ScriptedSurface {
    /// Remaining actions.
    script: VecDeque<Result<SurfaceEvent, SurfaceError>>,
    /// Error to return from `show` instead of displaying.
    show_error: Option<SurfaceError>,
    /// Layout passed to `show`.
    layout: Option<FormLayout>,
    /// Every value passed to `set_confirm_enabled`, in order.
    enabled_history: Vec<bool>,
    /// Number of confirm requests the prompt turned down.
    rejected_confirms: usize,
    /// Number of events handed out.
    events_delivered: usize,
    /// Whether `close` was called.
    closed: bool,
}

impl ScriptedSurface {
    /// Create a surface with an empty script.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an arbitrary event.
    pub fn then(mut self, event: SurfaceEvent) -> Self {
        self.script.push_back(Ok(event));
        self
    }

    /// Append an edit of the username field.
    pub fn type_username(self, username: impl Into<String>) -> Self {
        self.then(SurfaceEvent::UsernameEdited(username.into()))
    }

    /// Append an edit of the secret field.
    pub fn type_secret(self, secret: &str) -> Self {
        self.then(SurfaceEvent::SecretEdited(SecretBuffer::from(secret)))
    }

    /// Append an edit that empties the secret field.
    pub fn clear_secret(self) -> Self {
        self.then(SurfaceEvent::SecretEdited(SecretBuffer::new()))
    }

    /// Append a press of the confirm action.
    pub fn confirm(self) -> Self {
        self.then(SurfaceEvent::ConfirmRequested)
    }

    /// Append a press of the cancel action.
    pub fn cancel(self) -> Self {
        self.then(SurfaceEvent::CancelRequested)
    }

    /// Append a surface failure.
    pub fn fail(mut self, error: SurfaceError) -> Self {
        self.script.push_back(Err(error));
        self
    }

    /// Make `show` fail with the given error.
    pub fn fail_on_show(mut self, error: SurfaceError) -> Self {
        self.show_error = Some(error);
        self
    }

    /// The layout the prompt displayed, if `show` was called.
    pub fn layout(&self) -> Option<&FormLayout> {
        self.layout.as_ref()
    }

    /// Every enablement value the prompt pushed, in order.
    pub fn enabled_history(&self) -> &[bool] {
        &self.enabled_history
    }

    /// The last enablement value the prompt pushed.
    pub fn confirm_enabled(&self) -> bool {
        self.enabled_history.last().copied().unwrap_or(false)
    }

    /// How many confirm requests were rejected.
    pub fn rejected_confirms(&self) -> usize {
        self.rejected_confirms
    }

    /// How many scripted events were consumed.
    pub fn events_delivered(&self) -> usize {
        self.events_delivered
    }

    /// Whether the prompt closed the surface.
    pub fn is_closed(&self) -> bool {
        self.closed
    }
}

impl PromptSurface for ScriptedSurface {
    fn show(&mut self, layout: &FormLayout) -> Result<(), SurfaceError> {
        if let Some(err) = self.show_error.take() {
            return Err(err);
        }
        self.layout = Some(layout.clone());
        Ok(())
    }

    fn set_confirm_enabled(&mut self, enabled: bool) {
        self.enabled_history.push(enabled);
    }

    fn confirm_rejected(&mut self) {
        self.rejected_confirms += 1;
    }

    fn next_event(&mut self) -> Result<SurfaceEvent, SurfaceError> {
        match self.script.pop_front() {
            Some(event) => {
                self.events_delivered += 1;
                event
            }
            None => Ok(SurfaceEvent::CancelRequested),
        }
    }

    fn close(&mut self) {
        self.closed = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::types::ConnectionContext;

    #[test]
    fn replays_script_in_order() {
        let mut surface = ScriptedSurface::new()
            .type_username("bob")
            .type_secret("pw")
            .confirm();

        assert!(matches!(
            surface.next_event(),
            Ok(SurfaceEvent::UsernameEdited(ref name)) if name == "bob"
        ));
        assert!(matches!(
            surface.next_event(),
            Ok(SurfaceEvent::SecretEdited(ref buffer)) if buffer.len() == 2
        ));
        assert!(matches!(
            surface.next_event(),
            Ok(SurfaceEvent::ConfirmRequested)
        ));
        assert_eq!(surface.events_delivered(), 3);
    }

    #[test]
    fn empty_script_cancels() {
        let mut surface = ScriptedSurface::new();
        assert!(matches!(
            surface.next_event(),
            Ok(SurfaceEvent::CancelRequested)
        ));
        assert_eq!(surface.events_delivered(), 0);
    }

    #[test]
    fn records_layout_and_enablement() {
        let layout = crate::form::FormLayout::build(
            &ConnectionContext::new("https://example.com/r.git"),
            None,
            &Config::default(),
        );
        let mut surface = ScriptedSurface::new();

        surface.show(&layout).unwrap();
        surface.set_confirm_enabled(false);
        surface.set_confirm_enabled(true);
        surface.confirm_rejected();
        surface.close();

        assert_eq!(surface.layout(), Some(&layout));
        assert_eq!(surface.enabled_history(), &[false, true]);
        assert!(surface.confirm_enabled());
        assert_eq!(surface.rejected_confirms(), 1);
        assert!(surface.is_closed());
    }

    #[test]
    fn show_failure_is_returned_once() {
        let layout = crate::form::FormLayout::build(
            &ConnectionContext::new("https://example.com/r.git"),
            None,
            &Config::default(),
        );
        let mut surface = ScriptedSurface::new().fail_on_show(SurfaceError::Ui("no tty".into()));

        assert!(matches!(surface.show(&layout), Err(SurfaceError::Ui(_))));
        assert!(surface.layout().is_none());
        assert!(surface.show(&layout).is_ok());
    }
}
