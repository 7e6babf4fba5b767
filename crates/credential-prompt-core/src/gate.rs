//! Confirm-button enablement.
//!
//! The only dynamic state of a prompt: confirmation is allowed exactly while
//! the secret field is non-empty. The gate always starts disabled, even when
//! the secret field is pre-filled, so a stale secret cannot be confirmed
//! without the user touching the field.

/// State of the confirm action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConfirmState {
    /// Confirmation is blocked.
    #[default]
    Disabled,
    /// Confirmation is allowed.
    Enabled,
}

/// Tracks [`ConfirmState`] from secret-field length changes.
#[derive(Debug, Clone, Default)]
pub struct ConfirmGate {
    state: ConfirmState,
}

impl ConfirmGate {
    /// Create a gate in the [`ConfirmState::Disabled`] state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current state.
    pub fn state(&self) -> ConfirmState {
        self.state
    }

    /// Whether confirmation is currently allowed.
    pub fn is_enabled(&self) -> bool {
        self.state == ConfirmState::Enabled
    }

    /// Feed the new length of the secret field.
    ///
    /// Returns `true` when the state changed, so callers only push real
    /// transitions to the surface.
    pub fn on_secret_changed(&mut self, secret_len: usize) -> bool {
        let next = if secret_len > 0 {
            ConfirmState::Enabled
        } else {
            ConfirmState::Disabled
        };
        let changed = next != self.state;
        self.state = next;
        changed
    }

    /// Ask to confirm. Returns whether the request is accepted.
    pub fn try_confirm(&self) -> bool {
        self.is_enabled()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_disabled() {
        let gate = ConfirmGate::new();
        assert_eq!(gate.state(), ConfirmState::Disabled);
        assert!(!gate.try_confirm());
    }

    #[test]
    fn typed_then_cleared() {
        let mut gate = ConfirmGate::new();

        assert!(gate.on_secret_changed(1));
        assert!(gate.is_enabled());
        assert!(gate.try_confirm());

        assert!(gate.on_secret_changed(0));
        assert_eq!(gate.state(), ConfirmState::Disabled);
        assert!(!gate.try_confirm());
    }

    #[test]
    fn only_reports_real_transitions() {
        let mut gate = ConfirmGate::new();

        assert!(!gate.on_secret_changed(0));
        assert!(gate.on_secret_changed(3));
        assert!(!gate.on_secret_changed(4));
        assert!(!gate.on_secret_changed(12));
        assert!(gate.on_secret_changed(0));
        assert!(!gate.on_secret_changed(0));
    }
}
