//! The credential prompt.
//!
//! [`CredentialPrompt::prompt`] builds the [`FormLayout`], shows it on a
//! [`PromptSurface`], tracks the field contents and the [`ConfirmGate`]
//! while the user edits, and turns the final action into a
//! [`PromptOutcome`].
//!
//! # Security
//!
//! The secret field lives in a [`SecretBuffer`] owned by [`FormValues`].
//! Replaced buffers, cancelled forms and failed surfaces all drop the
//! buffer, which wipes it. A confirmed form moves the buffer into the
//! resulting [`Credential`]. Nothing here logs field contents.

use tracing::{debug, warn};

use crate::config::Config;
use crate::form::FormLayout;
use crate::gate::ConfirmGate;
use crate::secret::SecretBuffer;
use crate::text::{file_name, nullize_blank};
use crate::traits::{PromptSurface, SurfaceEvent};
use crate::types::{ConnectionContext, Credential, ExecutionMode, PromptOutcome};

/// Live contents of the form fields.
#[derive(Debug, Default)]
pub struct FormValues {
    /// Username field text. Kept even when the field is not displayed.
    pub username: String,
    /// Secret field contents.
    pub secret: SecretBuffer,
}

impl FormValues {
    /// Seed the fields from the layout and the prior credential.
    pub fn seed(layout: &FormLayout, prior: Option<&Credential>) -> Self {
        let secret = prior
            .and_then(|c| c.secret.as_ref())
            .map(SecretBuffer::from_secret)
            .unwrap_or_default();

        Self {
            username: layout.default_username.clone().unwrap_or_default(),
            secret,
        }
    }

    /// Turn the confirmed field contents into a credential.
    ///
    /// - SSH key prompts use the key's file name as the username.
    /// - Otherwise the username field is used, blank meaning absent.
    /// - An empty secret with a username present becomes the provider's
    ///   sentinel secret; with no username it stays absent.
    pub fn resolve(self, context: &ConnectionContext, config: &Config) -> Credential {
        let username = match &context.ssh_key_file {
            Some(key_file) => nullize_blank(file_name(key_file)).map(str::to_string),
            None => nullize_blank(&self.username).map(str::to_string),
        };

        let secret = if self.secret.is_empty() {
            match username {
                Some(_) => config.sentinel_for(context.provider()),
                None => None,
            }
        } else {
            Some(self.secret.into_secret())
        };

        Credential::new(username, secret)
    }
}

/// Interactive credential prompt.
///
/// Stateless across calls; each call to [`prompt`](Self::prompt) shows
/// exactly one form and returns once it is resolved.
#[derive(Debug, Clone, Default)]
pub struct CredentialPrompt {
    config: Config,
}

impl CredentialPrompt {
    /// Create a prompt with the given configuration.
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// The configuration in use.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Ask the user for credentials on `surface`.
    ///
    /// Blocks until the user confirms or cancels. A surface failure is
    /// treated like the user dismissing the form.
    ///
    /// # Panics
    ///
    /// Panics if `mode` is [`ExecutionMode::Automated`]: nobody is there
    /// to answer, so calling this is a bug in the caller.
    pub fn prompt<S>(
        &self,
        surface: &mut S,
        mode: ExecutionMode,
        context: &ConnectionContext,
        prior: Option<Credential>,
    ) -> PromptOutcome
    where
        S: PromptSurface + ?Sized,
    {
        assert!(
            mode.is_interactive(),
            "credential prompt invoked during {} execution",
            mode
        );

        let layout = FormLayout::build(context, prior.as_ref(), &self.config);
        let mut values = FormValues::seed(&layout, prior.as_ref());
        drop(prior);

        debug!(
            provider = %layout.provider,
            ssh_key = layout.ssh_key_mode,
            username_field = layout.username_field.is_some(),
            "Showing credential prompt"
        );

        if let Err(e) = surface.show(&layout) {
            warn!(error = %e, "Failed to show credential prompt");
            surface.close();
            return PromptOutcome::Declined;
        }

        let mut gate = ConfirmGate::new();
        surface.set_confirm_enabled(gate.is_enabled());

        loop {
            let event = match surface.next_event() {
                Ok(event) => event,
                Err(e) => {
                    warn!(error = %e, "Credential prompt surface failed, treating as cancelled");
                    surface.close();
                    return PromptOutcome::Declined;
                }
            };

            match event {
                SurfaceEvent::UsernameEdited(username) => {
                    values.username = username;
                }
                SurfaceEvent::SecretEdited(secret) => {
                    values.secret = secret;
                    if gate.on_secret_changed(values.secret.len()) {
                        surface.set_confirm_enabled(gate.is_enabled());
                    }
                }
                SurfaceEvent::ConfirmRequested => {
                    if !gate.try_confirm() {
                        debug!("Confirm rejected, secret field is empty");
                        surface.confirm_rejected();
                        continue;
                    }
                    surface.close();
                    let credential = values.resolve(context, &self.config);
                    debug!(
                        has_username = credential.username.is_some(),
                        has_secret = credential.secret.is_some(),
                        "Credential prompt confirmed"
                    );
                    return PromptOutcome::Confirmed(credential);
                }
                SurfaceEvent::CancelRequested => {
                    debug!("Credential prompt cancelled");
                    surface.close();
                    return PromptOutcome::Declined;
                }
            }
        }
    }
}
