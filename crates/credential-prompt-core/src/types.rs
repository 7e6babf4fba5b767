//! Core types for credential-prompt.
//!
//! This module contains the data that flows in and out of a single prompt:
//! the connection context, the credential value, the prompt outcome, and the
//! execution mode the caller is running in.

use secrecy::{ExposeSecret, SecretString};

/// Host name that selects GitHub wording and behavior.
pub const GITHUB_HOST: &str = "github.com";

/// Host name that selects Bitbucket wording.
pub const BITBUCKET_HOST: &str = "bitbucket.org";

/// The Git hosting provider a prompt is shown for.
///
/// Classification is an exact host match; anything that is not GitHub or
/// Bitbucket (including a missing host) is [`Provider::Other`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Provider {
    /// github.com: token-based login, username derived from the repo path.
    GitHub,
    /// bitbucket.org
    Bitbucket,
    /// Any other Git host.
    Other,
}

impl Provider {
    /// Classify a provider from an optional bare host name.
    ///
    /// # Examples
    ///
    /// ```
    /// use credential_prompt_core::types::Provider;
    ///
    /// assert_eq!(Provider::from_host(Some("github.com")), Provider::GitHub);
    /// assert_eq!(Provider::from_host(Some("bitbucket.org")), Provider::Bitbucket);
    /// assert_eq!(Provider::from_host(Some("gitlab.com")), Provider::Other);
    /// assert_eq!(Provider::from_host(None), Provider::Other);
    /// ```
    pub fn from_host(host: Option<&str>) -> Self {
        match host {
            Some(GITHUB_HOST) => Provider::GitHub,
            Some(BITBUCKET_HOST) => Provider::Bitbucket,
            _ => Provider::Other,
        }
    }
}

impl std::fmt::Display for Provider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Provider::GitHub => write!(f, "github"),
            Provider::Bitbucket => write!(f, "bitbucket"),
            Provider::Other => write!(f, "other"),
        }
    }
}

/// Where the remote operation that needs credentials is going.
///
/// Built by the caller for one authentication attempt and never mutated by
/// the prompt.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ConnectionContext {
    /// Full remote URL, used for display only.
    pub uri: String,
    /// Bare host name (no scheme, no port).
    pub host: Option<String>,
    /// URL path component, e.g. `/octocat/Hello-World`.
    pub path: Option<String>,
    /// Path of the SSH private key whose passphrase is requested.
    pub ssh_key_file: Option<String>,
}

impl ConnectionContext {
    /// Create a context for the given remote URI with no host, path or key.
    pub fn new(uri: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            ..Default::default()
        }
    }

    /// Set the bare host name.
    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.host = Some(host.into());
        self
    }

    /// Set the URL path component.
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Ask for an SSH key passphrase instead of a username and password.
    pub fn with_ssh_key_file(mut self, ssh_key_file: impl Into<String>) -> Self {
        self.ssh_key_file = Some(ssh_key_file.into());
        self
    }

    /// The provider selected by [`host`](Self::host).
    pub fn provider(&self) -> Provider {
        Provider::from_host(self.host.as_deref())
    }

    /// Whether this prompt is for an SSH key passphrase.
    pub fn is_ssh_key(&self) -> bool {
        self.ssh_key_file.is_some()
    }
}

/// A username/secret pair.
///
/// The secret is held in a [`SecretString`] so it is zeroed when dropped and
/// never shows up in `Debug` output.
#[derive(Clone, Default)]
pub struct Credential {
    /// Login name, if known.
    pub username: Option<String>,
    /// Password, token, passphrase or sentinel value.
    pub secret: Option<SecretString>,
}

impl Credential {
    /// Create a credential from its parts.
    pub fn new(username: Option<String>, secret: Option<SecretString>) -> Self {
        Self { username, secret }
    }

    /// Create a credential with a username and no secret.
    pub fn with_username(username: impl Into<String>) -> Self {
        Self {
            username: Some(username.into()),
            secret: None,
        }
    }

    /// Expose the secret for handing it to the consumer.
    ///
    /// # Security
    ///
    /// The returned value must not be logged or kept around.
    pub fn expose_secret(&self) -> Option<&str> {
        self.secret.as_ref().map(|s| s.expose_secret())
    }
}

// Manual Debug implementation to avoid exposing the secret
impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credential")
            .field("username", &self.username)
            .field("secret", &self.secret.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

/// Result of one prompt.
#[derive(Debug)]
pub enum PromptOutcome {
    /// The user confirmed the form.
    Confirmed(Credential),
    /// The user cancelled (or the surface went away).
    Declined,
}

impl PromptOutcome {
    /// Whether the user confirmed the form.
    pub fn is_confirmed(&self) -> bool {
        matches!(self, PromptOutcome::Confirmed(_))
    }

    /// Take the credential out of a confirmed outcome.
    pub fn into_credential(self) -> Option<Credential> {
        match self {
            PromptOutcome::Confirmed(credential) => Some(credential),
            PromptOutcome::Declined => None,
        }
    }
}

/// Whether a human is available to answer prompts.
///
/// Passed explicitly by the caller. Prompting in [`ExecutionMode::Automated`]
/// is a contract violation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionMode {
    /// A user is at the keyboard.
    Interactive,
    /// Tests, CI, batch runs and anything else unattended.
    Automated,
}

impl ExecutionMode {
    /// Whether prompts may be shown in this mode.
    pub fn is_interactive(&self) -> bool {
        matches!(self, ExecutionMode::Interactive)
    }
}

impl std::fmt::Display for ExecutionMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExecutionMode::Interactive => write!(f, "interactive"),
            ExecutionMode::Automated => write!(f, "automated"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_from_host() {
        assert_eq!(Provider::from_host(Some("github.com")), Provider::GitHub);
        assert_eq!(
            Provider::from_host(Some("bitbucket.org")),
            Provider::Bitbucket
        );
        assert_eq!(Provider::from_host(Some("gitlab.com")), Provider::Other);
        assert_eq!(Provider::from_host(Some("GitHub.com")), Provider::Other);
        assert_eq!(Provider::from_host(Some("api.github.com")), Provider::Other);
        assert_eq!(Provider::from_host(Some("")), Provider::Other);
        assert_eq!(Provider::from_host(None), Provider::Other);
    }

    #[test]
    fn provider_display() {
        assert_eq!(Provider::GitHub.to_string(), "github");
        assert_eq!(Provider::Bitbucket.to_string(), "bitbucket");
        assert_eq!(Provider::Other.to_string(), "other");
    }

    #[test]
    fn context_builder() {
        let context = ConnectionContext::new("https://github.com/octocat/Hello-World.git")
            .with_host("github.com")
            .with_path("/octocat/Hello-World.git");

        assert_eq!(context.provider(), Provider::GitHub);
        assert_eq!(context.path.as_deref(), Some("/octocat/Hello-World.git"));
        assert!(!context.is_ssh_key());

        let ssh = ConnectionContext::new("git@github.com:octocat/Hello-World.git")
            .with_ssh_key_file("/home/u/.ssh/id_rsa");
        assert!(ssh.is_ssh_key());
        assert_eq!(ssh.provider(), Provider::Other);
    }

    #[test]
    fn credential_debug_redacts_secret() {
        let credential = Credential::new(
            Some("alice".to_string()),
            Some(SecretString::from("super-secret-password")),
        );
        let debug_output = format!("{:?}", credential);
        assert!(debug_output.contains("alice"));
        assert!(debug_output.contains("[REDACTED]"));
        assert!(!debug_output.contains("super-secret-password"));
    }

    #[test]
    fn credential_expose_secret() {
        let credential = Credential::new(None, Some(SecretString::from("pass")));
        assert_eq!(credential.expose_secret(), Some("pass"));
        assert_eq!(Credential::with_username("bob").expose_secret(), None);
    }

    #[test]
    fn outcome_into_credential() {
        let confirmed = PromptOutcome::Confirmed(Credential::with_username("bob"));
        assert!(confirmed.is_confirmed());
        assert_eq!(
            confirmed.into_credential().and_then(|c| c.username),
            Some("bob".to_string())
        );

        assert!(!PromptOutcome::Declined.is_confirmed());
        assert!(PromptOutcome::Declined.into_credential().is_none());
    }

    #[test]
    fn execution_mode() {
        assert!(ExecutionMode::Interactive.is_interactive());
        assert!(!ExecutionMode::Automated.is_interactive());
        assert_eq!(ExecutionMode::Automated.to_string(), "automated");
    }
}
