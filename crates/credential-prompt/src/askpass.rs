//! Askpass prompt recognition.
//!
//! Git and OpenSSH run the askpass program with a single prompt argument
//! and read the answer from its stdout. The prompt text is all we get, so
//! the connection context is recovered from it.
//!
//! # Supported Prompt Formats
//!
//! - `Username for 'https://github.com': ` (Git)
//! - `Password for 'https://alice@github.com': ` (Git)
//! - `Enter passphrase for key '/home/u/.ssh/id_ed25519': ` (OpenSSH)
//!
//! Anything else is shown as-is and answered with the secret.
//!
//! Username prompts are never shown as a form: the form always asks for a
//! secret, and Git asks for the password in a second call anyway. They are
//! answered from what the URL already tells us, or left to Git.

use credential_prompt_core::{default_username, ConnectionContext, Credential};
use tracing::debug;

use crate::helper::HelperRequest;

/// What an askpass prompt asks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AskpassRequest {
    /// Git wants a username for `url`.
    Username {
        /// URL from the prompt, possibly with a username.
        url: String,
    },
    /// Git wants a password for `url`.
    Password {
        /// URL from the prompt, possibly with a username.
        url: String,
    },
    /// OpenSSH wants the passphrase of a private key.
    Passphrase {
        /// Path to the private key file.
        key_file: String,
    },
    /// Unrecognized prompt.
    Unknown {
        /// Prompt text without trailing `:` and whitespace.
        prompt: String,
    },
}

impl AskpassRequest {
    /// Recognize a prompt.
    ///
    /// # Examples
    ///
    /// ```
    /// use credential_prompt::askpass::AskpassRequest;
    ///
    /// let request = AskpassRequest::parse("Password for 'https://github.com': ");
    /// assert_eq!(
    ///     request,
    ///     AskpassRequest::Password { url: "https://github.com".to_string() }
    /// );
    /// ```
    pub fn parse(prompt: &str) -> Self {
        let lower = prompt.to_ascii_lowercase();

        if lower.starts_with("username for ") {
            if let Some(url) = extract_quoted(prompt) {
                return Self::Username { url };
            }
        }

        if lower.starts_with("password for ") {
            if let Some(url) = extract_quoted(prompt) {
                return Self::Password { url };
            }
        }

        if lower.starts_with("enter passphrase for ") {
            if let Some(key_file) = extract_key_file(prompt) {
                return Self::Passphrase { key_file };
            }
        }

        debug!("Unrecognized askpass prompt");
        Self::Unknown {
            prompt: trim_prompt(prompt).to_string(),
        }
    }

    /// Build the prompt context.
    pub fn context(&self) -> ConnectionContext {
        match self {
            Self::Username { url } | Self::Password { url } => match HelperRequest::from_url(url) {
                Ok(request) => request.context(),
                Err(e) => {
                    debug!(error = %e, "Askpass URL did not parse, showing it verbatim");
                    ConnectionContext::new(url.as_str())
                }
            },
            Self::Passphrase { key_file } => {
                ConnectionContext::new(key_file.as_str()).with_ssh_key_file(key_file.as_str())
            }
            Self::Unknown { prompt } => ConnectionContext::new(prompt.as_str()),
        }
    }

    /// The username embedded in the prompt URL, used to pre-fill.
    pub fn prior(&self) -> Option<Credential> {
        match self {
            Self::Username { url } | Self::Password { url } => HelperRequest::from_url(url)
                .ok()
                .and_then(|request| request.username)
                .map(Credential::with_username),
            _ => None,
        }
    }

    /// Whether this prompt asks for a username rather than a secret.
    pub fn is_username(&self) -> bool {
        matches!(self, Self::Username { .. })
    }

    /// The username this prompt can be answered with without asking.
    ///
    /// Comes from the URL itself, or from the owner in a GitHub path.
    pub fn known_username(&self) -> Option<String> {
        match self {
            Self::Username { .. } => default_username(&self.context(), self.prior().as_ref()),
            _ => None,
        }
    }
}

/// Extract the text between the first pair of single quotes.
fn extract_quoted(prompt: &str) -> Option<String> {
    let start = prompt.find('\'')? + 1;
    let end = start + prompt[start..].find('\'')?;
    let quoted = &prompt[start..end];
    (!quoted.is_empty()).then(|| quoted.to_string())
}

/// Extract the key path from an OpenSSH passphrase prompt.
///
/// Handles both `for key '/path':` and the unquoted `for /path:` form.
fn extract_key_file(prompt: &str) -> Option<String> {
    if let Some(path) = extract_quoted(prompt) {
        return Some(path);
    }

    let rest = &prompt["enter passphrase for ".len()..];
    let rest = rest.strip_prefix("key ").unwrap_or(rest);
    let path = trim_prompt(rest);
    (!path.is_empty()).then(|| path.to_string())
}

fn trim_prompt(prompt: &str) -> &str {
    prompt.trim_end().trim_end_matches(':').trim()
}
