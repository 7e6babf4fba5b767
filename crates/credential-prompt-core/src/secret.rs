//! Clearable buffer for the secret field.
//!
//! The secret field of a form is the only place a password lives while the
//! user is typing. [`SecretBuffer`] owns that text, wipes it on drop, and
//! hands it over to a [`SecretString`] by move when the form is confirmed.
//! A surface reports each edit as a whole new buffer, so replacing the
//! field wipes the old contents.

use secrecy::{ExposeSecret, SecretString};
use zeroize::Zeroizing;

/// Owned, zeroize-on-drop contents of a secret input field.
#[derive(Default)]
pub struct SecretBuffer {
    inner: Zeroizing<String>,
}

impl SecretBuffer {
    /// Create an empty buffer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy an existing secret into a new buffer (used for pre-filling).
    pub fn from_secret(secret: &SecretString) -> Self {
        Self::from(secret.expose_secret().to_owned())
    }

    /// Length of the field in characters.
    pub fn len(&self) -> usize {
        self.inner.chars().count()
    }

    /// Whether the field is empty.
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Move the contents into a [`SecretString`].
    ///
    /// The buffer is consumed; nothing is left behind to wipe.
    pub fn into_secret(mut self) -> SecretString {
        SecretString::from(std::mem::take(&mut *self.inner))
    }
}

impl From<String> for SecretBuffer {
    fn from(value: String) -> Self {
        Self {
            inner: Zeroizing::new(value),
        }
    }
}

impl From<&str> for SecretBuffer {
    fn from(value: &str) -> Self {
        Self::from(value.to_owned())
    }
}

// Manual Debug implementation to avoid exposing the secret
impl std::fmt::Debug for SecretBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SecretBuffer")
            .field("contents", &"[REDACTED]")
            .field("len", &self.len())
            .finish()
    }
}
