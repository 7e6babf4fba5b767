//! User-facing prompt text.
//!
//! A fixed English catalog. Renderers receive the finished strings through
//! [`FormLayout`](crate::form::FormLayout) and never build text themselves.

use std::fmt;

/// Label of the username field.
pub const USERNAME_LABEL: &str = "Username";

/// Label of the secret field for passwords and SSH key passphrases.
pub const PASSWORD_LABEL: &str = "Password";

/// Label of the secret field when a GitHub token is expected.
pub const TOKEN_LABEL: &str = "Token";

/// Default dialog title.
pub const DEFAULT_TITLE: &str = "Settings Repository";

/// A message shown above or below the form fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Message<'a> {
    /// Note for github.com logins.
    GitHubNote,
    /// Note for bitbucket.org logins.
    BitbucketNote,
    /// Note for every other Git host.
    OtherProviderNote,
    /// Header for username/password logins, with the display URI.
    LogInTo(&'a str),
    /// Header for SSH key passphrases, with the key file name.
    EnterSshKeyPassword(&'a str),
}

impl fmt::Display for Message<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Message::GitHubNote => write!(
                f,
                "Use a personal access token with the \"repo\" scope instead of your password."
            ),
            Message::BitbucketNote => write!(
                f,
                "If two-step verification is enabled, use an app password instead of your account password."
            ),
            Message::OtherProviderNote => write!(
                f,
                "If your Git provider requires two-factor authentication, use an access token instead of your password."
            ),
            Message::LogInTo(uri) => write!(f, "Log in to {}", uri),
            Message::EnterSshKeyPassword(file) => {
                write!(f, "Enter your password for the SSH key \"{}\"", file)
            }
        }
    }
}
