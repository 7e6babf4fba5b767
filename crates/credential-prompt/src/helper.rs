//! Git credential helper protocol.
//!
//! Git talks to helpers over stdin/stdout with `key=value` lines terminated
//! by a blank line or end of input:
//!
//! ```text
//! protocol=https
//! host=github.com
//! path=octocat/Hello-World.git
//! username=octocat
//! ```
//!
//! The helper answers with the attributes it knows. Only the attributes
//! needed to build a [`ConnectionContext`] are kept; the rest are ignored.

use std::io::{BufRead, Write};

use credential_prompt_core::{ConnectionContext, Credential};
use secrecy::SecretString;
use thiserror::Error;
use tracing::debug;
use url::Url;
use zeroize::{Zeroize, Zeroizing};

/// Errors from reading or writing the helper protocol.
#[derive(Debug, Error)]
pub enum HelperError {
    /// Reading stdin or writing stdout failed.
    #[error("credential helper I/O failed: {0}")]
    Io(#[from] std::io::Error),

    /// A line was not of the form `key=value`.
    #[error("malformed credential attribute on line {line}, expected key=value")]
    MalformedLine {
        /// 1-based line number.
        line: usize,
    },

    /// The `url` attribute could not be parsed.
    #[error("invalid url attribute: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// A value cannot be written because it contains a newline or NUL.
    #[error("{0} contains a line break or NUL and cannot be sent to git")]
    InvalidValue(&'static str),
}

/// The attributes Git sent for one `get`/`store`/`erase` call.
#[derive(Default)]
pub struct HelperRequest {
    /// `protocol`, e.g. `https`.
    pub protocol: Option<String>,
    /// `host`, possibly with a `:port` suffix.
    pub host: Option<String>,
    /// `path` without leading slash (only sent with `credential.useHttpPath`).
    pub path: Option<String>,
    /// `username`, if Git already knows it.
    pub username: Option<String>,
    /// `password`, if Git already has one (for example a rejected one).
    pub password: Option<SecretString>,
}

impl HelperRequest {
    /// Read attributes until a blank line or end of input.
    pub fn read_from<R: BufRead>(mut reader: R) -> Result<Self, HelperError> {
        let mut request = Self::default();
        let mut line = Zeroizing::new(String::new());
        let mut line_number = 0;

        loop {
            line.zeroize();
            if reader.read_line(&mut line)? == 0 {
                break;
            }
            line_number += 1;

            let entry = line.trim_end_matches(['\n', '\r']);
            if entry.is_empty() {
                break;
            }

            let (key, value) = entry
                .split_once('=')
                .ok_or(HelperError::MalformedLine { line: line_number })?;
            request.apply(key, value)?;
        }

        Ok(request)
    }

    fn apply(&mut self, key: &str, value: &str) -> Result<(), HelperError> {
        match key {
            "protocol" => self.protocol = Some(value.to_string()),
            "host" => self.host = Some(value.to_string()),
            "path" => self.path = Some(value.to_string()),
            "username" => self.username = Some(value.to_string()),
            "password" => self.password = Some(SecretString::from(value)),
            "url" => self.apply_url(value)?,
            other => debug!(key = other, "Ignoring credential attribute"),
        }
        Ok(())
    }

    /// Build a request from a single URL, as Git shows in askpass prompts.
    pub fn from_url(value: &str) -> Result<Self, HelperError> {
        let mut request = Self::default();
        request.apply_url(value)?;
        Ok(request)
    }

    /// Split a `url` attribute into its parts, as Git itself does.
    fn apply_url(&mut self, value: &str) -> Result<(), HelperError> {
        let url = Url::parse(value)?;

        self.protocol = Some(url.scheme().to_string());
        if let Some(host) = url.host_str() {
            self.host = Some(match url.port() {
                Some(port) => format!("{}:{}", host, port),
                None => host.to_string(),
            });
        }

        let path = url.path().trim_start_matches('/');
        if !path.is_empty() {
            self.path = Some(path.to_string());
        }
        if !url.username().is_empty() {
            self.username = Some(url.username().to_string());
        }
        if let Some(password) = url.password() {
            self.password = Some(SecretString::from(password));
        }
        Ok(())
    }

    /// Build the prompt context for this request.
    pub fn context(&self) -> ConnectionContext {
        let protocol = self.protocol.as_deref().unwrap_or("https");
        let host = self.host.as_deref().unwrap_or_default();

        let path = self
            .path
            .as_deref()
            .map(|p| p.trim_start_matches('/'))
            .filter(|p| !p.is_empty())
            .map(|p| format!("/{}", p));

        let mut uri = format!("{}://{}", protocol, host);
        if let Some(path) = &path {
            uri.push_str(path);
        }

        ConnectionContext {
            uri,
            host: Some(strip_port(host))
                .filter(|h| !h.is_empty())
                .map(str::to_string),
            path,
            ssh_key_file: None,
        }
    }

    /// The credential Git already has, used to pre-fill the prompt.
    pub fn prior(&self) -> Option<Credential> {
        if self.username.is_none() && self.password.is_none() {
            return None;
        }
        Some(Credential::new(self.username.clone(), self.password.clone()))
    }
}

// Manual Debug implementation to avoid exposing the secret
impl std::fmt::Debug for HelperRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HelperRequest")
            .field("protocol", &self.protocol)
            .field("host", &self.host)
            .field("path", &self.path)
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

/// Strip a `:port` suffix (and IPv6 brackets) from a host attribute.
fn strip_port(host: &str) -> &str {
    if let Some(rest) = host.strip_prefix('[') {
        return rest.split_once(']').map_or(rest, |(address, _)| address);
    }
    match host.rsplit_once(':') {
        Some((name, port)) if !port.is_empty() && port.bytes().all(|b| b.is_ascii_digit()) => name,
        _ => host,
    }
}

fn check_value(value: &str, what: &'static str) -> Result<(), HelperError> {
    if value.contains(['\n', '\r', '\0']) {
        return Err(HelperError::InvalidValue(what));
    }
    Ok(())
}

/// Answer a `get` with the parts of `credential` that are present.
pub fn write_credential<W: Write>(mut writer: W, credential: &Credential) -> Result<(), HelperError> {
    if let Some(username) = &credential.username {
        check_value(username, "username")?;
        writeln!(writer, "username={}", username)?;
    }
    if let Some(secret) = credential.expose_secret() {
        check_value(secret, "password")?;
        writeln!(writer, "password={}", secret)?;
    }
    writer.flush()?;
    Ok(())
}
