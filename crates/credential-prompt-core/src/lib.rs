//! Core types and logic for credential-prompt.
//!
//! This crate decides what an interactive Git host login prompt looks like
//! and what it returns. It is intentionally UI-agnostic to allow:
//!
//! - Unit tests without a terminal or display server
//! - Different surfaces (terminal, GUI dialog, scripted test double)
//! - Keeping all secret handling in one auditable place
//!
//! # Modules
//!
//! - [`types`]: Core data types (`ConnectionContext`, `Credential`, `PromptOutcome`)
//! - [`form`]: Layout computation (fields, labels, messages, default username)
//! - [`gate`]: Confirm-enablement state machine
//! - [`prompt`]: The `CredentialPrompt` driver
//! - [`traits`]: The `PromptSurface` capability
//! - [`scripted`]: Scripted surface for tests
//! - [`dispatch`]: Running prompts on a dedicated prompt thread
//! - [`config`]: TOML configuration
//! - [`secret`]: Clearable secret field buffer
//!
//! # Example
//!
//! ```
//! use credential_prompt_core::scripted::ScriptedSurface;
//! use credential_prompt_core::{ConnectionContext, CredentialPrompt, ExecutionMode};
//!
//! let context = ConnectionContext::new("https://github.com/octocat/Hello-World.git")
//!     .with_host("github.com")
//!     .with_path("/octocat/Hello-World.git");
//!
//! let mut surface = ScriptedSurface::new().type_secret("ghp_example").confirm();
//! let outcome = CredentialPrompt::default().prompt(
//!     &mut surface,
//!     ExecutionMode::Interactive,
//!     &context,
//!     None,
//! );
//!
//! let credential = outcome.into_credential().unwrap();
//! assert_eq!(credential.username.as_deref(), Some("octocat"));
//! assert_eq!(credential.expose_secret(), Some("ghp_example"));
//! ```

pub mod config;
pub mod dispatch;
pub mod form;
pub mod gate;
pub mod messages;
pub mod prompt;
pub mod scripted;
pub mod secret;
pub mod text;
pub mod traits;
pub mod types;

// Re-export commonly used types at the crate root for convenience
pub use config::{Config, ConfigError};
pub use dispatch::{DispatchError, UiThread};
pub use form::{default_username, Field, FormLayout};
pub use gate::{ConfirmGate, ConfirmState};
pub use prompt::{CredentialPrompt, FormValues};
pub use secret::SecretBuffer;
pub use traits::{PromptSurface, SurfaceError, SurfaceEvent};
pub use types::{ConnectionContext, Credential, ExecutionMode, PromptOutcome, Provider};
