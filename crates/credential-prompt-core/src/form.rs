//! Form layout computation.
//!
//! [`FormLayout::build`] decides everything a renderer needs to draw one
//! credential prompt: the header message, the provider note, which fields
//! exist, their labels and their initial values. It is a pure function of
//! the connection context, the prior credential and the configuration.
//!
//! | Mode              | Username field | Secret label | Note             |
//! |-------------------|----------------|--------------|------------------|
//! | SSH key           | no             | Password     | none             |
//! | GitHub            | no             | Token        | GitHub note      |
//! | Bitbucket         | yes            | Password     | Bitbucket note   |
//! | Other provider    | yes            | Password     | generic note     |

use crate::config::Config;
use crate::messages::{Message, PASSWORD_LABEL, TOKEN_LABEL, USERNAME_LABEL};
use crate::text::{file_name, trim_middle};
use crate::types::{ConnectionContext, Credential, Provider};

/// The field that should receive keyboard focus first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    /// The username text field.
    Username,
    /// The secret (password/token/passphrase) field.
    Secret,
}

/// The visible username field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UsernameField {
    /// Field label.
    pub label: &'static str,
    /// Pre-filled value (prior or derived username, or empty).
    pub initial: String,
}

/// The secret field. Always present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SecretField {
    /// Field label ("Password" or "Token").
    pub label: &'static str,
    /// Whether the field starts out filled with the prior secret.
    ///
    /// The secret itself is not part of the layout; it stays with the
    /// prompt's own field state.
    pub prefilled: bool,
}

/// Everything a surface needs to render one prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormLayout {
    /// Dialog title.
    pub title: String,
    /// Bold header line.
    pub message: String,
    /// Hint shown under the fields.
    pub note: Option<String>,
    /// Provider the prompt is for.
    pub provider: Provider,
    /// Whether the prompt asks for an SSH key passphrase.
    pub ssh_key_mode: bool,
    /// Username field, when the user has to type one.
    pub username_field: Option<UsernameField>,
    /// Secret field.
    pub secret_field: SecretField,
    /// Username the form starts with, whether or not the field is shown.
    pub default_username: Option<String>,
}

impl FormLayout {
    /// Compute the layout for a prompt.
    ///
    /// # Examples
    ///
    /// ```
    /// use credential_prompt_core::config::Config;
    /// use credential_prompt_core::form::FormLayout;
    /// use credential_prompt_core::types::ConnectionContext;
    ///
    /// let context = ConnectionContext::new("https://github.com/octocat/Hello-World.git")
    ///     .with_host("github.com")
    ///     .with_path("/octocat/Hello-World.git");
    ///
    /// let layout = FormLayout::build(&context, None, &Config::default());
    /// assert!(layout.username_field.is_none());
    /// assert_eq!(layout.secret_field.label, "Token");
    /// assert_eq!(layout.default_username.as_deref(), Some("octocat"));
    /// ```
    pub fn build(context: &ConnectionContext, prior: Option<&Credential>, config: &Config) -> Self {
        let provider = context.provider();
        let ssh_key_mode = context.is_ssh_key();

        let note = if ssh_key_mode {
            None
        } else {
            let note = match provider {
                Provider::GitHub => Message::GitHubNote,
                Provider::Bitbucket => Message::BitbucketNote,
                Provider::Other => Message::OtherProviderNote,
            };
            Some(note.to_string())
        };

        let message = match &context.ssh_key_file {
            None => {
                let uri = trim_middle(&context.uri, config.prompt.uri_display_width);
                Message::LogInTo(&uri).to_string()
            }
            Some(key_file) => Message::EnterSshKeyPassword(file_name(key_file)).to_string(),
        };

        let default_username = default_username(context, prior);

        let username_field = if ssh_key_mode || provider == Provider::GitHub {
            None
        } else {
            Some(UsernameField {
                label: USERNAME_LABEL,
                initial: default_username.clone().unwrap_or_default(),
            })
        };

        let secret_label = if !ssh_key_mode && provider == Provider::GitHub {
            TOKEN_LABEL
        } else {
            PASSWORD_LABEL
        };

        Self {
            title: config.prompt.title.clone(),
            message,
            note,
            provider,
            ssh_key_mode,
            username_field,
            secret_field: SecretField {
                label: secret_label,
                prefilled: prior.is_some_and(|c| c.secret.is_some()),
            },
            default_username,
        }
    }

    /// The field that gets focus when the prompt opens.
    pub fn initial_focus(&self) -> Field {
        if self.username_field.is_some() {
            Field::Username
        } else {
            Field::Secret
        }
    }
}

/// The username a prompt starts with.
///
/// The prior username wins. Without one, a GitHub login for an HTTPS remote
/// guesses the owner from the first path segment: `/octocat/Hello-World`
/// gives `octocat`, `/onlyowner` gives `onlyowner`.
pub fn default_username(context: &ConnectionContext, prior: Option<&Credential>) -> Option<String> {
    if let Some(username) = prior.and_then(|c| c.username.as_ref()) {
        return Some(username.clone());
    }

    if context.provider() != Provider::GitHub || context.is_ssh_key() {
        return None;
    }

    // Skip the leading separator, then cut at the next one
    let rest = context.path.as_deref()?.get(1..)?;
    let owner = match rest.find('/') {
        Some(end) => &rest[..end],
        None => rest,
    };

    if owner.is_empty() {
        None
    } else {
        Some(owner.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::SecretString;

    fn github(path: &str) -> ConnectionContext {
        ConnectionContext::new(format!("https://github.com{}", path))
            .with_host("github.com")
            .with_path(path)
    }

    #[test]
    fn default_username_from_github_path() {
        assert_eq!(
            default_username(&github("/octocat/Hello-World"), None).as_deref(),
            Some("octocat")
        );
        assert_eq!(
            default_username(&github("/onlyowner"), None).as_deref(),
            Some("onlyowner")
        );
        assert_eq!(
            default_username(&github("/org/repo/tree/main"), None).as_deref(),
            Some("org")
        );
    }

    #[test]
    fn default_username_empty_segments() {
        assert_eq!(default_username(&github("/"), None), None);
        assert_eq!(default_username(&github(""), None), None);
        assert_eq!(default_username(&github("//repo"), None), None);
    }

    #[test]
    fn default_username_prefers_prior() {
        let prior = Credential::with_username("alice");
        assert_eq!(
            default_username(&github("/octocat/Hello-World"), Some(&prior)).as_deref(),
            Some("alice")
        );

        // A prior credential without a username still allows derivation
        let prior = Credential::new(None, Some(SecretString::from("old")));
        assert_eq!(
            default_username(&github("/octocat/Hello-World"), Some(&prior)).as_deref(),
            Some("octocat")
        );
    }

    #[test]
    fn default_username_only_for_github_https() {
        let gitlab = ConnectionContext::new("https://gitlab.com/group/project")
            .with_host("gitlab.com")
            .with_path("/group/project");
        assert_eq!(default_username(&gitlab, None), None);

        let no_path = ConnectionContext::new("https://github.com").with_host("github.com");
        assert_eq!(default_username(&no_path, None), None);

        let ssh = github("/octocat/Hello-World").with_ssh_key_file("/home/u/.ssh/id_rsa");
        assert_eq!(default_username(&ssh, None), None);
    }

    #[test]
    fn github_layout_shows_token_only() {
        let layout = FormLayout::build(&github("/octocat/Hello-World"), None, &Config::default());

        assert_eq!(layout.provider, Provider::GitHub);
        assert!(!layout.ssh_key_mode);
        assert!(layout.username_field.is_none());
        assert_eq!(layout.secret_field.label, "Token");
        assert!(!layout.secret_field.prefilled);
        assert_eq!(layout.note, Some(Message::GitHubNote.to_string()));
        assert_eq!(layout.default_username.as_deref(), Some("octocat"));
        assert_eq!(layout.initial_focus(), Field::Secret);
        assert_eq!(
            layout.message,
            "Log in to https://github.com/octocat/Hello-World"
        );
    }

    #[test]
    fn bitbucket_layout_shows_username_and_password() {
        let context = ConnectionContext::new("https://bitbucket.org/team/repo.git")
            .with_host("bitbucket.org")
            .with_path("/team/repo.git");
        let prior = Credential::with_username("teammate");
        let layout = FormLayout::build(&context, Some(&prior), &Config::default());

        assert_eq!(layout.note, Some(Message::BitbucketNote.to_string()));
        assert_eq!(
            layout.username_field,
            Some(UsernameField {
                label: "Username",
                initial: "teammate".to_string(),
            })
        );
        assert_eq!(layout.secret_field.label, "Password");
        assert_eq!(layout.initial_focus(), Field::Username);
    }

    #[test]
    fn other_provider_layout() {
        for host in [Some("gitlab.com"), Some("git.example.com"), None] {
            let mut context = ConnectionContext::new("https://git.example.com/repo.git");
            context.host = host.map(str::to_string);
            let layout = FormLayout::build(&context, None, &Config::default());

            assert_eq!(layout.provider, Provider::Other);
            assert_eq!(layout.note, Some(Message::OtherProviderNote.to_string()));
            let field = layout.username_field.expect("username field");
            assert!(field.initial.is_empty());
            assert_eq!(layout.secret_field.label, "Password");
        }
    }

    #[test]
    fn ssh_key_layout_has_no_note_and_no_username() {
        for host in ["github.com", "bitbucket.org", "example.com"] {
            let context = ConnectionContext::new(format!("ssh://git@{}/o/r.git", host))
                .with_host(host)
                .with_path("/o/r.git")
                .with_ssh_key_file("/home/u/.ssh/id_rsa");
            let layout = FormLayout::build(&context, None, &Config::default());

            assert!(layout.ssh_key_mode);
            assert!(layout.note.is_none());
            assert!(layout.username_field.is_none());
            assert_eq!(layout.secret_field.label, "Password");
            assert_eq!(
                layout.message,
                "Enter your password for the SSH key \"id_rsa\""
            );
        }
    }

    #[test]
    fn long_uri_is_trimmed_in_message() {
        let uri = "https://git.example.com/some-organization/a-rather-long-repository-name.git";
        let layout = FormLayout::build(&ConnectionContext::new(uri), None, &Config::default());
        assert_eq!(
            layout.message,
            "Log in to https://git.example.com/…-long-repository-name.git"
        );
    }

    #[test]
    fn uri_width_comes_from_config() {
        let mut config = Config::default();
        config.prompt.uri_display_width = 7;
        config.prompt.title = "Custom".to_string();

        let layout = FormLayout::build(&ConnectionContext::new("abcdefghij"), None, &config);
        assert_eq!(layout.message, "Log in to abc…hij");
        assert_eq!(layout.title, "Custom");
    }

    #[test]
    fn prefilled_secret_is_flagged() {
        let prior = Credential::new(Some("bob".into()), Some(SecretString::from("old")));
        let context = ConnectionContext::new("https://example.com/r.git").with_host("example.com");
        let layout = FormLayout::build(&context, Some(&prior), &Config::default());
        assert!(layout.secret_field.prefilled);
    }
}
