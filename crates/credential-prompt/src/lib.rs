//! credential-prompt front ends.
//!
//! Connects the prompt core to the two ways Git asks for credentials:
//!
//! - [`helper`]: the `git credential` helper protocol on stdin/stdout
//! - [`askpass`]: `GIT_ASKPASS`/`SSH_ASKPASS` prompts passed as an argument
//!
//! The form itself is rendered by [`terminal::TerminalSurface`] on the
//! controlling terminal and always runs on a dedicated prompt thread.

pub mod askpass;
pub mod helper;
pub mod terminal;

use std::io::{BufRead, Write};
use std::path::Path;

use anyhow::{bail, Context, Result};
use credential_prompt_core::{
    Config, ConnectionContext, Credential, CredentialPrompt, ExecutionMode, PromptOutcome,
    PromptSurface, SurfaceError, UiThread,
};
use tracing::{debug, info};

use crate::askpass::AskpassRequest;
use crate::helper::HelperRequest;

/// Environment variable Git uses to forbid terminal prompts.
pub const ENV_GIT_TERMINAL_PROMPT: &str = "GIT_TERMINAL_PROMPT";

/// Name of the prompt thread.
const PROMPT_THREAD_NAME: &str = "credential-prompt";

/// Decide whether a human can be asked.
///
/// `--non-interactive` or `GIT_TERMINAL_PROMPT=0` mean nobody is there.
pub fn detect_execution_mode(non_interactive: bool, git_terminal_prompt: Option<&str>) -> ExecutionMode {
    if non_interactive || git_terminal_prompt.map(str::trim) == Some("0") {
        ExecutionMode::Automated
    } else {
        ExecutionMode::Interactive
    }
}

/// Load the configuration from `path`, or from the default location.
pub fn load_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(path) => Config::load_from(path)
            .with_context(|| format!("Failed to load config from {}", path.display())),
        None => Config::load().context("Failed to load config"),
    }
}

/// Show one prompt on a fresh prompt thread and wait for the outcome.
///
/// `make_surface` runs on the prompt thread, so the surface never leaves it.
/// Fails without prompting when `mode` is automated.
pub fn prompt_with<F, S>(
    config: &Config,
    mode: ExecutionMode,
    context: ConnectionContext,
    prior: Option<Credential>,
    make_surface: F,
) -> Result<PromptOutcome>
where
    F: FnOnce(&Config) -> Result<S, SurfaceError> + Send + 'static,
    S: PromptSurface,
{
    if !mode.is_interactive() {
        bail!(
            "Credentials for {} are required but prompting is disabled ({} execution)",
            context.uri,
            mode
        );
    }

    let ui = UiThread::spawn(PROMPT_THREAD_NAME).context("Failed to start prompt thread")?;
    let config = config.clone();

    let outcome = ui
        .invoke_and_wait(move || -> Result<PromptOutcome, SurfaceError> {
            let mut surface = make_surface(&config)?;
            Ok(CredentialPrompt::new(config).prompt(&mut surface, mode, &context, prior))
        })
        .context("Prompt thread went away")?
        .context("Failed to open prompt surface")?;

    Ok(outcome)
}

/// Handle `get`: read the request, prompt, and answer Git.
///
/// A declined prompt answers nothing, which makes Git fall back to its
/// next helper or fail.
pub fn run_get<R, W, F, S>(
    input: R,
    mut output: W,
    config: &Config,
    mode: ExecutionMode,
    make_surface: F,
) -> Result<()>
where
    R: BufRead,
    W: Write,
    F: FnOnce(&Config) -> Result<S, SurfaceError> + Send + 'static,
    S: PromptSurface,
{
    let request = HelperRequest::read_from(input).context("Failed to read credential request")?;
    debug!(?request, "Credential helper request");

    let context = request.context();
    let prior = request.prior();
    drop(request);

    match prompt_with(config, mode, context, prior, make_surface)? {
        PromptOutcome::Confirmed(credential) => {
            helper::write_credential(&mut output, &credential)
                .context("Failed to write credential")?;
            info!(username = ?credential.username, "Credential returned to git");
        }
        PromptOutcome::Declined => info!("Credential prompt declined"),
    }
    Ok(())
}

/// Handle `store` and `erase`: consume the request and do nothing.
pub fn run_ignored<R: BufRead>(operation: &str, input: R) -> Result<()> {
    let request = HelperRequest::read_from(input)
        .with_context(|| format!("Failed to read {} request", operation))?;
    debug!(operation, host = ?request.host, "Ignoring credential helper operation");
    Ok(())
}

/// Handle an askpass prompt. Returns `false` when there is no answer.
///
/// A username prompt is answered only when the URL already tells us the
/// username; otherwise `false` hands the question back to Git, which asks
/// on the terminal and then calls us again for the password. Every other
/// prompt shows the form and is answered with the secret. The answer is
/// written without a trailing newline.
pub fn run_askpass<W, F, S>(
    prompt_text: &str,
    mut output: W,
    config: &Config,
    mode: ExecutionMode,
    make_surface: F,
) -> Result<bool>
where
    W: Write,
    F: FnOnce(&Config) -> Result<S, SurfaceError> + Send + 'static,
    S: PromptSurface,
{
    let request = AskpassRequest::parse(prompt_text);
    debug!(?request, "Askpass request");

    if request.is_username() {
        let Some(username) = request.known_username() else {
            info!("Username not known from the URL, leaving it to git");
            return Ok(false);
        };
        write_answer(&mut output, &username)?;
        return Ok(true);
    }

    let outcome = prompt_with(config, mode, request.context(), request.prior(), make_surface)?;
    let Some(credential) = outcome.into_credential() else {
        info!("Askpass prompt declined");
        return Ok(false);
    };

    write_answer(&mut output, credential.expose_secret().unwrap_or_default())?;
    Ok(true)
}

fn write_answer<W: Write>(output: &mut W, answer: &str) -> Result<()> {
    write!(output, "{}", answer).context("Failed to write askpass answer")?;
    output.flush().context("Failed to flush askpass answer")?;
    Ok(())
}
