//! git-credential-prompt - Interactive login prompt for Git.
//!
//! Works both as a Git credential helper and as an askpass program:
//!
//! ```bash
//! # As a credential helper
//! git config --global credential.helper prompt
//!
//! # As askpass (the prompt is passed as the only argument)
//! export GIT_ASKPASS=/path/to/git-credential-prompt
//! export SSH_ASKPASS=/path/to/git-credential-prompt
//! ```
//!
//! The form is shown on the controlling terminal. Credentials go to stdout,
//! logs go to stderr.

use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::Result;
use clap::{ArgAction, Parser, Subcommand};

use credential_prompt::terminal::open_tty_surface;
use credential_prompt::{
    detect_execution_mode, load_config, run_askpass, run_get, run_ignored,
    ENV_GIT_TERMINAL_PROMPT,
};
use credential_prompt_core::ExecutionMode;

use tracing::debug;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Prompt used when run as askpass without an argument.
const DEFAULT_ASKPASS_PROMPT: &str = "Password:";

/// Interactive credential prompt for Git.
#[derive(Parser)]
#[command(name = "git-credential-prompt")]
#[command(version, about, long_about = None)]
#[command(args_conflicts_with_subcommands = true)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Prompt text, when invoked directly as GIT_ASKPASS/SSH_ASKPASS
    #[arg(value_name = "PROMPT")]
    prompt: Vec<String>,

    /// Path to config file [default: ~/.config/credential-prompt/config.toml]
    #[arg(short, long, value_name = "PATH", global = true)]
    config: Option<PathBuf>,

    /// Never prompt; fail instead (also set by GIT_TERMINAL_PROMPT=0)
    #[arg(long, global = true)]
    non_interactive: bool,

    /// Increase log verbosity (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Credential helper: prompt for a credential and print it
    Get,

    /// Credential helper: accepted and ignored
    Store,

    /// Credential helper: accepted and ignored
    Erase,

    /// Askpass: answer a Git or OpenSSH prompt
    Askpass {
        /// Prompt text
        prompt: Vec<String>,
    },
}

fn setup_logging(verbose: u8) {
    // stdout carries credentials, so only warnings by default
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true).with_writer(io::stderr))
        .with(filter)
        .init();
}

fn askpass_prompt(words: &[String]) -> String {
    if words.is_empty() {
        DEFAULT_ASKPASS_PROMPT.to_string()
    } else {
        words.join(" ")
    }
}

fn askpass(prompt: &[String], config_path: Option<&Path>, mode: ExecutionMode) -> Result<ExitCode> {
    let config = load_config(config_path)?;
    let confirmed = run_askpass(
        &askpass_prompt(prompt),
        io::stdout().lock(),
        &config,
        mode,
        open_tty_surface,
    )?;

    Ok(if confirmed {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

fn run(cli: Cli) -> Result<ExitCode> {
    let git_terminal_prompt = std::env::var(ENV_GIT_TERMINAL_PROMPT).ok();
    let mode = detect_execution_mode(cli.non_interactive, git_terminal_prompt.as_deref());
    debug!(%mode, "Execution mode");

    match cli.command {
        Some(Commands::Get) => {
            let config = load_config(cli.config.as_deref())?;
            run_get(io::stdin().lock(), io::stdout().lock(), &config, mode, open_tty_surface)?;
            Ok(ExitCode::SUCCESS)
        }
        Some(Commands::Store) => {
            run_ignored("store", io::stdin().lock())?;
            Ok(ExitCode::SUCCESS)
        }
        Some(Commands::Erase) => {
            run_ignored("erase", io::stdin().lock())?;
            Ok(ExitCode::SUCCESS)
        }
        Some(Commands::Askpass { prompt }) => askpass(&prompt, cli.config.as_deref(), mode),
        None => askpass(&cli.prompt, cli.config.as_deref(), mode),
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    setup_logging(cli.verbose);

    match run(cli) {
        Ok(code) => code,
        Err(e) => {
            let _ = io::stdout().flush();
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
