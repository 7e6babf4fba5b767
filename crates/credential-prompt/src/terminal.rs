//! Terminal prompt surface.
//!
//! Renders a [`FormLayout`] as a short question/answer exchange on the
//! controlling terminal. The secret is read with `rpassword` so it is not
//! echoed. The same surface can run over any reader/writer pair, which is
//! how it is tested.

use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Read, Write};

use credential_prompt_core::config::Config;
use credential_prompt_core::form::{Field, FormLayout, UsernameField};
use credential_prompt_core::{PromptSurface, SecretBuffer, SurfaceError, SurfaceEvent};
use tracing::{debug, trace};
use zeroize::Zeroizing;

/// Controlling terminal device.
pub const TTY_PATH: &str = "/dev/tty";

/// What the surface asks for next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step {
    Username,
    Secret,
    Confirm,
    Cancel,
}

/// Terminal-based prompt surface.
///
/// Asks for the username (when the layout has the field), then the secret,
/// then submits. Pressing Enter on an empty username keeps the pre-filled
/// value. A rejected submit asks for the secret again, up to
/// `max_attempts` rejections, after which the prompt is cancelled. End of
/// input cancels.
pub struct TerminalSurface {
    input: Box<dyn BufRead + Send>,
    output: Box<dyn Write + Send>,
    /// Read the secret from the terminal with echo disabled.
    hide_secret: bool,
    max_attempts: u32,
    rejected: u32,
    step: Step,
    layout: Option<FormLayout>,
}

impl TerminalSurface {
    /// Create a surface over arbitrary input and output.
    ///
    /// Secrets are read from `input` like any other line.
    pub fn new(
        input: impl BufRead + Send + 'static,
        output: impl Write + Send + 'static,
        max_attempts: u32,
    ) -> Self {
        Self {
            input: Box::new(input),
            output: Box::new(output),
            hide_secret: false,
            max_attempts: max_attempts.max(1),
            rejected: 0,
            step: Step::Secret,
            layout: None,
        }
    }

    /// Create a surface on the controlling terminal.
    ///
    /// Standard input and output are left alone; they usually carry the
    /// credential helper protocol.
    pub fn open_tty(max_attempts: u32) -> Result<Self, SurfaceError> {
        let input = File::open(TTY_PATH)?;
        let output = OpenOptions::new().write(true).open(TTY_PATH)?;

        let mut surface = Self::new(line_reader(input), output, max_attempts);
        surface.hide_secret = true;
        Ok(surface)
    }

    /// Read one line without its line ending. `None` at end of input.
    fn read_line(&mut self) -> Result<Option<Zeroizing<String>>, SurfaceError> {
        let mut line = Zeroizing::new(String::new());
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        while line.ends_with(['\n', '\r']) {
            line.pop();
        }
        Ok(Some(line))
    }

    fn read_secret(&mut self) -> Result<Option<SecretBuffer>, SurfaceError> {
        if self.hide_secret {
            let secret = rpassword::read_password()?;
            return Ok(Some(SecretBuffer::from(secret)));
        }
        Ok(self.read_line()?.map(|line| SecretBuffer::from(line.as_str())))
    }

    fn layout(&self) -> Result<&FormLayout, SurfaceError> {
        self.layout
            .as_ref()
            .ok_or_else(|| SurfaceError::Ui("terminal surface used before show".to_string()))
    }

    fn ask_username(&mut self, field: UsernameField) -> Result<SurfaceEvent, SurfaceError> {
        if field.initial.is_empty() {
            write!(self.output, "{}: ", field.label)?;
        } else {
            write!(self.output, "{} [{}]: ", field.label, field.initial)?;
        }
        self.output.flush()?;

        let Some(line) = self.read_line()? else {
            debug!("End of input at username");
            return Ok(SurfaceEvent::CancelRequested);
        };

        self.step = Step::Secret;
        let username = if line.is_empty() {
            field.initial
        } else {
            line.to_string()
        };
        Ok(SurfaceEvent::UsernameEdited(username))
    }

    fn ask_secret(&mut self, label: &str) -> Result<SurfaceEvent, SurfaceError> {
        write!(self.output, "{}: ", label)?;
        self.output.flush()?;

        let Some(secret) = self.read_secret()? else {
            debug!("End of input at secret");
            return Ok(SurfaceEvent::CancelRequested);
        };

        self.step = Step::Confirm;
        Ok(SurfaceEvent::SecretEdited(secret))
    }
}

/// Buffered reader that never reads past the end of the current line.
///
/// `rpassword` reads the secret from its own handle on the terminal, so
/// anything buffered here beyond the username line would be lost to it.
fn line_reader<R: Read>(input: R) -> BufReader<R> {
    BufReader::with_capacity(1, input)
}

/// Open the terminal surface configured by `config`.
pub fn open_tty_surface(config: &Config) -> Result<TerminalSurface, SurfaceError> {
    TerminalSurface::open_tty(config.terminal.max_attempts)
}

impl PromptSurface for TerminalSurface {
    fn show(&mut self, layout: &FormLayout) -> Result<(), SurfaceError> {
        writeln!(self.output, "{}", layout.title)?;
        writeln!(self.output, "{}", layout.message)?;
        if let Some(note) = &layout.note {
            writeln!(self.output, "{}", note)?;
        }
        self.output.flush()?;

        self.step = match layout.initial_focus() {
            Field::Username => Step::Username,
            Field::Secret => Step::Secret,
        };
        self.layout = Some(layout.clone());
        Ok(())
    }

    fn set_confirm_enabled(&mut self, enabled: bool) {
        // Enter always submits; the prompt turns it down while disabled
        trace!(enabled, "Terminal confirm state changed");
    }

    fn confirm_rejected(&mut self) {
        self.rejected += 1;
        let label = self
            .layout
            .as_ref()
            .map(|l| l.secret_field.label)
            .unwrap_or("Password");

        let message = if self.rejected >= self.max_attempts {
            self.step = Step::Cancel;
            format!("{} is required, giving up.", label)
        } else {
            self.step = Step::Secret;
            format!("{} must not be empty.", label)
        };

        // Nothing to do about a broken terminal here; the next read fails
        let _ = writeln!(self.output, "{}", message);
    }

    fn next_event(&mut self) -> Result<SurfaceEvent, SurfaceError> {
        let layout = self.layout()?;
        let username_field = layout.username_field.clone();
        let secret_label = layout.secret_field.label;

        match self.step {
            Step::Username => match username_field {
                Some(field) => self.ask_username(field),
                None => self.ask_secret(secret_label),
            },
            Step::Secret => self.ask_secret(secret_label),
            Step::Confirm => {
                self.step = Step::Secret;
                Ok(SurfaceEvent::ConfirmRequested)
            }
            Step::Cancel => Ok(SurfaceEvent::CancelRequested),
        }
    }

    fn close(&mut self) {
        let _ = self.output.flush();
    }
}

impl std::fmt::Debug for TerminalSurface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TerminalSurface")
            .field("hide_secret", &self.hide_secret)
            .field("max_attempts", &self.max_attempts)
            .field("rejected", &self.rejected)
            .field("step", &self.step)
            .finish()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::io::Cursor;
    use std::sync::{Arc, Mutex};

    use credential_prompt_core::{ConnectionContext, CredentialPrompt, ExecutionMode, PromptOutcome};

    /// Output sink the test can read back after the surface is gone.
    #[derive(Clone, Default)]
    pub(crate) struct SharedOutput(Arc<Mutex<Vec<u8>>>);

    impl SharedOutput {
        pub(crate) fn contents(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }
    }

    impl Write for SharedOutput {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    fn surface(input: &str) -> (TerminalSurface, SharedOutput) {
        let output = SharedOutput::default();
        let surface = TerminalSurface::new(Cursor::new(input.as_bytes().to_vec()), output.clone(), 3);
        (surface, output)
    }

    fn prompt(surface: &mut TerminalSurface, context: &ConnectionContext) -> PromptOutcome {
        CredentialPrompt::default().prompt(surface, ExecutionMode::Interactive, context, None)
    }

    fn gitlab() -> ConnectionContext {
        ConnectionContext::new("https://gitlab.com/group/project.git").with_host("gitlab.com")
    }

    #[test]
    fn username_and_password() {
        let (mut surface, output) = surface("alice\nhunter2\n");

        let credential = prompt(&mut surface, &gitlab()).into_credential().unwrap();

        assert_eq!(credential.username.as_deref(), Some("alice"));
        assert_eq!(credential.expose_secret(), Some("hunter2"));

        let text = output.contents();
        assert!(text.starts_with("Settings Repository\nLog in to https://gitlab.com/group/project.git\n"));
        assert!(text.contains("Username: "));
        assert!(text.contains("Password: "));
        assert!(!text.contains("hunter2"));
    }

    #[test]
    fn empty_username_keeps_prefilled_value() {
        let (mut surface, output) = surface("\ns3cret\n");
        let prior = credential_prompt_core::Credential::with_username("bob");

        let credential = CredentialPrompt::default()
            .prompt(&mut surface, ExecutionMode::Interactive, &gitlab(), Some(prior))
            .into_credential()
            .unwrap();

        assert_eq!(credential.username.as_deref(), Some("bob"));
        assert!(output.contents().contains("Username [bob]: "));
    }

    #[test]
    fn github_asks_for_token_only() {
        let context = ConnectionContext::new("https://github.com/octocat/Hello-World.git")
            .with_host("github.com")
            .with_path("/octocat/Hello-World.git");
        let (mut surface, output) = surface("ghp_token\r\n");

        let credential = prompt(&mut surface, &context).into_credential().unwrap();

        assert_eq!(credential.username.as_deref(), Some("octocat"));
        assert_eq!(credential.expose_secret(), Some("ghp_token"));
        let text = output.contents();
        assert!(text.contains("Token: "));
        assert!(!text.contains("Username"));
    }

    #[test]
    fn empty_secret_is_asked_again() {
        let (mut surface, output) = surface("alice\n\npw\n");

        let credential = prompt(&mut surface, &gitlab()).into_credential().unwrap();

        assert_eq!(credential.expose_secret(), Some("pw"));
        assert!(output.contents().contains("Password must not be empty."));
    }

    #[test]
    fn gives_up_after_max_attempts() {
        let (mut surface, output) = surface("alice\n\n\n\nnever-read\n");

        let outcome = prompt(&mut surface, &gitlab());

        assert!(matches!(outcome, PromptOutcome::Declined));
        assert!(output.contents().contains("Password is required, giving up."));
    }

    #[test]
    fn end_of_input_cancels() {
        for input in ["", "alice\n"] {
            let (mut surface, _) = surface(input);
            assert!(!prompt(&mut surface, &gitlab()).is_confirmed());
        }
    }

    #[test]
    fn ssh_key_passphrase() {
        let context = ConnectionContext::new("ssh://git@example.com/repo.git")
            .with_ssh_key_file("/home/u/.ssh/id_ed25519");
        let (mut surface, output) = surface("correct horse\n");

        let credential = prompt(&mut surface, &context).into_credential().unwrap();

        assert_eq!(credential.username.as_deref(), Some("id_ed25519"));
        assert_eq!(credential.expose_secret(), Some("correct horse"));
        assert!(output
            .contents()
            .contains("Enter your password for the SSH key \"id_ed25519\""));
    }

    #[test]
    fn line_reader_leaves_rest_of_input_unread() {
        let mut tty = Cursor::new(b"alice\nhunter2\n".to_vec());

        let mut line = String::new();
        line_reader(&mut tty).read_line(&mut line).unwrap();

        assert_eq!(line, "alice\n");
        assert_eq!(tty.position(), 6);
    }

    #[test]
    fn first_question_follows_initial_focus() {
        let github = ConnectionContext::new("https://github.com/o/r.git")
            .with_host("github.com")
            .with_path("/o/r.git");

        for (context, expected) in [(github, Step::Secret), (gitlab(), Step::Username)] {
            let (mut surface, _) = surface("");
            let layout = FormLayout::build(&context, None, &Config::default());
            surface.show(&layout).unwrap();
            assert_eq!(surface.step, expected);
        }
    }

    #[test]
    fn next_event_before_show_is_an_error() {
        let (mut surface, _) = surface("x\n");
        assert!(matches!(surface.next_event(), Err(SurfaceError::Ui(_))));
    }

    #[test]
    fn zero_attempts_is_treated_as_one() {
        let output = SharedOutput::default();
        let mut surface = TerminalSurface::new(Cursor::new(b"alice\n\npw\n".to_vec()), output, 0);

        assert!(!prompt(&mut surface, &gitlab()).is_confirmed());
    }
}
