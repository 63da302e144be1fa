//! Interactive prompt loop driving a [`FormController`].

use std::io::{self, BufRead, Write};

use crossterm::style::{Stylize, style};
use signup_core::{Field, FormController, FormStatus};
use tokio::runtime::Runtime;

use crate::cli::HELP_TEXT;
use crate::render;

const PROMPT: &str = "signup> ";

/// One line of user input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Email(String),
    Password(String),
    Submit,
    Strength,
    History,
    Clear,
    Status,
    Help,
    Quit,
    Empty,
}

impl Command {
    /// Parse a prompt line.
    ///
    /// Field values are taken verbatim after the first space so that
    /// normalization stays the controller's job.
    pub fn parse(line: &str) -> Result<Self, String> {
        let line = line.trim_end_matches(['\n', '\r']);
        let (word, rest) = match line.trim_start().split_once(' ') {
            Some((word, rest)) => (word, Some(rest)),
            None => (line.trim(), None),
        };

        match (word, rest) {
            ("", _) => Ok(Self::Empty),
            ("email", value) => Ok(Self::Email(value.unwrap_or_default().to_string())),
            ("password", value) => Ok(Self::Password(value.unwrap_or_default().to_string())),
            ("submit", _) => Ok(Self::Submit),
            ("strength", _) => Ok(Self::Strength),
            ("history", _) => Ok(Self::History),
            ("clear", _) => Ok(Self::Clear),
            ("status", _) => Ok(Self::Status),
            ("help" | "?", _) => Ok(Self::Help),
            ("quit" | "exit" | "q", _) => Ok(Self::Quit),
            (other, _) => Err(format!("unknown command: {other} (try 'help')")),
        }
    }
}

/// Whether the loop should keep reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit,
}

/// The form plus the runtime its submissions run on.
pub struct Session {
    form: FormController,
    rt: Runtime,
}

impl Session {
    #[must_use]
    pub fn new(form: FormController, rt: Runtime) -> Self {
        Self { form, rt }
    }

    #[must_use]
    pub fn form(&self) -> &FormController {
        &self.form
    }

    /// Read commands from `input` until `quit` or end of input.
    pub fn run(&self, mut input: impl BufRead, mut out: impl Write) -> io::Result<()> {
        writeln!(out, "Type 'help' for commands.")?;
        let mut line = String::new();
        loop {
            write!(out, "{PROMPT}")?;
            out.flush()?;

            line.clear();
            if input.read_line(&mut line)? == 0 {
                writeln!(out)?;
                return Ok(());
            }

            let flow = match Command::parse(&line) {
                Ok(cmd) => self.execute(cmd, &mut out)?,
                Err(msg) => {
                    writeln!(out, "{}", msg.red())?;
                    Flow::Continue
                }
            };
            if flow == Flow::Exit {
                return Ok(());
            }
        }
    }

    /// Apply one command and write its output.
    pub fn execute(&self, cmd: Command, out: &mut impl Write) -> io::Result<Flow> {
        match cmd {
            Command::Empty => {}
            Command::Email(value) => self.form.set_email(value),
            Command::Password(value) => {
                self.form.set_password(value);
                writeln!(out, "{}", render::strength_meter(&self.form.strength()))?;
            }
            Command::Submit => {
                writeln!(out, "{}", "Submitting...".yellow())?;
                out.flush()?;
                let result = self.rt.block_on(self.form.submit());
                if let Err(e) = &result {
                    tracing::debug!(error = ?e, "submission did not create an account");
                }
                self.write_feedback(out)?;
            }
            Command::Strength => {
                let score = self.form.strength();
                writeln!(out, "{}", render::strength_meter(&score))?;
                for line in render::checklist(&score) {
                    writeln!(out, "  {line}")?;
                }
            }
            Command::History => {
                let log = self.form.history();
                if log.is_empty() {
                    writeln!(out, "No recent signups.")?;
                }
                for line in render::history(&log) {
                    writeln!(out, "  {line}")?;
                }
            }
            Command::Clear => {
                self.form.clear_history();
                writeln!(out, "History cleared.")?;
            }
            Command::Status => {
                writeln!(out, "status:   {}", self.form.status())?;
                writeln!(out, "email:    {}", self.form.email())?;
                writeln!(out, "password: {}", "*".repeat(self.form.password().chars().count()))?;
                self.write_feedback(out)?;
            }
            Command::Help => writeln!(out, "{HELP_TEXT}")?,
            Command::Quit => return Ok(Flow::Exit),
        }
        Ok(Flow::Continue)
    }

    fn write_feedback(&self, out: &mut impl Write) -> io::Result<()> {
        let color = render::status_color(self.form.status());
        if let Some(feedback) = self.form.feedback() {
            writeln!(out, "{}", style(feedback).with(color))?;
        }
        if self.form.status() == FormStatus::Error {
            for field in [Field::Email, Field::Password] {
                if let Some(msg) = self.form.field_error(field) {
                    let name = match field {
                        Field::Email => "email",
                        Field::Password => "password",
                    };
                    writeln!(out, "  {name}: {msg}")?;
                }
            }
        }
        Ok(())
    }
}
