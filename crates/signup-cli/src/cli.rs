#![forbid(unsafe_code)]

//! Command-line argument parsing for the signup CLI.
//!
//! Parses args by hand. Supports environment variable overrides via the
//! `SIGNUP_*` prefix; explicit flags win over the environment.

use std::env;
use std::path::PathBuf;
use std::process;
use std::time::Duration;

const VERSION: &str = env!("CARGO_PKG_VERSION");

pub const HELP_TEXT: &str = "\
signup: interactive signup form

USAGE:
    signup [OPTIONS]

OPTIONS:
    --storage=PATH       History file (default: $XDG_STATE_HOME/signup/storage.json)
    --memory             Keep history in memory only
    --delay-ms=N         Simulated endpoint latency in ms (default: 1000)
    --help, -h           Show this help message
    --version, -V        Show version

COMMANDS (at the prompt):
    email <value>        Set the email field
    password <value>     Set the password field and show its strength
    submit               Submit the form
    strength             Show the password strength checklist
    history              List recent signups
    clear                Clear signup history
    status               Show form status and field values
    help                 Show commands
    quit                 Exit

ENVIRONMENT VARIABLES:
    SIGNUP_STORAGE       Default for --storage (flags take precedence)
    SIGNUP_DELAY_MS      Default for --delay-ms (flags take precedence)
    RUST_LOG             Log filter for stderr diagnostics (default: warn)";

/// Where history lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StorageChoice {
    /// Platform state directory.
    Default,
    /// Explicit file path.
    File(PathBuf),
    /// Ephemeral, in-memory.
    Memory,
}

/// Parsed command-line options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Opts {
    pub storage: StorageChoice,
    /// Endpoint latency override, if any.
    pub delay: Option<Duration>,
}

impl Default for Opts {
    fn default() -> Self {
        Self {
            storage: StorageChoice::Default,
            delay: None,
        }
    }
}

/// What the process should do after parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Parsed {
    Run(Opts),
    Help,
    Version,
}

impl Opts {
    /// Parse process arguments and environment, exiting on `--help`,
    /// `--version`, or a bad value.
    pub fn parse() -> Self {
        match Self::parse_from(env::args().skip(1), |key| env::var(key).ok()) {
            Ok(Parsed::Run(opts)) => opts,
            Ok(Parsed::Help) => {
                println!("{HELP_TEXT}");
                process::exit(0);
            }
            Ok(Parsed::Version) => {
                println!("signup {VERSION}");
                process::exit(0);
            }
            Err(msg) => {
                eprintln!("{msg}");
                eprintln!("Run with --help for usage.");
                process::exit(1);
            }
        }
    }

    /// Parse from explicit arguments and an environment lookup.
    pub fn parse_from<I, S, F>(args: I, env_var: F) -> Result<Parsed, String>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
        F: Fn(&str) -> Option<String>,
    {
        let mut opts = Self::default();

        if let Some(val) = env_var("SIGNUP_STORAGE")
            && !val.is_empty()
        {
            opts.storage = StorageChoice::File(PathBuf::from(val));
        }
        if let Some(val) = env_var("SIGNUP_DELAY_MS") {
            opts.delay = Some(parse_delay(&val, "SIGNUP_DELAY_MS")?);
        }

        for arg in args {
            match arg.as_ref() {
                "--help" | "-h" => return Ok(Parsed::Help),
                "--version" | "-V" => return Ok(Parsed::Version),
                "--memory" => opts.storage = StorageChoice::Memory,
                other => {
                    if let Some(val) = other.strip_prefix("--storage=") {
                        opts.storage = StorageChoice::File(PathBuf::from(val));
                    } else if let Some(val) = other.strip_prefix("--delay-ms=") {
                        opts.delay = Some(parse_delay(val, "--delay-ms")?);
                    } else {
                        return Err(format!("Unknown argument: {other}"));
                    }
                }
            }
        }

        Ok(Parsed::Run(opts))
    }
}

fn parse_delay(val: &str, name: &str) -> Result<Duration, String> {
    val.parse::<u64>()
        .map(Duration::from_millis)
        .map_err(|_| format!("Invalid {name} value: {val}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    fn run(parsed: Result<Parsed, String>) -> Opts {
        match parsed {
            Ok(Parsed::Run(opts)) => opts,
            other => panic!("expected Run, got {other:?}"),
        }
    }

    #[test]
    fn defaults() {
        let opts = run(Opts::parse_from(Vec::<String>::new(), no_env));
        assert_eq!(opts, Opts::default());
    }

    #[test]
    fn flags() {
        let opts = run(Opts::parse_from(["--storage=/tmp/h.json", "--delay-ms=5"], no_env));
        assert_eq!(opts.storage, StorageChoice::File(PathBuf::from("/tmp/h.json")));
        assert_eq!(opts.delay, Some(Duration::from_millis(5)));

        let opts = run(Opts::parse_from(["--memory"], no_env));
        assert_eq!(opts.storage, StorageChoice::Memory);
    }

    #[test]
    fn env_then_flags() {
        let env = |key: &str| match key {
            "SIGNUP_STORAGE" => Some("/env/path.json".to_string()),
            "SIGNUP_DELAY_MS" => Some("20".to_string()),
            _ => None,
        };
        let opts = run(Opts::parse_from(Vec::<String>::new(), env));
        assert_eq!(opts.storage, StorageChoice::File(PathBuf::from("/env/path.json")));
        assert_eq!(opts.delay, Some(Duration::from_millis(20)));

        let opts = run(Opts::parse_from(["--memory", "--delay-ms=0"], env));
        assert_eq!(opts.storage, StorageChoice::Memory);
        assert_eq!(opts.delay, Some(Duration::ZERO));
    }

    #[test]
    fn help_version_and_errors() {
        assert_eq!(Opts::parse_from(["-h"], no_env), Ok(Parsed::Help));
        assert_eq!(Opts::parse_from(["--version"], no_env), Ok(Parsed::Version));
        assert!(Opts::parse_from(["--delay-ms=soon"], no_env).is_err());
        assert!(Opts::parse_from(["--bogus"], no_env).is_err());
    }

    #[test]
    fn help_text_matches_flag_precedence() {
        assert!(HELP_TEXT.contains("SIGNUP_STORAGE       Default for --storage (flags take precedence)"));
        assert!(HELP_TEXT.contains("SIGNUP_DELAY_MS      Default for --delay-ms (flags take precedence)"));
        assert!(!HELP_TEXT.contains("Override --"));

        let env = |key: &str| (key == "SIGNUP_STORAGE").then(|| "/env.json".to_string());
        let opts = run(Opts::parse_from(["--storage=/flag.json"], env));
        assert_eq!(opts.storage, StorageChoice::File(PathBuf::from("/flag.json")));
    }
}
