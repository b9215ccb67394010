#![forbid(unsafe_code)]

//! Command-line argument parsing for the demo.
//!
//! Parses args manually (no external dependencies) to keep the binary lean.
//! Supports environment variable overrides via `EVCHAN_DEMO_*` prefix.

use std::env;
use std::process;

const VERSION: &str = env!("CARGO_PKG_VERSION");

const HELP_TEXT: &str = "\
evchan demo: sensors and controllers wired through typed event channels

USAGE:
    evchan-demo [OPTIONS]

OPTIONS:
    --log=FILTER         tracing filter directive (default: info)
    --log-format=FORMAT  Log output format: 'text' or 'json' (default: text)
    --trace-dispatch     Emit a trace event for every publish
    --help, -h           Show this help message
    --version, -V        Show version

ENVIRONMENT VARIABLES:
    EVCHAN_DEMO_LOG             Override --log
    EVCHAN_DEMO_LOG_FORMAT      Override --log-format
    EVCHAN_DEMO_TRACE_DISPATCH  Override --trace-dispatch (1/true to enable)";

/// Log line encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl LogFormat {
    fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "text" => Some(Self::Text),
            "json" => Some(Self::Json),
            _ => None,
        }
    }
}

/// Parsed command-line options.
#[derive(Debug, Clone)]
pub struct Opts {
    /// `tracing_subscriber::EnvFilter` directive string.
    pub log_filter: String,
    /// Log line encoding.
    pub log_format: LogFormat,
    /// Trace every publish on every channel.
    pub trace_dispatch: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum ParseError {
    Help,
    Version,
    InvalidValue { flag: &'static str, value: String },
    UnknownArg(String),
}

impl Default for Opts {
    fn default() -> Self {
        Self {
            log_filter: "info".into(),
            log_format: LogFormat::Text,
            trace_dispatch: false,
        }
    }
}

impl Opts {
    /// Parse command-line arguments and environment variables.
    ///
    /// Environment variables take precedence over defaults but are overridden
    /// by explicit command-line flags.
    pub fn parse() -> Self {
        match Self::parse_from_env_and_args(env::args().skip(1), |key| env::var(key).ok()) {
            Ok(opts) => opts,
            Err(ParseError::Help) => {
                println!("{HELP_TEXT}");
                process::exit(0);
            }
            Err(ParseError::Version) => {
                println!("evchan-demo {VERSION}");
                process::exit(0);
            }
            Err(ParseError::InvalidValue { flag, value }) => {
                eprintln!("Invalid {flag} value: {value}");
                process::exit(1);
            }
            Err(ParseError::UnknownArg(arg)) => {
                eprintln!("Unknown argument: {arg}");
                eprintln!("Run with --help for usage information.");
                process::exit(1);
            }
        }
    }

    fn parse_from_env_and_args<I, S, F>(args: I, get_env: F) -> Result<Self, ParseError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
        F: Fn(&str) -> Option<String>,
    {
        let mut opts = Self::default();

        // Apply environment variable defaults first
        if let Some(val) = get_env("EVCHAN_DEMO_LOG")
            && !val.trim().is_empty()
        {
            opts.log_filter = val;
        }
        if let Some(val) = get_env("EVCHAN_DEMO_LOG_FORMAT")
            && let Some(format) = LogFormat::from_name(&val)
        {
            opts.log_format = format;
        }
        if let Some(val) = get_env("EVCHAN_DEMO_TRACE_DISPATCH") {
            let enabled = val == "1" || val.eq_ignore_ascii_case("true");
            opts.trace_dispatch = enabled;
        }

        // Parse command-line args (override env vars)
        for arg in args {
            let arg = arg.as_ref();
            match arg {
                "--help" | "-h" => {
                    return Err(ParseError::Help);
                }
                "--version" | "-V" => {
                    return Err(ParseError::Version);
                }
                "--trace-dispatch" => {
                    opts.trace_dispatch = true;
                }
                other => {
                    if let Some(val) = other.strip_prefix("--log-format=") {
                        match LogFormat::from_name(val) {
                            Some(format) => opts.log_format = format,
                            None => {
                                return Err(ParseError::InvalidValue {
                                    flag: "--log-format",
                                    value: val.to_string(),
                                });
                            }
                        }
                    } else if let Some(val) = other.strip_prefix("--log=") {
                        if val.trim().is_empty() {
                            return Err(ParseError::InvalidValue {
                                flag: "--log",
                                value: val.to_string(),
                            });
                        }
                        opts.log_filter = val.to_string();
                    } else {
                        return Err(ParseError::UnknownArg(other.to_string()));
                    }
                }
            }
        }

        Ok(opts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_with_env<I, S>(
        args: I,
        env_pairs: &[(&'static str, &'static str)],
    ) -> Result<Opts, ParseError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut map = std::collections::HashMap::new();
        for (key, value) in env_pairs {
            map.insert(*key, *value);
        }
        Opts::parse_from_env_and_args(args, |key| map.get(key).map(|value| (*value).to_string()))
    }

    #[test]
    fn default_opts() {
        let opts = Opts::default();
        assert_eq!(opts.log_filter, "info");
        assert_eq!(opts.log_format, LogFormat::Text);
        assert!(!opts.trace_dispatch);
    }

    #[test]
    fn no_args_gives_defaults() {
        let opts = parse_with_env(Vec::<&str>::new(), &[]).unwrap();
        assert_eq!(opts.log_filter, "info");
        assert_eq!(opts.log_format, LogFormat::Text);
    }

    #[test]
    fn flags_are_parsed() {
        let opts = parse_with_env(
            ["--log=evchan=debug", "--log-format=JSON", "--trace-dispatch"],
            &[],
        )
        .unwrap();
        assert_eq!(opts.log_filter, "evchan=debug");
        assert_eq!(opts.log_format, LogFormat::Json);
        assert!(opts.trace_dispatch);
    }

    #[test]
    fn env_applies_when_no_flag() {
        let opts = parse_with_env(
            Vec::<&str>::new(),
            &[
                ("EVCHAN_DEMO_LOG", "trace"),
                ("EVCHAN_DEMO_LOG_FORMAT", "json"),
                ("EVCHAN_DEMO_TRACE_DISPATCH", "true"),
            ],
        )
        .unwrap();
        assert_eq!(opts.log_filter, "trace");
        assert_eq!(opts.log_format, LogFormat::Json);
        assert!(opts.trace_dispatch);
    }

    #[test]
    fn flags_override_env() {
        let opts = parse_with_env(
            ["--log=warn", "--log-format=text"],
            &[("EVCHAN_DEMO_LOG", "trace"), ("EVCHAN_DEMO_LOG_FORMAT", "json")],
        )
        .unwrap();
        assert_eq!(opts.log_filter, "warn");
        assert_eq!(opts.log_format, LogFormat::Text);
    }

    #[test]
    fn bad_env_values_are_ignored() {
        let opts = parse_with_env(
            Vec::<&str>::new(),
            &[
                ("EVCHAN_DEMO_LOG", "  "),
                ("EVCHAN_DEMO_LOG_FORMAT", "xml"),
                ("EVCHAN_DEMO_TRACE_DISPATCH", "nope"),
            ],
        )
        .unwrap();
        assert_eq!(opts.log_filter, "info");
        assert_eq!(opts.log_format, LogFormat::Text);
        assert!(!opts.trace_dispatch);
    }

    #[test]
    fn help_and_version() {
        assert_eq!(parse_with_env(["--help"], &[]).unwrap_err(), ParseError::Help);
        assert_eq!(parse_with_env(["-h"], &[]).unwrap_err(), ParseError::Help);
        assert_eq!(
            parse_with_env(["--version"], &[]).unwrap_err(),
            ParseError::Version
        );
        assert_eq!(parse_with_env(["-V"], &[]).unwrap_err(), ParseError::Version);
    }

    #[test]
    fn invalid_values() {
        assert_eq!(
            parse_with_env(["--log-format=xml"], &[]).unwrap_err(),
            ParseError::InvalidValue {
                flag: "--log-format",
                value: "xml".to_string(),
            }
        );
        assert_eq!(
            parse_with_env(["--log="], &[]).unwrap_err(),
            ParseError::InvalidValue {
                flag: "--log",
                value: String::new(),
            }
        );
    }

    #[test]
    fn unknown_argument() {
        assert_eq!(
            parse_with_env(["--bogus"], &[]).unwrap_err(),
            ParseError::UnknownArg("--bogus".to_string())
        );
    }
}
