#![forbid(unsafe_code)]

//! `tracing` subscriber setup for the demo binary.

use std::error::Error;

use tracing_subscriber::EnvFilter;

use crate::cli::{LogFormat, Opts};

/// Install the global subscriber described by `opts`. Output goes to stderr.
///
/// # Errors
///
/// Fails if the filter directive does not parse or a global subscriber is
/// already installed.
pub fn init(opts: &Opts) -> Result<(), Box<dyn Error + Send + Sync>> {
    let filter = EnvFilter::try_new(&opts.log_filter)?;
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    match opts.log_format {
        LogFormat::Text => builder.try_init(),
        LogFormat::Json => builder.json().try_init(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_bad_filter() {
        let opts = Opts {
            log_filter: "evchan=notalevel".into(),
            ..Opts::default()
        };
        assert!(init(&opts).is_err());
    }
}
