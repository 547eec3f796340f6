//! Logging setup
//!
//! Human-readable or JSON-formatted `tracing` output on stderr, so logs
//! never interleave with answers printed on stdout.

use anyhow::Result;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Filter used when `RUST_LOG` is not set
///
/// # Examples
///
/// ```
/// use medai::logging::default_filter;
///
/// assert_eq!(default_filter(false), "medai=info");
/// assert_eq!(default_filter(true), "medai=debug");
/// ```
pub fn default_filter(verbose: bool) -> &'static str {
    if verbose {
        "medai=debug"
    } else {
        "medai=info"
    }
}

/// Install the global tracing subscriber
///
/// `RUST_LOG` wins over the verbosity flag when present.
///
/// # Errors
///
/// Returns error if a global subscriber is already installed
///
/// # Examples
///
/// ```no_run
/// use medai::logging::init_tracing;
///
/// init_tracing(false, true).unwrap();
/// ```
pub fn init_tracing(verbose: bool, json: bool) -> Result<()> {
    let env_filter =
        EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(default_filter(verbose)))?;

    let registry = tracing_subscriber::registry().with(env_filter);

    if json {
        registry
            .with(
                fmt::layer()
                    .json()
                    .with_current_span(true)
                    .with_writer(std::io::stderr),
            )
            .try_init()?;
    } else {
        registry
            .with(fmt::layer().with_writer(std::io::stderr))
            .try_init()?;
    }

    Ok(())
}
