//! Tracing subscriber setup.

use tracing_subscriber::{fmt, EnvFilter};

use crate::infra::config::LogFormat;

/// Installs the global subscriber. `RUST_LOG` overrides the default `info` level.
///
/// Calling this twice is harmless: the second install fails and is ignored.
pub fn init(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = fmt().with_env_filter(filter);
    let result = match format {
        LogFormat::Json => builder.json().try_init(),
        LogFormat::Pretty => builder.try_init(),
    };
    if let Err(e) = result {
        tracing::warn!(error = %e, "tracing init failed");
    }
}
