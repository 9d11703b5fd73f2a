//! Logging configuration using tracing.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const DEFAULT_LEVEL: &str = "warn";

/// Pick the filter: an explicit `level` wins, then `RUST_LOG`, then `warn`
fn build_filter(level: Option<&str>) -> EnvFilter {
    let filter = match level {
        Some(level) => EnvFilter::try_new(level).map_err(|_| ()),
        None => EnvFilter::try_from_default_env().map_err(|_| ()),
    };
    filter.unwrap_or_else(|_| EnvFilter::new(DEFAULT_LEVEL))
}

/// Initialize logging
///
/// Logs go to stderr so command output stays clean.
pub fn init(level: Option<&str>) -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(build_filter(level))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .try_init()?;

    Ok(())
}
