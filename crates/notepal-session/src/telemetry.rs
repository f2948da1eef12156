//! Tracing setup for applications embedding the session.
//!
//! Environment variables:
//!   LOG_FORMAT  - "json" or "text" (default: "text")
//!   LOG_ANSI    - "true"/"false" override ANSI colors (auto-detected by default)
//!   RUST_LOG    - standard env filter (default: every NotePal crate at info)

use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Filter used when `RUST_LOG` is unset or unparsable.
pub const DEFAULT_FILTER: &str = "notepal_core=info,notepal_store=info,notepal_session=info";

/// Output format of the fmt layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

impl LogFormat {
    fn from_env_value(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            Some(v) if v.eq_ignore_ascii_case("json") => LogFormat::Json,
            _ => LogFormat::Text,
        }
    }
}

fn parse_ansi(value: Option<&str>) -> Option<bool> {
    value.map(|v| v == "true" || v == "1")
}

/// Install the global subscriber.
///
/// Loads `.env` first. Does nothing when a global subscriber is already set,
/// so calling it from several entry points (or tests) is harmless.
pub fn init_tracing() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    if tracing::dispatcher::has_been_set() {
        return Ok(());
    }

    let log_format = LogFormat::from_env_value(std::env::var("LOG_FORMAT").ok().as_deref());
    let log_ansi = parse_ansi(std::env::var("LOG_ANSI").ok().as_deref());

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_FILTER.into());
    let registry = tracing_subscriber::registry().with(env_filter);

    match log_format {
        LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().json())
            .try_init()?,
        LogFormat::Text => {
            let mut layer = tracing_subscriber::fmt::layer();
            if let Some(ansi) = log_ansi {
                layer = layer.with_ansi(ansi);
            }
            registry.with(layer).try_init()?
        }
    }

    info!(
        subsystem = "session",
        component = "telemetry",
        log_format = ?log_format,
        "Logging initialized"
    );
    Ok(())
}
