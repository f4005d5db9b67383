use crate::config::TelemetryConfig;
use tracing_subscriber::filter::ParseError;
use tracing_subscriber::EnvFilter;

#[derive(Debug, thiserror::Error)]
pub enum TelemetryError {
    #[error("APP_LOG_LEVEL '{value}' is not a valid tracing filter")]
    InvalidLevel {
        value: String,
        #[source]
        source: ParseError,
    },
    #[error("tracing subscriber already installed: {0}")]
    AlreadyInstalled(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// Where the active log filter came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterOrigin {
    RustLog,
    AppLogLevel,
}

/// Install the global subscriber. `RUST_LOG` wins over `APP_LOG_LEVEL`.
pub fn init(config: &TelemetryConfig) -> Result<FilterOrigin, TelemetryError> {
    let (filter, origin) = select_filter(EnvFilter::try_from_default_env().ok(), &config.log_level)?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .with_ansi(false)
        .try_init()
        .map_err(TelemetryError::AlreadyInstalled)?;

    tracing::debug!(?origin, "log filter selected");
    Ok(origin)
}

fn select_filter(
    from_env: Option<EnvFilter>,
    log_level: &str,
) -> Result<(EnvFilter, FilterOrigin), TelemetryError> {
    match from_env {
        Some(filter) => Ok((filter, FilterOrigin::RustLog)),
        None => EnvFilter::try_new(log_level)
            .map(|filter| (filter, FilterOrigin::AppLogLevel))
            .map_err(|source| TelemetryError::InvalidLevel {
                value: log_level.to_string(),
                source,
            }),
    }
}
