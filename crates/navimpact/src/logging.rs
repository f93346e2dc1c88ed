use tracing_subscriber::EnvFilter;

pub const LOG_ENV: &str = "NAVIMPACT_LOG";

/// Installs a fmt subscriber filtered by `NAVIMPACT_LOG`, falling back to
/// `default_filter`. Returns false when a global subscriber already exists.
pub fn init(default_filter: &str) -> bool {
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .or_else(|_| EnvFilter::try_new(default_filter))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .try_init()
        .is_ok()
}
