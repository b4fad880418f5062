//! Process-wide `tracing` subscriber setup.

use once_cell::sync::OnceCell;
use tracing_subscriber::EnvFilter;

/// Environment variable holding the log filter (`RUST_LOG` syntax).
pub const LOG_ENV: &str = "HFX_LOG";

static LOGGING: OnceCell<()> = OnceCell::new();

/// Install a fmt subscriber filtered by [`LOG_ENV`], defaulting to `info`.
///
/// Safe to call any number of times; only the first call has an effect, and a
/// subscriber installed by someone else is left alone.
pub fn init_logging() {
    LOGGING.get_or_init(|| {
        let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info"));
        if tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .try_init()
            .is_err()
        {
            tracing::debug!("global subscriber already installed");
        }
    });
}
