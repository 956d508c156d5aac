//! Diagnostic logging for the runtime.
//!
//! Events go through `tracing`. A subscriber is only installed on request
//! (`COMODOT_LOG`), and it writes to stderr: stdout belongs to the program.

use std::sync::Once;

use tracing::warn;
use tracing_subscriber::EnvFilter;

use crate::config::LoadedConfig;

static INIT: Once = Once::new();

/// Install the stderr subscriber described by `loaded` and report any
/// configuration problems through it. Runs at most once per process; a
/// subscriber already installed by the host wins.
pub fn init(loaded: &LoadedConfig) {
    INIT.call_once(|| {
        if let Some(directives) = loaded.config.log_filter.as_deref() {
            let (filter, invalid) = match EnvFilter::try_new(directives) {
                Ok(filter) => (filter, None),
                Err(e) => (EnvFilter::new("warn"), Some(e)),
            };
            let _ = tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .with_target(false)
                .try_init();
            if let Some(e) = invalid {
                warn!(directives, error = %e, "invalid log filter, using `warn`");
            }
        }

        for problem in &loaded.problems {
            warn!(%problem, "ignoring configuration value");
        }
    });
}
