//! Logging setup.
//!
//! Runs are logged through `tracing` (`Running: ...`,
//! `Successfully executed: ...`, warnings for rejected parameters, errors
//! for failures). [`init`] installs a stderr subscriber for applications
//! that do not bring their own.

use tracing_subscriber::EnvFilter;

/// Installs a formatting subscriber on stderr.
///
/// `RUST_LOG` takes precedence over `level`. Returns `false` when a global
/// subscriber was already installed, in which case nothing changes.
pub fn init(level: &str) -> bool {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .with_target(false)
        .try_init()
        .is_ok()
}
