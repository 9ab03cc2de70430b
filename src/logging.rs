//! Tracing subscriber setup.
//!
//! The terminal belongs to the UI, so log output goes to a file. Filtering
//! follows `RUST_LOG` and defaults to `info`.

use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

/// Default log file: `<cache dir>/show-explorer/show-explorer.log`.
pub fn default_log_path() -> Option<PathBuf> {
    dirs::cache_dir().map(|dir| dir.join(crate::config::APP_DIR).join("show-explorer.log"))
}

/// Installs the global subscriber writing to `log_file_path`.
///
/// Returns `false` when the file could not be created or a subscriber was
/// already installed; the app then runs without logs.
pub fn init_global(log_file_path: &Path) -> bool {
    if let Some(parent) = log_file_path.parent() {
        if std::fs::create_dir_all(parent).is_err() {
            return false;
        }
    }
    let Ok(log_file) = File::create(log_file_path) else {
        return false;
    };
    build_subscriber(log_file).try_init().is_ok()
}

/// The subscriber configuration shared by the binary and tests.
pub fn build_subscriber(log_file: File) -> impl tracing::Subscriber + Send + Sync {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let fmt_layer = fmt::layer()
        .with_ansi(false)
        .with_writer(Arc::new(log_file));

    tracing_subscriber::registry().with(env_filter).with(fmt_layer)
}
