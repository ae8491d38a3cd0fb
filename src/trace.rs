//! Tracing setup.
//!
//! In TUI mode the subscriber writes to a log file under the storage
//! directory so the alternate screen stays clean; CLI subcommands log to
//! stderr. `RUST_LOG` overrides the default filter. Initialization never
//! fails the application: on any problem it falls back to stderr.

use std::fs::{self, File};
use std::path::Path;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

const LOG_FILE: &str = "sucal.log";

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("sucal=info"))
}

/// Initialize tracing for an interactive (TUI) session, logging into the
/// storage directory.
pub fn init_for_tui(storage_dir: &Path) {
    let file = fs::create_dir_all(storage_dir)
        .and_then(|_| File::create(storage_dir.join(LOG_FILE)));
    match file {
        Ok(file) => {
            tracing_subscriber::fmt()
                .with_env_filter(env_filter())
                .with_writer(Mutex::new(file))
                .with_ansi(false)
                .init();
        }
        Err(_) => init_for_cli(),
    }
}

/// Initialize tracing for non-interactive subcommands (stderr).
pub fn init_for_cli() {
    tracing_subscriber::fmt()
        .with_env_filter(env_filter())
        .with_writer(std::io::stderr)
        .init();
}
