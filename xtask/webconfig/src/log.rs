use std::fs::File;
use std::sync::{Mutex, OnceLock};
use tracing_subscriber::EnvFilter;

#[cfg(unix)]
use std::os::unix::fs::OpenOptionsExt;

const DEFAULT_FILTER: &str = "webconfig=debug";

// Cached to avoid repeated environment lookups
pub fn is_debug_enabled() -> bool {
    static DEBUG_ENABLED: OnceLock<bool> = OnceLock::new();
    *DEBUG_ENABLED.get_or_init(|| std::env::var("WEBCONF_DEBUG").is_ok())
}

fn debug_log_path() -> String {
    std::env::var("WEBCONF_DEBUG_LOG").unwrap_or_else(|_| {
        if let Ok(home) = std::env::var("HOME") {
            format!("{}/.webconf_debug.log", home)
        } else {
            format!("/tmp/webconf_debug_{}.log", std::process::id())
        }
    })
}

fn open_debug_log(path: &str) -> Option<File> {
    let mut options = std::fs::OpenOptions::new();
    options.create(true).write(true).truncate(true);

    // Only owner can read/write
    #[cfg(unix)]
    options.mode(0o600);

    match options.open(path) {
        Ok(file) => Some(file),
        Err(e) => {
            eprintln!("Warning: Failed to open debug log at '{}': {}", path, e);
            None
        }
    }
}

/// Install the tracing subscriber.
///
/// The terminal belongs to the TUI, so events go to a file and only when
/// `WEBCONF_DEBUG` is set. `RUST_LOG` overrides the default filter.
pub fn init() {
    static INIT: OnceLock<()> = OnceLock::new();
    INIT.get_or_init(|| {
        if !is_debug_enabled() {
            return;
        }

        let path = debug_log_path();
        let Some(file) = open_debug_log(&path) else {
            return;
        };

        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

        let installed = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(Mutex::new(file))
            .with_ansi(false)
            .with_target(true)
            .try_init();

        if installed.is_ok() {
            tracing::info!(log = %path, "debug logging enabled");
        }
    });
}
