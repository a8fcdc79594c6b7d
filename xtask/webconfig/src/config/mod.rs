pub mod writer;

pub use writer::ChangeReport;

use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_URL: &str = "http://127.0.0.1:5000";
pub const DEFAULT_CONFIG_FILENAME: &str = ".config";

/// Runtime settings of the client.
#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    pub base_url: String,
    /// Initial value of the "show all" toggle.
    pub show_all: bool,
    pub heartbeat_enabled: bool,
    pub heartbeat_interval: Duration,
    /// How long a transient status message stays up.
    pub status_timeout: Duration,
    /// Delay between a successful save-and-exit and closing the client.
    pub close_delay: Duration,
    pub request_timeout: Duration,
    /// Where change reports are written.
    pub export_dir: PathBuf,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_URL.to_string(),
            show_all: false,
            heartbeat_enabled: true,
            heartbeat_interval: Duration::from_secs(5),
            status_timeout: Duration::from_secs(5),
            close_delay: Duration::from_secs(1),
            request_timeout: Duration::from_secs(10),
            export_dir: PathBuf::from("."),
        }
    }
}
