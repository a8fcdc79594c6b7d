use crate::api::ChangeMode;
use crate::config::{ClientConfig, DEFAULT_URL};
use crate::error::Result;
use clap::{Args, Parser as ClapParser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::time::Duration;

#[derive(ClapParser, Debug)]
#[command(name = "webconf")]
#[command(about = "Terminal client for the Kconfig web configuration server", long_about = None)]
pub struct Cli {
    #[command(flatten)]
    pub options: ClientOptions,

    /// Defaults to the interactive menu
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Args, Debug, Clone)]
pub struct ClientOptions {
    /// Base URL of the configuration server
    #[arg(long, env = "WEBCONF_URL", default_value = DEFAULT_URL, global = true)]
    pub url: String,

    /// Start with invisible symbols shown
    #[arg(long, global = true)]
    pub show_all: bool,

    /// Seconds between heartbeats
    #[arg(long, default_value_t = 5, global = true)]
    pub heartbeat_secs: u64,

    /// Do not send heartbeats (the server shuts down without them)
    #[arg(long, global = true)]
    pub no_heartbeat: bool,

    /// Seconds a status message stays on screen
    #[arg(long, default_value_t = 5, global = true)]
    pub status_secs: u64,

    /// Directory change reports are exported to
    #[arg(long, default_value = ".", global = true)]
    pub export_dir: PathBuf,
}

impl ClientOptions {
    pub fn into_config(self) -> ClientConfig {
        ClientConfig {
            base_url: self.url,
            show_all: self.show_all,
            heartbeat_enabled: !self.no_heartbeat,
            heartbeat_interval: Duration::from_secs(self.heartbeat_secs.max(1)),
            status_timeout: Duration::from_secs(self.status_secs),
            export_dir: self.export_dir,
            ..ClientConfig::default()
        }
    }
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModeArg {
    /// Changes made since the server started
    Session,
    /// Every value that differs from its default
    All,
}

impl From<ModeArg> for ChangeMode {
    fn from(mode: ModeArg) -> Self {
        match mode {
            ModeArg::Session => ChangeMode::Session,
            ModeArg::All => ChangeMode::All,
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Interactive menu configuration (TUI)
    Menu,

    /// Show the details of a symbol
    Show {
        /// Symbol name, without the CONFIG_ prefix
        symbol: String,
    },

    /// Set the value of a symbol
    Set {
        symbol: String,
        value: String,
    },

    /// List changed symbols
    Changes {
        #[arg(short, long, value_enum, default_value = "session")]
        mode: ModeArg,
    },

    /// Search symbols by name
    Search {
        query: String,
    },

    /// Save the configuration on the server side
    Save {
        /// Target file, relative to the server; defaults to its .config
        #[arg(short, long)]
        filename: Option<String>,
    },

    /// Load a configuration file on the server side
    Load {
        filename: String,
    },

    /// Write a plain-text report of the changes
    Export {
        #[arg(short, long, value_enum, default_value = "session")]
        mode: ModeArg,
    },

    /// Show configuration statistics
    Stats,
}

pub async fn run_cli() -> Result<()> {
    let cli = Cli::parse();
    crate::log::init();

    let config = cli.options.into_config();
    match cli.command.unwrap_or(Commands::Menu) {
        Commands::Menu => crate::cli::menu::menu_command(config).await,
        Commands::Show { symbol } => crate::cli::query::show_command(&config, &symbol).await,
        Commands::Set { symbol, value } => {
            crate::cli::query::set_command(&config, &symbol, &value).await
        }
        Commands::Changes { mode } => crate::cli::query::changes_command(&config, mode.into()).await,
        Commands::Search { query } => crate::cli::query::search_command(&config, &query).await,
        Commands::Save { filename } => {
            crate::cli::saveconfig::save_command(&config, filename.as_deref()).await
        }
        Commands::Load { filename } => crate::cli::saveconfig::load_command(&config, &filename).await,
        Commands::Export { mode } => crate::cli::query::export_command(&config, mode.into()).await,
        Commands::Stats => crate::cli::query::stats_command(&config).await,
    }
}
