use crate::api::HttpConfigApi;
use crate::config::ClientConfig;
use crate::error::Result;
use crate::ui::WebConfigApp;
use crossterm::{
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io;
use std::sync::Arc;
use tracing::info;

pub async fn menu_command(config: ClientConfig) -> Result<()> {
    println!("Connecting to {}...", config.base_url);

    let api = Arc::new(HttpConfigApi::new(&config.base_url, config.request_timeout)?);
    // Fail before taking over the terminal when nobody is listening
    api.heartbeat().await?;
    info!(url = %config.base_url, "server reachable, launching TUI");

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Create and run app
    let mut app = WebConfigApp::new(api, &config);
    let res = app.run(&mut terminal).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    let last_status = app.state().status().text();
    if !last_status.is_empty() {
        println!("{}", last_status);
    }

    res
}
