use anyhow::Result;

#[tokio::main]
async fn main() -> Result<()> {
    webconfig::cli::run_cli().await?;
    Ok(())
}
