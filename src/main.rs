use anyhow::Result;
use shorts_organizer::config::Config;
use shorts_organizer::pipeline::Pipeline;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    init_tracing();

    if let Err(err) = run().await {
        tracing::error!("[ERROR] {err:#}");
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    tracing::info!("[INFO] Starting Shorts Organizer...");

    let config = Config::from_env()?;
    config.ensure_dirs()?;

    let pipeline = Pipeline::new(config).await?;
    pipeline.run().await?;

    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("shorts_organizer=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();
}
