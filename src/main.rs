//! mdshare server. Serves the HTTP API and the document pages.

use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tokio::net::TcpListener;

use mdshare::app::App;
use mdshare::services::settings_engine::{SettingsEngine, SettingsEngineTrait};
use mdshare::{logging, platform, router};

#[derive(Debug, Parser)]
#[command(name = "mdshare-server", version, about = "Serve the mdshare API")]
struct Args {
    /// JSON settings file (defaults to server.json in the config directory).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Write default settings to the config file and exit.
    #[arg(long)]
    write_config: bool,

    /// Address to bind, overriding settings and MDSHARE_BIND_ADDR.
    #[arg(long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    logging::init("mdshare-server", "info");
    let args = Args::parse();

    let mut engine = SettingsEngine::new(args.config.map(|p| p.to_string_lossy().into_owned()));
    if args.write_config {
        engine.reset().context("failed to write default settings")?;
        println!("{}", engine.get_config_path());
        return Ok(());
    }

    let mut settings = engine
        .load_with_env()
        .with_context(|| format!("failed to load settings from {}", engine.get_config_path()))?;
    if let Some(bind) = args.bind {
        settings.bind_addr = bind;
    }

    let db_path = settings
        .database_path
        .clone()
        .map(PathBuf::from)
        .unwrap_or_else(platform::get_database_path);
    tracing::info!(
        database = %db_path.display(),
        titles = settings.title.effective_provider().is_some(),
        "starting mdshare"
    );

    let bind_addr = settings.bind_addr.clone();
    let app = App::new(&db_path, settings)
        .with_context(|| format!("failed to open database {}", db_path.display()))?
        .shared();

    let listener = TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;
    router::serve(listener, router::build_router(app)).await?;
    Ok(())
}
