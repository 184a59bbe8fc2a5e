use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use clap::Parser;

use cardforge::config::AppConfig;
use cardforge::flashcards::FlashcardStore;
use cardforge::generation::FlashcardPipeline;
use cardforge::inference::{InferenceClient, RemoteEnhancer};
use cardforge::server::{self, AppState};

#[derive(Parser)]
#[command(name = "cardforge", about = "Study flashcard generation and review service", version)]
struct Cli {
    /// Address to bind (overrides config)
    #[arg(long)]
    addr: Option<String>,

    /// SQLite database path (overrides config)
    #[arg(long)]
    db: Option<PathBuf>,

    /// Config file path
    #[arg(long)]
    config: Option<PathBuf>,

    /// Disable remote enhancement regardless of config
    #[arg(long)]
    no_remote: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let mut config = AppConfig::load(cli.config.as_deref())?;
    if let Some(addr) = cli.addr {
        config.bind_addr = addr;
    }
    if let Some(db) = cli.db {
        config.database_path = Some(db);
    }
    if cli.no_remote {
        config.inference.enabled = false;
    }

    let store = FlashcardStore::new(config.database_path())?;

    let enhancer: Option<Arc<dyn RemoteEnhancer>> = if config.inference.enabled {
        Some(Arc::new(InferenceClient::new(&config.inference)?))
    } else {
        log::info!("remote enhancement disabled");
        None
    };

    let state = Arc::new(AppState {
        store: Mutex::new(store),
        pipeline: FlashcardPipeline::new(enhancer),
    });

    let app = server::router(state);
    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    log::info!("listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
    log::info!("shutting down");
}
