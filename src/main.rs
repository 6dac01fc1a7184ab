use checkout_bridge::application::administration::AdministrationService;
use checkout_bridge::application::dispatcher::WebhookDispatcher;
use checkout_bridge::application::webhook_handlers::{
    TransactionStateWebhookHandler, TransferInfoWebhookHandler,
};
use checkout_bridge::domain::ports::{
    SharedClientFactory, SharedStateHandler, SharedTransferInfoRepository, WebhookHandlerBox,
};
use checkout_bridge::infrastructure::file_config::FileConfigReader;
use checkout_bridge::infrastructure::in_memory::{
    InMemoryTransactionStateHandler, InMemoryTransferInfoRepository,
};
use checkout_bridge::infrastructure::sandbox::SandboxClientFactory;
use checkout_bridge::interfaces::http::{self, AppState};
use clap::Parser;
use miette::{IntoDiagnostic, Result};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Per-sales-channel configuration file (JSON)
    #[arg(long)]
    config: PathBuf,

    /// Address to listen on for webhooks and administration requests
    #[arg(long, default_value = "127.0.0.1:8080")]
    bind: SocketAddr,

    /// Validate the configuration file and exit
    #[arg(long)]
    check: bool,

    /// Path to persistent database (optional). If provided, uses RocksDB.
    #[cfg(feature = "storage-rocksdb")]
    #[arg(long)]
    db_path: Option<PathBuf>,
}

fn init_tracing() {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "checkout_bridge=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

#[cfg(feature = "storage-rocksdb")]
fn transfer_info_repository(cli: &Cli) -> Result<SharedTransferInfoRepository> {
    use checkout_bridge::infrastructure::rocksdb::RocksDBStore;

    Ok(match &cli.db_path {
        Some(path) => Arc::new(RocksDBStore::open(path).into_diagnostic()?),
        None => Arc::new(InMemoryTransferInfoRepository::new()),
    })
}

#[cfg(not(feature = "storage-rocksdb"))]
fn transfer_info_repository(_cli: &Cli) -> Result<SharedTransferInfoRepository> {
    Ok(Arc::new(InMemoryTransferInfoRepository::new()))
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing();

    let config_reader = FileConfigReader::load(&cli.config).into_diagnostic()?;

    if cli.check {
        let count = config_reader.configurations().count();
        println!("Configuration OK: {} credential set(s)", count);
        return Ok(());
    }

    // Local provider sandbox knowing every configured key pair
    let sandbox = SandboxClientFactory::new();
    for configuration in config_reader.configurations() {
        sandbox.register_keypair(&configuration.private_key, &configuration.public_key);
        for pair in configuration.sub_configurations() {
            sandbox.register_keypair(&pair.private_key, &pair.public_key);
        }
    }
    let client_factory: SharedClientFactory = Arc::new(sandbox);

    let state_handler: SharedStateHandler = Arc::new(InMemoryTransactionStateHandler::new());
    let transfer_info = transfer_info_repository(&cli)?;

    let handlers: Vec<WebhookHandlerBox> = vec![
        Box::new(TransactionStateWebhookHandler::new(
            client_factory.clone(),
            state_handler,
        )),
        Box::new(TransferInfoWebhookHandler::new(
            client_factory.clone(),
            transfer_info,
        )),
    ];

    let state = AppState {
        dispatcher: Arc::new(WebhookDispatcher::new(handlers)),
        config_reader: Arc::new(config_reader),
        administration: Arc::new(AdministrationService::new(client_factory)),
    };

    http::serve(state, cli.bind, async {
        let _ = tokio::signal::ctrl_c().await;
        info!("Received shutdown signal");
    })
    .await
    .into_diagnostic()?;

    Ok(())
}
