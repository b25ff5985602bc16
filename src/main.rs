use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use tasklist::client::{shell, Session, TodoClient};
use tasklist::config::{self, ClientConfig, ServerConfig};
use tasklist::{api, db};

#[derive(Parser)]
#[command(name = "tasklist")]
#[command(about = "Personal task list server and terminal client")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the API server
    Serve {
        /// Port for HTTP API (overrides TASKLIST_PORT)
        #[arg(short, long)]
        port: Option<u16>,
    },
    /// Open the interactive terminal client
    Client {
        /// Todo collection URL (overrides TASKLIST_API_URL)
        #[arg(short, long)]
        url: Option<String>,
    },
}

/// Initialize tracing with output to stderr (client mode) or stdout
fn init_tracing(use_stderr: bool) {
    let filter = tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG").unwrap_or_else(|_| "tasklist=debug,tower_http=debug".into()),
    );

    if use_stderr {
        // Client mode: keep stdout for the rendered list
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }
}

async fn serve(port: Option<u16>) -> anyhow::Result<()> {
    let mut config = ServerConfig::from_env()?;
    if let Some(port) = port {
        config.port = port;
    }

    let db = match &config.database_url {
        Some(url) => db::Database::open_url(url)?,
        None => db::Database::open_default()?,
    };
    db.migrate()?;

    let app = api::create_router_with_origins(db, config.client_origins.as_deref());

    let address = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&address).await?;
    tracing::info!("Todo API listening on http://{}", address);

    axum::serve(listener, app).await?;
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Before tracing, so RUST_LOG from .env applies.
    let dotenv = config::load_dotenv();

    let use_stderr = matches!(cli.command, Some(Commands::Client { .. }));
    init_tracing(use_stderr);
    dotenv.log();

    match cli.command {
        Some(Commands::Serve { port }) => serve(port).await?,
        Some(Commands::Client { url }) => {
            let api_url = url.unwrap_or_else(|| ClientConfig::from_env().api_url);
            tracing::debug!("Using todo API at {}", api_url);
            shell::run(Session::new(TodoClient::new(api_url))).await?;
        }
        None => serve(None).await?,
    }

    Ok(())
}
