use anyhow::Context;
use clap::{Parser, Subcommand};
use courier_config::load as load_config;
use courier_gateway::{create_router, GatewayState, JwtVerifier};
use courier_runtime::{shutdown_signal, telemetry, BackendServices};
use tokio::net::TcpListener;
use tracing::info;

#[derive(Parser)]
#[command(name = "courier-backend")]
#[command(about = "Courier chat backend (serves by default)")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server
    Serve,
    /// Apply database migrations and exit
    Migrate,
    /// Print a principal token signed with the configured secret
    IssueToken {
        /// User id to put in the token
        uid: String,
        /// Lifetime in hours
        #[arg(long, default_value_t = 24)]
        hours: i64,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    telemetry::init_tracing().context("failed to initialise tracing")?;

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => run_server().await,
        Commands::Migrate => run_migrations().await,
        Commands::IssueToken { uid, hours } => issue_token(&uid, hours),
    }
}

async fn run_server() -> anyhow::Result<()> {
    info!("starting Courier backend");

    let config = load_config().context("failed to load configuration")?;

    let services = BackendServices::initialise(&config)
        .await
        .context("failed to initialise backend services")?;

    let state = GatewayState::new(services.chat, JwtVerifier::from_config(&config.auth));
    let streams = state.shutdown_token();
    let app = create_router(state);

    let address = format!("{}:{}", config.http.address, config.http.port);
    let listener = TcpListener::bind(&address)
        .await
        .with_context(|| format!("failed to bind http listener on {address}"))?;

    info!(%address, "http server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            shutdown_signal().await;
            // Open streams never finish on their own.
            streams.cancel();
        })
        .await
        .context("http server error")?;

    info!("backend shut down");
    Ok(())
}

async fn run_migrations() -> anyhow::Result<()> {
    let config = load_config().context("failed to load configuration")?;
    if config.database.is_memory() {
        info!("in-memory store configured; nothing to migrate");
        return Ok(());
    }

    let pool = courier_database::initialize_database(&config.database)
        .await
        .context("failed to migrate database")?;
    pool.close().await;

    info!(url = %config.database.url, "database is up to date");
    Ok(())
}

fn issue_token(uid: &str, hours: i64) -> anyhow::Result<()> {
    let config = load_config().context("failed to load configuration")?;
    let token = JwtVerifier::from_config(&config.auth)
        .issue(uid, chrono::Duration::hours(hours))
        .context("failed to sign token")?;

    println!("{token}");
    Ok(())
}
