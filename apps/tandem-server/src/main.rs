use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use axum::{routing::get, Json, Router};
use chrono::Utc;
use clap::{Parser, Subcommand};
use mimalloc::MiMalloc;
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use sea_orm_migration::MigratorTrait;
use tower_http::cors::CorsLayer;
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;

use auth_gateway::{AuthPort, HttpAuthGateway};
use invitations::config::InvitationsConfig;
use invitations::infra::storage::migrations::Migrator as InvitationsMigrator;
use journal::infra::storage::migrations::Migrator as JournalMigrator;
use runtime::{AppConfig, CliArgs};

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

/// Tandem Server - partnership journaling backend
#[derive(Parser)]
#[command(name = "tandem-server")]
#[command(about = "Tandem Server - partnership journaling backend")]
#[command(version = "0.1.0")]
struct Cli {
    /// Path to configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Port for HTTP server (overrides config)
    #[arg(short, long)]
    port: Option<u16>,

    /// Print current configuration and exit
    #[arg(long)]
    print_config: bool,

    /// Log verbosity level (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the server
    Run,
    /// Check configuration
    Check,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let args = CliArgs {
        config: cli.config.as_ref().map(|p| p.to_string_lossy().to_string()),
        port: cli.port,
        print_config: cli.print_config,
        verbose: cli.verbose,
    };

    let mut config = AppConfig::load_or_default(cli.config.as_deref())?;
    config.apply_cli_overrides(&args);

    let logging_config = config.logging.clone().unwrap_or_default();
    let base_dir = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    runtime::logging::init_logging(&logging_config, &base_dir);

    if cli.print_config {
        println!("{}", config.to_yaml()?);
        return Ok(());
    }

    match cli.command.unwrap_or(Commands::Run) {
        Commands::Run => run_server(config).await,
        Commands::Check => check_config(config),
    }
}

async fn connect_database(config: &AppConfig) -> Result<DatabaseConnection> {
    let mut options = ConnectOptions::new(config.database.url.clone());
    options
        .max_connections(config.database.max_conns.unwrap_or(10))
        .connect_timeout(Duration::from_secs(5))
        .sqlx_logging(false);

    tracing::info!(url = %config.database.url, "connecting to database");
    Database::connect(options)
        .await
        .context("Failed to connect to database")
}

fn build_router(config: &AppConfig, db: DatabaseConnection) -> Result<Router> {
    let invitations_config: InvitationsConfig = if config.invitations.is_null() {
        InvitationsConfig::default()
    } else {
        serde_json::from_value(config.invitations.clone())
            .context("Invalid `invitations` configuration section")?
    };

    let auth: Arc<dyn AuthPort> = Arc::new(HttpAuthGateway::new(
        config.auth.base_url.clone(),
        config.auth.anon_key.clone(),
    ));

    let invitations_service = Arc::new(invitations::domain::service::Service::new(
        Arc::new(invitations::infra::storage::SeaOrmInvitationsRepository::new(db.clone())),
        Arc::new(invitations::infra::mail::ResendMailer::new(
            config.mail.api_key.clone(),
            config.mail.from_email.clone(),
        )),
        invitations::domain::service::ServiceConfig {
            public_base_url: config.server.public_base_url.clone(),
            expiry_days: invitations_config.expiry_days,
        },
    ));
    let invitations_router = invitations::api::rest::router(
        invitations_service,
        auth.clone(),
        invitations::api::rest::RestConfig {
            public_base_url: config.server.public_base_url.clone(),
            signup_path: invitations_config.signup_path,
        },
    );

    let journal_service = Arc::new(journal::domain::service::Service::new(Arc::new(
        journal::infra::storage::SeaOrmJournalRepository::new(db),
    )));
    let journal_router = journal::api::rest::router(journal_service, auth);

    let mut app = Router::new()
        .nest("/api", invitations_router.merge(journal_router))
        .route("/health", get(health))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http());

    // Production deployments serve the built frontend from the same process.
    if let Some(dir) = &config.server.static_dir {
        let spa = ServeDir::new(dir).fallback(ServeFile::new(dir.join("index.html")));
        app = app.fallback_service(spa);
    }

    Ok(app)
}

async fn run_server(config: AppConfig) -> Result<()> {
    tracing::info!("Tandem Server starting");

    let db = connect_database(&config).await?;
    InvitationsMigrator::up(&db, None)
        .await
        .context("Failed to run invitations migrations")?;
    JournalMigrator::up(&db, None)
        .await
        .context("Failed to run journal migrations")?;

    let app = build_router(&config, db)?;

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    tracing::info!(%addr, "listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "timestamp": Utc::now().to_rfc3339(),
    }))
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!(%err, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                tracing::error!(%err, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    tracing::info!("shutdown signal received");
}

fn check_config(config: AppConfig) -> Result<()> {
    println!("Configuration check passed");
    println!("{}", config.to_yaml()?);
    Ok(())
}
