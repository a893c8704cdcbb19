use actix_web::{App, HttpServer, web};
use clap::{Parser, Subcommand};
use tracing::{error, info};
use tracing_subscriber::{Layer, filter::LevelFilter, layer::SubscriberExt, util::SubscriberInitExt};

use job_board::api::{
    health::health_config,
    job::{JobService, job_config},
    validation,
};
use job_board::config::Config;
use job_board::db;
use job_board::shutdown::ShutdownCoordinator;
use job_board::worker::ExpirationSweeper;

#[derive(Parser)]
#[command(name = "job-board", about = "Job board listing service")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Run migrations and serve HTTP (default)
    Serve,
    /// Apply pending migrations and exit
    Migrate,
    /// Close expired jobs once and exit
    Sweep,
}

fn io_error(context: &str, e: impl std::fmt::Display) -> std::io::Error {
    std::io::Error::other(format!("{}: {}", context, e))
}

/// Console plus one daily-rolling file per level under `log_dir`,
/// e.g. logs/info.log.2025-01-01, logs/error.log.2025-01-01
fn init_tracing(log_dir: &str) -> std::io::Result<()> {
    std::fs::create_dir_all(log_dir)?;

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info".into());

    let info_layer = tracing_subscriber::fmt::layer()
        .with_writer(tracing_appender::rolling::daily(log_dir, "info.log"))
        .with_ansi(false)
        .with_filter(LevelFilter::INFO);

    let warn_layer = tracing_subscriber::fmt::layer()
        .with_writer(tracing_appender::rolling::daily(log_dir, "warn.log"))
        .with_ansi(false)
        .with_filter(LevelFilter::WARN);

    let error_layer = tracing_subscriber::fmt::layer()
        .with_writer(tracing_appender::rolling::daily(log_dir, "error.log"))
        .with_ansi(false)
        .with_filter(LevelFilter::ERROR);

    let debug_layer = tracing_subscriber::fmt::layer()
        .with_writer(tracing_appender::rolling::daily(log_dir, "debug.log"))
        .with_ansi(false)
        .with_filter(LevelFilter::DEBUG);

    let console_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stdout)
        .with_ansi(true);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer)
        .with(info_layer)
        .with(warn_layer)
        .with(error_layer)
        .with(debug_layer)
        .init();

    Ok(())
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    let cli = Cli::parse();

    let config = Config::from_env().map_err(|e| io_error("Failed to load configuration", e))?;
    init_tracing(&config.log_dir)?;

    let pool = db::connection::get_connection(
        &config.database_url,
        config.max_db_connections,
        config.db_acquire_timeout,
    )
    .await
    .map_err(|e| io_error("Failed to connect to database", e))?;
    info!("Database connection pool established");

    match cli.command.unwrap_or(Command::Serve) {
        Command::Migrate => {
            db::migrations::run_migrations(&pool)
                .await
                .map_err(|e| io_error("Failed to run database migrations", e))?;
            pool.close().await;
            Ok(())
        }
        Command::Sweep => {
            let closed = ExpirationSweeper::new(pool.clone(), config.sweep_interval)
                .sweep_once()
                .await
                .map_err(|e| io_error("Expiration sweep failed", e))?;
            info!("Closed {} expired jobs", closed);
            pool.close().await;
            Ok(())
        }
        Command::Serve => serve(config, pool).await,
    }
}

async fn serve(config: Config, pool: sqlx::PgPool) -> std::io::Result<()> {
    info!("Starting job-board application");
    info!("Configuration loaded successfully:");
    info!("  - Max payload size: {} bytes", config.max_payload_size);
    info!("  - Max database connections: {}", config.max_db_connections);
    info!("  - Sweep interval: {:?}", config.sweep_interval);

    // auto-migrate when starting the server
    db::migrations::run_migrations(&pool)
        .await
        .map_err(|e| io_error("Failed to run database migrations", e))?;

    let (shutdown_tx, shutdown_rx) = tokio::sync::watch::channel(false);

    let sweeper = ExpirationSweeper::new(pool.clone(), config.sweep_interval);
    let worker_handles = vec![tokio::spawn(async move {
        sweeper.run(shutdown_rx).await;
    })];
    info!("Spawned expiration sweeper");

    let server_pool = pool.clone();
    let max_payload_size = config.max_payload_size;

    let server = HttpServer::new(move || {
        let job_service = web::Data::new(JobService::new(server_pool.clone()));

        App::new()
            .app_data(web::Data::new(server_pool.clone()))
            .app_data(job_service)
            .app_data(web::PayloadConfig::default().limit(max_payload_size))
            .app_data(validation::json_config())
            .app_data(validation::query_config())
            .configure(health_config)
            .configure(job_config)
    });

    info!("Server starting on http://{}:{}", config.host, config.port);

    let server = match server.bind((config.host.as_str(), config.port)) {
        Ok(server) => server.run(),
        Err(e) => {
            error!("Failed to bind {}:{}: {}", config.host, config.port, e);
            let _ = shutdown_tx.send(true);
            pool.close().await;
            return Err(e);
        }
    };

    let server_handle = server.handle();
    let server_task = tokio::spawn(server);

    let coordinator = ShutdownCoordinator::new(server_handle, server_task, worker_handles, shutdown_tx, pool);

    coordinator.wait_for_shutdown().await
}
