use color_eyre::eyre::Result;
use dotenv::dotenv;
use agenda_db::{create_pool, schema::initialize_database};
use agenda_worker::{config::WorkerConfig, mailer::LogMailer};
use tracing::{error, info};
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize error handling
    color_eyre::install()?;

    // Load environment variables
    dotenv().ok();

    // Load configuration
    let config = WorkerConfig::from_env()?;

    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(config.log_level)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("Starting Agenda job worker");

    // Create database connection pool
    let db_pool = create_pool(&config.database_url).await?;

    // Initialize database schema
    initialize_database(&db_pool).await?;

    let mailer = LogMailer::new(config.mail_from.clone());
    match agenda_worker::start_worker(config, db_pool, mailer).await {
        Ok(_) => info!("Job worker shut down gracefully"),
        Err(e) => error!("Job worker error: {}", e),
    }

    Ok(())
}
