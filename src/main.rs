use clap::Parser;
use tracing::{info, instrument};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use db_reset::config::{ConfigOverrides, ResetConfig};
use db_reset::services::ResetService;

#[derive(Parser)]
#[command(name = "db-reset")]
#[command(about = "Drop and recreate a PostgreSQL database, terminating any sessions attached to it", long_about = None)]
struct Cli {
    /// Connection URL; its path names the database to reset
    #[arg(long, env = "DATABASE_URL")]
    database_url: Option<String>,

    /// Server host
    #[arg(long, env = "PGHOST")]
    host: Option<String>,

    /// Server port
    #[arg(long, env = "PGPORT")]
    port: Option<u16>,

    /// Administrative role
    #[arg(long, env = "PGUSER")]
    user: Option<String>,

    /// Password for the administrative role
    #[arg(long, env = "PGPASSWORD", hide_env_values = true)]
    password: Option<String>,

    /// Database to drop and recreate (overrides the DATABASE_URL path)
    #[arg(long, env = "RESET_TARGET_DB")]
    target_db: Option<String>,

    /// Database to connect to while issuing DROP/CREATE (default: postgres)
    #[arg(long, env = "RESET_MAINTENANCE_DB")]
    maintenance_db: Option<String>,
}

impl From<Cli> for ConfigOverrides {
    fn from(cli: Cli) -> Self {
        ConfigOverrides {
            database_url: cli.database_url,
            host: cli.host,
            port: cli.port,
            username: cli.user,
            password: cli.password,
            target_database: cli.target_db,
            maintenance_database: cli.maintenance_db,
        }
    }
}

#[tokio::main(flavor = "current_thread")]
#[instrument]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env before anything reads the environment (ignore errors if not found)
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,db_reset=debug")),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_line_number(true),
        )
        .init();

    let cli = Cli::parse();
    let config = ResetConfig::resolve(cli.into())?;
    info!("Resetting database with config: {:?}", config);

    let mut service = ResetService::new(config);
    let report = service.reset().await?;

    info!(
        "Database {} reset complete (existed before: {}, sessions terminated: {})",
        report.database, report.existed, report.terminated_sessions
    );

    Ok(())
}
