use std::process::ExitCode;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use minetrack_inspect::InspectConfig;

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    // Logs go to stderr; stdout carries only the report.
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "minetrack_inspect=info,minetrack_db=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = InspectConfig::from_env();

    let pool = match minetrack_db::create_pool_with(&config.database_url, 1).await {
        Ok(pool) => pool,
        Err(e) => {
            tracing::error!(error = %e, "Failed to connect to database");
            return ExitCode::FAILURE;
        }
    };
    tracing::debug!("Database connection established");

    let mut stdout = std::io::stdout().lock();
    match minetrack_inspect::run(&pool, &mut stdout).await {
        Ok(count) => {
            tracing::debug!(count, "Equipment report written");
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!(error = %e, "Equipment inspection failed");
            ExitCode::FAILURE
        }
    }
}
