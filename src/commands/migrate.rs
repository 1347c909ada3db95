//! Database migration command.

use docstore_core::config::AppConfig;
use docstore_core::result::AppResult;
use docstore_database::DatabasePool;
use docstore_database::migration::run_migrations;

use crate::output;

/// Apply all pending migrations.
pub async fn execute(config: &AppConfig) -> AppResult<()> {
    let pool = DatabasePool::connect(&config.database).await?;

    println!("Running database migrations...");
    let result = run_migrations(pool.pool()).await;
    pool.close().await;
    result?;

    output::print_success("All migrations applied successfully.");
    Ok(())
}
