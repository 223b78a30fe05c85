use migration::MigratorTrait;
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use std::time::Duration;

/// Lifetime and idle limit for the pooled connection. Long enough that the
/// pool never retires it while the process runs.
const CONNECTION_LIFETIME: Duration = Duration::from_secs(60 * 60 * 24 * 365 * 100);

/// Pool settings for the SQLite database behind `url`.
///
/// The pool holds exactly one connection, so statements run one at a time.
/// That connection is never recycled: an in-memory database lives only as
/// long as its connection does.
fn connect_options(url: &str) -> ConnectOptions {
    let mut options = ConnectOptions::new(url);
    options
        .max_connections(1)
        .min_connections(1)
        .max_lifetime(CONNECTION_LIFETIME)
        .idle_timeout(CONNECTION_LIFETIME)
        .sqlx_logging(false);
    options
}

/// Opens the SQLite database behind `url`.
pub async fn connect(url: &str) -> anyhow::Result<DatabaseConnection> {
    let db = Database::connect(connect_options(url)).await?;
    Ok(db)
}

/// Connects and brings the schema up to date.
#[tracing::instrument]
pub async fn connect_and_migrate(url: &str) -> anyhow::Result<DatabaseConnection> {
    let db = connect(url).await?;
    migration::Migrator::up(&db, None).await?;
    tracing::info!("Database migrations applied successfully");
    Ok(db)
}
