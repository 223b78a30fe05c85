use household_server::crud::{SeaOrmStore, Store, Table};
use sea_orm::DatabaseConnection;
use std::sync::Arc;
use std::time::Duration;

#[allow(dead_code)] // not every test binary builds stores by hand
pub const QUERY_TIMEOUT: Duration = Duration::from_secs(5);

/// Opens a fresh in-memory SQLite database with all migrations applied.
pub async fn setup_db() -> anyhow::Result<Arc<DatabaseConnection>> {
    let db = household_server::db::connect_and_migrate("sqlite::memory:").await?;
    Ok(Arc::new(db))
}

#[allow(dead_code)]
pub fn store<R: Table>(db: &Arc<DatabaseConnection>) -> Arc<dyn Store<R>> {
    Arc::new(SeaOrmStore::<R>::new(db.clone(), QUERY_TIMEOUT))
}
