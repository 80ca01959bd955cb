// File: vouchervote-core/src/test_utils/helpers.rs

use sqlx::{Pool, Postgres};
use sqlx::postgres::PgPoolOptions;
use tokio::sync::{Mutex, MutexGuard};
use crate::Error;
use crate::db::Database;

/// Tests in one binary share the database, so they take turns.
static TEST_DB_LOCK: Mutex<()> = Mutex::const_new(());

/// A migrated, emptied test database. Holding it keeps other tests out.
pub struct TestDatabase {
    pub db: Database,
    _guard: MutexGuard<'static, ()>,
}

/// `TEST_DATABASE_URL`, e.g. `postgres://vouchervote@localhost/vouchervote_test`.
pub fn test_database_url() -> Option<String> {
    std::env::var("TEST_DATABASE_URL").ok().filter(|u| !u.trim().is_empty())
}

/// Create a connection pool to the test DB.
pub async fn create_test_db_pool(url: &str) -> Result<Pool<Postgres>, Error> {
    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(url)
        .await?;

    Ok(pool)
}

/// Wipes out test data so each test can start fresh.
pub async fn clean_database(pool: &Pool<Postgres>) -> Result<(), Error> {
    sqlx::query(r#"
        TRUNCATE TABLE
            voucher_codes,
            project_votes
        RESTART IDENTITY CASCADE;
    "#)
        .execute(pool)
        .await?;

    Ok(())
}

/// Returns a migrated, empty test DB handle, or `None` when `TEST_DATABASE_URL` is unset.
pub async fn setup_test_database() -> Result<Option<TestDatabase>, Error> {
    let Some(url) = test_database_url() else {
        eprintln!("TEST_DATABASE_URL not set; skipping Postgres-backed test.");
        return Ok(None);
    };

    let guard = TEST_DB_LOCK.lock().await;
    let pool = create_test_db_pool(&url).await?;
    let db = Database::from_pool(pool);
    db.migrate().await?;
    clean_database(db.pool()).await?;

    Ok(Some(TestDatabase { db, _guard: guard }))
}
