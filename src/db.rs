//! SQLite connection pool and embedded schema migrations.

use diesel::r2d2::{self, ConnectionManager, PooledConnection};
use diesel::sqlite::SqliteConnection;
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};

use crate::repository::errors::{RepositoryError, RepositoryResult};

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Pool of SQLite connections shared across request handlers.
pub type DbPool = r2d2::Pool<ConnectionManager<SqliteConnection>>;

/// A connection checked out of [`DbPool`].
pub type DbConnection = PooledConnection<ConnectionManager<SqliteConnection>>;

/// Build a connection pool for the database at `database_url`.
pub fn establish_connection_pool(database_url: &str) -> Result<DbPool, r2d2::PoolError> {
    let manager = ConnectionManager::<SqliteConnection>::new(database_url);
    r2d2::Pool::builder().build(manager)
}

/// Apply every migration that has not run yet. Returns how many were applied.
pub fn run_migrations(pool: &DbPool) -> RepositoryResult<usize> {
    let mut conn = pool.get()?;
    let applied = conn
        .run_pending_migrations(MIGRATIONS)
        .map_err(|e| RepositoryError::Migration(e.to_string()))?;
    Ok(applied.len())
}
