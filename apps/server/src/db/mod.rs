//! Database module providing connection management, migrations, and queries.

pub mod events;
pub mod partners;
pub mod projects;
pub mod reports;
mod store;
pub mod templates;

use std::time::Duration;

use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, Statement};
use sea_orm_migration::MigratorTrait;

use crate::config::{Config, DatabaseEngine};
use crate::error::{AppError, AppResult};
use crate::migration::Migrator;

/// SeaORM connection pool wrapper.
#[derive(Clone)]
pub struct DbPool {
    conn: DatabaseConnection,
    engine: DatabaseEngine,
}

impl DbPool {
    /// Connect using the configured URL and engine.
    pub async fn new(config: &Config) -> AppResult<Self> {
        let max_connections = if config.is_development() { 5 } else { 20 };

        let mut options = ConnectOptions::new(config.database_url.clone());
        options
            .max_connections(max_connections)
            .min_connections(1)
            .connect_timeout(Duration::from_secs(5))
            .acquire_timeout(Duration::from_secs(5))
            .sqlx_logging(false);

        let conn = Database::connect(options)
            .await
            .map_err(|e| AppError::Database(format!("Failed to connect: {}", e)))?;

        let pool = DbPool {
            conn,
            engine: config.database_engine,
        };
        pool.ping().await?;

        tracing::info!("Connected to {} database", pool.engine);
        Ok(pool)
    }

    /// Wrap an existing connection, e.g. an in-process SQLite database.
    pub fn from_connection(conn: DatabaseConnection, engine: DatabaseEngine) -> Self {
        DbPool { conn, engine }
    }

    /// Get access to the connection for executing queries.
    pub fn connection(&self) -> &DatabaseConnection {
        &self.conn
    }

    pub fn engine(&self) -> DatabaseEngine {
        self.engine
    }

    /// Apply pending migrations.
    pub async fn run_migrations(&self) -> AppResult<()> {
        Migrator::up(&self.conn, None)
            .await
            .map_err(|e| AppError::Database(format!("Failed to run migrations: {}", e)))?;
        tracing::info!("Database migrations applied");
        Ok(())
    }

    /// Round-trip a trivial query.
    pub async fn ping(&self) -> AppResult<()> {
        let stmt = Statement::from_string(self.conn.get_database_backend(), "SELECT 1".to_owned());
        self.conn
            .query_one_raw(stmt)
            .await
            .map_err(|e| AppError::Database(format!("Database ping failed: {}", e)))?;
        Ok(())
    }
}
