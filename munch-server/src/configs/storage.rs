use std::path::Path;
use std::str::FromStr;

use sqlx::migrate::Migrator;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Error, SqlitePool};

use crate::configs::schema::SchemaManager;
use crate::configs::settings::Database;

/// Connection pool plus the schema bootstrap run once at startup.
#[derive(Clone)]
pub struct Storage {
    pool: SqlitePool,
}

impl Storage {
    pub async fn new(database: Database, schema_manager: SchemaManager) -> Result<Self, Error> {
        let options = SqliteConnectOptions::from_str(&database.url)?
            .create_if_missing(true)
            .foreign_keys(true);

        // Each connection to `:memory:` sees a separate database.
        let in_memory = database.url.contains(":memory:");

        let pool_options = SqlitePoolOptions::new().min_connections(1);
        let pool_options = if in_memory {
            // Recycling the only connection would discard the database.
            pool_options
                .max_connections(1)
                .max_lifetime(None)
                .idle_timeout(None)
        } else {
            pool_options.max_connections(10)
        };

        let pool = pool_options.connect_with(options).await?;

        let storage = Self { pool };
        storage.bootstrap(&schema_manager, database.clean_start).await?;
        if let Some(migration_path) = database.migration_path.as_deref() {
            storage.migrate(migration_path).await?;
        }

        Ok(storage)
    }

    pub fn get_pool(&self) -> &SqlitePool {
        &self.pool
    }

    async fn bootstrap(&self, schema: &SchemaManager, clean_start: bool) -> Result<(), Error> {
        let mut statements = Vec::new();

        if clean_start {
            sqlx::query("DROP TABLE IF EXISTS _sqlx_migrations")
                .execute(&self.pool)
                .await?;
            statements.extend(schema.dispose_schema());
            tracing::warn!("clean start requested, dropping every table");
        }
        statements.extend(schema.create_schema());

        sqlx::query(&statements.join("\n"))
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn migrate(&self, migration_path: &str) -> Result<(), Error> {
        let migrator = Migrator::new(Path::new(migration_path)).await?;
        let mut connection = self.pool.acquire().await?;
        migrator.run(&mut connection).await?;

        tracing::info!(path = migration_path, "database migrations applied");
        Ok(())
    }
}
