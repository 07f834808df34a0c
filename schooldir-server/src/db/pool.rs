//! Database connection pool management
//!
//! The pool is created on first use and cached for the life of the
//! process. If the configured database doesn't exist it is created once
//! through a transient connection and the pool is opened again.

use sqlx::mysql::{MySqlConnectOptions, MySqlConnection, MySqlPoolOptions, MySqlSslMode};
use sqlx::{Connection, MySqlPool};
use tokio::sync::OnceCell;

use super::is_unknown_database;
use crate::config::DbConfig;

/// Lazily provisioned connection pool.
///
/// Concurrent first callers share a single initialization; a failed
/// initialization leaves the cell empty so the next call tries again.
pub struct Database {
    config: DbConfig,
    pool: OnceCell<MySqlPool>,
}

impl Database {
    pub fn new(config: DbConfig) -> Self {
        Self {
            config,
            pool: OnceCell::new(),
        }
    }

    pub fn config(&self) -> &DbConfig {
        &self.config
    }

    /// Get the shared pool, creating it (and the database) on first use.
    ///
    /// # Errors
    ///
    /// Returns the connection error if the server is unreachable or the
    /// database can't be created.
    pub async fn acquire(&self) -> Result<&MySqlPool, sqlx::Error> {
        self.pool
            .get_or_try_init(|| connect_or_create(&self.config))
            .await
    }

    /// Whether the pool has been created yet
    pub fn is_ready(&self) -> bool {
        self.pool.initialized()
    }

    /// Close the pool if it was ever opened
    pub async fn close(&self) {
        if let Some(pool) = self.pool.get() {
            pool.close().await;
        }
    }
}

async fn connect_or_create(config: &DbConfig) -> Result<MySqlPool, sqlx::Error> {
    match open_pool(config).await {
        Ok(pool) => Ok(pool),
        Err(err) if is_unknown_database(&err) => {
            tracing::warn!(database = %config.database, "Database missing, creating it");
            create_database(config).await?;
            open_pool(config).await
        }
        Err(err) => Err(err),
    }
}

async fn open_pool(config: &DbConfig) -> Result<MySqlPool, sqlx::Error> {
    let pool = MySqlPoolOptions::new()
        .max_connections(config.max_connections)
        .connect_with(server_options(config).database(&config.database))
        .await?;

    // Liveness check
    sqlx::query("SELECT 1").execute(&pool).await?;

    tracing::info!(
        host = %config.host,
        database = %config.database,
        max_connections = config.max_connections,
        "Database pool ready"
    );
    Ok(pool)
}

/// Create the configured database over a connection that selects none.
async fn create_database(config: &DbConfig) -> Result<(), sqlx::Error> {
    let mut conn = MySqlConnection::connect_with(&server_options(config)).await?;
    let sql = create_database_sql(&config.database);
    sqlx::query(&sql).execute(&mut conn).await?;
    conn.close().await
}

fn create_database_sql(database: &str) -> String {
    format!(
        "CREATE DATABASE IF NOT EXISTS {} CHARACTER SET utf8mb4 COLLATE utf8mb4_unicode_ci",
        quote_identifier(database)
    )
}

fn quote_identifier(name: &str) -> String {
    format!("`{}`", name.replace('`', "``"))
}

/// Connection options without a database selected
fn server_options(config: &DbConfig) -> MySqlConnectOptions {
    let mut options = MySqlConnectOptions::new()
        .host(&config.host)
        .port(config.port)
        .username(&config.user)
        .charset("utf8mb4");

    if !config.password.is_empty() {
        options = options.password(&config.password);
    }

    if let Some(tls) = &config.tls {
        let mode = if tls.verify {
            MySqlSslMode::VerifyCa
        } else {
            MySqlSslMode::Required
        };
        options = options.ssl_mode(mode);
        options = if tls.ca.trim_start().starts_with("-----BEGIN") {
            options.ssl_ca_from_pem(tls.ca.clone().into_bytes())
        } else {
            options.ssl_ca(&tls.ca)
        };
    }

    options
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_database_statement() {
        assert_eq!(
            create_database_sql("school_manager"),
            "CREATE DATABASE IF NOT EXISTS `school_manager` CHARACTER SET utf8mb4 COLLATE utf8mb4_unicode_ci"
        );
    }

    #[test]
    fn identifiers_escape_backticks() {
        assert_eq!(quote_identifier("we`ird"), "`we``ird`");
    }

    #[test]
    fn pool_is_lazy() {
        let db = Database::new(DbConfig::from_lookup(|_| None).unwrap());
        assert!(!db.is_ready());
    }

    // Integration tests require a real MySQL server
    // Run with: MYSQL_HOST=... cargo test -p schooldir-server -- --ignored

    fn scratch_config() -> DbConfig {
        let mut config = DbConfig::from_env().expect("config");
        config.database = format!("schooldir_test_{}", uuid::Uuid::new_v4().simple());
        config
    }

    async fn drop_database(config: &DbConfig) {
        let mut conn = MySqlConnection::connect_with(&server_options(config))
            .await
            .expect("connect");
        let sql = format!("DROP DATABASE IF EXISTS {}", quote_identifier(&config.database));
        sqlx::query(&sql).execute(&mut conn).await.expect("drop");
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn creates_missing_database() {
        let config = scratch_config();
        let db = Database::new(config.clone());

        let pool = db.acquire().await.expect("pool creation failed");
        let (name,): (String,) = sqlx::query_as("SELECT DATABASE()")
            .fetch_one(pool)
            .await
            .expect("query failed");
        assert_eq!(name, config.database);

        db.close().await;
        drop_database(&config).await;
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn concurrent_cold_start_shares_one_pool() {
        let config = scratch_config();
        let db = std::sync::Arc::new(Database::new(config.clone()));

        let handles: Vec<_> = (0..10)
            .map(|_| {
                let db = db.clone();
                tokio::spawn(async move {
                    let pool = db.acquire().await.expect("acquire failed");
                    pool as *const MySqlPool as usize
                })
            })
            .collect();

        let mut addrs = Vec::new();
        for handle in handles {
            addrs.push(handle.await.expect("task panicked"));
        }
        addrs.dedup();
        assert_eq!(addrs.len(), 1);

        db.close().await;
        drop_database(&config).await;
    }
}
