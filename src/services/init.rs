//! Startup helpers:
//! - database connection + migrations
//! - superuser bootstrap from the environment

use std::path::Path;

use anyhow::Result;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;

use crate::config::Config;
use crate::db::UserRepository;
use crate::services::auth::hash_password;
use crate::services::clock::Clock;

/// Redact potentially sensitive information from a database URL before logging.
///
/// Parsed URLs lose their userinfo and query string. Anything unparseable is
/// cut after the last '@', or replaced entirely.
pub fn redact_db_url(db_url: &str) -> String {
    match url::Url::parse(db_url) {
        Ok(url) => {
            let host = url.host_str().unwrap_or("");
            let port = url.port().map(|p| format!(":{}", p)).unwrap_or_default();
            format!("{}://{}{}{}", url.scheme(), host, port, url.path())
        }
        Err(_) => match db_url.rfind('@') {
            Some(at) => format!("(redacted){}", &db_url[at + 1..]),
            None => "(redacted)".to_string(),
        },
    }
}

/// File path behind a `sqlite://` or `sqlite:` URL.
fn sqlite_file_path(db_url: &str) -> &str {
    let path = db_url
        .strip_prefix("sqlite://")
        .or_else(|| db_url.strip_prefix("sqlite:"))
        .unwrap_or(db_url);
    path.split('?').next().unwrap_or(path)
}

/// Open the SQLite pool (creating the file and its directory when missing)
/// and apply pending migrations.
pub async fn init_db(config: &Config) -> Result<SqlitePool> {
    let db_url = &config.database.url;
    tracing::info!("Connecting to database: {}", redact_db_url(db_url));

    let db_path = sqlite_file_path(db_url);
    if let Some(parent) = Path::new(db_path).parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).map_err(|e| {
                anyhow::anyhow!(
                    "Failed to create database directory {}: {}",
                    parent.display(),
                    e
                )
            })?;
        }
    }

    let connect_options = SqliteConnectOptions::new()
        .filename(db_path)
        .create_if_missing(true)
        .foreign_keys(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(config.database.max_connections)
        .connect_with(connect_options)
        .await?;

    tracing::info!("Running database migrations");
    sqlx::migrate!("./migrations").run(&pool).await?;

    Ok(pool)
}

/// Ensure the configured superuser exists. Skipped unless both
/// `ADMIN_USERNAME` and `ADMIN_PASSWORD` are set.
pub async fn ensure_admin(pool: &SqlitePool, config: &Config, clock: &dyn Clock) -> Result<()> {
    let (Some(username), Some(password)) = (&config.admin.username, &config.admin.password) else {
        tracing::debug!("No admin credentials configured, skipping superuser bootstrap");
        return Ok(());
    };

    let hash = hash_password(password)?;
    let admin = UserRepository::ensure_superuser(pool, username, &hash, clock.now()).await?;
    tracing::info!("Superuser '{}' is ready", admin.username);
    Ok(())
}
