pub mod pool;

use sqlx::SqlitePool;

pub use pool::{create_memory_pool, create_pool};

/// Database handle type (the pool is internally reference counted)
pub type Db = SqlitePool;

/// Apply the embedded schema and catalog migrations
pub async fn run_migrations(pool: &Db) -> Result<(), sqlx::migrate::MigrateError> {
    tracing::info!("Running database migrations...");
    sqlx::migrate!("./migrations").run(pool).await?;
    tracing::info!("Migrations complete");
    Ok(())
}

/// Create the parent directory of a file-backed SQLite URL if it is missing
pub fn ensure_database_dir(database_url: &str) -> std::io::Result<()> {
    let Some(path) = sqlite_file_path(database_url) else {
        return Ok(());
    };

    if let Some(parent) = std::path::Path::new(path).parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            tracing::info!("Creating database directory: {:?}", parent);
            std::fs::create_dir_all(parent)?;
        }
    }

    Ok(())
}

/// File path portion of a `sqlite:` URL, or `None` for in-memory databases
fn sqlite_file_path(database_url: &str) -> Option<&str> {
    let rest = database_url
        .strip_prefix("sqlite://")
        .or_else(|| database_url.strip_prefix("sqlite:"))?;
    let path = rest.split('?').next().unwrap_or(rest);

    if path.is_empty() || path == ":memory:" {
        None
    } else {
        Some(path)
    }
}
