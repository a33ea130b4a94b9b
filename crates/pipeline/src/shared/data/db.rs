use sea_orm::{ConnectionTrait, Database, DatabaseBackend, DatabaseConnection, Statement};

/// Open the SQLite database file, creating it (and its directory) when
/// missing. The connection is owned by the caller and lives for one
/// pipeline invocation.
pub async fn connect(db_file: &str) -> anyhow::Result<DatabaseConnection> {
    if let Some(parent) = std::path::Path::new(db_file).parent() {
        std::fs::create_dir_all(parent)?;
    }
    let absolute_path = if std::path::Path::new(db_file).is_absolute() {
        std::path::PathBuf::from(db_file)
    } else {
        std::env::current_dir()?.join(db_file)
    };
    // Normalize path separators and ensure proper URL form on Windows
    let normalized = absolute_path.to_string_lossy().replace('\\', "/");
    let needs_leading_slash = !normalized.starts_with('/') && normalized.contains(':');
    let prefix = if needs_leading_slash { "/" } else { "" };
    let db_url = format!("sqlite://{}{}?mode=rwc", prefix, normalized);
    let conn = Database::connect(&db_url).await?;
    Ok(conn)
}

/// In-memory database for tests. The pool is pinned to a single
/// connection: every pooled sqlite connection would otherwise open its own
/// empty in-memory database.
pub async fn connect_in_memory() -> anyhow::Result<DatabaseConnection> {
    let mut options = sea_orm::ConnectOptions::new("sqlite::memory:".to_string());
    options.max_connections(1).min_connections(1);
    let conn = Database::connect(options).await?;
    Ok(conn)
}

/// Ensure the pipeline schema exists (minimal schema bootstrap).
///
/// Natural-key unique constraints carry the upsert semantics: one customer
/// per mobile number, one fact row per order, one item row per
/// (order, sku) pair.
pub async fn create_tables(conn: &DatabaseConnection) -> anyhow::Result<()> {
    create_if_missing(
        conn,
        "customers",
        r#"
        CREATE TABLE customers (
            mobile_number BIGINT PRIMARY KEY NOT NULL,
            customer_id TEXT,
            customer_name TEXT NOT NULL DEFAULT '',
            region TEXT NOT NULL DEFAULT 'Unknown'
        );
    "#,
    )
    .await?;

    create_if_missing(
        conn,
        "orders_fact",
        r#"
        CREATE TABLE orders_fact (
            order_id TEXT PRIMARY KEY NOT NULL,
            mobile_number BIGINT NOT NULL,
            order_date_time_utc TEXT NOT NULL,
            total_amount REAL NOT NULL DEFAULT 0
        );
    "#,
    )
    .await?;

    create_if_missing(
        conn,
        "order_items",
        r#"
        CREATE TABLE order_items (
            order_id TEXT NOT NULL,
            sku_id TEXT NOT NULL DEFAULT '',
            sku_count INTEGER NOT NULL DEFAULT 0,
            PRIMARY KEY (order_id, sku_id)
        );
    "#,
    )
    .await?;

    Ok(())
}

async fn create_if_missing(
    conn: &DatabaseConnection,
    table: &str,
    create_sql: &str,
) -> anyhow::Result<()> {
    let check = format!(
        "SELECT name FROM sqlite_master WHERE type='table' AND name='{}';",
        table
    );
    let existing = conn
        .query_all(Statement::from_string(DatabaseBackend::Sqlite, check))
        .await?;

    if existing.is_empty() {
        tracing::info!("Creating {} table", table);
        conn.execute(Statement::from_string(
            DatabaseBackend::Sqlite,
            create_sql.to_string(),
        ))
        .await?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_bootstrap_is_idempotent() {
        let conn = connect_in_memory().await.unwrap();
        create_tables(&conn).await.unwrap();
        // second run must not fail on existing tables
        create_tables(&conn).await.unwrap();

        let tables = conn
            .query_all(Statement::from_string(
                DatabaseBackend::Sqlite,
                "SELECT name FROM sqlite_master WHERE type='table' ORDER BY name;".to_string(),
            ))
            .await
            .unwrap();
        let names: Vec<String> = tables
            .iter()
            .map(|row| row.try_get("", "name").unwrap())
            .collect();
        assert!(names.contains(&"customers".to_string()));
        assert!(names.contains(&"orders_fact".to_string()));
        assert!(names.contains(&"order_items".to_string()));
    }
}
