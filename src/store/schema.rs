//! Schema for the page store

use crate::store::error::StoreError;
use libsql::{Connection, params};

/// Initialize the page store schema
pub async fn initialize_schema(conn: &Connection) -> Result<(), StoreError> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS pages (
            url TEXT PRIMARY KEY,
            content TEXT NOT NULL
        )",
        params![],
    )
    .await
    .map_err(|e| StoreError::Schema(format!("Failed to create pages table: {}", e)))?;

    Ok(())
}
