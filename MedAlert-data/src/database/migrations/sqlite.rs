use rusqlite::Connection;
use tracing::info;

use crate::database::DatabaseError;

/// Run SQLite migrations
pub fn run_migrations(conn: &Connection) -> Result<(), DatabaseError> {
    info!("Running SQLite migrations");

    create_records_table(conn)?;

    info!("SQLite migrations completed successfully");
    Ok(())
}

/// Create the records table, one JSON document per user and record kind
fn create_records_table(conn: &Connection) -> Result<(), DatabaseError> {
    info!("Creating records table if not exists");

    conn.execute(
        "CREATE TABLE IF NOT EXISTS records (
            user_id TEXT NOT NULL,
            kind TEXT NOT NULL,
            payload TEXT NOT NULL,
            updated_at TEXT NOT NULL,
            PRIMARY KEY (user_id, kind)
        )",
        [],
    )
    .map_err(|e| DatabaseError::MigrationError(format!("Failed to create records table: {}", e)))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_migrations_are_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        run_migrations(&conn).unwrap();
        run_migrations(&conn).unwrap();

        conn.execute(
            "INSERT INTO records (user_id, kind, payload, updated_at) VALUES ('u1', 'medications', '[]', 'now')",
            [],
        )
        .unwrap();
        conn.execute(
            "INSERT INTO records (user_id, kind, payload, updated_at) VALUES ('u2', 'medications', '[]', 'now')",
            [],
        )
        .unwrap();

        let duplicate = conn.execute(
            "INSERT INTO records (user_id, kind, payload, updated_at) VALUES ('u1', 'medications', '[]', 'now')",
            [],
        );
        assert!(duplicate.is_err());
    }
}
