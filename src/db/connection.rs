use rusqlite::Connection;
use std::path::Path;
use std::sync::{Arc, Mutex};
use crate::errors::BouncerError;

pub struct Database {
    pub(crate) conn: Arc<Mutex<Connection>>,
}

impl Database {
    pub fn new(path: &str) -> Result<Self, BouncerError> {
        // Ensure parent directory exists
        if let Some(parent) = Path::new(path).parent() {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(path)
            .map_err(|e| BouncerError::Database(format!("Failed to open database: {}", e)))?;

        // Enable WAL mode for better concurrency
        conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA foreign_keys=ON;")
            .map_err(|e| BouncerError::Database(format!("Failed to set pragmas: {}", e)))?;

        let db = Self { conn: Arc::new(Mutex::new(conn)) };
        db.initialize()?;
        Ok(db)
    }

    pub fn in_memory() -> Result<Self, BouncerError> {
        let conn = Connection::open_in_memory()
            .map_err(|e| BouncerError::Database(format!("Failed to open in-memory db: {}", e)))?;
        let db = Self { conn: Arc::new(Mutex::new(conn)) };
        db.initialize()?;
        Ok(db)
    }

    fn initialize(&self) -> Result<(), BouncerError> {
        let conn = self.conn.lock().unwrap();
        conn.execute_batch(super::schema::CREATE_TABLES)
            .map_err(|e| BouncerError::Database(format!("Failed to create tables: {}", e)))?;
        Ok(())
    }

    pub fn conn(&self) -> Arc<Mutex<Connection>> {
        self.conn.clone()
    }
}

impl Clone for Database {
    fn clone(&self) -> Self {
        Self { conn: self.conn.clone() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_creates_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("bouncer.db");
        let db = Database::new(path.to_str().unwrap()).unwrap();
        // Schema applied; a plain count over an empty table proves it.
        let conn = db.conn();
        let conn = conn.lock().unwrap();
        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM accounts", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 0);
    }

    #[test]
    fn test_clone_shares_the_connection() {
        let db = Database::in_memory().unwrap();
        let clone = db.clone();
        {
            let conn = db.conn();
            let conn = conn.lock().unwrap();
            conn.execute(
                "INSERT INTO accounts (id, email, api_key, plan, monthly_limit, created_at) \
                 VALUES ('a1', 'x@y.io', 'lb_k', 'free', 100, '2026-01-01T00:00:00Z')",
                [],
            )
            .unwrap();
        }
        let conn = clone.conn();
        let conn = conn.lock().unwrap();
        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM accounts", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 1);
    }
}
