use chrono::Utc;
use uuid::Uuid;

use crate::errors::BouncerError;
use super::Database;

impl Database {
    pub fn insert_integration_log(
        &self,
        integration_id: &str,
        validation_id: &str,
        success: bool,
        error: Option<&str>,
    ) -> Result<(), BouncerError> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT INTO integration_logs (id, integration_id, validation_id, success, error, created_at) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            rusqlite::params![
                Uuid::new_v4().to_string(),
                integration_id,
                validation_id,
                success as i64,
                error,
                Utc::now().to_rfc3339()
            ],
        )
        .map_err(|e| BouncerError::Database(format!("Failed to insert integration log: {}", e)))?;
        Ok(())
    }

    pub fn list_integration_logs(
        &self,
        integration_id: &str,
        limit: usize,
    ) -> Result<Vec<serde_json::Value>, BouncerError> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn
            .prepare(
                "SELECT id, validation_id, success, error, created_at FROM integration_logs \
                 WHERE integration_id = ?1 ORDER BY created_at DESC LIMIT ?2",
            )
            .map_err(|e| BouncerError::Database(format!("Query failed: {}", e)))?;
        let rows = stmt
            .query_map(rusqlite::params![integration_id, limit as i64], |row| {
                Ok(serde_json::json!({
                    "id": row.get::<_, String>(0)?,
                    "validation_id": row.get::<_, String>(1)?,
                    "success": row.get::<_, i64>(2)? != 0,
                    "error": row.get::<_, Option<String>>(3)?,
                    "created_at": row.get::<_, String>(4)?,
                }))
            })
            .map_err(|e| BouncerError::Database(format!("Query error: {}", e)))?;
        let mut results = Vec::new();
        for row in rows {
            results.push(row.map_err(|e| BouncerError::Database(format!("Row error: {}", e)))?);
        }
        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{PlanTier, Provider};

    #[test]
    fn test_insert_and_list_logs() {
        let db = Database::in_memory().unwrap();
        let account = db.create_account("a@b.com", PlanTier::Pro).unwrap();
        let integration = db
            .upsert_integration(&account.id, Provider::Hubspot, "conn-1", &[])
            .unwrap();

        db.insert_integration_log(&integration.id, "v1", true, None).unwrap();
        db.insert_integration_log(&integration.id, "v2", false, Some("timeout")).unwrap();

        let logs = db.list_integration_logs(&integration.id, 10).unwrap();
        assert_eq!(logs.len(), 2);
        assert!(logs.iter().any(|l| l["success"] == false && l["error"] == "timeout"));
    }
}
