use chrono::Utc;

use crate::errors::BouncerError;
use crate::models::ValidationStatus;
use super::Database;

pub struct NewValidation<'a> {
    pub id: &'a str,
    pub form_id: &'a str,
    pub account_id: &'a str,
    pub email: &'a str,
    pub phone: Option<&'a str>,
    pub company: Option<&'a str>,
    pub ip: Option<&'a str>,
    pub score: u8,
    pub status: ValidationStatus,
    pub signals_json: &'a str,
}

fn map_validation(row: &rusqlite::Row) -> rusqlite::Result<serde_json::Value> {
    let signals_json: String = row.get(10)?;
    let signals: serde_json::Value =
        serde_json::from_str(&signals_json).unwrap_or(serde_json::Value::Array(Vec::new()));
    Ok(serde_json::json!({
        "id": row.get::<_, String>(0)?,
        "form_id": row.get::<_, String>(1)?,
        "account_id": row.get::<_, String>(2)?,
        "email": row.get::<_, String>(3)?,
        "phone": row.get::<_, Option<String>>(4)?,
        "company": row.get::<_, Option<String>>(5)?,
        "ip": row.get::<_, Option<String>>(6)?,
        "score": row.get::<_, i64>(7)?,
        "status": row.get::<_, String>(8)?,
        "manually_passed": row.get::<_, i64>(9)? != 0,
        "signals": signals,
        "created_at": row.get::<_, String>(11)?,
    }))
}

const VALIDATION_COLUMNS: &str =
    "id, form_id, account_id, email, phone, company, ip, score, status, manually_passed, signals_json, created_at";

impl Database {
    pub fn insert_validation(&self, v: &NewValidation) -> Result<(), BouncerError> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT INTO validations (id, form_id, account_id, email, phone, company, ip, score, status, signals_json, created_at) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
            rusqlite::params![
                v.id,
                v.form_id,
                v.account_id,
                v.email,
                v.phone,
                v.company,
                v.ip,
                v.score as i64,
                v.status.as_str(),
                v.signals_json,
                Utc::now().to_rfc3339()
            ],
        )
        .map_err(|e| BouncerError::Database(format!("Failed to insert validation: {}", e)))?;
        Ok(())
    }

    pub fn get_validation(&self, account_id: &str, id: &str) -> Result<Option<serde_json::Value>, BouncerError> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn
            .prepare(&format!(
                "SELECT {} FROM validations WHERE id = ?1 AND account_id = ?2",
                VALIDATION_COLUMNS
            ))
            .map_err(|e| BouncerError::Database(format!("Query failed: {}", e)))?;
        match stmt.query_row(rusqlite::params![id, account_id], map_validation) {
            Ok(v) => Ok(Some(v)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(BouncerError::Database(format!("Query error: {}", e))),
        }
    }

    pub fn list_validations(
        &self,
        account_id: &str,
        limit: usize,
        offset: usize,
        status: Option<&str>,
    ) -> Result<Vec<serde_json::Value>, BouncerError> {
        let conn = self.conn.lock().unwrap();
        let mut results = Vec::new();
        match status {
            Some(status) => {
                let mut stmt = conn
                    .prepare(&format!(
                        "SELECT {} FROM validations WHERE account_id = ?1 AND status = ?2 ORDER BY created_at DESC LIMIT ?3 OFFSET ?4",
                        VALIDATION_COLUMNS
                    ))
                    .map_err(|e| BouncerError::Database(format!("Query failed: {}", e)))?;
                let rows = stmt
                    .query_map(
                        rusqlite::params![account_id, status, limit as i64, offset as i64],
                        map_validation,
                    )
                    .map_err(|e| BouncerError::Database(format!("Query error: {}", e)))?;
                for row in rows {
                    results.push(row.map_err(|e| BouncerError::Database(format!("Row error: {}", e)))?);
                }
            }
            None => {
                let mut stmt = conn
                    .prepare(&format!(
                        "SELECT {} FROM validations WHERE account_id = ?1 ORDER BY created_at DESC LIMIT ?2 OFFSET ?3",
                        VALIDATION_COLUMNS
                    ))
                    .map_err(|e| BouncerError::Database(format!("Query failed: {}", e)))?;
                let rows = stmt
                    .query_map(
                        rusqlite::params![account_id, limit as i64, offset as i64],
                        map_validation,
                    )
                    .map_err(|e| BouncerError::Database(format!("Query error: {}", e)))?;
                for row in rows {
                    results.push(row.map_err(|e| BouncerError::Database(format!("Row error: {}", e)))?);
                }
            }
        }
        Ok(results)
    }

    /// The one allowed post-hoc mutation: a human override forces the status
    /// to Passed. The computed score is untouched and the override is
    /// tracked in its own flag.
    pub fn override_validation(&self, account_id: &str, id: &str) -> Result<bool, BouncerError> {
        let conn = self.conn.lock().unwrap();
        let affected = conn
            .execute(
                "UPDATE validations SET status = 'Passed', manually_passed = 1 WHERE id = ?1 AND account_id = ?2",
                rusqlite::params![id, account_id],
            )
            .map_err(|e| BouncerError::Database(format!("Override failed: {}", e)))?;
        Ok(affected > 0)
    }
}
