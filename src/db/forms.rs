use chrono::Utc;
use uuid::Uuid;

use crate::errors::BouncerError;
use super::Database;

#[derive(Debug, Clone)]
pub struct FormRow {
    pub id: String,
    pub account_id: String,
    pub name: String,
    pub form_key: String,
    pub is_active: bool,
    pub validation_count: i64,
    pub passed_count: i64,
    pub avg_score: f64,
    pub pass_rate: f64,
}

const FORM_COLUMNS: &str =
    "id, account_id, name, form_key, is_active, validation_count, passed_count, avg_score, pass_rate";

fn map_form(row: &rusqlite::Row) -> rusqlite::Result<FormRow> {
    Ok(FormRow {
        id: row.get(0)?,
        account_id: row.get(1)?,
        name: row.get(2)?,
        form_key: row.get(3)?,
        is_active: row.get::<_, i64>(4)? != 0,
        validation_count: row.get(5)?,
        passed_count: row.get(6)?,
        avg_score: row.get(7)?,
        pass_rate: row.get(8)?,
    })
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

impl Database {
    pub fn create_form(&self, account_id: &str, name: &str) -> Result<FormRow, BouncerError> {
        let id = Uuid::new_v4().to_string();
        // Unguessable public submission key
        let form_key = format!("frm_{}", Uuid::new_v4().simple());
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT INTO forms (id, account_id, name, form_key, created_at) VALUES (?1, ?2, ?3, ?4, ?5)",
            rusqlite::params![id, account_id, name, form_key, Utc::now().to_rfc3339()],
        )
        .map_err(|e| BouncerError::Database(format!("Failed to create form: {}", e)))?;
        Ok(FormRow {
            id,
            account_id: account_id.to_string(),
            name: name.to_string(),
            form_key,
            is_active: true,
            validation_count: 0,
            passed_count: 0,
            avg_score: 0.0,
            pass_rate: 0.0,
        })
    }

    pub fn get_form_by_key(&self, form_key: &str) -> Result<Option<FormRow>, BouncerError> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn
            .prepare(&format!("SELECT {} FROM forms WHERE form_key = ?1", FORM_COLUMNS))
            .map_err(|e| BouncerError::Database(format!("Query failed: {}", e)))?;
        match stmt.query_row(rusqlite::params![form_key], map_form) {
            Ok(form) => Ok(Some(form)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(BouncerError::Database(format!("Query error: {}", e))),
        }
    }

    pub fn get_form(&self, account_id: &str, id: &str) -> Result<Option<FormRow>, BouncerError> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn
            .prepare(&format!(
                "SELECT {} FROM forms WHERE id = ?1 AND account_id = ?2",
                FORM_COLUMNS
            ))
            .map_err(|e| BouncerError::Database(format!("Query failed: {}", e)))?;
        match stmt.query_row(rusqlite::params![id, account_id], map_form) {
            Ok(form) => Ok(Some(form)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(BouncerError::Database(format!("Query error: {}", e))),
        }
    }

    pub fn list_forms(&self, account_id: &str) -> Result<Vec<FormRow>, BouncerError> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn
            .prepare(&format!(
                "SELECT {} FROM forms WHERE account_id = ?1 ORDER BY created_at DESC",
                FORM_COLUMNS
            ))
            .map_err(|e| BouncerError::Database(format!("Query failed: {}", e)))?;
        let rows = stmt
            .query_map(rusqlite::params![account_id], map_form)
            .map_err(|e| BouncerError::Database(format!("Query error: {}", e)))?;
        let mut forms = Vec::new();
        for row in rows {
            forms.push(row.map_err(|e| BouncerError::Database(format!("Row error: {}", e)))?);
        }
        Ok(forms)
    }

    pub fn set_form_active(&self, account_id: &str, id: &str, active: bool) -> Result<bool, BouncerError> {
        let conn = self.conn.lock().unwrap();
        let affected = conn
            .execute(
                "UPDATE forms SET is_active = ?3 WHERE id = ?1 AND account_id = ?2",
                rusqlite::params![id, account_id, active as i64],
            )
            .map_err(|e| BouncerError::Database(format!("Update failed: {}", e)))?;
        Ok(affected > 0)
    }

    /// Incremental rolling-aggregate update. Read-modify-write without a
    /// transaction: concurrent submissions for the same form can interleave
    /// here. Aggregates are best-effort, not exact accounting.
    pub fn record_validation_stats(&self, form_id: &str, score: u8, passed: bool) -> Result<(), BouncerError> {
        let (old_count, old_passed, old_avg) = {
            let conn = self.conn.lock().unwrap();
            conn.query_row(
                "SELECT validation_count, passed_count, avg_score FROM forms WHERE id = ?1",
                rusqlite::params![form_id],
                |row| Ok((row.get::<_, i64>(0)?, row.get::<_, i64>(1)?, row.get::<_, f64>(2)?)),
            )
            .map_err(|e| BouncerError::Database(format!("Stats read failed: {}", e)))?
        };

        let new_count = old_count + 1;
        let new_passed = old_passed + if passed { 1 } else { 0 };
        let new_avg = round2((old_avg * old_count as f64 + score as f64) / new_count as f64);
        let pass_rate = round2(new_passed as f64 / new_count as f64 * 100.0);

        let conn = self.conn.lock().unwrap();
        conn.execute(
            "UPDATE forms SET validation_count = ?2, passed_count = ?3, avg_score = ?4, pass_rate = ?5 WHERE id = ?1",
            rusqlite::params![form_id, new_count, new_passed, new_avg, pass_rate],
        )
        .map_err(|e| BouncerError::Database(format!("Stats update failed: {}", e)))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PlanTier;

    fn setup() -> (Database, FormRow) {
        let db = Database::in_memory().unwrap();
        let account = db.create_account("a@b.com", PlanTier::Pro).unwrap();
        let form = db.create_form(&account.id, "Landing page").unwrap();
        (db, form)
    }

    #[test]
    fn test_form_key_lookup() {
        let (db, form) = setup();
        assert!(form.form_key.starts_with("frm_"));
        let fetched = db.get_form_by_key(&form.form_key).unwrap().unwrap();
        assert_eq!(fetched.id, form.id);
        assert!(fetched.is_active);
        assert!(db.get_form_by_key("frm_bogus").unwrap().is_none());
    }

    #[test]
    fn test_deactivate_form() {
        let (db, form) = setup();
        assert!(db.set_form_active(&form.account_id, &form.id, false).unwrap());
        let fetched = db.get_form_by_key(&form.form_key).unwrap().unwrap();
        assert!(!fetched.is_active);
    }

    #[test]
    fn test_rolling_stats_update() {
        let (db, form) = setup();
        db.record_validation_stats(&form.id, 80, true).unwrap();
        db.record_validation_stats(&form.id, 50, false).unwrap();
        db.record_validation_stats(&form.id, 90, true).unwrap();

        let fetched = db.get_form_by_key(&form.form_key).unwrap().unwrap();
        assert_eq!(fetched.validation_count, 3);
        assert_eq!(fetched.passed_count, 2);
        // (80 + 50 + 90) / 3 = 73.33
        assert_eq!(fetched.avg_score, 73.33);
        assert_eq!(fetched.pass_rate, 66.67);
    }
}
