use chrono::Utc;
use uuid::Uuid;

use crate::errors::BouncerError;
use crate::models::{PlanTier, ScoringThresholds};
use super::Database;

#[derive(Debug, Clone)]
pub struct AccountRow {
    pub id: String,
    pub email: String,
    pub api_key: String,
    pub plan: PlanTier,
    pub monthly_limit: i64,
    pub validations_used: i64,
    pub thresholds: ScoringThresholds,
    pub block_rejected: bool,
    pub rejection_message: Option<String>,
}

const ACCOUNT_COLUMNS: &str = "id, email, api_key, plan, monthly_limit, validations_used, passed_min, borderline_min, block_rejected, rejection_message";

fn map_account(row: &rusqlite::Row) -> rusqlite::Result<AccountRow> {
    let plan_str: String = row.get(3)?;
    let plan = PlanTier::parse(&plan_str).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(3, rusqlite::types::Type::Text, Box::new(e))
    })?;
    Ok(AccountRow {
        id: row.get(0)?,
        email: row.get(1)?,
        api_key: row.get(2)?,
        plan,
        monthly_limit: row.get(4)?,
        validations_used: row.get(5)?,
        thresholds: ScoringThresholds {
            passed_min: row.get::<_, i64>(6)? as u8,
            borderline_min: row.get::<_, i64>(7)? as u8,
        },
        block_rejected: row.get::<_, i64>(8)? != 0,
        rejection_message: row.get(9)?,
    })
}

impl Database {
    pub fn create_account(&self, email: &str, plan: PlanTier) -> Result<AccountRow, BouncerError> {
        let id = Uuid::new_v4().to_string();
        let api_key = format!("lb_{}", Uuid::new_v4().simple());
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT INTO accounts (id, email, api_key, plan, monthly_limit, created_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            rusqlite::params![id, email, api_key, plan.as_str(), plan.monthly_limit(), Utc::now().to_rfc3339()],
        ).map_err(|e| BouncerError::Database(format!("Failed to create account: {}", e)))?;
        Ok(AccountRow {
            id,
            email: email.to_string(),
            api_key,
            plan,
            monthly_limit: plan.monthly_limit(),
            validations_used: 0,
            thresholds: ScoringThresholds::default(),
            block_rejected: false,
            rejection_message: None,
        })
    }

    pub fn get_account(&self, id: &str) -> Result<Option<AccountRow>, BouncerError> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn
            .prepare(&format!("SELECT {} FROM accounts WHERE id = ?1", ACCOUNT_COLUMNS))
            .map_err(|e| BouncerError::Database(format!("Query failed: {}", e)))?;
        match stmt.query_row(rusqlite::params![id], map_account) {
            Ok(account) => Ok(Some(account)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(BouncerError::Database(format!("Query error: {}", e))),
        }
    }

    pub fn get_account_by_api_key(&self, api_key: &str) -> Result<Option<AccountRow>, BouncerError> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn
            .prepare(&format!("SELECT {} FROM accounts WHERE api_key = ?1", ACCOUNT_COLUMNS))
            .map_err(|e| BouncerError::Database(format!("Query failed: {}", e)))?;
        match stmt.query_row(rusqlite::params![api_key], map_account) {
            Ok(account) => Ok(Some(account)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(BouncerError::Database(format!("Query error: {}", e))),
        }
    }

    pub fn increment_usage(&self, id: &str) -> Result<(), BouncerError> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "UPDATE accounts SET validations_used = validations_used + 1 WHERE id = ?1",
            rusqlite::params![id],
        )
        .map_err(|e| BouncerError::Database(format!("Usage update failed: {}", e)))?;
        Ok(())
    }

    pub fn update_account_settings(
        &self,
        id: &str,
        thresholds: &ScoringThresholds,
        block_rejected: bool,
        rejection_message: Option<&str>,
    ) -> Result<(), BouncerError> {
        thresholds.validate()?;
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "UPDATE accounts SET passed_min = ?2, borderline_min = ?3, block_rejected = ?4, rejection_message = ?5 WHERE id = ?1",
            rusqlite::params![
                id,
                thresholds.passed_min as i64,
                thresholds.borderline_min as i64,
                block_rejected as i64,
                rejection_message
            ],
        )
        .map_err(|e| BouncerError::Database(format!("Settings update failed: {}", e)))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_and_fetch_account() {
        let db = Database::in_memory().unwrap();
        let account = db.create_account("owner@acme.com", PlanTier::Pro).unwrap();
        assert!(account.api_key.starts_with("lb_"));
        assert_eq!(account.monthly_limit, 10_000);

        let fetched = db.get_account(&account.id).unwrap().unwrap();
        assert_eq!(fetched.email, "owner@acme.com");
        assert_eq!(fetched.plan, PlanTier::Pro);
        assert_eq!(fetched.validations_used, 0);
        assert_eq!(fetched.thresholds.passed_min, 70);

        let by_key = db.get_account_by_api_key(&account.api_key).unwrap().unwrap();
        assert_eq!(by_key.id, account.id);
        assert!(db.get_account_by_api_key("lb_bogus").unwrap().is_none());
    }

    #[test]
    fn test_increment_usage() {
        let db = Database::in_memory().unwrap();
        let account = db.create_account("a@b.com", PlanTier::Free).unwrap();
        db.increment_usage(&account.id).unwrap();
        db.increment_usage(&account.id).unwrap();
        assert_eq!(db.get_account(&account.id).unwrap().unwrap().validations_used, 2);
    }

    #[test]
    fn test_update_settings_enforces_threshold_invariant() {
        let db = Database::in_memory().unwrap();
        let account = db.create_account("a@b.com", PlanTier::Starter).unwrap();

        let bad = ScoringThresholds { passed_min: 40, borderline_min: 70 };
        assert!(db.update_account_settings(&account.id, &bad, false, None).is_err());

        let good = ScoringThresholds { passed_min: 80, borderline_min: 50 };
        db.update_account_settings(&account.id, &good, true, Some("Not accepted")).unwrap();
        let fetched = db.get_account(&account.id).unwrap().unwrap();
        assert_eq!(fetched.thresholds.passed_min, 80);
        assert!(fetched.block_rejected);
        assert_eq!(fetched.rejection_message.as_deref(), Some("Not accepted"));
    }
}
