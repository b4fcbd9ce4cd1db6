use chrono::Utc;
use uuid::Uuid;

use crate::errors::BouncerError;
use crate::models::{FieldMapping, Integration, IntegrationStatus, Provider};
use super::Database;

const INTEGRATION_COLUMNS: &str =
    "id, account_id, provider, status, connection_id, field_mappings_json, last_synced_at";

struct RawIntegration {
    id: String,
    account_id: String,
    provider: String,
    status: String,
    connection_id: Option<String>,
    field_mappings_json: String,
    last_synced_at: Option<String>,
}

fn map_raw(row: &rusqlite::Row) -> rusqlite::Result<RawIntegration> {
    Ok(RawIntegration {
        id: row.get(0)?,
        account_id: row.get(1)?,
        provider: row.get(2)?,
        status: row.get(3)?,
        connection_id: row.get(4)?,
        field_mappings_json: row.get(5)?,
        last_synced_at: row.get(6)?,
    })
}

/// Stored provider strings are parsed back into the closed enum; a row with
/// an unknown provider is a configuration error, not a silent skip.
fn convert(raw: RawIntegration) -> Result<Integration, BouncerError> {
    let field_mappings: Vec<FieldMapping> =
        serde_json::from_str(&raw.field_mappings_json).unwrap_or_default();
    Ok(Integration {
        id: raw.id,
        account_id: raw.account_id,
        provider: Provider::parse(&raw.provider)?,
        status: IntegrationStatus::parse(&raw.status)?,
        connection_id: raw.connection_id,
        field_mappings,
        last_synced_at: raw.last_synced_at,
    })
}

impl Database {
    /// Create or refresh the single integration row per (account, provider).
    /// Re-authorizing an existing provider updates the connection handle and
    /// mappings in place.
    pub fn upsert_integration(
        &self,
        account_id: &str,
        provider: Provider,
        connection_id: &str,
        field_mappings: &[FieldMapping],
    ) -> Result<Integration, BouncerError> {
        let mappings_json = serde_json::to_string(field_mappings)?;
        let id = Uuid::new_v4().to_string();
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT INTO integrations (id, account_id, provider, status, connection_id, field_mappings_json, created_at) \
             VALUES (?1, ?2, ?3, 'connected', ?4, ?5, ?6) \
             ON CONFLICT(account_id, provider) DO UPDATE SET \
             status = 'connected', connection_id = excluded.connection_id, field_mappings_json = excluded.field_mappings_json",
            rusqlite::params![
                id,
                account_id,
                provider.as_str(),
                connection_id,
                mappings_json,
                Utc::now().to_rfc3339()
            ],
        )
        .map_err(|e| BouncerError::Database(format!("Failed to upsert integration: {}", e)))?;
        drop(conn);

        self.get_integration(account_id, provider)?
            .ok_or_else(|| BouncerError::Database("Integration missing after upsert".to_string()))
    }

    pub fn get_integration(&self, account_id: &str, provider: Provider) -> Result<Option<Integration>, BouncerError> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn
            .prepare(&format!(
                "SELECT {} FROM integrations WHERE account_id = ?1 AND provider = ?2",
                INTEGRATION_COLUMNS
            ))
            .map_err(|e| BouncerError::Database(format!("Query failed: {}", e)))?;
        match stmt.query_row(rusqlite::params![account_id, provider.as_str()], map_raw) {
            Ok(raw) => Ok(Some(convert(raw)?)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(BouncerError::Database(format!("Query error: {}", e))),
        }
    }

    pub fn list_integrations(&self, account_id: &str) -> Result<Vec<Integration>, BouncerError> {
        self.query_integrations(
            &format!(
                "SELECT {} FROM integrations WHERE account_id = ?1 ORDER BY provider",
                INTEGRATION_COLUMNS
            ),
            account_id,
        )
    }

    /// Integrations eligible for fan-out: connected and holding a
    /// connection handle (or webhook URL).
    pub fn connected_integrations(&self, account_id: &str) -> Result<Vec<Integration>, BouncerError> {
        self.query_integrations(
            &format!(
                "SELECT {} FROM integrations WHERE account_id = ?1 AND status = 'connected' AND connection_id IS NOT NULL ORDER BY provider",
                INTEGRATION_COLUMNS
            ),
            account_id,
        )
    }

    fn query_integrations(&self, sql: &str, account_id: &str) -> Result<Vec<Integration>, BouncerError> {
        let raws = {
            let conn = self.conn.lock().unwrap();
            let mut stmt = conn
                .prepare(sql)
                .map_err(|e| BouncerError::Database(format!("Query failed: {}", e)))?;
            let rows = stmt
                .query_map(rusqlite::params![account_id], map_raw)
                .map_err(|e| BouncerError::Database(format!("Query error: {}", e)))?;
            let mut raws = Vec::new();
            for row in rows {
                raws.push(row.map_err(|e| BouncerError::Database(format!("Row error: {}", e)))?);
            }
            raws
        };
        raws.into_iter().map(convert).collect()
    }

    /// Disconnect clears the connection handle; the row and its field
    /// mappings survive for a later re-connect.
    pub fn disconnect_integration(&self, account_id: &str, provider: Provider) -> Result<bool, BouncerError> {
        let conn = self.conn.lock().unwrap();
        let affected = conn
            .execute(
                "UPDATE integrations SET status = 'disconnected', connection_id = NULL WHERE account_id = ?1 AND provider = ?2",
                rusqlite::params![account_id, provider.as_str()],
            )
            .map_err(|e| BouncerError::Database(format!("Disconnect failed: {}", e)))?;
        Ok(affected > 0)
    }

    pub fn touch_last_synced(&self, integration_id: &str) -> Result<(), BouncerError> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "UPDATE integrations SET last_synced_at = ?2 WHERE id = ?1",
            rusqlite::params![integration_id, Utc::now().to_rfc3339()],
        )
        .map_err(|e| BouncerError::Database(format!("Sync timestamp update failed: {}", e)))?;
        Ok(())
    }
}
