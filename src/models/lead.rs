use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::signal::SignalResult;
use super::validation::ValidationStatus;

/// Canonical lead fields a CRM field mapping may reference. Anything outside
/// this set is dropped silently at push time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BouncerField {
    Email,
    Phone,
    LeadScore,
    Company,
    ValidationStatus,
}

impl BouncerField {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "Email" => Some(BouncerField::Email),
            "Phone" => Some(BouncerField::Phone),
            "Lead Score" => Some(BouncerField::LeadScore),
            "Company" => Some(BouncerField::Company),
            "Validation Status" => Some(BouncerField::ValidationStatus),
            _ => None,
        }
    }
}

/// One user-configured correspondence between a canonical lead field and a
/// provider-specific field name.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldMapping {
    pub bouncer_field: String,
    pub crm_field: String,
    pub enabled: bool,
}

/// Provider-agnostic lead record handed to the field mapper and the
/// notification-style adapters. Owned copy; safe to move into the detached
/// distribution task.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeadPayload {
    pub validation_id: String,
    pub email: String,
    pub phone: Option<String>,
    pub company: Option<String>,
    pub ip: Option<String>,
    pub score: u8,
    pub status: ValidationStatus,
    pub signals: Vec<SignalResult>,
    pub timestamp: DateTime<Utc>,
}

/// Flat CRM-shaped record produced by the field mapper. Pairs keep the
/// caller-configured mapping order.
pub type MappedLead = Vec<(String, String)>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bouncer_field_canonical_set() {
        assert_eq!(BouncerField::parse("Email"), Some(BouncerField::Email));
        assert_eq!(BouncerField::parse("Lead Score"), Some(BouncerField::LeadScore));
        assert_eq!(BouncerField::parse("Validation Status"), Some(BouncerField::ValidationStatus));
        assert_eq!(BouncerField::parse("email"), None);
        assert_eq!(BouncerField::parse("Favorite Color"), None);
    }
}
