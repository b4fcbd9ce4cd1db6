use tracing::debug;

use crate::models::{BouncerField, FieldMapping, LeadPayload, MappedLead};

/// Translate a lead into a CRM-shaped flat record, driven by the account's
/// configured mappings. Best-effort by contract: disabled or unrecognized
/// entries are dropped silently, and an empty result is still pushed
/// downstream.
pub fn apply_field_mappings(lead: &LeadPayload, mappings: &[FieldMapping]) -> MappedLead {
    let mut mapped = Vec::new();
    for mapping in mappings {
        if !mapping.enabled {
            continue;
        }
        let Some(field) = BouncerField::parse(&mapping.bouncer_field) else {
            debug!(field = %mapping.bouncer_field, "Unrecognized lead field in mapping, skipping");
            continue;
        };
        let value = match field {
            BouncerField::Email => Some(lead.email.clone()),
            BouncerField::Phone => lead.phone.clone(),
            BouncerField::Company => lead.company.clone(),
            BouncerField::LeadScore => Some(lead.score.to_string()),
            BouncerField::ValidationStatus => Some(lead.status.as_str().to_string()),
        };
        if let Some(value) = value {
            mapped.push((mapping.crm_field.clone(), value));
        }
    }
    mapped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ValidationStatus;
    use chrono::Utc;

    fn lead() -> LeadPayload {
        LeadPayload {
            validation_id: "v1".to_string(),
            email: "lead@acme.com".to_string(),
            phone: None,
            company: Some("Acme".to_string()),
            ip: Some("1.2.3.4".to_string()),
            score: 82,
            status: ValidationStatus::Passed,
            signals: Vec::new(),
            timestamp: Utc::now(),
        }
    }

    fn mapping(bouncer_field: &str, crm_field: &str, enabled: bool) -> FieldMapping {
        FieldMapping {
            bouncer_field: bouncer_field.to_string(),
            crm_field: crm_field.to_string(),
            enabled,
        }
    }

    #[test]
    fn test_maps_recognized_enabled_fields_in_order() {
        let mappings = vec![
            mapping("Lead Score", "lead_score", true),
            mapping("Email", "email", true),
            mapping("Validation Status", "lead_status", true),
        ];
        let mapped = apply_field_mappings(&lead(), &mappings);
        assert_eq!(
            mapped,
            vec![
                ("lead_score".to_string(), "82".to_string()),
                ("email".to_string(), "lead@acme.com".to_string()),
                ("lead_status".to_string(), "Passed".to_string()),
            ]
        );
    }

    #[test]
    fn test_disabled_and_unknown_entries_dropped() {
        let mappings = vec![
            mapping("Email", "email", false),
            mapping("Favorite Color", "color", true),
            mapping("Company", "org", true),
        ];
        let mapped = apply_field_mappings(&lead(), &mappings);
        assert_eq!(mapped, vec![("org".to_string(), "Acme".to_string())]);
    }

    #[test]
    fn test_absent_lead_field_skipped() {
        // Lead has no phone; the mapping is recognized and enabled but the
        // key is simply absent from the output.
        let mapped = apply_field_mappings(&lead(), &[mapping("Phone", "phone", true)]);
        assert!(mapped.is_empty());
    }

    #[test]
    fn test_empty_mapping_list_yields_empty_record() {
        assert!(apply_field_mappings(&lead(), &[]).is_empty());
    }
}
