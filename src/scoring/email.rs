use serde_json::Value;

use crate::models::{SignalResult, SignalType};
use super::{bool_field, clamp_score};

const BASELINE: i32 = 50;

/// Score an email deliverability document.
///
/// Detail selection is ordered: the most specific disqualifying condition
/// wins, then the score band. Reordering changes user-visible text.
pub fn score(raw: &Value) -> SignalResult {
    let deliverability = raw["deliverability"].as_str();
    let valid_format = bool_field(raw, "is_valid_format");
    let disposable = bool_field(raw, "is_disposable_email") == Some(true);
    let role = bool_field(raw, "is_role_email") == Some(true);

    let mut score = BASELINE;
    match deliverability {
        Some("DELIVERABLE") => score += 30,
        Some("UNDELIVERABLE") => score -= 40,
        _ => {}
    }
    if valid_format == Some(false) {
        score -= 30;
    }
    if disposable {
        score -= 35;
    }
    if role {
        score -= 10;
    }
    if bool_field(raw, "is_mx_found") == Some(true) {
        score += 10;
    }
    if bool_field(raw, "is_smtp_valid") == Some(true) {
        score += 10;
    }
    let score = clamp_score(score);

    let detail = if deliverability == Some("UNDELIVERABLE") {
        "Mailbox does not accept mail".to_string()
    } else if disposable {
        "Disposable email address".to_string()
    } else if valid_format == Some(false) {
        "Malformed email address".to_string()
    } else if role {
        "Role-based address (e.g. info@, sales@)".to_string()
    } else if score >= 70 {
        "Deliverable mailbox".to_string()
    } else if score >= 40 {
        "Deliverability could not be fully confirmed".to_string()
    } else {
        "Email failed deliverability checks".to_string()
    };

    SignalResult::from_score(SignalType::Email, score, detail)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_deliverable_mailbox_scores_high() {
        let raw = json!({
            "deliverability": "DELIVERABLE",
            "is_valid_format": {"value": true},
            "is_mx_found": {"value": true},
            "is_smtp_valid": {"value": true},
        });
        let result = score(&raw);
        // 50 + 30 + 10 + 10
        assert_eq!(result.score, 100);
        assert_eq!(result.detail, "Deliverable mailbox");
    }

    #[test]
    fn test_undeliverable_floors_and_wins_detail() {
        let raw = json!({
            "deliverability": "UNDELIVERABLE",
            "is_valid_format": {"value": false},
        });
        let result = score(&raw);
        // 50 - 40 - 30 → clamped to 0
        assert_eq!(result.score, 0);
        assert_eq!(result.detail, "Mailbox does not accept mail");
    }

    #[test]
    fn test_disposable_beats_role_detail() {
        let raw = json!({
            "deliverability": "DELIVERABLE",
            "is_disposable_email": {"value": true},
            "is_role_email": {"value": true},
        });
        let result = score(&raw);
        // 50 + 30 - 35 - 10
        assert_eq!(result.score, 35);
        assert_eq!(result.detail, "Disposable email address");
    }

    #[test]
    fn test_unknown_deliverability_stays_neutral_band() {
        let raw = json!({"deliverability": "UNKNOWN"});
        let result = score(&raw);
        assert_eq!(result.score, 50);
        assert_eq!(result.detail, "Deliverability could not be fully confirmed");
    }

    #[test]
    fn test_empty_document_uses_baseline() {
        let result = score(&json!({}));
        assert_eq!(result.score, 50);
    }
}
