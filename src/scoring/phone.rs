use serde_json::Value;

use crate::models::{SignalResult, SignalType};
use super::{bool_field, clamp_score};

const BASELINE: i32 = 50;

/// Score a phone verification document. Detail ordering: hard invalidity,
/// then VoIP, then score band.
pub fn score(raw: &Value) -> SignalResult {
    let valid = bool_field(raw, "valid");
    let line_type = raw["type"].as_str().map(str::to_ascii_lowercase);
    let line_type = line_type.as_deref();

    let mut score = BASELINE;
    match valid {
        Some(true) => score += 30,
        Some(false) => score -= 35,
        None => {}
    }
    match line_type {
        Some("mobile") => score += 10,
        Some("voip") => score -= 20,
        _ => {}
    }
    if raw["country"].is_object() || raw["country"].as_str().is_some() {
        score += 5;
    }
    let score = clamp_score(score);

    let detail = if valid == Some(false) {
        "Number is not in service or malformed".to_string()
    } else if line_type == Some("voip") {
        "VoIP number — often used for throwaway signups".to_string()
    } else if score >= 70 {
        "Active phone number".to_string()
    } else if score >= 40 {
        "Number could not be fully verified".to_string()
    } else {
        "Phone failed verification".to_string()
    };

    SignalResult::from_score(SignalType::Phone, score, detail)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_valid_mobile_with_country() {
        let raw = json!({
            "valid": true,
            "type": "mobile",
            "country": {"code": "US"},
        });
        let result = score(&raw);
        // 50 + 30 + 10 + 5
        assert_eq!(result.score, 95);
        assert_eq!(result.detail, "Active phone number");
    }

    #[test]
    fn test_invalid_number_detail_wins_over_voip() {
        let raw = json!({"valid": false, "type": "voip"});
        let result = score(&raw);
        // 50 - 35 - 20 → 0
        assert_eq!(result.score, 0);
        assert_eq!(result.detail, "Number is not in service or malformed");
    }

    #[test]
    fn test_valid_voip_flagged() {
        let raw = json!({"valid": true, "type": "VOIP", "country": "GB"});
        let result = score(&raw);
        // 50 + 30 - 20 + 5
        assert_eq!(result.score, 65);
        assert_eq!(result.detail, "VoIP number — often used for throwaway signups");
    }

    #[test]
    fn test_empty_document_uses_baseline() {
        let result = score(&json!({}));
        assert_eq!(result.score, 50);
        assert_eq!(result.detail, "Number could not be fully verified");
    }
}
