use serde_json::Value;

use crate::models::{SignalResult, SignalType};
use super::clamp_score;

// Low baseline: a company is unverified until the provider shows evidence.
const BASELINE: i32 = 30;

/// Score a company enrichment document. Detail ordering: no record found,
/// then score band.
pub fn score(raw: &Value) -> SignalResult {
    let record_found = raw["name"].as_str().map(|s| !s.is_empty()).unwrap_or(false)
        || raw["domain"].as_str().map(|s| !s.is_empty()).unwrap_or(false);
    let employees = raw["employees_count"]
        .as_i64()
        .or_else(|| raw["employee_count"].as_i64())
        .unwrap_or(0);

    let mut score = BASELINE;
    if record_found {
        score += 40;
    }
    if employees > 0 {
        score += 10;
    }
    if raw["industry"].as_str().map(|s| !s.is_empty()).unwrap_or(false) {
        score += 10;
    }
    if raw["year_founded"].as_i64().is_some() {
        score += 5;
    }
    if raw["linkedin_url"].as_str().map(|s| !s.is_empty()).unwrap_or(false) {
        score += 10;
    }
    let score = clamp_score(score);

    let detail = if !record_found {
        "No company record found for this domain".to_string()
    } else if score >= 70 {
        "Verified company profile".to_string()
    } else if score >= 40 {
        "Partial company profile".to_string()
    } else {
        "Company could not be verified".to_string()
    };

    SignalResult::from_score(SignalType::Company, score, detail)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_full_profile_scores_high() {
        let raw = json!({
            "name": "Acme Corp",
            "domain": "acme.com",
            "employees_count": 250,
            "industry": "Manufacturing",
            "year_founded": 1987,
            "linkedin_url": "https://linkedin.com/company/acme",
        });
        let result = score(&raw);
        // 30 + 40 + 10 + 10 + 5 + 10 → 105 → clamped
        assert_eq!(result.score, 100);
        assert_eq!(result.detail, "Verified company profile");
    }

    #[test]
    fn test_no_record_reads_unverified() {
        let result = score(&json!({}));
        assert_eq!(result.score, 30);
        assert_eq!(result.detail, "No company record found for this domain");
    }

    #[test]
    fn test_name_only_is_partial() {
        let raw = json!({"name": "Acme Corp"});
        let result = score(&raw);
        // 30 + 40
        assert_eq!(result.score, 70);
        assert_eq!(result.detail, "Verified company profile");
    }

    #[test]
    fn test_empty_name_does_not_count_as_record() {
        let raw = json!({"name": "", "industry": "Retail"});
        let result = score(&raw);
        assert_eq!(result.score, 40);
        assert_eq!(result.detail, "No company record found for this domain");
    }
}
