use serde_json::Value;

use crate::models::{SignalResult, SignalType};
use super::{bool_field, clamp_score};

// IP starts high: absence of negative evidence reads as "probably fine",
// unlike company where absence of positive evidence reads as unverified.
const BASELINE: i32 = 70;

/// Score an IP reputation document. Detail ordering: tor, then vpn/proxy,
/// then datacenter, then score band.
pub fn score(raw: &Value) -> SignalResult {
    let is_tor = security_flag(raw, "is_tor");
    let is_vpn = security_flag(raw, "is_vpn");
    let is_proxy = security_flag(raw, "is_proxy");
    let connection_type = raw["connection"]["connection_type"]
        .as_str()
        .or_else(|| raw["connection_type"].as_str())
        .map(str::to_ascii_lowercase);
    let datacenter = matches!(connection_type.as_deref(), Some("datacenter") | Some("hosting"));

    let mut score = BASELINE;
    if is_tor {
        score -= 40;
    }
    if is_vpn {
        score -= 30;
    }
    if is_proxy {
        score -= 30;
    }
    if datacenter {
        score -= 25;
    }
    if raw["threat_level"].as_str() == Some("high") {
        score -= 20;
    }
    if connection_type.as_deref() == Some("residential") {
        score += 10;
    }
    let score = clamp_score(score);

    let detail = if is_tor {
        "Tor exit node".to_string()
    } else if is_vpn || is_proxy {
        "VPN or proxy detected".to_string()
    } else if datacenter {
        "Datacenter IP — not a residential connection".to_string()
    } else if score >= 70 {
        "No network risk indicators".to_string()
    } else if score >= 40 {
        "Some network risk indicators".to_string()
    } else {
        "High-risk network origin".to_string()
    };

    SignalResult::from_score(SignalType::Ip, score, detail)
}

/// Security flags may live under a `security` object or at the top level.
fn security_flag(raw: &Value, key: &str) -> bool {
    if let Some(sec) = raw.get("security") {
        if let Some(v) = bool_field(sec, key) {
            return v;
        }
    }
    bool_field(raw, key) == Some(true)
}
