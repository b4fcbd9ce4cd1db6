use serde::{Deserialize, Serialize};

pub const NEUTRAL_SCORE: u8 = 50;
pub const NEUTRAL_DETAIL: &str = "Validation service unavailable — scored as neutral";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SignalType {
    Email,
    Phone,
    Ip,
    Company,
}

impl SignalType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SignalType::Email => "email",
            SignalType::Phone => "phone",
            SignalType::Ip => "ip",
            SignalType::Company => "company",
        }
    }

    /// Canonical ordering used for scheduling and for the signals array in
    /// validation records.
    pub const ALL: [SignalType; 4] = [
        SignalType::Email,
        SignalType::Phone,
        SignalType::Ip,
        SignalType::Company,
    ];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SignalStatus {
    Pass,
    Warn,
    Fail,
}

impl SignalStatus {
    pub fn from_score(score: u8) -> Self {
        match score {
            70..=100 => SignalStatus::Pass,
            40..=69 => SignalStatus::Warn,
            _ => SignalStatus::Fail,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SignalStatus::Pass => "Valid",
            SignalStatus::Warn => "Risky",
            SignalStatus::Fail => "Invalid",
        }
    }
}

/// One scored dimension of lead quality.
///
/// `status` and `label` are always derived from `score`; the only exception
/// is the neutral fallback, which carries the canonical "Unknown" label.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignalResult {
    #[serde(rename = "type")]
    pub signal_type: SignalType,
    pub score: u8,
    pub status: SignalStatus,
    pub label: String,
    pub detail: String,
}

impl SignalResult {
    pub fn from_score(signal_type: SignalType, score: u8, detail: String) -> Self {
        let score = score.min(100);
        let status = SignalStatus::from_score(score);
        Self {
            signal_type,
            score,
            status,
            label: status.label().to_string(),
            detail,
        }
    }

    /// Fallback used when a provider call times out, fails, or returns an
    /// unreadable body. Never fails the pipeline.
    pub fn neutral(signal_type: SignalType) -> Self {
        Self {
            signal_type,
            score: NEUTRAL_SCORE,
            status: SignalStatus::Warn,
            label: "Unknown".to_string(),
            detail: NEUTRAL_DETAIL.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_from_score_boundaries() {
        assert_eq!(SignalStatus::from_score(100), SignalStatus::Pass);
        assert_eq!(SignalStatus::from_score(70), SignalStatus::Pass);
        assert_eq!(SignalStatus::from_score(69), SignalStatus::Warn);
        assert_eq!(SignalStatus::from_score(40), SignalStatus::Warn);
        assert_eq!(SignalStatus::from_score(39), SignalStatus::Fail);
        assert_eq!(SignalStatus::from_score(0), SignalStatus::Fail);
    }

    #[test]
    fn test_label_follows_status() {
        let result = SignalResult::from_score(SignalType::Email, 85, "ok".into());
        assert_eq!(result.status, SignalStatus::Pass);
        assert_eq!(result.label, "Valid");
    }

    #[test]
    fn test_score_clamped_to_100() {
        let result = SignalResult::from_score(SignalType::Ip, 150, "ok".into());
        assert_eq!(result.score, 100);
    }

    #[test]
    fn test_neutral_signal_shape() {
        let neutral = SignalResult::neutral(SignalType::Phone);
        assert_eq!(neutral.score, 50);
        assert_eq!(neutral.status, SignalStatus::Warn);
        assert_eq!(neutral.label, "Unknown");
        assert_eq!(neutral.detail, NEUTRAL_DETAIL);
    }
}
