use serde::{Deserialize, Serialize};

use crate::errors::BouncerError;
use super::signal::SignalResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ValidationStatus {
    Passed,
    Borderline,
    Rejected,
}

impl ValidationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ValidationStatus::Passed => "Passed",
            ValidationStatus::Borderline => "Borderline",
            ValidationStatus::Rejected => "Rejected",
        }
    }

    pub fn parse(s: &str) -> Result<Self, BouncerError> {
        match s {
            "Passed" => Ok(ValidationStatus::Passed),
            "Borderline" => Ok(ValidationStatus::Borderline),
            "Rejected" => Ok(ValidationStatus::Rejected),
            other => Err(BouncerError::Internal(format!(
                "Unknown validation status: {}",
                other
            ))),
        }
    }
}

/// Per-account classification thresholds. Invariant:
/// `0 < borderline_min < passed_min < 100`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ScoringThresholds {
    pub passed_min: u8,
    pub borderline_min: u8,
}

impl ScoringThresholds {
    pub fn validate(&self) -> Result<(), BouncerError> {
        if self.borderline_min == 0
            || self.borderline_min >= self.passed_min
            || self.passed_min >= 100
        {
            return Err(BouncerError::InvalidInput(format!(
                "Thresholds must satisfy 0 < borderline_min < passed_min < 100, got {} / {}",
                self.borderline_min, self.passed_min
            )));
        }
        Ok(())
    }
}

impl Default for ScoringThresholds {
    fn default() -> Self {
        Self {
            passed_min: 70,
            borderline_min: 40,
        }
    }
}

/// Subscription tier. Free tier is hard-gated to the email signal only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlanTier {
    Free,
    Starter,
    Pro,
    Agency,
}

impl PlanTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            PlanTier::Free => "free",
            PlanTier::Starter => "starter",
            PlanTier::Pro => "pro",
            PlanTier::Agency => "agency",
        }
    }

    pub fn parse(s: &str) -> Result<Self, BouncerError> {
        match s {
            "free" => Ok(PlanTier::Free),
            "starter" => Ok(PlanTier::Starter),
            "pro" => Ok(PlanTier::Pro),
            "agency" => Ok(PlanTier::Agency),
            other => Err(BouncerError::Config(format!("Unknown plan tier: {}", other))),
        }
    }

    /// Default monthly validation quota for new accounts on this tier.
    pub fn monthly_limit(&self) -> i64 {
        match self {
            PlanTier::Free => 100,
            PlanTier::Starter => 1_000,
            PlanTier::Pro => 10_000,
            PlanTier::Agency => 50_000,
        }
    }
}

/// Output of one validation engine run, before persistence.
#[derive(Debug, Clone, Serialize)]
pub struct ValidationOutcome {
    pub overall_score: u8,
    pub signals: Vec<SignalResult>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_threshold_invariant() {
        assert!(ScoringThresholds { passed_min: 70, borderline_min: 40 }.validate().is_ok());
        assert!(ScoringThresholds { passed_min: 70, borderline_min: 70 }.validate().is_err());
        assert!(ScoringThresholds { passed_min: 70, borderline_min: 80 }.validate().is_err());
        assert!(ScoringThresholds { passed_min: 100, borderline_min: 40 }.validate().is_err());
        assert!(ScoringThresholds { passed_min: 70, borderline_min: 0 }.validate().is_err());
    }

    #[test]
    fn test_plan_parse_round_trip() {
        for plan in [PlanTier::Free, PlanTier::Starter, PlanTier::Pro, PlanTier::Agency] {
            assert_eq!(PlanTier::parse(plan.as_str()).unwrap(), plan);
        }
        assert!(PlanTier::parse("enterprise").is_err());
    }

    #[test]
    fn test_status_parse_round_trip() {
        for status in [
            ValidationStatus::Passed,
            ValidationStatus::Borderline,
            ValidationStatus::Rejected,
        ] {
            assert_eq!(ValidationStatus::parse(status.as_str()).unwrap(), status);
        }
    }
}
