pub mod signal;
pub mod validation;
pub mod lead;
pub mod integration;

pub use signal::{SignalResult, SignalStatus, SignalType};
pub use validation::{PlanTier, ScoringThresholds, ValidationOutcome, ValidationStatus};
pub use lead::{BouncerField, FieldMapping, LeadPayload, MappedLead};
pub use integration::{Integration, IntegrationStatus, Provider, PushOutcome};
