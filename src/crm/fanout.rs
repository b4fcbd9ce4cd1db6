use std::sync::Arc;

use futures::future::join_all;
use tracing::{debug, error, info, warn};

use crate::db::Database;
use crate::models::{LeadPayload, ValidationStatus};
use super::mapper::apply_field_mappings;
use super::LeadSink;

/// Distribute one validated lead to every connected integration of the
/// account. Fire-and-forget from the caller's perspective; internally all
/// attempts are awaited to settlement so every one gets a log row. One
/// provider's failure never affects another's delivery and nothing
/// propagates upward.
pub async fn push_lead_to_all_crms(
    db: Database,
    sink: Arc<dyn LeadSink>,
    account_id: String,
    lead: LeadPayload,
    block_rejected: bool,
) {
    if block_rejected && lead.status == ValidationStatus::Rejected {
        debug!(validation_id = %lead.validation_id, "Rejected lead blocked from distribution");
        return;
    }

    let integrations = match db.connected_integrations(&account_id) {
        Ok(integrations) => integrations,
        Err(e) => {
            warn!(error = %e, "Failed to load integrations for distribution");
            return;
        }
    };
    if integrations.is_empty() {
        return;
    }

    info!(
        validation_id = %lead.validation_id,
        integrations = integrations.len(),
        "Distributing lead to connected CRMs"
    );

    let handles: Vec<_> = integrations
        .into_iter()
        .map(|integration| {
            let db = db.clone();
            let sink = sink.clone();
            let lead = lead.clone();
            tokio::spawn(async move {
                let mapped = apply_field_mappings(&lead, &integration.field_mappings);
                let outcome = sink.deliver(&integration, &mapped, &lead).await;

                if outcome.success {
                    info!(
                        provider = integration.provider.as_str(),
                        validation_id = %lead.validation_id,
                        external_id = outcome.external_id.as_deref().unwrap_or("-"),
                        "CRM push succeeded"
                    );
                } else {
                    warn!(
                        provider = integration.provider.as_str(),
                        validation_id = %lead.validation_id,
                        error = outcome.error.as_deref().unwrap_or("unknown"),
                        "CRM push failed"
                    );
                }

                // Best-effort logging: a failed log write never masks the
                // push outcome or crashes the pipeline.
                if let Err(e) = db.insert_integration_log(
                    &integration.id,
                    &lead.validation_id,
                    outcome.success,
                    outcome.error.as_deref(),
                ) {
                    warn!(error = %e, "Failed to record integration log");
                }

                if outcome.success {
                    if let Err(e) = db.touch_last_synced(&integration.id) {
                        warn!(error = %e, "Failed to update last-synced timestamp");
                    }
                }
            })
        })
        .collect();

    for result in join_all(handles).await {
        if let Err(e) = result {
            error!(error = %e, "Distribution task panicked");
        }
    }
}
