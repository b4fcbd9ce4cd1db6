pub mod hubspot;
pub mod pipedrive;
pub mod salesforce;
pub mod slack;
pub mod webhook;

use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;

use crate::errors::BouncerError;
use crate::models::{MappedLead, PushOutcome};

/// Outcome of a create attempt against an object-store CRM.
#[derive(Debug)]
pub enum CreateResult {
    Created(Option<String>),
    /// The provider reported that a matching record already exists.
    Conflict,
}

/// Object-store CRM surface: everything needed for create-or-update writes.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    fn provider_name(&self) -> &'static str;
    async fn create(&self, mapped: &MappedLead) -> Result<CreateResult, BouncerError>;
    async fn find_by_email(&self, email: &str) -> Result<Option<String>, BouncerError>;
    async fn update(&self, external_id: &str, mapped: &MappedLead) -> Result<(), BouncerError>;
}

/// The upsert contract every object-store adapter shares: attempt a create;
/// on conflict, look up the existing record by email and apply a partial
/// update instead of failing the push. Never errors upward.
pub async fn upsert(store: &dyn ObjectStore, mapped: &MappedLead, email: &str) -> PushOutcome {
    let provider = store.provider_name();
    match store.create(mapped).await {
        Ok(CreateResult::Created(id)) => PushOutcome::ok(id),
        Ok(CreateResult::Conflict) => {
            debug!(provider, "Create conflicted, falling back to lookup and update");
            match store.find_by_email(email).await {
                Ok(Some(id)) => match store.update(&id, mapped).await {
                    Ok(()) => PushOutcome::ok(Some(id)),
                    Err(e) => PushOutcome::fail(format!(
                        "{}: update after conflict failed: {}",
                        provider, e
                    )),
                },
                Ok(None) => PushOutcome::fail(format!(
                    "{}: create conflicted but no record found for {}",
                    provider, email
                )),
                Err(e) => PushOutcome::fail(format!("{}: lookup by email failed: {}", provider, e)),
            }
        }
        Err(e) => PushOutcome::fail(format!("{}: create failed: {}", provider, e)),
    }
}

/// Flatten a mapped lead into a JSON object, preserving nothing the mapper
/// did not emit.
pub(crate) fn mapped_to_json(mapped: &MappedLead) -> Value {
    let mut obj = serde_json::Map::new();
    for (key, value) in mapped {
        obj.insert(key.clone(), Value::String(value.clone()));
    }
    Value::Object(obj)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    struct StubStore {
        conflict: bool,
        found_id: Option<&'static str>,
        creates: AtomicU32,
        lookups: AtomicU32,
        updates: AtomicU32,
    }

    impl StubStore {
        fn new(conflict: bool, found_id: Option<&'static str>) -> Self {
            Self {
                conflict,
                found_id,
                creates: AtomicU32::new(0),
                lookups: AtomicU32::new(0),
                updates: AtomicU32::new(0),
            }
        }
    }

    #[async_trait]
    impl ObjectStore for StubStore {
        fn provider_name(&self) -> &'static str {
            "stub"
        }

        async fn create(&self, _mapped: &MappedLead) -> Result<CreateResult, BouncerError> {
            self.creates.fetch_add(1, Ordering::SeqCst);
            if self.conflict {
                Ok(CreateResult::Conflict)
            } else {
                Ok(CreateResult::Created(Some("new-id".to_string())))
            }
        }

        async fn find_by_email(&self, _email: &str) -> Result<Option<String>, BouncerError> {
            self.lookups.fetch_add(1, Ordering::SeqCst);
            Ok(self.found_id.map(String::from))
        }

        async fn update(&self, _external_id: &str, _mapped: &MappedLead) -> Result<(), BouncerError> {
            self.updates.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_plain_create_skips_lookup() {
        let store = StubStore::new(false, None);
        let outcome = upsert(&store, &Vec::new(), "a@b.com").await;
        assert!(outcome.success);
        assert_eq!(outcome.external_id.as_deref(), Some("new-id"));
        assert_eq!(store.lookups.load(Ordering::SeqCst), 0);
        assert_eq!(store.updates.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_conflict_triggers_one_lookup_one_update() {
        let store = StubStore::new(true, Some("existing-42"));
        let outcome = upsert(&store, &Vec::new(), "a@b.com").await;
        assert!(outcome.success);
        assert_eq!(outcome.external_id.as_deref(), Some("existing-42"));
        assert_eq!(store.creates.load(Ordering::SeqCst), 1);
        assert_eq!(store.lookups.load(Ordering::SeqCst), 1);
        assert_eq!(store.updates.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_conflict_with_empty_lookup_fails_without_update() {
        let store = StubStore::new(true, None);
        let outcome = upsert(&store, &Vec::new(), "a@b.com").await;
        assert!(!outcome.success);
        assert!(outcome.error.unwrap().contains("no record found"));
        assert_eq!(store.updates.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_mapped_to_json() {
        let mapped = vec![("email".to_string(), "a@b.com".to_string())];
        let json = mapped_to_json(&mapped);
        assert_eq!(json["email"], "a@b.com");
    }
}
