//! Observability collaborator for the record service.
//!
//! The service never logs through process-wide state of its own. Callers
//! inject a [`RecordObserver`]; the default [`TracingObserver`] forwards to
//! `tracing`, and tests substitute a recorder.

use tracing::{debug, warn};

use crate::error::RecordError;

/// Receives notable record events.
///
/// Only the two warning conditions are required. Success hooks default to
/// doing nothing.
pub trait RecordObserver: Send + Sync {
    /// An entity was written and indexed.
    fn entity_created(&self, _schema: &str, _id: &str) {}

    /// One field of an entity was rewritten.
    fn entity_updated(&self, _schema: &str, _id: &str, _field: &str) {}

    /// An indexed member could not be read and was left out of an aggregate.
    fn member_skipped(&self, schema: &str, id: &str, error: &RecordError);

    /// An entity was written but its identifier never reached the index.
    fn entity_orphaned(&self, schema: &str, id: &str, error: &RecordError);
}

/// Forwards events to `tracing`.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingObserver;

impl RecordObserver for TracingObserver {
    fn entity_created(&self, schema: &str, id: &str) {
        debug!(schema, id, "entity created");
    }

    fn entity_updated(&self, schema: &str, id: &str, field: &str) {
        debug!(schema, id, field, "entity updated");
    }

    fn member_skipped(&self, schema: &str, id: &str, error: &RecordError) {
        warn!(schema, id, error = %error, "skipping unreadable index member");
    }

    fn entity_orphaned(&self, schema: &str, id: &str, error: &RecordError) {
        warn!(
            schema,
            id,
            error = %error,
            "entity written but not indexed; record is orphaned"
        );
    }
}

/// Discards every event.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopObserver;

impl RecordObserver for NoopObserver {
    fn member_skipped(&self, _schema: &str, _id: &str, _error: &RecordError) {}

    fn entity_orphaned(&self, _schema: &str, _id: &str, _error: &RecordError) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use consign_kv::StoreError;

    #[test]
    fn builtin_observers_accept_all_events() {
        let err = RecordError::Storage(StoreError::Backend("down".into()));
        for observer in [&TracingObserver as &dyn RecordObserver, &NoopObserver] {
            observer.entity_created("user", "alice");
            observer.entity_updated("user", "alice", "travelDate");
            observer.member_skipped("user", "bob", &err);
            observer.entity_orphaned("user", "carol", &err);
        }
    }
}
