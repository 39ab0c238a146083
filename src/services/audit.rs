//! The single append-audit funnel.
//!
//! Every mutating operation reports here. A failed audit write must
//! never roll back the primary mutation (a physically opened drawer
//! cannot be un-opened), so failures are logged and reported back as
//! a degraded-but-successful outcome.

use serde::Serialize;
use tracing::error;

use crate::db::{AuditRecord, Store};

/// Origin marker for actions initiated from the local terminal UI.
pub const ORIGIN_TERMINAL: &str = "terminal";

/// Origin marker for actions the engine takes on its own (e.g. expiry).
pub const ORIGIN_SYSTEM: &str = "system";

pub struct AuditService {
    store: Store,
}

impl AuditService {
    #[must_use]
    pub const fn new(store: Store) -> Self {
        Self { store }
    }

    /// Append one entry. Returns whether the write landed; the caller
    /// decides how to surface a miss, never whether to roll back.
    pub async fn record(&self, record: AuditRecord) -> bool {
        let action = record.action.clone();
        match self.store.append_audit(record).await {
            Ok(_) => true,
            Err(e) => {
                error!(action, error = %e, "Audit write failed; primary mutation kept");
                false
            }
        }
    }

    /// Convenience for entries with structured before/after snapshots.
    pub async fn record_change<B: Serialize, A: Serialize>(
        &self,
        user_id: Option<i32>,
        action: &str,
        table_name: &str,
        record_id: Option<String>,
        before: Option<&B>,
        after: Option<&A>,
        origin: &str,
    ) -> bool {
        let before_state = before.and_then(|b| serde_json::to_string(b).ok());
        let after_state = after.and_then(|a| serde_json::to_string(a).ok());

        self.record(AuditRecord {
            user_id,
            action: action.to_string(),
            table_name: table_name.to_string(),
            record_id,
            before_state,
            after_state,
            origin: origin.to_string(),
        })
        .await
    }

    /// Entries without snapshots (logins, timer toggles).
    pub async fn record_action(
        &self,
        user_id: Option<i32>,
        action: &str,
        table_name: &str,
        record_id: Option<String>,
        origin: &str,
    ) -> bool {
        self.record(AuditRecord {
            user_id,
            action: action.to_string(),
            table_name: table_name.to_string(),
            record_id,
            before_state: None,
            after_state: None,
            origin: origin.to_string(),
        })
        .await
    }
}
