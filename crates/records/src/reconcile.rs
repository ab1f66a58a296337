//! Partial-update reconciliation
//!
//! An update request names an id and a sparse set of fields. The current
//! record is fetched, the requested fields are overlaid on it, and the full
//! merged record is written back. Fields the caller left out keep their
//! stored values.

use crate::record::{Record, RecordId, ID_FIELD};
use crate::Result;
use async_trait::async_trait;
use serde::Serialize;
use tracing::{debug, info, warn};

/// Read side of an entity store
#[async_trait]
pub trait FetchById: Send + Sync {
    /// `Ok(None)` when no record has this id
    async fn fetch_by_id(&self, id: RecordId) -> Result<Option<Record>>;
}

/// Write side of an entity store
#[async_trait]
pub trait ApplyUpdate: Send + Sync {
    /// Write a complete record and return what the store now holds, or
    /// `Ok(None)` when the write succeeded but its result is unknown
    async fn apply_update(&self, record: &Record) -> Result<Option<Record>>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OutcomeKind {
    NotFound,
    NoChanges,
    Updated,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateOutcome {
    pub outcome: OutcomeKind,
    pub original: Option<Record>,
    pub merged: Option<Record>,
    pub changed_fields: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

impl UpdateOutcome {
    fn not_found(error_message: Option<String>) -> Self {
        Self {
            outcome: OutcomeKind::NotFound,
            original: None,
            merged: None,
            changed_fields: Vec::new(),
            error_message,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self.outcome, OutcomeKind::NoChanges | OutcomeKind::Updated)
    }
}

/// Fetch, overlay `proposed` and write back.
///
/// Every key in `proposed` other than the id counts as changed, even when
/// its value equals the stored one. The id in the merged record always comes
/// from the fetched record. Failures of either capability come back as
/// `NotFound` / `Failed` outcomes; this function never errors.
pub async fn reconcile_and_apply<F, A>(
    id: RecordId,
    proposed: &Record,
    fetch: &F,
    apply: &A,
) -> UpdateOutcome
where
    F: FetchById + ?Sized,
    A: ApplyUpdate + ?Sized,
{
    let current = match fetch.fetch_by_id(id).await {
        Ok(Some(record)) => record,
        Ok(None) => {
            debug!("record {} not found", id);
            return UpdateOutcome::not_found(None);
        }
        Err(e) => {
            warn!("fetching record {} failed: {}", id, e);
            return UpdateOutcome::not_found(Some(e.to_string()));
        }
    };

    let changed_fields: Vec<String> = proposed
        .keys()
        .filter(|key| key.as_str() != ID_FIELD)
        .cloned()
        .collect();

    if changed_fields.is_empty() {
        debug!("record {}: nothing to update", id);
        return UpdateOutcome {
            outcome: OutcomeKind::NoChanges,
            original: Some(current.clone()),
            merged: Some(current),
            changed_fields,
            error_message: None,
        };
    }

    let mut merged = current.clone();
    for key in &changed_fields {
        if let Some(value) = proposed.get(key) {
            merged.insert(key.clone(), value.clone());
        }
    }

    debug!("record {}: writing fields {:?}", id, changed_fields);
    match apply.apply_update(&merged).await {
        Ok(confirmed) => {
            info!("record {} updated ({} fields)", id, changed_fields.len());
            let merged = match confirmed {
                Some(record) => record,
                None => {
                    warn!("record {}: store did not confirm the write", id);
                    current.clone()
                }
            };
            UpdateOutcome {
                outcome: OutcomeKind::Updated,
                original: Some(current),
                merged: Some(merged),
                changed_fields,
                error_message: None,
            }
        }
        Err(e) => {
            warn!("updating record {} failed: {}", id, e);
            UpdateOutcome {
                outcome: OutcomeKind::Failed,
                original: Some(current),
                merged: None,
                changed_fields,
                error_message: Some(e.to_string()),
            }
        }
    }
}
