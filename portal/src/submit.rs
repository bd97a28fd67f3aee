//! Dossier submission: create the dossier, then post every equipment draft.
//!
//! DESIGN
//! ======
//! Equipment posts run concurrently and are all awaited; each outcome is
//! recorded. When some fail, the accepted drafts leave the list, the failed
//! ones stay, and the created dossier id is kept so the next `submit` only
//! re-posts the failures instead of creating a second dossier.
//!
//! Every draft gets an idempotency key when first posted, bound to the
//! draft's stable id rather than its position. The key is reused on retry
//! even after other drafts were deleted, so a server that honours it can
//! drop duplicates.

#[cfg(test)]
#[path = "submit_test.rs"]
mod submit_test;

use std::collections::HashMap;

use futures::future::join_all;

use crate::api::{ApiError, PortalApi};
use crate::draft::{DraftStore, EquipmentDraft};
use crate::notify::Notifier;
use crate::validation::{ValidationReport, validate_dossier, validate_equipment};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SubmitError {
    #[error("the dossier form is incomplete")]
    InvalidDossier(ValidationReport),
    #[error("equipment {} is incomplete", .index + 1)]
    InvalidEquipment { index: usize, report: ValidationReport },
    #[error("could not create the dossier: {0}")]
    CreateDossier(ApiError),
    #[error("no partially submitted dossier to retry")]
    NothingToRetry,
}

/// An equipment post that did not go through.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FailedEquipment {
    /// Position in the draft list at the time of submission.
    pub index: usize,
    pub label: String,
    pub error: ApiError,
}

/// Aggregate result of one submission attempt.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SubmissionReport {
    pub dossier_id: String,
    pub attempted: usize,
    pub saved: Vec<usize>,
    pub failed: Vec<FailedEquipment>,
}

impl SubmissionReport {
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }

    /// One-line outcome for alerts and CLI output.
    #[must_use]
    pub fn summary(&self) -> String {
        if self.is_complete() {
            return format!("Dossier submitted with {} equipment entries.", self.saved.len());
        }
        let names = self.failed.iter().map(|f| f.label.as_str()).collect::<Vec<_>>().join(", ");
        format!(
            "{} of {} equipment entries saved; retry the failed {} ({names}).",
            self.saved.len(),
            self.attempted,
            self.failed.len()
        )
    }
}

/// Drives submissions for one dossier form and remembers a partially
/// submitted dossier between attempts.
#[derive(Clone, Debug, Default)]
pub struct Submitter {
    dossier_id: Option<String>,
    /// Idempotency keys by draft id.
    keys: HashMap<u64, String>,
}

impl Submitter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Dossier created by an earlier attempt whose equipment did not all save.
    #[must_use]
    pub fn pending_dossier_id(&self) -> Option<&str> {
        self.dossier_id.as_deref()
    }

    /// Forget a partially submitted dossier; the next submit creates a new one.
    pub fn abandon(&mut self) {
        self.dossier_id = None;
        self.keys.clear();
    }

    /// Validate, create the dossier (unless one is pending), then post every
    /// equipment draft and wait for all of them.
    ///
    /// # Errors
    ///
    /// Fails without touching the API when a form is incomplete, and without
    /// posting equipment when the dossier cannot be created. Equipment
    /// failures are not errors; they are listed in the report.
    pub async fn submit<A, N>(
        &mut self,
        api: &A,
        notifier: &N,
        store: &mut DraftStore,
    ) -> Result<SubmissionReport, SubmitError>
    where
        A: PortalApi + ?Sized,
        N: Notifier + ?Sized,
    {
        if let Err(err) = self.check(store) {
            match &err {
                SubmitError::InvalidDossier(report) => notifier.error(&report.alert_message()),
                SubmitError::InvalidEquipment { index, report } => {
                    notifier.error(&format!("Equipment {}:\n{}", index + 1, report.alert_message()));
                }
                SubmitError::CreateDossier(_) | SubmitError::NothingToRetry => {}
            }
            return Err(err);
        }

        let dossier_id = match self.dossier_id.clone() {
            Some(id) => id,
            None => match api.create_dossier(store.dossier()).await {
                Ok(created) => {
                    tracing::info!(dossier_id = %created.id, "dossier created");
                    self.dossier_id = Some(created.id.clone());
                    created.id
                }
                Err(err) => {
                    tracing::warn!(error = %err, "dossier creation failed");
                    notifier.error(&err.user_message());
                    return Err(SubmitError::CreateDossier(err));
                }
            },
        };

        let drafts: Vec<EquipmentDraft> = store.equipment().to_vec();
        let ids = store.equipment_ids().to_vec();
        let keys = self.keys_for(&ids);

        let posts = drafts.iter().zip(&keys).enumerate().map(|(index, (draft, key))| {
            let dossier_id = dossier_id.as_str();
            async move { (index, api.add_equipment(dossier_id, draft, key).await) }
        });
        let outcomes = join_all(posts).await;

        let mut saved = Vec::new();
        let mut failed = Vec::new();
        for (index, outcome) in outcomes {
            match outcome {
                Ok(ack) if ack.success => saved.push(index),
                Ok(ack) => failed.push(FailedEquipment {
                    index,
                    label: drafts[index].tab_label(index),
                    error: ApiError::Status {
                        status: 200,
                        message: ack.message.unwrap_or_else(|| "equipment rejected".to_owned()),
                    },
                }),
                Err(error) => {
                    failed.push(FailedEquipment { index, label: drafts[index].tab_label(index), error });
                }
            }
        }

        let report = SubmissionReport { dossier_id, attempted: drafts.len(), saved, failed };
        tracing::info!(
            dossier_id = %report.dossier_id,
            saved = report.saved.len(),
            failed = report.failed.len(),
            "equipment posts finished"
        );

        if report.is_complete() {
            store.reset_equipment();
            self.abandon();
            notifier.success(&report.summary());
        } else {
            for &index in &report.saved {
                self.keys.remove(&ids[index]);
            }
            store.retain_except(&report.saved);
            notifier.warning(&report.summary());
        }
        Ok(report)
    }

    /// Re-post the drafts left over from a partial submission against the
    /// dossier that was already created.
    ///
    /// # Errors
    ///
    /// [`SubmitError::NothingToRetry`] when no dossier is pending; otherwise
    /// as [`Self::submit`].
    pub async fn retry_failed<A, N>(
        &mut self,
        api: &A,
        notifier: &N,
        store: &mut DraftStore,
    ) -> Result<SubmissionReport, SubmitError>
    where
        A: PortalApi + ?Sized,
        N: Notifier + ?Sized,
    {
        if self.dossier_id.is_none() {
            return Err(SubmitError::NothingToRetry);
        }
        self.submit(api, notifier, store).await
    }

    fn check(&self, store: &DraftStore) -> Result<(), SubmitError> {
        if self.dossier_id.is_none() {
            let report = validate_dossier(store.dossier());
            if !report.is_valid() {
                return Err(SubmitError::InvalidDossier(report));
            }
        }
        for (index, draft) in store.equipment().iter().enumerate() {
            let report = validate_equipment(draft);
            if !report.is_valid() {
                return Err(SubmitError::InvalidEquipment { index, report });
            }
        }
        Ok(())
    }

    /// Keys for `ids` in order, minting one for each new draft. Keys of
    /// drafts no longer in the list are dropped.
    fn keys_for(&mut self, ids: &[u64]) -> Vec<String> {
        self.keys.retain(|id, _| ids.contains(id));
        ids.iter()
            .map(|id| self.keys.entry(*id).or_insert_with(|| uuid::Uuid::new_v4().to_string()).clone())
            .collect()
    }
}
