//! Ruleset store: the collection store plus refresh

use chrono::{DateTime, Utc};
use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};

use crate::bridge::FileBridge;
use crate::error::{StoreError, StoreResult};
use crate::materialize::materialize;
use crate::ruleset::RuleSet;
use crate::store::{CollectionStore, StoreOptions};

/// Result of refreshing one ruleset during a sweep
#[derive(Debug, Clone, PartialEq)]
pub struct RefreshOutcome {
    pub id: String,
    pub tag: String,
    pub result: StoreResult<String>,
}

impl RefreshOutcome {
    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}

fn success_message(tag: &str) -> String {
    format!("Ruleset [{}] updated successfully.", tag)
}

/// Timestamp set by a sweep, kept so a failed final write can undo it
struct Stamp {
    id: String,
    previous: Option<DateTime<Utc>>,
    applied: DateTime<Utc>,
}

pub struct RulesetStore {
    inner: CollectionStore<RuleSet>,
}

impl RulesetStore {
    pub fn new(bridge: Arc<dyn FileBridge>, options: StoreOptions) -> Self {
        Self {
            inner: CollectionStore::new(bridge, options),
        }
    }

    pub fn snapshot_path(&self) -> &Path {
        self.inner.snapshot_path()
    }

    pub async fn load(&self) -> usize {
        self.inner.load().await
    }

    pub async fn save(&self) -> StoreResult<()> {
        self.inner.save().await
    }

    pub async fn flush(&self) -> StoreResult<()> {
        self.inner.flush().await
    }

    pub async fn add(&self, ruleset: RuleSet) -> StoreResult<()> {
        self.inner.add(ruleset).await
    }

    pub async fn delete(&self, id: &str) -> StoreResult<bool> {
        self.inner.delete(id).await
    }

    pub async fn edit(&self, id: &str, replacement: RuleSet) -> StoreResult<bool> {
        self.inner.edit(id, replacement).await
    }

    pub async fn get_by_id(&self, id: &str) -> Option<RuleSet> {
        self.inner.get_by_id(id).await
    }

    pub async fn list(&self) -> Vec<RuleSet> {
        self.inner.list().await
    }

    pub async fn len(&self) -> usize {
        self.inner.len().await
    }

    pub async fn is_empty(&self) -> bool {
        self.inner.is_empty().await
    }

    /// Mark the ruleset as refreshing and return a copy to materialize.
    ///
    /// `Ok(None)` means the ruleset is disabled and `skip_disabled` is set.
    async fn begin_refresh(&self, id: &str, skip_disabled: bool) -> StoreResult<Option<RuleSet>> {
        let mut items = self.inner.lock().await;
        let rs = items
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or_else(|| StoreError::NotFound { id: id.to_string() })?;

        if rs.disabled {
            if skip_disabled {
                return Ok(None);
            }
            return Err(StoreError::Disabled { tag: rs.tag.clone() });
        }
        if rs.refreshing {
            return Err(StoreError::RefreshInProgress {
                id: rs.id.clone(),
                tag: rs.tag.clone(),
            });
        }

        rs.refreshing = true;
        Ok(Some(rs.clone()))
    }

    /// Materialize one ruleset and record the refresh time
    pub async fn refresh_one(&self, id: &str) -> StoreResult<String> {
        let Some(target) = self.begin_refresh(id, false).await? else {
            return Err(StoreError::NotFound { id: id.to_string() });
        };
        info!(id = %id, tag = %target.tag, source = %target.source, "Refreshing ruleset");

        let materialized = materialize(self.inner.bridge().as_ref(), &target).await;

        let mut items = self.inner.lock().await;
        let Some(pos) = items.iter().position(|r| r.id == id) else {
            warn!(id = %id, "Ruleset removed while refreshing");
            return Err(StoreError::NotFound { id: id.to_string() });
        };
        items[pos].refreshing = false;

        if let Err(e) = materialized {
            warn!(id = %id, tag = %target.tag, error = %e, "Ruleset refresh failed");
            return Err(e);
        }

        let previous = items[pos].last_updated.replace(Utc::now());
        if let Err(e) = self.inner.persist(&items).await {
            items[pos].last_updated = previous;
            warn!(id = %id, error = %e, "Refresh rolled back");
            return Err(e);
        }

        let message = success_message(&items[pos].tag);
        info!(id = %id, "{}", message);
        Ok(message)
    }

    /// Refresh every enabled ruleset in order, persisting once at the end.
    ///
    /// Failures of individual rulesets are reported in the outcomes and do not
    /// stop the sweep. Only a failure of the final write is returned as an
    /// error, after every timestamp set by the sweep has been restored.
    pub async fn refresh_all(&self) -> StoreResult<Vec<RefreshOutcome>> {
        let ids: Vec<String> = self
            .inner
            .lock()
            .await
            .iter()
            .filter(|r| !r.disabled)
            .map(|r| r.id.clone())
            .collect();
        info!(count = ids.len(), "Refreshing all rulesets");

        let mut outcomes = Vec::with_capacity(ids.len());
        let mut stamps = Vec::new();

        for id in ids {
            let target = match self.begin_refresh(&id, true).await {
                Ok(Some(target)) => target,
                // disabled or removed since the sweep started
                Ok(None) | Err(StoreError::NotFound { .. }) => continue,
                Err(e) => {
                    let tag = self.get_by_id(&id).await.map(|r| r.tag).unwrap_or_default();
                    outcomes.push(RefreshOutcome { id, tag, result: Err(e) });
                    continue;
                }
            };

            let materialized = materialize(self.inner.bridge().as_ref(), &target).await;

            let mut items = self.inner.lock().await;
            let Some(rs) = items.iter_mut().find(|r| r.id == id) else {
                outcomes.push(RefreshOutcome {
                    id: id.clone(),
                    tag: target.tag,
                    result: Err(StoreError::NotFound { id }),
                });
                continue;
            };
            rs.refreshing = false;

            let result = match materialized {
                Ok(()) => {
                    let applied = Utc::now();
                    stamps.push(Stamp {
                        id: id.clone(),
                        previous: rs.last_updated.replace(applied),
                        applied,
                    });
                    Ok(success_message(&rs.tag))
                }
                Err(e) => {
                    warn!(id = %id, tag = %rs.tag, error = %e, "Ruleset refresh failed");
                    Err(e)
                }
            };
            outcomes.push(RefreshOutcome {
                id,
                tag: rs.tag.clone(),
                result,
            });
        }

        if stamps.is_empty() {
            return Ok(outcomes);
        }

        let mut items = self.inner.lock().await;
        if let Err(e) = self.inner.persist(&items).await {
            for stamp in &stamps {
                if let Some(rs) = items.iter_mut().find(|r| r.id == stamp.id) {
                    if rs.last_updated == Some(stamp.applied) {
                        rs.last_updated = stamp.previous;
                    }
                }
            }
            warn!(error = %e, refreshed = stamps.len(), "Refresh sweep rolled back");
            return Err(e);
        }

        info!(
            refreshed = stamps.len(),
            failed = outcomes.iter().filter(|o| !o.is_ok()).count(),
            "Refresh sweep finished"
        );
        Ok(outcomes)
    }
}
