//! Completion persistence.
//!
//! One [`ProgressBackend`] is chosen per session: [`RemoteBackend`] for an
//! authenticated user, [`GuestBackend`] for anonymous use. [`ProgressStore`]
//! keeps the in-memory record list and applies every toggle as
//! apply-locally, attempt-write, revert-on-failure.

mod guest;
mod remote;

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::Result;
use crate::models::{AggregateStats, ProgressRecord, ReadingPlanEntry, ToggleOutcome};
use crate::stats::aggregate;

pub use guest::{GuestBackend, GUEST_PROGRESS_KEY};
pub use remote::RemoteBackend;

#[async_trait]
pub trait ProgressBackend: Send + Sync {
    /// Identity the records belong to; `None` in guest mode.
    fn user_id(&self) -> Option<&str>;

    /// Whether a failed write should undo the optimistic update.
    fn rolls_back_on_failure(&self) -> bool;

    async fn load(&self, plans: &[ReadingPlanEntry]) -> Result<Vec<ProgressRecord>>;

    /// Persist a completion. `completed` is the full id set after the change.
    async fn save(&self, plan_id: i64, completed: &[i64]) -> Result<()>;

    /// Persist a removal. `completed` is the full id set after the change.
    async fn remove(&self, plan_id: i64, completed: &[i64]) -> Result<()>;
}

pub struct ProgressStore {
    backend: Box<dyn ProgressBackend>,
    plans: Arc<Vec<ReadingPlanEntry>>,
    records: Vec<ProgressRecord>,
}

impl ProgressStore {
    /// Load existing progress. A failed load leaves the store empty.
    pub async fn open(backend: Box<dyn ProgressBackend>, plans: Arc<Vec<ReadingPlanEntry>>) -> Self {
        let records = match backend.load(&plans).await {
            Ok(records) => records,
            Err(e) => {
                tracing::warn!("Failed to load progress, starting empty: {}", e);
                Vec::new()
            }
        };

        Self {
            backend,
            plans,
            records,
        }
    }

    pub fn is_guest(&self) -> bool {
        self.backend.user_id().is_none()
    }

    #[cfg(test)]
    pub fn records(&self) -> &[ProgressRecord] {
        &self.records
    }

    pub fn stats(&self) -> AggregateStats {
        aggregate(&self.records)
    }

    pub fn is_completed(&self, plan_id: i64) -> bool {
        self.records.iter().any(|r| r.plan_id == plan_id)
    }

    fn completed_ids(&self) -> Vec<i64> {
        self.records.iter().map(|r| r.plan_id).collect()
    }

    fn apply_locally(&mut self, plan_id: i64, currently_completed: bool) {
        if currently_completed {
            self.records.retain(|r| r.plan_id != plan_id);
            return;
        }

        if self.is_completed(plan_id) {
            return;
        }
        let plan = self.plans.iter().find(|p| p.id == plan_id).cloned();
        let record = match self.backend.user_id() {
            Some(user_id) => ProgressRecord::for_user(user_id, plan_id, plan),
            None => ProgressRecord {
                user_id: None,
                plan_id,
                completed_at: None,
                plan,
            },
        };
        self.records.push(record);
    }

    /// Flip the completion state of `plan_id`.
    pub async fn toggle(&mut self, plan_id: i64, currently_completed: bool) -> ToggleOutcome {
        let snapshot = self.records.clone();

        self.apply_locally(plan_id, currently_completed);

        let completed = self.completed_ids();
        let write = if currently_completed {
            self.backend.remove(plan_id, &completed).await
        } else {
            self.backend.save(plan_id, &completed).await
        };

        match write {
            Ok(()) => ToggleOutcome::Applied {
                completed: !currently_completed,
            },
            Err(e) if self.backend.rolls_back_on_failure() => {
                tracing::warn!("Progress write for plan {} failed, rolling back: {}", plan_id, e);
                self.records = snapshot;
                ToggleOutcome::RolledBack
            }
            Err(e) => {
                tracing::warn!("Progress write for plan {} failed: {}", plan_id, e);
                ToggleOutcome::Applied {
                    completed: !currently_completed,
                }
            }
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Mutex;

    use super::*;
    use crate::error::AppError;

    pub(crate) fn plan(id: i64, date: &str, verses: &[&str]) -> ReadingPlanEntry {
        ReadingPlanEntry {
            id,
            date: date.to_string(),
            day_of_year: id as u32,
            title: verses.join(", "),
            verses: verses.iter().map(|v| v.to_string()).collect(),
            category: None,
            summary: None,
            reading_time: None,
        }
    }

    #[derive(Default)]
    struct ScriptedBackend {
        fail_writes: AtomicBool,
        // behaves like on-device storage: no user, no rollback
        local_only: bool,
        writes: Mutex<Vec<(&'static str, i64)>>,
        initial: Vec<ProgressRecord>,
    }

    #[async_trait]
    impl ProgressBackend for Arc<ScriptedBackend> {
        fn user_id(&self) -> Option<&str> {
            (!self.local_only).then_some("user-1")
        }

        fn rolls_back_on_failure(&self) -> bool {
            !self.local_only
        }

        async fn load(&self, _plans: &[ReadingPlanEntry]) -> Result<Vec<ProgressRecord>> {
            Ok(self.initial.clone())
        }

        async fn save(&self, plan_id: i64, _completed: &[i64]) -> Result<()> {
            self.writes.lock().unwrap().push(("save", plan_id));
            if self.fail_writes.load(Ordering::SeqCst) {
                return Err(AppError::SupabaseApi("insert failed".into()));
            }
            Ok(())
        }

        async fn remove(&self, plan_id: i64, _completed: &[i64]) -> Result<()> {
            self.writes.lock().unwrap().push(("remove", plan_id));
            if self.fail_writes.load(Ordering::SeqCst) {
                return Err(AppError::SupabaseApi("delete failed".into()));
            }
            Ok(())
        }
    }

    fn plans() -> Arc<Vec<ReadingPlanEntry>> {
        Arc::new(vec![
            plan(41, "2025-02-10", &["출애굽기 1장"]),
            plan(42, "2025-02-11", &["창세기 1장"]),
        ])
    }

    async fn store_with(backend: Arc<ScriptedBackend>) -> ProgressStore {
        ProgressStore::open(Box::new(backend), plans()).await
    }

    #[tokio::test]
    async fn authenticated_toggle_round_trips() {
        let backend = Arc::new(ScriptedBackend::default());
        let mut store = store_with(backend.clone()).await;

        let outcome = store.toggle(42, false).await;
        assert_eq!(outcome, ToggleOutcome::Applied { completed: true });
        assert!(store.is_completed(42));
        assert_eq!(store.records()[0].user_id.as_deref(), Some("user-1"));

        let outcome = store.toggle(42, true).await;
        assert_eq!(outcome, ToggleOutcome::Applied { completed: false });
        assert!(store.records().is_empty());

        assert_eq!(*backend.writes.lock().unwrap(), vec![("save", 42), ("remove", 42)]);
    }

    #[tokio::test]
    async fn completed_plan_shows_in_stats() {
        let backend = Arc::new(ScriptedBackend::default());
        let mut store = store_with(backend).await;
        store.toggle(42, false).await;

        let stats = store.stats();
        assert_eq!(stats.completed_ids, vec![42]);
        assert_eq!(stats.completed_verses, vec!["창세기 1장"]);
    }

    #[tokio::test]
    async fn failed_delete_restores_the_record() {
        let backend = Arc::new(ScriptedBackend {
            initial: vec![ProgressRecord::for_user("user-1", 42, Some(plan(42, "2025-02-11", &["창세기 1장"])))],
            ..Default::default()
        });
        backend.fail_writes.store(true, Ordering::SeqCst);
        let mut store = store_with(backend.clone()).await;

        let before = store.records().to_vec();
        let outcome = store.toggle(42, true).await;

        assert_eq!(outcome, ToggleOutcome::RolledBack);
        assert!(store.is_completed(42));
        assert_eq!(store.records(), before.as_slice());
    }

    #[tokio::test]
    async fn failed_insert_drops_the_optimistic_record() {
        let backend = Arc::new(ScriptedBackend::default());
        backend.fail_writes.store(true, Ordering::SeqCst);
        let mut store = store_with(backend).await;

        assert_eq!(store.toggle(41, false).await, ToggleOutcome::RolledBack);
        assert!(!store.is_completed(41));
    }

    #[tokio::test]
    async fn insert_never_duplicates_a_plan() {
        let backend = Arc::new(ScriptedBackend::default());
        let mut store = store_with(backend).await;

        store.toggle(41, false).await;
        store.toggle(41, false).await;
        assert_eq!(store.records().len(), 1);
    }

    #[tokio::test]
    async fn failed_local_write_keeps_the_change() {
        let backend = Arc::new(ScriptedBackend {
            local_only: true,
            ..Default::default()
        });
        backend.fail_writes.store(true, Ordering::SeqCst);
        let mut store = store_with(backend.clone()).await;
        assert!(store.is_guest());

        assert_eq!(store.toggle(42, false).await, ToggleOutcome::Applied { completed: true });
        assert!(store.is_completed(42));
        assert_eq!(store.stats().completed_ids, vec![42]);

        assert_eq!(store.toggle(42, true).await, ToggleOutcome::Applied { completed: false });
        assert!(!store.is_completed(42));
        assert_eq!(*backend.writes.lock().unwrap(), vec![("save", 42), ("remove", 42)]);
    }
}
