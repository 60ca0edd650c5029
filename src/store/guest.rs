use async_trait::async_trait;

use crate::db::LocalStorage;
use crate::error::Result;
use crate::models::{ProgressRecord, ReadingPlanEntry};

use super::ProgressBackend;

pub const GUEST_PROGRESS_KEY: &str = "guest_bible_progress";

/// Keeps a guest's completed plan ids on the device as a JSON array.
pub struct GuestBackend {
    storage: LocalStorage,
}

impl GuestBackend {
    pub fn new(storage: LocalStorage) -> Self {
        Self { storage }
    }

    async fn write_all(&self, completed: &[i64]) -> Result<()> {
        let json = serde_json::to_string(completed)?;
        self.storage.set_item(GUEST_PROGRESS_KEY, json).await
    }
}

#[async_trait]
impl ProgressBackend for GuestBackend {
    fn user_id(&self) -> Option<&str> {
        None
    }

    fn rolls_back_on_failure(&self) -> bool {
        false
    }

    async fn load(&self, plans: &[ReadingPlanEntry]) -> Result<Vec<ProgressRecord>> {
        let Some(saved) = self.storage.get_item(GUEST_PROGRESS_KEY).await? else {
            return Ok(Vec::new());
        };

        let ids: Vec<i64> = match serde_json::from_str(&saved) {
            Ok(ids) => ids,
            Err(e) => {
                tracing::warn!("Failed to load guest progress: {}", e);
                return Ok(Vec::new());
            }
        };

        let records = ids
            .into_iter()
            .filter_map(|id| plans.iter().find(|p| p.id == id).cloned())
            .map(ProgressRecord::guest)
            .collect();
        Ok(records)
    }

    async fn save(&self, _plan_id: i64, completed: &[i64]) -> Result<()> {
        self.write_all(completed).await
    }

    async fn remove(&self, _plan_id: i64, completed: &[i64]) -> Result<()> {
        self.write_all(completed).await
    }
}
