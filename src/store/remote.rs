use std::sync::Arc;

use async_trait::async_trait;

use crate::error::Result;
use crate::models::{ProgressRecord, ReadingPlanEntry};
use crate::services::{AuthUser, SupabaseClient};

use super::ProgressBackend;

/// Progress rows in the `user_progress` table, keyed by (user, plan).
pub struct RemoteBackend {
    client: Arc<SupabaseClient>,
    user: AuthUser,
}

impl RemoteBackend {
    pub fn new(client: Arc<SupabaseClient>, user: AuthUser) -> Self {
        Self { client, user }
    }
}

#[async_trait]
impl ProgressBackend for RemoteBackend {
    fn user_id(&self) -> Option<&str> {
        Some(self.user.id.as_str())
    }

    fn rolls_back_on_failure(&self) -> bool {
        true
    }

    async fn load(&self, plans: &[ReadingPlanEntry]) -> Result<Vec<ProgressRecord>> {
        let mut records = self.client.fetch_progress(&self.user.id).await?;
        for record in records.iter_mut().filter(|r| r.plan.is_none()) {
            record.plan = plans.iter().find(|p| p.id == record.plan_id).cloned();
        }
        Ok(records)
    }

    async fn save(&self, plan_id: i64, _completed: &[i64]) -> Result<()> {
        self.client.insert_progress(&self.user.id, plan_id).await
    }

    async fn remove(&self, plan_id: i64, _completed: &[i64]) -> Result<()> {
        self.client.delete_progress(&self.user.id, plan_id).await
    }
}
