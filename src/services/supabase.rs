use std::time::Duration;

use reqwest::{Client, RequestBuilder, Response};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};
use crate::models::{AppSetting, ProgressRecord, ReadingPlanEntry};

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AuthUser {
    pub id: String,
    pub email: Option<String>,
}

#[derive(Debug, Serialize)]
struct NewProgressRow<'a> {
    user_id: &'a str,
    plan_id: i64,
    is_completed: bool,
}

/// Thin PostgREST/GoTrue client for the three collections the tracker uses.
pub struct SupabaseClient {
    client: Client,
    base_url: String,
    anon_key: String,
    access_token: Option<String>,
}

impl SupabaseClient {
    pub fn new(base_url: String, anon_key: String, access_token: Option<String>) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .connect_timeout(Duration::from_secs(10))
            .user_agent("bible365/1.0")
            .build()
            .expect("Failed to create HTTP client");
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            anon_key,
            access_token,
        }
    }

    fn authorized(&self, builder: RequestBuilder) -> RequestBuilder {
        let token = self.access_token.as_deref().unwrap_or(&self.anon_key);
        builder.header("apikey", &self.anon_key).bearer_auth(token)
    }

    fn rest_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.base_url, table)
    }

    async fn check(response: Response, context: &str) -> Result<Response> {
        if response.status().is_success() {
            return Ok(response);
        }
        let status = response.status();
        let error_text = response.text().await?;
        Err(AppError::SupabaseApi(format!(
            "{context}: HTTP {status}: {error_text}"
        )))
    }

    /// Current session user. `None` without a token or when the token is rejected.
    pub async fn get_user(&self) -> Result<Option<AuthUser>> {
        if self.access_token.is_none() {
            return Ok(None);
        }

        let response = self
            .authorized(self.client.get(format!("{}/auth/v1/user", self.base_url)))
            .send()
            .await?;

        if response.status() == reqwest::StatusCode::UNAUTHORIZED {
            tracing::info!("Access token rejected, continuing as guest");
            return Ok(None);
        }

        let response = Self::check(response, "auth user").await?;
        Ok(Some(response.json().await?))
    }

    pub async fn fetch_settings(&self) -> Result<Vec<AppSetting>> {
        let response = self
            .authorized(self.client.get(self.rest_url("app_settings")))
            .query(&[("select", "key,value")])
            .send()
            .await?;
        let response = Self::check(response, "app_settings").await?;
        Ok(response.json().await?)
    }

    pub async fn fetch_plans(&self) -> Result<Vec<ReadingPlanEntry>> {
        let response = self
            .authorized(self.client.get(self.rest_url("reading_plan")))
            .query(&[("select", "*"), ("order", "id.asc")])
            .send()
            .await?;
        let response = Self::check(response, "reading_plan").await?;
        Ok(response.json().await?)
    }

    pub async fn fetch_progress(&self, user_id: &str) -> Result<Vec<ProgressRecord>> {
        let user_filter = format!("eq.{user_id}");
        let response = self
            .authorized(self.client.get(self.rest_url("user_progress")))
            .query(&[
                ("select", "plan_id,user_id,completed_at,reading_plan(*)"),
                ("user_id", user_filter.as_str()),
            ])
            .send()
            .await?;
        let response = Self::check(response, "user_progress").await?;
        Ok(response.json().await?)
    }

    pub async fn insert_progress(&self, user_id: &str, plan_id: i64) -> Result<()> {
        let row = NewProgressRow {
            user_id,
            plan_id,
            is_completed: true,
        };
        let response = self
            .authorized(self.client.post(self.rest_url("user_progress")))
            .header("Prefer", "return=minimal")
            .json(&row)
            .send()
            .await?;
        Self::check(response, "insert user_progress").await?;
        Ok(())
    }

    pub async fn delete_progress(&self, user_id: &str, plan_id: i64) -> Result<()> {
        let user_filter = format!("eq.{user_id}");
        let plan_filter = format!("eq.{plan_id}");
        let response = self
            .authorized(self.client.delete(self.rest_url("user_progress")))
            .query(&[
                ("user_id", user_filter.as_str()),
                ("plan_id", plan_filter.as_str()),
            ])
            .send()
            .await?;
        Self::check(response, "delete user_progress").await?;
        Ok(())
    }
}
