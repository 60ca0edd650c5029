use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use super::ReadingPlanEntry;

/// Accepts RFC 3339 or offset-less timestamps (read as UTC); anything else is `None`.
fn lenient_timestamp<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<DateTime<Utc>>, D::Error> {
    let Some(raw) = Option::<String>::deserialize(deserializer)? else {
        return Ok(None);
    };
    if let Ok(ts) = DateTime::parse_from_rfc3339(&raw) {
        return Ok(Some(ts.with_timezone(&Utc)));
    }
    match NaiveDateTime::parse_from_str(&raw, "%Y-%m-%dT%H:%M:%S%.f") {
        Ok(naive) => Ok(Some(naive.and_utc())),
        Err(e) => {
            tracing::debug!("Unreadable completed_at {:?}: {}", raw, e);
            Ok(None)
        }
    }
}

/// One completed plan entry. Guest records carry neither user nor timestamp.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressRecord {
    #[serde(default)]
    pub user_id: Option<String>,
    pub plan_id: i64,
    #[serde(default, deserialize_with = "lenient_timestamp")]
    pub completed_at: Option<DateTime<Utc>>,
    #[serde(default, rename = "reading_plan")]
    pub plan: Option<ReadingPlanEntry>,
}

impl ProgressRecord {
    pub fn guest(plan: ReadingPlanEntry) -> Self {
        Self {
            user_id: None,
            plan_id: plan.id,
            completed_at: None,
            plan: Some(plan),
        }
    }

    pub fn for_user(user_id: &str, plan_id: i64, plan: Option<ReadingPlanEntry>) -> Self {
        Self {
            user_id: Some(user_id.to_string()),
            plan_id,
            completed_at: Some(Utc::now()),
            plan,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AggregateStats {
    pub streak: u32,
    pub completed_verses: Vec<String>,
    pub completed_ids: Vec<i64>,
    pub progress_percent: u32,
    pub days_left: u32,
}

impl AggregateStats {
    pub fn is_completed(&self, plan_id: i64) -> bool {
        self.completed_ids.contains(&plan_id)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleOutcome {
    Applied { completed: bool },
    RolledBack,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(completed_at: serde_json::Value) -> ProgressRecord {
        serde_json::from_value(serde_json::json!({
            "plan_id": 42, "user_id": "u-1", "completed_at": completed_at
        }))
        .unwrap()
    }

    #[test]
    fn timestamp_without_offset_is_read_as_utc() {
        let record = parse("2025-02-11T08:00:00.123456".into());
        let ts = record.completed_at.unwrap();
        assert_eq!(ts.to_rfc3339(), "2025-02-11T08:00:00.123456+00:00");
    }

    #[test]
    fn offset_timestamp_is_normalised() {
        let record = parse("2025-02-11T17:00:00+09:00".into());
        assert_eq!(
            record.completed_at.map(|t| t.to_rfc3339()),
            Some("2025-02-11T08:00:00+00:00".to_string())
        );
    }

    #[test]
    fn unreadable_or_missing_timestamp_keeps_the_row() {
        assert_eq!(parse("yesterday".into()).completed_at, None);
        assert_eq!(parse(serde_json::Value::Null).completed_at, None);

        let record: ProgressRecord = serde_json::from_str(r#"{"plan_id": 7}"#).unwrap();
        assert_eq!(record.plan_id, 7);
        assert!(record.completed_at.is_none());
    }
}
