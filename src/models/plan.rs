use serde::{Deserialize, Deserializer, Serialize};

use super::YoutubeVideo;

fn null_as_empty<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<String>, D::Error> {
    Ok(Option::<Vec<String>>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReadingPlanEntry {
    pub id: i64,
    pub date: String,
    pub day_of_year: u32,
    pub title: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub verses: Vec<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub reading_time: Option<String>,
}

/// A plan entry ready for display: corrected verses plus derived fields.
#[derive(Debug, Clone, PartialEq)]
pub struct DerivedDailyPlan {
    pub entry: ReadingPlanEntry,
    pub category: String,
    pub summary: String,
    pub reading_time: String,
    pub video: Option<YoutubeVideo>,
}

impl DerivedDailyPlan {
    pub fn id(&self) -> i64 {
        self.entry.id
    }

    /// Title without its parenthesised detail, e.g. "창세기 1-3장 (천지창조)" -> "창세기 1-3장".
    pub fn headline(&self) -> &str {
        self.entry
            .title
            .split('(')
            .next()
            .unwrap_or_default()
            .trim()
    }

    pub fn keywords(&self) -> impl Iterator<Item = &str> {
        self.summary.split_whitespace()
    }
}
