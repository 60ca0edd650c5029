use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct YoutubeVideo {
    pub video_id: String,
    pub title: String,
    /// ISO 8601 duration such as `PT14M3S`.
    pub duration: Option<String>,
}

impl YoutubeVideo {
    pub fn watch_url(&self) -> String {
        format!("https://www.youtube.com/watch?v={}", self.video_id)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VideoStatus {
    #[default]
    Loading,
    Loaded,
    Failed,
    NoApiKey,
}
