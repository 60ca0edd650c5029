use serde::{Deserialize, Serialize};

const INTRO_VIDEO_KEY: &str = "intro_video_url";
const NEW_365_VIDEO_KEY: &str = "new_365_video_url";

const FALLBACK_INTRO_URL: &str = "https://youtu.be/Sp71zxZjZIk?si=PJX1eyh59eILNc9D";
const FALLBACK_NEW_365_URL: &str =
    "https://www.youtube.com/playlist?list=PLVcVykBcFZTR4Q6cvmybjPgCklZlv-Ghj";

pub const OT_OVERVIEW_URL: &str =
    "https://www.youtube.com/playlist?list=PLVcVykBcFZTRw1ZxIhIQ9uuAU6lU_PvDB";
pub const NT_OVERVIEW_URL: &str =
    "https://www.youtube.com/playlist?list=PLVcVykBcFZTSM0ueQRAzrlRw42mmaUL6U";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppSetting {
    pub key: String,
    pub value: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct AppSettings {
    entries: Vec<AppSetting>,
}

impl AppSettings {
    pub fn new(entries: Vec<AppSetting>) -> Self {
        Self { entries }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|s| s.key == key)
            .and_then(|s| s.value.as_deref())
            .filter(|v| !v.is_empty())
    }

    pub fn intro_video_url(&self) -> &str {
        self.get(INTRO_VIDEO_KEY).unwrap_or(FALLBACK_INTRO_URL)
    }

    pub fn new_365_video_url(&self) -> &str {
        self.get(NEW_365_VIDEO_KEY).unwrap_or(FALLBACK_NEW_365_URL)
    }

    pub fn ot_overview_url(&self) -> &str {
        OT_OVERVIEW_URL
    }

    pub fn nt_overview_url(&self) -> &str {
        NT_OVERVIEW_URL
    }
}
