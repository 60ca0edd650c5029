mod plan;
mod progress;
mod settings;
mod video;

pub use plan::{DerivedDailyPlan, ReadingPlanEntry};
pub use progress::{AggregateStats, ProgressRecord, ToggleOutcome};
pub use settings::{AppSetting, AppSettings};
pub use video::{VideoStatus, YoutubeVideo};
