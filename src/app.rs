use std::future::Future;
use std::sync::Arc;

use chrono::{Duration, NaiveDate};
use tokio::sync::mpsc;

use crate::bible::{filtered_books, BibleBook, MapFilter};
use crate::config::Config;
use crate::db::LocalStorage;
use crate::error::Result;
use crate::models::{
    AggregateStats, AppSettings, DerivedDailyPlan, ReadingPlanEntry, ToggleOutcome, VideoStatus,
    YoutubeVideo,
};
use crate::plan::resolve;
use crate::services::youtube::{day_of_year, NO_VIDEO_DAY};
use crate::services::{AuthUser, SupabaseClient, YoutubeClient};
use crate::store::{GuestBackend, ProgressBackend, ProgressStore, RemoteBackend};
use crate::tui::AppAction;

// Message for a finished playlist fetch
pub struct VideoResult {
    pub result: std::result::Result<Vec<YoutubeVideo>, String>,
}

const SPINNER_FRAMES: [&str; 4] = ["|", "/", "-", "\\"];

pub struct App {
    // Data
    pub plans: Arc<Vec<ReadingPlanEntry>>,
    pub settings: AppSettings,
    pub videos: Vec<YoutubeVideo>,
    pub user: Option<AuthUser>,
    pub stats: AggregateStats,
    pub current_plan: Option<DerivedDailyPlan>,

    // UI State
    pub selected_date: NaiveDate,
    pub today: NaiveDate,
    pub show_help: bool,
    pub map_expanded: bool,
    pub map_filter: MapFilter,
    pub map_index: usize,
    pub book_detail_open: bool,
    pub status_message: Option<String>,
    spinner_frame: usize,

    // Async state
    pub video_status: VideoStatus,
    video_rx: mpsc::Receiver<VideoResult>,

    // Services
    store: ProgressStore,
}

/// Runs a read against the data store, degrading to an empty value on failure.
async fn load_or_default<T: Default>(what: &str, fut: impl Future<Output = Result<T>>) -> T {
    match fut.await {
        Ok(value) => value,
        Err(e) => {
            tracing::warn!("Failed to load {}: {}", what, e);
            T::default()
        }
    }
}

impl App {
    pub async fn new(config: &Config, initial_date: Option<NaiveDate>) -> Result<Self> {
        let storage = LocalStorage::new(&config.db_path).await?;

        let supabase = match (&config.supabase_url, &config.supabase_anon_key) {
            (Some(url), Some(key)) => Some(Arc::new(SupabaseClient::new(
                url.clone(),
                key.clone(),
                config.access_token.clone(),
            ))),
            _ => {
                tracing::warn!("Supabase is not configured; no reading plan will be available");
                None
            }
        };

        let (settings, plans, user) = match &supabase {
            Some(client) => {
                tokio::join!(
                    load_or_default("app settings", client.fetch_settings()),
                    load_or_default("reading plan", client.fetch_plans()),
                    load_or_default("current user", client.get_user()),
                )
            }
            None => (Vec::new(), Vec::new(), None),
        };
        let plans = Arc::new(plans);

        let backend: Box<dyn ProgressBackend> = match (&supabase, &user) {
            (Some(client), Some(user)) => {
                tracing::info!("Signed in as {}", user.id);
                Box::new(RemoteBackend::new(Arc::clone(client), user.clone()))
            }
            _ => Box::new(GuestBackend::new(storage)),
        };
        let store = ProgressStore::open(backend, Arc::clone(&plans)).await;

        let (video_tx, video_rx) = mpsc::channel(1);
        let video_status = match &config.youtube_api_key {
            Some(key) => {
                let client = YoutubeClient::new(key.clone(), config.youtube_playlist_id.clone());
                tokio::spawn(async move {
                    let result = client.fetch_playlist().await.map_err(|e| e.to_string());
                    let _ = video_tx.send(VideoResult { result }).await;
                });
                VideoStatus::Loading
            }
            None => VideoStatus::NoApiKey,
        };

        let today = config.today();
        let mut app = Self {
            plans,
            settings: AppSettings::new(settings),
            videos: Vec::new(),
            user,
            stats: AggregateStats::default(),
            current_plan: None,
            selected_date: initial_date.unwrap_or(today),
            today,
            show_help: false,
            map_expanded: false,
            map_filter: MapFilter::All,
            map_index: 0,
            book_detail_open: false,
            status_message: None,
            spinner_frame: 0,
            video_status,
            video_rx,
            store,
        };
        app.refresh_stats();
        app.refresh_plan();
        Ok(app)
    }

    pub fn is_guest(&self) -> bool {
        self.store.is_guest()
    }

    pub fn is_completed(&self) -> bool {
        self.current_plan
            .as_ref()
            .is_some_and(|p| self.stats.is_completed(p.id()))
    }

    pub fn selected_day_of_year(&self) -> u32 {
        day_of_year(self.selected_date)
    }

    /// The selected day is the one day the playlist skips.
    pub fn is_no_video_day(&self) -> bool {
        self.selected_day_of_year() == NO_VIDEO_DAY
    }

    pub fn visible_books(&self) -> Vec<&'static BibleBook> {
        filtered_books(self.map_filter)
    }

    pub fn selected_book(&self) -> Option<&'static BibleBook> {
        self.visible_books().get(self.map_index).copied()
    }

    pub fn spinner(&self) -> &'static str {
        SPINNER_FRAMES[self.spinner_frame % SPINNER_FRAMES.len()]
    }

    pub fn tick_spinner(&mut self) {
        if self.video_status == VideoStatus::Loading {
            self.spinner_frame = self.spinner_frame.wrapping_add(1);
        }
    }

    fn refresh_plan(&mut self) {
        self.current_plan = resolve(self.selected_date, &self.plans, &self.videos);
    }

    fn refresh_stats(&mut self) {
        self.stats = self.store.stats();
    }

    pub async fn handle_action(&mut self, action: AppAction) -> Result<bool> {
        match action {
            AppAction::Quit => return Ok(true),

            AppAction::PrevDay => self.select_date(self.selected_date - Duration::days(1)),
            AppAction::NextDay => self.select_date(self.selected_date + Duration::days(1)),
            AppAction::GoToToday => self.select_date(self.today),

            AppAction::ToggleComplete => {
                self.toggle_current().await;
            }

            AppAction::OpenVideo => {
                if let Some(video) = self.current_plan.as_ref().and_then(|p| p.video.as_ref()) {
                    let url = video.watch_url();
                    open_link(&url);
                }
            }
            AppAction::OpenPlaylist => open_link(self.settings.new_365_video_url()),
            AppAction::OpenIntro => open_link(self.settings.intro_video_url()),
            AppAction::OpenOtOverview => open_link(self.settings.ot_overview_url()),
            AppAction::OpenNtOverview => open_link(self.settings.nt_overview_url()),

            AppAction::ToggleMap => {
                self.map_expanded = !self.map_expanded;
                self.book_detail_open = false;
            }

            AppAction::CycleMapFilter => {
                if self.map_expanded {
                    self.map_filter = self.map_filter.cycle();
                    self.map_index = 0;
                }
            }

            AppAction::MapUp => {
                if self.map_index > 0 {
                    self.map_index -= 1;
                }
            }

            AppAction::MapDown => {
                let len = self.visible_books().len();
                if len > 0 && self.map_index < len - 1 {
                    self.map_index += 1;
                }
            }

            AppAction::OpenBookDetail => {
                if self.map_expanded && self.selected_book().is_some() {
                    self.book_detail_open = true;
                }
            }

            AppAction::CloseBookDetail => {
                self.book_detail_open = false;
            }

            AppAction::ShowHelp => {
                self.show_help = true;
            }

            AppAction::HideHelp => {
                self.show_help = false;
            }
        }

        Ok(false)
    }

    pub fn select_date(&mut self, date: NaiveDate) {
        if self.selected_date != date {
            self.selected_date = date;
            self.status_message = None;
            self.refresh_plan();
        }
    }

    /// Toggle completion of the selected day's plan.
    pub async fn toggle_current(&mut self) -> Option<ToggleOutcome> {
        let plan_id = self.current_plan.as_ref()?.id();
        let currently_completed = self.stats.is_completed(plan_id);

        let outcome = self.store.toggle(plan_id, currently_completed).await;
        self.refresh_stats();

        self.status_message = Some(match outcome {
            ToggleOutcome::Applied { completed: true } => "기록 완료".to_string(),
            ToggleOutcome::Applied { completed: false } => "기록을 취소했습니다".to_string(),
            ToggleOutcome::RolledBack => "저장에 실패하여 되돌렸습니다".to_string(),
        });
        Some(outcome)
    }

    fn apply_video_result(&mut self, result: VideoResult) {
        match result.result {
            Ok(videos) => {
                self.videos = videos;
                self.video_status = VideoStatus::Loaded;
                self.refresh_plan();
            }
            Err(e) => {
                tracing::error!("YouTube load failed: {}", e);
                self.video_status = VideoStatus::Failed;
            }
        }
    }

    /// Poll for a finished playlist fetch (non-blocking)
    pub fn poll_video_result(&mut self) {
        if let Ok(result) = self.video_rx.try_recv() {
            self.apply_video_result(result);
        }
    }

    /// Wait for the playlist fetch, for headless use.
    pub async fn wait_for_videos(&mut self) {
        if self.video_status != VideoStatus::Loading {
            return;
        }
        match self.video_rx.recv().await {
            Some(result) => self.apply_video_result(result),
            None => self.video_status = VideoStatus::Failed,
        }
    }
}

fn open_link(url: &str) {
    if let Err(e) = open::that(url) {
        tracing::warn!("Failed to open {}: {}", url, e);
    }
}
