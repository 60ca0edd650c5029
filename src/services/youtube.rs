use std::sync::OnceLock;
use std::time::Duration;

use chrono::{Datelike, NaiveDate};
use futures::stream::{self, StreamExt};
use regex::Regex;
use reqwest::Client;
use serde::Deserialize;

use crate::error::{AppError, Result};
use crate::models::YoutubeVideo;

const YOUTUBE_API_URL: &str = "https://www.googleapis.com/youtube/v3";
const PAGE_SIZE: usize = 50;

/// The playlist has no video for this day; later days shift back by one.
pub const NO_VIDEO_DAY: u32 = 246;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PlaylistItemsResponse {
    #[serde(default)]
    items: Vec<PlaylistItem>,
    next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct PlaylistItem {
    snippet: Snippet,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Snippet {
    title: String,
    resource_id: ResourceId,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ResourceId {
    video_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct VideosResponse {
    #[serde(default)]
    items: Vec<VideoDetails>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VideoDetails {
    id: String,
    content_details: ContentDetails,
}

#[derive(Debug, Deserialize)]
struct ContentDetails {
    duration: Option<String>,
}

pub struct YoutubeClient {
    client: Client,
    base_url: String,
    api_key: String,
    playlist_id: String,
}

impl YoutubeClient {
    pub fn new(api_key: String, playlist_id: String) -> Self {
        Self::with_base_url(YOUTUBE_API_URL.to_string(), api_key, playlist_id)
    }

    pub fn with_base_url(base_url: String, api_key: String, playlist_id: String) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .connect_timeout(Duration::from_secs(10))
            .build()
            .expect("Failed to create HTTP client");
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            playlist_id,
        }
    }

    /// Fetch the whole playlist in order, with durations filled in.
    pub async fn fetch_playlist(&self) -> Result<Vec<YoutubeVideo>> {
        let mut videos = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            let page = self.fetch_page(page_token.as_deref()).await?;
            videos.extend(page.items.into_iter().filter_map(|item| {
                let video_id = item.snippet.resource_id.video_id?;
                Some(YoutubeVideo {
                    video_id,
                    title: item.snippet.title,
                    duration: None,
                })
            }));

            match page.next_page_token {
                Some(token) => page_token = Some(token),
                None => break,
            }
        }

        if videos.is_empty() {
            return Err(anyhow::anyhow!("Playlist {} has no videos", self.playlist_id).into());
        }

        self.fill_durations(&mut videos).await?;
        tracing::debug!("Fetched {} playlist videos", videos.len());
        Ok(videos)
    }

    async fn fetch_page(&self, page_token: Option<&str>) -> Result<PlaylistItemsResponse> {
        let page_size = PAGE_SIZE.to_string();
        let mut query = vec![
            ("part", "snippet"),
            ("maxResults", page_size.as_str()),
            ("playlistId", self.playlist_id.as_str()),
            ("key", self.api_key.as_str()),
        ];
        if let Some(token) = page_token {
            query.push(("pageToken", token));
        }

        let response = self
            .client
            .get(format!("{}/playlistItems", self.base_url))
            .query(&query)
            .send()
            .await?;

        if !response.status().is_success() {
            let error_text = response.text().await?;
            return Err(AppError::YoutubeApi(format!("playlistItems: {}", error_text)));
        }

        Ok(response.json().await?)
    }

    async fn fill_durations(&self, videos: &mut [YoutubeVideo]) -> Result<()> {
        let batches: Vec<String> = videos
            .chunks(PAGE_SIZE)
            .map(|chunk| {
                chunk
                    .iter()
                    .map(|v| v.video_id.as_str())
                    .collect::<Vec<_>>()
                    .join(",")
            })
            .collect();

        let results: Vec<Result<VideosResponse>> = stream::iter(batches)
            .map(|ids| async move { self.fetch_details(&ids).await })
            .buffered(3)
            .collect()
            .await;

        for details in results {
            for item in details?.items {
                if let Some(video) = videos.iter_mut().find(|v| v.video_id == item.id) {
                    video.duration = item.content_details.duration;
                }
            }
        }
        Ok(())
    }

    async fn fetch_details(&self, ids: &str) -> Result<VideosResponse> {
        let response = self
            .client
            .get(format!("{}/videos", self.base_url))
            .query(&[
                ("part", "contentDetails"),
                ("id", ids),
                ("key", self.api_key.as_str()),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            let error_text = response.text().await?;
            return Err(AppError::YoutubeApi(format!("videos: {}", error_text)));
        }

        Ok(response.json().await?)
    }
}

pub fn day_of_year(date: NaiveDate) -> u32 {
    date.ordinal()
}

/// Maps a day of the year to its playlist entry.
pub fn video_for_day(videos: &[YoutubeVideo], day: u32) -> Option<&YoutubeVideo> {
    let index = match day {
        0 | NO_VIDEO_DAY => return None,
        d if d < NO_VIDEO_DAY => d - 1,
        d => d - 2,
    };
    videos.get(index as usize)
}

fn duration_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^P(?:(\d+)D)?(?:T(?:(\d+)H)?(?:(\d+)M)?(?:(\d+)S)?)?$")
            .expect("valid duration regex")
    })
}

/// Converts an ISO 8601 duration like `PT1H2M30S` to whole minutes, rounding half up.
pub fn parse_duration_to_minutes(duration: &str) -> u32 {
    let Some(cap) = duration_re().captures(duration.trim()) else {
        return 0;
    };
    // digits only, so a failed parse means the value overflowed
    let part = |i: usize| -> u64 {
        cap.get(i)
            .map(|m| m.as_str().parse().unwrap_or(u64::MAX))
            .unwrap_or(0)
    };
    let seconds = part(1)
        .saturating_mul(86_400)
        .saturating_add(part(2).saturating_mul(3_600))
        .saturating_add(part(3).saturating_mul(60))
        .saturating_add(part(4));
    u32::try_from(seconds.saturating_add(30) / 60).unwrap_or(u32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn videos(n: usize) -> Vec<YoutubeVideo> {
        (0..n)
            .map(|i| YoutubeVideo {
                video_id: format!("v{i}"),
                title: format!("Day {}", i + 1),
                duration: None,
            })
            .collect()
    }

    #[test]
    fn day_of_year_is_one_based() {
        assert_eq!(day_of_year(NaiveDate::from_ymd_opt(2025, 1, 1).unwrap()), 1);
        assert_eq!(day_of_year(NaiveDate::from_ymd_opt(2025, 12, 31).unwrap()), 365);
        assert_eq!(day_of_year(NaiveDate::from_ymd_opt(2024, 12, 31).unwrap()), 366);
    }

    #[test]
    fn video_index_skips_the_missing_day() {
        let list = videos(364);
        assert_eq!(video_for_day(&list, 1).map(|v| v.video_id.as_str()), Some("v0"));
        assert_eq!(video_for_day(&list, 245).map(|v| v.video_id.as_str()), Some("v244"));
        assert!(video_for_day(&list, NO_VIDEO_DAY).is_none());
        assert_eq!(video_for_day(&list, 247).map(|v| v.video_id.as_str()), Some("v245"));
        assert_eq!(video_for_day(&list, 365).map(|v| v.video_id.as_str()), Some("v363"));
        assert!(video_for_day(&list, 366).is_none());
        assert!(video_for_day(&list, 0).is_none());
        assert!(video_for_day(&[], 10).is_none());
    }

    #[test]
    fn durations_round_to_minutes() {
        assert_eq!(parse_duration_to_minutes("PT14M3S"), 14);
        assert_eq!(parse_duration_to_minutes("PT14M30S"), 15);
        assert_eq!(parse_duration_to_minutes("PT1H2M"), 62);
        assert_eq!(parse_duration_to_minutes("PT45S"), 1);
        assert_eq!(parse_duration_to_minutes("P0D"), 0);
        assert_eq!(parse_duration_to_minutes("garbage"), 0);
    }

    #[test]
    fn huge_durations_saturate() {
        assert_eq!(parse_duration_to_minutes("P9999999999999999D"), u32::MAX);
        assert_eq!(
            parse_duration_to_minutes("PT99999999999999999999999H"),
            u32::MAX
        );
        assert_eq!(parse_duration_to_minutes("P1D"), 1_440);
    }

    #[tokio::test]
    async fn fetches_pages_and_durations() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/playlistItems"))
            .and(query_param("pageToken", "p2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "items": [
                    {"snippet": {"title": "Day 2", "resourceId": {"videoId": "b"}}}
                ]
            })))
            .with_priority(1)
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/playlistItems"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "items": [
                    {"snippet": {"title": "Day 1", "resourceId": {"videoId": "a"}}},
                    {"snippet": {"title": "Deleted video", "resourceId": {}}}
                ],
                "nextPageToken": "p2"
            })))
            .with_priority(2)
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/videos"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "items": [
                    {"id": "b", "contentDetails": {"duration": "PT20M"}},
                    {"id": "a", "contentDetails": {"duration": "PT10M"}}
                ]
            })))
            .mount(&server)
            .await;

        let client = YoutubeClient::with_base_url(server.uri(), "key".into(), "list".into());
        let list = client.fetch_playlist().await.unwrap();

        assert_eq!(list.len(), 2);
        assert_eq!(list[0].video_id, "a");
        assert_eq!(list[0].duration.as_deref(), Some("PT10M"));
        assert_eq!(list[1].title, "Day 2");
        assert_eq!(list[1].duration.as_deref(), Some("PT20M"));
    }

    #[tokio::test]
    async fn empty_playlist_is_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/playlistItems"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"items": []})))
            .mount(&server)
            .await;

        let client = YoutubeClient::with_base_url(server.uri(), "key".into(), "list".into());
        assert!(matches!(client.fetch_playlist().await, Err(AppError::Other(_))));
    }

    #[tokio::test]
    async fn api_error_is_reported() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/playlistItems"))
            .respond_with(ResponseTemplate::new(403).set_body_string("quotaExceeded"))
            .mount(&server)
            .await;

        let client = YoutubeClient::with_base_url(server.uri(), "key".into(), "list".into());
        let err = client.fetch_playlist().await.unwrap_err();
        assert!(matches!(err, AppError::YoutubeApi(msg) if msg.contains("quotaExceeded")));
    }
}
