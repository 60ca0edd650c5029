use chrono::NaiveDate;

use crate::bible::{calculate_reading_time, generate_keywords, official_category};
use crate::models::{DerivedDailyPlan, ReadingPlanEntry, YoutubeVideo};
use crate::services::youtube::{day_of_year, parse_duration_to_minutes, video_for_day};

const PSALM_119: &str = "시편 119편";

/// Psalm 119 is read over six days, twice a year. Day of year -> portion.
pub static PSALM_119_SPLITS: [(u32, &str); 12] = [
    (119, "시편 119편 1~32절"),
    (120, "시편 119편 33-64절"),
    (121, "시편 119편 65-96절"),
    (122, "시편 119편 97-128절"),
    (123, "시편 119편 129-152절"),
    (124, "시편 119편 153-176절"),
    (274, "시편 119편 1~32절"),
    (275, "시편 119편 33-64절"),
    (276, "시편 119편 65-96절"),
    (277, "시편 119편 97-128절"),
    (278, "시편 119편 129-152절"),
    (279, "시편 119편 153-176절"),
];

pub fn psalm_119_label(day_of_year: u32) -> Option<&'static str> {
    PSALM_119_SPLITS
        .iter()
        .find(|(day, _)| *day == day_of_year)
        .map(|(_, label)| *label)
}

fn apply_corrections(mut entry: ReadingPlanEntry) -> ReadingPlanEntry {
    let Some(label) = psalm_119_label(entry.day_of_year) else {
        return entry;
    };
    if entry.title.contains(PSALM_119) {
        return entry;
    }

    entry.title = format!("{}, {}", entry.title, label);
    if !entry.verses.iter().any(|v| v == label) {
        entry.verses.push(label.to_string());
    }
    entry
}

fn non_empty(value: &Option<String>) -> Option<String> {
    value.as_deref().filter(|s| !s.is_empty()).map(String::from)
}

fn video_reading_time(video: Option<&YoutubeVideo>) -> Option<String> {
    let duration = video?.duration.as_deref().filter(|d| !d.is_empty())?;
    Some(format!(
        "오늘의 읽기, 약 {}분 소요",
        parse_duration_to_minutes(duration)
    ))
}

/// Builds the display plan for `date`, or `None` when the plan has no entry for it.
pub fn resolve(
    date: NaiveDate,
    plans: &[ReadingPlanEntry],
    videos: &[YoutubeVideo],
) -> Option<DerivedDailyPlan> {
    let date_str = date.format("%Y-%m-%d").to_string();
    let entry = plans.iter().find(|p| p.date == date_str)?.clone();
    let entry = apply_corrections(entry);

    let video = video_for_day(videos, day_of_year(date)).cloned();

    // blank stored values count as missing
    let category =
        non_empty(&entry.category).unwrap_or_else(|| official_category(&entry.verses));
    let summary = non_empty(&entry.summary).unwrap_or_else(|| generate_keywords(&entry.verses));
    let reading_time = video_reading_time(video.as_ref())
        .or_else(|| non_empty(&entry.reading_time))
        .unwrap_or_else(|| calculate_reading_time(&entry.verses));

    Some(DerivedDailyPlan {
        entry,
        category,
        summary,
        reading_time,
        video,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn entry(id: i64, date: &str, day: u32, title: &str, verses: &[&str]) -> ReadingPlanEntry {
        ReadingPlanEntry {
            id,
            date: date.to_string(),
            day_of_year: day,
            title: title.to_string(),
            verses: verses.iter().map(|v| v.to_string()).collect(),
            category: None,
            summary: None,
            reading_time: None,
        }
    }

    fn video(id: &str, duration: Option<&str>) -> YoutubeVideo {
        YoutubeVideo {
            video_id: id.to_string(),
            title: id.to_string(),
            duration: duration.map(String::from),
        }
    }

    #[test]
    fn missing_date_is_absent() {
        let plans = vec![entry(1, "2025-01-01", 1, "창세기 1-3장", &["창세기 1장"])];
        assert!(resolve(date("2025-01-02"), &plans, &[]).is_none());
        assert!(resolve(date("2025-01-01"), &[], &[]).is_none());
    }

    #[test]
    fn every_split_day_gets_its_label_exactly_once() {
        for (day, label) in PSALM_119_SPLITS {
            let d = NaiveDate::from_yo_opt(2025, day).unwrap();
            let plans = vec![entry(day as i64, &d.to_string(), day, "사무엘하 1-2장", &["사무엘하 1장"])];

            let first = resolve(d, &plans, &[]).unwrap();
            assert_eq!(first.entry.title, format!("사무엘하 1-2장, {label}"));
            assert_eq!(first.entry.verses.iter().filter(|v| *v == label).count(), 1);

            // resolving an already corrected entry changes nothing
            let again = resolve(d, &[first.entry.clone()], &[]).unwrap();
            assert_eq!(again.entry, first.entry);
            assert_eq!(again.entry.title.matches(label).count(), 1);
        }
    }

    #[test]
    fn entry_already_naming_the_psalm_is_left_alone() {
        let d = NaiveDate::from_yo_opt(2025, 120).unwrap();
        let plans = vec![entry(120, &d.to_string(), 120, "시편 119편 33-64절", &["시편 119편 33-64절"])];
        let plan = resolve(d, &plans, &[]).unwrap();
        assert_eq!(plan.entry.title, "시편 119편 33-64절");
        assert_eq!(plan.entry.verses.len(), 1);
    }

    #[test]
    fn stored_fields_win_over_derived() {
        let mut e = entry(1, "2025-01-01", 1, "창세기 1-3장", &["창세기 1장"]);
        e.category = Some("율법".to_string());
        e.summary = Some("#창조".to_string());
        e.reading_time = Some("약 9분".to_string());

        let plan = resolve(date("2025-01-01"), &[e], &[]).unwrap();
        assert_eq!(plan.category, "율법");
        assert_eq!(plan.summary, "#창조");
        assert_eq!(plan.reading_time, "약 9분");
    }

    #[test]
    fn derived_fields_fill_gaps() {
        let e = entry(1, "2025-01-01", 1, "창세기 1-3장", &["창세기 1장", "창세기 2장"]);
        let plan = resolve(date("2025-01-01"), &[e], &[]).unwrap();
        assert_eq!(plan.category, "구약 모세오경");
        assert_eq!(plan.summary, "#창세기 #모세오경");
        assert_eq!(plan.reading_time, "오늘의 읽기, 약 8분 소요 예정");
        assert!(plan.video.is_none());
    }

    #[test]
    fn video_duration_beats_stored_reading_time() {
        let mut e = entry(2, "2025-01-02", 2, "창세기 4-7장", &["창세기 4장"]);
        e.reading_time = Some("약 9분".to_string());
        let videos = vec![video("d1", Some("PT10M")), video("d2", Some("PT17M40S"))];

        let plan = resolve(date("2025-01-02"), &[e], &videos).unwrap();
        assert_eq!(plan.video.as_ref().map(|v| v.video_id.as_str()), Some("d2"));
        assert_eq!(plan.reading_time, "오늘의 읽기, 약 18분 소요");
    }

    #[test]
    fn video_without_duration_falls_through() {
        let mut e = entry(1, "2025-01-01", 1, "창세기 1-3장", &["창세기 1장"]);
        e.reading_time = Some("약 9분".to_string());
        let plan = resolve(date("2025-01-01"), &[e], &[video("d1", None)]).unwrap();
        assert_eq!(plan.reading_time, "약 9분");
    }

    #[test]
    fn blank_stored_fields_are_derived() {
        let mut e = entry(1, "2025-01-01", 1, "창세기 1-3장", &["창세기 1장", "창세기 2장"]);
        e.category = Some(String::new());
        e.summary = Some(String::new());
        e.reading_time = Some(String::new());

        let plan = resolve(date("2025-01-01"), &[e], &[]).unwrap();
        assert_eq!(plan.category, "구약 모세오경");
        assert_eq!(plan.summary, "#창세기 #모세오경");
        assert_eq!(plan.reading_time, "오늘의 읽기, 약 8분 소요 예정");
    }

    #[test]
    fn blank_video_duration_falls_through() {
        let mut e = entry(1, "2025-01-01", 1, "창세기 1-3장", &["창세기 1장"]);
        e.reading_time = Some("약 9분".to_string());
        let plan = resolve(date("2025-01-01"), &[e.clone()], &[video("d1", Some(""))]).unwrap();
        assert_eq!(plan.reading_time, "약 9분");

        e.reading_time = None;
        let plan = resolve(date("2025-01-01"), &[e], &[video("d1", Some(""))]).unwrap();
        assert_eq!(plan.reading_time, "오늘의 읽기, 약 5분 소요 예정");
    }
}
