use std::sync::OnceLock;

use regex::Regex;

use super::metadata::{find_book, BibleBook};

const MINUTES_PER_PASSAGE: usize = 4;
const MIN_READING_MINUTES: usize = 5;

fn chapter_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\s*(\d+)\s*(장|편)").expect("valid chapter regex"))
}

/// Splits a reference such as "창세기 1장" or "시편 119편 1~32절" into its book and chapter.
pub fn parse_reference(reference: &str) -> Option<(&'static BibleBook, u32)> {
    let book = find_book(reference)?;
    let rest = &reference.trim_start()[book.name.len()..];
    let chapter = chapter_re()
        .captures(rest)
        .and_then(|cap| cap.get(1))
        .and_then(|m| m.as_str().parse().ok())?;
    Some((book, chapter))
}

fn distinct_books(verses: &[String]) -> Vec<&'static BibleBook> {
    let mut books: Vec<&'static BibleBook> = Vec::new();
    for book in verses.iter().filter_map(|v| find_book(v)) {
        if !books.iter().any(|b| b.name == book.name) {
            books.push(book);
        }
    }
    books
}

/// Official classification of a day's reading, e.g. "구약 모세오경".
pub fn official_category(verses: &[String]) -> String {
    let mut labels: Vec<String> = Vec::new();
    for book in distinct_books(verses) {
        let label = format!("{} {}", book.testament.label(), book.genre.label());
        if !labels.contains(&label) {
            labels.push(label);
        }
    }

    if labels.is_empty() {
        "성경 읽기".to_string()
    } else {
        labels.join(", ")
    }
}

/// Hashtag summary: every book read today, then every genre touched.
pub fn generate_keywords(verses: &[String]) -> String {
    let books = distinct_books(verses);
    if books.is_empty() {
        return "#키워드 #요약 #준비중".to_string();
    }

    let mut tags: Vec<String> = books
        .iter()
        .map(|b| format!("#{}", b.name.replace(' ', "")))
        .collect();
    for book in &books {
        let tag = format!("#{}", book.genre.label());
        if !tags.contains(&tag) {
            tags.push(tag);
        }
    }
    tags.join(" ")
}

pub fn calculate_reading_time(verses: &[String]) -> String {
    let minutes = (verses.len() * MINUTES_PER_PASSAGE).max(MIN_READING_MINUTES);
    format!("오늘의 읽기, 약 {minutes}분 소요 예정")
}
