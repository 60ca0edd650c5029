use super::metadata::{BibleBook, Testament, BIBLE_BOOKS};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MapFilter {
    #[default]
    All,
    Ot,
    Nt,
}

impl MapFilter {
    pub fn cycle(&self) -> Self {
        match self {
            MapFilter::All => MapFilter::Ot,
            MapFilter::Ot => MapFilter::Nt,
            MapFilter::Nt => MapFilter::All,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            MapFilter::All => "전체",
            MapFilter::Ot => "구약",
            MapFilter::Nt => "신약",
        }
    }

    fn matches(&self, book: &BibleBook) -> bool {
        match self {
            MapFilter::All => true,
            MapFilter::Ot => book.testament == Testament::Old,
            MapFilter::Nt => book.testament == Testament::New,
        }
    }
}

pub fn filtered_books(filter: MapFilter) -> Vec<&'static BibleBook> {
    BIBLE_BOOKS.iter().filter(|b| filter.matches(b)).collect()
}

/// Percentage of a book's chapters covered by completed references, capped at 100.
pub fn book_progress(book: &BibleBook, completed_verses: &[String]) -> f64 {
    let completed = completed_verses
        .iter()
        .filter(|v| super::find_book(v).is_some_and(|b| b.name == book.name))
        .count();
    (completed as f64 / book.chapters as f64 * 100.0).min(100.0)
}

/// A chapter counts as read when any completed reference points at it, including
/// partial readings such as "시편 119편 1~32절".
pub fn chapter_read(book: &BibleBook, chapter: u32, completed_verses: &[String]) -> bool {
    completed_verses
        .iter()
        .filter_map(|v| super::parse_reference(v))
        .any(|(b, ch)| b.name == book.name && ch == chapter)
}
