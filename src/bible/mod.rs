mod metadata;
mod progress_map;
mod utils;

pub use metadata::{find_book, BibleBook};
pub use progress_map::{book_progress, chapter_read, filtered_books, MapFilter};
pub use utils::{calculate_reading_time, generate_keywords, official_category, parse_reference};
