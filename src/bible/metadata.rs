#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Testament {
    Old,
    New,
}

impl Testament {
    pub fn label(&self) -> &'static str {
        match self {
            Testament::Old => "구약",
            Testament::New => "신약",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Genre {
    Law,
    History,
    Wisdom,
    MajorProphets,
    MinorProphets,
    Gospels,
    PaulineEpistles,
    GeneralEpistles,
    Prophecy,
}

impl Genre {
    pub fn label(&self) -> &'static str {
        match self {
            Genre::Law => "모세오경",
            Genre::History => "역사서",
            Genre::Wisdom => "시가서",
            Genre::MajorProphets => "대선지서",
            Genre::MinorProphets => "소선지서",
            Genre::Gospels => "복음서",
            Genre::PaulineEpistles => "바울서신",
            Genre::GeneralEpistles => "일반서신",
            Genre::Prophecy => "예언서",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BibleBook {
    pub name: &'static str,
    pub chapters: u32,
    pub testament: Testament,
    pub genre: Genre,
}

const fn book(name: &'static str, chapters: u32, testament: Testament, genre: Genre) -> BibleBook {
    BibleBook {
        name,
        chapters,
        testament,
        genre,
    }
}

use Genre::*;
use Testament::{New, Old};

pub static BIBLE_BOOKS: [BibleBook; 66] = [
    book("창세기", 50, Old, Law),
    book("출애굽기", 40, Old, Law),
    book("레위기", 27, Old, Law),
    book("민수기", 36, Old, Law),
    book("신명기", 34, Old, Law),
    book("여호수아", 24, Old, History),
    book("사사기", 21, Old, History),
    book("룻기", 4, Old, History),
    book("사무엘상", 31, Old, History),
    book("사무엘하", 24, Old, History),
    book("열왕기상", 22, Old, History),
    book("열왕기하", 25, Old, History),
    book("역대상", 29, Old, History),
    book("역대하", 36, Old, History),
    book("에스라", 10, Old, History),
    book("느헤미야", 13, Old, History),
    book("에스더", 10, Old, History),
    book("욥기", 42, Old, Wisdom),
    book("시편", 150, Old, Wisdom),
    book("잠언", 31, Old, Wisdom),
    book("전도서", 12, Old, Wisdom),
    book("아가", 8, Old, Wisdom),
    book("이사야", 66, Old, MajorProphets),
    book("예레미야", 52, Old, MajorProphets),
    book("예레미야 애가", 5, Old, MajorProphets),
    book("에스겔", 48, Old, MajorProphets),
    book("다니엘", 12, Old, MajorProphets),
    book("호세아", 14, Old, MinorProphets),
    book("요엘", 3, Old, MinorProphets),
    book("아모스", 9, Old, MinorProphets),
    book("오바댜", 1, Old, MinorProphets),
    book("요나", 4, Old, MinorProphets),
    book("미가", 7, Old, MinorProphets),
    book("나훔", 3, Old, MinorProphets),
    book("하박국", 3, Old, MinorProphets),
    book("스바냐", 3, Old, MinorProphets),
    book("학개", 2, Old, MinorProphets),
    book("스가랴", 14, Old, MinorProphets),
    book("말라기", 4, Old, MinorProphets),
    book("마태복음", 28, New, Gospels),
    book("마가복음", 16, New, Gospels),
    book("누가복음", 24, New, Gospels),
    book("요한복음", 21, New, Gospels),
    book("사도행전", 28, New, History),
    book("로마서", 16, New, PaulineEpistles),
    book("고린도전서", 16, New, PaulineEpistles),
    book("고린도후서", 13, New, PaulineEpistles),
    book("갈라디아서", 6, New, PaulineEpistles),
    book("에베소서", 6, New, PaulineEpistles),
    book("빌립보서", 4, New, PaulineEpistles),
    book("골로새서", 4, New, PaulineEpistles),
    book("데살로니가전서", 5, New, PaulineEpistles),
    book("데살로니가후서", 3, New, PaulineEpistles),
    book("디모데전서", 6, New, PaulineEpistles),
    book("디모데후서", 4, New, PaulineEpistles),
    book("디도서", 3, New, PaulineEpistles),
    book("빌레몬서", 1, New, PaulineEpistles),
    book("히브리서", 13, New, GeneralEpistles),
    book("야고보서", 5, New, GeneralEpistles),
    book("베드로전서", 5, New, GeneralEpistles),
    book("베드로후서", 3, New, GeneralEpistles),
    book("요한일서", 5, New, GeneralEpistles),
    book("요한이서", 1, New, GeneralEpistles),
    book("요한삼서", 1, New, GeneralEpistles),
    book("유다서", 1, New, GeneralEpistles),
    book("요한계시록", 22, New, Prophecy),
];

/// Finds the book a reference starts with. The longest matching name wins, so
/// "예레미야 애가 1장" resolves to 예레미야 애가 rather than 예레미야.
pub fn find_book(reference: &str) -> Option<&'static BibleBook> {
    let reference = reference.trim_start();
    BIBLE_BOOKS
        .iter()
        .filter(|b| reference.starts_with(b.name))
        .max_by_key(|b| b.name.len())
}
