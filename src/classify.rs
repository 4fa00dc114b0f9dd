//! Table shape detection.

use crate::tables::RawTable;

pub const LESSON_HEADERS: [&str; 3] = ["ことば", "漢字", "ベトナム語"];

pub const ID_HEADER: &str = "#";
pub const KANJI_HEADER: &str = "Kanji";
pub const HANVIET_HEADER: &str = "Hán Việt";
pub const ONYOMI_HEADER: &str = "On - yomi";
pub const KUNYOMI_HEADER: &str = "Kun - yomi";
pub const MEANING_HEADER: &str = "Ý nghĩa";
pub const EXAMPLES_HEADER: &str = "Ví dụ";

/// Column positions of a kanji-reference sheet, each found by label.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KanjiColumns {
    pub id: Option<usize>,
    pub kanji: Option<usize>,
    pub hanviet: Option<usize>,
    pub onyomi: Option<usize>,
    pub kunyomi: Option<usize>,
    pub meaning: Option<usize>,
    pub examples: Option<usize>,
}

impl KanjiColumns {
    pub fn locate(header: &[String]) -> Self {
        let find = |label: &str| header.iter().position(|h| h.trim() == label);
        KanjiColumns {
            id: find(ID_HEADER),
            kanji: find(KANJI_HEADER),
            hanviet: find(HANVIET_HEADER),
            onyomi: find(ONYOMI_HEADER),
            kunyomi: find(KUNYOMI_HEADER),
            meaning: find(MEANING_HEADER),
            examples: find(EXAMPLES_HEADER),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableShape {
    Empty,
    Lesson,
    KanjiReference(KanjiColumns),
}

impl TableShape {
    pub fn classify(table: &RawTable) -> Self {
        match table.first() {
            None => TableShape::Empty,
            Some(_) if is_lesson_shape(table) => TableShape::Lesson,
            Some(header) => TableShape::KanjiReference(KanjiColumns::locate(header)),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            TableShape::Empty => "empty",
            TableShape::Lesson => "lesson",
            TableShape::KanjiReference(_) => "kanji",
        }
    }
}

pub fn is_lesson_shape(table: &RawTable) -> bool {
    let Some(header) = table.first() else {
        return false;
    };
    header.len() >= LESSON_HEADERS.len()
        && header
            .iter()
            .zip(LESSON_HEADERS)
            .all(|(cell, expected)| cell.trim() == expected)
}
