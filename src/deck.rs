//! Fans records out into the flat card sequence a study session walks.

use std::{fmt, rc::Rc, str::FromStr};

use serde::{Serialize, Serializer};
use tracing::debug;

use crate::records::{
    to_lesson_records, to_vocabulary_records, ExampleRecord, LessonRecord, VocabularyRecord,
};
use crate::tables::{RawTable, RawTables};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Mode {
    #[default]
    Words,
    Examples,
    Lesson,
}

impl FromStr for Mode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "words" => Ok(Mode::Words),
            "examples" => Ok(Mode::Examples),
            "lesson" => Ok(Mode::Lesson),
            _ => Err(format!("unknown mode '{}' (expected words, examples or lesson)", s)),
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Mode::Words => "words",
            Mode::Examples => "examples",
            Mode::Lesson => "lesson",
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TableSelection {
    #[default]
    All,
    Named(String),
}

impl FromStr for TableSelection {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim() {
            "all" => TableSelection::All,
            name => TableSelection::Named(name.to_string()),
        })
    }
}

impl fmt::Display for TableSelection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TableSelection::All => f.write_str("all"),
            TableSelection::Named(name) => f.write_str(name),
        }
    }
}

#[derive(Debug, Clone)]
pub enum DeckCard {
    Word(Rc<VocabularyRecord>),
    LessonKana(Rc<LessonRecord>),
    LessonKanji(Rc<LessonRecord>),
    LessonReverseKana(Rc<LessonRecord>),
    LessonReverseKanji(Rc<LessonRecord>),
    /// `index` points into `record.examples`.
    Example { record: Rc<VocabularyRecord>, index: usize },
}

impl DeckCard {
    pub fn kind(&self) -> &'static str {
        match self {
            DeckCard::Word(_) => "word",
            DeckCard::LessonKana(_) => "lessonKana",
            DeckCard::LessonKanji(_) => "lessonKanji",
            DeckCard::LessonReverseKana(_) => "lessonReverseKana",
            DeckCard::LessonReverseKanji(_) => "lessonReverseKanji",
            DeckCard::Example { .. } => "example",
        }
    }

    pub fn example(&self) -> Option<&ExampleRecord> {
        match self {
            DeckCard::Example { record, index } => record.examples.get(*index),
            _ => None,
        }
    }

    /// What the learner is expected to type for this card.
    pub fn answer(&self) -> &str {
        match self {
            DeckCard::Word(record) => &record.hanviet,
            DeckCard::LessonKana(record) | DeckCard::LessonKanji(record) => &record.vi,
            DeckCard::LessonReverseKana(record) => &record.word,
            DeckCard::LessonReverseKanji(record) => &record.kanji,
            DeckCard::Example { .. } => self.example().map_or("", |ex| ex.reading.as_str()),
        }
    }
}

impl Serialize for DeckCard {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        #[derive(Serialize)]
        #[serde(untagged)]
        enum Payload<'a> {
            Vocabulary(&'a VocabularyRecord),
            Lesson(&'a LessonRecord),
        }

        #[derive(Serialize)]
        struct Tagged<'a> {
            #[serde(rename = "type")]
            kind: &'a str,
            item: Payload<'a>,
            #[serde(skip_serializing_if = "Option::is_none")]
            ex: Option<&'a ExampleRecord>,
        }

        let item = match self {
            DeckCard::Word(record) | DeckCard::Example { record, .. } => Payload::Vocabulary(record),
            DeckCard::LessonKana(record)
            | DeckCard::LessonKanji(record)
            | DeckCard::LessonReverseKana(record)
            | DeckCard::LessonReverseKanji(record) => Payload::Lesson(record),
        };
        Tagged { kind: self.kind(), item, ex: self.example() }.serialize(serializer)
    }
}

fn selected_tables<'a>(
    selection: &'a TableSelection,
    tables: &'a RawTables,
) -> Vec<(&'a str, &'a RawTable)> {
    match selection {
        TableSelection::All => tables.iter().collect(),
        TableSelection::Named(name) => match tables.get(name) {
            Some(table) => vec![(name.as_str(), table)],
            None => {
                debug!("Table '{}' not found; deck will be empty", name);
                Vec::new()
            }
        },
    }
}

fn lesson_cards(record: LessonRecord, reverse: bool, out: &mut Vec<DeckCard>) {
    let has_kana = !record.word.is_empty();
    let has_kanji = !record.kanji.is_empty();
    let record = Rc::new(record);
    let (kana, kanji): (fn(Rc<LessonRecord>) -> DeckCard, fn(Rc<LessonRecord>) -> DeckCard) =
        if reverse {
            (DeckCard::LessonReverseKana, DeckCard::LessonReverseKanji)
        } else {
            (DeckCard::LessonKana, DeckCard::LessonKanji)
        };

    if has_kana || !has_kanji {
        out.push(kana(Rc::clone(&record)));
    }
    if has_kanji {
        out.push(kanji(record));
    }
}

/// Builds the deck for `mode` over the selected tables. Tables whose shape
/// does not fit the mode contribute nothing.
pub fn build_deck(
    mode: Mode,
    selection: &TableSelection,
    reverse: bool,
    tables: &RawTables,
) -> Vec<DeckCard> {
    let mut deck = Vec::new();
    for (name, table) in selected_tables(selection, tables) {
        let before = deck.len();
        match mode {
            Mode::Words => deck.extend(
                to_vocabulary_records(table)
                    .into_iter()
                    .map(|record| DeckCard::Word(Rc::new(record))),
            ),
            Mode::Examples => {
                for record in to_vocabulary_records(table) {
                    let record = Rc::new(record);
                    deck.extend((0..record.examples.len()).map(|index| DeckCard::Example {
                        record: Rc::clone(&record),
                        index,
                    }));
                }
            }
            Mode::Lesson => {
                for record in to_lesson_records(table) {
                    lesson_cards(record, reverse, &mut deck);
                }
            }
        }
        debug!("Table '{}' contributed {} {} cards", name, deck.len() - before, mode);
    }
    deck
}
