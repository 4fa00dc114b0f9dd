//! Plain-text faces for each card variant.

use crate::deck::DeckCard;
use crate::records::LessonRecord;
use crate::session::StudySession;

const EMPTY: &str = "—";

fn or_dash(s: &str) -> &str {
    if s.is_empty() {
        EMPTY
    } else {
        s
    }
}

fn section(label: &str, value: &str) -> String {
    format!("{:<10} {}", label, or_dash(value))
}

fn lesson_back(record: &LessonRecord) -> Vec<String> {
    vec![
        section("Kana", &record.word),
        section("Kanji", &record.kanji),
        section("Meaning", &record.vi),
    ]
}

pub fn render_front(card: &DeckCard) -> Vec<String> {
    match card {
        DeckCard::Word(record) => vec![or_dash(&record.kanji).to_string()],
        DeckCard::LessonKana(record) => {
            let title = if record.word.is_empty() { &record.kanji } else { &record.word };
            vec![or_dash(title).to_string()]
        }
        DeckCard::LessonKanji(record) => {
            let title = if record.kanji.is_empty() { &record.word } else { &record.kanji };
            vec![or_dash(title).to_string()]
        }
        DeckCard::LessonReverseKana(record) | DeckCard::LessonReverseKanji(record) => {
            vec![or_dash(&record.vi).to_string()]
        }
        DeckCard::Example { record, .. } => vec![
            or_dash(card.example().map_or("", |ex| ex.jp.as_str())).to_string(),
            format!("{} ・ {}", record.kanji, record.hanviet),
        ],
    }
}

pub fn render_back(card: &DeckCard) -> Vec<String> {
    match card {
        DeckCard::Word(record) => {
            let mut lines = vec![
                section("Hán Việt", &record.hanviet),
                section("On-yomi", &record.onyomi.join("・")),
                section("Kun-yomi", &record.kunyomi.join("・")),
                section("Meaning", &record.meaning_lines.join("; ")),
            ];
            if record.examples.is_empty() {
                lines.push(section("Examples", ""));
            } else {
                lines.push("Examples".to_string());
                lines.extend(
                    record
                        .examples
                        .iter()
                        .map(|ex| format!("  • {}：{} ({})", ex.jp, ex.reading, ex.vi)),
                );
            }
            lines
        }
        DeckCard::LessonKana(record) | DeckCard::LessonKanji(record) => lesson_back(record),
        DeckCard::LessonReverseKana(record) => vec![section("Kana", &record.word)],
        DeckCard::LessonReverseKanji(record) => vec![section("Kanji", &record.kanji)],
        DeckCard::Example { record, .. } => {
            let (reading, vi) = card
                .example()
                .map_or(("", ""), |ex| (ex.reading.as_str(), ex.vi.as_str()));
            vec![
                section("Reading", reading),
                section("Meaning", vi),
                section("Kanji", &format!("{} / {}", record.kanji, record.hanviet)),
            ]
        }
    }
}

pub fn status_line(session: &StudySession) -> String {
    let stats = session.stats();
    let position = if session.is_empty() { 0 } else { session.position() + 1 };
    format!(
        "[{} / {}] seen {} | correct {} | wrong {} | accuracy {}%",
        position,
        session.len(),
        stats.seen,
        stats.correct,
        stats.wrong,
        stats.accuracy()
    )
}

/// Lines for whichever face of the current card is showing.
pub fn render_current(session: &StudySession) -> Vec<String> {
    match session.current() {
        None => vec!["No cards to study.".to_string()],
        Some(card) if session.is_flipped() => render_back(card),
        Some(card) => render_front(card),
    }
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use super::*;
    use crate::normalize::{ExampleRecord, ReadingSet};
    use crate::records::{RecordFlags, VocabularyRecord};

    fn vocab() -> Rc<VocabularyRecord> {
        Rc::new(VocabularyRecord {
            id: 1,
            kanji: "日".into(),
            hanviet: "nhật".into(),
            onyomi: ReadingSet::from_iter(["ニチ", "ジツ"]),
            kunyomi: ReadingSet::new(),
            meaning_lines: vec!["ngày".into(), "mặt trời".into()],
            examples: vec![ExampleRecord { jp: "日記".into(), reading: "にっき".into(), vi: "nhật ký".into() }],
            flags: RecordFlags::default(),
        })
    }

    fn lesson(word: &str, kanji: &str) -> Rc<LessonRecord> {
        Rc::new(LessonRecord { id: 1, word: word.into(), kanji: kanji.into(), vi: "ăn".into() })
    }

    #[test]
    fn test_word_card() {
        let card = DeckCard::Word(vocab());
        assert_eq!(render_front(&card), vec!["日"]);
        let back = render_back(&card);
        assert!(back[1].ends_with("ニチ・ジツ"));
        assert!(back[2].ends_with(EMPTY));
        assert!(back[3].ends_with("ngày; mặt trời"));
        assert_eq!(back[5], "  • 日記：にっき (nhật ký)");
    }

    #[test]
    fn test_lesson_titles_fall_back() {
        assert_eq!(render_front(&DeckCard::LessonKana(lesson("", "食べる"))), vec!["食べる"]);
        assert_eq!(render_front(&DeckCard::LessonKanji(lesson("たべる", ""))), vec!["たべる"]);
        assert_eq!(render_front(&DeckCard::LessonKana(lesson("", ""))), vec![EMPTY]);
        assert_eq!(render_front(&DeckCard::LessonReverseKanji(lesson("たべる", "食べる"))), vec!["ăn"]);
    }

    #[test]
    fn test_example_card() {
        let card = DeckCard::Example { record: vocab(), index: 0 };
        assert_eq!(render_front(&card), vec!["日記", "日 ・ nhật"]);
        let back = render_back(&card);
        assert!(back[0].ends_with("にっき"));
        assert!(back[1].ends_with("nhật ký"));
    }

    #[test]
    fn test_status_line_for_empty_session() {
        let session = StudySession::default();
        assert_eq!(
            status_line(&session),
            "[0 / 0] seen 0 | correct 0 | wrong 0 | accuracy 0%"
        );
        assert_eq!(render_current(&session), vec!["No cards to study."]);
    }
}
