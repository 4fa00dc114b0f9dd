//! Canonical records built from classified tables.

use serde::Serialize;

use crate::classify::{is_lesson_shape, KanjiColumns, TableShape};
use crate::normalize::{normalize_examples, normalize_meaning, normalize_reading, ReadingSet, STAR};
use crate::tables::RawTable;

pub use crate::normalize::ExampleRecord;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RecordFlags {
    pub starred: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VocabularyRecord {
    pub id: i64,
    pub kanji: String,
    pub hanviet: String,
    pub onyomi: ReadingSet,
    pub kunyomi: ReadingSet,
    pub meaning_lines: Vec<String>,
    pub examples: Vec<ExampleRecord>,
    pub flags: RecordFlags,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LessonRecord {
    pub id: i64,
    pub word: String,
    pub kanji: String,
    pub vi: String,
}

fn cell(row: &[String], index: Option<usize>) -> &str {
    index
        .and_then(|i| row.get(i))
        .map_or("", |c| c.trim())
}

/// Ids come from the `#` column when it holds a non-zero number, otherwise
/// from the row position. Fractions truncate.
fn parse_id(raw: &str, position: usize) -> i64 {
    raw.parse::<f64>()
        .ok()
        .map(f64::trunc)
        .filter(|n| n.is_finite() && *n != 0.0)
        .map(|n| n as i64)
        .unwrap_or(position as i64)
}

fn vocabulary_record(row: &[String], cols: &KanjiColumns, position: usize) -> VocabularyRecord {
    let onyomi = cell(row, cols.onyomi);
    let kunyomi = cell(row, cols.kunyomi);
    let examples = cell(row, cols.examples);

    VocabularyRecord {
        id: parse_id(cell(row, cols.id), position),
        kanji: cell(row, cols.kanji).to_string(),
        hanviet: cell(row, cols.hanviet).to_string(),
        onyomi: normalize_reading(onyomi),
        kunyomi: normalize_reading(kunyomi),
        meaning_lines: normalize_meaning(cell(row, cols.meaning)),
        examples: normalize_examples(examples),
        flags: RecordFlags {
            starred: [onyomi, kunyomi, examples].iter().any(|raw| raw.contains(STAR)),
        },
    }
}

pub fn to_vocabulary_records(table: &RawTable) -> Vec<VocabularyRecord> {
    let TableShape::KanjiReference(cols) = TableShape::classify(table) else {
        return Vec::new();
    };
    table
        .iter()
        .skip(1)
        .enumerate()
        .map(|(i, row)| vocabulary_record(row, &cols, i + 1))
        .collect()
}

pub fn to_lesson_records(table: &RawTable) -> Vec<LessonRecord> {
    if !is_lesson_shape(table) {
        return Vec::new();
    }
    table
        .iter()
        .skip(1)
        .enumerate()
        .map(|(i, row)| LessonRecord {
            id: (i + 1) as i64,
            word: cell(row, Some(0)).to_string(),
            kanji: cell(row, Some(1)).to_string(),
            vi: cell(row, Some(2)).to_string(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(rows: &[&[&str]]) -> RawTable {
        rows.iter()
            .map(|r| r.iter().map(|c| c.to_string()).collect())
            .collect()
    }

    const HEADER: &[&str] = &["#", "Kanji", "Hán Việt", "On - yomi", "Kun - yomi", "Ý nghĩa", "Ví dụ"];

    #[test]
    fn test_kanji_sheet_row() {
        let t = table(&[
            HEADER,
            &["1", "日", "nhật", "ニチ\nジツ", "X", "ngày", "1.日記：にっき（nhật ký）"],
        ]);
        let records = to_vocabulary_records(&t);
        assert_eq!(records.len(), 1);
        let r = &records[0];
        assert_eq!(r.id, 1);
        assert_eq!(r.kanji, "日");
        assert_eq!(r.hanviet, "nhật");
        assert_eq!(r.onyomi, ReadingSet::from_iter(["ニチ", "ジツ"]));
        assert!(r.kunyomi.is_empty());
        assert_eq!(r.meaning_lines, vec!["ngày"]);
        assert_eq!(
            r.examples,
            vec![ExampleRecord { jp: "日記".into(), reading: "にっき".into(), vi: "nhật ký".into() }]
        );
        assert!(!r.flags.starred);
    }

    #[test]
    fn test_id_falls_back_to_position() {
        let t = table(&[HEADER, &["12", "月"], &["abc", "火"], &["", "水"]]);
        let ids: Vec<i64> = to_vocabulary_records(&t).iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![12, 2, 3]);
    }

    #[test]
    fn test_negative_and_zero_ids() {
        let t = table(&[HEADER, &["a", "一"], &["-7", "二"], &["0", "三"], &["4.9", "四"]]);
        let ids: Vec<i64> = to_vocabulary_records(&t).iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![1, -7, 3, 4]);
    }

    #[test]
    fn test_missing_columns_read_empty() {
        let t = table(&[&["Kanji", "Ví dụ"], &["山", "山道：やまみち"]]);
        let r = &to_vocabulary_records(&t)[0];
        assert_eq!(r.id, 1);
        assert_eq!(r.kanji, "山");
        assert!(r.hanviet.is_empty());
        assert!(r.onyomi.is_empty());
        assert!(r.meaning_lines.is_empty());
        assert_eq!(r.examples[0].reading, "やまみち");
    }

    #[test]
    fn test_starred_from_raw_cells() {
        let t = table(&[
            HEADER,
            &["1", "人", "nhân", "*ジン", "ひと", "*người", ""],
            &["2", "大", "đại", "ダイ", "おお", "*lớn", "大人：おとな"],
            &["3", "小", "tiểu", "ショウ", "ちい", "nhỏ", "*小学校：しょうがっこう"],
            &["4", "中", "trung", "チュウ", "*なか", "giữa", "中心：ちゅうしん"],
        ]);
        let flags: Vec<bool> = to_vocabulary_records(&t).iter().map(|r| r.flags.starred).collect();
        assert_eq!(flags, vec![true, false, true, true]);
    }

    #[test]
    fn test_normalization_is_deterministic() {
        let t = table(&[HEADER, &["1", "見", "kiến", "ケン", "み（み.る、み.せる）", "nhìn", "見学：けんがく (kiến học)"]]);
        assert_eq!(to_vocabulary_records(&t), to_vocabulary_records(&t));
    }

    #[test]
    fn test_lesson_records() {
        let t = table(&[&["ことば", "漢字", "ベトナム語"], &[" たべる ", "食べる", "ăn"], &["", "", "x"], &["みる"]]);
        let records = to_lesson_records(&t);
        assert_eq!(records.len(), 3);
        assert_eq!(
            records[0],
            LessonRecord { id: 1, word: "たべる".into(), kanji: "食べる".into(), vi: "ăn".into() }
        );
        assert_eq!(records[2].id, 3);
        assert!(records[2].kanji.is_empty());
    }

    #[test]
    fn test_shape_mismatch_yields_nothing() {
        let lesson = table(&[&["ことば", "漢字", "ベトナム語"], &["たべる", "食べる", "ăn"]]);
        assert!(to_vocabulary_records(&lesson).is_empty());
        assert!(to_lesson_records(&table(&[HEADER, &["1", "日"]])).is_empty());
        assert!(to_vocabulary_records(&RawTable::new()).is_empty());
    }
}
