//! Cell-level cleanup for readings, meanings and example sentences.
//!
//! The source sheets mix full-width and ASCII punctuation freely, so every
//! delimiter here is matched literally.

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

/// Sentinel a reading cell uses for "this kanji has no such reading".
pub const NOT_APPLICABLE: &str = "X";
/// Emphasis marker the sheets put in front of important readings/examples.
pub const STAR: char = '*';

const OKURIGANA_DOT: char = '.';
const READING_OPEN: char = '（';
const READING_CLOSE: char = '）';
const VARIANT_SEPARATORS: [char; 3] = ['、', '，', ','];
const EXAMPLE_SEPARATOR: char = '／';
const EXAMPLE_COLON: char = '：';

static LEADING_INDEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]+\.?\s*").expect("valid index regex"));
static LEADING_CIRCLED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[①-⑨]\s*").expect("valid circled digit regex"));
static TRAILING_CLOSE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\)\)+$").expect("valid paren regex"));
static TRAILING_WIDE_CLOSE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"））+$").expect("valid paren regex"));

/// Insertion-ordered set of readings. Equality ignores order.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct ReadingSet {
    items: Vec<String>,
}

impl ReadingSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `false` when the reading was already present.
    pub fn insert(&mut self, reading: impl Into<String>) -> bool {
        let reading = reading.into();
        if self.contains(&reading) {
            return false;
        }
        self.items.push(reading);
        true
    }

    pub fn contains(&self, reading: &str) -> bool {
        self.items.iter().any(|r| r == reading)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.items.iter().map(String::as_str)
    }

    pub fn join(&self, sep: &str) -> String {
        self.items.join(sep)
    }
}

impl PartialEq for ReadingSet {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().all(|r| other.contains(r))
    }
}

impl Eq for ReadingSet {}

impl<S: Into<String>> FromIterator<S> for ReadingSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut set = ReadingSet::new();
        for reading in iter {
            set.insert(reading);
        }
        set
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExampleRecord {
    pub jp: String,
    pub reading: String,
    pub vi: String,
}

fn non_empty_lines(s: &str) -> impl Iterator<Item = &str> {
    s.split('\n').map(str::trim).filter(|line| !line.is_empty())
}

/// Expands an on-yomi/kun-yomi cell such as `あらわ（あらわ.す、あらわ.れる）`
/// into its distinct readings.
pub fn normalize_reading(s: &str) -> ReadingSet {
    let mut out = ReadingSet::new();
    if s.is_empty() || s == NOT_APPLICABLE {
        return out;
    }

    for line in non_empty_lines(s) {
        let line = line.strip_prefix(STAR).unwrap_or(line).trim();
        let open = line.find(READING_OPEN);
        let close = line.find(READING_CLOSE);
        match (open, close) {
            (Some(open), Some(close)) if close > open => {
                let base = line[..open].trim();
                let inside = line[open + READING_OPEN.len_utf8()..close].trim();
                for variant in inside.split(VARIANT_SEPARATORS).map(str::trim) {
                    let full: String = variant.chars().filter(|&c| c != OKURIGANA_DOT).collect();
                    if !full.is_empty() {
                        out.insert(full);
                    }
                }
                if !base.is_empty() {
                    out.insert(base);
                }
            }
            _ if !line.is_empty() => {
                out.insert(line);
            }
            _ => {}
        }
    }
    out
}

pub fn normalize_meaning(s: &str) -> Vec<String> {
    non_empty_lines(s).map(String::from).collect()
}

/// Splits an examples cell into `jp：reading (vi)` entries.
pub fn normalize_examples(s: &str) -> Vec<ExampleRecord> {
    let mut out = Vec::new();
    for line in non_empty_lines(s) {
        let segments: Vec<&str> = line
            .split(EXAMPLE_SEPARATOR)
            .map(str::trim)
            .filter(|seg| !seg.is_empty())
            .collect();
        if segments.len() > 1 {
            out.extend(segments.into_iter().filter_map(parse_example));
        } else {
            out.extend(parse_example(line));
        }
    }
    out
}

fn strip_markers(segment: &str) -> &str {
    let mut s = segment.trim();
    if let Some(m) = LEADING_INDEX.find(s) {
        s = &s[m.end()..];
    }
    if let Some(m) = LEADING_CIRCLED.find(s) {
        s = &s[m.end()..];
    }
    s.strip_prefix(STAR).unwrap_or(s).trim()
}

fn parse_example(segment: &str) -> Option<ExampleRecord> {
    let line = strip_markers(segment);
    let Some(sep) = line.find(EXAMPLE_COLON) else {
        return (!line.is_empty()).then(|| ExampleRecord {
            jp: line.to_string(),
            reading: String::new(),
            vi: String::new(),
        });
    };

    let jp = line[..sep].trim().to_string();
    let rest = line[sep + EXAMPLE_COLON.len_utf8()..].trim();
    let rest = TRAILING_CLOSE.replace(rest, ")");
    let rest = TRAILING_WIDE_CLOSE.replace(&rest, "）").into_owned();

    let open = rest.rfind(['(', '（']);
    let close = rest.rfind([')', '）']);
    let (reading, vi) = match (open, close) {
        (Some(open), Some(close)) if close > open => {
            let open_len = rest[open..].chars().next().map_or(1, char::len_utf8);
            (
                rest[..open].trim().to_string(),
                rest[open + open_len..close].trim().to_string(),
            )
        }
        _ => (rest, String::new()),
    };

    Some(ExampleRecord { jp, reading, vi })
}
