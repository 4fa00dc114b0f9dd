use rand::{seq::SliceRandom, Rng};
use serde::Serialize;
use tracing::info;

use crate::classify::is_lesson_shape;
use crate::deck::{build_deck, DeckCard, Mode, TableSelection};
use crate::tables::RawTables;

/// Table the lesson exports put their vocabulary list in.
pub const LESSON_TABLE: &str = "Table_1";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Stats {
    pub seen: u32,
    pub correct: u32,
    pub wrong: u32,
}

impl Stats {
    /// Share of answered cards marked correct, as a rounded percentage.
    pub fn accuracy(&self) -> u32 {
        let answered = self.correct + self.wrong;
        if answered == 0 {
            return 0;
        }
        (self.correct as f64 * 100.0 / answered as f64).round() as u32
    }
}

/// A built deck plus the learner's position in it.
#[derive(Debug, Clone, Default)]
pub struct StudySession {
    deck: Vec<DeckCard>,
    position: usize,
    flipped: bool,
    stats: Stats,
}

impl StudySession {
    pub fn new(deck: Vec<DeckCard>) -> Self {
        Self { deck, ..Self::default() }
    }

    pub fn deck(&self) -> &[DeckCard] {
        &self.deck
    }

    pub fn len(&self) -> usize {
        self.deck.len()
    }

    pub fn is_empty(&self) -> bool {
        self.deck.is_empty()
    }

    pub fn position(&self) -> usize {
        self.position
    }

    pub fn stats(&self) -> Stats {
        self.stats
    }

    pub fn is_flipped(&self) -> bool {
        self.flipped
    }

    pub fn current(&self) -> Option<&DeckCard> {
        self.deck.get(self.position)
    }

    fn go_to(&mut self, position: usize) {
        self.position = position;
        self.flipped = false;
    }

    pub fn next(&mut self) {
        if !self.deck.is_empty() {
            self.go_to((self.position + 1) % self.deck.len());
        }
    }

    pub fn prev(&mut self) {
        if !self.deck.is_empty() {
            let len = self.deck.len();
            self.go_to((self.position + len - 1) % len);
        }
    }

    pub fn flip(&mut self) {
        self.flipped = !self.flipped;
    }

    pub fn shuffle(&mut self) {
        self.shuffle_with(&mut rand::rng());
    }

    pub fn shuffle_with<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.deck.shuffle(rng);
        self.go_to(0);
    }

    pub fn mark_correct(&mut self) {
        self.mark(true);
    }

    pub fn mark_wrong(&mut self) {
        self.mark(false);
    }

    /// Records an answer and moves on, stopping at the last card.
    fn mark(&mut self, correct: bool) {
        if self.deck.is_empty() {
            return;
        }
        self.stats.seen += 1;
        if correct {
            self.stats.correct += 1;
        } else {
            self.stats.wrong += 1;
        }
        self.go_to((self.position + 1).min(self.deck.len() - 1));
    }

    /// Compares a typed answer with the current card and marks it.
    /// Returns `None` when the deck is empty.
    pub fn answer(&mut self, input: &str) -> Option<bool> {
        let correct = self.current()?.answer() == input.trim();
        self.mark(correct);
        Some(correct)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeckConfig {
    pub mode: Mode,
    pub selection: TableSelection,
    pub reverse: bool,
}

/// Everything the interactive loop owns. Each handler consumes the old state
/// and returns a fully rebuilt one.
#[derive(Debug, Clone, Default)]
pub struct AppState {
    pub tables: RawTables,
    pub config: DeckConfig,
    pub session: StudySession,
}

impl AppState {
    pub fn new(tables: RawTables, config: DeckConfig) -> Self {
        let session = StudySession::new(build_deck(
            config.mode,
            &config.selection,
            config.reverse,
            &tables,
        ));
        info!(
            "Built {} cards in {} mode from {} ({} tables loaded)",
            session.len(),
            config.mode,
            config.selection,
            tables.len()
        );
        Self { tables, config, session }
    }

    /// Replaces the tables. A lesson-shaped `Table_1` switches the deck to
    /// lesson mode on that table.
    pub fn load(self, tables: RawTables) -> Self {
        let lesson_detected = tables.get(LESSON_TABLE).is_some_and(is_lesson_shape);
        if lesson_detected {
            info!("Detected lesson vocabulary in {}", LESSON_TABLE);
            return self.load_lesson(tables);
        }
        Self::new(tables, self.config)
    }

    /// Replaces the tables and studies `Table_1` in lesson mode.
    pub fn load_lesson(self, tables: RawTables) -> Self {
        let config = DeckConfig {
            mode: Mode::Lesson,
            selection: TableSelection::Named(LESSON_TABLE.to_string()),
            ..self.config
        };
        Self::new(tables, config)
    }

    pub fn with_mode(self, mode: Mode) -> Self {
        Self::new(self.tables, DeckConfig { mode, ..self.config })
    }

    pub fn with_selection(self, selection: TableSelection) -> Self {
        Self::new(self.tables, DeckConfig { selection, ..self.config })
    }

    /// Only lesson decks depend on the reverse flag, so other modes keep
    /// their session.
    pub fn with_reverse(mut self, reverse: bool) -> Self {
        if self.config.mode != Mode::Lesson {
            self.config.reverse = reverse;
            return self;
        }
        Self::new(self.tables, DeckConfig { reverse, ..self.config })
    }
}
