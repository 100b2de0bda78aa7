use crate::error::Result;
use crate::models::Flashcard;
use std::time::{SystemTime, UNIX_EPOCH};

/// Append-only destination for exported cards. Cards are stored as given,
/// without dedup on `id`.
pub trait FlashcardSink {
    fn add_card(&mut self, card: Flashcard) -> Result<()>;
}

pub trait CardIdGenerator {
    fn next_id(&mut self) -> u64;
}

/// Monotonic card ids. `new` seeds from the wall clock in milliseconds so ids
/// keep increasing across runs.
#[derive(Debug, Clone)]
pub struct SequentialIds {
    next: u64,
}

impl SequentialIds {
    pub fn new() -> Self {
        let millis = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0);
        Self::starting_at(millis)
    }

    pub fn starting_at(next: u64) -> Self {
        Self { next }
    }
}

impl Default for SequentialIds {
    fn default() -> Self {
        Self::new()
    }
}

impl CardIdGenerator for SequentialIds {
    fn next_id(&mut self) -> u64 {
        let id = self.next;
        self.next += 1;
        id
    }
}

/// In-memory deck, most recent card first.
#[derive(Debug, Default)]
pub struct Deck {
    cards: Vec<Flashcard>,
}

impl Deck {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_cards(cards: Vec<Flashcard>) -> Self {
        Self { cards }
    }

    pub fn cards(&self) -> &[Flashcard] {
        &self.cards
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }
}

impl FlashcardSink for Deck {
    fn add_card(&mut self, card: Flashcard) -> Result<()> {
        self.cards.insert(0, card);
        Ok(())
    }
}
