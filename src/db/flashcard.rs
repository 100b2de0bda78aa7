use crate::deck::FlashcardSink;
use crate::error::Result as NeurallyResult;
use crate::logger;
use crate::models::Flashcard;
use rusqlite::{Connection, Result};

pub fn insert_flashcard(conn: &Connection, card: &Flashcard) -> Result<()> {
    conn.execute(
        "INSERT INTO flashcards (card_id, front, back, tag, created_at)
         VALUES (?, ?, ?, ?, ?)",
        rusqlite::params![card.id, card.front, card.back, card.tag, card.created_at],
    )?;
    Ok(())
}

/// Most recently added first.
pub fn load_flashcards(conn: &Connection) -> Result<Vec<Flashcard>> {
    let mut stmt = conn.prepare(
        "SELECT card_id, front, back, tag, created_at
         FROM flashcards ORDER BY rowid_pk DESC",
    )?;

    let cards = stmt
        .query_map([], |row| {
            Ok(Flashcard {
                id: row.get(0)?,
                front: row.get(1)?,
                back: row.get(2)?,
                tag: row.get(3)?,
                created_at: row.get(4)?,
            })
        })?
        .filter_map(|row| match row {
            Ok(card) => Some(card),
            Err(e) => {
                logger::log(&format!("Skipping unreadable flashcard row: {}", e));
                None
            }
        })
        .collect();

    Ok(cards)
}

/// SQLite-backed flashcard sink.
#[derive(Debug)]
pub struct SqliteFlashcardStore {
    conn: Connection,
}

impl SqliteFlashcardStore {
    pub fn new(conn: Connection) -> Self {
        Self { conn }
    }

    pub fn load(&self) -> Result<Vec<Flashcard>> {
        load_flashcards(&self.conn)
    }
}

impl FlashcardSink for SqliteFlashcardStore {
    fn add_card(&mut self, card: Flashcard) -> NeurallyResult<()> {
        insert_flashcard(&self.conn, &card)?;
        Ok(())
    }
}
