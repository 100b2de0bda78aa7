use rusqlite::{Connection, Result};
use std::path::Path;

pub mod flashcard;

pub use flashcard::SqliteFlashcardStore;

pub fn init_db(db_path: &Path) -> Result<Connection> {
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent).ok();
    }

    let conn = Connection::open(db_path)?;

    run_migrations(&conn)?;

    Ok(conn)
}

pub(crate) fn run_migrations(conn: &Connection) -> Result<()> {
    // card_id is caller-provided and may repeat.
    conn.execute(
        "CREATE TABLE IF NOT EXISTS flashcards (
            rowid_pk INTEGER PRIMARY KEY AUTOINCREMENT,
            card_id INTEGER NOT NULL,
            front TEXT NOT NULL,
            back TEXT NOT NULL,
            tag TEXT NOT NULL,
            created_at INTEGER NOT NULL
        )",
        [],
    )?;

    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_flashcards_tag ON flashcards(tag)",
        [],
    )?;

    Ok(())
}
