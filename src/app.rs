use crate::ai::fallback_questions;
use crate::config::AppConfig;
use crate::db::SqliteFlashcardStore;
use crate::deck::{Deck, FlashcardSink, SequentialIds};
use crate::error::{QuizError, Result};
use crate::logger;
use crate::models::{AiRequest, AiResponse, AppState, Flashcard, Question};
use crate::quiz::{Navigator, QuizSession};
use crate::sources::{get_note_files, load_note, note_title};
use crossbeam_channel::Sender;
use std::path::PathBuf;

/// The deck on screen plus its optional on-disk copy.
#[derive(Debug, Default)]
pub struct Library {
    pub deck: Deck,
    store: Option<SqliteFlashcardStore>,
}

impl Library {
    pub fn new(store: Option<SqliteFlashcardStore>) -> Self {
        let cards = match &store {
            Some(store) => store.load().unwrap_or_else(|e| {
                logger::log(&format!("Failed to load flashcards: {}", e));
                Vec::new()
            }),
            None => Vec::new(),
        };
        Self {
            deck: Deck::from_cards(cards),
            store,
        }
    }
}

impl FlashcardSink for Library {
    fn add_card(&mut self, card: Flashcard) -> Result<()> {
        if let Some(store) = self.store.as_mut() {
            store.add_card(card.clone())?;
        }
        self.deck.add_card(card)
    }
}

pub struct App {
    pub state: AppState,
    pub config: AppConfig,
    pub note_files: Vec<PathBuf>,
    /// 0 is the "write content" entry; note files follow.
    pub selected_menu_index: usize,
    pub content_input: String,
    /// Cursor as a character index into `content_input`.
    pub cursor_position: usize,
    pub source_title: String,
    pub quiz: Option<QuizSession>,
    pub used_fallback: bool,
    pub mistakes_saved: bool,
    pub library: Library,
    pub selected_card: usize,
    pub status: Option<String>,
    pub should_quit: bool,
    ids: SequentialIds,
    ai_tx: Option<Sender<AiRequest>>,
    // Token of the generation request the app is waiting on.
    pending_generation: Option<u64>,
    next_generation: u64,
}

impl App {
    pub fn new(
        config: AppConfig,
        store: Option<SqliteFlashcardStore>,
        ai_tx: Option<Sender<AiRequest>>,
    ) -> Self {
        let note_files = get_note_files(&config.notes_dir);
        Self {
            state: AppState::Menu,
            config,
            note_files,
            selected_menu_index: 0,
            content_input: String::new(),
            cursor_position: 0,
            source_title: String::new(),
            quiz: None,
            used_fallback: false,
            mistakes_saved: false,
            library: Library::new(store),
            selected_card: 0,
            status: None,
            should_quit: false,
            ids: SequentialIds::new(),
            ai_tx,
            pending_generation: None,
            next_generation: 1,
        }
    }

    pub fn menu_len(&self) -> usize {
        self.note_files.len() + 1
    }

    pub fn refresh_notes(&mut self) {
        self.note_files = get_note_files(&self.config.notes_dir);
        self.selected_menu_index = self.selected_menu_index.min(self.note_files.len());
    }

    pub fn open_content_input(&mut self) {
        self.state = AppState::ContentInput;
        self.status = None;
    }

    pub fn open_selected_note(&mut self) {
        if self.selected_menu_index == 0 {
            self.open_content_input();
            return;
        }
        let Some(path) = self.note_files.get(self.selected_menu_index - 1).cloned() else {
            return;
        };
        match load_note(&path) {
            Ok(content) => {
                self.source_title = note_title(&path);
                self.start_generation(content);
            }
            Err(e) => {
                logger::log(&format!("Failed to read {}: {}", path.display(), e));
                self.status = Some(format!("Could not read {}: {}", path.display(), e));
            }
        }
    }

    /// Hands study content to the worker. Without a worker the fallback batch
    /// is used directly.
    pub fn start_generation(&mut self, content: String) {
        if content.trim().is_empty() {
            self.status = Some("Add some study content first".to_string());
            return;
        }
        self.status = None;

        let token = self.next_generation;
        self.next_generation += 1;
        let sent = match &self.ai_tx {
            Some(tx) => tx.send(AiRequest::Generate { token, content }).is_ok(),
            None => false,
        };
        if sent {
            self.pending_generation = Some(token);
            self.state = AppState::Generating;
        } else {
            self.pending_generation = None;
            logger::log("No AI worker available, using fallback questions");
            self.start_quiz(fallback_questions(), true);
        }
    }

    pub fn start_quiz(&mut self, questions: Vec<Question>, used_fallback: bool) {
        self.used_fallback = used_fallback;
        self.mistakes_saved = false;
        match QuizSession::new(questions) {
            Ok(session) => {
                self.quiz = Some(session);
                self.state = AppState::Quiz;
            }
            Err(QuizError::EmptyBatch) => {
                logger::log("Received an empty question batch");
                self.quiz = None;
                self.state = AppState::NoSession;
            }
        }
    }

    pub fn process_ai_response(&mut self, response: AiResponse) {
        match response {
            AiResponse::Questions {
                token,
                questions,
                used_fallback,
            } => {
                if self.state == AppState::Generating && self.pending_generation == Some(token) {
                    self.pending_generation = None;
                    self.start_quiz(questions, used_fallback);
                } else {
                    logger::log(&format!("Dropping stale question batch {}", token));
                }
            }
            AiResponse::SearchResults {
                token,
                question_id,
                results,
            } => {
                if let Some(quiz) = self.quiz.as_mut() {
                    quiz.apply_enrichment(token, question_id, results);
                }
            }
        }
    }

    pub fn cancel_generation(&mut self) {
        if self.state == AppState::Generating {
            self.pending_generation = None;
            self.state = AppState::ContentInput;
        }
    }

    pub fn request_enrichment(&mut self) {
        let Some(quiz) = self.quiz.as_mut() else {
            return;
        };
        let Some(request) = quiz.request_enrichment() else {
            return;
        };

        let sent = match &self.ai_tx {
            Some(tx) => tx
                .send(AiRequest::Search {
                    token: request.token,
                    question_id: request.question_id,
                    query: request.query,
                })
                .is_ok(),
            None => false,
        };
        if !sent {
            quiz.apply_enrichment(request.token, request.question_id, Vec::new());
        }
    }

    pub fn save_mistakes(&mut self) {
        if self.mistakes_saved {
            return;
        }
        let Some(quiz) = self.quiz.as_mut() else {
            return;
        };
        match quiz.export_mistakes(&mut self.library, &mut self.ids) {
            Ok(0) => {}
            Ok(count) => {
                self.mistakes_saved = true;
                self.status = Some(format!("Saved {} flashcards", count));
            }
            Err(e) => {
                logger::log(&format!("Failed to save flashcards: {}", e));
                self.status = Some(format!("Failed to save flashcards: {}", e));
            }
        }
    }

    pub fn retry_loop(&mut self) {
        if let Some(quiz) = self.quiz.as_mut()
            && quiz.retry_loop()
        {
            self.mistakes_saved = false;
            self.status = None;
        }
    }

    pub fn terminate_quiz(&mut self) {
        match self.quiz.take() {
            Some(quiz) => quiz.terminate(self),
            None => self.redirect_to_dashboard(),
        }
    }

    pub fn open_flashcards(&mut self) {
        self.selected_card = 0;
        self.state = AppState::Flashcards;
    }
}

impl Navigator for App {
    fn redirect_to_dashboard(&mut self) {
        self.state = AppState::Menu;
        self.used_fallback = false;
        self.mistakes_saved = false;
        self.status = None;
        self.refresh_notes();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::init_db;
    use crate::quiz::QuizState;

    fn test_config(notes_dir: PathBuf) -> AppConfig {
        AppConfig::from_lookup(move |key| match key {
            "NEURALLY_NOTES_DIR" => Some(notes_dir.display().to_string()),
            _ => None,
        })
    }

    #[test]
    fn test_generation_without_worker_uses_fallback() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = App::new(test_config(dir.path().to_path_buf()), None, None);

        app.start_generation("Cells are the unit of life.".to_string());
        assert_eq!(app.state, AppState::Quiz);
        assert!(app.used_fallback);
        assert_eq!(
            app.quiz.as_ref().unwrap().original_questions(),
            fallback_questions().as_slice()
        );
    }

    #[test]
    fn test_blank_content_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = App::new(test_config(dir.path().to_path_buf()), None, None);
        app.open_content_input();

        app.start_generation("   ".to_string());
        assert_eq!(app.state, AppState::ContentInput);
        assert!(app.status.is_some());
    }

    fn generate_token(rx: &crossbeam_channel::Receiver<AiRequest>) -> u64 {
        match rx.try_recv().unwrap() {
            AiRequest::Generate { token, .. } => token,
            other => panic!("unexpected request {:?}", other),
        }
    }

    fn batch_about(text: &str) -> Vec<Question> {
        let mut questions = fallback_questions();
        questions[0].text = text.to_string();
        questions
    }

    #[test]
    fn test_generation_sends_request_to_worker() {
        let dir = tempfile::tempdir().unwrap();
        let (tx, rx) = crossbeam_channel::unbounded();
        let mut app = App::new(test_config(dir.path().to_path_buf()), None, Some(tx));

        app.start_generation("Enzymes lower activation energy.".to_string());
        assert_eq!(app.state, AppState::Generating);
        match rx.try_recv().unwrap() {
            AiRequest::Generate { content, .. } => {
                assert_eq!(content, "Enzymes lower activation energy.")
            }
            other => panic!("unexpected request {:?}", other),
        }
    }

    #[test]
    fn test_empty_batch_shows_no_session() {
        let dir = tempfile::tempdir().unwrap();
        let (tx, rx) = crossbeam_channel::unbounded();
        let mut app = App::new(test_config(dir.path().to_path_buf()), None, Some(tx));
        app.start_generation("Photosynthesis".to_string());
        let token = generate_token(&rx);

        app.process_ai_response(AiResponse::Questions {
            token,
            questions: Vec::new(),
            used_fallback: false,
        });
        assert_eq!(app.state, AppState::NoSession);
        assert!(app.quiz.is_none());
    }

    #[test]
    fn test_late_questions_are_ignored_after_cancel() {
        let dir = tempfile::tempdir().unwrap();
        let (tx, rx) = crossbeam_channel::unbounded();
        let mut app = App::new(test_config(dir.path().to_path_buf()), None, Some(tx));
        app.start_generation("Photosynthesis".to_string());
        let token = generate_token(&rx);
        app.cancel_generation();

        app.process_ai_response(AiResponse::Questions {
            token,
            questions: fallback_questions(),
            used_fallback: false,
        });
        assert_eq!(app.state, AppState::ContentInput);
        assert!(app.quiz.is_none());
    }

    #[test]
    fn test_cancelled_batch_does_not_replace_resubmitted_one() {
        let dir = tempfile::tempdir().unwrap();
        let (tx, rx) = crossbeam_channel::unbounded();
        let mut app = App::new(test_config(dir.path().to_path_buf()), None, Some(tx));

        app.start_generation("Old notes".to_string());
        let old_token = generate_token(&rx);
        app.cancel_generation();
        app.start_generation("New notes".to_string());
        let new_token = generate_token(&rx);
        assert_ne!(old_token, new_token);

        app.process_ai_response(AiResponse::Questions {
            token: old_token,
            questions: batch_about("Old question"),
            used_fallback: false,
        });
        assert_eq!(app.state, AppState::Generating);
        assert!(app.quiz.is_none());

        app.process_ai_response(AiResponse::Questions {
            token: new_token,
            questions: batch_about("New question"),
            used_fallback: false,
        });
        assert_eq!(app.state, AppState::Quiz);
        let shown = app.quiz.as_ref().unwrap().current_question().unwrap();
        assert_eq!(shown.text, "New question");
    }

    #[test]
    fn test_save_mistakes_persists_and_prepends() {
        let dir = tempfile::tempdir().unwrap();
        let store = SqliteFlashcardStore::new(init_db(&dir.path().join("t.db")).unwrap());
        let mut app = App::new(test_config(dir.path().to_path_buf()), Some(store), None);
        app.start_quiz(fallback_questions(), true);

        // Pick a wrong option for every question.
        while let Some(quiz) = app.quiz.as_mut() {
            if quiz.state() != QuizState::Active {
                break;
            }
            let question = quiz.current_question().unwrap().clone();
            let wrong = question.options.iter().find(|o| !o.is_correct).unwrap();
            quiz.select_option(&wrong.id);
            quiz.submit();
            quiz.next();
        }
        assert_eq!(app.quiz.as_ref().unwrap().state(), QuizState::Summary);

        app.save_mistakes();
        assert!(app.mistakes_saved);
        assert_eq!(app.library.deck.len(), fallback_questions().len());
        // The last question lands first in the deck.
        assert_eq!(
            app.library.deck.cards()[0].front,
            fallback_questions().last().unwrap().text
        );

        app.save_mistakes();
        assert_eq!(app.library.deck.len(), fallback_questions().len());

        let reopened = Library::new(Some(SqliteFlashcardStore::new(
            init_db(&dir.path().join("t.db")).unwrap(),
        )));
        assert_eq!(reopened.deck.len(), fallback_questions().len());
    }

    #[test]
    fn test_enrichment_without_worker_loads_empty() {
        use crate::quiz::EnrichmentStatus;

        let dir = tempfile::tempdir().unwrap();
        let mut app = App::new(test_config(dir.path().to_path_buf()), None, None);
        app.start_quiz(fallback_questions(), true);
        let quiz = app.quiz.as_mut().unwrap();
        quiz.select_option("a");
        quiz.submit();

        app.request_enrichment();
        assert_eq!(
            app.quiz.as_ref().unwrap().enrichment(),
            &EnrichmentStatus::Loaded(Vec::new())
        );
    }

    #[test]
    fn test_terminate_returns_to_menu() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = App::new(test_config(dir.path().to_path_buf()), None, None);
        app.start_quiz(fallback_questions(), true);

        app.terminate_quiz();
        assert_eq!(app.state, AppState::Menu);
        assert!(app.quiz.is_none());
    }

    #[test]
    fn test_open_selected_note_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("photosynthesis.md"), "Light reactions.").unwrap();
        let mut app = App::new(test_config(dir.path().to_path_buf()), None, None);
        assert_eq!(app.menu_len(), 2);

        app.selected_menu_index = 1;
        app.open_selected_note();
        assert_eq!(app.source_title, "photosynthesis");
        assert_eq!(app.state, AppState::Quiz);
    }
}
