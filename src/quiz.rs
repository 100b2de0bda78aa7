use crate::deck::{CardIdGenerator, FlashcardSink};
use crate::error::{QuizError, Result};
use crate::logger;
use crate::models::{Flashcard, Question, SearchResult};
use crate::utils::now;
use std::collections::BTreeSet;
use std::sync::atomic::{AtomicU64, Ordering};

/// Tag given to exported cards whose question carries no topic.
pub const DEFAULT_TAG: &str = "REVIEW";

// Shared across sessions so a response issued for a discarded session can
// never match a request from its successor.
static NEXT_SEARCH_TOKEN: AtomicU64 = AtomicU64::new(1);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuizState {
    Active,
    Summary,
    Completed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Evaluation {
    Correct,
    Incorrect,
}

impl Evaluation {
    /// Unknown option ids and questions without a correct option both
    /// evaluate as `Incorrect`.
    pub fn of(question: &Question, option_id: &str) -> Self {
        match question.option(option_id) {
            Some(option) if option.is_correct => Evaluation::Correct,
            _ => Evaluation::Incorrect,
        }
    }
}

/// Receives control when a session is terminated.
pub trait Navigator {
    fn redirect_to_dashboard(&mut self);
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnrichmentStatus {
    Idle,
    Pending { token: u64 },
    Loaded(Vec<SearchResult>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    pub token: u64,
    pub question_id: u32,
    pub query: String,
}

/// Active-recall quiz over one question batch, with retry loops scoped to the
/// previous pass's mistakes.
#[derive(Debug)]
pub struct QuizSession {
    original: Vec<Question>,
    // Positions into `original` making up the current pass.
    current: Vec<usize>,
    wrong_question_ids: BTreeSet<u32>,
    // Mistakes of the current summary already accepted by a sink.
    exported_question_ids: BTreeSet<u32>,
    current_index: usize,
    selected_option_id: Option<String>,
    is_answered: bool,
    last_evaluation: Option<Evaluation>,
    state: QuizState,
    loop_count: u32,
    enrichment: EnrichmentStatus,
}

impl QuizSession {
    pub fn new(batch: Vec<Question>) -> std::result::Result<Self, QuizError> {
        if batch.is_empty() {
            return Err(QuizError::EmptyBatch);
        }

        logger::log(&format!("Starting quiz session with {} questions", batch.len()));
        let current = (0..batch.len()).collect();
        Ok(Self {
            original: batch,
            current,
            wrong_question_ids: BTreeSet::new(),
            exported_question_ids: BTreeSet::new(),
            current_index: 0,
            selected_option_id: None,
            is_answered: false,
            last_evaluation: None,
            state: QuizState::Active,
            loop_count: 0,
            enrichment: EnrichmentStatus::Idle,
        })
    }

    pub fn state(&self) -> QuizState {
        self.state
    }

    pub fn loop_count(&self) -> u32 {
        self.loop_count
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn pass_len(&self) -> usize {
        self.current.len()
    }

    pub fn original_questions(&self) -> &[Question] {
        &self.original
    }

    pub fn current_questions(&self) -> Vec<&Question> {
        self.current.iter().map(|&i| &self.original[i]).collect()
    }

    /// The question on screen; `None` once the pass is over.
    pub fn current_question(&self) -> Option<&Question> {
        if self.state != QuizState::Active {
            return None;
        }
        self.current
            .get(self.current_index)
            .map(|&i| &self.original[i])
    }

    pub fn wrong_question_ids(&self) -> &BTreeSet<u32> {
        &self.wrong_question_ids
    }

    pub fn selected_option_id(&self) -> Option<&str> {
        self.selected_option_id.as_deref()
    }

    pub fn is_answered(&self) -> bool {
        self.is_answered
    }

    pub fn last_evaluation(&self) -> Option<Evaluation> {
        self.last_evaluation
    }

    pub fn enrichment(&self) -> &EnrichmentStatus {
        &self.enrichment
    }

    pub fn select_option(&mut self, option_id: &str) -> bool {
        if self.state != QuizState::Active || self.is_answered {
            return false;
        }
        self.selected_option_id = Some(option_id.to_string());
        true
    }

    /// Selects the option at `position` within the current question.
    pub fn select_option_at(&mut self, position: usize) -> bool {
        let option_id = match self
            .current_question()
            .and_then(|q| q.options.get(position))
        {
            Some(option) => option.id.clone(),
            None => return false,
        };
        self.select_option(&option_id)
    }

    pub fn submit(&mut self) -> Option<Evaluation> {
        if self.state != QuizState::Active || self.is_answered {
            return None;
        }
        let option_id = self.selected_option_id.clone()?;
        let question = self.current_question()?;
        let question_id = question.id;
        let evaluation = Evaluation::of(question, &option_id);

        self.is_answered = true;
        self.last_evaluation = Some(evaluation);
        if evaluation == Evaluation::Incorrect {
            self.wrong_question_ids.insert(question_id);
        }
        logger::log(&format!(
            "Question {} answered with '{}': {:?}",
            question_id, option_id, evaluation
        ));
        Some(evaluation)
    }

    pub fn next(&mut self) -> bool {
        if self.state != QuizState::Active || !self.is_answered {
            return false;
        }
        self.selected_option_id = None;
        self.is_answered = false;
        self.last_evaluation = None;
        self.enrichment = EnrichmentStatus::Idle;

        if self.current_index + 1 < self.current.len() {
            self.current_index += 1;
        } else if self.wrong_question_ids.is_empty() {
            self.state = QuizState::Completed;
            logger::log(&format!("Pass completed after {} loops", self.loop_count));
        } else {
            self.state = QuizState::Summary;
            logger::log(&format!(
                "Pass finished with {} mistakes",
                self.wrong_question_ids.len()
            ));
        }
        true
    }

    /// Starts a new pass over the questions missed in the last one, drawn from
    /// the original batch in its original order.
    pub fn retry_loop(&mut self) -> bool {
        if self.state != QuizState::Summary {
            return false;
        }
        let retry: Vec<usize> = self
            .original
            .iter()
            .enumerate()
            .filter(|(_, q)| self.wrong_question_ids.contains(&q.id))
            .map(|(i, _)| i)
            .collect();
        if retry.is_empty() {
            return false;
        }

        self.current = retry;
        self.wrong_question_ids.clear();
        self.exported_question_ids.clear();
        self.current_index = 0;
        self.selected_option_id = None;
        self.is_answered = false;
        self.last_evaluation = None;
        self.enrichment = EnrichmentStatus::Idle;
        self.loop_count += 1;
        self.state = QuizState::Active;
        logger::log(&format!(
            "Retry loop {} over {} questions",
            self.loop_count,
            self.current.len()
        ));
        true
    }

    fn missed_questions(&self) -> impl Iterator<Item = &Question> {
        let in_summary = self.state == QuizState::Summary;
        self.original
            .iter()
            .filter(move |q| in_summary && self.wrong_question_ids.contains(&q.id))
    }

    /// Cards for every question missed in the last pass. Empty outside
    /// `Summary`.
    pub fn mistake_cards(&self, ids: &mut dyn CardIdGenerator) -> Vec<Flashcard> {
        let created_at = now();
        self.missed_questions()
            .map(|q| card_for(q, ids.next_id(), created_at))
            .collect()
    }

    /// Hands the missed questions to `sink`. Cards the sink already accepted
    /// during this summary are skipped, so calling again after a failure only
    /// writes the remainder.
    pub fn export_mistakes(
        &mut self,
        sink: &mut dyn FlashcardSink,
        ids: &mut dyn CardIdGenerator,
    ) -> Result<usize> {
        let created_at = now();
        let pending: Vec<(u32, Flashcard)> = self
            .missed_questions()
            .filter(|q| !self.exported_question_ids.contains(&q.id))
            .map(|q| (q.id, card_for(q, ids.next_id(), created_at)))
            .collect();

        let mut count = 0;
        for (question_id, card) in pending {
            if let Err(e) = sink.add_card(card) {
                logger::log(&format!(
                    "Export stopped after {} cards at question {}: {}",
                    count, question_id, e
                ));
                return Err(e);
            }
            self.exported_question_ids.insert(question_id);
            count += 1;
        }
        if count > 0 {
            logger::log(&format!("Exported {} mistakes to flashcards", count));
        }
        Ok(count)
    }

    pub fn terminate(self, navigator: &mut dyn Navigator) {
        logger::log(&format!(
            "Terminating quiz session in {:?} after {} loops",
            self.state, self.loop_count
        ));
        navigator.redirect_to_dashboard();
    }

    /// Issues a search for the answered question on screen. Only one request
    /// is made per question view.
    pub fn request_enrichment(&mut self) -> Option<SearchRequest> {
        if !self.is_answered || self.enrichment != EnrichmentStatus::Idle {
            return None;
        }
        let question = self.current_question()?;
        let request = SearchRequest {
            token: NEXT_SEARCH_TOKEN.fetch_add(1, Ordering::Relaxed),
            question_id: question.id,
            query: question.text.clone(),
        };
        self.enrichment = EnrichmentStatus::Pending {
            token: request.token,
        };
        Some(request)
    }

    /// Applies search results if they answer the pending request for the
    /// question on screen. Returns false when the response is stale.
    pub fn apply_enrichment(
        &mut self,
        token: u64,
        question_id: u32,
        results: Vec<SearchResult>,
    ) -> bool {
        let on_screen = self.current_question().map(|q| q.id);
        if self.enrichment != (EnrichmentStatus::Pending { token }) || on_screen != Some(question_id)
        {
            logger::log(&format!(
                "Dropping stale search response {} for question {}",
                token, question_id
            ));
            return false;
        }
        self.enrichment = EnrichmentStatus::Loaded(results);
        true
    }
}

fn card_for(question: &Question, id: u64, created_at: u64) -> Flashcard {
    Flashcard {
        id,
        front: question.text.clone(),
        back: question.rationale.clone(),
        tag: if question.topic_tag.trim().is_empty() {
            DEFAULT_TAG.to_string()
        } else {
            question.topic_tag.clone()
        },
        created_at,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deck::{Deck, SequentialIds};
    use crate::models::AnswerOption;

    fn question(id: u32, correct_id: &str) -> Question {
        Question {
            id,
            text: format!("Question {}", id),
            options: ["a", "b", "c"]
                .iter()
                .map(|o| AnswerOption {
                    id: o.to_string(),
                    text: format!("Option {}", o),
                    is_correct: *o == correct_id,
                })
                .collect(),
            rationale: format!("Rationale {}", id),
            topic_tag: "Biology".to_string(),
        }
    }

    fn answer(session: &mut QuizSession, option_id: &str) -> Option<Evaluation> {
        session.select_option(option_id);
        let evaluation = session.submit();
        session.next();
        evaluation
    }

    struct RecordingNavigator {
        redirected: bool,
    }

    impl Navigator for RecordingNavigator {
        fn redirect_to_dashboard(&mut self) {
            self.redirected = true;
        }
    }

    #[test]
    fn test_all_correct_completes() {
        let mut session =
            QuizSession::new(vec![question(1, "a"), question(2, "b"), question(3, "c")]).unwrap();
        answer(&mut session, "a");
        answer(&mut session, "b");
        assert_eq!(session.state(), QuizState::Active);
        answer(&mut session, "c");

        assert_eq!(session.state(), QuizState::Completed);
        assert!(session.wrong_question_ids().is_empty());
        assert!(session.current_question().is_none());
    }

    #[test]
    fn test_mistakes_lead_to_summary() {
        let batch = (1..=5).map(|id| question(id, "a")).collect();
        let mut session = QuizSession::new(batch).unwrap();
        for option in ["a", "b", "a", "c", "b"] {
            answer(&mut session, option);
        }

        assert_eq!(session.state(), QuizState::Summary);
        assert_eq!(session.wrong_question_ids().len(), 3);
    }

    #[test]
    fn test_retry_loop_keeps_original_order() {
        let batch = (1..=5).map(|id| question(id, "a")).collect();
        let mut session = QuizSession::new(batch).unwrap();
        for option in ["a", "b", "a", "a", "b"] {
            answer(&mut session, option);
        }
        assert_eq!(
            session.wrong_question_ids().iter().copied().collect::<Vec<_>>(),
            vec![2, 5]
        );

        assert!(session.retry_loop());
        let ids: Vec<u32> = session.current_questions().iter().map(|q| q.id).collect();
        assert_eq!(ids, vec![2, 5]);
        assert_eq!(session.loop_count(), 1);
        assert!(session.wrong_question_ids().is_empty());
        assert_eq!(session.current_index(), 0);
        assert_eq!(session.state(), QuizState::Active);
    }

    #[test]
    fn test_second_retry_filters_latest_mistakes_only() {
        let batch = (1..=4).map(|id| question(id, "a")).collect();
        let mut session = QuizSession::new(batch).unwrap();
        for option in ["b", "b", "b", "a"] {
            answer(&mut session, option);
        }
        session.retry_loop();
        // Second pass over 1, 2, 3: only question 3 missed again.
        for option in ["a", "a", "b"] {
            answer(&mut session, option);
        }
        assert_eq!(session.state(), QuizState::Summary);

        session.retry_loop();
        let ids: Vec<u32> = session.current_questions().iter().map(|q| q.id).collect();
        assert_eq!(ids, vec![3]);
        assert_eq!(session.loop_count(), 2);
    }

    #[test]
    fn test_submit_twice_does_not_double_count() {
        let mut session = QuizSession::new(vec![question(1, "a"), question(2, "a")]).unwrap();
        session.select_option("b");
        assert_eq!(session.submit(), Some(Evaluation::Incorrect));
        let before = session.wrong_question_ids().clone();

        assert_eq!(session.submit(), None);
        assert_eq!(session.wrong_question_ids(), &before);
        assert_eq!(session.wrong_question_ids().len(), 1);
    }

    #[test]
    fn test_submit_without_selection_is_noop() {
        let mut session = QuizSession::new(vec![question(1, "a")]).unwrap();
        assert_eq!(session.submit(), None);
        assert!(!session.is_answered());
    }

    #[test]
    fn test_next_before_submit_is_noop() {
        let mut session = QuizSession::new(vec![question(1, "a"), question(2, "a")]).unwrap();
        session.select_option("a");

        assert!(!session.next());
        assert_eq!(session.current_index(), 0);
        assert!(!session.is_answered());
        assert_eq!(session.state(), QuizState::Active);
        assert_eq!(session.selected_option_id(), Some("a"));
    }

    #[test]
    fn test_selection_locked_after_submit() {
        let mut session = QuizSession::new(vec![question(1, "a")]).unwrap();
        session.select_option("b");
        session.select_option("a");
        assert_eq!(session.selected_option_id(), Some("a"));
        session.submit();

        assert!(!session.select_option("c"));
        assert_eq!(session.selected_option_id(), Some("a"));
    }

    #[test]
    fn test_question_without_correct_option_is_incorrect() {
        let broken = question(1, "none");
        assert!(broken.correct_option().is_none());
        let mut session = QuizSession::new(vec![broken]).unwrap();

        session.select_option("a");
        assert_eq!(session.submit(), Some(Evaluation::Incorrect));
        assert!(session.wrong_question_ids().contains(&1));
    }

    #[test]
    fn test_unknown_option_is_incorrect() {
        let q = question(1, "a");
        assert_eq!(Evaluation::of(&q, "missing"), Evaluation::Incorrect);
        assert_eq!(Evaluation::of(&q, "a"), Evaluation::Correct);
    }

    #[test]
    fn test_empty_batch_never_becomes_active() {
        let result = QuizSession::new(Vec::new());
        assert_eq!(result.unwrap_err(), QuizError::EmptyBatch);
    }

    #[test]
    fn test_retry_outside_summary_is_noop() {
        let mut session = QuizSession::new(vec![question(1, "a")]).unwrap();
        assert!(!session.retry_loop());
        answer(&mut session, "a");
        assert_eq!(session.state(), QuizState::Completed);
        assert!(!session.retry_loop());
        assert_eq!(session.loop_count(), 0);
    }

    #[test]
    fn test_export_mistakes_to_flashcards() {
        let batch = (1..=3).map(|id| question(id, "a")).collect();
        let mut session = QuizSession::new(batch).unwrap();
        for option in ["b", "a", "c"] {
            answer(&mut session, option);
        }

        let mut deck = Deck::new();
        let mut ids = SequentialIds::starting_at(100);
        let exported = session.export_mistakes(&mut deck, &mut ids).unwrap();

        assert_eq!(exported, 2);
        let mut fronts: Vec<&str> = deck.cards().iter().map(|c| c.front.as_str()).collect();
        fronts.sort();
        assert_eq!(fronts, vec!["Question 1", "Question 3"]);
        let backs: Vec<&str> = deck.cards().iter().map(|c| c.back.as_str()).collect();
        assert!(backs.contains(&"Rationale 1"));
        assert!(backs.contains(&"Rationale 3"));
        assert_eq!(session.state(), QuizState::Summary);
    }

    #[test]
    fn test_export_uses_review_tag_when_topic_missing() {
        let mut untagged = question(1, "a");
        untagged.topic_tag = String::new();
        let mut session = QuizSession::new(vec![untagged]).unwrap();
        answer(&mut session, "b");

        let cards = session.mistake_cards(&mut SequentialIds::starting_at(1));
        assert_eq!(cards.len(), 1);
        assert_eq!(cards[0].tag, DEFAULT_TAG);
    }

    /// Accepts cards until `fail_at` is reached, then errors once.
    struct FlakySink {
        cards: Vec<Flashcard>,
        fail_at: Option<usize>,
    }

    impl FlashcardSink for FlakySink {
        fn add_card(&mut self, card: Flashcard) -> Result<()> {
            if self.fail_at == Some(self.cards.len()) {
                self.fail_at = None;
                return Err(std::io::Error::other("disk full").into());
            }
            self.cards.push(card);
            Ok(())
        }
    }

    #[test]
    fn test_export_retry_after_failure_writes_each_mistake_once() {
        let batch = (1..=5).map(|id| question(id, "a")).collect();
        let mut session = QuizSession::new(batch).unwrap();
        for _ in 0..5 {
            answer(&mut session, "b");
        }
        assert_eq!(session.state(), QuizState::Summary);

        let mut sink = FlakySink {
            cards: Vec::new(),
            fail_at: Some(1),
        };
        let mut ids = SequentialIds::starting_at(1);
        assert!(session.export_mistakes(&mut sink, &mut ids).is_err());
        assert_eq!(sink.cards.len(), 1);

        assert_eq!(session.export_mistakes(&mut sink, &mut ids).unwrap(), 4);
        let fronts: Vec<&str> = sink.cards.iter().map(|c| c.front.as_str()).collect();
        assert_eq!(
            fronts,
            vec!["Question 1", "Question 2", "Question 3", "Question 4", "Question 5"]
        );

        assert_eq!(session.export_mistakes(&mut sink, &mut ids).unwrap(), 0);
        assert_eq!(sink.cards.len(), 5);
    }

    #[test]
    fn test_retry_loop_rearms_export() {
        let mut session = QuizSession::new(vec![question(1, "a"), question(2, "a")]).unwrap();
        answer(&mut session, "b");
        answer(&mut session, "b");

        let mut deck = Deck::new();
        let mut ids = SequentialIds::starting_at(1);
        assert_eq!(session.export_mistakes(&mut deck, &mut ids).unwrap(), 2);

        assert!(session.retry_loop());
        answer(&mut session, "b");
        answer(&mut session, "a");
        assert_eq!(session.export_mistakes(&mut deck, &mut ids).unwrap(), 1);
        assert_eq!(deck.len(), 3);
    }

    #[test]
    fn test_export_outside_summary_is_empty() {
        let mut session = QuizSession::new(vec![question(1, "a"), question(2, "a")]).unwrap();
        answer(&mut session, "b");
        assert_eq!(session.state(), QuizState::Active);

        let mut deck = Deck::new();
        let exported = session
            .export_mistakes(&mut deck, &mut SequentialIds::starting_at(1))
            .unwrap();
        assert_eq!(exported, 0);
        assert!(deck.cards().is_empty());
    }

    #[test]
    fn test_three_question_scenario() {
        let mut session =
            QuizSession::new(vec![question(1, "a"), question(2, "b"), question(3, "a")]).unwrap();
        assert_eq!(answer(&mut session, "a"), Some(Evaluation::Correct));
        assert_eq!(answer(&mut session, "a"), Some(Evaluation::Incorrect));
        assert_eq!(answer(&mut session, "a"), Some(Evaluation::Correct));

        assert_eq!(session.state(), QuizState::Summary);
        assert_eq!(
            session.wrong_question_ids().iter().copied().collect::<Vec<_>>(),
            vec![2]
        );

        assert!(session.retry_loop());
        let ids: Vec<u32> = session.current_questions().iter().map(|q| q.id).collect();
        assert_eq!(ids, vec![2]);
        assert_eq!(session.loop_count(), 1);
        assert_eq!(session.state(), QuizState::Active);

        answer(&mut session, "b");
        assert_eq!(session.state(), QuizState::Completed);
    }

    #[test]
    fn test_terminate_redirects() {
        let session = QuizSession::new(vec![question(1, "a")]).unwrap();
        let mut navigator = RecordingNavigator { redirected: false };
        session.terminate(&mut navigator);
        assert!(navigator.redirected);
    }

    #[test]
    fn test_enrichment_requires_answer_and_is_one_shot() {
        let mut session = QuizSession::new(vec![question(1, "a"), question(2, "a")]).unwrap();
        assert!(session.request_enrichment().is_none());

        session.select_option("a");
        session.submit();
        let request = session.request_enrichment().unwrap();
        assert_eq!(request.question_id, 1);
        assert_eq!(request.query, "Question 1");
        assert!(session.request_enrichment().is_none());

        let results = vec![SearchResult {
            title: "Cells".to_string(),
            url: "https://example.org/cells".to_string(),
        }];
        assert!(session.apply_enrichment(request.token, 1, results.clone()));
        assert_eq!(session.enrichment(), &EnrichmentStatus::Loaded(results));
        assert!(session.request_enrichment().is_none());
    }

    #[test]
    fn test_stale_enrichment_is_dropped_after_next() {
        let mut session = QuizSession::new(vec![question(1, "a"), question(2, "a")]).unwrap();
        session.select_option("a");
        session.submit();
        let request = session.request_enrichment().unwrap();
        session.next();

        assert!(!session.apply_enrichment(request.token, request.question_id, Vec::new()));
        assert_eq!(session.enrichment(), &EnrichmentStatus::Idle);

        session.select_option("a");
        session.submit();
        let second = session.request_enrichment().unwrap();
        assert_ne!(second.token, request.token);
        // Old token for the new question id is still rejected.
        assert!(!session.apply_enrichment(request.token, 2, Vec::new()));
        assert!(session.apply_enrichment(second.token, 2, Vec::new()));
        assert_eq!(session.enrichment(), &EnrichmentStatus::Loaded(Vec::new()));
    }

    #[test]
    fn test_select_option_at_position() {
        let mut session = QuizSession::new(vec![question(1, "b")]).unwrap();
        assert!(session.select_option_at(1));
        assert_eq!(session.selected_option_id(), Some("b"));
        assert!(!session.select_option_at(7));
        assert_eq!(session.submit(), Some(Evaluation::Correct));
    }
}
