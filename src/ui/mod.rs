pub mod layout;
mod flashcards;
mod input;
mod menu;
mod quiz;
mod summary;

use crate::app::App;
use crate::models::AppState;
use crate::quiz::QuizState;
use ratatui::{
    style::{Color, Modifier, Style},
    text::{Line, Span},
    Frame,
};

pub use flashcards::draw_flashcards;
pub use input::{draw_content_input, draw_generating, draw_no_session};
pub use layout::{calculate_quiz_chunks, calculate_summary_chunks};
pub use menu::draw_menu;
pub use quiz::{draw_quit_confirmation, draw_quiz};
pub use summary::{draw_completed, draw_summary};

pub fn draw(f: &mut Frame, app: &App) {
    match app.state {
        AppState::Menu => draw_menu(f, app),
        AppState::ContentInput => draw_content_input(f, app),
        AppState::Generating => draw_generating(f, app),
        AppState::NoSession => draw_no_session(f),
        AppState::Flashcards => draw_flashcards(f, app),
        AppState::QuizQuitConfirm => draw_quit_confirmation(f),
        AppState::Quiz => match &app.quiz {
            Some(quiz) => match quiz.state() {
                QuizState::Active => draw_quiz(f, app, quiz),
                QuizState::Summary => draw_summary(f, app, quiz),
                QuizState::Completed => draw_completed(f, app, quiz),
            },
            None => draw_no_session(f),
        },
    }
}

/// One "key label" pair for a help bar.
pub(crate) fn key_hint(key: &'static str, label: &'static str) -> [Span<'static>; 2] {
    [
        Span::styled(
            key,
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::from(label),
    ]
}

pub(crate) fn help_line(hints: &[(&'static str, &'static str)]) -> Line<'static> {
    Line::from(
        hints
            .iter()
            .flat_map(|(key, label)| key_hint(key, label))
            .collect::<Vec<_>>(),
    )
}
