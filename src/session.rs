use crate::app::App;
use crate::models::AppState;
use crate::quiz::QuizState;
use crate::utils::byte_index;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

pub fn handle_key(app: &mut App, key: KeyEvent) {
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        app.should_quit = true;
        return;
    }

    match app.state {
        AppState::Menu => handle_menu_input(app, key),
        AppState::ContentInput => handle_content_input(app, key),
        AppState::Generating => {
            if key.code == KeyCode::Esc {
                app.cancel_generation();
            }
        }
        AppState::Quiz => handle_quiz_input(app, key),
        AppState::QuizQuitConfirm => match key.code {
            KeyCode::Char('y') => app.terminate_quiz(),
            KeyCode::Char('n') | KeyCode::Esc => app.state = AppState::Quiz,
            _ => {}
        },
        // The only way out is back to content input.
        AppState::NoSession => {
            if matches!(key.code, KeyCode::Enter | KeyCode::Esc) {
                app.open_content_input();
            }
        }
        AppState::Flashcards => handle_flashcards_input(app, key),
    }
}

fn handle_menu_input(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Up => {
            app.selected_menu_index = app.selected_menu_index.saturating_sub(1);
        }
        KeyCode::Down => {
            if app.selected_menu_index < app.menu_len().saturating_sub(1) {
                app.selected_menu_index += 1;
            }
        }
        KeyCode::Enter => app.open_selected_note(),
        KeyCode::Char('f') => app.open_flashcards(),
        KeyCode::Char('q') => app.should_quit = true,
        _ => {}
    }
}

pub fn handle_content_input(app: &mut App, key: KeyEvent) {
    let char_count = app.content_input.chars().count();
    app.cursor_position = app.cursor_position.min(char_count);

    match key.code {
        KeyCode::Esc => app.state = AppState::Menu,
        KeyCode::Enter if key.modifiers.contains(KeyModifiers::ALT) => {
            let at = byte_index(&app.content_input, app.cursor_position);
            app.content_input.insert(at, '\n');
            app.cursor_position += 1;
        }
        KeyCode::Enter => {
            app.source_title = "Typed notes".to_string();
            let content = app.content_input.clone();
            app.start_generation(content);
        }
        KeyCode::Left => {
            app.cursor_position = app.cursor_position.saturating_sub(1);
        }
        KeyCode::Right => {
            if app.cursor_position < char_count {
                app.cursor_position += 1;
            }
        }
        KeyCode::Home => app.cursor_position = 0,
        KeyCode::End => app.cursor_position = char_count,
        KeyCode::Backspace => {
            if app.cursor_position > 0 {
                let at = byte_index(&app.content_input, app.cursor_position - 1);
                app.content_input.remove(at);
                app.cursor_position -= 1;
            }
        }
        KeyCode::Delete => {
            if app.cursor_position < char_count {
                let at = byte_index(&app.content_input, app.cursor_position);
                app.content_input.remove(at);
            }
        }
        KeyCode::Char(c) => {
            let at = byte_index(&app.content_input, app.cursor_position);
            app.content_input.insert(at, c);
            app.cursor_position += 1;
        }
        _ => {}
    }
}

pub fn handle_quiz_input(app: &mut App, key: KeyEvent) {
    let Some(state) = app.quiz.as_ref().map(|q| q.state()) else {
        app.state = AppState::Menu;
        return;
    };

    match state {
        QuizState::Active => handle_active_input(app, key),
        QuizState::Summary => match key.code {
            KeyCode::Char('r') => app.retry_loop(),
            KeyCode::Char('s') => app.save_mistakes(),
            KeyCode::Char('m') | KeyCode::Esc => app.terminate_quiz(),
            _ => {}
        },
        QuizState::Completed => {
            if matches!(key.code, KeyCode::Enter | KeyCode::Char('m') | KeyCode::Esc) {
                app.terminate_quiz();
            }
        }
    }
}

fn handle_active_input(app: &mut App, key: KeyEvent) {
    if key.code == KeyCode::Esc {
        app.state = AppState::QuizQuitConfirm;
        return;
    }
    if key.code == KeyCode::Char('/') {
        app.request_enrichment();
        return;
    }

    let Some(quiz) = app.quiz.as_mut() else {
        return;
    };
    let option_count = quiz.current_question().map_or(0, |q| q.options.len());
    let selected = quiz.selected_option_id().and_then(|id| {
        quiz.current_question()
            .and_then(|q| q.options.iter().position(|o| o.id == id))
    });

    match key.code {
        KeyCode::Up => {
            let position = selected.map_or(0, |p| p.saturating_sub(1));
            quiz.select_option_at(position);
        }
        KeyCode::Down => {
            let position = selected.map_or(0, |p| (p + 1).min(option_count.saturating_sub(1)));
            quiz.select_option_at(position);
        }
        KeyCode::Char(c @ '1'..='9') => {
            quiz.select_option_at(c as usize - '1' as usize);
        }
        KeyCode::Char(c @ 'a'..='h') => {
            quiz.select_option_at(c as usize - 'a' as usize);
        }
        KeyCode::Enter => {
            if quiz.is_answered() {
                quiz.next();
            } else {
                quiz.submit();
            }
        }
        _ => {}
    }
}

fn handle_flashcards_input(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Up => app.selected_card = app.selected_card.saturating_sub(1),
        KeyCode::Down => {
            if app.selected_card < app.library.deck.len().saturating_sub(1) {
                app.selected_card += 1;
            }
        }
        KeyCode::Esc | KeyCode::Char('m') => app.state = AppState::Menu,
        _ => {}
    }
}
