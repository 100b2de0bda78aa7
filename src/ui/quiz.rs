use crate::app::App;
use crate::quiz::{EnrichmentStatus, Evaluation, QuizSession};
use crate::ui::help_line;
use crate::ui::layout::calculate_quiz_chunks;
use crate::utils::render_markdown;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, List, ListItem, Paragraph, Wrap},
    Frame,
};

pub fn draw_quiz(f: &mut Frame, app: &App, quiz: &QuizSession) {
    let Some(question) = quiz.current_question() else {
        return;
    };
    let layout = calculate_quiz_chunks(f.area(), question.options.len());

    let mut progress = format!(
        "Question {} / {} - {}",
        quiz.current_index() + 1,
        quiz.pass_len(),
        app.source_title
    );
    if quiz.loop_count() > 0 {
        progress.push_str(&format!("  [Retry loop {}]", quiz.loop_count()));
    }
    if app.used_fallback {
        progress.push_str("  (offline questions)");
    }

    let header = Paragraph::new(progress)
        .style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(header, layout.header_area);

    let title = if question.topic_tag.is_empty() {
        "Question".to_string()
    } else {
        format!("Question - {}", question.topic_tag)
    };
    let question_widget = Paragraph::new(question.text.as_str())
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL).title(title));
    f.render_widget(question_widget, layout.question_area);

    let selected = quiz.selected_option_id();
    let items: Vec<ListItem> = question
        .options
        .iter()
        .enumerate()
        .map(|(i, option)| {
            let is_selected = selected == Some(option.id.as_str());
            let marker = match (quiz.is_answered(), option.is_correct, is_selected) {
                (true, true, _) => "✓",
                (true, false, true) => "✗",
                (false, _, true) => "›",
                _ => " ",
            };
            let style = match (quiz.is_answered(), option.is_correct, is_selected) {
                (true, true, _) => Style::default()
                    .fg(Color::Green)
                    .add_modifier(Modifier::BOLD),
                (true, false, true) => Style::default().fg(Color::Red),
                (false, _, true) => Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
                _ => Style::default(),
            };
            ListItem::new(format!("{} {}) {}", marker, i + 1, option.text)).style(style)
        })
        .collect();
    let options = List::new(items).block(Block::default().borders(Borders::ALL).title("Options"));
    f.render_widget(options, layout.options_area);

    let feedback = if quiz.is_answered() {
        feedback_text(quiz, &question.rationale)
    } else {
        Text::styled(
            "Choose an option and press Enter to submit.",
            Style::default().fg(Color::DarkGray),
        )
    };
    let feedback = Paragraph::new(feedback)
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL).title("Feedback"));
    f.render_widget(feedback, layout.feedback_area);

    let help = if quiz.is_answered() {
        help_line(&[
            ("Enter", " Next  "),
            ("/", " Neural Search  "),
            ("Esc", " Quit to Menu  "),
            ("Ctrl+C", " Exit App"),
        ])
    } else {
        help_line(&[
            ("↑/↓ 1-9", " Choose  "),
            ("Enter", " Submit  "),
            ("Esc", " Quit to Menu  "),
            ("Ctrl+C", " Exit App"),
        ])
    };
    let help = Paragraph::new(help)
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(help, layout.help_area);
}

fn feedback_text(quiz: &QuizSession, rationale: &str) -> Text<'static> {
    let mut text = Text::default();
    let verdict = match quiz.last_evaluation() {
        Some(Evaluation::Correct) => Span::styled(
            "Correct!",
            Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD),
        ),
        _ => Span::styled(
            "Incorrect",
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        ),
    };
    text.push_line(Line::from(verdict));

    if !rationale.trim().is_empty() {
        text.push_line(Line::from(""));
        text.push_line(Line::from(Span::styled(
            "Rationale:",
            Style::default().add_modifier(Modifier::BOLD),
        )));
        text.extend(render_markdown(rationale));
    }

    text.push_line(Line::from(""));
    match quiz.enrichment() {
        EnrichmentStatus::Idle => text.push_line(Line::styled(
            "Press / to search for references.",
            Style::default().fg(Color::DarkGray),
        )),
        EnrichmentStatus::Pending { .. } => text.push_line(Line::from("Searching...")),
        EnrichmentStatus::Loaded(results) if results.is_empty() => {
            text.push_line(Line::from("No references found."))
        }
        EnrichmentStatus::Loaded(results) => {
            text.push_line(Line::from(Span::styled(
                "References:",
                Style::default().add_modifier(Modifier::BOLD),
            )));
            for result in results {
                text.push_line(Line::from(format!("• {} - {}", result.title, result.url)));
            }
        }
    }

    text
}

pub fn draw_quit_confirmation(f: &mut Frame) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(5)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(5),
            Constraint::Length(3),
        ])
        .split(f.area());

    let title = Paragraph::new("Quit to Menu")
        .style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(title, chunks[0]);

    let message = Paragraph::new("Abandon this quiz? Progress is not kept.")
        .style(Style::default().fg(Color::White))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(message, chunks[1]);

    let help = Paragraph::new(help_line(&[
        ("y", " Yes (Return to Menu)  "),
        ("n", " No (Continue Quiz)  "),
        ("Ctrl+C", " Exit App"),
    ]))
    .alignment(Alignment::Center)
    .block(Block::default().borders(Borders::ALL));
    f.render_widget(help, chunks[2]);
}
