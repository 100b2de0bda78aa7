use crate::app::App;
use crate::quiz::QuizSession;
use crate::ui::help_line;
use crate::ui::layout::calculate_summary_chunks;
use crate::utils::truncate_string;
use ratatui::{
    layout::Alignment,
    style::{Color, Modifier, Style},
    text::{Line, Text},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

fn draw_header(f: &mut Frame, area: ratatui::layout::Rect, text: String, color: Color) {
    let header = Paragraph::new(text)
        .style(Style::default().fg(color).add_modifier(Modifier::BOLD))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(header, area);
}

pub fn draw_summary(f: &mut Frame, app: &App, quiz: &QuizSession) {
    let layout = calculate_summary_chunks(f.area());

    draw_header(
        f,
        layout.header_area,
        format!("Loop Summary - {}", app.source_title),
        Color::Cyan,
    );

    let wrong = quiz.wrong_question_ids();
    let mut text = Text::default();
    text.push_line(Line::styled(
        format!(
            "Loop {}: {} / {} missed",
            quiz.loop_count() + 1,
            wrong.len(),
            quiz.pass_len()
        ),
        Style::default().add_modifier(Modifier::BOLD),
    ));
    text.push_line(Line::from(""));
    text.push_line(Line::from("Missed questions:"));
    text.push_line(Line::from(""));

    // Original batch order, not answer order.
    for question in quiz
        .original_questions()
        .iter()
        .filter(|q| wrong.contains(&q.id))
    {
        text.push_line(Line::styled(
            format!("✗ {}", truncate_string(&question.text, 80)),
            Style::default().fg(Color::Red),
        ));
        if let Some(answer) = question.correct_option() {
            text.push_line(Line::from(format!(
                "   Answer: {}",
                truncate_string(&answer.text, 76)
            )));
        }
    }

    let content = Paragraph::new(text)
        .wrap(Wrap { trim: false })
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(content, layout.content_area);

    if let Some(status) = &app.status {
        f.render_widget(
            Paragraph::new(status.as_str()).style(Style::default().fg(Color::Yellow)),
            layout.status_area,
        );
    }

    let help = Paragraph::new(help_line(&[
        ("r", " Retry Loop  "),
        ("s", " Save to Flashcards  "),
        ("m", " Finish"),
    ]))
    .alignment(Alignment::Center)
    .block(Block::default().borders(Borders::ALL));
    f.render_widget(help, layout.footer_area);
}

pub fn draw_completed(f: &mut Frame, app: &App, quiz: &QuizSession) {
    let layout = calculate_summary_chunks(f.area());

    draw_header(
        f,
        layout.header_area,
        format!("Mastered - {}", app.source_title),
        Color::Green,
    );

    let loops = match quiz.loop_count() {
        0 => "on the first pass".to_string(),
        1 => "after 1 retry loop".to_string(),
        n => format!("after {} retry loops", n),
    };
    let mut text = Text::default();
    text.push_line(Line::styled(
        "Every question answered correctly!",
        Style::default()
            .fg(Color::Green)
            .add_modifier(Modifier::BOLD),
    ));
    text.push_line(Line::from(""));
    text.push_line(Line::from(format!(
        "{} questions mastered {}.",
        quiz.original_questions().len(),
        loops
    )));

    let content = Paragraph::new(text)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(content, layout.content_area);

    if let Some(status) = &app.status {
        f.render_widget(
            Paragraph::new(status.as_str()).style(Style::default().fg(Color::Yellow)),
            layout.status_area,
        );
    }

    let help = Paragraph::new(help_line(&[("Enter", " Back to Menu")]))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(help, layout.footer_area);
}
