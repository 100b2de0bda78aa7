use crate::app::App;
use crate::ui::help_line;
use crate::utils::{cursor_line_col, hard_wrap};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::Line,
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

pub fn draw_content_input(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(5),
            Constraint::Length(1),
            Constraint::Length(3),
        ])
        .split(f.area());

    let title = Paragraph::new("Study Content")
        .style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(title, chunks[0]);

    let input_area = chunks[1];
    let text_width = input_area.width.saturating_sub(2) as usize;
    let visible_height = input_area.height.saturating_sub(2) as usize;
    let (cursor_line, cursor_col) =
        cursor_line_col(&app.content_input, app.cursor_position, text_width);
    // Keep the cursor line on screen.
    let scroll = (cursor_line + 1).saturating_sub(visible_height);

    let lines: Vec<Line> = if app.content_input.is_empty() {
        vec![Line::styled(
            "[Type or paste the material to be quizzed on...]",
            Style::default().fg(Color::DarkGray),
        )]
    } else {
        hard_wrap(&app.content_input, text_width)
            .into_iter()
            .map(Line::from)
            .collect()
    };
    let input = Paragraph::new(lines)
        .scroll((scroll as u16, 0))
        .block(Block::default().borders(Borders::ALL).title("Your Notes"));
    f.render_widget(input, input_area);

    f.set_cursor_position((
        input_area.x + 1 + cursor_col as u16,
        input_area.y + 1 + cursor_line.saturating_sub(scroll) as u16,
    ));

    if let Some(status) = &app.status {
        let status = Paragraph::new(status.as_str()).style(Style::default().fg(Color::Yellow));
        f.render_widget(status, chunks[2]);
    }

    let help = Paragraph::new(help_line(&[
        ("Enter", " Generate Quiz  "),
        ("Alt+Enter", " New Line  "),
        ("Esc", " Back  "),
        ("Ctrl+C", " Exit App"),
    ]))
    .alignment(Alignment::Center)
    .block(Block::default().borders(Borders::ALL));
    f.render_widget(help, chunks[3]);
}

fn draw_centered_message(f: &mut Frame, title: &str, message: Vec<Line>, hint: Line<'static>) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(5)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(3),
            Constraint::Length(3),
        ])
        .split(f.area());

    let title = Paragraph::new(title.to_string())
        .style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(title, chunks[0]);

    let body = Paragraph::new(message)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(body, chunks[1]);

    let help = Paragraph::new(hint)
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(help, chunks[2]);
}

pub fn draw_generating(f: &mut Frame, app: &App) {
    let message = vec![
        Line::from(""),
        Line::from(format!("Generating questions from {}...", app.source_title)),
        Line::from(""),
        Line::styled(
            format!("Model: {}", app.config.model.model),
            Style::default().fg(Color::DarkGray),
        ),
    ];
    draw_centered_message(f, "Please Wait", message, help_line(&[("Esc", " Cancel")]));
}

pub fn draw_no_session(f: &mut Frame) {
    let message = vec![
        Line::from(""),
        Line::from("No active quiz session."),
        Line::from("The material did not produce any questions."),
    ];
    draw_centered_message(
        f,
        "No Questions",
        message,
        help_line(&[("Enter", " Back to Content Input")]),
    );
}
