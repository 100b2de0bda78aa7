use crate::app::App;
use crate::sources::note_title;
use crate::ui::help_line;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::Line,
    widgets::{Block, Borders, List, ListItem, Paragraph},
    Frame,
};

const WRITE_CONTENT_ENTRY: &str = "✎ Write or paste study content";

pub fn draw_menu(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(5),
            Constraint::Length(1),
            Constraint::Length(4),
        ])
        .split(f.area());

    let title = Paragraph::new("Neurally - Active Recall")
        .style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(title, chunks[0]);

    let entries = std::iter::once(WRITE_CONTENT_ENTRY.to_string())
        .chain(app.note_files.iter().map(|path| note_title(path)));
    let items: Vec<ListItem> = entries
        .enumerate()
        .map(|(i, name)| {
            let style = if i == app.selected_menu_index {
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };
            ListItem::new(name).style(style)
        })
        .collect();

    let notes_title = format!("Study Material ({})", app.config.notes_dir.display());
    let list = List::new(items).block(Block::default().borders(Borders::ALL).title(notes_title));
    f.render_widget(list, chunks[1]);

    if let Some(status) = &app.status {
        let status = Paragraph::new(status.as_str()).style(Style::default().fg(Color::Yellow));
        f.render_widget(status, chunks[2]);
    }

    let footer_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(35), Constraint::Percentage(65)])
        .split(chunks[3]);

    let ai_enabled = app.config.ai_enabled;
    let ai_status_content = if ai_enabled {
        vec![
            Line::from("AI: Enabled"),
            Line::from(format!("Model: {}", app.config.model.model)),
        ]
    } else {
        vec![
            Line::from("AI: Disabled (offline questions)"),
            Line::from("Set OPENROUTER_API_KEY"),
        ]
    };
    let ai_status = Paragraph::new(ai_status_content)
        .style(
            Style::default()
                .fg(if ai_enabled { Color::Green } else { Color::Yellow })
                .add_modifier(Modifier::BOLD),
        )
        .block(Block::default().borders(Borders::ALL).title("AI Status"));
    f.render_widget(ai_status, footer_chunks[0]);

    let deck_line = Line::from(format!("{} flashcards in deck", app.library.deck.len()));
    let help = Paragraph::new(vec![
        help_line(&[
            ("↑/↓", " Navigate  "),
            ("Enter", " Start Quiz  "),
            ("f", " Flashcards  "),
            ("q", " Quit"),
        ]),
        deck_line,
    ])
    .alignment(Alignment::Center)
    .block(Block::default().borders(Borders::ALL));
    f.render_widget(help, footer_chunks[1]);
}
