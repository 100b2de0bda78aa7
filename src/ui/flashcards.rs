use crate::app::App;
use crate::ui::help_line;
use crate::utils::{format_card_date, truncate_string};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};

pub fn draw_flashcards(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(5),
            Constraint::Length(3),
        ])
        .split(f.area());

    let cards = app.library.deck.cards();
    let title = Paragraph::new(format!("Flashcards ({})", cards.len()))
        .style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(title, chunks[0]);

    if cards.is_empty() {
        let empty = Paragraph::new("No flashcards yet. Save mistakes from a quiz summary.")
            .style(Style::default().fg(Color::DarkGray))
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL));
        f.render_widget(empty, chunks[1]);
    } else {
        let body = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
            .split(chunks[1]);

        let items: Vec<ListItem> = cards
            .iter()
            .map(|card| {
                ListItem::new(Line::from(vec![
                    Span::styled(
                        format!("[{}] ", card.tag),
                        Style::default().fg(Color::Magenta),
                    ),
                    Span::styled(
                        format!("{} ", format_card_date(card.created_at)),
                        Style::default().fg(Color::DarkGray),
                    ),
                    Span::from(truncate_string(&card.front, 40)),
                ]))
            })
            .collect();
        let list = List::new(items)
            .block(Block::default().borders(Borders::ALL).title("Deck"))
            .highlight_style(
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            )
            .highlight_symbol("› ");
        let mut state = ListState::default();
        let selected = app.selected_card.min(cards.len() - 1);
        state.select(Some(selected));
        f.render_stateful_widget(list, body[0], &mut state);

        let card = &cards[selected];
        let mut detail = Text::default();
        detail.push_line(Line::styled(
            "Front",
            Style::default().add_modifier(Modifier::BOLD),
        ));
        detail.push_line(Line::from(card.front.clone()));
        detail.push_line(Line::from(""));
        detail.push_line(Line::styled(
            "Back",
            Style::default().add_modifier(Modifier::BOLD),
        ));
        for line in card.back.lines() {
            detail.push_line(Line::from(line.to_string()));
        }
        let detail = Paragraph::new(detail)
            .wrap(Wrap { trim: false })
            .block(Block::default().borders(Borders::ALL).title("Card"));
        f.render_widget(detail, body[1]);
    }

    let help = Paragraph::new(help_line(&[
        ("↑/↓", " Browse  "),
        ("Esc", " Back to Menu  "),
        ("Ctrl+C", " Exit App"),
    ]))
    .alignment(Alignment::Center)
    .block(Block::default().borders(Borders::ALL));
    f.render_widget(help, chunks[2]);
}
