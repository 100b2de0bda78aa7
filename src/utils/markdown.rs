use ratatui::{
    style::{Modifier, Style},
    text::{Line, Span},
};
use regex::Regex;
use std::sync::OnceLock;

fn inline_pattern() -> &'static Regex {
    static INLINE: OnceLock<Regex> = OnceLock::new();
    INLINE.get_or_init(|| {
        Regex::new(r"\*\*(?P<bold>.+?)\*\*|`(?P<code>[^`]+)`|\*(?P<italic>[^*]+)\*")
            .expect("inline markdown pattern is valid")
    })
}

fn numbered_pattern() -> &'static Regex {
    static NUMBERED: OnceLock<Regex> = OnceLock::new();
    NUMBERED.get_or_init(|| {
        Regex::new(r"^(?P<num>\d+)\.\s+(?P<item>.*)$").expect("numbered list pattern is valid")
    })
}

/// Renders rationale markdown: headings, bullet and numbered lists, and
/// inline bold, italic and code.
pub fn render_markdown(content: &str) -> Vec<Line<'static>> {
    content.lines().map(render_line).collect()
}

fn render_line(line: &str) -> Line<'static> {
    let trimmed = line.trim();

    let heading = trimmed.trim_start_matches('#');
    if heading.len() < trimmed.len() && heading.starts_with(' ') {
        return Line::from(Span::styled(
            heading.trim().to_string(),
            Style::default().add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
        ));
    }

    if let Some(item) = trimmed.strip_prefix("- ").or(trimmed.strip_prefix("* ")) {
        let mut spans = vec![Span::from("  • ")];
        spans.extend(parse_inline(item));
        return Line::from(spans);
    }

    if let Some(caps) = numbered_pattern().captures(trimmed) {
        let mut spans = vec![Span::from(format!("  {}. ", &caps["num"]))];
        spans.extend(parse_inline(&caps["item"]));
        return Line::from(spans);
    }

    Line::from(parse_inline(line))
}

fn parse_inline(text: &str) -> Vec<Span<'static>> {
    let mut spans = Vec::new();
    let mut last = 0;

    for caps in inline_pattern().captures_iter(text) {
        let Some(whole) = caps.get(0) else { continue };
        if whole.start() > last {
            spans.push(Span::from(text[last..whole.start()].to_string()));
        }
        let (content, modifier) = if let Some(m) = caps.name("bold") {
            (m.as_str(), Modifier::BOLD)
        } else if let Some(m) = caps.name("code") {
            (m.as_str(), Modifier::DIM)
        } else if let Some(m) = caps.name("italic") {
            (m.as_str(), Modifier::ITALIC)
        } else {
            (whole.as_str(), Modifier::empty())
        };
        spans.push(Span::styled(
            content.to_string(),
            Style::default().add_modifier(modifier),
        ));
        last = whole.end();
    }

    if last < text.len() || spans.is_empty() {
        spans.push(Span::from(text[last..].to_string()));
    }
    spans
}
