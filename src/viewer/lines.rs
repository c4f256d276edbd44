use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use regex::Regex;
use std::sync::OnceLock;

/// One line of rendered output, split into graph prefix and summary
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GraphLine {
    /// Graph cells, still carrying the renderer's colour sequences
    pub graph: String,
    pub hash: Option<String>,
    pub body: String,
}

impl GraphLine {
    pub fn is_commit(&self) -> bool {
        self.hash.is_some()
    }

    pub fn to_line(&self, selected: bool) -> Line<'static> {
        let mut spans = ansi_spans(&self.graph);
        if let Some(hash) = &self.hash {
            let style = if selected {
                highlight_style()
            } else {
                Style::default()
            };
            spans.push(Span::raw(" "));
            spans.push(Span::styled(hash.clone(), style));
            spans.push(Span::raw(" "));
            spans.push(Span::raw(self.body.clone()));
        }
        Line::from(spans)
    }
}

pub fn highlight_style() -> Style {
    Style::default()
        .fg(Color::Indexed(229))
        .bg(Color::Indexed(57))
        .add_modifier(Modifier::BOLD)
}

fn summary_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^(.+?) ([a-f0-9]{8}) (.+)$").unwrap())
}

fn sgr_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\x1b\[([0-9;]*)m").unwrap())
}

/// Split rendered output into lines; lines without a summary are filler
pub fn split_lines(rendered: &str) -> Vec<GraphLine> {
    rendered
        .lines()
        .map(|line| match summary_pattern().captures(line) {
            Some(caps) => GraphLine {
                graph: caps[1].to_string(),
                hash: Some(caps[2].to_string()),
                body: caps[3].to_string(),
            },
            None => GraphLine {
                graph: line.to_string(),
                hash: None,
                body: String::new(),
            },
        })
        .collect()
}

/// Convert truecolor foreground sequences into styled spans
pub fn ansi_spans(text: &str) -> Vec<Span<'static>> {
    let mut spans = Vec::new();
    let mut style = Style::default();
    let mut last = 0;

    for caps in sgr_pattern().captures_iter(text) {
        let Some(whole) = caps.get(0) else {
            continue;
        };
        if whole.start() > last {
            spans.push(Span::styled(text[last..whole.start()].to_string(), style));
        }
        style = apply_sgr(style, &caps[1]);
        last = whole.end();
    }
    if last < text.len() {
        spans.push(Span::styled(text[last..].to_string(), style));
    }

    spans
}

fn apply_sgr(style: Style, params: &str) -> Style {
    let codes: Vec<u8> = params.split(';').filter_map(|code| code.parse().ok()).collect();
    match codes.as_slice() {
        [] | [0] => Style::default(),
        [38, 2, r, g, b] => style.fg(Color::Rgb(*r, *g, *b)),
        _ => style,
    }
}
