//! Scrollable terminal view over already-rendered graph text.

pub mod app;
pub mod lines;

pub use app::Viewer;
pub use lines::{split_lines, GraphLine};

use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    layout::{Constraint, Direction, Layout},
    style::{Color, Style},
    text::Line,
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame, Terminal,
};
use std::io;
use std::time::Duration;

/// Run the viewer until the user quits. `details` supplies the side pane.
pub fn run<F>(rendered: &str, title: &str, details: F) -> Result<()>
where
    F: FnMut(&str) -> Result<String>,
{
    let mut terminal = setup_terminal()?;

    let viewer = Viewer::new(split_lines(rendered));
    let res = event_loop(&mut terminal, viewer, title, details);

    restore_terminal(&mut terminal)?;

    res
}

fn event_loop<B, F>(terminal: &mut Terminal<B>, mut viewer: Viewer, title: &str, mut details: F) -> Result<()>
where
    B: Backend,
    F: FnMut(&str) -> Result<String>,
{
    loop {
        terminal.draw(|frame| draw(frame, &mut viewer, title, &mut details))?;

        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    viewer.handle_key(key);
                }
            }
        }

        if viewer.should_quit() {
            return Ok(());
        }
    }
}

fn draw<F>(frame: &mut Frame, viewer: &mut Viewer, title: &str, details: &mut F)
where
    F: FnMut(&str) -> Result<String>,
{
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(1)])
        .split(frame.size());
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(rows[0]);

    viewer.resize(columns[0].height as usize);

    let selected = viewer.selected_line();
    let visible: Vec<Line> = viewer
        .lines()
        .iter()
        .enumerate()
        .skip(viewer.offset())
        .take(columns[0].height as usize)
        .map(|(idx, line)| line.to_line(Some(idx) == selected))
        .collect();
    frame.render_widget(Paragraph::new(visible), columns[0]);

    let text = viewer.details(|hash| details(hash));
    let pane = Paragraph::new(text)
        .block(Block::default().borders(Borders::LEFT).title(" details "))
        .wrap(Wrap { trim: false });
    frame.render_widget(pane, columns[1]);

    let status = format!(
        " {} | {} commits | {} ",
        title,
        viewer.commit_count(),
        viewer.current_hash().unwrap_or("-")
    );
    frame.render_widget(
        Paragraph::new(status).style(Style::default().bg(Color::DarkGray).fg(Color::White)),
        rows[1],
    );
}

fn setup_terminal() -> Result<Terminal<CrosstermBackend<io::Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    Ok(Terminal::new(backend)?)
}

fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}
