use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::collections::HashMap;

use super::lines::GraphLine;

/// Cursor and scroll state over rendered graph lines
pub struct Viewer {
    lines: Vec<GraphLine>,
    /// Indices into `lines` that carry a commit
    commit_lines: Vec<usize>,
    cursor: usize,
    offset: usize,
    page: usize,
    details: HashMap<String, String>,
    should_quit: bool,
}

impl Viewer {
    pub fn new(lines: Vec<GraphLine>) -> Self {
        let commit_lines = lines
            .iter()
            .enumerate()
            .filter(|(_, line)| line.is_commit())
            .map(|(idx, _)| idx)
            .collect();

        Self {
            lines,
            commit_lines,
            cursor: 0,
            offset: 0,
            page: 1,
            details: HashMap::new(),
            should_quit: false,
        }
    }

    pub fn lines(&self) -> &[GraphLine] {
        &self.lines
    }

    pub fn commit_count(&self) -> usize {
        self.commit_lines.len()
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// Line index of the selected commit
    pub fn selected_line(&self) -> Option<usize> {
        self.commit_lines.get(self.cursor).copied()
    }

    pub fn current_hash(&self) -> Option<&str> {
        self.selected_line()
            .and_then(|idx| self.lines[idx].hash.as_deref())
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Detail text for the selected commit, loaded once per hash
    pub fn details<F>(&mut self, load: F) -> String
    where
        F: FnOnce(&str) -> Result<String>,
    {
        let Some(hash) = self.current_hash().map(str::to_string) else {
            return String::new();
        };
        self.details
            .entry(hash)
            .or_insert_with_key(|hash| load(hash).unwrap_or_else(|err| format!("{:#}", err)))
            .clone()
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => self.should_quit = true,
            KeyCode::Char('q') | KeyCode::Esc => self.should_quit = true,
            KeyCode::Char('j') | KeyCode::Down => self.move_down(1),
            KeyCode::Char('k') | KeyCode::Up => self.move_up(1),
            KeyCode::PageDown => self.move_down(self.page),
            KeyCode::PageUp => self.move_up(self.page),
            KeyCode::Char('g') | KeyCode::Home => self.cursor = 0,
            KeyCode::Char('G') | KeyCode::End => self.cursor = self.commit_lines.len().saturating_sub(1),
            _ => {}
        }
        self.scroll_to_cursor();
    }

    fn move_down(&mut self, n: usize) {
        let last = self.commit_lines.len().saturating_sub(1);
        self.cursor = (self.cursor + n).min(last);
    }

    fn move_up(&mut self, n: usize) {
        self.cursor = self.cursor.saturating_sub(n);
    }

    /// Record the visible height and keep the selection on screen
    pub fn resize(&mut self, height: usize) {
        self.page = height.max(1);
        self.scroll_to_cursor();
    }

    fn scroll_to_cursor(&mut self) {
        let Some(line) = self.selected_line() else {
            return;
        };
        if line < self.offset {
            self.offset = line;
        } else if line >= self.offset + self.page {
            self.offset = line + 1 - self.page;
        }
    }
}
