use crate::config::RenderConfig;
use crate::core::Commit;
use chrono::{Local, TimeZone};
use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

const ELLIPSIS: &str = "...";

/// Display width of a string in terminal cells
pub fn display_width(text: &str) -> usize {
    UnicodeWidthStr::width(text)
}

/// Shorten text to `max_width` cells, ending in "..." when cut.
/// Never splits a grapheme.
pub fn truncate_with_ellipsis(text: &str, max_width: usize) -> String {
    if display_width(text) <= max_width {
        return text.to_string();
    }

    let budget = max_width.saturating_sub(ELLIPSIS.len());
    let mut result = String::new();
    let mut current_width = 0;

    for grapheme in text.graphemes(true) {
        let grapheme_width = UnicodeWidthStr::width(grapheme);
        if current_width + grapheme_width > budget {
            break;
        }
        result.push_str(grapheme);
        current_width += grapheme_width;
    }

    result.push_str(ELLIPSIS);
    result
}

/// Formats the one-line summary printed next to a commit
pub struct SummaryFormatter<'a> {
    config: &'a RenderConfig,
}

impl<'a> SummaryFormatter<'a> {
    pub fn new(config: &'a RenderConfig) -> Self {
        Self { config }
    }

    /// `<hash8> <message> <time>[ ( label, label )]`
    pub fn format(&self, commit: &Commit) -> String {
        let message = truncate_with_ellipsis(&commit.message, self.config.message_width);
        let time = self.format_time(commit.timestamp);
        let mut summary = format!("{} {} {}", commit.short_hash(), message, time);

        if !commit.branch_labels.is_empty() {
            summary.push_str(&format!(" ( {} )", commit.branch_labels.join(", ")));
        }
        summary
    }

    fn format_time(&self, timestamp: i64) -> String {
        Local
            .timestamp_opt(timestamp, 0)
            .single()
            .map(|time| time.format(&self.config.date_format).to_string())
            .unwrap_or_default()
    }
}
