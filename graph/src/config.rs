use crate::error::{GraphError, Result};

/// Settings for rasterizing a layout into text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderConfig {
    /// Grid columns per lane
    pub x_spacing: usize,
    /// Grid rows per commit row
    pub y_spacing: usize,
    /// Maximum message length in the summary, ellipsis included
    pub message_width: usize,
    /// Blank cells between the graph and the summary
    pub summary_gap: usize,
    /// Emit ANSI truecolor sequences
    pub color: bool,
    /// chrono format string for commit times
    pub date_format: String,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            x_spacing: 4,
            y_spacing: 2,
            message_width: 20,
            summary_gap: 8,
            color: true,
            date_format: "%Y-%m-%d %H:%M:%S".to_string(),
        }
    }
}

impl RenderConfig {
    pub fn with_color(mut self, color: bool) -> Self {
        self.color = color;
        self
    }

    pub fn with_message_width(mut self, width: usize) -> Self {
        self.message_width = width;
        self
    }

    /// Routing glyphs need an interstitial row and column between nodes
    pub fn validate(&self) -> Result<()> {
        if self.x_spacing < 2 {
            return Err(GraphError::InvalidConfig(format!(
                "x_spacing must be at least 2, got {}",
                self.x_spacing
            )));
        }
        if self.y_spacing < 2 {
            return Err(GraphError::InvalidConfig(format!(
                "y_spacing must be at least 2, got {}",
                self.y_spacing
            )));
        }
        if self.message_width < 4 {
            return Err(GraphError::InvalidConfig(format!(
                "message_width must be at least 4, got {}",
                self.message_width
            )));
        }
        Ok(())
    }
}
