pub mod glyphs;
pub mod grid;
pub mod text;

pub use glyphs::{chars, lane_color, Rgb, PALETTE, RESET};
pub use grid::{Cell, Grid, GridRenderer};
pub use text::{display_width, truncate_with_ellipsis, SummaryFormatter};

use crate::config::RenderConfig;
use crate::core::CommitSet;
use crate::error::Result;
use crate::layout::layout;

/// Lay out a commit set and render it in one go
pub fn render_commits(commits: CommitSet, config: &RenderConfig) -> Result<String> {
    let layout = layout(commits)?;
    GridRenderer::new(config).render(&layout)
}
