use super::glyphs::{chars, lane_color, RESET};
use super::text::SummaryFormatter;
use crate::config::RenderConfig;
use crate::core::{short_hash, GraphNode};
use crate::error::{GraphError, Result};
use crate::layout::Layout;
use std::collections::HashMap;

/// A cell in the rendered grid
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    pub glyph: char,
    /// Lane whose color the cell is drawn in
    pub lane: usize,
}

impl Cell {
    pub fn new(glyph: char, lane: usize) -> Self {
        Self { glyph, lane }
    }

    pub fn empty() -> Self {
        Self::new(chars::SPACE, 0)
    }

    fn is_blank_or_vertical(&self) -> bool {
        self.glyph == chars::SPACE || self.glyph == chars::VERTICAL
    }
}

/// Character grid addressed as `cells[y][x]`
#[derive(Debug, Clone)]
pub struct Grid {
    cells: Vec<Vec<Cell>>,
}

impl Grid {
    pub fn new(height: usize, width: usize) -> Self {
        Self {
            cells: vec![vec![Cell::empty(); width]; height],
        }
    }

    pub fn height(&self) -> usize {
        self.cells.len()
    }

    pub fn width(&self) -> usize {
        self.cells.first().map_or(0, Vec::len)
    }

    pub fn get(&self, y: usize, x: usize) -> Cell {
        self.cells
            .get(y)
            .and_then(|row| row.get(x))
            .copied()
            .unwrap_or_else(Cell::empty)
    }

    pub fn set(&mut self, y: usize, x: usize, cell: Cell) {
        if let Some(slot) = self.cells.get_mut(y).and_then(|row| row.get_mut(x)) {
            *slot = cell;
        }
    }

    pub fn rows(&self) -> impl Iterator<Item = &[Cell]> {
        self.cells.iter().map(Vec::as_slice)
    }

    /// Glyphs of one grid row, no color
    pub fn row_text(&self, y: usize) -> String {
        self.cells
            .get(y)
            .map(|row| row.iter().map(|cell| cell.glyph).collect())
            .unwrap_or_default()
    }
}

/// One horizontal routing segment
struct Run {
    y: usize,
    x_left: usize,
    left_lane: usize,
    x_right: usize,
    right_lane: usize,
    corner: char,
    tee: char,
}

/// Paints a finished layout onto a grid and serializes it
pub struct GridRenderer<'a> {
    config: &'a RenderConfig,
}

impl<'a> GridRenderer<'a> {
    pub fn new(config: &'a RenderConfig) -> Self {
        Self { config }
    }

    /// Render the layout to text, one line per grid row.
    pub fn render(&self, layout: &Layout) -> Result<String> {
        self.config.validate()?;
        if layout.graph.is_empty() {
            return Ok(String::new());
        }

        let (grid, summaries) = self.paint(layout)?;
        Ok(self.serialize(&grid, &summaries))
    }

    /// Draw every node and edge. Returns the grid and the summary text for
    /// each grid row holding a real commit.
    pub fn paint(&self, layout: &Layout) -> Result<(Grid, HashMap<usize, String>)> {
        let x_spacing = self.config.x_spacing;
        let y_spacing = self.config.y_spacing;
        let max_column = layout.context.max_column.max(layout.graph.max_column());
        let row_count = layout
            .context
            .row_count
            .max(layout.graph.nodes.values().map(|n| n.row() + 1).max().unwrap_or(0));

        let mut grid = Grid::new(row_count * y_spacing + 1, max_column * x_spacing + 1);
        let mut summaries = HashMap::new();
        let formatter = SummaryFormatter::new(self.config);

        for node in layout.graph.by_row() {
            let glyph = match node {
                GraphNode::Routing(_) => chars::VERTICAL,
                GraphNode::Commit(commit) if commit.is_merge() => chars::MERGE_COMMIT,
                GraphNode::Commit(_) => chars::COMMIT,
            };
            grid.set(node.row() * y_spacing, node.column() * x_spacing, Cell::new(glyph, node.column()));

            if let GraphNode::Commit(commit) = node {
                summaries.insert(commit.row * y_spacing, formatter.format(commit));
            }

            for (parent_no, parent_hash) in node.parents().iter().enumerate() {
                let Some(parent) = layout.graph.get(parent_hash) else {
                    continue;
                };
                tracing::debug!("{} -> {}", short_hash(node.hash()), short_hash(parent.hash()));
                self.draw_edge(&mut grid, node, parent, parent_no)?;
            }
        }

        Ok((grid, summaries))
    }

    fn draw_edge(&self, grid: &mut Grid, child: &GraphNode, parent: &GraphNode, parent_no: usize) -> Result<()> {
        if parent.row() < child.row() {
            return Err(GraphError::MalformedAncestry {
                child: child.hash().to_string(),
                parent: parent.hash().to_string(),
                child_row: child.row(),
                parent_row: parent.row(),
            });
        }

        let x_spacing = self.config.x_spacing;
        let y_spacing = self.config.y_spacing;
        let y_start = child.row() * y_spacing;
        let y_end = parent.row() * y_spacing;
        let child_x = child.column() * x_spacing;
        let parent_x = parent.column() * x_spacing;

        let (x_down, lane) = if parent.column() > child.column() {
            /* merge to the right

               ○
               ├───╮
               │   │
               │   ●
            */
            self.draw_run(grid, Run {
                y: y_start + 1,
                x_left: child_x,
                left_lane: child.column(),
                x_right: parent_x,
                right_lane: parent.column(),
                corner: chars::CORNER_DOWN,
                tee: chars::TEE_DOWN,
            });
            (parent_x, parent.column())
        } else if parent.column() < child.column() && (!child.is_merge() || parent_no == 0) {
            /* branch off to the right

               │   ●
               │   │
               ├───╯
               ●
            */
            self.draw_run(grid, Run {
                y: y_end.saturating_sub(1),
                x_left: parent_x,
                left_lane: parent.column(),
                x_right: child_x,
                right_lane: child.column(),
                corner: chars::CORNER_UP,
                tee: chars::TEE_UP,
            });
            (child_x, child.column())
        } else if parent.column() < child.column() {
            /* merge to the left; the parent's lane carries it down

               │   ○
               ├───┤
               ●   │
            */
            let y = y_start + 1;
            let start = grid.get(y, parent_x);
            let start_glyph = if start.glyph == chars::TEE_LEFT { chars::CROSS } else { chars::TEE_RIGHT };
            grid.set(y, parent_x, Cell::new(start_glyph, parent.column()));
            for x in parent_x + 1..child_x {
                grid.set(y, x, Cell::new(chars::HORIZONTAL, parent.column()));
            }
            let end = grid.get(y, child_x);
            let end_glyph = if end.glyph == chars::TEE_RIGHT { chars::CROSS } else { chars::TEE_LEFT };
            grid.set(y, child_x, Cell::new(end_glyph, child.column()));
            return Ok(());
        } else {
            (child_x, parent.column())
        };

        for y in y_start + 1..y_end {
            if grid.get(y, x_down).glyph == chars::SPACE {
                grid.set(y, x_down, Cell::new(chars::VERTICAL, lane));
            }
        }
        Ok(())
    }

    /// Horizontal run from a left junction to a corner. Corners already on
    /// the way become tees; overlapping runs keep the lower lane's color.
    fn draw_run(&self, grid: &mut Grid, run: Run) {
        let start = grid.get(run.y, run.x_left);
        let start_glyph = if start.glyph == chars::TEE_LEFT { chars::CROSS } else { chars::TEE_RIGHT };
        grid.set(run.y, run.x_left, Cell::new(start_glyph, run.left_lane));

        for x in run.x_left + 1..run.x_right {
            let cell = grid.get(run.y, x);
            let mut next = if cell.is_blank_or_vertical() {
                Cell::new(chars::HORIZONTAL, run.right_lane)
            } else if cell.glyph == run.corner {
                Cell::new(run.tee, cell.lane)
            } else {
                cell
            };
            if run.right_lane < cell.lane {
                next.lane = run.right_lane;
            }
            grid.set(run.y, x, next);
        }

        let end = grid.get(run.y, run.x_right);
        if end.is_blank_or_vertical() {
            grid.set(run.y, run.x_right, Cell::new(run.corner, run.right_lane));
        } else if end.glyph == chars::HORIZONTAL {
            grid.set(run.y, run.x_right, Cell::new(run.tee, run.right_lane));
        }
    }

    fn serialize(&self, grid: &Grid, summaries: &HashMap<usize, String>) -> String {
        let mut result = String::new();
        let gap = " ".repeat(self.config.summary_gap);

        for (y, row) in grid.rows().enumerate() {
            for cell in row {
                if self.config.color {
                    result.push_str(&lane_color(cell.lane).to_ansi());
                    result.push(cell.glyph);
                    result.push_str(RESET);
                } else {
                    result.push(cell.glyph);
                }
            }
            if let Some(summary) = summaries.get(&y) {
                result.push_str(&gap);
                result.push_str(summary);
            }
            result.push('\n');
        }
        result
    }
}
