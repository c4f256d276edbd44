/// Box drawing characters for graph rendering
pub mod chars {
    pub const VERTICAL: char = '│';
    pub const HORIZONTAL: char = '─';
    pub const COMMIT: char = '●';
    pub const MERGE_COMMIT: char = '○';

    /// Horizontal run turning down into a lane
    pub const CORNER_DOWN: char = '╮';
    /// Lane coming up into a horizontal run
    pub const CORNER_UP: char = '╯';

    pub const TEE_RIGHT: char = '├';
    pub const TEE_LEFT: char = '┤';
    pub const TEE_DOWN: char = '┬';
    pub const TEE_UP: char = '┴';

    pub const CROSS: char = '┼';
    pub const SPACE: char = ' ';
}

pub const RESET: &str = "\x1b[0m";

/// 24-bit terminal color
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub fn to_ansi(&self) -> String {
        format!("\x1b[38;2;{};{};{}m", self.0, self.1, self.2)
    }
}

/// Pastel palette cycled by lane
pub const PALETTE: [Rgb; 6] = [
    Rgb(255, 182, 193),
    Rgb(173, 216, 230),
    Rgb(255, 223, 170),
    Rgb(199, 214, 189),
    Rgb(188, 143, 143),
    Rgb(221, 160, 221),
];

pub fn lane_color(lane: usize) -> Rgb {
    PALETTE[lane % PALETTE.len()]
}
