//! Canvas painting
//!
//! Each game's scene is painted in full on every repaint, straight from simulation
//! state, through the `DrawSurface` primitives. Nothing here keeps state between frames.

pub mod board;
pub mod course;
pub mod court;

pub use board::paint_board;
pub use course::paint_course;
pub use court::paint_court;

/// Shared colors
pub mod palette {
    /// Dark backdrop behind the board and court
    pub const BACKGROUND: &str = "#1a202c";
    /// Block outlines, launcher, aim line and obstacle borders
    pub const OUTLINE: &str = "#2d3748";
    pub const PADDLE: &str = "#e2e8f0";
    pub const BALL: &str = "#fde047";
    pub const NET: &str = "#4a5568";
    pub const SKY: &str = "#87ceeb";
    pub const GRASS: &str = "#84cc16";
    pub const TARGET: &str = "#ef4444";
    pub const FLAG: &str = "#22c55e";
    pub const POLE: &str = "#ffffff";
    pub const OBSTACLE: &str = "#4a5568";

    /// Block colors by cell value (index 0 is empty and never painted)
    pub const BLOCKS: [&str; 8] = [
        "transparent",
        "#06b6d4",
        "#facc15",
        "#84cc16",
        "#ef4444",
        "#a855f7",
        "#f97316",
        "#3b82f6",
    ];

    pub fn block(cell: u8) -> &'static str {
        BLOCKS[(cell as usize).min(BLOCKS.len() - 1)]
    }
}
