//! Falling-block board and pieces
//!
//! Cells are `u8`: `0` is empty, `1..=7` identifies the shape a block came from (and so
//! its color).

use glam::IVec2;
use serde::{Deserialize, Serialize};

pub type Cell = u8;

pub const EMPTY: Cell = 0;

/// Number of distinct shapes
pub const SHAPE_COUNT: usize = 7;

/// Immutable piece templates (I, O, S, Z, T, L, J). Rows that are entirely empty are
/// trimmed off the top and bottom when a piece is spawned.
pub const TEMPLATES: [&[&[Cell]]; SHAPE_COUNT] = [
    &[&[0, 0, 0, 0], &[1, 1, 1, 1], &[0, 0, 0, 0], &[0, 0, 0, 0]],
    &[&[2, 2], &[2, 2]],
    &[&[0, 3, 3], &[3, 3, 0], &[0, 0, 0]],
    &[&[4, 4, 0], &[0, 4, 4], &[0, 0, 0]],
    &[&[0, 5, 0], &[5, 5, 5], &[0, 0, 0]],
    &[&[0, 0, 6], &[6, 6, 6], &[0, 0, 0]],
    &[&[7, 0, 0], &[7, 7, 7], &[0, 0, 0]],
];

/// A piece matrix. Never aliases a template; rotation builds a new piece.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Piece {
    rows: Vec<Vec<Cell>>,
}

impl Piece {
    /// Build from raw rows. All rows must have the same length.
    pub fn new(rows: Vec<Vec<Cell>>) -> Self {
        debug_assert!(!rows.is_empty());
        debug_assert!(rows.iter().all(|r| r.len() == rows[0].len()));
        Self { rows }
    }

    /// Structural clone of a template with empty leading/trailing rows trimmed
    pub fn from_template(template: &[&[Cell]]) -> Self {
        let occupied = |row: &&[Cell]| row.iter().any(|&c| c != EMPTY);
        let first = template.iter().position(occupied).unwrap_or(0);
        let last = template.iter().rposition(occupied).unwrap_or(first);

        Self::new(template[first..=last].iter().map(|row| row.to_vec()).collect())
    }

    /// Piece for shape `index` (0-based into [`TEMPLATES`])
    pub fn shape(index: usize) -> Self {
        Self::from_template(TEMPLATES[index % SHAPE_COUNT])
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.rows[0].len()
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.rows.len()
    }

    pub fn rows(&self) -> &[Vec<Cell>] {
        &self.rows
    }

    /// Occupied cells as (offset, value)
    pub fn blocks(&self) -> impl Iterator<Item = (IVec2, Cell)> + '_ {
        self.rows.iter().enumerate().flat_map(|(y, row)| {
            row.iter()
                .enumerate()
                .filter(|(_, c)| **c != EMPTY)
                .map(move |(x, &c)| (IVec2::new(x as i32, y as i32), c))
        })
    }

    /// 90° clockwise rotation: `rotated[j][h - 1 - i] = rows[i][j]`
    pub fn rotated_cw(&self) -> Self {
        let (h, w) = (self.height(), self.width());
        let mut rotated = vec![vec![EMPTY; h]; w];
        for (i, row) in self.rows.iter().enumerate() {
            for (j, &cell) in row.iter().enumerate() {
                rotated[j][h - 1 - i] = cell;
            }
        }
        Self::new(rotated)
    }
}

/// Fixed-size board of settled blocks
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grid {
    width: usize,
    height: usize,
    /// Row-major, `height * width` cells
    cells: Vec<Cell>,
}

impl Grid {
    pub fn new(width: usize, height: usize) -> Self {
        debug_assert!(width > 0 && height > 0);
        Self {
            width,
            height,
            cells: vec![EMPTY; width * height],
        }
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Cell at (x, y), or `None` off the board
    pub fn get(&self, x: i32, y: i32) -> Option<Cell> {
        if x < 0 || y < 0 || x as usize >= self.width || y as usize >= self.height {
            return None;
        }
        Some(self.cells[y as usize * self.width + x as usize])
    }

    pub fn set(&mut self, x: usize, y: usize, cell: Cell) {
        debug_assert!(x < self.width && y < self.height);
        debug_assert!(cell as usize <= SHAPE_COUNT);
        self.cells[y * self.width + x] = cell;
    }

    pub fn row(&self, y: usize) -> &[Cell] {
        &self.cells[y * self.width..(y + 1) * self.width]
    }

    pub fn is_row_full(&self, y: usize) -> bool {
        self.row(y).iter().all(|&c| c != EMPTY)
    }

    /// Number of occupied cells
    pub fn filled(&self) -> usize {
        self.cells.iter().filter(|&&c| c != EMPTY).count()
    }

    /// Does `piece` at `origin` leave the board (sides or bottom) or overlap a block?
    ///
    /// Cells above the top edge are allowed so rotations near the ceiling work.
    pub fn collides(&self, piece: &Piece, origin: IVec2) -> bool {
        piece.blocks().any(|(offset, _)| {
            let p = origin + offset;
            if p.x < 0 || p.x >= self.width as i32 || p.y >= self.height as i32 {
                return true;
            }
            p.y >= 0 && self.get(p.x, p.y) != Some(EMPTY)
        })
    }

    /// Write the piece's blocks into the board. Cells outside the board are dropped.
    pub fn merge(&mut self, piece: &Piece, origin: IVec2) {
        for (offset, cell) in piece.blocks() {
            let p = origin + offset;
            if self.get(p.x, p.y).is_some() {
                self.set(p.x as usize, p.y as usize, cell);
            }
        }
    }

    /// Remove every full row, shifting the rows above down. Returns the count removed.
    ///
    /// Scans bottom-to-top and re-examines the same row after a removal, since the row
    /// above has just moved into it.
    pub fn clear_lines(&mut self) -> u32 {
        let mut removed = 0;
        let mut y = self.height;
        while y > 0 {
            let row = y - 1;
            if self.is_row_full(row) {
                let start = row * self.width;
                self.cells.drain(start..start + self.width);
                self.cells
                    .splice(0..0, std::iter::repeat_n(EMPTY, self.width));
                removed += 1;
            } else {
                y -= 1;
            }
        }
        debug_assert_eq!(self.cells.len(), self.width * self.height);
        removed
    }
}
