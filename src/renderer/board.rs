//! Falling-block board, in cell units (the surface is configured at block scale)

use super::palette;
use crate::platform::DrawSurface;
use crate::sim::{Cell, EMPTY, FallingBlocks, FallingPhase};

const OUTLINE_WIDTH: f32 = 0.05;

fn paint_cell(draw: &mut dyn DrawSurface, x: i32, y: i32, cell: Cell) {
    let (x, y) = (x as f32, y as f32);
    draw.fill_rect(x, y, 1.0, 1.0, palette::block(cell));
    draw.stroke_rect(x, y, 1.0, 1.0, palette::OUTLINE, OUTLINE_WIDTH);
}

pub fn paint_board(draw: &mut dyn DrawSurface, game: &FallingBlocks) {
    let grid = game.grid();
    draw.fill_rect(
        0.0,
        0.0,
        grid.width() as f32,
        grid.height() as f32,
        palette::BACKGROUND,
    );

    for y in 0..grid.height() {
        for (x, &cell) in grid.row(y).iter().enumerate() {
            if cell != EMPTY {
                paint_cell(draw, x as i32, y as i32, cell);
            }
        }
    }

    // The piece that ended the game overlaps the stack; leave it out
    if game.phase() != FallingPhase::GameOver {
        let origin = game.origin();
        for (offset, cell) in game.piece().blocks() {
            let p = origin + offset;
            if p.y >= 0 {
                paint_cell(draw, p.x, p.y, cell);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::headless::{DrawCall, HeadlessCanvas};
    use crate::settings::FallingBlockTuning;

    #[test]
    fn test_paints_background_and_piece() {
        let game = FallingBlocks::new(FallingBlockTuning::default(), 7);
        let mut canvas = HeadlessCanvas::default();
        paint_board(&mut canvas, &game);

        let calls = canvas.take_calls();
        assert_eq!(
            calls[0],
            DrawCall::FillRect {
                x: 0.0,
                y: 0.0,
                w: 10.0,
                h: 20.0,
                color: palette::BACKGROUND.into()
            }
        );
        // Every tetromino has four blocks: fill + outline each
        assert_eq!(calls.len(), 1 + 4 * 2);
    }
}
