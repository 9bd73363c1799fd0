//! Falling-block puzzle simulation
//!
//! `Idle -> Running -> {Paused <-> Running} -> GameOver`, back to `Idle` on reset.
//! Only `Running` accepts drop ticks and piece input. The drop timer itself is owned by
//! the binding in `games::falling_block`; this module only reports when its interval
//! changes.

use glam::IVec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::grid::{Grid, Piece, SHAPE_COUNT};
use crate::consts::LINE_CLEAR_POINTS;
use crate::settings::FallingBlockTuning;

/// Lifecycle phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FallingPhase {
    /// Fresh board, waiting for start
    Idle,
    Running,
    /// State frozen, drop timer cancelled
    Paused,
    /// Spawned piece collided immediately
    GameOver,
}

/// Something that happened during a drop tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FallingEvent {
    /// Active piece moved down one row
    Fell,
    /// Active piece merged into the board; `lines` cleared for `points`
    Locked { lines: u32, points: u32 },
    /// Score crossed a speed boundary; the drop timer should run at this interval
    SpeedUp { interval_ms: u32 },
    GameOver,
}

/// Why a start/pause request was refused
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Refusal {
    AlreadyRunning,
    NotStarted,
    GameIsOver,
}

impl Refusal {
    pub fn message(&self) -> &'static str {
        match self {
            Refusal::AlreadyRunning => "Game already running. Reset maybe?",
            Refusal::NotStarted => "Start the game first!",
            Refusal::GameIsOver => "Game is over. Start a new game.",
        }
    }
}

/// Points for clearing `lines` rows in one pass
pub fn line_clear_points(lines: u32) -> u32 {
    LINE_CLEAR_POINTS[(lines as usize).min(LINE_CLEAR_POINTS.len() - 1)]
}

/// Complete falling-block session
#[derive(Debug, Clone)]
pub struct FallingBlocks {
    tuning: FallingBlockTuning,
    grid: Grid,
    piece: Piece,
    origin: IVec2,
    score: u32,
    drop_interval_ms: u32,
    phase: FallingPhase,
    rng: Pcg32,
}

impl FallingBlocks {
    pub fn new(tuning: FallingBlockTuning, seed: u64) -> Self {
        let mut game = Self {
            grid: Grid::new(tuning.width, tuning.height),
            piece: Piece::shape(0),
            origin: IVec2::ZERO,
            score: 0,
            drop_interval_ms: tuning.initial_interval_ms,
            phase: FallingPhase::Idle,
            rng: Pcg32::seed_from_u64(seed),
            tuning,
        };
        game.spawn();
        game
    }

    /// Replace the session state wholesale with a fresh `Idle` board
    pub fn reset(&mut self) {
        self.grid = Grid::new(self.tuning.width, self.tuning.height);
        self.score = 0;
        self.drop_interval_ms = self.tuning.initial_interval_ms;
        self.phase = FallingPhase::Idle;
        self.spawn();
    }

    /// Start a fresh game from `Idle` or after `GameOver`
    pub fn start(&mut self) -> Result<(), Refusal> {
        match self.phase {
            FallingPhase::Running | FallingPhase::Paused => Err(Refusal::AlreadyRunning),
            FallingPhase::Idle | FallingPhase::GameOver => {
                self.reset();
                self.phase = FallingPhase::Running;
                Ok(())
            }
        }
    }

    /// Flip between `Running` and `Paused`, returning the new phase
    pub fn toggle_pause(&mut self) -> Result<FallingPhase, Refusal> {
        self.phase = match self.phase {
            FallingPhase::Running => FallingPhase::Paused,
            FallingPhase::Paused => FallingPhase::Running,
            FallingPhase::Idle => return Err(Refusal::NotStarted),
            FallingPhase::GameOver => return Err(Refusal::GameIsOver),
        };
        Ok(self.phase)
    }

    /// One drop tick: fall a row, or lock, clear lines and spawn the next piece
    pub fn step(&mut self) -> Vec<FallingEvent> {
        let mut events = Vec::new();
        if self.phase != FallingPhase::Running {
            return events;
        }

        let below = self.origin + IVec2::Y;
        if !self.grid.collides(&self.piece, below) {
            self.origin = below;
            events.push(FallingEvent::Fell);
            return events;
        }

        self.grid.merge(&self.piece, self.origin);
        let lines = self.grid.clear_lines();
        let points = line_clear_points(lines);
        events.push(FallingEvent::Locked { lines, points });

        if points > 0 {
            let before = self.score;
            self.score += points;
            if let Some(interval_ms) = self.ramp_speed(before) {
                events.push(FallingEvent::SpeedUp { interval_ms });
            }
        }

        self.spawn();
        if self.grid.collides(&self.piece, self.origin) {
            self.phase = FallingPhase::GameOver;
            events.push(FallingEvent::GameOver);
            log::info!("Falling blocks over with score {}", self.score);
        }

        events
    }

    /// Soft drop is exactly one drop tick
    pub fn soft_drop(&mut self) -> Vec<FallingEvent> {
        self.step()
    }

    /// Move sideways by `dx` columns unless blocked
    pub fn shift(&mut self, dx: i32) -> bool {
        if self.phase != FallingPhase::Running {
            return false;
        }
        let target = self.origin + IVec2::new(dx, 0);
        if self.grid.collides(&self.piece, target) {
            return false;
        }
        self.origin = target;
        true
    }

    /// Rotate clockwise, kicking sideways +1, -2, +3, ... if the rotated piece collides.
    ///
    /// When the kicks run past the piece's size the piece and origin are left exactly as
    /// they were.
    pub fn rotate(&mut self) -> bool {
        if self.phase != FallingPhase::Running {
            return false;
        }

        let rotated = self.piece.rotated_cw();
        let bound = rotated.width().max(rotated.height()) as i32;
        let mut x = self.origin.x;
        let mut offset = 1;
        while self.grid.collides(&rotated, IVec2::new(x, self.origin.y)) {
            x += offset;
            offset = -(offset + offset.signum());
            if offset.abs() > bound {
                return false;
            }
        }

        self.piece = rotated;
        self.origin.x = x;
        true
    }

    /// Shorten the drop interval if the score crossed a boundary since `before`
    fn ramp_speed(&mut self, before: u32) -> Option<u32> {
        let every = self.tuning.speed_up_every.max(1);
        if self.score / every <= before / every {
            return None;
        }
        let next = self
            .drop_interval_ms
            .saturating_sub(self.tuning.interval_step_ms)
            .max(self.tuning.min_interval_ms);
        if next == self.drop_interval_ms {
            return None;
        }
        self.drop_interval_ms = next;
        Some(next)
    }

    fn spawn(&mut self) {
        self.piece = Piece::shape(self.rng.random_range(0..SHAPE_COUNT));
        let x = (self.grid.width() / 2) as i32 - (self.piece.width() / 2) as i32;
        self.origin = IVec2::new(x, 0);
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn piece(&self) -> &Piece {
        &self.piece
    }

    pub fn origin(&self) -> IVec2 {
        self.origin
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn drop_interval_ms(&self) -> u32 {
        self.drop_interval_ms
    }

    pub fn phase(&self) -> FallingPhase {
        self.phase
    }

    pub fn tuning(&self) -> &FallingBlockTuning {
        &self.tuning
    }

    #[cfg(test)]
    pub(crate) fn place(&mut self, piece: Piece, origin: IVec2) {
        self.piece = piece;
        self.origin = origin;
    }

    #[cfg(test)]
    pub(crate) fn grid_mut(&mut self) -> &mut Grid {
        &mut self.grid
    }

    #[cfg(test)]
    pub(crate) fn set_score(&mut self, score: u32) {
        self.score = score;
    }

    #[cfg(test)]
    pub(crate) fn set_drop_interval(&mut self, ms: u32) {
        self.drop_interval_ms = ms;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn running(seed: u64) -> FallingBlocks {
        let mut game = FallingBlocks::new(FallingBlockTuning::default(), seed);
        game.start().unwrap();
        game
    }

    /// Fill the bottom `rows` rows except column 0, and drop a vertical I into column 0
    fn setup_clear(game: &mut FallingBlocks, rows: usize) {
        let height = game.grid().height();
        for y in height - rows..height {
            for x in 1..game.grid().width() {
                game.grid_mut().set(x, y, 2);
            }
        }
        let vertical_i = Piece::shape(0).rotated_cw();
        game.place(vertical_i, IVec2::new(0, height as i32 - 4));
    }

    #[test]
    fn test_spawn_is_centered_at_top() {
        let game = FallingBlocks::new(FallingBlockTuning::default(), 7);
        let expected_x = 5 - (game.piece().width() / 2) as i32;
        assert_eq!(game.origin(), IVec2::new(expected_x, 0));
        assert_eq!(game.phase(), FallingPhase::Idle);
    }

    #[test]
    fn test_idle_ignores_ticks_and_input() {
        let mut game = FallingBlocks::new(FallingBlockTuning::default(), 1);
        let origin = game.origin();
        assert!(game.step().is_empty());
        assert!(!game.shift(-1));
        assert!(!game.rotate());
        assert_eq!(game.origin(), origin);
    }

    #[test]
    fn test_start_and_pause_transitions() {
        let mut game = FallingBlocks::new(FallingBlockTuning::default(), 1);
        assert_eq!(game.toggle_pause(), Err(Refusal::NotStarted));
        game.start().unwrap();
        assert_eq!(game.start(), Err(Refusal::AlreadyRunning));
        assert_eq!(game.toggle_pause(), Ok(FallingPhase::Paused));
        assert!(game.step().is_empty());
        assert_eq!(game.start(), Err(Refusal::AlreadyRunning));
        assert_eq!(game.toggle_pause(), Ok(FallingPhase::Running));
    }

    #[test]
    fn test_tall_piece_falls_one_row_per_tick() {
        let mut game = running(3);
        let vertical_i = Piece::shape(0).rotated_cw();
        game.place(vertical_i, IVec2::new(5, 0));

        for expected in 1..=16 {
            assert_eq!(game.step(), vec![FallingEvent::Fell]);
            assert_eq!(game.origin().y, expected);
        }
        let events = game.step();
        assert_eq!(events[0], FallingEvent::Locked { lines: 0, points: 0 });
        assert_eq!(game.grid().filled(), 4);
        assert_eq!(game.origin().y, 0);
    }

    #[test]
    fn test_line_clear_score_table() {
        for (rows, expected) in [(1, 100), (2, 300), (3, 500), (4, 800)] {
            let mut game = running(11);
            setup_clear(&mut game, rows);
            let events = game.step();
            assert_eq!(
                events[0],
                FallingEvent::Locked {
                    lines: rows as u32,
                    points: expected
                }
            );
            assert_eq!(game.score(), expected);
        }
    }

    #[test]
    fn test_speed_up_at_exact_boundary() {
        let mut game = running(5);
        game.set_score(400);
        setup_clear(&mut game, 1);
        let events = game.step();
        assert!(events.contains(&FallingEvent::SpeedUp { interval_ms: 950 }));
        assert_eq!(game.score(), 500);
        assert_eq!(game.drop_interval_ms(), 950);
    }

    #[test]
    fn test_speed_up_once_per_pass() {
        let mut game = running(5);
        game.set_score(400);
        setup_clear(&mut game, 4);
        game.step();
        // 400 -> 1200 crosses two boundaries but ramps once
        assert_eq!(game.score(), 1200);
        assert_eq!(game.drop_interval_ms(), 950);
    }

    #[test]
    fn test_no_speed_up_without_crossing() {
        let mut game = running(5);
        game.set_score(500);
        setup_clear(&mut game, 2);
        let events = game.step();
        assert_eq!(game.score(), 800);
        assert!(!events.iter().any(|e| matches!(e, FallingEvent::SpeedUp { .. })));
        assert_eq!(game.drop_interval_ms(), 1000);
    }

    #[test]
    fn test_speed_floor() {
        let mut game = running(5);
        game.set_score(450);
        game.set_drop_interval(120);
        setup_clear(&mut game, 1);
        assert!(game.step().contains(&FallingEvent::SpeedUp { interval_ms: 100 }));

        let mut game = running(5);
        game.set_score(950);
        game.set_drop_interval(100);
        setup_clear(&mut game, 1);
        let events = game.step();
        assert_eq!(game.score(), 1050);
        assert!(!events.iter().any(|e| matches!(e, FallingEvent::SpeedUp { .. })));
        assert_eq!(game.drop_interval_ms(), 100);
    }

    #[test]
    fn test_game_over_when_spawn_collides() {
        let mut game = running(9);
        // Stack everything but the two left columns so nothing clears
        for y in 0..20 {
            for x in 2..10 {
                game.grid_mut().set(x, y, 3);
            }
        }
        game.place(Piece::new(vec![vec![1]]), IVec2::new(0, 19));
        let events = game.step();
        assert_eq!(events.last(), Some(&FallingEvent::GameOver));
        assert_eq!(game.phase(), FallingPhase::GameOver);
        assert!(game.step().is_empty());
        assert_eq!(game.toggle_pause(), Err(Refusal::GameIsOver));

        // Start from game over is a fresh game
        game.start().unwrap();
        assert_eq!(game.grid().filled(), 0);
        assert_eq!(game.score(), 0);
    }

    #[test]
    fn test_shift_rejects_walls() {
        let mut game = running(2);
        game.place(Piece::shape(1), IVec2::new(0, 5));
        assert!(!game.shift(-1));
        assert!(game.shift(1));
        assert_eq!(game.origin(), IVec2::new(1, 5));
    }

    #[test]
    fn test_rotate_kicks_off_right_wall() {
        let mut game = running(2);
        // Vertical I near the right wall; lying flat needs a kick left
        game.place(Piece::shape(0).rotated_cw(), IVec2::new(7, 5));
        assert!(game.rotate());
        assert_eq!(game.piece().width(), 4);
        assert_eq!(game.origin(), IVec2::new(6, 5));
    }

    #[test]
    fn test_rotate_against_wall_can_run_out_of_kicks() {
        let mut game = running(2);
        let vertical_i = Piece::shape(0).rotated_cw();
        game.place(vertical_i.clone(), IVec2::new(9, 5));
        // Kicks try columns 10, 8, 11 and stop before reaching a fit
        assert!(!game.rotate());
        assert_eq!(game.piece(), &vertical_i);
        assert_eq!(game.origin(), IVec2::new(9, 5));
    }

    #[test]
    fn test_rotate_kick_sequence() {
        // +1 is blocked, -2 (net -1) fits
        let mut game = running(2);
        game.place(Piece::shape(0).rotated_cw(), IVec2::new(3, 10));
        game.grid_mut().set(6, 10, 4);
        assert!(game.rotate());
        assert_eq!(game.origin().x, 2);

        // Blocks on both sides exhaust +1, -2, +3
        let mut game = running(2);
        game.place(Piece::shape(0).rotated_cw(), IVec2::new(3, 10));
        game.grid_mut().set(2, 10, 4);
        game.grid_mut().set(6, 10, 4);
        assert!(!game.rotate());
        assert_eq!(game.origin().x, 3);
        assert_eq!(game.piece().height(), 4);
    }

    #[test]
    fn test_rotate_failure_restores_piece() {
        let mut game = running(2);
        let vertical_i = Piece::shape(0).rotated_cw();
        game.place(vertical_i.clone(), IVec2::new(4, 10));
        // A one-column shaft: nothing flat fits
        for y in 0..20 {
            for x in (0..10).filter(|&x| x != 4) {
                game.grid_mut().set(x, y, 6);
            }
        }
        assert!(!game.rotate());
        assert_eq!(game.piece(), &vertical_i);
        assert_eq!(game.origin(), IVec2::new(4, 10));
    }

    proptest! {
        #[test]
        fn prop_rotate_never_corrupts_placement(
            seed in 0u64..1000,
            shape in 0usize..7,
            x in 0i32..10,
            y in 0i32..20,
            blocks in proptest::collection::vec((0usize..10, 0usize..20), 0..120),
        ) {
            let mut game = running(seed);
            let piece = Piece::shape(shape);
            let origin = IVec2::new(
                x % (11 - piece.width() as i32),
                y % (21 - piece.height() as i32),
            );
            for (bx, by) in blocks {
                game.grid_mut().set(bx, by, 1);
            }
            // Keep the starting placement legal
            for (offset, _) in piece.blocks() {
                let p = origin + offset;
                game.grid_mut().set(p.x as usize, p.y as usize, 0);
            }
            game.place(piece.clone(), origin);

            if game.rotate() {
                prop_assert!(!game.grid().collides(game.piece(), game.origin()));
                prop_assert_eq!(game.origin().y, origin.y);
            } else {
                prop_assert_eq!(game.piece(), &piece);
                prop_assert_eq!(game.origin(), origin);
            }
        }
    }
}
