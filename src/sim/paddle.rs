//! Two-paddle ball simulation
//!
//! `Stopped -> Running -> Stopped`. There is no pause: a match is either ticking or it
//! isn't. The player holds the left paddle, a simple tracker drives the right one.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::collision::{Rect, circle_touches_rect, reflect};
use crate::settings::PaddleTuning;

/// The ball
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Ball {
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
}

/// A paddle. `x` is fixed; only `y` (top edge) moves.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Paddle {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Paddle {
    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }

    #[inline]
    pub fn center_y(&self) -> f32 {
        self.y + self.height / 2.0
    }
}

/// Which side of the court
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Side {
    Player,
    Opponent,
}

impl Side {
    pub fn name(&self) -> &'static str {
        match self {
            Side::Player => "Player",
            Side::Opponent => "AI",
        }
    }
}

/// Direction keys currently held by the player
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HeldKeys {
    pub up: bool,
    pub down: bool,
}

/// Scoring outcome of a tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaddleEvent {
    Scored { by: Side },
    Won { winner: Side },
}

/// Complete match state
#[derive(Debug, Clone)]
pub struct PaddleMatch {
    pub ball: Ball,
    pub player: Paddle,
    pub opponent: Paddle,
    player_score: u32,
    opponent_score: u32,
    running: bool,
    tuning: PaddleTuning,
    rng: Pcg32,
}

impl PaddleMatch {
    pub fn new(tuning: PaddleTuning, seed: u64) -> Self {
        let paddle_y = (tuning.court_height - tuning.paddle_height) / 2.0;
        Self {
            ball: Ball {
                pos: Vec2::new(tuning.court_width / 2.0, tuning.court_height / 2.0),
                vel: Vec2::splat(tuning.serve_speed),
                radius: tuning.ball_radius,
            },
            player: Paddle {
                x: 0.0,
                y: paddle_y,
                width: tuning.paddle_width,
                height: tuning.paddle_height,
            },
            opponent: Paddle {
                x: tuning.court_width - tuning.paddle_width,
                y: paddle_y,
                width: tuning.paddle_width,
                height: tuning.paddle_height,
            },
            player_score: 0,
            opponent_score: 0,
            running: false,
            tuning,
            rng: Pcg32::seed_from_u64(seed),
        }
    }

    /// Begin a fresh match. Refused (returns false) while one is running.
    pub fn start(&mut self) -> bool {
        if self.running {
            return false;
        }
        self.reset_match();
        self.running = true;
        true
    }

    /// Stop and return scores and positions to their starting values
    pub fn reset(&mut self) {
        self.running = false;
        self.reset_match();
    }

    /// Stop without touching the score (win, teardown)
    pub fn stop(&mut self) {
        self.running = false;
    }

    /// Advance one tick. A stopped match does not move at all.
    pub fn tick(&mut self, held: HeldKeys) -> Vec<PaddleEvent> {
        let mut events = Vec::new();
        if !self.running {
            return events;
        }

        self.move_paddles(held);
        self.move_ball();

        let r = self.ball.radius;
        let scorer = if self.ball.pos.x + r < 0.0 {
            Some(Side::Opponent)
        } else if self.ball.pos.x - r > self.tuning.court_width {
            Some(Side::Player)
        } else {
            None
        };

        if let Some(by) = scorer {
            match by {
                Side::Player => self.player_score += 1,
                Side::Opponent => self.opponent_score += 1,
            }
            events.push(PaddleEvent::Scored { by });
            self.reset_ball();

            if let Some(winner) = self.winner() {
                self.running = false;
                events.push(PaddleEvent::Won { winner });
                log::info!(
                    "Paddle match won by {} ({}-{})",
                    winner.name(),
                    self.player_score,
                    self.opponent_score
                );
            }
        }

        events
    }

    fn move_paddles(&mut self, held: HeldKeys) {
        let t = &self.tuning;
        let max_y = t.court_height - t.paddle_height;

        if held.up {
            self.player.y -= t.paddle_step;
        }
        if held.down {
            self.player.y += t.paddle_step;
        }
        self.player.y = self.player.y.clamp(0.0, max_y);

        // Track the ball, but sit still inside the dead zone
        let center = self.opponent.center_y();
        if center < self.ball.pos.y - t.opponent_dead_zone {
            self.opponent.y += t.opponent_speed;
        } else if center > self.ball.pos.y + t.opponent_dead_zone {
            self.opponent.y -= t.opponent_speed;
        }
        self.opponent.y = self.opponent.y.clamp(0.0, max_y);
    }

    fn move_ball(&mut self) {
        let height = self.tuning.court_height;
        let deflection = self.tuning.deflection;
        let ball = &mut self.ball;
        let r = ball.radius;

        ball.pos += ball.vel;

        // Walls: bounce and pull back inside so the ball can't sink into them
        if ball.pos.y - r < 0.0 {
            ball.vel.y = reflect(ball.vel.y, 1.0);
            ball.pos.y = r;
        } else if ball.pos.y + r > height {
            ball.vel.y = reflect(ball.vel.y, 1.0);
            ball.pos.y = height - r;
        }

        // Player paddle (left): contact on its right face, ball not already behind it
        let face = self.player.rect();
        if circle_touches_rect(ball.pos, r, &face) && ball.pos.x - r > face.left() {
            ball.vel.x = reflect(ball.vel.x, 1.0);
            ball.vel.y = (ball.pos.y - self.player.center_y()) * deflection;
            ball.pos.x = face.right() + r;
        }

        // Opponent paddle (right)
        let face = self.opponent.rect();
        if circle_touches_rect(ball.pos, r, &face) && ball.pos.x + r < face.right() {
            ball.vel.x = reflect(ball.vel.x, 1.0);
            ball.vel.y = (ball.pos.y - self.opponent.center_y()) * deflection;
            ball.pos.x = face.left() - r;
        }
    }

    /// Back to center, serving toward the other side with a fresh vertical speed
    fn reset_ball(&mut self) {
        let spread = self.tuning.serve_spread;
        self.ball.pos = Vec2::new(
            self.tuning.court_width / 2.0,
            self.tuning.court_height / 2.0,
        );
        self.ball.vel.x = -self.ball.vel.x;
        self.ball.vel.y = if spread > 0.0 {
            self.rng.random_range(-spread..spread)
        } else {
            0.0
        };
    }

    fn reset_match(&mut self) {
        self.player_score = 0;
        self.opponent_score = 0;
        let paddle_y = (self.tuning.court_height - self.tuning.paddle_height) / 2.0;
        self.player.y = paddle_y;
        self.opponent.y = paddle_y;
        self.reset_ball();
    }

    fn winner(&self) -> Option<Side> {
        if self.player_score >= self.tuning.winning_score {
            Some(Side::Player)
        } else if self.opponent_score >= self.tuning.winning_score {
            Some(Side::Opponent)
        } else {
            None
        }
    }

    pub fn player_score(&self) -> u32 {
        self.player_score
    }

    pub fn opponent_score(&self) -> u32 {
        self.opponent_score
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn tuning(&self) -> &PaddleTuning {
        &self.tuning
    }

    #[cfg(test)]
    pub(crate) fn set_scores(&mut self, player: u32, opponent: u32) {
        self.player_score = player;
        self.opponent_score = opponent;
    }
}
