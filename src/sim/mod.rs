//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Ticks are driven by the caller, never by a clock read in here
//! - Seeded RNG only
//! - No rendering or platform dependencies

pub mod collision;
pub mod falling;
pub mod grid;
pub mod levels;
pub mod paddle;
pub mod projectile;

pub use collision::{
    Face, Penetration, Rect, bounce_off_rect, circle_overlaps_circle, circle_overlaps_rect,
    circle_touches_rect, reflect, resolve_axis_penetration,
};
pub use falling::{FallingBlocks, FallingEvent, FallingPhase, Refusal};
pub use grid::{Cell, EMPTY, Grid, Piece};
pub use levels::{Level, Target, builtin_levels};
pub use paddle::{Ball, HeldKeys, Paddle, PaddleEvent, PaddleMatch, Side};
pub use projectile::{
    CoursePhase, LaunchRefusal, Projectile, ProjectileCourse, ShotOutcome, ShotPhase, Tier,
};
