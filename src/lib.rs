//! Mini Arcade - a browser arcade of small canvas games
//!
//! Core modules:
//! - `sim`: Pure simulations (falling blocks, paddle ball, projectile golf) and collisions
//! - `platform`: Scheduler, input, drawing and presentation capabilities (headless + browser)
//! - `renderer`: Scene painting through the draw-primitives surface
//! - `games`: Engine bindings that own timers and listeners for one running simulation
//! - `session`: Lifecycle manager that keeps at most one game active
//! - `settings`: Data-driven game tuning

pub mod games;
pub mod platform;
pub mod renderer;
pub mod session;
pub mod settings;
pub mod sim;

pub use session::Arcade;
pub use settings::Settings;

/// Game configuration constants
pub mod consts {
    // === Falling blocks ===
    /// Board dimensions in cells
    pub const BOARD_WIDTH: usize = 10;
    pub const BOARD_HEIGHT: usize = 20;
    /// Pixel size of one cell (uniform scale of the logical board)
    pub const BLOCK_SIZE: f32 = 30.0;
    /// Drop timer interval at the start of a game
    pub const INITIAL_DROP_INTERVAL_MS: u32 = 1000;
    /// Fastest the drop timer may become
    pub const MIN_DROP_INTERVAL_MS: u32 = 100;
    /// Interval reduction per speed-up
    pub const DROP_INTERVAL_STEP_MS: u32 = 50;
    /// Score boundary that triggers a speed-up
    pub const SPEED_UP_EVERY_POINTS: u32 = 500;
    /// Points per number of lines cleared in one pass (index = lines)
    pub const LINE_CLEAR_POINTS: [u32; 5] = [0, 100, 300, 500, 800];

    // === Paddle ball ===
    pub const COURT_WIDTH: f32 = 600.0;
    pub const COURT_HEIGHT: f32 = 400.0;
    pub const PADDLE_WIDTH: f32 = 10.0;
    pub const PADDLE_HEIGHT: f32 = 80.0;
    /// Player paddle travel per tick while a direction key is held
    pub const PADDLE_STEP: f32 = 7.0;
    /// Opponent paddle travel per tick
    pub const OPPONENT_SPEED: f32 = 4.0;
    /// Opponent ignores the ball while its center is this close (prevents jitter)
    pub const OPPONENT_DEAD_ZONE: f32 = 10.0;
    pub const BALL_RADIUS: f32 = 5.0;
    /// Serve speed on both axes at match start
    pub const SERVE_SPEED: f32 = 5.0;
    /// Vertical serve speed after a point is drawn from [-SPREAD, SPREAD)
    pub const SERVE_SPREAD: f32 = 3.0;
    /// Vertical speed per pixel of offset from the paddle center on a return
    pub const DEFLECTION_FACTOR: f32 = 0.25;
    /// First to this score wins
    pub const WINNING_SCORE: u32 = 5;
    /// ~60 Hz tick
    pub const PADDLE_TICK_MS: u32 = 16;

    // === Projectile golf ===
    pub const COURSE_WIDTH: f32 = 800.0;
    pub const COURSE_HEIGHT: f32 = 400.0;
    /// Height of the grass strip; the rolling surface is COURSE_HEIGHT - GROUND_THICKNESS
    pub const GROUND_THICKNESS: f32 = 10.0;
    /// Downward acceleration per frame
    pub const GRAVITY: f32 = 0.5;
    pub const BOUNCE_DAMPENING: f32 = 0.65;
    /// Both velocity components below this after a bounce means the shot is at rest
    pub const REST_SPEED: f32 = 0.5;
    pub const PROJECTILE_RADIUS: f32 = 10.0;
    /// Slider power to pixels-per-frame
    pub const LAUNCH_MULTIPLIER: f32 = 0.2;
    pub const LAUNCHER_X: f32 = 50.0;
    pub const LAUNCHER_Y: f32 = COURSE_HEIGHT - 20.0;
    pub const ANGLE_RANGE: (i32, i32) = (0, 90);
    pub const ANGLE_DEFAULT: i32 = 45;
    pub const POWER_RANGE: (i32, i32) = (10, 100);
    pub const POWER_DEFAULT: i32 = 50;
    /// Pause on a sunk shot before the next level loads
    pub const LEVEL_ADVANCE_DELAY_MS: u32 = 2000;
    /// A flight longer than this (30 s at 60 fps) is called out of bounds
    pub const MAX_FLIGHT_FRAMES: u32 = 1800;

    // === Presentation ===
    /// Default duration of a transient notice
    pub const TOAST_MS: u32 = 3000;
    pub const TOAST_LONG_MS: u32 = 5000;
    pub const TOAST_SHORT_MS: u32 = 2000;
}
