//! Game tuning
//!
//! Every engine reads its constants from here rather than from `consts` directly, so a
//! JSON override blob in LocalStorage can retune a game without a rebuild.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::*;

/// Falling-block tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FallingBlockTuning {
    pub width: usize,
    pub height: usize,
    pub block_size: f32,
    pub initial_interval_ms: u32,
    pub min_interval_ms: u32,
    pub interval_step_ms: u32,
    pub speed_up_every: u32,
}

impl Default for FallingBlockTuning {
    fn default() -> Self {
        Self {
            width: BOARD_WIDTH,
            height: BOARD_HEIGHT,
            block_size: BLOCK_SIZE,
            initial_interval_ms: INITIAL_DROP_INTERVAL_MS,
            min_interval_ms: MIN_DROP_INTERVAL_MS,
            interval_step_ms: DROP_INTERVAL_STEP_MS,
            speed_up_every: SPEED_UP_EVERY_POINTS,
        }
    }
}

impl FallingBlockTuning {
    /// First inconsistency found, if any
    pub fn problem(&self) -> Option<&'static str> {
        if self.width < 4 || self.height < 4 {
            Some("board must be at least 4x4 cells")
        } else if !(self.block_size.is_finite() && self.block_size > 0.0) {
            Some("block_size must be positive")
        } else if self.min_interval_ms == 0 || self.min_interval_ms > self.initial_interval_ms {
            Some("need 0 < min_interval_ms <= initial_interval_ms")
        } else if self.speed_up_every == 0 {
            Some("speed_up_every must be positive")
        } else {
            None
        }
    }
}

/// Paddle-ball tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PaddleTuning {
    pub court_width: f32,
    pub court_height: f32,
    pub paddle_width: f32,
    pub paddle_height: f32,
    pub paddle_step: f32,
    pub opponent_speed: f32,
    pub opponent_dead_zone: f32,
    pub ball_radius: f32,
    pub serve_speed: f32,
    pub serve_spread: f32,
    pub deflection: f32,
    pub winning_score: u32,
    pub tick_ms: u32,
}

impl Default for PaddleTuning {
    fn default() -> Self {
        Self {
            court_width: COURT_WIDTH,
            court_height: COURT_HEIGHT,
            paddle_width: PADDLE_WIDTH,
            paddle_height: PADDLE_HEIGHT,
            paddle_step: PADDLE_STEP,
            opponent_speed: OPPONENT_SPEED,
            opponent_dead_zone: OPPONENT_DEAD_ZONE,
            ball_radius: BALL_RADIUS,
            serve_speed: SERVE_SPEED,
            serve_spread: SERVE_SPREAD,
            deflection: DEFLECTION_FACTOR,
            winning_score: WINNING_SCORE,
            tick_ms: PADDLE_TICK_MS,
        }
    }
}

impl PaddleTuning {
    pub fn problem(&self) -> Option<&'static str> {
        let values = [
            self.court_width,
            self.court_height,
            self.paddle_width,
            self.paddle_height,
            self.paddle_step,
            self.opponent_speed,
            self.opponent_dead_zone,
            self.ball_radius,
            self.serve_speed,
            self.serve_spread,
            self.deflection,
        ];
        if values.iter().any(|v| !v.is_finite() || *v < 0.0) {
            Some("values must be finite and non-negative")
        } else if self.court_width <= 0.0 || self.court_height <= 0.0 {
            Some("court must have an area")
        } else if self.paddle_height > self.court_height {
            Some("paddle_height exceeds court_height")
        } else if self.paddle_width * 2.0 >= self.court_width {
            Some("paddles overlap across the court")
        } else if self.ball_radius <= 0.0 || self.ball_radius * 2.0 >= self.court_height {
            Some("ball_radius doesn't fit the court")
        } else if self.winning_score == 0 || self.tick_ms == 0 {
            Some("winning_score and tick_ms must be positive")
        } else {
            None
        }
    }
}

/// Projectile-golf tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectileTuning {
    pub course_width: f32,
    pub course_height: f32,
    pub ground_thickness: f32,
    pub gravity: f32,
    pub dampening: f32,
    pub rest_speed: f32,
    pub radius: f32,
    pub launch_multiplier: f32,
    pub launcher: Vec2,
    pub angle_range: (i32, i32),
    pub power_range: (i32, i32),
    pub advance_delay_ms: u32,
    pub max_flight_frames: u32,
}

impl Default for ProjectileTuning {
    fn default() -> Self {
        Self {
            course_width: COURSE_WIDTH,
            course_height: COURSE_HEIGHT,
            ground_thickness: GROUND_THICKNESS,
            gravity: GRAVITY,
            dampening: BOUNCE_DAMPENING,
            rest_speed: REST_SPEED,
            radius: PROJECTILE_RADIUS,
            launch_multiplier: LAUNCH_MULTIPLIER,
            launcher: Vec2::new(LAUNCHER_X, LAUNCHER_Y),
            angle_range: ANGLE_RANGE,
            power_range: POWER_RANGE,
            advance_delay_ms: LEVEL_ADVANCE_DELAY_MS,
            max_flight_frames: MAX_FLIGHT_FRAMES,
        }
    }
}

impl ProjectileTuning {
    /// Y coordinate of the rolling surface
    pub fn ground_y(&self) -> f32 {
        self.course_height - self.ground_thickness
    }

    pub fn problem(&self) -> Option<&'static str> {
        let values = [
            self.course_width,
            self.course_height,
            self.ground_thickness,
            self.gravity,
            self.rest_speed,
            self.radius,
            self.launch_multiplier,
        ];
        if values.iter().any(|v| !v.is_finite() || *v < 0.0) || !self.launcher.is_finite() {
            Some("values must be finite and non-negative")
        } else if self.angle_range.0 > self.angle_range.1 {
            Some("angle_range is inverted")
        } else if self.power_range.0 > self.power_range.1 {
            Some("power_range is inverted")
        } else if !(self.dampening > 0.0 && self.dampening <= 1.0) {
            Some("dampening must be in (0, 1]")
        } else if self.radius <= 0.0 || self.ground_y() <= self.radius * 2.0 {
            Some("radius doesn't fit above the ground")
        } else if self.course_width <= self.radius * 2.0 {
            Some("course is narrower than the projectile")
        } else if self.max_flight_frames == 0 {
            Some("max_flight_frames must be positive")
        } else {
            None
        }
    }
}

/// Arcade-wide settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub falling: FallingBlockTuning,
    pub paddle: PaddleTuning,
    pub projectile: ProjectileTuning,
}

impl Settings {
    /// Parse a (possibly partial) settings blob; missing fields keep their defaults and
    /// inconsistent sections are replaced by theirs
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str::<Self>(json).map(Self::validate)
    }

    /// Reset each section whose values don't hang together to its defaults
    pub fn validate(mut self) -> Self {
        if let Some(problem) = self.falling.problem() {
            log::warn!("Falling-block settings ignored: {}", problem);
            self.falling = FallingBlockTuning::default();
        }
        if let Some(problem) = self.paddle.problem() {
            log::warn!("Paddle settings ignored: {}", problem);
            self.paddle = PaddleTuning::default();
        }
        if let Some(problem) = self.projectile.problem() {
            log::warn!("Projectile settings ignored: {}", problem);
            self.projectile = ProjectileTuning::default();
        }
        self
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// LocalStorage key
    #[cfg(target_arch = "wasm32")]
    const STORAGE_KEY: &'static str = "mini_arcade_settings";

    /// Load tuning overrides from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match Self::from_json(&json) {
                    Ok(settings) => {
                        log::info!("Loaded settings from LocalStorage");
                        return settings;
                    }
                    Err(e) => log::warn!("Ignoring stored settings: {}", e),
                }
            }
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Native stub
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }
}
