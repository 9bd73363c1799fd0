//! Projectile golf
//!
//! One shot at a time: `Aiming -> Flying -> {Landed | OutOfBounds | TargetHit}`.
//! Across holes the course runs `InProgress -> Complete -> InProgress` until the final
//! hole, which ends in `Won`. Advancing out of `Complete` is triggered by the caller
//! (after its display delay) through [`ProjectileCourse::advance_level`].

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::{
    Face, bounce_off_rect, circle_overlaps_circle, circle_overlaps_rect, reflect,
};
use super::levels::{Level, builtin_levels};
use crate::consts::{ANGLE_DEFAULT, POWER_DEFAULT};
use crate::settings::ProjectileTuning;

/// The ball in flight (or sitting at the launcher)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Projectile {
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ShotPhase {
    Aiming,
    Flying,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CoursePhase {
    InProgress,
    /// Hole sunk, waiting for the caller to advance
    Complete,
    Won,
}

/// Result grade for a sunk hole
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tier {
    HoleInOne,
    Eagle,
    Birdie,
    Par,
    Bogey,
    Complete,
}

impl Tier {
    pub fn grade(shots: u32, par: u32) -> Self {
        let (shots, par) = (shots as i32, par as i32);
        if shots == 1 {
            Tier::HoleInOne
        } else if shots <= par - 2 {
            Tier::Eagle
        } else if shots == par - 1 {
            Tier::Birdie
        } else if shots == par {
            Tier::Par
        } else if shots == par + 1 {
            Tier::Bogey
        } else {
            Tier::Complete
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Tier::HoleInOne => "Hole in One!",
            Tier::Eagle => "Eagle!",
            Tier::Birdie => "Birdie!",
            Tier::Par => "Par!",
            Tier::Bogey => "Bogey",
            Tier::Complete => "Complete!",
        }
    }
}

/// How a flight ended
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ShotOutcome {
    /// Came to rest; the launcher now sits at `rest`
    Landed { rest: Vec2 },
    OutOfBounds,
    TargetHit {
        tier: Tier,
        /// 1-based hole number
        level: usize,
        shots: u32,
        total: u32,
        won: bool,
    },
}

/// Why a launch was refused
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LaunchRefusal {
    InFlight,
    AdvancePending,
    CourseWon,
}

/// Course state: current hole, shot counters, aim and the ball
#[derive(Debug, Clone)]
pub struct ProjectileCourse {
    pub projectile: Projectile,
    tuning: ProjectileTuning,
    levels: Vec<Level>,
    level_index: usize,
    launcher: Vec2,
    angle: i32,
    power: i32,
    shots: u32,
    total_shots: u32,
    shot: ShotPhase,
    course: CoursePhase,
    flight_frames: u32,
}

impl ProjectileCourse {
    pub fn new(tuning: ProjectileTuning, levels: Vec<Level>) -> Self {
        debug_assert!(!levels.is_empty());
        let launcher = tuning.launcher;
        Self {
            projectile: Projectile {
                pos: launcher,
                vel: Vec2::ZERO,
                radius: tuning.radius,
            },
            angle: ANGLE_DEFAULT.clamp(tuning.angle_range.0, tuning.angle_range.1),
            power: POWER_DEFAULT.clamp(tuning.power_range.0, tuning.power_range.1),
            tuning,
            levels,
            level_index: 0,
            launcher,
            shots: 0,
            total_shots: 0,
            shot: ShotPhase::Aiming,
            course: CoursePhase::InProgress,
            flight_frames: 0,
        }
    }

    /// The built-in six-hole course
    pub fn with_builtin_levels(tuning: ProjectileTuning) -> Self {
        Self::new(tuning, builtin_levels())
    }

    /// Set the launch angle in degrees, clamped to the slider range. Returns the stored value.
    pub fn set_angle(&mut self, degrees: i32) -> i32 {
        let (lo, hi) = self.tuning.angle_range;
        self.angle = degrees.clamp(lo, hi);
        self.angle
    }

    /// Set the launch power, clamped to the slider range. Returns the stored value.
    pub fn set_power(&mut self, power: i32) -> i32 {
        let (lo, hi) = self.tuning.power_range;
        self.power = power.clamp(lo, hi);
        self.power
    }

    /// Fire from the launcher at the current aim. Counts the shot and returns the
    /// initial velocity.
    pub fn launch(&mut self) -> Result<Vec2, LaunchRefusal> {
        if self.shot == ShotPhase::Flying {
            return Err(LaunchRefusal::InFlight);
        }
        match self.course {
            CoursePhase::Complete => return Err(LaunchRefusal::AdvancePending),
            CoursePhase::Won => return Err(LaunchRefusal::CourseWon),
            CoursePhase::InProgress => {}
        }

        self.shots += 1;
        self.total_shots += 1;

        let radians = (self.angle as f32).to_radians();
        let speed = self.power as f32 * self.tuning.launch_multiplier;
        let vel = Vec2::new(speed * radians.cos(), -speed * radians.sin());

        self.projectile.pos = self.launcher;
        self.projectile.vel = vel;
        self.flight_frames = 0;
        self.shot = ShotPhase::Flying;

        log::debug!(
            "Launch {} on hole {}: angle={} power={}",
            self.shots,
            self.level_index + 1,
            self.angle,
            self.power
        );
        Ok(vel)
    }

    /// Integrate one display frame. Returns the outcome once the shot ends.
    pub fn frame(&mut self) -> Option<ShotOutcome> {
        if self.shot != ShotPhase::Flying {
            return None;
        }

        let t = &self.tuning;
        let level = &self.levels[self.level_index];
        let p = &mut self.projectile;
        let r = p.radius;
        let d = t.dampening;
        let at_rest = |v: Vec2| v.x.abs() < t.rest_speed && v.y.abs() < t.rest_speed;

        let prev = p.pos;
        p.vel.y += t.gravity;
        p.pos += p.vel;
        self.flight_frames += 1;

        let mut rested = false;

        // Ground: roll forward, bounce up
        let ground = t.ground_y();
        if p.pos.y + r >= ground {
            p.pos.y = ground - r;
            p.vel.x *= d;
            p.vel.y = reflect(p.vel.y, d);
            rested = at_rest(p.vel);
        }

        if p.pos.y - r < 0.0 {
            p.pos.y = r;
            p.vel.y = reflect(p.vel.y, d);
        }
        if p.pos.x - r < 0.0 {
            p.pos.x = r;
            p.vel.x = reflect(p.vel.x, d);
        }
        if p.pos.x + r > t.course_width {
            p.pos.x = t.course_width - r;
            p.vel.x = reflect(p.vel.x, d);
        }

        let hit = circle_overlaps_circle(p.pos, r, level.target.center, level.target.radius);

        for rect in &level.obstacles {
            if circle_overlaps_rect(p.pos, r, rect) {
                let crossed = bounce_off_rect(&mut p.pos, &mut p.vel, prev, r, rect, d);
                if crossed.vertical == Some(Face::Top) && at_rest(p.vel) {
                    rested = true;
                }
            }
        }

        let out = !p.pos.is_finite() || self.flight_frames >= t.max_flight_frames;

        if hit {
            Some(self.sink())
        } else if rested {
            let rest = self.projectile.pos;
            self.launcher = rest;
            self.park();
            Some(ShotOutcome::Landed { rest })
        } else if out {
            self.park();
            Some(ShotOutcome::OutOfBounds)
        } else {
            None
        }
    }

    fn sink(&mut self) -> ShotOutcome {
        self.shot = ShotPhase::Aiming;
        self.projectile.vel = Vec2::ZERO;

        let won = self.level_index + 1 == self.levels.len();
        self.course = if won {
            CoursePhase::Won
        } else {
            CoursePhase::Complete
        };

        let tier = Tier::grade(self.shots, self.level().par);
        log::info!(
            "Hole {} sunk in {} ({}), total {}",
            self.level_index + 1,
            self.shots,
            tier.label(),
            self.total_shots
        );

        ShotOutcome::TargetHit {
            tier,
            level: self.level_index + 1,
            shots: self.shots,
            total: self.total_shots,
            won,
        }
    }

    /// Ball back on the launcher, not moving
    fn park(&mut self) {
        self.shot = ShotPhase::Aiming;
        self.projectile.pos = self.launcher;
        self.projectile.vel = Vec2::ZERO;
    }

    /// Load the next hole after a sunk shot. No-op unless an advance is pending.
    pub fn advance_level(&mut self) -> bool {
        if self.course != CoursePhase::Complete {
            return false;
        }
        self.level_index += 1;
        debug_assert!(self.level_index < self.levels.len());
        self.restart_level();
        true
    }

    /// Replay the current hole; its shots no longer count toward the total
    pub fn reset_level(&mut self) {
        self.total_shots -= self.shots;
        self.restart_level();
    }

    /// Back to the first hole with a clean card
    pub fn reset_game(&mut self) {
        self.level_index = 0;
        self.total_shots = 0;
        self.restart_level();
    }

    fn restart_level(&mut self) {
        self.shots = 0;
        self.launcher = self.tuning.launcher;
        self.course = CoursePhase::InProgress;
        self.flight_frames = 0;
        self.park();
    }

    pub fn level(&self) -> &Level {
        &self.levels[self.level_index]
    }

    /// 1-based hole number
    pub fn level_number(&self) -> usize {
        self.level_index + 1
    }

    pub fn level_count(&self) -> usize {
        self.levels.len()
    }

    pub fn launcher(&self) -> Vec2 {
        self.launcher
    }

    pub fn angle(&self) -> i32 {
        self.angle
    }

    pub fn power(&self) -> i32 {
        self.power
    }

    pub fn shots(&self) -> u32 {
        self.shots
    }

    pub fn total_shots(&self) -> u32 {
        self.total_shots
    }

    pub fn shot_phase(&self) -> ShotPhase {
        self.shot
    }

    pub fn course_phase(&self) -> CoursePhase {
        self.course
    }

    pub fn is_flying(&self) -> bool {
        self.shot == ShotPhase::Flying
    }

    pub fn tuning(&self) -> &ProjectileTuning {
        &self.tuning
    }

    /// Put the ball in flight at an arbitrary state
    #[cfg(test)]
    pub(crate) fn set_flight(&mut self, pos: Vec2, vel: Vec2) {
        self.projectile.pos = pos;
        self.projectile.vel = vel;
        self.flight_frames = 0;
        self.shot = ShotPhase::Flying;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::collision::Rect;
    use proptest::prelude::*;

    fn far_hole() -> Level {
        Level::new(Vec2::new(700.0, 380.0), 20.0, vec![], 2)
    }

    fn run(course: &mut ProjectileCourse) -> ShotOutcome {
        for _ in 0..10_000 {
            if let Some(outcome) = course.frame() {
                return outcome;
            }
        }
        panic!("shot never resolved");
    }

    #[test]
    fn test_launch_velocity() {
        let mut course = ProjectileCourse::with_builtin_levels(ProjectileTuning::default());
        assert_eq!((course.angle(), course.power()), (45, 50));

        let vel = course.launch().unwrap();
        assert!((vel.x - 7.0710678).abs() < 1e-5);
        assert!((vel.y + 7.0710678).abs() < 1e-5);
        assert_eq!(course.shots(), 1);
        assert_eq!(course.total_shots(), 1);
        assert!(course.is_flying());
    }

    #[test]
    fn test_aim_is_clamped() {
        let mut course = ProjectileCourse::with_builtin_levels(ProjectileTuning::default());
        assert_eq!(course.set_angle(120), 90);
        assert_eq!(course.set_angle(-5), 0);
        assert_eq!(course.set_power(3), 10);
        assert_eq!(course.set_power(250), 100);
    }

    #[test]
    fn test_second_launch_rejected_in_flight() {
        let mut course = ProjectileCourse::with_builtin_levels(ProjectileTuning::default());
        course.launch().unwrap();
        assert_eq!(course.launch(), Err(LaunchRefusal::InFlight));
        assert_eq!(course.shots(), 1);
    }

    #[test]
    fn test_tiers() {
        assert_eq!(Tier::grade(1, 3), Tier::HoleInOne);
        assert_eq!(Tier::grade(1, 1), Tier::HoleInOne);
        assert_eq!(Tier::grade(2, 5), Tier::Eagle);
        assert_eq!(Tier::grade(2, 3), Tier::Birdie);
        assert_eq!(Tier::grade(3, 3), Tier::Par);
        assert_eq!(Tier::grade(4, 3), Tier::Bogey);
        assert_eq!(Tier::grade(6, 3), Tier::Complete);
    }

    #[test]
    fn test_rolls_to_rest_and_moves_launcher() {
        let mut course = ProjectileCourse::new(ProjectileTuning::default(), vec![far_hole()]);
        course.set_angle(0);
        course.set_power(10);
        course.launch().unwrap();

        // Four ground bounces: vx 2 -> 1.3 -> 0.845 -> 0.549 -> 0.357
        let outcome = run(&mut course);
        let ShotOutcome::Landed { rest } = outcome else {
            panic!("expected Landed, got {:?}", outcome);
        };
        assert!((rest.x - 54.694).abs() < 1e-2);
        assert_eq!(rest.y, 380.0);
        assert_eq!(course.launcher(), rest);
        assert_eq!(course.projectile.pos, rest);
        assert_eq!(course.shot_phase(), ShotPhase::Aiming);
    }

    #[test]
    fn test_target_hit_beats_landing_in_same_frame() {
        // Same roll as above, with the hole reached on exactly the frame it comes to rest
        let hole = Level::new(Vec2::new(84.4, 380.0), 20.0, vec![], 2);
        let mut course = ProjectileCourse::new(ProjectileTuning::default(), vec![hole]);
        course.set_angle(0);
        course.set_power(10);
        course.launch().unwrap();

        for _ in 0..3 {
            assert_eq!(course.frame(), None);
        }
        let outcome = course.frame();
        assert!(matches!(
            outcome,
            Some(ShotOutcome::TargetHit {
                tier: Tier::HoleInOne,
                ..
            })
        ));
        assert_eq!(course.launcher(), ProjectileTuning::default().launcher);
    }

    #[test]
    fn test_rest_on_obstacle_top() {
        let hole = Level::new(
            Vec2::new(700.0, 380.0),
            20.0,
            vec![Rect::new(100.0, 300.0, 50.0, 20.0)],
            2,
        );
        let mut course = ProjectileCourse::new(ProjectileTuning::default(), vec![hole]);
        course.set_flight(Vec2::new(120.0, 289.7), Vec2::new(0.2, 0.0));

        match course.frame() {
            Some(ShotOutcome::Landed { rest }) => assert_eq!(rest.y, 290.0),
            other => panic!("expected Landed, got {:?}", other),
        }
    }

    #[test]
    fn test_flight_cap_is_out_of_bounds() {
        let tuning = ProjectileTuning {
            max_flight_frames: 3,
            ..ProjectileTuning::default()
        };
        let mut course = ProjectileCourse::new(tuning, vec![far_hole()]);
        course.set_power(100);
        course.launch().unwrap();

        assert_eq!(course.frame(), None);
        assert_eq!(course.frame(), None);
        assert_eq!(course.frame(), Some(ShotOutcome::OutOfBounds));
        assert_eq!(course.projectile.pos, course.launcher());
        assert_eq!(course.shots(), 1);
    }

    #[test]
    fn test_non_finite_position_is_out_of_bounds() {
        let mut course = ProjectileCourse::new(ProjectileTuning::default(), vec![far_hole()]);
        course.set_flight(Vec2::new(f32::NAN, 100.0), Vec2::ZERO);
        assert_eq!(course.frame(), Some(ShotOutcome::OutOfBounds));
        assert_eq!(course.launcher(), ProjectileTuning::default().launcher);
    }

    #[test]
    fn test_sink_advances_and_resets_card() {
        let near = Level::new(Vec2::new(70.0, 380.0), 20.0, vec![], 1);
        let mut course =
            ProjectileCourse::new(ProjectileTuning::default(), vec![near.clone(), near]);
        course.set_angle(0);
        course.launch().unwrap();

        let outcome = course.frame();
        assert_eq!(
            outcome,
            Some(ShotOutcome::TargetHit {
                tier: Tier::HoleInOne,
                level: 1,
                shots: 1,
                total: 1,
                won: false,
            })
        );
        assert_eq!(course.course_phase(), CoursePhase::Complete);
        assert_eq!(course.launch(), Err(LaunchRefusal::AdvancePending));

        assert!(course.advance_level());
        assert!(!course.advance_level());
        assert_eq!(course.level_number(), 2);
        assert_eq!(course.shots(), 0);
        assert_eq!(course.total_shots(), 1);
        assert_eq!(course.launcher(), ProjectileTuning::default().launcher);

        course.launch().unwrap();
        assert!(matches!(
            course.frame(),
            Some(ShotOutcome::TargetHit {
                won: true,
                total: 2,
                ..
            })
        ));
        assert_eq!(course.course_phase(), CoursePhase::Won);
        assert_eq!(course.launch(), Err(LaunchRefusal::CourseWon));
    }

    #[test]
    fn test_reset_level_subtracts_shots() {
        let mut course = ProjectileCourse::new(ProjectileTuning::default(), vec![far_hole()]);
        course.set_angle(0);
        course.set_power(10);
        course.launch().unwrap();
        run(&mut course);
        course.launch().unwrap();
        run(&mut course);
        assert_eq!(course.total_shots(), 2);
        assert_ne!(course.launcher(), ProjectileTuning::default().launcher);

        course.reset_level();
        assert_eq!(course.shots(), 0);
        assert_eq!(course.total_shots(), 0);
        assert_eq!(course.launcher(), ProjectileTuning::default().launcher);
    }

    #[test]
    fn test_reset_game_cancels_flight_and_pending_advance() {
        let near = Level::new(Vec2::new(70.0, 380.0), 20.0, vec![], 1);
        let mut course =
            ProjectileCourse::new(ProjectileTuning::default(), vec![near.clone(), near]);
        course.set_angle(0);
        course.launch().unwrap();
        course.frame();
        assert_eq!(course.course_phase(), CoursePhase::Complete);

        course.reset_game();
        assert_eq!(course.course_phase(), CoursePhase::InProgress);
        assert_eq!(course.level_number(), 1);
        assert_eq!(course.total_shots(), 0);
        assert!(!course.advance_level());

        course.launch().unwrap();
        course.reset_game();
        assert!(!course.is_flying());
        assert_eq!(course.frame(), None);
    }

    proptest! {
        #[test]
        fn prop_flight_stays_on_course(
            angle in 0i32..=90,
            power in 10i32..=100,
            level in 0usize..6,
        ) {
            let mut levels = builtin_levels();
            levels.rotate_left(level);
            let mut course = ProjectileCourse::new(ProjectileTuning::default(), levels);
            course.set_angle(angle);
            course.set_power(power);
            course.launch().unwrap();

            let r = course.projectile.radius;
            let mut frames = 0;
            while course.frame().is_none() {
                let p = course.projectile.pos;
                prop_assert!(p.x >= r - 1e-3 && p.x <= 800.0 - r + 1e-3);
                prop_assert!(p.y <= 390.0 - r + 1e-3);
                frames += 1;
            }
            prop_assert!(frames < 1800);
        }
    }
}
