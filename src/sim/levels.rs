//! Projectile-golf course layout
//!
//! Coordinates are for the default 800×400 course, rolling surface at y = 390.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::collision::Rect;

/// The hole
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Target {
    pub center: Vec2,
    pub radius: f32,
}

/// One hole of the course
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Level {
    pub target: Target,
    pub obstacles: Vec<Rect>,
    pub par: u32,
}

impl Level {
    pub fn new(target: Vec2, radius: f32, obstacles: Vec<Rect>, par: u32) -> Self {
        debug_assert!(par > 0);
        Self {
            target: Target {
                center: target,
                radius,
            },
            obstacles,
            par,
        }
    }
}

/// The six built-in holes, in play order
pub fn builtin_levels() -> Vec<Level> {
    vec![
        Level::new(Vec2::new(700.0, 380.0), 20.0, vec![], 1),
        Level::new(
            Vec2::new(650.0, 380.0),
            20.0,
            vec![Rect::new(400.0, 300.0, 20.0, 100.0)],
            2,
        ),
        Level::new(
            Vec2::new(600.0, 380.0),
            20.0,
            vec![
                Rect::new(350.0, 280.0, 20.0, 120.0),
                Rect::new(550.0, 320.0, 20.0, 80.0),
            ],
            3,
        ),
        // Raised green behind a shelf
        Level::new(
            Vec2::new(700.0, 330.0),
            20.0,
            vec![Rect::new(300.0, 320.0, 200.0, 20.0)],
            2,
        ),
        Level::new(
            Vec2::new(650.0, 380.0),
            20.0,
            vec![
                Rect::new(300.0, 250.0, 20.0, 150.0),
                Rect::new(500.0, 300.0, 150.0, 20.0),
            ],
            3,
        ),
        // Floating target between two ledges
        Level::new(
            Vec2::new(400.0, 230.0),
            20.0,
            vec![
                Rect::new(200.0, 300.0, 100.0, 20.0),
                Rect::new(450.0, 220.0, 100.0, 20.0),
            ],
            3,
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_pars() {
        let pars: Vec<u32> = builtin_levels().iter().map(|l| l.par).collect();
        assert_eq!(pars, vec![1, 2, 3, 2, 3, 3]);
    }

    #[test]
    fn test_obstacles_inside_course() {
        for level in builtin_levels() {
            for rect in &level.obstacles {
                assert!(rect.left() >= 0.0 && rect.right() <= 800.0);
                assert!(rect.top() >= 0.0 && rect.bottom() <= 400.0);
            }
            assert!(level.target.center.x - level.target.radius >= 0.0);
        }
    }
}
