//! Collision detection and response for circles against boxes
//!
//! Shared by the paddle and projectile games. Everything here is a pure function of
//! its arguments; callers own the bodies being moved.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle (screen coordinates, y grows downward)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    /// Top-left corner
    pub pos: Vec2,
    pub size: Vec2,
}

impl Rect {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            pos: Vec2::new(x, y),
            size: Vec2::new(width, height),
        }
    }

    #[inline]
    pub fn left(&self) -> f32 {
        self.pos.x
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.pos.x + self.size.x
    }

    #[inline]
    pub fn top(&self) -> f32 {
        self.pos.y
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.pos.y + self.size.y
    }

    pub fn center(&self) -> Vec2 {
        self.pos + self.size / 2.0
    }
}

/// Face of a rectangle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Face {
    Left,
    Right,
    Top,
    Bottom,
}

/// Which faces a moving circle crossed to enter a rectangle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Penetration {
    /// `Left` or `Right` when the circle came in through a vertical face
    pub horizontal: Option<Face>,
    /// `Top` or `Bottom` when the circle came in through a horizontal face
    pub vertical: Option<Face>,
}

impl Penetration {
    pub fn is_none(&self) -> bool {
        self.horizontal.is_none() && self.vertical.is_none()
    }
}

/// True iff the circles strictly overlap
#[inline]
pub fn circle_overlaps_circle(c1: Vec2, r1: f32, c2: Vec2, r2: f32) -> bool {
    c1.distance(c2) < r1 + r2
}

/// True iff the circle's bounding box strictly overlaps the rectangle
#[inline]
pub fn circle_overlaps_rect(center: Vec2, radius: f32, rect: &Rect) -> bool {
    center.x + radius > rect.left()
        && center.x - radius < rect.right()
        && center.y + radius > rect.top()
        && center.y - radius < rect.bottom()
}

/// Inclusive variant of [`circle_overlaps_rect`]: grazing contact counts
#[inline]
pub fn circle_touches_rect(center: Vec2, radius: f32, rect: &Rect) -> bool {
    center.x + radius >= rect.left()
        && center.x - radius <= rect.right()
        && center.y + radius >= rect.top()
        && center.y - radius <= rect.bottom()
}

/// Reverse a velocity component and scale it by `dampening`
#[inline]
pub fn reflect(component: f32, dampening: f32) -> f32 {
    debug_assert!(dampening > 0.0 && dampening <= 1.0);
    -component * dampening
}

/// Determine which faces were crossed, judging by where the circle was before the step.
///
/// A circle that was already overlapping before the step reports no face at all, and
/// a circle coming in diagonally past a corner reports both axes.
pub fn resolve_axis_penetration(prev_center: Vec2, radius: f32, rect: &Rect) -> Penetration {
    let horizontal = if prev_center.x + radius <= rect.left() {
        Some(Face::Left)
    } else if prev_center.x - radius >= rect.right() {
        Some(Face::Right)
    } else {
        None
    };

    let vertical = if prev_center.y + radius <= rect.top() {
        Some(Face::Top)
    } else if prev_center.y - radius >= rect.bottom() {
        Some(Face::Bottom)
    } else {
        None
    };

    Penetration {
        horizontal,
        vertical,
    }
}

/// Bounce a circle off a rectangle it now overlaps.
///
/// Only the velocity components of the crossed axes are reflected, and the position is
/// pushed back to the crossed face so the same contact is not detected next step.
pub fn bounce_off_rect(
    pos: &mut Vec2,
    vel: &mut Vec2,
    prev_center: Vec2,
    radius: f32,
    rect: &Rect,
    dampening: f32,
) -> Penetration {
    let hit = resolve_axis_penetration(prev_center, radius, rect);

    if let Some(face) = hit.horizontal {
        vel.x = reflect(vel.x, dampening);
        pos.x = match face {
            Face::Left => rect.left() - radius,
            _ => rect.right() + radius,
        };
    }

    if let Some(face) = hit.vertical {
        vel.y = reflect(vel.y, dampening);
        pos.y = match face {
            Face::Top => rect.top() - radius,
            _ => rect.bottom() + radius,
        };
    }

    hit
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wall() -> Rect {
        Rect::new(400.0, 300.0, 20.0, 100.0)
    }

    #[test]
    fn test_circle_overlap_is_strict() {
        assert!(circle_overlaps_circle(Vec2::ZERO, 5.0, Vec2::new(9.0, 0.0), 5.0));
        assert!(!circle_overlaps_circle(Vec2::ZERO, 5.0, Vec2::new(10.0, 0.0), 5.0));
        assert!(!circle_overlaps_circle(Vec2::ZERO, 5.0, Vec2::new(8.0, 8.0), 5.0));
    }

    #[test]
    fn test_circle_rect_overlap() {
        let rect = wall();
        assert!(circle_overlaps_rect(Vec2::new(395.0, 350.0), 10.0, &rect));
        // Exactly touching the left face is not an overlap
        assert!(!circle_overlaps_rect(Vec2::new(390.0, 350.0), 10.0, &rect));
        assert!(circle_touches_rect(Vec2::new(390.0, 350.0), 10.0, &rect));
        assert!(!circle_overlaps_rect(Vec2::new(410.0, 280.0), 10.0, &rect));
    }

    #[test]
    fn test_reflect() {
        assert_eq!(reflect(4.0, 1.0), -4.0);
        assert!((reflect(-10.0, 0.65) - 6.5).abs() < 1e-6);
    }

    #[test]
    fn test_penetration_from_left_only() {
        let hit = resolve_axis_penetration(Vec2::new(385.0, 350.0), 10.0, &wall());
        assert_eq!(hit.horizontal, Some(Face::Left));
        assert_eq!(hit.vertical, None);
    }

    #[test]
    fn test_penetration_from_top_only() {
        let hit = resolve_axis_penetration(Vec2::new(410.0, 285.0), 10.0, &wall());
        assert_eq!(hit.horizontal, None);
        assert_eq!(hit.vertical, Some(Face::Top));
    }

    #[test]
    fn test_penetration_corner_reports_both_axes() {
        let hit = resolve_axis_penetration(Vec2::new(430.0, 410.0), 10.0, &wall());
        assert_eq!(hit.horizontal, Some(Face::Right));
        assert_eq!(hit.vertical, Some(Face::Bottom));
    }

    #[test]
    fn test_penetration_already_inside_reports_nothing() {
        let hit = resolve_axis_penetration(Vec2::new(410.0, 350.0), 10.0, &wall());
        assert!(hit.is_none());
    }

    #[test]
    fn test_fast_body_bounces_on_crossed_axis_only() {
        // Moving right fast and slightly down: must bounce horizontally, keep falling
        let rect = wall();
        let prev = Vec2::new(380.0, 340.0);
        let mut vel = Vec2::new(24.0, 2.0);
        let mut pos = prev + vel;
        assert!(circle_overlaps_rect(pos, 10.0, &rect));

        let hit = bounce_off_rect(&mut pos, &mut vel, prev, 10.0, &rect, 0.5);
        assert_eq!(hit.horizontal, Some(Face::Left));
        assert_eq!(vel, Vec2::new(-12.0, 2.0));
        assert_eq!(pos.x, 390.0);
        assert_eq!(pos.y, 342.0);
    }

    #[test]
    fn test_landing_on_top_face() {
        let rect = wall();
        let prev = Vec2::new(410.0, 288.0);
        let mut vel = Vec2::new(1.0, 6.0);
        let mut pos = prev + vel;

        bounce_off_rect(&mut pos, &mut vel, prev, 10.0, &rect, 1.0);
        assert_eq!(pos.y, 290.0);
        assert_eq!(vel, Vec2::new(1.0, -6.0));
    }
}
