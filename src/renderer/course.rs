//! Projectile-golf course

use glam::Vec2;

use super::palette;
use crate::platform::DrawSurface;
use crate::sim::ProjectileCourse;

const LAUNCHER_RADIUS: f32 = 8.0;
/// Aim line length per unit of power
const AIM_LENGTH_PER_POWER: f32 = 0.8;
const ARROW_SIZE: f32 = 8.0;
/// Arrowhead barbs, as a fraction of a half turn back from the aim direction
const ARROW_SPREAD: f32 = 0.85;
const FLAG_HEIGHT: f32 = 40.0;

/// Point `length` along `radians` from `from`, in screen coordinates (y down)
fn polar(from: Vec2, radians: f32, length: f32) -> Vec2 {
    from + Vec2::new(radians.cos(), -radians.sin()) * length
}

pub fn paint_course(draw: &mut dyn DrawSurface, course: &ProjectileCourse) {
    let t = course.tuning();
    let ground = t.ground_y();

    draw.fill_rect(0.0, 0.0, t.course_width, t.course_height, palette::SKY);
    draw.fill_rect(0.0, ground, t.course_width, t.ground_thickness, palette::GRASS);

    if !course.is_flying() {
        let launcher = course.launcher();
        draw.fill_circle(launcher.x, launcher.y, LAUNCHER_RADIUS, palette::OUTLINE);

        let radians = (course.angle() as f32).to_radians();
        let tip = polar(launcher, radians, course.power() as f32 * AIM_LENGTH_PER_POWER);
        draw.draw_line(launcher.x, launcher.y, tip.x, tip.y, palette::OUTLINE, 3.0);
        for barb in [
            radians + std::f32::consts::PI * ARROW_SPREAD,
            radians - std::f32::consts::PI * ARROW_SPREAD,
        ] {
            let end = polar(tip, barb, ARROW_SIZE);
            draw.draw_line(tip.x, tip.y, end.x, end.y, palette::OUTLINE, 3.0);
        }
    }

    let p = &course.projectile;
    draw.fill_circle(p.pos.x, p.pos.y, p.radius, palette::BALL);

    let target = &course.level().target;
    let c = target.center;
    draw.fill_circle(c.x, c.y, target.radius, palette::TARGET);
    draw.draw_line(c.x, c.y, c.x, c.y - FLAG_HEIGHT, palette::POLE, 2.0);
    draw.fill_rect(c.x, c.y - FLAG_HEIGHT, 20.0, 10.0, palette::FLAG);

    for rect in &course.level().obstacles {
        draw.fill_rect(rect.pos.x, rect.pos.y, rect.size.x, rect.size.y, palette::OBSTACLE);
        draw.stroke_rect(rect.pos.x, rect.pos.y, rect.size.x, rect.size.y, palette::OUTLINE, 2.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::headless::{DrawCall, HeadlessCanvas};
    use crate::settings::ProjectileTuning;

    #[test]
    fn test_aim_line_only_while_aiming() {
        let mut course = ProjectileCourse::with_builtin_levels(ProjectileTuning::default());
        let mut canvas = HeadlessCanvas::default();

        paint_course(&mut canvas, &course);
        let lines = |calls: &[DrawCall]| {
            calls
                .iter()
                .filter(|c| matches!(c, DrawCall::Line { .. }))
                .count()
        };
        // Aim line, two barbs, flag pole
        assert_eq!(lines(&canvas.take_calls()), 4);

        course.launch().unwrap();
        paint_course(&mut canvas, &course);
        assert_eq!(lines(&canvas.take_calls()), 1);
    }
}
