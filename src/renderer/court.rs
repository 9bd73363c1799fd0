//! Paddle-ball court

use super::palette;
use crate::platform::DrawSurface;
use crate::sim::PaddleMatch;

const NET_DASH: f32 = 10.0;
const NET_GAP: f32 = 15.0;

pub fn paint_court(draw: &mut dyn DrawSurface, game: &PaddleMatch) {
    let t = game.tuning();
    draw.fill_rect(0.0, 0.0, t.court_width, t.court_height, palette::BACKGROUND);

    // Dashed net down the middle
    let mut y = 0.0;
    while y < t.court_height {
        draw.fill_rect(t.court_width / 2.0 - 1.0, y, 2.0, NET_DASH, palette::NET);
        y += NET_DASH + NET_GAP;
    }

    for paddle in [&game.player, &game.opponent] {
        draw.fill_rect(paddle.x, paddle.y, paddle.width, paddle.height, palette::PADDLE);
    }

    let ball = &game.ball;
    draw.fill_circle(ball.pos.x, ball.pos.y, ball.radius, palette::BALL);
}
