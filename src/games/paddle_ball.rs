//! Paddle-ball binding: a fixed-rate tick plus held-key tracking

use super::Game;
use crate::consts::{TOAST_LONG_MS, TOAST_MS};
use crate::platform::{Host, HostEvent, InputEvent, Layout, ListenerKind, ListenerSet, TimerSlot};
use crate::renderer::paint_court;
use crate::settings::PaddleTuning;
use crate::sim::{HeldKeys, PaddleEvent, PaddleMatch};

pub const ID: &str = "ping-pong";

const START: &str = "ping-pong-start";
const RESET: &str = "ping-pong-reset";
const PLAYER_SCORE: &str = "ping-pong-player-score";
const OPPONENT_SCORE: &str = "ping-pong-ai-score";

pub struct PaddleBallGame {
    sim: PaddleMatch,
    tick: TimerSlot,
    listeners: ListenerSet,
    held: HeldKeys,
}

impl PaddleBallGame {
    pub fn new(tuning: PaddleTuning, seed: u64) -> Self {
        Self {
            sim: PaddleMatch::new(tuning, seed),
            tick: TimerSlot::default(),
            listeners: ListenerSet::default(),
            held: HeldKeys::default(),
        }
    }

    pub fn sim(&self) -> &PaddleMatch {
        &self.sim
    }

    #[cfg(test)]
    pub(crate) fn sim_mut(&mut self) -> &mut PaddleMatch {
        &mut self.sim
    }

    fn show_scores(&self, host: &mut Host<'_>) {
        host.ui.set_label(PLAYER_SCORE, &self.sim.player_score().to_string());
        host.ui.set_label(OPPONENT_SCORE, &self.sim.opponent_score().to_string());
    }

    /// Key names are matched case-insensitively (`W` with caps lock still moves)
    fn track_key(&mut self, key: &str, pressed: bool) {
        match key.to_lowercase().as_str() {
            "w" | "arrowup" => self.held.up = pressed,
            "s" | "arrowdown" => self.held.down = pressed,
            _ => {}
        }
    }

    fn on_tick(&mut self, host: &mut Host<'_>) {
        for event in self.sim.tick(self.held) {
            match event {
                PaddleEvent::Scored { .. } => self.show_scores(host),
                PaddleEvent::Won { winner } => {
                    self.tick.cancel(host.scheduler);
                    host.ui.toast(&format!("{} Wins!", winner.name()), TOAST_LONG_MS);
                }
            }
        }
        paint_court(host.draw, &self.sim);
    }

    fn on_start(&mut self, host: &mut Host<'_>) {
        if !self.sim.start() {
            host.ui.toast("Ping Pong game is already running.", TOAST_MS);
            return;
        }
        self.show_scores(host);
        self.tick.start_interval(host.scheduler, self.sim.tuning().tick_ms);
        host.ui.toast("Ping Pong game started!", TOAST_MS);
        paint_court(host.draw, &self.sim);
        log::info!("Ping pong started");
    }

    fn on_reset(&mut self, host: &mut Host<'_>) {
        self.tick.cancel(host.scheduler);
        self.sim.reset();
        self.show_scores(host);
        paint_court(host.draw, &self.sim);
        host.ui.toast("Ping Pong game reset.", TOAST_MS);
    }
}

impl Game for PaddleBallGame {
    fn name(&self) -> &'static str {
        ID
    }

    fn mount(&mut self, host: &mut Host<'_>) {
        let layout = Layout::new("Ping Pong")
            .label(PLAYER_SCORE, "0")
            .label(OPPONENT_SCORE, "0")
            .button(START, "Start")
            .button(RESET, "Reset")
            .hint("Use W and S keys to move your paddle.");
        host.ui.mount(&layout);

        let t = self.sim.tuning();
        host.draw.configure(t.court_width, t.court_height, 1.0);

        self.listeners.install(host.input, ListenerKind::KeyDown);
        self.listeners.install(host.input, ListenerKind::KeyUp);
        self.listeners.install(host.input, ListenerKind::Click(START));
        self.listeners.install(host.input, ListenerKind::Click(RESET));
        paint_court(host.draw, &self.sim);
    }

    fn handle(&mut self, event: &HostEvent, host: &mut Host<'_>) {
        match event {
            HostEvent::Timer(id) if self.tick.owns(*id) => self.on_tick(host),
            HostEvent::Input(id, input) if self.listeners.owns(*id) => match input {
                InputEvent::KeyDown { key } => self.track_key(key, true),
                InputEvent::KeyUp { key } => self.track_key(key, false),
                InputEvent::Click { element: START } => self.on_start(host),
                InputEvent::Click { element: RESET } => self.on_reset(host),
                _ => {}
            },
            _ => log::debug!("ping-pong: ignoring stale {:?}", event),
        }
    }

    fn teardown(&mut self, host: &mut Host<'_>) {
        self.tick.cancel(host.scheduler);
        self.listeners.release_all(host.input);
        self.sim.stop();
        self.held = HeldKeys::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::games::deliver;
    use crate::platform::{HeadlessPlatform, Platform};
    use glam::Vec2;

    fn started() -> (PaddleBallGame, HeadlessPlatform) {
        let mut platform = HeadlessPlatform::default();
        let mut game = PaddleBallGame::new(PaddleTuning::default(), 11);
        game.mount(&mut platform.host());
        let events = platform.input.click(START);
        deliver(&mut game, &mut platform, events);
        (game, platform)
    }

    fn tick(game: &mut PaddleBallGame, platform: &mut HeadlessPlatform) {
        let events = platform.scheduler.fire_intervals();
        deliver(game, platform, events);
    }

    #[test]
    fn test_start_schedules_60hz_tick() {
        let (mut game, mut platform) = started();
        assert_eq!(platform.scheduler.interval_periods(), vec![16]);
        assert_eq!(platform.input.active(), 4);
        assert_eq!(platform.ui.last_toast(), Some("Ping Pong game started!"));

        let events = platform.input.click(START);
        deliver(&mut game, &mut platform, events);
        assert_eq!(
            platform.ui.last_toast(),
            Some("Ping Pong game is already running.")
        );
        assert_eq!(platform.scheduler.active_timers(), 1);
    }

    #[test]
    fn test_held_keys_move_paddle_case_insensitively() {
        let (mut game, mut platform) = started();
        let y = game.sim().player.y;

        let events = platform.input.key_down("W");
        deliver(&mut game, &mut platform, events);
        tick(&mut game, &mut platform);
        assert_eq!(game.sim().player.y, y - 7.0);

        let events = platform.input.key_up("w");
        deliver(&mut game, &mut platform, events);
        tick(&mut game, &mut platform);
        assert_eq!(game.sim().player.y, y - 7.0);

        let events = platform.input.key_down("ArrowDown");
        deliver(&mut game, &mut platform, events);
        tick(&mut game, &mut platform);
        assert_eq!(game.sim().player.y, y);
    }

    #[test]
    fn test_every_tick_repaints() {
        let (mut game, mut platform) = started();
        platform.canvas.take_calls();
        tick(&mut game, &mut platform);
        assert_eq!(platform.canvas.circles().count(), 1);
    }

    #[test]
    fn test_score_labels_and_win() {
        let (mut game, mut platform) = started();
        let sim = game.sim_mut();
        sim.set_scores(4, 0);
        sim.ball.pos = Vec2::new(604.0, 100.0);
        sim.ball.vel = Vec2::new(5.0, 0.0);

        tick(&mut game, &mut platform);
        assert_eq!(platform.ui.label(PLAYER_SCORE), Some("5"));
        assert_eq!(platform.ui.label(OPPONENT_SCORE), Some("0"));
        assert_eq!(
            platform.ui.toasts.last(),
            Some(&("Player Wins!".to_string(), 5000))
        );
        assert_eq!(platform.scheduler.active_timers(), 0);
        assert!(!game.sim().is_running());

        // Start again after a win
        let events = platform.input.click(START);
        deliver(&mut game, &mut platform, events);
        assert_eq!(platform.ui.label(PLAYER_SCORE), Some("0"));
        assert_eq!(platform.scheduler.active_timers(), 1);
    }

    #[test]
    fn test_reset_stops_tick() {
        let (mut game, mut platform) = started();
        let events = platform.input.click(RESET);
        deliver(&mut game, &mut platform, events);
        assert_eq!(platform.scheduler.active_timers(), 0);
        assert_eq!(platform.ui.last_toast(), Some("Ping Pong game reset."));
        assert!(!game.sim().is_running());
    }

    #[test]
    fn test_teardown_twice() {
        let (mut game, mut platform) = started();
        game.teardown(&mut platform.host());
        game.teardown(&mut platform.host());
        assert!(platform.is_quiet());
        assert_eq!(platform.scheduler.stale_cancels, 0);
        assert_eq!(platform.input.stale_unlistens, 0);
    }
}
