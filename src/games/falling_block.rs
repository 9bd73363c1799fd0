//! Falling-block binding
//!
//! Owns the drop interval. Pausing cancels it, resuming and speed-ups re-create it at
//! the current interval.

use super::Game;
use crate::consts::{TOAST_LONG_MS, TOAST_MS};
use crate::platform::{Host, HostEvent, InputEvent, Layout, ListenerKind, ListenerSet, TimerSlot};
use crate::renderer::paint_board;
use crate::settings::FallingBlockTuning;
use crate::sim::{FallingBlocks, FallingEvent, FallingPhase};

pub const ID: &str = "tetris";

const START: &str = "tetris-start";
const PAUSE: &str = "tetris-pause";
const SCORE: &str = "tetris-score";

pub struct FallingBlockGame {
    sim: FallingBlocks,
    drop: TimerSlot,
    listeners: ListenerSet,
}

impl FallingBlockGame {
    pub fn new(tuning: FallingBlockTuning, seed: u64) -> Self {
        Self {
            sim: FallingBlocks::new(tuning, seed),
            drop: TimerSlot::default(),
            listeners: ListenerSet::default(),
        }
    }

    pub fn sim(&self) -> &FallingBlocks {
        &self.sim
    }

    #[cfg(test)]
    pub(crate) fn sim_mut(&mut self) -> &mut FallingBlocks {
        &mut self.sim
    }

    fn layout() -> Layout {
        Layout::new("Tetris")
            .label(SCORE, "Score: 0")
            .button(START, "Start")
            .button(PAUSE, "Pause")
            .hint("Use Arrow Keys to move and rotate.")
    }

    fn paint(&self, host: &mut Host<'_>) {
        paint_board(host.draw, &self.sim);
    }

    fn show_score(&self, host: &mut Host<'_>) {
        host.ui.set_label(SCORE, &format!("Score: {}", self.sim.score()));
    }

    fn apply(&mut self, events: Vec<FallingEvent>, host: &mut Host<'_>) {
        for event in events {
            match event {
                FallingEvent::Fell => {}
                FallingEvent::Locked { points, .. } => {
                    if points > 0 {
                        self.show_score(host);
                    }
                }
                FallingEvent::SpeedUp { interval_ms } => {
                    if self.sim.phase() == FallingPhase::Running {
                        self.drop.start_interval(host.scheduler, interval_ms);
                        host.ui.toast(
                            &format!("Speed Increased! Interval: {}ms", interval_ms),
                            TOAST_MS,
                        );
                    }
                }
                FallingEvent::GameOver => {
                    self.drop.cancel(host.scheduler);
                    host.ui.toast("Game Over!", TOAST_LONG_MS);
                }
            }
        }
    }

    fn on_key(&mut self, key: &str, host: &mut Host<'_>) {
        if self.sim.phase() != FallingPhase::Running {
            return;
        }
        match key {
            "ArrowLeft" => {
                self.sim.shift(-1);
            }
            "ArrowRight" => {
                self.sim.shift(1);
            }
            "ArrowDown" => {
                let events = self.sim.soft_drop();
                self.apply(events, host);
            }
            "ArrowUp" => {
                self.sim.rotate();
            }
            _ => return,
        }
        self.paint(host);
    }

    fn on_start(&mut self, host: &mut Host<'_>) {
        if let Err(refusal) = self.sim.start() {
            host.ui.toast(refusal.message(), TOAST_MS);
            return;
        }
        self.drop.start_interval(host.scheduler, self.sim.drop_interval_ms());
        host.ui.set_button_text(PAUSE, "Pause");
        self.show_score(host);
        host.ui.toast("Tetris game started!", TOAST_MS);
        self.paint(host);
        log::info!("Tetris started");
    }

    fn on_pause(&mut self, host: &mut Host<'_>) {
        match self.sim.toggle_pause() {
            Err(refusal) => host.ui.toast(refusal.message(), TOAST_MS),
            Ok(FallingPhase::Paused) => {
                self.drop.cancel(host.scheduler);
                host.ui.set_button_text(PAUSE, "Resume");
                host.ui.toast("Tetris game paused.", TOAST_MS);
            }
            Ok(_) => {
                self.drop.start_interval(host.scheduler, self.sim.drop_interval_ms());
                host.ui.set_button_text(PAUSE, "Pause");
                host.ui.toast("Tetris game resumed.", TOAST_MS);
            }
        }
    }
}

impl Game for FallingBlockGame {
    fn name(&self) -> &'static str {
        ID
    }

    fn mount(&mut self, host: &mut Host<'_>) {
        let t = self.sim.tuning();
        host.ui.mount(&Self::layout());
        host.draw
            .configure(t.width as f32, t.height as f32, t.block_size);

        self.listeners.install(host.input, ListenerKind::KeyDown);
        self.listeners.install(host.input, ListenerKind::Click(START));
        self.listeners.install(host.input, ListenerKind::Click(PAUSE));
        self.paint(host);
    }

    fn handle(&mut self, event: &HostEvent, host: &mut Host<'_>) {
        match event {
            HostEvent::Timer(id) if self.drop.owns(*id) => {
                let events = self.sim.step();
                self.apply(events, host);
                self.paint(host);
            }
            HostEvent::Input(id, input) if self.listeners.owns(*id) => match input {
                InputEvent::KeyDown { key } => self.on_key(key, host),
                InputEvent::Click { element: START } => self.on_start(host),
                InputEvent::Click { element: PAUSE } => self.on_pause(host),
                _ => {}
            },
            _ => log::debug!("tetris: ignoring stale {:?}", event),
        }
    }

    fn teardown(&mut self, host: &mut Host<'_>) {
        self.drop.cancel(host.scheduler);
        self.listeners.release_all(host.input);
    }
}
