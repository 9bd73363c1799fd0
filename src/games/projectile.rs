//! Projectile-golf binding
//!
//! Frames are requested one at a time and only while a shot is flying. A sunk hole
//! (other than the last) arms a one-shot timer that loads the next one.

use super::Game;
use crate::consts::{TOAST_LONG_MS, TOAST_MS, TOAST_SHORT_MS};
use crate::platform::{
    FrameSlot, Host, HostEvent, InputEvent, Label, Layout, ListenerKind, ListenerSet, Slider,
    TimerSlot,
};
use crate::renderer::paint_course;
use crate::settings::ProjectileTuning;
use crate::sim::{LaunchRefusal, ProjectileCourse, ShotOutcome};

pub const ID: &str = "projectile";

const ANGLE: &str = "launch-angle";
const POWER: &str = "launch-power";
const ANGLE_VALUE: &str = "angle-value";
const POWER_VALUE: &str = "power-value";
const LAUNCH: &str = "projectile-launch";
const RESET_LEVEL: &str = "projectile-reset-level";
const RESET_GAME: &str = "projectile-reset-game";
const LEVEL: &str = "level-display";
const SHOTS: &str = "shot-display";
const PAR: &str = "par-display";

const READY: &str = "Ready to launch!";

pub struct ProjectileGame {
    sim: ProjectileCourse,
    frame: FrameSlot,
    advance: TimerSlot,
    listeners: ListenerSet,
}

impl ProjectileGame {
    pub fn new(tuning: ProjectileTuning) -> Self {
        Self {
            sim: ProjectileCourse::with_builtin_levels(tuning),
            frame: FrameSlot::default(),
            advance: TimerSlot::default(),
            listeners: ListenerSet::default(),
        }
    }

    #[cfg(test)]
    pub(crate) fn with_course(sim: ProjectileCourse) -> Self {
        Self {
            sim,
            frame: FrameSlot::default(),
            advance: TimerSlot::default(),
            listeners: ListenerSet::default(),
        }
    }

    pub fn sim(&self) -> &ProjectileCourse {
        &self.sim
    }

    fn layout(&self) -> Layout {
        let t = self.sim.tuning();
        Layout::new("Projectile Golf")
            .label(LEVEL, format!("Level: {}", self.sim.level_number()))
            .label(SHOTS, format!("Shots: {}", self.sim.shots()))
            .label(PAR, format!("Par: {}", self.sim.level().par))
            .slider(Slider {
                id: ANGLE,
                caption: "Angle:",
                min: t.angle_range.0,
                max: t.angle_range.1,
                value: self.sim.angle(),
                readout: Label {
                    id: ANGLE_VALUE,
                    text: format!("{}°", self.sim.angle()),
                },
            })
            .slider(Slider {
                id: POWER,
                caption: "Power:",
                min: t.power_range.0,
                max: t.power_range.1,
                value: self.sim.power(),
                readout: Label {
                    id: POWER_VALUE,
                    text: self.sim.power().to_string(),
                },
            })
            .button(LAUNCH, "Launch")
            .button(RESET_LEVEL, "Reset Level")
            .button(RESET_GAME, "Restart Game")
            .with_status()
    }

    fn show_card(&self, host: &mut Host<'_>) {
        host.ui.set_label(LEVEL, &format!("Level: {}", self.sim.level_number()));
        host.ui.set_label(SHOTS, &format!("Shots: {}", self.sim.shots()));
        host.ui.set_label(PAR, &format!("Par: {}", self.sim.level().par));
    }

    fn paint(&self, host: &mut Host<'_>) {
        paint_course(host.draw, &self.sim);
    }

    /// Stop any flight and any pending advance
    fn halt(&mut self, host: &mut Host<'_>) {
        self.frame.cancel(host.scheduler);
        self.advance.cancel(host.scheduler);
    }

    fn on_aim(&mut self, element: &str, value: i32, host: &mut Host<'_>) {
        match element {
            ANGLE => {
                let angle = self.sim.set_angle(value);
                host.ui.set_label(ANGLE_VALUE, &format!("{}°", angle));
            }
            POWER => {
                let power = self.sim.set_power(value);
                host.ui.set_label(POWER_VALUE, &power.to_string());
            }
            _ => return,
        }
        if !self.sim.is_flying() {
            self.paint(host);
        }
    }

    fn on_launch(&mut self, host: &mut Host<'_>) {
        match self.sim.launch() {
            Ok(_) => {
                host.ui.set_label(SHOTS, &format!("Shots: {}", self.sim.shots()));
                host.ui.set_status("Launching...");
                self.frame.request(host.scheduler);
                self.paint(host);
            }
            Err(LaunchRefusal::InFlight) => host.ui.toast("Shot in progress!", TOAST_SHORT_MS),
            Err(refusal) => log::debug!("projectile: launch refused ({:?})", refusal),
        }
    }

    fn on_frame(&mut self, host: &mut Host<'_>) {
        match self.sim.frame() {
            None => self.frame.request(host.scheduler),
            Some(ShotOutcome::Landed { .. }) => {
                host.ui.set_status("Landed!");
                host.ui.toast("Landed!", TOAST_MS);
            }
            Some(ShotOutcome::OutOfBounds) => {
                host.ui.set_status("Out of bounds!");
                host.ui.toast("Out of bounds!", TOAST_MS);
            }
            Some(ShotOutcome::TargetHit {
                tier,
                level,
                shots,
                total,
                won,
            }) => {
                if won {
                    let message = format!("{} You Win! Total: {} shots", tier.label(), total);
                    host.ui.set_status(&message);
                    host.ui.toast(&message, TOAST_LONG_MS);
                } else {
                    let message =
                        format!("{} Level {} done in {} shots!", tier.label(), level, shots);
                    host.ui.set_status(&message);
                    host.ui.toast(&message, TOAST_MS);
                    let delay = self.sim.tuning().advance_delay_ms;
                    self.advance.start_timeout(host.scheduler, delay);
                }
            }
        }
        self.paint(host);
    }

    fn on_advance(&mut self, host: &mut Host<'_>) {
        if self.sim.advance_level() {
            log::info!("Projectile: hole {}", self.sim.level_number());
            self.show_card(host);
            host.ui.set_status(READY);
            self.paint(host);
        }
    }

    fn on_reset_level(&mut self, host: &mut Host<'_>) {
        self.halt(host);
        self.sim.reset_level();
        self.show_card(host);
        host.ui.set_status(READY);
        self.paint(host);
        host.ui.toast(
            &format!("Level {} reset.", self.sim.level_number()),
            TOAST_MS,
        );
    }

    fn on_reset_game(&mut self, host: &mut Host<'_>) {
        self.halt(host);
        self.sim.reset_game();
        self.show_card(host);
        host.ui.set_status(READY);
        self.paint(host);
        host.ui.toast("Projectile game restarted from Level 1.", TOAST_MS);
    }
}

impl Game for ProjectileGame {
    fn name(&self) -> &'static str {
        ID
    }

    fn mount(&mut self, host: &mut Host<'_>) {
        host.ui.mount(&self.layout());
        host.ui.set_status(READY);

        let t = self.sim.tuning();
        host.draw.configure(t.course_width, t.course_height, 1.0);

        for kind in [
            ListenerKind::Change(ANGLE),
            ListenerKind::Change(POWER),
            ListenerKind::Click(LAUNCH),
            ListenerKind::Click(RESET_LEVEL),
            ListenerKind::Click(RESET_GAME),
        ] {
            self.listeners.install(host.input, kind);
        }
        self.paint(host);
    }

    fn handle(&mut self, event: &HostEvent, host: &mut Host<'_>) {
        match event {
            HostEvent::Frame(id) if self.frame.complete(*id) => self.on_frame(host),
            HostEvent::Timer(id) if self.advance.complete(*id) => self.on_advance(host),
            HostEvent::Input(id, input) if self.listeners.owns(*id) => match input {
                InputEvent::Change { element, value } => self.on_aim(element, *value, host),
                InputEvent::Click { element: LAUNCH } => self.on_launch(host),
                InputEvent::Click {
                    element: RESET_LEVEL,
                } => self.on_reset_level(host),
                InputEvent::Click {
                    element: RESET_GAME,
                } => self.on_reset_game(host),
                _ => {}
            },
            _ => log::debug!("projectile: ignoring stale {:?}", event),
        }
    }

    fn teardown(&mut self, host: &mut Host<'_>) {
        self.halt(host);
        self.listeners.release_all(host.input);
    }
}
