//! Session lifecycle
//!
//! The arcade keeps at most one game loaded. Switching always tears the old game down
//! (timers, frames, listeners) before the next one is built, and every host firing is
//! routed to whichever game is loaded at the time it arrives.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::games::{Catalog, Game};
use crate::platform::{HostEvent, Platform};
use crate::settings::Settings;

struct ActiveSession {
    id: &'static str,
    game: Box<dyn Game>,
}

pub struct Arcade<P: Platform> {
    platform: P,
    catalog: Catalog,
    settings: Settings,
    active: Option<ActiveSession>,
    /// Seeds each activation's game
    seeds: Pcg32,
}

impl<P: Platform> Arcade<P> {
    /// Arcade with the built-in games
    pub fn new(platform: P, settings: Settings, seed: u64) -> Self {
        Self::with_catalog(platform, Catalog::builtin(), settings, seed)
    }

    pub fn with_catalog(platform: P, catalog: Catalog, settings: Settings, seed: u64) -> Self {
        Self {
            platform,
            catalog,
            settings: settings.validate(),
            active: None,
            seeds: Pcg32::seed_from_u64(seed),
        }
    }

    /// Load game `id`, unloading whatever was loaded first.
    ///
    /// Unknown ids clear the display and leave nothing loaded; returns false.
    pub fn activate(&mut self, id: &str) -> bool {
        self.deactivate();

        let seed = self.seeds.random::<u64>();
        let Some(mut game) = self.catalog.create(id, &self.settings, seed) else {
            log::warn!("Unknown game '{}'", id);
            self.platform.host().ui.clear();
            return false;
        };

        game.mount(&mut self.platform.host());
        log::info!("Loaded {}", game.name());
        self.active = Some(ActiveSession {
            id: game.name(),
            game,
        });
        true
    }

    /// Unload the current game, if any
    pub fn deactivate(&mut self) {
        if let Some(mut session) = self.active.take() {
            session.game.teardown(&mut self.platform.host());
            log::info!("Unloaded {}", session.id);
        }
    }

    /// Route a host firing to the loaded game
    pub fn dispatch(&mut self, event: HostEvent) {
        match self.active.as_mut() {
            Some(session) => session.game.handle(&event, &mut self.platform.host()),
            None => log::debug!("No game loaded; dropping {:?}", event),
        }
    }

    pub fn active_id(&self) -> Option<&'static str> {
        self.active.as_ref().map(|s| s.id)
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Registration hook for games built outside this crate
    pub fn catalog_mut(&mut self) -> &mut Catalog {
        &mut self.catalog
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn platform(&self) -> &P {
        &self.platform
    }

    pub fn platform_mut(&mut self) -> &mut P {
        &mut self.platform
    }
}
