//! Game bindings
//!
//! A binding owns one simulation plus every timer, frame request and listener it
//! registered on its behalf. The arcade talks to bindings only through [`Game`].

pub mod falling_block;
pub mod paddle_ball;
pub mod projectile;

use std::collections::BTreeMap;

use crate::platform::{Host, HostEvent};
use crate::settings::Settings;

pub use falling_block::FallingBlockGame;
pub use paddle_ball::PaddleBallGame;
pub use projectile::ProjectileGame;

/// A loaded game
pub trait Game {
    /// Catalog id
    fn name(&self) -> &'static str;

    /// Build the panel, size the canvas, register listeners and paint the first frame
    fn mount(&mut self, host: &mut Host<'_>);

    /// React to a firing. Events for handles this game doesn't own are ignored.
    fn handle(&mut self, event: &HostEvent, host: &mut Host<'_>);

    /// Cancel every timer and frame request and remove every listener.
    /// Calling it again does nothing.
    fn teardown(&mut self, host: &mut Host<'_>);
}

/// Builds a fresh game from the arcade settings and a seed
pub type Factory = Box<dyn Fn(&Settings, u64) -> Box<dyn Game>>;

/// Games the arcade can load, by id
pub struct Catalog {
    factories: BTreeMap<&'static str, Factory>,
}

impl Catalog {
    pub fn empty() -> Self {
        Self {
            factories: BTreeMap::new(),
        }
    }

    /// The three built-in games
    pub fn builtin() -> Self {
        let mut catalog = Self::empty();
        catalog.register(falling_block::ID, |settings, seed| {
            Box::new(FallingBlockGame::new(settings.falling.clone(), seed))
        });
        catalog.register(paddle_ball::ID, |settings, seed| {
            Box::new(PaddleBallGame::new(settings.paddle.clone(), seed))
        });
        catalog.register(projectile::ID, |settings, _seed| {
            Box::new(ProjectileGame::new(settings.projectile.clone()))
        });
        catalog
    }

    /// Add (or replace) a game under `id`
    pub fn register<F>(&mut self, id: &'static str, factory: F)
    where
        F: Fn(&Settings, u64) -> Box<dyn Game> + 'static,
    {
        if self.factories.insert(id, Box::new(factory)).is_some() {
            log::warn!("Replacing game '{}' in catalog", id);
        }
    }

    pub fn create(&self, id: &str, settings: &Settings, seed: u64) -> Option<Box<dyn Game>> {
        self.factories.get(id).map(|factory| factory(settings, seed))
    }

    pub fn contains(&self, id: &str) -> bool {
        self.factories.contains_key(id)
    }

    pub fn ids(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.factories.keys().copied()
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::builtin()
    }
}

/// Feed a batch of events straight to one game
#[cfg(test)]
pub(crate) fn deliver(
    game: &mut dyn Game,
    platform: &mut crate::platform::HeadlessPlatform,
    events: Vec<HostEvent>,
) {
    use crate::platform::Platform;
    for event in events {
        game.handle(&event, &mut platform.host());
    }
}
