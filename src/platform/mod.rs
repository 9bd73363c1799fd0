//! Platform abstraction layer
//!
//! Games never touch the browser directly. They get a [`Host`] for the duration of
//! one call, holding the four capabilities they may use:
//! - `Scheduler`: repeating intervals, one-shot timeouts, display frames
//! - `InputSurface`: key, click and slider listeners
//! - `DrawSurface`: canvas primitives
//! - `Presentation`: panel markup, labels, status line and toasts
//!
//! Every timer, frame and input firing comes back as a [`HostEvent`] through
//! `Arcade::dispatch`.

pub mod headless;
pub mod input;
pub mod scheduler;
pub mod surface;
#[cfg(target_arch = "wasm32")]
pub mod web;

pub use headless::HeadlessPlatform;
pub use input::{InputEvent, InputSurface, ListenerId, ListenerKind, ListenerSet};
pub use scheduler::{FrameId, FrameSlot, Scheduler, TimerId, TimerSlot};
pub use surface::{Button, DrawSurface, Label, Layout, Presentation, Slider};

/// A firing delivered back to the arcade
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostEvent {
    /// An interval ticked or a timeout expired
    Timer(TimerId),
    /// A requested display frame arrived
    Frame(FrameId),
    Input(ListenerId, InputEvent),
}

/// Capabilities lent to a game for one call
pub struct Host<'a> {
    pub scheduler: &'a mut dyn Scheduler,
    pub input: &'a mut dyn InputSurface,
    pub draw: &'a mut dyn DrawSurface,
    pub ui: &'a mut dyn Presentation,
}

/// Something that can lend out a [`Host`]
pub trait Platform {
    fn host(&mut self) -> Host<'_>;
}
