//! Headless platform
//!
//! Nothing fires on its own: the owner pulls events out (`fire_intervals`,
//! `fire_timeouts`, `take_frames`, `key_down`, ...) and feeds them to the arcade. Every
//! registration and cancellation is counted, which is what the lifecycle tests check.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use super::input::{InputEvent, InputSurface, ListenerId, ListenerKind};
use super::scheduler::{FrameId, Scheduler, TimerId};
use super::surface::{DrawSurface, Layout, Presentation};
use super::{Host, HostEvent, Platform};

#[derive(Debug, Default)]
pub struct HeadlessScheduler {
    next_id: u32,
    intervals: BTreeMap<TimerId, u32>,
    timeouts: BTreeMap<TimerId, u32>,
    frames: BTreeSet<FrameId>,
    /// Timers and frames ever registered
    pub started: usize,
    /// Live timers and frames cancelled
    pub cancelled: usize,
    /// Cancellations of ids that were not live
    pub stale_cancels: usize,
}

impl HeadlessScheduler {
    fn next(&mut self) -> u32 {
        self.next_id += 1;
        self.started += 1;
        self.next_id
    }

    /// Live intervals plus pending timeouts
    pub fn active_timers(&self) -> usize {
        self.intervals.len() + self.timeouts.len()
    }

    pub fn active_intervals(&self) -> usize {
        self.intervals.len()
    }

    pub fn pending_timeouts(&self) -> usize {
        self.timeouts.len()
    }

    pub fn pending_frames(&self) -> usize {
        self.frames.len()
    }

    /// Periods of the live intervals, in registration order
    pub fn interval_periods(&self) -> Vec<u32> {
        self.intervals.values().copied().collect()
    }

    /// One tick of every live interval
    pub fn fire_intervals(&self) -> Vec<HostEvent> {
        self.intervals.keys().map(|&id| HostEvent::Timer(id)).collect()
    }

    /// Expire every pending timeout
    pub fn fire_timeouts(&mut self) -> Vec<HostEvent> {
        std::mem::take(&mut self.timeouts)
            .into_keys()
            .map(HostEvent::Timer)
            .collect()
    }

    /// Deliver every requested frame
    pub fn take_frames(&mut self) -> Vec<HostEvent> {
        std::mem::take(&mut self.frames)
            .into_iter()
            .map(HostEvent::Frame)
            .collect()
    }
}

impl Scheduler for HeadlessScheduler {
    fn start_interval(&mut self, ms: u32) -> TimerId {
        let id = TimerId(self.next());
        self.intervals.insert(id, ms);
        id
    }

    fn start_timeout(&mut self, ms: u32) -> TimerId {
        let id = TimerId(self.next());
        self.timeouts.insert(id, ms);
        id
    }

    fn cancel_timer(&mut self, id: TimerId) {
        if self.intervals.remove(&id).is_some() || self.timeouts.remove(&id).is_some() {
            self.cancelled += 1;
        } else {
            self.stale_cancels += 1;
        }
    }

    fn request_frame(&mut self) -> FrameId {
        let id = FrameId(self.next());
        self.frames.insert(id);
        id
    }

    fn cancel_frame(&mut self, id: FrameId) {
        if self.frames.remove(&id) {
            self.cancelled += 1;
        } else {
            self.stale_cancels += 1;
        }
    }
}

#[derive(Debug, Default)]
pub struct HeadlessInput {
    next_id: u32,
    listeners: BTreeMap<ListenerId, ListenerKind>,
    pub installed: usize,
    pub removed: usize,
    pub stale_unlistens: usize,
}

impl HeadlessInput {
    pub fn active(&self) -> usize {
        self.listeners.len()
    }

    /// Events for every listener that would see `event`
    pub fn emit(&self, event: InputEvent) -> Vec<HostEvent> {
        self.listeners
            .iter()
            .filter(|(_, kind)| kind.accepts(&event))
            .map(|(&id, _)| HostEvent::Input(id, event.clone()))
            .collect()
    }

    pub fn key_down(&self, key: &str) -> Vec<HostEvent> {
        self.emit(InputEvent::KeyDown { key: key.into() })
    }

    pub fn key_up(&self, key: &str) -> Vec<HostEvent> {
        self.emit(InputEvent::KeyUp { key: key.into() })
    }

    pub fn click(&self, element: &'static str) -> Vec<HostEvent> {
        self.emit(InputEvent::Click { element })
    }

    pub fn change(&self, element: &'static str, value: i32) -> Vec<HostEvent> {
        self.emit(InputEvent::Change { element, value })
    }
}

impl InputSurface for HeadlessInput {
    fn listen(&mut self, kind: ListenerKind) -> ListenerId {
        self.next_id += 1;
        self.installed += 1;
        let id = ListenerId(self.next_id);
        self.listeners.insert(id, kind);
        id
    }

    fn unlisten(&mut self, id: ListenerId) {
        if self.listeners.remove(&id).is_some() {
            self.removed += 1;
        } else {
            self.stale_unlistens += 1;
        }
    }
}

/// A recorded draw call
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCall {
    FillRect { x: f32, y: f32, w: f32, h: f32, color: String },
    StrokeRect { x: f32, y: f32, w: f32, h: f32, color: String },
    FillCircle { x: f32, y: f32, r: f32, color: String },
    Line { x1: f32, y1: f32, x2: f32, y2: f32, color: String },
}

#[derive(Debug, Default)]
pub struct HeadlessCanvas {
    /// Last `configure` call: (width, height, scale)
    pub size: Option<(f32, f32, f32)>,
    pub calls: Vec<DrawCall>,
}

impl HeadlessCanvas {
    pub fn take_calls(&mut self) -> Vec<DrawCall> {
        std::mem::take(&mut self.calls)
    }

    pub fn circles(&self) -> impl Iterator<Item = &DrawCall> {
        self.calls
            .iter()
            .filter(|c| matches!(c, DrawCall::FillCircle { .. }))
    }
}

impl DrawSurface for HeadlessCanvas {
    fn configure(&mut self, width: f32, height: f32, scale: f32) {
        self.size = Some((width, height, scale));
    }

    fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: &str) {
        self.calls.push(DrawCall::FillRect {
            x,
            y,
            w,
            h,
            color: color.into(),
        });
    }

    fn stroke_rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: &str, _line_width: f32) {
        self.calls.push(DrawCall::StrokeRect {
            x,
            y,
            w,
            h,
            color: color.into(),
        });
    }

    fn fill_circle(&mut self, x: f32, y: f32, r: f32, color: &str) {
        self.calls.push(DrawCall::FillCircle {
            x,
            y,
            r,
            color: color.into(),
        });
    }

    fn draw_line(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, color: &str, _width: f32) {
        self.calls.push(DrawCall::Line {
            x1,
            y1,
            x2,
            y2,
            color: color.into(),
        });
    }
}

#[derive(Debug, Default)]
pub struct HeadlessUi {
    pub mounted: Option<Layout>,
    pub labels: HashMap<String, String>,
    pub buttons: HashMap<String, String>,
    pub status: String,
    /// Every toast shown: (message, duration)
    pub toasts: Vec<(String, u32)>,
    pub clears: usize,
}

impl HeadlessUi {
    pub fn label(&self, id: &str) -> Option<&str> {
        self.labels.get(id).map(String::as_str)
    }

    pub fn button(&self, id: &str) -> Option<&str> {
        self.buttons.get(id).map(String::as_str)
    }

    pub fn last_toast(&self) -> Option<&str> {
        self.toasts.last().map(|(m, _)| m.as_str())
    }

    pub fn toasted(&self, message: &str) -> bool {
        self.toasts.iter().any(|(m, _)| m == message)
    }
}

impl Presentation for HeadlessUi {
    fn mount(&mut self, layout: &Layout) {
        self.labels.clear();
        self.buttons.clear();
        self.status.clear();
        for label in layout
            .labels
            .iter()
            .chain(layout.sliders.iter().map(|s| &s.readout))
        {
            self.labels.insert(label.id.into(), label.text.clone());
        }
        for button in &layout.buttons {
            self.buttons.insert(button.id.into(), button.text.into());
        }
        self.mounted = Some(layout.clone());
    }

    fn clear(&mut self) {
        self.mounted = None;
        self.labels.clear();
        self.buttons.clear();
        self.status.clear();
        self.clears += 1;
    }

    fn set_status(&mut self, text: &str) {
        self.status = text.into();
    }

    fn set_label(&mut self, id: &str, text: &str) {
        self.labels.insert(id.into(), text.into());
    }

    fn set_button_text(&mut self, id: &str, text: &str) {
        self.buttons.insert(id.into(), text.into());
    }

    fn toast(&mut self, message: &str, duration_ms: u32) {
        self.toasts.push((message.into(), duration_ms));
    }
}

/// Manually driven platform for tests and the native demo
#[derive(Debug, Default)]
pub struct HeadlessPlatform {
    pub scheduler: HeadlessScheduler,
    pub input: HeadlessInput,
    pub canvas: HeadlessCanvas,
    pub ui: HeadlessUi,
}

impl HeadlessPlatform {
    /// Anything still registered?
    pub fn is_quiet(&self) -> bool {
        self.scheduler.active_timers() == 0
            && self.scheduler.pending_frames() == 0
            && self.input.active() == 0
    }
}

impl Platform for HeadlessPlatform {
    fn host(&mut self) -> Host<'_> {
        Host {
            scheduler: &mut self.scheduler,
            input: &mut self.input,
            draw: &mut self.canvas,
            ui: &mut self.ui,
        }
    }
}
