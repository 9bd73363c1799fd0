//! Browser platform
//!
//! Every registered callback is a `Closure` kept in a shared registry until it is
//! cancelled (or, for one-shots, until it fires). It then moves to a retired list, and
//! the retired list is dropped at the start of the next callback, so a closure is
//! never freed while it is running.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::{Rc, Weak};

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{
    CanvasRenderingContext2d, Document, EventTarget, HtmlCanvasElement, HtmlInputElement,
    KeyboardEvent, Window,
};

use super::input::{InputEvent, InputSurface, ListenerId, ListenerKind};
use super::scheduler::{FrameId, Scheduler, TimerId};
use super::surface::{DrawSurface, Layout, Presentation};
use super::{Host, HostEvent, Platform};

/// Where firings go (the page's arcade)
pub type EventSink = Rc<dyn Fn(HostEvent)>;

const GAME_AREA: &str = "game-area";
const CANVAS: &str = "arcade-canvas";
const STATUS: &str = "arcade-status";
const MESSAGE_BOX: &str = "message-box";

const PLACEHOLDER: &str = r#"<h2 class="text-2xl font-semibold text-center mb-4 text-gray-800">Select a game from the menu above!</h2>"#;

struct TimerEntry {
    handle: i32,
    repeating: bool,
    closure: Closure<dyn FnMut()>,
}

struct FrameEntry {
    handle: i32,
    closure: Closure<dyn FnMut(f64)>,
}

struct ListenerEntry {
    target: EventTarget,
    event: &'static str,
    closure: Closure<dyn FnMut(web_sys::Event)>,
}

// Held only until the next purge drops them
#[allow(dead_code)]
enum Retired {
    Timer(Closure<dyn FnMut()>),
    Frame(Closure<dyn FnMut(f64)>),
    Listener(Closure<dyn FnMut(web_sys::Event)>),
}

#[derive(Default)]
struct Registry {
    timers: HashMap<TimerId, TimerEntry>,
    frames: HashMap<FrameId, FrameEntry>,
    listeners: HashMap<ListenerId, ListenerEntry>,
    retired: Vec<Retired>,
}

impl Registry {
    /// Move a timer's closure to the retired list; returns its handle and whether it repeats
    fn retire_timer(&mut self, id: TimerId) -> Option<(i32, bool)> {
        let entry = self.timers.remove(&id)?;
        self.retired.push(Retired::Timer(entry.closure));
        Some((entry.handle, entry.repeating))
    }
}

/// Called first thing in every callback: free what earlier callbacks retired, then let
/// a fired one-shot retire itself.
fn enter(registry: &Weak<RefCell<Registry>>, finished: impl FnOnce(&mut Registry)) {
    let Some(registry) = registry.upgrade() else {
        return;
    };
    match registry.try_borrow_mut() {
        Ok(mut registry) => {
            registry.retired.clear();
            finished(&mut registry);
        }
        Err(_) => log::warn!("Callback registry busy"),
    };
}

pub struct WebScheduler {
    window: Window,
    registry: Rc<RefCell<Registry>>,
    sink: EventSink,
    next_id: u32,
}

impl WebScheduler {
    fn next(&mut self) -> u32 {
        self.next_id += 1;
        self.next_id
    }

    fn timer_closure(&self, id: TimerId, one_shot: bool) -> Closure<dyn FnMut()> {
        let registry = Rc::downgrade(&self.registry);
        let sink = self.sink.clone();
        Closure::<dyn FnMut()>::new(move || {
            enter(&registry, |r| {
                if one_shot {
                    r.retire_timer(id);
                }
            });
            sink(HostEvent::Timer(id));
        })
    }

    fn start_timer(&mut self, ms: u32, repeating: bool) -> TimerId {
        let id = TimerId(self.next());
        let closure = self.timer_closure(id, !repeating);
        let callback = closure.as_ref().unchecked_ref();
        let handle = if repeating {
            self.window
                .set_interval_with_callback_and_timeout_and_arguments_0(callback, ms as i32)
        } else {
            self.window
                .set_timeout_with_callback_and_timeout_and_arguments_0(callback, ms as i32)
        };

        match handle {
            Ok(handle) => {
                self.registry.borrow_mut().timers.insert(
                    id,
                    TimerEntry {
                        handle,
                        repeating,
                        closure,
                    },
                );
            }
            Err(e) => log::warn!("Failed to schedule timer: {:?}", e),
        }
        id
    }
}

impl Scheduler for WebScheduler {
    fn start_interval(&mut self, ms: u32) -> TimerId {
        self.start_timer(ms, true)
    }

    fn start_timeout(&mut self, ms: u32) -> TimerId {
        self.start_timer(ms, false)
    }

    fn cancel_timer(&mut self, id: TimerId) {
        let Some((handle, repeating)) = self.registry.borrow_mut().retire_timer(id) else {
            return;
        };
        if repeating {
            self.window.clear_interval_with_handle(handle);
        } else {
            self.window.clear_timeout_with_handle(handle);
        }
    }

    fn request_frame(&mut self) -> FrameId {
        let id = FrameId(self.next());
        let registry = Rc::downgrade(&self.registry);
        let sink = self.sink.clone();
        let closure = Closure::<dyn FnMut(f64)>::new(move |_time: f64| {
            enter(&registry, |r| {
                if let Some(entry) = r.frames.remove(&id) {
                    r.retired.push(Retired::Frame(entry.closure));
                }
            });
            sink(HostEvent::Frame(id));
        });

        match self
            .window
            .request_animation_frame(closure.as_ref().unchecked_ref())
        {
            Ok(handle) => {
                self.registry
                    .borrow_mut()
                    .frames
                    .insert(id, FrameEntry { handle, closure });
            }
            Err(e) => log::warn!("Failed to request animation frame: {:?}", e),
        }
        id
    }

    fn cancel_frame(&mut self, id: FrameId) {
        let mut registry = self.registry.borrow_mut();
        if let Some(entry) = registry.frames.remove(&id) {
            if let Err(e) = self.window.cancel_animation_frame(entry.handle) {
                log::warn!("Failed to cancel animation frame: {:?}", e);
            }
            registry.retired.push(Retired::Frame(entry.closure));
        }
    }
}

pub struct WebInput {
    document: Document,
    registry: Rc<RefCell<Registry>>,
    sink: EventSink,
    next_id: u32,
}

/// Turn a DOM event into an input event for a listener of `kind`
fn translate(kind: ListenerKind, event: &web_sys::Event) -> Option<InputEvent> {
    match kind {
        ListenerKind::KeyDown => {
            let key = event.dyn_ref::<KeyboardEvent>()?.key();
            // Keep the arrow keys from scrolling the page while a game listens
            if key.starts_with("Arrow") {
                event.prevent_default();
            }
            Some(InputEvent::KeyDown { key })
        }
        ListenerKind::KeyUp => Some(InputEvent::KeyUp {
            key: event.dyn_ref::<KeyboardEvent>()?.key(),
        }),
        ListenerKind::Click(element) => Some(InputEvent::Click { element }),
        ListenerKind::Change(element) => {
            let input = event.target()?.dyn_into::<HtmlInputElement>().ok()?;
            let value = input.value().parse().ok()?;
            Some(InputEvent::Change { element, value })
        }
    }
}

impl InputSurface for WebInput {
    fn listen(&mut self, kind: ListenerKind) -> ListenerId {
        self.next_id += 1;
        let id = ListenerId(self.next_id);

        let (target, event): (EventTarget, &'static str) = match kind {
            ListenerKind::KeyDown => (self.document.clone().into(), "keydown"),
            ListenerKind::KeyUp => (self.document.clone().into(), "keyup"),
            ListenerKind::Click(element) | ListenerKind::Change(element) => {
                let Some(el) = self.document.get_element_by_id(element) else {
                    log::warn!("No element #{} to listen on", element);
                    return id;
                };
                let event = if matches!(kind, ListenerKind::Click(_)) {
                    "click"
                } else {
                    "input"
                };
                (el.into(), event)
            }
        };

        let registry = Rc::downgrade(&self.registry);
        let sink = self.sink.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::Event| {
            enter(&registry, |_| {});
            if let Some(input) = translate(kind, &event) {
                sink(HostEvent::Input(id, input));
            }
        });

        match target.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref()) {
            Ok(()) => {
                self.registry.borrow_mut().listeners.insert(
                    id,
                    ListenerEntry {
                        target,
                        event,
                        closure,
                    },
                );
            }
            Err(e) => log::warn!("Failed to add {} listener: {:?}", event, e),
        }
        id
    }

    fn unlisten(&mut self, id: ListenerId) {
        let mut registry = self.registry.borrow_mut();
        if let Some(entry) = registry.listeners.remove(&id) {
            let callback = entry.closure.as_ref().unchecked_ref();
            if let Err(e) = entry
                .target
                .remove_event_listener_with_callback(entry.event, callback)
            {
                log::warn!("Failed to remove {} listener: {:?}", entry.event, e);
            }
            registry.retired.push(Retired::Listener(entry.closure));
        }
    }
}

/// 2D canvas inside the mounted panel
pub struct WebCanvas {
    document: Document,
    context: Option<CanvasRenderingContext2d>,
}

impl DrawSurface for WebCanvas {
    fn configure(&mut self, width: f32, height: f32, scale: f32) {
        self.context = None;
        let Some(canvas) = self
            .document
            .get_element_by_id(CANVAS)
            .and_then(|el| el.dyn_into::<HtmlCanvasElement>().ok())
        else {
            log::warn!("No #{} canvas in the panel", CANVAS);
            return;
        };

        canvas.set_width((width * scale) as u32);
        canvas.set_height((height * scale) as u32);

        let context = canvas
            .get_context("2d")
            .ok()
            .flatten()
            .and_then(|ctx| ctx.dyn_into::<CanvasRenderingContext2d>().ok());
        if let Some(ctx) = &context {
            let s = scale as f64;
            if let Err(e) = ctx.set_transform(s, 0.0, 0.0, s, 0.0, 0.0) {
                log::warn!("Failed to scale canvas: {:?}", e);
            }
        }
        self.context = context;
    }

    fn fill_rect(&mut self, x: f32, y: f32, width: f32, height: f32, color: &str) {
        if let Some(ctx) = &self.context {
            ctx.set_fill_style_str(color);
            ctx.fill_rect(x as f64, y as f64, width as f64, height as f64);
        }
    }

    fn stroke_rect(
        &mut self,
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        color: &str,
        line_width: f32,
    ) {
        if let Some(ctx) = &self.context {
            ctx.set_stroke_style_str(color);
            ctx.set_line_width(line_width as f64);
            ctx.stroke_rect(x as f64, y as f64, width as f64, height as f64);
        }
    }

    fn fill_circle(&mut self, x: f32, y: f32, radius: f32, color: &str) {
        if let Some(ctx) = &self.context {
            ctx.set_fill_style_str(color);
            ctx.begin_path();
            if ctx
                .arc(x as f64, y as f64, radius as f64, 0.0, std::f64::consts::TAU)
                .is_ok()
            {
                ctx.fill();
            }
        }
    }

    fn draw_line(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, color: &str, width: f32) {
        if let Some(ctx) = &self.context {
            ctx.set_stroke_style_str(color);
            ctx.set_line_width(width as f64);
            ctx.begin_path();
            ctx.move_to(x1 as f64, y1 as f64);
            ctx.line_to(x2 as f64, y2 as f64);
            ctx.stroke();
        }
    }
}

/// Panel markup and the shared message box
pub struct WebUi {
    window: Window,
    document: Document,
    /// Bumped per toast so an older toast's timer can't hide a newer one
    toast_generation: Rc<Cell<u32>>,
}

fn render_layout(layout: &Layout) -> String {
    let mut html = format!(
        r#"<h2 class="text-2xl font-semibold text-center mb-6 text-gray-800">{}</h2><canvas id="{}"></canvas>"#,
        layout.title, CANVAS
    );

    html.push_str(r#"<div class="flex justify-center items-center flex-wrap text-center mt-4 gap-2">"#);
    for label in &layout.labels {
        html.push_str(&format!(
            r#"<span id="{}" class="text-gray-700 font-semibold">{}</span>"#,
            label.id, label.text
        ));
    }
    for slider in &layout.sliders {
        html.push_str(&format!(
            r#"<label for="{id}" class="text-gray-700 font-semibold">{caption}</label><input type="range" id="{id}" min="{min}" max="{max}" value="{value}" class="w-24"><span id="{readout}" class="text-gray-700 w-10">{text}</span>"#,
            id = slider.id,
            caption = slider.caption,
            min = slider.min,
            max = slider.max,
            value = slider.value,
            readout = slider.readout.id,
            text = slider.readout.text,
        ));
    }
    html.push_str("</div>");

    html.push_str(r#"<div class="text-center mt-6 space-x-4">"#);
    for button in &layout.buttons {
        html.push_str(&format!(
            r#"<button id="{}" class="px-6 py-3 bg-blue-600 text-white rounded-lg hover:bg-blue-700">{}</button>"#,
            button.id, button.text
        ));
    }
    html.push_str("</div>");

    if layout.status {
        html.push_str(&format!(
            r#"<p id="{}" class="text-center mt-4 text-xl text-gray-700 font-semibold"></p>"#,
            STATUS
        ));
    }
    if let Some(hint) = layout.hint {
        html.push_str(&format!(
            r#"<p class="text-center mt-4 text-gray-600 text-sm">{}</p>"#,
            hint
        ));
    }
    html
}

impl WebUi {
    fn set_text(&self, id: &str, text: &str) {
        match self.document.get_element_by_id(id) {
            Some(el) => el.set_text_content(Some(text)),
            None => log::debug!("No #{} to update", id),
        }
    }

    fn set_game_area(&self, html: &str) {
        match self.document.get_element_by_id(GAME_AREA) {
            Some(area) => area.set_inner_html(html),
            None => log::warn!("No #{} on the page", GAME_AREA),
        }
    }
}

impl Presentation for WebUi {
    fn mount(&mut self, layout: &Layout) {
        self.set_game_area(&render_layout(layout));
    }

    fn clear(&mut self) {
        self.set_game_area(PLACEHOLDER);
    }

    fn set_status(&mut self, text: &str) {
        self.set_text(STATUS, text);
    }

    fn set_label(&mut self, id: &str, text: &str) {
        self.set_text(id, text);
    }

    fn set_button_text(&mut self, id: &str, text: &str) {
        self.set_text(id, text);
    }

    fn toast(&mut self, message: &str, duration_ms: u32) {
        let Some(container) = self.document.get_element_by_id(MESSAGE_BOX) else {
            log::info!("{}", message);
            return;
        };
        container.set_text_content(Some(message));
        let _ = container.set_attribute("class", "show");

        let generation = self.toast_generation.get().wrapping_add(1);
        self.toast_generation.set(generation);
        let current = self.toast_generation.clone();
        let hide = Closure::once_into_js(move || {
            if current.get() == generation {
                let _ = container.set_attribute("class", "");
            }
        });
        let timeout = duration_ms as i32;
        if let Err(e) = self
            .window
            .set_timeout_with_callback_and_timeout_and_arguments_0(hide.unchecked_ref(), timeout)
        {
            log::warn!("Failed to schedule toast hide: {:?}", e);
        }
    }
}

/// The page: `#game-area` for panels, `#message-box` for toasts
pub struct WebPlatform {
    scheduler: WebScheduler,
    input: WebInput,
    canvas: WebCanvas,
    ui: WebUi,
}

impl WebPlatform {
    pub fn new(sink: EventSink) -> Result<Self, JsValue> {
        let window = web_sys::window().ok_or_else(|| JsValue::from_str("no window"))?;
        let document = window
            .document()
            .ok_or_else(|| JsValue::from_str("no document"))?;
        ensure_scaffold(&document)?;

        let registry = Rc::new(RefCell::new(Registry::default()));
        Ok(Self {
            scheduler: WebScheduler {
                window: window.clone(),
                registry: registry.clone(),
                sink: sink.clone(),
                next_id: 0,
            },
            input: WebInput {
                document: document.clone(),
                registry,
                sink,
                next_id: 0,
            },
            canvas: WebCanvas {
                document: document.clone(),
                context: None,
            },
            ui: WebUi {
                window,
                document,
                toast_generation: Rc::new(Cell::new(0)),
            },
        })
    }
}

/// Add `#game-area` and `#message-box` if the page doesn't provide them
fn ensure_scaffold(document: &Document) -> Result<(), JsValue> {
    let body = document
        .body()
        .ok_or_else(|| JsValue::from_str("no body"))?;
    for id in [GAME_AREA, MESSAGE_BOX] {
        if document.get_element_by_id(id).is_none() {
            let el = document.create_element("div")?;
            el.set_id(id);
            body.append_child(&el)?;
        }
    }
    Ok(())
}

impl Platform for WebPlatform {
    fn host(&mut self) -> Host<'_> {
        Host {
            scheduler: &mut self.scheduler,
            input: &mut self.input,
            draw: &mut self.canvas,
            ui: &mut self.ui,
        }
    }
}
