//! Mini Arcade entry point
//!
//! On the web this wires the page's game menu to the arcade. Natively it plays a short
//! headless round of each game and logs what happened.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_arcade {
    use std::cell::RefCell;
    use std::rc::Rc;

    use wasm_bindgen::JsCast;
    use wasm_bindgen::prelude::*;

    use mini_arcade::platform::HostEvent;
    use mini_arcade::platform::web::{EventSink, WebPlatform};
    use mini_arcade::{Arcade, Settings};

    thread_local! {
        static ARCADE: RefCell<Option<Arcade<WebPlatform>>> = const { RefCell::new(None) };
    }

    /// Host callbacks land here
    fn deliver(event: HostEvent) {
        ARCADE.with(|cell| match cell.try_borrow_mut() {
            Ok(mut slot) => {
                if let Some(arcade) = slot.as_mut() {
                    arcade.dispatch(event);
                }
            }
            Err(_) => log::warn!("Arcade busy; dropping {:?}", event),
        });
    }

    pub fn activate(game: &str) -> bool {
        ARCADE.with(|cell| match cell.try_borrow_mut() {
            Ok(mut slot) => slot.as_mut().is_some_and(|arcade| arcade.activate(game)),
            Err(_) => {
                log::warn!("Arcade busy; can't load {}", game);
                false
            }
        })
    }

    pub fn run() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info)
            .map_err(|e| JsValue::from_str(&e.to_string()))?;

        log::info!("Mini Arcade starting...");

        let settings = Settings::load();
        let seed = js_sys::Date::now() as u64;
        let sink: EventSink = Rc::new(deliver);
        let platform = WebPlatform::new(sink)?;

        ARCADE.with(|cell| *cell.borrow_mut() = Some(Arcade::new(platform, settings, seed)));
        setup_menu()?;

        log::info!("Mini Arcade ready (seed {})", seed);
        Ok(())
    }

    /// Each `.game-link[data-game]` loads its game
    fn setup_menu() -> Result<(), JsValue> {
        let document = web_sys::window()
            .and_then(|w| w.document())
            .ok_or_else(|| JsValue::from_str("no document"))?;

        let links = document.query_selector_all(".game-link[data-game]")?;
        for i in 0..links.length() {
            let Some(link) = links
                .item(i)
                .and_then(|node| node.dyn_into::<web_sys::Element>().ok())
            else {
                continue;
            };
            let Some(game) = link.get_attribute("data-game") else {
                continue;
            };

            let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::Event| {
                event.prevent_default();
                activate(&game);
            });
            link.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }
        Ok(())
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() -> Result<(), JsValue> {
    wasm_arcade::run()
}

/// Load a game by id from page script
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen]
pub fn activate(game: &str) -> bool {
    wasm_arcade::activate(game)
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Mini Arcade (native) starting...");
    log::info!("Native mode plays a headless demo - build for wasm32 for the browser version");

    let seed = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);
    demo::run(seed);
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main
}

#[cfg(not(target_arch = "wasm32"))]
mod demo {
    use mini_arcade::platform::{HeadlessPlatform, HostEvent};
    use mini_arcade::{Arcade, Settings};

    type HeadlessArcade = Arcade<HeadlessPlatform>;

    fn send(arcade: &mut HeadlessArcade, events: Vec<HostEvent>) {
        for event in events {
            arcade.dispatch(event);
        }
    }

    fn click(arcade: &mut HeadlessArcade, id: &'static str) {
        let events = arcade.platform().input.click(id);
        send(arcade, events);
    }

    fn key(arcade: &mut HeadlessArcade, key: &str) {
        let events = arcade.platform().input.key_down(key);
        send(arcade, events);
    }

    fn tick(arcade: &mut HeadlessArcade) -> bool {
        let events = arcade.platform().scheduler.fire_intervals();
        let fired = !events.is_empty();
        send(arcade, events);
        fired
    }

    fn tetris(arcade: &mut HeadlessArcade) {
        arcade.activate("tetris");
        click(arcade, "tetris-start");

        let moves = ["ArrowLeft", "ArrowUp", "ArrowRight", "ArrowRight", "ArrowDown"];
        for i in 0..400 {
            key(arcade, moves[i % moves.len()]);
            if !tick(arcade) {
                break;
            }
        }
        let ui = &arcade.platform().ui;
        log::info!(
            "tetris: {} ({})",
            ui.label("tetris-score").unwrap_or("Score: 0"),
            ui.last_toast().unwrap_or("no messages")
        );
    }

    fn ping_pong(arcade: &mut HeadlessArcade) {
        arcade.activate("ping-pong");
        click(arcade, "ping-pong-start");

        let mut ticks = 0;
        while ticks < 20_000 && tick(arcade) {
            ticks += 1;
        }
        let ui = &arcade.platform().ui;
        log::info!(
            "ping-pong: {} - {} after {} ticks ({})",
            ui.label("ping-pong-player-score").unwrap_or("0"),
            ui.label("ping-pong-ai-score").unwrap_or("0"),
            ticks,
            ui.last_toast().unwrap_or("no messages")
        );
    }

    fn projectile(arcade: &mut HeadlessArcade, seed: u64) {
        arcade.activate("projectile");

        let mut shots = 0;
        while shots < 40 && !arcade.platform().ui.status.contains("Win") {
            let angle = 20 + ((seed as i32 + shots * 7) % 50);
            let power = 30 + ((seed as i32 + shots * 13) % 60);
            let events = arcade.platform().input.change("launch-angle", angle);
            send(arcade, events);
            let events = arcade.platform().input.change("launch-power", power);
            send(arcade, events);
            click(arcade, "projectile-launch");

            while arcade.platform().scheduler.pending_frames() > 0 {
                let events = arcade.platform_mut().scheduler.take_frames();
                send(arcade, events);
            }
            let events = arcade.platform_mut().scheduler.fire_timeouts();
            send(arcade, events);
            shots += 1;
        }
        let ui = &arcade.platform().ui;
        log::info!(
            "projectile: {} / {} after {} shots ({})",
            ui.label("level-display").unwrap_or("Level: 1"),
            ui.label("shot-display").unwrap_or("Shots: 0"),
            shots,
            ui.status
        );
    }

    pub fn run(seed: u64) {
        let mut arcade = Arcade::new(HeadlessPlatform::default(), Settings::default(), seed);

        tetris(&mut arcade);
        ping_pong(&mut arcade);
        projectile(&mut arcade, seed % 1000);
        arcade.deactivate();

        let platform = arcade.platform();
        log::info!(
            "Demo finished: {} timers started, {} cancelled, {} listeners installed, {} removed",
            platform.scheduler.started,
            platform.scheduler.cancelled,
            platform.input.installed,
            platform.input.removed
        );
        if !platform.is_quiet() {
            log::warn!("Registrations left behind after unloading");
        }
    }
}
