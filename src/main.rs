//! Roll Reveal entry point
//!
//! Handles platform-specific initialization and runs the demo page.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_shell {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, HtmlSelectElement};

    use glam::Vec2;
    use roll_reveal::consts::*;
    use roll_reveal::renderer::CanvasRenderer;
    use roll_reveal::settings::QualityPreset;
    use roll_reveal::sim::{SlotPhase, SlotRoll};
    use roll_reveal::{RevealOptions, RollReveal, Settings, Stage};

    use super::escape_html;

    const ENCOUNTERS: [&str; 3] = ["Goblin Ambush", "Merchant Encounter", "Bridge Troll"];

    /// Page state holding the stage and its frame loop
    struct Shell {
        stage: Stage<String>,
        renderer: Option<CanvasRenderer>,
        center: Vec2,
        last_time: f64,
        /// Pending animation frame, cancelled once nothing animates
        frame: Option<i32>,
    }

    impl Shell {
        fn new(seed: u64, settings: Settings, prefers_reduced_motion: bool) -> Self {
            // Sound is governed by the persisted settings, which mute the synth
            let reveal = RollReveal::new(
                ENCOUNTERS.iter().map(|s| s.to_string()).collect(),
                RevealOptions::default(),
                |item: &String| {
                    log::info!("Accepted encounter: {}", item);
                    set_text("last-accepted", item);
                },
                |item: &String| format!("<h3 class=\"result-name\">{}</h3>", escape_html(item)),
                seed,
            );
            Self {
                stage: Stage::new(reveal, settings, prefers_reduced_motion),
                renderer: None,
                center: Vec2::ZERO,
                last_time: 0.0,
                frame: None,
            }
        }

        fn render(&self) {
            if let Some(renderer) = &self.renderer {
                renderer.render(&self.stage.reveal.scene(self.center));
            }
        }

        /// Sync the DOM overlay with the stage
        fn update_dom(&self) {
            let reveal = &self.stage.reveal;
            set_hidden("reveal-overlay", !reveal.is_open());
            set_hidden("reveal-title", !reveal.title_visible());
            set_text("reveal-title", &reveal.options().title);

            match reveal.result_view() {
                Some(view) => {
                    set_hidden("result-pane", false);
                    set_html("result-content", &view.content);
                    set_hidden("reroll-btn", !view.can_reroll);
                }
                None => set_hidden("result-pane", true),
            }

            if let Some(slot) = &self.stage.slot {
                set_hidden("table-roll", false);
                set_text("table-name", &slot.table_name);
                set_text("die-display", &slot.display.to_string());
                set_hidden("table-result", slot.phase != SlotPhase::Result);
                set_text("table-result", &slot.result_text);
            } else {
                set_hidden("table-roll", true);
            }

            let settings = self.stage.settings();
            let sound = if reveal.synth().is_muted() { "off" } else { "on" };
            set_text("sound-btn", &format!("Sound: {}", sound));
            let motion = match settings.reduced_motion {
                None => "system",
                Some(true) => "reduced",
                Some(false) => "full",
            };
            set_text("motion-btn", &format!("Motion: {}", motion));
            if let Some(select) = document()
                .and_then(|d| d.get_element_by_id("quality-select"))
                .and_then(|el| el.dyn_into::<HtmlSelectElement>().ok())
            {
                select.set_value(settings.quality.as_str());
            }
        }

        /// Cancel the pending frame unless something still animates
        fn stop_if_idle(&mut self) {
            if self.stage.is_animating() {
                return;
            }
            if let (Some(id), Some(window)) = (self.frame.take(), web_sys::window()) {
                let _ = window.cancel_animation_frame(id);
            }
            if let Some(renderer) = &self.renderer {
                renderer.clear();
            }
        }

        fn change_settings(&mut self, change: impl FnOnce(&mut Settings)) {
            if let Err(e) = self.stage.update_settings(change) {
                log::warn!("Settings not saved: {}", e);
            }
            self.update_dom();
        }
    }

    fn document() -> Option<web_sys::Document> {
        web_sys::window()?.document()
    }

    fn set_text(id: &str, text: &str) {
        if let Some(el) = document().and_then(|d| d.get_element_by_id(id)) {
            el.set_text_content(Some(text));
        }
    }

    fn set_html(id: &str, html: &str) {
        if let Some(el) = document().and_then(|d| d.get_element_by_id(id)) {
            el.set_inner_html(html);
        }
    }

    fn set_hidden(id: &str, hidden: bool) {
        if let Some(el) = document().and_then(|d| d.get_element_by_id(id)) {
            let _ = el.class_list().toggle_with_force("hidden", hidden);
        }
    }

    fn prefers_reduced_motion() -> bool {
        web_sys::window()
            .and_then(|w| w.match_media("(prefers-reduced-motion: reduce)").ok().flatten())
            .map(|mq| mq.matches())
            .unwrap_or_else(|| {
                log::warn!("matchMedia unavailable, assuming full motion");
                false
            })
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Roll Reveal starting...");

        let Some(window) = web_sys::window() else { return };
        let Some(document) = window.document() else { return };

        let settings = Settings::load();
        let seed = js_sys::Date::now() as u64;
        let shell = Rc::new(RefCell::new(Shell::new(
            seed,
            settings,
            prefers_reduced_motion(),
        )));
        log::info!("Reveal initialized with seed: {}", seed);

        if let Some(canvas) = document
            .get_element_by_id("reveal-canvas")
            .and_then(|el| el.dyn_into::<HtmlCanvasElement>().ok())
        {
            let dpr = window.device_pixel_ratio();
            // The overlay starts hidden, so size from the canvas attributes
            let w = canvas.width() as f64;
            let h = canvas.height() as f64;
            canvas.set_width((w * dpr) as u32);
            canvas.set_height((h * dpr) as u32);

            let ctx = canvas
                .get_context("2d")
                .ok()
                .flatten()
                .and_then(|c| c.dyn_into::<CanvasRenderingContext2d>().ok());
            match ctx {
                Some(ctx) => {
                    let mut s = shell.borrow_mut();
                    s.renderer = Some(CanvasRenderer::new(ctx, w, h, dpr));
                    s.center = Vec2::new(w as f32 / 2.0, h as f32 / 2.0);
                    let center = s.center;
                    s.stage.reveal.set_center(center);
                }
                None => log::warn!("2D canvas unavailable - particles disabled"),
            }
        }

        setup_buttons(shell.clone());
        setup_settings(shell.clone());
        setup_keys(shell.clone());
        shell.borrow().update_dom();

        log::info!("Roll Reveal ready!");
    }

    fn on_click(id: &str, mut handler: impl FnMut() + 'static) {
        let Some(btn) = document().and_then(|d| d.get_element_by_id(id)) else {
            return;
        };
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| handler());
        let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_buttons(shell: Rc<RefCell<Shell>>) {
        {
            let shell = shell.clone();
            on_click("open-btn", move || {
                if let Err(e) = shell.borrow_mut().stage.open_reveal() {
                    log::warn!("Cannot open reveal: {}", e);
                }
                ensure_running(shell.clone());
            });
        }
        {
            let shell = shell.clone();
            on_click("accept-btn", move || {
                let mut s = shell.borrow_mut();
                s.stage.reveal.accept();
                s.stop_if_idle();
                s.update_dom();
            });
        }
        {
            let shell = shell.clone();
            on_click("reroll-btn", move || {
                if let Err(e) = shell.borrow_mut().stage.reveal.reroll() {
                    log::warn!("Reroll failed: {}", e);
                }
                ensure_running(shell.clone());
            });
        }
        {
            let shell = shell.clone();
            on_click("close-btn", move || {
                let mut s = shell.borrow_mut();
                s.stage.close_reveal();
                s.stop_if_idle();
                s.update_dom();
            });
        }
        {
            let shell = shell.clone();
            on_click("backdrop", move || {
                let mut s = shell.borrow_mut();
                s.stage.reveal.backdrop_click();
                s.stop_if_idle();
                s.update_dom();
            });
        }
        {
            let shell = shell.clone();
            on_click("table-roll-btn", move || {
                let seed = js_sys::Date::now() as u64;
                let roll = (seed % 20) as u32 + 1;
                shell.borrow_mut().stage.roll_table(SlotRoll::new(
                    "Wandering Monsters",
                    roll,
                    "A lost pilgrim",
                    "d20",
                    seed,
                ));
                ensure_running(shell.clone());
            });
        }
        {
            let shell = shell.clone();
            on_click("table-copy-btn", move || {
                if let Some(slot) = &shell.borrow().stage.slot {
                    if let Some(window) = web_sys::window() {
                        let _ = window.navigator().clipboard().write_text(&slot.copy_text());
                        log::info!("Result copied");
                    }
                }
            });
        }
        on_click("table-close-btn", move || {
            let mut s = shell.borrow_mut();
            s.stage.close_table_roll();
            s.stop_if_idle();
            s.update_dom();
        });
    }

    fn setup_settings(shell: Rc<RefCell<Shell>>) {
        {
            let shell = shell.clone();
            on_click("sound-btn", move || {
                shell
                    .borrow_mut()
                    .change_settings(|s| s.sound_enabled = !s.sound_enabled);
            });
        }
        {
            let shell = shell.clone();
            on_click("motion-btn", move || {
                shell.borrow_mut().change_settings(|s| {
                    s.reduced_motion = match s.reduced_motion {
                        None => Some(true),
                        Some(true) => Some(false),
                        Some(false) => None,
                    };
                });
            });
        }

        let Some(select) = document()
            .and_then(|d| d.get_element_by_id("quality-select"))
            .and_then(|el| el.dyn_into::<HtmlSelectElement>().ok())
        else {
            return;
        };
        let handle = select.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            match QualityPreset::parse(&handle.value()) {
                Some(quality) => shell.borrow_mut().change_settings(|s| s.quality = quality),
                None => log::warn!("Unknown quality preset: {}", handle.value()),
            }
        });
        let _ = select.add_event_listener_with_callback("change", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_keys(shell: Rc<RefCell<Shell>>) {
        let Some(document) = document() else { return };
        let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::KeyboardEvent| {
            if event.key() == "Escape" {
                let mut s = shell.borrow_mut();
                s.stage.dismiss();
                s.stop_if_idle();
                s.update_dom();
            }
        });
        let _ =
            document.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn ensure_running(shell: Rc<RefCell<Shell>>) {
        let idle = shell.borrow().frame.is_none();
        shell.borrow().update_dom();
        if idle {
            shell.borrow_mut().last_time = 0.0;
            request_animation_frame(shell);
        }
    }

    fn request_animation_frame(shell: Rc<RefCell<Shell>>) {
        let Some(window) = web_sys::window() else { return };
        let handle = shell.clone();
        let closure = Closure::once(move |time: f64| {
            frame_loop(handle, time);
        });
        match window.request_animation_frame(closure.as_ref().unchecked_ref()) {
            Ok(id) => shell.borrow_mut().frame = Some(id),
            Err(_) => log::warn!("requestAnimationFrame rejected"),
        }
        closure.forget();
    }

    fn frame_loop(shell: Rc<RefCell<Shell>>, time: f64) {
        let keep_going = {
            let mut s = shell.borrow_mut();
            s.frame = None;

            // Calculate delta time
            let dt = if s.last_time > 0.0 {
                ((time - s.last_time) / 1000.0) as f32
            } else {
                FRAME_DT
            };
            s.last_time = time;

            s.stage.tick(dt);
            s.render();
            s.update_dom();
            s.stage.is_animating()
        };

        // Stop scheduling the moment nothing is animating
        if keep_going {
            request_animation_frame(shell);
        }
    }
}

/// Escape text for interpolation into result markup
#[cfg(any(target_arch = "wasm32", test))]
fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_shell::run();
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Roll Reveal (native) starting...");
    log::info!("The animated widget runs in the browser - run with `trunk serve`");

    println!("\nRunning headless reveal...");
    headless_reveal();
    println!("\nRunning headless table roll...");
    headless_table_roll();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Drive one reveal to completion with a fixed frame step and print the phases
#[cfg(not(target_arch = "wasm32"))]
fn headless_reveal() {
    use roll_reveal::consts::FRAME_DT;
    use roll_reveal::{RevealOptions, RollReveal};

    let candidates = vec!["Goblin Ambush", "Merchant Encounter", "Bridge Troll"];
    let seed = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0);

    let mut reveal = RollReveal::new(
        candidates,
        RevealOptions::default(),
        |item: &&str| println!("  accepted: {}", item),
        |item: &&str| item.to_string(),
        seed,
    );

    if let Err(e) = reveal.open() {
        eprintln!("cannot open reveal: {}", e);
        return;
    }
    let mut last = reveal.phase();
    println!("  {:>5}ms {}", 0, last.as_str());
    let mut elapsed = 0.0f32;
    while reveal.result_view().is_none() {
        reveal.tick(FRAME_DT);
        elapsed += FRAME_DT;
        if reveal.phase() != last {
            last = reveal.phase();
            println!("  {:>5.0}ms {}", elapsed * 1000.0, last.as_str());
        }
    }
    if let Some(view) = reveal.result_view() {
        println!("  {}: {}", view.title, view.content);
    }
    reveal.accept();
}

#[cfg(not(target_arch = "wasm32"))]
fn headless_table_roll() {
    use roll_reveal::sim::SlotRoll;

    let mut slot = SlotRoll::new("Weather", 4, "Thick fog rolls in", "d8", 7);
    while !slot.is_done() {
        slot.tick(1.0 / 60.0);
    }
    println!("  {}", slot.copy_text());
}
