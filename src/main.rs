//! Bead Board entry point
//!
//! Handles platform-specific initialization and runs the frame loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_app {
    use std::cell::RefCell;
    use std::rc::Rc;

    use glam::Vec3;
    use wasm_bindgen::prelude::*;
    use web_sys::{DeviceMotionEvent, HtmlCanvasElement, KeyboardEvent, PointerEvent};

    use bead_board::Settings;
    use bead_board::audio::{AudioManager, SoundEffect};
    use bead_board::renderer::{RenderState, Viewport, scene};
    use bead_board::sim::{AppState, FrameInput, PointerInput, Screen, TallyCommand, tick};

    /// Longest step fed to the animation clocks after a stall
    const MAX_DT: f32 = 0.1;
    const VIBRATE_MS: u32 = 12;

    /// App instance holding all state
    struct App {
        state: AppState,
        render_state: Option<RenderState>,
        audio: AudioManager,
        input: FrameInput,
        /// Canvas size in CSS pixels, for pointer mapping
        viewport: Viewport,
        last_time: f64,
    }

    impl App {
        fn new(state: AppState, viewport: Viewport) -> Self {
            let audio = AudioManager::new(state.settings.effective_volume());
            Self {
                state,
                render_state: None,
                audio,
                input: FrameInput::default(),
                viewport,
                last_time: 0.0,
            }
        }

        fn pointer(&mut self, event: &PointerEvent) -> PointerInput {
            let pos = self
                .viewport
                .to_layout(event.offset_x() as f32, event.offset_y() as f32);
            let id = event.pointer_id();
            match event.type_().as_str() {
                "pointerdown" => PointerInput::Down { id, pos },
                "pointermove" => PointerInput::Move { id, pos },
                "pointercancel" => PointerInput::Cancel { id },
                _ => PointerInput::Up { id },
            }
        }

        /// Apply queued input and react to what happened
        fn update(&mut self, dt: f32) {
            let input = std::mem::take(&mut self.input);
            tick(&mut self.state, &input, dt.clamp(0.0, MAX_DT));

            let haptics = self.state.settings.haptics;
            for event in self.state.take_events() {
                if let Some(effect) = SoundEffect::for_event(&event) {
                    self.audio.play(effect);
                }
                if haptics && event.haptic() {
                    vibrate();
                }
            }
        }

        fn render(&mut self) {
            let vertices = scene::build(&self.state);
            if let Some(ref mut render_state) = self.render_state {
                match render_state.render(&vertices) {
                    Ok(_) => {}
                    Err(wgpu::SurfaceError::Lost) => {
                        render_state.resize(render_state.size.0, render_state.size.1);
                    }
                    Err(wgpu::SurfaceError::OutOfMemory) => {
                        log::error!("Out of memory!");
                    }
                    Err(e) => log::warn!("Render error: {:?}", e),
                }
            }
        }

        /// Update HUD text in the DOM
        fn update_hud(&self) {
            let Some(document) = web_sys::window().and_then(|w| w.document()) else {
                return;
            };

            let (title, value) = match self.state.screen {
                Screen::Abacus => ("Counted".to_string(), self.state.abacus.total().to_string()),
                Screen::Dice => (
                    format!("{} dice", self.state.dice.count()),
                    self.state.dice.sum().to_string(),
                ),
                Screen::Tally => (
                    "Tally".to_string(),
                    self.state
                        .tally
                        .counters()
                        .iter()
                        .enumerate()
                        .map(|(i, c)| {
                            format!(
                                "{}: {} ({:.0}%)",
                                c.label,
                                c.count,
                                self.state.tally.percentage(i)
                            )
                        })
                        .collect::<Vec<_>>()
                        .join("  "),
                ),
            };

            if let Some(el) = document.query_selector("#hud .hud-label").ok().flatten() {
                el.set_text_content(Some(&title));
            }
            if let Some(el) = document.query_selector("#hud .hud-value").ok().flatten() {
                el.set_text_content(Some(&value));
            }
        }
    }

    fn vibrate() {
        if let Some(window) = web_sys::window() {
            let _ = window.navigator().vibrate_with_duration(VIBRATE_MS);
        }
    }

    /// Canvas backing-store size for the current CSS size
    fn fit_canvas(canvas: &HtmlCanvasElement) -> (u32, u32, Viewport) {
        let dpr = web_sys::window()
            .map(|w| w.device_pixel_ratio())
            .unwrap_or(1.0);
        let client_w = canvas.client_width().max(1);
        let client_h = canvas.client_height().max(1);
        let width = (client_w as f64 * dpr) as u32;
        let height = (client_h as f64 * dpr) as u32;
        canvas.set_width(width);
        canvas.set_height(height);
        (width, height, Viewport::new(client_w as f32, client_h as f32))
    }

    pub async fn run() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info)
            .map_err(|e| JsValue::from_str(&e.to_string()))?;

        log::info!("Bead Board starting...");

        let window = web_sys::window().ok_or("no window")?;
        let document = window.document().ok_or("no document")?;

        if let Some(loading) = document.get_element_by_id("loading") {
            let _ = loading.set_attribute("class", "hidden");
        }

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .ok_or("no canvas")?
            .dyn_into()?;

        let settings = Settings::load(canvas.get_attribute("data-settings").as_deref());
        let seed = js_sys::Date::now() as u64;
        let state = match AppState::new(seed, settings) {
            Ok(state) => state,
            Err(e) => {
                log::error!("Invalid abacus settings ({e}), using defaults");
                AppState::new(seed, Settings::default()).map_err(|e| e.to_string())?
            }
        };
        log::info!("App initialized with seed: {}", seed);

        let (width, height, viewport) = fit_canvas(&canvas);
        let app = Rc::new(RefCell::new(App::new(state, viewport)));

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU | wgpu::Backends::GL,
            ..Default::default()
        });

        let surface = instance
            .create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))
            .map_err(|e| e.to_string())?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::LowPower,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .map_err(|e| e.to_string())?;

        log::info!("Using adapter: {:?}", adapter.get_info().name);

        let render_state = RenderState::new(surface, &adapter, width, height)
            .await
            .map_err(|e| e.to_string())?;
        app.borrow_mut().render_state = Some(render_state);

        setup_input_handlers(&canvas, app.clone());
        setup_focus_handlers(app.clone());

        if let Some(hud) = document.get_element_by_id("hud") {
            let _ = hud.set_attribute("class", "");
        }

        request_animation_frame(app);

        log::info!("Bead Board running!");
        Ok(())
    }

    fn setup_input_handlers(canvas: &HtmlCanvasElement, app: Rc<RefCell<App>>) {
        // Pointer events cover mouse, pen and touch alike
        for kind in ["pointerdown", "pointermove", "pointerup", "pointercancel"] {
            let app = app.clone();
            let target = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: PointerEvent| {
                event.prevent_default();
                let mut a = app.borrow_mut();
                if event.type_() == "pointerdown" {
                    // First gesture unlocks audio
                    a.audio.resume();
                    let _ = target.set_pointer_capture(event.pointer_id());
                }
                let pointer = a.pointer(&event);
                a.input.pointers.push(pointer);
            });
            let _ =
                canvas.add_event_listener_with_callback(kind, closure.as_ref().unchecked_ref());
            closure.forget();
        }

        let Some(window) = web_sys::window() else {
            return;
        };

        // Keyboard
        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                let mut a = app.borrow_mut();
                let screen = a.state.screen;
                match event.key().as_str() {
                    "1" => a.input.switch_to = Some(Screen::Abacus),
                    "2" => a.input.switch_to = Some(Screen::Dice),
                    "3" => a.input.switch_to = Some(Screen::Tally),
                    "Tab" => {
                        event.prevent_default();
                        a.input.switch_to = Some(screen.next());
                    }
                    " " | "Enter" => a.input.roll = true,
                    "r" | "R" => a.input.reset = true,
                    "+" | "=" => match screen {
                        Screen::Dice => a.input.dice_count = Some(a.state.dice.count() + 1),
                        Screen::Tally => {
                            let label = format!("Player {}", a.state.tally.len() + 1);
                            a.input.tally.push(TallyCommand::Add(label));
                        }
                        Screen::Abacus => {}
                    },
                    "-" => match screen {
                        Screen::Dice => {
                            a.input.dice_count = Some(a.state.dice.count().saturating_sub(1))
                        }
                        Screen::Tally if a.state.tally.len() > 1 => {
                            let last = a.state.tally.len() - 1;
                            a.input.tally.push(TallyCommand::Remove(last));
                        }
                        _ => {}
                    },
                    _ => {}
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Accelerometer, for shake-to-roll
        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: DeviceMotionEvent| {
                if let Some(accel) = event.acceleration() {
                    let reading = Vec3::new(
                        accel.x().unwrap_or(0.0) as f32,
                        accel.y().unwrap_or(0.0) as f32,
                        accel.z().unwrap_or(0.0) as f32,
                    );
                    app.borrow_mut().input.motion = Some(reading);
                }
            });
            let _ = window
                .add_event_listener_with_callback("devicemotion", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Resize
        {
            let canvas = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                let (width, height, viewport) = fit_canvas(&canvas);
                let mut a = app.borrow_mut();
                a.viewport = viewport;
                if let Some(ref mut render_state) = a.render_state {
                    render_state.resize(width, height);
                }
            });
            let _ =
                window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    /// Drop in-flight drags when the page loses focus; the matching pointerup never arrives
    fn setup_focus_handlers(app: Rc<RefCell<App>>) {
        let Some(window) = web_sys::window() else {
            return;
        };

        if let Some(document) = window.document() {
            let app = app.clone();
            let doc = document.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                if doc.visibility_state() == web_sys::VisibilityState::Hidden {
                    app.borrow_mut().state.abacus.cancel_drags();
                    log::info!("Drags cancelled (tab hidden)");
                }
            });
            let _ = document.add_event_listener_with_callback(
                "visibilitychange",
                closure.as_ref().unchecked_ref(),
            );
            closure.forget();
        }

        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::FocusEvent| {
            app.borrow_mut().state.abacus.cancel_drags();
        });
        let _ = window.add_event_listener_with_callback("blur", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn request_animation_frame(app: Rc<RefCell<App>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |time: f64| {
            app_loop(app, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn app_loop(app: Rc<RefCell<App>>, time: f64) {
        {
            let mut a = app.borrow_mut();

            let dt = if a.last_time > 0.0 {
                ((time - a.last_time) / 1000.0) as f32
            } else {
                0.0
            };
            a.last_time = time;

            a.update(dt);
            a.render();
            a.update_hud();
        }

        request_animation_frame(app);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    if let Err(e) = wasm_app::run().await {
        log::error!("Startup failed: {:?}", e);
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Bead Board (native) starting...");
    log::info!("Native mode has no window - run with `trunk serve` for the web version");

    let settings_json = std::env::args()
        .nth(1)
        .and_then(|path| match std::fs::read_to_string(&path) {
            Ok(json) => Some(json),
            Err(e) => {
                log::warn!("Could not read {path}: {e}");
                None
            }
        });
    let settings = bead_board::Settings::load(settings_json.as_deref());

    match demo::run(settings) {
        Ok(()) => println!("\nDemo finished"),
        Err(e) => {
            eprintln!("Invalid settings: {e}");
            std::process::exit(1);
        }
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Scripted walk through the three screens, printing what the model does
#[cfg(not(target_arch = "wasm32"))]
mod demo {
    use glam::Vec2;

    use bead_board::Settings;
    use bead_board::audio::{AudioManager, SoundEffect};
    use bead_board::consts::*;
    use bead_board::sim::{
        AppState, FrameInput, LayoutError, PointerInput, Screen, TallyCommand, tick,
    };

    const DT: f32 = 1.0 / 60.0;

    fn step(state: &mut AppState, audio: &AudioManager, input: FrameInput) {
        tick(state, &input, DT);
        for event in state.take_events() {
            println!("  event: {event:?}");
            if let Some(effect) = SoundEffect::for_event(&event) {
                audio.play(effect);
            }
        }
    }

    fn pointers(list: Vec<PointerInput>) -> FrameInput {
        FrameInput {
            pointers: list,
            ..Default::default()
        }
    }

    pub fn run(settings: Settings) -> Result<(), LayoutError> {
        let audio = AudioManager::new(settings.effective_volume());
        let mut state = AppState::new(42, settings)?;

        println!("Abacus: dragging the last bead of rod 0 to the right edge");
        let Some(rod) = state.abacus.rod(0) else {
            return Ok(());
        };
        let last = rod.len().saturating_sub(1);
        let grab_x = state.abacus.origin.x
            + rod.position(last).unwrap_or(0.0)
            + rod.layout().bead_width / 2.0;
        let y = state.abacus.rod_y(0);
        step(
            &mut state,
            &audio,
            pointers(vec![PointerInput::Down {
                id: 1,
                pos: Vec2::new(grab_x, y),
            }]),
        );
        step(
            &mut state,
            &audio,
            pointers(vec![PointerInput::Move {
                id: 1,
                pos: Vec2::new(grab_x + VIEW_WIDTH, y),
            }]),
        );
        step(&mut state, &audio, pointers(vec![PointerInput::Up { id: 1 }]));
        if let Some(rod) = state.abacus.rod(0) {
            let positions: Vec<String> = rod.positions().map(|p| format!("{p:.0}")).collect();
            println!("  rod 0: [{}]", positions.join(", "));
        }
        println!("  counted beads: {}", state.abacus.total());

        println!("\nDice: three rolls");
        state.switch_screen(Screen::Dice);
        for _ in 0..3 {
            step(
                &mut state,
                &audio,
                FrameInput {
                    roll: true,
                    ..Default::default()
                },
            );
            println!("  faces {:?} sum {}", state.dice.faces(), state.dice.sum());
        }

        println!("\nTally: scoreboard");
        state.switch_screen(Screen::Tally);
        step(
            &mut state,
            &audio,
            FrameInput {
                tally: vec![
                    TallyCommand::Increment(0),
                    TallyCommand::Increment(0),
                    TallyCommand::Increment(1),
                    TallyCommand::Decrement(1),
                    TallyCommand::Decrement(1),
                ],
                ..Default::default()
            },
        );
        for (i, counter) in state.tally.counters().iter().enumerate() {
            println!(
                "  {}: {} ({:.0}%)",
                counter.label,
                counter.count,
                state.tally.percentage(i)
            );
        }

        Ok(())
    }
}
