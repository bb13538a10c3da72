//! Click Burst entry point
//!
//! In the browser this mounts the widget on `#canvas`, drives it from a
//! recurring interval and tears it down on `pagehide`. Natively it runs a
//! headless simulation of a burst of clicks and reports what happened.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_widget {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{HtmlCanvasElement, MouseEvent};

    use click_burst::audio::AudioManager;
    use click_burst::consts::TICK_MS;
    use click_burst::renderer::{Backdrop, RenderState, SceneStyle, build_scene};
    use click_burst::sim::{SimRng, Viewport};
    use click_burst::{ClickWidget, Settings, Tuning};

    /// Recurring browser interval, cleared when dropped
    struct Ticker {
        handle: i32,
        _closure: Closure<dyn FnMut()>,
    }

    impl Ticker {
        fn start(period_ms: u32, callback: impl FnMut() + 'static) -> Option<Self> {
            let window = web_sys::window()?;
            let closure = Closure::<dyn FnMut()>::new(callback);
            let handle = window
                .set_interval_with_callback_and_timeout_and_arguments_0(
                    closure.as_ref().unchecked_ref(),
                    period_ms as i32,
                )
                .ok()?;
            Some(Self {
                handle,
                _closure: closure,
            })
        }
    }

    impl Drop for Ticker {
        fn drop(&mut self) {
            if let Some(window) = web_sys::window() {
                window.clear_interval_with_handle(self.handle);
            }
            log::info!("Ticker cancelled");
        }
    }

    /// Everything the page keeps alive
    struct App {
        widget: ClickWidget,
        render_state: Option<RenderState>,
        audio: AudioManager,
        backdrop: Backdrop,
        palette: Vec<[f32; 3]>,
        style: SceneStyle,
        ticker: Option<Ticker>,
    }

    impl App {
        /// One ticker period: simulate, draw, sync the DOM labels
        fn frame(&mut self) {
            if self.widget.tick().is_none() {
                return;
            }
            self.style.time_secs = self.widget.elapsed_ms() as f32 / 1000.0;
            self.render();
            self.update_hud();
        }

        fn render(&mut self) {
            let vertices = build_scene(
                self.widget.state(),
                &self.backdrop,
                &self.palette,
                &self.style,
            );
            if let Some(ref mut render_state) = self.render_state {
                match render_state.render(&vertices) {
                    Ok(_) => {}
                    Err(wgpu::SurfaceError::Lost) => render_state.reconfigure(),
                    Err(wgpu::SurfaceError::OutOfMemory) => {
                        log::error!("Out of memory!");
                    }
                    Err(e) => log::warn!("Render error: {:?}", e),
                }
            }
        }

        /// Label and counter are plain DOM text over the canvas
        fn update_hud(&self) {
            let Some(document) = web_sys::window().and_then(|w| w.document()) else {
                return;
            };
            let display = &self.widget.state().display;

            if let Some(el) = document.get_element_by_id("button-label") {
                if el.text_content().as_deref() != Some(display.label.as_str()) {
                    el.set_text_content(Some(&display.label));
                }
            }
            if let Some(el) = document.get_element_by_id("click-count") {
                el.set_text_content(Some(&display.click_count().to_string()));
            }
            if let Some(root) = document.get_element_by_id("widget") {
                let class = if display.heightened() { "heightened" } else { "" };
                let _ = root.set_attribute("class", class);
            }
        }
    }

    pub async fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Click Burst starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        let mut settings = Settings::default();
        if let Ok(query) = window.location().search() {
            settings.apply_query(&query);
        }
        // Optional `<script type="application/json" id="tuning">` override
        let custom = document
            .get_element_by_id("tuning")
            .and_then(|el| el.text_content());
        let tuning = Tuning::load_or_preset(custom.as_deref(), settings.preset);
        log::info!("Using {} tuning, {} quality", settings.preset.as_str(), settings.quality.as_str());

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .expect("no canvas")
            .dyn_into()
            .expect("not a canvas");

        // Simulation runs in CSS pixels, the surface in device pixels
        let dpr = window.device_pixel_ratio();
        let client_w = canvas.client_width();
        let client_h = canvas.client_height();
        let width = (client_w as f64 * dpr) as u32;
        let height = (client_h as f64 * dpr) as u32;
        canvas.set_width(width);
        canvas.set_height(height);
        let viewport = Viewport::new(client_w as f32, client_h as f32);

        let audio = AudioManager::new(settings.effective_volume());

        let seed = settings.seed.unwrap_or_else(|| js_sys::Date::now() as u64);
        let style = SceneStyle {
            circle_segments: settings.quality.circle_segments(),
            time_secs: 0.0,
        };
        let palette = tuning.palette_rgb();
        // Own stream so the backdrop never shifts the widget's rolls
        let backdrop = Backdrop::scatter(&mut SimRng::new(seed.wrapping_add(1)));
        let widget = ClickWidget::new(tuning, settings, viewport, seed);

        let app = Rc::new(RefCell::new(App {
            widget,
            render_state: None,
            audio,
            backdrop,
            palette,
            style,
            ticker: None,
        }));

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU | wgpu::Backends::GL,
            ..Default::default()
        });

        let surface = instance
            .create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))
            .expect("Failed to create surface");

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::LowPower,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .expect("Failed to get adapter");

        log::info!("Using adapter: {:?}", adapter.get_info().name);

        match RenderState::new(
            surface,
            &adapter,
            width,
            height,
            (client_w as f32, client_h as f32),
        )
        .await
        {
            Ok(render_state) => app.borrow_mut().render_state = Some(render_state),
            Err(e) => log::error!("Failed to create device: {}", e),
        }

        setup_click_handler(&canvas, app.clone());
        setup_resize_handler(&canvas, app.clone());
        setup_teardown(app.clone());

        let ticker = {
            let app = app.clone();
            Ticker::start(TICK_MS, move || app.borrow_mut().frame())
        };
        if ticker.is_none() {
            log::error!("Failed to start ticker");
        }
        app.borrow_mut().ticker = ticker;

        log::info!("Click Burst running!");
    }

    fn setup_click_handler(canvas: &HtmlCanvasElement, app: Rc<RefCell<App>>) {
        let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
            event.prevent_default();
            let mut a = app.borrow_mut();
            let App { widget, audio, .. } = &mut *a;
            widget.click(event.offset_x() as f32, event.offset_y() as f32, &*audio);
        });
        let _ = canvas.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_resize_handler(canvas: &HtmlCanvasElement, app: Rc<RefCell<App>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let canvas = canvas.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            let Some(window) = web_sys::window() else {
                return;
            };
            let dpr = window.device_pixel_ratio();
            let client_w = canvas.client_width();
            let client_h = canvas.client_height();
            let width = (client_w as f64 * dpr) as u32;
            let height = (client_h as f64 * dpr) as u32;
            canvas.set_width(width);
            canvas.set_height(height);

            let mut a = app.borrow_mut();
            a.widget.resize(client_w as f32, client_h as f32);
            if let Some(ref mut render_state) = a.render_state {
                render_state.resize(width, height, (client_w as f32, client_h as f32));
            }
        });
        let _ = window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    /// Cancel the ticker and pending effects when the page goes away
    fn setup_teardown(app: Rc<RefCell<App>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            // Drop the ticker outside the borrow: its closure holds an `App` handle
            let ticker = {
                let mut a = app.borrow_mut();
                a.widget.teardown();
                a.ticker.take()
            };
            drop(ticker);
        });
        let _ = window.add_event_listener_with_callback("pagehide", closure.as_ref().unchecked_ref());
        closure.forget();
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    wasm_widget::run().await;
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Click Burst (native) starting...");
    log::info!("Native mode is a headless simulation - run with `trunk serve` for the web version");

    // Usage: click-burst [CLICKS] [TUNING_JSON]
    let mut args = std::env::args().skip(1);
    let clicks: u64 = args.next().and_then(|arg| arg.parse().ok()).unwrap_or(60);
    let custom = args.next().and_then(|path| match std::fs::read_to_string(&path) {
        Ok(json) => Some(json),
        Err(e) => {
            log::warn!("Cannot read tuning file {}: {}", path, e);
            None
        }
    });

    let settings = click_burst::Settings::default();
    let tuning = click_burst::Tuning::load_or_preset(custom.as_deref(), settings.preset);
    simulate(clicks, tuning, settings);
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Click `clicks` times, ten ticks apart, then let every effect die out
#[cfg(not(target_arch = "wasm32"))]
fn simulate(clicks: u64, tuning: click_burst::Tuning, settings: click_burst::Settings) {
    use click_burst::ClickWidget;
    use click_burst::audio::NullAudio;
    use click_burst::sim::{RandomSource, SimRng, Viewport};

    let viewport = Viewport::default();
    let mut widget = ClickWidget::new(tuning, settings, viewport, 7);
    let mut pointer = SimRng::new(8);

    let mut peak = 0;
    let mut culled = 0;
    for _ in 0..clicks {
        let x = pointer.range(0.0, viewport.width);
        let y = pointer.range(0.0, viewport.height);
        let outcome = widget.click(x, y, &NullAudio);
        if outcome.entered_heightened {
            println!("Heightened mode at click {}", outcome.click_count);
        }
        for _ in 0..10 {
            if let Some(report) = widget.tick() {
                culled += report.removed();
            }
            peak = peak.max(widget.state().field.len());
        }
    }

    let mut settle_ticks = 0;
    while !widget.state().field.is_empty() || !widget.scheduler().is_empty() {
        if let Some(report) = widget.tick() {
            culled += report.removed();
        }
        settle_ticks += 1;
    }

    let display = &widget.state().display;
    println!("Clicks:          {}", display.click_count());
    println!("Last label:      {}", display.label);
    println!("Rotation:        {} deg", display.rotation_deg);
    println!("Heightened:      {}", display.heightened());
    println!("Peak entities:   {}", peak);
    println!("Entities culled: {}", culled);
    println!("Settled after:   {} ticks ({} ms)", settle_ticks, widget.elapsed_ms());

    widget.teardown();
}
