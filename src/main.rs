//! Icon Bounce entry point
//!
//! Handles platform-specific initialization and runs the frame loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_toy {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{
        CanvasRenderingContext2d, Document, HtmlAnchorElement, HtmlCanvasElement,
        HtmlImageElement, HtmlInputElement, MediaRecorder, Window,
    };

    use icon_bounce::layout::{CanvasSize, fit_canvas};
    use icon_bounce::recorder::{
        CAPTURE_FPS, CHUNK_MS, EXPORT_FILE_NAME, FALLBACK_MIME, HTTP_HINT, RecordCommand,
        choose_mime,
    };
    use icon_bounce::renderer::Surface;
    use icon_bounce::sim::{Bounds, IconId, Sprite};
    use icon_bounce::ui::{self, ControlAction};
    use icon_bounce::{App, Tuning};

    /// 2D canvas drawing with one bitmap slot per manifest entry
    struct CanvasSurface {
        ctx: CanvasRenderingContext2d,
        images: Vec<Option<HtmlImageElement>>,
    }

    impl Surface for CanvasSurface {
        fn clear(&mut self, bounds: Bounds) {
            self.ctx
                .clear_rect(0.0, 0.0, bounds.width as f64, bounds.height as f64);
        }

        fn draw_sprite(&mut self, sprite: &Sprite) {
            let Some(Some(image)) = self.images.get(sprite.icon.index()) else {
                return;
            };
            let r = sprite.radius as f64;
            let size = sprite.size() as f64;
            self.ctx.save();
            let _ = self
                .ctx
                .translate(sprite.pos.x as f64, sprite.pos.y as f64);
            let _ = self.ctx.rotate(sprite.rotation as f64);
            let _ = self
                .ctx
                .draw_image_with_html_image_element_and_dw_and_dh(image, -r, -r, size, size);
            self.ctx.restore();
        }
    }

    /// Toy instance holding all state
    struct Toy {
        app: App,
        surface: CanvasSurface,
        canvas: HtmlCanvasElement,
        capture: Option<MediaRecorder>,
    }

    fn window() -> Result<Window, JsValue> {
        web_sys::window().ok_or_else(|| JsValue::from_str("no window"))
    }

    fn document() -> Result<Document, JsValue> {
        window()?
            .document()
            .ok_or_else(|| JsValue::from_str("no document"))
    }

    fn window_size(window: &Window) -> (f32, f32) {
        let w = window.inner_width().ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
        let h = window.inner_height().ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
        (w as f32, h as f32)
    }

    fn apply_canvas_size(canvas: &HtmlCanvasElement, size: CanvasSize) {
        canvas.set_width(size.width);
        canvas.set_height(size.height);
        let style = canvas.style();
        let _ = style.set_property("width", &format!("{}px", size.width));
        let _ = style.set_property("height", &format!("{}px", size.height));
    }

    pub fn run() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info)
            .map_err(|e| JsValue::from_str(&e.to_string()))?;

        log::info!("Icon Bounce starting...");

        let window = window()?;
        let document = document()?;

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .ok_or_else(|| JsValue::from_str("no canvas"))?
            .dyn_into()?;
        let ctx: CanvasRenderingContext2d = canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("no 2d context"))?
            .dyn_into()?;

        let tuning = Tuning::default();
        let (win_w, win_h) = window_size(&window);
        let size = fit_canvas(win_w, win_h, tuning.aspect, tuning.control_space);
        apply_canvas_size(&canvas, size);

        let protocol = window.location().protocol()?;
        let seed = js_sys::Date::now() as u64;
        let image_slots = tuning.icons.len();
        let app = App::new(tuning, size, seed, &protocol);
        log::info!("Initialized with seed: {}", seed);

        let toy = Rc::new(RefCell::new(Toy {
            app,
            surface: CanvasSurface {
                ctx,
                images: vec![None; image_slots],
            },
            canvas,
            capture: None,
        }));

        setup_resize(toy.clone())?;
        preload_images(toy)?;
        Ok(())
    }

    fn setup_resize(toy: Rc<RefCell<Toy>>) -> Result<(), JsValue> {
        let window = window()?;
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            let Ok(window) = self::window() else { return };
            let (w, h) = window_size(&window);
            let mut t = toy.borrow_mut();
            let size = t.app.resize(w, h);
            apply_canvas_size(&t.canvas, size);
        });
        window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref())?;
        closure.forget();
        Ok(())
    }

    /// Fetch every bitmap; start once all have loaded or failed
    fn preload_images(toy: Rc<RefCell<Toy>>) -> Result<(), JsValue> {
        let entries: Vec<(IconId, String)> = toy
            .borrow()
            .app
            .tuning
            .icons
            .iter()
            .map(|(id, entry)| (id, entry.path()))
            .collect();

        if entries.is_empty() {
            let ready = toy.borrow_mut().app.ready_without_images();
            if ready {
                start(toy);
            }
            return Ok(());
        }

        for (id, path) in entries {
            let image = HtmlImageElement::new()?;
            image.set_cross_origin(Some("anonymous"));

            let on_load = {
                let toy = toy.clone();
                let image = image.clone();
                Closure::<dyn FnMut()>::new(move || {
                    let ready = {
                        let mut t = toy.borrow_mut();
                        if let Some(slot) = t.surface.images.get_mut(id.index()) {
                            *slot = Some(image.clone());
                        }
                        log::debug!("Loaded icon {}", id.0);
                        t.app.image_loaded(id)
                    };
                    if ready {
                        start(toy.clone());
                    }
                })
            };
            let on_error = {
                let toy = toy.clone();
                Closure::<dyn FnMut()>::new(move || {
                    let ready = toy.borrow_mut().app.image_failed(id);
                    if ready {
                        start(toy.clone());
                    }
                })
            };
            image.set_onload(Some(on_load.as_ref().unchecked_ref()));
            image.set_onerror(Some(on_error.as_ref().unchecked_ref()));
            on_load.forget();
            on_error.forget();

            image.set_src(&path);
        }
        Ok(())
    }

    fn start(toy: Rc<RefCell<Toy>>) {
        if let Err(e) = init_controls(toy.clone()) {
            log::error!("Failed to set up controls: {:?}", e);
        }
        request_animation_frame(toy);
        log::info!("Icon Bounce running!");
    }

    fn set_toggle(document: &Document, id: &str, label: &str, active: bool) {
        if let Some(el) = document.get_element_by_id(id) {
            el.set_text_content(Some(label));
            let _ = el.class_list().toggle_with_force(ui::ACTIVE_CLASS, active);
        }
    }

    fn on_click(
        document: &Document,
        id: &str,
        handler: impl FnMut(web_sys::Event) + 'static,
    ) -> Result<(), JsValue> {
        if let Some(el) = document.get_element_by_id(id) {
            let closure = Closure::<dyn FnMut(_)>::new(handler);
            el.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
            closure.forget();
        } else {
            log::warn!("Missing control #{}", id);
        }
        Ok(())
    }

    fn init_controls(toy: Rc<RefCell<Toy>>) -> Result<(), JsValue> {
        let document = document()?;
        let buttons = document
            .get_element_by_id("buttons")
            .ok_or_else(|| JsValue::from_str("no #buttons container"))?;

        let (placeholder, entries): (bool, Vec<(IconId, String)>) = {
            let t = toy.borrow();
            let icons = &t.app.tuning.icons;
            (
                icons.is_placeholder(),
                icons.iter().map(|(id, e)| (id, e.name.clone())).collect(),
            )
        };

        if placeholder {
            let hint = document.create_element("p")?;
            hint.set_attribute("class", "hint")?;
            hint.set_text_content(Some(ui::EMPTY_MANIFEST_HINT));
            buttons.append_child(&hint)?;
        }

        // Launch buttons
        for (id, name) in entries {
            let button = document.create_element("button")?;
            button.set_text_content(Some(&ui::launch_label(&name)));
            let toy = toy.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                toy.borrow_mut().app.apply(ControlAction::Launch(id));
            });
            button.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
            closure.forget();
            buttons.append_child(&button)?;
        }

        // Freeze toggle
        {
            let toy = toy.clone();
            on_click(&document, "freeze-btn", move |_| {
                let frozen = {
                    let mut t = toy.borrow_mut();
                    t.app.apply(ControlAction::ToggleFreeze);
                    t.app.settings.frozen
                };
                if let Ok(document) = self::document() {
                    set_toggle(&document, "freeze-btn", ui::freeze_label(frozen), frozen);
                }
            })?;
        }

        // Drain toggle
        {
            let toy = toy.clone();
            on_click(&document, "drain-btn", move |_| {
                let draining = {
                    let mut t = toy.borrow_mut();
                    t.app.apply(ControlAction::ToggleDrain);
                    t.app.settings.draining
                };
                if let Ok(document) = self::document() {
                    set_toggle(&document, "drain-btn", ui::drain_label(draining), draining);
                }
            })?;
        }

        // Record toggle
        {
            let toy = toy.clone();
            on_click(&document, "record-btn", move |_| {
                let command = toy.borrow_mut().app.apply(ControlAction::ToggleRecord);
                match command {
                    Some(RecordCommand::Start) => {
                        if let Err(e) = start_capture(&toy) {
                            log::error!("Failed to start recording: {:?}", e);
                            toy.borrow_mut().app.recorder.abort();
                        }
                    }
                    Some(RecordCommand::Stop) => {
                        if let Some(capture) = toy.borrow_mut().capture.take() {
                            let _ = capture.stop();
                        }
                    }
                    Some(RecordCommand::Refuse) => {
                        if let Ok(window) = self::window() {
                            let _ = window.alert_with_message(HTTP_HINT);
                        }
                    }
                    None => {}
                }
                let recording = toy.borrow().app.recorder.is_recording();
                if let Ok(document) = self::document() {
                    set_toggle(&document, "record-btn", ui::record_label(recording), recording);
                }
            })?;
        }

        // Spin slider
        if let Some(el) = document.get_element_by_id("spin-slider") {
            let slider: HtmlInputElement = el.dyn_into()?;
            let slider_clone = slider.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                let Ok(value) = slider_clone.value().parse::<f32>() else {
                    log::warn!("Unreadable spin value {:?}", slider_clone.value());
                    return;
                };
                let mut t = toy.borrow_mut();
                t.app.apply(ControlAction::SetSpin(value));
                let spin = t.app.settings.spin_factor;
                drop(t);
                if let Some(readout) = self::document().ok().and_then(|d| d.get_element_by_id("spin-value")) {
                    readout.set_text_content(Some(&ui::spin_readout(spin)));
                }
            });
            slider.add_event_listener_with_callback("input", closure.as_ref().unchecked_ref())?;
            closure.forget();
        }

        Ok(())
    }

    fn start_capture(toy: &Rc<RefCell<Toy>>) -> Result<(), JsValue> {
        let canvas = toy.borrow().canvas.clone();
        let stream = canvas.capture_stream_with_frame_request_rate(CAPTURE_FPS)?;
        let mime = choose_mime(MediaRecorder::is_type_supported);

        let options = web_sys::MediaRecorderOptions::new();
        options.set_mime_type(mime);
        let recorder =
            MediaRecorder::new_with_media_stream_and_media_recorder_options(&stream, &options)?;

        let chunks: Rc<RefCell<Vec<web_sys::Blob>>> = Rc::default();

        let on_data = {
            let chunks = chunks.clone();
            Closure::<dyn FnMut(_)>::new(move |event: web_sys::BlobEvent| {
                if let Some(blob) = event.data() {
                    if blob.size() > 0.0 {
                        chunks.borrow_mut().push(blob);
                    }
                }
            })
        };
        let on_stop = {
            let chunks = chunks.clone();
            Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                let result = {
                    let chunks = chunks.borrow();
                    export_recording(&chunks)
                };
                if let Err(e) = result {
                    log::error!("Failed to export recording: {:?}", e);
                }
                chunks.borrow_mut().clear();
            })
        };
        recorder.set_ondataavailable(Some(on_data.as_ref().unchecked_ref()));
        recorder.set_onstop(Some(on_stop.as_ref().unchecked_ref()));
        on_data.forget();
        on_stop.forget();

        recorder.start_with_time_slice(CHUNK_MS)?;
        log::info!("Capturing canvas as {}", mime);
        toy.borrow_mut().capture = Some(recorder);
        Ok(())
    }

    /// Offer the captured chunks as a file download
    fn export_recording(chunks: &[web_sys::Blob]) -> Result<(), JsValue> {
        let parts = js_sys::Array::new();
        for chunk in chunks {
            parts.push(chunk);
        }
        let bag = web_sys::BlobPropertyBag::new();
        bag.set_type(FALLBACK_MIME);
        let blob = web_sys::Blob::new_with_blob_sequence_and_options(&parts, &bag)?;
        log::info!("Recording: {} chunks, {} bytes", chunks.len(), blob.size());

        let url = web_sys::Url::create_object_url_with_blob(&blob)?;
        let document = document()?;
        let body = document
            .body()
            .ok_or_else(|| JsValue::from_str("no body"))?;
        let anchor: HtmlAnchorElement = document.create_element("a")?.dyn_into()?;
        anchor.set_href(&url);
        anchor.set_download(EXPORT_FILE_NAME);
        body.append_child(&anchor)?;
        anchor.click();
        body.remove_child(&anchor)?;

        let revoke = Closure::once(move || {
            let _ = web_sys::Url::revoke_object_url(&url);
        });
        window()?.set_timeout_with_callback_and_timeout_and_arguments_0(
            revoke.as_ref().unchecked_ref(),
            1000,
        )?;
        revoke.forget();
        Ok(())
    }

    fn request_animation_frame(toy: Rc<RefCell<Toy>>) {
        let Some(window) = web_sys::window() else { return };
        let closure = Closure::once(move |time: f64| {
            frame_loop(toy, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn frame_loop(toy: Rc<RefCell<Toy>>, time: f64) {
        {
            let mut t = toy.borrow_mut();
            let Toy { app, surface, .. } = &mut *t;
            app.frame(time, surface);
        }

        request_animation_frame(toy);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    if let Err(e) = wasm_toy::run() {
        log::error!("Startup failed: {:?}", e);
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Icon Bounce (native) starting...");
    log::info!("Native mode runs headless - use `trunk serve` for the browser version");

    if let Err(e) = headless::run(std::env::args().skip(1)) {
        log::error!("{}", e);
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use std::error::Error;

    use icon_bounce::layout::CanvasSize;
    use icon_bounce::renderer::RecordingSurface;
    use icon_bounce::sim::StepReport;
    use icon_bounce::ui::ControlAction;
    use icon_bounce::{App, Tuning};

    /// Environment variable naming an optional tuning JSON file
    const TUNING_ENV: &str = "ICON_BOUNCE_TUNING";

    /// `icon-bounce [frames] [seed]`: simulate one of each icon and print the final world
    pub fn run(mut args: impl Iterator<Item = String>) -> Result<(), Box<dyn Error>> {
        let frames: u64 = match args.next() {
            Some(arg) => arg.parse()?,
            None => 600,
        };
        let seed: u64 = match args.next() {
            Some(arg) => arg.parse()?,
            None => 1,
        };

        let tuning = match std::env::var(TUNING_ENV) {
            Ok(path) => {
                log::info!("Loading tuning from {}", path);
                Tuning::from_json(&std::fs::read_to_string(&path)?)?
            }
            Err(_) => Tuning::default(),
        };

        let canvas = CanvasSize { width: 800, height: 450 };
        let mut app = App::new(tuning, canvas, seed, "native:");

        // No bitmaps to fetch headless; every icon counts as loaded
        let icons: Vec<_> = app.tuning.icons.iter().map(|(id, _)| id).collect();
        for id in &icons {
            app.image_loaded(*id);
        }
        if icons.is_empty() {
            app.ready_without_images();
        }
        for id in icons {
            app.apply(ControlAction::Launch(id));
        }

        let mut surface = RecordingSurface::new();
        let mut totals = StepReport::default();
        for frame in 0..frames {
            surface.reset();
            let report = app.frame(frame as f64 * icon_bounce::consts::NOMINAL_FRAME_MS, &mut surface);
            totals.wall_hits += report.wall_hits;
            totals.contacts += report.contacts;
        }

        log::info!(
            "Simulated {} frames with {} sprites: {} wall hits, {} contacts",
            frames,
            app.world.sprites.len(),
            totals.wall_hits,
            totals.contacts
        );
        println!("{}", serde_json::to_string_pretty(&app.world)?);
        Ok(())
    }
}
