//! Convoy Cinematic entry point
//!
//! Handles platform-specific initialization and runs the playback loop.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_cinematic {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::HtmlCanvasElement;

    use convoy_cinematic::cinematic::{CONVOY_LAYOUT, FrameOutcome};
    use convoy_cinematic::platform::{device_pixel_ratio, now_seconds};
    use convoy_cinematic::renderer::meshes::{convoy_mesh, terrain_mesh};
    use convoy_cinematic::renderer::{ConvoyTransform, SceneCamera, SceneRenderState};
    use convoy_cinematic::terrain::HeightField;
    use convoy_cinematic::{Player, Settings};

    /// Cinematic instance holding all state
    struct Cinematic {
        player: Player,
        render_state: Option<SceneRenderState>,
        camera: SceneCamera,
        convoy: ConvoyTransform,
        settings: Settings,
    }

    impl Cinematic {
        /// Advance the director and draw one frame
        fn frame(&mut self) {
            let now = now_seconds();
            // Sinks are only offered once the GPU scene exists
            let mounted = self.render_state.is_some();
            let outcome = if mounted {
                self.player
                    .frame(now, Some(&mut self.camera), Some(&mut self.convoy))
            } else {
                self.player.frame(now, None, None)
            };

            if let FrameOutcome::Applied(_) = outcome {
                self.render();
            }
            self.update_ui(now);
        }

        /// Render the current frame
        fn render(&mut self) {
            if let Some(ref mut render_state) = self.render_state {
                match render_state.render(&self.camera, &self.convoy) {
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

        /// Update play button and progress bar from the shared clock
        fn update_ui(&self, now: f64) {
            let Some(document) = web_sys::window().and_then(|w| w.document()) else {
                return;
            };

            if let Some(btn) = document.get_element_by_id("play-btn") {
                let label = if self.player.is_playing() { "Pause" } else { "Play" };
                if btn.text_content().as_deref() != Some(label) {
                    btn.set_text_content(Some(label));
                }
            }

            if self.settings.show_progress {
                if let Some(bar) = document.get_element_by_id("progress-fill") {
                    let percent = self.player.progress(now) * 100.0;
                    let _ = bar.set_attribute("style", &format!("width: {:.2}%", percent));
                }
            }
        }

        fn resize(&mut self, canvas: &HtmlCanvasElement) {
            let ratio = self.settings.effective_pixel_ratio(device_pixel_ratio());
            let width = (canvas.client_width() as f64 * ratio) as u32;
            let height = (canvas.client_height() as f64 * ratio) as u32;
            canvas.set_width(width);
            canvas.set_height(height);
            self.camera.set_aspect(width, height);
            if let Some(ref mut render_state) = self.render_state {
                render_state.resize(width, height);
            }
            // Resizing clears the canvas; redraw the held frame while paused
            self.render();
        }
    }

    pub async fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Convoy cinematic starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        if let Some(loading) = document.get_element_by_id("loading") {
            let _ = loading.set_attribute("class", "hidden");
        }

        let canvas: HtmlCanvasElement = document
            .get_element_by_id("canvas")
            .expect("no canvas")
            .dyn_into()
            .expect("not a canvas");

        let settings = Settings::load();
        log::info!(
            "Quality {}, pause mode {}",
            settings.quality.as_str(),
            settings.pause_mode.as_str()
        );

        let player = Player::new(now_seconds(), settings.pause_mode).expect("invalid shot list");
        let cinematic = Rc::new(RefCell::new(Cinematic {
            player,
            render_state: None,
            camera: SceneCamera::default(),
            convoy: ConvoyTransform::default(),
            settings: settings.clone(),
        }));
        cinematic.borrow_mut().resize(&canvas);

        // Initialize WebGPU
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::BROWSER_WEBGPU | wgpu::Backends::GL,
            ..Default::default()
        });

        let surface = instance
            .create_surface(wgpu::SurfaceTarget::Canvas(canvas.clone()))
            .expect("Failed to create surface");

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::HighPerformance,
                compatible_surface: Some(&surface),
                force_fallback_adapter: false,
            })
            .await
            .expect("Failed to get adapter");

        log::info!("Using adapter: {:?}", adapter.get_info().name);

        let field = HeightField::generate(settings.quality.terrain_config())
            .expect("invalid terrain config");
        let terrain = terrain_mesh(&field);
        let convoy = convoy_mesh(&CONVOY_LAYOUT);

        let (width, height) = (canvas.width(), canvas.height());
        let render_state =
            SceneRenderState::new(surface, &adapter, width, height, &terrain, &convoy).await;
        {
            let mut c = cinematic.borrow_mut();
            c.render_state = Some(render_state);
            // Time spent on GPU setup must not eat into the first shot
            c.player.restart(now_seconds());
            if !settings.autoplay {
                c.player.pause(now_seconds());
            }
        }

        if !settings.show_progress {
            if let Some(el) = document.get_element_by_id("progress") {
                let _ = el.set_attribute("class", "hidden");
            }
        }

        setup_controls(cinematic.clone());
        setup_keyboard(cinematic.clone());
        setup_resize(&canvas, cinematic.clone());

        request_animation_frame(cinematic);

        log::info!("Convoy cinematic running!");
    }

    fn setup_controls(cinematic: Rc<RefCell<Cinematic>>) {
        let window = web_sys::window().unwrap();
        let document = window.document().unwrap();

        if let Some(btn) = document.get_element_by_id("play-btn") {
            let cinematic = cinematic.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                cinematic.borrow_mut().player.toggle(now_seconds());
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        if let Some(btn) = document.get_element_by_id("replay-btn") {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                cinematic.borrow_mut().player.restart(now_seconds());
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_keyboard(cinematic: Rc<RefCell<Cinematic>>) {
        let window = web_sys::window().unwrap();
        let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::KeyboardEvent| {
            let mut c = cinematic.borrow_mut();
            match event.key().as_str() {
                " " => {
                    event.prevent_default();
                    c.player.toggle(now_seconds());
                }
                "r" | "R" => c.player.restart(now_seconds()),
                _ => {}
            }
        });
        let _ =
            window.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_resize(canvas: &HtmlCanvasElement, cinematic: Rc<RefCell<Cinematic>>) {
        let window = web_sys::window().unwrap();
        let canvas = canvas.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
            cinematic.borrow_mut().resize(&canvas);
        });
        let _ = window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn request_animation_frame(cinematic: Rc<RefCell<Cinematic>>) {
        let window = web_sys::window().unwrap();
        let closure = Closure::once(move |_time: f64| {
            frame_loop(cinematic);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn frame_loop(cinematic: Rc<RefCell<Cinematic>>) {
        cinematic.borrow_mut().frame();
        request_animation_frame(cinematic);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub async fn wasm_main() {
    wasm_cinematic::run().await;
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Convoy cinematic (native) starting...");
    log::info!("Native mode renders nothing - run with `trunk serve` for the web version");

    if let Err(e) = dump_shot_list() {
        log::error!("{}", e);
        std::process::exit(1);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Print the director's output over one loop as JSON
#[cfg(not(target_arch = "wasm32"))]
fn dump_shot_list() -> Result<(), Box<dyn std::error::Error>> {
    use convoy_cinematic::cinematic::CameraDirector;

    const SAMPLE_STEP: f32 = 0.25;

    let director = CameraDirector::desert_convoy()?;
    let timeline = director.timeline();
    let motion = director.motion();
    log::info!(
        "Convoy at {} units/s, wheels roll {} rad/s",
        motion.convoy_speed,
        motion.wheel_spin_speed
    );

    for (i, segment) in timeline.segments().iter().enumerate() {
        log::info!(
            "Shot {}: {} [{:.1}s, {:.1}s) ease {}",
            i,
            segment.shot.name(),
            segment.start_seconds,
            segment.end_seconds,
            segment.ease.as_str()
        );
    }
    for (seconds, jump) in timeline.boundary_jumps() {
        log::info!("Boundary {:.1}s: camera moves {:.4} units", seconds, jump);
    }

    let steps = (timeline.duration() as f32 / SAMPLE_STEP) as usize;
    let samples: Vec<_> = (0..steps)
        .map(|i| director.sample(i as f32 * SAMPLE_STEP))
        .collect();
    println!("{}", serde_json::to_string_pretty(&samples)?);
    Ok(())
}
