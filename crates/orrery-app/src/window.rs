//! Window, event handling, and the per-frame flow.

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use orrery_config::{Config, ProgramSettings};
use orrery_debug::{CameraInfo, DebugState, OverlayState};
use orrery_input::{CaptureToggle, ControlAction, FrameControls, KeyboardState, MouseState};
use orrery_orbit::{DrawCommand, SceneState};
use orrery_render::{
    FlyCamera, PointLight, RenderContext, SurfaceError, clear_color, init_render_context_blocking,
};
use tracing::{error, info, warn};
use winit::application::ApplicationHandler;
use winit::event::{DeviceEvent, DeviceId, WindowEvent};
use winit::event_loop::{ActiveEventLoop, EventLoop};
use winit::window::{Window, WindowAttributes, WindowId};

use crate::error::AppError;
use crate::frame_clock::{FrameClock, FrameTime};
use crate::renderer::SceneRenderer;
use crate::scene_setup::{
    build_scene, initial_camera, initial_overlay_enabled, initial_properties, movement_vector,
    property_nudge, reloaded_properties, restart_required_changes, scene_modifiers,
    settings_snapshot,
};

/// Seconds between checks of `config.ron` for edits.
const CONFIG_RELOAD_INTERVAL: f64 = 2.0;

/// Returns [`WindowAttributes`] based on the given configuration.
pub fn window_attributes_from_config(config: &Config) -> WindowAttributes {
    WindowAttributes::default()
        .with_title(config.window.title.clone())
        .with_inner_size(winit::dpi::LogicalSize::new(
            config.window.width as f64,
            config.window.height as f64,
        ))
}

/// Application state driven by the winit event loop.
pub struct App {
    config: Config,
    config_dir: PathBuf,
    window: Option<Arc<Window>>,
    gpu: Option<RenderContext>,
    renderer: Option<SceneRenderer>,
    scene: SceneState,
    seed: u64,
    camera: FlyCamera,
    keyboard: KeyboardState,
    mouse: MouseState,
    capture: CaptureToggle,
    overlay: OverlayState,
    clock: FrameClock,
    draws: Vec<DrawCommand>,
    title: String,
    next_reload_check: f64,
    debug_state: Arc<Mutex<DebugState>>,
    #[cfg(debug_assertions)]
    debug_server: Option<orrery_debug::server::DebugServer>,
    fatal: Option<AppError>,
}

impl App {
    /// Build the scene and restore persisted state. Nothing touches the GPU
    /// until the event loop resumes.
    pub fn new(config: Config, config_dir: PathBuf) -> Result<Self, AppError> {
        let (scene, seed) = build_scene(&config.scene)?;

        let settings_path = &config.assets.settings_file;
        let persisted = settings_path
            .exists()
            .then(|| ProgramSettings::load_or_default(settings_path));
        let overlay = OverlayState::new(
            initial_overlay_enabled(&config, persisted.as_ref()),
            initial_properties(&config, persisted.as_ref()),
        );
        let camera = initial_camera(&config, &persisted.unwrap_or_default());

        #[cfg(debug_assertions)]
        let debug_server = Some(orrery_debug::server::DebugServer::new(
            orrery_debug::debug_port(config.debug.api_port),
        ));

        Ok(Self {
            title: config.window.title.clone(),
            config,
            config_dir,
            window: None,
            gpu: None,
            renderer: None,
            scene,
            seed,
            camera,
            keyboard: KeyboardState::new(),
            mouse: MouseState::new(),
            capture: CaptureToggle::default(),
            overlay,
            clock: FrameClock::new(),
            draws: Vec::new(),
            next_reload_check: CONFIG_RELOAD_INTERVAL,
            debug_state: Arc::new(Mutex::new(DebugState::default())),
            #[cfg(debug_assertions)]
            debug_server,
            fatal: None,
        })
    }

    /// The seed the orbit phases were drawn from.
    pub fn seed(&self) -> u64 {
        self.seed
    }

    fn start(&mut self, event_loop: &ActiveEventLoop) -> Result<(), AppError> {
        let window = Arc::new(event_loop.create_window(window_attributes_from_config(&self.config))?);
        let size = window.inner_size();
        info!("Window created: {}x{}", size.width, size.height);

        let gpu = init_render_context_blocking(window.clone(), self.config.window.vsync)?;
        let renderer = SceneRenderer::new(&gpu, &self.config, &self.scene)?;
        if !renderer.has_skybox() {
            info!("Rendering without skybox");
        }

        self.camera
            .set_aspect_ratio(gpu.surface_config.width as f32, gpu.surface_config.height as f32);
        self.overlay
            .set_window_size(gpu.surface_config.width, gpu.surface_config.height);
        // Mouse look starts active only when the overlay is hidden.
        self.mouse.set_captured(&window, !self.overlay.enabled);

        self.gpu = Some(gpu);
        self.renderer = Some(renderer);
        self.window = Some(window);

        #[cfg(debug_assertions)]
        if let Some(server) = &mut self.debug_server
            && let Err(e) = server.start(self.debug_state.clone())
        {
            warn!("Failed to start debug server: {e}");
        }

        Ok(())
    }

    fn set_capture(&mut self, captured: bool) {
        match &self.window {
            Some(window) => self.mouse.set_captured(window, captured),
            None => self.mouse.set_captured_flag(captured),
        }
    }

    fn toggle_overlay(&mut self) {
        let enabled = self.overlay.toggle();
        // The overlay needs a free cursor; hiding it returns to mouse look.
        self.set_capture(!enabled);
    }

    fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.camera.set_aspect_ratio(width as f32, height as f32);
        self.overlay.set_window_size(width, height);
        if let Some(gpu) = &mut self.gpu {
            gpu.resize(width, height);
            if let Some(renderer) = &mut self.renderer {
                renderer.resize(&gpu.device, width, height);
            }
        }
        info!("Window resized to {}x{}", width, height);
    }

    /// Pick up edits to `config.ron` that apply without a restart.
    fn poll_config_reload(&mut self, now: f64) {
        if now < self.next_reload_check {
            return;
        }
        self.next_reload_check = now + CONFIG_RELOAD_INTERVAL;

        match self.config.reload(&self.config_dir) {
            Ok(Some(new_config)) => {
                info!("Config reloaded");
                self.camera.speed = new_config.render.camera_speed;
                self.camera.sensitivity = new_config.render.mouse_sensitivity;
                self.overlay.properties =
                    reloaded_properties(self.overlay.properties, &self.config, &new_config);
                let pending = restart_required_changes(&self.config, &new_config);
                if !pending.is_empty() {
                    warn!(fields = ?pending, "Config changes take effect after a restart");
                }
                self.config = new_config;
            }
            Ok(None) => {}
            Err(e) => warn!("Ignoring config reload: {e}"),
        }
    }

    fn camera_info(&self) -> CameraInfo {
        CameraInfo {
            position: self.camera.position.to_array(),
            yaw: self.camera.yaw,
            pitch: self.camera.pitch,
            front: self.camera.front().to_array(),
            mouse_captured: self.mouse.is_captured(),
        }
    }

    fn update(&mut self, event_loop: &ActiveEventLoop, time: FrameTime) {
        let requests = self.overlay.sync(&self.debug_state);
        if requests.quit {
            info!("Quit requested via debug API");
            event_loop.exit();
            return;
        }
        if requests.toggle_overlay {
            self.toggle_overlay();
        }

        let controls = FrameControls::from_keyboard(&self.keyboard, &mut self.capture, time.elapsed);
        if controls.has(ControlAction::Quit) {
            event_loop.exit();
            return;
        }
        if controls.has(ControlAction::ToggleCapture) {
            let captured = !self.mouse.is_captured();
            self.set_capture(captured);
        }
        if controls.has(ControlAction::ToggleOverlay) {
            self.toggle_overlay();
        }
        for nudge in controls.actions.iter().filter_map(|&action| property_nudge(action)) {
            self.overlay.properties = self.overlay.properties.nudged(nudge);
        }

        let look = self.mouse.look_delta();
        self.camera.look(look.x, look.y);
        self.camera.scroll(self.mouse.scroll());
        self.camera
            .fly(movement_vector(&controls.movement), time.delta_seconds());

        self.poll_config_reload(time.elapsed);

        let modifiers = scene_modifiers(
            &self.overlay.properties,
            self.config.scene.speed_multiplier,
        );
        self.draws.clear();
        self.scene.step(time.elapsed, &modifiers, &mut self.draws);

        self.overlay.camera = self.camera_info();
        self.overlay.record_frame(time.delta, self.clock.uptime());
        let title = self.overlay.title(&self.config.window.title);
        if title != self.title
            && let Some(window) = &self.window
        {
            window.set_title(&title);
            self.title = title;
        }
    }

    fn render(&self, event_loop: &ActiveEventLoop) {
        let (Some(gpu), Some(renderer)) = (&self.gpu, &self.renderer) else {
            return;
        };
        let light = PointLight::at(self.scene.sun().position());
        let clear = clear_color(self.overlay.properties.clear_color);

        match renderer.render(gpu, &self.camera, &light, &self.draws, clear) {
            Ok(()) => {}
            Err(SurfaceError::OutOfMemory) => {
                error!("GPU out of memory, exiting");
                event_loop.exit();
            }
            Err(e) => warn!("Skipping frame: {e}"),
        }
    }

    fn save_settings(&self) {
        let settings = settings_snapshot(
            &self.camera,
            &self.overlay.properties,
            self.overlay.enabled,
        );
        if let Err(e) = settings.save(&self.config.assets.settings_file) {
            warn!("Failed to save settings: {e}");
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        if let Err(e) = self.start(event_loop) {
            error!("{e}");
            self.fatal = Some(e);
            event_loop.exit();
            return;
        }
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => {
                info!("Close requested, shutting down");
                event_loop.exit();
            }
            WindowEvent::Resized(size) => self.resize(size.width, size.height),
            WindowEvent::Focused(false) => self.keyboard.release_all(),
            WindowEvent::KeyboardInput { event, .. } => self.keyboard.process_event(&event),
            WindowEvent::CursorMoved { position, .. } => {
                self.mouse.on_cursor_moved(position.x, position.y);
            }
            WindowEvent::MouseWheel { delta, .. } => self.mouse.on_scroll(delta),
            WindowEvent::RedrawRequested => {
                let time = self.clock.tick();
                self.update(event_loop, time);
                self.render(event_loop);
                self.keyboard.end_frame();
                self.mouse.end_frame();
                if let Some(window) = &self.window {
                    window.request_redraw();
                }
            }
            _ => {}
        }
    }

    fn device_event(
        &mut self,
        _event_loop: &ActiveEventLoop,
        _device_id: DeviceId,
        event: DeviceEvent,
    ) {
        if let DeviceEvent::MouseMotion { delta } = event {
            self.mouse.on_raw_motion(delta.0, delta.1);
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        if self.fatal.is_none() {
            self.save_settings();
        }
        #[cfg(debug_assertions)]
        if let Some(server) = &mut self.debug_server {
            server.stop();
        }
        info!(
            frames = self.clock.frame_count(),
            seed = self.seed,
            "Shutting down"
        );
    }
}

/// Create the event loop and run until the window closes.
pub fn run(config: Config, config_dir: PathBuf) -> Result<(), AppError> {
    let event_loop = EventLoop::new()?;
    let mut app = App::new(config, config_dir)?;
    info!(seed = app.seed(), "Starting orrery");
    event_loop.run_app(&mut app)?;
    match app.fatal.take() {
        Some(e) => Err(e),
        None => Ok(()),
    }
}
