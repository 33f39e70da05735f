mod bindings;
mod config;
mod fps;
mod scene;

use anyhow::Result;
use clap::Parser;
use config::ViewerConfig;
use flyview_input::{Action, InputState};
use flyview_render::{Camera, FrameDriver, SceneObject};
use flyview_render_wgpu::{GpuContext, WgpuRenderer};
use fps::FpsCounter;
use glam::Vec3;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use tracing_subscriber::EnvFilter;
use winit::application::ApplicationHandler;
use winit::dpi::PhysicalSize;
use winit::event::{DeviceEvent, ElementState, KeyEvent, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowId};

#[derive(Parser)]
#[command(name = "flyview-desktop", about = "Free-fly viewer for a textured OBJ scene")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Directory holding meshes and textures
    #[arg(long, default_value = "Resources")]
    resources: PathBuf,

    /// YAML viewer configuration
    #[arg(long)]
    config: Option<PathBuf>,

    /// Window width, overrides the config file
    #[arg(long)]
    width: Option<u32>,

    /// Window height, overrides the config file
    #[arg(long)]
    height: Option<u32>,
}

/// Application state independent of the window and GPU.
struct AppState {
    driver: FrameDriver,
    input: InputState,
    fps: FpsCounter,
    last_frame: Instant,
}

impl AppState {
    fn new(config: &ViewerConfig, objects: Vec<SceneObject>) -> Self {
        let camera = Camera::with_settings(
            Vec3::from_array(config.camera_origin),
            config.fov_degrees,
            config.aspect(),
            Vec3::from_array(config.camera_target),
            config.camera.clone(),
        );
        let mut driver = FrameDriver::new(camera, objects);
        // The viewer starts one step into the sampler cycle.
        driver.apply(Action::CycleSampler);

        Self {
            driver,
            input: InputState::new(),
            fps: FpsCounter::new(),
            last_frame: Instant::now(),
        }
    }

    fn handle_key(&mut self, code: KeyCode, pressed: bool) {
        if let Some(key) = bindings::held_key(code) {
            self.input.set_key(key, pressed);
        }
        if !pressed {
            if let Some(action) = bindings::release_action(code) {
                self.apply(action);
            }
        }
    }

    fn apply(&mut self, action: Action) {
        match action {
            Action::PrintControls => tracing::info!("controls:\n{}", bindings::CONTROLS),
            other => self.driver.apply(other),
        }
    }

    fn update(&mut self) {
        let now = Instant::now();
        let dt = (now - self.last_frame).as_secs_f32().min(0.1);
        self.last_frame = now;
        self.step(dt);
    }

    fn step(&mut self, dt: f32) {
        let changed = self.driver.update(&self.input, dt);
        if changed.view_changed || changed.projection_changed {
            let camera = self.driver.camera();
            tracing::trace!(
                "camera origin={:?} forward={:?} fov={:.1}",
                camera.origin(),
                camera.forward(),
                camera.fov_degrees()
            );
        }
        self.input.end_frame();

        if let Some(fps) = self.fps.tick(dt) {
            tracing::info!("fps: {fps:.1}");
        }
    }

    fn resize(&mut self, width: u32, height: u32) {
        let aspect = width.max(1) as f32 / height.max(1) as f32;
        if self.driver.camera_mut().set_aspect(aspect) {
            tracing::debug!("aspect ratio now {aspect:.3}");
        }
    }
}

struct GpuApp {
    state: AppState,
    config: ViewerConfig,
    window: Option<Arc<Window>>,
    gpu: Option<GpuContext>,
    renderer: Option<WgpuRenderer>,
}

impl GpuApp {
    fn new(config: ViewerConfig, objects: Vec<SceneObject>) -> Self {
        Self {
            state: AppState::new(&config, objects),
            config,
            window: None,
            gpu: None,
            renderer: None,
        }
    }

    fn render(&mut self) {
        let (Some(gpu), Some(renderer)) = (&self.gpu, &self.renderer) else {
            return;
        };

        let output = match gpu.acquire() {
            Ok(Some(frame)) => frame,
            Ok(None) => return,
            Err(e) => {
                tracing::error!("{e}");
                return;
            }
        };
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        self.state
            .driver
            .frame(&mut renderer.target(&gpu.device, &gpu.queue, &view));

        output.present();
    }
}

impl ApplicationHandler for GpuApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let attrs = Window::default_attributes()
            .with_title("flyview")
            .with_inner_size(PhysicalSize::new(self.config.width, self.config.height));
        let window = match event_loop.create_window(attrs) {
            Ok(window) => Arc::new(window),
            Err(e) => {
                tracing::error!("failed to create window: {e}");
                event_loop.exit();
                return;
            }
        };

        let size = window.inner_size();
        self.state.resize(size.width, size.height);

        match GpuContext::new(window.clone(), size.width, size.height) {
            Ok(gpu) => {
                let (width, height) = gpu.size();
                let renderer = WgpuRenderer::new(
                    &gpu.device,
                    &gpu.queue,
                    gpu.format(),
                    width,
                    height,
                    self.state.driver.objects(),
                    self.config.clear_color,
                );
                tracing::info!("GPU initialized with {} backend", gpu.backend().to_str());
                self.renderer = Some(renderer);
                self.gpu = Some(gpu);
            }
            Err(e) => {
                tracing::error!("GPU initialization failed, nothing will be drawn: {e}");
            }
        }

        self.window = Some(window);
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::Resized(new_size) => {
                if let Some(gpu) = &mut self.gpu {
                    gpu.resize(new_size.width, new_size.height);
                    let (width, height) = gpu.size();
                    if let Some(renderer) = &mut self.renderer {
                        renderer.resize(&gpu.device, width, height);
                    }
                }
                self.state.resize(new_size.width, new_size.height);
            }
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(key),
                        state: key_state,
                        repeat: false,
                        ..
                    },
                ..
            } => {
                self.state
                    .handle_key(key, key_state == ElementState::Pressed);
            }
            WindowEvent::MouseInput {
                button,
                state: btn_state,
                ..
            } => {
                if let Some(button) = bindings::mouse_button(button) {
                    self.state
                        .input
                        .set_button(button, btn_state == ElementState::Pressed);
                }
            }
            WindowEvent::MouseWheel { delta, .. } => {
                if let Some(action) = Action::from_wheel(bindings::wheel_notches(delta)) {
                    self.state.apply(action);
                }
            }
            WindowEvent::Focused(false) => {
                self.state.input.clear();
            }
            WindowEvent::RedrawRequested => {
                self.state.update();
                self.render();
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
        _device_id: winit::event::DeviceId,
        event: DeviceEvent,
    ) {
        if let DeviceEvent::MouseMotion { delta } = event {
            self.state
                .input
                .accumulate_mouse(delta.0 as f32, delta.1 as f32);
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    tracing::info!("flyview-desktop starting");

    let config = match &cli.config {
        Some(path) => ViewerConfig::load(path)?,
        None => ViewerConfig::default(),
    }
    .with_size(cli.width, cli.height);
    config.validate()?;

    let objects = scene::demo_scene(&cli.resources, config.spin_speed);
    if objects.is_empty() {
        tracing::warn!("no meshes loaded from {}", cli.resources.display());
    }
    tracing::info!("press I to print the controls");

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = GpuApp::new(config, objects);
    event_loop.run_app(&mut app)?;

    Ok(())
}
