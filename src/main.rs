//! Sierpinski Pyramid
//!
//! Renders a recursively subdivided tetrahedron over a textured ground,
//! lit by an orbiting point light or a steerable directional light.

use std::io::{self, BufRead, Write};
use std::time::{Duration, Instant};
use winit::{
    application::ApplicationHandler,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::PhysicalKey,
    window::WindowId,
};

use sierpinski::config::AppConfig;
use sierpinski::input::{InputAction, InputMapper};
use sierpinski::systems::{FrameSystem, RenderError, RenderSystem, WindowSystem};

/// Main application state
struct App {
    /// Application configuration
    config: AppConfig,
    /// Scene state and input queue
    frame: FrameSystem,
    window: Option<WindowSystem>,
    render: Option<RenderSystem>,
}

impl App {
    fn new(config: AppConfig, requested_depth: i64) -> Self {
        let settings = config.to_scene_settings(requested_depth);

        let paint = settings.face_painting_allowed();
        let count = settings.primitive_count(paint);
        log::info!(
            "Depth {}: face painting {}, {} lines and {} triangles per frame",
            settings.depth,
            if paint { "on" } else { "unavailable" },
            count.lines,
            count.triangles
        );

        let frame = FrameSystem::new(
            settings,
            Duration::from_millis(config.rendering.frame_delay_ms),
        );

        Self {
            config,
            frame,
            window: None,
            render: None,
        }
    }

    fn handle_action(&mut self, event_loop: &ActiveEventLoop, action: InputAction) {
        match action {
            InputAction::Exit => event_loop.exit(),
            InputAction::ToggleFullscreen => {
                if let Some(window) = &self.window {
                    window.toggle_fullscreen();
                }
            }
            InputAction::Scene(event) => self.frame.queue(event),
        }
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        self.frame.update();

        if let Some(window) = &mut self.window {
            window.update_title(self.frame.state(), self.frame.settings());
        }

        if let Some(render) = &mut self.render {
            match render.render_frame(self.frame.state(), self.frame.settings()) {
                Ok(()) => {}
                Err(RenderError::SurfaceLost) => render.reconfigure(),
                Err(RenderError::OutOfMemory) => {
                    log::error!("GPU out of memory");
                    event_loop.exit();
                }
                Err(e) => log::warn!("{}", e),
            }
        }

        self.frame.mark_presented(Instant::now());
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let window = match WindowSystem::create(event_loop, &self.config.window) {
            Ok(window) => window,
            Err(e) => {
                log::error!("{}", e);
                event_loop.exit();
                return;
            }
        };

        match RenderSystem::new(window.window().clone(), &self.config) {
            Ok(render) => self.render = Some(render),
            Err(e) => {
                log::error!("{}", e);
                event_loop.exit();
                return;
            }
        }

        window.request_redraw();
        self.window = Some(window);
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }

            WindowEvent::Resized(physical_size) => {
                if let Some(render) = &mut self.render {
                    render.resize(physical_size.width, physical_size.height);
                }
            }

            WindowEvent::KeyboardInput { event, .. } => {
                if let PhysicalKey::Code(key) = event.physical_key {
                    if let Some(action) = InputMapper::map_keyboard(key, event.state) {
                        self.handle_action(event_loop, action);
                    }
                }
            }

            WindowEvent::MouseWheel { delta, .. } => {
                if let Some(action) = InputMapper::map_scroll(delta) {
                    self.handle_action(event_loop, action);
                }
            }

            WindowEvent::RedrawRequested => self.redraw(event_loop),

            _ => {}
        }
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        let next = self.frame.next_frame_at();
        if Instant::now() >= next {
            if let Some(window) = &self.window {
                window.request_redraw();
            }
        }
        event_loop.set_control_flow(ControlFlow::WaitUntil(next));
    }
}

/// Ask for the recursion depth on stdin
fn prompt_levels() -> Option<String> {
    print!("Enter how many levels should the pyramid have = ");
    io::stdout().flush().ok()?;

    let mut line = String::new();
    io::stdin().lock().read_line(&mut line).ok()?;
    Some(line)
}

fn main() {
    // Load configuration before logging so the config can pick the log level
    let (config, config_error) = match AppConfig::load() {
        Ok(config) => (config, None),
        Err(e) => (AppConfig::default(), Some(e)),
    };

    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(config.debug.log_level.as_str()),
    )
    .init();
    log::info!("Starting Sierpinski Pyramid");

    if let Some(e) = config_error {
        log::warn!("Failed to load config: {}. Using defaults.", e);
    }

    let arg = std::env::args().nth(1);
    let requested_depth = config.scene.resolve_levels(arg.as_deref(), prompt_levels);

    // Create event loop
    let event_loop = EventLoop::new().expect("Failed to create event loop");

    // Create and run application
    let mut app = App::new(config, requested_depth);
    event_loop.run_app(&mut app).expect("Event loop error");
}
