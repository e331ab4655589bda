use std::error::Error;
use std::num::NonZeroU32;
use std::rc::Rc;
use std::time::Instant;

use glutin::config::{ ConfigTemplateBuilder, GlConfig };
use glutin::context::{ ContextApi, ContextAttributesBuilder, GlProfile, PossiblyCurrentContext, Version };
use glutin::display::{ GetGlDisplay, GlDisplay };
use glutin::prelude::*;
use glutin::surface::{ Surface, SwapInterval, WindowSurface };
use glutin_winit::{ DisplayBuilder, GlWindow };
use raw_window_handle::HasWindowHandle;
use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::{ DeviceEvent, DeviceId, ElementState, KeyEvent, WindowEvent };
use winit::event_loop::{ ActiveEventLoop, EventLoop };
use winit::keyboard::PhysicalKey;
use winit::window::{ CursorGrabMode, Window, WindowId };

use gl_harness::engine::config::HarnessConfig;
use gl_harness::engine::gl::{ install_debug_output, GraphicsApi };
use gl_harness::engine::logging::{ init_logging, LoggingConfig };
use gl_harness::game::{ action_for, AppState, Scene, WindowRequest };

// Field order matters: GL objects go before the context that owns them.
struct Renderer {
    scene: Scene,
    surface: Surface<WindowSurface>,
    context: PossiblyCurrentContext,
    window: Window,
}

impl Renderer {
    fn new(event_loop: &ActiveEventLoop, config: &HarnessConfig) -> Result<Self, Box<dyn Error>> {
        let attributes = Window::default_attributes()
            .with_title(config.window.title.clone())
            .with_inner_size(LogicalSize::new(config.window.width, config.window.height));
        let template = ConfigTemplateBuilder::new().with_depth_size(24);

        let (window, gl_config) = DisplayBuilder::new()
            .with_window_attributes(Some(attributes))
            .build(event_loop, template, |configs| {
                configs
                    .reduce(|best, candidate| {
                        if candidate.depth_size() > best.depth_size() { candidate } else { best }
                    })
                    .expect("display builder offers at least one config")
            })?;
        let window = window.ok_or("display builder created no window")?;

        let display = gl_config.display();
        let context_attributes = ContextAttributesBuilder::new()
            .with_profile(GlProfile::Core)
            .with_debug(cfg!(debug_assertions))
            .with_context_api(ContextApi::OpenGl(Some(Version::new(4, 6))))
            .build(Some(window.window_handle()?.as_raw()));
        let not_current = unsafe { display.create_context(&gl_config, &context_attributes)? };

        let surface_attributes = window.build_surface_attributes(Default::default())?;
        let surface = unsafe { display.create_window_surface(&gl_config, &surface_attributes)? };
        let context = not_current.make_current(&surface)?;

        if config.window.vsync {
            if let Err(err) = surface.set_swap_interval(&context, SwapInterval::Wait(NonZeroU32::MIN)) {
                log::warn!("vsync unavailable: {err}");
            }
        }

        let mut gl = unsafe { glow::Context::from_loader_function_cstr(|name| display.get_proc_address(name)) };
        install_debug_output(&mut gl);
        let api: Rc<dyn GraphicsApi> = Rc::new(gl);

        let size = window.inner_size();
        let scene = Scene::new(&api, &config.surface, size.width, size.height)?;
        log::info!("window {}x{} ready", size.width, size.height);

        Ok(Self { scene, surface, context, window })
    }

    fn resize(&mut self, width: u32, height: u32) -> Result<(), Box<dyn Error>> {
        if let (Some(w), Some(h)) = (NonZeroU32::new(width), NonZeroU32::new(height)) {
            self.surface.resize(&self.context, w, h);
        }
        self.scene.resize(width, height)?;
        Ok(())
    }

    fn set_cursor_captured(&self, captured: bool) {
        let grab = if captured {
            self.window
                .set_cursor_grab(CursorGrabMode::Locked)
                .or_else(|_| self.window.set_cursor_grab(CursorGrabMode::Confined))
        } else {
            self.window.set_cursor_grab(CursorGrabMode::None)
        };
        if let Err(err) = grab {
            log::warn!("cursor grab failed: {err}");
        }
        self.window.set_cursor_visible(!captured);
    }

    fn redraw(&mut self, state: &AppState) -> Result<(), Box<dyn Error>> {
        self.scene.render(state)?;
        self.surface.swap_buffers(&self.context)?;
        self.window.request_redraw();
        Ok(())
    }
}

struct App {
    config: HarnessConfig,
    state: AppState,
    renderer: Option<Renderer>,
    failure: Option<Box<dyn Error>>,
}

impl App {
    fn new(config: HarnessConfig) -> Self {
        let state = AppState::new(&config);
        Self {
            config,
            state,
            renderer: None,
            failure: None,
        }
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, err: Box<dyn Error>) {
        log::error!("{err}");
        self.failure = Some(err);
        event_loop.exit();
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.renderer.is_some() {
            return;
        }

        match Renderer::new(event_loop, &self.config) {
            Ok(renderer) => {
                renderer.set_cursor_captured(self.state.camera_enabled);
                renderer.window.request_redraw();
                self.renderer = Some(renderer);
            }
            Err(err) => self.fail(event_loop, err),
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        let Some(renderer) = self.renderer.as_mut() else {
            return;
        };

        match event {
            WindowEvent::CloseRequested => event_loop.exit(),

            WindowEvent::Resized(size) => {
                if let Err(err) = renderer.resize(size.width, size.height) {
                    self.fail(event_loop, err);
                }
            }

            WindowEvent::KeyboardInput {
                event: KeyEvent { physical_key: PhysicalKey::Code(code), state, repeat: false, .. },
                ..
            } => {
                let Some(action) = action_for(code) else {
                    return;
                };
                match self.state.handle_key(action, state == ElementState::Pressed) {
                    WindowRequest::CaptureCursor(captured) => renderer.set_cursor_captured(captured),
                    WindowRequest::Close => event_loop.exit(),
                    WindowRequest::None => {}
                }
            }

            WindowEvent::RedrawRequested => {
                self.state.advance_frame(Instant::now());
                log::trace!("frame dt = {:.4}s", self.state.dt);
                if let Err(err) = renderer.redraw(&self.state) {
                    self.fail(event_loop, err);
                }
            }

            _ => {}
        }
    }

    fn device_event(&mut self, _event_loop: &ActiveEventLoop, _id: DeviceId, event: DeviceEvent) {
        if let DeviceEvent::MouseMotion { delta: (dx, dy) } = event {
            self.state.mouse_moved(dx, dy);
        }
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let config = HarnessConfig::load()?;
    init_logging(LoggingConfig::with_filter(config.log_filter.clone()));

    let event_loop = EventLoop::new()?;
    let mut app = App::new(config);
    event_loop.run_app(&mut app)?;

    match app.failure.take() {
        Some(err) => Err(err),
        None => Ok(()),
    }
}
