use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use glint_gpu::{GpuContext, GpuRenderer};
use glint_scene::{RenderSettings, Scene};
use winit::{
    application::ApplicationHandler,
    event::WindowEvent,
    event_loop::ActiveEventLoop,
    window::{Window, WindowId},
};

use crate::session::{Backend, Session};

/// Windowed application state
pub struct App {
    scene: Scene,
    settings: RenderSettings,
    budget: u32,
    window: Option<Arc<Window>>,
    session: Option<Session>,
    /// First fatal error, returned from `main` after the loop exits
    error: Option<anyhow::Error>,

    // FPS counter
    fps_frames: u32,
    fps_since: Instant,
}

impl App {
    pub fn new(scene: Scene, settings: RenderSettings, budget: u32) -> Self {
        Self {
            scene,
            settings,
            budget,
            window: None,
            session: None,
            error: None,
            fps_frames: 0,
            fps_since: Instant::now(),
        }
    }

    /// Hand over the session for encoding and any error that stopped the loop.
    pub fn finish(self) -> Result<()> {
        if let Some(session) = self.session {
            session.finish();
        }
        match self.error {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    fn init(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let window_attrs = Window::default_attributes()
            .with_title("Glint")
            .with_inner_size(winit::dpi::PhysicalSize::new(
                self.settings.width,
                self.settings.height,
            ));
        let window = Arc::new(
            event_loop
                .create_window(window_attrs)
                .context("Failed to create window")?,
        );

        let context = pollster::block_on(GpuContext::windowed(window.clone()))?;
        let renderer = GpuRenderer::new(context, &self.scene, &self.settings)?;

        self.session = Some(Session::new(
            self.settings.clone(),
            Backend::Gpu(renderer),
            self.budget,
        ));
        self.window = Some(window);
        self.fps_since = Instant::now();

        log::info!("Window and renderer initialized");
        Ok(())
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, err: anyhow::Error) {
        log::error!("{:#}", err);
        self.error.get_or_insert(err);
        event_loop.exit();
    }

    fn update_title(&mut self) {
        self.fps_frames += 1;
        let elapsed = self.fps_since.elapsed();
        if elapsed < Duration::from_secs(1) {
            return;
        }

        let fps = self.fps_frames as f32 / elapsed.as_secs_f32();
        if let (Some(window), Some(session)) = (&self.window, &self.session) {
            window.set_title(&format!(
                "FPS: {:.0} Frame: {} / {}",
                fps,
                session.frames_rendered(),
                session.budget()
            ));
        }
        log::info!("{:.1} fps", fps);

        self.fps_frames = 0;
        self.fps_since = Instant::now();
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_none() {
            if let Err(err) = self.init(event_loop) {
                self.fail(event_loop, err);
            }
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
                log::info!("Close requested");
                event_loop.exit();
            }
            WindowEvent::Resized(physical_size) => {
                if let Some(renderer) = self.session.as_mut().and_then(Session::gpu_mut) {
                    renderer.resize((physical_size.width, physical_size.height));
                    log::info!("Resized to {}x{}", physical_size.width, physical_size.height);
                }
            }
            WindowEvent::RedrawRequested => {
                let Some(session) = self.session.as_mut() else {
                    return;
                };

                if session.is_finished() {
                    log::info!("Frame budget of {} reached", session.budget());
                    event_loop.exit();
                    return;
                }

                if let Err(err) = session.render_next(true) {
                    self.fail(event_loop, err);
                    return;
                }
                self.update_title();
            }
            _ => {}
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        // Render continuously
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}
