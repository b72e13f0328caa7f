//! Glint - animated GPU ray tracing demo.
//!
//! Renders the demo scene frame by frame, exports every frame as a PNG and
//! hands the frames to an external encoder when the frame budget is spent.

mod app;
mod cli;
mod encode;
mod export;
mod session;

use anyhow::Result;
use clap::Parser;
use glint_gpu::{GpuContext, GpuRenderer};
use glint_scene::{RenderSettings, Scene};
use glint_tracer::CpuRenderer;
use winit::event_loop::{ControlFlow, EventLoop};

use crate::app::App;
use crate::cli::{Args, BackendArg};
use crate::session::{Backend, Session};

fn main() -> Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    let args = Args::parse();
    let settings = args.settings()?;
    let budget = args.frame_budget(&settings);
    let scene = Scene::demo()?;

    log::info!(
        "Starting Glint: {}x{}, {} frames, {} triangles",
        settings.width,
        settings.height,
        budget,
        scene.triangle_count()
    );

    let headless = args.headless || args.backend == BackendArg::Cpu;
    if !args.headless && args.backend == BackendArg::Cpu {
        log::warn!("The CPU backend has no window, running headless");
    }

    if headless {
        run_headless(&scene, settings, args.backend, budget)
    } else {
        run_windowed(scene, settings, budget)
    }
}

fn run_headless(scene: &Scene, settings: RenderSettings, backend: BackendArg, budget: u32) -> Result<()> {
    let backend = match backend {
        BackendArg::Gpu => {
            let context = pollster::block_on(GpuContext::headless())?;
            Backend::Gpu(GpuRenderer::new(context, scene, &settings)?)
        }
        BackendArg::Cpu => Backend::Cpu(CpuRenderer::new(scene, &settings)),
    };

    let mut session = Session::new(settings, backend, budget);
    while !session.is_finished() {
        session.render_next(false)?;
        let done = session.frames_rendered();
        if done % 60 == 0 || done == budget {
            log::info!("Frame {} / {}", done, budget);
        }
    }
    session.finish();
    Ok(())
}

fn run_windowed(scene: Scene, settings: RenderSettings, budget: u32) -> Result<()> {
    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App::new(scene, settings, budget);

    log::info!("Running event loop");
    event_loop.run_app(&mut app)?;

    app.finish()
}
