//! Spinning, lit, textured cube.
//!
//! Usage: `prism-demo [TEXTURE]` (defaults to `assets/box.png`).

use std::path::PathBuf;

use prism_engine::core::{App, AppControl, FrameCtx};
use prism_engine::device::{Gpu, GpuInit};
use prism_engine::logging::{init_logging, LoggingConfig};
use prism_engine::render::{CubeRenderer, RenderCtx, SceneConfig};
use prism_engine::window::{Runtime, RuntimeConfig};
use winit::window::WindowId;

/// Frames longer than this are reported at debug level.
const SLOW_FRAME_SECS: f32 = 0.05;

struct CubeApp {
    config: SceneConfig,
    renderer: Option<CubeRenderer>,
}

impl CubeApp {
    fn new(config: SceneConfig) -> Self {
        Self {
            config,
            renderer: None,
        }
    }
}

impl App for CubeApp {
    fn on_gpu_ready(&mut self, _window_id: WindowId, gpu: &Gpu<'_>) -> anyhow::Result<()> {
        let info = gpu.adapter_info();
        log::info!("rendering on {} ({:?})", info.name, info.backend);

        let ctx = RenderCtx::new(gpu.device(), gpu.queue(), gpu.surface_format(), gpu.size());
        self.renderer = Some(CubeRenderer::new(&ctx, &self.config)?);
        Ok(())
    }

    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl {
        let Some(renderer) = self.renderer.as_mut() else {
            return AppControl::Continue;
        };

        if ctx.time.dt > SLOW_FRAME_SECS {
            log::debug!(
                "slow frame {}: {:.1} ms",
                ctx.time.frame_index,
                ctx.time.dt * 1000.0
            );
        }

        ctx.render(|rctx, target| renderer.render(rctx, target))
    }
}

fn main() -> anyhow::Result<()> {
    init_logging(LoggingConfig::default());

    let mut config = SceneConfig::default();
    if let Some(path) = std::env::args_os().nth(1) {
        config.texture_path = PathBuf::from(path);
    }

    let gpu_init = GpuInit {
        prefer_srgb: false,
        ..GpuInit::default()
    };

    Runtime::run(RuntimeConfig::default(), gpu_init, CubeApp::new(config))
}
