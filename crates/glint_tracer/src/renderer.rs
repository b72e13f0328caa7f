//! Whitted-style bounce loop and the per-pixel image loop.

use std::time::Instant;

use glint_math::{CornerRays, Interval, Ray};
use glint_scene::{
    FrameState, GpuMesh, GpuTriangle, Light, RenderSettings, Scene, SceneError, TraceParams,
};
use log::debug;

use crate::hit::closest_hit;
use crate::shading::{reflect, shade};
use crate::transform::transform_meshes;
use crate::{Color, EPSILON};

/// Colour seen along `ray`.
///
/// Iterative form of `mix(direct, reflected, reflectivity)`: every hit adds
/// its weighted direct term and the reflected ray carries the rest of the
/// weight. The last allowed bounce keeps its full direct term.
pub fn trace(ray: &Ray, triangles: &[GpuTriangle], lights: &[Light], params: &TraceParams) -> Color {
    let k = params.reflectivity;
    let mut color = Color::ZERO;
    let mut throughput = 1.0;
    let mut ray = ray.normalized();

    for bounce in 0..=params.max_bounces {
        let Some(hit) = closest_hit(&ray, triangles, Interval::new(EPSILON, f32::INFINITY)) else {
            color += throughput * params.background;
            break;
        };

        let direct = shade(&hit, -ray.direction, lights, triangles, params);
        if bounce == params.max_bounces {
            color += throughput * direct;
            break;
        }

        color += throughput * (1.0 - k) * direct;
        throughput *= k;
        if throughput <= 0.0 {
            break;
        }

        ray = Ray::new(
            hit.point + hit.normal * EPSILON,
            reflect(ray.direction, hit.normal),
        );
    }

    color
}

/// Quantise a linear colour to 8 bits, no gamma.
pub fn color_to_rgb(color: Color) -> [u8; 3] {
    let c = (color.clamp(Color::ZERO, Color::ONE) * 255.0).round();
    [c.x as u8, c.y as u8, c.z as u8]
}

/// Simple image buffer for the rendered output, row 0 at the top.
pub struct ImageBuffer {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<Color>,
}

impl ImageBuffer {
    /// Create a new image buffer filled with black.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![Color::ZERO; (width * height) as usize],
        }
    }

    /// Get the pixel at (x, y).
    pub fn get(&self, x: u32, y: u32) -> Color {
        self.pixels[(y * self.width + x) as usize]
    }

    /// Set the pixel at (x, y).
    pub fn set(&mut self, x: u32, y: u32, color: Color) {
        self.pixels[(y * self.width + x) as usize] = color;
    }

    /// Convert to an 8-bit RGB image (for saving).
    pub fn to_rgb_image(&self) -> image::RgbImage {
        image::RgbImage::from_fn(self.width, self.height, |x, y| {
            image::Rgb(color_to_rgb(self.get(x, y)))
        })
    }
}

/// Render every pixel of a `width` x `height` view.
///
/// Pixel centres are sampled. `y` runs top to bottom in the image and
/// bottom to top across the corner rays.
pub fn render(
    corners: &CornerRays,
    triangles: &[GpuTriangle],
    lights: &[Light],
    params: &TraceParams,
    width: u32,
    height: u32,
) -> ImageBuffer {
    let mut image = ImageBuffer::new(width, height);

    for y in 0..height {
        let py = 1.0 - (y as f32 + 0.5) / height as f32;
        for x in 0..width {
            let px = (x as f32 + 0.5) / width as f32;
            let ray = Ray::new(corners.eye, corners.interpolate(px, py));
            image.set(x, y, trace(&ray, triangles, lights, params));
        }
    }

    image
}

/// Frame-at-a-time CPU backend with the same inputs as the GPU renderer.
pub struct CpuRenderer {
    scene: Scene,
    meshes: Vec<GpuMesh>,
    params: TraceParams,
    width: u32,
    height: u32,
}

impl CpuRenderer {
    pub fn new(scene: &Scene, settings: &RenderSettings) -> Self {
        Self {
            scene: scene.clone(),
            meshes: scene.to_gpu_meshes(),
            params: settings.trace_params(),
            width: settings.width,
            height: settings.height,
        }
    }

    /// Transform the scene for `frame` and trace it.
    pub fn render_frame(&self, frame: &FrameState) -> Result<image::RgbImage, SceneError> {
        self.scene.check_transforms(&frame.transforms)?;

        let start = Instant::now();
        let triangles = transform_meshes(&self.meshes, &frame.gpu_transforms());
        let image = render(
            &frame.camera,
            &triangles,
            &frame.lights,
            &self.params,
            self.width,
            self.height,
        );
        debug!(
            "CPU frame t={:.3}: {} triangles, {}x{} in {:.2?}",
            frame.time,
            triangles.len(),
            self.width,
            self.height,
            start.elapsed()
        );

        Ok(image.to_rgb_image())
    }
}
