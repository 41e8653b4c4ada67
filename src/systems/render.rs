//! GPU rendering system
//!
//! Manages GPU rendering including:
//! - Render context and surface
//! - Recording the scene through the `Renderer` collaborator
//! - Frame submission

use std::sync::Arc;
use winit::window::Window;
use sierpinski_core::{draw_scene, SceneSettings, SceneState};
use sierpinski_math::mat4::{self, Mat4};
use sierpinski_render::{
    context::{ContextError, RenderContext},
    pipeline::RenderPipeline,
    FrameRecorder, GroundMesh, GroundTexture,
};
use crate::config::{AppConfig, CameraConfig};

/// Render error types
#[derive(Debug)]
pub enum RenderError {
    /// GPU setup failed
    Setup(ContextError),
    /// Surface was lost or outdated (window resized, minimized, etc.)
    SurfaceLost,
    /// GPU out of memory
    OutOfMemory,
    /// Other surface error
    Other(String),
}

impl std::fmt::Display for RenderError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RenderError::Setup(e) => write!(f, "GPU setup failed: {}", e),
            RenderError::SurfaceLost => write!(f, "Surface lost"),
            RenderError::OutOfMemory => write!(f, "Out of memory"),
            RenderError::Other(msg) => write!(f, "Render error: {}", msg),
        }
    }
}

impl std::error::Error for RenderError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RenderError::Setup(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ContextError> for RenderError {
    fn from(e: ContextError) -> Self {
        RenderError::Setup(e)
    }
}

/// Manages GPU rendering
pub struct RenderSystem {
    context: RenderContext,
    pipeline: RenderPipeline,
    recorder: FrameRecorder,
    camera_config: CameraConfig,
    background_color: [f32; 4],
}

impl RenderSystem {
    /// Create render system from window and config
    ///
    /// A ground texture that fails to load is logged and replaced by plain white.
    /// One larger than the device's 2D texture limit is scaled down.
    pub fn new(window: Arc<Window>, config: &AppConfig) -> Result<Self, RenderError> {
        let context = pollster::block_on(RenderContext::with_vsync(window, config.window.vsync))?;

        let ground_texture = GroundTexture::load_or_fallback(&config.ground.texture)
            .fit_within(context.device.limits().max_texture_dimension_2d);
        let mut pipeline = RenderPipeline::new(
            &context.device,
            &context.queue,
            context.config.format,
            &ground_texture,
        );

        // Ensure depth texture exists
        pipeline.ensure_depth_texture(
            &context.device,
            context.config.width,
            context.config.height,
        );

        let recorder =
            FrameRecorder::with_ground(GroundMesh::new(config.ground.extent, config.ground.tile));

        Ok(Self {
            context,
            pipeline,
            recorder,
            camera_config: config.camera.clone(),
            background_color: config.rendering.background_color,
        })
    }

    /// Handle window resize
    pub fn resize(&mut self, width: u32, height: u32) {
        self.context
            .resize(winit::dpi::PhysicalSize::new(width, height));
        self.pipeline.ensure_depth_texture(
            &self.context.device,
            self.context.config.width,
            self.context.config.height,
        );
    }

    /// Reconfigure the surface at its current size (after `SurfaceLost`)
    pub fn reconfigure(&mut self) {
        let (width, height) = self.size();
        self.resize(width, height);
    }

    /// Render a single frame
    pub fn render_frame(
        &mut self,
        state: &SceneState,
        settings: &SceneSettings,
    ) -> Result<(), RenderError> {
        // Record the scene on the CPU
        self.recorder.clear();
        draw_scene(&mut self.recorder, state, settings);

        let projection = projection_matrix(&self.camera_config, self.context.aspect_ratio());
        let view_proj = mat4::mul(&projection, &state.view_matrix());
        self.pipeline
            .update_uniforms(&self.context.queue, &self.recorder.uniforms(view_proj));
        self.pipeline
            .upload(&self.context.device, &self.context.queue, &self.recorder);

        let (ground, lines, triangles) = self.pipeline.vertex_counts();
        log::trace!(
            "Frame vertices: ground {}, lines {}, triangles {}",
            ground,
            lines,
            triangles
        );

        // Get surface texture
        let output = match self.context.surface.get_current_texture() {
            Ok(output) => output,
            Err(wgpu::SurfaceError::Lost) | Err(wgpu::SurfaceError::Outdated) => {
                return Err(RenderError::SurfaceLost)
            }
            Err(wgpu::SurfaceError::OutOfMemory) => return Err(RenderError::OutOfMemory),
            Err(e) => return Err(RenderError::Other(format!("{:?}", e))),
        };

        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let mut encoder = self
            .context
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        let bg = &self.background_color;
        self.pipeline.render(
            &mut encoder,
            &view,
            wgpu::Color {
                r: bg[0] as f64,
                g: bg[1] as f64,
                b: bg[2] as f64,
                a: bg[3] as f64,
            },
        );

        // Submit
        self.context.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        Ok(())
    }

    /// Get current surface size
    pub fn size(&self) -> (u32, u32) {
        (self.context.config.width, self.context.config.height)
    }
}

/// Perspective projection from the camera config
fn projection_matrix(camera: &CameraConfig, aspect: f32) -> Mat4 {
    mat4::perspective(camera.fov, aspect, camera.near, camera.far)
}

#[cfg(test)]
mod tests {
    use super::*;
    use sierpinski_math::Vec3;

    #[test]
    fn test_render_error_display() {
        assert_eq!(format!("{}", RenderError::SurfaceLost), "Surface lost");
        assert_eq!(format!("{}", RenderError::OutOfMemory), "Out of memory");
        assert_eq!(
            format!("{}", RenderError::Other("test".to_string())),
            "Render error: test"
        );
        assert!(format!("{}", RenderError::from(ContextError::NoAdapter)).contains("adapter"));
    }

    #[test]
    fn test_projection_maps_near_and_far() {
        let camera = CameraConfig::default();
        let proj = projection_matrix(&camera, 1.5);

        let clip = |z: f32| {
            let p = Vec3::new(0.0, 0.0, z);
            let v = mat4::transform_point(&proj, p);
            // w = -z for a right-handed perspective
            v.z / -z
        };
        assert!((clip(-camera.near) - 0.0).abs() < 1e-4);
        assert!((clip(-camera.far) - 1.0).abs() < 1e-4);
    }
}
