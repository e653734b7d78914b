use std::f32::consts::PI;

use boa::core::{App, AppControl, FrameCtx};
use boa::device::Gpu;
use boa::geometry::{GeometryBuffers, MeshData};
use boa::input::{InputEvent, InputState, Key};
use boa::render::Viewport;
use boa::shader::{self, Pipeline, PipelineDesc, ShaderStage, UniformSlot};
use glam::{Mat4, Vec2, Vec3};

use crate::camera::Camera;
use crate::config::DemoConfig;
use crate::polygon::Polygon;

/// Outline of the demo polygon, relative to its position.
pub const STAR: [[f32; 4]; 8] = [
    [0.0, 0.0, 0.0, 1.0],
    [8.0, 32.0, 0.0, 1.0],
    [0.0, 64.0, 0.0, 1.0],
    [32.0, 56.0, 0.0, 1.0],
    [64.0, 64.0, 0.0, 1.0],
    [56.0, 32.0, 0.0, 1.0],
    [64.0, 0.0, 0.0, 1.0],
    [32.0, 8.0, 0.0, 1.0],
];

pub const STAR_POS: [f32; 4] = [256.0, 128.0, 0.0, 1.0];

const CLEAR: wgpu::Color = wgpu::Color {
    r: 0.0,
    g: 0.0,
    b: 0.0,
    a: 0.0,
};

struct Transforms {
    model: UniformSlot,
    view: UniformSlot,
    projection: UniformSlot,
}

/// GPU objects created once in `on_start`.
struct Scene {
    pipeline: Pipeline,
    geometry: GeometryBuffers,
    transforms: Transforms,
}

/// Renders one polygon under a keyboard-driven camera.
pub struct PolygonDemo {
    config: DemoConfig,
    polygon: Polygon,
    camera: Camera,
    scene: Option<Scene>,
    frames: u64,
}

impl PolygonDemo {
    pub fn new(config: DemoConfig) -> Self {
        let mut polygon = Polygon::new(&STAR, STAR_POS);
        polygon.rotate(2.0 * PI / 3.0, polygon.pos());

        Self {
            camera: Camera::new(config.camera_step),
            config,
            polygon,
            scene: None,
            frames: 0,
        }
    }

    fn projection(&self) -> Mat4 {
        Viewport::new(self.config.width as f32, self.config.height as f32).ortho()
    }
}

impl App for PolygonDemo {
    fn on_start(&mut self, gpu: &Gpu<'_>) -> anyhow::Result<()> {
        let device = gpu.device();
        let caps = gpu.shader_capabilities();

        let vert = shader::compile_with(
            device,
            self.config.vertex_shader(),
            ShaderStage::Vertex,
            caps,
        )?;
        let frag = shader::compile_with(
            device,
            self.config.fragment_shader(),
            ShaderStage::Fragment,
            caps,
        )?;

        let layouts = [MeshData::vertex_layout()];
        let desc = PipelineDesc::new("polygon", gpu.surface_format())
            .with_depth(gpu.depth_format())
            .with_vertex_buffers(&layouts);
        let mut pipeline = shader::link(device, &[&vert, &frag], &desc)?;
        drop((vert, frag));

        let transforms = Transforms {
            model: pipeline.uniform_mat4("model")?,
            view: pipeline.uniform_mat4("view")?,
            projection: pipeline.uniform_mat4("projection")?,
        };
        pipeline.set_mat4(transforms.model, &Mat4::IDENTITY);
        pipeline.set_mat4(transforms.projection, &self.projection());

        let mesh = MeshData::from_homogeneous(&self.polygon.vertices());
        anyhow::ensure!(mesh.num_elements() > 0, "polygon did not triangulate");
        let geometry = GeometryBuffers::upload(device, &mesh);

        let centroid = self.polygon.centroid();
        let on_screen = screen_position(
            self.projection(),
            self.camera.view(),
            Mat4::IDENTITY,
            centroid.extend(0.0),
            Viewport::new(self.config.width as f32, self.config.height as f32),
        );
        log::info!(
            "scene ready: {} triangles, centroid {centroid} drawn at {on_screen}",
            mesh.num_elements() / 3
        );

        self.scene = Some(Scene {
            pipeline,
            geometry,
            transforms,
        });
        Ok(())
    }

    fn on_input(&mut self, event: &InputEvent, _input: &InputState) -> AppControl {
        if event.is_press_of(Key::Escape) {
            log::info!("escape pressed; closing");
            return AppControl::Exit;
        }
        AppControl::Continue
    }

    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl {
        self.camera.apply_held_keys(ctx.input);

        let Some(scene) = self.scene.as_mut() else {
            return AppControl::Exit;
        };

        scene
            .pipeline
            .set_mat4(scene.transforms.view, &self.camera.view());
        self.frames += 1;

        ctx.render(CLEAR, |rctx, pass| {
            scene.pipeline.flush(rctx.queue);
            scene.pipeline.bind(pass);
            scene.geometry.draw(pass);
        })
    }

    fn on_exit(&mut self) {
        self.scene = None;
        log::info!(
            "rendered {} frames, camera at {}",
            self.frames,
            self.camera.pos()
        );
    }
}

/// Pixel position of `world` after `projection * view * model`, origin bottom-left.
pub fn screen_position(
    projection: Mat4,
    view: Mat4,
    model: Mat4,
    world: Vec3,
    viewport: Viewport,
) -> Vec2 {
    let ndc = (projection * view * model).project_point3(world);
    Vec2::new(
        (ndc.x + 1.0) * 0.5 * viewport.width,
        (ndc.y + 1.0) * 0.5 * viewport.height,
    )
}

/// Fails early when the configured shader directory is missing.
pub fn check_shader_dir(config: &DemoConfig) -> anyhow::Result<()> {
    let vert = config.vertex_shader();
    anyhow::ensure!(
        vert.parent().is_some_and(|d| d.is_dir()),
        "shader directory {} does not exist",
        config.shader_dir.display()
    );
    log::debug!(
        "shaders: {} / {}",
        vert.display(),
        config.fragment_shader().display()
    );
    Ok(())
}
