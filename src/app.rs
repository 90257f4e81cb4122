use std::sync::Arc;
use std::time::Instant;

use glam::{Mat4, Quat, Vec3};
use winit::application::ApplicationHandler;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::window::{Window, WindowAttributes, WindowId};

use crate::controls::{Action, Controls, DemoMode};
use crate::error::{Error, Result};
use crate::free_rotation::FreeRotation;
use crate::gpu::GpuContext;
use crate::input::Input;
use crate::matrix_stack::MatrixStack;
use crate::mesh::{Mesh, MeshData};
use crate::mesh_pass::{DrawCall, MeshPass};
use crate::orientation::Orientation;
use crate::settings::{Settings, WindowSettings};
use crate::sphere_camera::SphereCamera;

const SHIP_POSITION: Vec3 = Vec3::new(0.0, 40.0, 0.0);
const SHIP_SCALE: f32 = 25.0;
const GROUND_SIZE: f32 = 400.0;
const MARKER_SCALE: f32 = 3.0;
const COLUMN_CORNERS: [Vec3; 4] = [
    Vec3::new(-60.0, 0.0, -60.0),
    Vec3::new(60.0, 0.0, -60.0),
    Vec3::new(-60.0, 0.0, 60.0),
    Vec3::new(60.0, 0.0, 60.0),
];
const COLUMN_SCALE: f32 = 6.0;
/// Column height in column units, base and capital included.
const COLUMN_HEIGHT: f32 = 5.0;
/// Height of the base slab and of the capital slab.
const COLUMN_SLAB: f32 = 0.25;
const COLUMN_COLOR: [f32; 3] = [0.78, 0.74, 0.66];
const CLEAR_COLOR: wgpu::Color = wgpu::Color {
    r: 0.08,
    g: 0.1,
    b: 0.14,
    a: 1.0,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Flow {
    Continue,
    Exit,
}

/// Model matrices for one frame.
#[derive(Clone, Debug)]
struct SceneModels {
    ground: Mat4,
    ship: Mat4,
    /// `None` while the marker is hidden.
    marker: Option<Mat4>,
    /// Base, shaft and capital of every column, column by column.
    columns: Vec<Mat4>,
}

/// Base, shaft and capital of a column `height` units tall, standing on the
/// origin of the current frame. Each part is a unit cube.
fn column_parts(stack: &mut MatrixStack, height: f32) -> [Mat4; 3] {
    let base = stack.with_pushed(|stack| {
        stack.scale(Vec3::new(1.0, COLUMN_SLAB, 1.0));
        stack.translate(Vec3::new(0.0, 0.5, 0.0));
        stack.top()
    });

    let shaft = stack.with_pushed(|stack| {
        stack.translate(Vec3::new(0.0, COLUMN_SLAB, 0.0));
        stack.scale(Vec3::new(0.8, height - 2.0 * COLUMN_SLAB, 0.8));
        stack.translate(Vec3::new(0.0, 0.5, 0.0));
        stack.top()
    });

    let capital = stack.with_pushed(|stack| {
        stack.translate(Vec3::new(0.0, height - COLUMN_SLAB, 0.0));
        stack.scale(Vec3::new(1.0, COLUMN_SLAB, 1.0));
        stack.translate(Vec3::new(0.0, 0.5, 0.0));
        stack.top()
    });

    [base, shaft, capital]
}

/// Everything the demo simulates, independent of the window and GPU.
struct Demo {
    orientation: Orientation,
    free: FreeRotation,
    controls: Controls,
    sphere: SphereCamera,
    show_marker: bool,
}

impl Demo {
    fn from_settings(settings: &Settings) -> Result<Self> {
        let orientation = Orientation::new(settings.orientation_table()?)
            .with_duration(settings.animation_duration()?)
            .with_interpolation(settings.animation.interpolation);

        Ok(Self {
            orientation,
            free: FreeRotation::new(),
            controls: Controls::new(settings.animation.free_rotation_step_deg),
            sphere: settings.sphere_camera()?,
            show_marker: true,
        })
    }

    fn apply(&mut self, action: Action, now: Instant) -> Flow {
        match action {
            Action::AnimateTo(index) => {
                if let Err(err) = self.orientation.animate_to_at(index, now) {
                    log::warn!("{err}");
                }
            }
            Action::ToggleSlerp => {
                self.orientation.toggle_slerp();
            }
            Action::ToggleMultiplyOrder => {
                self.free.toggle_order();
            }
            Action::Offset { axis, degrees } => self.free.offset(axis, degrees),
            Action::ToggleMarker => {
                self.show_marker = !self.show_marker;
                let state = if self.show_marker { "shown" } else { "hidden" };
                log::info!("target marker {state}");
            }
            Action::SwitchMode => {
                self.controls.switch_mode();
            }
            Action::Exit => return Flow::Exit,
        }
        Flow::Continue
    }

    /// Apply this frame's input and advance the animation to `now`.
    fn tick(&mut self, input: &Input, now: Instant) -> Flow {
        for action in self.controls.actions(input, self.orientation.table()) {
            if self.apply(action, now) == Flow::Exit {
                return Flow::Exit;
            }
        }
        self.sphere.update(input);
        self.orientation.update_time_at(now);
        Flow::Continue
    }

    fn ship_rotation(&self, now: Instant) -> Quat {
        match self.controls.mode {
            DemoMode::Interpolate => self.orientation.orient_at(now),
            DemoMode::Free => self.free.orientation(),
        }
    }

    fn scene_models(&self, now: Instant) -> SceneModels {
        let mut stack = MatrixStack::new();
        let ground = stack.top();

        let ship = stack.with_pushed(|stack| {
            stack.translate(SHIP_POSITION);
            stack.rotate_quat(self.ship_rotation(now));
            stack.scale(Vec3::splat(SHIP_SCALE));
            stack.top()
        });

        let marker = self.show_marker.then(|| {
            stack.with_pushed(|stack| {
                stack.translate(self.sphere.target);
                stack.scale(Vec3::splat(MARKER_SCALE));
                stack.top()
            })
        });

        let mut columns = Vec::with_capacity(COLUMN_CORNERS.len() * 3);
        for corner in COLUMN_CORNERS {
            stack.with_pushed(|stack| {
                stack.translate(corner);
                stack.scale(Vec3::splat(COLUMN_SCALE));
                columns.extend(column_parts(stack, COLUMN_HEIGHT));
            });
        }

        SceneModels {
            ground,
            ship,
            marker,
            columns,
        }
    }

    fn title(&self, base: &str) -> String {
        match self.controls.mode {
            DemoMode::Interpolate => {
                let current = self.orientation.current_index();
                let name = self
                    .orientation
                    .table()
                    .get(current)
                    .map_or("", |entry| entry.name.as_str());
                let target = self
                    .orientation
                    .final_index()
                    .map_or(String::new(), |target| format!(" -> {target}"));
                format!(
                    "{base} | {} | {current}: {name}{target}",
                    self.orientation.interpolation()
                )
            }
            DemoMode::Free => format!("{base} | free | {}", self.free.order()),
        }
    }
}

struct Meshes {
    ship: Mesh,
    marker: Mesh,
    column: Mesh,
    ground: Mesh,
}

struct Running {
    window: Arc<Window>,
    gpu: GpuContext,
    mesh_pass: MeshPass,
    meshes: Meshes,
    demo: Demo,
    input: Input,
    base_title: String,
    title: String,
}

enum OrientApp {
    Pending {
        window: WindowSettings,
        demo: Option<Demo>,
    },
    Running(Box<Running>),
    Failed(Error),
}

impl OrientApp {
    fn start(event_loop: &ActiveEventLoop, window: &WindowSettings, demo: Demo) -> Result<Running> {
        let window_attrs = WindowAttributes::default()
            .with_title(&window.title)
            .with_inner_size(winit::dpi::LogicalSize::new(window.width, window.height));

        let handle = Arc::new(event_loop.create_window(window_attrs)?);
        let gpu = GpuContext::new(handle.clone())?;
        let mesh_pass = MeshPass::new(&gpu);
        let meshes = Meshes {
            ship: Mesh::new(&gpu, &MeshData::ship()),
            marker: Mesh::new(&gpu, &MeshData::cube()),
            column: Mesh::new(&gpu, &MeshData::solid_cube(COLUMN_COLOR)),
            ground: Mesh::new(&gpu, &MeshData::ground(GROUND_SIZE)),
        };

        log::info!(
            "{} orientations loaded, {} over {:?}",
            demo.orientation.table().len(),
            demo.orientation.interpolation(),
            demo.orientation.duration()
        );

        Ok(Running {
            window: handle,
            gpu,
            mesh_pass,
            meshes,
            demo,
            input: Input::new(),
            base_title: window.title.clone(),
            title: String::new(),
        })
    }
}

impl ApplicationHandler for OrientApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        let OrientApp::Pending { window, demo } = self else {
            return;
        };
        let Some(demo) = demo.take() else {
            return;
        };

        *self = match Self::start(event_loop, window, demo) {
            Ok(running) => {
                running.window.request_redraw();
                OrientApp::Running(Box::new(running))
            }
            Err(err) => {
                log::error!("failed to start: {err}");
                event_loop.exit();
                OrientApp::Failed(err)
            }
        };
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        let OrientApp::Running(running) = self else {
            return;
        };

        running.input.handle_event(&event);

        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }
            WindowEvent::Resized(size) => {
                running.gpu.resize(size.width, size.height);
            }
            WindowEvent::RedrawRequested => {
                let now = Instant::now();
                if running.demo.tick(&running.input, now) == Flow::Exit {
                    event_loop.exit();
                    return;
                }

                let title = running.demo.title(&running.base_title);
                if title != running.title {
                    running.window.set_title(&title);
                    running.title = title;
                }

                running.render(now);
                running.input.begin_frame();
                running.window.request_redraw();
            }
            _ => {}
        }
    }
}

impl Running {
    fn render(&mut self, now: Instant) {
        let output = match self.gpu.surface.get_current_texture() {
            Ok(output) => output,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                let (width, height) = (self.gpu.width(), self.gpu.height());
                self.gpu.resize(width, height);
                return;
            }
            Err(err) => {
                log::error!("failed to acquire frame: {err}");
                return;
            }
        };
        self.mesh_pass.ensure_depth_size(&self.gpu);

        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let mut encoder = self
            .gpu
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Frame Encoder"),
            });

        let models = self.demo.scene_models(now);
        let camera = self.demo.sphere.camera();
        let mut draws = vec![
            DrawCall {
                mesh: &self.meshes.ground,
                model: models.ground,
            },
            DrawCall {
                mesh: &self.meshes.ship,
                model: models.ship,
            },
        ];
        draws.extend(models.columns.iter().map(|&model| DrawCall {
            mesh: &self.meshes.column,
            model,
        }));
        if let Some(model) = models.marker {
            draws.push(DrawCall {
                mesh: &self.meshes.marker,
                model,
            });
        }

        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Scene Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(CLEAR_COLOR),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.mesh_pass.depth_view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            self.mesh_pass
                .render(&self.gpu, &mut render_pass, &camera, &draws);
        }

        self.gpu.queue.submit(std::iter::once(encoder.finish()));
        output.present();
    }
}

/// Open a window and run the orientation demo until it is closed.
///
/// Settings are validated before any window is created, so a bad
/// orientation table or duration is reported without touching the GPU.
pub fn run(settings: Settings) -> Result<()> {
    let demo = Demo::from_settings(&settings)?;

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = OrientApp::Pending {
        window: settings.window,
        demo: Some(demo),
    };
    event_loop.run_app(&mut app)?;

    match app {
        OrientApp::Failed(err) => Err(err),
        _ => Ok(()),
    }
}
