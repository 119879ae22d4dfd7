// camera.rs — 透视相机与轨道控制器 (旋转 / 平移 / 缩放, 带阻尼)

use glam::{Mat4, Vec3};
use winit::dpi::PhysicalPosition;
use winit::event::{ElementState, MouseButton, MouseScrollDelta, WindowEvent};

pub const FOV_DEGREES: f32 = 60.0;
pub const NEAR: f32 = 0.1;
pub const FAR: f32 = 1000.0;
pub const MIN_DISTANCE: f32 = 1.0;
pub const MAX_DISTANCE: f32 = 10.0;
pub const DAMPING_FACTOR: f32 = 0.05;

const INITIAL_POSITION: Vec3 = Vec3::new(0.0, 1.0, 3.0);
const ZOOM_SCALE: f32 = 0.95;
const POLAR_EPS: f32 = 1e-6;

pub struct PerspectiveCamera {
    pub fov: f32,
    pub near: f32,
    pub far: f32,
    pub aspect: f32,
    pub position: Vec3,
    pub target: Vec3,
    pub up: Vec3,
    projection: Mat4,
}

impl PerspectiveCamera {
    pub fn new(aspect: f32) -> Self {
        let mut camera = Self {
            fov: FOV_DEGREES,
            near: NEAR,
            far: FAR,
            aspect,
            position: INITIAL_POSITION,
            target: Vec3::ZERO,
            up: Vec3::Y,
            projection: Mat4::IDENTITY,
        };
        camera.update_projection();
        camera
    }

    /// Recomputes the cached projection after fov/aspect/near/far changed.
    pub fn update_projection(&mut self) {
        self.projection =
            Mat4::perspective_rh(self.fov.to_radians(), self.aspect, self.near, self.far);
    }

    pub fn projection(&self) -> Mat4 {
        self.projection
    }

    pub fn view(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.target, self.up)
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection() * self.view()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Drag {
    Rotate,
    Pan,
}

/// Spherical coordinates around the +Y axis.
#[derive(Debug, Clone, Copy)]
struct Spherical {
    radius: f32,
    phi: f32,
    theta: f32,
}

impl Spherical {
    fn from_offset(v: Vec3) -> Self {
        let radius = v.length();
        if radius == 0.0 {
            return Self { radius, phi: 0.0, theta: 0.0 };
        }
        Self {
            radius,
            theta: v.x.atan2(v.z),
            phi: (v.y / radius).clamp(-1.0, 1.0).acos(),
        }
    }

    fn to_offset(self) -> Vec3 {
        let s = self.phi.sin() * self.radius;
        Vec3::new(s * self.theta.sin(), self.phi.cos() * self.radius, s * self.theta.cos())
    }
}

/// Orbit/pan/zoom controls. Input accumulates into pending deltas that
/// `update` bleeds into the camera each frame.
pub struct OrbitControls {
    pub enable_damping: bool,
    pub enable_pan: bool,
    pub damping_factor: f32,
    pub min_distance: f32,
    pub max_distance: f32,
    delta_theta: f32,
    delta_phi: f32,
    pan_offset: Vec3,
    scale: f32,
    drag: Option<Drag>,
    last_cursor: Option<PhysicalPosition<f64>>,
}

impl Default for OrbitControls {
    fn default() -> Self {
        Self::new()
    }
}

impl OrbitControls {
    pub fn new() -> Self {
        Self {
            enable_damping: true,
            enable_pan: true,
            damping_factor: DAMPING_FACTOR,
            min_distance: MIN_DISTANCE,
            max_distance: MAX_DISTANCE,
            delta_theta: 0.0,
            delta_phi: 0.0,
            pan_offset: Vec3::ZERO,
            scale: 1.0,
            drag: None,
            last_cursor: None,
        }
    }

    /// Pixel deltas; a drag across the full height turns one revolution.
    pub fn rotate(&mut self, dx: f32, dy: f32, viewport_height: f32) {
        if viewport_height <= 0.0 {
            return;
        }
        self.delta_theta -= std::f32::consts::TAU * dx / viewport_height;
        self.delta_phi -= std::f32::consts::TAU * dy / viewport_height;
    }

    pub fn pan(&mut self, camera: &PerspectiveCamera, dx: f32, dy: f32, viewport_height: f32) {
        if !self.enable_pan || viewport_height <= 0.0 {
            return;
        }
        let offset = camera.position - camera.target;
        let target_distance = offset.length() * (camera.fov.to_radians() / 2.0).tan();

        let forward = (-offset).normalize_or_zero();
        let right = forward.cross(camera.up).normalize_or_zero();
        let up = right.cross(forward).normalize_or_zero();

        self.pan_offset -= right * (2.0 * dx * target_distance / viewport_height);
        self.pan_offset += up * (2.0 * dy * target_distance / viewport_height);
    }

    /// Positive steps move the camera toward the target.
    pub fn dolly(&mut self, steps: f32) {
        self.scale *= ZOOM_SCALE.powf(steps);
    }

    /// Advances the camera by the pending input. Call once per frame.
    pub fn update(&mut self, camera: &mut PerspectiveCamera) {
        let mut spherical = Spherical::from_offset(camera.position - camera.target);

        let factor = if self.enable_damping { self.damping_factor } else { 1.0 };
        spherical.theta += self.delta_theta * factor;
        spherical.phi += self.delta_phi * factor;
        spherical.phi = spherical.phi.clamp(POLAR_EPS, std::f32::consts::PI - POLAR_EPS);
        spherical.radius = (spherical.radius * self.scale).clamp(self.min_distance, self.max_distance);

        camera.target += self.pan_offset * factor;
        camera.position = camera.target + spherical.to_offset();

        if self.enable_damping {
            self.delta_theta *= 1.0 - self.damping_factor;
            self.delta_phi *= 1.0 - self.damping_factor;
            self.pan_offset *= 1.0 - self.damping_factor;
        } else {
            self.delta_theta = 0.0;
            self.delta_phi = 0.0;
            self.pan_offset = Vec3::ZERO;
        }
        self.scale = 1.0;
    }

    /// Maps pointer input to rotate/pan/dolly. Returns true when the event was used.
    pub fn handle_event(
        &mut self,
        event: &WindowEvent,
        camera: &PerspectiveCamera,
        viewport_height: f32,
    ) -> bool {
        match event {
            WindowEvent::MouseInput { state, button, .. } => {
                let mode = match button {
                    MouseButton::Left => Drag::Rotate,
                    MouseButton::Right | MouseButton::Middle => Drag::Pan,
                    _ => return false,
                };
                match state {
                    ElementState::Pressed => self.drag = Some(mode),
                    ElementState::Released => {
                        if self.drag == Some(mode) {
                            self.drag = None;
                        }
                    }
                }
                self.last_cursor = None;
                true
            }
            WindowEvent::CursorMoved { position, .. } => {
                let Some(mode) = self.drag else {
                    return false;
                };
                if let Some(last) = self.last_cursor {
                    let dx = (position.x - last.x) as f32;
                    let dy = (position.y - last.y) as f32;
                    match mode {
                        Drag::Rotate => self.rotate(dx, dy, viewport_height),
                        Drag::Pan => self.pan(camera, dx, dy, viewport_height),
                    }
                }
                self.last_cursor = Some(*position);
                true
            }
            WindowEvent::MouseWheel { delta, .. } => {
                let steps = match delta {
                    MouseScrollDelta::LineDelta(_, y) => *y,
                    MouseScrollDelta::PixelDelta(pos) => pos.y as f32 / 20.0,
                };
                self.dolly(steps);
                true
            }
            WindowEvent::CursorLeft { .. } => {
                self.drag = None;
                self.last_cursor = None;
                false
            }
            _ => false,
        }
    }
}
