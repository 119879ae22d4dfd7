// session.rs — 一次挂载的全部资源：场景、相机、控制器、表面、模型加载

use crate::camera::{OrbitControls, PerspectiveCamera};
use crate::model::{ModelPoll, PendingModel};
use crate::preset::Preset;
use crate::scene::Scene;
use crate::surface::{ContainerSize, FrameInput, RenderSurface};
use std::sync::Arc;
use winit::event::WindowEvent;

/// Live resources for one mounted viewer. Dropping the session releases the
/// surface and abandons any model still loading.
pub struct Session<S: RenderSurface> {
    container: ContainerSize,
    scene: Scene,
    camera: PerspectiveCamera,
    controls: OrbitControls,
    surface: S,
    pending_model: Option<PendingModel>,
}

impl<S: RenderSurface> Session<S> {
    pub fn new(container: ContainerSize, surface: S, preset: Preset, model: PendingModel) -> Self {
        let mut scene = Scene::default();
        scene.apply_preset(preset);

        Self {
            container,
            camera: PerspectiveCamera::new(container.aspect().unwrap_or(1.0)),
            controls: OrbitControls::default(),
            scene,
            surface,
            pending_model: Some(model),
        }
    }

    pub fn container(&self) -> ContainerSize {
        self.container
    }

    #[cfg(test)]
    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    #[cfg(test)]
    pub fn camera(&self) -> &PerspectiveCamera {
        &self.camera
    }

    pub fn apply_preset(&mut self, preset: Preset) {
        self.scene.apply_preset(preset);
    }

    pub fn resize(&mut self, container: ContainerSize) {
        if container.is_empty() {
            return;
        }
        self.container = container;
        if let Some(aspect) = container.aspect() {
            self.camera.aspect = aspect;
            self.camera.update_projection();
        }
        self.surface.resize(container);
    }

    pub fn handle_window_event(&mut self, event: &WindowEvent) -> bool {
        if self.surface.handle_window_event(event) {
            return true;
        }
        // 光标坐标是物理像素
        let height = self.container.physical().height as f32;
        self.controls.handle_event(event, &self.camera, height)
    }

    fn poll_model(&mut self) {
        let Some(pending) = &self.pending_model else {
            return;
        };
        match pending.poll() {
            ModelPoll::Pending => {}
            ModelPoll::Ready(model) => {
                self.surface.set_model(&model);
                self.scene.model = Some(Arc::new(model));
                self.pending_model = None;
            }
            ModelPoll::Abandoned => self.pending_model = None,
        }
    }

    /// One render-loop tick: pick up a finished model, advance the controls, draw.
    pub fn tick(&mut self, ui: &mut dyn FnMut(&egui::Context)) -> Result<(), wgpu::SurfaceError> {
        self.poll_model();
        self.controls.update(&mut self.camera);

        let frame = FrameInput {
            scene: &self.scene,
            camera: &self.camera,
        };
        match self.surface.render(&frame, ui) {
            Err(wgpu::SurfaceError::Lost) => {
                log::warn!("render surface lost, reconfiguring");
                self.surface.resize(self.container);
                Ok(())
            }
            // 最小化时每帧都可能出现，只记 debug
            Err(wgpu::SurfaceError::Outdated) => {
                log::debug!("render surface outdated, reconfiguring");
                self.surface.resize(self.container);
                Ok(())
            }
            Err(wgpu::SurfaceError::Timeout) => {
                log::debug!("surface texture timed out, skipping frame");
                Ok(())
            }
            other => other,
        }
    }
}
