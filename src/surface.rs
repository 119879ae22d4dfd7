// surface.rs — 渲染表面抽象：容器尺寸、表面创建与逐帧绘制

use crate::camera::PerspectiveCamera;
use crate::error::ViewerError;
use crate::model::ModelData;
use crate::scene::Scene;
use winit::dpi::PhysicalSize;
use winit::event::WindowEvent;
use winit::window::Window;

/// Size of the area the viewer fills, in logical pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContainerSize {
    pub width: f64,
    pub height: f64,
    pub scale_factor: f64,
}

impl ContainerSize {
    pub fn new(width: f64, height: f64, scale_factor: f64) -> Self {
        Self { width, height, scale_factor }
    }

    pub fn of_window(window: &Window) -> Self {
        let scale_factor = window.scale_factor();
        let logical = window.inner_size().to_logical::<f64>(scale_factor);
        Self::new(logical.width, logical.height, scale_factor)
    }

    /// Surface size after pixel-density scaling.
    pub fn physical(&self) -> PhysicalSize<u32> {
        PhysicalSize::new(
            (self.width * self.scale_factor).round() as u32,
            (self.height * self.scale_factor).round() as u32,
        )
    }

    pub fn is_empty(&self) -> bool {
        let p = self.physical();
        p.width == 0 || p.height == 0
    }

    pub fn aspect(&self) -> Option<f32> {
        (self.height > 0.0).then(|| (self.width / self.height) as f32)
    }
}

/// What a surface needs to draw one frame.
pub struct FrameInput<'a> {
    pub scene: &'a Scene,
    pub camera: &'a PerspectiveCamera,
}

/// A drawable surface attached to the container. Dropping it detaches it.
pub trait RenderSurface {
    fn resize(&mut self, size: ContainerSize);

    /// Uploads geometry that has finished loading.
    fn set_model(&mut self, model: &ModelData);

    /// Lets the overlay UI claim an input event first. Returns true when consumed.
    fn handle_window_event(&mut self, event: &WindowEvent) -> bool;

    /// Draws the scene, then the overlay built by `ui`.
    fn render(
        &mut self,
        frame: &FrameInput<'_>,
        ui: &mut dyn FnMut(&egui::Context),
    ) -> Result<(), wgpu::SurfaceError>;
}

/// Creates surfaces inside the host container.
pub trait SurfaceProvider {
    type Surface: RenderSurface;

    fn create_surface(&mut self, size: ContainerSize) -> Result<Self::Surface, ViewerError>;
}

#[cfg(test)]
pub(crate) mod fake {
    use super::*;
    use std::cell::RefCell;
    use std::collections::VecDeque;
    use std::rc::Rc;

    #[derive(Debug, Clone, PartialEq)]
    pub enum SurfaceEvent {
        Created { id: usize, size: PhysicalSize<u32> },
        Resized { id: usize, size: PhysicalSize<u32> },
        ModelSet { id: usize, triangles: usize },
        Rendered { id: usize, background: u32, intensities: [f32; 4], aspect: f32 },
        Detached { id: usize },
    }

    pub type EventLog = Rc<RefCell<Vec<SurfaceEvent>>>;

    /// Errors the next `render` calls return, oldest first.
    pub type RenderErrors = Rc<RefCell<VecDeque<wgpu::SurfaceError>>>;

    /// Records every surface operation instead of touching a GPU.
    pub struct FakeSurface {
        id: usize,
        log: EventLog,
        render_errors: RenderErrors,
        egui: egui::Context,
    }

    impl RenderSurface for FakeSurface {
        fn resize(&mut self, size: ContainerSize) {
            self.log
                .borrow_mut()
                .push(SurfaceEvent::Resized { id: self.id, size: size.physical() });
        }

        fn set_model(&mut self, model: &ModelData) {
            self.log.borrow_mut().push(SurfaceEvent::ModelSet {
                id: self.id,
                triangles: model.indices.len() / 3,
            });
        }

        fn handle_window_event(&mut self, _event: &WindowEvent) -> bool {
            false
        }

        fn render(
            &mut self,
            frame: &FrameInput<'_>,
            ui: &mut dyn FnMut(&egui::Context),
        ) -> Result<(), wgpu::SurfaceError> {
            if let Some(err) = self.render_errors.borrow_mut().pop_front() {
                return Err(err);
            }
            let _ = self.egui.run(egui::RawInput::default(), |ctx| ui(ctx));
            self.log.borrow_mut().push(SurfaceEvent::Rendered {
                id: self.id,
                background: frame.scene.background.0,
                intensities: frame.scene.lights.intensities(),
                aspect: frame.camera.aspect,
            });
            Ok(())
        }
    }

    impl Drop for FakeSurface {
        fn drop(&mut self) {
            self.log.borrow_mut().push(SurfaceEvent::Detached { id: self.id });
        }
    }

    #[derive(Default)]
    pub struct FakeProvider {
        pub log: EventLog,
        pub render_errors: RenderErrors,
        created: usize,
    }

    impl FakeProvider {
        pub fn events(&self) -> Vec<SurfaceEvent> {
            self.log.borrow().clone()
        }
    }

    impl SurfaceProvider for FakeProvider {
        type Surface = FakeSurface;

        fn create_surface(&mut self, size: ContainerSize) -> Result<FakeSurface, ViewerError> {
            let id = self.created;
            self.created += 1;
            self.log
                .borrow_mut()
                .push(SurfaceEvent::Created { id, size: size.physical() });
            Ok(FakeSurface {
                id,
                log: self.log.clone(),
                render_errors: self.render_errors.clone(),
                egui: egui::Context::default(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn physical_size_applies_scale_factor() {
        let size = ContainerSize::new(800.0, 600.0, 2.0);
        assert_eq!(size.physical(), PhysicalSize::new(1600, 1200));
        assert_eq!(ContainerSize::new(800.0, 600.0, 1.0).physical(), PhysicalSize::new(800, 600));
    }

    #[test]
    fn aspect_guards_zero_height() {
        assert!((ContainerSize::new(800.0, 600.0, 1.0).aspect().unwrap() - 1.3333).abs() < 1e-3);
        assert_eq!(ContainerSize::new(800.0, 0.0, 1.0).aspect(), None);
        assert!(ContainerSize::new(800.0, 0.0, 1.0).is_empty());
    }
}
