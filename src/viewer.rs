// viewer.rs — 查看器控制器：挂载 / 卸载、预设切换、尺寸变化、逐帧驱动

use crate::config::{PresetChange, ViewerConfig};
use crate::error::ViewerError;
use crate::model::PendingModel;
use crate::preset::Preset;
use crate::session::Session;
use crate::surface::{ContainerSize, SurfaceProvider};
use std::path::PathBuf;
use winit::event::WindowEvent;

/// Owns the active preset and at most one live session.
pub struct ViewerController<P: SurfaceProvider> {
    provider: P,
    preset: Preset,
    preset_change: PresetChange,
    model_path: PathBuf,
    session: Option<Session<P::Surface>>,
}

impl<P: SurfaceProvider> ViewerController<P> {
    pub fn new(provider: P, config: &ViewerConfig, model_path: PathBuf) -> Self {
        Self {
            provider,
            preset: config.initial_preset,
            preset_change: config.preset_change,
            model_path,
            session: None,
        }
    }

    #[cfg(test)]
    pub fn active_preset(&self) -> Preset {
        self.preset
    }

    pub fn is_mounted(&self) -> bool {
        self.session.is_some()
    }

    #[cfg(test)]
    pub fn session(&self) -> Option<&Session<P::Surface>> {
        self.session.as_ref()
    }

    /// Creates the surface, lights the scene with the active preset and starts
    /// loading the model. A session that is already live is torn down first.
    pub fn mount(&mut self, container: ContainerSize) -> Result<(), ViewerError> {
        self.unmount();

        let surface = self.provider.create_surface(container)?;
        let model = PendingModel::spawn(self.model_path.clone());
        self.session = Some(Session::new(container, surface, self.preset, model));

        let size = container.physical();
        log::info!(
            "viewer mounted at {}x{} with {} lighting",
            size.width,
            size.height,
            self.preset
        );
        Ok(())
    }

    /// Releases the surface and stops the render loop. No-op when not mounted.
    pub fn unmount(&mut self) {
        if self.session.take().is_some() {
            log::info!("viewer unmounted");
        }
    }

    pub fn select_preset(&mut self, preset: Preset) -> Result<(), ViewerError> {
        self.preset = preset;
        let Some(session) = &mut self.session else {
            return Ok(());
        };

        match self.preset_change {
            PresetChange::InPlace => {
                session.apply_preset(preset);
                Ok(())
            }
            PresetChange::Remount => {
                let container = session.container();
                self.mount(container)
                    .map_err(|e| ViewerError::Remount(Box::new(e)))
            }
        }
    }

    pub fn resize(&mut self, container: ContainerSize) {
        if let Some(session) = &mut self.session {
            session.resize(container);
        }
    }

    /// Returns true when the overlay or the camera controls used the event.
    pub fn handle_window_event(&mut self, event: &WindowEvent) -> bool {
        match &mut self.session {
            Some(session) => session.handle_window_event(event),
            None => false,
        }
    }

    /// One render-loop tick. Does nothing once unmounted.
    pub fn frame(&mut self) -> Result<(), ViewerError> {
        let Some(session) = &mut self.session else {
            return Ok(());
        };

        let mut clicked = None;
        session.tick(&mut |ctx: &egui::Context| {
            if let Some(preset) = crate::ui::preset_bar(ctx) {
                clicked = Some(preset);
            }
        })?;

        if let Some(preset) = clicked {
            self.select_preset(preset)?;
        }
        Ok(())
    }
}
