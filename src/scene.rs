// scene.rs — 场景：背景色、四盏灯与已加载的模型

use crate::model::ModelData;
use crate::preset::{Color, Preset, PresetConfig};
use glam::Vec3;
use std::sync::Arc;

/// Background before any preset is applied.
const INITIAL_BACKGROUND: Color = Color(0x111111);

#[derive(Debug, Clone, PartialEq)]
pub struct AmbientLight {
    pub color: Color,
    pub intensity: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct HemisphereLight {
    pub sky: Color,
    pub ground: Color,
    pub intensity: f32,
}

/// Shines from `position` toward the origin.
#[derive(Debug, Clone, PartialEq)]
pub struct DirectionalLight {
    pub color: Color,
    pub position: Vec3,
    pub intensity: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PointLight {
    pub color: Color,
    pub position: Vec3,
    pub intensity: f32,
}

/// The four fixed lights. Only intensities change after creation.
#[derive(Debug, Clone, PartialEq)]
pub struct LightSet {
    pub ambient: AmbientLight,
    pub hemisphere: HemisphereLight,
    pub directional: DirectionalLight,
    pub point: PointLight,
}

impl Default for LightSet {
    fn default() -> Self {
        Self::new()
    }
}

impl LightSet {
    pub fn new() -> Self {
        let initial = Preset::Daylight.config();
        Self {
            ambient: AmbientLight {
                color: Color::WHITE,
                intensity: initial.ambient,
            },
            hemisphere: HemisphereLight {
                sky: Color::WHITE,
                ground: Color(0x444444),
                intensity: initial.hemisphere,
            },
            directional: DirectionalLight {
                color: Color::WHITE,
                position: Vec3::new(5.0, 10.0, 10.0),
                intensity: initial.directional,
            },
            point: PointLight {
                color: Color::WHITE,
                position: Vec3::new(0.0, 5.0, 5.0),
                intensity: initial.point,
            },
        }
    }

    fn set_intensities(&mut self, config: &PresetConfig) {
        self.ambient.intensity = config.ambient;
        self.hemisphere.intensity = config.hemisphere;
        self.directional.intensity = config.directional;
        self.point.intensity = config.point;
    }

    /// `[ambient, hemisphere, directional, point]`
    pub fn intensities(&self) -> [f32; 4] {
        [
            self.ambient.intensity,
            self.hemisphere.intensity,
            self.directional.intensity,
            self.point.intensity,
        ]
    }
}

pub struct Scene {
    pub background: Color,
    pub lights: LightSet,
    pub model: Option<Arc<ModelData>>,
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

impl Scene {
    pub fn new() -> Self {
        Self {
            background: INITIAL_BACKGROUND,
            lights: LightSet::new(),
            model: None,
        }
    }

    /// Sets light intensities and background from the preset table. Nothing else changes.
    pub fn apply_preset(&mut self, preset: Preset) {
        let config = preset.config();
        self.lights.set_intensities(config);
        self.background = config.background;
        log::debug!(
            "applied {preset} lighting: intensities {:?}, background #{:06x}",
            self.lights.intensities(),
            self.background.0
        );
    }
}
