// preset.rs — 灯光预设与背景色

use serde::Deserialize;
use std::fmt;
use std::str::FromStr;

/// sRGB color stored as `0xRRGGBB`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color(pub u32);

impl Color {
    pub const WHITE: Color = Color(0xffffff);

    pub fn srgb(self) -> [f32; 3] {
        let r = ((self.0 >> 16) & 0xff) as f32 / 255.0;
        let g = ((self.0 >> 8) & 0xff) as f32 / 255.0;
        let b = (self.0 & 0xff) as f32 / 255.0;
        [r, g, b]
    }

    /// Linear-space components, as the renderer and the clear color expect them.
    pub fn linear(self) -> [f32; 3] {
        self.srgb().map(srgb_to_linear)
    }
}

fn srgb_to_linear(c: f32) -> f32 {
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Preset {
    #[default]
    Daylight,
    Studio,
    Dramatic,
}

/// Light intensities and background for one preset.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PresetConfig {
    pub ambient: f32,
    pub hemisphere: f32,
    pub directional: f32,
    pub point: f32,
    pub background: Color,
}

const DAYLIGHT: PresetConfig = PresetConfig {
    ambient: 0.7,
    hemisphere: 0.5,
    directional: 1.2,
    point: 0.5,
    background: Color(0xaaaaaa),
};

const STUDIO: PresetConfig = PresetConfig {
    ambient: 0.3,
    hemisphere: 0.2,
    directional: 1.5,
    point: 0.7,
    background: Color(0x111111),
};

const DRAMATIC: PresetConfig = PresetConfig {
    ambient: 0.1,
    hemisphere: 0.0,
    directional: 2.0,
    point: 0.2,
    background: Color(0x000000),
};

impl Preset {
    /// Button order, top to bottom.
    pub const ALL: [Preset; 3] = [Preset::Daylight, Preset::Studio, Preset::Dramatic];

    pub fn name(self) -> &'static str {
        match self {
            Preset::Daylight => "daylight",
            Preset::Studio => "studio",
            Preset::Dramatic => "dramatic",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Preset::Daylight => "Daylight",
            Preset::Studio => "Studio",
            Preset::Dramatic => "Dramatic",
        }
    }

    pub fn config(self) -> &'static PresetConfig {
        match self {
            Preset::Daylight => &DAYLIGHT,
            Preset::Studio => &STUDIO,
            Preset::Dramatic => &DRAMATIC,
        }
    }
}

impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownPreset(pub String);

impl fmt::Display for UnknownPreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown preset '{}'", self.0)
    }
}

impl FromStr for Preset {
    type Err = UnknownPreset;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Preset::ALL
            .into_iter()
            .find(|p| p.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| UnknownPreset(s.to_string()))
    }
}
