// config.rs — 启动配置
//
// Layering, lowest to highest:
// - built-in defaults
// - JSON file: --config <path> or VIEWER_CONFIG
// - env: VIEWER_PRESET, VIEWER_PRESET_CHANGE, VIEWER_LANG
// - CLI: --preset <name>, --preset-change <in-place|remount>, --lang <code>

use crate::error::ConfigError;
use crate::preset::Preset;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// What happens to the live session when the user picks another preset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PresetChange {
    /// Re-light the existing session.
    #[default]
    InPlace,
    /// Tear the session down and mount a fresh one with the new preset.
    Remount,
}

impl FromStr for PresetChange {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "in-place" | "inplace" => Ok(PresetChange::InPlace),
            "remount" => Ok(PresetChange::Remount),
            other => Err(format!("unknown preset change policy '{other}'")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    pub initial_preset: Preset,
    pub preset_change: PresetChange,
    pub lang: String,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            initial_preset: Preset::Daylight,
            preset_change: PresetChange::InPlace,
            lang: "en".to_string(),
        }
    }
}

impl ViewerConfig {
    pub fn resolve() -> Self {
        Self::resolve_from(std::env::args().skip(1), |key| std::env::var(key).ok())
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&text).map_err(|source| ConfigError::Json {
            path: path.to_path_buf(),
            source,
        })
    }

    fn resolve_from(
        args: impl IntoIterator<Item = String>,
        env: impl Fn(&str) -> Option<String>,
    ) -> Self {
        let mut cli: Vec<(String, String)> = Vec::new();
        let mut it = args.into_iter();
        while let Some(a) = it.next() {
            if let Some(key) = a.strip_prefix("--") {
                if let Some(v) = it.next() {
                    cli.push((key.to_string(), v));
                }
            }
        }
        let cli_value = |key: &str| {
            cli.iter()
                .rev()
                .find(|(k, _)| k == key)
                .map(|(_, v)| v.clone())
        };

        let file = cli_value("config")
            .or_else(|| env("VIEWER_CONFIG"))
            .filter(|p| !p.trim().is_empty())
            .map(PathBuf::from);
        let mut config = match file {
            Some(path) => Self::from_file(&path).unwrap_or_else(|e| {
                log::warn!("{e}; using defaults");
                Self::default()
            }),
            None => Self::default(),
        };

        let layers = [
            (env("VIEWER_PRESET"), env("VIEWER_PRESET_CHANGE"), env("VIEWER_LANG")),
            (cli_value("preset"), cli_value("preset-change"), cli_value("lang")),
        ];
        for (preset, change, lang) in layers {
            config.override_with(preset, change, lang);
        }
        config
    }

    /// Unknown names are ignored; the previous value stays in force.
    fn override_with(&mut self, preset: Option<String>, change: Option<String>, lang: Option<String>) {
        if let Some(p) = preset {
            match p.parse::<Preset>() {
                Ok(p) => self.initial_preset = p,
                Err(e) => log::warn!("{e}; keeping {}", self.initial_preset),
            }
        }
        if let Some(c) = change {
            match c.parse::<PresetChange>() {
                Ok(c) => self.preset_change = c,
                Err(e) => log::warn!("{e}; keeping {:?}", self.preset_change),
            }
        }
        if let Some(l) = lang.filter(|l| !l.trim().is_empty()) {
            self.lang = l;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    fn resolve(cli: &[&str], env: &[(&str, &str)]) -> ViewerConfig {
        let env: HashMap<String, String> =
            env.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        ViewerConfig::resolve_from(args(cli), |k| env.get(k).cloned())
    }

    #[test]
    fn defaults() {
        let config = resolve(&[], &[]);
        assert_eq!(config, ViewerConfig::default());
        assert_eq!(config.initial_preset, Preset::Daylight);
        assert_eq!(config.preset_change, PresetChange::InPlace);
    }

    #[test]
    fn cli_beats_env() {
        let config = resolve(
            &["--preset", "dramatic", "--lang", "fr"],
            &[("VIEWER_PRESET", "studio"), ("VIEWER_PRESET_CHANGE", "remount")],
        );
        assert_eq!(config.initial_preset, Preset::Dramatic);
        assert_eq!(config.preset_change, PresetChange::Remount);
        assert_eq!(config.lang, "fr");
    }

    #[test]
    fn unknown_values_are_ignored() {
        let config = resolve(
            &["--preset", "neon", "--preset-change", "sometimes"],
            &[("VIEWER_PRESET", "studio")],
        );
        assert_eq!(config.initial_preset, Preset::Studio);
        assert_eq!(config.preset_change, PresetChange::InPlace);
    }

    #[test]
    fn file_layer_sits_under_env_and_cli() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("viewer.json");
        std::fs::write(
            &path,
            r#"{ "initial_preset": "studio", "preset_change": "remount", "lang": "ja" }"#,
        )
        .unwrap();
        let path = path.to_string_lossy().to_string();

        let config = resolve(&["--config", &path], &[]);
        assert_eq!(config.initial_preset, Preset::Studio);
        assert_eq!(config.preset_change, PresetChange::Remount);
        assert_eq!(config.lang, "ja");

        let config = resolve(&["--preset", "daylight"], &[("VIEWER_CONFIG", &path)]);
        assert_eq!(config.initial_preset, Preset::Daylight);
        assert_eq!(config.preset_change, PresetChange::Remount);
    }

    #[test]
    fn partial_file_keeps_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("viewer.json");
        std::fs::write(&path, r#"{ "preset_change": "remount" }"#).unwrap();

        let config = ViewerConfig::from_file(&path).unwrap();
        assert_eq!(config.initial_preset, Preset::Daylight);
        assert_eq!(config.lang, "en");
    }

    #[test]
    fn bad_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("viewer.json");
        std::fs::write(&path, "{ not json").unwrap();

        assert!(matches!(
            ViewerConfig::from_file(&path),
            Err(ConfigError::Json { .. })
        ));
        let path = path.to_string_lossy().to_string();
        assert_eq!(resolve(&["--config", &path], &[]), ViewerConfig::default());
    }
}
