// i18n.rs
//
// UI strings with optional per-language overrides:
// - Strings live in either:
//   A) assets/i18n/<lang>.json
//   B) assets/i18n.json (single file, format: { "<lang>": { "key": "value" } })
// - Lookup order: selected lang -> built-in English -> the key itself

use once_cell::sync::OnceCell;
use std::{
    collections::HashMap,
    path::{Path, PathBuf},
    sync::RwLock,
};

const BUILTIN: &[(&str, &str)] = &[("app.title", "Model Viewer")];

#[derive(Debug)]
struct I18n {
    map: HashMap<String, String>,
}

static I18N: OnceCell<RwLock<I18n>> = OnceCell::new();

fn load_json_map(path: &Path) -> Option<HashMap<String, String>> {
    let text = std::fs::read_to_string(path).ok()?;
    serde_json::from_str(&text).ok()
}

fn load_multi_lang_json(path: &Path, lang: &str) -> Option<HashMap<String, String>> {
    let text = std::fs::read_to_string(path).ok()?;
    let mut all: HashMap<String, HashMap<String, String>> = serde_json::from_str(&text).ok()?;
    all.remove(lang)
}

/// `<exe_dir>/assets/<rel>` first, then `./assets/<rel>`.
fn find_asset(rel: &Path) -> Option<PathBuf> {
    let mut roots = Vec::new();
    if let Ok(exe) = std::env::current_exe() {
        if let Some(dir) = exe.parent() {
            roots.push(dir.join("assets"));
        }
    }
    roots.push(PathBuf::from("assets"));
    roots.into_iter().map(|r| r.join(rel)).find(|p| p.exists())
}

fn load_lang(lang: &str) -> HashMap<String, String> {
    let per_lang = find_asset(&Path::new("i18n").join(format!("{lang}.json")));
    if let Some(m) = per_lang.as_deref().and_then(load_json_map) {
        return m;
    }
    find_asset(Path::new("i18n.json"))
        .as_deref()
        .and_then(|p| load_multi_lang_json(p, lang))
        .unwrap_or_default()
}

/// Initialize global strings. Later calls replace the current table.
pub fn init(lang: &str) {
    install(load_lang(lang));
    log::debug!("ui language: {lang}");
}

fn install(map: HashMap<String, String>) {
    let i = I18n { map };
    if let Some(lock) = I18N.get() {
        if let Ok(mut w) = lock.write() {
            *w = i;
        }
    } else {
        let _ = I18N.set(RwLock::new(i));
    }
}

/// Localized text by key. Missing keys fall back to English, then to the key.
pub fn tr(key: &str) -> String {
    let english = BUILTIN
        .iter()
        .find(|(k, _)| *k == key)
        .map_or(key, |(_, v)| *v);
    tr_or(key, english)
}

/// Localized text by key, or `default` when no table has it.
pub fn tr_or(key: &str, default: &str) -> String {
    if let Some(i) = I18N.get().and_then(|l| l.read().ok()) {
        if let Some(v) = i.map.get(key) {
            return v.clone();
        }
    }
    default.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_fallback() {
        assert_eq!(tr("app.title"), "Model Viewer");
        assert_eq!(tr("no.such.key"), "no.such.key");
        assert_eq!(tr_or("no.such.key", "Studio"), "Studio");
    }

    #[test]
    fn per_language_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fr.json");
        std::fs::write(&path, r#"{ "preset.daylight": "Jour" }"#).unwrap();
        let map = load_json_map(&path).unwrap();
        assert_eq!(map.get("preset.daylight").map(String::as_str), Some("Jour"));
    }

    #[test]
    fn multi_language_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("i18n.json");
        std::fs::write(
            &path,
            r#"{ "de": { "preset.studio": "Atelier" }, "es": { "preset.studio": "Estudio" } }"#,
        )
        .unwrap();
        let map = load_multi_lang_json(&path, "es").unwrap();
        assert_eq!(map.get("preset.studio").map(String::as_str), Some("Estudio"));
        assert!(load_multi_lang_json(&path, "ko").is_none());
    }
}
