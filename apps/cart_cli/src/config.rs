use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::Context;
use serde::Deserialize;
use shared::domain::ProductDescriptor;

pub const SETTINGS_FILE: &str = "cart.toml";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub database_url: String,
    pub popup_ms: u64,
    pub catalog_path: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            database_url: "sqlite://./data/cart.db".into(),
            popup_ms: 2500,
            catalog_path: None,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct FileSettings {
    database_url: Option<String>,
    popup_ms: Option<u64>,
    catalog_path: Option<PathBuf>,
}

pub fn load_settings() -> Settings {
    load_settings_from(Path::new(SETTINGS_FILE), |key| std::env::var(key).ok())
}

/// Defaults, then the settings file if it parses, then environment
/// overrides. Later sources win.
pub fn load_settings_from(path: &Path, env: impl Fn(&str) -> Option<String>) -> Settings {
    let mut settings = Settings::default();

    if let Ok(raw) = fs::read_to_string(path) {
        match toml::from_str::<FileSettings>(&raw) {
            Ok(file_cfg) => {
                if let Some(v) = file_cfg.database_url {
                    settings.database_url = v;
                }
                if let Some(v) = file_cfg.popup_ms {
                    settings.popup_ms = v;
                }
                if let Some(v) = file_cfg.catalog_path {
                    settings.catalog_path = Some(v);
                }
            }
            Err(err) => {
                tracing::warn!(path = %path.display(), error = %err, "ignoring unreadable settings file");
            }
        }
    }

    if let Some(v) = env("CART_DATABASE_URL") {
        settings.database_url = v;
    }
    if let Some(v) = env("APP__DATABASE_URL") {
        settings.database_url = v;
    }

    if let Some(v) = env("APP__POPUP_MS") {
        if let Ok(parsed) = v.parse::<u64>() {
            settings.popup_ms = parsed;
        }
    }

    if let Some(v) = env("APP__CATALOG_PATH") {
        settings.catalog_path = Some(PathBuf::from(v));
    }

    settings
}

pub fn normalize_database_url(raw_database_url: &str) -> String {
    let raw_database_url = raw_database_url.trim();

    if raw_database_url.is_empty() {
        return Settings::default().database_url;
    }

    if raw_database_url.eq_ignore_ascii_case("memory") {
        return "sqlite::memory:".into();
    }

    if raw_database_url.starts_with("sqlite::memory:")
        || raw_database_url.starts_with("sqlite://")
        || raw_database_url.contains("://")
    {
        return raw_database_url.to_string();
    }

    if let Some(path) = raw_database_url.strip_prefix("sqlite:") {
        let path = path.replace('\\', "/");
        return format!("sqlite://{path}");
    }

    format!("sqlite://{}", raw_database_url.replace('\\', "/"))
}

/// Reads a JSON array of product cards.
pub fn load_catalog(path: &Path) -> anyhow::Result<Vec<ProductDescriptor>> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read catalog '{}'", path.display()))?;
    serde_json::from_str(&raw)
        .with_context(|| format!("catalog '{}' is not a JSON list of products", path.display()))
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn env_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn normalizes_plain_file_path_to_sqlite_url() {
        assert_eq!(
            normalize_database_url("./data/test.db"),
            "sqlite://./data/test.db"
        );
        assert_eq!(normalize_database_url("sqlite:cart.db"), "sqlite://cart.db");
        assert_eq!(normalize_database_url("memory"), "sqlite::memory:");
        assert_eq!(normalize_database_url("  "), "sqlite://./data/cart.db");
    }

    #[test]
    fn defaults_apply_without_file_or_env() {
        let dir = tempfile::tempdir().expect("tempdir");
        let settings = load_settings_from(&dir.path().join("missing.toml"), env_from(&[]));
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn file_values_are_overridden_by_env() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("cart.toml");
        fs::write(
            &path,
            "database_url = \"sqlite://./shop.db\"\npopup_ms = 1000\ncatalog_path = \"products.json\"\n",
        )
        .expect("write settings");

        let from_file = load_settings_from(&path, env_from(&[]));
        assert_eq!(from_file.database_url, "sqlite://./shop.db");
        assert_eq!(from_file.popup_ms, 1000);
        assert_eq!(from_file.catalog_path, Some(PathBuf::from("products.json")));

        let overridden = load_settings_from(
            &path,
            env_from(&[
                ("CART_DATABASE_URL", "sqlite://./a.db"),
                ("APP__DATABASE_URL", "sqlite://./b.db"),
                ("APP__POPUP_MS", "not-a-number"),
            ]),
        );
        assert_eq!(overridden.database_url, "sqlite://./b.db");
        assert_eq!(overridden.popup_ms, 1000);
    }

    #[test]
    fn malformed_settings_file_is_ignored() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("cart.toml");
        fs::write(&path, "popup_ms = \"soon\"").expect("write settings");
        assert_eq!(load_settings_from(&path, env_from(&[])), Settings::default());
    }

    #[test]
    fn loads_catalog_of_product_cards() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("products.json");
        fs::write(
            &path,
            r#"[{"name":"Brass Lamp","original_price":1200},{"name":"Jute Rug","discounted_price":799,"original_price":999,"image":"images/rug.jpg"}]"#,
        )
        .expect("write catalog");

        let catalog = load_catalog(&path).expect("catalog");
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog[1].to_product().price, Some(799.0));
        assert!(load_catalog(&dir.path().join("none.json")).is_err());
    }
}
