//! Configuration system for Scribe.
//!
//! Uses `figment` for layered configuration: defaults -> config file -> environment -> overrides.
//! Configuration is loaded from `~/.config/scribe/config.toml` and/or `.scribe/config.toml`
//! in the workspace directory.

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ScribeConfig {
    pub vision: VisionConfig,
    pub storage: StorageConfig,
    pub export: ExportConfig,
}

/// Vision model (OpenAI-compatible chat completions) configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VisionConfig {
    /// Base URL of the chat completions API.
    pub base_url: String,
    /// Model identifier.
    pub model: String,
    /// Environment variable name containing the API key.
    pub api_key_env: String,
    /// Sampling temperature.
    pub temperature: f32,
    /// Maximum tokens in the model reply.
    pub max_tokens: u32,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
    /// Confidence recorded when the model does not report one.
    pub default_confidence: f64,
}

impl Default for VisionConfig {
    fn default() -> Self {
        Self {
            base_url: "https://ark.cn-beijing.volces.com/api/v3".to_string(),
            model: "doubao-seed-1-6-flash-250715".to_string(),
            api_key_env: "DOUBAO_API_KEY".to_string(),
            temperature: 0.3,
            max_tokens: 4096,
            timeout_secs: 60,
            default_confidence: 0.85,
        }
    }
}

/// Local artifact storage configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Directory exported artifacts are written to.
    pub root: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("exports"),
        }
    }
}

/// Export defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Format used when none is given on the command line.
    pub default_format: String,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            default_format: "markdown".to_string(),
        }
    }
}

fn user_config_path() -> Option<PathBuf> {
    directories::ProjectDirs::from("dev", "scribe", "scribe")
        .map(|dirs| dirs.config_dir().join("config.toml"))
}

/// Load configuration with layered merging.
///
/// Priority (highest wins):
/// 1. Explicit overrides (passed as argument)
/// 2. Environment variables (prefixed with `SCRIBE_`)
/// 3. Workspace-local config (`.scribe/config.toml`)
/// 4. User config (`~/.config/scribe/config.toml`)
/// 5. Built-in defaults
pub fn load_config(
    workspace: Option<&Path>,
    overrides: Option<&ScribeConfig>,
) -> Result<ScribeConfig, Box<figment::Error>> {
    let mut figment = Figment::from(Serialized::defaults(ScribeConfig::default()));

    if let Some(user_config) = user_config_path()
        && user_config.exists()
    {
        figment = figment.merge(Toml::file(&user_config));
    }

    if let Some(ws) = workspace {
        let ws_config = ws.join(".scribe").join("config.toml");
        if ws_config.exists() {
            figment = figment.merge(Toml::file(&ws_config));
        }
    }

    // SCRIBE_VISION__MODEL, SCRIBE_STORAGE__ROOT, ...
    figment = figment.merge(Env::prefixed("SCRIBE_").split("__"));

    if let Some(overrides) = overrides {
        figment = figment.merge(Serialized::defaults(overrides));
    }

    figment.extract().map_err(Box::new)
}

/// Whether a user-level or workspace-level config file exists.
pub fn config_exists(workspace: Option<&Path>) -> bool {
    if user_config_path().is_some_and(|p| p.exists()) {
        return true;
    }
    workspace.is_some_and(|ws| ws.join(".scribe").join("config.toml").exists())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ScribeConfig::default();
        assert_eq!(config.vision.model, "doubao-seed-1-6-flash-250715");
        assert_eq!(config.vision.api_key_env, "DOUBAO_API_KEY");
        assert_eq!(config.vision.timeout_secs, 60);
        assert_eq!(config.vision.max_tokens, 4096);
        assert_eq!(config.export.default_format, "markdown");
    }

    #[test]
    fn test_config_serialization_roundtrip() {
        let config = ScribeConfig::default();
        let toml_str = toml::to_string(&config).unwrap();
        let back: ScribeConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(back.vision.base_url, config.vision.base_url);
        assert_eq!(back.storage.root, config.storage.root);
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let back: ScribeConfig = toml::from_str("[vision]\nmodel = \"gpt-4o\"\n").unwrap();
        assert_eq!(back.vision.model, "gpt-4o");
        assert_eq!(back.vision.timeout_secs, 60);
    }

    #[test]
    fn test_workspace_config_layer() {
        let dir = tempfile::tempdir().unwrap();
        let cfg_dir = dir.path().join(".scribe");
        std::fs::create_dir_all(&cfg_dir).unwrap();
        std::fs::write(
            cfg_dir.join("config.toml"),
            "[vision]\ntimeout_secs = 15\n[storage]\nroot = \"out\"\n",
        )
        .unwrap();

        let config = load_config(Some(dir.path()), None).unwrap();
        assert_eq!(config.vision.timeout_secs, 15);
        assert_eq!(config.storage.root, PathBuf::from("out"));
        assert!(config_exists(Some(dir.path())));
    }

    #[test]
    fn test_overrides_win() {
        let mut overrides = ScribeConfig::default();
        overrides.export.default_format = "confluence".into();
        let config = load_config(None, Some(&overrides)).unwrap();
        assert_eq!(config.export.default_format, "confluence");
    }
}
