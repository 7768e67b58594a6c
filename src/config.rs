use crate::knowledge::KnowledgeBase;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main configuration structure loaded from prompt_forge.toml and environment variables
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub defaults: DefaultsConfig,
    pub knowledge: KnowledgeConfig,
    pub library: LibraryConfig,
    /// Runtime configuration loaded from environment variables
    #[serde(skip)]
    pub runtime: RuntimeConfig,
}

/// Selections used when the caller does not name a tool or framework
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DefaultsConfig {
    pub tool: String,
    pub framework: String,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            tool: "claude_chat".to_string(),
            framework: "CRISPE".to_string(),
        }
    }
}

/// Catalog source. `None` uses the bundled catalog.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct KnowledgeConfig {
    pub path: Option<PathBuf>,
}

/// Optimization history log location
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LibraryConfig {
    pub path: PathBuf,
}

impl Default for LibraryConfig {
    fn default() -> Self {
        let base = dirs::data_dir().unwrap_or_else(|| PathBuf::from("."));
        Self {
            path: base.join("prompt-forge").join("library.jsonl"),
        }
    }
}

/// Runtime configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub log_level: String,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            log_level: "prompt_forge=info".to_string(),
        }
    }
}

impl RuntimeConfig {
    pub fn load_from_env() -> Self {
        let mut config = Self::default();
        if let Ok(level) = std::env::var("RUST_LOG")
            && !level.trim().is_empty()
        {
            config.log_level = level;
        }
        config
    }
}

impl Config {
    /// Load configuration from TOML file and environment variables
    /// Uses PROMPT_FORGE_CONFIG environment variable or defaults to "prompt_forge.toml"
    pub fn load() -> anyhow::Result<Self> {
        let _ = dotenvy::dotenv();

        let config_path = std::env::var("PROMPT_FORGE_CONFIG")
            .unwrap_or_else(|_| "prompt_forge.toml".to_string());

        let mut config = match std::fs::read_to_string(&config_path) {
            Ok(content) => Self::from_toml_str(&content)?,
            Err(_) => {
                tracing::warn!("Config file {} not found, using defaults", config_path);
                Self::default()
            }
        };

        config.apply_overrides(|key| std::env::var(key).ok());
        config.runtime = RuntimeConfig::load_from_env();
        config.validate()?;
        Ok(config)
    }

    pub fn from_toml_str(content: &str) -> anyhow::Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Apply env-style overrides through `lookup`.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(tool) = lookup("PF_DEFAULT_TOOL") {
            tracing::debug!("PF_DEFAULT_TOOL env override applied");
            self.defaults.tool = tool;
        }
        if let Some(framework) = lookup("PF_DEFAULT_FRAMEWORK") {
            tracing::debug!("PF_DEFAULT_FRAMEWORK env override applied");
            self.defaults.framework = framework;
        }
        if let Some(path) = lookup("PF_KB_PATH") {
            tracing::debug!("PF_KB_PATH env override applied");
            self.knowledge.path = Some(PathBuf::from(path));
        }
        if let Some(path) = lookup("PF_LIBRARY_PATH") {
            tracing::debug!("PF_LIBRARY_PATH env override applied");
            self.library.path = PathBuf::from(path);
        }
    }

    /// The configured catalog, or the bundled one.
    pub fn knowledge_base(&self) -> crate::error::Result<KnowledgeBase> {
        match &self.knowledge.path {
            Some(path) => KnowledgeBase::from_path(path),
            None => Ok(KnowledgeBase::builtin()),
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.defaults.tool.trim().is_empty() {
            anyhow::bail!("defaults.tool must not be empty");
        }
        if self.defaults.framework.trim().is_empty() {
            anyhow::bail!("defaults.framework must not be empty");
        }
        if self.library.path.as_os_str().is_empty() {
            anyhow::bail!("library.path must not be empty");
        }
        Ok(())
    }
}
