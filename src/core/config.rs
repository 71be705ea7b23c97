//! Configuration management

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::core::models::Engine;

/// Directory under the user's home holding the config file
const CONFIG_DIR: &str = ".simple_translate";
const CONFIG_FILE: &str = "config.json";

/// Credentials and endpoint for one provider
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ServiceConfig {
    pub secret_id: String,
    pub secret_key: String,
    pub region: String,
    /// Full base URL replacing the provider's public endpoint
    #[serde(skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,
}

impl ServiceConfig {
    pub fn has_credentials(&self) -> bool {
        !self.secret_id.trim().is_empty() && !self.secret_key.trim().is_empty()
    }

    fn redacted(&self) -> Self {
        Self {
            secret_id: mask(&self.secret_id),
            secret_key: mask(&self.secret_key),
            ..self.clone()
        }
    }

    /// Put back secrets that arrive still masked
    fn unmask_from(&mut self, current: &ServiceConfig) {
        if !current.secret_id.is_empty() && self.secret_id == mask(&current.secret_id) {
            self.secret_id = current.secret_id.clone();
        }
        if !current.secret_key.is_empty() && self.secret_key == mask(&current.secret_key) {
            self.secret_key = current.secret_key.clone();
        }
    }
}

/// Persisted configuration document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CloudConfig {
    pub tencent: ServiceConfig,
    pub aliyun: ServiceConfig,
    /// `tencent` or `aliyun`
    pub default_engine: String,
    pub compare_mode: bool,
    pub compare_engines: Vec<String>,
    pub pick_best: bool,
    /// Provider request timeout
    pub timeout_ms: u64,
}

impl Default for CloudConfig {
    fn default() -> Self {
        Self {
            tencent: ServiceConfig::default(),
            aliyun: ServiceConfig::default(),
            default_engine: Engine::Tencent.to_string(),
            compare_mode: false,
            compare_engines: vec![],
            pick_best: false,
            timeout_ms: 30000,
        }
    }
}

impl CloudConfig {
    /// `~/.simple_translate/config.json`
    pub fn default_path() -> anyhow::Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| anyhow::anyhow!("Cannot determine home directory"))?;
        Ok(home.join(CONFIG_DIR).join(CONFIG_FILE))
    }

    /// Load from a JSON file; a missing file yields the default document
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            info!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Invalid config {}: {}", path.display(), e))?;
        Ok(config)
    }

    /// Save to a JSON file, creating its directory
    pub fn save<P: AsRef<Path>>(&self, path: P) -> anyhow::Result<()> {
        let path = path.as_ref();
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        info!("Config saved to {}", path.display());
        Ok(())
    }

    /// Override credentials from environment variables
    pub fn apply_env_overrides(&mut self) {
        let vars = [
            ("TENCENT_SECRET_ID", &mut self.tencent.secret_id),
            ("TENCENT_SECRET_KEY", &mut self.tencent.secret_key),
            ("TENCENT_REGION", &mut self.tencent.region),
            ("ALIYUN_ACCESS_KEY_ID", &mut self.aliyun.secret_id),
            ("ALIYUN_ACCESS_KEY_SECRET", &mut self.aliyun.secret_key),
            ("ALIYUN_REGION", &mut self.aliyun.region),
        ];

        for (name, field) in vars {
            if let Ok(value) = std::env::var(name) {
                if !value.is_empty() {
                    *field = value;
                }
            }
        }
    }

    /// Parsed `defaultEngine`, falling back to Tencent
    pub fn default_engine(&self) -> Engine {
        self.default_engine.parse().unwrap_or_else(|_| {
            if !self.default_engine.is_empty() {
                warn!("Unknown default engine '{}', using tencent", self.default_engine);
            }
            Engine::Tencent
        })
    }

    pub fn service(&self, engine: Engine) -> &ServiceConfig {
        match engine {
            Engine::Tencent => &self.tencent,
            Engine::Aliyun => &self.aliyun,
        }
    }

    /// Copy with secrets masked, for display
    pub fn redacted(&self) -> Self {
        Self {
            tencent: self.tencent.redacted(),
            aliyun: self.aliyun.redacted(),
            ..self.clone()
        }
    }

    /// Restore secrets from `current` where this document carries their masked form
    pub fn unmask_from(&mut self, current: &CloudConfig) {
        self.tencent.unmask_from(&current.tencent);
        self.aliyun.unmask_from(&current.aliyun);
    }

    /// Warn about engines that cannot be used
    pub fn validate(&self) {
        for engine in Engine::ALL {
            if !self.service(engine).has_credentials() {
                warn!("No credentials configured for {}", engine);
            }
        }
    }
}

fn mask(secret: &str) -> String {
    let len = secret.chars().count();
    if len <= 4 {
        return "*".repeat(len);
    }
    let visible: String = secret.chars().take(4).collect();
    format!("{}****", visible)
}
