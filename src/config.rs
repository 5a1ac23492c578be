use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub site: SiteConfig,
    #[serde(default)]
    pub credentials: CredentialsConfig,
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub report: ReportConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteConfig {
    #[serde(default = "default_site_url")]
    pub url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CredentialsConfig {
    #[serde(default = "default_credentials_path")]
    pub path: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    #[serde(default = "default_dimension")]
    pub dimension: String,
}

#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub site_url: Option<String>,
    pub credentials_path: Option<String>,
}

impl Config {
    pub fn default_path() -> PathBuf {
        let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
        home.join(".config/gsc-top-pages/config.toml")
    }

    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = path
            .map(|p| p.to_path_buf())
            .unwrap_or_else(Self::default_path);
        if !path.exists() {
            return Ok(Self::default());
        }
        let data = fs::read_to_string(&path)
            .with_context(|| format!("failed reading config: {}", path.display()))?;
        Self::from_toml(&data)
            .with_context(|| format!("failed parsing TOML config: {}", path.display()))
    }

    pub fn from_toml(data: &str) -> Result<Self> {
        Ok(toml::from_str(data)?)
    }

    pub fn apply_overrides(&mut self, overrides: ConfigOverrides) {
        if let Some(site_url) = overrides.site_url {
            self.site.url = site_url;
        }
        if let Some(path) = overrides.credentials_path {
            self.credentials.path = path;
        }
    }

    pub fn write_template(path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("failed creating config directory: {}", parent.display())
            })?;
        }
        fs::write(path, Self::default_template())
            .with_context(|| format!("failed writing config template: {}", path.display()))
    }

    pub fn resolved_credentials_path(&self) -> PathBuf {
        expand_tilde(&self.credentials.path)
    }

    pub fn default_template() -> String {
        let template = r#"[site]
url = "https://www.example.com/"

[credentials]
path = "~/.config/gsc-top-pages/service-account.json"

[api]
base_url = "https://www.googleapis.com/webmasters/v3"
timeout_secs = 30
connect_timeout_secs = 10

[report]
dimension = "page"
"#;
        template.to_string()
    }
}

pub fn expand_tilde(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(stripped);
        }
    }
    PathBuf::from(path)
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            url: default_site_url(),
        }
    }
}

impl Default for CredentialsConfig {
    fn default() -> Self {
        Self {
            path: default_credentials_path(),
        }
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_secs: default_timeout_secs(),
            connect_timeout_secs: default_connect_timeout_secs(),
        }
    }
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            dimension: default_dimension(),
        }
    }
}

fn default_site_url() -> String {
    "https://www.example.com/".to_string()
}

fn default_credentials_path() -> String {
    "~/.config/gsc-top-pages/service-account.json".to_string()
}

fn default_base_url() -> String {
    "https://www.googleapis.com/webmasters/v3".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_connect_timeout_secs() -> u64 {
    10
}

fn default_dimension() -> String {
    crate::search_console::DEFAULT_DIMENSION.to_string()
}
