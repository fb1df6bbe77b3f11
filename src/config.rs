// Config module for the settings file and its directory

use crate::compat::ClientApp;
use crate::constants;
use serde::{Deserialize, Serialize};
use std::path::Path;

pub fn config_dir() -> String {
    std::env::var(constants::CONFIG_DIR_ENV).unwrap_or_else(|_| ".".to_string())
}

pub fn settings_path() -> String {
    let dir = config_dir();
    if dir == "." {
        constants::SETTINGS_FILE.to_string()
    } else {
        format!("{}/{}", dir, constants::SETTINGS_FILE)
    }
}

/// Download directory for `fetch`, relative to the config directory
pub fn download_dir() -> String {
    format!("{}/{}", config_dir(), constants::DEFAULT_DOWNLOAD_DIR)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default = "default_client_app")]
    pub client_app: String,

    #[serde(default = "default_lang")]
    pub lang: String,

    #[serde(default = "default_api_base")]
    pub api_base: String,

    /// Appended as `src=` to install URLs
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub install_source: Option<String>,

    #[serde(default = "default_show_pages")]
    pub show_pages: u32,
}

fn default_client_app() -> String {
    constants::DEFAULT_CLIENT_APP.to_string()
}

fn default_lang() -> String {
    constants::DEFAULT_LANG.to_string()
}

fn default_api_base() -> String {
    constants::DEFAULT_API_BASE.to_string()
}

fn default_show_pages() -> u32 {
    constants::DEFAULT_SHOW_PAGES
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            client_app: default_client_app(),
            lang: default_lang(),
            api_base: default_api_base(),
            install_source: None,
            show_pages: default_show_pages(),
        }
    }
}

impl Settings {
    pub fn exists() -> bool {
        Path::new(&settings_path()).exists()
    }

    pub fn load() -> anyhow::Result<Self> {
        let path = settings_path();
        let text = std::fs::read_to_string(&path)?;
        Self::parse(&text).map_err(|e| anyhow::anyhow!("Invalid {}: {}", path, e))
    }

    /// Settings from disk, or defaults when no settings file exists yet
    pub fn load_or_default() -> anyhow::Result<Self> {
        if Self::exists() {
            Self::load()
        } else {
            log::debug!("No {} found, using defaults", settings_path());
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> anyhow::Result<()> {
        std::fs::create_dir_all(config_dir())?;
        let text = toml::to_string_pretty(self)?;
        std::fs::write(settings_path(), text)?;
        Ok(())
    }

    fn parse(text: &str) -> anyhow::Result<Self> {
        let settings: Settings = toml::from_str(text)?;
        // Reject unknown client apps at load time rather than on first use
        settings.client_app()?;
        Ok(settings)
    }

    pub fn client_app(&self) -> anyhow::Result<ClientApp> {
        self.client_app.parse()
    }
}
