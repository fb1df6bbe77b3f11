// Add-on catalog records, in the marketplace API's JSON shape

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Application family an add-on build targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClientApp {
    Firefox,
    Android,
}

impl ClientApp {
    pub fn as_str(&self) -> &'static str {
        match self {
            ClientApp::Firefox => "firefox",
            ClientApp::Android => "android",
        }
    }
}

impl fmt::Display for ClientApp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ClientApp {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "firefox" => Ok(ClientApp::Firefox),
            "android" => Ok(ClientApp::Android),
            other => anyhow::bail!(
                "Unsupported client app: '{}'. Supported client apps: firefox, android",
                other
            ),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AddonType {
    #[default]
    Extension,
    #[serde(rename = "statictheme")]
    StaticTheme,
    Dictionary,
    Language,
    #[serde(other)]
    Other,
}

/// Platform a file was built for
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    /// Platform-agnostic wildcard
    #[default]
    All,
    Android,
    Linux,
    Mac,
    Windows,
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PromotedCategory {
    Line,
    Recommended,
    Sponsored,
    Spotlight,
    Strategic,
    Verified,
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Promoted {
    pub category: PromotedCategory,
    #[serde(default)]
    pub apps: Vec<ClientApp>,
}

/// Declared version bounds for one client app
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionRange {
    #[serde(default)]
    pub min: Option<String>,
    #[serde(default)]
    pub max: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddonFile {
    #[serde(default)]
    pub platform: Platform,

    /// Download URL
    #[serde(default)]
    pub url: String,

    /// Format: "algorithm:hash" (e.g., "sha256:abc123...")
    #[serde(default)]
    pub hash: Option<String>,

    #[serde(default)]
    pub is_webextension: bool,
    #[serde(default)]
    pub is_mozilla_signed_extension: bool,
    #[serde(default)]
    pub is_restart_required: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Version {
    #[serde(default)]
    pub version: String,

    #[serde(default)]
    pub files: Vec<AddonFile>,

    /// Keyed by client app name. Keys for apps this crate does not know are kept but never read.
    #[serde(default)]
    pub compatibility: BTreeMap<String, VersionRange>,

    #[serde(default)]
    pub is_strict_compatibility_enabled: bool,
}

impl Version {
    pub fn compatibility_for(&self, client_app: ClientApp) -> Option<&VersionRange> {
        self.compatibility.get(client_app.as_str())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Addon {
    #[serde(default)]
    pub guid: String,

    #[serde(default)]
    pub slug: Option<String>,

    /// Plain string or a localized map; only the plain form is displayed
    #[serde(default)]
    pub name: Option<serde_json::Value>,

    #[serde(rename = "type", default)]
    pub addon_type: AddonType,

    #[serde(default)]
    pub promoted: Option<Promoted>,

    #[serde(default)]
    pub current_version: Option<Version>,
}

impl Addon {
    pub fn is_extension(&self) -> bool {
        self.addon_type == AddonType::Extension
    }

    /// Best human label: the name (or its `en-US` translation), then slug, then guid.
    pub fn display_name(&self) -> String {
        let name = match &self.name {
            Some(serde_json::Value::String(name)) => Some(name.clone()),
            Some(serde_json::Value::Object(map)) => map
                .get("en-US")
                .or_else(|| map.values().next())
                .and_then(|v| v.as_str())
                .map(String::from),
            _ => None,
        };

        name.or_else(|| self.slug.clone())
            .unwrap_or_else(|| self.guid.clone())
    }
}
