// Add-on package (.xpi) source implementation

use crate::compat::model::{AddonFile, AddonType, Platform, Version, VersionRange};
use crate::compat::{Addon, ClientApp};
use crate::sources::hash::{HashAlgorithm, compute_hash};
use crate::sources::source_trait::AddonSource;
use async_trait::async_trait;
use log::debug;
use regex::Regex;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::io::{Cursor, Read};
use std::path::Path;

/// Minimum the catalog assigns to WebExtensions that declare none
const DEFAULT_WEBEXTENSION_MIN_VERSION: &str = "48.0";
const FIREFOX_APP_GUID: &str = "{ec8030f7-c20a-464f-9b0e-13a3a9e97384}";
const ANDROID_APP_GUID: &str = "{aa3c5121-dab2-40e2-81ca-7ea25febc110}";

/// One `em:` property of an install manifest, written either as a child
/// element (`<em:id>x</em:id>`) or as an attribute (`em:id="x"`)
struct RdfProperty {
    element: Regex,
    attribute: Regex,
}

impl RdfProperty {
    fn new(name: &str) -> Self {
        Self {
            element: Regex::new(&format!(r"<em:{name}>\s*([^<]*?)\s*</em:{name}>")).unwrap(),
            attribute: Regex::new(&format!(r#"\bem:{name}\s*=\s*(?:"([^"]*)"|'([^']*)')"#))
                .unwrap(),
        }
    }

    fn find(&self, text: &str) -> Option<String> {
        self.element
            .captures(text)
            .or_else(|| self.attribute.captures(text))
            .and_then(|caps| caps.iter().skip(1).flatten().next())
            .map(|m| m.as_str().trim().to_string())
    }
}

lazy_static::lazy_static! {
    static ref RDF_TARGET: Regex =
        Regex::new(r"(?s)<em:targetApplication>(.*?)</em:targetApplication>").unwrap();
    static ref RDF_ID: RdfProperty = RdfProperty::new("id");
    static ref RDF_VERSION: RdfProperty = RdfProperty::new("version");
    static ref RDF_MIN: RdfProperty = RdfProperty::new("minVersion");
    static ref RDF_MAX: RdfProperty = RdfProperty::new("maxVersion");
    static ref RDF_BOOTSTRAP: RdfProperty = RdfProperty::new("bootstrap");
}

#[derive(Debug, Default, Deserialize)]
struct WebExtensionManifest {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    version: Option<String>,
    #[serde(default)]
    browser_specific_settings: Option<BrowserSettings>,
    /// Older spelling of `browser_specific_settings`
    #[serde(default)]
    applications: Option<BrowserSettings>,
    #[serde(default)]
    theme: Option<serde_json::Value>,
    #[serde(default)]
    dictionaries: Option<serde_json::Value>,
    #[serde(default)]
    langpack_id: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct BrowserSettings {
    #[serde(default)]
    gecko: Option<GeckoSettings>,
    #[serde(default)]
    gecko_android: Option<GeckoSettings>,
}

#[derive(Debug, Default, Deserialize)]
struct GeckoSettings {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    strict_min_version: Option<String>,
    #[serde(default)]
    strict_max_version: Option<String>,
}

impl WebExtensionManifest {
    fn settings(&self) -> Option<&BrowserSettings> {
        self.browser_specific_settings
            .as_ref()
            .or(self.applications.as_ref())
    }

    fn addon_type(&self) -> AddonType {
        if self.langpack_id.is_some() {
            AddonType::Language
        } else if self.dictionaries.is_some() {
            AddonType::Dictionary
        } else if self.theme.is_some() {
            AddonType::StaticTheme
        } else {
            AddonType::Extension
        }
    }

    fn compatibility(&self) -> BTreeMap<String, VersionRange> {
        let mut compatibility = BTreeMap::new();
        let settings = self.settings();

        let gecko = settings.and_then(|s| s.gecko.as_ref());
        compatibility.insert(ClientApp::Firefox.to_string(), webextension_range(gecko));

        if let Some(android) = settings.and_then(|s| s.gecko_android.as_ref()) {
            compatibility.insert(
                ClientApp::Android.to_string(),
                webextension_range(Some(android)),
            );
        }

        compatibility
    }
}

fn webextension_range(gecko: Option<&GeckoSettings>) -> VersionRange {
    VersionRange {
        min: Some(
            gecko
                .and_then(|g| g.strict_min_version.clone())
                .unwrap_or_else(|| DEFAULT_WEBEXTENSION_MIN_VERSION.to_string()),
        ),
        max: Some(
            gecko
                .and_then(|g| g.strict_max_version.clone())
                .unwrap_or_else(|| "*".to_string()),
        ),
    }
}

/// Build a record from a legacy `install.rdf`
fn legacy_addon(rdf: &str, file: AddonFile) -> Addon {
    // Target application blocks carry their own em:id, so strip them before
    // looking for the add-on's id and version
    let top_level = RDF_TARGET.replace_all(rdf, "");

    let compatibility = RDF_TARGET
        .captures_iter(rdf)
        .filter_map(|caps| {
            let block = caps.get(1)?.as_str();
            let app = match RDF_ID.find(block)?.as_str() {
                FIREFOX_APP_GUID => ClientApp::Firefox,
                ANDROID_APP_GUID => ClientApp::Android,
                _ => return None,
            };
            let range = VersionRange {
                min: RDF_MIN.find(block),
                max: RDF_MAX.find(block),
            };
            Some((app.to_string(), range))
        })
        .collect();

    // Bootstrapped add-ons install without a restart
    let bootstrap = RDF_BOOTSTRAP
        .find(&top_level)
        .is_some_and(|value| value == "true");

    Addon {
        guid: RDF_ID.find(&top_level).unwrap_or_default(),
        current_version: Some(Version {
            version: RDF_VERSION.find(&top_level).unwrap_or_default(),
            files: vec![AddonFile {
                is_webextension: false,
                is_restart_required: !bootstrap,
                ..file
            }],
            compatibility,
            is_strict_compatibility_enabled: false,
        }),
        ..Default::default()
    }
}

fn webextension_addon(manifest: WebExtensionManifest, file: AddonFile) -> Addon {
    let guid = manifest
        .settings()
        .and_then(|s| s.gecko.as_ref())
        .and_then(|g| g.id.clone())
        .unwrap_or_default();

    Addon {
        guid,
        name: manifest.name.clone().map(serde_json::Value::String),
        addon_type: manifest.addon_type(),
        current_version: Some(Version {
            version: manifest.version.clone().unwrap_or_default(),
            compatibility: manifest.compatibility(),
            files: vec![AddonFile {
                is_webextension: true,
                ..file
            }],
            is_strict_compatibility_enabled: false,
        }),
        ..Default::default()
    }
}

fn read_entry<R: Read + std::io::Seek>(
    archive: &mut zip::ZipArchive<R>,
    name: &str,
) -> anyhow::Result<Option<String>> {
    let mut entry = match archive.by_name(name) {
        Ok(entry) => entry,
        Err(zip::result::ZipError::FileNotFound) => return Ok(None),
        Err(e) => return Err(e.into()),
    };

    let mut contents = String::new();
    entry.read_to_string(&mut contents)?;
    Ok(Some(contents))
}

/// Parse package bytes into an add-on record
pub fn parse_package(bytes: &[u8], url: &str) -> anyhow::Result<Addon> {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes))
        .map_err(|e| anyhow::anyhow!("Not an add-on package: {}", e))?;

    let file = AddonFile {
        platform: Platform::All,
        url: url.to_string(),
        hash: Some(compute_hash(bytes, HashAlgorithm::Sha256)),
        ..Default::default()
    };

    if let Some(text) = read_entry(&mut archive, "manifest.json")? {
        debug!("Reading manifest.json from {}", url);
        let manifest: WebExtensionManifest = serde_json::from_str(&text)
            .map_err(|e| anyhow::anyhow!("Failed to parse manifest.json: {}", e))?;
        return Ok(webextension_addon(manifest, file));
    }

    if let Some(text) = read_entry(&mut archive, "install.rdf")? {
        debug!("Reading legacy install.rdf from {}", url);
        return Ok(legacy_addon(&text, file));
    }

    anyhow::bail!("Package has neither manifest.json nor install.rdf")
}

pub struct XpiSource;

#[async_trait]
impl AddonSource for XpiSource {
    fn name(&self) -> &'static str {
        "xpi"
    }

    fn validate_id(&self, addon_id: &str) -> anyhow::Result<()> {
        let path = Path::new(addon_id);
        let is_package = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|e| e.eq_ignore_ascii_case("xpi") || e.eq_ignore_ascii_case("zip"));

        if !is_package {
            anyhow::bail!("Expected a .xpi or .zip package, got: {}", addon_id);
        }
        if !path.is_file() {
            anyhow::bail!("File not found: {}", addon_id);
        }
        Ok(())
    }

    async fn load(&self, addon_id: &str) -> anyhow::Result<Addon> {
        let bytes = tokio::fs::read(addon_id)
            .await
            .map_err(|e| anyhow::anyhow!("Failed to read {}: {}", addon_id, e))?;
        parse_package(&bytes, addon_id)
    }
}
