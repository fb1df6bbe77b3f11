// Compatibility resolution between an add-on version and a browser

use crate::compat::model::{Addon, AddonFile, ClientApp, Platform, PromotedCategory, Version};
use crate::compat::toolkit_version;
use crate::compat::user_agent::{
    UserAgentInfo, is_firefox, is_firefox_for_android, is_firefox_for_ios,
};
use crate::constants::{
    FACEBOOK_CONTAINER_ADDON_GUID, FACEBOOK_CONTAINER_DOWNLOAD_URL, NON_RESTARTLESS_CUTOFF_VERSION,
};
use serde::Serialize;
use std::fmt;

/// Why an add-on cannot be installed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IncompatibleReason {
    AndroidUnsupported,
    FirefoxForIos,
    NonRestartlessAddon,
    NotFirefox,
    OverMaxVersion,
    UnderMinVersion,
    UnsupportedPlatform,
}

impl IncompatibleReason {
    /// Stable code, as serialized
    pub fn as_str(&self) -> &'static str {
        match self {
            IncompatibleReason::AndroidUnsupported => "ANDROID_UNSUPPORTED",
            IncompatibleReason::FirefoxForIos => "FIREFOX_FOR_IOS",
            IncompatibleReason::NonRestartlessAddon => "NON_RESTARTLESS_ADDON",
            IncompatibleReason::NotFirefox => "NOT_FIREFOX",
            IncompatibleReason::OverMaxVersion => "OVER_MAX_VERSION",
            IncompatibleReason::UnderMinVersion => "UNDER_MIN_VERSION",
            IncompatibleReason::UnsupportedPlatform => "UNSUPPORTED_PLATFORM",
        }
    }
}

impl fmt::Display for IncompatibleReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let message = match self {
            IncompatibleReason::AndroidUnsupported => "not available for Firefox for Android",
            IncompatibleReason::FirefoxForIos => "Firefox for iOS does not support add-ons",
            IncompatibleReason::NonRestartlessAddon => {
                "legacy add-on, no longer supported by Firefox 61 and above"
            }
            IncompatibleReason::NotFirefox => "only available for Firefox",
            IncompatibleReason::OverMaxVersion => "not compatible with this version of Firefox",
            IncompatibleReason::UnderMinVersion => "requires a newer version of Firefox",
            IncompatibleReason::UnsupportedPlatform => "not available for this platform",
        };
        f.write_str(message)
    }
}

/// Sink for data-quality problems that are reported but never fatal
pub trait Diagnostics {
    fn error(&self, message: &str);
}

/// Forwards diagnostics to the `log` facade
#[derive(Debug, Default, Clone, Copy)]
pub struct LogDiagnostics;

impl Diagnostics for LogDiagnostics {
    fn error(&self, message: &str) {
        log::error!("{}", message);
    }
}

/// Outcome of checking a version against a user agent. `reason` is set iff not compatible.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct UserAgentCompatibility {
    pub compatible: bool,
    pub reason: Option<IncompatibleReason>,
}

impl UserAgentCompatibility {
    pub fn compatible() -> Self {
        Self {
            compatible: true,
            reason: None,
        }
    }

    pub fn incompatible(reason: IncompatibleReason) -> Self {
        Self {
            compatible: false,
            reason: Some(reason),
        }
    }
}

/// Version bounds an add-on version declares for one client app
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CompatibleVersions {
    pub supports_client_app: bool,
    pub min_version: Option<String>,
    pub max_version: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompatibilityVerdict {
    pub compatible: bool,
    pub reason: Option<IncompatibleReason>,
    pub min_version: Option<String>,
    pub max_version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub download_url: Option<String>,
}

/// Inputs shared by every compatibility rule
pub struct CompatibilityRequest<'a> {
    pub addon: &'a Addon,
    pub current_version: Option<&'a Version>,
    pub user_agent_info: &'a UserAgentInfo,
    pub min_version: Option<&'a str>,
    pub max_version: Option<&'a str>,
}

/// Rules are tried in order; the first one that applies decides the reason.
type Rule = (
    IncompatibleReason,
    fn(&CompatibilityRequest<'_>, &dyn Diagnostics) -> bool,
);

const RULES: &[Rule] = &[
    (IncompatibleReason::UnsupportedPlatform, has_no_version),
    (IncompatibleReason::FirefoxForIos, is_ios_browser),
    (IncompatibleReason::AndroidUnsupported, is_uninstallable_on_android),
    (IncompatibleReason::NotFirefox, is_other_browser),
    (IncompatibleReason::UnderMinVersion, has_wildcard_min_version),
    (IncompatibleReason::UnderMinVersion, is_under_min_version),
    (IncompatibleReason::UnsupportedPlatform, has_no_install_file),
    (IncompatibleReason::NonRestartlessAddon, needs_restart),
    (IncompatibleReason::OverMaxVersion, is_over_strict_max_version),
];

fn has_no_version(req: &CompatibilityRequest<'_>, _: &dyn Diagnostics) -> bool {
    req.current_version.is_none()
}

// Firefox for iOS is Firefox, but can never install add-ons
fn is_ios_browser(req: &CompatibilityRequest<'_>, _: &dyn Diagnostics) -> bool {
    is_firefox_for_ios(req.user_agent_info)
}

fn is_uninstallable_on_android(req: &CompatibilityRequest<'_>, _: &dyn Diagnostics) -> bool {
    is_firefox_for_android(req.user_agent_info) && !is_android_installable(Some(req.addon))
}

fn is_other_browser(req: &CompatibilityRequest<'_>, _: &dyn Diagnostics) -> bool {
    !is_firefox(req.user_agent_info)
}

// The catalog marks WebExtensions without a minimum as "48", so "*" is bad data
fn has_wildcard_min_version(req: &CompatibilityRequest<'_>, diagnostics: &dyn Diagnostics) -> bool {
    if req.min_version != Some("*") {
        return false;
    }
    diagnostics.error(&format!(
        "minVersion of \"*\" was passed to is_compatible_with_user_agent(); bad add-on version data (guid: {})",
        req.addon.guid
    ));
    true
}

fn is_under_min_version(req: &CompatibilityRequest<'_>, _: &dyn Diagnostics) -> bool {
    req.min_version
        .is_some_and(|min| toolkit_version::is_below(req.user_agent_info.browser_version(), min))
}

// Themes and other non-extensions are platform-agnostic
fn has_no_install_file(req: &CompatibilityRequest<'_>, _: &dyn Diagnostics) -> bool {
    req.addon.is_extension() && install_file_for(req).is_none()
}

fn needs_restart(req: &CompatibilityRequest<'_>, _: &dyn Diagnostics) -> bool {
    install_file_for(req).is_some_and(|file| file.is_restart_required)
        && !toolkit_version::is_below(
            req.user_agent_info.browser_version(),
            NON_RESTARTLESS_CUTOFF_VERSION,
        )
}

// Without strict compatibility a declared max version is advisory only
fn is_over_strict_max_version(req: &CompatibilityRequest<'_>, _: &dyn Diagnostics) -> bool {
    req.current_version
        .is_some_and(|version| version.is_strict_compatibility_enabled)
        && req
            .max_version
            .is_some_and(|max| toolkit_version::is_above(req.user_agent_info.browser_version(), max))
}

fn install_file_for<'a>(req: &CompatibilityRequest<'a>) -> Option<&'a AddonFile> {
    find_install_file(req.current_version, req.user_agent_info.platform())
}

/// Pick the file for a platform, falling back to the platform-agnostic one
pub fn find_install_file(
    version: Option<&Version>,
    platform_filter: Option<Platform>,
) -> Option<&AddonFile> {
    let files = &version?.files;

    platform_filter
        .and_then(|platform| files.iter().find(|file| file.platform == platform))
        .or_else(|| files.iter().find(|file| file.platform == Platform::All))
}

pub fn get_compatible_versions(
    client_app: ClientApp,
    current_version: Option<&Version>,
) -> CompatibleVersions {
    match current_version.and_then(|version| version.compatibility_for(client_app)) {
        Some(range) => CompatibleVersions {
            supports_client_app: true,
            min_version: range.min.clone(),
            max_version: range.max.clone(),
        },
        None => CompatibleVersions::default(),
    }
}

pub fn is_compatible_with_user_agent(
    request: &CompatibilityRequest<'_>,
    diagnostics: &dyn Diagnostics,
) -> UserAgentCompatibility {
    RULES
        .iter()
        .find(|(_, applies)| applies(request, diagnostics))
        .map(|(reason, _)| UserAgentCompatibility::incompatible(*reason))
        .unwrap_or_else(UserAgentCompatibility::compatible)
}

pub fn get_client_compatibility(
    addon: &Addon,
    current_version: Option<&Version>,
    client_app: ClientApp,
    user_agent_info: &UserAgentInfo,
    diagnostics: &dyn Diagnostics,
) -> CompatibilityVerdict {
    let versions = get_compatible_versions(client_app, current_version);

    let outcome = if current_version.is_some() && !versions.supports_client_app {
        if is_firefox_for_android(user_agent_info) {
            UserAgentCompatibility::incompatible(IncompatibleReason::AndroidUnsupported)
        } else {
            UserAgentCompatibility::incompatible(IncompatibleReason::UnsupportedPlatform)
        }
    } else {
        let request = CompatibilityRequest {
            addon,
            current_version,
            user_agent_info,
            min_version: versions.min_version.as_deref(),
            max_version: versions.max_version.as_deref(),
        };
        is_compatible_with_user_agent(&request, diagnostics)
    };

    let download_url = (outcome.reason == Some(IncompatibleReason::NotFirefox)
        && addon.guid == FACEBOOK_CONTAINER_ADDON_GUID)
        .then(|| FACEBOOK_CONTAINER_DOWNLOAD_URL.to_string());

    CompatibilityVerdict {
        compatible: outcome.compatible,
        reason: outcome.reason,
        min_version: versions.min_version,
        max_version: versions.max_version,
        download_url,
    }
}

/// Whether the add-on can still run on Firefox 57+ ("Quantum")
pub fn is_quantum_compatible(addon: &Addon) -> bool {
    let Some(version) = &addon.current_version else {
        return false;
    };

    version.files.iter().any(|file| {
        file.is_webextension || file.is_mozilla_signed_extension || file.platform != Platform::All
    })
}

/// Only Recommended add-ons explicitly promoted for Android install there
pub fn is_android_installable(addon: Option<&Addon>) -> bool {
    addon
        .and_then(|addon| addon.promoted.as_ref())
        .is_some_and(|promoted| {
            promoted.category == PromotedCategory::Recommended
                && promoted.apps.contains(&ClientApp::Android)
        })
}
