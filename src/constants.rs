// Constants module for shared string constants

pub const SETTINGS_FILE: &str = "amo-compat.toml";
pub const DEFAULT_LANG: &str = "en-US";
pub const DEFAULT_CLIENT_APP: &str = "firefox";
pub const DEFAULT_API_BASE: &str = "https://addons.mozilla.org/api/v4";
pub const DEFAULT_ADDON_SOURCE: &str = "amo";
pub const DEFAULT_SHOW_PAGES: u32 = 7;
pub const DEFAULT_DOWNLOAD_DIR: &str = "downloads";

/// Environment variable overriding the directory holding the settings file.
pub const CONFIG_DIR_ENV: &str = "AMO_COMPAT_DIR";

/// Used when `--user-agent` is not given.
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (X11; Linux x86_64; rv:128.0) Gecko/20100101 Firefox/128.0";

/// Firefox dropped support for legacy (restart-required) extensions in this release.
pub const NON_RESTARTLESS_CUTOFF_VERSION: &str = "61.0";

pub const FACEBOOK_CONTAINER_ADDON_GUID: &str = "@contain-facebook";
pub const FACEBOOK_CONTAINER_DOWNLOAD_URL: &str =
    "https://www.mozilla.org/firefox/facebookcontainer/";

/// Schema version for the `--json` output formats.
/// Increment only on breaking changes to ensure future integrations can safely evolve.
pub const SCHEMA_VERSION: u32 = 1;
