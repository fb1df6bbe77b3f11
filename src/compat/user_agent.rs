// User-agent parsing and Firefox family detection

use crate::compat::model::Platform;
use regex::Regex;
use serde::{Deserialize, Serialize};

pub const OS_ANDROID: &str = "Android";
pub const OS_IOS: &str = "iOS";
pub const OS_MAC: &str = "Mac OS";
pub const OS_WINDOWS: &str = "Windows";
pub const OS_LINUX: &str = "Linux";
pub const OS_FIREFOX_OS: &str = "Firefox OS";
pub const OS_CHROMIUM_OS: &str = "Chromium OS";

/// Browser names that belong to the Firefox family
pub const FIREFOX_BROWSER_NAMES: &[&str] = &["Firefox", "Mobile Firefox", "Firefox Mobile", "Fennec"];

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BrowserInfo {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub version: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OsInfo {
    #[serde(default)]
    pub name: Option<String>,
}

/// Parsed user agent. Every field may be missing.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserAgentInfo {
    #[serde(default)]
    pub browser: BrowserInfo,
    #[serde(default)]
    pub os: OsInfo,
}

impl UserAgentInfo {
    pub fn new(browser_name: &str, browser_version: &str, os_name: &str) -> Self {
        Self {
            browser: BrowserInfo {
                name: Some(browser_name.to_string()),
                version: Some(browser_version.to_string()),
            },
            os: OsInfo {
                name: Some(os_name.to_string()),
            },
        }
    }

    pub fn browser_name(&self) -> &str {
        self.browser.name.as_deref().unwrap_or("")
    }

    /// Empty when unknown; compares as version "0"
    pub fn browser_version(&self) -> &str {
        self.browser.version.as_deref().unwrap_or("")
    }

    pub fn os_name(&self) -> &str {
        self.os.name.as_deref().unwrap_or("")
    }

    /// Platform used to pick an install file; `None` only matches platform-agnostic files
    pub fn platform(&self) -> Option<Platform> {
        match self.os_name() {
            OS_WINDOWS => Some(Platform::Windows),
            OS_MAC => Some(Platform::Mac),
            OS_LINUX => Some(Platform::Linux),
            OS_ANDROID => Some(Platform::Android),
            _ => None,
        }
    }
}

pub fn is_firefox(user_agent_info: &UserAgentInfo) -> bool {
    let name = user_agent_info.browser_name();
    !name.is_empty() && FIREFOX_BROWSER_NAMES.contains(&name)
}

/// Firefox on Android, including Fenix
pub fn is_firefox_for_android(user_agent_info: &UserAgentInfo) -> bool {
    is_firefox(user_agent_info) && user_agent_info.os_name() == OS_ANDROID
}

/// Firefox for iOS, which cannot install add-ons
pub fn is_firefox_for_ios(user_agent_info: &UserAgentInfo) -> bool {
    is_firefox(user_agent_info) && user_agent_info.os_name() == OS_IOS
}

/// Turns a raw user-agent string into a `UserAgentInfo`
pub trait UserAgentParser: Send + Sync {
    fn parse(&self, user_agent: &str) -> UserAgentInfo;
}

lazy_static::lazy_static! {
    static ref GECKO_FORK: Regex =
        Regex::new(r"(SeaMonkey|Waterfox|PaleMoon|IceCat|Iceweasel)/([\w.]+)").unwrap();
    static ref FXIOS_TOKEN: Regex = Regex::new(r"FxiOS/([\w.]+)").unwrap();
    static ref FIREFOX: Regex = Regex::new(r"(?:Firefox|Fennec)/([\w.]+)").unwrap();
    static ref EDGE: Regex = Regex::new(r"(?:Edge|Edg|EdgA|EdgiOS)/([\w.]+)").unwrap();
    static ref OPERA: Regex = Regex::new(r"(?:OPR|Opera)/([\w.]+)").unwrap();
    static ref SAMSUNG: Regex = Regex::new(r"SamsungBrowser/([\w.]+)").unwrap();
    static ref CHROME: Regex = Regex::new(r"(?:Chrome|CriOS)/([\w.]+)").unwrap();
    static ref SAFARI_VERSION: Regex = Regex::new(r"Version/([\w.]+)").unwrap();
    static ref GECKO_MOBILE: Regex = Regex::new(r"\((?:Mobile|Tablet|TV)[^)]*rv:").unwrap();
}

/// Default parser covering the browsers and platforms the marketplace distinguishes
#[derive(Debug, Default, Clone, Copy)]
pub struct RegexUserAgentParser;

impl RegexUserAgentParser {
    fn browser(user_agent: &str) -> BrowserInfo {
        fn found(name: &str, version: Option<regex::Match<'_>>) -> BrowserInfo {
            BrowserInfo {
                name: Some(name.to_string()),
                version: version.map(|m| m.as_str().to_string()),
            }
        }

        if let Some(caps) = GECKO_FORK.captures(user_agent) {
            let name = caps.get(1).map(|m| m.as_str()).unwrap_or_default();
            return found(name, caps.get(2));
        }
        if let Some(caps) = FXIOS_TOKEN.captures(user_agent) {
            return found("Firefox", caps.get(1));
        }
        if let Some(caps) = FIREFOX.captures(user_agent) {
            let mobile = user_agent.contains("Mobile") || user_agent.contains("Tablet");
            let name = if mobile { "Mobile Firefox" } else { "Firefox" };
            return found(name, caps.get(1));
        }
        if let Some(caps) = EDGE.captures(user_agent) {
            return found("Edge", caps.get(1));
        }
        if let Some(caps) = OPERA.captures(user_agent) {
            return found("Opera", caps.get(1));
        }
        if let Some(caps) = SAMSUNG.captures(user_agent) {
            return found("Samsung Browser", caps.get(1));
        }
        if let Some(caps) = CHROME.captures(user_agent) {
            return found("Chrome", caps.get(1));
        }
        if user_agent.contains("Safari") {
            let version = SAFARI_VERSION.captures(user_agent).and_then(|c| c.get(1));
            if user_agent.contains("Android") {
                return found("Android Browser", version);
            }
            return found("Safari", version);
        }

        BrowserInfo::default()
    }

    fn os(user_agent: &str) -> OsInfo {
        let name = if user_agent.contains("iPhone")
            || user_agent.contains("iPad")
            || user_agent.contains("iPod")
        {
            Some(OS_IOS)
        } else if user_agent.contains("Android") {
            Some(OS_ANDROID)
        } else if user_agent.contains("Windows") {
            Some(OS_WINDOWS)
        } else if user_agent.contains("Mac OS X") || user_agent.contains("Macintosh") {
            Some(OS_MAC)
        } else if user_agent.contains("CrOS") {
            Some(OS_CHROMIUM_OS)
        } else if GECKO_MOBILE.is_match(user_agent) {
            Some(OS_FIREFOX_OS)
        } else if user_agent.contains("Linux") || user_agent.contains("X11") {
            Some(OS_LINUX)
        } else {
            None
        };

        OsInfo {
            name: name.map(String::from),
        }
    }
}

impl UserAgentParser for RegexUserAgentParser {
    fn parse(&self, user_agent: &str) -> UserAgentInfo {
        UserAgentInfo {
            browser: Self::browser(user_agent),
            os: Self::os(user_agent),
        }
    }
}


#[cfg(test)]
mod tests {
    use super::fixtures::*;
    use super::*;

    fn parse(ua: &str) -> UserAgentInfo {
        RegexUserAgentParser.parse(ua)
    }

    fn all(uas: &[&str], check: fn(&UserAgentInfo) -> bool) -> bool {
        uas.iter().all(|ua| check(&parse(ua)))
    }

    fn none(uas: &[&str], check: fn(&UserAgentInfo) -> bool) -> bool {
        uas.iter().all(|ua| !check(&parse(ua)))
    }

    #[test]
    fn test_is_firefox() {
        assert!(all(FIREFOX_DESKTOP, is_firefox));
        assert!(all(FIREFOX_ANDROID, is_firefox));
        assert!(all(FENIX, is_firefox));
        assert!(all(FIREFOX_OS, is_firefox));
        assert!(all(FIREFOX_IOS, is_firefox));
        assert!(none(CHROME_DESKTOP, is_firefox));
        assert!(none(CHROME_ANDROID, is_firefox));
        assert!(none(ANDROID_WEBKIT, is_firefox));
    }

    #[test]
    fn test_is_firefox_for_android() {
        assert!(all(FIREFOX_ANDROID, is_firefox_for_android));
        assert!(all(FENIX, is_firefox_for_android));
        assert!(none(FIREFOX_DESKTOP, is_firefox_for_android));
        assert!(none(FIREFOX_OS, is_firefox_for_android));
        assert!(none(FIREFOX_IOS, is_firefox_for_android));
        assert!(none(CHROME_ANDROID, is_firefox_for_android));
        assert!(none(ANDROID_WEBKIT, is_firefox_for_android));
    }

    #[test]
    fn test_is_firefox_for_ios() {
        assert!(all(FIREFOX_IOS, is_firefox_for_ios));
        assert!(none(FIREFOX_DESKTOP, is_firefox_for_ios));
        assert!(none(FIREFOX_ANDROID, is_firefox_for_ios));
        assert!(none(FENIX, is_firefox_for_ios));
        assert!(none(FIREFOX_OS, is_firefox_for_ios));
        assert!(none(CHROME_DESKTOP, is_firefox_for_ios));
    }

    #[test]
    fn test_missing_fields_are_not_firefox() {
        assert!(!is_firefox(&UserAgentInfo::default()));

        let empty = UserAgentInfo {
            browser: BrowserInfo {
                name: Some(String::new()),
                version: None,
            },
            os: OsInfo::default(),
        };
        assert!(!is_firefox(&empty));
        assert!(!is_firefox_for_android(&empty));
        assert!(!is_firefox_for_ios(&empty));
    }

    #[test]
    fn test_null_fields_deserialize() {
        let info: UserAgentInfo =
            serde_json::from_str(r#"{"browser": {"name": null}, "os": {"name": null}}"#).unwrap();
        assert!(!is_firefox(&info));
        assert_eq!(info.browser_version(), "");
    }

    #[test]
    fn test_parse_versions_and_platforms() {
        let info = parse(FIREFOX_DESKTOP[1]);
        assert_eq!(info.browser_name(), "Firefox");
        assert_eq!(info.browser_version(), "57.0");
        assert_eq!(info.os_name(), OS_MAC);
        assert_eq!(info.platform(), Some(Platform::Mac));

        let info = parse(FIREFOX_ANDROID[0]);
        assert_eq!(info.browser_name(), "Mobile Firefox");
        assert_eq!(info.platform(), Some(Platform::Android));

        let info = parse(FIREFOX_OS[0]);
        assert_eq!(info.os_name(), OS_FIREFOX_OS);
        assert_eq!(info.platform(), None);

        let info = parse(CHROME_DESKTOP[0]);
        assert_eq!(info.browser_name(), "Chrome");
        assert_eq!(info.browser_version(), "41.0.2227.1");
    }

    #[test]
    fn test_gecko_forks_are_not_firefox() {
        let info = parse(
            "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:91.0) Gecko/20100101 Firefox/91.0 SeaMonkey/2.53.10",
        );
        assert_eq!(info.browser_name(), "SeaMonkey");
        assert!(!is_firefox(&info));
    }
}
