// UA command for showing how a User-Agent string is classified

use crate::compat::user_agent::{is_firefox, is_firefox_for_android, is_firefox_for_ios};
use crate::compat::{RegexUserAgentParser, UserAgentInfo, UserAgentParser};
use crate::constants;
use crate::ui;
use serde::Serialize;

#[derive(Debug, Serialize)]
struct UaOutput {
    schema_version: u32,
    #[serde(flatten)]
    info: UserAgentInfo,
    is_firefox: bool,
    is_firefox_for_android: bool,
    is_firefox_for_ios: bool,
}

pub fn ua(user_agent: &str, json: bool) -> anyhow::Result<()> {
    let info = RegexUserAgentParser.parse(user_agent);
    let output = UaOutput {
        schema_version: constants::SCHEMA_VERSION,
        is_firefox: is_firefox(&info),
        is_firefox_for_android: is_firefox_for_android(&info),
        is_firefox_for_ios: is_firefox_for_ios(&info),
        info,
    };

    if json {
        return ui::json(&output);
    }

    let or_unknown = |s: &str| {
        if s.is_empty() {
            "unknown".to_string()
        } else {
            s.to_string()
        }
    };
    ui::status("browser", &or_unknown(output.info.browser_name()));
    ui::status("version", &or_unknown(output.info.browser_version()));
    ui::status("os", &or_unknown(output.info.os_name()));

    let family = if output.is_firefox_for_ios {
        "Firefox for iOS"
    } else if output.is_firefox_for_android {
        "Firefox for Android"
    } else if output.is_firefox {
        "Firefox"
    } else {
        "not Firefox"
    };
    ui::status("family", family);
    Ok(())
}
