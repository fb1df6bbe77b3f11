// Command implementations and the helpers they share

pub mod check;
pub mod fetch;
pub mod init;
pub mod pages;
pub mod redirect;
pub mod ua;

use crate::compat::{Addon, ClientApp, RegexUserAgentParser, UserAgentInfo, UserAgentParser};
use crate::config::Settings;
use crate::constants;
use crate::sources::REGISTRY;
use crate::ui;
use log::{debug, warn};

/// Command-line value first, then the settings file
fn client_app(flag: Option<&str>, settings: &Settings) -> anyhow::Result<ClientApp> {
    match flag {
        Some(value) => value.parse(),
        None => settings.client_app(),
    }
}

fn user_agent_info(flag: Option<&str>) -> UserAgentInfo {
    let user_agent = flag.unwrap_or(constants::DEFAULT_USER_AGENT);
    let info = RegexUserAgentParser.parse(user_agent);
    debug!("Parsed user agent {:?} as {:?}", user_agent, info);
    info
}

/// Load an add-on record, with a spinner unless output must stay machine-readable
async fn load_addon(source_name: &str, id: &str, quiet: bool) -> anyhow::Result<Addon> {
    let source = REGISTRY.get_or_error(source_name)?;
    source.validate_id(id)?;

    if quiet {
        let addon = source.load(id).await?;
        warn_without_version(&addon);
        return Ok(addon);
    }

    let pb = ui::spinner(&format!("Loading {} from {}", id, source_name));
    match source.load(id).await {
        Ok(addon) => {
            let version = addon
                .current_version
                .as_ref()
                .map(|v| v.version.as_str())
                .unwrap_or("(no current version)");
            ui::finish_spinner_loaded(&pb, &addon.display_name(), version);
            warn_without_version(&addon);
            Ok(addon)
        }
        Err(e) => {
            ui::finish_spinner_error(&pb, &format!("Failed to load {}", id));
            Err(e)
        }
    }
}

fn warn_without_version(addon: &Addon) {
    if addon.current_version.is_none() {
        warn!("{} has no current version", addon.display_name());
    }
}
