// Check command for reporting whether an add-on can be installed

use super::{client_app, load_addon, user_agent_info};
use crate::compat::{
    Addon, ClientApp, CompatibilityVerdict, LogDiagnostics, UserAgentInfo, find_install_file,
    get_client_compatibility, install_url, is_android_installable, is_quantum_compatible,
};
use crate::config::Settings;
use crate::constants;
use crate::ui;
use log::info;
use serde::Serialize;

#[derive(Debug, Serialize)]
struct AddonInfo {
    guid: String,
    name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    version: Option<String>,
}

#[derive(Debug, Serialize)]
struct CheckOutput {
    schema_version: u32,
    addon: AddonInfo,
    client_app: ClientApp,
    user_agent: UserAgentInfo,
    #[serde(flatten)]
    verdict: CompatibilityVerdict,
    quantum_compatible: bool,
    android_installable: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    install_url: Option<String>,
}

pub struct CheckArgs {
    pub id: String,
    pub source: String,
    pub client_app: Option<String>,
    pub user_agent: Option<String>,
    pub src: Option<String>,
    pub json: bool,
}

fn evaluate(
    addon: &Addon,
    client_app: ClientApp,
    user_agent: UserAgentInfo,
    src: Option<&str>,
) -> CheckOutput {
    let current_version = addon.current_version.as_ref();
    let verdict = get_client_compatibility(
        addon,
        current_version,
        client_app,
        &user_agent,
        &LogDiagnostics,
    );

    let install_url = if verdict.compatible {
        find_install_file(current_version, user_agent.platform())
            .map(|file| install_url(&file.url, src))
    } else {
        None
    };

    CheckOutput {
        schema_version: constants::SCHEMA_VERSION,
        addon: AddonInfo {
            guid: addon.guid.clone(),
            name: addon.display_name(),
            version: current_version.map(|v| v.version.clone()),
        },
        client_app,
        user_agent,
        verdict,
        quantum_compatible: is_quantum_compatible(addon),
        android_installable: is_android_installable(Some(addon)),
        install_url,
    }
}

fn yes_no(value: bool) -> &'static str {
    if value { "yes" } else { "no" }
}

fn output_human_readable(output: &CheckOutput) {
    let browser = format!(
        "{} {}",
        output.user_agent.browser_name(),
        output.user_agent.browser_version()
    );
    let browser = browser.trim();
    let browser = if browser.is_empty() { "unknown browser" } else { browser };

    match output.verdict.reason {
        None => ui::success(&format!(
            "{} is compatible with {} ({})",
            output.addon.name, browser, output.client_app
        )),
        Some(reason) => ui::error(&format!(
            "{} is not compatible with {} ({}): {}",
            output.addon.name, browser, output.client_app, reason
        )),
    }

    if let Some(reason) = output.verdict.reason {
        ui::status("reason", reason.as_str());
    }
    let bounds = format!(
        "{} .. {}",
        output.verdict.min_version.as_deref().unwrap_or("-"),
        output.verdict.max_version.as_deref().unwrap_or("-")
    );
    ui::status("versions", &bounds);
    ui::status("quantum", yes_no(output.quantum_compatible));
    ui::status("android", yes_no(output.android_installable));

    if let Some(url) = &output.install_url {
        ui::status("install", url);
    }
    if let Some(url) = &output.verdict.download_url {
        ui::status("download", url);
    }
}

/// Returns the process exit code: 0 when compatible, 1 otherwise
pub async fn check(args: CheckArgs) -> anyhow::Result<i32> {
    let settings = Settings::load_or_default()?;
    let client_app = client_app(args.client_app.as_deref(), &settings)?;
    let user_agent = user_agent_info(args.user_agent.as_deref());
    let src = args.src.or(settings.install_source);

    let addon = load_addon(&args.source, &args.id, args.json).await?;
    let output = evaluate(&addon, client_app, user_agent, src.as_deref());

    info!(
        "Checked {} for {}: compatible={}",
        output.addon.guid, client_app, output.verdict.compatible
    );

    if args.json {
        ui::json(&output)?;
    } else {
        output_human_readable(&output);
    }

    Ok(if output.verdict.compatible { 0 } else { 1 })
}
