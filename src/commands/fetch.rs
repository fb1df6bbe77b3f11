// Fetch command for downloading a compatible add-on's install file

use super::{client_app, load_addon, user_agent_info};
use crate::compat::{LogDiagnostics, find_install_file, get_client_compatibility};
use crate::config::{self, Settings};
use crate::sources::hash::verify_hash;
use crate::sources::http;
use crate::ui;
use indicatif::ProgressBar;
use log::{debug, info};
use std::fs;
use std::path::{Component, Path, PathBuf};

pub struct FetchArgs {
    pub id: String,
    pub source: String,
    pub client_app: Option<String>,
    pub user_agent: Option<String>,
    pub out: Option<String>,
}

fn is_remote(url: &str) -> bool {
    url.starts_with("https://") || url.starts_with("http://")
}

/// Download over HTTP; the returned bar is left for the caller to finish
async fn download(url: &str) -> anyhow::Result<(Vec<u8>, String, ProgressBar)> {
    let mut response = http::download_with_response(url).await?;
    let filename = http::extract_filename(&response, url);

    let pb = ui::download_bar(response.content_length(), &filename);
    let mut data = Vec::new();
    loop {
        match response.chunk().await {
            Ok(Some(chunk)) => {
                pb.inc(chunk.len() as u64);
                data.extend_from_slice(&chunk);
            }
            Ok(None) => break,
            Err(e) => {
                ui::finish_spinner_error(&pb, &format!("Download of {} failed", filename));
                return Err(e.into());
            }
        }
    }

    Ok((data, filename, pb))
}

/// Join a file name onto the output directory, refusing anything but a bare name
fn target_path(out_dir: &Path, filename: &str) -> anyhow::Result<PathBuf> {
    let mut components = Path::new(filename).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(name)), None) => Ok(out_dir.join(name)),
        _ => anyhow::bail!("Refusing to save to unsafe file name: {}", filename),
    }
}

/// Packages loaded from disk point at themselves
async fn read_local(path: &str) -> anyhow::Result<(Vec<u8>, String)> {
    let data = tokio::fs::read(path)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to read {}: {}", path, e))?;
    let filename = Path::new(path)
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("addon.xpi")
        .to_string();
    Ok((data, filename))
}

pub async fn fetch(args: FetchArgs) -> anyhow::Result<()> {
    let settings = Settings::load_or_default()?;
    let client_app = client_app(args.client_app.as_deref(), &settings)?;
    let user_agent = user_agent_info(args.user_agent.as_deref());

    let addon = load_addon(&args.source, &args.id, false).await?;
    let name = addon.display_name();
    let current_version = addon.current_version.as_ref();

    let verdict = get_client_compatibility(
        &addon,
        current_version,
        client_app,
        &user_agent,
        &LogDiagnostics,
    );
    if let Some(reason) = verdict.reason {
        anyhow::bail!("{} is not compatible ({}): {}", name, reason.as_str(), reason);
    }

    let Some(file) = find_install_file(current_version, user_agent.platform()) else {
        anyhow::bail!("No install file for this platform: {}", name);
    };
    if file.url.is_empty() {
        anyhow::bail!("Install file for {} has no URL", name);
    }

    debug!("Fetching {} from {}", name, file.url);
    let (data, filename, pb) = if is_remote(&file.url) {
        let (data, filename, pb) = download(&file.url).await?;
        (data, filename, Some(pb))
    } else {
        let (data, filename) = read_local(&file.url).await?;
        (data, filename, None)
    };

    let verified = match &file.hash {
        Some(expected) => {
            if let Err(e) = verify_hash(&data, expected) {
                if let Some(pb) = &pb {
                    ui::finish_spinner_error(pb, &format!("{} failed verification", filename));
                }
                anyhow::bail!("Refusing to save {}: {}", filename, e);
            }
            true
        }
        None => {
            ui::warning(&format!("No hash recorded for {}, skipping verification", filename));
            false
        }
    };

    let out_dir = PathBuf::from(args.out.unwrap_or_else(config::download_dir));
    let target = target_path(&out_dir, &filename)?;
    fs::create_dir_all(&out_dir)?;
    fs::write(&target, &data)?;

    info!("Saved {} ({} bytes) to {}", filename, data.len(), target.display());
    match &pb {
        Some(pb) => ui::finish_download_success(pb, &filename, verified),
        None if verified => ui::success(&format!("{} verified", filename)),
        None => ui::success(&filename),
    }
    ui::action(&format!("Saved to {}", target.display()));
    Ok(())
}
