// Shared HTTP client utilities

use anyhow::Result;
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;

/// User-Agent string for all HTTP requests
const USER_AGENT: &str = concat!("amo-compat/", env!("CARGO_PKG_VERSION"));

lazy_static::lazy_static! {
    /// Shared HTTP client with proper User-Agent
    static ref CLIENT: Client = Client::builder()
        .user_agent(USER_AGENT)
        .build()
        .expect("Failed to create HTTP client");
}

/// Fetch JSON from a URL, returning None for 404 errors
pub async fn fetch_json_optional<T: DeserializeOwned>(url: &str) -> Result<Option<T>> {
    log::debug!("GET {}", url);
    let response: Response = CLIENT.get(url).send().await?;

    if response.status() == StatusCode::NOT_FOUND {
        return Ok(None);
    }

    if !response.status().is_success() {
        anyhow::bail!("HTTP request failed: {} ({})", url, response.status());
    }

    let result = response.json().await?;
    Ok(Some(result))
}

/// Start a download, failing on non-success statuses
pub async fn download_with_response(url: &str) -> Result<Response> {
    log::debug!("GET {}", url);
    let response: Response = CLIENT.get(url).send().await?;

    if !response.status().is_success() {
        anyhow::bail!("Download failed: {} ({})", url, response.status());
    }

    Ok(response)
}

/// Extract filename from Content-Disposition header or URL
///
/// Only the last path component is kept, so a server cannot steer the write
/// outside the download directory.
pub fn extract_filename(response: &Response, url: &str) -> String {
    content_disposition_filename(
        response
            .headers()
            .get("content-disposition")
            .and_then(|h| h.to_str().ok()),
    )
    .unwrap_or_else(|| filename_from_url(url))
}

fn content_disposition_filename(header: Option<&str>) -> Option<String> {
    header.and_then(|s| {
        s.split("filename=")
            .nth(1)
            .and_then(|f| f.trim_matches('"').split(';').next())
            .and_then(|f| safe_filename(f.trim_matches('"')))
    })
}

fn filename_from_url(url: &str) -> String {
    url.split(['?', '#'])
        .next()
        .and_then(safe_filename)
        .unwrap_or_else(|| "addon.xpi".to_string())
}

/// Last component of a path-like name, or None if nothing usable is left
fn safe_filename(name: &str) -> Option<String> {
    let last = name.rsplit(['/', '\\']).next()?.trim();
    match last {
        "" | "." | ".." => None,
        _ => Some(last.to_string()),
    }
}
