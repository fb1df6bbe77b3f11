// Marketplace API source implementation

use crate::compat::Addon;
use crate::config::Settings;
use crate::sources::http;
use crate::sources::source_trait::AddonSource;
use async_trait::async_trait;
use regex::Regex;

lazy_static::lazy_static! {
    // Slugs, numeric ids, "name@domain" and "{uuid}" guids
    static ref ADDON_ID: Regex = Regex::new(r"^[\w@.{}+\-]+$").unwrap();
}

fn addon_url(api_base: &str, addon_id: &str) -> String {
    format!(
        "{}/addons/addon/{}/",
        api_base.trim_end_matches('/'),
        urlencoding::encode(addon_id)
    )
}

pub struct AmoSource;

#[async_trait]
impl AddonSource for AmoSource {
    fn name(&self) -> &'static str {
        "amo"
    }

    fn validate_id(&self, addon_id: &str) -> anyhow::Result<()> {
        if addon_id.is_empty() {
            anyhow::bail!("Add-on ID cannot be empty");
        }
        if !ADDON_ID.is_match(addon_id) {
            anyhow::bail!(
                "Invalid add-on ID: '{}'. Expected a slug, numeric id or guid",
                addon_id
            );
        }
        Ok(())
    }

    async fn load(&self, addon_id: &str) -> anyhow::Result<Addon> {
        let settings = Settings::load_or_default()?;
        let url = addon_url(&settings.api_base, addon_id);

        match http::fetch_json_optional::<Addon>(&url).await? {
            Some(addon) => Ok(addon),
            None => anyhow::bail!("Add-on not found: {}", addon_id),
        }
    }
}
