// Local JSON file source implementation

use crate::compat::Addon;
use crate::sources::source_trait::AddonSource;
use async_trait::async_trait;
use std::path::Path;

/// Reads an add-on record saved from the marketplace API
pub struct FileSource;

#[async_trait]
impl AddonSource for FileSource {
    fn name(&self) -> &'static str {
        "file"
    }

    fn validate_id(&self, addon_id: &str) -> anyhow::Result<()> {
        if addon_id.is_empty() {
            anyhow::bail!("File path cannot be empty");
        }
        if !Path::new(addon_id).is_file() {
            anyhow::bail!("File not found: {}", addon_id);
        }
        Ok(())
    }

    async fn load(&self, addon_id: &str) -> anyhow::Result<Addon> {
        let text = tokio::fs::read_to_string(addon_id)
            .await
            .map_err(|e| anyhow::anyhow!("Failed to read {}: {}", addon_id, e))?;

        serde_json::from_str(&text)
            .map_err(|e| anyhow::anyhow!("Invalid add-on JSON in {}: {}", addon_id, e))
    }
}
