// Trait definition for add-on sources

use crate::compat::Addon;
use anyhow::Result;

/// Trait for places an add-on record can come from (marketplace API, JSON file, package)
#[async_trait::async_trait]
pub trait AddonSource: Send + Sync {
    /// Load an add-on record
    ///
    /// # Arguments
    /// * `addon_id` - The add-on identifier (format depends on source)
    ///
    /// # Returns
    /// The `Addon` with its current version, when the source knows one
    async fn load(&self, addon_id: &str) -> Result<Addon>;

    /// Get the source name (e.g., "amo", "file", "xpi")
    fn name(&self) -> &'static str;

    /// Validate the add-on ID format for this source
    fn validate_id(&self, addon_id: &str) -> Result<()>;
}
