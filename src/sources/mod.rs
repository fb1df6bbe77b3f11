// Sources module for add-on record loaders

use std::collections::HashMap;
use std::sync::Arc;

pub mod amo;
pub mod hash;
pub mod http;
pub mod local;
pub mod source_trait;
pub mod xpi;

pub use amo::AmoSource;
pub use local::FileSource;
pub use source_trait::AddonSource;
pub use xpi::XpiSource;

/// Registry for add-on sources
pub struct SourceRegistry {
    sources: HashMap<String, Arc<dyn AddonSource>>,
}

impl SourceRegistry {
    pub fn new() -> Self {
        let mut registry = Self {
            sources: HashMap::new(),
        };

        registry.register(Arc::new(AmoSource));
        registry.register(Arc::new(FileSource));
        registry.register(Arc::new(XpiSource));

        registry
    }

    fn register(&mut self, source: Arc<dyn AddonSource>) {
        self.sources.insert(source.name().to_string(), source);
    }

    pub fn get(&self, source_name: &str) -> Option<&Arc<dyn AddonSource>> {
        self.sources.get(source_name)
    }

    pub fn get_or_error(&self, source_name: &str) -> anyhow::Result<&Arc<dyn AddonSource>> {
        self.get(source_name).ok_or_else(|| {
            let mut names = self.sources.keys().map(|s| s.as_str()).collect::<Vec<_>>();
            names.sort_unstable();
            anyhow::anyhow!(
                "Unsupported source: '{}'. Supported sources: {}",
                source_name,
                names.join(", ")
            )
        })
    }
}

// Global registry instance
lazy_static::lazy_static! {
    pub static ref REGISTRY: SourceRegistry = SourceRegistry::new();
}
