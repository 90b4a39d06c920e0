use crate::capabilities::{Capability, CapabilityKind};
use crate::metadata::ProviderMetadata;

/// Metadata and capability pair stored by the registry.
#[derive(Debug, Clone)]
pub struct Provider {
    metadata: ProviderMetadata,
    capability: Capability,
}

impl Provider {
    #[must_use]
    pub fn new(metadata: ProviderMetadata, capability: Capability) -> Self {
        Self {
            metadata,
            capability,
        }
    }

    #[must_use]
    pub fn metadata(&self) -> &ProviderMetadata {
        &self.metadata
    }

    #[must_use]
    pub fn name(&self) -> &str {
        self.metadata.name()
    }

    #[must_use]
    pub fn description(&self) -> &str {
        self.metadata.description()
    }

    #[must_use]
    pub fn kind(&self) -> CapabilityKind {
        self.capability.kind()
    }

    #[must_use]
    pub fn capability(&self) -> &Capability {
        &self.capability
    }
}
