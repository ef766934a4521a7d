/// Resource kind of the first-party Quarry storage cluster. An external
/// provider of this kind is attached through the connection-details flow
/// instead of the storage-class flow.
pub const QUARRY_CLUSTER_KIND: &str = "QuarryStorageCluster";

pub fn is_cluster_kind(kind: &str) -> bool {
    kind == QUARRY_CLUSTER_KIND
}

/// An external storage platform the wizard can attach.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExternalProvider {
    /// Short identifier used in config files.
    pub id: String,
    pub display_name: String,
    /// Resource kind; decides which provisioning flow applies.
    pub kind: String,
}

/// The set of attachable external providers: built-ins plus whatever the
/// site config declares.
#[derive(Debug, Clone)]
pub struct ProviderCatalog {
    providers: Vec<ExternalProvider>,
}

impl ProviderCatalog {
    pub fn builtin() -> Self {
        Self {
            providers: vec![
                ExternalProvider {
                    id: "quarry-external".to_string(),
                    display_name: "Quarry Storage Cluster (external)".to_string(),
                    kind: QUARRY_CLUSTER_KIND.to_string(),
                },
                ExternalProvider {
                    id: "flashvault".to_string(),
                    display_name: "FlashVault System".to_string(),
                    kind: "FlashVaultSystem".to_string(),
                },
            ],
        }
    }

    /// Built-ins extended with site-configured providers. Entries whose
    /// kind is already present are ignored.
    pub fn with_extra(extra: impl IntoIterator<Item = ExternalProvider>) -> Self {
        let mut catalog = Self::builtin();
        for provider in extra {
            if catalog.by_kind(&provider.kind).is_none() {
                catalog.providers.push(provider);
            }
        }
        catalog
    }

    pub fn providers(&self) -> &[ExternalProvider] {
        &self.providers
    }

    pub fn by_kind(&self, kind: &str) -> Option<&ExternalProvider> {
        self.providers.iter().find(|p| p.kind == kind)
    }

    pub fn display_name<'a>(&'a self, kind: &'a str) -> &'a str {
        self.by_kind(kind)
            .map(|p| p.display_name.as_str())
            .unwrap_or(kind)
    }

    /// Next selection when cycling through providers. `None` (no provider
    /// picked) is part of the cycle so the selection can be cleared again.
    pub fn next_kind(&self, current: Option<&str>) -> Option<String> {
        match current {
            None => self.providers.first().map(|p| p.kind.clone()),
            Some(kind) => {
                let idx = self.providers.iter().position(|p| p.kind == kind);
                match idx {
                    Some(idx) if idx + 1 < self.providers.len() => {
                        Some(self.providers[idx + 1].kind.clone())
                    }
                    _ => None,
                }
            }
        }
    }
}

impl Default for ProviderCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_catalog_contains_the_cluster_kind() {
        let catalog = ProviderCatalog::builtin();
        let cluster = catalog.by_kind(QUARRY_CLUSTER_KIND).unwrap();
        assert!(is_cluster_kind(&cluster.kind));
        assert!(!is_cluster_kind("FlashVaultSystem"));
    }

    #[test]
    fn extra_providers_extend_but_never_shadow_builtins() {
        let catalog = ProviderCatalog::with_extra([
            ExternalProvider {
                id: "acme".to_string(),
                display_name: "Acme Array".to_string(),
                kind: "AcmeArray".to_string(),
            },
            ExternalProvider {
                id: "rogue".to_string(),
                display_name: "Rogue".to_string(),
                kind: QUARRY_CLUSTER_KIND.to_string(),
            },
        ]);

        assert_eq!(catalog.providers().len(), 3);
        assert_eq!(catalog.by_kind("AcmeArray").unwrap().id, "acme");
        assert_eq!(catalog.by_kind(QUARRY_CLUSTER_KIND).unwrap().id, "quarry-external");
    }

    #[test]
    fn cycling_passes_through_every_provider_and_back_to_none() {
        let catalog = ProviderCatalog::builtin();

        let mut current: Option<String> = None;
        let mut seen = Vec::new();
        loop {
            current = catalog.next_kind(current.as_deref());
            match &current {
                Some(kind) => seen.push(kind.clone()),
                None => break,
            }
        }

        assert_eq!(seen.len(), catalog.providers().len());
        assert!(seen.iter().any(|k| k == QUARRY_CLUSTER_KIND));
    }

    #[test]
    fn display_name_falls_back_to_the_kind() {
        let catalog = ProviderCatalog::builtin();
        assert_eq!(catalog.display_name("FlashVaultSystem"), "FlashVault System");
        assert_eq!(catalog.display_name("UnknownKind"), "UnknownKind");
    }
}
