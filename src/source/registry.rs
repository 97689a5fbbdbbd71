//! Name-keyed source registry and active-subset selection.

use std::collections::BTreeMap;
use std::sync::Arc;

use super::marketplace::{MarketplaceSource, MARKETPLACES};
use super::Source;
use crate::config::SourcesConfig;
use crate::error::ConfigError;

/// Which registered sources a scan should query.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SourceSelection {
    /// Every registered source.
    #[default]
    All,
    /// Only the named sources, in the given order.
    Named(Vec<String>),
}

impl SourceSelection {
    /// Build a selection from a list of names.
    ///
    /// An empty list or one containing `"all"` selects everything. Names are
    /// trimmed and lowercased; blanks and repeats are dropped.
    #[must_use]
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut picked: Vec<String> = Vec::new();
        for name in names {
            let name = name.as_ref().trim().to_ascii_lowercase();
            if name == "all" {
                return Self::All;
            }
            if !name.is_empty() && !picked.contains(&name) {
                picked.push(name);
            }
        }
        if picked.is_empty() {
            Self::All
        } else {
            Self::Named(picked)
        }
    }
}

/// Registry mapping source names to adapter instances.
#[derive(Default)]
pub struct SourceRegistry {
    sources: Vec<Arc<dyn Source>>,
}

impl SourceRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry of the built-in marketplaces, honouring URL overrides and the
    /// request settings from `config`.
    pub fn builtin(config: &SourcesConfig) -> Result<Self, ConfigError> {
        let known: Vec<&str> = MARKETPLACES.iter().map(|(name, _)| *name).collect();
        if let Some(unknown) = config.urls.keys().find(|k| !known.contains(&k.as_str())) {
            return Err(ConfigError::UnknownSource {
                name: unknown.clone(),
                available: known.join(", "),
            });
        }

        let http = MarketplaceSource::http_client(config.timeout(), &config.user_agent);
        let mut registry = Self::new();
        for (name, template) in MARKETPLACES {
            let template = config
                .urls
                .get(name)
                .map_or(template, String::as_str);
            registry.register(Arc::new(MarketplaceSource::new(
                name,
                template,
                http.clone(),
            )?));
        }
        Ok(registry)
    }

    /// Register a source, replacing any existing source with the same name.
    pub fn register(&mut self, source: Arc<dyn Source>) {
        self.sources.retain(|s| s.name() != source.name());
        self.sources.push(source);
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<Arc<dyn Source>> {
        self.sources.iter().find(|s| s.name() == name).cloned()
    }

    /// Registered names in registration order.
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        self.sources.iter().map(|s| s.name()).collect()
    }

    /// Resolve a selection to concrete sources.
    ///
    /// Naming a source that is not registered is a configuration error.
    pub fn select(&self, selection: &SourceSelection) -> Result<Vec<Arc<dyn Source>>, ConfigError> {
        match selection {
            SourceSelection::All => Ok(self.sources.clone()),
            SourceSelection::Named(names) => names
                .iter()
                .map(|name| {
                    self.get(name).ok_or_else(|| ConfigError::UnknownSource {
                        name: name.clone(),
                        available: self.names().join(", "),
                    })
                })
                .collect(),
        }
    }

    /// Search URL templates of the built-in catalogue, keyed by name.
    #[must_use]
    pub fn catalogue(config: &SourcesConfig) -> BTreeMap<&'static str, String> {
        MARKETPLACES
            .iter()
            .map(|(name, template)| {
                let url = config
                    .urls
                    .get(*name)
                    .cloned()
                    .unwrap_or_else(|| (*template).to_string());
                (*name, url)
            })
            .collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.sources.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testkit::source::StaticSource;

    fn registry() -> SourceRegistry {
        let mut registry = SourceRegistry::new();
        registry.register(Arc::new(StaticSource::new("ebay", vec![])));
        registry.register(Arc::new(StaticSource::new("mercari", vec![])));
        registry
    }

    #[test]
    fn selection_from_names() {
        assert_eq!(SourceSelection::from_names(Vec::<String>::new()), SourceSelection::All);
        assert_eq!(SourceSelection::from_names(["ebay", "ALL"]), SourceSelection::All);
        assert_eq!(
            SourceSelection::from_names([" Ebay", "craigslist", "ebay", ""]),
            SourceSelection::Named(vec!["ebay".into(), "craigslist".into()])
        );
    }

    #[test]
    fn select_all_returns_every_source() {
        let selected = registry().select(&SourceSelection::All).unwrap();
        assert_eq!(selected.len(), 2);
    }

    #[test]
    fn select_named_subset() {
        let selected = registry()
            .select(&SourceSelection::Named(vec!["mercari".into()]))
            .unwrap();
        assert_eq!(selected.len(), 1);
        assert_eq!(selected[0].name(), "mercari");
    }

    #[test]
    fn unknown_name_is_a_config_error() {
        let err = registry()
            .select(&SourceSelection::Named(vec!["gumtree".into()]))
            .err()
            .unwrap();
        match err {
            ConfigError::UnknownSource { name, available } => {
                assert_eq!(name, "gumtree");
                assert_eq!(available, "ebay, mercari");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn register_replaces_same_name() {
        let mut registry = registry();
        registry.register(Arc::new(StaticSource::new("ebay", vec![])));
        assert_eq!(registry.names(), vec!["mercari", "ebay"]);
    }

    #[test]
    fn builtin_has_all_marketplaces() {
        let registry = SourceRegistry::builtin(&SourcesConfig::default()).unwrap();
        assert_eq!(
            registry.names(),
            vec!["facebook", "ebay", "craigslist", "aliexpress", "mercari"]
        );
    }

    #[test]
    fn builtin_rejects_override_for_unknown_marketplace() {
        let mut config = SourcesConfig::default();
        config
            .urls
            .insert("gumtree".into(), "https://gumtree.com/s?q={query}".into());
        assert!(matches!(
            SourceRegistry::builtin(&config),
            Err(ConfigError::UnknownSource { .. })
        ));
    }

    #[test]
    fn catalogue_applies_overrides() {
        let mut config = SourcesConfig::default();
        config
            .urls
            .insert("ebay".into(), "http://localhost:8080/s?q={query}".into());
        let catalogue = SourceRegistry::catalogue(&config);
        assert_eq!(catalogue["ebay"], "http://localhost:8080/s?q={query}");
        assert_eq!(catalogue.len(), 5);
    }
}
