use crate::config::{LoadedConfig, SaveOutcome};
use crate::error::Result;
use crate::search::{self, SearchResults};
use crate::PropertyRegistry;
use indexmap::IndexMap;
use std::{collections::HashMap, path::Path};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Empty,
    Loaded,
    Dirty,
}

/// The editable value of every known property, independent of what the file
/// actually contains.
///
/// `baseline` holds the values as of the last load or successful save and is
/// what the change report compares against.
#[derive(Debug, Clone, Default)]
pub struct EditSession {
    values: IndexMap<String, String>,
    baseline: IndexMap<String, String>,
    description_overrides: HashMap<String, String>,
    seeded: bool,
    dirty: bool,
}

impl EditSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace every value. Known properties missing from `loaded` start out
    /// empty; names the registry does not know are ignored.
    pub fn seed<I, K, V>(&mut self, registry: &PropertyRegistry, loaded: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut loaded: HashMap<String, String> = loaded
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();

        self.values = registry
            .iter()
            .map(|(_, name)| (name.to_string(), loaded.remove(name).unwrap_or_default()))
            .collect();
        self.baseline = self.values.clone();
        self.description_overrides.clear();
        self.seeded = true;
        self.dirty = false;
    }

    /// Seed from a freshly loaded file, taking its inline comment descriptions.
    pub fn seed_from(&mut self, registry: &PropertyRegistry, config: &LoadedConfig) {
        self.seed(registry, config.known_values(registry));
        self.description_overrides = config.comments.clone();
    }

    /// Load `path` and reseed from it. When loading fails the session keeps
    /// its values, overrides and dirty flag.
    pub fn open(&mut self, registry: &PropertyRegistry, path: &Path) -> Result<LoadedConfig> {
        let config = LoadedConfig::load_path(path)?;
        self.seed_from(registry, &config);
        Ok(config)
    }

    pub fn set_value(&mut self, name: &str, value: impl Into<String>) {
        self.values.insert(name.to_string(), value.into());
        self.dirty = true;
    }

    pub fn value(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    /// Direct access for text widgets; call [`Self::mark_dirty`] on change.
    pub fn value_mut(&mut self, name: &str) -> Option<&mut String> {
        self.values.get_mut(name)
    }

    pub fn original_value(&self, name: &str) -> Option<&str> {
        self.baseline.get(name).map(String::as_str)
    }

    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn state(&self) -> SessionState {
        match (self.seeded, self.dirty) {
            (false, _) => SessionState::Empty,
            (true, false) => SessionState::Loaded,
            (true, true) => SessionState::Dirty,
        }
    }

    pub fn current_values(&self) -> IndexMap<String, String> {
        self.values.clone()
    }

    /// `(name, original, current)` for every session property, registry order.
    pub fn entries(&self) -> impl Iterator<Item = (&str, &str, &str)> {
        self.values.iter().map(|(name, current)| {
            let original = self.original_value(name).unwrap_or_default();
            (name.as_str(), original, current.as_str())
        })
    }

    pub fn description_overrides(&self) -> &HashMap<String, String> {
        &self.description_overrides
    }

    pub fn search(&self, registry: &PropertyRegistry, query: &str) -> SearchResults {
        search::search(registry, &self.description_overrides, query)
    }

    /// Write the current values through `config`. On failure nothing about the
    /// session changes and it stays dirty.
    pub fn save(&mut self, config: &mut LoadedConfig, path: &Path) -> Result<SaveOutcome> {
        let outcome = config.save_to_path(path, &self.values)?;
        self.baseline = self.values.clone();
        self.dirty = false;
        Ok(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::{EditSession, SessionState};
    use crate::PropertyRegistry;

    fn registry() -> PropertyRegistry {
        PropertyRegistry::from_entries([("General", vec!["A", "B"])], Vec::<(&str, &str)>::new())
    }

    #[test]
    fn seed_defaults_missing_and_drops_unknown() {
        let mut session = EditSession::new();
        assert_eq!(session.state(), SessionState::Empty);

        session.seed(&registry(), [("A", "1"), ("Unknown", "2")]);
        assert_eq!(session.value("A"), Some("1"));
        assert_eq!(session.value("B"), Some(""));
        assert_eq!(session.value("Unknown"), None);
        assert_eq!(session.state(), SessionState::Loaded);
    }

    #[test]
    fn set_value_dirties_and_reseed_clears() {
        let mut session = EditSession::new();
        session.seed(&registry(), [("A", "1")]);
        session.set_value("A", "");
        assert!(session.is_dirty());
        assert_eq!(session.state(), SessionState::Dirty);
        assert_eq!(session.original_value("A"), Some("1"));

        session.seed(&registry(), [("A", "3")]);
        assert!(!session.is_dirty());
        assert_eq!(session.value("A"), Some("3"));
    }

    #[test]
    fn plain_seed_drops_comment_overrides() {
        let mut session = EditSession::new();
        session.seed(&registry(), [("A", "1")]);
        session
            .description_overrides
            .insert("A".to_string(), "from an older file".to_string());

        session.seed(&registry(), [("A", "2")]);
        assert!(session.description_overrides().is_empty());
    }

    #[test]
    fn value_mut_needs_explicit_dirty_mark() {
        let mut session = EditSession::new();
        session.seed(&registry(), [("A", "1")]);
        session.value_mut("A").unwrap().push('0');
        assert!(!session.is_dirty());
        session.mark_dirty();
        assert_eq!(session.current_values()["A"], "10");
    }
}
