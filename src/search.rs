use crate::PropertyRegistry;
use regex::Regex;
use std::{collections::HashMap, sync::OnceLock};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchHit {
    pub category: String,
    pub name: String,
    pub by_name: bool,
    pub by_description: bool,
}

/// Matches for one query, in registry order, plus the active result.
#[derive(Debug, Clone, Default)]
pub struct SearchResults {
    query: String,
    hits: Vec<SearchHit>,
    cursor: usize,
}

impl SearchResults {
    /// An empty query means "no filter", which is different from a query that
    /// matched nothing.
    pub fn is_active(&self) -> bool {
        !self.query.is_empty()
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn hits(&self) -> &[SearchHit] {
        &self.hits
    }

    pub fn len(&self) -> usize {
        self.hits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hits.is_empty()
    }

    pub fn cursor(&self) -> Option<usize> {
        (!self.hits.is_empty()).then_some(self.cursor)
    }

    pub fn current(&self) -> Option<&SearchHit> {
        self.hits.get(self.cursor)
    }

    pub fn is_current(&self, name: &str) -> bool {
        self.current().is_some_and(|hit| hit.name == name)
    }

    pub fn next(&mut self) -> Option<&SearchHit> {
        if self.hits.is_empty() {
            return None;
        }
        self.cursor = (self.cursor + 1) % self.hits.len();
        self.current()
    }

    pub fn previous(&mut self) -> Option<&SearchHit> {
        if self.hits.is_empty() {
            return None;
        }
        self.cursor = (self.cursor + self.hits.len() - 1) % self.hits.len();
        self.current()
    }

    /// "3 of 7", "No results", or nothing when no query is active.
    pub fn counter_label(&self, no_results: &str) -> String {
        match self.cursor() {
            Some(i) => format!("{} of {}", i + 1, self.hits.len()),
            None if self.is_active() => no_results.to_string(),
            None => String::new(),
        }
    }
}

/// Find registry properties whose name contains `query`, or whose effective
/// description has `query` as a whole word. Case-insensitive; each property is
/// listed once.
pub fn search(
    registry: &PropertyRegistry,
    overrides: &HashMap<String, String>,
    query: &str,
) -> SearchResults {
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return SearchResults::default();
    }

    let hits = registry
        .iter()
        .filter_map(|(category, name)| {
            let by_name = name.to_lowercase().contains(&query);
            let by_description = registry
                .effective_description(name, overrides)
                .is_some_and(|text| has_word(text, &query));
            (by_name || by_description).then(|| SearchHit {
                category: category.to_string(),
                name: name.to_string(),
                by_name,
                by_description,
            })
        })
        .collect();

    SearchResults {
        query,
        hits,
        cursor: 0,
    }
}

/// `word` must already be lowercase.
fn has_word(text: &str, word: &str) -> bool {
    static WORD: OnceLock<Regex> = OnceLock::new();
    let pattern = WORD.get_or_init(|| Regex::new(r"\w+").expect("word pattern is valid"));
    let text = text.to_lowercase();
    pattern.find_iter(&text).any(|m| m.as_str() == word)
}
