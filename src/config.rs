use crate::document::{ConfigDocument, NodeId};
use crate::error::{ConfigError, Result};
use crate::{PropertyRegistry, repair, statics};
use indexmap::IndexMap;
use regex::Regex;
use std::{
    collections::HashMap,
    ffi::OsString,
    fs, io,
    path::{Path, PathBuf},
    sync::OnceLock,
};

/// A known property as found in the loaded file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedProperty {
    pub name: String,
    pub value: String,
    /// `None` when the file never defined this property.
    pub node: Option<NodeId>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveOutcome {
    pub path: PathBuf,
    pub backup_path: Option<PathBuf>,
    /// Set when the pre-save copy could not be made; the save still went ahead.
    pub backup_warning: Option<String>,
    pub appended: usize,
}

/// A loaded `serverconfig.xml`: the document, the inline comment descriptions
/// found next to its properties, and whether the bytes needed repair.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub source_path: PathBuf,
    pub document: ConfigDocument,
    pub comments: HashMap<String, String>,
    pub repaired: bool,
}

impl LoadedConfig {
    pub fn load_path(path: &Path) -> Result<Self> {
        let bytes = match fs::read(path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(ConfigError::FileNotFound(path.to_path_buf()));
            }
            Err(e) => return Err(ConfigError::io(path, e)),
        };

        let parse_error = |message: String| ConfigError::Parse {
            path: path.to_path_buf(),
            message,
        };

        let (document, text, repaired) = match ConfigDocument::parse(&bytes) {
            Ok(document) => (document, bytes, false),
            Err(first) => {
                tracing::warn!(path = %path.display(), error = %first, "XML parse failed, attempting repair");
                let fixed = repair::repair(&bytes).map_err(|_| parse_error(first.0.clone()))?;
                if !fixed.modified {
                    return Err(parse_error(first.0));
                }
                let document =
                    ConfigDocument::parse(&fixed.bytes).map_err(|e| parse_error(e.0))?;
                (document, fixed.bytes, true)
            }
        };

        let comments = extract_inline_comments(&String::from_utf8_lossy(&text));
        tracing::info!(
            path = %path.display(),
            properties = document.len(),
            comments = comments.len(),
            repaired,
            "loaded configuration"
        );

        Ok(Self {
            source_path: path.to_path_buf(),
            document,
            comments,
            repaired,
        })
    }

    pub fn property_count(&self) -> usize {
        self.document.len()
    }

    /// Every registry property with the file's value, in registry order.
    /// Properties the file does not define come back with an empty value and
    /// no node; properties unknown to the registry are left out.
    pub fn known_properties(&self, registry: &PropertyRegistry) -> Vec<LoadedProperty> {
        registry
            .iter()
            .map(|(_, name)| LoadedProperty {
                name: name.to_string(),
                value: self.document.value_of(name).unwrap_or_default(),
                node: self.document.node_id(name),
            })
            .collect()
    }

    /// Values of the registry properties the file defines.
    pub fn known_values(&self, registry: &PropertyRegistry) -> IndexMap<String, String> {
        self.known_properties(registry)
            .into_iter()
            .filter(|p| p.node.is_some())
            .map(|p| (p.name, p.value))
            .collect()
    }

    /// Push `values` into the document and write it to `path`.
    ///
    /// Existing elements are updated in place. A name the file does not define
    /// is appended to the root, unless its value is empty. The current file is
    /// copied to `<path>.backup` first. The in-memory document is only replaced
    /// once the write succeeded.
    pub fn save_to_path(
        &mut self,
        path: &Path,
        values: &IndexMap<String, String>,
    ) -> Result<SaveOutcome> {
        let mut document = self.document.clone();
        let mut appended = 0;
        for (name, value) in values {
            if !document.contains(name) && value.is_empty() {
                continue;
            }
            if document.set_value(name, value)? {
                appended += 1;
            }
        }
        let bytes = document.to_bytes()?;

        let backup_path = backup_path_for(path);
        let (backup_path, backup_warning) = if path.exists() {
            match fs::copy(path, &backup_path) {
                Ok(_) => (Some(backup_path), None),
                Err(e) => {
                    tracing::warn!(path = %backup_path.display(), error = %e, "could not create backup");
                    (None, Some(format!("Could not create backup: {e}")))
                }
            }
        } else {
            (None, None)
        };

        fs::write(path, &bytes).map_err(|e| ConfigError::io(path, e))?;
        tracing::info!(path = %path.display(), appended, "saved configuration");

        self.document = document;
        self.source_path = path.to_path_buf();
        Ok(SaveOutcome {
            path: path.to_path_buf(),
            backup_path,
            backup_warning,
            appended,
        })
    }
}

pub fn backup_path_for(path: &Path) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(statics::BACKUP_SUFFIX);
    PathBuf::from(name)
}

/// Collect `<property name="X" ... /><!-- text -->` pairs that sit on the same
/// line. Whitespace inside the comment is collapsed; empty comments are ignored.
pub fn extract_inline_comments(text: &str) -> HashMap<String, String> {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    let pattern = PATTERN.get_or_init(|| {
        Regex::new(
            r#"(?i)<\s*property\s[^>]*?\bname\s*=\s*["']([^"']+)["'][^>]*?/>[ \t]*<!--[ \t]*(.*?)[ \t]*-->"#,
        )
        .expect("inline comment pattern is valid")
    });

    let mut comments = HashMap::new();
    for caps in pattern.captures_iter(text) {
        let name = &caps[1];
        let comment = caps[2].split_whitespace().collect::<Vec<_>>().join(" ");
        if !name.is_empty() && !comment.is_empty() {
            comments.insert(name.to_string(), comment);
        }
    }
    comments
}
