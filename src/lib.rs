//! Core library for the 7 Days to Die dedicated server config editor.
//! Keeps a fixed property registry, an edit session and the on-disk
//! `serverconfig.xml` in sync, repairing common encoding defects on load.

mod config;
mod document;
mod error;
mod gui;
mod registry;
pub mod repair;
mod report;
mod search;
mod session;
mod settings;
pub mod statics;

pub use config::{
    LoadedConfig, LoadedProperty, SaveOutcome, backup_path_for, extract_inline_comments,
};
pub use document::{ConfigDocument, NodeId};
pub use error::{ConfigError, ParseError, Result};
pub use gui::run_gui;
pub use registry::{PropertyDefinition, PropertyRegistry};
pub use report::{ChangeEntry, ChangeReport, DebugInfo};
pub use search::{SearchHit, SearchResults, search};
pub use session::{EditSession, SessionState};
pub use settings::Settings;
