use crate::error::ConfigError;
use crate::session::EditSession;
use crate::statics;
use chrono::{DateTime, Local};
use quick_xml::{
    Writer,
    events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event},
};
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeEntry {
    pub name: String,
    pub original: String,
    pub current: String,
    pub modified: bool,
}

impl ChangeEntry {
    pub fn status(&self) -> &'static str {
        if self.modified {
            statics::REPORT_STATUS_MODIFIED
        } else {
            statics::REPORT_STATUS_UNCHANGED
        }
    }
}

/// Original vs. current value of every known property, for the Changes window
/// and for diagnostics payloads.
#[derive(Debug, Clone)]
pub struct ChangeReport {
    pub timestamp: DateTime<Local>,
    pub editor_version: String,
    pub original_file: String,
    pub entries: Vec<ChangeEntry>,
}

impl ChangeReport {
    pub fn build(session: &EditSession, source: &Path) -> Self {
        let entries = session
            .entries()
            .map(|(name, original, current)| ChangeEntry {
                name: name.to_string(),
                original: original.to_string(),
                current: current.to_string(),
                modified: original != current,
            })
            .collect();

        Self {
            timestamp: Local::now(),
            editor_version: env!("CARGO_PKG_VERSION").to_string(),
            original_file: source
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default(),
            entries,
        }
    }

    pub fn modified_count(&self) -> usize {
        self.entries.iter().filter(|e| e.modified).count()
    }

    pub fn modified(&self) -> impl Iterator<Item = &ChangeEntry> {
        self.entries.iter().filter(|e| e.modified)
    }

    pub fn to_xml(&self) -> Result<String, ConfigError> {
        let timestamp = self.timestamp.to_rfc3339();
        let count = self.modified_count().to_string();
        let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);

        let mut root = BytesStart::new(statics::REPORT_ROOT);
        root.push_attribute((statics::REPORT_TIMESTAMP, timestamp.as_str()));
        root.push_attribute((statics::REPORT_EDITOR_VERSION, self.editor_version.as_str()));
        root.push_attribute((statics::REPORT_ORIGINAL_FILE, self.original_file.as_str()));

        let mut events = vec![
            Event::Decl(BytesDecl::new(
                statics::XML_VERSION,
                Some(statics::XML_ENCODING),
                None,
            )),
            Event::Start(root),
            Event::Start(BytesStart::new(statics::REPORT_SUMMARY)),
        ];
        for (tag, text) in [
            (statics::REPORT_CHANGES_COUNT, count.as_str()),
            (statics::REPORT_TIMESTAMP, timestamp.as_str()),
            (statics::REPORT_EDITOR_VERSION, self.editor_version.as_str()),
        ] {
            events.push(Event::Start(BytesStart::new(tag)));
            events.push(Event::Text(BytesText::new(text)));
            events.push(Event::End(BytesEnd::new(tag)));
        }
        events.push(Event::End(BytesEnd::new(statics::REPORT_SUMMARY)));

        for entry in &self.entries {
            let mut prop = BytesStart::new(statics::XML_PROPERTY);
            prop.push_attribute((statics::XML_ATTR_NAME, entry.name.as_str()));
            prop.push_attribute((statics::REPORT_ATTR_ORIGINAL, entry.original.as_str()));
            prop.push_attribute((statics::REPORT_ATTR_CURRENT, entry.current.as_str()));
            prop.push_attribute((statics::REPORT_ATTR_STATUS, entry.status()));
            events.push(Event::Empty(prop));
        }
        events.push(Event::End(BytesEnd::new(statics::REPORT_ROOT)));

        for event in events {
            writer
                .write_event(event)
                .map_err(|e| ConfigError::Serialize(e.to_string()))?;
        }
        String::from_utf8(writer.into_inner()).map_err(|e| ConfigError::Serialize(e.to_string()))
    }
}

/// Plain-text environment summary for bug reports.
#[derive(Debug, Clone)]
pub struct DebugInfo {
    pub platform: String,
    pub editor_version: String,
    pub config_file: String,
    pub property_count: usize,
    pub timestamp: DateTime<Local>,
}

impl DebugInfo {
    pub fn collect(config_file: &Path, property_count: usize) -> Self {
        Self {
            platform: format!("{} {}", std::env::consts::OS, std::env::consts::ARCH),
            editor_version: env!("CARGO_PKG_VERSION").to_string(),
            config_file: config_file.display().to_string(),
            property_count,
            timestamp: Local::now(),
        }
    }

    pub fn to_text(&self) -> String {
        format!(
            "Platform: {}\nEditor: {}\nConfig File: {}\nProperties: {}\nTimestamp: {}",
            self.platform,
            self.editor_version,
            self.config_file,
            self.property_count,
            self.timestamp.to_rfc3339(),
        )
    }
}
