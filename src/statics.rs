// Central place for UI strings and other non-localized constants.
// Keep these out of gui.rs to reduce duplication and make tweaks safer.

// Default dedicated server install location (Steam, Windows).
pub const DEFAULT_CONFIG_PATH: &str = r"C:\Program Files (x86)\Steam\steamapps\common\7 Days to Die Dedicated Server\serverconfig.xml";

// Settings file, stored in the user's home directory.
pub const SETTINGS_FILE_NAME: &str = ".7d2d_config_editor_settings.json";

pub const BACKUP_SUFFIX: &str = ".backup";

// serverconfig.xml structure (XML_ prefix)
pub const XML_PROPERTY: &str = "property";
pub const XML_ATTR_NAME: &str = "name";
pub const XML_ATTR_VALUE: &str = "value";
pub const XML_VERSION: &str = "1.0";
pub const XML_ENCODING: &str = "UTF-8";
pub const XML_DECL_MARKER: &[u8] = b"<?xml";

// Change report structure (REPORT_ prefix)
pub const REPORT_ROOT: &str = "serverconfig_changes";
pub const REPORT_SUMMARY: &str = "summary";
pub const REPORT_CHANGES_COUNT: &str = "changes_count";
pub const REPORT_TIMESTAMP: &str = "timestamp";
pub const REPORT_EDITOR_VERSION: &str = "editor_version";
pub const REPORT_ORIGINAL_FILE: &str = "original_file";
pub const REPORT_ATTR_ORIGINAL: &str = "original";
pub const REPORT_ATTR_CURRENT: &str = "current";
pub const REPORT_ATTR_STATUS: &str = "status";
pub const REPORT_STATUS_MODIFIED: &str = "MODIFIED";
pub const REPORT_STATUS_UNCHANGED: &str = "unchanged";

// English UI strings (EN_ prefix to make future localization easier)
pub const EN_APP_TITLE: &str = "7 Days to Die Server Config Editor";

pub const EN_BTN_OPEN: &str = "Open...";
pub const EN_BTN_SAVE: &str = "Save";
pub const EN_BTN_RELOAD: &str = "Reload";
pub const EN_BTN_CHANGES: &str = "Changes";
pub const EN_BTN_COPY_REPORT: &str = "Copy report XML";
pub const EN_BTN_DEBUG_INFO: &str = "Copy debug info";
pub const EN_BTN_ABOUT: &str = "About";
pub const EN_BTN_TOGGLE_THEME: &str = "Theme";
pub const EN_BTN_BROWSE: &str = "Browse...";
pub const EN_BTN_PREV: &str = "<";
pub const EN_BTN_NEXT: &str = ">";
pub const EN_BTN_CLEAR: &str = "Clear";
pub const EN_BTN_SAVE_AND_CLOSE: &str = "Save and close";
pub const EN_BTN_DISCARD: &str = "Discard changes";
pub const EN_BTN_CANCEL: &str = "Cancel";

pub const EN_WINDOW_ABOUT: &str = "About";
pub const EN_WINDOW_CHANGES: &str = "Changes";
pub const EN_WINDOW_UNSAVED: &str = "Unsaved Changes";

pub const EN_ABOUT_HEADING: &str = "7 Days to Die Server Config Editor";
pub const EN_ABOUT_VERSION: &str = "Version:";
pub const EN_ABOUT_SHORTCUTS: &str = "Shortcuts:";
pub const EN_ABOUT_SHORTCUT_SAVE: &str = "- Ctrl+S: Save";
pub const EN_ABOUT_SHORTCUT_RELOAD: &str = "- Ctrl+R: Reload from disk";

pub const EN_HOME_INSTRUCTIONS: &str = "Open a serverconfig.xml to begin.";
pub const EN_UNSAVED_PROMPT: &str = "You have unsaved changes. Save before closing?";
pub const EN_RELOAD_DISCARDS: &str = "Reloading discards unsaved changes.";

pub const EN_LABEL_SEARCH: &str = "Search:";
pub const EN_HINT_SEARCH: &str = "Search for specific Properties or keywords in Descriptions";
pub const EN_SEARCH_NO_RESULTS: &str = "No results";
pub const EN_HELP_GLYPH: &str = "?";
pub const EN_NOT_IN_FILE: &str = "(not in file)";

pub const EN_COL_PROPERTY: &str = "Property";
pub const EN_COL_ORIGINAL: &str = "Original";
pub const EN_COL_CURRENT: &str = "Current";
pub const EN_COL_STATUS: &str = "Status";

pub const EN_CHANGES_NONE: &str = "No changes.";
pub const EN_LABEL_CHANGES_COUNT: &str = "changes:";
pub const EN_BADGE_DIRTY: &str = "modified";
pub const EN_DEBUG_COPIED: &str = "Debug information copied to clipboard";

pub const EN_ERR_SETTINGS: &str = "Failed to save settings";
