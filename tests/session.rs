use pretty_assertions::assert_eq;
use serverconfig_editor::{
    ChangeReport, ConfigError, EditSession, LoadedConfig, PropertyRegistry, SessionState,
};

type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;

const SAMPLE: &str = "<?xml version=\"1.0\"?>\n<ServerSettings>\n\t<property name=\"ServerName\" value=\"Host\" />\n\t<property name=\"MaxSpawnedZombies\" value=\"64\" />\n</ServerSettings>\n";

#[test]
fn dirty_flag_follows_session_lifecycle() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("serverconfig.xml");
    std::fs::write(&path, SAMPLE)?;

    let registry = PropertyRegistry::builtin();
    let mut config = LoadedConfig::load_path(&path)?;
    let mut session = EditSession::new();
    assert_eq!(session.state(), SessionState::Empty);

    session.seed_from(&registry, &config);
    assert!(!session.is_dirty());
    assert_eq!(session.state(), SessionState::Loaded);

    session.set_value("MaxSpawnedZombies", "80");
    assert!(session.is_dirty());

    // Writing into a directory that does not exist fails; nothing changes.
    let bad_path = dir.path().join("missing-dir").join("serverconfig.xml");
    let err = session.save(&mut config, &bad_path).unwrap_err();
    assert!(matches!(err, ConfigError::Io { .. }), "{err:?}");
    assert!(session.is_dirty());
    assert_eq!(session.value("MaxSpawnedZombies"), Some("80"));
    assert_eq!(config.document.value_of("MaxSpawnedZombies").as_deref(), Some("64"));

    session.save(&mut config, &path)?;
    assert!(!session.is_dirty());
    assert_eq!(session.state(), SessionState::Loaded);
    Ok(())
}

#[test]
fn change_report_compares_against_last_load() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("serverconfig.xml");
    std::fs::write(&path, SAMPLE)?;

    let registry = PropertyRegistry::builtin();
    let config = LoadedConfig::load_path(&path)?;
    let mut session = EditSession::new();
    session.seed_from(&registry, &config);
    session.set_value("ServerName", "New Host");

    let report = ChangeReport::build(&session, &path);
    assert_eq!(report.entries.len(), registry.len());
    assert_eq!(report.modified_count(), 1);

    let entry = report.modified().next().unwrap();
    assert_eq!(entry.name, "ServerName");
    assert_eq!(entry.original, "Host");
    assert_eq!(entry.current, "New Host");
    assert_eq!(entry.status(), "MODIFIED");

    let xml = report.to_xml()?;
    assert!(xml.contains(r#"original_file="serverconfig.xml""#));
    assert!(xml.contains(&format!(
        "<editor_version>{}</editor_version>",
        env!("CARGO_PKG_VERSION")
    )));
    Ok(())
}

#[test]
fn failed_open_keeps_previous_session() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let good = dir.path().join("serverconfig.xml");
    let broken = dir.path().join("other.xml");
    std::fs::write(&good, SAMPLE)?;
    std::fs::write(&broken, "<?xml version=\"1.0\"?>\n<ServerSettings><property name=\"ServerName\"")?;

    let registry = PropertyRegistry::builtin();
    let mut session = EditSession::new();
    let mut config = session.open(&registry, &good)?;
    session.set_value("ServerName", "Edited Host");
    let before = session.current_values();

    let err = session.open(&registry, &broken).unwrap_err();
    assert!(matches!(err, ConfigError::Parse { .. }), "{err:?}");
    assert!(session.is_dirty());
    assert_eq!(session.current_values(), before);
    assert_eq!(session.original_value("ServerName"), Some("Host"));

    // The surviving config still points at the file it came from.
    assert_eq!(config.source_path, good);
    let target = config.source_path.clone();
    session.save(&mut config, &target)?;
    assert!(std::fs::read_to_string(&good)?.contains("Edited Host"));
    assert!(!std::fs::read_to_string(&broken)?.contains("Edited Host"));
    Ok(())
}
