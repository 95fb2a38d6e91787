use pretty_assertions::assert_eq;
use serverconfig_editor::{EditSession, LoadedConfig, PropertyRegistry, backup_path_for};

type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;

const SAMPLE: &str = r#"<?xml version="1.0"?>
<ServerSettings>
	<!-- GENERAL SERVER SETTINGS -->
	<property name="ServerName"		value="My Game Host" />		<!-- Whatever you want the name of the server to be. -->
	<property name="ServerPort"		value="26900" />		<!-- Port you want the server to listen on. -->
	<property name="ServerVisibility"	value="2" />
	<property name="SomeFutureSetting"	value="keep-me" />
	<property value="no-name" />
	<unknown attr="1"><child/></unknown>
</ServerSettings>
"#;

#[test]
fn load_yields_known_file_values() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("serverconfig.xml");
    std::fs::write(&path, SAMPLE)?;

    let registry = PropertyRegistry::builtin();
    let config = LoadedConfig::load_path(&path)?;
    assert!(!config.repaired);
    assert_eq!(config.property_count(), 4);

    let values = config.known_values(&registry);
    let pairs: Vec<(&str, &str)> = values
        .iter()
        .map(|(k, v)| (k.as_str(), v.as_str()))
        .collect();
    assert_eq!(
        pairs,
        vec![
            ("ServerName", "My Game Host"),
            ("ServerPort", "26900"),
            ("ServerVisibility", "2"),
        ]
    );

    let absent = config
        .known_properties(&registry)
        .into_iter()
        .find(|p| p.name == "GameName")
        .unwrap();
    assert_eq!(absent.value, "");
    assert!(absent.node.is_none());

    assert_eq!(
        config.comments.get("ServerPort").map(String::as_str),
        Some("Port you want the server to listen on.")
    );
    assert!(!config.comments.contains_key("ServerVisibility"));
    Ok(())
}

#[test]
fn save_then_load_roundtrips_edits() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("serverconfig.xml");
    std::fs::write(&path, SAMPLE)?;

    let registry = PropertyRegistry::builtin();
    let mut config = LoadedConfig::load_path(&path)?;
    let mut session = EditSession::new();
    session.seed_from(&registry, &config);

    session.set_value("ServerPort", "26901");
    session.set_value("GameName", "Alpha & \"Omega\"");
    let outcome = session.save(&mut config, &path)?;
    assert_eq!(outcome.appended, 1);
    assert_eq!(outcome.backup_warning, None);
    assert!(!session.is_dirty());

    // The backup holds the file as it was before the save.
    let backup = std::fs::read_to_string(backup_path_for(&path))?;
    assert_eq!(backup, SAMPLE);

    let reloaded = LoadedConfig::load_path(&path)?;
    let mut fresh = EditSession::new();
    fresh.seed_from(&registry, &reloaded);
    assert_eq!(fresh.value("ServerPort"), Some("26901"));
    assert_eq!(fresh.value("GameName"), Some("Alpha & \"Omega\""));
    assert_eq!(fresh.value("ServerName"), Some("My Game Host"));
    // Known but never given a value: not written out.
    assert!(!reloaded.document.contains("WorldGenSeed"));
    Ok(())
}

#[test]
fn save_preserves_unknown_content_and_order() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("serverconfig.xml");
    std::fs::write(&path, SAMPLE)?;

    let registry = PropertyRegistry::builtin();
    let mut config = LoadedConfig::load_path(&path)?;
    let mut session = EditSession::new();
    session.seed_from(&registry, &config);
    session.set_value("ServerName", "Renamed");
    session.set_value("LootAbundance", "200");
    session.save(&mut config, &path)?;

    let out = std::fs::read_to_string(&path)?;
    assert!(out.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<ServerSettings>"));
    assert!(out.contains("<!-- GENERAL SERVER SETTINGS -->"));
    assert!(out.contains(r#"<property name="SomeFutureSetting"	value="keep-me" />"#));
    assert!(out.contains(r#"<property value="no-name" />"#));
    assert!(out.contains(r#"<unknown attr="1"><child/></unknown>"#));
    assert!(out.contains("<!-- Whatever you want the name of the server to be. -->"));

    let renamed = out.find(r#"value="Renamed""#).unwrap();
    let port = out.find(r#"name="ServerPort""#).unwrap();
    let loot = out.find(r#"<property name="LootAbundance" value="200"/>"#).unwrap();
    let unknown = out.find("<unknown").unwrap();
    assert!(renamed < port);
    assert!(unknown < loot);
    assert!(loot < out.find("</ServerSettings>").unwrap());
    Ok(())
}

#[test]
fn unmodified_save_only_normalizes_declaration() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("serverconfig.xml");
    std::fs::write(&path, SAMPLE)?;

    let registry = PropertyRegistry::builtin();
    let mut config = LoadedConfig::load_path(&path)?;
    let mut session = EditSession::new();
    session.seed_from(&registry, &config);
    session.save(&mut config, &path)?;

    let out = std::fs::read_to_string(&path)?;
    let expected = SAMPLE.replacen(
        "<?xml version=\"1.0\"?>",
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>",
        1,
    );
    assert_eq!(out, expected);
    Ok(())
}

#[test]
fn save_goes_ahead_when_backup_cannot_be_written() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("serverconfig.xml");
    std::fs::write(&path, SAMPLE)?;
    // A directory in the way makes the copy fail.
    std::fs::create_dir(backup_path_for(&path))?;

    let registry = PropertyRegistry::builtin();
    let mut config = LoadedConfig::load_path(&path)?;
    let mut session = EditSession::new();
    session.seed_from(&registry, &config);
    session.set_value("ServerPort", "27015");

    let outcome = session.save(&mut config, &path)?;
    assert!(outcome.backup_warning.is_some());
    assert_eq!(outcome.backup_path, None);
    assert!(!session.is_dirty());

    let reloaded = LoadedConfig::load_path(&path)?;
    assert_eq!(reloaded.document.value_of("ServerPort").as_deref(), Some("27015"));
    Ok(())
}
