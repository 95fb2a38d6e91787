use pretty_assertions::assert_eq;
use serverconfig_editor::{ConfigError, LoadedConfig, PropertyRegistry, repair};

type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;

const SAMPLE: &str = "<?xml version=\"1.0\"?>\r\n<ServerSettings>\r\n\t<property name=\"ServerName\" value=\"Zürich Ünderground\" />\r\n\t<property name=\"ServerPort\" value=\"26900\" />\r\n</ServerSettings>\r\n";

fn utf16(bom: [u8; 2], unit: fn(u16) -> [u8; 2]) -> Vec<u8> {
    let mut bytes = bom.to_vec();
    for u in SAMPLE.encode_utf16() {
        bytes.extend_from_slice(&unit(u));
    }
    bytes
}

fn load_bytes(bytes: &[u8]) -> std::result::Result<LoadedConfig, ConfigError> {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("serverconfig.xml");
    std::fs::write(&path, bytes).expect("write fixture");
    LoadedConfig::load_path(&path)
}

#[test]
fn utf16_files_load_like_utf8() -> Result<()> {
    let registry = PropertyRegistry::builtin();
    let plain = load_bytes(SAMPLE.as_bytes())?;
    assert!(!plain.repaired);

    for bytes in [
        utf16([0xFF, 0xFE], u16::to_le_bytes),
        utf16([0xFE, 0xFF], u16::to_be_bytes),
    ] {
        let config = load_bytes(&bytes)?;
        assert!(config.repaired);
        assert_eq!(config.known_values(&registry), plain.known_values(&registry));
    }
    Ok(())
}

#[test]
fn stray_prefix_is_repaired_without_touching_file() -> Result<()> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("serverconfig.xml");
    let input = format!("garbage!{SAMPLE}");
    std::fs::write(&path, &input)?;

    let config = LoadedConfig::load_path(&path)?;
    assert!(config.repaired);
    assert_eq!(config.document.value_of("ServerPort").as_deref(), Some("26900"));
    assert_eq!(std::fs::read_to_string(&path)?, input);
    Ok(())
}

#[test]
fn repair_is_idempotent_on_valid_input() -> Result<()> {
    let out = repair::repair(SAMPLE.as_bytes())?;
    assert!(!out.modified);
    assert_eq!(out.bytes, SAMPLE.as_bytes());
    Ok(())
}

#[test]
fn unrepairable_and_missing_files_are_classified() {
    let err = load_bytes(b"<ServerSettings><property name=\"x\"").unwrap_err();
    assert!(matches!(err, ConfigError::Parse { .. }), "{err:?}");

    let dir = tempfile::tempdir().expect("tempdir");
    let err = LoadedConfig::load_path(&dir.path().join("missing.xml")).unwrap_err();
    assert!(matches!(err, ConfigError::FileNotFound(_)), "{err:?}");
}
