//! Byte-level fixes for config files written by misbehaving tools.
//!
//! Nothing here touches the file on disk: the repaired bytes are only written
//! back by an explicit save.

use crate::document::ConfigDocument;
use crate::error::ParseError;
use crate::statics;

const UTF8_BOM: &[u8] = &[0xEF, 0xBB, 0xBF];
const UTF16_LE_BOM: &[u8] = &[0xFF, 0xFE];
const UTF16_BE_BOM: &[u8] = &[0xFE, 0xFF];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Repaired {
    pub bytes: Vec<u8>,
    /// `false` when the input was already usable and is returned unchanged.
    pub modified: bool,
}

/// Strip a UTF-8 BOM or transcode UTF-16 (by BOM) to UTF-8, then drop anything
/// before the first `<?xml`. Fails if the result still does not parse.
pub fn repair(original: &[u8]) -> Result<Repaired, ParseError> {
    let mut bytes = if let Some(rest) = original.strip_prefix(UTF8_BOM) {
        rest.to_vec()
    } else if let Some(rest) = original.strip_prefix(UTF16_LE_BOM) {
        transcode_utf16(rest, u16::from_le_bytes)?
    } else if let Some(rest) = original.strip_prefix(UTF16_BE_BOM) {
        transcode_utf16(rest, u16::from_be_bytes)?
    } else {
        original.to_vec()
    };

    if let Some(start) = find(&bytes, statics::XML_DECL_MARKER)
        && start > 0
    {
        bytes.drain(..start);
    }

    ConfigDocument::parse(&bytes)?;

    let modified = bytes != original;
    if modified {
        tracing::debug!(
            before = original.len(),
            after = bytes.len(),
            "repaired XML bytes"
        );
    }
    Ok(Repaired { bytes, modified })
}

fn transcode_utf16(body: &[u8], unit: fn([u8; 2]) -> u16) -> Result<Vec<u8>, ParseError> {
    if body.len() % 2 != 0 {
        return Err(ParseError("UTF-16 data has an odd byte length".to_string()));
    }
    let units = body.chunks_exact(2).map(|pair| unit([pair[0], pair[1]]));
    let text = char::decode_utf16(units)
        .collect::<Result<String, _>>()
        .map_err(|e| ParseError(format!("invalid UTF-16: {e}")))?;
    Ok(text.into_bytes())
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack
        .windows(needle.len())
        .position(|window| window == needle)
}

#[cfg(test)]
mod tests {
    use super::repair;

    const DOC: &str = "<?xml version=\"1.0\"?>\n<ServerSettings>\n\t<property name=\"ServerName\" value=\"x\" />\n</ServerSettings>\n";

    #[test]
    fn valid_input_is_untouched() {
        let out = repair(DOC.as_bytes()).unwrap();
        assert!(!out.modified);
        assert_eq!(out.bytes, DOC.as_bytes());
    }

    #[test]
    fn strips_utf8_bom() {
        let mut input = vec![0xEF, 0xBB, 0xBF];
        input.extend_from_slice(DOC.as_bytes());
        let out = repair(&input).unwrap();
        assert!(out.modified);
        assert_eq!(out.bytes, DOC.as_bytes());
    }

    #[test]
    fn drops_garbage_before_declaration() {
        let input = format!("\u{1}\u{2}junk{DOC}");
        let out = repair(input.as_bytes()).unwrap();
        assert!(out.modified);
        assert_eq!(out.bytes, DOC.as_bytes());
    }

    #[test]
    fn transcodes_utf16_both_byte_orders() {
        let mut le = vec![0xFF, 0xFE];
        let mut be = vec![0xFE, 0xFF];
        for unit in DOC.encode_utf16() {
            le.extend_from_slice(&unit.to_le_bytes());
            be.extend_from_slice(&unit.to_be_bytes());
        }
        assert_eq!(repair(&le).unwrap().bytes, DOC.as_bytes());
        assert_eq!(repair(&be).unwrap().bytes, DOC.as_bytes());
    }

    #[test]
    fn unrepairable_input_fails() {
        assert!(repair(b"<ServerSettings><property").is_err());
        assert!(repair(&[0xFF, 0xFE, 0x3C]).is_err());
    }
}
