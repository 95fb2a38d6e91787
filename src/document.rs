use crate::error::{ConfigError, ParseError};
use crate::statics;
use indexmap::IndexMap;
use quick_xml::{
    Reader, Writer,
    events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event, attributes::AttrError},
};

/// Handle to a `property` element inside a [`ConfigDocument`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

/// A parsed `serverconfig.xml`.
///
/// Every event of the source (declaration, comments, whitespace, unknown
/// elements) is kept in `nodes`, so writing the document back only changes the
/// `property` elements whose values were edited. `index` maps a property name
/// to the slot of its element in `nodes`; both are only mutated together.
#[derive(Debug, Clone)]
pub struct ConfigDocument {
    nodes: Vec<Event<'static>>,
    index: IndexMap<String, usize>,
    // Slot of the root element's closing tag; new properties are inserted here.
    root_end: usize,
}

impl ConfigDocument {
    pub fn parse(bytes: &[u8]) -> Result<Self, ParseError> {
        let text = std::str::from_utf8(bytes)
            .map_err(|e| ParseError(format!("document is not valid UTF-8: {e}")))?;
        let mut reader = Reader::from_str(text);

        let mut nodes: Vec<Event<'static>> = Vec::new();
        let mut depth = 0usize;
        let mut root_seen = false;
        let mut root_end = None;

        loop {
            let event = reader.read_event().map_err(|e| {
                ParseError(format!(
                    "malformed XML at byte {}: {e}",
                    reader.buffer_position()
                ))
            })?;

            match &event {
                Event::Eof => break,
                Event::Decl(_) => {
                    if !nodes.is_empty() {
                        return Err(ParseError(
                            "XML declaration is not at the start of the document".to_string(),
                        ));
                    }
                }
                Event::Start(start) => {
                    check_attributes(start)?;
                    if depth == 0 {
                        if root_seen {
                            return Err(ParseError("multiple root elements".to_string()));
                        }
                        root_seen = true;
                    }
                    depth += 1;
                }
                Event::Empty(start) => {
                    check_attributes(start)?;
                    if depth == 0 {
                        if root_seen {
                            return Err(ParseError("multiple root elements".to_string()));
                        }
                        root_seen = true;
                        // Expand `<Root/>` so there is a closing tag to append before.
                        let name = String::from_utf8_lossy(start.name().as_ref()).into_owned();
                        nodes.push(Event::Start(start.to_owned()));
                        root_end = Some(nodes.len());
                        nodes.push(Event::End(BytesEnd::new(name)));
                        continue;
                    }
                }
                Event::End(_) => {
                    depth = depth.checked_sub(1).ok_or_else(|| {
                        ParseError("closing tag without matching opening tag".to_string())
                    })?;
                    if depth == 0 {
                        root_end = Some(nodes.len());
                    }
                }
                Event::Text(content) => {
                    content
                        .unescape()
                        .map_err(|e| ParseError(format!("bad character data: {e}")))?;
                    if depth == 0 && !content.iter().all(u8::is_ascii_whitespace) {
                        return Err(ParseError(
                            "text content outside of the root element".to_string(),
                        ));
                    }
                }
                Event::CData(_) if depth == 0 => {
                    return Err(ParseError(
                        "character data outside of the root element".to_string(),
                    ));
                }
                _ => {}
            }

            nodes.push(event.into_owned());
        }

        if depth != 0 {
            return Err(ParseError("unexpected end of document".to_string()));
        }
        let Some(root_end) = root_end else {
            return Err(ParseError("document has no root element".to_string()));
        };

        let mut doc = Self {
            nodes,
            index: IndexMap::new(),
            root_end,
        };
        doc.rebuild_index();
        Ok(doc)
    }

    /// Re-scan all `property` elements. Elements without a `name` are skipped;
    /// for duplicate names the last element wins.
    fn rebuild_index(&mut self) {
        self.index.clear();
        for (slot, node) in self.nodes.iter().enumerate() {
            let Some(start) = property_start(node) else {
                continue;
            };
            if let Some(name) = attribute(start, statics::XML_ATTR_NAME)
                && !name.is_empty()
            {
                self.index.insert(name, slot);
            }
        }
        tracing::debug!(properties = self.index.len(), "indexed property elements");
    }

    /// Number of named `property` elements.
    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn node_id(&self, name: &str) -> Option<NodeId> {
        self.index.get(name).copied().map(NodeId)
    }

    /// Property names in document order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.index.keys().map(String::as_str)
    }

    /// The `value` attribute of `name`; an element without one reads as `""`.
    pub fn value_of(&self, name: &str) -> Option<String> {
        let slot = *self.index.get(name)?;
        let start = property_start(&self.nodes[slot])?;
        Some(attribute(start, statics::XML_ATTR_VALUE).unwrap_or_default())
    }

    /// Every named property with its value, in document order.
    pub fn values(&self) -> IndexMap<String, String> {
        self.index
            .keys()
            .filter_map(|name| Some((name.clone(), self.value_of(name)?)))
            .collect()
    }

    /// Overwrite the value of an existing element in place, or append a new
    /// `<property name=".." value=".."/>` to the root. Returns `true` when a
    /// new element was appended.
    pub fn set_value(&mut self, name: &str, value: &str) -> Result<bool, ConfigError> {
        if let Some(&slot) = self.index.get(name) {
            if self.value_of(name).as_deref() == Some(value) {
                return Ok(false);
            }
            let updated = match &self.nodes[slot] {
                Event::Empty(start) => Event::Empty(with_value(start, value)?),
                Event::Start(start) => Event::Start(with_value(start, value)?),
                _ => return Err(ConfigError::Serialize(format!("{name} is not an element"))),
            };
            self.nodes[slot] = updated;
            return Ok(false);
        }

        let mut start = BytesStart::new(statics::XML_PROPERTY);
        start.push_attribute((statics::XML_ATTR_NAME, name));
        start.push_attribute((statics::XML_ATTR_VALUE, value));

        let at = self.root_end;
        self.nodes.insert(at, Event::Text(BytesText::new("\n")));
        self.nodes.insert(at, Event::Empty(start));
        self.nodes.insert(at, Event::Text(BytesText::new("\t")));
        self.index.insert(name.to_string(), at + 1);
        self.root_end += 3;
        Ok(true)
    }

    /// Serialize with a UTF-8 XML declaration, replacing the source one if any.
    pub fn to_bytes(&self) -> Result<Vec<u8>, ConfigError> {
        let mut writer = Writer::new(Vec::new());

        writer
            .write_event(Event::Decl(BytesDecl::new(
                statics::XML_VERSION,
                Some(statics::XML_ENCODING),
                None,
            )))
            .map_err(serialize_error)?;

        let mut nodes = self.nodes.iter().peekable();
        match nodes.peek() {
            Some(Event::Decl(_)) => {
                nodes.next();
            }
            _ => writer
                .write_event(Event::Text(BytesText::new("\n")))
                .map_err(serialize_error)?,
        }

        for node in nodes {
            writer.write_event(node.borrow()).map_err(serialize_error)?;
        }
        Ok(writer.into_inner())
    }
}

fn serialize_error(e: impl std::fmt::Display) -> ConfigError {
    ConfigError::Serialize(e.to_string())
}

fn property_start<'a>(node: &'a Event<'static>) -> Option<&'a BytesStart<'static>> {
    match node {
        Event::Start(start) | Event::Empty(start)
            if start.name().as_ref() == statics::XML_PROPERTY.as_bytes() =>
        {
            Some(start)
        }
        _ => None,
    }
}

fn attribute(start: &BytesStart<'_>, key: &str) -> Option<String> {
    let attr = start.try_get_attribute(key).ok()??;
    attr.unescape_value().ok().map(|v| v.into_owned())
}

fn check_attributes(start: &BytesStart<'_>) -> Result<(), ParseError> {
    for attr in start.attributes() {
        let attr = attr.map_err(|e| ParseError(format!("bad attribute: {e}")))?;
        attr.unescape_value()
            .map_err(|e| ParseError(format!("bad attribute value: {e}")))?;
    }
    Ok(())
}

fn with_value(start: &BytesStart<'_>, value: &str) -> Result<BytesStart<'static>, ConfigError> {
    let mut updated = start.to_owned();
    updated.clear_attributes();

    let mut replaced = false;
    for attr in start.attributes() {
        let attr = attr.map_err(|e: AttrError| ConfigError::Serialize(e.to_string()))?;
        if attr.key.as_ref() == statics::XML_ATTR_VALUE.as_bytes() {
            updated.push_attribute((statics::XML_ATTR_VALUE, value));
            replaced = true;
        } else {
            updated.push_attribute(attr);
        }
    }
    if !replaced {
        updated.push_attribute((statics::XML_ATTR_VALUE, value));
    }
    Ok(updated)
}
