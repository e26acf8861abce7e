//! # Element Tree
//!
//! A minimal owned tree built from quick-xml events. Names are stored as
//! local names; namespace prefixes and declarations are dropped.
//!
//! The declared encoding is honoured for ISO-8859-1 documents; anything else
//! must be UTF-8.

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use shared_types::decode_latin1;
use tracing::debug;

use crate::domain::EnvelopeError;

const UTF8_BOM: &[u8] = &[0xEF, 0xBB, 0xBF];
const LATIN1_LABELS: &[&str] = &["iso-8859-1", "iso8859-1", "iso_8859-1", "latin1", "latin-1", "l1"];

/// One element.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Element {
    /// Local name.
    pub name: String,
    /// Attributes by local name, in document order.
    pub attributes: Vec<(String, String)>,
    /// Child elements.
    pub children: Vec<Element>,
    text: String,
}

impl Element {
    /// Attribute value by local name.
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// First child named `name`.
    pub fn child(&self, name: &str) -> Option<&Element> {
        self.children.iter().find(|c| c.name == name)
    }

    /// All children named `name`.
    pub fn children_named<'s>(&'s self, name: &'s str) -> impl Iterator<Item = &'s Element> + 's {
        self.children.iter().filter(move |c| c.name == name)
    }

    /// Descend through `path`, taking the first match at each level.
    pub fn find(&self, path: &[&str]) -> Option<&Element> {
        path.iter().try_fold(self, |el, name| el.child(name))
    }

    /// Trimmed text content.
    pub fn text(&self) -> &str {
        self.text.trim()
    }

    /// Text of the child at `path`.
    pub fn text_at(&self, path: &[&str]) -> Option<&str> {
        self.find(path).map(Element::text)
    }

    /// Text of the child at `path`, or a `Malformed` error naming the path.
    pub fn require_text(&self, path: &[&str]) -> Result<&str, EnvelopeError> {
        self.text_at(path)
            .ok_or_else(|| EnvelopeError::malformed(path.join("/"), "missing element"))
    }

    /// Attribute `name`, or a `Malformed` error.
    pub fn require_attr(&self, name: &str) -> Result<&str, EnvelopeError> {
        self.attr(name)
            .ok_or_else(|| EnvelopeError::malformed(&self.name, format!("missing attribute {name}")))
    }

    fn from_start(start: &BytesStart<'_>) -> Result<Self, quick_xml::Error> {
        let mut attributes = Vec::new();
        for attr in start.attributes() {
            let attr = attr?;
            let raw = attr.key.as_ref();
            if raw == b"xmlns" || raw.starts_with(b"xmlns:") {
                continue;
            }
            let key = String::from_utf8_lossy(attr.key.local_name().as_ref()).into_owned();
            let value = attr.unescape_value()?.into_owned();
            attributes.push((key, value));
        }
        Ok(Self {
            name: String::from_utf8_lossy(start.local_name().as_ref()).into_owned(),
            attributes,
            children: Vec::new(),
            text: String::new(),
        })
    }
}

/// Parse a whole document into its root element.
///
/// # Errors
///
/// `EnvelopeError::UnparsableBody` for anything that is not one well-formed
/// element tree.
pub fn parse_document(bytes: &[u8]) -> Result<Element, EnvelopeError> {
    let unparsable = |reason: String| {
        debug!("[rl-03] Unparsable document: {}", reason);
        EnvelopeError::UnparsableBody {
            reason,
            body: String::from_utf8_lossy(bytes).into_owned(),
        }
    };

    let text = decode_document(bytes).map_err(&unparsable)?;
    let mut reader = Reader::from_str(&text);
    let mut stack: Vec<Element> = Vec::new();
    let mut root: Option<Element> = None;

    loop {
        match reader.read_event() {
            Ok(Event::Start(start)) => {
                stack.push(Element::from_start(&start).map_err(|e| unparsable(e.to_string()))?);
            }
            Ok(Event::Empty(start)) => {
                let element = Element::from_start(&start).map_err(|e| unparsable(e.to_string()))?;
                attach(&mut stack, &mut root, element).map_err(&unparsable)?;
            }
            Ok(Event::End(_)) => {
                let element = stack
                    .pop()
                    .ok_or_else(|| unparsable("unbalanced end tag".to_string()))?;
                attach(&mut stack, &mut root, element).map_err(&unparsable)?;
            }
            Ok(Event::Text(t)) => {
                if let Some(top) = stack.last_mut() {
                    let value = t.unescape().map_err(|e| unparsable(e.to_string()))?;
                    top.text.push_str(&value);
                }
            }
            Ok(Event::CData(c)) => {
                if let Some(top) = stack.last_mut() {
                    top.text.push_str(&String::from_utf8_lossy(&c));
                }
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(e) => return Err(unparsable(e.to_string())),
        }
    }

    if !stack.is_empty() {
        return Err(unparsable("unexpected end of document".to_string()));
    }
    root.ok_or_else(|| unparsable("no root element".to_string()))
}

fn attach(stack: &mut [Element], root: &mut Option<Element>, element: Element) -> Result<(), String> {
    match stack.last_mut() {
        Some(parent) => parent.children.push(element),
        None if root.is_none() => *root = Some(element),
        None => return Err(format!("second root element {}", element.name)),
    }
    Ok(())
}

fn decode_document(bytes: &[u8]) -> Result<String, String> {
    let bytes = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);
    match declared_encoding(bytes) {
        Some(label) if LATIN1_LABELS.contains(&label.as_str()) => Ok(decode_latin1(bytes)),
        _ => String::from_utf8(bytes.to_vec()).map_err(|e| format!("invalid UTF-8: {e}")),
    }
}

/// Encoding label of the XML declaration, lower-cased.
fn declared_encoding(bytes: &[u8]) -> Option<String> {
    if !bytes.starts_with(b"<?xml") {
        return None;
    }
    let end = bytes.windows(2).position(|w| w == b"?>")?;
    let decl = std::str::from_utf8(&bytes[..end]).ok()?;
    let rest = &decl[decl.find("encoding")? + "encoding".len()..];
    let rest = rest.trim_start().strip_prefix('=')?.trim_start();
    let quote = rest.chars().next().filter(|c| *c == '"' || *c == '\'')?;
    let value = &rest[1..];
    Some(value[..value.find(quote)?].to_ascii_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_local_names_and_attributes() {
        let doc = br#"<?xml version="1.0" encoding="UTF-8"?>
<a:Root xmlns:a="urn:a" xmlns="urn:d" a:version="1.4">
  <a:Child id="1">one &amp; two</a:Child>
  <Child id="2"/>
</a:Root>"#;
        let root = parse_document(doc).unwrap();
        assert_eq!(root.name, "Root");
        assert_eq!(root.attributes, vec![("version".to_string(), "1.4".to_string())]);
        assert_eq!(root.children_named("Child").count(), 2);
        assert_eq!(root.child("Child").unwrap().text(), "one & two");
        assert_eq!(root.children[1].attr("id"), Some("2"));
    }

    #[test]
    fn test_latin1_declaration_is_honoured() {
        let mut doc = b"<?xml version='1.0' encoding='ISO-8859-1'?><n>M".to_vec();
        doc.push(0xFC);
        doc.extend_from_slice(b"ller &#8364;</n>");
        let root = parse_document(&doc).unwrap();
        assert_eq!(root.text(), "Müller €");
    }

    #[test]
    fn test_find_and_require() {
        let root = parse_document(b"<a><b><c>x</c></b></a>").unwrap();
        assert_eq!(root.text_at(&["b", "c"]), Some("x"));
        assert!(root.find(&["b", "d"]).is_none());
        assert!(matches!(
            root.require_text(&["b", "d"]),
            Err(EnvelopeError::Malformed { element, .. }) if element == "b/d"
        ));
        assert!(root.require_attr("id").is_err());
    }

    #[test]
    fn test_garbage_is_unparsable() {
        let bodies: [&[u8]; 4] = [b"<html><body>oops", b"not xml at all", b"<a></b>", b""];
        for body in bodies {
            let err = parse_document(body).unwrap_err();
            assert!(matches!(err, EnvelopeError::UnparsableBody { .. }), "{body:?}");
        }
    }

    #[test]
    fn test_unparsable_keeps_body() {
        match parse_document(b"<a>") {
            Err(EnvelopeError::UnparsableBody { body, .. }) => assert_eq!(body, "<a>"),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_declared_encoding() {
        assert_eq!(
            declared_encoding(b"<?xml version=\"1.0\" encoding = \"Latin1\"?>").as_deref(),
            Some("latin1")
        );
        assert_eq!(declared_encoding(b"<?xml version=\"1.0\"?>"), None);
        assert_eq!(declared_encoding(b"<a/>"), None);
    }
}
