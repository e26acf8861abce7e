//! # XML Writer
//!
//! Thin wrapper over `quick_xml::Writer` producing ISO-8859-1 documents.
//!
//! quick-xml writes UTF-8; `finish` re-encodes the document and turns every
//! character above U+00FF into a numeric character reference.

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use shared_types::escape_to_latin1;

use crate::domain::EnvelopeError;

/// Encoding named in the XML declaration.
pub const DOCUMENT_ENCODING: &str = "ISO-8859-1";

/// Element-level XML writer.
pub struct XmlWriter {
    inner: Writer<Vec<u8>>,
}

impl XmlWriter {
    /// New document with an ISO-8859-1 declaration.
    pub fn new() -> Result<Self, EnvelopeError> {
        let mut writer = Self {
            inner: Writer::new(Vec::new()),
        };
        writer.event(Event::Decl(BytesDecl::new("1.0", Some(DOCUMENT_ENCODING), None)))?;
        Ok(writer)
    }

    fn event(&mut self, event: Event<'_>) -> Result<(), EnvelopeError> {
        self.inner.write_event(event).map_err(EnvelopeError::write)
    }

    fn start<'a>(name: &'a str, attrs: &[(&'a str, &'a str)]) -> BytesStart<'a> {
        let mut start = BytesStart::new(name);
        for &(key, value) in attrs {
            start.push_attribute((key, value));
        }
        start
    }

    /// Open `name`.
    pub fn open(&mut self, name: &str, attrs: &[(&str, &str)]) -> Result<(), EnvelopeError> {
        self.event(Event::Start(Self::start(name, attrs)))
    }

    /// Close `name`.
    pub fn close(&mut self, name: &str) -> Result<(), EnvelopeError> {
        self.event(Event::End(BytesEnd::new(name)))
    }

    /// Self-closing element.
    pub fn empty(&mut self, name: &str, attrs: &[(&str, &str)]) -> Result<(), EnvelopeError> {
        self.event(Event::Empty(Self::start(name, attrs)))
    }

    /// Element holding only text.
    pub fn leaf(&mut self, name: &str, attrs: &[(&str, &str)], text: &str) -> Result<(), EnvelopeError> {
        self.open(name, attrs)?;
        self.event(Event::Text(BytesText::new(text)))?;
        self.close(name)
    }

    /// Finish the document as ISO-8859-1 bytes.
    pub fn finish(self) -> Result<Vec<u8>, EnvelopeError> {
        let utf8 = String::from_utf8(self.inner.into_inner()).map_err(EnvelopeError::write)?;
        Ok(escape_to_latin1(&utf8))
    }
}
