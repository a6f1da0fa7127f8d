use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use std::io::Cursor;

use super::Attributes;
use crate::error::FeedError;

/// The three primitives the publish protocol needs from an XML writer.
///
/// Any implementation that honours open/text/close nesting can stand in for
/// [`XmlWriter`]. The provided `write_element*` helpers encode the omission
/// rule: an element with no value and no attributes is skipped entirely.
pub trait ElementWriter {
    /// Writes `<name attr="..">`.
    fn open_element(&mut self, name: &str, attributes: &Attributes) -> Result<(), FeedError>;

    /// Writes escaped character data inside the current element.
    fn write_text(&mut self, content: &str) -> Result<(), FeedError>;

    /// Writes `</name>`.
    fn close_element(&mut self, name: &str) -> Result<(), FeedError>;

    /// Writes `<name>value</name>`, or nothing when `value` is `None`.
    fn write_element(&mut self, name: &str, value: Option<&str>) -> Result<(), FeedError> {
        self.write_element_with(name, value, &Attributes::new())
    }

    /// Writes `<name attrs>value</name>`.
    ///
    /// Skipped only when both `value` and `attributes` are empty. With
    /// attributes but no value the element is written without text content.
    fn write_element_with(
        &mut self,
        name: &str,
        value: Option<&str>,
        attributes: &Attributes,
    ) -> Result<(), FeedError> {
        if value.is_none() && attributes.is_empty() {
            return Ok(());
        }
        self.open_element(name, attributes)?;
        if let Some(value) = value {
            self.write_text(value)?;
        }
        self.close_element(name)
    }
}

/// [`ElementWriter`] backed by `quick-xml`, buffering into memory.
///
/// Output is UTF-8 and unindented. Empty elements are written as a start and
/// end tag pair, never self-closed.
pub struct XmlWriter {
    inner: Writer<Cursor<Vec<u8>>>,
}

impl XmlWriter {
    pub fn new() -> Self {
        Self {
            inner: Writer::new(Cursor::new(Vec::new())),
        }
    }

    /// Writes the `<?xml version="1.0" encoding="UTF-8"?>` declaration.
    pub fn start_document(&mut self) -> Result<(), FeedError> {
        self.write(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))
    }

    /// Consumes the writer and returns the buffered document.
    pub fn into_string(self) -> Result<String, FeedError> {
        let bytes = self.inner.into_inner().into_inner();
        Ok(String::from_utf8(bytes)?)
    }

    fn write(&mut self, event: Event<'_>) -> Result<(), FeedError> {
        self.inner
            .write_event(event)
            .map_err(|e| FeedError::Xml(e.to_string()))
    }
}

impl Default for XmlWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl ElementWriter for XmlWriter {
    fn open_element(&mut self, name: &str, attributes: &Attributes) -> Result<(), FeedError> {
        let mut start = BytesStart::new(name);
        for attr in attributes.iter() {
            start.push_attribute(attr);
        }
        self.write(Event::Start(start))
    }

    fn write_text(&mut self, content: &str) -> Result<(), FeedError> {
        self.write(Event::Text(BytesText::new(content)))
    }

    fn close_element(&mut self, name: &str) -> Result<(), FeedError> {
        self.write(Event::End(BytesEnd::new(name)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn render(f: impl FnOnce(&mut XmlWriter) -> Result<(), FeedError>) -> String {
        let mut writer = XmlWriter::new();
        f(&mut writer).unwrap();
        writer.into_string().unwrap()
    }

    #[test]
    fn test_simple_element() {
        let xml = render(|w| w.write_element("title", Some("Hello")));
        assert_eq!(xml, "<title>Hello</title>");
    }

    #[test]
    fn test_absent_value_is_omitted() {
        let xml = render(|w| w.write_element("language", None));
        assert_eq!(xml, "");
    }

    #[test]
    fn test_empty_string_is_kept() {
        let xml = render(|w| w.write_element("title", Some("")));
        assert_eq!(xml, "<title></title>");
    }

    #[test]
    fn test_attributes_without_text_are_not_self_closed() {
        let attrs = Attributes::new().with("href", "123");
        let xml = render(|w| w.write_element_with("itunes:image", None, &attrs));
        assert_eq!(xml, r#"<itunes:image href="123"></itunes:image>"#);
    }

    #[test]
    fn test_text_and_attributes_are_escaped() {
        let attrs = Attributes::new().with("url", "https://example.com/?a=1&b=\"2\"");
        let xml = render(|w| w.write_element_with("source", Some("A <b> & c"), &attrs));
        assert!(xml.contains("a=1&amp;b=&quot;2&quot;"));
        assert!(xml.contains(">A &lt;b&gt; &amp; c</source>"));
    }

    #[test]
    fn test_declaration() {
        let xml = render(|w| {
            w.start_document()?;
            w.open_element("rss", &Attributes::new().with("version", "2.0"))?;
            w.close_element("rss")
        });
        assert_eq!(
            xml,
            r#"<?xml version="1.0" encoding="UTF-8"?><rss version="2.0"></rss>"#
        );
    }
}
