use chrono::NaiveDateTime;

use super::Categories;
use crate::error::{require, FeedError};
use crate::extension::{Extension, ExtensionScope};
use crate::util::format_date;
use crate::xml::{Attributes, ElementWriter, Publish, Sealed};

// ============================================================================
// Item
// ============================================================================

/// One story of the channel.
///
/// At least one of `title` or `description` must be present. Child elements
/// are written in this order: title, link, description, author, dc:creator,
/// categories, comments, pubDate, enclosure, guid, source, extensions.
#[derive(Debug)]
pub struct Item {
    title: Option<String>,
    link: Option<String>,
    description: Option<String>,
    author: Option<String>,
    creator: Option<String>,
    categories: Categories,
    comments: Option<String>,
    pub_date: Option<NaiveDateTime>,
    enclosure: Option<Enclosure>,
    guid: Option<Guid>,
    source: Option<Source>,
    extensions: Vec<Extension>,
}

impl Item {
    pub fn builder() -> ItemBuilder {
        ItemBuilder::default()
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Dublin Core creator, written as `<dc:creator>`.
    pub fn creator(&self) -> Option<&str> {
        self.creator.as_deref()
    }

    pub fn categories(&self) -> &Categories {
        &self.categories
    }

    pub fn extensions(&self) -> &[Extension] {
        &self.extensions
    }

    /// Appends an extension, rejecting channel-only ones.
    pub fn add_extension(&mut self, extension: impl Into<Extension>) -> Result<(), FeedError> {
        let extension = extension.into();
        check_item_scope(&extension)?;
        self.extensions.push(extension);
        Ok(())
    }
}

fn check_item_scope(extension: &Extension) -> Result<(), FeedError> {
    if extension.scope() == ExtensionScope::Channel {
        return Err(FeedError::InvalidExtension(format!(
            "{} can only be attached to a channel",
            extension.kind()
        )));
    }
    Ok(())
}

#[derive(Debug, Default)]
#[must_use]
pub struct ItemBuilder {
    title: Option<String>,
    link: Option<String>,
    description: Option<String>,
    author: Option<String>,
    creator: Option<String>,
    categories: Categories,
    comments: Option<String>,
    pub_date: Option<NaiveDateTime>,
    enclosure: Option<Enclosure>,
    guid: Option<Guid>,
    source: Option<Source>,
    extensions: Vec<Extension>,
}

impl ItemBuilder {
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn link(mut self, link: impl Into<String>) -> Self {
        self.link = Some(link.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Email address of the author.
    pub fn author(mut self, author: impl Into<String>) -> Self {
        self.author = Some(author.into());
        self
    }

    pub fn creator(mut self, creator: impl Into<String>) -> Self {
        self.creator = Some(creator.into());
        self
    }

    /// Adds categories; accepts a name, a [`Category`](super::Category), or a
    /// list of either.
    pub fn categories(mut self, categories: impl Into<Categories>) -> Self {
        self.categories.extend(categories.into());
        self
    }

    pub fn comments(mut self, comments: impl Into<String>) -> Self {
        self.comments = Some(comments.into());
        self
    }

    /// Publication date, in GMT.
    pub fn pub_date(mut self, date: NaiveDateTime) -> Self {
        self.pub_date = Some(date);
        self
    }

    pub fn enclosure(mut self, enclosure: Enclosure) -> Self {
        self.enclosure = Some(enclosure);
        self
    }

    pub fn guid(mut self, guid: Guid) -> Self {
        self.guid = Some(guid);
        self
    }

    pub fn source(mut self, source: Source) -> Self {
        self.source = Some(source);
        self
    }

    pub fn extension(mut self, extension: impl Into<Extension>) -> Self {
        self.extensions.push(extension.into());
        self
    }

    pub fn build(self) -> Result<Item, FeedError> {
        if self.title.is_none() && self.description.is_none() {
            return Err(FeedError::EitherElementRequired("title", "description"));
        }
        for extension in &self.extensions {
            check_item_scope(extension)?;
        }

        Ok(Item {
            title: self.title,
            link: self.link,
            description: self.description,
            author: self.author,
            creator: self.creator,
            categories: self.categories,
            comments: self.comments,
            pub_date: self.pub_date,
            enclosure: self.enclosure,
            guid: self.guid,
            source: self.source,
            extensions: self.extensions,
        })
    }
}

impl Sealed for Item {}

impl Publish for Item {
    fn publish(&self, writer: &mut dyn ElementWriter) -> Result<(), FeedError> {
        writer.open_element("item", &Attributes::new())?;

        writer.write_element("title", self.title.as_deref())?;
        writer.write_element("link", self.link.as_deref())?;
        writer.write_element("description", self.description.as_deref())?;
        writer.write_element("author", self.author.as_deref())?;
        writer.write_element("dc:creator", self.creator.as_deref())?;
        self.categories.publish(writer)?;
        writer.write_element("comments", self.comments.as_deref())?;
        writer.write_element("pubDate", format_date(self.pub_date.as_ref()).as_deref())?;

        if let Some(enclosure) = &self.enclosure {
            enclosure.publish(writer)?;
        }
        if let Some(guid) = &self.guid {
            guid.publish(writer)?;
        }
        if let Some(source) = &self.source {
            source.publish(writer)?;
        }
        for extension in &self.extensions {
            extension.publish(writer)?;
        }

        writer.close_element("item")
    }
}

// ============================================================================
// Enclosure
// ============================================================================

/// Media object attached to an item. All three fields are required.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Enclosure {
    url: String,
    length: u64,
    mime_type: String,
}

impl Enclosure {
    pub fn builder() -> EnclosureBuilder {
        EnclosureBuilder::default()
    }
}

#[derive(Debug, Default)]
#[must_use]
pub struct EnclosureBuilder {
    url: Option<String>,
    length: Option<u64>,
    mime_type: Option<String>,
}

impl EnclosureBuilder {
    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    /// Size in bytes.
    pub fn length(mut self, length: u64) -> Self {
        self.length = Some(length);
        self
    }

    /// MIME type, written as the `type` attribute.
    pub fn mime_type(mut self, mime_type: impl Into<String>) -> Self {
        self.mime_type = Some(mime_type.into());
        self
    }

    pub fn build(self) -> Result<Enclosure, FeedError> {
        let url = require(self.url, "url")?;
        let length = require(self.length, "length")?;
        let mime_type = require(self.mime_type, "type")?;
        Ok(Enclosure {
            url,
            length,
            mime_type,
        })
    }
}

impl Sealed for Enclosure {}

impl Publish for Enclosure {
    fn publish(&self, writer: &mut dyn ElementWriter) -> Result<(), FeedError> {
        let attrs = Attributes::new()
            .with("url", self.url.as_str())
            .with("length", self.length.to_string())
            .with("type", self.mime_type.as_str());
        writer.write_element_with("enclosure", None, &attrs)
    }
}

// ============================================================================
// Guid
// ============================================================================

/// Unique identifier of an item.
///
/// `isPermaLink` defaults to `true`, and an explicit `None` also resolves to
/// `true`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Guid {
    value: String,
    is_perma_link: bool,
}

impl Guid {
    /// A permalink guid.
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            is_perma_link: true,
        }
    }

    pub fn builder() -> GuidBuilder {
        GuidBuilder::default()
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn is_perma_link(&self) -> bool {
        self.is_perma_link
    }
}

#[derive(Debug, Default)]
#[must_use]
pub struct GuidBuilder {
    value: Option<String>,
    is_perma_link: Option<bool>,
}

impl GuidBuilder {
    pub fn value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }

    pub fn is_perma_link(mut self, is_perma_link: impl Into<Option<bool>>) -> Self {
        self.is_perma_link = is_perma_link.into();
        self
    }

    pub fn build(self) -> Result<Guid, FeedError> {
        let value = require(self.value, "guid")?;
        Ok(Guid {
            value,
            is_perma_link: self.is_perma_link.unwrap_or(true),
        })
    }
}

impl Sealed for Guid {}

impl Publish for Guid {
    fn publish(&self, writer: &mut dyn ElementWriter) -> Result<(), FeedError> {
        let attrs = Attributes::new().with("isPermaLink", self.is_perma_link.to_string());
        writer.write_element_with("guid", Some(&self.value), &attrs)
    }
}

// ============================================================================
// Source
// ============================================================================

/// The channel an item was republished from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Source {
    name: String,
    url: String,
}

impl Source {
    pub fn builder() -> SourceBuilder {
        SourceBuilder::default()
    }
}

#[derive(Debug, Default)]
#[must_use]
pub struct SourceBuilder {
    name: Option<String>,
    url: Option<String>,
}

impl SourceBuilder {
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    pub fn build(self) -> Result<Source, FeedError> {
        let name = require(self.name, "name")?;
        let url = require(self.url, "url")?;
        Ok(Source { name, url })
    }
}

impl Sealed for Source {}

impl Publish for Source {
    fn publish(&self, writer: &mut dyn ElementWriter) -> Result<(), FeedError> {
        let attrs = Attributes::new().with("url", self.url.as_str());
        writer.write_element_with("source", Some(&self.name), &attrs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rss::Category;
    use crate::xml::XmlWriter;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    fn render(node: &dyn Publish) -> String {
        let mut writer = XmlWriter::new();
        node.publish(&mut writer).unwrap();
        writer.into_string().unwrap()
    }

    #[test]
    fn test_item_requires_title_or_description() {
        let err = Item::builder().link("https://example.com").build().unwrap_err();
        assert!(matches!(
            err,
            FeedError::EitherElementRequired("title", "description")
        ));
        let msg = err.to_string();
        assert!(msg.contains("title") && msg.contains("description"));
    }

    #[test]
    fn test_item_title_alone_is_enough() {
        assert!(Item::builder().title("t").build().is_ok());
        assert!(Item::builder().description("d").build().is_ok());
    }

    #[test]
    fn test_item_minimal_output() {
        let item = Item::builder().title("My title").build().unwrap();
        assert_eq!(render(&item), "<item><title>My title</title></item>");
    }

    #[test]
    fn test_item_element_order() {
        let date = NaiveDate::from_ymd_opt(2014, 11, 13)
            .unwrap()
            .and_hms_opt(8, 0, 0)
            .unwrap();
        let item = Item::builder()
            .source(Source::builder().name("S").url("https://s").build().unwrap())
            .guid(Guid::new("g"))
            .enclosure(
                Enclosure::builder()
                    .url("https://e/a.mp3")
                    .length(1)
                    .mime_type("audio/mpeg")
                    .build()
                    .unwrap(),
            )
            .pub_date(date)
            .comments("c")
            .categories(Category::new("cat"))
            .creator("Sample Example")
            .author("a@example.com")
            .description("d")
            .link("l")
            .title("t")
            .build()
            .unwrap();

        let expected = concat!(
            "<item>",
            "<title>t</title>",
            "<link>l</link>",
            "<description>d</description>",
            "<author>a@example.com</author>",
            "<dc:creator>Sample Example</dc:creator>",
            "<category>cat</category>",
            "<comments>c</comments>",
            "<pubDate>Thu, 13 Nov 2014 08:00:00 GMT</pubDate>",
            r#"<enclosure url="https://e/a.mp3" length="1" type="audio/mpeg"></enclosure>"#,
            r#"<guid isPermaLink="true">g</guid>"#,
            r#"<source url="https://s">S</source>"#,
            "</item>",
        );
        assert_eq!(render(&item), expected);
    }

    #[test]
    fn test_enclosure_required_fields() {
        let err = Enclosure::builder().length(1).mime_type("t").build().unwrap_err();
        assert_eq!(err.fields(), vec!["url"]);
        let err = Enclosure::builder().url("u").mime_type("t").build().unwrap_err();
        assert_eq!(err.fields(), vec!["length"]);
        let err = Enclosure::builder().url("u").length(1).build().unwrap_err();
        assert_eq!(err.fields(), vec!["type"]);
    }

    #[test]
    fn test_guid_defaults_to_permalink() {
        assert!(Guid::new("123").is_perma_link());
        assert!(Guid::builder().value("123").build().unwrap().is_perma_link());
        let guid = Guid::builder().value("123").is_perma_link(None).build().unwrap();
        assert!(guid.is_perma_link());
    }

    #[test]
    fn test_guid_not_permalink() {
        let guid = Guid::builder().value("123").is_perma_link(false).build().unwrap();
        assert_eq!(render(&guid), r#"<guid isPermaLink="false">123</guid>"#);
    }

    #[test]
    fn test_guid_requires_value() {
        let err = Guid::builder().is_perma_link(true).build().unwrap_err();
        assert_eq!(err.fields(), vec!["guid"]);
    }

    #[test]
    fn test_source_required_fields() {
        let err = Source::builder().url("123").build().unwrap_err();
        assert_eq!(err.fields(), vec!["name"]);
        let err = Source::builder().name("123").build().unwrap_err();
        assert_eq!(err.fields(), vec!["url"]);
    }
}
