use chrono::NaiveDateTime;

use super::{Categories, Item};
use crate::config;
use crate::error::{require, FeedError};
use crate::extension::{self, Extension, ExtensionScope};
use crate::util::format_date;
use crate::xml::{Attributes, ElementWriter, Publish, Sealed, XmlWriter};

/// RSS version written on the root element.
pub const RSS_VERSION: &str = "2.0";

/// Namespace declared when any item carries a `dc:creator`.
pub const DUBLIN_CORE_NAMESPACE: (&str, &str) = ("xmlns:dc", "http://purl.org/dc/elements/1.1/");

// ============================================================================
// Feed
// ============================================================================

/// The RSS channel and root of the feed graph.
///
/// `title`, `link` and `description` are required. `generator` and `docs`
/// fall back to the process-wide defaults from [`config::defaults`].
#[derive(Debug)]
pub struct Feed {
    title: String,
    link: String,
    description: String,
    language: Option<String>,
    copyright: Option<String>,
    managing_editor: Option<String>,
    web_master: Option<String>,
    pub_date: Option<NaiveDateTime>,
    last_build_date: Option<NaiveDateTime>,
    generator: String,
    docs: String,
    cloud: Option<Cloud>,
    ttl: Option<u32>,
    rating: Option<String>,
    categories: Categories,
    image: Option<Image>,
    text_input: Option<TextInput>,
    skip_hours: Option<SkipHours>,
    skip_days: Option<SkipDays>,
    items: Vec<Item>,
    extensions: Vec<Extension>,
}

impl Feed {
    pub fn builder() -> FeedBuilder {
        FeedBuilder::default()
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn generator(&self) -> &str {
        &self.generator
    }

    pub fn docs(&self) -> &str {
        &self.docs
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn extensions(&self) -> &[Extension] {
        &self.extensions
    }

    pub fn add_item(&mut self, item: Item) {
        self.items.push(item);
    }

    /// Appends a channel extension, rejecting item-only ones.
    pub fn add_extension(&mut self, extension: impl Into<Extension>) -> Result<(), FeedError> {
        let extension = extension.into();
        check_channel_scope(&extension)?;
        self.extensions.push(extension);
        Ok(())
    }

    /// Attributes of the `<rss>` element.
    ///
    /// `version` first, then the namespace declarations of the channel
    /// extensions, then those needed by the items (Dublin Core for
    /// `dc:creator`, then each item's extensions) in document order. A name
    /// declared twice keeps its first position and takes the last value.
    pub fn root_attributes(&self) -> Attributes {
        let mut attrs = Attributes::new().with("version", RSS_VERSION);
        extension::merge_namespaces(&mut attrs, &self.extensions);
        for item in &self.items {
            if item.creator().is_some() {
                let (name, uri) = DUBLIN_CORE_NAMESPACE;
                attrs.insert(name, uri);
            }
            extension::merge_namespaces(&mut attrs, item.extensions());
        }
        attrs
    }

    /// Serializes the whole feed to an XML document.
    ///
    /// Fails without producing output if any node fails to publish, for
    /// example a GeoRSS extension with malformed coordinates.
    pub fn to_xml(&self) -> Result<String, FeedError> {
        let mut writer = XmlWriter::new();
        self.write_document(&mut writer)?;
        writer.into_string()
    }

    /// Drives `writer` through the complete document, declaration included.
    pub fn write_document(&self, writer: &mut XmlWriter) -> Result<(), FeedError> {
        tracing::debug!(
            title = %self.title,
            items = self.items.len(),
            extensions = self.extensions.len(),
            "Serializing feed"
        );
        writer.start_document()?;
        writer.open_element("rss", &self.root_attributes())?;
        self.publish(writer)?;
        writer.close_element("rss")
    }
}

fn check_channel_scope(extension: &Extension) -> Result<(), FeedError> {
    if extension.scope() == ExtensionScope::Item {
        return Err(FeedError::InvalidExtension(format!(
            "{} can only be attached to an item",
            extension.kind()
        )));
    }
    Ok(())
}

impl Sealed for Feed {}

impl Publish for Feed {
    /// Writes `<channel>` and everything below it.
    fn publish(&self, writer: &mut dyn ElementWriter) -> Result<(), FeedError> {
        writer.open_element("channel", &Attributes::new())?;

        writer.write_element("title", Some(&self.title))?;
        writer.write_element("link", Some(&self.link))?;
        writer.write_element("description", Some(&self.description))?;
        writer.write_element("language", self.language.as_deref())?;
        writer.write_element("copyright", self.copyright.as_deref())?;
        writer.write_element("managingEditor", self.managing_editor.as_deref())?;
        writer.write_element("webMaster", self.web_master.as_deref())?;
        writer.write_element("pubDate", format_date(self.pub_date.as_ref()).as_deref())?;
        writer.write_element(
            "lastBuildDate",
            format_date(self.last_build_date.as_ref()).as_deref(),
        )?;
        writer.write_element("generator", Some(&self.generator))?;
        writer.write_element("docs", Some(&self.docs))?;
        if let Some(cloud) = &self.cloud {
            cloud.publish(writer)?;
        }
        writer.write_element("ttl", self.ttl.map(|t| t.to_string()).as_deref())?;
        writer.write_element("rating", self.rating.as_deref())?;
        self.categories.publish(writer)?;
        if let Some(image) = &self.image {
            image.publish(writer)?;
        }
        if let Some(text_input) = &self.text_input {
            text_input.publish(writer)?;
        }
        if let Some(skip_hours) = &self.skip_hours {
            skip_hours.publish(writer)?;
        }
        if let Some(skip_days) = &self.skip_days {
            skip_days.publish(writer)?;
        }
        for item in &self.items {
            item.publish(writer)?;
        }
        for extension in &self.extensions {
            extension.publish(writer)?;
        }

        writer.close_element("channel")
    }
}

#[derive(Debug, Default)]
#[must_use]
pub struct FeedBuilder {
    title: Option<String>,
    link: Option<String>,
    description: Option<String>,
    language: Option<String>,
    copyright: Option<String>,
    managing_editor: Option<String>,
    web_master: Option<String>,
    pub_date: Option<NaiveDateTime>,
    last_build_date: Option<NaiveDateTime>,
    generator: Option<String>,
    docs: Option<String>,
    cloud: Option<Cloud>,
    ttl: Option<u32>,
    rating: Option<String>,
    categories: Categories,
    image: Option<Image>,
    text_input: Option<TextInput>,
    skip_hours: Option<SkipHours>,
    skip_days: Option<SkipDays>,
    items: Vec<Item>,
    extensions: Vec<Extension>,
}

impl FeedBuilder {
    /// Name of the channel.
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// URL of the website the channel corresponds to.
    pub fn link(mut self, link: impl Into<String>) -> Self {
        self.link = Some(link.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    pub fn copyright(mut self, copyright: impl Into<String>) -> Self {
        self.copyright = Some(copyright.into());
        self
    }

    pub fn managing_editor(mut self, managing_editor: impl Into<String>) -> Self {
        self.managing_editor = Some(managing_editor.into());
        self
    }

    pub fn web_master(mut self, web_master: impl Into<String>) -> Self {
        self.web_master = Some(web_master.into());
        self
    }

    /// Publication date, in GMT.
    pub fn pub_date(mut self, date: NaiveDateTime) -> Self {
        self.pub_date = Some(date);
        self
    }

    /// Last time the content changed, in GMT.
    pub fn last_build_date(mut self, date: NaiveDateTime) -> Self {
        self.last_build_date = Some(date);
        self
    }

    pub fn generator(mut self, generator: impl Into<String>) -> Self {
        self.generator = Some(generator.into());
        self
    }

    pub fn docs(mut self, docs: impl Into<String>) -> Self {
        self.docs = Some(docs.into());
        self
    }

    pub fn cloud(mut self, cloud: Cloud) -> Self {
        self.cloud = Some(cloud);
        self
    }

    /// Minutes the channel may be cached.
    pub fn ttl(mut self, ttl: u32) -> Self {
        self.ttl = Some(ttl);
        self
    }

    /// PICS rating.
    pub fn rating(mut self, rating: impl Into<String>) -> Self {
        self.rating = Some(rating.into());
        self
    }

    pub fn categories(mut self, categories: impl Into<Categories>) -> Self {
        self.categories.extend(categories.into());
        self
    }

    pub fn image(mut self, image: Image) -> Self {
        self.image = Some(image);
        self
    }

    pub fn text_input(mut self, text_input: TextInput) -> Self {
        self.text_input = Some(text_input);
        self
    }

    pub fn skip_hours(mut self, skip_hours: SkipHours) -> Self {
        self.skip_hours = Some(skip_hours);
        self
    }

    pub fn skip_days(mut self, skip_days: SkipDays) -> Self {
        self.skip_days = Some(skip_days);
        self
    }

    pub fn item(mut self, item: Item) -> Self {
        self.items.push(item);
        self
    }

    pub fn items(mut self, items: impl IntoIterator<Item = Item>) -> Self {
        self.items.extend(items);
        self
    }

    pub fn extension(mut self, extension: impl Into<Extension>) -> Self {
        self.extensions.push(extension.into());
        self
    }

    pub fn build(self) -> Result<Feed, FeedError> {
        let title = require(self.title, "title")?;
        let link = require(self.link, "link")?;
        let description = require(self.description, "description")?;
        for extension in &self.extensions {
            check_channel_scope(extension)?;
        }

        let defaults = config::defaults();
        Ok(Feed {
            title,
            link,
            description,
            language: self.language,
            copyright: self.copyright,
            managing_editor: self.managing_editor,
            web_master: self.web_master,
            pub_date: self.pub_date,
            last_build_date: self.last_build_date,
            generator: self
                .generator
                .unwrap_or_else(|| defaults.generator.clone()),
            docs: self.docs.unwrap_or_else(|| defaults.docs.clone()),
            cloud: self.cloud,
            ttl: self.ttl,
            rating: self.rating,
            categories: self.categories,
            image: self.image,
            text_input: self.text_input,
            skip_hours: self.skip_hours,
            skip_days: self.skip_days,
            items: self.items,
            extensions: self.extensions,
        })
    }
}

// ============================================================================
// Cloud
// ============================================================================

/// rssCloud endpoint, written as attributes of a single `<cloud>` element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cloud {
    domain: String,
    port: u16,
    path: String,
    register_procedure: String,
    protocol: String,
}

impl Cloud {
    pub fn builder() -> CloudBuilder {
        CloudBuilder::default()
    }
}

#[derive(Debug, Default)]
#[must_use]
pub struct CloudBuilder {
    domain: Option<String>,
    port: Option<u16>,
    path: Option<String>,
    register_procedure: Option<String>,
    protocol: Option<String>,
}

impl CloudBuilder {
    pub fn domain(mut self, domain: impl Into<String>) -> Self {
        self.domain = Some(domain.into());
        self
    }

    pub fn port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    pub fn path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    pub fn register_procedure(mut self, register_procedure: impl Into<String>) -> Self {
        self.register_procedure = Some(register_procedure.into());
        self
    }

    pub fn protocol(mut self, protocol: impl Into<String>) -> Self {
        self.protocol = Some(protocol.into());
        self
    }

    pub fn build(self) -> Result<Cloud, FeedError> {
        let domain = require(self.domain, "domain")?;
        let port = require(self.port, "port")?;
        let path = require(self.path, "path")?;
        let register_procedure = require(self.register_procedure, "registerProcedure")?;
        let protocol = require(self.protocol, "protocol")?;
        Ok(Cloud {
            domain,
            port,
            path,
            register_procedure,
            protocol,
        })
    }
}

impl Sealed for Cloud {}

impl Publish for Cloud {
    fn publish(&self, writer: &mut dyn ElementWriter) -> Result<(), FeedError> {
        let attrs = Attributes::new()
            .with("domain", self.domain.as_str())
            .with("port", self.port.to_string())
            .with("path", self.path.as_str())
            .with("registerProcedure", self.register_procedure.as_str())
            .with("protocol", self.protocol.as_str());
        writer.write_element_with("cloud", None, &attrs)
    }
}

// ============================================================================
// Image
// ============================================================================

/// Channel logo. `url`, `title` and `link` are required.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Image {
    url: String,
    title: String,
    link: String,
    width: Option<u32>,
    height: Option<u32>,
    description: Option<String>,
}

impl Image {
    pub fn builder() -> ImageBuilder {
        ImageBuilder::default()
    }
}

#[derive(Debug, Default)]
#[must_use]
pub struct ImageBuilder {
    url: Option<String>,
    title: Option<String>,
    link: Option<String>,
    width: Option<u32>,
    height: Option<u32>,
    description: Option<String>,
}

impl ImageBuilder {
    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn link(mut self, link: impl Into<String>) -> Self {
        self.link = Some(link.into());
        self
    }

    pub fn width(mut self, width: u32) -> Self {
        self.width = Some(width);
        self
    }

    pub fn height(mut self, height: u32) -> Self {
        self.height = Some(height);
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn build(self) -> Result<Image, FeedError> {
        let url = require(self.url, "url")?;
        let title = require(self.title, "title")?;
        let link = require(self.link, "link")?;
        Ok(Image {
            url,
            title,
            link,
            width: self.width,
            height: self.height,
            description: self.description,
        })
    }
}

impl Sealed for Image {}

impl Publish for Image {
    fn publish(&self, writer: &mut dyn ElementWriter) -> Result<(), FeedError> {
        writer.open_element("image", &Attributes::new())?;
        writer.write_element("url", Some(&self.url))?;
        writer.write_element("title", Some(&self.title))?;
        writer.write_element("link", Some(&self.link))?;
        writer.write_element("width", self.width.map(|w| w.to_string()).as_deref())?;
        writer.write_element("height", self.height.map(|h| h.to_string()).as_deref())?;
        writer.write_element("description", self.description.as_deref())?;
        writer.close_element("image")
    }
}

// ============================================================================
// TextInput
// ============================================================================

/// Search box shown with the channel. All four fields are required.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextInput {
    title: String,
    description: String,
    name: String,
    link: String,
}

impl TextInput {
    pub fn builder() -> TextInputBuilder {
        TextInputBuilder::default()
    }
}

#[derive(Debug, Default)]
#[must_use]
pub struct TextInputBuilder {
    title: Option<String>,
    description: Option<String>,
    name: Option<String>,
    link: Option<String>,
}

impl TextInputBuilder {
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn link(mut self, link: impl Into<String>) -> Self {
        self.link = Some(link.into());
        self
    }

    pub fn build(self) -> Result<TextInput, FeedError> {
        let title = require(self.title, "title")?;
        let description = require(self.description, "description")?;
        let name = require(self.name, "name")?;
        let link = require(self.link, "link")?;
        Ok(TextInput {
            title,
            description,
            name,
            link,
        })
    }
}

impl Sealed for TextInput {}

impl Publish for TextInput {
    fn publish(&self, writer: &mut dyn ElementWriter) -> Result<(), FeedError> {
        writer.open_element("textInput", &Attributes::new())?;
        writer.write_element("title", Some(&self.title))?;
        writer.write_element("description", Some(&self.description))?;
        writer.write_element("name", Some(&self.name))?;
        writer.write_element("link", Some(&self.link))?;
        writer.close_element("textInput")
    }
}

// ============================================================================
// SkipHours / SkipDays
// ============================================================================

/// Hours (GMT, 0-23) during which aggregators may skip reading the channel.
///
/// The list is required but may be empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkipHours {
    hours: Vec<u8>,
}

impl SkipHours {
    pub fn new(hours: impl IntoIterator<Item = u8>) -> Self {
        Self {
            hours: hours.into_iter().collect(),
        }
    }

    /// Fails with `ElementRequired("hours")` when `hours` is `None`.
    pub fn try_new(hours: Option<Vec<u8>>) -> Result<Self, FeedError> {
        Ok(Self::new(require(hours, "hours")?))
    }
}

impl Sealed for SkipHours {}

impl Publish for SkipHours {
    fn publish(&self, writer: &mut dyn ElementWriter) -> Result<(), FeedError> {
        writer.open_element("skipHours", &Attributes::new())?;
        for hour in &self.hours {
            writer.write_element("hour", Some(&hour.to_string()))?;
        }
        writer.close_element("skipHours")
    }
}

/// Days of the week during which aggregators may skip reading the channel.
///
/// The list is required but may be empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkipDays {
    days: Vec<String>,
}

impl SkipDays {
    pub fn new<S: Into<String>>(days: impl IntoIterator<Item = S>) -> Self {
        Self {
            days: days.into_iter().map(Into::into).collect(),
        }
    }

    /// Fails with `ElementRequired("days")` when `days` is `None`.
    pub fn try_new(days: Option<Vec<String>>) -> Result<Self, FeedError> {
        Ok(Self::new(require(days, "days")?))
    }
}

impl Sealed for SkipDays {}

impl Publish for SkipDays {
    fn publish(&self, writer: &mut dyn ElementWriter) -> Result<(), FeedError> {
        writer.open_element("skipDays", &Attributes::new())?;
        for day in &self.days {
            writer.write_element("day", Some(day))?;
        }
        writer.close_element("skipDays")
    }
}
