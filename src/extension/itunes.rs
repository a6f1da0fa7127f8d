//! iTunes podcast metadata, at channel ([`ITunes`]) and item ([`ITunesItem`])
//! level.

use crate::error::{require, FeedError};
use crate::xml::{Attributes, ElementWriter, Publish, Sealed};

pub const ITUNES_NAMESPACE: (&str, &str) = (
    "xmlns:itunes",
    "http://www.itunes.com/dtds/podcast-1.0.dtd",
);

// ============================================================================
// Flag normalization
// ============================================================================

/// `yes`/`no` flag (block, complete, is_closed_captioned).
///
/// `true` and any casing of `"yes"` map to `Yes`; everything else to `No`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum YesNo {
    Yes,
    No,
}

impl YesNo {
    pub fn as_str(&self) -> &'static str {
        match self {
            YesNo::Yes => "yes",
            YesNo::No => "no",
        }
    }
}

impl From<bool> for YesNo {
    fn from(value: bool) -> Self {
        if value {
            YesNo::Yes
        } else {
            YesNo::No
        }
    }
}

impl From<&str> for YesNo {
    fn from(value: &str) -> Self {
        value.eq_ignore_ascii_case("yes").into()
    }
}

impl From<String> for YesNo {
    fn from(value: String) -> Self {
        value.as_str().into()
    }
}

/// Explicit-content flag.
///
/// `true` and any casing of `"yes"` map to `Yes`; everything else to `Clean`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Explicit {
    Yes,
    Clean,
}

impl Explicit {
    pub fn as_str(&self) -> &'static str {
        match self {
            Explicit::Yes => "yes",
            Explicit::Clean => "clean",
        }
    }
}

impl From<bool> for Explicit {
    fn from(value: bool) -> Self {
        if value {
            Explicit::Yes
        } else {
            Explicit::Clean
        }
    }
}

impl From<&str> for Explicit {
    fn from(value: &str) -> Self {
        value.eq_ignore_ascii_case("yes").into()
    }
}

impl From<String> for Explicit {
    fn from(value: String) -> Self {
        value.as_str().into()
    }
}

// ============================================================================
// Owner and categories
// ============================================================================

/// Podcast owner contact. Both fields are required.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ITunesOwner {
    name: String,
    email: String,
}

impl ITunesOwner {
    pub fn builder() -> ITunesOwnerBuilder {
        ITunesOwnerBuilder::default()
    }
}

#[derive(Debug, Default)]
#[must_use]
pub struct ITunesOwnerBuilder {
    name: Option<String>,
    email: Option<String>,
}

impl ITunesOwnerBuilder {
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    pub fn build(self) -> Result<ITunesOwner, FeedError> {
        let name = require(self.name, "name")?;
        let email = require(self.email, "email")?;
        Ok(ITunesOwner { name, email })
    }
}

impl Sealed for ITunesOwner {}

impl Publish for ITunesOwner {
    fn publish(&self, writer: &mut dyn ElementWriter) -> Result<(), FeedError> {
        writer.open_element("itunes:owner", &Attributes::new())?;
        writer.write_element("itunes:name", Some(&self.name))?;
        writer.write_element("itunes:email", Some(&self.email))?;
        writer.close_element("itunes:owner")
    }
}

/// iTunes category with an optional subcategory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ITunesCategory {
    name: String,
    subcategory: Option<String>,
}

impl ITunesCategory {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            subcategory: None,
        }
    }

    pub fn with_subcategory(name: impl Into<String>, subcategory: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            subcategory: Some(subcategory.into()),
        }
    }

    /// Fails with `ElementRequired("name")` when `name` is `None`.
    pub fn try_new(
        name: Option<String>,
        subcategory: Option<String>,
    ) -> Result<Self, FeedError> {
        let name = require(name, "name")?;
        Ok(Self { name, subcategory })
    }
}

impl From<&str> for ITunesCategory {
    fn from(name: &str) -> Self {
        ITunesCategory::new(name)
    }
}

impl From<String> for ITunesCategory {
    fn from(name: String) -> Self {
        ITunesCategory::new(name)
    }
}

impl Sealed for ITunesCategory {}

impl Publish for ITunesCategory {
    fn publish(&self, writer: &mut dyn ElementWriter) -> Result<(), FeedError> {
        writer.open_element(
            "itunes:category",
            &Attributes::new().with("text", self.name.as_str()),
        )?;
        if let Some(subcategory) = &self.subcategory {
            let attrs = Attributes::new().with("text", subcategory.as_str());
            writer.write_element_with("itunes:category", None, &attrs)?;
        }
        writer.close_element("itunes:category")
    }
}

/// Ordered iTunes categories, normalized like [`Categories`](crate::Categories).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ITunesCategories(Vec<ITunesCategory>);

impl ITunesCategories {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

impl From<&str> for ITunesCategories {
    fn from(name: &str) -> Self {
        ITunesCategories(vec![ITunesCategory::new(name)])
    }
}

impl From<String> for ITunesCategories {
    fn from(name: String) -> Self {
        ITunesCategories(vec![ITunesCategory::new(name)])
    }
}

impl From<ITunesCategory> for ITunesCategories {
    fn from(category: ITunesCategory) -> Self {
        ITunesCategories(vec![category])
    }
}

impl<T: Into<ITunesCategory>> From<Vec<T>> for ITunesCategories {
    fn from(items: Vec<T>) -> Self {
        ITunesCategories(items.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<ITunesCategory>, const N: usize> From<[T; N]> for ITunesCategories {
    fn from(items: [T; N]) -> Self {
        ITunesCategories(items.into_iter().map(Into::into).collect())
    }
}

// ============================================================================
// Channel extension
// ============================================================================

/// Channel-level iTunes metadata. Every field is optional.
///
/// Elements are written in this order: author, block, category, image,
/// explicit, complete, new-feed-url, owner, subtitle, summary.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[must_use]
pub struct ITunes {
    author: Option<String>,
    block: Option<YesNo>,
    categories: ITunesCategories,
    image: Option<String>,
    explicit: Option<Explicit>,
    complete: Option<YesNo>,
    new_feed_url: Option<String>,
    owner: Option<ITunesOwner>,
    subtitle: Option<String>,
    summary: Option<String>,
}

impl ITunes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn author(mut self, author: impl Into<String>) -> Self {
        self.author = Some(author.into());
        self
    }

    /// Accepts a `bool` or a `"yes"`-style string.
    pub fn block(mut self, block: impl Into<YesNo>) -> Self {
        self.block = Some(block.into());
        self
    }

    pub fn categories(mut self, categories: impl Into<ITunesCategories>) -> Self {
        self.categories.0.extend(categories.into().0);
        self
    }

    /// Artwork URL, written as the `href` attribute.
    pub fn image(mut self, href: impl Into<String>) -> Self {
        self.image = Some(href.into());
        self
    }

    pub fn explicit(mut self, explicit: impl Into<Explicit>) -> Self {
        self.explicit = Some(explicit.into());
        self
    }

    pub fn complete(mut self, complete: impl Into<YesNo>) -> Self {
        self.complete = Some(complete.into());
        self
    }

    pub fn new_feed_url(mut self, url: impl Into<String>) -> Self {
        self.new_feed_url = Some(url.into());
        self
    }

    pub fn owner(mut self, owner: ITunesOwner) -> Self {
        self.owner = Some(owner);
        self
    }

    pub fn subtitle(mut self, subtitle: impl Into<String>) -> Self {
        self.subtitle = Some(subtitle.into());
        self
    }

    pub fn summary(mut self, summary: impl Into<String>) -> Self {
        self.summary = Some(summary.into());
        self
    }
}

impl Sealed for ITunes {}

impl Publish for ITunes {
    fn publish(&self, writer: &mut dyn ElementWriter) -> Result<(), FeedError> {
        writer.write_element("itunes:author", self.author.as_deref())?;
        writer.write_element("itunes:block", self.block.map(|b| b.as_str()))?;
        for category in &self.categories.0 {
            category.publish(writer)?;
        }
        write_image(writer, self.image.as_deref())?;
        writer.write_element("itunes:explicit", self.explicit.map(|e| e.as_str()))?;
        writer.write_element("itunes:complete", self.complete.map(|c| c.as_str()))?;
        writer.write_element("itunes:new-feed-url", self.new_feed_url.as_deref())?;
        if let Some(owner) = &self.owner {
            owner.publish(writer)?;
        }
        writer.write_element("itunes:subtitle", self.subtitle.as_deref())?;
        writer.write_element("itunes:summary", self.summary.as_deref())
    }
}

fn write_image(writer: &mut dyn ElementWriter, href: Option<&str>) -> Result<(), FeedError> {
    match href {
        Some(href) => {
            let attrs = Attributes::new().with("href", href);
            writer.write_element_with("itunes:image", None, &attrs)
        }
        None => Ok(()),
    }
}

// ============================================================================
// Item extension
// ============================================================================

/// Episode-level iTunes metadata. Every field is optional.
///
/// Elements are written in this order: author, block, image, duration,
/// explicit, is_closed_captioned, order, subtitle, summary.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[must_use]
pub struct ITunesItem {
    author: Option<String>,
    block: Option<YesNo>,
    image: Option<String>,
    duration: Option<String>,
    explicit: Option<Explicit>,
    is_closed_captioned: Option<YesNo>,
    order: Option<u32>,
    subtitle: Option<String>,
    summary: Option<String>,
}

impl ITunesItem {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn author(mut self, author: impl Into<String>) -> Self {
        self.author = Some(author.into());
        self
    }

    pub fn block(mut self, block: impl Into<YesNo>) -> Self {
        self.block = Some(block.into());
        self
    }

    pub fn image(mut self, href: impl Into<String>) -> Self {
        self.image = Some(href.into());
        self
    }

    /// `HH:MM:SS`, `H:MM:SS`, `MM:SS` or seconds.
    pub fn duration(mut self, duration: impl Into<String>) -> Self {
        self.duration = Some(duration.into());
        self
    }

    pub fn explicit(mut self, explicit: impl Into<Explicit>) -> Self {
        self.explicit = Some(explicit.into());
        self
    }

    pub fn is_closed_captioned(mut self, captioned: impl Into<YesNo>) -> Self {
        self.is_closed_captioned = Some(captioned.into());
        self
    }

    /// Position of the episode, overriding date ordering.
    pub fn order(mut self, order: u32) -> Self {
        self.order = Some(order);
        self
    }

    pub fn subtitle(mut self, subtitle: impl Into<String>) -> Self {
        self.subtitle = Some(subtitle.into());
        self
    }

    pub fn summary(mut self, summary: impl Into<String>) -> Self {
        self.summary = Some(summary.into());
        self
    }
}

impl Sealed for ITunesItem {}

impl Publish for ITunesItem {
    fn publish(&self, writer: &mut dyn ElementWriter) -> Result<(), FeedError> {
        writer.write_element("itunes:author", self.author.as_deref())?;
        writer.write_element("itunes:block", self.block.map(|b| b.as_str()))?;
        write_image(writer, self.image.as_deref())?;
        writer.write_element("itunes:duration", self.duration.as_deref())?;
        writer.write_element("itunes:explicit", self.explicit.map(|e| e.as_str()))?;
        writer.write_element(
            "itunes:is_closed_captioned",
            self.is_closed_captioned.map(|c| c.as_str()),
        )?;
        writer.write_element("itunes:order", self.order.map(|o| o.to_string()).as_deref())?;
        writer.write_element("itunes:subtitle", self.subtitle.as_deref())?;
        writer.write_element("itunes:summary", self.summary.as_deref())
    }
}
