//! TOML feed manifests.
//!
//! A manifest describes one feed: channel fields at the top level, optional
//! `[image]`, `[cloud]`, `[text_input]` and `[itunes]` tables, and one
//! `[[items]]` table per item. Dates are quoted strings in
//! `YYYY-MM-DDTHH:MM:SS` form, taken as GMT.
//!
//! ```toml
//! title = "Sample Feed"
//! link = "https://example.com"
//! description = "An example"
//! categories = ["tech", { name = "rust", domain = "https://example.com/tags" }]
//!
//! [[items]]
//! title = "First post"
//! pub_date = "2014-11-13T08:00:00"
//! guid = "https://example.com/first"
//!
//! [items.georss]
//! kind = "point"
//! coordinates = [45.256, -71.92]
//! ```
//!
//! Missing required fields of nested tables are reported by the TOML parser;
//! the feed-level rules (such as an item needing a title or a description)
//! are checked by the builders when the manifest is turned into a [`Feed`].

use chrono::NaiveDateTime;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;
use thiserror::Error;

use crate::extension::georss::{Coordinates, GeoKind, GeoRss};
use crate::extension::itunes::{Explicit, ITunes, ITunesCategory, ITunesItem, ITunesOwner, YesNo};
use crate::{
    Categories, Category, Cloud, Enclosure, Feed, FeedError, Guid, Image, Item, SkipDays,
    SkipHours, Source, TextInput,
};

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug, Error)]
pub enum ManifestError {
    #[error("Failed to read manifest: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid TOML in manifest: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Manifest too large: {0}")]
    TooLarge(String),

    #[error("Invalid feed in manifest: {0}")]
    Feed(#[from] FeedError),
}

// ============================================================================
// Manifest Structs
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct FeedManifest {
    pub title: String,
    pub link: String,
    pub description: String,
    pub language: Option<String>,
    pub copyright: Option<String>,
    pub managing_editor: Option<String>,
    pub web_master: Option<String>,
    pub pub_date: Option<NaiveDateTime>,
    pub last_build_date: Option<NaiveDateTime>,
    pub generator: Option<String>,
    pub docs: Option<String>,
    pub cloud: Option<CloudManifest>,
    pub ttl: Option<u32>,
    pub rating: Option<String>,
    #[serde(default)]
    pub categories: Vec<CategoryManifest>,
    pub image: Option<ImageManifest>,
    pub text_input: Option<TextInputManifest>,
    pub skip_hours: Option<Vec<u8>>,
    pub skip_days: Option<Vec<String>>,
    pub itunes: Option<ITunesManifest>,
    #[serde(default)]
    pub items: Vec<ItemManifest>,
}

/// A bare name or a `{ name, domain }` table.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum CategoryManifest {
    Name(String),
    Full { name: String, domain: Option<String> },
}

#[derive(Debug, Deserialize)]
pub struct CloudManifest {
    pub domain: String,
    pub port: u16,
    pub path: String,
    pub register_procedure: String,
    pub protocol: String,
}

#[derive(Debug, Deserialize)]
pub struct ImageManifest {
    pub url: String,
    pub title: String,
    pub link: String,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub description: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct TextInputManifest {
    pub title: String,
    pub description: String,
    pub name: String,
    pub link: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ItemManifest {
    pub title: Option<String>,
    pub link: Option<String>,
    pub description: Option<String>,
    pub author: Option<String>,
    pub creator: Option<String>,
    pub categories: Vec<CategoryManifest>,
    pub comments: Option<String>,
    pub pub_date: Option<NaiveDateTime>,
    pub enclosure: Option<EnclosureManifest>,
    pub guid: Option<GuidManifest>,
    pub source: Option<SourceManifest>,
    pub itunes: Option<ITunesItemManifest>,
    pub georss: Option<GeoRssManifest>,
}

#[derive(Debug, Deserialize)]
pub struct EnclosureManifest {
    pub url: String,
    pub length: u64,
    #[serde(rename = "type")]
    pub mime_type: String,
}

/// A bare guid string or a `{ value, is_perma_link }` table.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum GuidManifest {
    Value(String),
    Full {
        value: String,
        is_perma_link: Option<bool>,
    },
}

#[derive(Debug, Deserialize)]
pub struct SourceManifest {
    pub name: String,
    pub url: String,
}

/// A boolean or a `"yes"`-style string.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum FlagManifest {
    Bool(bool),
    Text(String),
}

impl From<FlagManifest> for YesNo {
    fn from(flag: FlagManifest) -> Self {
        match flag {
            FlagManifest::Bool(b) => b.into(),
            FlagManifest::Text(s) => s.into(),
        }
    }
}

impl From<FlagManifest> for Explicit {
    fn from(flag: FlagManifest) -> Self {
        match flag {
            FlagManifest::Bool(b) => b.into(),
            FlagManifest::Text(s) => s.into(),
        }
    }
}

/// A bare name or a `{ name, subcategory }` table.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum ITunesCategoryManifest {
    Name(String),
    Full {
        name: String,
        subcategory: Option<String>,
    },
}

#[derive(Debug, Deserialize)]
pub struct ITunesOwnerManifest {
    pub name: String,
    pub email: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ITunesManifest {
    pub author: Option<String>,
    pub block: Option<FlagManifest>,
    pub categories: Vec<ITunesCategoryManifest>,
    pub image: Option<String>,
    pub explicit: Option<FlagManifest>,
    pub complete: Option<FlagManifest>,
    pub new_feed_url: Option<String>,
    pub owner: Option<ITunesOwnerManifest>,
    pub subtitle: Option<String>,
    pub summary: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ITunesItemManifest {
    pub author: Option<String>,
    pub block: Option<FlagManifest>,
    pub image: Option<String>,
    pub duration: Option<String>,
    pub explicit: Option<FlagManifest>,
    pub is_closed_captioned: Option<FlagManifest>,
    pub order: Option<u32>,
    pub subtitle: Option<String>,
    pub summary: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct GeoRssManifest {
    pub kind: String,
    pub coordinates: CoordinatesManifest,
    #[serde(default)]
    pub relationships: BTreeMap<String, String>,
}

/// A number or a list, nested to any depth: `[lat, lon]` or `[[lat, lon], ...]`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum CoordinatesManifest {
    Value(f64),
    List(Vec<CoordinatesManifest>),
}

impl From<CoordinatesManifest> for Coordinates {
    fn from(manifest: CoordinatesManifest) -> Self {
        match manifest {
            CoordinatesManifest::Value(value) => Coordinates::Value(value),
            CoordinatesManifest::List(values) => {
                Coordinates::Nested(values.into_iter().map(Coordinates::from).collect())
            }
        }
    }
}

// ============================================================================
// Loading
// ============================================================================

impl FeedManifest {
    /// Maximum manifest size (16 MB).
    const MAX_FILE_SIZE: u64 = 16 * 1_048_576;

    pub fn load(path: &Path) -> Result<Self, ManifestError> {
        let meta = std::fs::metadata(path)?;
        if meta.len() > Self::MAX_FILE_SIZE {
            return Err(ManifestError::TooLarge(format!(
                "Manifest is {} bytes (max {} bytes)",
                meta.len(),
                Self::MAX_FILE_SIZE
            )));
        }
        let content = std::fs::read_to_string(path)?;
        let manifest = Self::parse(&content)?;
        tracing::debug!(
            path = %path.display(),
            items = manifest.items.len(),
            "Loaded feed manifest"
        );
        Ok(manifest)
    }

    pub fn parse(content: &str) -> Result<Self, ManifestError> {
        Ok(toml::from_str(content)?)
    }

    /// Builds the validated feed graph.
    pub fn into_feed(self) -> Result<Feed, ManifestError> {
        let mut builder = Feed::builder()
            .title(self.title)
            .link(self.link)
            .description(self.description)
            .categories(categories(self.categories)?);
        builder = apply(builder, self.language, |b, v| b.language(v));
        builder = apply(builder, self.copyright, |b, v| b.copyright(v));
        builder = apply(builder, self.managing_editor, |b, v| b.managing_editor(v));
        builder = apply(builder, self.web_master, |b, v| b.web_master(v));
        builder = apply(builder, self.pub_date, |b, v| b.pub_date(v));
        builder = apply(builder, self.last_build_date, |b, v| b.last_build_date(v));
        builder = apply(builder, self.generator, |b, v| b.generator(v));
        builder = apply(builder, self.docs, |b, v| b.docs(v));
        builder = apply(builder, self.ttl, |b, v| b.ttl(v));
        builder = apply(builder, self.rating, |b, v| b.rating(v));
        builder = apply(builder, self.skip_hours, |b, v| b.skip_hours(SkipHours::new(v)));
        builder = apply(builder, self.skip_days, |b, v| b.skip_days(SkipDays::new(v)));

        if let Some(cloud) = self.cloud {
            builder = builder.cloud(
                Cloud::builder()
                    .domain(cloud.domain)
                    .port(cloud.port)
                    .path(cloud.path)
                    .register_procedure(cloud.register_procedure)
                    .protocol(cloud.protocol)
                    .build()?,
            );
        }
        if let Some(image) = self.image {
            let mut image_builder = Image::builder()
                .url(image.url)
                .title(image.title)
                .link(image.link);
            image_builder = apply(image_builder, image.width, |b, v| b.width(v));
            image_builder = apply(image_builder, image.height, |b, v| b.height(v));
            image_builder = apply(image_builder, image.description, |b, v| b.description(v));
            builder = builder.image(image_builder.build()?);
        }
        if let Some(text_input) = self.text_input {
            builder = builder.text_input(
                TextInput::builder()
                    .title(text_input.title)
                    .description(text_input.description)
                    .name(text_input.name)
                    .link(text_input.link)
                    .build()?,
            );
        }
        if let Some(itunes) = self.itunes {
            builder = builder.extension(itunes.into_extension()?);
        }
        for item in self.items {
            builder = builder.item(item.into_item()?);
        }

        Ok(builder.build()?)
    }
}

impl ItemManifest {
    pub fn into_item(self) -> Result<Item, FeedError> {
        let mut builder = Item::builder().categories(categories(self.categories)?);
        builder = apply(builder, self.title, |b, v| b.title(v));
        builder = apply(builder, self.link, |b, v| b.link(v));
        builder = apply(builder, self.description, |b, v| b.description(v));
        builder = apply(builder, self.author, |b, v| b.author(v));
        builder = apply(builder, self.creator, |b, v| b.creator(v));
        builder = apply(builder, self.comments, |b, v| b.comments(v));
        builder = apply(builder, self.pub_date, |b, v| b.pub_date(v));

        if let Some(enclosure) = self.enclosure {
            builder = builder.enclosure(
                Enclosure::builder()
                    .url(enclosure.url)
                    .length(enclosure.length)
                    .mime_type(enclosure.mime_type)
                    .build()?,
            );
        }
        if let Some(guid) = self.guid {
            let guid = match guid {
                GuidManifest::Value(value) => Guid::new(value),
                GuidManifest::Full {
                    value,
                    is_perma_link,
                } => Guid::builder()
                    .value(value)
                    .is_perma_link(is_perma_link)
                    .build()?,
            };
            builder = builder.guid(guid);
        }
        if let Some(source) = self.source {
            builder = builder.source(
                Source::builder()
                    .name(source.name)
                    .url(source.url)
                    .build()?,
            );
        }
        if let Some(itunes) = self.itunes {
            builder = builder.extension(itunes.into_extension());
        }
        if let Some(georss) = self.georss {
            builder = builder.extension(georss.into_extension()?);
        }

        builder.build()
    }
}

impl ITunesManifest {
    fn into_extension(self) -> Result<ITunes, FeedError> {
        let mut itunes = ITunes::new();
        itunes = apply(itunes, self.author, |i, v| i.author(v));
        itunes = apply(itunes, self.block, |i, v| i.block(v));
        let categories: Vec<ITunesCategory> = self
            .categories
            .into_iter()
            .map(|c| match c {
                ITunesCategoryManifest::Name(name) => ITunesCategory::new(name),
                ITunesCategoryManifest::Full {
                    name,
                    subcategory: Some(subcategory),
                } => ITunesCategory::with_subcategory(name, subcategory),
                ITunesCategoryManifest::Full {
                    name,
                    subcategory: None,
                } => ITunesCategory::new(name),
            })
            .collect();
        itunes = itunes.categories(categories);
        itunes = apply(itunes, self.image, |i, v| i.image(v));
        itunes = apply(itunes, self.explicit, |i, v| i.explicit(v));
        itunes = apply(itunes, self.complete, |i, v| i.complete(v));
        itunes = apply(itunes, self.new_feed_url, |i, v| i.new_feed_url(v));
        if let Some(owner) = self.owner {
            itunes = itunes.owner(
                ITunesOwner::builder()
                    .name(owner.name)
                    .email(owner.email)
                    .build()?,
            );
        }
        itunes = apply(itunes, self.subtitle, |i, v| i.subtitle(v));
        itunes = apply(itunes, self.summary, |i, v| i.summary(v));
        Ok(itunes)
    }
}

impl ITunesItemManifest {
    fn into_extension(self) -> ITunesItem {
        let mut itunes = ITunesItem::new();
        itunes = apply(itunes, self.author, |i, v| i.author(v));
        itunes = apply(itunes, self.block, |i, v| i.block(v));
        itunes = apply(itunes, self.image, |i, v| i.image(v));
        itunes = apply(itunes, self.duration, |i, v| i.duration(v));
        itunes = apply(itunes, self.explicit, |i, v| i.explicit(v));
        itunes = apply(itunes, self.is_closed_captioned, |i, v| {
            i.is_closed_captioned(v)
        });
        itunes = apply(itunes, self.order, |i, v| i.order(v));
        itunes = apply(itunes, self.subtitle, |i, v| i.subtitle(v));
        apply(itunes, self.summary, |i, v| i.summary(v))
    }
}

impl GeoRssManifest {
    fn into_extension(self) -> Result<GeoRss, FeedError> {
        let kind: GeoKind = self.kind.parse()?;
        let mut georss = GeoRss::new(kind, self.coordinates);
        for (name, value) in &self.relationships {
            georss = georss.relationship(name, value);
        }
        Ok(georss)
    }
}

fn categories(entries: Vec<CategoryManifest>) -> Result<Categories, FeedError> {
    entries
        .into_iter()
        .map(|entry| match entry {
            CategoryManifest::Name(name) => Ok(Category::new(name)),
            CategoryManifest::Full { name, domain } => {
                let builder = Category::builder().name(name);
                apply(builder, domain, |b, v| b.domain(v)).build()
            }
        })
        .collect::<Result<Vec<Category>, FeedError>>()
        .map(Categories::from)
}

/// Applies `set` when `value` is present.
fn apply<B, T>(builder: B, value: Option<T>, set: impl FnOnce(B, T) -> B) -> B {
    match value {
        Some(value) => set(builder, value),
        None => builder,
    }
}
