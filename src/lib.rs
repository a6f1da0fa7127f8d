//! Build RSS 2.0 feeds as a validated object graph and serialize them to XML.
//!
//! Entities are created through builders that check required fields before
//! anything is stored, so an invalid feed cannot be constructed. Serialization
//! walks the graph depth-first and writes every element in the order the RSS
//! 2.0 specification lists it; optional values that were never set are left
//! out entirely.
//!
//! # Example
//!
//! ```
//! use chrono::NaiveDate;
//! use rssforge::extension::itunes::ITunesItem;
//! use rssforge::{Feed, Guid, Item};
//!
//! let published = NaiveDate::from_ymd_opt(2014, 11, 13)
//!     .unwrap()
//!     .and_hms_opt(8, 0, 0)
//!     .unwrap();
//!
//! let item = Item::builder()
//!     .title("First episode")
//!     .pub_date(published)
//!     .guid(Guid::new("https://example.com/ep1"))
//!     .extension(ITunesItem::new().duration("10:11:12"))
//!     .build()?;
//!
//! let feed = Feed::builder()
//!     .title("Sample Feed")
//!     .link("https://example.com")
//!     .description("An example feed")
//!     .categories(["podcast", "tech"])
//!     .item(item)
//!     .build()?;
//!
//! let xml = feed.to_xml()?;
//! assert!(xml.contains("<pubDate>Thu, 13 Nov 2014 08:00:00 GMT</pubDate>"));
//! assert!(xml.contains(r#"xmlns:itunes="http://www.itunes.com/dtds/podcast-1.0.dtd""#));
//! # Ok::<(), rssforge::FeedError>(())
//! ```

pub mod config;
pub mod error;
pub mod extension;
pub mod manifest;
pub mod rss;
pub mod util;
pub mod xml;

pub use error::FeedError;
pub use extension::{CustomExtension, Extension, ExtensionScope};
pub use rss::{
    Categories, Category, Cloud, Enclosure, Feed, FeedBuilder, Guid, Image, Item, ItemBuilder,
    SkipDays, SkipHours, Source, TextInput,
};
