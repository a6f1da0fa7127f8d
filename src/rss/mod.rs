//! Core RSS 2.0 node model.
//!
//! - `channel`: [`Feed`] and its channel-level children
//! - `item`: [`Item`] and its children
//! - `category`: [`Category`] and the [`Categories`] normalization
//!
//! Every entity with required fields is built through a builder whose
//! `build()` checks those fields before anything is stored.

mod category;
mod channel;
mod item;

pub use category::{Categories, Category, CategoryBuilder};
pub use channel::{
    Cloud, CloudBuilder, Feed, FeedBuilder, Image, ImageBuilder, SkipDays, SkipHours, TextInput,
    TextInputBuilder, DUBLIN_CORE_NAMESPACE, RSS_VERSION,
};
pub use item::{
    Enclosure, EnclosureBuilder, Guid, GuidBuilder, Item, ItemBuilder, Source, SourceBuilder,
};
