//! Namespaced extensions for channels and items.
//!
//! [`Extension`] is a closed set of the extensions this crate knows how to
//! write, plus [`Extension::Custom`] for caller-defined ones. Each extension
//! contributes namespace declarations to the `<rss>` element and writes its
//! own elements after all built-in children of its host.

pub mod georss;
pub mod itunes;

use std::fmt;

use crate::error::FeedError;
use crate::xml::{Attributes, ElementWriter, Publish, Sealed};

use georss::GeoRss;
use itunes::{ITunes, ITunesItem};

/// Where an extension may be attached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtensionScope {
    /// Only on the channel.
    Channel,
    /// Only on items.
    Item,
    /// On either.
    Any,
}

/// Hooks a caller-defined extension provides.
///
/// ```
/// use rssforge::extension::CustomExtension;
/// use rssforge::xml::{Attributes, ElementWriter};
/// use rssforge::FeedError;
///
/// #[derive(Debug)]
/// struct Media;
///
/// impl CustomExtension for Media {
///     fn namespaces(&self) -> Attributes {
///         Attributes::new().with("xmlns:media", "http://search.yahoo.com/mrss/")
///     }
///
///     fn publish(&self, writer: &mut dyn ElementWriter) -> Result<(), FeedError> {
///         writer.write_element("media:rating", Some("nonadult"))
///     }
/// }
/// ```
pub trait CustomExtension: fmt::Debug + Send + Sync {
    /// Label used in error messages.
    fn name(&self) -> &str {
        "custom extension"
    }

    fn scope(&self) -> ExtensionScope {
        ExtensionScope::Any
    }

    /// `xmlns:*` declarations to add to the `<rss>` element.
    fn namespaces(&self) -> Attributes {
        Attributes::new()
    }

    /// Writes the extension's elements inside the host element.
    fn publish(&self, writer: &mut dyn ElementWriter) -> Result<(), FeedError>;
}

/// An extension attached to a [`Feed`](crate::Feed) or [`Item`](crate::Item).
#[derive(Debug)]
pub enum Extension {
    ITunes(ITunes),
    ITunesItem(ITunesItem),
    GeoRss(GeoRss),
    Custom(Box<dyn CustomExtension>),
}

impl Extension {
    pub fn custom(extension: impl CustomExtension + 'static) -> Self {
        Extension::Custom(Box::new(extension))
    }

    pub fn scope(&self) -> ExtensionScope {
        match self {
            Extension::ITunes(_) => ExtensionScope::Channel,
            Extension::ITunesItem(_) => ExtensionScope::Item,
            Extension::GeoRss(_) => ExtensionScope::Any,
            Extension::Custom(custom) => custom.scope(),
        }
    }

    /// Human-readable label.
    pub fn kind(&self) -> &str {
        match self {
            Extension::ITunes(_) => "iTunes channel extension",
            Extension::ITunesItem(_) => "iTunes item extension",
            Extension::GeoRss(_) => "GeoRSS extension",
            Extension::Custom(custom) => custom.name(),
        }
    }

    pub fn namespaces(&self) -> Attributes {
        match self {
            Extension::ITunes(_) | Extension::ITunesItem(_) => {
                let (name, uri) = itunes::ITUNES_NAMESPACE;
                Attributes::new().with(name, uri)
            }
            Extension::GeoRss(_) => {
                let (name, uri) = georss::GEORSS_NAMESPACE;
                Attributes::new().with(name, uri)
            }
            Extension::Custom(custom) => custom.namespaces(),
        }
    }
}

impl Sealed for Extension {}

impl Publish for Extension {
    fn publish(&self, writer: &mut dyn ElementWriter) -> Result<(), FeedError> {
        match self {
            Extension::ITunes(itunes) => itunes.publish(writer),
            Extension::ITunesItem(itunes) => itunes.publish(writer),
            Extension::GeoRss(georss) => georss.publish(writer),
            Extension::Custom(custom) => custom.publish(writer),
        }
    }
}

impl From<ITunes> for Extension {
    fn from(itunes: ITunes) -> Self {
        Extension::ITunes(itunes)
    }
}

impl From<ITunesItem> for Extension {
    fn from(itunes: ITunesItem) -> Self {
        Extension::ITunesItem(itunes)
    }
}

impl From<GeoRss> for Extension {
    fn from(georss: GeoRss) -> Self {
        Extension::GeoRss(georss)
    }
}

impl From<Box<dyn CustomExtension>> for Extension {
    fn from(custom: Box<dyn CustomExtension>) -> Self {
        Extension::Custom(custom)
    }
}

/// Adds every namespace declared by `extensions` to `attrs`.
///
/// A name that is already present keeps its position and takes the new value.
/// Extensions declaring nothing leave `attrs` untouched.
pub fn merge_namespaces(attrs: &mut Attributes, extensions: &[Extension]) {
    for extension in extensions {
        for (name, uri) in extension.namespaces().iter() {
            if let Some(previous) = attrs.insert(name, uri) {
                if previous != uri {
                    tracing::debug!(
                        attribute = %name,
                        previous = %previous,
                        value = %uri,
                        extension = extension.kind(),
                        "Namespace declaration overridden"
                    );
                }
            }
        }
    }
}
