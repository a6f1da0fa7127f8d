//! Integration tests for extensions: namespace merging on `<rss>`, scope
//! checks, iTunes output and GeoRSS geometry validation at serialization time.

use pretty_assertions::assert_eq;
use rssforge::extension::georss::{GeoKind, GeoRss, GeometryError};
use rssforge::extension::itunes::{ITunes, ITunesCategory, ITunesItem, ITunesOwner};
use rssforge::xml::{Attributes, ElementWriter};
use rssforge::{CustomExtension, Extension, ExtensionScope, Feed, FeedBuilder, FeedError, Item};

#[derive(Debug)]
struct Namespaced {
    attrs: Vec<(&'static str, &'static str)>,
    scope: ExtensionScope,
}

impl Namespaced {
    fn any(attrs: &[(&'static str, &'static str)]) -> Extension {
        Extension::custom(Namespaced {
            attrs: attrs.to_vec(),
            scope: ExtensionScope::Any,
        })
    }

    fn scoped(scope: ExtensionScope) -> Extension {
        Extension::custom(Namespaced {
            attrs: Vec::new(),
            scope,
        })
    }
}

impl CustomExtension for Namespaced {
    fn name(&self) -> &str {
        "namespaced test extension"
    }

    fn scope(&self) -> ExtensionScope {
        self.scope
    }

    fn namespaces(&self) -> Attributes {
        self.attrs.iter().copied().collect()
    }

    fn publish(&self, _writer: &mut dyn ElementWriter) -> Result<(), FeedError> {
        Ok(())
    }
}

fn minimal() -> FeedBuilder {
    Feed::builder().title("").link("").description("")
}

fn item() -> Item {
    Item::builder().title("").build().unwrap()
}

fn root_pairs(feed: &Feed) -> Vec<(String, String)> {
    feed.root_attributes()
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

fn pairs(expected: &[(&str, &str)]) -> Vec<(String, String)> {
    expected
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

// ============================================================================
// Namespace merging
// ============================================================================

#[test]
fn test_no_extensions_only_version() {
    let feed = minimal().build().unwrap();
    assert_eq!(root_pairs(&feed), pairs(&[("version", "2.0")]));
}

#[test]
fn test_disjoint_extensions_are_merged() {
    let feed = minimal()
        .extension(Namespaced::any(&[("xmlns:a", "1")]))
        .extension(Namespaced::any(&[("xmlns:b", "2")]))
        .build()
        .unwrap();
    assert_eq!(
        root_pairs(&feed),
        pairs(&[("version", "2.0"), ("xmlns:a", "1"), ("xmlns:b", "2")])
    );

    let xml = feed.to_xml().unwrap();
    assert!(xml.contains(r#"<rss version="2.0" xmlns:a="1" xmlns:b="2">"#));
}

#[test]
fn test_item_extension_namespaces_reach_root() {
    let item = Item::builder()
        .title("")
        .extension(Namespaced::any(&[("xmlns:c", "3")]))
        .build()
        .unwrap();
    let feed = minimal()
        .extension(Namespaced::any(&[("xmlns:a", "1")]))
        .item(item)
        .build()
        .unwrap();
    assert_eq!(
        root_pairs(&feed),
        pairs(&[("version", "2.0"), ("xmlns:a", "1"), ("xmlns:c", "3")])
    );
}

#[test]
fn test_colliding_namespace_takes_last_value() {
    let feed = minimal()
        .extension(Namespaced::any(&[("xmlns:a", "first")]))
        .extension(Namespaced::any(&[("xmlns:b", "2")]))
        .extension(Namespaced::any(&[("xmlns:a", "second")]))
        .build()
        .unwrap();
    assert_eq!(
        root_pairs(&feed),
        pairs(&[("version", "2.0"), ("xmlns:a", "second"), ("xmlns:b", "2")])
    );
}

#[test]
fn test_shared_itunes_namespace_declared_once() {
    let item = Item::builder()
        .title("")
        .extension(ITunesItem::new().duration("1:00"))
        .build()
        .unwrap();
    let xml = minimal()
        .extension(ITunes::new().author("a"))
        .item(item)
        .build()
        .unwrap()
        .to_xml()
        .unwrap();
    assert_eq!(xml.matches("xmlns:itunes=").count(), 1);
}

// ============================================================================
// Scope checks
// ============================================================================

#[test]
fn test_item_extension_rejected_on_channel() {
    let err = minimal().extension(ITunesItem::new()).build().unwrap_err();
    assert!(matches!(err, FeedError::InvalidExtension(_)));

    let mut feed = minimal().build().unwrap();
    let err = feed
        .add_extension(Namespaced::scoped(ExtensionScope::Item))
        .unwrap_err();
    assert!(err.to_string().contains("namespaced test extension"));
    assert!(feed.extensions().is_empty());
}

#[test]
fn test_channel_extension_rejected_on_item() {
    let err = Item::builder()
        .title("")
        .extension(ITunes::new())
        .build()
        .unwrap_err();
    assert!(matches!(err, FeedError::InvalidExtension(_)));

    let mut item = item();
    assert!(item
        .add_extension(Namespaced::scoped(ExtensionScope::Channel))
        .is_err());
    assert!(item.extensions().is_empty());
}

#[test]
fn test_add_extension_appends() {
    let mut feed = minimal().build().unwrap();
    feed.add_extension(ITunes::new()).unwrap();
    feed.add_extension(GeoRss::new(GeoKind::Point, [1, 2])).unwrap();
    assert_eq!(feed.extensions().len(), 2);

    let mut item = item();
    item.add_extension(ITunesItem::new()).unwrap();
    item.add_extension(GeoRss::new(GeoKind::Point, [1, 2])).unwrap();
    assert_eq!(item.extensions().len(), 2);
}

// ============================================================================
// iTunes
// ============================================================================

#[test]
fn test_itunes_channel_elements() {
    let owner = ITunesOwner::builder()
        .name("Jane")
        .email("jane@example.com")
        .build()
        .unwrap();
    let xml = minimal()
        .extension(
            ITunes::new()
                .author("Jane")
                .block("YES")
                .categories(ITunesCategory::with_subcategory("Technology", "Podcasting"))
                .image("https://example.com/art.png")
                .explicit(false)
                .complete(true)
                .owner(owner),
        )
        .build()
        .unwrap()
        .to_xml()
        .unwrap();

    assert!(xml.contains("<itunes:author>Jane</itunes:author>"));
    assert!(xml.contains("<itunes:block>yes</itunes:block>"));
    assert!(xml.contains(r#"<itunes:category text="Technology"><itunes:category text="Podcasting"></itunes:category></itunes:category>"#));
    assert!(xml.contains(r#"<itunes:image href="https://example.com/art.png"></itunes:image>"#));
    assert!(xml.contains("<itunes:explicit>clean</itunes:explicit>"));
    assert!(xml.contains("<itunes:complete>yes</itunes:complete>"));
    assert!(xml.contains("<itunes:owner><itunes:name>Jane</itunes:name><itunes:email>jane@example.com</itunes:email></itunes:owner>"));
}

#[test]
fn test_itunes_item_elements_follow_builtins() {
    let item = Item::builder()
        .title("Episode")
        .extension(
            ITunesItem::new()
                .duration("10:11:12")
                .is_closed_captioned(true)
                .order(3),
        )
        .build()
        .unwrap();
    let xml = minimal().item(item).build().unwrap().to_xml().unwrap();
    assert!(xml.contains(
        "<item><title>Episode</title><itunes:duration>10:11:12</itunes:duration>\
         <itunes:is_closed_captioned>yes</itunes:is_closed_captioned>\
         <itunes:order>3</itunes:order></item>"
    ));
}

// ============================================================================
// GeoRSS
// ============================================================================

fn geo_xml(georss: GeoRss) -> Result<String, FeedError> {
    let item = Item::builder()
        .title("")
        .extension(georss)
        .build()
        .unwrap();
    minimal().item(item).build().unwrap().to_xml()
}

#[test]
fn test_valid_geometries_serialize() {
    let xml = geo_xml(GeoRss::new(GeoKind::Point, [45.256, -71.92])).unwrap();
    assert!(xml.contains("<georss:point>45.256 -71.92</georss:point>"));
    assert!(xml.contains(r#"xmlns:georss="http://www.georss.org/georss""#));

    let xml = geo_xml(GeoRss::new(GeoKind::Line, [[0, 0], [1, 1]])).unwrap();
    assert!(xml.contains("<georss:line>0 0 1 1</georss:line>"));

    let xml = geo_xml(GeoRss::new(GeoKind::Box, [0, 0, 1, 1])).unwrap();
    assert!(xml.contains("<georss:box>0 0 1 1</georss:box>"));

    let xml = geo_xml(GeoRss::new(GeoKind::Polygon, [[0, 0], [0, 1], [1, 1], [0, 0]])).unwrap();
    assert!(xml.contains("<georss:polygon>0 0 0 1 1 1 0 0</georss:polygon>"));
}

#[test]
fn test_invalid_geometries_fail_serialization() {
    let cases = [
        (
            GeoRss::new(GeoKind::Point, [0, 90, 1]),
            GeometryError::Unpaired { count: 3 },
        ),
        (
            GeoRss::new(GeoKind::Line, [0, 0]),
            GeometryError::PairCount {
                kind: GeoKind::Line,
                expected: GeoKind::Line.arity(),
                found: 1,
            },
        ),
        (
            GeoRss::new(GeoKind::Box, [0, 0, 1, 1, 2, 2]),
            GeometryError::PairCount {
                kind: GeoKind::Box,
                expected: GeoKind::Box.arity(),
                found: 3,
            },
        ),
        (
            GeoRss::new(GeoKind::Polygon, [[0, 0], [0, 1], [1, 1]]),
            GeometryError::PairCount {
                kind: GeoKind::Polygon,
                expected: GeoKind::Polygon.arity(),
                found: 3,
            },
        ),
        (
            GeoRss::new(GeoKind::Polygon, [[0, 0], [0, 1], [1, 1], [1, 0]]),
            GeometryError::RingNotClosed,
        ),
    ];

    for (georss, expected) in cases {
        match geo_xml(georss) {
            Err(FeedError::Geometry(err)) => assert_eq!(err, expected),
            other => panic!("expected geometry error {expected:?}, got {other:?}"),
        }
    }
}

#[test]
fn test_relationships_follow_geometry() {
    let georss = GeoRss::new(GeoKind::Point, [1, 2])
        .relationship("floor", 2)
        .relationship("elev", 313)
        .relationship("bogus", "ignored");
    let xml = geo_xml(georss).unwrap();
    assert!(xml.contains(
        "<georss:point>1 2</georss:point><georss:elev>313</georss:elev>\
         <georss:floor>2</georss:floor>"
    ));
    assert!(!xml.contains("bogus"));
}
