//! GeoRSS-Simple geotagging and the geometry validator behind it.
//!
//! Coordinates may be given flat (`[lat, lon, lat, lon]`) or nested
//! (`[[lat, lon], [lat, lon]]`); they are flattened before validation.
//! Validation happens when the extension is published, not when it is built.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::error::FeedError;
use crate::xml::{ElementWriter, Publish, Sealed};

pub const GEORSS_NAMESPACE: (&str, &str) = ("xmlns:georss", "http://www.georss.org/georss");

// ============================================================================
// Error Types
// ============================================================================

/// Reasons a geometry is rejected.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeometryError {
    /// Odd number of coordinate values.
    #[error("{count} coordinate values leave one unpaired; latitude and longitude must come in pairs")]
    Unpaired { count: usize },

    /// Pair count outside the kind's arity.
    #[error("{kind} requires {expected}, got {found}")]
    PairCount {
        kind: GeoKind,
        expected: Arity,
        found: usize,
    },

    /// Polygon whose first and last pairs differ.
    #[error("polygon start and end must match to close the ring")]
    RingNotClosed,
}

// ============================================================================
// Geometry kinds
// ============================================================================

/// Number of coordinate pairs a geometry kind accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    Exactly(usize),
    AtLeast(usize),
}

impl Arity {
    pub fn accepts(&self, pairs: usize) -> bool {
        match *self {
            Arity::Exactly(n) => pairs == n,
            Arity::AtLeast(n) => pairs >= n,
        }
    }
}

impl fmt::Display for Arity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (qualifier, n) = match *self {
            Arity::Exactly(n) => ("exactly", n),
            Arity::AtLeast(n) => ("at least", n),
        };
        let plural = if n == 1 { "" } else { "s" };
        write!(
            f,
            "{} {} coordinate pair{} ({} coordinates)",
            qualifier,
            n,
            plural,
            n * 2
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeoKind {
    Point,
    Line,
    /// Bounding rectangle: lower corner then upper corner.
    Box,
    /// Closed ring: first and last pairs are equal.
    Polygon,
}

impl GeoKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            GeoKind::Point => "point",
            GeoKind::Line => "line",
            GeoKind::Box => "box",
            GeoKind::Polygon => "polygon",
        }
    }

    pub fn arity(&self) -> Arity {
        match self {
            GeoKind::Point => Arity::Exactly(1),
            GeoKind::Line => Arity::AtLeast(2),
            GeoKind::Box => Arity::Exactly(2),
            GeoKind::Polygon => Arity::AtLeast(4),
        }
    }
}

impl fmt::Display for GeoKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GeoKind {
    type Err = FeedError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "point" => Ok(GeoKind::Point),
            "line" => Ok(GeoKind::Line),
            "box" => Ok(GeoKind::Box),
            "polygon" => Ok(GeoKind::Polygon),
            other => Err(FeedError::InvalidExtension(format!(
                "unknown GeoRSS geometry kind \"{}\"",
                other
            ))),
        }
    }
}

/// Checks a flattened coordinate list against `kind`.
///
/// Order of checks: pairing, pair count, ring closure (polygons only).
pub fn validate_geometry(kind: GeoKind, values: &[f64]) -> Result<(), GeometryError> {
    if values.len() % 2 != 0 {
        return Err(GeometryError::Unpaired {
            count: values.len(),
        });
    }

    let pairs = values.len() / 2;
    let expected = kind.arity();
    if !expected.accepts(pairs) {
        return Err(GeometryError::PairCount {
            kind,
            expected,
            found: pairs,
        });
    }

    if kind == GeoKind::Polygon && values[..2] != values[values.len() - 2..] {
        return Err(GeometryError::RingNotClosed);
    }

    Ok(())
}

// ============================================================================
// Coordinates
// ============================================================================

/// A coordinate value or an arbitrarily nested list of them.
#[derive(Debug, Clone, PartialEq)]
pub enum Coordinates {
    Value(f64),
    Nested(Vec<Coordinates>),
}

impl Coordinates {
    /// All values in document order, nesting removed.
    pub fn flatten(&self) -> Vec<f64> {
        let mut out = Vec::new();
        self.flatten_into(&mut out);
        out
    }

    fn flatten_into(&self, out: &mut Vec<f64>) {
        match self {
            Coordinates::Value(v) => out.push(*v),
            Coordinates::Nested(children) => {
                for child in children {
                    child.flatten_into(out);
                }
            }
        }
    }
}

impl From<f64> for Coordinates {
    fn from(value: f64) -> Self {
        Coordinates::Value(value)
    }
}

impl From<f32> for Coordinates {
    fn from(value: f32) -> Self {
        Coordinates::Value(value.into())
    }
}

impl From<i32> for Coordinates {
    fn from(value: i32) -> Self {
        Coordinates::Value(value.into())
    }
}

impl From<(f64, f64)> for Coordinates {
    fn from((lat, lon): (f64, f64)) -> Self {
        Coordinates::Nested(vec![Coordinates::Value(lat), Coordinates::Value(lon)])
    }
}

impl<T: Into<Coordinates>> From<Vec<T>> for Coordinates {
    fn from(values: Vec<T>) -> Self {
        Coordinates::Nested(values.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Coordinates>, const N: usize> From<[T; N]> for Coordinates {
    fn from(values: [T; N]) -> Self {
        Coordinates::Nested(values.into_iter().map(Into::into).collect())
    }
}

// ============================================================================
// Relationships
// ============================================================================

/// Auxiliary GeoRSS-Simple elements accepted next to a geometry.
///
/// Declaration order is the order they are written in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum GeoRelationship {
    RelationshipTag,
    FeatureTypeTag,
    FeatureName,
    Elev,
    Floor,
    Radius,
}

impl GeoRelationship {
    pub fn as_str(&self) -> &'static str {
        match self {
            GeoRelationship::RelationshipTag => "relationshiptag",
            GeoRelationship::FeatureTypeTag => "featuretypetag",
            GeoRelationship::FeatureName => "featurename",
            GeoRelationship::Elev => "elev",
            GeoRelationship::Floor => "floor",
            GeoRelationship::Radius => "radius",
        }
    }

    /// `None` for names outside the whitelist.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "relationshiptag" => Some(GeoRelationship::RelationshipTag),
            "featuretypetag" => Some(GeoRelationship::FeatureTypeTag),
            "featurename" => Some(GeoRelationship::FeatureName),
            "elev" => Some(GeoRelationship::Elev),
            "floor" => Some(GeoRelationship::Floor),
            "radius" => Some(GeoRelationship::Radius),
            _ => None,
        }
    }
}

// ============================================================================
// Extension
// ============================================================================

/// A GeoRSS-Simple geometry attached to a channel or item.
#[derive(Debug, Clone, PartialEq)]
pub struct GeoRss {
    kind: GeoKind,
    coordinates: Coordinates,
    relationships: BTreeMap<GeoRelationship, String>,
}

impl GeoRss {
    pub fn new(kind: GeoKind, coordinates: impl Into<Coordinates>) -> Self {
        Self {
            kind,
            coordinates: coordinates.into(),
            relationships: BTreeMap::new(),
        }
    }

    /// Adds an auxiliary element such as `elev` or `floor`.
    ///
    /// Names outside the GeoRSS-Simple whitelist are dropped silently so that
    /// callers written against newer vocabularies keep working.
    #[must_use]
    pub fn relationship(mut self, name: &str, value: impl ToString) -> Self {
        match GeoRelationship::from_name(name) {
            Some(relationship) => {
                self.relationships.insert(relationship, value.to_string());
            }
            None => {
                tracing::debug!(name = %name, "Dropping unsupported GeoRSS relationship");
            }
        }
        self
    }

    pub fn kind(&self) -> GeoKind {
        self.kind
    }

    pub fn relationships(&self) -> impl Iterator<Item = (GeoRelationship, &str)> {
        self.relationships.iter().map(|(k, v)| (*k, v.as_str()))
    }

    /// Flattens and validates the coordinates.
    pub fn validate(&self) -> Result<Vec<f64>, GeometryError> {
        let values = self.coordinates.flatten();
        validate_geometry(self.kind, &values)?;
        Ok(values)
    }
}

impl Sealed for GeoRss {}

impl Publish for GeoRss {
    fn publish(&self, writer: &mut dyn ElementWriter) -> Result<(), FeedError> {
        let values = self.validate()?;
        let text = values
            .iter()
            .map(f64::to_string)
            .collect::<Vec<_>>()
            .join(" ");
        writer.write_element(&format!("georss:{}", self.kind), Some(&text))?;

        for (relationship, value) in &self.relationships {
            writer.write_element(&format!("georss:{}", relationship.as_str()), Some(value))?;
        }
        Ok(())
    }
}
