//! Decoded geometry tree: base kinds, dimension flags, kind-dependent
//! payloads, and the language-neutral `{type, srid, value}` output shape.

use std::fmt;

use serde::ser::{Serialize, SerializeMap, Serializer};

/// One coordinate tuple, ordered `[X, Y, Z, M]`.
///
/// Holds 2–4 entries depending on the dimension flags (Z always precedes M
/// when both are present), or none at all for `POINT EMPTY`.
pub type Position = Vec<f64>;

// ── EWKB type-word flags ──────────────────────────────────────────────────────
pub const EWKB_SRID_FLAG: u32 = 0x2000_0000;
pub const EWKB_M_FLAG: u32 = 0x4000_0000;
pub const EWKB_Z_FLAG: u32 = 0x8000_0000;

/// Mask selecting the base-kind bits of the type word.
pub const KIND_MASK: u32 = 0xFFFF;

/// Base geometry kinds addressable by a WKB type code.
///
/// Every OGC base-kind code resolves to a name here, but only the kinds
/// with a wire grammar implemented by the decoder can be decoded; see
/// [`Kind::is_decodable`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    Point,
    LineString,
    Polygon,
    MultiPoint,
    MultiLineString,
    MultiPolygon,
    GeometryCollection,
    CircularString,
    CompoundCurve,
    CurvePolygon,
    MultiCurve,
    MultiSurface,
    PolyhedralSurface,
    Tin,
    Triangle,
}

impl Kind {
    /// Resolve a masked base-kind code.
    ///
    /// # Example
    ///
    /// ```
    /// use wkbtree_core::geometry::Kind;
    ///
    /// assert_eq!(Kind::from_code(1), Some(Kind::Point));
    /// assert_eq!(Kind::from_code(21), None);
    /// ```
    pub fn from_code(code: u32) -> Option<Kind> {
        let kind = match code {
            1 => Kind::Point,
            2 => Kind::LineString,
            3 => Kind::Polygon,
            4 => Kind::MultiPoint,
            5 => Kind::MultiLineString,
            6 => Kind::MultiPolygon,
            7 => Kind::GeometryCollection,
            8 => Kind::CircularString,
            9 => Kind::CompoundCurve,
            10 => Kind::CurvePolygon,
            11 => Kind::MultiCurve,
            12 => Kind::MultiSurface,
            15 => Kind::PolyhedralSurface,
            16 => Kind::Tin,
            17 => Kind::Triangle,
            _ => return None,
        };
        Some(kind)
    }

    /// Base-kind code as it appears in the masked type word.
    pub fn code(self) -> u32 {
        match self {
            Kind::Point => 1,
            Kind::LineString => 2,
            Kind::Polygon => 3,
            Kind::MultiPoint => 4,
            Kind::MultiLineString => 5,
            Kind::MultiPolygon => 6,
            Kind::GeometryCollection => 7,
            Kind::CircularString => 8,
            Kind::CompoundCurve => 9,
            Kind::CurvePolygon => 10,
            Kind::MultiCurve => 11,
            Kind::MultiSurface => 12,
            Kind::PolyhedralSurface => 15,
            Kind::Tin => 16,
            Kind::Triangle => 17,
        }
    }

    /// Canonical upper-case display name.
    pub fn name(self) -> &'static str {
        match self {
            Kind::Point => "POINT",
            Kind::LineString => "LINESTRING",
            Kind::Polygon => "POLYGON",
            Kind::MultiPoint => "MULTIPOINT",
            Kind::MultiLineString => "MULTILINESTRING",
            Kind::MultiPolygon => "MULTIPOLYGON",
            Kind::GeometryCollection => "GEOMETRYCOLLECTION",
            Kind::CircularString => "CIRCULARSTRING",
            Kind::CompoundCurve => "COMPOUNDCURVE",
            Kind::CurvePolygon => "CURVEPOLYGON",
            Kind::MultiCurve => "MULTICURVE",
            Kind::MultiSurface => "MULTISURFACE",
            Kind::PolyhedralSurface => "POLYHEDRALSURFACE",
            Kind::Tin => "TIN",
            Kind::Triangle => "TRIANGLE",
        }
    }

    /// True for the kinds the decoder has a body reader for.
    pub fn is_decodable(self) -> bool {
        matches!(
            self,
            Kind::Point
                | Kind::LineString
                | Kind::Polygon
                | Kind::MultiPoint
                | Kind::MultiLineString
                | Kind::MultiPolygon
                | Kind::GeometryCollection
                | Kind::CircularString
        )
    }
}

/// Z/M dimension flags decoded from the high bits of the type word.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Dimensions {
    pub has_z: bool,
    pub has_m: bool,
}

impl Dimensions {
    /// Extract the Z/M flags from a raw type word.
    pub fn from_type_code(type_code: u32) -> Self {
        Self {
            has_z: type_code & EWKB_Z_FLAG != 0,
            has_m: type_code & EWKB_M_FLAG != 0,
        }
    }

    /// Coordinate tuple arity (2, 3, or 4).
    pub fn coord_len(self) -> usize {
        2 + usize::from(self.has_z) + usize::from(self.has_m)
    }

    /// PostGIS-style ZM flag: 0 = 2D, 1 = M only, 2 = Z only, 3 = ZM.
    pub fn zm_flag(self) -> i32 {
        match (self.has_z, self.has_m) {
            (false, false) => 0,
            (false, true) => 1,
            (true, false) => 2,
            (true, true) => 3,
        }
    }

    /// Display-name suffix, leading space included.
    pub fn suffix(self) -> &'static str {
        match (self.has_z, self.has_m) {
            (false, false) => "",
            (false, true) => " M",
            (true, false) => " Z",
            (true, true) => " ZM",
        }
    }
}

/// One decoded geometry node.
#[derive(Debug, Clone, PartialEq)]
pub struct Geometry {
    /// Base kind from the masked type word.
    pub kind: Kind,
    /// Z/M flags; fixed for the node's entire body, nested members
    /// included.
    pub dims: Dimensions,
    /// SRID from the EWKB header, when the SRID flag was set.
    pub srid: Option<i32>,
    /// Kind-dependent payload.
    pub value: Value,
}

impl Geometry {
    /// Display type name: upper-case base kind plus dimension suffix
    /// (`"POINT"`, `"LINESTRING Z"`, `"MULTIPOINT ZM"`, …).
    pub fn type_name(&self) -> String {
        format!("{}{}", self.kind.name(), self.dims.suffix())
    }

    /// True when the node holds no coordinates or members.
    pub fn is_empty(&self) -> bool {
        match &self.value {
            Value::Point(coords) => coords.is_empty(),
            Value::LineString(points) => points.is_empty(),
            Value::Polygon(rings) => rings.is_empty(),
            Value::MultiPoint(points) => points.is_empty(),
            Value::MultiLineString(lines) => lines.is_empty(),
            Value::MultiPolygon(polygons) => polygons.is_empty(),
            Value::Collection(members) => members.is_empty(),
        }
    }

    /// Convert to a `serde_json::Value` in the external
    /// `{type, srid, value}` shape.
    ///
    /// # Example
    ///
    /// ```
    /// use wkbtree_core::decode;
    ///
    /// let geom = decode("0101000000000000000000244000000000000034C0").unwrap();
    /// let json = geom.to_json().unwrap();
    /// assert_eq!(json["type"], "POINT");
    /// assert_eq!(json["value"][0], 10.0);
    /// ```
    pub fn to_json(&self) -> crate::error::Result<serde_json::Value> {
        Ok(serde_json::to_value(self)?)
    }
}

impl fmt::Display for Geometry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.kind.name(), self.dims.suffix())
    }
}

/// Kind-dependent payload of a geometry node.
///
/// `CircularString` shares the `LineString` payload shape; the node's
/// [`Kind`] keeps them apart.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Point(Position),
    LineString(Vec<Position>),
    Polygon(Vec<Vec<Position>>),
    MultiPoint(Vec<Position>),
    MultiLineString(Vec<Vec<Position>>),
    MultiPolygon(Vec<Vec<Vec<Position>>>),
    Collection(Vec<Geometry>),
}

impl Serialize for Geometry {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(3))?;
        map.serialize_entry("type", &self.type_name())?;
        map.serialize_entry("srid", &self.srid)?;
        map.serialize_entry("value", &self.value)?;
        map.end()
    }
}

impl Serialize for Value {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Value::Point(coords) => coords.serialize(serializer),
            Value::LineString(points) | Value::MultiPoint(points) => {
                points.serialize(serializer)
            }
            Value::Polygon(rings) | Value::MultiLineString(rings) => rings.serialize(serializer),
            Value::MultiPolygon(polygons) => polygons.serialize(serializer),
            Value::Collection(members) => {
                serializer.collect_seq(members.iter().map(CollectionMember))
            }
        }
    }
}

// Collection members serialize as `{type, value}`: the parent carries the
// srid and the dimension suffix.
struct CollectionMember<'a>(&'a Geometry);

impl Serialize for CollectionMember<'_> {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(2))?;
        map.serialize_entry("type", self.0.kind.name())?;
        map.serialize_entry("value", &self.0.value)?;
        map.end()
    }
}
