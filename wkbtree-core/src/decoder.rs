//! Recursive-descent WKB/EWKB decoder.
//!
//! Wire format, repeated for every geometry including nested sub-geometries:
//!   [0x00|0x01]   — byte order marker (big-endian or little-endian)
//!   [u32]         — geometry type word (in the declared byte order)
//!                   Bit 0x20000000: SRID present
//!                   Bit 0x40000000: M dimension
//!                   Bit 0x80000000: Z dimension
//!                   Bits 0–15: base kind (1=Point, 2=LineString, …)
//!   [i32]         — SRID (only when the SRID flag is set)
//!   …             — kind-specific body
//!
//! Each (sub)geometry's multi-byte fields use the order declared by its own
//! leading byte, independent of ancestors. Declared element counts are
//! untrusted: an oversized count runs the reader off the end of the buffer
//! and the decode aborts with `InsufficientInput`.

use crate::error::{Result, WkbTreeError};
use crate::geometry::{Dimensions, Geometry, Kind, Position, Value, EWKB_SRID_FLAG, KIND_MASK};
use crate::reader::{ByteOrder, ByteReader};

/// Recursive-descent decoder owning its [`ByteReader`].
///
/// A decoder carries no state between decode calls; reuse one across
/// inputs, or create one per concurrent decode (they are cheap).
#[derive(Debug, Default)]
pub struct Decoder {
    reader: ByteReader,
}

impl Decoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode one geometry from raw binary or hex text.
    ///
    /// # Example
    ///
    /// ```
    /// use wkbtree_core::decoder::Decoder;
    ///
    /// let mut decoder = Decoder::new();
    /// let geom = decoder
    ///     .decode("0101000000000000000000244000000000000034C0")
    ///     .unwrap();
    /// assert_eq!(geom.type_name(), "POINT");
    /// assert_eq!(geom.srid, None);
    /// ```
    pub fn decode(&mut self, input: impl AsRef<[u8]>) -> Result<Geometry> {
        self.reader.load(input)?;
        self.read_geometry()
    }

    // Header + dispatch; run once per geometry, nested ones included.
    fn read_geometry(&mut self) -> Result<Geometry> {
        self.reader.read_byte_order()?;
        let type_code = self.reader.read_u32()?;
        let srid = if type_code & EWKB_SRID_FLAG != 0 {
            Some(self.reader.read_i32()?)
        } else {
            None
        };
        let dims = Dimensions::from_type_code(type_code);
        let kind = decodable_kind(type_code)?;
        let value = self.read_body(kind, dims)?;
        Ok(Geometry {
            kind,
            dims,
            srid,
            value,
        })
    }

    fn read_body(&mut self, kind: Kind, dims: Dimensions) -> Result<Value> {
        match kind {
            Kind::Point => Ok(Value::Point(self.read_point_body(dims)?)),
            Kind::LineString | Kind::CircularString => {
                Ok(Value::LineString(self.read_line_body(dims)?))
            }
            Kind::Polygon => Ok(Value::Polygon(self.read_polygon_body(dims)?)),
            Kind::MultiPoint => Ok(Value::MultiPoint(self.read_multi_point_body(dims)?)),
            Kind::MultiLineString => {
                Ok(Value::MultiLineString(self.read_multi_line_body(dims)?))
            }
            Kind::MultiPolygon => Ok(Value::MultiPolygon(self.read_multi_polygon_body(dims)?)),
            Kind::GeometryCollection => Ok(Value::Collection(self.read_collection_body(dims)?)),
            // Unreachable: both entry points run decodable_kind first.
            other => Err(WkbTreeError::UnsupportedType(other.code())),
        }
    }

    fn read_tuple(&mut self, dims: Dimensions) -> Result<Position> {
        let mut coords = Vec::with_capacity(dims.coord_len());
        for _ in 0..dims.coord_len() {
            coords.push(self.reader.read_f64()?);
        }
        Ok(coords)
    }

    // Fixed-arity tuple, no count prefix. An all-NaN tuple is the
    // POINT EMPTY encoding and collapses to no coordinates.
    fn read_point_body(&mut self, dims: Dimensions) -> Result<Position> {
        let mut coords = self.read_tuple(dims)?;
        if coords.iter().all(|c| c.is_nan()) {
            coords.clear();
        }
        Ok(coords)
    }

    // Count-prefixed run of flat tuples; shared by LineString,
    // CircularString, and polygon rings.
    fn read_line_body(&mut self, dims: Dimensions) -> Result<Vec<Position>> {
        let count = self.reader.read_u32()? as usize;
        let mut points = Vec::new();
        for _ in 0..count {
            points.push(self.read_tuple(dims)?);
        }
        Ok(points)
    }

    fn read_polygon_body(&mut self, dims: Dimensions) -> Result<Vec<Vec<Position>>> {
        let ring_count = self.reader.read_u32()? as usize;
        let mut rings = Vec::new();
        for _ in 0..ring_count {
            rings.push(self.read_line_body(dims)?);
        }
        Ok(rings)
    }

    // Every multi-geometry element repeats a byte-order byte and a type
    // word. The byte order becomes active for the element; the type word
    // is returned for callers that resolve it and ignored by those that
    // don't (its flags are never re-checked — elements inherit the
    // parent's coordinate arity).
    fn read_element_header(&mut self) -> Result<u32> {
        self.reader.read_byte_order()?;
        self.reader.read_u32()
    }

    fn read_multi_point_body(&mut self, dims: Dimensions) -> Result<Vec<Position>> {
        let count = self.reader.read_u32()? as usize;
        let mut points = Vec::new();
        for _ in 0..count {
            self.read_element_header()?;
            points.push(self.read_point_body(dims)?);
        }
        Ok(points)
    }

    fn read_multi_line_body(&mut self, dims: Dimensions) -> Result<Vec<Vec<Position>>> {
        let count = self.reader.read_u32()? as usize;
        let mut lines = Vec::new();
        for _ in 0..count {
            self.read_element_header()?;
            lines.push(self.read_line_body(dims)?);
        }
        Ok(lines)
    }

    fn read_multi_polygon_body(&mut self, dims: Dimensions) -> Result<Vec<Vec<Vec<Position>>>> {
        let count = self.reader.read_u32()? as usize;
        let mut polygons = Vec::new();
        for _ in 0..count {
            self.read_element_header()?;
            polygons.push(self.read_polygon_body(dims)?);
        }
        Ok(polygons)
    }

    // Collection members resolve their own base kind and recurse. They
    // inherit the parent's coordinate arity and carry no SRID of their own.
    fn read_collection_body(&mut self, dims: Dimensions) -> Result<Vec<Geometry>> {
        let count = self.reader.read_u32()? as usize;
        let mut members = Vec::new();
        for _ in 0..count {
            let type_word = self.read_element_header()?;
            let kind = decodable_kind(type_word)?;
            let value = self.read_body(kind, dims)?;
            members.push(Geometry {
                kind,
                dims,
                srid: None,
                value,
            });
        }
        Ok(members)
    }
}

// Resolve the masked base kind, accepting only kinds with a body reader.
fn decodable_kind(type_word: u32) -> Result<Kind> {
    let code = type_word & KIND_MASK;
    match Kind::from_code(code) {
        Some(kind) if kind.is_decodable() => Ok(kind),
        _ => Err(WkbTreeError::UnsupportedType(code)),
    }
}

/// Decode one geometry with a throwaway [`Decoder`].
///
/// # Example
///
/// ```
/// use wkbtree_core::decode;
///
/// // SRID=4326;POINT(10 -20)
/// let geom = decode("0101000020E6100000000000000000244000000000000034C0").unwrap();
/// assert_eq!(geom.type_name(), "POINT");
/// assert_eq!(geom.srid, Some(4326));
/// ```
pub fn decode(input: impl AsRef<[u8]>) -> Result<Geometry> {
    Decoder::new().decode(input)
}

/// Parsed header metadata, available without decoding a body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header {
    /// Masked base-kind code (1=Point, 2=LineString, …); may name a kind
    /// this crate cannot decode.
    pub kind_code: u32,
    /// SRID embedded in the header, if the SRID flag is set.
    pub srid: Option<i32>,
    /// Z/M dimension flags from the type word.
    pub dims: Dimensions,
    /// Byte order declared by the leading marker.
    pub byte_order: ByteOrder,
    /// Offset where the kind-specific body starts.
    pub data_offset: usize,
}

impl Header {
    /// Base kind named by the header, when the code is known at all.
    pub fn kind(&self) -> Option<Kind> {
        Kind::from_code(self.kind_code)
    }
}

/// Peek at byte order, type word, and SRID without touching the body.
///
/// Unlike [`decode`] this accepts headers naming kinds the decoder cannot
/// descend into, so callers can report what they were handed.
///
/// # Example
///
/// ```
/// use wkbtree_core::decoder::decode_header;
///
/// let hdr = decode_header("0101000020E6100000000000000000244000000000000034C0").unwrap();
/// assert_eq!(hdr.kind_code, 1);
/// assert_eq!(hdr.srid, Some(4326));
/// assert_eq!(hdr.data_offset, 9); // 1 + 4 + 4
/// ```
pub fn decode_header(input: impl AsRef<[u8]>) -> Result<Header> {
    let mut reader = ByteReader::new();
    reader.load(input)?;
    let byte_order = reader.read_byte_order()?;
    let type_code = reader.read_u32()?;
    let srid = if type_code & EWKB_SRID_FLAG != 0 {
        Some(reader.read_i32()?)
    } else {
        None
    };
    Ok(Header {
        kind_code: type_code & KIND_MASK,
        srid,
        dims: Dimensions::from_type_code(type_code),
        byte_order,
        data_offset: reader.position(),
    })
}

/// Extract only the SRID from a blob (cheap, no body decoding).
///
/// # Example
///
/// ```
/// use wkbtree_core::decoder::extract_srid;
///
/// let with_srid = "0101000020E6100000000000000000244000000000000034C0";
/// assert_eq!(extract_srid(with_srid), Some(4326));
/// assert_eq!(extract_srid("0101000000"), None);
/// assert_eq!(extract_srid([0xFFu8, 0xFF].as_slice()), None);
/// ```
pub fn extract_srid(input: impl AsRef<[u8]>) -> Option<i32> {
    decode_header(input).ok().and_then(|h| h.srid)
}
