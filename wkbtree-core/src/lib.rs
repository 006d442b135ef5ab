#![doc = include_str!("../../README.md")]
//! Crate-specific API surface for `wkbtree-core`.

pub mod decoder;
pub mod error;
pub mod geometry;
pub mod reader;

pub use decoder::{decode, decode_header, extract_srid, Decoder, Header};
pub use error::{Result, WkbTreeError};
pub use geometry::{Dimensions, Geometry, Kind, Position, Value};
pub use reader::{ByteOrder, ByteReader};
