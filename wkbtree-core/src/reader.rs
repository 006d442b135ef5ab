//! Byte-order-aware primitive reader over an owned WKB/EWKB buffer.
//!
//! Input may arrive as raw binary or as hex text (optional `0x`/`x` prefix,
//! either case). Detection rule: no hex digit or prefix character has a
//! value below 32, so a first byte below 32 means the buffer is already
//! binary; anything else is decoded from hex.

use std::io::Cursor;

use byteorder::{BigEndian, LittleEndian, ReadBytesExt};

use crate::error::{Result, WkbTreeError};

/// Byte order declared by a (sub)geometry's leading marker byte.
///
/// XDR (marker `0`) is big-endian, NDR (marker `1`) is little-endian.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ByteOrder {
    BigEndian,
    LittleEndian,
}

impl ByteOrder {
    /// Map a wire marker byte to a byte order.
    pub fn from_marker(marker: u8) -> Result<Self> {
        match marker {
            0 => Ok(ByteOrder::BigEndian),
            1 => Ok(ByteOrder::LittleEndian),
            other => Err(WkbTreeError::InvalidByteOrder(other)),
        }
    }
}

/// Forward-only cursor over one geometry blob.
///
/// Every multi-byte read requires a byte order established by
/// [`read_byte_order`](Self::read_byte_order) for the current input;
/// [`load`](Self::load) clears the order so state never leaks from a
/// previous decode.
#[derive(Debug, Default)]
pub struct ByteReader {
    cursor: Cursor<Vec<u8>>,
    byte_order: Option<ByteOrder>,
}

impl ByteReader {
    /// Create an empty reader; call [`load`](Self::load) before reading.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a new input buffer, resetting the cursor and byte order.
    ///
    /// # Example
    ///
    /// ```
    /// use wkbtree_core::reader::ByteReader;
    ///
    /// let mut reader = ByteReader::new();
    /// reader.load("0x0102").unwrap();
    /// assert_eq!(reader.remaining(), 2);
    ///
    /// reader.load([0x01, 0x02, 0x03]).unwrap();
    /// assert_eq!(reader.remaining(), 3);
    /// ```
    pub fn load(&mut self, input: impl AsRef<[u8]>) -> Result<()> {
        self.cursor = Cursor::new(normalize(input.as_ref())?);
        self.byte_order = None;
        Ok(())
    }

    /// Byte order established for the current decode context, if any.
    pub fn byte_order(&self) -> Option<ByteOrder> {
        self.byte_order
    }

    /// Current offset into the (normalized) buffer.
    pub fn position(&self) -> usize {
        self.cursor.position() as usize
    }

    /// Bytes left between the cursor and the end of the buffer.
    pub fn remaining(&self) -> usize {
        self.cursor.get_ref().len().saturating_sub(self.position())
    }

    fn ensure(&self, needed: usize) -> Result<()> {
        let available = self.remaining();
        if available < needed {
            return Err(WkbTreeError::InsufficientInput {
                needed,
                available,
                offset: self.position(),
            });
        }
        Ok(())
    }

    fn active_order(&self) -> Result<ByteOrder> {
        self.byte_order.ok_or(WkbTreeError::UnsetByteOrder)
    }

    /// Consume one byte.
    pub fn read_u8(&mut self) -> Result<u8> {
        self.ensure(1)?;
        Ok(self.cursor.read_u8()?)
    }

    /// Consume the 1-byte order marker and make it the active order.
    pub fn read_byte_order(&mut self) -> Result<ByteOrder> {
        let order = ByteOrder::from_marker(self.read_u8()?)?;
        self.byte_order = Some(order);
        Ok(order)
    }

    /// Consume 4 bytes as an unsigned integer under the active order.
    pub fn read_u32(&mut self) -> Result<u32> {
        let order = self.active_order()?;
        self.ensure(4)?;
        Ok(match order {
            ByteOrder::BigEndian => self.cursor.read_u32::<BigEndian>()?,
            ByteOrder::LittleEndian => self.cursor.read_u32::<LittleEndian>()?,
        })
    }

    /// Consume 4 bytes as a signed integer (the SRID word) under the
    /// active order.
    pub fn read_i32(&mut self) -> Result<i32> {
        let order = self.active_order()?;
        self.ensure(4)?;
        Ok(match order {
            ByteOrder::BigEndian => self.cursor.read_i32::<BigEndian>()?,
            ByteOrder::LittleEndian => self.cursor.read_i32::<LittleEndian>()?,
        })
    }

    /// Consume 8 bytes as an IEEE-754 double under the active order.
    pub fn read_f64(&mut self) -> Result<f64> {
        let order = self.active_order()?;
        self.ensure(8)?;
        Ok(match order {
            ByteOrder::BigEndian => self.cursor.read_f64::<BigEndian>()?,
            ByteOrder::LittleEndian => self.cursor.read_f64::<LittleEndian>()?,
        })
    }
}

fn normalize(input: &[u8]) -> Result<Vec<u8>> {
    match input.first() {
        Some(&first) if first >= 32 => decode_hex(input),
        _ => Ok(input.to_vec()),
    }
}

fn decode_hex(text: &[u8]) -> Result<Vec<u8>> {
    let digits = match text {
        [b'0', b'x' | b'X', rest @ ..] => rest,
        [b'x' | b'X', rest @ ..] => rest,
        _ => text,
    };
    if digits.len() % 2 != 0 {
        return Err(WkbTreeError::InvalidHex("odd number of hex digits"));
    }
    let mut bytes = Vec::with_capacity(digits.len() / 2);
    for pair in digits.chunks_exact(2) {
        bytes.push(hex_value(pair[0])? << 4 | hex_value(pair[1])?);
    }
    Ok(bytes)
}

fn hex_value(digit: u8) -> Result<u8> {
    match digit {
        b'0'..=b'9' => Ok(digit - b'0'),
        b'a'..=b'f' => Ok(digit - b'a' + 10),
        b'A'..=b'F' => Ok(digit - b'A' + 10),
        _ => Err(WkbTreeError::InvalidHex("non-hex digit in input")),
    }
}
