// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Three-segment binary container.
//!
//! Every codec writes into three append-only segments and reads them back with
//! independent cursors:
//!
//! ```text
//! +--------+-------------------------------------------------------------+
//! | flags  | one bit per yes/no decision (null, default, seen-before...) |
//! | items  | fixed-width little-endian payloads, counts, pool ids        |
//! | arrays | variable-length byte runs (string bytes, type names)        |
//! +--------+-------------------------------------------------------------+
//! ```
//!
//! Decoding must visit the same flag/item/array slots in the same order as
//! encoding produced them. [`Container::export`] frames the three segments into
//! one buffer and [`Container::import`] splits them again.
//!
//! # Frame layout
//!
//! ```text
//! "GB" | version u8 | flag_bits u32 | items_len u32 | arrays_len u32
//! | flag bytes | items | arrays
//! ```

use crate::error::{Error, Result, Segment};

const MAGIC: [u8; 2] = *b"GB";
const VERSION: u8 = 1;
const HEADER_LEN: usize = 2 + 1 + 4 + 4 + 4;

/// Generate item write/read pairs for fixed-width primitives.
///
/// Each generated writer appends `to_le_bytes()` to the items segment; each
/// reader bounds-checks, decodes with `from_le_bytes()` and advances.
macro_rules! impl_item_le {
    ($write:ident, $read:ident, $type:ty, $size:expr) => {
        pub fn $write(&mut self, value: $type) {
            self.items.extend_from_slice(&value.to_le_bytes());
        }

        pub fn $read(&mut self) -> Result<$type> {
            let mut bytes = [0u8; $size];
            bytes.copy_from_slice(self.take_items($size)?);
            Ok(<$type>::from_le_bytes(bytes))
        }
    };
}

/// Placeholder reserved in the items segment, patched once the real value is known.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use = "a reservation must be patched"]
pub struct Reservation {
    offset: usize,
    len: usize,
}

/// Flags/items/arrays segments with their read cursors.
#[derive(Debug, Default, Clone)]
pub struct Container {
    flags: Vec<u8>,
    flag_bits: usize,
    flag_cursor: usize,
    items: Vec<u8>,
    item_cursor: usize,
    arrays: Vec<u8>,
    array_cursor: usize,
}

impl Container {
    pub fn new() -> Self {
        Self::default()
    }

    // ------------------------------------------------------------------
    // Flags
    // ------------------------------------------------------------------

    pub fn write_flag(&mut self, flag: bool) {
        let byte = self.flag_bits / 8;
        if byte == self.flags.len() {
            self.flags.push(0);
        }
        if flag {
            self.flags[byte] |= 1 << (self.flag_bits % 8);
        }
        self.flag_bits += 1;
    }

    pub fn read_flag(&mut self) -> Result<bool> {
        if self.flag_cursor >= self.flag_bits {
            return Err(Error::Truncated {
                segment: Segment::Flags,
                offset: self.flag_cursor,
                need: 1,
            });
        }
        let bit = self.flags[self.flag_cursor / 8] & (1 << (self.flag_cursor % 8)) != 0;
        self.flag_cursor += 1;
        Ok(bit)
    }

    // ------------------------------------------------------------------
    // Items
    // ------------------------------------------------------------------

    impl_item_le!(write_u8, read_u8, u8, 1);
    impl_item_le!(write_i8, read_i8, i8, 1);
    impl_item_le!(write_u16, read_u16, u16, 2);
    impl_item_le!(write_i16, read_i16, i16, 2);
    impl_item_le!(write_u32, read_u32, u32, 4);
    impl_item_le!(write_i32, read_i32, i32, 4);
    impl_item_le!(write_u64, read_u64, u64, 8);
    impl_item_le!(write_i64, read_i64, i64, 8);

    pub fn write_f32(&mut self, value: f32) {
        self.write_u32(value.to_bits());
    }

    pub fn read_f32(&mut self) -> Result<f32> {
        Ok(f32::from_bits(self.read_u32()?))
    }

    pub fn write_f64(&mut self, value: f64) {
        self.write_u64(value.to_bits());
    }

    pub fn read_f64(&mut self) -> Result<f64> {
        Ok(f64::from_bits(self.read_u64()?))
    }

    pub fn write_item_bytes(&mut self, bytes: &[u8]) {
        self.items.extend_from_slice(bytes);
    }

    pub fn read_item_bytes<const N: usize>(&mut self) -> Result<[u8; N]> {
        let mut bytes = [0u8; N];
        bytes.copy_from_slice(self.take_items(N)?);
        Ok(bytes)
    }

    /// Reserve `len` zeroed bytes in the items segment.
    ///
    /// Used for counts only known after a sequence has been enumerated.
    pub fn reserve(&mut self, len: usize) -> Reservation {
        let offset = self.items.len();
        self.items.resize(offset + len, 0);
        Reservation { offset, len }
    }

    /// Overwrite a 4-byte reservation with its final count.
    pub fn patch_u32(&mut self, reservation: Reservation, value: u32) -> Result<()> {
        if reservation.len != 4 {
            return Err(Error::InvalidValue(format!(
                "cannot patch u32 into {}-byte reservation",
                reservation.len
            )));
        }
        self.items[reservation.offset..reservation.offset + 4].copy_from_slice(&value.to_le_bytes());
        Ok(())
    }

    fn take_items(&mut self, len: usize) -> Result<&[u8]> {
        if self.item_cursor + len > self.items.len() {
            return Err(Error::Truncated {
                segment: Segment::Items,
                offset: self.item_cursor,
                need: len,
            });
        }
        let slice = &self.items[self.item_cursor..self.item_cursor + len];
        self.item_cursor += len;
        Ok(slice)
    }

    // ------------------------------------------------------------------
    // Arrays
    // ------------------------------------------------------------------

    /// Append a byte run. The caller records the length itself.
    pub fn write_run(&mut self, bytes: &[u8]) {
        self.arrays.extend_from_slice(bytes);
    }

    pub fn read_run(&mut self, len: usize) -> Result<&[u8]> {
        if self.array_cursor + len > self.arrays.len() {
            return Err(Error::Truncated {
                segment: Segment::Arrays,
                offset: self.array_cursor,
                need: len,
            });
        }
        let slice = &self.arrays[self.array_cursor..self.array_cursor + len];
        self.array_cursor += len;
        Ok(slice)
    }

    /// Length-prefixed UTF-8: length in items, bytes in arrays.
    pub fn write_str(&mut self, value: &str) -> Result<()> {
        self.write_u32(len_u32(value.len())?);
        self.write_run(value.as_bytes());
        Ok(())
    }

    pub fn read_str(&mut self, max_len: usize) -> Result<String> {
        let len = self.read_u32()? as usize;
        if len > max_len {
            return Err(Error::Malformed(format!(
                "string length {} exceeds limit {}",
                len, max_len
            )));
        }
        let bytes = self.read_run(len)?;
        Ok(std::str::from_utf8(bytes)?.to_owned())
    }

    // ------------------------------------------------------------------
    // Framing
    // ------------------------------------------------------------------

    /// Frame all three segments into one buffer.
    pub fn export(&self) -> Result<Vec<u8>> {
        let mut out =
            Vec::with_capacity(HEADER_LEN + self.flags.len() + self.items.len() + self.arrays.len());
        out.extend_from_slice(&MAGIC);
        out.push(VERSION);
        out.extend_from_slice(&len_u32(self.flag_bits)?.to_le_bytes());
        out.extend_from_slice(&len_u32(self.items.len())?.to_le_bytes());
        out.extend_from_slice(&len_u32(self.arrays.len())?.to_le_bytes());
        out.extend_from_slice(&self.flags);
        out.extend_from_slice(&self.items);
        out.extend_from_slice(&self.arrays);
        Ok(out)
    }

    /// Split a framed buffer into segments with read cursors at the start.
    pub fn import(bytes: &[u8]) -> Result<Self> {
        if bytes.len() < HEADER_LEN {
            return Err(Error::Truncated {
                segment: Segment::Header,
                offset: 0,
                need: HEADER_LEN,
            });
        }
        if bytes[0..2] != MAGIC {
            return Err(Error::Malformed("bad magic".into()));
        }
        if bytes[2] != VERSION {
            return Err(Error::Malformed(format!(
                "unsupported version {}",
                bytes[2]
            )));
        }
        let word = |at: usize| {
            let mut w = [0u8; 4];
            w.copy_from_slice(&bytes[at..at + 4]);
            u32::from_le_bytes(w) as usize
        };
        let flag_bits = word(3);
        let items_len = word(7);
        let arrays_len = word(11);
        let flag_len = flag_bits.div_ceil(8);

        let expected = HEADER_LEN
            .checked_add(flag_len)
            .and_then(|n| n.checked_add(items_len))
            .and_then(|n| n.checked_add(arrays_len))
            .ok_or_else(|| Error::Malformed("segment lengths overflow".into()))?;
        if expected != bytes.len() {
            return Err(Error::Malformed(format!(
                "frame declares {} bytes, buffer holds {}",
                expected,
                bytes.len()
            )));
        }

        let flags_end = HEADER_LEN + flag_len;
        let items_end = flags_end + items_len;
        Ok(Self {
            flags: bytes[HEADER_LEN..flags_end].to_vec(),
            flag_bits,
            flag_cursor: 0,
            items: bytes[flags_end..items_end].to_vec(),
            item_cursor: 0,
            arrays: bytes[items_end..].to_vec(),
            array_cursor: 0,
        })
    }

    /// True once every segment has been fully consumed.
    pub fn is_exhausted(&self) -> bool {
        self.flag_cursor == self.flag_bits
            && self.item_cursor == self.items.len()
            && self.array_cursor == self.arrays.len()
    }
}

pub(crate) fn len_u32(len: usize) -> Result<u32> {
    u32::try_from(len).map_err(|_| Error::InvalidValue(format!("length {} exceeds u32", len)))
}
