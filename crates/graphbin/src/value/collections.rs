// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Rectangular arrays and sorted maps.

use crate::error::{Error, Result};
use crate::value::Value;
use std::cmp::Ordering;

// ---------------------------------------------------------------------------
// MultiArray
// ---------------------------------------------------------------------------

/// Rank-N rectangular array stored row-major.
#[derive(Debug, Clone, PartialEq)]
pub struct MultiArray {
    lengths: Vec<usize>,
    items: Vec<Value>,
}

impl MultiArray {
    /// Allocate an array of the given shape filled with `fill`.
    pub fn new(lengths: Vec<usize>, fill: Value) -> Result<Self> {
        let total = checked_total(&lengths)?;
        Ok(Self {
            lengths,
            items: vec![fill; total],
        })
    }

    /// Wrap row-major items; `items.len()` must equal the product of `lengths`.
    pub fn from_items(lengths: Vec<usize>, items: Vec<Value>) -> Result<Self> {
        let total = checked_total(&lengths)?;
        if total != items.len() {
            return Err(Error::InvalidValue(format!(
                "shape {:?} holds {} elements, got {}",
                lengths,
                total,
                items.len()
            )));
        }
        Ok(Self { lengths, items })
    }

    pub fn rank(&self) -> usize {
        self.lengths.len()
    }

    pub fn lengths(&self) -> &[usize] {
        &self.lengths
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Row-major elements.
    pub fn items(&self) -> &[Value] {
        &self.items
    }

    fn offset(&self, coords: &[usize]) -> Option<usize> {
        if coords.len() != self.lengths.len() {
            return None;
        }
        let mut offset = 0usize;
        for (c, len) in coords.iter().zip(&self.lengths) {
            if c >= len {
                return None;
            }
            offset = offset * len + c;
        }
        Some(offset)
    }

    pub fn get(&self, coords: &[usize]) -> Option<&Value> {
        self.offset(coords).map(|i| &self.items[i])
    }

    pub fn set(&mut self, coords: &[usize], value: impl Into<Value>) -> Result<()> {
        let offset = self.offset(coords).ok_or_else(|| {
            Error::InvalidValue(format!(
                "coordinates {:?} outside shape {:?}",
                coords, self.lengths
            ))
        })?;
        self.items[offset] = value.into();
        Ok(())
    }

    /// Every coordinate tuple in odometer order.
    pub fn coordinates(&self) -> Odometer {
        Odometer::new(self.lengths.clone())
    }
}

fn checked_total(lengths: &[usize]) -> Result<usize> {
    if lengths.is_empty() {
        return Err(Error::InvalidValue("rank must be at least 1".into()));
    }
    lengths
        .iter()
        .try_fold(1usize, |acc, len| acc.checked_mul(*len))
        .ok_or_else(|| Error::InvalidValue(format!("shape {:?} overflows", lengths)))
}

/// Row-major coordinate walk: bump the last index, carry into earlier ones.
#[derive(Debug, Clone)]
pub struct Odometer {
    lengths: Vec<usize>,
    current: Option<Vec<usize>>,
}

impl Odometer {
    pub fn new(lengths: Vec<usize>) -> Self {
        let current = if lengths.is_empty() || lengths.contains(&0) {
            None
        } else {
            Some(vec![0; lengths.len()])
        };
        Self { lengths, current }
    }
}

impl Iterator for Odometer {
    type Item = Vec<usize>;

    fn next(&mut self) -> Option<Vec<usize>> {
        let coords = self.current.take()?;
        let mut next = coords.clone();
        let mut dim = next.len();
        while dim > 0 {
            dim -= 1;
            next[dim] += 1;
            if next[dim] < self.lengths[dim] {
                self.current = Some(next);
                break;
            }
            next[dim] = 0;
        }
        Some(coords)
    }
}

// ---------------------------------------------------------------------------
// SortedMap
// ---------------------------------------------------------------------------

/// Map kept sorted by [`Value::total_cmp`] on its keys.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SortedMap {
    entries: Vec<(Value, Value)>,
}

impl SortedMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace; returns the previous value. Null keys are rejected.
    pub fn insert(&mut self, key: impl Into<Value>, value: impl Into<Value>) -> Result<Option<Value>> {
        let key = key.into();
        if key.is_null() {
            return Err(Error::InvalidValue("sorted map keys cannot be null".into()));
        }
        let value = value.into();
        match self.entries.binary_search_by(|(k, _)| k.total_cmp(&key)) {
            Ok(i) => Ok(Some(std::mem::replace(&mut self.entries[i].1, value))),
            Err(i) => {
                self.entries.insert(i, (key, value));
                Ok(None)
            }
        }
    }

    pub fn get(&self, key: &Value) -> Option<&Value> {
        self.entries
            .binary_search_by(|(k, _)| k.total_cmp(key))
            .ok()
            .map(|i| &self.entries[i].1)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Pairs in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&Value, &Value)> {
        self.entries.iter().map(|(k, v)| (k, v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &Value> {
        self.entries.iter().map(|(k, _)| k)
    }
}

impl Value {
    /// Total order used for sorted-map keys.
    ///
    /// Values of different variants order by variant; within a variant by
    /// natural order (floats via `total_cmp`, identity values by address).
    pub fn total_cmp(&self, other: &Value) -> Ordering {
        use Value::*;
        match (self, other) {
            (Bool(a), Bool(b)) => a.cmp(b),
            (Char(a), Char(b)) => a.cmp(b),
            (I8(a), I8(b)) => a.cmp(b),
            (U8(a), U8(b)) => a.cmp(b),
            (I16(a), I16(b)) => a.cmp(b),
            (U16(a), U16(b)) => a.cmp(b),
            (I32(a), I32(b)) => a.cmp(b),
            (U32(a), U32(b)) => a.cmp(b),
            (I64(a), I64(b)) => a.cmp(b),
            (U64(a), U64(b)) => a.cmp(b),
            (F32(a), F32(b)) => a.total_cmp(b),
            (F64(a), F64(b)) => a.total_cmp(b),
            (Decimal(a), Decimal(b)) => a.cmp(b).then_with(|| a.scale().cmp(&b.scale())),
            (Guid(a), Guid(b)) => a.cmp(b),
            (DateTime(a), DateTime(b)) => a.cmp(b),
            (DateTimeOffset(a), DateTimeOffset(b)) => a.cmp(b),
            (TimeSpan(a), TimeSpan(b)) => a.cmp(b),
            (String(a), String(b)) => a.cmp(b),
            (Enum(a), Enum(b)) => a
                .type_name()
                .cmp(b.type_name())
                .then_with(|| a.raw().cmp(&b.raw())),
            (Tuple(a), Tuple(b)) => {
                for (x, y) in a.iter().zip(b) {
                    let ord = x.total_cmp(y);
                    if ord != Ordering::Equal {
                        return ord;
                    }
                }
                a.len().cmp(&b.len())
            }
            (Object(a), Object(b)) => a.addr().cmp(&b.addr()),
            (Array(a), Array(b)) => a.addr().cmp(&b.addr()),
            _ => self.variant_rank().cmp(&other.variant_rank()),
        }
    }
}
