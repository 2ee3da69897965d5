// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Rank-N rectangular arrays (`T[,]`, `T[,,]`, ...).
//!
//! # Wire shape
//!
//! ```text
//! flag null
//! item u8 rank, item u32 length per dimension
//! flag any
//! elements in odometer order          (only when any)
//! ```
//!
//! The shape is written even when empty, so `[0, 5]` and `[5, 0]` survive.

use crate::container::len_u32;
use crate::error::{Error, Result};
use crate::operator::array::PREALLOC_LIMIT;
use crate::operator::{
    build_follows, check_count, write_null_flag, Follows, Operator, OperatorRegistry,
    ReadContext, WriteContext,
};
use crate::types::TypeRef;
use crate::value::{MultiArray, Value};
use std::sync::Arc;

#[derive(Debug)]
pub struct MultiArrayOperator {
    raw: TypeRef,
    element: TypeRef,
    rank: u8,
    follows: Follows,
}

impl MultiArrayOperator {
    pub fn new(element: TypeRef, rank: u8) -> Self {
        Self {
            raw: TypeRef::multi_array(element.clone(), rank),
            element,
            rank,
            follows: Follows::new(),
        }
    }
}

impl Operator for MultiArrayOperator {
    fn raw(&self) -> &TypeRef {
        &self.raw
    }

    fn build(&self, registry: &OperatorRegistry) -> Result<()> {
        build_follows(&self.follows, registry, &[&self.element])
    }

    fn follows(&self) -> Result<&[Arc<dyn Operator>]> {
        self.follows.wait(&self.raw).map(Vec::as_slice)
    }

    fn write(&self, ctx: &mut WriteContext<'_>, value: &Value) -> Result<()> {
        let element = self.follows.wait(&self.raw)?[0].clone();
        let array = match value {
            Value::Null => None,
            Value::MultiArray(a) if a.rank() == usize::from(self.rank) => Some(a),
            other => return Err(Error::mismatch(&self.raw, other)),
        };
        if write_null_flag(&mut ctx.container, value) {
            return Ok(());
        }
        let Some(array) = array else {
            return Ok(());
        };
        ctx.container.write_u8(self.rank);
        for len in array.lengths() {
            ctx.container.write_u32(len_u32(*len)?);
        }
        ctx.container.write_flag(!array.is_empty());
        for coords in array.coordinates() {
            let item = array.get(&coords).ok_or_else(|| {
                Error::InvalidValue(format!("coordinates {:?} outside shape", coords))
            })?;
            ctx.write_child(element.as_ref(), item)?;
        }
        Ok(())
    }

    fn read(&self, ctx: &mut ReadContext<'_>) -> Result<Value> {
        let element = self.follows.wait(&self.raw)?[0].clone();
        if ctx.container.read_flag()? {
            return Ok(Value::Null);
        }
        let rank = ctx.container.read_u8()?;
        if rank != self.rank {
            return Err(Error::Malformed(format!(
                "rank {} in a rank-{} slot",
                rank, self.rank
            )));
        }
        let mut lengths = Vec::with_capacity(usize::from(rank));
        for _ in 0..rank {
            let len = ctx.container.read_u32()? as usize;
            check_count(len, ctx.config)?;
            lengths.push(len);
        }
        let any = ctx.container.read_flag()?;
        let total = lengths
            .iter()
            .try_fold(1usize, |acc, len| acc.checked_mul(*len))
            .ok_or_else(|| Error::Malformed(format!("shape {:?} overflows", lengths)))?;
        check_count(total, ctx.config)?;
        if any != (total > 0) {
            return Err(Error::Malformed("any flag disagrees with shape".into()));
        }
        // Capacity follows the elements actually read, not the header.
        let mut items = Vec::with_capacity(total.min(PREALLOC_LIMIT));
        for _ in 0..total {
            items.push(ctx.read_child(element.as_ref())?);
        }
        let array =
            MultiArray::from_items(lengths, items).map_err(|e| Error::Malformed(e.to_string()))?;
        Ok(Value::MultiArray(array))
    }
}
