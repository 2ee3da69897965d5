// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! One-dimensional arrays (`T[]`, jagged arrays are arrays of arrays).
//!
//! # Wire shape
//!
//! ```text
//! flag null
//! pool seen/new (+ id)
//! flag any
//! item u32 count          (reserved, patched after the elements)
//! elements...
//! ```

use crate::container::len_u32;
use crate::error::{Error, Result};
use crate::operator::{
    build_follows, check_count, write_null_flag, Follows, Operator, OperatorRegistry,
    ReadContext, WriteContext,
};
use crate::types::TypeRef;
use crate::value::{ArrayRef, Value};
use std::sync::Arc;

/// Upper bound on the capacity pre-allocated from an untrusted count.
pub(crate) const PREALLOC_LIMIT: usize = 4096;

#[derive(Debug)]
pub struct ArrayOperator {
    raw: TypeRef,
    element: TypeRef,
    follows: Follows,
}

impl ArrayOperator {
    pub fn new(element: TypeRef) -> Self {
        Self {
            raw: TypeRef::array(element.clone()),
            element,
            follows: Follows::new(),
        }
    }
}

impl Operator for ArrayOperator {
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
            Value::Null | Value::Array(_) => value.as_array(),
            other => return Err(Error::mismatch(&self.raw, other)),
        };
        if write_null_flag(&mut ctx.container, value) {
            return Ok(());
        }
        let Some(array) = array else {
            return Ok(());
        };
        if ctx.pool.write(&mut ctx.container, value)? {
            return Ok(());
        }
        ctx.pool.add_object(value);
        ctx.pool.enter(value)?;
        // Snapshot so a cyclic element never re-locks this array.
        let items = array.to_vec();
        let result = write_elements(ctx, element.as_ref(), items.len(), items.iter());
        ctx.pool.exit(value);
        result
    }

    fn read(&self, ctx: &mut ReadContext<'_>) -> Result<Value> {
        let element = self.follows.wait(&self.raw)?[0].clone();
        if ctx.container.read_flag()? {
            return Ok(Value::Null);
        }
        if let Some(seen) = ctx.pool.read(&mut ctx.container)? {
            return match seen {
                Value::Array(_) => Ok(seen),
                other => Err(Error::Malformed(format!(
                    "array slot refers to pooled {}",
                    other.kind_name()
                ))),
            };
        }
        let count = read_count(ctx)?;
        let shell = ArrayRef::with_capacity(count.min(PREALLOC_LIMIT));
        ctx.pool.add_object(Value::Array(shell.clone()));
        for _ in 0..count {
            shell.push(ctx.read_child(element.as_ref())?);
        }
        Ok(Value::Array(shell))
    }
}

/// Any flag, then a reserved count patched after the elements.
pub(crate) fn write_elements<'v, I>(
    ctx: &mut WriteContext<'_>,
    element: &dyn Operator,
    len: usize,
    items: I,
) -> Result<()>
where
    I: Iterator<Item = &'v Value>,
{
    write_sequence(ctx, len, items, |ctx, item| ctx.write_child(element, item))
}

/// Shared any/count/elements framing for every sequence-shaped codec.
pub(crate) fn write_sequence<T, I, F>(
    ctx: &mut WriteContext<'_>,
    hint: usize,
    items: I,
    mut write_one: F,
) -> Result<()>
where
    I: Iterator<Item = T>,
    F: FnMut(&mut WriteContext<'_>, T) -> Result<()>,
{
    ctx.container.write_flag(hint > 0);
    if hint == 0 {
        return Ok(());
    }
    let reservation = ctx.container.reserve(4);
    let mut count = 0usize;
    for item in items {
        write_one(ctx, item)?;
        count += 1;
    }
    ctx.container.patch_u32(reservation, len_u32(count)?)
}

/// Read the any flag and, when set, the element count.
pub(crate) fn read_count(ctx: &mut ReadContext<'_>) -> Result<usize> {
    if !ctx.container.read_flag()? {
        return Ok(0);
    }
    let count = ctx.container.read_u32()? as usize;
    check_count(count, ctx.config)?;
    Ok(count)
}
