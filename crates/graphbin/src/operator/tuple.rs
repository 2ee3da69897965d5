// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Pairs and tuples: null flag, then each component in declaration order.

use crate::error::{Error, Result};
use crate::operator::{
    build_follows, write_null_flag, Follows, Operator, OperatorRegistry, ReadContext,
    WriteContext,
};
use crate::types::TypeRef;
use crate::value::Value;
use std::sync::Arc;

#[derive(Debug)]
pub struct TupleOperator {
    raw: TypeRef,
    items: Vec<TypeRef>,
    follows: Follows,
}

impl TupleOperator {
    pub fn new(items: Vec<TypeRef>) -> Self {
        Self {
            raw: TypeRef::Tuple(items.clone()),
            items,
            follows: Follows::new(),
        }
    }

    pub fn arity(&self) -> usize {
        self.items.len()
    }
}

impl Operator for TupleOperator {
    fn raw(&self) -> &TypeRef {
        &self.raw
    }

    fn build(&self, registry: &OperatorRegistry) -> Result<()> {
        let children: Vec<&TypeRef> = self.items.iter().collect();
        build_follows(&self.follows, registry, &children)
    }

    fn follows(&self) -> Result<&[Arc<dyn Operator>]> {
        self.follows.wait(&self.raw).map(Vec::as_slice)
    }

    fn write(&self, ctx: &mut WriteContext<'_>, value: &Value) -> Result<()> {
        let follows = self.follows.wait(&self.raw)?;
        let components = match value {
            Value::Null => None,
            Value::Tuple(items) if items.len() == follows.len() => Some(items),
            other => return Err(Error::mismatch(&self.raw, other)),
        };
        if write_null_flag(&mut ctx.container, value) {
            return Ok(());
        }
        for (op, item) in follows.iter().zip(components.into_iter().flatten()) {
            ctx.write_child(op.as_ref(), item)?;
        }
        Ok(())
    }

    fn read(&self, ctx: &mut ReadContext<'_>) -> Result<Value> {
        let follows = self.follows.wait(&self.raw)?;
        if ctx.container.read_flag()? {
            return Ok(Value::Null);
        }
        let items = follows
            .iter()
            .map(|op| ctx.read_child(op.as_ref()))
            .collect::<Result<Vec<_>>>()?;
        Ok(Value::Tuple(items))
    }
}
