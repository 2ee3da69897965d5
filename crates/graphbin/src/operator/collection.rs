// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! List-like collections: list, stack, queue, set, linked list.
//!
//! Same wire shape as a 1-D array without the pool step: null flag, any
//! flag, reserved count, elements in enumeration order. Stacks enumerate
//! top-first, so the decoded sequence is reversed back into bottom-to-top
//! storage.

use crate::error::{Error, Result};
use crate::operator::array::{read_count, write_elements, PREALLOC_LIMIT};
use crate::operator::{
    build_follows, write_null_flag, Follows, Operator, OperatorRegistry, ReadContext,
    WriteContext,
};
use crate::types::{CollectionKind, TypeRef};
use crate::value::Value;
use std::collections::VecDeque;
use std::sync::Arc;

#[derive(Debug)]
pub struct CollectionOperator {
    raw: TypeRef,
    kind: CollectionKind,
    element: TypeRef,
    follows: Follows,
}

impl CollectionOperator {
    pub fn new(kind: CollectionKind, element: TypeRef) -> Self {
        Self {
            raw: TypeRef::collection(kind, element.clone()),
            kind,
            element,
            follows: Follows::new(),
        }
    }

    pub fn kind(&self) -> CollectionKind {
        self.kind
    }
}

impl Operator for CollectionOperator {
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
        let element = element.as_ref();
        let matches = matches!(
            (self.kind, value),
            (_, Value::Null)
                | (CollectionKind::List, Value::List(_))
                | (CollectionKind::Stack, Value::Stack(_))
                | (CollectionKind::Queue, Value::Queue(_))
                | (CollectionKind::Set, Value::Set(_))
                | (CollectionKind::LinkedList, Value::LinkedList(_))
        );
        if !matches {
            return Err(Error::mismatch(&self.raw, value));
        }
        if write_null_flag(&mut ctx.container, value) {
            return Ok(());
        }
        match value {
            Value::List(items) | Value::Set(items) => {
                write_elements(ctx, element, items.len(), items.iter())
            }
            Value::Stack(items) => write_elements(ctx, element, items.len(), items.iter().rev()),
            Value::Queue(items) => write_elements(ctx, element, items.len(), items.iter()),
            Value::LinkedList(items) => write_elements(ctx, element, items.len(), items.iter()),
            other => Err(Error::mismatch(&self.raw, other)),
        }
    }

    fn read(&self, ctx: &mut ReadContext<'_>) -> Result<Value> {
        let element = self.follows.wait(&self.raw)?[0].clone();
        if ctx.container.read_flag()? {
            return Ok(Value::Null);
        }
        let count = read_count(ctx)?;
        let mut items = Vec::with_capacity(count.min(PREALLOC_LIMIT));
        for _ in 0..count {
            items.push(ctx.read_child(element.as_ref())?);
        }
        Ok(match self.kind {
            CollectionKind::List => Value::List(items),
            CollectionKind::Stack => {
                items.reverse();
                Value::Stack(items)
            }
            CollectionKind::Queue => Value::Queue(VecDeque::from(items)),
            CollectionKind::Set => Value::Set(items),
            CollectionKind::LinkedList => Value::LinkedList(items.into_iter().collect()),
        })
    }
}
