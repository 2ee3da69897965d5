// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! `T?`: no framing of its own, the inner codec already flags null.

use crate::error::Result;
use crate::operator::{
    build_follows, Follows, Operator, OperatorRegistry, ReadContext, WriteContext,
};
use crate::types::TypeRef;
use crate::value::Value;
use std::sync::Arc;

#[derive(Debug)]
pub struct NullableOperator {
    raw: TypeRef,
    inner: TypeRef,
    follows: Follows,
}

impl NullableOperator {
    pub fn new(inner: TypeRef) -> Self {
        Self {
            raw: TypeRef::nullable(inner.clone()),
            inner,
            follows: Follows::new(),
        }
    }
}

impl Operator for NullableOperator {
    fn raw(&self) -> &TypeRef {
        &self.raw
    }

    fn build(&self, registry: &OperatorRegistry) -> Result<()> {
        build_follows(&self.follows, registry, &[&self.inner])
    }

    fn follows(&self) -> Result<&[Arc<dyn Operator>]> {
        self.follows.wait(&self.raw).map(Vec::as_slice)
    }

    fn write(&self, ctx: &mut WriteContext<'_>, value: &Value) -> Result<()> {
        let inner = &self.follows.wait(&self.raw)?[0];
        inner.write(ctx, value)
    }

    fn read(&self, ctx: &mut ReadContext<'_>) -> Result<Value> {
        let inner = &self.follows.wait(&self.raw)?[0];
        inner.read(ctx)
    }
}
