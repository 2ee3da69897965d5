// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Enum codec: the underlying integral codec plus a type check.
//!
//! Raw values are kept verbatim, including ones no variant declares.

use crate::error::{Error, Result};
use crate::operator::{
    build_follows, Follows, Operator, OperatorRegistry, ReadContext, WriteContext,
};
use crate::types::{PrimitiveKind, TypeRef};
use crate::value::{EnumValue, Value};
use std::sync::Arc;

#[derive(Debug)]
pub struct EnumOperator {
    raw: TypeRef,
    name: Arc<str>,
    follows: Follows,
}

impl EnumOperator {
    pub fn new(name: Arc<str>) -> Self {
        Self {
            raw: TypeRef::Enum(name.clone()),
            name,
            follows: Follows::new(),
        }
    }
}

impl Operator for EnumOperator {
    fn raw(&self) -> &TypeRef {
        &self.raw
    }

    fn build(&self, registry: &OperatorRegistry) -> Result<()> {
        let underlying = match registry.source().enumeration(&self.name) {
            Some(desc) => TypeRef::Primitive(desc.underlying()),
            None => {
                let err = Error::UnknownType(self.name.to_string());
                self.follows.complete(Err(err.to_string()));
                return Err(err);
            }
        };
        build_follows(&self.follows, registry, &[&underlying])
    }

    fn follows(&self) -> Result<&[Arc<dyn Operator>]> {
        self.follows.wait(&self.raw).map(Vec::as_slice)
    }

    fn write(&self, ctx: &mut WriteContext<'_>, value: &Value) -> Result<()> {
        let inner = self.follows.wait(&self.raw)?[0].clone();
        let kind = underlying_kind(inner.raw())?;
        let scalar = match value {
            Value::Null => Value::Null,
            Value::Enum(e) if e.type_name() == &*self.name => {
                integral_from_raw(kind, e.raw()).ok_or_else(|| {
                    Error::InvalidValue(format!(
                        "{} raw value {} does not fit {}",
                        self.name,
                        e.raw(),
                        kind.name()
                    ))
                })?
            }
            other => return Err(Error::mismatch(&self.raw, other)),
        };
        inner.write(ctx, &scalar)
    }

    fn read(&self, ctx: &mut ReadContext<'_>) -> Result<Value> {
        let inner = self.follows.wait(&self.raw)?[0].clone();
        match inner.read(ctx)? {
            Value::Null => Ok(Value::Null),
            scalar => {
                let raw = integral_to_raw(&scalar)
                    .ok_or_else(|| Error::mismatch("integral", &scalar))?;
                Ok(Value::Enum(EnumValue::new(self.name.clone(), raw)))
            }
        }
    }
}

fn underlying_kind(ty: &TypeRef) -> Result<PrimitiveKind> {
    match ty {
        TypeRef::Primitive(kind) if kind.is_integral() => Ok(*kind),
        other => Err(Error::Malformed(format!("enum backed by {}", other))),
    }
}

/// Narrow a raw enum value to its underlying width.
///
/// `None` when the value does not fit. A `U64` enum stores its value as the
/// two's-complement `i64`, so every raw fits and `integral_to_raw` restores it.
pub(crate) fn integral_from_raw(kind: PrimitiveKind, raw: i64) -> Option<Value> {
    Some(match kind {
        PrimitiveKind::I8 => Value::I8(i8::try_from(raw).ok()?),
        PrimitiveKind::U8 => Value::U8(u8::try_from(raw).ok()?),
        PrimitiveKind::I16 => Value::I16(i16::try_from(raw).ok()?),
        PrimitiveKind::U16 => Value::U16(u16::try_from(raw).ok()?),
        PrimitiveKind::U32 => Value::U32(u32::try_from(raw).ok()?),
        PrimitiveKind::I64 => Value::I64(raw),
        PrimitiveKind::U64 => Value::U64(raw as u64),
        _ => Value::I32(i32::try_from(raw).ok()?),
    })
}

/// Widen an integral scalar to the raw enum representation.
pub(crate) fn integral_to_raw(value: &Value) -> Option<i64> {
    Some(match value {
        Value::I8(v) => i64::from(*v),
        Value::U8(v) => i64::from(*v),
        Value::I16(v) => i64::from(*v),
        Value::U16(v) => i64::from(*v),
        Value::I32(v) => i64::from(*v),
        Value::U32(v) => i64::from(*v),
        Value::I64(v) => *v,
        Value::U64(v) => *v as i64,
        _ => return None,
    })
}
