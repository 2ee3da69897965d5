// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Built-in scalar codecs.
//!
//! # Wire shape
//!
//! ```text
//! flag null
//! flag default            (only when not null)
//! payload                 (only when not default)
//! ```
//!
//! "Default" is bitwise: `-0.0`, NaN payloads, decimal scale and the
//! `DateTime` kind all survive a round-trip. Strings additionally pass
//! through the reference pool after the default check.

use crate::container::Container;
use crate::error::{Error, Result};
use crate::operator::{write_null_flag, Operator, OperatorRegistry, ReadContext, WriteContext};
use crate::types::{PrimitiveKind, TypeRef};
use crate::value::{DateTime, DateTimeKind, DateTimeOffset, TimeSpan, Value};
use rust_decimal::Decimal;
use std::sync::Arc;
use uuid::Uuid;

// Decimal flags word: scale in bits 16..24, sign in bit 31.
const DECIMAL_SCALE_MASK: u32 = 0x00FF_0000;
const DECIMAL_SIGN_MASK: u32 = 0x8000_0000;
const DECIMAL_MAX_SCALE: u32 = 28;

/// Codec for one [`PrimitiveKind`].
#[derive(Debug)]
pub struct ScalarOperator {
    raw: TypeRef,
    kind: PrimitiveKind,
}

impl ScalarOperator {
    pub fn new(kind: PrimitiveKind) -> Self {
        Self {
            raw: TypeRef::Primitive(kind),
            kind,
        }
    }

    pub fn kind(&self) -> PrimitiveKind {
        self.kind
    }

    fn write_string(&self, ctx: &mut WriteContext<'_>, value: &Value, s: &str) -> Result<()> {
        if ctx.pool.write(&mut ctx.container, value)? {
            return Ok(());
        }
        ctx.pool.add_object(value);
        ctx.container.write_str(s)
    }

    fn read_string(&self, ctx: &mut ReadContext<'_>) -> Result<Value> {
        if let Some(seen) = ctx.pool.read(&mut ctx.container)? {
            return match seen {
                Value::String(_) => Ok(seen),
                other => Err(Error::Malformed(format!(
                    "string slot refers to pooled {}",
                    other.kind_name()
                ))),
            };
        }
        let s = ctx.container.read_str(ctx.config.max_elements)?;
        let value = Value::String(Arc::from(s));
        ctx.pool.add_object(value.clone());
        Ok(value)
    }
}

impl Operator for ScalarOperator {
    fn raw(&self) -> &TypeRef {
        &self.raw
    }

    fn build(&self, _registry: &OperatorRegistry) -> Result<()> {
        Ok(())
    }

    fn follows(&self) -> Result<&[Arc<dyn Operator>]> {
        Ok(&[])
    }

    fn write(&self, ctx: &mut WriteContext<'_>, value: &Value) -> Result<()> {
        if !value.is_null() && value.primitive_kind() != Some(self.kind) {
            return Err(Error::mismatch(self.kind.name(), value));
        }
        if write_null_flag(&mut ctx.container, value) {
            return Ok(());
        }
        let is_default = is_default(value);
        ctx.container.write_flag(is_default);
        if is_default {
            return Ok(());
        }
        match value {
            Value::String(s) => self.write_string(ctx, value, s),
            other => write_payload(&mut ctx.container, other),
        }
    }

    fn read(&self, ctx: &mut ReadContext<'_>) -> Result<Value> {
        if ctx.container.read_flag()? {
            return Ok(Value::Null);
        }
        if ctx.container.read_flag()? {
            return Ok(match self.kind {
                PrimitiveKind::String => Value::string(""),
                kind => Value::zero(kind),
            });
        }
        match self.kind {
            PrimitiveKind::String => self.read_string(ctx),
            kind => read_payload(&mut ctx.container, kind),
        }
    }
}

/// Bitwise zero/empty check.
fn is_default(value: &Value) -> bool {
    match value {
        Value::Bool(v) => !*v,
        Value::Char(v) => *v == '\0',
        Value::I8(v) => *v == 0,
        Value::U8(v) => *v == 0,
        Value::I16(v) => *v == 0,
        Value::U16(v) => *v == 0,
        Value::I32(v) => *v == 0,
        Value::U32(v) => *v == 0,
        Value::I64(v) => *v == 0,
        Value::U64(v) => *v == 0,
        Value::F32(v) => v.to_bits() == 0,
        Value::F64(v) => v.to_bits() == 0,
        Value::Decimal(v) => v.serialize() == [0u8; 16],
        Value::Guid(v) => v.is_nil(),
        Value::DateTime(v) => v.is_default(),
        Value::DateTimeOffset(v) => v.ticks == 0 && v.offset_ticks == 0,
        Value::TimeSpan(v) => v.ticks == 0,
        Value::String(s) => s.is_empty(),
        _ => false,
    }
}

fn write_payload(c: &mut Container, value: &Value) -> Result<()> {
    match value {
        // A non-default bool is `true`; the default flag already says so.
        Value::Bool(_) => {}
        Value::Char(v) => c.write_u32(*v as u32),
        Value::I8(v) => c.write_i8(*v),
        Value::U8(v) => c.write_u8(*v),
        Value::I16(v) => c.write_i16(*v),
        Value::U16(v) => c.write_u16(*v),
        Value::I32(v) => c.write_i32(*v),
        Value::U32(v) => c.write_u32(*v),
        Value::I64(v) => c.write_i64(*v),
        Value::U64(v) => c.write_u64(*v),
        Value::F32(v) => c.write_f32(*v),
        Value::F64(v) => c.write_f64(*v),
        Value::Decimal(v) => write_decimal(c, v),
        Value::Guid(v) => c.write_item_bytes(v.as_bytes()),
        Value::DateTime(v) => {
            c.write_i64(v.ticks);
            c.write_u8(v.kind as u8);
        }
        Value::DateTimeOffset(v) => {
            c.write_i64(v.ticks);
            c.write_i64(v.offset_ticks);
        }
        Value::TimeSpan(v) => c.write_i64(v.ticks),
        other => return Err(Error::mismatch("scalar", other)),
    }
    Ok(())
}

fn read_payload(c: &mut Container, kind: PrimitiveKind) -> Result<Value> {
    let value = match kind {
        PrimitiveKind::Bool => Value::Bool(true),
        PrimitiveKind::Char => {
            let code = c.read_u32()?;
            let ch = char::from_u32(code)
                .ok_or_else(|| Error::Malformed(format!("invalid char code point {:#x}", code)))?;
            Value::Char(ch)
        }
        PrimitiveKind::I8 => Value::I8(c.read_i8()?),
        PrimitiveKind::U8 => Value::U8(c.read_u8()?),
        PrimitiveKind::I16 => Value::I16(c.read_i16()?),
        PrimitiveKind::U16 => Value::U16(c.read_u16()?),
        PrimitiveKind::I32 => Value::I32(c.read_i32()?),
        PrimitiveKind::U32 => Value::U32(c.read_u32()?),
        PrimitiveKind::I64 => Value::I64(c.read_i64()?),
        PrimitiveKind::U64 => Value::U64(c.read_u64()?),
        PrimitiveKind::F32 => Value::F32(c.read_f32()?),
        PrimitiveKind::F64 => Value::F64(c.read_f64()?),
        PrimitiveKind::Decimal => Value::Decimal(read_decimal(c)?),
        PrimitiveKind::Guid => Value::Guid(Uuid::from_bytes(c.read_item_bytes::<16>()?)),
        PrimitiveKind::DateTime => {
            let ticks = c.read_i64()?;
            let tag = c.read_u8()?;
            let kind = DateTimeKind::from_u8(tag)
                .ok_or_else(|| Error::Malformed(format!("invalid DateTime kind {}", tag)))?;
            Value::DateTime(DateTime::new(ticks, kind))
        }
        PrimitiveKind::DateTimeOffset => Value::DateTimeOffset(DateTimeOffset {
            ticks: c.read_i64()?,
            offset_ticks: c.read_i64()?,
        }),
        PrimitiveKind::TimeSpan => Value::TimeSpan(TimeSpan::from_ticks(c.read_i64()?)),
        PrimitiveKind::String => {
            return Err(Error::Malformed("string payload outside string codec".into()))
        }
    };
    Ok(value)
}

/// Four little-endian words: lo, mid, hi, flags.
fn write_decimal(c: &mut Container, value: &Decimal) {
    let raw = value.serialize();
    let word = |i: usize| u32::from_le_bytes([raw[i], raw[i + 1], raw[i + 2], raw[i + 3]]);
    c.write_u32(word(4));
    c.write_u32(word(8));
    c.write_u32(word(12));
    c.write_u32(word(0));
}

fn read_decimal(c: &mut Container) -> Result<Decimal> {
    let lo = c.read_u32()?;
    let mid = c.read_u32()?;
    let hi = c.read_u32()?;
    let flags = c.read_u32()?;
    if flags & !(DECIMAL_SCALE_MASK | DECIMAL_SIGN_MASK) != 0 {
        return Err(Error::Malformed(format!("decimal flags {:#010x}", flags)));
    }
    let scale = (flags & DECIMAL_SCALE_MASK) >> 16;
    if scale > DECIMAL_MAX_SCALE {
        return Err(Error::Malformed(format!("decimal scale {}", scale)));
    }
    let mut raw = [0u8; 16];
    raw[0..4].copy_from_slice(&flags.to_le_bytes());
    raw[4..8].copy_from_slice(&lo.to_le_bytes());
    raw[8..12].copy_from_slice(&mid.to_le_bytes());
    raw[12..16].copy_from_slice(&hi.to_le_bytes());
    Ok(Decimal::deserialize(raw))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SerializerConfig;
    use crate::types::TypeCatalog;
    use std::str::FromStr;

    fn roundtrip(kind: PrimitiveKind, value: Value, pooled: bool) -> Value {
        let registry = OperatorRegistry::new(Arc::new(TypeCatalog::new()));
        let config = SerializerConfig::builtin();
        let op = ScalarOperator::new(kind);
        let mut w = WriteContext::new(&registry, &config, pooled);
        op.write(&mut w, &value).expect("write");
        let bytes = w.into_container().export().expect("export");
        let container = Container::import(&bytes).expect("import");
        let mut r = ReadContext::new(container, &registry, &config, pooled);
        let back = op.read(&mut r).expect("read");
        assert!(r.container().is_exhausted());
        back
    }

    #[test]
    fn test_scalar_values_roundtrip() {
        let cases = [
            (PrimitiveKind::Bool, Value::Bool(true)),
            (PrimitiveKind::Char, Value::Char('λ')),
            (PrimitiveKind::I8, Value::I8(i8::MIN)),
            (PrimitiveKind::U16, Value::U16(u16::MAX)),
            (PrimitiveKind::I32, Value::I32(-17)),
            (PrimitiveKind::U64, Value::U64(u64::MAX)),
            (PrimitiveKind::F64, Value::F64(std::f64::consts::PI)),
            (PrimitiveKind::Guid, Value::Guid(Uuid::from_u128(0x1234_5678))),
            (
                PrimitiveKind::DateTime,
                Value::DateTime(DateTime::from_unix_seconds(1_700_000_000)),
            ),
            (
                PrimitiveKind::DateTimeOffset,
                Value::DateTimeOffset(DateTimeOffset {
                    ticks: 5,
                    offset_ticks: -36_000_000_000,
                }),
            ),
            (PrimitiveKind::TimeSpan, Value::TimeSpan(TimeSpan::from_seconds(90))),
            (PrimitiveKind::String, Value::from("héllo")),
        ];
        for (kind, value) in cases {
            assert_eq!(roundtrip(kind, value.clone(), true), value, "{:?}", kind);
        }
    }

    #[test]
    fn test_null_default_and_value_are_distinct() {
        assert_eq!(roundtrip(PrimitiveKind::I32, Value::Null, false), Value::Null);
        assert_eq!(roundtrip(PrimitiveKind::I32, Value::I32(0), false), Value::I32(0));
        assert_eq!(
            roundtrip(PrimitiveKind::String, Value::from(""), false).as_str(),
            Some("")
        );
        assert_eq!(roundtrip(PrimitiveKind::String, Value::Null, false), Value::Null);
    }

    #[test]
    fn test_float_bit_patterns_survive() {
        let neg_zero = roundtrip(PrimitiveKind::F64, Value::F64(-0.0), false);
        assert!(matches!(neg_zero, Value::F64(v) if v.to_bits() == (-0.0f64).to_bits()));
        let nan = f32::from_bits(0x7FC0_1234);
        let back = roundtrip(PrimitiveKind::F32, Value::F32(nan), false);
        assert!(matches!(back, Value::F32(v) if v.to_bits() == 0x7FC0_1234));
    }

    #[test]
    fn test_decimal_keeps_scale_and_precision() {
        let d = Decimal::from_str("1234567890.123456789012345678").expect("decimal");
        assert_eq!(roundtrip(PrimitiveKind::Decimal, Value::Decimal(d), false), Value::Decimal(d));
        let scaled_zero = Decimal::from_str("0.000").expect("decimal");
        let back = roundtrip(PrimitiveKind::Decimal, Value::Decimal(scaled_zero), false);
        assert!(matches!(back, Value::Decimal(v) if v.scale() == 3));
    }

    #[test]
    fn test_datetime_kind_is_not_default() {
        let utc_epoch = Value::DateTime(DateTime::new(0, DateTimeKind::Utc));
        assert_eq!(roundtrip(PrimitiveKind::DateTime, utc_epoch.clone(), false), utc_epoch);
    }

    #[test]
    fn test_mismatch_is_rejected() {
        let registry = OperatorRegistry::new(Arc::new(TypeCatalog::new()));
        let config = SerializerConfig::builtin();
        let mut w = WriteContext::new(&registry, &config, false);
        let err = ScalarOperator::new(PrimitiveKind::I32)
            .write(&mut w, &Value::I64(1))
            .expect_err("i64 into i32 slot");
        assert!(matches!(err, Error::TypeMismatch { .. }));
    }

    #[test]
    fn test_repeated_string_instance_is_pooled() {
        let registry = OperatorRegistry::new(Arc::new(TypeCatalog::new()));
        let config = SerializerConfig::builtin();
        let op = ScalarOperator::new(PrimitiveKind::String);
        let shared = Value::from("repeated payload");
        let mut w = WriteContext::new(&registry, &config, true);
        op.write(&mut w, &shared).expect("first");
        op.write(&mut w, &shared).expect("second");
        let bytes = w.into_container().export().expect("export");
        let container = Container::import(&bytes).expect("import");
        let mut r = ReadContext::new(container, &registry, &config, true);
        let a = op.read(&mut r).expect("first");
        let b = op.read(&mut r).expect("second");
        match (a, b) {
            (Value::String(a), Value::String(b)) => assert!(Arc::ptr_eq(&a, &b)),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_invalid_decimal_scale_is_malformed() {
        let mut c = Container::new();
        c.write_flag(false);
        c.write_flag(false);
        for word in [1u32, 0, 0, 29 << 16] {
            c.write_u32(word);
        }
        let registry = OperatorRegistry::new(Arc::new(TypeCatalog::new()));
        let config = SerializerConfig::builtin();
        let container = Container::import(&c.export().expect("export")).expect("import");
        let mut r = ReadContext::new(container, &registry, &config, false);
        assert!(matches!(
            ScalarOperator::new(PrimitiveKind::Decimal).read(&mut r),
            Err(Error::Malformed(_))
        ));
    }
}
