// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Dynamic values forming the object graph.
//!
//! [`Value`] mirrors [`TypeRef`](crate::TypeRef): one variant per scalar kind,
//! one per composite shape, plus identity-bearing handles ([`ObjectRef`],
//! [`ArrayRef`], shared `Arc<str>` strings) that the reference pool tracks.
//!
//! `PartialEq` compares scalars bitwise (so `-0.0 != 0.0` and NaN payloads
//! match themselves) and identity-bearing handles by pointer. Use
//! [`graph_eq`] to compare two graphs structurally.

mod collections;
mod graph_eq;
mod object;
mod time;

pub use collections::{MultiArray, Odometer, SortedMap};
pub use graph_eq::graph_eq;
pub use object::{ArrayRef, Object, ObjectRef};
pub use time::{DateTime, DateTimeKind, DateTimeOffset, TimeSpan, TICKS_PER_SECOND, UNIX_EPOCH_TICKS};

use crate::types::{PrimitiveKind, TypeRef};
use rust_decimal::Decimal;
use std::collections::{LinkedList, VecDeque};
use std::sync::Arc;
use uuid::Uuid;

/// Enum value: the enum's type name plus its raw integral bits.
///
/// The raw value is kept verbatim; it need not match a declared variant.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EnumValue {
    type_name: Arc<str>,
    raw: i64,
}

impl EnumValue {
    pub fn new(type_name: impl Into<Arc<str>>, raw: i64) -> Self {
        Self {
            type_name: type_name.into(),
            raw,
        }
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    pub fn type_name_arc(&self) -> &Arc<str> {
        &self.type_name
    }

    /// Raw bits; unsigned 64-bit enums are stored two's-complement.
    pub fn raw(&self) -> i64 {
        self.raw
    }
}

/// A node of the object graph.
#[derive(Debug, Clone)]
pub enum Value {
    Null,

    // Scalars
    Bool(bool),
    Char(char),
    I8(i8),
    U8(u8),
    I16(i16),
    U16(u16),
    I32(i32),
    U32(u32),
    I64(i64),
    U64(u64),
    F32(f32),
    F64(f64),
    Decimal(Decimal),
    Guid(Uuid),
    DateTime(DateTime),
    DateTimeOffset(DateTimeOffset),
    TimeSpan(TimeSpan),
    String(Arc<str>),
    Enum(EnumValue),

    // Composites
    Array(ArrayRef),
    MultiArray(MultiArray),
    List(Vec<Value>),
    /// Bottom-to-top; enumerates top-first.
    Stack(Vec<Value>),
    Queue(VecDeque<Value>),
    /// Insertion-ordered. Elements are kept as given; duplicates are not removed.
    Set(Vec<Value>),
    LinkedList(LinkedList<Value>),
    SortedMap(SortedMap),
    Tuple(Vec<Value>),
    Object(ObjectRef),
}

impl Value {
    pub fn string(s: impl Into<Arc<str>>) -> Self {
        Value::String(s.into())
    }

    pub fn enumeration(type_name: impl Into<Arc<str>>, raw: i64) -> Self {
        Value::Enum(EnumValue::new(type_name, raw))
    }

    pub fn array(items: Vec<Value>) -> Self {
        Value::Array(ArrayRef::new(items))
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Default of a declared type: zero for value types, null otherwise.
    pub fn default_for(ty: &TypeRef) -> Value {
        match ty {
            TypeRef::Primitive(kind) => Self::zero(*kind),
            TypeRef::Enum(name) => Value::Enum(EnumValue::new(name.clone(), 0)),
            _ => Value::Null,
        }
    }

    /// Zero value of a scalar kind (`Null` for strings).
    pub fn zero(kind: PrimitiveKind) -> Value {
        match kind {
            PrimitiveKind::Bool => Value::Bool(false),
            PrimitiveKind::Char => Value::Char('\0'),
            PrimitiveKind::I8 => Value::I8(0),
            PrimitiveKind::U8 => Value::U8(0),
            PrimitiveKind::I16 => Value::I16(0),
            PrimitiveKind::U16 => Value::U16(0),
            PrimitiveKind::I32 => Value::I32(0),
            PrimitiveKind::U32 => Value::U32(0),
            PrimitiveKind::I64 => Value::I64(0),
            PrimitiveKind::U64 => Value::U64(0),
            PrimitiveKind::F32 => Value::F32(0.0),
            PrimitiveKind::F64 => Value::F64(0.0),
            PrimitiveKind::Decimal => Value::Decimal(Decimal::ZERO),
            PrimitiveKind::Guid => Value::Guid(Uuid::nil()),
            PrimitiveKind::DateTime => Value::DateTime(DateTime::default()),
            PrimitiveKind::DateTimeOffset => Value::DateTimeOffset(DateTimeOffset::default()),
            PrimitiveKind::TimeSpan => Value::TimeSpan(TimeSpan::ZERO),
            PrimitiveKind::String => Value::Null,
        }
    }

    /// Scalar kind of this value, if it is a built-in scalar.
    pub fn primitive_kind(&self) -> Option<PrimitiveKind> {
        let kind = match self {
            Value::Bool(_) => PrimitiveKind::Bool,
            Value::Char(_) => PrimitiveKind::Char,
            Value::I8(_) => PrimitiveKind::I8,
            Value::U8(_) => PrimitiveKind::U8,
            Value::I16(_) => PrimitiveKind::I16,
            Value::U16(_) => PrimitiveKind::U16,
            Value::I32(_) => PrimitiveKind::I32,
            Value::U32(_) => PrimitiveKind::U32,
            Value::I64(_) => PrimitiveKind::I64,
            Value::U64(_) => PrimitiveKind::U64,
            Value::F32(_) => PrimitiveKind::F32,
            Value::F64(_) => PrimitiveKind::F64,
            Value::Decimal(_) => PrimitiveKind::Decimal,
            Value::Guid(_) => PrimitiveKind::Guid,
            Value::DateTime(_) => PrimitiveKind::DateTime,
            Value::DateTimeOffset(_) => PrimitiveKind::DateTimeOffset,
            Value::TimeSpan(_) => PrimitiveKind::TimeSpan,
            Value::String(_) => PrimitiveKind::String,
            _ => return None,
        };
        Some(kind)
    }

    /// Variant name, used in error messages.
    pub fn kind_name(&self) -> &'static str {
        if let Some(kind) = self.primitive_kind() {
            return kind.name();
        }
        match self {
            Value::Null => "Null",
            Value::Enum(_) => "Enum",
            Value::Array(_) => "Array",
            Value::MultiArray(_) => "MultiArray",
            Value::List(_) => "List",
            Value::Stack(_) => "Stack",
            Value::Queue(_) => "Queue",
            Value::Set(_) => "Set",
            Value::LinkedList(_) => "LinkedList",
            Value::SortedMap(_) => "SortedMap",
            Value::Tuple(_) => "Tuple",
            Value::Object(_) => "Object",
            _ => "Scalar",
        }
    }

    pub(crate) fn variant_rank(&self) -> u8 {
        if let Some(kind) = self.primitive_kind() {
            return 1 + kind as u8;
        }
        match self {
            Value::Null => 0,
            Value::Enum(_) => 32,
            Value::Array(_) => 33,
            Value::MultiArray(_) => 34,
            Value::List(_) => 35,
            Value::Stack(_) => 36,
            Value::Queue(_) => 37,
            Value::Set(_) => 38,
            Value::LinkedList(_) => 39,
            Value::SortedMap(_) => 40,
            Value::Tuple(_) => 41,
            Value::Object(_) => 42,
            _ => u8::MAX,
        }
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    pub fn as_i32(&self) -> Option<i32> {
        match self {
            Value::I32(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::I64(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::F64(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&ObjectRef> {
        match self {
            Value::Object(o) => Some(o),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&ArrayRef> {
        match self {
            Value::Array(a) => Some(a),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_enum(&self) -> Option<&EnumValue> {
        match self {
            Value::Enum(e) => Some(e),
            _ => None,
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        use Value::*;
        match (self, other) {
            (Null, Null) => true,
            (Bool(a), Bool(b)) => a == b,
            (Char(a), Char(b)) => a == b,
            (I8(a), I8(b)) => a == b,
            (U8(a), U8(b)) => a == b,
            (I16(a), I16(b)) => a == b,
            (U16(a), U16(b)) => a == b,
            (I32(a), I32(b)) => a == b,
            (U32(a), U32(b)) => a == b,
            (I64(a), I64(b)) => a == b,
            (U64(a), U64(b)) => a == b,
            (F32(a), F32(b)) => a.to_bits() == b.to_bits(),
            (F64(a), F64(b)) => a.to_bits() == b.to_bits(),
            (Decimal(a), Decimal(b)) => a.serialize() == b.serialize(),
            (Guid(a), Guid(b)) => a == b,
            (DateTime(a), DateTime(b)) => a == b,
            (DateTimeOffset(a), DateTimeOffset(b)) => a == b,
            (TimeSpan(a), TimeSpan(b)) => a == b,
            (String(a), String(b)) => a == b,
            (Enum(a), Enum(b)) => a == b,
            (Array(a), Array(b)) => a.ptr_eq(b),
            (MultiArray(a), MultiArray(b)) => a == b,
            (List(a), List(b)) | (Stack(a), Stack(b)) | (Set(a), Set(b)) | (Tuple(a), Tuple(b)) => {
                a == b
            }
            (Queue(a), Queue(b)) => a == b,
            (LinkedList(a), LinkedList(b)) => a == b,
            (SortedMap(a), SortedMap(b)) => a == b,
            (Object(a), Object(b)) => a.ptr_eq(b),
            _ => false,
        }
    }
}

macro_rules! impl_from_scalar {
    ($($type:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$type> for Value {
                fn from(v: $type) -> Self {
                    Value::$variant(v)
                }
            }
        )*
    };
}

impl_from_scalar!(
    bool => Bool,
    char => Char,
    i8 => I8,
    u8 => U8,
    i16 => I16,
    u16 => U16,
    i32 => I32,
    u32 => U32,
    i64 => I64,
    u64 => U64,
    f32 => F32,
    f64 => F64,
    Decimal => Decimal,
    Uuid => Guid,
    DateTime => DateTime,
    DateTimeOffset => DateTimeOffset,
    TimeSpan => TimeSpan,
    Arc<str> => String,
    EnumValue => Enum,
    ArrayRef => Array,
    MultiArray => MultiArray,
    SortedMap => SortedMap,
    ObjectRef => Object,
);

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(Arc::from(v))
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::String(Arc::from(v))
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Null, Into::into)
    }
}
