// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Declared types and the type catalog.
//!
//! A [`TypeRef`] names the declared type of a slot (root value, member,
//! element). It is the key of the codec registry: one codec per `TypeRef`.
//! Classes and enums are referenced by fully-qualified name and resolved
//! through a [`MemberSource`] such as [`TypeCatalog`].

mod builder;
mod catalog;

pub use builder::{ClassBuilder, EnumBuilder};
pub use catalog::{
    ClassDescriptor, EnumDescriptor, EnumVariant, MemberDescriptor, MemberSource, NamedType,
    TypeCatalog,
};

use std::fmt;
use std::sync::Arc;

/// Built-in scalar kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveKind {
    Bool,
    Char,
    I8,
    U8,
    I16,
    U16,
    I32,
    U32,
    I64,
    U64,
    F32,
    F64,
    Decimal,
    Guid,
    DateTime,
    DateTimeOffset,
    TimeSpan,
    String,
}

impl PrimitiveKind {
    /// Every kind, in boxed-discriminant order.
    pub const ALL: [PrimitiveKind; 18] = [
        PrimitiveKind::Bool,
        PrimitiveKind::Char,
        PrimitiveKind::I8,
        PrimitiveKind::U8,
        PrimitiveKind::I16,
        PrimitiveKind::U16,
        PrimitiveKind::I32,
        PrimitiveKind::U32,
        PrimitiveKind::I64,
        PrimitiveKind::U64,
        PrimitiveKind::F32,
        PrimitiveKind::F64,
        PrimitiveKind::Decimal,
        PrimitiveKind::Guid,
        PrimitiveKind::DateTime,
        PrimitiveKind::DateTimeOffset,
        PrimitiveKind::TimeSpan,
        PrimitiveKind::String,
    ];

    /// Integral kinds usable as enum storage.
    pub fn is_integral(&self) -> bool {
        matches!(
            self,
            Self::I8 | Self::U8 | Self::I16 | Self::U16 | Self::I32 | Self::U32 | Self::I64 | Self::U64
        )
    }

    /// Value types default to zero; strings default to null.
    pub fn is_value_type(&self) -> bool {
        !matches!(self, Self::String)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Bool => "Bool",
            Self::Char => "Char",
            Self::I8 => "I8",
            Self::U8 => "U8",
            Self::I16 => "I16",
            Self::U16 => "U16",
            Self::I32 => "I32",
            Self::U32 => "U32",
            Self::I64 => "I64",
            Self::U64 => "U64",
            Self::F32 => "F32",
            Self::F64 => "F64",
            Self::Decimal => "Decimal",
            Self::Guid => "Guid",
            Self::DateTime => "DateTime",
            Self::DateTimeOffset => "DateTimeOffset",
            Self::TimeSpan => "TimeSpan",
            Self::String => "String",
        }
    }
}

/// List-like collection flavours. All share the array wire shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CollectionKind {
    List,
    /// Enumerates top-first, i.e. reverse of insertion.
    Stack,
    Queue,
    Set,
    LinkedList,
}

impl CollectionKind {
    pub fn name(&self) -> &'static str {
        match self {
            Self::List => "List",
            Self::Stack => "Stack",
            Self::Queue => "Queue",
            Self::Set => "Set",
            Self::LinkedList => "LinkedList",
        }
    }
}

/// Declared type of a slot.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeRef {
    Primitive(PrimitiveKind),
    /// Registered enum, by fully-qualified name.
    Enum(Arc<str>),
    /// Registered class or interface, by fully-qualified name.
    Class(Arc<str>),
    /// Any value; encoded with a runtime discriminant.
    Object,
    Nullable(Box<TypeRef>),
    /// One-dimensional array. Jagged arrays nest this.
    Array(Box<TypeRef>),
    /// Rectangular array of the given rank.
    MultiArray(Box<TypeRef>, u8),
    Collection(CollectionKind, Box<TypeRef>),
    SortedMap(Box<TypeRef>, Box<TypeRef>),
    /// Positional components; a pair is a 2-tuple.
    Tuple(Vec<TypeRef>),
}

impl TypeRef {
    pub const STRING: TypeRef = TypeRef::Primitive(PrimitiveKind::String);

    pub fn class(name: impl Into<Arc<str>>) -> Self {
        TypeRef::Class(name.into())
    }

    pub fn enumeration(name: impl Into<Arc<str>>) -> Self {
        TypeRef::Enum(name.into())
    }

    pub fn nullable(inner: TypeRef) -> Self {
        TypeRef::Nullable(Box::new(inner))
    }

    pub fn array(element: TypeRef) -> Self {
        TypeRef::Array(Box::new(element))
    }

    pub fn multi_array(element: TypeRef, rank: u8) -> Self {
        TypeRef::MultiArray(Box::new(element), rank)
    }

    pub fn list(element: TypeRef) -> Self {
        TypeRef::Collection(CollectionKind::List, Box::new(element))
    }

    pub fn collection(kind: CollectionKind, element: TypeRef) -> Self {
        TypeRef::Collection(kind, Box::new(element))
    }

    pub fn sorted_map(key: TypeRef, value: TypeRef) -> Self {
        TypeRef::SortedMap(Box::new(key), Box::new(value))
    }

    pub fn pair(first: TypeRef, second: TypeRef) -> Self {
        TypeRef::Tuple(vec![first, second])
    }
}

impl From<PrimitiveKind> for TypeRef {
    fn from(kind: PrimitiveKind) -> Self {
        TypeRef::Primitive(kind)
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeRef::Primitive(p) => f.write_str(p.name()),
            TypeRef::Enum(name) | TypeRef::Class(name) => f.write_str(name),
            TypeRef::Object => f.write_str("Object"),
            TypeRef::Nullable(inner) => write!(f, "{}?", inner),
            TypeRef::Array(inner) => write!(f, "{}[]", inner),
            TypeRef::MultiArray(inner, rank) => {
                write!(f, "{}[{}]", inner, ",".repeat(usize::from(*rank).saturating_sub(1)))
            }
            TypeRef::Collection(kind, inner) => write!(f, "{}<{}>", kind.name(), inner),
            TypeRef::SortedMap(k, v) => write!(f, "SortedMap<{}, {}>", k, v),
            TypeRef::Tuple(items) => {
                f.write_str("(")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                f.write_str(")")
            }
        }
    }
}
