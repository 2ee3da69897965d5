// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Boxed (`Object`-typed) slots.
//!
//! # Wire shape
//!
//! ```text
//! flag null
//! item u8 discriminant
//!   0..=17     built-in scalar, payload via that scalar's codec
//!   ENUM       type name, payload via the enum codec
//!   CLASS      type name, payload via the class codec
//!   ARRAY..    composite with Object-typed children
//!              (MULTI_ARRAY adds u8 rank, TUPLE adds u8 arity)
//! ```
//!
//! Children are resolved through the registry per value, since the concrete
//! type is only known at run time.

use crate::error::{Error, Result};
use crate::operator::{write_null_flag, Operator, OperatorRegistry, ReadContext, WriteContext};
use crate::types::{CollectionKind, PrimitiveKind, TypeRef};
use crate::value::Value;
use std::sync::Arc;

const TAG_ENUM: u8 = 32;
const TAG_CLASS: u8 = 33;
const TAG_ARRAY: u8 = 34;
const TAG_MULTI_ARRAY: u8 = 35;
const TAG_LIST: u8 = 36;
const TAG_STACK: u8 = 37;
const TAG_QUEUE: u8 = 38;
const TAG_SET: u8 = 39;
const TAG_LINKED_LIST: u8 = 40;
const TAG_SORTED_MAP: u8 = 41;
const TAG_TUPLE: u8 = 42;

/// Discriminant of a boxed value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoxTag {
    Primitive(PrimitiveKind),
    Enum,
    Class,
    Array,
    MultiArray,
    Collection(CollectionKind),
    SortedMap,
    Tuple,
}

impl BoxTag {
    /// Tag of a non-null value.
    pub fn of(value: &Value) -> Option<BoxTag> {
        if let Some(kind) = value.primitive_kind() {
            return Some(BoxTag::Primitive(kind));
        }
        let tag = match value {
            Value::Enum(_) => BoxTag::Enum,
            Value::Object(_) => BoxTag::Class,
            Value::Array(_) => BoxTag::Array,
            Value::MultiArray(_) => BoxTag::MultiArray,
            Value::List(_) => BoxTag::Collection(CollectionKind::List),
            Value::Stack(_) => BoxTag::Collection(CollectionKind::Stack),
            Value::Queue(_) => BoxTag::Collection(CollectionKind::Queue),
            Value::Set(_) => BoxTag::Collection(CollectionKind::Set),
            Value::LinkedList(_) => BoxTag::Collection(CollectionKind::LinkedList),
            Value::SortedMap(_) => BoxTag::SortedMap,
            Value::Tuple(_) => BoxTag::Tuple,
            _ => return None,
        };
        Some(tag)
    }

    pub fn to_u8(self) -> u8 {
        match self {
            BoxTag::Primitive(kind) => kind as u8,
            BoxTag::Enum => TAG_ENUM,
            BoxTag::Class => TAG_CLASS,
            BoxTag::Array => TAG_ARRAY,
            BoxTag::MultiArray => TAG_MULTI_ARRAY,
            BoxTag::Collection(CollectionKind::List) => TAG_LIST,
            BoxTag::Collection(CollectionKind::Stack) => TAG_STACK,
            BoxTag::Collection(CollectionKind::Queue) => TAG_QUEUE,
            BoxTag::Collection(CollectionKind::Set) => TAG_SET,
            BoxTag::Collection(CollectionKind::LinkedList) => TAG_LINKED_LIST,
            BoxTag::SortedMap => TAG_SORTED_MAP,
            BoxTag::Tuple => TAG_TUPLE,
        }
    }

    pub fn from_u8(tag: u8) -> Option<BoxTag> {
        if let Some(kind) = PrimitiveKind::ALL.get(usize::from(tag)) {
            return Some(BoxTag::Primitive(*kind));
        }
        Some(match tag {
            TAG_ENUM => BoxTag::Enum,
            TAG_CLASS => BoxTag::Class,
            TAG_ARRAY => BoxTag::Array,
            TAG_MULTI_ARRAY => BoxTag::MultiArray,
            TAG_LIST => BoxTag::Collection(CollectionKind::List),
            TAG_STACK => BoxTag::Collection(CollectionKind::Stack),
            TAG_QUEUE => BoxTag::Collection(CollectionKind::Queue),
            TAG_SET => BoxTag::Collection(CollectionKind::Set),
            TAG_LINKED_LIST => BoxTag::Collection(CollectionKind::LinkedList),
            TAG_SORTED_MAP => BoxTag::SortedMap,
            TAG_TUPLE => BoxTag::Tuple,
            _ => return None,
        })
    }
}

#[derive(Debug)]
pub struct BoxedOperator {
    raw: TypeRef,
}

impl Default for BoxedOperator {
    fn default() -> Self {
        Self::new()
    }
}

impl BoxedOperator {
    pub fn new() -> Self {
        Self {
            raw: TypeRef::Object,
        }
    }
}

fn objects(n: usize) -> Vec<TypeRef> {
    vec![TypeRef::Object; n]
}

impl Operator for BoxedOperator {
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
        if write_null_flag(&mut ctx.container, value) {
            return Ok(());
        }
        let tag = BoxTag::of(value).ok_or_else(|| Error::mismatch("boxable value", value))?;
        ctx.container.write_u8(tag.to_u8());
        let inner = match (tag, value) {
            (BoxTag::Primitive(kind), _) => TypeRef::Primitive(kind),
            (BoxTag::Enum, Value::Enum(e)) => {
                ctx.container.write_str(e.type_name())?;
                TypeRef::Enum(e.type_name_arc().clone())
            }
            (BoxTag::Class, Value::Object(o)) => {
                let name = o.class_name();
                ctx.container.write_str(&name)?;
                TypeRef::Class(name)
            }
            (BoxTag::Array, _) => TypeRef::array(TypeRef::Object),
            (BoxTag::MultiArray, Value::MultiArray(a)) => {
                let rank = u8::try_from(a.rank())
                    .map_err(|_| Error::InvalidValue(format!("rank {} too large", a.rank())))?;
                ctx.container.write_u8(rank);
                TypeRef::multi_array(TypeRef::Object, rank)
            }
            (BoxTag::Collection(kind), _) => TypeRef::collection(kind, TypeRef::Object),
            (BoxTag::SortedMap, _) => TypeRef::sorted_map(TypeRef::Object, TypeRef::Object),
            (BoxTag::Tuple, Value::Tuple(items)) => {
                let arity = u8::try_from(items.len())
                    .map_err(|_| Error::InvalidValue(format!("arity {} too large", items.len())))?;
                ctx.container.write_u8(arity);
                TypeRef::Tuple(objects(items.len()))
            }
            (_, other) => return Err(Error::mismatch("boxable value", other)),
        };
        let op = ctx.registry.get_operator(&inner)?;
        ctx.write_child(op.as_ref(), value)
    }

    fn read(&self, ctx: &mut ReadContext<'_>) -> Result<Value> {
        if ctx.container.read_flag()? {
            return Ok(Value::Null);
        }
        let raw_tag = ctx.container.read_u8()?;
        let tag = BoxTag::from_u8(raw_tag)
            .ok_or_else(|| Error::Malformed(format!("unknown boxed discriminant {}", raw_tag)))?;
        let inner = match tag {
            BoxTag::Primitive(kind) => TypeRef::Primitive(kind),
            BoxTag::Enum => ctx.read_named_type(false)?.type_ref(),
            BoxTag::Class => ctx.read_named_type(true)?.type_ref(),
            BoxTag::Array => TypeRef::array(TypeRef::Object),
            BoxTag::MultiArray => {
                let rank = ctx.container.read_u8()?;
                TypeRef::multi_array(TypeRef::Object, rank)
            }
            BoxTag::Collection(kind) => TypeRef::collection(kind, TypeRef::Object),
            BoxTag::SortedMap => TypeRef::sorted_map(TypeRef::Object, TypeRef::Object),
            BoxTag::Tuple => {
                let arity = ctx.container.read_u8()?;
                TypeRef::Tuple(objects(usize::from(arity)))
            }
        };
        let op = ctx.registry.get_operator(&inner)?;
        let value = ctx.read_child(op.as_ref())?;
        if value.is_null() {
            return Err(Error::Malformed("boxed payload is null".into()));
        }
        Ok(value)
    }
}
