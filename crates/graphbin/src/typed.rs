// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Typed facade over [`Value`] for Rust-native types.
//!
//! | Rust type | Declared type |
//! |-----------|---------------|
//! | `bool`, `char`, integers, `f32`, `f64` | matching scalar |
//! | `Decimal`, `Uuid`, `DateTime`, `DateTimeOffset`, `TimeSpan`, `String` | matching scalar |
//! | `Option<T>` | `T?` |
//! | `Vec<T>` / `VecDeque<T>` | `List<T>` / `Queue<T>` |
//! | `BTreeMap<K, V>` | `SortedMap<K, V>` |
//! | `(A, B)`, `(A, B, C)` | tuple |
//! | `ObjectRef`, `Value` | `Object` (boxed) |

use crate::error::{Error, Result};
use crate::types::{CollectionKind, PrimitiveKind, TypeRef};
use crate::value::{DateTime, DateTimeOffset, ObjectRef, SortedMap, TimeSpan, Value};
use rust_decimal::Decimal;
use std::collections::{BTreeMap, VecDeque};
use uuid::Uuid;

/// A Rust type with a fixed declared type and a `Value` mapping.
pub trait Serializable: Sized {
    /// Declared type used as the codec key.
    fn type_ref() -> TypeRef;

    fn to_value(&self) -> Result<Value>;

    fn from_value(value: Value) -> Result<Self>;
}

macro_rules! impl_serializable_scalar {
    ($($type:ty => $variant:ident / $kind:ident),* $(,)?) => {
        $(
            impl Serializable for $type {
                fn type_ref() -> TypeRef {
                    TypeRef::Primitive(PrimitiveKind::$kind)
                }

                fn to_value(&self) -> Result<Value> {
                    Ok(Value::$variant(*self))
                }

                fn from_value(value: Value) -> Result<Self> {
                    match value {
                        Value::$variant(v) => Ok(v),
                        other => Err(Error::mismatch(PrimitiveKind::$kind.name(), &other)),
                    }
                }
            }
        )*
    };
}

impl_serializable_scalar!(
    bool => Bool / Bool,
    char => Char / Char,
    i8 => I8 / I8,
    u8 => U8 / U8,
    i16 => I16 / I16,
    u16 => U16 / U16,
    i32 => I32 / I32,
    u32 => U32 / U32,
    i64 => I64 / I64,
    u64 => U64 / U64,
    f32 => F32 / F32,
    f64 => F64 / F64,
    Decimal => Decimal / Decimal,
    Uuid => Guid / Guid,
    DateTime => DateTime / DateTime,
    DateTimeOffset => DateTimeOffset / DateTimeOffset,
    TimeSpan => TimeSpan / TimeSpan,
);

impl Serializable for String {
    fn type_ref() -> TypeRef {
        TypeRef::STRING
    }

    fn to_value(&self) -> Result<Value> {
        Ok(Value::from(self.as_str()))
    }

    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::String(s) => Ok(s.to_string()),
            other => Err(Error::mismatch("String", &other)),
        }
    }
}

impl<T: Serializable> Serializable for Option<T> {
    fn type_ref() -> TypeRef {
        TypeRef::nullable(T::type_ref())
    }

    fn to_value(&self) -> Result<Value> {
        match self {
            Some(v) => v.to_value(),
            None => Ok(Value::Null),
        }
    }

    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Null => Ok(None),
            other => T::from_value(other).map(Some),
        }
    }
}

impl<T: Serializable> Serializable for Vec<T> {
    fn type_ref() -> TypeRef {
        TypeRef::list(T::type_ref())
    }

    fn to_value(&self) -> Result<Value> {
        self.iter()
            .map(Serializable::to_value)
            .collect::<Result<Vec<_>>>()
            .map(Value::List)
    }

    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::List(items) => items.into_iter().map(T::from_value).collect(),
            other => Err(Error::mismatch(Self::type_ref(), &other)),
        }
    }
}

impl<T: Serializable> Serializable for VecDeque<T> {
    fn type_ref() -> TypeRef {
        TypeRef::collection(CollectionKind::Queue, T::type_ref())
    }

    fn to_value(&self) -> Result<Value> {
        self.iter()
            .map(Serializable::to_value)
            .collect::<Result<VecDeque<_>>>()
            .map(Value::Queue)
    }

    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Queue(items) => items.into_iter().map(T::from_value).collect(),
            other => Err(Error::mismatch(Self::type_ref(), &other)),
        }
    }
}

impl<K: Serializable + Ord, V: Serializable> Serializable for BTreeMap<K, V> {
    fn type_ref() -> TypeRef {
        TypeRef::sorted_map(K::type_ref(), V::type_ref())
    }

    fn to_value(&self) -> Result<Value> {
        let mut map = SortedMap::new();
        for (k, v) in self {
            map.insert(k.to_value()?, v.to_value()?)?;
        }
        Ok(Value::SortedMap(map))
    }

    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::SortedMap(map) => map
                .iter()
                .map(|(k, v)| Ok((K::from_value(k.clone())?, V::from_value(v.clone())?)))
                .collect(),
            other => Err(Error::mismatch(Self::type_ref(), &other)),
        }
    }
}

impl<A: Serializable, B: Serializable> Serializable for (A, B) {
    fn type_ref() -> TypeRef {
        TypeRef::pair(A::type_ref(), B::type_ref())
    }

    fn to_value(&self) -> Result<Value> {
        Ok(Value::Tuple(vec![self.0.to_value()?, self.1.to_value()?]))
    }

    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Tuple(items) if items.len() == 2 => {
                let mut items = items.into_iter();
                match (items.next(), items.next()) {
                    (Some(a), Some(b)) => Ok((A::from_value(a)?, B::from_value(b)?)),
                    _ => Err(Error::InvalidValue("pair arity".into())),
                }
            }
            other => Err(Error::mismatch(Self::type_ref(), &other)),
        }
    }
}

impl<A: Serializable, B: Serializable, C: Serializable> Serializable for (A, B, C) {
    fn type_ref() -> TypeRef {
        TypeRef::Tuple(vec![A::type_ref(), B::type_ref(), C::type_ref()])
    }

    fn to_value(&self) -> Result<Value> {
        Ok(Value::Tuple(vec![
            self.0.to_value()?,
            self.1.to_value()?,
            self.2.to_value()?,
        ]))
    }

    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Tuple(items) if items.len() == 3 => {
                let mut items = items.into_iter();
                match (items.next(), items.next(), items.next()) {
                    (Some(a), Some(b), Some(c)) => {
                        Ok((A::from_value(a)?, B::from_value(b)?, C::from_value(c)?))
                    }
                    _ => Err(Error::InvalidValue("triple arity".into())),
                }
            }
            other => Err(Error::mismatch(Self::type_ref(), &other)),
        }
    }
}

impl Serializable for ObjectRef {
    fn type_ref() -> TypeRef {
        TypeRef::Object
    }

    fn to_value(&self) -> Result<Value> {
        Ok(Value::Object(self.clone()))
    }

    fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Object(o) => Ok(o),
            other => Err(Error::mismatch("Object", &other)),
        }
    }
}

impl Serializable for Value {
    fn type_ref() -> TypeRef {
        TypeRef::Object
    }

    fn to_value(&self) -> Result<Value> {
        Ok(self.clone())
    }

    fn from_value(value: Value) -> Result<Self> {
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SerializerConfig;
    use crate::serializer::Serializer;
    use crate::types::TypeCatalog;
    use std::sync::Arc;

    fn serializer() -> Serializer {
        Serializer::with_source(Arc::new(TypeCatalog::new())).with_config(SerializerConfig::builtin())
    }

    #[test]
    fn test_typed_roundtrips() {
        let s = serializer();

        let bytes = s.serialize(&vec![Some(1u16), None, Some(0)], true).expect("vec");
        assert_eq!(
            s.deserialize::<Vec<Option<u16>>>(&bytes, true).expect("vec"),
            vec![Some(1), None, Some(0)]
        );

        let mut map = BTreeMap::new();
        map.insert("b".to_string(), (1i64, 'z'));
        map.insert("a".to_string(), (-1i64, 'y'));
        let bytes = s.serialize(&map, true).expect("map");
        assert_eq!(
            s.deserialize::<BTreeMap<String, (i64, char)>>(&bytes, true).expect("map"),
            map
        );

        let queue: VecDeque<String> = ["x", "", "z"].iter().map(|s| s.to_string()).collect();
        let bytes = s.serialize(&queue, false).expect("queue");
        assert_eq!(s.deserialize::<VecDeque<String>>(&bytes, false).expect("queue"), queue);
    }

    #[test]
    fn test_boxed_value_roundtrip() {
        let s = serializer();
        let value = Value::Tuple(vec![Value::F64(1.5), Value::Null, Value::from("v")]);
        let bytes = s.serialize(&value, true).expect("value");
        assert_eq!(s.deserialize::<Value>(&bytes, true).expect("value"), value);
    }

    #[test]
    fn test_wrong_shape_is_mismatch() {
        assert!(matches!(
            <(i32, i32)>::from_value(Value::Tuple(vec![Value::I32(1)])),
            Err(Error::TypeMismatch { .. })
        ));
        assert!(matches!(String::from_value(Value::Null), Err(Error::TypeMismatch { .. })));
    }
}
