// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Sorted maps: count + (key, value) pairs in enumeration order.
//!
//! No ordering is encoded; decode re-inserts every pair and the map's own
//! ordering restores sortedness.

use crate::error::{Error, Result};
use crate::operator::array::{read_count, write_sequence};
use crate::operator::{
    build_follows, write_null_flag, Follows, Operator, OperatorRegistry, ReadContext,
    WriteContext,
};
use crate::types::TypeRef;
use crate::value::{SortedMap, Value};
use std::sync::Arc;

#[derive(Debug)]
pub struct SortedMapOperator {
    raw: TypeRef,
    key: TypeRef,
    value: TypeRef,
    follows: Follows,
}

impl SortedMapOperator {
    pub fn new(key: TypeRef, value: TypeRef) -> Self {
        Self {
            raw: TypeRef::sorted_map(key.clone(), value.clone()),
            key,
            value,
            follows: Follows::new(),
        }
    }
}

impl Operator for SortedMapOperator {
    fn raw(&self) -> &TypeRef {
        &self.raw
    }

    fn build(&self, registry: &OperatorRegistry) -> Result<()> {
        build_follows(&self.follows, registry, &[&self.key, &self.value])
    }

    fn follows(&self) -> Result<&[Arc<dyn Operator>]> {
        self.follows.wait(&self.raw).map(Vec::as_slice)
    }

    fn write(&self, ctx: &mut WriteContext<'_>, value: &Value) -> Result<()> {
        let follows = self.follows.wait(&self.raw)?;
        let (key_op, value_op) = (follows[0].as_ref(), follows[1].as_ref());
        let map = match value {
            Value::Null => None,
            Value::SortedMap(map) => Some(map),
            other => return Err(Error::mismatch(&self.raw, other)),
        };
        if write_null_flag(&mut ctx.container, value) {
            return Ok(());
        }
        let Some(map) = map else {
            return Ok(());
        };
        write_sequence(ctx, map.len(), map.iter(), |ctx, (k, v)| {
            ctx.write_child(key_op, k)?;
            ctx.write_child(value_op, v)
        })
    }

    fn read(&self, ctx: &mut ReadContext<'_>) -> Result<Value> {
        let follows = self.follows.wait(&self.raw)?;
        let (key_op, value_op) = (follows[0].as_ref(), follows[1].as_ref());
        if ctx.container.read_flag()? {
            return Ok(Value::Null);
        }
        let count = read_count(ctx)?;
        let mut map = SortedMap::new();
        for _ in 0..count {
            let key = ctx.read_child(key_op)?;
            let value = ctx.read_child(value_op)?;
            map.insert(key, value)
                .map_err(|e| Error::Malformed(e.to_string()))?;
        }
        Ok(Value::SortedMap(map))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SerializerConfig;
    use crate::container::Container;
    use crate::types::{PrimitiveKind, TypeCatalog};

    fn roundtrip(ty: &TypeRef, value: &Value) -> Value {
        let registry = OperatorRegistry::new(Arc::new(TypeCatalog::new()));
        let config = SerializerConfig::builtin();
        let op = registry.get_operator(ty).expect("op");
        let mut w = WriteContext::new(&registry, &config, true);
        op.write(&mut w, value).expect("write");
        let bytes = w.into_container().export().expect("export");
        let mut r = ReadContext::new(Container::import(&bytes).expect("import"), &registry, &config, true);
        op.read(&mut r).expect("read")
    }

    #[test]
    fn test_sorted_map_roundtrip_keeps_order() {
        let ty = TypeRef::sorted_map(TypeRef::STRING, PrimitiveKind::I64.into());
        let mut map = SortedMap::new();
        map.insert("pear", 3i64).expect("insert");
        map.insert("apple", 1i64).expect("insert");
        map.insert("fig", Value::Null).expect("insert");
        let back = roundtrip(&ty, &Value::SortedMap(map.clone()));
        let Value::SortedMap(back) = back else {
            panic!("not a map");
        };
        let keys: Vec<_> = back.keys().filter_map(Value::as_str).collect();
        assert_eq!(keys, ["apple", "fig", "pear"]);
        assert_eq!(back, map);
    }

    #[test]
    fn test_empty_and_null_maps() {
        let ty = TypeRef::sorted_map(PrimitiveKind::I32.into(), TypeRef::STRING);
        assert_eq!(roundtrip(&ty, &Value::Null), Value::Null);
        let empty = Value::SortedMap(SortedMap::new());
        assert_eq!(roundtrip(&ty, &empty), empty);
    }

    #[test]
    fn test_null_key_on_wire_is_malformed() {
        let registry = OperatorRegistry::new(Arc::new(TypeCatalog::new()));
        let config = SerializerConfig::builtin();
        let ty = TypeRef::sorted_map(TypeRef::STRING, PrimitiveKind::I32.into());
        let op = registry.get_operator(&ty).expect("op");
        let mut c = Container::new();
        c.write_flag(false); // map not null
        c.write_flag(true); // any
        c.write_u32(1);
        c.write_flag(true); // key null
        c.write_flag(false); // value not null
        c.write_flag(true); // value default
        let bytes = c.export().expect("export");
        let mut r = ReadContext::new(Container::import(&bytes).expect("import"), &registry, &config, false);
        assert!(matches!(op.read(&mut r), Err(Error::Malformed(_))));
    }
}
