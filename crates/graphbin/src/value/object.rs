// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Identity-bearing heap values: class instances and 1-D arrays.
//!
//! Both are `Arc` handles around a lock; cloning a handle shares the target.
//! Identity (pointer address) is what the reference pool tracks.

use crate::error::{Error, Result};
use crate::types::ClassDescriptor;
use crate::value::Value;
use parking_lot::RwLock;
use std::fmt;
use std::sync::Arc;

/// A class instance: runtime class plus one slot per member, in member order.
#[derive(Debug)]
pub struct Object {
    class: Arc<ClassDescriptor>,
    fields: Vec<Value>,
}

impl Object {
    pub fn class(&self) -> &Arc<ClassDescriptor> {
        &self.class
    }

    pub fn fields(&self) -> &[Value] {
        &self.fields
    }
}

/// Shared handle to an [`Object`].
#[derive(Clone)]
pub struct ObjectRef(Arc<RwLock<Object>>);

impl ObjectRef {
    /// Allocate an instance with every member at its declared default.
    pub fn new(class: Arc<ClassDescriptor>) -> Result<Self> {
        if class.is_abstract() {
            return Err(Error::NotInstantiable(class.name().to_string()));
        }
        let fields = class
            .members()
            .iter()
            .map(|m| Value::default_for(m.ty()))
            .collect();
        Ok(Self(Arc::new(RwLock::new(Object { class, fields }))))
    }

    pub fn class(&self) -> Arc<ClassDescriptor> {
        self.0.read().class.clone()
    }

    pub fn class_name(&self) -> Arc<str> {
        self.0.read().class.name_arc().clone()
    }

    /// Read a member by name.
    pub fn get(&self, member: &str) -> Option<Value> {
        let obj = self.0.read();
        let idx = obj.class.member_index(member)?;
        Some(obj.fields[idx].clone())
    }

    /// Write a member by name. Type checking happens when the graph is encoded.
    pub fn set(&self, member: &str, value: impl Into<Value>) -> Result<()> {
        let mut obj = self.0.write();
        let idx = obj.class.member_index(member).ok_or_else(|| {
            Error::InvalidValue(format!("{} has no member {}", obj.class.name(), member))
        })?;
        obj.fields[idx] = value.into();
        Ok(())
    }

    pub(crate) fn get_slot(&self, slot: usize) -> Value {
        self.0.read().fields[slot].clone()
    }

    pub(crate) fn set_slot(&self, slot: usize, value: Value) {
        self.0.write().fields[slot] = value;
    }

    /// Snapshot of every member value, in member order.
    pub fn fields(&self) -> Vec<Value> {
        self.0.read().fields.clone()
    }

    pub fn ptr_eq(&self, other: &ObjectRef) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    /// Identity key used by the reference pool.
    pub fn addr(&self) -> usize {
        Arc::as_ptr(&self.0) as *const () as usize
    }
}

impl fmt::Debug for ObjectRef {
    // Members may point back at this object; print identity only.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ObjectRef({} @{:#x})", self.class_name(), self.addr())
    }
}

/// Shared handle to a one-dimensional array.
#[derive(Clone, Default)]
pub struct ArrayRef(Arc<RwLock<Vec<Value>>>);

impl ArrayRef {
    pub fn new(items: Vec<Value>) -> Self {
        Self(Arc::new(RwLock::new(items)))
    }

    pub(crate) fn with_capacity(capacity: usize) -> Self {
        Self::new(Vec::with_capacity(capacity))
    }

    pub fn len(&self) -> usize {
        self.0.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.read().is_empty()
    }

    pub fn get(&self, index: usize) -> Option<Value> {
        self.0.read().get(index).cloned()
    }

    pub fn set(&self, index: usize, value: impl Into<Value>) -> Result<()> {
        let mut items = self.0.write();
        let len = items.len();
        let slot = items.get_mut(index).ok_or_else(|| {
            Error::InvalidValue(format!("index {} out of bounds for length {}", index, len))
        })?;
        *slot = value.into();
        Ok(())
    }

    pub(crate) fn push(&self, value: Value) {
        self.0.write().push(value);
    }

    /// Snapshot of the elements.
    pub fn to_vec(&self) -> Vec<Value> {
        self.0.read().clone()
    }

    pub fn ptr_eq(&self, other: &ArrayRef) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    /// Identity key used by the reference pool.
    pub fn addr(&self) -> usize {
        Arc::as_ptr(&self.0) as *const () as usize
    }
}

impl fmt::Debug for ArrayRef {
    // Elements may contain this array; print identity only.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ArrayRef(len={} @{:#x})", self.len(), self.addr())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ClassBuilder, PrimitiveKind, TypeCatalog, TypeRef};

    #[test]
    fn test_object_set_get_and_identity() {
        let catalog = TypeCatalog::new();
        catalog
            .register_class(
                ClassBuilder::new("Node")
                    .member("Value", PrimitiveKind::I32.into())
                    .member("Next", TypeRef::class("Node")),
            )
            .expect("register");
        let a = catalog.instantiate("Node").expect("node");
        let alias = a.clone();
        a.set("Value", 5i32).expect("set");
        assert_eq!(alias.get("Value"), Some(Value::I32(5)));
        assert!(a.ptr_eq(&alias));
        assert!(a.set("Missing", 1i32).is_err());

        a.set("Next", Value::Object(a.clone())).expect("self link");
        let next = a.get("Next").expect("next");
        assert!(matches!(next, Value::Object(ref n) if n.ptr_eq(&a)));
        // Debug must not recurse through the cycle.
        assert!(format!("{:?}", a).starts_with("ObjectRef(Node"));
    }

    #[test]
    fn test_array_set_bounds() {
        let arr = ArrayRef::new(vec![Value::I32(1), Value::I32(2)]);
        arr.set(1, 9i32).expect("set");
        assert_eq!(arr.to_vec(), vec![Value::I32(1), Value::I32(9)]);
        assert!(arr.set(2, 0i32).is_err());
        assert!(!arr.ptr_eq(&ArrayRef::new(arr.to_vec())));
    }
}
