// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Bounded snapshot history.
//!
//! Every `record` encodes the value; every read decodes a fresh copy, so
//! mutating a returned value never touches stored history.

use crate::circular::CircularIndex;
use crate::error::Result;
use graphbin::{Serializable, Serializer};
use std::fmt;
use std::marker::PhantomData;

/// Last `capacity` snapshots of a `T`, oldest evicted first.
pub struct HistoryStore<T> {
    serializer: Serializer,
    use_reference_pool: bool,
    index: CircularIndex,
    snapshots: Vec<Vec<u8>>,
    _marker: PhantomData<fn() -> T>,
}

impl<T: Serializable> HistoryStore<T> {
    /// History on the global serializer, with the reference pool enabled.
    pub fn new(capacity: usize) -> Result<Self> {
        Self::with_serializer(Serializer::global().clone(), capacity)
    }

    pub fn with_serializer(serializer: Serializer, capacity: usize) -> Result<Self> {
        let index = CircularIndex::new(capacity)?;
        Ok(Self {
            serializer,
            use_reference_pool: true,
            index,
            snapshots: Vec::new(),
            _marker: PhantomData,
        })
    }

    /// Encode snapshots without the reference pool (acyclic values only).
    pub fn without_reference_pool(mut self) -> Self {
        self.use_reference_pool = false;
        self
    }

    /// Append a snapshot, evicting the oldest when full.
    pub fn record(&mut self, value: &T) -> Result<()> {
        let bytes = self.serializer.serialize(value, self.use_reference_pool)?;
        let (slot, evicted) = self.index.push();
        if slot < self.snapshots.len() {
            self.snapshots[slot] = bytes;
        } else {
            self.snapshots.push(bytes);
        }
        if evicted {
            log::trace!("[history] evicted oldest snapshot (capacity {})", self.capacity());
        }
        Ok(())
    }

    /// Snapshot at logical position `index` (0 = oldest).
    pub fn get(&self, index: usize) -> Result<Option<T>> {
        self.index
            .physical(index)
            .map(|slot| self.decode(slot))
            .transpose()
    }

    pub fn latest(&self) -> Result<Option<T>> {
        self.index.newest().map(|slot| self.decode(slot)).transpose()
    }

    /// Snapshots from oldest to newest.
    pub fn iter(&self) -> impl Iterator<Item = Result<T>> + '_ {
        self.index.slots().map(move |slot| self.decode(slot))
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.index.capacity()
    }

    /// Encoded size of every stored snapshot.
    pub fn stored_bytes(&self) -> usize {
        self.index.slots().map(|slot| self.snapshots[slot].len()).sum()
    }

    pub fn clear(&mut self) {
        self.index.clear();
        self.snapshots.clear();
    }

    fn decode(&self, slot: usize) -> Result<T> {
        Ok(self
            .serializer
            .deserialize(&self.snapshots[slot], self.use_reference_pool)?)
    }
}

impl<T> fmt::Debug for HistoryStore<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HistoryStore")
            .field("len", &self.index.len())
            .field("capacity", &self.index.capacity())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use graphbin::{ClassBuilder, ObjectRef, SerializerConfig, TypeCatalog, TypeRef, Value};
    use std::sync::Arc;

    fn serializer(catalog: Arc<TypeCatalog>) -> Serializer {
        Serializer::with_source(catalog).with_config(SerializerConfig::builtin())
    }

    #[test]
    fn test_bounded_and_ordered() {
        let mut history: HistoryStore<String> =
            HistoryStore::with_serializer(serializer(Arc::new(TypeCatalog::new())), 3)
                .expect("history");
        assert_eq!(history.latest().expect("latest"), None);

        for word in ["a", "b", "c", "d", "e"] {
            history.record(&word.to_string()).expect("record");
        }
        assert_eq!(history.len(), 3);
        let all: Vec<String> = history.iter().collect::<Result<_>>().expect("iter");
        assert_eq!(all, vec!["c", "d", "e"]);
        assert_eq!(history.get(0).expect("get"), Some("c".to_string()));
        assert_eq!(history.get(3).expect("get"), None);
        assert_eq!(history.latest().expect("latest"), Some("e".to_string()));

        history.clear();
        assert!(history.is_empty());
        history.record(&"f".to_string()).expect("record");
        assert_eq!(history.latest().expect("latest"), Some("f".to_string()));
    }

    #[test]
    fn test_snapshots_do_not_alias_live_objects() {
        let catalog = Arc::new(TypeCatalog::new());
        catalog
            .register_class(
                ClassBuilder::new("Doc.Page")
                    .member("Text", TypeRef::STRING)
                    .member("Next", TypeRef::class("Doc.Page")),
            )
            .expect("register");
        let page = catalog.instantiate("Doc.Page").expect("page");
        page.set("Next", page.clone()).expect("cycle");

        let mut history: HistoryStore<ObjectRef> =
            HistoryStore::with_serializer(serializer(catalog), 4).expect("history");
        page.set("Text", "draft").expect("text");
        history.record(&page).expect("record");
        page.set("Text", "final").expect("text");
        history.record(&page).expect("record");

        let first = history.get(0).expect("get").expect("present");
        assert!(!first.ptr_eq(&page));
        assert_eq!(first.get("Text"), Some(Value::from("draft")));
        // The cycle survives inside the snapshot.
        assert_eq!(first.get("Next"), Some(Value::Object(first.clone())));

        first.set("Text", "scribble").expect("text");
        let again = history.get(0).expect("get").expect("present");
        assert_eq!(again.get("Text"), Some(Value::from("draft")));
    }

    #[test]
    fn test_cyclic_value_without_pool_fails() {
        let catalog = Arc::new(TypeCatalog::new());
        catalog
            .register_class(ClassBuilder::new("Doc.Loop").member("Me", TypeRef::Object))
            .expect("register");
        let obj = catalog.instantiate("Doc.Loop").expect("loop");
        obj.set("Me", obj.clone()).expect("cycle");

        let mut history: HistoryStore<ObjectRef> = HistoryStore::with_serializer(serializer(catalog), 2)
            .expect("history")
            .without_reference_pool();
        assert!(history.record(&obj).is_err());
        assert!(history.is_empty());
    }
}
