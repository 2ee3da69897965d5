// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Undo/redo journal for member assignments.
//!
//! Each edit stores the member's old and new values encoded with the
//! member's declared type. Undo and redo decode and reassign them, so a
//! restored reference-typed member holds an equal copy, not the original
//! instance.

use crate::circular::CircularIndex;
use crate::error::{HistoryError, Result};
use graphbin::{ObjectRef, Serializer, TypeRef, Value};
use std::fmt;
use std::sync::Arc;

struct Edit {
    target: ObjectRef,
    member: Arc<str>,
    ty: TypeRef,
    before: Vec<u8>,
    after: Vec<u8>,
}

/// Bounded undo/redo history of `ObjectRef` member assignments.
pub struct PropertyJournal {
    serializer: Serializer,
    index: CircularIndex,
    edits: Vec<Option<Edit>>,
    /// Edits at logical positions below this are applied.
    cursor: usize,
}

impl PropertyJournal {
    /// Journal on the global serializer.
    pub fn new(capacity: usize) -> Result<Self> {
        Self::with_serializer(Serializer::global().clone(), capacity)
    }

    pub fn with_serializer(serializer: Serializer, capacity: usize) -> Result<Self> {
        let index = CircularIndex::new(capacity)?;
        Ok(Self {
            serializer,
            index,
            edits: Vec::new(),
            cursor: 0,
        })
    }

    /// Assign `target.member = value` and record the edit.
    ///
    /// Discards every undone edit. Nothing is assigned if either value fails
    /// to encode.
    pub fn set(&mut self, target: &ObjectRef, member: &str, value: impl Into<Value>) -> Result<()> {
        let value = value.into();
        let class = target.class();
        let ty = class
            .member_index(member)
            .map(|i| class.members()[i].ty().clone())
            .ok_or_else(|| HistoryError::UnknownMember {
                class: class.name().to_string(),
                member: member.to_string(),
            })?;

        let old = target.get(member).unwrap_or(Value::Null);
        let before = self.serializer.get_bytes(&ty, &old, true)?;
        let after = self.serializer.get_bytes(&ty, &value, true)?;
        target.set(member, value)?;

        self.index.truncate(self.cursor);
        let (slot, evicted) = self.index.push();
        let edit = Edit {
            target: target.clone(),
            member: Arc::from(member),
            ty,
            before,
            after,
        };
        if slot < self.edits.len() {
            self.edits[slot] = Some(edit);
        } else {
            self.edits.push(Some(edit));
        }
        if evicted {
            log::trace!("[journal] evicted oldest edit (capacity {})", self.index.capacity());
        }
        self.cursor = self.index.len();
        Ok(())
    }

    /// Revert the most recent applied edit. Returns `false` when there is none.
    pub fn undo(&mut self) -> Result<bool> {
        if self.cursor == 0 {
            return Ok(false);
        }
        self.apply(self.cursor - 1, false)?;
        self.cursor -= 1;
        Ok(true)
    }

    /// Reapply the most recently undone edit. Returns `false` when there is none.
    pub fn redo(&mut self) -> Result<bool> {
        if self.cursor == self.index.len() {
            return Ok(false);
        }
        self.apply(self.cursor, true)?;
        self.cursor += 1;
        Ok(true)
    }

    pub fn can_undo(&self) -> bool {
        self.cursor > 0
    }

    pub fn can_redo(&self) -> bool {
        self.cursor < self.index.len()
    }

    /// Recorded edits, applied and undone.
    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.index.capacity()
    }

    pub fn clear(&mut self) {
        self.index.clear();
        self.edits.clear();
        self.cursor = 0;
    }

    fn apply(&self, logical: usize, forward: bool) -> Result<()> {
        let Some(edit) = self
            .index
            .physical(logical)
            .and_then(|slot| self.edits.get(slot))
            .and_then(Option::as_ref)
        else {
            return Ok(());
        };
        let bytes = if forward { &edit.after } else { &edit.before };
        let value = self.serializer.get_item(&edit.ty, bytes, true)?;
        edit.target.set(&edit.member, value)?;
        Ok(())
    }
}

impl fmt::Debug for PropertyJournal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PropertyJournal")
            .field("len", &self.index.len())
            .field("cursor", &self.cursor)
            .field("capacity", &self.index.capacity())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use graphbin::{ClassBuilder, PrimitiveKind, SerializerConfig, TypeCatalog};

    fn setup() -> (Arc<TypeCatalog>, PropertyJournal) {
        let catalog = Arc::new(TypeCatalog::new());
        catalog
            .register_class(
                ClassBuilder::new("Ui.Label")
                    .member("Text", TypeRef::STRING)
                    .member("Size", PrimitiveKind::F32.into())
                    .member("Tags", TypeRef::list(TypeRef::STRING)),
            )
            .expect("register");
        let serializer =
            Serializer::with_source(catalog.clone()).with_config(SerializerConfig::builtin());
        let journal = PropertyJournal::with_serializer(serializer, 3).expect("journal");
        (catalog, journal)
    }

    #[test]
    fn test_undo_redo_sequence() {
        let (catalog, mut journal) = setup();
        let label = catalog.instantiate("Ui.Label").expect("label");

        journal.set(&label, "Text", "one").expect("set");
        journal.set(&label, "Text", "two").expect("set");
        journal.set(&label, "Size", 12.5f32).expect("set");

        assert!(journal.undo().expect("undo"));
        assert_eq!(label.get("Size"), Some(Value::F32(0.0)));
        assert!(journal.undo().expect("undo"));
        assert_eq!(label.get("Text"), Some(Value::from("one")));
        assert!(journal.undo().expect("undo"));
        assert_eq!(label.get("Text"), Some(Value::Null));
        assert!(!journal.undo().expect("nothing left"));

        assert!(journal.redo().expect("redo"));
        assert!(journal.redo().expect("redo"));
        assert_eq!(label.get("Text"), Some(Value::from("two")));
        assert!(journal.can_redo());
    }

    #[test]
    fn test_new_edit_discards_redo_tail() {
        let (catalog, mut journal) = setup();
        let label = catalog.instantiate("Ui.Label").expect("label");

        journal.set(&label, "Text", "a").expect("set");
        journal.set(&label, "Text", "b").expect("set");
        journal.undo().expect("undo");
        journal.set(&label, "Text", "c").expect("set");

        assert_eq!(journal.len(), 2);
        assert!(!journal.can_redo());
        journal.undo().expect("undo");
        assert_eq!(label.get("Text"), Some(Value::from("a")));
    }

    #[test]
    fn test_capacity_evicts_oldest() {
        let (catalog, mut journal) = setup();
        let label = catalog.instantiate("Ui.Label").expect("label");

        for i in 0..5 {
            journal.set(&label, "Size", i as f32).expect("set");
        }
        assert_eq!(journal.len(), 3);
        while journal.undo().expect("undo") {}
        // Edits 0 and 1 are gone; the oldest kept edit restores 1.0.
        assert_eq!(label.get("Size"), Some(Value::F32(1.0)));
    }

    #[test]
    fn test_restored_collection_is_a_copy() {
        let (catalog, mut journal) = setup();
        let label = catalog.instantiate("Ui.Label").expect("label");
        let tags = Value::List(vec![Value::from("x"), Value::from("y")]);

        journal.set(&label, "Tags", tags.clone()).expect("set");
        journal.set(&label, "Tags", Value::Null).expect("set");
        journal.undo().expect("undo");
        assert_eq!(label.get("Tags"), Some(tags));
    }

    #[test]
    fn test_rejected_edits_leave_no_trace() {
        let (catalog, mut journal) = setup();
        let label = catalog.instantiate("Ui.Label").expect("label");

        assert!(matches!(
            journal.set(&label, "Missing", 1i32),
            Err(HistoryError::UnknownMember { .. })
        ));
        assert!(matches!(
            journal.set(&label, "Size", "not a float"),
            Err(HistoryError::Codec(graphbin::Error::TypeMismatch { .. }))
        ));
        assert_eq!(label.get("Size"), Some(Value::F32(0.0)));
        assert!(journal.is_empty());
    }
}
