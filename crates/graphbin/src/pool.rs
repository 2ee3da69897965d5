// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Reference pools: identity tracking for shared and cyclic references.
//!
//! The write pool assigns ids in first-seen order; the read pool appends
//! decoded objects in the same order. The two never share state: they agree
//! only because encode and decode visit nodes in the same sequence.
//!
//! # Wire shape (pool enabled)
//!
//! ```text
//! flag 1 + item u32 id   -> seen before, payload skipped
//! flag 0                 -> new, payload follows
//! ```
//!
//! With the pool disabled nothing is written. Shared references are then
//! duplicated, and cycles are refused (see [`WritePool::enter`]).

use crate::container::Container;
use crate::error::{Error, Result};
use crate::value::Value;
use std::collections::{HashMap, HashSet};

/// Identity key of a pooled value, or `None` for values without identity.
pub(crate) fn identity(value: &Value) -> Option<usize> {
    match value {
        Value::String(s) => Some(s.as_ptr() as usize),
        Value::Array(a) => Some(a.addr()),
        Value::Object(o) => Some(o.addr()),
        _ => None,
    }
}

/// Encode-side pool.
#[derive(Debug)]
pub struct WritePool {
    enabled: bool,
    detect_cycles: bool,
    ids: HashMap<usize, u32>,
    // Keeps pooled targets alive so their addresses cannot be reused mid-call.
    retained: Vec<Value>,
    path: HashSet<usize>,
}

impl WritePool {
    pub fn new(enabled: bool, detect_cycles: bool) -> Self {
        Self {
            enabled,
            detect_cycles,
            ids: HashMap::new(),
            retained: Vec::new(),
            path: HashSet::new(),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Emit the seen/new decision for `value`.
    ///
    /// Returns `true` when `value` was already registered: its id has been
    /// written and the caller must skip the payload. Returns `false` when the
    /// caller must call [`add_object`](Self::add_object) and write the payload.
    pub fn write(&mut self, container: &mut Container, value: &Value) -> Result<bool> {
        if !self.enabled {
            return Ok(false);
        }
        let key = identity(value)
            .ok_or_else(|| Error::mismatch("identity-bearing value", value))?;
        match self.ids.get(&key) {
            Some(id) => {
                container.write_flag(true);
                container.write_u32(*id);
                Ok(true)
            }
            None => {
                container.write_flag(false);
                Ok(false)
            }
        }
    }

    /// Register `value` under the next id.
    pub fn add_object(&mut self, value: &Value) {
        if !self.enabled {
            return;
        }
        if let Some(key) = identity(value) {
            let id = self.retained.len() as u32;
            self.ids.entry(key).or_insert(id);
            self.retained.push(value.clone());
        }
    }

    /// Number of registered objects.
    pub fn len(&self) -> usize {
        self.retained.len()
    }

    pub fn is_empty(&self) -> bool {
        self.retained.is_empty()
    }

    /// Mark `value` as being encoded on the current path.
    ///
    /// Only active when the pool is disabled: reaching a value that is
    /// already on the path means the graph is cyclic and could never finish.
    pub fn enter(&mut self, value: &Value) -> Result<()> {
        if self.enabled || !self.detect_cycles {
            return Ok(());
        }
        if let Some(key) = identity(value) {
            if !self.path.insert(key) {
                let what = match value {
                    Value::Object(o) => o.class_name().to_string(),
                    other => other.kind_name().to_string(),
                };
                return Err(Error::CycleWithoutReferencePool(what));
            }
        }
        Ok(())
    }

    pub fn exit(&mut self, value: &Value) {
        if let Some(key) = identity(value) {
            self.path.remove(&key);
        }
    }
}

/// Decode-side pool: id-indexed slots.
#[derive(Debug)]
pub struct ReadPool {
    enabled: bool,
    slots: Vec<Value>,
}

impl ReadPool {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            slots: Vec::new(),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Read the seen/new decision.
    ///
    /// `Some(value)` is a back-reference. `None` means the caller must
    /// allocate a shell, [`add_object`](Self::add_object) it, and only then
    /// decode the payload into it.
    pub fn read(&mut self, container: &mut Container) -> Result<Option<Value>> {
        if !self.enabled || !container.read_flag()? {
            return Ok(None);
        }
        let id = container.read_u32()? as usize;
        self.slots.get(id).cloned().map(Some).ok_or_else(|| {
            Error::Malformed(format!(
                "reference id {} but only {} objects decoded",
                id,
                self.slots.len()
            ))
        })
    }

    pub fn add_object(&mut self, value: Value) {
        if self.enabled {
            self.slots.push(value);
        }
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::ArrayRef;

    #[test]
    fn test_seen_before_roundtrip() {
        let a = Value::Array(ArrayRef::new(vec![]));
        let b = Value::from("shared");
        let mut pool = WritePool::new(true, true);
        let mut c = Container::new();

        assert!(!pool.write(&mut c, &a).expect("write a"));
        pool.add_object(&a);
        assert!(!pool.write(&mut c, &b).expect("write b"));
        pool.add_object(&b);
        assert!(pool.write(&mut c, &b).expect("again b"));
        assert!(pool.write(&mut c, &a).expect("again a"));

        let mut back = Container::import(&c.export().expect("export")).expect("import");
        let mut read = ReadPool::new(true);
        assert!(read.read(&mut back).expect("a").is_none());
        read.add_object(a.clone());
        assert!(read.read(&mut back).expect("b").is_none());
        read.add_object(b.clone());
        assert_eq!(read.read(&mut back).expect("again b"), Some(b));
        assert_eq!(read.read(&mut back).expect("again a"), Some(a));
    }

    #[test]
    fn test_disabled_pool_writes_nothing() {
        let v = Value::from("x");
        let mut pool = WritePool::new(false, true);
        let mut c = Container::new();
        assert!(!pool.write(&mut c, &v).expect("write"));
        pool.add_object(&v);
        assert!(!pool.write(&mut c, &v).expect("write again"));
        assert!(pool.is_empty());
        let bytes = c.export().expect("export");
        assert!(Container::import(&bytes).expect("import").is_exhausted());
    }

    #[test]
    fn test_cycle_detection_only_when_disabled() {
        let arr = Value::Array(ArrayRef::new(vec![]));
        let mut off = WritePool::new(false, true);
        off.enter(&arr).expect("first entry");
        assert!(matches!(
            off.enter(&arr),
            Err(Error::CycleWithoutReferencePool(_))
        ));
        off.exit(&arr);
        off.enter(&arr).expect("re-entry after exit");

        let mut on = WritePool::new(true, true);
        on.enter(&arr).expect("enabled pool ignores path");
        on.enter(&arr).expect("enabled pool ignores path");
    }

    #[test]
    fn test_bad_reference_id_is_malformed() {
        let mut c = Container::new();
        c.write_flag(true);
        c.write_u32(3);
        let mut back = Container::import(&c.export().expect("export")).expect("import");
        let mut read = ReadPool::new(true);
        assert!(matches!(read.read(&mut back), Err(Error::Malformed(_))));
    }
}
