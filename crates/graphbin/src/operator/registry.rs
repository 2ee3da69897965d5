// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Type -> operator cache.
//!
//! # Thread Safety
//!
//! - `operators`: `DashMap`; the shard lock is held only while inserting the
//!   unbuilt operator, never while building
//! - Building happens on the thread that created the entry; other threads get
//!   the same `Arc` and block in `write`/`read` until the build completes
//! - Entries are immutable once built and never evicted; a failed build
//!   removes its entry so the error is not cached

use crate::error::Result;
use crate::operator::{
    ArrayOperator, BoxedOperator, ClassOperator, CollectionOperator, EnumOperator,
    MultiArrayOperator, NullableOperator, Operator, ScalarOperator, SortedMapOperator,
    TupleOperator,
};
use crate::types::{MemberSource, TypeCatalog, TypeRef};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::fmt;
use std::sync::{Arc, OnceLock};

static GLOBAL_REGISTRY: OnceLock<Arc<OperatorRegistry>> = OnceLock::new();

/// Process-wide or private cache of built operators.
pub struct OperatorRegistry {
    operators: DashMap<TypeRef, Arc<dyn Operator>>,
    source: Arc<dyn MemberSource>,
}

impl fmt::Debug for OperatorRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OperatorRegistry")
            .field("operators", &self.operators.len())
            .finish_non_exhaustive()
    }
}

impl OperatorRegistry {
    /// Registry resolving classes and enums through `source`.
    pub fn new(source: Arc<dyn MemberSource>) -> Self {
        Self {
            operators: DashMap::new(),
            source,
        }
    }

    /// Registry bound to [`TypeCatalog::global`].
    pub fn global() -> Arc<OperatorRegistry> {
        GLOBAL_REGISTRY
            .get_or_init(|| {
                let catalog: Arc<dyn MemberSource> = TypeCatalog::global();
                Arc::new(OperatorRegistry::new(catalog))
            })
            .clone()
    }

    pub fn source(&self) -> &Arc<dyn MemberSource> {
        &self.source
    }

    /// Number of cached operators.
    pub fn len(&self) -> usize {
        self.operators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.operators.is_empty()
    }

    /// Cached operator for `ty`, creating and building it on first use.
    pub fn get_operator(&self, ty: &TypeRef) -> Result<Arc<dyn Operator>> {
        if let Some(op) = self.operators.get(ty) {
            log::trace!("[registry] cache hit {}", ty);
            return Ok(op.value().clone());
        }

        let (op, created) = match self.operators.entry(ty.clone()) {
            Entry::Occupied(e) => (e.get().clone(), false),
            Entry::Vacant(e) => {
                let op = create(ty);
                e.insert(Arc::clone(&op));
                (op, true)
            }
        };

        if created {
            // Recursive lookups of `ty` during build see the unbuilt entry.
            if let Err(err) = op.build(self) {
                self.operators.remove(ty);
                log::debug!("[registry] build failed for {}: {}", ty, err);
                return Err(err);
            }
            log::debug!("[registry] built operator for {}", ty);
        }
        Ok(op)
    }
}

fn create(ty: &TypeRef) -> Arc<dyn Operator> {
    match ty {
        TypeRef::Primitive(kind) => Arc::new(ScalarOperator::new(*kind)),
        TypeRef::Enum(name) => Arc::new(EnumOperator::new(name.clone())),
        TypeRef::Class(name) => Arc::new(ClassOperator::new(name.clone())),
        TypeRef::Object => Arc::new(BoxedOperator::new()),
        TypeRef::Nullable(inner) => Arc::new(NullableOperator::new((**inner).clone())),
        TypeRef::Array(element) => Arc::new(ArrayOperator::new((**element).clone())),
        TypeRef::MultiArray(element, rank) => {
            Arc::new(MultiArrayOperator::new((**element).clone(), *rank))
        }
        TypeRef::Collection(kind, element) => {
            Arc::new(CollectionOperator::new(*kind, (**element).clone()))
        }
        TypeRef::SortedMap(key, value) => {
            Arc::new(SortedMapOperator::new((**key).clone(), (**value).clone()))
        }
        TypeRef::Tuple(items) => Arc::new(TupleOperator::new(items.clone())),
    }
}
