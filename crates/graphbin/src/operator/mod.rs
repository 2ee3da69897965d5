// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Per-type codecs ("operators") and the registry that caches them.
//!
//! # Architecture
//!
//! ```text
//! OperatorRegistry (DashMap<TypeRef, Arc<dyn Operator>>)
//! +-- get_operator(ty): cached, or create -> insert -> build
//!
//! Operator
//! +-- raw()      declared type it encodes
//! +-- build()    resolve child operators ("follows") once
//! +-- write()    value -> container (+ write pool)
//! +-- read()     container (+ read pool) -> value
//! ```
//!
//! Composite operators own a [`BuildCell`] with their children. The registry
//! inserts an operator *before* building it, so a type that refers to itself
//! (directly or through other types) resolves to the in-progress operator
//! instead of recursing forever. `write`/`read` wait on the cell.

mod array;
mod boxed;
mod class;
mod collection;
mod enums;
mod multi_array;
mod nullable;
mod registry;
mod scalar;
mod signal;
mod sorted_map;
mod tuple;

pub use array::ArrayOperator;
pub use boxed::{BoxTag, BoxedOperator};
pub use class::{ClassLayout, ClassOperator, MemberBinding};
pub use collection::CollectionOperator;
pub use enums::EnumOperator;
pub use multi_array::MultiArrayOperator;
pub use nullable::NullableOperator;
pub use registry::OperatorRegistry;
pub use scalar::ScalarOperator;
pub use signal::BuildCell;
pub use sorted_map::SortedMapOperator;
pub use tuple::TupleOperator;

use crate::config::SerializerConfig;
use crate::container::Container;
use crate::error::{Error, Result};
use crate::pool::{ReadPool, WritePool};
use crate::types::{NamedType, TypeRef};
use crate::value::Value;
use std::fmt;
use std::sync::Arc;

/// Encoder/decoder for one declared type.
pub trait Operator: Send + Sync + fmt::Debug {
    /// Declared type this operator handles.
    fn raw(&self) -> &TypeRef;

    /// Resolve child operators. Idempotent; called once by the registry.
    fn build(&self, registry: &OperatorRegistry) -> Result<()>;

    /// Child operators, waiting for the build to finish if necessary.
    fn follows(&self) -> Result<&[Arc<dyn Operator>]>;

    fn write(&self, ctx: &mut WriteContext<'_>, value: &Value) -> Result<()>;

    fn read(&self, ctx: &mut ReadContext<'_>) -> Result<Value>;

    /// Downcast hook used for polymorphic delegation.
    fn as_class(&self) -> Option<&ClassOperator> {
        None
    }
}

/// Children cell shared by most composite operators.
pub(crate) type Follows = BuildCell<Vec<Arc<dyn Operator>>>;

/// Build a [`Follows`] cell from the child types, unless already built.
pub(crate) fn build_follows(
    cell: &Follows,
    registry: &OperatorRegistry,
    children: &[&TypeRef],
) -> Result<()> {
    if cell.is_complete() {
        return Ok(());
    }
    let outcome = children
        .iter()
        .map(|ty| registry.get_operator(ty))
        .collect::<Result<Vec<_>>>();
    cell.publish(outcome)
}

/// Write a null flag; returns `true` when the value was null.
pub(crate) fn write_null_flag(container: &mut Container, value: &Value) -> bool {
    let is_null = value.is_null();
    container.write_flag(is_null);
    is_null
}

/// Reject counts a well-formed encoder could not have produced.
pub(crate) fn check_count(count: usize, config: &SerializerConfig) -> Result<()> {
    if count > config.max_elements {
        return Err(Error::Malformed(format!(
            "element count {} exceeds limit {}",
            count, config.max_elements
        )));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Call contexts
// ---------------------------------------------------------------------------

/// State of one encode call: container, write pool, registry, limits.
pub struct WriteContext<'a> {
    pub(crate) container: Container,
    pub(crate) pool: WritePool,
    pub(crate) registry: &'a OperatorRegistry,
    pub(crate) config: &'a SerializerConfig,
    depth: usize,
}

impl<'a> WriteContext<'a> {
    pub(crate) fn new(
        registry: &'a OperatorRegistry,
        config: &'a SerializerConfig,
        use_reference_pool: bool,
    ) -> Self {
        Self {
            container: Container::new(),
            pool: WritePool::new(use_reference_pool, config.detect_cycles),
            registry,
            config,
            depth: 0,
        }
    }

    /// Write a child value one level deeper.
    pub(crate) fn write_child(&mut self, op: &dyn Operator, value: &Value) -> Result<()> {
        self.depth += 1;
        if self.depth > self.config.max_depth {
            self.depth -= 1;
            return Err(Error::DepthLimitExceeded(self.config.max_depth));
        }
        let result = op.write(self, value);
        self.depth -= 1;
        result
    }

    pub(crate) fn into_container(self) -> Container {
        self.container
    }
}

/// State of one decode call: container, read pool, registry, limits.
pub struct ReadContext<'a> {
    pub(crate) container: Container,
    pub(crate) pool: ReadPool,
    pub(crate) registry: &'a OperatorRegistry,
    pub(crate) config: &'a SerializerConfig,
    depth: usize,
}

impl<'a> ReadContext<'a> {
    pub(crate) fn new(
        container: Container,
        registry: &'a OperatorRegistry,
        config: &'a SerializerConfig,
        use_reference_pool: bool,
    ) -> Self {
        Self {
            container,
            pool: ReadPool::new(use_reference_pool),
            registry,
            config,
            depth: 0,
        }
    }

    /// Read a child value one level deeper.
    pub(crate) fn read_child(&mut self, op: &dyn Operator) -> Result<Value> {
        self.depth += 1;
        if self.depth > self.config.max_depth {
            self.depth -= 1;
            return Err(Error::DepthLimitExceeded(self.config.max_depth));
        }
        let result = op.read(self);
        self.depth -= 1;
        result
    }

    /// Read an embedded type name (raw, never pooled).
    pub(crate) fn read_type_name(&mut self) -> Result<String> {
        self.container.read_str(self.config.max_elements)
    }

    /// Read an embedded type name and resolve it through the member source.
    ///
    /// Fails with `UnresolvedType` when the name is unknown or names the
    /// other kind of type (an enum where a class was written, or back).
    pub(crate) fn read_named_type(&mut self, want_class: bool) -> Result<NamedType> {
        let name = self.read_type_name()?;
        match self.registry.source().resolve(&name) {
            Some(NamedType::Class(c)) if want_class => Ok(NamedType::Class(c)),
            Some(NamedType::Enum(e)) if !want_class => Ok(NamedType::Enum(e)),
            _ => Err(Error::UnresolvedType(name)),
        }
    }

    pub(crate) fn container(&self) -> &Container {
        &self.container
    }
}
