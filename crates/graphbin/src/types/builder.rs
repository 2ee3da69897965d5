// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Fluent builders for class and enum registration.

use crate::types::{PrimitiveKind, TypeRef};
use std::sync::Arc;

/// Builder for a class or interface.
///
/// ```
/// use graphbin::{ClassBuilder, PrimitiveKind, TypeCatalog, TypeRef};
///
/// let catalog = TypeCatalog::new();
/// catalog
///     .register_class(ClassBuilder::new("Zoo.Animal").member("Name", TypeRef::STRING))
///     .unwrap();
/// let dog = catalog
///     .register_class(
///         ClassBuilder::new("Zoo.Dog")
///             .extends("Zoo.Animal")
///             .member("Breed", TypeRef::STRING)
///             .member("Age", PrimitiveKind::I32.into()),
///     )
///     .unwrap();
/// let names: Vec<&str> = dog.members().iter().map(|m| m.name()).collect();
/// assert_eq!(names, ["Age", "Breed", "Name"]);
/// ```
#[derive(Debug, Clone)]
pub struct ClassBuilder {
    pub(crate) name: Arc<str>,
    pub(crate) base: Option<Arc<str>>,
    pub(crate) interfaces: Vec<Arc<str>>,
    pub(crate) members: Vec<(Arc<str>, TypeRef)>,
    pub(crate) is_abstract: bool,
    pub(crate) is_interface: bool,
}

impl ClassBuilder {
    /// Start a concrete class.
    pub fn new(name: impl Into<Arc<str>>) -> Self {
        Self {
            name: name.into(),
            base: None,
            interfaces: Vec::new(),
            members: Vec::new(),
            is_abstract: false,
            is_interface: false,
        }
    }

    /// Start an interface. Interfaces carry no members and cannot be instantiated.
    pub fn interface(name: impl Into<Arc<str>>) -> Self {
        Self {
            is_abstract: true,
            is_interface: true,
            ..Self::new(name)
        }
    }

    /// Inherit members from a registered base class.
    pub fn extends(mut self, base: impl Into<Arc<str>>) -> Self {
        self.base = Some(base.into());
        self
    }

    /// Declare an implemented interface.
    pub fn implements(mut self, interface: impl Into<Arc<str>>) -> Self {
        self.interfaces.push(interface.into());
        self
    }

    /// Mark the class abstract.
    pub fn abstract_class(mut self) -> Self {
        self.is_abstract = true;
        self
    }

    /// Add a serializable member.
    pub fn member(mut self, name: impl Into<Arc<str>>, ty: TypeRef) -> Self {
        self.members.push((name.into(), ty));
        self
    }
}

/// Builder for an enum with an integral underlying type.
#[derive(Debug, Clone)]
pub struct EnumBuilder {
    pub(crate) name: Arc<str>,
    pub(crate) underlying: PrimitiveKind,
    pub(crate) variants: Vec<(Arc<str>, i64)>,
    next_value: i64,
}

impl EnumBuilder {
    /// Create a new enum builder (underlying `I32`).
    pub fn new(name: impl Into<Arc<str>>) -> Self {
        Self {
            name: name.into(),
            underlying: PrimitiveKind::I32,
            variants: Vec::new(),
            next_value: 0,
        }
    }

    /// Set the underlying integral kind.
    pub fn underlying(mut self, kind: PrimitiveKind) -> Self {
        self.underlying = kind;
        self
    }

    /// Add variant with auto-incremented value.
    pub fn variant(mut self, name: impl Into<Arc<str>>) -> Self {
        let value = self.next_value;
        self.variants.push((name.into(), value));
        self.next_value = value.wrapping_add(1);
        self
    }

    /// Add variant with explicit value.
    pub fn variant_value(mut self, name: impl Into<Arc<str>>, value: i64) -> Self {
        self.variants.push((name.into(), value));
        self.next_value = value.wrapping_add(1);
        self
    }
}
