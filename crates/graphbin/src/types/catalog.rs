// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Class/enum descriptors and the catalog that resolves them.
//!
//! The codec layer never reflects over values. It asks a [`MemberSource`] for
//! the ordered member list of a class once, when the class codec is built,
//! and for name -> type resolution when decoding polymorphic values.

use crate::error::{Error, Result};
use crate::types::{ClassBuilder, EnumBuilder, PrimitiveKind, TypeRef};
use crate::value::{ObjectRef, Value};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::sync::{Arc, OnceLock};

// ---------------------------------------------------------------------------
// Descriptors
// ---------------------------------------------------------------------------

/// One serializable member of a class.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberDescriptor {
    name: Arc<str>,
    ty: TypeRef,
    declared_by: Arc<str>,
}

impl MemberDescriptor {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn ty(&self) -> &TypeRef {
        &self.ty
    }

    /// Class that declared the member (a base class for inherited members).
    pub fn declared_by(&self) -> &str {
        &self.declared_by
    }
}

/// Resolved class: inherited and own members, ordered by name.
#[derive(Debug, PartialEq, Eq)]
pub struct ClassDescriptor {
    name: Arc<str>,
    base: Option<Arc<str>>,
    interfaces: Vec<Arc<str>>,
    members: Vec<MemberDescriptor>,
    is_abstract: bool,
    is_interface: bool,
}

impl ClassDescriptor {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn name_arc(&self) -> &Arc<str> {
        &self.name
    }

    pub fn base(&self) -> Option<&str> {
        self.base.as_deref()
    }

    pub fn interfaces(&self) -> &[Arc<str>] {
        &self.interfaces
    }

    pub fn members(&self) -> &[MemberDescriptor] {
        &self.members
    }

    pub fn member_index(&self, name: &str) -> Option<usize> {
        self.members.iter().position(|m| &*m.name == name)
    }

    pub fn is_abstract(&self) -> bool {
        self.is_abstract
    }

    pub fn is_interface(&self) -> bool {
        self.is_interface
    }
}

/// Enum variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumVariant {
    pub name: Arc<str>,
    pub value: i64,
}

/// Registered enum.
#[derive(Debug, PartialEq, Eq)]
pub struct EnumDescriptor {
    name: Arc<str>,
    underlying: PrimitiveKind,
    variants: Vec<EnumVariant>,
}

impl EnumDescriptor {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn name_arc(&self) -> &Arc<str> {
        &self.name
    }

    pub fn underlying(&self) -> PrimitiveKind {
        self.underlying
    }

    pub fn variants(&self) -> &[EnumVariant] {
        &self.variants
    }

    /// Get variant by name.
    pub fn variant(&self, name: &str) -> Option<&EnumVariant> {
        self.variants.iter().find(|v| &*v.name == name)
    }
}

/// A resolved fully-qualified type name.
#[derive(Debug, Clone)]
pub enum NamedType {
    Class(Arc<ClassDescriptor>),
    Enum(Arc<EnumDescriptor>),
}

impl NamedType {
    pub fn type_ref(&self) -> TypeRef {
        match self {
            NamedType::Class(c) => TypeRef::Class(c.name.clone()),
            NamedType::Enum(e) => TypeRef::Enum(e.name.clone()),
        }
    }
}

// ---------------------------------------------------------------------------
// MemberSource trait
// ---------------------------------------------------------------------------

/// Member enumerator and type-name resolver consumed by the codec layer.
pub trait MemberSource: Send + Sync {
    /// Look up a class or interface by fully-qualified name.
    fn class(&self, name: &str) -> Option<Arc<ClassDescriptor>>;

    /// Look up an enum by fully-qualified name.
    fn enumeration(&self, name: &str) -> Option<Arc<EnumDescriptor>>;

    /// Resolve an embedded type name.
    fn resolve(&self, name: &str) -> Option<NamedType> {
        self.class(name)
            .map(NamedType::Class)
            .or_else(|| self.enumeration(name).map(NamedType::Enum))
    }

    /// Whether an instance of `actual` may be stored in a `declared` slot.
    fn is_assignable(&self, declared: &str, actual: &str) -> bool {
        let mut pending = vec![Arc::<str>::from(actual)];
        while let Some(current) = pending.pop() {
            if &*current == declared {
                return true;
            }
            if let Some(class) = self.class(&current) {
                pending.extend(class.base.iter().cloned());
                pending.extend(class.interfaces.iter().cloned());
            }
        }
        false
    }
}

// ---------------------------------------------------------------------------
// TypeCatalog
// ---------------------------------------------------------------------------

static GLOBAL_CATALOG: OnceLock<Arc<TypeCatalog>> = OnceLock::new();

/// Concurrent [`MemberSource`] populated through the builders.
///
/// Types are immutable once registered: codecs built from them are cached
/// forever, so re-registration is rejected.
#[derive(Debug, Default)]
pub struct TypeCatalog {
    types: DashMap<Arc<str>, NamedType>,
}

impl TypeCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Process-wide catalog used by the free `get_bytes`/`get_item` functions.
    pub fn global() -> Arc<TypeCatalog> {
        GLOBAL_CATALOG
            .get_or_init(|| Arc::new(TypeCatalog::new()))
            .clone()
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Register a class. The base class and interfaces must already be registered.
    pub fn register_class(&self, builder: ClassBuilder) -> Result<Arc<ClassDescriptor>> {
        let mut members: Vec<MemberDescriptor> = Vec::new();
        if let Some(base_name) = &builder.base {
            let base = self
                .class(base_name)
                .filter(|b| !b.is_interface)
                .ok_or_else(|| Error::UnknownType(base_name.to_string()))?;
            members.extend(base.members.iter().cloned());
        }
        for iface in &builder.interfaces {
            if !self.class(iface).is_some_and(|c| c.is_interface) {
                return Err(Error::UnknownType(iface.to_string()));
            }
        }
        for (name, ty) in &builder.members {
            if members.iter().any(|m| m.name == *name) {
                return Err(Error::DuplicateMember {
                    type_name: builder.name.to_string(),
                    member: name.to_string(),
                });
            }
            members.push(MemberDescriptor {
                name: name.clone(),
                ty: ty.clone(),
                declared_by: builder.name.clone(),
            });
        }
        members.sort_by(|a, b| a.name.cmp(&b.name));

        let descriptor = Arc::new(ClassDescriptor {
            name: builder.name.clone(),
            base: builder.base,
            interfaces: builder.interfaces,
            members,
            is_abstract: builder.is_abstract,
            is_interface: builder.is_interface,
        });
        self.insert(builder.name, NamedType::Class(descriptor.clone()))?;
        log::debug!(
            "[catalog] registered class {} ({} members)",
            descriptor.name,
            descriptor.members.len()
        );
        Ok(descriptor)
    }

    /// Register an enum.
    pub fn register_enum(&self, builder: EnumBuilder) -> Result<Arc<EnumDescriptor>> {
        if !builder.underlying.is_integral() {
            return Err(Error::InvalidValue(format!(
                "enum {} underlying type {} is not integral",
                builder.name,
                builder.underlying.name()
            )));
        }
        let descriptor = Arc::new(EnumDescriptor {
            name: builder.name.clone(),
            underlying: builder.underlying,
            variants: builder
                .variants
                .into_iter()
                .map(|(name, value)| EnumVariant { name, value })
                .collect(),
        });
        self.insert(builder.name, NamedType::Enum(descriptor.clone()))?;
        log::debug!("[catalog] registered enum {}", descriptor.name);
        Ok(descriptor)
    }

    fn insert(&self, name: Arc<str>, ty: NamedType) -> Result<()> {
        match self.types.entry(name) {
            Entry::Occupied(e) => Err(Error::DuplicateType(e.key().to_string())),
            Entry::Vacant(e) => {
                e.insert(ty);
                Ok(())
            }
        }
    }

    /// Allocate an instance with every member at its declared default.
    pub fn instantiate(&self, class: &str) -> Result<ObjectRef> {
        let descriptor = self
            .class(class)
            .ok_or_else(|| Error::UnknownType(class.to_string()))?;
        ObjectRef::new(descriptor)
    }

    /// Create an enum value by variant name.
    pub fn enum_value(&self, enum_name: &str, variant: &str) -> Result<Value> {
        let descriptor = self
            .enumeration(enum_name)
            .ok_or_else(|| Error::UnknownType(enum_name.to_string()))?;
        let v = descriptor.variant(variant).ok_or_else(|| {
            Error::InvalidValue(format!("{} has no variant {}", enum_name, variant))
        })?;
        Ok(Value::enumeration(descriptor.name.clone(), v.value))
    }
}

impl MemberSource for TypeCatalog {
    fn class(&self, name: &str) -> Option<Arc<ClassDescriptor>> {
        match self.types.get(name)?.value() {
            NamedType::Class(c) => Some(c.clone()),
            NamedType::Enum(_) => None,
        }
    }

    fn enumeration(&self, name: &str) -> Option<Arc<EnumDescriptor>> {
        match self.types.get(name)?.value() {
            NamedType::Enum(e) => Some(e.clone()),
            NamedType::Class(_) => None,
        }
    }

    fn resolve(&self, name: &str) -> Option<NamedType> {
        self.types.get(name).map(|t| t.value().clone())
    }
}
