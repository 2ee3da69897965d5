// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! `get_bytes` / `get_item` entry points.
//!
//! Each call owns a fresh container and a fresh pool; nothing is shared
//! between calls except the immutable, cached operators.

use crate::config::SerializerConfig;
use crate::container::Container;
use crate::error::{Error, Result};
use crate::operator::{OperatorRegistry, ReadContext, WriteContext};
use crate::typed::Serializable;
use crate::types::{MemberSource, TypeRef};
use crate::value::Value;
use std::sync::{Arc, OnceLock};

static GLOBAL_SERIALIZER: OnceLock<Serializer> = OnceLock::new();

/// Encoder/decoder bound to one operator registry and one set of limits.
#[derive(Debug, Clone)]
pub struct Serializer {
    registry: Arc<OperatorRegistry>,
    config: SerializerConfig,
}

impl Default for Serializer {
    fn default() -> Self {
        Self::new(OperatorRegistry::global())
    }
}

impl Serializer {
    /// Serializer over `registry`, with limits from the environment.
    pub fn new(registry: Arc<OperatorRegistry>) -> Self {
        Self {
            registry,
            config: SerializerConfig::default(),
        }
    }

    /// Serializer with a private registry resolving through `source`.
    pub fn with_source(source: Arc<dyn MemberSource>) -> Self {
        Self::new(Arc::new(OperatorRegistry::new(source)))
    }

    /// Process-wide serializer bound to the global catalog.
    pub fn global() -> &'static Serializer {
        GLOBAL_SERIALIZER.get_or_init(Serializer::default)
    }

    /// Replace the limits.
    pub fn with_config(mut self, config: SerializerConfig) -> Self {
        self.config = config;
        self
    }

    pub fn config(&self) -> &SerializerConfig {
        &self.config
    }

    pub fn registry(&self) -> &Arc<OperatorRegistry> {
        &self.registry
    }

    /// Encode `value` as an instance of `ty`.
    ///
    /// With `use_reference_pool`, shared references are written once and
    /// cycles are preserved. Without it, shared references are duplicated and
    /// a cyclic graph fails with [`Error::CycleWithoutReferencePool`].
    pub fn get_bytes(&self, ty: &TypeRef, value: &Value, use_reference_pool: bool) -> Result<Vec<u8>> {
        let op = self.registry.get_operator(ty)?;
        let mut ctx = WriteContext::new(&self.registry, &self.config, use_reference_pool);
        ctx.write_child(op.as_ref(), value)?;
        ctx.into_container().export()
    }

    /// Decode bytes produced by [`get_bytes`](Self::get_bytes) with the same
    /// `ty` and `use_reference_pool`.
    pub fn get_item(&self, ty: &TypeRef, bytes: &[u8], use_reference_pool: bool) -> Result<Value> {
        let op = self.registry.get_operator(ty)?;
        let container = Container::import(bytes)?;
        let mut ctx = ReadContext::new(container, &self.registry, &self.config, use_reference_pool);
        let value = ctx.read_child(op.as_ref())?;
        if !ctx.container().is_exhausted() {
            return Err(Error::Malformed("trailing data after root value".into()));
        }
        Ok(value)
    }

    /// Encode a typed value.
    pub fn serialize<T: Serializable>(&self, value: &T, use_reference_pool: bool) -> Result<Vec<u8>> {
        self.get_bytes(&T::type_ref(), &value.to_value()?, use_reference_pool)
    }

    /// Decode a typed value.
    pub fn deserialize<T: Serializable>(&self, bytes: &[u8], use_reference_pool: bool) -> Result<T> {
        T::from_value(self.get_item(&T::type_ref(), bytes, use_reference_pool)?)
    }
}

/// [`Serializer::get_bytes`] on the global serializer.
pub fn get_bytes(ty: &TypeRef, value: &Value, use_reference_pool: bool) -> Result<Vec<u8>> {
    Serializer::global().get_bytes(ty, value, use_reference_pool)
}

/// [`Serializer::get_item`] on the global serializer.
pub fn get_item(ty: &TypeRef, bytes: &[u8], use_reference_pool: bool) -> Result<Value> {
    Serializer::global().get_item(ty, bytes, use_reference_pool)
}
