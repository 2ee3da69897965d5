// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! # graphbin - Binary object-graph serializer
//!
//! Encodes an arbitrary, possibly cyclic, possibly polymorphic value graph
//! into a compact byte buffer that decodes back to an equivalent graph with
//! object identity and exact runtime types preserved.
//!
//! ## Quick Start
//!
//! ```rust
//! use graphbin::{ClassBuilder, Serializer, TypeCatalog, TypeRef, Value};
//! use std::sync::Arc;
//!
//! let catalog = Arc::new(TypeCatalog::new());
//! catalog
//!     .register_class(
//!         ClassBuilder::new("Demo.Node")
//!             .member("Label", TypeRef::STRING)
//!             .member("Next", TypeRef::class("Demo.Node")),
//!     )
//!     .unwrap();
//!
//! let node = catalog.instantiate("Demo.Node").unwrap();
//! node.set("Label", "loop").unwrap();
//! node.set("Next", node.clone()).unwrap();
//!
//! let serializer = Serializer::with_source(catalog);
//! let ty = TypeRef::class("Demo.Node");
//! let bytes = serializer.get_bytes(&ty, &Value::Object(node), true).unwrap();
//! let back = serializer.get_item(&ty, &bytes, true).unwrap();
//!
//! let back_node = back.as_object().unwrap();
//! assert_eq!(back_node.get("Next"), Some(back.clone()));
//! ```
//!
//! ## Architecture
//!
//! ```text
//! +---------------------------------------------------------------+
//! |  Serializer::get_bytes / get_item     (typed: serialize<T>)   |
//! +---------------------------------------------------------------+
//! |  OperatorRegistry: TypeRef -> Arc<dyn Operator>               |
//! |    scalar | enum | nullable | array | multi-array | collection|
//! |    sorted map | tuple | class (polymorphic) | boxed object    |
//! +---------------------------------------------------------------+
//! |  WritePool / ReadPool: identity, sharing and cycles           |
//! +---------------------------------------------------------------+
//! |  Container: flags (bits) | items (fixed) | arrays (runs)      |
//! +---------------------------------------------------------------+
//! ```
//!
//! ## Key Types
//!
//! | Type | Description |
//! |------|-------------|
//! | [`Serializer`] | Entry points, bound to a registry and limits |
//! | [`TypeRef`] | Declared type of a slot; the codec key |
//! | [`Value`] | Dynamic graph node |
//! | [`TypeCatalog`] | Class/enum registry consumed by the codecs |
//! | [`Operator`] | Per-type codec |
//!
//! ## Environment
//!
//! See [`SerializerConfig`] for `GRAPHBIN_MAX_DEPTH`,
//! `GRAPHBIN_MAX_ELEMENTS` and `GRAPHBIN_DETECT_CYCLES`.

/// Serializer limits (depth, element counts, cycle detection).
pub mod config;
/// Three-segment byte container and its export framing.
pub mod container;
/// Error types.
pub mod error;
/// Per-type codecs and the registry caching them.
pub mod operator;
/// Reference pools for identity tracking.
pub mod pool;
mod serializer;
mod typed;
/// Declared types and the class/enum catalog.
pub mod types;
/// Dynamic values.
pub mod value;

#[cfg(test)]
mod tests;

pub use config::SerializerConfig;
pub use container::Container;
pub use error::{Error, Result, Segment};
pub use operator::{Operator, OperatorRegistry};
pub use serializer::{get_bytes, get_item, Serializer};
pub use typed::Serializable;
pub use types::{
    ClassBuilder, ClassDescriptor, CollectionKind, EnumBuilder, EnumDescriptor, MemberSource,
    PrimitiveKind, TypeCatalog, TypeRef,
};
pub use value::{
    graph_eq, ArrayRef, DateTime, DateTimeKind, DateTimeOffset, EnumValue, MultiArray, ObjectRef,
    SortedMap, TimeSpan, Value,
};
