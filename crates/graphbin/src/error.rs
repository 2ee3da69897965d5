// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Error types for encoding, decoding and type registration.

use thiserror::Error;

/// Container segment names, used to locate truncation errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment {
    /// Bit-packed yes/no decisions.
    Flags,
    /// Fixed-width payloads.
    Items,
    /// Variable-length byte runs.
    Arrays,
    /// Export framing header.
    Header,
}

impl std::fmt::Display for Segment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Segment::Flags => "flags",
            Segment::Items => "items",
            Segment::Arrays => "arrays",
            Segment::Header => "header",
        };
        f.write_str(name)
    }
}

/// Errors returned by `get_bytes` / `get_item` and the type catalog.
#[derive(Debug, Error)]
pub enum Error {
    // ========================================================================
    // Data Errors
    // ========================================================================
    /// Value does not match the codec's declared type. Codecs never coerce.
    #[error("type mismatch: expected {expected}, found {found}")]
    TypeMismatch { expected: String, found: String },
    /// Value is structurally invalid for its slot (e.g. null sorted-map key).
    #[error("invalid value: {0}")]
    InvalidValue(String),
    /// Encoding a cyclic graph with the reference pool disabled.
    #[error("cycle through object of class {0} while reference pool is disabled")]
    CycleWithoutReferencePool(String),
    /// Nesting deeper than the configured limit.
    #[error("nesting depth limit of {0} exceeded")]
    DepthLimitExceeded(usize),

    // ========================================================================
    // Buffer Errors
    // ========================================================================
    /// A read ran past the end of a segment.
    #[error("truncated {segment} segment: need {need} bytes at offset {offset}")]
    Truncated {
        segment: Segment,
        offset: usize,
        need: usize,
    },
    /// Framing, counts or tags that cannot have been produced by the encoder.
    #[error("malformed buffer: {0}")]
    Malformed(String),
    /// String payload is not valid UTF-8.
    #[error("invalid UTF-8 in string payload")]
    InvalidUtf8(#[from] std::str::Utf8Error),

    // ========================================================================
    // Type Errors
    // ========================================================================
    /// An embedded type name did not resolve during polymorphic/boxed decode.
    #[error("unresolved type name: {0}")]
    UnresolvedType(String),
    /// A codec was requested for a class or enum the catalog does not know.
    #[error("unknown type: {0}")]
    UnknownType(String),
    /// A class or enum was registered twice.
    #[error("type already registered: {0}")]
    DuplicateType(String),
    /// A class declares (or inherits) the same member name twice.
    #[error("duplicate member {member} on {type_name}")]
    DuplicateMember { type_name: String, member: String },
    /// Abstract classes and interfaces have no instances.
    #[error("type cannot be instantiated: {0}")]
    NotInstantiable(String),
    /// Codec construction failed; latched for every waiter on that codec.
    #[error("failed to build codec for {type_name}: {reason}")]
    BuildFailed { type_name: String, reason: String },
}

impl Error {
    pub(crate) fn mismatch(expected: impl std::fmt::Display, found: &crate::Value) -> Self {
        Error::TypeMismatch {
            expected: expected.to_string(),
            found: found.kind_name().to_string(),
        }
    }
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;
