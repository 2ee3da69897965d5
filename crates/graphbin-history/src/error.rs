// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

use thiserror::Error;

/// Errors raised by the history stores.
#[derive(Debug, Error)]
pub enum HistoryError {
    #[error("capacity must be at least 1")]
    ZeroCapacity,

    #[error("class {class} has no member {member}")]
    UnknownMember { class: String, member: String },

    /// Encoding or decoding a stored value failed.
    #[error(transparent)]
    Codec(#[from] graphbin::Error),
}

pub type Result<T> = std::result::Result<T, HistoryError>;
