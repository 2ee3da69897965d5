// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! # graphbin-history - History and undo/redo on top of graphbin
//!
//! Bounded stores that keep values as graphbin-encoded bytes, so stored
//! state never aliases live objects.
//!
//! | Type | Description |
//! |------|-------------|
//! | [`CircularIndex`] | Ring index arithmetic shared by both stores |
//! | [`HistoryStore`] | Last N snapshots of a [`Serializable`](graphbin::Serializable) value |
//! | [`PropertyJournal`] | Undo/redo of member assignments on objects |
//!
//! ```rust
//! use graphbin_history::HistoryStore;
//!
//! let mut history = HistoryStore::<Vec<i32>>::new(2).unwrap();
//! history.record(&vec![1]).unwrap();
//! history.record(&vec![1, 2]).unwrap();
//! history.record(&vec![1, 2, 3]).unwrap();
//! assert_eq!(history.len(), 2);
//! assert_eq!(history.get(0).unwrap(), Some(vec![1, 2]));
//! ```

mod circular;
mod error;
mod history;
mod journal;

pub use circular::CircularIndex;
pub use error::{HistoryError, Result};
pub use history::HistoryStore;
pub use journal::PropertyJournal;
