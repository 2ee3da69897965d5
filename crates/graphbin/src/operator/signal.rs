// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Single-assignment build cell with a blocking completion signal.
//!
//! A codec is registered before its children are resolved. Anyone reaching it
//! in the meantime (another thread, or a write/read racing the build) waits
//! here until the builder publishes the result.
//!
//! # Architecture
//! - `OnceLock` holds the published result (lock-free once set)
//! - `Mutex<()>` + `Condvar` for waiters that arrive before publication

use crate::error::{Error, Result};
use parking_lot::{Condvar, Mutex};
use std::sync::OnceLock;

/// Write-once slot for a codec's built children.
#[derive(Debug)]
pub struct BuildCell<T> {
    value: OnceLock<std::result::Result<T, String>>,
    gate: Mutex<()>,
    ready: Condvar,
}

impl<T> Default for BuildCell<T> {
    fn default() -> Self {
        Self {
            value: OnceLock::new(),
            gate: Mutex::new(()),
            ready: Condvar::new(),
        }
    }
}

impl<T> BuildCell<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_complete(&self) -> bool {
        self.value.get().is_some()
    }

    /// Publish the build outcome and wake every waiter.
    ///
    /// Only the first call has an effect.
    pub fn complete(&self, outcome: std::result::Result<T, String>) {
        let _guard = self.gate.lock();
        let _ = self.value.set(outcome);
        self.ready.notify_all();
    }

    /// Publish a build result, handing its error (if any) back to the builder.
    pub fn publish(&self, outcome: Result<T>) -> Result<()> {
        match outcome {
            Ok(value) => {
                self.complete(Ok(value));
                Ok(())
            }
            Err(err) => {
                self.complete(Err(err.to_string()));
                Err(err)
            }
        }
    }

    /// Block until the cell is complete, then borrow the built value.
    ///
    /// `type_name` labels the error when the build failed.
    pub fn wait(&self, type_name: &dyn std::fmt::Display) -> Result<&T> {
        // Fast-path: already published, no lock.
        let outcome = match self.value.get() {
            Some(outcome) => outcome,
            None => {
                let mut guard = self.gate.lock();
                loop {
                    if let Some(outcome) = self.value.get() {
                        break outcome;
                    }
                    self.ready.wait(&mut guard);
                }
            }
        };
        outcome.as_ref().map_err(|reason| Error::BuildFailed {
            type_name: type_name.to_string(),
            reason: reason.clone(),
        })
    }
}
