// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Serializer limits.
//!
//! # Environment Variables
//!
//! - `GRAPHBIN_MAX_DEPTH`: maximum codec nesting depth (default: 256)
//! - `GRAPHBIN_MAX_ELEMENTS`: maximum decoded element count / byte-run length
//!   (default: 16777216)
//! - `GRAPHBIN_DETECT_CYCLES`: refuse cyclic graphs when the reference pool
//!   is disabled (default: true)

/// Default maximum nesting depth.
///
/// Decoding recurses once per level, so this must fit the 2 MiB stack of a
/// spawned thread in an unoptimized build.
pub const DEFAULT_MAX_DEPTH: usize = 256;

/// Default maximum element count of any single decoded array, collection or run.
pub const DEFAULT_MAX_ELEMENTS: usize = 16 * 1024 * 1024;

/// Limits applied to one `get_bytes` / `get_item` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SerializerConfig {
    /// Nesting depth beyond which encode/decode fails.
    pub max_depth: usize,

    /// Largest count or byte-run length accepted while decoding.
    pub max_elements: usize,

    /// With the reference pool disabled, fail on cycles instead of recursing.
    pub detect_cycles: bool,
}

impl Default for SerializerConfig {
    fn default() -> Self {
        Self {
            max_depth: std::env::var("GRAPHBIN_MAX_DEPTH")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(DEFAULT_MAX_DEPTH),
            max_elements: std::env::var("GRAPHBIN_MAX_ELEMENTS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(DEFAULT_MAX_ELEMENTS),
            detect_cycles: std::env::var("GRAPHBIN_DETECT_CYCLES")
                .ok()
                .and_then(|s| parse_bool(&s))
                .unwrap_or(true),
        }
    }
}

impl SerializerConfig {
    /// Built-in defaults, ignoring the environment.
    pub fn builtin() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
            max_elements: DEFAULT_MAX_ELEMENTS,
            detect_cycles: true,
        }
    }

    /// Set the maximum nesting depth.
    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth;
        self
    }

    /// Set the maximum decoded element count.
    pub fn with_max_elements(mut self, elements: usize) -> Self {
        self.max_elements = elements;
        self
    }

    /// Enable or disable cycle detection for pool-less encoding.
    pub fn with_cycle_detection(mut self, enabled: bool) -> Self {
        self.detect_cycles = enabled;
        self
    }
}

fn parse_bool(s: &str) -> Option<bool> {
    match s.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builders_override() {
        let config = SerializerConfig::builtin()
            .with_max_depth(8)
            .with_max_elements(100)
            .with_cycle_detection(false);
        assert_eq!(config.max_depth, 8);
        assert_eq!(config.max_elements, 100);
        assert!(!config.detect_cycles);
    }

    #[test]
    fn test_parse_bool() {
        assert_eq!(parse_bool("TRUE"), Some(true));
        assert_eq!(parse_bool(" off "), Some(false));
        assert_eq!(parse_bool("maybe"), None);
    }
}
