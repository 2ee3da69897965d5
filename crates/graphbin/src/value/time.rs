// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Tick-based time values.
//!
//! One tick is 100 ns. `DateTime` ticks count from 0001-01-01T00:00:00.

/// Ticks per second (100 ns resolution).
pub const TICKS_PER_SECOND: i64 = 10_000_000;

/// Ticks between 0001-01-01 and the Unix epoch.
pub const UNIX_EPOCH_TICKS: i64 = 621_355_968_000_000_000;

/// How a `DateTime` should be interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
#[repr(u8)]
pub enum DateTimeKind {
    #[default]
    Unspecified = 0,
    Utc = 1,
    Local = 2,
}

impl DateTimeKind {
    pub fn from_u8(tag: u8) -> Option<Self> {
        match tag {
            0 => Some(Self::Unspecified),
            1 => Some(Self::Utc),
            2 => Some(Self::Local),
            _ => None,
        }
    }
}

/// Calendar instant as ticks plus a kind tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct DateTime {
    pub ticks: i64,
    pub kind: DateTimeKind,
}

impl DateTime {
    pub const fn new(ticks: i64, kind: DateTimeKind) -> Self {
        Self { ticks, kind }
    }

    /// UTC instant from seconds since the Unix epoch.
    pub const fn from_unix_seconds(seconds: i64) -> Self {
        Self::new(UNIX_EPOCH_TICKS + seconds * TICKS_PER_SECOND, DateTimeKind::Utc)
    }

    pub fn is_default(&self) -> bool {
        self.ticks == 0 && self.kind == DateTimeKind::Unspecified
    }
}

/// Local instant plus its UTC offset, both in ticks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct DateTimeOffset {
    pub ticks: i64,
    pub offset_ticks: i64,
}

impl DateTimeOffset {
    pub const fn new(ticks: i64, offset_ticks: i64) -> Self {
        Self {
            ticks,
            offset_ticks,
        }
    }
}

/// Signed duration in ticks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct TimeSpan {
    pub ticks: i64,
}

impl TimeSpan {
    pub const ZERO: TimeSpan = TimeSpan { ticks: 0 };

    pub const fn from_ticks(ticks: i64) -> Self {
        Self { ticks }
    }

    pub const fn from_seconds(seconds: i64) -> Self {
        Self::from_ticks(seconds * TICKS_PER_SECOND)
    }
}

impl From<std::time::Duration> for TimeSpan {
    fn from(d: std::time::Duration) -> Self {
        let ticks = d.as_nanos() / 100;
        Self::from_ticks(i64::try_from(ticks).unwrap_or(i64::MAX))
    }
}

#[cfg(feature = "chrono")]
mod chrono_interop {
    use super::*;
    use chrono::{TimeZone, Utc};

    impl From<chrono::DateTime<Utc>> for DateTime {
        fn from(dt: chrono::DateTime<Utc>) -> Self {
            let ticks = dt
                .timestamp()
                .saturating_mul(TICKS_PER_SECOND)
                .saturating_add(UNIX_EPOCH_TICKS)
                .saturating_add(i64::from(dt.timestamp_subsec_nanos() / 100));
            DateTime::new(ticks, DateTimeKind::Utc)
        }
    }

    impl DateTime {
        /// Interpret the ticks as UTC, whatever the kind tag says.
        pub fn to_chrono_utc(&self) -> Option<chrono::DateTime<Utc>> {
            let since_epoch = self.ticks.checked_sub(UNIX_EPOCH_TICKS)?;
            let secs = since_epoch.div_euclid(TICKS_PER_SECOND);
            let nanos = since_epoch.rem_euclid(TICKS_PER_SECOND) * 100;
            Utc.timestamp_opt(secs, u32::try_from(nanos).ok()?).single()
        }
    }

    impl From<chrono::TimeDelta> for TimeSpan {
        fn from(d: chrono::TimeDelta) -> Self {
            let ticks = d
                .num_microseconds()
                .and_then(|us| us.checked_mul(10))
                .unwrap_or_else(|| d.num_milliseconds().saturating_mul(10_000));
            TimeSpan::from_ticks(ticks)
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn test_chrono_utc_roundtrip() {
            let now = Utc
                .with_ymd_and_hms(2024, 2, 29, 12, 30, 15)
                .single()
                .expect("valid date");
            let dt = DateTime::from(now);
            assert_eq!(dt.kind, DateTimeKind::Utc);
            assert_eq!(dt.to_chrono_utc(), Some(now));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unix_epoch_ticks() {
        let epoch = DateTime::from_unix_seconds(0);
        assert_eq!(epoch.ticks, UNIX_EPOCH_TICKS);
        assert!(!epoch.is_default());
        assert!(DateTime::default().is_default());
        assert!(!DateTime::new(0, DateTimeKind::Utc).is_default());
    }

    #[test]
    fn test_kind_tags() {
        assert_eq!(DateTimeKind::from_u8(1), Some(DateTimeKind::Utc));
        assert_eq!(DateTimeKind::from_u8(3), None);
    }

    #[test]
    fn test_timespan_from_duration() {
        let span = TimeSpan::from(std::time::Duration::from_millis(1500));
        assert_eq!(span.ticks, 15_000_000);
    }
}
