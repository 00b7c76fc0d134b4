//! Error types.
//!
//! - [`ConfigError`]: an [`IdGeneratorConfig`](crate::config::IdGeneratorConfig)
//!   failed validation. The generator is never constructed in that case.
//! - [`GenerateError`]: a single [`IdGenerator::next_id`](crate::IdGenerator::next_id)
//!   call could not produce an ID.
//!
//! The caches have no error type: every cache operation is total.

use thiserror::Error;

/// Rejected generator configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// A bit width lies outside `[1, 60]`.
    #[error("{field} must be within [1, 60] bits, got {bits}")]
    BitWidthOutOfRange {
        /// Name of the offending option.
        field: &'static str,
        /// The configured width.
        bits: u32,
    },

    /// `part1_bits + part2_bits + sequence_bits` lies outside `[3, 62]`.
    #[error("identity and sequence bits must total within [3, 62], got {total}")]
    TotalBitsOutOfRange {
        /// Sum of the three configured widths.
        total: u32,
    },

    /// An identity value does not fit its configured width.
    #[error("{field} must be at most {max}, got {value}")]
    IdentityOutOfRange {
        /// Name of the offending option.
        field: &'static str,
        /// The configured value.
        value: u64,
        /// Largest value representable in the configured width.
        max: u64,
    },

    /// The epoch is negative or later than the current time.
    #[error("epoch {epoch_millis}ms must be within [0, {now_millis}]")]
    EpochOutOfRange {
        /// The configured epoch.
        epoch_millis: i64,
        /// Clock reading at construction time.
        now_millis: i64,
    },
}

/// Failure of a single ID generation call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum GenerateError {
    /// The clock reads earlier than the last generated ID's timestamp.
    ///
    /// Only this call fails; later calls succeed once the clock catches up.
    #[error("clock moved backwards: last id at {last_millis}ms, clock reads {now_millis}ms")]
    ClockMovedBackwards {
        /// Timestamp of the most recent ID.
        last_millis: i64,
        /// Clock reading that was rejected.
        now_millis: i64,
    },

    /// The timestamp field can no longer represent the current time.
    ///
    /// Permanent: every later call on the same generator fails the same way.
    #[error("id space exhausted: last representable time {end_of_life_millis}ms, clock reads {now_millis}ms")]
    Exhausted {
        /// Last millisecond the configuration can encode.
        end_of_life_millis: i64,
        /// Clock reading that overflowed.
        now_millis: i64,
    },
}
