//! Configuration for the Snowflake-style [`IdGenerator`](crate::IdGenerator).
//!
//! An ID is a 63-bit value laid out from the most significant end:
//!
//! ```text
//! | sign (0) | part1 | part2 | sequence | elapsed ms since epoch |
//! ```
//!
//! The three leading widths are configured; the timestamp gets whatever is
//! left of the 63 bits. More identity or sequence bits mean a shorter
//! lifetime: with the defaults (2 + 5 + 12) the timestamp has 44 bits, about
//! 557 years from the epoch.

use crate::error::ConfigError;
use core::fmt;

/// Total payload bits in an ID; the sign bit is never used.
pub const ID_BITS: u32 = 63;

/// Inclusive bounds for each configured bit width.
pub const MIN_FIELD_BITS: u32 = 1;
/// See [`MIN_FIELD_BITS`].
pub const MAX_FIELD_BITS: u32 = 60;

/// 2020-01-01T00:00:00Z in milliseconds since the Unix epoch.
pub const DEFAULT_EPOCH_MILLIS: i64 = 1_577_836_800_000;

/// Configuration for an [`IdGenerator`](crate::IdGenerator).
///
/// Every field is required; [`Default`] supplies the stock layout
/// (`2/5/12` bits, identity `0/0`, epoch 2020-01-01 UTC).
///
/// Callers running several generators at once must hand each one a distinct
/// `(identity_part1, identity_part2)` pair.
///
/// # Examples
///
/// ```
/// use flakecache::config::IdGeneratorConfig;
///
/// let config = IdGeneratorConfig {
///     epoch_millis: 1_600_000_000_000,
///     part1_bits: 3,
///     part2_bits: 7,
///     sequence_bits: 10,
///     identity_part1: 5,
///     identity_part2: 100,
/// };
/// assert_eq!(config.timestamp_bits(), 43);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct IdGeneratorConfig {
    /// Zero point of the timestamp field, in Unix milliseconds.
    pub epoch_millis: i64,
    /// Width of the first identity field (e.g. datacenter).
    pub part1_bits: u32,
    /// Width of the second identity field (e.g. worker).
    pub part2_bits: u32,
    /// Width of the per-millisecond sequence counter.
    pub sequence_bits: u32,
    /// Value of the first identity field.
    pub identity_part1: u64,
    /// Value of the second identity field.
    pub identity_part2: u64,
}

impl IdGeneratorConfig {
    /// Sets the epoch.
    #[must_use]
    pub fn with_epoch_millis(mut self, epoch_millis: i64) -> Self {
        self.epoch_millis = epoch_millis;
        self
    }

    /// Sets the three configured bit widths.
    #[must_use]
    pub fn with_bits(mut self, part1_bits: u32, part2_bits: u32, sequence_bits: u32) -> Self {
        self.part1_bits = part1_bits;
        self.part2_bits = part2_bits;
        self.sequence_bits = sequence_bits;
        self
    }

    /// Sets the identity values.
    #[must_use]
    pub fn with_identity(mut self, identity_part1: u64, identity_part2: u64) -> Self {
        self.identity_part1 = identity_part1;
        self.identity_part2 = identity_part2;
        self
    }

    /// Width left over for the timestamp.
    ///
    /// Saturates at zero for configurations that [`validate`](Self::validate)
    /// would reject.
    #[inline]
    pub fn timestamp_bits(&self) -> u32 {
        ID_BITS.saturating_sub(self.reserved_bits())
    }

    fn reserved_bits(&self) -> u32 {
        self.part1_bits
            .saturating_add(self.part2_bits)
            .saturating_add(self.sequence_bits)
    }

    /// Checks bit widths and identity values.
    ///
    /// The epoch is checked against the clock when the generator is built.
    ///
    /// # Errors
    ///
    /// Returns the first violated bound, checked in field order.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, bits) in [
            ("part1_bits", self.part1_bits),
            ("part2_bits", self.part2_bits),
            ("sequence_bits", self.sequence_bits),
        ] {
            if !(MIN_FIELD_BITS..=MAX_FIELD_BITS).contains(&bits) {
                return Err(ConfigError::BitWidthOutOfRange { field, bits });
            }
        }

        let total = self.reserved_bits();
        if !(3..ID_BITS).contains(&total) {
            return Err(ConfigError::TotalBitsOutOfRange { total });
        }

        for (field, value, bits) in [
            ("identity_part1", self.identity_part1, self.part1_bits),
            ("identity_part2", self.identity_part2, self.part2_bits),
        ] {
            let max = max_value(bits);
            if value > max {
                return Err(ConfigError::IdentityOutOfRange { field, value, max });
            }
        }

        Ok(())
    }
}

/// Largest value representable in `bits` bits (`bits <= 63`).
#[inline]
pub(crate) fn max_value(bits: u32) -> u64 {
    (1u64 << bits) - 1
}

impl Default for IdGeneratorConfig {
    fn default() -> Self {
        Self {
            epoch_millis: DEFAULT_EPOCH_MILLIS,
            part1_bits: 2,
            part2_bits: 5,
            sequence_bits: 12,
            identity_part1: 0,
            identity_part2: 0,
        }
    }
}

impl fmt::Debug for IdGeneratorConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IdGeneratorConfig")
            .field("epoch_millis", &self.epoch_millis)
            .field("part1_bits", &self.part1_bits)
            .field("part2_bits", &self.part2_bits)
            .field("sequence_bits", &self.sequence_bits)
            .field("timestamp_bits", &self.timestamp_bits())
            .field("identity_part1", &self.identity_part1)
            .field("identity_part2", &self.identity_part2)
            .finish()
    }
}
