//! Snowflake-style Unique ID Generator
//!
//! Produces 63-bit integers that are unique per generator instance and trend
//! upward with wall-clock time. Each ID packs four fields:
//!
//! ```text
//!  63   62 ........................................................ 0
//! ┌───┬─────────┬─────────┬────────────┬──────────────────────────────┐
//! │ 0 │  part1  │  part2  │  sequence  │  milliseconds since epoch    │
//! └───┴─────────┴─────────┴────────────┴──────────────────────────────┘
//!       identity prefix     per-ms       timestamp_bits =
//!       (fixed per          counter      63 - part1 - part2 - sequence
//!        instance)
//! ```
//!
//! # Algorithm
//!
//! Every call runs under one mutex:
//!
//! 1. Read the clock. Past the last representable millisecond the generator
//!    is exhausted for good.
//! 2. A reading older than the previous ID's timestamp is a clock rollback and
//!    fails the call without touching state.
//! 3. Within the same millisecond the sequence counter advances; once it has
//!    handed out `2^sequence_bits` values the call spins until the clock ticks.
//! 4. A new millisecond resets the sequence to zero.
//!
//! Because the timestamp occupies the low bits, two IDs from the same
//! millisecond order by sequence, and IDs from different milliseconds with the
//! same sequence order by time. IDs are therefore unique but only roughly
//! time-sortable.
//!
//! # Thread Safety
//!
//! `IdGenerator` is `Send + Sync`; share one instance via `&'static` or `Arc`.
//! Independent instances share nothing and never contend.
//!
//! # Example
//!
//! ```
//! use flakecache::config::IdGeneratorConfig;
//! use flakecache::IdGenerator;
//!
//! let generator = IdGenerator::new(IdGeneratorConfig::default().with_identity(1, 2)).unwrap();
//! let id = generator.next_id().unwrap();
//! let parts = generator.decompose(id);
//! assert_eq!((parts.identity_part1, parts.identity_part2), (1, 2));
//! ```

use crate::clock::{Clock, SystemClock};
use crate::config::id::{max_value, IdGeneratorConfig};
use crate::error::{ConfigError, GenerateError};
use core::fmt;
use parking_lot::Mutex;
use std::sync::OnceLock;
use tracing::{debug, error, trace, warn};

/// Mutable generator state, guarded as one unit.
struct GeneratorState {
    sequence: u64,
    last_timestamp_millis: i64,
    exhausted: bool,
}

/// Thread-safe Snowflake-style ID generator.
///
/// Built once from a validated [`IdGeneratorConfig`], then shared for the
/// life of the process. See the [module docs](self) for the bit layout.
pub struct IdGenerator<C = SystemClock> {
    config: IdGeneratorConfig,
    timestamp_bits: u32,
    max_sequence: u64,
    stable_prefix: u64,
    end_of_life_millis: i64,
    clock: C,
    state: Mutex<GeneratorState>,
}

/// Fields recovered from an ID by [`IdGenerator::decompose`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct IdParts {
    /// First identity field.
    pub identity_part1: u64,
    /// Second identity field.
    pub identity_part2: u64,
    /// Position within its millisecond.
    pub sequence: u64,
    /// Unix time in milliseconds at which the ID was produced.
    pub timestamp_millis: i64,
}

impl IdGenerator<SystemClock> {
    /// Builds a generator on the system clock.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if any width or identity value is out of
    /// range, or if the epoch lies in the future.
    pub fn new(config: IdGeneratorConfig) -> Result<Self, ConfigError> {
        Self::with_clock(config, SystemClock)
    }

    /// Process-wide generator using [`IdGeneratorConfig::default`].
    ///
    /// Initialised on first use; every later call returns the same instance.
    ///
    /// # Errors
    ///
    /// Fails only if the system clock reads earlier than the default epoch,
    /// and then fails on every call.
    pub fn global() -> Result<&'static IdGenerator, ConfigError> {
        static GLOBAL: OnceLock<Result<IdGenerator, ConfigError>> = OnceLock::new();
        GLOBAL
            .get_or_init(|| IdGenerator::new(IdGeneratorConfig::default()))
            .as_ref()
            .map_err(Clone::clone)
    }
}

impl<C: Clock> IdGenerator<C> {
    /// Builds a generator that reads time from `clock`.
    ///
    /// # Errors
    ///
    /// Same as [`IdGenerator::new`]; the epoch is checked against `clock`.
    pub fn with_clock(config: IdGeneratorConfig, clock: C) -> Result<Self, ConfigError> {
        config.validate()?;

        let now_millis = clock.now_millis();
        if config.epoch_millis < 0 || config.epoch_millis > now_millis {
            return Err(ConfigError::EpochOutOfRange {
                epoch_millis: config.epoch_millis,
                now_millis,
            });
        }

        let timestamp_bits = config.timestamp_bits();
        let sequence_shift = timestamp_bits;
        let part2_shift = sequence_shift + config.sequence_bits;
        let part1_shift = part2_shift + config.part2_bits;
        let stable_prefix =
            (config.identity_part1 << part1_shift) | (config.identity_part2 << part2_shift);

        // timestamp_bits <= 60, so the span fits an i64
        let span = max_value(timestamp_bits) as i64;
        let end_of_life_millis = config.epoch_millis.saturating_add(span);

        debug!(
            epoch_millis = config.epoch_millis,
            part1_bits = config.part1_bits,
            part2_bits = config.part2_bits,
            sequence_bits = config.sequence_bits,
            timestamp_bits,
            identity_part1 = config.identity_part1,
            identity_part2 = config.identity_part2,
            end_of_life_millis,
            "id generator configured"
        );

        Ok(Self {
            config,
            timestamp_bits,
            max_sequence: max_value(config.sequence_bits),
            stable_prefix,
            end_of_life_millis,
            clock,
            state: Mutex::new(GeneratorState {
                sequence: 0,
                last_timestamp_millis: config.epoch_millis,
                exhausted: false,
            }),
        })
    }

    /// Produces the next ID.
    ///
    /// May spin for up to a millisecond when the sequence for the current
    /// millisecond is used up.
    ///
    /// # Errors
    ///
    /// - [`GenerateError::ClockMovedBackwards`] if the clock reads earlier
    ///   than the previous ID. The generator remains usable.
    /// - [`GenerateError::Exhausted`] once the clock passes
    ///   [`end_of_life_millis`](Self::end_of_life_millis). Permanent.
    pub fn next_id(&self) -> Result<u64, GenerateError> {
        let mut state = self.state.lock();

        let mut now = self.clock.now_millis();
        self.check_lifetime(&mut state, now)?;

        if now < state.last_timestamp_millis {
            warn!(
                last_millis = state.last_timestamp_millis,
                now_millis = now,
                "clock moved backwards, refusing to generate id"
            );
            return Err(GenerateError::ClockMovedBackwards {
                last_millis: state.last_timestamp_millis,
                now_millis: now,
            });
        }

        if now == state.last_timestamp_millis {
            if state.sequence > self.max_sequence {
                now = self.wait_past(now);
                self.check_lifetime(&mut state, now)?;
                state.sequence = 0;
            }
        } else {
            state.sequence = 0;
        }

        // epoch <= last <= now <= end_of_life, so elapsed fits timestamp_bits
        let elapsed = (now - self.config.epoch_millis) as u64;
        let id = self.stable_prefix | (state.sequence << self.timestamp_bits) | elapsed;

        state.sequence += 1;
        state.last_timestamp_millis = now;
        Ok(id)
    }

    /// Splits an ID produced by this generator back into its fields.
    ///
    /// IDs from a generator with a different layout decode to garbage.
    pub fn decompose(&self, id: u64) -> IdParts {
        let sequence_shift = self.timestamp_bits;
        let part2_shift = sequence_shift + self.config.sequence_bits;
        let part1_shift = part2_shift + self.config.part2_bits;

        let elapsed = id & max_value(self.timestamp_bits);
        IdParts {
            identity_part1: (id >> part1_shift) & max_value(self.config.part1_bits),
            identity_part2: (id >> part2_shift) & max_value(self.config.part2_bits),
            sequence: (id >> sequence_shift) & self.max_sequence,
            timestamp_millis: self.config.epoch_millis.saturating_add(elapsed as i64),
        }
    }

    /// The configuration this generator was built from.
    #[inline]
    pub fn config(&self) -> &IdGeneratorConfig {
        &self.config
    }

    /// Width of the timestamp field.
    #[inline]
    pub fn timestamp_bits(&self) -> u32 {
        self.timestamp_bits
    }

    /// Largest sequence value; `max_sequence() + 1` IDs fit in one millisecond.
    #[inline]
    pub fn max_sequence(&self) -> u64 {
        self.max_sequence
    }

    /// Last Unix millisecond this generator can encode.
    #[inline]
    pub fn end_of_life_millis(&self) -> i64 {
        self.end_of_life_millis
    }

    fn check_lifetime(&self, state: &mut GeneratorState, now: i64) -> Result<(), GenerateError> {
        if now <= self.end_of_life_millis && !state.exhausted {
            return Ok(());
        }
        if !state.exhausted {
            error!(
                end_of_life_millis = self.end_of_life_millis,
                now_millis = now,
                "id generator exhausted its timestamp range"
            );
            state.exhausted = true;
        }
        Err(GenerateError::Exhausted {
            end_of_life_millis: self.end_of_life_millis,
            now_millis: now,
        })
    }

    /// Spins until the clock reads later than `millis`.
    fn wait_past(&self, millis: i64) -> i64 {
        trace!(millis, "sequence exhausted, waiting for next millisecond");
        loop {
            let now = self.clock.now_millis();
            if now > millis {
                return now;
            }
            core::hint::spin_loop();
        }
    }
}

impl<C> fmt::Debug for IdGenerator<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IdGenerator")
            .field("config", &self.config)
            .field("end_of_life_millis", &self.end_of_life_millis)
            .finish_non_exhaustive()
    }
}
