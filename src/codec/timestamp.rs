/*
 * Copyright 2025 Vijaykumar Singh
 *
 * Licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License.
 * You may obtain a copy of the License at
 *
 *     http://www.apache.org/licenses/LICENSE-2.0
 *
 * Unless required by applicable law or agreed to in writing, software
 * distributed under the License is distributed on an "AS IS" BASIS,
 * WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
 * See the License for the specific language governing permissions and
 * limitations under the License.
 */

//! Hybrid logical-clock timestamp codec.
//!
//! A hybrid timestamp is a 64-bit unsigned value: the upper 46 bits carry
//! physical milliseconds since the Unix epoch, the lower 18 bits a logical
//! counter used for causal ordering. Timestamps built from pure wall-clock
//! input always carry a zero logical part.
//!
//! Converting back to Unix seconds discards the logical counter and the
//! sub-second precision of the physical part. That loss is intentional.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};

use crate::error::{Result, TranscodeError};

/// Number of low bits reserved for the logical counter.
pub const LOGICAL_BITS: u32 = 18;

const LOGICAL_MASK: u64 = (1 << LOGICAL_BITS) - 1;

/// A 64-bit hybrid logical-clock timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct HybridTimestamp(u64);

impl HybridTimestamp {
    pub fn new(raw: u64) -> Self {
        HybridTimestamp(raw)
    }

    pub fn raw(&self) -> u64 {
        self.0
    }

    /// Physical milliseconds since the Unix epoch (upper 46 bits).
    pub fn physical_millis(&self) -> u64 {
        self.0 >> LOGICAL_BITS
    }

    /// Logical counter (lower 18 bits).
    pub fn logical(&self) -> u64 {
        self.0 & LOGICAL_MASK
    }

    /// Unix seconds, floor division. Sub-millisecond and logical-counter
    /// precision are discarded.
    pub fn to_unix_seconds(&self) -> u64 {
        self.physical_millis() / 1000
    }

    /// Build a timestamp from Unix seconds. The logical part is zero.
    pub fn from_unix_seconds(seconds: u64) -> Result<Self> {
        let millis = seconds
            .checked_mul(1000)
            .filter(|ms| ms >> (64 - LOGICAL_BITS) == 0)
            .ok_or_else(|| {
                TranscodeError::InvalidTimestamp(format!(
                    "unix seconds {seconds} out of hybrid timestamp range"
                ))
            })?;
        Ok(HybridTimestamp(millis << LOGICAL_BITS))
    }

    /// Build a timestamp from a datetime, flooring to whole seconds.
    /// Pre-epoch datetimes are rejected.
    pub fn from_datetime(dt: DateTime<Utc>) -> Result<Self> {
        let millis = dt.timestamp_millis();
        if millis < 0 {
            return Err(TranscodeError::InvalidTimestamp(format!(
                "datetime {dt} predates the Unix epoch"
            )));
        }
        Self::from_unix_seconds((millis / 1000) as u64)
    }
}

impl From<u64> for HybridTimestamp {
    fn from(raw: u64) -> Self {
        HybridTimestamp(raw)
    }
}

impl FromStr for HybridTimestamp {
    type Err = TranscodeError;

    /// Accepts only integer-valued strings. Non-numeric, fractional and
    /// negative inputs are rejected.
    fn from_str(s: &str) -> Result<Self> {
        s.trim()
            .parse::<u64>()
            .map(HybridTimestamp)
            .map_err(|_| TranscodeError::InvalidTimestamp(format!("not a non-negative integer: {s:?}")))
    }
}

impl fmt::Display for HybridTimestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}
