// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 KylinSoft Co., Ltd. <https://www.kylinos.cn/>
// See LICENSES for license details.

//! Error type shared by the instance manager, metadata store and runner.

use core::fmt;

/// Errors raised by the test machinery itself.
///
/// Check failures are never errors; they are recorded as failing
/// [`Assertion`](crate::Assertion)s.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KtestError {
    /// The instance slot is held by a running test.
    Busy,
    /// No instance is live in the slot.
    Empty,
    /// A fixed-capacity store has no room left.
    CapacityExhausted,
    /// A test body was handed a suite instance of another type.
    SuiteMismatch,
}

impl KtestError {
    /// Static description, usable as an assertion detail without allocating.
    pub const fn message(&self) -> &'static str {
        match self {
            Self::Busy => "The instance is already in use by a running test.",
            Self::Empty => "No instance is live.",
            Self::CapacityExhausted => "The fixed-capacity store is full.",
            Self::SuiteMismatch => "The test was run with a suite of another type.",
        }
    }
}

impl fmt::Display for KtestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

#[cfg(feature = "std")]
impl std::error::Error for KtestError {}

pub type Result<T> = core::result::Result<T, KtestError>;
