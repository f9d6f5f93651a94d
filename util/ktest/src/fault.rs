// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 KylinSoft Co., Ltd. <https://www.kylinos.cn/>
// See LICENSES for license details.

//! Fault containment.
//!
//! With the `std` feature the runner wraps suite hooks and test bodies in
//! [`contain`], turning a panic into a failing record. The payload decides
//! the message: a [`Fault`] or boxed error is a typed fault and contributes
//! its description, a string payload is used as is, and anything else falls
//! back to a generic message.

#[cfg(feature = "alloc")]
use alloc::borrow::Cow;
#[cfg(feature = "alloc")]
use core::fmt;
#[cfg(feature = "std")]
use std::{
    any::Any,
    error::Error,
    panic::{self, AssertUnwindSafe},
    string::String,
};

#[cfg(feature = "std")]
use crate::config::FAULT_MESSAGE_LIMIT;

/// Typed fault payload, raised with [`raise`] or
/// `std::panic::panic_any(Fault::new(..))`.
#[cfg(feature = "alloc")]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fault {
    message: Cow<'static, str>,
}

#[cfg(feature = "alloc")]
impl Fault {
    pub fn new(message: impl Into<Cow<'static, str>>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

#[cfg(feature = "alloc")]
impl fmt::Display for Fault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

#[cfg(feature = "std")]
impl Error for Fault {}

/// Description of a contained fault.
#[cfg(feature = "std")]
pub type FaultMessage = String;
/// Faults are never contained without `std`.
#[cfg(not(feature = "std"))]
pub type FaultMessage = core::convert::Infallible;

#[cfg(feature = "std")]
const PREFIX: &str = "An unhandled fault occurred: ";
#[cfg(feature = "std")]
const GENERIC: &str = "An unhandled fault occurred.";

/// Raises a typed fault.
#[cfg(feature = "std")]
pub fn raise(message: impl Into<Cow<'static, str>>) -> ! {
    panic::panic_any(Fault::new(message))
}

/// Builds the record message for a panic payload.
#[cfg(feature = "std")]
pub fn describe_payload(payload: &(dyn Any + Send)) -> String {
    let detail = if let Some(fault) = payload.downcast_ref::<Fault>() {
        fault.to_string()
    } else if let Some(err) = payload.downcast_ref::<Box<dyn Error + Send + Sync>>() {
        err.to_string()
    } else if let Some(s) = payload.downcast_ref::<&'static str>() {
        String::from(*s)
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        return String::from(GENERIC);
    };
    if detail.is_empty() {
        return String::from(GENERIC);
    }
    let mut message = String::with_capacity(PREFIX.len() + detail.len().min(FAULT_MESSAGE_LIMIT));
    message.push_str(PREFIX);
    message.push_str(truncate(&detail, FAULT_MESSAGE_LIMIT));
    message
}

/// Longest prefix of `s` no longer than `limit` bytes.
#[cfg(feature = "std")]
fn truncate(s: &str, limit: usize) -> &str {
    if s.len() <= limit {
        return s;
    }
    let mut end = limit;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}

/// Runs `f`, converting a panic into its description.
#[cfg(feature = "std")]
pub fn contain<R>(f: impl FnOnce() -> R) -> Result<R, FaultMessage> {
    panic::catch_unwind(AssertUnwindSafe(f)).map_err(|payload| describe_payload(&*payload))
}

/// Runs `f`. Without `std` a fault is not contained.
#[cfg(not(feature = "std"))]
pub fn contain<R>(f: impl FnOnce() -> R) -> Result<R, FaultMessage> {
    Ok(f())
}
