// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 KylinSoft Co., Ltd. <https://www.kylinos.cn/>
// See LICENSES for license details.

//! Self-registering unit tests for kernels and other heap-less targets.
//!
//! Tests are declared with [`def_test`] and grouped into suites. Every check
//! made by a test body is kept as an [`Assertion`] in the test's
//! [`TestResult`]; the [`TestRunner`] drives one test through suite set-up,
//! body and tear-down and hands the result to a [`CompletionHandler`].
//!
//! ```ignore
//! use ktest::{TestSuite, UnitTest, def_test, register_suite};
//!
//! #[derive(Default)]
//! struct Counter {
//!     value: u32,
//! }
//!
//! impl TestSuite for Counter {
//!     fn set_up(&mut self) {
//!         self.value = 4;
//!     }
//! }
//!
//! register_suite!(Counter);
//!
//! #[def_test(Counter)]
//! fn test_countdown(suite: &mut Counter, t: &mut UnitTest) {
//!     ktest::assert_nonzero!(t, suite.value);
//!     while suite.value > 0 {
//!         ktest::expect_all!(t, suite.value <= 4);
//!         suite.value -= 1;
//!     }
//!     ktest::assert_zero!(t, suite.value);
//! }
//!
//! fn main() {
//!     let mut report = |test: &'static ktest::TestDescriptor, result: &ktest::TestResult| {
//!         log::info!("{test}: {}", result.succeeded());
//!     };
//!     let stats = ktest::run_all(&ktest::RunConfig::default(), &mut report);
//!     assert!(stats.all_passed());
//! }
//! ```
//!
//! # Features
//! - `alloc` (default): growable result chains and the `_all` checks.
//!   Without it every check keeps one record per call site and the `_all`
//!   checks fail to compile.
//! - `std`: faults raised by a test body are caught and recorded as a
//!   failing assertion instead of unwinding out of the runner.

#![cfg_attr(not(any(feature = "std", test)), no_std)]

#[macro_use]
extern crate log;
#[cfg(feature = "alloc")]
extern crate alloc;

extern crate self as ktest;

pub mod assertion;
pub mod config;
pub mod descriptor;
pub mod error;
pub mod fault;
pub mod instance;
pub mod list;
pub mod metadata;
pub mod registry;
pub mod result;
pub mod runner;
pub mod store;
pub mod suite;
pub mod unit;

mod macros;

pub use assertion::{Assertion, CallSite, CheckKind, Storage};
pub use config::{InstancePolicy, RunConfig};
pub use descriptor::{TestBody, TestDescriptor, TestFlags};
pub use error::KtestError;
#[cfg(feature = "alloc")]
pub use fault::Fault;
pub use instance::{InstanceSlot, SuiteHandle, SuiteStorage};
// Re-export the test registration attribute
pub use ktest_macros::def_test;
pub use metadata::{MetaValue, MetadataItem, MetadataKind, MetadataStore};
pub use registry::{
    REGISTRATIONS, find_suite, find_test, register_test, suite_count, suites, test_count, tests,
    tests_in,
};
pub use result::TestResult;
pub use runner::{CompletionHandler, RunState, TestRunner, TestStats, run_all, run_all_ok};
pub use suite::{AsAny, DefaultSuite, SuiteDescriptor, SuiteType, TestSuite, downcast_suite};
pub use unit::UnitTest;

#[doc(hidden)]
pub mod __private {
    pub use linkme::{self, distributed_slice};
}
