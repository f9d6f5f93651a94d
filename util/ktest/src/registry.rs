// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 KylinSoft Co., Ltd. <https://www.kylinos.cn/>
// See LICENSES for license details.

//! Process-wide registry of suites and tests.
//!
//! [`def_test`](crate::def_test) places one entry per test in the
//! [`REGISTRATIONS`] distributed slice. The first query of the registry runs
//! a one-time pass that links every entry into its suite, and each suite into
//! the suite list when its first test is linked.
//!
//! Registration order follows the order of [`REGISTRATIONS`], which is the
//! link order of the objects that define tests. That order is not specified
//! across crates or object files; do not rely on it.

use linkme::distributed_slice;
use spin::Once;

use crate::{
    descriptor::TestDescriptor,
    list::{Iter, StaticList},
    suite::SuiteDescriptor,
};

/// Registration entries, one per test.
#[distributed_slice]
pub static REGISTRATIONS: [fn() -> &'static TestDescriptor];

static SUITES: StaticList<SuiteDescriptor> = StaticList::new();
static INIT: Once = Once::new();

/// Runs the registration pass once. Every query calls it first.
pub fn init() {
    INIT.call_once(|| {
        for entry in REGISTRATIONS.iter() {
            register_test(entry());
        }
        debug!(
            "registered {} tests in {} suites",
            REGISTRATIONS.len(),
            SUITES.len()
        );
    });
}

/// Links `test` into its suite, and the suite into the suite list if this
/// is its first test.
///
/// Returns `false` if the test was already registered.
pub fn register_test(test: &'static TestDescriptor) -> bool {
    let suite = test.suite();
    if !suite.link_test(test) {
        return false;
    }
    if SUITES.push(suite) {
        debug!("registered suite {}", suite.name());
    }
    trace!("registered test {test}");
    true
}

/// Suites in registration order.
pub fn suites() -> Iter<SuiteDescriptor> {
    init();
    SUITES.iter()
}

/// Every test, grouped by suite.
pub fn tests() -> impl Iterator<Item = &'static TestDescriptor> {
    suites().flat_map(SuiteDescriptor::tests)
}

/// Tests of the suite called `suite`.
pub fn tests_in(suite: &str) -> Option<Iter<TestDescriptor>> {
    find_suite(suite).map(SuiteDescriptor::tests)
}

pub fn find_suite(name: &str) -> Option<&'static SuiteDescriptor> {
    suites().find(|suite| suite.name() == name)
}

pub fn find_test(suite: &str, name: &str) -> Option<&'static TestDescriptor> {
    find_suite(suite)?.find_test(name)
}

pub fn suite_count() -> usize {
    init();
    SUITES.len()
}

pub fn test_count() -> usize {
    suites().map(SuiteDescriptor::test_count).sum()
}
