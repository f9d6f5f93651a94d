// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 KylinSoft Co., Ltd. <https://www.kylinos.cn/>
// See LICENSES for license details.

//! Self-tests of the check macros, results, metadata and fault handling.
//!
//! Each test declares its expected outcome as internal metadata `expect`
//! before doing anything else; tests that declare nothing must pass. The
//! [`Judge`] compares every result against that declaration.

mod assertions;
mod faults;
mod metadata;
mod results;

use ktest::{CompletionHandler, MetaValue, RunConfig, TestDescriptor, TestResult, UnitTest};
use ktest_console::console_println;

/// Outcome a self-test expects of itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Expect {
    #[default]
    Pass,
    /// Fails, and no record passes.
    AllFail,
    /// Fails, with at least one passing record.
    SomeFail,
}

impl Expect {
    fn holds_for(self, result: &TestResult) -> bool {
        match self {
            Self::Pass => result.succeeded(),
            Self::AllFail => {
                !result.succeeded()
                    && result.with_records(|records| records.iter().all(|r| !r.passed()))
            }
            Self::SomeFail => {
                !result.succeeded()
                    && result.with_records(|records| records.iter().any(|r| r.passed()))
            }
        }
    }
}

/// Declares the expected outcome of the running test.
pub fn expect(t: &mut UnitTest, outcome: Expect) {
    if let Err(err) = t.attach_internal("expect", MetaValue::owned(outcome)) {
        t.record_error(err);
    }
}

/// Completion handler that checks each result against its declaration.
#[derive(Debug, Default)]
pub struct Judge {
    checked: usize,
    deviations: usize,
}

impl CompletionHandler for Judge {
    fn on_complete(&mut self, test: &'static TestDescriptor, result: &TestResult) {
        let expected = test
            .internal_metadata::<Expect>("expect")
            .unwrap_or_default();
        self.checked += 1;

        if expected.holds_for(result) {
            console_println!("[PASS] [{test}] at {}:{}", test.file(), test.line());
            return;
        }

        self.deviations += 1;
        let actual = if result.succeeded() { "PASS" } else { "FAIL" };
        console_println!(
            "[FAIL] [{test}] unexpected {actual} (expected {expected:?}) at {}:{}",
            test.file(),
            test.line()
        );
        result.with_records(|records| {
            for record in records {
                console_println!(
                    "\t{} \"{}\" at {}:{}",
                    if record.passed() { "ok" } else { "failed" },
                    record.message(),
                    record.file(),
                    record.line()
                );
            }
        });
    }
}

/// Runs every internal suite, or only `filter` if it names one. Returns the
/// number of tests whose outcome deviated from their declaration.
pub fn run(filter: Option<&str>) -> usize {
    let mut judge = Judge::default();
    for suite in ktest::suites().filter(|suite| suite.name().starts_with('_')) {
        if filter.is_some_and(|wanted| wanted != suite.name()) {
            continue;
        }
        ktest::run_all(&RunConfig::new().suite(suite.name()), &mut judge);
    }
    info!(
        "{} self-tests checked, {} deviations",
        judge.checked, judge.deviations
    );
    judge.deviations
}
