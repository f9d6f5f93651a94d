// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 KylinSoft Co., Ltd. <https://www.kylinos.cn/>
// See LICENSES for license details.

//! Test runner.
//!
//! [`TestRunner`] drives a single test through suite set-up, body and
//! tear-down and hands its result to a [`CompletionHandler`]. [`run_all`]
//! walks the registry and runs every selected suite.

use crate::{
    assertion::Assertion,
    config::{FAULT_CONTAINMENT, InstancePolicy, RunConfig},
    descriptor::TestDescriptor,
    error::KtestError,
    fault::{self, FaultMessage},
    registry,
    result::TestResult,
    suite::TestSuite,
    unit::UnitTest,
};

/// Progress of one [`TestRunner::run`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Idle,
    SuiteSetup,
    BodyExecuting,
    SuiteTeardown,
    Reported,
    Done,
}

/// Receives each finished test.
///
/// Called exactly once per run, after tear-down, while the test instance
/// (and its metadata) is still live.
pub trait CompletionHandler {
    fn on_complete(&mut self, test: &'static TestDescriptor, result: &TestResult);
}

impl<F> CompletionHandler for F
where
    F: FnMut(&'static TestDescriptor, &TestResult),
{
    fn on_complete(&mut self, test: &'static TestDescriptor, result: &TestResult) {
        self(test, result)
    }
}

/// Test statistics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TestStats {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub ignored: usize,
}

impl TestStats {
    pub const fn new() -> Self {
        Self {
            total: 0,
            passed: 0,
            failed: 0,
            ignored: 0,
        }
    }

    /// Counts one finished test.
    pub fn record(&mut self, result: &TestResult) {
        self.total += 1;
        if result.succeeded() {
            self.passed += 1;
        } else {
            self.failed += 1;
        }
    }

    pub fn record_ignored(&mut self) {
        self.total += 1;
        self.ignored += 1;
    }

    #[inline]
    pub fn all_passed(&self) -> bool {
        self.failed == 0
    }

    pub fn merge(&mut self, other: &TestStats) {
        self.total += other.total;
        self.passed += other.passed;
        self.failed += other.failed;
        self.ignored += other.ignored;
    }
}

pub struct TestRunner {
    test: &'static TestDescriptor,
    state: RunState,
}

impl TestRunner {
    pub fn new(test: &'static TestDescriptor) -> Self {
        Self {
            test,
            state: RunState::Idle,
        }
    }

    #[inline]
    pub fn test(&self) -> &'static TestDescriptor {
        self.test
    }

    #[inline]
    pub fn state(&self) -> RunState {
        self.state
    }

    /// Runs the test and reports it to `handler`.
    ///
    /// Uses the live suite instance if there is one; otherwise constructs the
    /// suite for this run and destroys it afterwards. Never fails: machinery
    /// errors and contained faults become failing records.
    pub fn run<H: CompletionHandler + ?Sized>(&mut self, handler: &mut H) -> TestResult {
        let test = self.test;
        let suite = test.suite();
        debug!("running {test}");

        let mut owns_suite = false;
        let executed = test
            .instance()
            .reconstruct_with(|| UnitTest::new(test))
            .and_then(|()| {
                owns_suite = suite.construct()?;
                let state = &mut self.state;
                test.instance().with(|unit| {
                    if let Err(err) = suite.with_instance(|instance| execute(state, instance, unit))
                    {
                        unit.record_error(err);
                    }
                    capture(unit)
                })
            });

        let result = match executed {
            Ok(result) => result,
            Err(err) => machinery_failure(test, err),
        };

        self.state = RunState::Reported;
        handler.on_complete(test, &result);

        if let Err(err) = test.instance().destruct() {
            warn!("{test}: test instance not destructed: {err}");
        }
        if owns_suite {
            if let Err(err) = suite.destruct() {
                warn!("{test}: suite {} not destructed: {err}", suite.name());
            }
        }
        self.state = RunState::Done;
        result
    }
}

/// Shares the accumulated chain before the test instance goes away.
fn capture(unit: &UnitTest) -> TestResult {
    unit.result().clone()
}

fn machinery_failure(test: &'static TestDescriptor, err: KtestError) -> TestResult {
    warn!("{test}: {err}");
    let mut result = TestResult::new();
    result.append(Assertion::internal(err.message(), test.file(), test.line()));
    result
}

fn execute(state: &mut RunState, suite: &mut dyn TestSuite, unit: &mut UnitTest) {
    let test = unit.info();

    *state = RunState::SuiteSetup;
    match fault::contain(|| suite.set_up()) {
        Ok(()) => {
            *state = RunState::BodyExecuting;
            let body = test.body();
            match (fault::contain(|| body(suite, unit)), test.should_fault()) {
                (Ok(()), false) => {}
                (Ok(()), true) => unit.record(Assertion::internal(
                    "The test completed without the expected fault.",
                    test.file(),
                    test.line(),
                )),
                (Err(_), true) => debug!("{test}: faulted as expected"),
                (Err(message), false) => record_fault(unit, message),
            }
        }
        Err(message) => record_fault(unit, message),
    }

    *state = RunState::SuiteTeardown;
    if let Err(message) = fault::contain(|| suite.tear_down()) {
        record_fault(unit, message);
    }
}

#[cfg(feature = "std")]
fn record_fault(unit: &mut UnitTest, message: FaultMessage) {
    unit.record_fault(message);
}

#[cfg(not(feature = "std"))]
fn record_fault(_unit: &mut UnitTest, message: FaultMessage) {
    match message {}
}

/// Runs every selected suite, reporting each test to `handler`.
///
/// With [`InstancePolicy::PerSuite`] a suite instance stays live across all
/// of the suite's tests; `set_up` and `tear_down` still run around each test.
/// Ignored tests are counted and not run. Tests that expect a fault are
/// ignored when faults cannot be contained.
pub fn run_all<H: CompletionHandler + ?Sized>(config: &RunConfig, handler: &mut H) -> TestStats {
    let mut stats = TestStats::new();

    if registry::test_count() == 0 {
        warn!("================================");
        warn!("No tests found!");
        warn!("================================");
        return stats;
    }

    for suite in registry::suites() {
        if !config.selects(suite.name()) {
            debug!("skipping suite {}", suite.name());
            continue;
        }
        info!("suite {} ({} tests)", suite.name(), suite.test_count());

        let _handle = match config.policy {
            InstancePolicy::PerSuite => suite
                .acquire()
                .inspect_err(|err| warn!("suite {}: {err}", suite.name()))
                .ok(),
            InstancePolicy::PerTest => None,
        };

        for test in suite.tests() {
            if test.is_ignored() || (test.should_fault() && !FAULT_CONTAINMENT) {
                info!("{test} ... ignored");
                stats.record_ignored();
                continue;
            }
            let result = TestRunner::new(test).run(handler);
            stats.record(&result);
        }
    }

    info!(
        "{} tests: {} passed, {} failed, {} ignored",
        stats.total, stats.passed, stats.failed, stats.ignored
    );
    stats
}

/// Runs every suite with the default configuration. Returns whether all
/// tests passed.
pub fn run_all_ok<H: CompletionHandler + ?Sized>(handler: &mut H) -> bool {
    run_all(&RunConfig::default(), handler).all_passed()
}
