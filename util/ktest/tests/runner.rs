// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 KylinSoft Co., Ltd. <https://www.kylinos.cn/>
// See LICENSES for license details.

//! Runner behaviour observed from outside the crate.
//!
//! The harness runs these tests on parallel threads, so each one drives its
//! own suite.

use std::sync::atomic::{AtomicUsize, Ordering};

use ktest::{
    InstancePolicy, RunConfig, RunState, TestDescriptor, TestResult, TestRunner, TestSuite,
    UnitTest, def_test,
};

fn run_one(suite: &str, name: &str) -> TestResult {
    let test = ktest::find_test(suite, name).expect("test is registered");
    TestRunner::new(test).run(&mut |_: &'static TestDescriptor, _: &TestResult| {})
}

fn passed(result: &TestResult) -> Vec<bool> {
    result.with_records(|records| records.iter().map(|r| r.passed()).collect())
}

// once + all

#[cfg(feature = "alloc")]
ktest::test_suite!(Mixed);

#[cfg(feature = "alloc")]
#[def_test(Mixed)]
fn once_then_all(t: &mut UnitTest) {
    ktest::expect_once!(t, 1 == 1);
    for i in 0..4 {
        ktest::expect_all!(t, i < 100);
    }
}

#[cfg(feature = "alloc")]
#[test]
fn test_once_and_all_records() {
    let result = run_one("Mixed", "once_then_all");
    assert_eq!(result.len(), 5);
    assert!(result.succeeded());
    assert_eq!(passed(&result), [true; 5]);
}

// Unsuffixed checks

ktest::test_suite!(Unsuffixed);

#[def_test(Unsuffixed)]
fn default_flavour_in_loop(t: &mut UnitTest) {
    for i in 0..4 {
        ktest::expect_lt!(t, i, 4);
    }
}

#[test]
fn test_default_flavour_follows_alloc() {
    let result = run_one("Unsuffixed", "default_flavour_in_loop");
    let expected = if ktest::config::NO_ALLOC { 1 } else { 4 };
    assert_eq!(result.len(), expected);
    assert!(result.succeeded());
}

// Fatal checks

ktest::test_suite!(Fatal);

#[def_test(Fatal)]
fn fatal_false(t: &mut UnitTest) {
    ktest::assert!(t, false);
    ktest::expect!(t, true);
}

#[def_test(Fatal)]
fn soft_false(t: &mut UnitTest) {
    ktest::expect!(t, false);
    ktest::expect!(t, true);
}

#[test]
fn test_fatal_check_stops_recording() {
    let result = run_one("Fatal", "fatal_false");
    assert_eq!(result.len(), 1);
    assert!(!result.succeeded());

    let result = run_one("Fatal", "soft_false");
    assert_eq!(passed(&result), [false, true]);
    assert!(!result.succeeded());
}

// Suite state

#[derive(Debug, Default)]
struct Countdown {
    state: u32,
}

impl TestSuite for Countdown {
    fn set_up(&mut self) {
        self.state = 4;
    }
}

ktest::register_suite!(Countdown);

#[def_test(Countdown)]
fn count_to_zero(suite: &mut Countdown, t: &mut UnitTest) {
    while suite.state > 0 {
        ktest::assert_nonzero_once!(t, suite.state);
        suite.state -= 1;
    }
    ktest::assert_zero!(t, suite.state);
}

#[def_test(Countdown)]
fn state_reset_before_each_test(suite: &mut Countdown, t: &mut UnitTest) {
    ktest::assert_eq!(t, suite.state, 4);
}

#[test]
fn test_set_up_state_reaches_zero() {
    let stats = ktest::run_all(
        &RunConfig::new().suite("Countdown"),
        &mut |test: &'static TestDescriptor, result: &TestResult| {
            assert!(result.succeeded(), "{test} failed: {result:?}");
        },
    );
    assert_eq!(stats.total, 2);
    assert_eq!(stats.passed, 2);
}

// First and final failures

ktest::test_suite!(Failures);

#[def_test(Failures)]
fn two_failures(t: &mut UnitTest) {
    ktest::expect!(t, true);
    ktest::expect_eq!(t, 1, 2);
    ktest::expect!(t, true);
    ktest::expect_lt!(t, 2, 1);
}

#[def_test(Failures)]
fn one_failure(t: &mut UnitTest) {
    ktest::expect_zero!(t, 3);
}

#[test]
fn test_first_and_final_failure() {
    let result = run_one("Failures", "two_failures");
    assert_eq!(result.first_failure_index(), Some(1));
    assert_eq!(result.final_failure_index(), Some(3));
    assert_eq!(
        result.first_failure().map(|r| r.message().to_owned()),
        Some(String::from("Expected equal values."))
    );
    assert_eq!(
        result.final_failure().map(|r| r.expression()),
        Some("2 < 1")
    );

    let result = run_one("Failures", "one_failure");
    assert_eq!(result.first_failure_index(), Some(0));
    assert_eq!(result.final_failure_index(), Some(0));
    assert_eq!(
        result.final_failure().map(|r| r.message().to_owned()),
        Some(String::from("Expected zero value."))
    );
}

// Metadata seen by the completion handler

ktest::test_suite!(Annotated);

#[def_test(Annotated)]
fn annotated(t: &mut UnitTest) {
    t.attach("answer", 42_i64).expect("room for metadata");
    t.attach_internal("expect", "pass").expect("room for metadata");
    ktest::expect!(t, true);
}

#[test]
fn test_handler_reads_metadata() {
    let test = ktest::find_test("Annotated", "annotated").expect("test is registered");
    let mut seen = None;
    TestRunner::new(test).run(&mut |test: &'static TestDescriptor, _: &TestResult| {
        seen = Some((
            test.metadata::<i64>("answer"),
            test.internal_metadata::<&'static str>("expect"),
            test.metadata::<u64>("answer"),
        ));
    });
    assert_eq!(seen, Some((Some(42), Some("pass"), None)));
    assert_eq!(test.metadata::<i64>("answer"), None);
}

// Scoped metadata

ktest::test_suite!(Scoped);

#[def_test(Scoped)]
fn inner_item_outlives_scope(t: &mut UnitTest) {
    let inner = t.with_metadata("label", "outer", |t| t.attach("label", "inner"));
    ktest::expect!(t, matches!(inner, Ok(Ok(()))));
    ktest::expect_eq!(t, t.lookup::<&'static str>("label"), Some(&"inner"));
    ktest::expect_eq!(t, t.metadata().items(ktest::MetadataKind::User).len(), 1);
}

#[test]
fn test_scoped_metadata_detaches_only_its_item() {
    let test = ktest::find_test("Scoped", "inner_item_outlives_scope").expect("registered");
    let mut label = None;
    let result = TestRunner::new(test).run(&mut |test: &'static TestDescriptor, _: &TestResult| {
        label = test.metadata::<&'static str>("label");
    });
    assert!(result.succeeded(), "{result:?}");
    assert_eq!(label, Some("inner"));
}

// Handlers reading a result

ktest::test_suite!(Inspected);

#[def_test(Inspected)]
fn one_failure_of_two(t: &mut UnitTest) {
    ktest::expect!(t, true);
    ktest::expect!(t, false);
}

#[test]
fn test_handler_reads_result_inside_records() {
    let test = ktest::find_test("Inspected", "one_failure_of_two").expect("registered");
    let mut seen = None;
    TestRunner::new(test).run(&mut |_: &'static TestDescriptor, result: &TestResult| {
        seen = Some(result.with_records(|records| {
            (records.len(), result.succeeded(), result.first_failure_index())
        }));
    });
    assert_eq!(seen, Some((2, false, Some(1))));
}

// Run states

ktest::test_suite!(States);

#[def_test(States)]
fn trivial() {}

#[test]
fn test_runner_states() {
    let test = ktest::find_test("States", "trivial").expect("test is registered");
    let mut runner = TestRunner::new(test);
    assert_eq!(runner.state(), RunState::Idle);

    let mut reported = 0;
    let result = runner.run(&mut |_: &'static TestDescriptor, _: &TestResult| reported += 1);
    assert_eq!(reported, 1);
    assert_eq!(runner.state(), RunState::Done);
    assert!(result.is_empty());
    assert!(result.succeeded());
    assert!(!test.suite().is_live());
    assert!(!test.instance().is_live());
}

// Result lifetime

#[cfg(feature = "alloc")]
ktest::test_suite!(Lifetime);

#[cfg(feature = "alloc")]
#[def_test(Lifetime)]
fn records_outlive_instance(t: &mut UnitTest) {
    ktest::expect!(t, false);
    ktest::expect!(t, true);
}

#[cfg(feature = "alloc")]
#[test]
fn test_result_outlives_test_instance() {
    let test = ktest::find_test("Lifetime", "records_outlive_instance").expect("registered");
    let mut kept = TestResult::new();
    let mut result = TestRunner::new(test).run(&mut |_: &'static TestDescriptor, r: &TestResult| {
        kept = r.clone();
    });
    assert!(!test.instance().is_live());
    assert!(result.shares_with(&kept));
    assert_eq!(result.share_count(), 2);

    let moved = result.take();
    assert!(result.is_empty());
    assert!(result.succeeded());
    drop(kept);
    assert_eq!(moved.share_count(), 1);
    assert_eq!(passed(&moved), [false, true]);
}

// Ignored tests

ktest::test_suite!(Skipping);

#[def_test(Skipping, ignore)]
fn skipped(t: &mut UnitTest) {
    ktest::assert!(t, false);
}

#[def_test(Skipping)]
fn not_skipped() {}

#[test]
fn test_ignored_tests_are_counted_not_run() {
    let mut names = Vec::new();
    let stats = ktest::run_all(
        &RunConfig::new().suite("Skipping"),
        &mut |test: &'static TestDescriptor, _: &TestResult| names.push(test.name()),
    );
    assert_eq!(names, ["not_skipped"]);
    assert_eq!((stats.total, stats.passed, stats.ignored), (2, 1, 1));
    assert!(stats.all_passed());
}

// Instance policies

static PER_SUITE_BUILT: AtomicUsize = AtomicUsize::new(0);
static PER_TEST_BUILT: AtomicUsize = AtomicUsize::new(0);

#[derive(Debug)]
struct SharedInstance;

impl Default for SharedInstance {
    fn default() -> Self {
        PER_SUITE_BUILT.fetch_add(1, Ordering::SeqCst);
        Self
    }
}

impl TestSuite for SharedInstance {}

ktest::register_suite!(SharedInstance);

#[derive(Debug)]
struct FreshInstance;

impl Default for FreshInstance {
    fn default() -> Self {
        PER_TEST_BUILT.fetch_add(1, Ordering::SeqCst);
        Self
    }
}

impl TestSuite for FreshInstance {}

ktest::register_suite!(FreshInstance);

#[def_test(SharedInstance)]
fn shared_a() {}

#[def_test(SharedInstance)]
fn shared_b() {}

#[def_test(SharedInstance)]
fn shared_c() {}

#[def_test(FreshInstance)]
fn fresh_a() {}

#[def_test(FreshInstance)]
fn fresh_b() {}

#[def_test(FreshInstance)]
fn fresh_c() {}

#[test]
fn test_per_suite_policy_builds_once() {
    let stats = ktest::run_all(
        &RunConfig::new().suite("SharedInstance"),
        &mut |_: &'static TestDescriptor, _: &TestResult| {},
    );
    assert_eq!(stats.passed, 3);
    assert_eq!(PER_SUITE_BUILT.load(Ordering::SeqCst), 1);
    assert!(!<SharedInstance as ktest::SuiteType>::descriptor().is_live());
}

#[test]
fn test_per_test_policy_builds_each_time() {
    let stats = ktest::run_all(
        &RunConfig::new()
            .suite("FreshInstance")
            .policy(InstancePolicy::PerTest),
        &mut |_: &'static TestDescriptor, _: &TestResult| {},
    );
    assert_eq!(stats.passed, 3);
    assert_eq!(PER_TEST_BUILT.load(Ordering::SeqCst), 3);
}
