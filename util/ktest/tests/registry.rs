// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 KylinSoft Co., Ltd. <https://www.kylinos.cn/>
// See LICENSES for license details.

use ktest::{
    KtestError, SuiteType, TestDescriptor, TestFlags, TestResult, TestRunner, TestSuite, UnitTest,
    def_test,
};

ktest::test_suite!(Alpha);
ktest::test_suite!(Beta);

mod nested {
    #[derive(Debug, Default)]
    pub struct Gamma;

    impl ktest::TestSuite for Gamma {}
}

ktest::register_suite!(nested::Gamma, "nested::Gamma");

#[def_test(Alpha)]
fn first() {}

#[def_test(Alpha, name = "second test")]
fn second() {}

#[def_test(Beta)]
fn only_beta() {}

#[def_test(nested::Gamma)]
fn in_namespace(t: &mut UnitTest) {
    ktest::expect!(t, true);
}

#[def_test]
fn without_suite() {}

fn ignore_report(_: &'static TestDescriptor, _: &TestResult) {}

#[test]
fn test_suites_are_registered_once() {
    let names: Vec<_> = ktest::suites().map(|suite| suite.name()).collect();
    for name in ["Alpha", "Beta", "nested::Gamma", "default", "Reentrant"] {
        assert_eq!(
            names.iter().filter(|n| **n == name).count(),
            1,
            "suite {name} in {names:?}"
        );
    }
    assert!(ktest::suite_count() >= 5);
    assert!(ktest::test_count() >= ktest::REGISTRATIONS.len());
}

#[test]
fn test_lookup_by_name() {
    let alpha = ktest::find_suite("Alpha").expect("Alpha is registered");
    assert!(core::ptr::eq(alpha, Alpha::descriptor()));
    assert_eq!(alpha.test_count(), 2);

    let mut names: Vec<_> = ktest::tests_in("Alpha")
        .expect("Alpha is registered")
        .map(|test| test.name())
        .collect();
    names.sort_unstable();
    assert_eq!(names, ["first", "second test"]);

    let second = ktest::find_test("Alpha", "second test").expect("renamed test");
    assert_eq!(second.to_string(), "Alpha::second test");
    assert!(second.file().ends_with("registry.rs"));
    assert_eq!(second.flags(), TestFlags::NONE);

    assert!(ktest::find_test("Alpha", "second").is_none());
    assert!(ktest::find_test("Beta", "first").is_none());
    assert!(ktest::find_suite("Delta").is_none());
    assert!(ktest::tests_in("Delta").is_none());

    let default = ktest::find_test("default", "without_suite").expect("default suite");
    assert!(core::ptr::eq(default.suite(), ktest::DefaultSuite::descriptor()));
    assert!(ktest::find_test("nested::Gamma", "in_namespace").is_some());
}

#[test]
fn test_iteration_is_restartable() {
    // Hand-registered tests may appear concurrently; leave them out.
    let listed = || {
        ktest::tests()
            .filter(|test| test.suite().name() != "Mismatched")
            .map(|test| test.to_string())
            .collect::<Vec<_>>()
    };
    let once = listed();
    let twice = listed();
    assert_eq!(once, twice);
    assert!(once.iter().any(|name| name == "Beta::only_beta"));
}

#[test]
fn test_register_is_idempotent() {
    let test = ktest::find_test("Beta", "only_beta").expect("registered");
    assert!(!ktest::register_test(test));
    assert_eq!(test.suite().test_count(), 1);
}

// Tests registered by hand

ktest::test_suite!(Mismatched);

fn expects_beta(suite: &mut dyn TestSuite, t: &mut UnitTest) {
    if ktest::downcast_suite::<Beta>(suite).is_none() {
        t.record_error(KtestError::SuiteMismatch);
    }
}

static MISMATCHED: TestDescriptor = TestDescriptor::new(
    "mismatched",
    Mismatched::descriptor,
    file!(),
    line!(),
    expects_beta,
    TestFlags::NONE,
);

#[test]
fn test_suite_mismatch_is_a_failing_record() {
    assert!(ktest::register_test(&MISMATCHED));
    assert!(!ktest::register_test(&MISMATCHED));
    assert!(ktest::find_test("Mismatched", "mismatched").is_some());

    let result = TestRunner::new(&MISMATCHED).run(&mut ignore_report);
    assert!(!result.succeeded());
    assert_eq!(
        result.final_failure().map(|r| r.message().to_owned()),
        Some(String::from(KtestError::SuiteMismatch.message()))
    );
}

ktest::test_suite!(Reentrant);

#[def_test(Reentrant)]
fn runs_itself(t: &mut UnitTest) {
    let this = ktest::find_test("Reentrant", "runs_itself");
    ktest::assert!(t, this.is_some());
    if let Some(this) = this {
        let inner = TestRunner::new(this).run(&mut ignore_report);
        ktest::expect!(t, !inner.succeeded());
        ktest::expect_eq!(t, inner.len(), 1);
    }
}

#[test]
fn test_reentrant_run_is_rejected() {
    let test = ktest::find_test("Reentrant", "runs_itself").expect("registered");
    let result = TestRunner::new(test).run(&mut ignore_report);
    assert!(result.succeeded(), "{result:?}");
    assert_eq!(result.len(), 3);
    assert!(!test.instance().is_live());
    assert!(!test.suite().is_live());
}
