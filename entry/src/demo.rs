// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 KylinSoft Co., Ltd. <https://www.kylinos.cn/>
// See LICENSES for license details.

//! Example suites.

use ktest::{TestSuite, UnitTest, def_test};

// A suite without state or hooks.
ktest::test_suite!(EmptySuite);

/// A suite whose state is reset before every test.
#[derive(Debug, Default)]
pub struct CustomSuite {
    test_int: i32,
}

impl TestSuite for CustomSuite {
    fn set_up(&mut self) {
        self.test_int = 4;
    }

    fn tear_down(&mut self) {
        trace!("CustomSuite torn down with {}", self.test_int);
    }
}

impl Drop for CustomSuite {
    fn drop(&mut self) {
        trace!("CustomSuite destructed");
    }
}

ktest::register_suite!(CustomSuite);

#[def_test(EmptySuite)]
fn empty_test(t: &mut UnitTest) {
    // expect records the outcome and carries on.
    ktest::expect!(t, 1 == 1);
    ktest::expect_eq!(t, 1, 1);

    // assert ends the test when the check fails.
    ktest::assert!(t, 1 != 2);
    ktest::assert_ne!(t, 1, 2);
}

#[def_test(CustomSuite)]
fn test_with_loop(suite: &mut CustomSuite, t: &mut UnitTest) {
    ktest::assert_nonzero!(t, suite.test_int);

    while suite.test_int > 0 {
        // Only the final iteration is kept.
        ktest::expect_nonzero_once!(t, suite.test_int);
        // Every iteration is kept.
        ktest::expect_all!(t, suite.test_int % 2 == 0);
        suite.test_int -= 1;
    }
    ktest::assert_zero!(t, suite.test_int);
}

#[def_test(CustomSuite)]
fn test_with_loop_break(suite: &mut CustomSuite, t: &mut UnitTest) {
    ktest::assert_nonzero!(t, suite.test_int);

    while suite.test_int > 0 {
        ktest::expect_nonzero_once!(t, suite.test_int);

        // Leaves the loop when the check fails.
        ktest::expect_once_or_break!(t, suite.test_int % 2 == 0);

        // The same thing spelled out.
        let even = suite.test_int % 2 == 0;
        ktest::expect_once!(t, even);
        if !even {
            break;
        }

        suite.test_int -= 1;
    }
    ktest::assert_zero!(t, suite.test_int);
}

/// A fault in the body is recorded as a failed check.
#[def_test(CustomSuite)]
fn exception_test() {
    ktest::fault::raise("This is a test exception.");
}

pub mod example_ns {
    /// Shares its type name with [`super::CustomSuite`].
    #[derive(Debug, Default)]
    pub struct CustomSuite;

    impl ktest::TestSuite for CustomSuite {}
}

ktest::register_suite!(example_ns::CustomSuite, "example_ns::CustomSuite");

#[def_test(example_ns::CustomSuite)]
fn scoped_test(t: &mut UnitTest) {
    ktest::expect!(t, true);
    ktest::expect!(t, false);
    ktest::expect!(t, true);
    ktest::expect!(t, false);
    ktest::expect!(t, true);
}
