// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 KylinSoft Co., Ltd. <https://www.kylinos.cn/>
// See LICENSES for license details.

use ktest::{UnitTest, def_test};

use super::{Expect, expect};

#[derive(Debug, Default)]
struct AssertionSuite;

impl ktest::TestSuite for AssertionSuite {}

ktest::register_suite!(AssertionSuite, "_AssertionSuite");

fn count(t: &UnitTest) -> usize {
    t.result().len()
}

#[def_test(AssertionSuite)]
fn assert_pass(t: &mut UnitTest) {
    ktest::assert!(t, 1 == 1);
}

#[def_test(AssertionSuite)]
fn assert_fail(t: &mut UnitTest) {
    expect(t, Expect::AllFail);
    ktest::assert!(t, 1 != 1);
}

#[def_test(AssertionSuite)]
fn assert_stops_the_test(t: &mut UnitTest) {
    expect(t, Expect::AllFail);
    ktest::assert!(t, 1 != 1);
    ktest::expect!(t, true);
}

#[def_test(AssertionSuite)]
fn assertion_count_once_and_all(t: &mut UnitTest) {
    ktest::expect_once!(t, true);
    ktest::expect_eq_once!(t, count(t), 1);
    ktest::expect_eq_once!(t, count(t), 2);
    ktest::expect_eq_all!(t, count(t), 3);
    ktest::expect_eq_all!(t, count(t), 4);
}

#[def_test(AssertionSuite)]
fn assertion_count_in_loop(t: &mut UnitTest) {
    ktest::assert_once!(t, true);
    ktest::assert_eq_once!(t, count(t), 1);

    for _ in 0..10 {
        ktest::assert_all!(t, true);
    }
    ktest::assert_eq_once!(t, count(t), 12);
    ktest::assert_eq_all!(t, count(t), 13);
    ktest::assert_eq_all!(t, count(t), 14);
}

#[def_test(AssertionSuite)]
fn once_keeps_last_iteration(t: &mut UnitTest) {
    for i in 0..10 {
        ktest::expect_lt_once!(t, i, 100);
    }
    ktest::expect_eq_once!(t, count(t), 1);
}

#[def_test(AssertionSuite)]
fn assert_all_pass(t: &mut UnitTest) {
    for i in 0..100 {
        ktest::assert_all!(t, i < 100);
    }
}

#[def_test(AssertionSuite)]
fn assert_all_fail(t: &mut UnitTest) {
    expect(t, Expect::AllFail);
    for i in 0..10 {
        ktest::assert_all!(t, i < 0);
    }
}

#[def_test(AssertionSuite)]
fn expect_all_fail(t: &mut UnitTest) {
    expect(t, Expect::AllFail);
    for i in 0..10 {
        ktest::expect_all!(t, i < 0);
    }
}

#[def_test(AssertionSuite)]
fn expect_all_some_fail(t: &mut UnitTest) {
    expect(t, Expect::SomeFail);
    for i in 0..10 {
        ktest::expect_all!(t, i < 5);
    }
}

#[def_test(AssertionSuite)]
fn expect_or_break_leaves_loop(t: &mut UnitTest) {
    expect(t, Expect::SomeFail);
    let mut iterations = 0;
    for i in 0..10 {
        ktest::expect_all_or_break!(t, i < 3);
        iterations += 1;
    }
    ktest::expect_eq_once!(t, iterations, 3);
}

#[def_test(AssertionSuite)]
fn zero_checks(t: &mut UnitTest) {
    ktest::assert_zero!(t, 0);
    ktest::expect_zero!(t, 0u64);
    ktest::assert_nonzero!(t, 1);
    ktest::expect_nonzero!(t, -1);
}

#[def_test(AssertionSuite)]
fn zero_fail(t: &mut UnitTest) {
    expect(t, Expect::AllFail);
    ktest::expect_zero!(t, 1);
    ktest::assert_nonzero!(t, 0);
}

#[def_test(AssertionSuite)]
fn comparison_checks(t: &mut UnitTest) {
    ktest::assert_eq!(t, 1, 1);
    ktest::assert_ne!(t, 1, 2);
    ktest::assert_lt!(t, 1, 2);
    ktest::assert_gt!(t, 2, 1);
    ktest::assert_le!(t, 1, 2);
    ktest::assert_le!(t, 2, 2);
    ktest::assert_ge!(t, 2, 2);
    ktest::assert_ge!(t, 3, 2);
    ktest::expect_eq!(t, "ab", "ab");
    ktest::expect_lt!(t, 1.5, 2.0);
}

#[def_test(AssertionSuite)]
fn comparison_fail(t: &mut UnitTest) {
    expect(t, Expect::AllFail);
    ktest::expect_eq!(t, 1, 2);
    ktest::expect_ne!(t, 1, 1);
    ktest::expect_lt!(t, 2, 1);
    ktest::expect_lt!(t, 1, 1);
    ktest::expect_gt!(t, 1, 2);
    ktest::expect_gt!(t, 1, 1);
    ktest::expect_le!(t, 3, 2);
    ktest::expect_ge!(t, 1, 2);
}

#[def_test(AssertionSuite)]
fn failure_messages(t: &mut UnitTest) {
    expect(t, Expect::SomeFail);
    ktest::expect_lt!(t, 2, 1);
    let message = t.result().final_failure().map(|record| record.message().to_owned());
    ktest::expect_eq!(
        t,
        message.as_deref(),
        Some("The first value was not less than the second.")
    );
}

#[def_test(AssertionSuite, ignore)]
fn ignored(t: &mut UnitTest) {
    ktest::assert!(t, false);
}
