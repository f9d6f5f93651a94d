// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 KylinSoft Co., Ltd. <https://www.kylinos.cn/>
// See LICENSES for license details.

use ktest::{TestResult, UnitTest, def_test};

use super::{Expect, expect};

#[derive(Debug, Default)]
struct ResultSuite;

impl ktest::TestSuite for ResultSuite {}

ktest::register_suite!(ResultSuite, "_ResultSuite");

#[def_test(ResultSuite)]
fn result_correct(t: &mut UnitTest) {
    expect(t, Expect::SomeFail);

    // A fresh result succeeds vacuously.
    ktest::expect!(t, t.result().is_empty());
    ktest::expect!(t, t.result().succeeded());
    ktest::expect!(t, t.result().first_failure().is_none());
    ktest::expect!(t, t.result().final_failure().is_none());

    // The first failure is also the final one.
    ktest::expect!(t, false);
    let first = t.result().first_failure_index();
    ktest::expect_eq!(t, first, Some(4));
    ktest::expect!(t, !t.result().succeeded());
    ktest::expect_eq!(t, t.result().final_failure_index(), first);

    // A second failure becomes the final one.
    ktest::expect_eq!(t, 1, 2);
    let last = t.result().final_failure_index();
    ktest::expect_eq!(t, t.result().first_failure_index(), first);
    ktest::expect!(t, last > first);
    ktest::expect_ne!(t, t.result().first_failure_index(), last);
    let messages = t
        .result()
        .first_failure()
        .zip(t.result().final_failure())
        .map(|(first, last)| (first.message().to_owned(), last.message().to_owned()));
    ktest::expect_eq!(
        t,
        messages,
        Some((
            String::from("The assertion failed."),
            String::from("Expected equal values.")
        ))
    );
}

#[def_test(ResultSuite)]
fn clone_shares_records(t: &mut UnitTest) {
    ktest::expect!(t, true);
    let copy = t.result().clone();
    ktest::expect!(t, copy.shares_with(t.result()));
    ktest::expect_eq!(t, copy.len(), t.result().len());

    // Records added after the copy are visible through it.
    let before = copy.len();
    ktest::expect!(t, true);
    ktest::expect_eq!(t, copy.len(), before + 1);
}

#[def_test(ResultSuite)]
fn take_leaves_empty(t: &mut UnitTest) {
    let mut source = t.result().clone();
    ktest::expect!(t, true);

    let moved = source.take();
    ktest::expect!(t, source.is_empty());
    ktest::expect!(t, source.succeeded());
    ktest::expect!(t, !source.shares_with(t.result()));
    ktest::expect!(t, moved.shares_with(t.result()));

    let fresh = TestResult::new();
    ktest::expect_eq!(t, fresh.share_count(), 1);
}
