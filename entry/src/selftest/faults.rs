// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 KylinSoft Co., Ltd. <https://www.kylinos.cn/>
// See LICENSES for license details.

use ktest::{Fault, TestSuite, UnitTest, def_test};

use super::{Expect, expect};

#[derive(Debug, Default)]
struct FaultSuite;

impl TestSuite for FaultSuite {}

ktest::register_suite!(FaultSuite, "_FaultSuite");

#[def_test(FaultSuite)]
fn typed_fault(t: &mut UnitTest) {
    expect(t, Expect::AllFail);
    std::panic::panic_any(Fault::new("typed"));
}

#[def_test(FaultSuite)]
fn fault_after_checks(t: &mut UnitTest) {
    expect(t, Expect::SomeFail);
    ktest::expect!(t, true);
    let values: Vec<u32> = Vec::new();
    let value = values[3];
    ktest::expect_zero!(t, value);
}

#[def_test(FaultSuite, should_fault)]
fn expected_fault() {
    panic!("expected");
}

#[def_test(FaultSuite, should_fault)]
fn missing_fault(t: &mut UnitTest) {
    expect(t, Expect::AllFail);
}
