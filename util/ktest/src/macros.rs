// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 KylinSoft Co., Ltd. <https://www.kylinos.cn/>
// See LICENSES for license details.

//! Check macros.
//!
//! Every check takes the running test (`t: &mut UnitTest`) first and comes
//! in three forms:
//!
//! - `assert*` returns from the test body when the check fails;
//! - `expect*` records the outcome and carries on;
//! - `expect*_or_break` breaks out of the enclosing loop on failure.
//!
//! A `_once` check keeps a single record per call site that always reflects
//! the latest evaluation. An `_all` check adds a record per evaluation and
//! needs the `alloc` feature; without it, using one is a compile error. The
//! unsuffixed checks are `_all` with `alloc` and `_once` without.
//!
//! The comparison families are `zero`, `nonzero`, `eq`, `ne`, `lt`, `gt`,
//! `le` and `ge`, e.g. `assert_lt_once!(t, i, 100)`.

#[doc(hidden)]
#[macro_export]
macro_rules! __ktest_once {
    ($t:expr, $kind:ident, $outcome:expr, $text:expr) => {{
        static __KTEST_SITE: $crate::CallSite =
            $crate::CallSite::new($crate::CheckKind::$kind, $text, file!(), line!());
        let __ktest_outcome: bool = $outcome;
        $crate::UnitTest::evaluate_once($t, &__KTEST_SITE, __ktest_outcome)
    }};
}

#[cfg(feature = "alloc")]
#[doc(hidden)]
#[macro_export]
macro_rules! __ktest_all {
    ($t:expr, $kind:ident, $outcome:expr, $text:expr) => {{
        static __KTEST_SITE: $crate::CallSite =
            $crate::CallSite::new($crate::CheckKind::$kind, $text, file!(), line!());
        let __ktest_outcome: bool = $outcome;
        $crate::UnitTest::evaluate_all($t, &__KTEST_SITE, __ktest_outcome)
    }};
}

#[cfg(not(feature = "alloc"))]
#[doc(hidden)]
#[macro_export]
macro_rules! __ktest_all {
    ($($tt:tt)*) => {
        compile_error!("`_all` checks are unavailable without the `alloc` feature of ktest")
    };
}

#[cfg(feature = "alloc")]
#[doc(hidden)]
#[macro_export]
macro_rules! __ktest_default {
    ($($tt:tt)*) => {
        $crate::__ktest_all!($($tt)*)
    };
}

#[cfg(not(feature = "alloc"))]
#[doc(hidden)]
#[macro_export]
macro_rules! __ktest_default {
    ($($tt:tt)*) => {
        $crate::__ktest_once!($($tt)*)
    };
}

/// Dispatches a check to its flavour and applies the failure action.
#[doc(hidden)]
#[macro_export]
macro_rules! __ktest_check {
    (assert, $flavour:ident, $($args:tt)*) => {{
        if !$crate::__ktest_check!(@record $flavour, $($args)*) {
            return;
        }
    }};
    (expect, $flavour:ident, $($args:tt)*) => {{
        let _ = $crate::__ktest_check!(@record $flavour, $($args)*);
    }};
    (expect_or_break, $flavour:ident, $($args:tt)*) => {{
        if !$crate::__ktest_check!(@record $flavour, $($args)*) {
            break;
        }
    }};
    (@record once, $($args:tt)*) => {
        $crate::__ktest_once!($($args)*)
    };
    (@record all, $($args:tt)*) => {
        $crate::__ktest_all!($($args)*)
    };
    (@record default, $($args:tt)*) => {
        $crate::__ktest_default!($($args)*)
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __ktest_compare {
    ($action:ident, $flavour:ident, $t:expr, $kind:ident, $a:expr, $op:tt, $b:expr) => {
        $crate::__ktest_check!(
            $action,
            $flavour,
            $t,
            $kind,
            ($a) $op ($b),
            concat!(stringify!($a), " ", stringify!($op), " ", stringify!($b))
        )
    };
}

// Boolean checks.

/// Fails the test and returns from the body when `cond` is false.
///
/// ```ignore
/// ktest::assert!(t, frames.len() > 1);
/// ```
#[macro_export]
macro_rules! assert {
    ($t:expr, $cond:expr $(,)?) => {
        $crate::__ktest_check!(assert, default, $t, Boolean, $cond, stringify!($cond))
    };
}

#[macro_export]
macro_rules! assert_once {
    ($t:expr, $cond:expr $(,)?) => {
        $crate::__ktest_check!(assert, once, $t, Boolean, $cond, stringify!($cond))
    };
}

#[macro_export]
macro_rules! assert_all {
    ($t:expr, $cond:expr $(,)?) => {
        $crate::__ktest_check!(assert, all, $t, Boolean, $cond, stringify!($cond))
    };
}

/// Records whether `cond` holds.
#[macro_export]
macro_rules! expect {
    ($t:expr, $cond:expr $(,)?) => {
        $crate::__ktest_check!(expect, default, $t, Boolean, $cond, stringify!($cond))
    };
}

#[macro_export]
macro_rules! expect_once {
    ($t:expr, $cond:expr $(,)?) => {
        $crate::__ktest_check!(expect, once, $t, Boolean, $cond, stringify!($cond))
    };
}

#[macro_export]
macro_rules! expect_all {
    ($t:expr, $cond:expr $(,)?) => {
        $crate::__ktest_check!(expect, all, $t, Boolean, $cond, stringify!($cond))
    };
}

/// Records whether `cond` holds and breaks out of the enclosing loop if not.
#[macro_export]
macro_rules! expect_or_break {
    ($t:expr, $cond:expr $(,)?) => {
        $crate::__ktest_check!(expect_or_break, default, $t, Boolean, $cond, stringify!($cond))
    };
}

#[macro_export]
macro_rules! expect_once_or_break {
    ($t:expr, $cond:expr $(,)?) => {
        $crate::__ktest_check!(expect_or_break, once, $t, Boolean, $cond, stringify!($cond))
    };
}

#[macro_export]
macro_rules! expect_all_or_break {
    ($t:expr, $cond:expr $(,)?) => {
        $crate::__ktest_check!(expect_or_break, all, $t, Boolean, $cond, stringify!($cond))
    };
}

// `zero` checks.

/// Checks that `value` is zero; returns from the body if not.
#[macro_export]
macro_rules! assert_zero {
    ($t:expr, $value:expr $(,)?) => {
        $crate::__ktest_check!(
            assert,
            default,
            $t,
            Zero,
            ($value) == 0,
            concat!(stringify!($value), " == 0")
        )
    };
}

#[macro_export]
macro_rules! assert_zero_once {
    ($t:expr, $value:expr $(,)?) => {
        $crate::__ktest_check!(
            assert,
            once,
            $t,
            Zero,
            ($value) == 0,
            concat!(stringify!($value), " == 0")
        )
    };
}

#[macro_export]
macro_rules! assert_zero_all {
    ($t:expr, $value:expr $(,)?) => {
        $crate::__ktest_check!(
            assert,
            all,
            $t,
            Zero,
            ($value) == 0,
            concat!(stringify!($value), " == 0")
        )
    };
}

#[macro_export]
macro_rules! expect_zero {
    ($t:expr, $value:expr $(,)?) => {
        $crate::__ktest_check!(
            expect,
            default,
            $t,
            Zero,
            ($value) == 0,
            concat!(stringify!($value), " == 0")
        )
    };
}

#[macro_export]
macro_rules! expect_zero_once {
    ($t:expr, $value:expr $(,)?) => {
        $crate::__ktest_check!(
            expect,
            once,
            $t,
            Zero,
            ($value) == 0,
            concat!(stringify!($value), " == 0")
        )
    };
}

#[macro_export]
macro_rules! expect_zero_all {
    ($t:expr, $value:expr $(,)?) => {
        $crate::__ktest_check!(
            expect,
            all,
            $t,
            Zero,
            ($value) == 0,
            concat!(stringify!($value), " == 0")
        )
    };
}

// `nonzero` checks.

/// Checks that `value` is non-zero; returns from the body if not.
#[macro_export]
macro_rules! assert_nonzero {
    ($t:expr, $value:expr $(,)?) => {
        $crate::__ktest_check!(
            assert,
            default,
            $t,
            NonZero,
            ($value) != 0,
            concat!(stringify!($value), " != 0")
        )
    };
}

#[macro_export]
macro_rules! assert_nonzero_once {
    ($t:expr, $value:expr $(,)?) => {
        $crate::__ktest_check!(
            assert,
            once,
            $t,
            NonZero,
            ($value) != 0,
            concat!(stringify!($value), " != 0")
        )
    };
}

#[macro_export]
macro_rules! assert_nonzero_all {
    ($t:expr, $value:expr $(,)?) => {
        $crate::__ktest_check!(
            assert,
            all,
            $t,
            NonZero,
            ($value) != 0,
            concat!(stringify!($value), " != 0")
        )
    };
}

#[macro_export]
macro_rules! expect_nonzero {
    ($t:expr, $value:expr $(,)?) => {
        $crate::__ktest_check!(
            expect,
            default,
            $t,
            NonZero,
            ($value) != 0,
            concat!(stringify!($value), " != 0")
        )
    };
}

#[macro_export]
macro_rules! expect_nonzero_once {
    ($t:expr, $value:expr $(,)?) => {
        $crate::__ktest_check!(
            expect,
            once,
            $t,
            NonZero,
            ($value) != 0,
            concat!(stringify!($value), " != 0")
        )
    };
}

#[macro_export]
macro_rules! expect_nonzero_all {
    ($t:expr, $value:expr $(,)?) => {
        $crate::__ktest_check!(
            expect,
            all,
            $t,
            NonZero,
            ($value) != 0,
            concat!(stringify!($value), " != 0")
        )
    };
}

// `eq` checks.

/// Checks that `a` equals `b`; returns from the body if not.
#[macro_export]
macro_rules! assert_eq {
    ($t:expr, $a:expr, $b:expr $(,)?) => {
        $crate::__ktest_compare!(assert, default, $t, Eq, $a, ==, $b)
    };
}

#[macro_export]
macro_rules! assert_eq_once {
    ($t:expr, $a:expr, $b:expr $(,)?) => {
        $crate::__ktest_compare!(assert, once, $t, Eq, $a, ==, $b)
    };
}

#[macro_export]
macro_rules! assert_eq_all {
    ($t:expr, $a:expr, $b:expr $(,)?) => {
        $crate::__ktest_compare!(assert, all, $t, Eq, $a, ==, $b)
    };
}

#[macro_export]
macro_rules! expect_eq {
    ($t:expr, $a:expr, $b:expr $(,)?) => {
        $crate::__ktest_compare!(expect, default, $t, Eq, $a, ==, $b)
    };
}

#[macro_export]
macro_rules! expect_eq_once {
    ($t:expr, $a:expr, $b:expr $(,)?) => {
        $crate::__ktest_compare!(expect, once, $t, Eq, $a, ==, $b)
    };
}

#[macro_export]
macro_rules! expect_eq_all {
    ($t:expr, $a:expr, $b:expr $(,)?) => {
        $crate::__ktest_compare!(expect, all, $t, Eq, $a, ==, $b)
    };
}

// `ne` checks.

/// Checks that `a` differs from `b`; returns from the body if not.
#[macro_export]
macro_rules! assert_ne {
    ($t:expr, $a:expr, $b:expr $(,)?) => {
        $crate::__ktest_compare!(assert, default, $t, Ne, $a, !=, $b)
    };
}

#[macro_export]
macro_rules! assert_ne_once {
    ($t:expr, $a:expr, $b:expr $(,)?) => {
        $crate::__ktest_compare!(assert, once, $t, Ne, $a, !=, $b)
    };
}

#[macro_export]
macro_rules! assert_ne_all {
    ($t:expr, $a:expr, $b:expr $(,)?) => {
        $crate::__ktest_compare!(assert, all, $t, Ne, $a, !=, $b)
    };
}

#[macro_export]
macro_rules! expect_ne {
    ($t:expr, $a:expr, $b:expr $(,)?) => {
        $crate::__ktest_compare!(expect, default, $t, Ne, $a, !=, $b)
    };
}

#[macro_export]
macro_rules! expect_ne_once {
    ($t:expr, $a:expr, $b:expr $(,)?) => {
        $crate::__ktest_compare!(expect, once, $t, Ne, $a, !=, $b)
    };
}

#[macro_export]
macro_rules! expect_ne_all {
    ($t:expr, $a:expr, $b:expr $(,)?) => {
        $crate::__ktest_compare!(expect, all, $t, Ne, $a, !=, $b)
    };
}

// `lt` checks.

/// Checks that `a` is less than `b`; returns from the body if not.
#[macro_export]
macro_rules! assert_lt {
    ($t:expr, $a:expr, $b:expr $(,)?) => {
        $crate::__ktest_compare!(assert, default, $t, Lt, $a, <, $b)
    };
}

#[macro_export]
macro_rules! assert_lt_once {
    ($t:expr, $a:expr, $b:expr $(,)?) => {
        $crate::__ktest_compare!(assert, once, $t, Lt, $a, <, $b)
    };
}

#[macro_export]
macro_rules! assert_lt_all {
    ($t:expr, $a:expr, $b:expr $(,)?) => {
        $crate::__ktest_compare!(assert, all, $t, Lt, $a, <, $b)
    };
}

#[macro_export]
macro_rules! expect_lt {
    ($t:expr, $a:expr, $b:expr $(,)?) => {
        $crate::__ktest_compare!(expect, default, $t, Lt, $a, <, $b)
    };
}

#[macro_export]
macro_rules! expect_lt_once {
    ($t:expr, $a:expr, $b:expr $(,)?) => {
        $crate::__ktest_compare!(expect, once, $t, Lt, $a, <, $b)
    };
}

#[macro_export]
macro_rules! expect_lt_all {
    ($t:expr, $a:expr, $b:expr $(,)?) => {
        $crate::__ktest_compare!(expect, all, $t, Lt, $a, <, $b)
    };
}

// `gt` checks.

/// Checks that `a` is greater than `b`; returns from the body if not.
#[macro_export]
macro_rules! assert_gt {
    ($t:expr, $a:expr, $b:expr $(,)?) => {
        $crate::__ktest_compare!(assert, default, $t, Gt, $a, >, $b)
    };
}

#[macro_export]
macro_rules! assert_gt_once {
    ($t:expr, $a:expr, $b:expr $(,)?) => {
        $crate::__ktest_compare!(assert, once, $t, Gt, $a, >, $b)
    };
}

#[macro_export]
macro_rules! assert_gt_all {
    ($t:expr, $a:expr, $b:expr $(,)?) => {
        $crate::__ktest_compare!(assert, all, $t, Gt, $a, >, $b)
    };
}

#[macro_export]
macro_rules! expect_gt {
    ($t:expr, $a:expr, $b:expr $(,)?) => {
        $crate::__ktest_compare!(expect, default, $t, Gt, $a, >, $b)
    };
}

#[macro_export]
macro_rules! expect_gt_once {
    ($t:expr, $a:expr, $b:expr $(,)?) => {
        $crate::__ktest_compare!(expect, once, $t, Gt, $a, >, $b)
    };
}

#[macro_export]
macro_rules! expect_gt_all {
    ($t:expr, $a:expr, $b:expr $(,)?) => {
        $crate::__ktest_compare!(expect, all, $t, Gt, $a, >, $b)
    };
}

// `le` checks.

/// Checks that `a` is at most `b`; returns from the body if not.
#[macro_export]
macro_rules! assert_le {
    ($t:expr, $a:expr, $b:expr $(,)?) => {
        $crate::__ktest_compare!(assert, default, $t, Le, $a, <=, $b)
    };
}

#[macro_export]
macro_rules! assert_le_once {
    ($t:expr, $a:expr, $b:expr $(,)?) => {
        $crate::__ktest_compare!(assert, once, $t, Le, $a, <=, $b)
    };
}

#[macro_export]
macro_rules! assert_le_all {
    ($t:expr, $a:expr, $b:expr $(,)?) => {
        $crate::__ktest_compare!(assert, all, $t, Le, $a, <=, $b)
    };
}

#[macro_export]
macro_rules! expect_le {
    ($t:expr, $a:expr, $b:expr $(,)?) => {
        $crate::__ktest_compare!(expect, default, $t, Le, $a, <=, $b)
    };
}

#[macro_export]
macro_rules! expect_le_once {
    ($t:expr, $a:expr, $b:expr $(,)?) => {
        $crate::__ktest_compare!(expect, once, $t, Le, $a, <=, $b)
    };
}

#[macro_export]
macro_rules! expect_le_all {
    ($t:expr, $a:expr, $b:expr $(,)?) => {
        $crate::__ktest_compare!(expect, all, $t, Le, $a, <=, $b)
    };
}

// `ge` checks.

/// Checks that `a` is at least `b`; returns from the body if not.
#[macro_export]
macro_rules! assert_ge {
    ($t:expr, $a:expr, $b:expr $(,)?) => {
        $crate::__ktest_compare!(assert, default, $t, Ge, $a, >=, $b)
    };
}

#[macro_export]
macro_rules! assert_ge_once {
    ($t:expr, $a:expr, $b:expr $(,)?) => {
        $crate::__ktest_compare!(assert, once, $t, Ge, $a, >=, $b)
    };
}

#[macro_export]
macro_rules! assert_ge_all {
    ($t:expr, $a:expr, $b:expr $(,)?) => {
        $crate::__ktest_compare!(assert, all, $t, Ge, $a, >=, $b)
    };
}

#[macro_export]
macro_rules! expect_ge {
    ($t:expr, $a:expr, $b:expr $(,)?) => {
        $crate::__ktest_compare!(expect, default, $t, Ge, $a, >=, $b)
    };
}

#[macro_export]
macro_rules! expect_ge_once {
    ($t:expr, $a:expr, $b:expr $(,)?) => {
        $crate::__ktest_compare!(expect, once, $t, Ge, $a, >=, $b)
    };
}

#[macro_export]
macro_rules! expect_ge_all {
    ($t:expr, $a:expr, $b:expr $(,)?) => {
        $crate::__ktest_compare!(expect, all, $t, Ge, $a, >=, $b)
    };
}
