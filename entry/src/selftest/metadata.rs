// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 KylinSoft Co., Ltd. <https://www.kylinos.cn/>
// See LICENSES for license details.

use ktest::{MetaValue, UnitTest, def_test};

#[derive(Debug, Default)]
struct MetadataSuite;

impl ktest::TestSuite for MetadataSuite {}

ktest::register_suite!(MetadataSuite, "_MetadataSuite");

#[derive(Debug, Clone, PartialEq, Eq)]
struct Coffee {
    beans: u64,
}

impl Default for Coffee {
    fn default() -> Self {
        Self { beans: 0xC0FFEE }
    }
}

static TABLE: [u32; 3] = [1, 3, 5];

#[def_test(MetadataSuite)]
fn no_metadata(t: &mut UnitTest) {
    ktest::expect!(t, t.lookup::<i64>("").is_none());
    ktest::expect!(t, t.lookup::<i64>("value").is_none());
}

#[def_test(MetadataSuite)]
fn get_metadata(t: &mut UnitTest) {
    ktest::assert_eq_once!(t, t.attach("value", 0xC0FFEE_i64).is_ok(), true);

    ktest::expect!(t, t.lookup::<i64>("").is_none());
    ktest::expect_eq!(t, t.lookup::<i64>("value"), Some(&0xC0FFEE));
    ktest::expect_eq!(
        t,
        t.metadata().items(ktest::MetadataKind::User)[0].name,
        "value"
    );
}

#[def_test(MetadataSuite)]
fn set_metadata(t: &mut UnitTest) {
    ktest::assert!(t, t.attach("value", 0_i64).is_ok());
    ktest::expect_eq!(t, t.lookup::<i64>("value"), Some(&0));

    if let Some(value) = t.lookup_mut::<i64>("value") {
        *value = 0xC0FFEE;
    }
    ktest::expect_eq!(t, t.lookup::<i64>("value"), Some(&0xC0FFEE));
}

#[def_test(MetadataSuite)]
fn multiple_metadata(t: &mut UnitTest) {
    ktest::assert!(t, t.attach("m1", true).is_ok());
    ktest::assert!(t, t.attach("m2", 0xC0FFEE_i64).is_ok());
    ktest::assert!(t, t.attach("m3", MetaValue::owned(Coffee::default())).is_ok());
    ktest::assert!(t, t.attach("m4", MetaValue::Static(&TABLE)).is_ok());

    ktest::expect_eq!(t, t.lookup::<bool>("m1"), Some(&true));
    ktest::expect_eq!(t, t.lookup::<i64>("m2"), Some(&0xC0FFEE));
    ktest::expect_eq!(t, t.lookup::<Coffee>("m3").map(|c| c.beans), Some(0xC0FFEE));
    ktest::expect_eq!(t, t.lookup::<[u32; 3]>("m4"), Some(&[1, 3, 5]));
}

#[def_test(MetadataSuite)]
fn wrong_type_is_none(t: &mut UnitTest) {
    ktest::assert!(t, t.attach("value", 7_u64).is_ok());
    ktest::expect!(t, t.lookup::<i64>("value").is_none());
    ktest::expect!(t, t.lookup::<u64>("value").is_some());
}

#[def_test(MetadataSuite)]
fn newest_item_shadows(t: &mut UnitTest) {
    ktest::assert!(t, t.attach("level", 1_i64).is_ok());
    ktest::assert!(t, t.attach("level", 2_i64).is_ok());
    ktest::expect_eq!(t, t.lookup::<i64>("level"), Some(&2));

    ktest::expect!(t, t.detach("level").is_some());
    ktest::expect_eq!(t, t.lookup::<i64>("level"), Some(&1));
}

#[def_test(MetadataSuite)]
fn scoped_metadata(t: &mut UnitTest) {
    let inside = t.with_metadata("scope", "inner", |t| {
        t.lookup::<&'static str>("scope").copied()
    });
    ktest::expect_eq!(t, inside, Ok(Some("inner")));
    ktest::expect!(t, t.lookup::<&'static str>("scope").is_none());
}

#[def_test(MetadataSuite)]
fn internal_list_is_separate(t: &mut UnitTest) {
    ktest::assert!(t, t.attach_internal("hidden", true).is_ok());
    ktest::expect!(t, t.lookup::<bool>("hidden").is_none());
    ktest::expect_eq!(t, t.lookup_internal::<bool>("hidden"), Some(&true));
}
