// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 KylinSoft Co., Ltd. <https://www.kylinos.cn/>
// See LICENSES for license details.

//! Suite types and their descriptors.

use core::{any::Any, fmt};

use crate::{
    descriptor::TestDescriptor,
    error::{KtestError, Result},
    instance::{SuiteHandle, SuiteStorage},
    list::{Iter, Link, Linked, StaticList},
};

pub trait AsAny: Any {
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: Any> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// State shared by the tests of one suite.
///
/// `set_up` runs before and `tear_down` after every test of the suite, on
/// the suite's single live instance.
pub trait TestSuite: AsAny + Send {
    fn set_up(&mut self) {}

    fn tear_down(&mut self) {}
}

pub fn downcast_suite<S: TestSuite>(suite: &mut dyn TestSuite) -> Option<&mut S> {
    AsAny::as_any_mut(suite).downcast_mut()
}

/// A suite type with a registered descriptor. Implemented by
/// [`register_suite!`](crate::register_suite).
pub trait SuiteType: TestSuite + Default {
    fn descriptor() -> &'static SuiteDescriptor;
}

pub struct SuiteDescriptor {
    name: &'static str,
    storage: &'static dyn SuiteStorage,
    tests: StaticList<TestDescriptor>,
    link: Link<SuiteDescriptor>,
}

impl SuiteDescriptor {
    pub const fn new(name: &'static str, storage: &'static dyn SuiteStorage) -> Self {
        Self {
            name,
            storage,
            tests: StaticList::new(),
            link: Link::new(),
        }
    }

    #[inline]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Tests of this suite in registration order.
    pub fn tests(&self) -> Iter<TestDescriptor> {
        crate::registry::init();
        self.tests.iter()
    }

    pub fn find_test(&self, name: &str) -> Option<&'static TestDescriptor> {
        self.tests().find(|test| test.name() == name)
    }

    pub fn test_count(&self) -> usize {
        crate::registry::init();
        self.tests.len()
    }

    pub(crate) fn link_test(&self, test: &'static TestDescriptor) -> bool {
        self.tests.push(test)
    }

    /// Constructs the suite instance unless it is live.
    pub fn construct(&self) -> Result<bool> {
        self.storage.construct()
    }

    pub fn destruct(&self) -> Result<bool> {
        self.storage.destruct()
    }

    pub fn is_live(&self) -> bool {
        self.storage.is_live()
    }

    pub fn acquire(&'static self) -> Result<SuiteHandle> {
        SuiteHandle::acquire(self)
    }

    /// Runs `f` on the live suite instance.
    pub fn with_instance<R>(&self, f: impl FnOnce(&mut dyn TestSuite) -> R) -> Result<R> {
        let mut f = Some(f);
        let mut out = None;
        self.storage.with_suite(&mut |suite| {
            if let Some(f) = f.take() {
                out = Some(f(suite));
            }
        })?;
        out.ok_or(KtestError::Empty)
    }
}

impl Linked for SuiteDescriptor {
    fn link(&self) -> &Link<Self> {
        &self.link
    }
}

impl fmt::Debug for SuiteDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SuiteDescriptor")
            .field("name", &self.name)
            .field("tests", &self.tests.len())
            .field("live", &self.is_live())
            .finish()
    }
}

impl fmt::Display for SuiteDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// Registers a suite type.
///
/// The type must implement [`TestSuite`] and `Default`. The suite name
/// defaults to the type name.
///
/// ```ignore
/// #[derive(Default)]
/// struct Network;
/// impl ktest::TestSuite for Network {}
/// ktest::register_suite!(Network);
/// ktest::register_suite!(drivers::Block, "drivers::Block");
/// ```
#[macro_export]
macro_rules! register_suite {
    ($suite:ident) => {
        $crate::register_suite!($suite, stringify!($suite));
    };
    ($suite:ty, $name:expr) => {
        impl $crate::SuiteType for $suite {
            fn descriptor() -> &'static $crate::SuiteDescriptor {
                static SLOT: $crate::InstanceSlot<$suite> = $crate::InstanceSlot::new();
                static DESCRIPTOR: $crate::SuiteDescriptor =
                    $crate::SuiteDescriptor::new($name, &SLOT);
                &DESCRIPTOR
            }
        }
    };
}

/// Declares and registers a suite type without state or hooks.
#[macro_export]
macro_rules! test_suite {
    ($(#[$meta:meta])* $vis:vis $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Default)]
        $vis struct $name;

        impl $crate::TestSuite for $name {}

        $crate::register_suite!($name);
    };
}

/// Suite of tests declared without one.
#[derive(Debug, Default)]
pub struct DefaultSuite;

impl TestSuite for DefaultSuite {}

register_suite!(DefaultSuite, "default");

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Default)]
    struct Counter {
        value: u32,
    }

    impl TestSuite for Counter {
        fn set_up(&mut self) {
            self.value = 4;
        }
    }

    register_suite!(Counter);

    test_suite!(Marker);

    #[test]
    fn test_descriptor_is_unique_per_type() {
        assert!(core::ptr::eq(Counter::descriptor(), Counter::descriptor()));
        assert_eq!(Counter::descriptor().name(), "Counter");
        assert_eq!(Marker::descriptor().name(), "Marker");
        assert_eq!(DefaultSuite::descriptor().name(), "default");
    }

    #[test]
    fn test_instance_roundtrip_through_descriptor() {
        let suite = Counter::descriptor();
        assert!(!suite.is_live());
        {
            let handle = suite.acquire().unwrap();
            assert!(handle.owns_instance());
            let value = handle
                .with(|instance| {
                    instance.set_up();
                    downcast_suite::<Counter>(instance).map(|c| c.value)
                })
                .unwrap();
            assert_eq!(value, Some(4));
            assert!(
                suite
                    .with_instance(|instance| downcast_suite::<Marker>(instance).is_none())
                    .unwrap()
            );
        }
        assert!(!suite.is_live());
    }
}
