// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 KylinSoft Co., Ltd. <https://www.kylinos.cn/>
// See LICENSES for license details.

//! Static test descriptors.

use core::{any::Any, fmt};

use crate::{
    error::Result,
    instance::InstanceSlot,
    list::{Link, Linked},
    metadata::MetadataKind,
    suite::{SuiteDescriptor, TestSuite},
    unit::UnitTest,
};

/// Entry point generated for each test. Receives the live suite instance.
pub type TestBody = fn(&mut dyn TestSuite, &mut UnitTest);

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TestFlags {
    /// Counted but not run.
    pub ignore: bool,
    /// The test passes only if its body faults.
    pub should_fault: bool,
}

impl TestFlags {
    pub const NONE: Self = Self::new(false, false);

    pub const fn new(ignore: bool, should_fault: bool) -> Self {
        Self {
            ignore,
            should_fault,
        }
    }
}

/// A registered test. Lives in a `static` emitted by
/// [`def_test`](crate::def_test).
pub struct TestDescriptor {
    name: &'static str,
    suite: fn() -> &'static SuiteDescriptor,
    file: &'static str,
    line: u32,
    body: TestBody,
    flags: TestFlags,
    instance: InstanceSlot<UnitTest>,
    link: Link<TestDescriptor>,
}

impl TestDescriptor {
    pub const fn new(
        name: &'static str,
        suite: fn() -> &'static SuiteDescriptor,
        file: &'static str,
        line: u32,
        body: TestBody,
        flags: TestFlags,
    ) -> Self {
        Self {
            name,
            suite,
            file,
            line,
            body,
            flags,
            instance: InstanceSlot::new(),
            link: Link::new(),
        }
    }

    #[inline]
    pub fn name(&self) -> &'static str {
        self.name
    }

    #[inline]
    pub fn suite(&self) -> &'static SuiteDescriptor {
        (self.suite)()
    }

    #[inline]
    pub fn file(&self) -> &'static str {
        self.file
    }

    #[inline]
    pub fn line(&self) -> u32 {
        self.line
    }

    #[inline]
    pub fn body(&self) -> TestBody {
        self.body
    }

    #[inline]
    pub fn flags(&self) -> TestFlags {
        self.flags
    }

    #[inline]
    pub fn is_ignored(&self) -> bool {
        self.flags.ignore
    }

    #[inline]
    pub fn should_fault(&self) -> bool {
        self.flags.should_fault
    }

    /// Slot of the per-run [`UnitTest`].
    #[inline]
    pub fn instance(&self) -> &InstanceSlot<UnitTest> {
        &self.instance
    }

    /// Runs `f` on the live test instance.
    pub fn with_instance<R>(&self, f: impl FnOnce(&mut UnitTest) -> R) -> Result<R> {
        self.instance.with(f)
    }

    /// Reads user metadata left by the last run.
    ///
    /// Valid from inside the completion handler, while the test instance is
    /// still live.
    pub fn metadata<T: Any + Clone>(&self, name: &str) -> Option<T> {
        self.read_metadata(MetadataKind::User, name)
    }

    pub fn internal_metadata<T: Any + Clone>(&self, name: &str) -> Option<T> {
        self.read_metadata(MetadataKind::Internal, name)
    }

    fn read_metadata<T: Any + Clone>(&self, kind: MetadataKind, name: &str) -> Option<T> {
        self.instance
            .with(|unit| unit.metadata().lookup::<T>(kind, name).cloned())
            .ok()
            .flatten()
    }
}

impl Linked for TestDescriptor {
    fn link(&self) -> &Link<Self> {
        &self.link
    }
}

impl fmt::Debug for TestDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TestDescriptor")
            .field("suite", &self.suite().name())
            .field("name", &self.name)
            .field("file", &self.file)
            .field("line", &self.line)
            .field("flags", &self.flags)
            .finish()
    }
}

impl fmt::Display for TestDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}::{}", self.suite().name(), self.name)
    }
}
