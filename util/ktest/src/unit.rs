// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 KylinSoft Co., Ltd. <https://www.kylinos.cn/>
// See LICENSES for license details.

//! The per-run test instance handed to test bodies.

#[cfg(feature = "alloc")]
use alloc::borrow::Cow;
use core::{any::Any, fmt};

use crate::{
    assertion::{Assertion, CallSite},
    descriptor::TestDescriptor,
    error::{KtestError, Result},
    metadata::{MetaValue, MetadataKind, MetadataStore},
    result::TestResult,
};

/// State of one test run: its result chain and metadata.
///
/// Check macros take a `&mut UnitTest` as their first argument.
pub struct UnitTest {
    info: &'static TestDescriptor,
    result: TestResult,
    metadata: MetadataStore,
}

impl UnitTest {
    pub fn new(info: &'static TestDescriptor) -> Self {
        Self {
            info,
            result: TestResult::new(),
            metadata: MetadataStore::new(),
        }
    }

    #[inline]
    pub fn info(&self) -> &'static TestDescriptor {
        self.info
    }

    /// Records `passed` in the single record kept for `site`.
    #[inline]
    pub fn evaluate_once(&mut self, site: &'static CallSite, passed: bool) -> bool {
        self.result.record_once(site, passed)
    }

    /// Records `passed` in a new record.
    #[cfg(feature = "alloc")]
    #[inline]
    pub fn evaluate_all(&mut self, site: &'static CallSite, passed: bool) -> bool {
        self.result.record_all(site, passed)
    }

    pub fn record(&mut self, record: Assertion) {
        self.result.append(record);
    }

    /// Records a failure of the test machinery at the test's location.
    pub fn record_error(&mut self, err: KtestError) {
        warn!("{}: {err}", self.info);
        self.record(Assertion::internal(
            err.message(),
            self.info.file(),
            self.info.line(),
        ));
    }

    /// Records a contained fault at the test's location.
    #[cfg(feature = "alloc")]
    pub fn record_fault(&mut self, message: impl Into<Cow<'static, str>>) {
        let record = Assertion::fault(message, self.info.file(), self.info.line());
        debug!("{}: {}", self.info, record.message());
        self.record(record);
    }

    pub fn attach(&mut self, name: &'static str, value: impl Into<MetaValue>) -> Result<()> {
        self.metadata.attach(MetadataKind::User, name, value)
    }

    pub fn attach_internal(
        &mut self,
        name: &'static str,
        value: impl Into<MetaValue>,
    ) -> Result<()> {
        self.metadata.attach(MetadataKind::Internal, name, value)
    }

    pub fn lookup<T: Any>(&self, name: &str) -> Option<&T> {
        self.metadata.lookup(MetadataKind::User, name)
    }

    pub fn lookup_mut<T: Any>(&mut self, name: &str) -> Option<&mut T> {
        self.metadata.lookup_mut(MetadataKind::User, name)
    }

    pub fn lookup_internal<T: Any>(&self, name: &str) -> Option<&T> {
        self.metadata.lookup(MetadataKind::Internal, name)
    }

    pub fn detach(&mut self, name: &str) -> Option<MetaValue> {
        self.metadata.detach(MetadataKind::User, name)
    }

    /// Attaches `name` for the duration of `f`.
    ///
    /// The item attached here is detached when `f` returns. Items `f`
    /// attaches under the same name are kept.
    pub fn with_metadata<R>(
        &mut self,
        name: &'static str,
        value: impl Into<MetaValue>,
        f: impl FnOnce(&mut Self) -> R,
    ) -> Result<R> {
        let index = self.metadata.items(MetadataKind::User).len();
        self.attach(name, value)?;
        let out = f(self);
        let still_ours = self
            .metadata
            .items(MetadataKind::User)
            .get(index)
            .is_some_and(|item| item.name == name);
        if still_ours {
            self.metadata.detach_at(MetadataKind::User, index);
        }
        Ok(out)
    }

    #[inline]
    pub fn metadata(&self) -> &MetadataStore {
        &self.metadata
    }

    #[inline]
    pub fn metadata_mut(&mut self) -> &mut MetadataStore {
        &mut self.metadata
    }

    #[inline]
    pub fn result(&self) -> &TestResult {
        &self.result
    }
}

impl fmt::Debug for UnitTest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UnitTest")
            .field("test", &format_args!("{}", self.info))
            .field("result", &self.result)
            .field("metadata", &self.metadata)
            .finish()
    }
}
