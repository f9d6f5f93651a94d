// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 KylinSoft Co., Ltd. <https://www.kylinos.cn/>
// See LICENSES for license details.

//! Result chains and the [`TestResult`] handle.
//!
//! A chain keeps records in evaluation order. Persistent records are found by
//! their call site, overwritten and moved to the end; transient records are
//! appended on every evaluation.

#[cfg(feature = "alloc")]
use alloc::{sync::Arc, vec::Vec};
use core::{fmt, mem, ptr};

use arrayvec::ArrayVec;
#[cfg(feature = "alloc")]
use spin::RwLock;

#[cfg(not(feature = "alloc"))]
use crate::config::CHAIN_CAPACITY;
use crate::{
    assertion::{Assertion, CallSite, Storage},
    config::LOST_SITE_CAPACITY,
    store::Slots,
};

#[cfg(feature = "alloc")]
pub type RecordSlots = Vec<Assertion>;
#[cfg(not(feature = "alloc"))]
pub type RecordSlots = ArrayVec<Assertion, CHAIN_CAPACITY>;

/// The ordered records of one test run.
///
/// When the store is full a failing record takes the place of the oldest
/// passing one. A persistent failure that still finds no room is remembered
/// by call site until that site passes again, and is put back in the chain
/// as soon as a passing record can make way for it.
#[derive(Clone, Default)]
pub struct Chain<S = RecordSlots> {
    records: S,
    dropped: usize,
    dropped_failures: usize,
    lost_sites: ArrayVec<&'static CallSite, LOST_SITE_CAPACITY>,
}

impl<S: Slots<Assertion>> Chain<S> {
    /// Records `passed` in the persistent record of `site`.
    pub fn record_once(&mut self, site: &'static CallSite, passed: bool) -> bool {
        let existing = self
            .records
            .as_slice()
            .iter()
            .position(|record| record.is_persistent_for(site));
        let record = match existing.and_then(|index| self.records.remove(index)) {
            Some(mut record) => {
                record.set_passed(passed);
                record
            }
            None => Assertion::from_site(site, Storage::Persistent, passed),
        };
        self.append(record);
        passed
    }

    /// Appends a fresh transient record for `site`.
    #[cfg(feature = "alloc")]
    pub fn record_all(&mut self, site: &'static CallSite, passed: bool) -> bool {
        self.append(Assertion::from_site(site, Storage::Transient, passed));
        passed
    }

    pub fn append(&mut self, record: Assertion) {
        let site = record.persistent_site();
        let rejected = match self.records.push(record) {
            Ok(()) => None,
            Err(record) => self.make_room(record),
        };
        match rejected {
            Some(record) => self.lose(record),
            None => {
                if let Some(site) = site {
                    self.forget_lost(site);
                }
                self.restore_lost();
            }
        }
    }

    /// Retries a rejected failing record after evicting a passing one.
    fn make_room(&mut self, record: Assertion) -> Option<Assertion> {
        if !record.passed() && self.evict_passing() {
            self.records.push(record).err()
        } else {
            Some(record)
        }
    }

    /// Drops the oldest passing record. False if every record failed.
    fn evict_passing(&mut self) -> bool {
        let oldest = self.records.as_slice().iter().position(Assertion::passed);
        match oldest.and_then(|index| self.records.remove(index)) {
            Some(_) => {
                self.dropped += 1;
                true
            }
            None => false,
        }
    }

    fn lose(&mut self, record: Assertion) {
        self.dropped += 1;
        match (record.persistent_site(), record.passed()) {
            (Some(site), true) => self.forget_lost(site),
            (Some(site), false) => {
                let known = self.lost_sites.iter().any(|s| ptr::eq(*s, site));
                if !known && self.lost_sites.try_push(site).is_err() {
                    self.dropped_failures += 1;
                }
            }
            (None, false) => self.dropped_failures += 1,
            (None, true) => {}
        }
        warn!(
            "result chain full, dropped record for {}:{}",
            record.file(),
            record.line()
        );
    }

    fn forget_lost(&mut self, site: &'static CallSite) {
        self.lost_sites.retain(|s| !ptr::eq(*s, site));
    }

    /// Puts remembered failures back in place of passing records.
    fn restore_lost(&mut self) {
        while let Some(&site) = self.lost_sites.last() {
            if !self.evict_passing() {
                break;
            }
            self.lost_sites.pop();
            let record = Assertion::from_site(site, Storage::Persistent, false);
            if self.records.push(record).is_err() {
                self.dropped_failures += 1;
            }
        }
    }

    /// True iff no failure is recorded or lost. Vacuously true when empty.
    pub fn succeeded(&self) -> bool {
        self.dropped_failures == 0
            && self.lost_sites.is_empty()
            && self.records().iter().all(Assertion::passed)
    }

    pub fn first_failure_index(&self) -> Option<usize> {
        self.records().iter().position(|r| !r.passed())
    }

    pub fn final_failure_index(&self) -> Option<usize> {
        self.records().iter().rposition(|r| !r.passed())
    }

    pub fn first_failure(&self) -> Option<&Assertion> {
        self.first_failure_index().map(|i| &self.records()[i])
    }

    pub fn final_failure(&self) -> Option<&Assertion> {
        self.final_failure_index().map(|i| &self.records()[i])
    }

    #[inline]
    pub fn records(&self) -> &[Assertion] {
        self.records.as_slice()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records lost to a full fixed store.
    #[inline]
    pub fn dropped(&self) -> usize {
        self.dropped
    }

    pub fn clear(&mut self) {
        self.records.clear();
        self.dropped = 0;
        self.dropped_failures = 0;
        self.lost_sites.clear();
    }
}

/// Handle to the result chain of one test run.
///
/// With `alloc` the chain is reference counted: cloning a result shares the
/// records, which are freed when the last handle is dropped. Without `alloc`
/// cloning copies the chain.
#[derive(Clone, Default)]
pub struct TestResult {
    #[cfg(feature = "alloc")]
    chain: Arc<RwLock<Chain>>,
    #[cfg(not(feature = "alloc"))]
    chain: Chain,
}

impl TestResult {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(feature = "alloc")]
    fn read<R>(&self, f: impl FnOnce(&Chain) -> R) -> R {
        f(&*self.chain.read())
    }

    #[cfg(not(feature = "alloc"))]
    fn read<R>(&self, f: impl FnOnce(&Chain) -> R) -> R {
        f(&self.chain)
    }

    #[cfg(feature = "alloc")]
    fn write<R>(&mut self, f: impl FnOnce(&mut Chain) -> R) -> R {
        f(&mut *self.chain.write())
    }

    #[cfg(not(feature = "alloc"))]
    fn write<R>(&mut self, f: impl FnOnce(&mut Chain) -> R) -> R {
        f(&mut self.chain)
    }

    /// Once-semantics evaluation. Returns `passed`.
    pub fn record_once(&mut self, site: &'static CallSite, passed: bool) -> bool {
        self.write(|chain| chain.record_once(site, passed))
    }

    /// All-semantics evaluation. Returns `passed`.
    #[cfg(feature = "alloc")]
    pub fn record_all(&mut self, site: &'static CallSite, passed: bool) -> bool {
        self.write(|chain| chain.record_all(site, passed))
    }

    pub fn append(&mut self, record: Assertion) {
        self.write(|chain| chain.append(record))
    }

    pub fn succeeded(&self) -> bool {
        self.read(Chain::succeeded)
    }

    pub fn first_failure(&self) -> Option<Assertion> {
        self.read(|chain| chain.first_failure().cloned())
    }

    pub fn final_failure(&self) -> Option<Assertion> {
        self.read(|chain| chain.final_failure().cloned())
    }

    pub fn first_failure_index(&self) -> Option<usize> {
        self.read(Chain::first_failure_index)
    }

    pub fn final_failure_index(&self) -> Option<usize> {
        self.read(Chain::final_failure_index)
    }

    pub fn len(&self) -> usize {
        self.read(Chain::len)
    }

    pub fn is_empty(&self) -> bool {
        self.read(Chain::is_empty)
    }

    pub fn dropped(&self) -> usize {
        self.read(Chain::dropped)
    }

    /// Runs `f` over the records in chain order.
    pub fn with_records<R>(&self, f: impl FnOnce(&[Assertion]) -> R) -> R {
        self.read(|chain| f(chain.records()))
    }

    /// Number of handles observing this chain.
    pub fn share_count(&self) -> usize {
        #[cfg(feature = "alloc")]
        {
            Arc::strong_count(&self.chain)
        }
        #[cfg(not(feature = "alloc"))]
        {
            1
        }
    }

    /// Whether `self` and `other` observe the same chain.
    pub fn shares_with(&self, other: &TestResult) -> bool {
        #[cfg(feature = "alloc")]
        {
            Arc::ptr_eq(&self.chain, &other.chain)
        }
        #[cfg(not(feature = "alloc"))]
        {
            core::ptr::eq(self, other)
        }
    }

    /// Moves the result out, leaving an empty one behind.
    pub fn take(&mut self) -> TestResult {
        mem::take(self)
    }
}

impl fmt::Debug for TestResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.read(|chain| {
            f.debug_struct("TestResult")
                .field("succeeded", &chain.succeeded())
                .field("records", &chain.records())
                .field("dropped", &chain.dropped())
                .finish()
        })
    }
}

#[cfg(all(test, feature = "alloc"))]
mod tests {
    use proptest::prelude::*;

    use super::*;
    use crate::assertion::CheckKind;

    static ONCE: CallSite = CallSite::new(CheckKind::Boolean, "once", "result.rs", 1);
    static OTHER: CallSite = CallSite::new(CheckKind::Eq, "other", "result.rs", 2);
    static ALL: CallSite = CallSite::new(CheckKind::Lt, "all", "result.rs", 3);

    #[test]
    fn test_empty_chain_succeeds() {
        let result = TestResult::new();
        assert!(result.succeeded());
        assert!(result.first_failure().is_none());
        assert!(result.final_failure().is_none());
    }

    #[test]
    fn test_once_record_moves_to_end() {
        let mut chain: Chain = Chain::default();
        chain.record_once(&ONCE, true);
        chain.record_once(&OTHER, true);
        chain.record_once(&ONCE, false);
        assert_eq!(chain.len(), 2);
        assert_eq!(chain.records()[0].expression(), "other");
        assert_eq!(chain.records()[1].expression(), "once");
        assert!(!chain.records()[1].passed());
        assert!(!chain.succeeded());
    }

    #[test]
    fn test_first_and_final_failure() {
        let mut chain: Chain = Chain::default();
        chain.record_once(&ONCE, false);
        assert_eq!(chain.first_failure_index(), Some(0));
        assert_eq!(chain.final_failure_index(), Some(0));

        chain.record_all(&ALL, true);
        chain.record_all(&ALL, false);
        assert_eq!(chain.first_failure_index(), Some(0));
        assert_eq!(chain.final_failure_index(), Some(2));
    }

    #[test]
    fn test_clone_shares_and_take_moves() {
        let mut result = TestResult::new();
        result.record_all(&ALL, false);
        let copy = result.clone();
        assert!(copy.shares_with(&result));
        assert_eq!(result.share_count(), 2);

        drop(result);
        assert_eq!(copy.len(), 1);
        assert_eq!(copy.share_count(), 1);

        let mut source = copy;
        let moved = source.take();
        assert!(source.is_empty());
        assert!(source.succeeded());
        assert_eq!(moved.len(), 1);
        assert!(!moved.shares_with(&source));
    }

    #[test]
    fn test_full_chain_keeps_failures_over_passes() {
        let mut chain: Chain<ArrayVec<Assertion, 2>> = Chain::default();
        chain.record_all(&ALL, true);
        chain.record_all(&ALL, true);
        chain.record_all(&ALL, false);
        assert_eq!(chain.len(), 2);
        assert_eq!(chain.dropped(), 1);
        assert!(!chain.succeeded());
        assert_eq!(chain.first_failure_index(), Some(1));
    }

    #[test]
    fn test_full_chain_drops_transient_failure_when_all_failed() {
        let mut chain: Chain<ArrayVec<Assertion, 1>> = Chain::default();
        chain.record_all(&ALL, false);
        chain.record_all(&ALL, false);
        assert_eq!(chain.len(), 1);
        assert_eq!(chain.dropped(), 1);
        assert!(!chain.succeeded());
        assert!(chain.first_failure().is_some());
    }

    #[test]
    fn test_fixed_chain_reuses_once_slot_when_full() {
        let mut chain: Chain<ArrayVec<Assertion, 1>> = Chain::default();
        for i in 0..10 {
            chain.record_once(&ONCE, i % 2 == 0);
        }
        assert_eq!(chain.len(), 1);
        assert_eq!(chain.dropped(), 0);
        assert!(!chain.succeeded());
    }

    #[test]
    fn test_once_failure_on_full_chain_follows_last_outcome() {
        let mut chain: Chain<ArrayVec<Assertion, 1>> = Chain::default();
        chain.record_once(&OTHER, true);
        chain.record_once(&ONCE, false);
        assert_eq!(chain.records()[0].expression(), "once");
        assert_eq!(chain.first_failure_index(), Some(0));
        assert!(!chain.succeeded());

        chain.record_once(&ONCE, true);
        chain.record_once(&ONCE, true);
        assert!(chain.succeeded());
        assert!(chain.first_failure().is_none());
    }

    #[test]
    fn test_lost_once_failure_returns_when_room_frees() {
        let mut chain: Chain<ArrayVec<Assertion, 1>> = Chain::default();
        chain.record_once(&ONCE, false);
        chain.record_once(&OTHER, false);
        assert_eq!(chain.len(), 1);
        assert_eq!(chain.dropped(), 1);
        assert!(!chain.succeeded());

        // `ONCE` passing makes way for the remembered `OTHER` failure.
        chain.record_once(&ONCE, true);
        assert_eq!(chain.records()[0].expression(), "other");
        assert!(!chain.succeeded());
        assert!(chain.first_failure().is_some());

        chain.record_once(&OTHER, true);
        assert!(chain.succeeded());
        assert!(chain.first_failure().is_none());
    }

    #[test]
    fn test_lost_once_failure_cleared_by_later_pass() {
        let mut chain: Chain<ArrayVec<Assertion, 1>> = Chain::default();
        chain.record_once(&ONCE, false);
        chain.record_once(&OTHER, false);
        chain.record_once(&OTHER, true);
        assert_eq!(chain.records()[0].expression(), "once");
        assert_eq!(chain.dropped(), 2);

        chain.record_once(&ONCE, true);
        assert!(chain.succeeded());
    }

    #[test]
    fn test_records_readable_while_chain_is_read() {
        let mut result = TestResult::new();
        result.record_all(&ALL, true);
        result.record_all(&ALL, false);
        let (count, succeeded, first) = result.with_records(|records| {
            (
                records.len(),
                result.succeeded(),
                result.first_failure_index(),
            )
        });
        assert_eq!((count, succeeded, first), (2, false, Some(1)));
        assert_eq!(format!("{result:?}").matches("Assertion").count(), 2);
    }

    proptest! {
        #[test]
        fn prop_once_keeps_last_outcome(outcomes in prop::collection::vec(any::<bool>(), 1..64)) {
            let mut chain: Chain = Chain::default();
            for &outcome in &outcomes {
                chain.record_once(&ONCE, outcome);
            }
            prop_assert_eq!(chain.len(), 1);
            prop_assert_eq!(chain.records()[0].passed(), *outcomes.last().unwrap());
        }

        #[test]
        fn prop_all_keeps_every_outcome(outcomes in prop::collection::vec(any::<bool>(), 0..64)) {
            let mut chain: Chain = Chain::default();
            for &outcome in &outcomes {
                chain.record_all(&ALL, outcome);
            }
            let recorded: Vec<bool> = chain.records().iter().map(Assertion::passed).collect();
            prop_assert_eq!(&recorded, &outcomes);
            prop_assert_eq!(chain.succeeded(), outcomes.iter().all(|&o| o));
            prop_assert_eq!(
                chain.first_failure_index() == chain.final_failure_index(),
                outcomes.iter().filter(|&&o| !o).count() <= 1
            );
        }
    }
}
