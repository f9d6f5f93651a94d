// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 KylinSoft Co., Ltd. <https://www.kylinos.cn/>
// See LICENSES for license details.

//! Single-slot instance storage for suites and tests.
//!
//! Every suite type and every test owns one statically allocated
//! [`InstanceSlot`]. At most one instance lives in a slot at a time. Access
//! never blocks: a slot already held by a running test reports
//! [`KtestError::Busy`], which is how re-entrant runs are rejected.

use spin::Mutex;

use crate::{
    error::{KtestError, Result},
    suite::{SuiteDescriptor, TestSuite},
};

pub struct InstanceSlot<T> {
    cell: Mutex<Option<T>>,
}

impl<T> InstanceSlot<T> {
    pub const fn new() -> Self {
        Self {
            cell: Mutex::new(None),
        }
    }

    /// Constructs an instance unless one is live.
    ///
    /// Returns `Ok(true)` if this call constructed it.
    pub fn construct_with(&self, init: impl FnOnce() -> T) -> Result<bool> {
        let mut cell = self.cell.try_lock().ok_or(KtestError::Busy)?;
        if cell.is_some() {
            return Ok(false);
        }
        *cell = Some(init());
        Ok(true)
    }

    /// Destroys any live instance, then constructs a fresh one.
    pub fn reconstruct_with(&self, init: impl FnOnce() -> T) -> Result<()> {
        let mut cell = self.cell.try_lock().ok_or(KtestError::Busy)?;
        drop(cell.take());
        *cell = Some(init());
        Ok(())
    }

    /// Destroys the live instance. Returns `Ok(false)` if the slot was empty.
    pub fn destruct(&self) -> Result<bool> {
        let old = self.cell.try_lock().ok_or(KtestError::Busy)?.take();
        Ok(old.is_some())
    }

    /// Runs `f` on the live instance.
    pub fn with<R>(&self, f: impl FnOnce(&mut T) -> R) -> Result<R> {
        let mut cell = self.cell.try_lock().ok_or(KtestError::Busy)?;
        let instance = cell.as_mut().ok_or(KtestError::Empty)?;
        Ok(f(instance))
    }

    /// A held slot always has a live instance.
    pub fn is_live(&self) -> bool {
        self.cell.try_lock().is_none_or(|cell| cell.is_some())
    }
}

impl<T> Default for InstanceSlot<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Type-erased access to a suite's [`InstanceSlot`].
pub trait SuiteStorage: Sync {
    fn construct(&self) -> Result<bool>;

    fn destruct(&self) -> Result<bool>;

    fn is_live(&self) -> bool;

    fn with_suite(&self, f: &mut dyn FnMut(&mut dyn TestSuite)) -> Result<()>;
}

impl<T: TestSuite + Default> SuiteStorage for InstanceSlot<T> {
    fn construct(&self) -> Result<bool> {
        self.construct_with(T::default)
    }

    fn destruct(&self) -> Result<bool> {
        InstanceSlot::destruct(self)
    }

    fn is_live(&self) -> bool {
        InstanceSlot::is_live(self)
    }

    fn with_suite(&self, f: &mut dyn FnMut(&mut dyn TestSuite)) -> Result<()> {
        self.with(|suite| f(suite))
    }
}

/// Keeps a suite instance live for as long as the handle exists.
///
/// The instance is destroyed on drop only if this handle constructed it.
pub struct SuiteHandle {
    suite: &'static SuiteDescriptor,
    owned: bool,
}

impl SuiteHandle {
    pub fn acquire(suite: &'static SuiteDescriptor) -> Result<Self> {
        let owned = suite.construct()?;
        debug!(
            "suite {} {}",
            suite.name(),
            if owned { "constructed" } else { "already live" }
        );
        Ok(Self { suite, owned })
    }

    #[inline]
    pub fn suite(&self) -> &'static SuiteDescriptor {
        self.suite
    }

    #[inline]
    pub fn owns_instance(&self) -> bool {
        self.owned
    }

    pub fn with<R>(&self, f: impl FnOnce(&mut dyn TestSuite) -> R) -> Result<R> {
        self.suite.with_instance(f)
    }
}

impl Drop for SuiteHandle {
    fn drop(&mut self) {
        if !self.owned {
            return;
        }
        match self.suite.destruct() {
            Ok(_) => debug!("suite {} destructed", self.suite.name()),
            Err(err) => warn!("suite {} not destructed: {err}", self.suite.name()),
        }
    }
}

#[cfg(test)]
mod tests {
    use core::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    static DROPS: AtomicUsize = AtomicUsize::new(0);

    struct Tracked(u32);

    impl Drop for Tracked {
        fn drop(&mut self) {
            DROPS.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[test]
    fn test_slot_lifecycle() {
        let slot: InstanceSlot<Tracked> = InstanceSlot::new();
        assert!(!slot.is_live());
        assert_eq!(slot.with(|v| v.0), Err(KtestError::Empty));

        assert_eq!(slot.construct_with(|| Tracked(1)), Ok(true));
        assert_eq!(slot.construct_with(|| Tracked(2)), Ok(false));
        assert_eq!(slot.with(|v| v.0), Ok(1));
        // The rejected initialiser was never called, so nothing was dropped.
        assert_eq!(DROPS.load(Ordering::SeqCst), 0);

        slot.reconstruct_with(|| Tracked(3)).unwrap();
        assert_eq!(DROPS.load(Ordering::SeqCst), 1);
        assert_eq!(slot.with(|v| v.0), Ok(3));

        assert_eq!(slot.destruct(), Ok(true));
        assert_eq!(DROPS.load(Ordering::SeqCst), 2);
        assert_eq!(slot.destruct(), Ok(false));
        assert!(!slot.is_live());
    }

    #[test]
    fn test_reentrant_access_is_busy() {
        let slot: InstanceSlot<u32> = InstanceSlot::new();
        slot.construct_with(|| 7).unwrap();
        let inner = slot.with(|_| {
            assert!(slot.is_live());
            (slot.with(|v| *v), slot.destruct())
        });
        assert_eq!(inner, Ok((Err(KtestError::Busy), Err(KtestError::Busy))));
        assert_eq!(slot.with(|v| *v), Ok(7));
    }
}
