// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 KylinSoft Co., Ltd. <https://www.kylinos.cn/>
// See LICENSES for license details.

//! Backing storage for result chains and metadata lists.
//!
//! Two strategies sit behind [`Slots`]: a growable `Vec` when the `alloc`
//! feature is enabled, and an inline [`ArrayVec`] otherwise.

use arrayvec::ArrayVec;

/// An ordered sequence that can be appended to and removed from.
pub trait Slots<T> {
    /// Appends `item`, handing it back when there is no room left.
    fn push(&mut self, item: T) -> Result<(), T>;

    /// Removes the item at `index`, shifting later items down.
    fn remove(&mut self, index: usize) -> Option<T>;

    fn as_slice(&self) -> &[T];

    fn as_mut_slice(&mut self) -> &mut [T];

    /// Drops every item.
    fn clear(&mut self);

    #[inline]
    fn len(&self) -> usize {
        self.as_slice().len()
    }

    #[inline]
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<T, const N: usize> Slots<T> for ArrayVec<T, N> {
    #[inline]
    fn push(&mut self, item: T) -> Result<(), T> {
        self.try_push(item).map_err(|err| err.element())
    }

    #[inline]
    fn remove(&mut self, index: usize) -> Option<T> {
        self.pop_at(index)
    }

    #[inline]
    fn as_slice(&self) -> &[T] {
        ArrayVec::as_slice(self)
    }

    #[inline]
    fn as_mut_slice(&mut self) -> &mut [T] {
        ArrayVec::as_mut_slice(self)
    }

    #[inline]
    fn clear(&mut self) {
        ArrayVec::clear(self)
    }
}

#[cfg(feature = "alloc")]
impl<T> Slots<T> for alloc::vec::Vec<T> {
    #[inline]
    fn push(&mut self, item: T) -> Result<(), T> {
        alloc::vec::Vec::push(self, item);
        Ok(())
    }

    fn remove(&mut self, index: usize) -> Option<T> {
        (index < alloc::vec::Vec::len(self)).then(|| alloc::vec::Vec::remove(self, index))
    }

    #[inline]
    fn as_slice(&self) -> &[T] {
        self
    }

    #[inline]
    fn as_mut_slice(&mut self) -> &mut [T] {
        self
    }

    #[inline]
    fn clear(&mut self) {
        alloc::vec::Vec::clear(self)
    }
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use super::*;

    #[test]
    fn test_array_push_until_full() {
        let mut v: ArrayVec<u32, 3> = ArrayVec::new();
        assert!(Slots::push(&mut v, 1).is_ok());
        assert!(Slots::push(&mut v, 2).is_ok());
        assert!(Slots::push(&mut v, 3).is_ok());
        assert!(v.is_full());
        assert_eq!(Slots::push(&mut v, 4), Err(4));
        assert_eq!(Slots::as_slice(&v), &[1, 2, 3]);
    }

    #[test]
    fn test_array_remove_shifts_tail() {
        let mut v: ArrayVec<u32, 4> = (0..4).collect();
        assert_eq!(Slots::remove(&mut v, 1), Some(1));
        assert_eq!(Slots::as_slice(&v), &[0, 2, 3]);
        assert_eq!(Slots::remove(&mut v, 2), Some(3));
        assert_eq!(Slots::remove(&mut v, 2), None);
        assert_eq!(Slots::len(&v), 2);
    }

    #[test]
    fn test_array_clear_drops_items() {
        let marker = Rc::new(());
        let mut v: ArrayVec<Rc<()>, 4> = ArrayVec::new();
        for _ in 0..3 {
            assert!(Slots::push(&mut v, marker.clone()).is_ok());
        }
        assert_eq!(Rc::strong_count(&marker), 4);
        Slots::clear(&mut v);
        assert!(Slots::is_empty(&v));
        assert_eq!(Rc::strong_count(&marker), 1);
    }

    #[cfg(feature = "alloc")]
    #[test]
    fn test_vec_slots_never_full() {
        let mut v: std::vec::Vec<u32> = std::vec::Vec::new();
        for i in 0..1000 {
            assert!(Slots::push(&mut v, i).is_ok());
        }
        assert_eq!(Slots::remove(&mut v, 1000), None);
        assert_eq!(Slots::remove(&mut v, 0), Some(0));
        assert_eq!(Slots::len(&v), 999);
    }
}
