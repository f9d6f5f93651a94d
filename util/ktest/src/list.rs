// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 KylinSoft Co., Ltd. <https://www.kylinos.cn/>
// See LICENSES for license details.

//! Append-only intrusive lists of `'static` descriptors.
//!
//! Nodes carry their own [`Link`], so building the suite and test lists never
//! allocates. Lists only grow during the registration pass and are read-only
//! afterwards.

use core::{
    ptr,
    sync::atomic::{AtomicBool, AtomicPtr, AtomicUsize, Ordering},
};

/// Next-pointer embedded in a list node.
pub struct Link<T> {
    next: AtomicPtr<T>,
    linked: AtomicBool,
}

impl<T> Link<T> {
    pub const fn new() -> Self {
        Self {
            next: AtomicPtr::new(ptr::null_mut()),
            linked: AtomicBool::new(false),
        }
    }

    #[inline]
    pub fn is_linked(&self) -> bool {
        self.linked.load(Ordering::Acquire)
    }
}

impl<T> Default for Link<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// A node type that can be threaded onto a [`StaticList`].
pub trait Linked: Sized + Sync + 'static {
    fn link(&self) -> &Link<Self>;
}

pub struct StaticList<T> {
    head: AtomicPtr<T>,
    tail: AtomicPtr<T>,
    len: AtomicUsize,
}

impl<T: Linked> StaticList<T> {
    pub const fn new() -> Self {
        Self {
            head: AtomicPtr::new(ptr::null_mut()),
            tail: AtomicPtr::new(ptr::null_mut()),
            len: AtomicUsize::new(0),
        }
    }

    /// Appends `node`. Returns `false` if it is already on a list.
    ///
    /// Callers serialise pushes; the registry does so behind its `Once`.
    pub fn push(&self, node: &'static T) -> bool {
        let link = node.link();
        if link.linked.swap(true, Ordering::AcqRel) {
            return false;
        }
        let raw = node as *const T as *mut T;
        let tail = self.tail.swap(raw, Ordering::AcqRel);
        if tail.is_null() {
            self.head.store(raw, Ordering::Release);
        } else {
            // SAFETY: every pointer stored in the list came from a `&'static T`.
            unsafe { (*tail).link().next.store(raw, Ordering::Release) };
        }
        self.len.fetch_add(1, Ordering::AcqRel);
        true
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len.load(Ordering::Acquire)
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Iterates in insertion order. Each call starts from the head again.
    pub fn iter(&self) -> Iter<T> {
        Iter {
            // SAFETY: see `push`.
            next: unsafe { self.head.load(Ordering::Acquire).as_ref() },
        }
    }
}

impl<T: Linked> Default for StaticList<T> {
    fn default() -> Self {
        Self::new()
    }
}

pub struct Iter<T: 'static> {
    next: Option<&'static T>,
}

impl<T: Linked> Iterator for Iter<T> {
    type Item = &'static T;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.next?;
        // SAFETY: see `StaticList::push`.
        self.next = unsafe { node.link().next.load(Ordering::Acquire).as_ref() };
        Some(node)
    }
}

impl<T: Linked> Clone for Iter<T> {
    fn clone(&self) -> Self {
        Self { next: self.next }
    }
}

#[cfg(test)]
mod tests {
    use std::vec::Vec;

    use super::*;

    struct Node {
        id: u32,
        link: Link<Node>,
    }

    impl Node {
        const fn new(id: u32) -> Self {
            Self {
                id,
                link: Link::new(),
            }
        }
    }

    impl Linked for Node {
        fn link(&self) -> &Link<Self> {
            &self.link
        }
    }

    static A: Node = Node::new(1);
    static B: Node = Node::new(2);
    static C: Node = Node::new(3);
    static LIST: StaticList<Node> = StaticList::new();

    #[test]
    fn test_push_keeps_order_and_rejects_duplicates() {
        assert!(LIST.is_empty());
        assert!(LIST.push(&A));
        assert!(LIST.push(&B));
        assert!(!LIST.push(&A));
        assert!(LIST.push(&C));
        assert_eq!(LIST.len(), 3);

        let ids: Vec<u32> = LIST.iter().map(|n| n.id).collect();
        assert_eq!(ids, [1, 2, 3]);
        // Restartable.
        assert_eq!(LIST.iter().count(), 3);
        assert!(B.link.is_linked());
    }
}
