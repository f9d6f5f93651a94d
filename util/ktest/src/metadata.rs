// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 KylinSoft Co., Ltd. <https://www.kylinos.cn/>
// See LICENSES for license details.

//! Named values attached to a running test.
//!
//! Each test keeps two independent lists: one for the test author and one
//! for the harness. Values are stored as a [`MetaValue`] and read back with a
//! type-checked lookup; asking for the wrong type yields `None`.

#[cfg(feature = "alloc")]
use alloc::{boxed::Box, vec::Vec};
use core::{any::Any, fmt};

#[cfg(not(feature = "alloc"))]
use arrayvec::ArrayVec;

#[cfg(not(feature = "alloc"))]
use crate::config::METADATA_CAPACITY;
use crate::{
    error::{KtestError, Result},
    store::Slots,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetadataKind {
    /// Attached by the test body.
    User,
    /// Attached for the harness, for example expected outcomes.
    Internal,
}

pub enum MetaValue {
    Bool(bool),
    Int(i64),
    UInt(u64),
    Str(&'static str),
    Static(&'static (dyn Any + Sync)),
    #[cfg(feature = "alloc")]
    Owned(Box<dyn Any + Send>),
}

impl MetaValue {
    /// Boxes an arbitrary value.
    #[cfg(feature = "alloc")]
    pub fn owned<T: Any + Send>(value: T) -> Self {
        Self::Owned(Box::new(value))
    }

    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        let any: &dyn Any = match self {
            Self::Bool(v) => v,
            Self::Int(v) => v,
            Self::UInt(v) => v,
            Self::Str(v) => v,
            Self::Static(v) => *v,
            #[cfg(feature = "alloc")]
            Self::Owned(v) => &**v,
        };
        any.downcast_ref()
    }

    /// Mutable access. Values borrowed from a `static` are never mutable.
    pub fn downcast_mut<T: Any>(&mut self) -> Option<&mut T> {
        let any: &mut dyn Any = match self {
            Self::Bool(v) => v,
            Self::Int(v) => v,
            Self::UInt(v) => v,
            Self::Str(v) => v,
            Self::Static(_) => return None,
            #[cfg(feature = "alloc")]
            Self::Owned(v) => &mut **v,
        };
        any.downcast_mut()
    }
}

impl From<bool> for MetaValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for MetaValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<u64> for MetaValue {
    fn from(value: u64) -> Self {
        Self::UInt(value)
    }
}

impl From<&'static str> for MetaValue {
    fn from(value: &'static str) -> Self {
        Self::Str(value)
    }
}

impl fmt::Debug for MetaValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(v) => write!(f, "Bool({v})"),
            Self::Int(v) => write!(f, "Int({v})"),
            Self::UInt(v) => write!(f, "UInt({v})"),
            Self::Str(v) => write!(f, "Str({v:?})"),
            Self::Static(_) => f.write_str("Static(..)"),
            #[cfg(feature = "alloc")]
            Self::Owned(_) => f.write_str("Owned(..)"),
        }
    }
}

#[derive(Debug)]
pub struct MetadataItem {
    pub name: &'static str,
    pub kind: MetadataKind,
    pub value: MetaValue,
}

#[cfg(feature = "alloc")]
type ItemSlots = Vec<MetadataItem>;
#[cfg(not(feature = "alloc"))]
type ItemSlots = ArrayVec<MetadataItem, METADATA_CAPACITY>;

/// The two metadata lists of one test.
#[derive(Debug, Default)]
pub struct MetadataStore {
    user: ItemSlots,
    internal: ItemSlots,
}

impl MetadataStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn list(&self, kind: MetadataKind) -> &ItemSlots {
        match kind {
            MetadataKind::User => &self.user,
            MetadataKind::Internal => &self.internal,
        }
    }

    fn list_mut(&mut self, kind: MetadataKind) -> &mut ItemSlots {
        match kind {
            MetadataKind::User => &mut self.user,
            MetadataKind::Internal => &mut self.internal,
        }
    }

    fn position(&self, kind: MetadataKind, name: &str) -> Option<usize> {
        self.list(kind)
            .as_slice()
            .iter()
            .rposition(|item| item.name == name)
    }

    /// Appends an item. It shadows older items with the same name.
    pub fn attach(
        &mut self,
        kind: MetadataKind,
        name: &'static str,
        value: impl Into<MetaValue>,
    ) -> Result<()> {
        let item = MetadataItem {
            name,
            kind,
            value: value.into(),
        };
        Slots::push(self.list_mut(kind), item).map_err(|item| {
            warn!("no room for metadata `{}`", item.name);
            KtestError::CapacityExhausted
        })
    }

    /// The newest item called `name`, if it holds a `T`.
    pub fn lookup<T: Any>(&self, kind: MetadataKind, name: &str) -> Option<&T> {
        self.get(kind, name)?.downcast_ref()
    }

    pub fn lookup_mut<T: Any>(&mut self, kind: MetadataKind, name: &str) -> Option<&mut T> {
        let index = self.position(kind, name)?;
        self.list_mut(kind).as_mut_slice()[index]
            .value
            .downcast_mut()
    }

    pub fn get(&self, kind: MetadataKind, name: &str) -> Option<&MetaValue> {
        let index = self.position(kind, name)?;
        Some(&self.list(kind).as_slice()[index].value)
    }

    /// Removes the newest item called `name`.
    pub fn detach(&mut self, kind: MetadataKind, name: &str) -> Option<MetaValue> {
        let index = self.position(kind, name)?;
        self.detach_at(kind, index)
    }

    /// Removes the item at `index` of the `kind` list.
    pub fn detach_at(&mut self, kind: MetadataKind, index: usize) -> Option<MetaValue> {
        Slots::remove(self.list_mut(kind), index).map(|item| item.value)
    }

    pub fn items(&self, kind: MetadataKind) -> &[MetadataItem] {
        self.list(kind).as_slice()
    }

    pub fn clear(&mut self) {
        self.user.clear();
        self.internal.clear();
    }
}
