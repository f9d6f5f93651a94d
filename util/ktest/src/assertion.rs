// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 KylinSoft Co., Ltd. <https://www.kylinos.cn/>
// See LICENSES for license details.

//! Assertion records.

#[cfg(feature = "alloc")]
use alloc::borrow::Cow;
use core::{fmt, ptr};

/// What a check compared, which selects its diagnostic message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckKind {
    Boolean,
    Zero,
    NonZero,
    Eq,
    Ne,
    Lt,
    Gt,
    Le,
    Ge,
    /// A fault raised by the test body.
    Fault,
    /// A failure of the test machinery, such as a busy instance.
    Internal,
}

impl CheckKind {
    pub const fn success_message(&self) -> &'static str {
        match self {
            Self::Boolean | Self::Fault | Self::Internal => "",
            Self::Zero => "The value was zero.",
            Self::NonZero => "The value was non-zero.",
            Self::Eq => "The values were equal.",
            Self::Ne => "The values were not equal.",
            Self::Lt => "The first value was less than the second.",
            Self::Gt => "The first value was greater than the second.",
            Self::Le => "The first value was less than or equal to the second.",
            Self::Ge => "The first value was greater than or equal to the second.",
        }
    }

    pub const fn failure_message(&self) -> &'static str {
        match self {
            Self::Boolean => "The assertion failed.",
            Self::Zero => "Expected zero value.",
            Self::NonZero => "Expected non-zero value.",
            Self::Eq => "Expected equal values.",
            Self::Ne => "Expected non-equal values.",
            Self::Lt => "The first value was not less than the second.",
            Self::Gt => "The first value was not greater than the second.",
            Self::Le => "The first value was not less than or equal to the second.",
            Self::Ge => "The first value was not greater than or equal to the second.",
            Self::Fault => "An unhandled fault occurred.",
            Self::Internal => "The test could not be run.",
        }
    }
}

/// Static identity of one check in the source.
///
/// Every check macro expands to its own `static CallSite`; its address
/// identifies the persistent record of that call site.
#[derive(Debug)]
pub struct CallSite {
    pub kind: CheckKind,
    pub expression: &'static str,
    pub file: &'static str,
    pub line: u32,
}

impl CallSite {
    pub const fn new(
        kind: CheckKind,
        expression: &'static str,
        file: &'static str,
        line: u32,
    ) -> Self {
        Self {
            kind,
            expression,
            file,
            line,
        }
    }
}

/// Lifetime discipline of a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Storage {
    /// One record per call site, overwritten and moved to the chain's end on
    /// every evaluation.
    Persistent,
    /// A fresh record per evaluation.
    Transient,
}

#[cfg(feature = "alloc")]
pub(crate) type Detail = Cow<'static, str>;
#[cfg(not(feature = "alloc"))]
pub(crate) type Detail = &'static str;

/// One recorded check outcome.
#[derive(Clone)]
pub struct Assertion {
    passed: bool,
    kind: CheckKind,
    expression: &'static str,
    file: &'static str,
    line: u32,
    storage: Storage,
    site: Option<&'static CallSite>,
    detail: Option<Detail>,
}

impl Assertion {
    pub fn from_site(site: &'static CallSite, storage: Storage, passed: bool) -> Self {
        Self {
            passed,
            kind: site.kind,
            expression: site.expression,
            file: site.file,
            line: site.line,
            storage,
            site: Some(site),
            detail: None,
        }
    }

    /// A failing record for a fault raised at the test's location.
    #[cfg(feature = "alloc")]
    pub fn fault(message: impl Into<Cow<'static, str>>, file: &'static str, line: u32) -> Self {
        Self {
            passed: false,
            kind: CheckKind::Fault,
            expression: "<unhandled fault>",
            file,
            line,
            storage: Storage::Transient,
            site: None,
            detail: Some(message.into()),
        }
    }

    /// A failing record for an error of the test machinery.
    pub fn internal(message: &'static str, file: &'static str, line: u32) -> Self {
        Self {
            passed: false,
            kind: CheckKind::Internal,
            expression: "<internal>",
            file,
            line,
            storage: Storage::Transient,
            site: None,
            detail: Some(message.into()),
        }
    }

    #[inline]
    pub fn passed(&self) -> bool {
        self.passed
    }

    #[inline]
    pub fn kind(&self) -> CheckKind {
        self.kind
    }

    #[inline]
    pub fn expression(&self) -> &'static str {
        self.expression
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
    pub fn storage(&self) -> Storage {
        self.storage
    }

    #[inline]
    pub fn is_transient(&self) -> bool {
        self.storage == Storage::Transient
    }

    /// Empty on pass; otherwise the fault text or the kind's failure message.
    pub fn message(&self) -> &str {
        if self.passed {
            return "";
        }
        match &self.detail {
            Some(detail) => &**detail,
            None => self.kind.failure_message(),
        }
    }

    /// Whether this is the persistent record of `site`.
    pub(crate) fn is_persistent_for(&self, site: &'static CallSite) -> bool {
        self.storage == Storage::Persistent && self.site.is_some_and(|s| ptr::eq(s, site))
    }

    /// The call site this record persists for, if any.
    pub(crate) fn persistent_site(&self) -> Option<&'static CallSite> {
        match self.storage {
            Storage::Persistent => self.site,
            Storage::Transient => None,
        }
    }

    pub(crate) fn set_passed(&mut self, passed: bool) {
        self.passed = passed;
    }
}

impl fmt::Debug for Assertion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Assertion")
            .field("passed", &self.passed)
            .field("kind", &self.kind)
            .field("expression", &self.expression)
            .field("location", &format_args!("{}:{}", self.file, self.line))
            .field("storage", &self.storage)
            .field("message", &self.message())
            .finish()
    }
}

impl fmt::Display for Assertion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.passed {
            write!(f, "{}:{}: passed: {}", self.file, self.line, self.expression)
        } else {
            write!(
                f,
                "{}:{}: failed: {}: {}",
                self.file,
                self.line,
                self.expression,
                self.message()
            )
        }
    }
}
