// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 KylinSoft Co., Ltd. <https://www.kylinos.cn/>
// See LICENSES for license details.

//! Build-time switches and run-time options.

/// Set when the crate is built without the `alloc` feature.
pub const NO_ALLOC: bool = !cfg!(feature = "alloc");

/// Set when faults raised by test bodies are contained by the runner.
pub const FAULT_CONTAINMENT: bool = cfg!(feature = "std");

/// Records a result chain can hold without `alloc`.
pub const CHAIN_CAPACITY: usize = 64;

/// Failing call sites a full result chain remembers.
pub const LOST_SITE_CAPACITY: usize = 8;

/// Metadata items per list without `alloc`.
pub const METADATA_CAPACITY: usize = 8;

/// Longest fault description kept in a record, in bytes.
pub const FAULT_MESSAGE_LIMIT: usize = 816;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Lifetime of suite instances during [`run_all`](crate::run_all).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum InstancePolicy {
    /// One instance lives across every test of the suite.
    #[default]
    PerSuite,
    /// A fresh instance is constructed for each test.
    PerTest,
}

/// Options for a full run.
#[derive(Debug, Clone, Copy)]
pub struct RunConfig<'a> {
    /// Only run the suite with this name.
    pub suite: Option<&'a str>,
    pub policy: InstancePolicy,
    /// Skip suites whose name begins with `_`.
    pub skip_internal: bool,
}

impl Default for RunConfig<'_> {
    fn default() -> Self {
        Self {
            suite: None,
            policy: InstancePolicy::PerSuite,
            skip_internal: true,
        }
    }
}

impl<'a> RunConfig<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn suite(mut self, name: &'a str) -> Self {
        self.suite = Some(name);
        self
    }

    pub fn policy(mut self, policy: InstancePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn skip_internal(mut self, skip: bool) -> Self {
        self.skip_internal = skip;
        self
    }

    /// Whether a suite called `name` takes part in the run.
    ///
    /// An explicit suite filter also selects internal suites.
    pub fn selects(&self, name: &str) -> bool {
        match self.suite {
            Some(wanted) => wanted == name,
            None => !(self.skip_internal && name.starts_with('_')),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_skips_internal_suites() {
        let config = RunConfig::default();
        assert!(config.selects("Custom"));
        assert!(!config.selects("_Internal"));
        assert!(RunConfig::new().skip_internal(false).selects("_Internal"));
    }

    #[test]
    fn test_filter_selects_only_named_suite() {
        let config = RunConfig::new().suite("_Internal");
        assert!(config.selects("_Internal"));
        assert!(!config.selects("Custom"));
    }
}
