// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 KylinSoft Co., Ltd. <https://www.kylinos.cn/>
// See LICENSES for license details.

//! ktest example and self-test driver.
//!
//! Runs the example suites with the console reporter, then every internal
//! (`_`-prefixed) suite with a judge that compares each result against the
//! outcome the test declared. Exits with status 1 when a self-test deviates.
//!
//! Usage: `ktest-selftest [SUITE]`. The log level is read from `KTEST_LOG`.

#[macro_use]
extern crate log;

mod demo;
mod selftest;

use std::{env, process::ExitCode};

use ktest::{RunConfig, config};
use ktest_console::{ConsoleReporter, console_println, print_summary};

fn print_banner() {
    console_println!();
    console_println!("ktest example application");
    console_println!("--------------------------------------");
    console_println!("Version {}", config::VERSION);
    console_println!(
        "Built with: {} {}",
        if config::NO_ALLOC { "no-alloc" } else { "alloc" },
        if config::FAULT_CONTAINMENT {
            "fault-containment"
        } else {
            ""
        }
    );
    console_println!();
}

fn main() -> ExitCode {
    let level = env::var("KTEST_LOG").unwrap_or_else(|_| String::from("warn"));
    if let Err(err) = ktest_console::init(ktest_console::parse_level(&level)) {
        eprintln!("logger already installed: {err}");
    }
    // Contained faults are reported as records; keep the default hook quiet.
    std::panic::set_hook(Box::new(|info| debug!("fault raised: {info}")));

    let filter = env::args().nth(1);
    print_banner();

    // Internal suites fail on purpose; only the judge reports them.
    if !filter.as_deref().is_some_and(|suite| suite.starts_with('_')) {
        let mut reporter = ConsoleReporter::new();
        let config = match filter.as_deref() {
            Some(suite) => RunConfig::new().suite(suite),
            None => RunConfig::new(),
        };
        let stats = ktest::run_all(&config, &mut reporter);
        print_summary(&stats);
    }

    let deviations = selftest::run(filter.as_deref());
    if deviations > 0 {
        error!("{deviations} self-tests deviated from their expected outcome");
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}
