// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 KylinSoft Co., Ltd. <https://www.kylinos.cn/>
// See LICENSES for license details.

//! Console output for ktest: a `log` backend and a completion handler that
//! prints each finished test.
//!
//! With `std` output goes to stdout. Otherwise the platform implements
//! [`ConsoleAdapter`] with `crate_interface::impl_interface`.

#![cfg_attr(not(any(feature = "std", test)), no_std)]

use core::{
    fmt::{self, Write},
    str::FromStr,
};

#[cfg(not(feature = "std"))]
use crate_interface::call_interface;
use ktest::{Assertion, CompletionHandler, TestDescriptor, TestResult, TestStats};
use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError};

#[macro_export]
macro_rules! console_print {
    ($($arg:tt)*) => {
        let _ = $crate::print_fmt(format_args!($($arg)*));
    }
}

#[macro_export]
macro_rules! console_println {
    () => { $crate::console_print!("\n") };
    ($($arg:tt)*) => {
        let _ = $crate::print_fmt(format_args!("{}\n", format_args!($($arg)*)));
    }
}

macro_rules! color_fmt {
    ($color_code:expr, $($arg:tt)*) => {
        format_args!("\u{1B}[{}m{}\u{1B}[m", $color_code as u8, format_args!($($arg)*))
    };
}

#[repr(u8)]
#[allow(dead_code)]
#[derive(Clone, Copy)]
enum AnsiColor {
    Red         = 31,
    Green       = 32,
    Yellow      = 33,
    Cyan        = 36,
    White       = 37,
    BrightBlack = 90,
}

#[crate_interface::def_interface]
pub trait ConsoleAdapter {
    fn write_str(s: &str);
    fn now() -> core::time::Duration;
}

struct Console;

impl Write for Console {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        cfg_if::cfg_if! {
            if #[cfg(feature = "std")] {
                std::print!("{s}");
            } else {
                call_interface!(ConsoleAdapter::write_str, s);
            }
        }
        Ok(())
    }
}

struct ConsoleLogger;

impl Log for ConsoleLogger {
    #[inline]
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }

        let level = record.level();
        let line = record.line().unwrap_or(0);
        let path = record.target();
        let color = match level {
            Level::Error => AnsiColor::Red,
            Level::Warn => AnsiColor::Yellow,
            Level::Info => AnsiColor::Green,
            Level::Debug => AnsiColor::Cyan,
            Level::Trace => AnsiColor::BrightBlack,
        };

        cfg_if::cfg_if! {
            if #[cfg(feature = "std")] {
                let _ = print_fmt(color_fmt!(
                    AnsiColor::White,
                    "[{time} {path}:{line}] {args}\n",
                    time = chrono::Local::now().format("%Y-%m-%d %H:%M:%S%.6f"),
                    path = path,
                    line = line,
                    args = color_fmt!(color, "{}", record.args()),
                ));
            } else {
                let now = call_interface!(ConsoleAdapter::now);
                let _ = print_fmt(color_fmt!(
                    AnsiColor::White,
                    "[{:>3}.{:06} {path}:{line}] {args}\n",
                    now.as_secs(),
                    now.subsec_micros(),
                    path = path,
                    line = line,
                    args = color_fmt!(color, "{}", record.args()),
                ));
            }
        }
    }

    fn flush(&self) {}
}

/// Writes to the console, serialised with every other console writer.
pub fn print_fmt(args: fmt::Arguments) -> fmt::Result {
    static LOCK: spin::Mutex<()> = spin::Mutex::new(());

    let _guard = LOCK.lock();
    Console.write_fmt(args)
}

/// Installs the console logger with the given maximum level.
pub fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
    log::set_logger(&ConsoleLogger)?;
    log::set_max_level(level);
    Ok(())
}

/// Sets the maximum level by name. Unknown names turn logging off.
pub fn set_log_level(level: &str) {
    log::set_max_level(parse_level(level));
}

pub fn parse_level(level: &str) -> LevelFilter {
    LevelFilter::from_str(level).unwrap_or(LevelFilter::Off)
}

/// Completion handler printing a line per test and a line per record.
#[derive(Debug, Default)]
pub struct ConsoleReporter {
    stats: TestStats,
    verbose: bool,
}

impl ConsoleReporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Also print passing records.
    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    pub fn stats(&self) -> &TestStats {
        &self.stats
    }

    /// Prints the totals of the tests reported so far.
    pub fn summary(&self) {
        print_summary(&self.stats);
    }
}

/// Prints run totals in green when nothing failed, red otherwise.
pub fn print_summary(stats: &TestStats) {
    let color = if stats.all_passed() {
        AnsiColor::Green
    } else {
        AnsiColor::Red
    };
    console_println!(
        "{}",
        color_fmt!(
            color,
            "{} tests: {} passed, {} failed, {} ignored",
            stats.total,
            stats.passed,
            stats.failed,
            stats.ignored
        )
    );
}

/// Position of a failing record among the failures of a chain.
fn marker(index: usize, first: Option<usize>, last: Option<usize>) -> &'static str {
    match (Some(index) == first, Some(index) == last) {
        (true, true) => "ONLY",
        (true, false) => "FIRST",
        (false, true) => "FINAL",
        (false, false) => "",
    }
}

fn print_record(index: usize, record: &Assertion, first: Option<usize>, last: Option<usize>) {
    if record.passed() {
        console_println!(
            "    {} {}:{} {}",
            color_fmt!(AnsiColor::Green, "ok"),
            record.file(),
            record.line(),
            record.expression()
        );
        return;
    }
    let mark = marker(index, first, last);
    console_println!(
        "    {} {:<5} {}:{} {}",
        color_fmt!(AnsiColor::Red, "failed"),
        mark,
        record.file(),
        record.line(),
        record.expression()
    );
    console_println!("          {}", record.message());
}

impl CompletionHandler for ConsoleReporter {
    fn on_complete(&mut self, test: &'static TestDescriptor, result: &TestResult) {
        self.stats.record(result);

        let (color, status) = if result.succeeded() {
            (AnsiColor::Green, "[PASS]")
        } else {
            (AnsiColor::Red, "[FAIL]")
        };
        console_println!(
            "{} [{test}] at {}:{}",
            color_fmt!(color, "{status}"),
            test.file(),
            test.line()
        );

        let first = result.first_failure_index();
        let last = result.final_failure_index();
        result.with_records(|records| {
            for (index, record) in records.iter().enumerate() {
                if self.verbose || !record.passed() {
                    print_record(index, record, first, last);
                }
            }
        });
        if result.dropped() > 0 {
            console_println!("    {} records dropped", result.dropped());
        }
    }
}
