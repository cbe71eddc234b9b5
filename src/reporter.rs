//! Failure reporting.
//!
//! Every assertion in this crate reports through a [`Reporter`] instead of
//! panicking directly, so the same helpers work with any test harness. Two
//! implementations ship with the crate:
//!
//! - [`StdReporter`] for plain `#[test]` functions: failures panic.
//! - [`CapturingReporter`] records every call, for testing assertion helpers
//!   themselves.
//!
//! Plain and formatted variants collapse into one method each, since
//! `format_args!("literal")` and `format_args!("{x}")` share a type.

use std::cell::{Cell, RefCell};
use std::fmt;

use tracing::{debug, error};

/// The caller's failure-reporting capability set.
pub trait Reporter {
    /// Emit diagnostic text. Does not affect the outcome.
    fn log(&self, message: fmt::Arguments<'_>);

    /// Mark the current check failed and keep going.
    fn error(&self, message: fmt::Arguments<'_>);

    /// Abort the current check.
    fn fail_now(&self);

    /// Mark the current check failed and abort it.
    ///
    /// Callers must not rely on this diverging: reporters that record rather
    /// than unwind return from `fail_now`.
    fn fatal(&self, message: fmt::Arguments<'_>) {
        self.error(message);
        self.fail_now();
    }

    /// Mark the calling frame as a helper for diagnostic attribution.
    fn helper(&self) {}
}

impl<R: Reporter + ?Sized> Reporter for &R {
    fn log(&self, message: fmt::Arguments<'_>) {
        (**self).log(message)
    }

    fn error(&self, message: fmt::Arguments<'_>) {
        (**self).error(message)
    }

    fn fail_now(&self) {
        (**self).fail_now()
    }

    fn fatal(&self, message: fmt::Arguments<'_>) {
        (**self).fatal(message)
    }

    fn helper(&self) {
        (**self).helper()
    }
}

// ============================================================================
// StdReporter
// ============================================================================

/// Reporter for standard `#[test]` functions.
///
/// Errors are collected and the test keeps running; `fail_now` panics with
/// everything collected so far. A reporter dropped with pending errors
/// panics too, so a failed non-fatal check still fails the test.
#[derive(Debug, Default)]
pub struct StdReporter {
    errors: RefCell<Vec<String>>,
}

impl StdReporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether any error has been reported.
    pub fn failed(&self) -> bool {
        !self.errors.borrow().is_empty()
    }

    fn take_report(&self) -> String {
        self.errors.borrow_mut().drain(..).collect::<Vec<_>>().join("\n")
    }
}

impl Reporter for StdReporter {
    fn log(&self, message: fmt::Arguments<'_>) {
        debug!("{message}");
    }

    fn error(&self, message: fmt::Arguments<'_>) {
        let message = message.to_string();
        error!("{message}");
        self.errors.borrow_mut().push(message);
    }

    #[track_caller]
    fn fail_now(&self) {
        panic!("{}", self.take_report());
    }

    #[track_caller]
    fn fatal(&self, message: fmt::Arguments<'_>) {
        self.error(message);
        self.fail_now();
    }
}

impl Drop for StdReporter {
    fn drop(&mut self) {
        if self.failed() && !std::thread::panicking() {
            panic!("{}", self.take_report());
        }
    }
}

// ============================================================================
// CapturingReporter
// ============================================================================

/// Severity of a captured report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Log,
    Error,
    Fatal,
}

/// One captured reporter call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub level: Level,
    pub message: String,
}

/// Reporter that records everything and never unwinds.
#[derive(Debug, Default)]
pub struct CapturingReporter {
    entries: RefCell<Vec<Entry>>,
    aborted: Cell<bool>,
}

impl CapturingReporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// All captured entries, in call order.
    pub fn entries(&self) -> Vec<Entry> {
        self.entries.borrow().clone()
    }

    /// Messages captured at the given level.
    pub fn messages(&self, level: Level) -> Vec<String> {
        self.entries
            .borrow()
            .iter()
            .filter(|e| e.level == level)
            .map(|e| e.message.clone())
            .collect()
    }

    /// True if an error or fatal was reported.
    pub fn failed(&self) -> bool {
        self.entries
            .borrow()
            .iter()
            .any(|e| matches!(e.level, Level::Error | Level::Fatal))
    }

    /// True if `fail_now` or `fatal` was called.
    pub fn aborted(&self) -> bool {
        self.aborted.get()
    }

    fn push(&self, level: Level, message: fmt::Arguments<'_>) {
        self.entries.borrow_mut().push(Entry {
            level,
            message: message.to_string(),
        });
    }
}

impl Reporter for CapturingReporter {
    fn log(&self, message: fmt::Arguments<'_>) {
        self.push(Level::Log, message);
    }

    fn error(&self, message: fmt::Arguments<'_>) {
        self.push(Level::Error, message);
    }

    fn fail_now(&self) {
        self.aborted.set(true);
    }

    fn fatal(&self, message: fmt::Arguments<'_>) {
        self.push(Level::Fatal, message);
        self.fail_now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capturing_records_levels_in_order() {
        let t = CapturingReporter::new();
        t.log(format_args!("hello {}", 1));
        t.error(format_args!("bad"));
        assert!(t.failed());
        assert!(!t.aborted());

        t.fatal(format_args!("worse"));
        assert!(t.aborted());
        assert_eq!(
            t.entries(),
            vec![
                Entry {
                    level: Level::Log,
                    message: "hello 1".into()
                },
                Entry {
                    level: Level::Error,
                    message: "bad".into()
                },
                Entry {
                    level: Level::Fatal,
                    message: "worse".into()
                },
            ]
        );
    }

    #[test]
    fn std_reporter_passes_when_clean() {
        let t = StdReporter::new();
        t.log(format_args!("just a note"));
        assert!(!t.failed());
    }

    #[test]
    #[should_panic(expected = "boom")]
    fn std_reporter_fatal_panics() {
        let t = StdReporter::new();
        t.fatal(format_args!("boom"));
    }

    #[test]
    #[should_panic(expected = "deferred")]
    fn std_reporter_panics_on_drop_after_error() {
        let t = StdReporter::new();
        t.error(format_args!("deferred"));
        assert!(t.failed());
    }

    #[test]
    fn reporter_by_reference() {
        fn report<R: Reporter>(t: R) {
            t.helper();
            t.error(format_args!("via ref"));
        }
        let t = CapturingReporter::new();
        report(&t);
        assert_eq!(t.messages(Level::Error), vec!["via ref".to_string()]);
    }
}
