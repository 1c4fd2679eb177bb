//! Diagnostic output module.
//!
//! The packet core has no console of its own: messages go to the
//! [DiagnosticSink] owned by the device handle, filtered by the [Logger]
//! level threshold.
//!
//! Level-specific macros take the logger as their first argument:
//!
//! * [debugln!]
//! * [infoln!]
//! * [warnln!]
//! * [errorln!]

use core::fmt;

/// Diagnostic message levels
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Debug)]
pub enum Level {
    /// Debugging information
    Debug,
    /// General informational messages
    Info,
    /// Non-critical warnings
    Warn,
    /// Critical errors
    Error,
}

/// Character sink for diagnostic strings, e.g. a serial console
pub trait DiagnosticSink {
    /// Writes a string to the sink
    fn write_string(&mut self, s: &str);
}

/// Discards everything
impl DiagnosticSink for () {
    fn write_string(&mut self, _s: &str) {}
}

impl<T: DiagnosticSink + ?Sized> DiagnosticSink for &mut T {
    fn write_string(&mut self, s: &str) {
        (**self).write_string(s)
    }
}

/// Level-filtered front-end for a [DiagnosticSink]
pub struct Logger<S> {
    sink: S,
    level: Level,
}

struct SinkOutput<'a, S: DiagnosticSink> {
    inner: &'a mut S,
}

impl<S: DiagnosticSink> fmt::Write for SinkOutput<'_, S> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        let mut rest = s;
        while let Some(pos) = rest.find('\n') {
            self.inner.write_string(&rest[..pos]);
            self.inner.write_string("\r\n");
            rest = &rest[pos + 1..];
        }
        if !rest.is_empty() {
            self.inner.write_string(rest);
        }
        Ok(())
    }
}

impl<S: DiagnosticSink> Logger<S> {
    /// Constructs a logger which drops messages below `level`
    pub const fn new(sink: S, level: Level) -> Self {
        Self { sink, level }
    }

    /// Returns the current threshold
    pub const fn level(&self) -> Level {
        self.level
    }

    /// Changes the threshold
    pub fn set_level(&mut self, level: Level) {
        self.level = level;
    }

    /// Returns a reference to the underlying sink
    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Returns a mutable reference to the underlying sink
    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    /// Replaces the sink, keeping the threshold
    pub fn with_sink<T: DiagnosticSink>(self, sink: T) -> Logger<T> {
        Logger {
            sink,
            level: self.level,
        }
    }

    #[doc(hidden)]
    pub fn _log(&mut self, level: Level, args: fmt::Arguments) {
        use fmt::Write;

        if level < self.level {
            return;
        }
        SinkOutput {
            inner: &mut self.sink,
        }
        .write_fmt(args)
        .ok();
    }
}

/// Writes a formatted message to the logger at the given level
#[macro_export]
macro_rules! log_print {
    ($log:expr, $level:expr, $($it:tt)+) => ($log._log($level, format_args!($($it)+)))
}

/// Writes a message, annotated with current file and line, with a newline, to
/// debug level output.
#[macro_export]
macro_rules! debugln {
    ($log:expr, $($it:tt)+) => (
        $crate::log_print!($log, $crate::debug::Level::Debug, "[{}:{}] {}\n", file!(), line!(), format_args!($($it)+))
    )
}

/// Writes a message, annotated with current file and line, with a newline, to
/// info level output.
#[macro_export]
macro_rules! infoln {
    ($log:expr, $($it:tt)+) => (
        $crate::log_print!($log, $crate::debug::Level::Info, "\x1B[1m[{}:{}] {}\x1B[0m\n", file!(), line!(), format_args!($($it)+))
    )
}

/// Writes a message, annotated with current file and line, with a newline, to
/// warning level output.
#[macro_export]
macro_rules! warnln {
    ($log:expr, $($it:tt)+) => (
        $crate::log_print!($log, $crate::debug::Level::Warn, "\x1B[33;1m[{}:{}] {}\x1B[0m\n", file!(), line!(), format_args!($($it)+))
    )
}

/// Writes a message, annotated with current file and line, with a newline, to
/// error level output.
#[macro_export]
macro_rules! errorln {
    ($log:expr, $($it:tt)+) => (
        $crate::log_print!($log, $crate::debug::Level::Error, "\x1B[41;1m[{}:{}] {}\x1B[0m\n", file!(), line!(), format_args!($($it)+))
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::string::String;

    #[derive(Default)]
    struct StringSink(String);

    impl DiagnosticSink for StringSink {
        fn write_string(&mut self, s: &str) {
            self.0.push_str(s);
        }
    }

    #[test]
    fn test_newline_expansion() {
        let mut log = Logger::new(StringSink::default(), Level::Debug);
        log_print!(log, Level::Info, "a\nb\n");
        assert_eq!(log.sink().0, "a\r\nb\r\n");
    }

    #[test]
    fn test_level_filter() {
        let mut log = Logger::new(StringSink::default(), Level::Warn);
        debugln!(log, "hidden {}", 1);
        infoln!(log, "hidden {}", 2);
        assert!(log.sink().0.is_empty());

        errorln!(log, "visible {}", 3);
        assert!(log.sink().0.contains("visible 3"));
        assert!(log.sink().0.contains("debug.rs"));
        assert!(log.sink().0.ends_with("\r\n"));
    }

    #[test]
    fn test_borrowed_sink() {
        let mut sink = StringSink::default();
        {
            let mut log = Logger::new(&mut sink, Level::Info);
            warnln!(log, "through a reference");
        }
        assert!(sink.0.contains("through a reference"));
    }
}
