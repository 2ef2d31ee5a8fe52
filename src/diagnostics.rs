//! Diagnostic stream for reference-count traffic.
//!
//! In debug mode every native retain/release is announced as one line,
//! `<kind>_add_ref(<address>)` or `<kind>_release(<address>)`, before the
//! call is issued.

use std::io::Write;

/// Receives diagnostic lines.
pub trait DiagnosticSink: Send + Sync {
    fn line(&self, line: &str);
}

impl<T: DiagnosticSink + ?Sized> DiagnosticSink for std::sync::Arc<T> {
    fn line(&self, line: &str) {
        (**self).line(line)
    }
}

/// Writes lines to stderr and mirrors them as `tracing` events.
#[derive(Debug, Default, Clone, Copy)]
pub struct StderrSink;

impl DiagnosticSink for StderrSink {
    fn line(&self, line: &str) {
        tracing::debug!(target: "spotify::diagnostics", "{line}");
        let _ = writeln!(std::io::stderr().lock(), "{line}");
    }
}

/// Gate in front of a sink; silent unless debug mode is on.
pub(crate) struct Diagnostics {
    enabled: bool,
    sink: Box<dyn DiagnosticSink>,
}

impl Diagnostics {
    pub(crate) fn new(enabled: bool, sink: Box<dyn DiagnosticSink>) -> Self {
        Self { enabled, sink }
    }

    pub(crate) fn enabled(&self) -> bool {
        self.enabled
    }

    pub(crate) fn native_call(&self, symbol: &str, address: crate::Address) {
        if self.enabled {
            self.sink.line(&format!("{symbol}({address})"));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Address;
    use crate::test_support::CaptureSink;
    use std::sync::Arc;

    #[test]
    fn test_line_format() {
        let sink = Arc::new(CaptureSink::default());
        let diagnostics = Diagnostics::new(true, Box::new(Arc::clone(&sink)));
        diagnostics.native_call("track_release", Address::new(0x1000));
        diagnostics.native_call("album_add_ref", Address::new(0xabc));
        assert_eq!(sink.lines(), vec!["track_release(0x1000)", "album_add_ref(0xabc)"]);
    }

    #[test]
    fn test_disabled_is_silent() {
        let sink = Arc::new(CaptureSink::default());
        let diagnostics = Diagnostics::new(false, Box::new(Arc::clone(&sink)));
        diagnostics.native_call("track_release", Address::new(0x1000));
        assert!(sink.lines().is_empty());
        assert!(!diagnostics.enabled());
    }
}
