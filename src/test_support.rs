//! Instrumented stand-ins for the native surface and diagnostic stream.

use crate::diagnostics::DiagnosticSink;
use crate::error::ErrorCode;
use crate::kind::KindTag;
use crate::lock;
use crate::surface::{Address, NativeSurface};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use std::thread;
use std::time::Instant;

/// Records every reference-count call and tracks a count per address.
///
/// Each call also records its entry/exit window and the native lock depth it
/// ran at. Count updates are a split read-yield-write, so they only stay
/// balanced when callers serialize.
#[derive(Default)]
pub(crate) struct RecordingSurface {
    calls: Mutex<Vec<(String, Address)>>,
    windows: Mutex<Vec<(Instant, Instant)>>,
    depths: Mutex<Vec<usize>>,
    counts: Mutex<HashMap<Address, i64>>,
    failure: Mutex<Option<ErrorCode>>,
}

impl RecordingSurface {
    pub(crate) fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Make every subsequent call report `code` without touching counts.
    pub(crate) fn fail_with(&self, code: ErrorCode) {
        *self.failure.lock() = Some(code);
    }

    pub(crate) fn set_count(&self, address: Address, count: i64) {
        self.counts.lock().insert(address, count);
    }

    pub(crate) fn count(&self, address: Address) -> i64 {
        self.counts.lock().get(&address).copied().unwrap_or(0)
    }

    pub(crate) fn calls(&self) -> Vec<(String, Address)> {
        self.calls.lock().clone()
    }

    /// Entry/exit windows of every successful call, sorted by entry.
    pub(crate) fn windows(&self) -> Vec<(Instant, Instant)> {
        let mut windows = self.windows.lock().clone();
        windows.sort_by_key(|(entry, _)| *entry);
        windows
    }

    /// Native lock depth observed by each call, in call order.
    pub(crate) fn depths(&self) -> Vec<usize> {
        self.depths.lock().clone()
    }
}

impl NativeSurface for RecordingSurface {
    fn ref_count(&self, symbol: &str, address: Address) -> Option<i32> {
        let (name, delta) = if let Some(name) = symbol.strip_suffix("_add_ref") {
            (name, 1)
        } else if let Some(name) = symbol.strip_suffix("_release") {
            (name, -1)
        } else {
            return None;
        };
        KindTag::from_name(name)?;

        self.calls.lock().push((symbol.to_string(), address));
        self.depths.lock().push(lock::depth());
        if let Some(code) = *self.failure.lock() {
            return Some(code.as_raw());
        }

        let entry = Instant::now();
        let current = self.count(address);
        thread::yield_now();
        self.set_count(address, current + delta);
        let exit = Instant::now();
        self.windows.lock().push((entry, exit));

        Some(ErrorCode::Ok.as_raw())
    }
}

/// Collects diagnostic lines in memory.
#[derive(Default)]
pub(crate) struct CaptureSink {
    lines: Mutex<Vec<String>>,
}

impl CaptureSink {
    pub(crate) fn lines(&self) -> Vec<String> {
        self.lines.lock().clone()
    }
}

impl DiagnosticSink for CaptureSink {
    fn line(&self, line: &str) {
        self.lines.lock().push(line.to_string());
    }
}
