//! Entry point binding a native surface to handles and the call serializer.

use crate::config::Config;
use crate::diagnostics::{DiagnosticSink, Diagnostics, StderrSink};
use crate::error::{Error, Result, check};
use crate::handle::ManagedHandle;
use crate::kind::{HandleKind, Retention};
use crate::lock::with_native_lock;
use crate::surface::{Address, NativeSurface};
use std::fmt;
use std::sync::Arc;

struct Shared {
    surface: Box<dyn NativeSurface>,
    diagnostics: Diagnostics,
}

/// Shared context for a native surface.
///
/// Cheap to clone. Every handle keeps the library it was created from alive,
/// so its release can still be issued when it is dropped.
#[derive(Clone)]
pub struct Library {
    shared: Arc<Shared>,
}

impl Library {
    /// Library over `surface`, configured from the environment.
    pub fn new(surface: impl NativeSurface + 'static) -> Self {
        Self::builder(surface).build()
    }

    pub fn builder(surface: impl NativeSurface + 'static) -> LibraryBuilder {
        LibraryBuilder {
            surface: Box::new(surface),
            config: None,
            sink: None,
        }
    }

    /// Library over the linked libspotify.
    #[cfg(feature = "link")]
    pub fn linked() -> Self {
        Self::new(crate::linked::LinkedSurface)
    }

    /// Whether retain/release calls are announced on the diagnostic stream.
    pub fn debug(&self) -> bool {
        self.shared.diagnostics.enabled()
    }

    /// Run `body` against the native surface while holding the native lock.
    pub fn call<T>(&self, body: impl FnOnce(&dyn NativeSurface) -> T) -> T {
        with_native_lock(|| body(&*self.shared.surface))
    }

    /// Wrap a pointer whose reference the native call already counted.
    pub fn adopt<K: HandleKind>(&self, address: Address) -> ManagedHandle<K> {
        ManagedHandle::adopt(self.clone(), address)
    }

    /// Wrap a borrowed pointer, retaining it now.
    pub fn retain<K: HandleKind>(&self, address: Address) -> Result<ManagedHandle<K>> {
        ManagedHandle::construct(self.clone(), address, Retention::Retain)
    }

    /// Fetch a borrowed pointer and retain it under one lock acquisition, so
    /// no other native call runs between the two.
    pub fn retain_borrowed<K: HandleKind, T>(
        &self,
        fetch: impl FnOnce() -> *mut T,
    ) -> Result<ManagedHandle<K>> {
        with_native_lock(|| {
            let address = Address::from_ptr(fetch());
            self.retain(address)
        })
    }

    /// Wrap `address` in the given retention mode.
    pub fn construct<K: HandleKind>(
        &self,
        address: Address,
        retention: Retention,
    ) -> Result<ManagedHandle<K>> {
        ManagedHandle::construct(self.clone(), address, retention)
    }

    /// Issue one reference-count call. Null addresses are a no-op.
    pub(crate) fn ref_count(&self, symbol: &str, address: Address) -> Result<()> {
        if address.is_null() {
            return Ok(());
        }

        self.call(|surface| {
            self.shared.diagnostics.native_call(symbol, address);
            match surface.ref_count(symbol, address) {
                Some(code) => check(code),
                None => Err(Error::UnknownSymbol(symbol.to_string())),
            }
        })
    }
}

impl fmt::Debug for Library {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Library")
            .field("debug", &self.debug())
            .finish_non_exhaustive()
    }
}

/// Builder for [`Library`].
pub struct LibraryBuilder {
    surface: Box<dyn NativeSurface>,
    config: Option<Config>,
    sink: Option<Box<dyn DiagnosticSink>>,
}

impl LibraryBuilder {
    /// Use `config` instead of reading the environment.
    pub fn config(mut self, config: Config) -> Self {
        self.config = Some(config);
        self
    }

    /// Send diagnostic lines to `sink` instead of stderr.
    pub fn diagnostic_sink(mut self, sink: impl DiagnosticSink + 'static) -> Self {
        self.sink = Some(Box::new(sink));
        self
    }

    pub fn build(self) -> Library {
        let config = self.config.unwrap_or_else(Config::from_env);
        let sink = self.sink.unwrap_or_else(|| Box::new(StderrSink));
        tracing::debug!(debug = config.debug, "native library context created");

        Library {
            shared: Arc::new(Shared {
                surface: self.surface,
                diagnostics: Diagnostics::new(config.debug, sink),
            }),
        }
    }
}
