//! Boundary to the native library.

use libc::c_void;
use std::fmt;
use std::sync::Arc;

/// Address of an opaque native object.
///
/// Carries no type information; the kind is imposed by the handle that
/// holds it.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Address(usize);

impl Address {
    pub const NULL: Address = Address(0);

    pub const fn new(raw: usize) -> Self {
        Self(raw)
    }

    pub fn from_ptr<T>(ptr: *mut T) -> Self {
        Self(ptr as usize)
    }

    pub fn as_ptr(self) -> *mut c_void {
        self.0 as *mut c_void
    }

    pub fn as_usize(self) -> usize {
        self.0
    }

    pub fn is_null(self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#x}", self.0)
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

/// Callable native functions, looked up by name.
///
/// Implementations are invoked only while the native lock is held; they do
/// not need to synchronize themselves.
pub trait NativeSurface: Send + Sync {
    /// Invoke the reference-count function `symbol` (one of
    /// `<kind>_add_ref` / `<kind>_release`) on `address`.
    ///
    /// Returns the raw `sp_error` code, or `None` when the surface has no
    /// function with that name.
    fn ref_count(&self, symbol: &str, address: Address) -> Option<i32>;
}

impl<T: NativeSurface + ?Sized> NativeSurface for Arc<T> {
    fn ref_count(&self, symbol: &str, address: Address) -> Option<i32> {
        (**self).ref_count(symbol, address)
    }
}

impl<T: NativeSurface + ?Sized> NativeSurface for Box<T> {
    fn ref_count(&self, symbol: &str, address: Address) -> Option<i32> {
        (**self).ref_count(symbol, address)
    }
}
