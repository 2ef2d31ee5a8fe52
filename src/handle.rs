//! Reference-counted wrapper for opaque native objects.

use crate::error::Result;
use crate::kind::{self, HandleKind, KindDescriptor, KindTag, Retention};
use crate::library::Library;
use crate::surface::Address;
use libc::c_void;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;

/// Owned handle to a native object of kind `K`.
///
/// Each handle owns exactly one unit of the object's native reference count
/// and gives it back when dropped. A handle built with
/// [`Retention::Retain`] acquires that unit on construction; one built with
/// [`Retention::Adopt`] takes over a unit the native call already counted.
///
/// Handles of different kinds are different types. A `Track` can never be
/// passed where an `Album` is expected, and the two never compare equal.
///
/// # Thread Safety
///
/// Handles are `Send` and `Sync`. Every retain and release goes through the
/// process-wide native lock.
pub struct ManagedHandle<K: HandleKind> {
    address: Address,
    descriptor: &'static KindDescriptor,
    library: Library,
    owns_reference: bool,
    _kind: PhantomData<fn() -> K>,
}

impl<K: HandleKind> ManagedHandle<K> {
    /// Wrap `address` in the given retention mode.
    ///
    /// With [`Retention::Retain`] the native `add_ref` is issued immediately
    /// (skipped for null); its failure is returned and the handle is not
    /// created.
    pub fn construct(library: Library, address: Address, retention: Retention) -> Result<Self> {
        let descriptor = kind::descriptor(K::TAG, retention);
        let mut handle = Self {
            address,
            descriptor,
            library,
            owns_reference: false,
            _kind: PhantomData,
        };

        if descriptor.retains_on_construction() {
            handle
                .library
                .ref_count(descriptor.add_ref_symbol(), address)?;
        }
        handle.owns_reference = true;

        tracing::trace!(
            kind = descriptor.name(),
            %address,
            retained = descriptor.retains_on_construction(),
            "handle constructed"
        );
        Ok(handle)
    }

    /// Wrap a pointer whose reference has already been counted.
    pub fn adopt(library: Library, address: Address) -> Self {
        Self {
            address,
            descriptor: kind::descriptor(K::TAG, Retention::Adopt),
            library,
            owns_reference: true,
            _kind: PhantomData,
        }
    }

    pub fn address(&self) -> Address {
        self.address
    }

    pub fn as_ptr(&self) -> *mut c_void {
        self.address.as_ptr()
    }

    pub fn is_null(&self) -> bool {
        self.address.is_null()
    }

    pub fn kind(&self) -> KindTag {
        K::TAG
    }

    pub fn descriptor(&self) -> &'static KindDescriptor {
        self.descriptor
    }

    pub fn library(&self) -> &Library {
        &self.library
    }

    /// Increment the native reference count.
    ///
    /// The extra reference is not owned by this handle; the caller must
    /// balance it.
    pub fn retain(&self) -> Result<()> {
        self.library
            .ref_count(self.descriptor.add_ref_symbol(), self.address)
    }

    /// A second owner of the same object, holding its own reference.
    pub fn try_clone(&self) -> Result<Self> {
        Self::construct(self.library.clone(), self.address, Retention::Retain)
    }

    /// Release the owned reference now, reporting native failure.
    pub fn release(mut self) -> Result<()> {
        self.release_owned()
    }

    /// Give up ownership without releasing. The caller becomes responsible
    /// for the reference.
    pub fn into_raw(mut self) -> Address {
        self.owns_reference = false;
        self.address
    }

    fn release_owned(&mut self) -> Result<()> {
        if !std::mem::replace(&mut self.owns_reference, false) {
            return Ok(());
        }
        self.library
            .ref_count(self.descriptor.release_symbol(), self.address)
    }
}

impl<K: HandleKind> Drop for ManagedHandle<K> {
    fn drop(&mut self) {
        if let Err(error) = self.release_owned() {
            tracing::warn!(
                kind = self.descriptor.name(),
                address = %self.address,
                %error,
                "release failed during cleanup"
            );
        }
    }
}

impl<A: HandleKind, B: HandleKind> PartialEq<ManagedHandle<B>> for ManagedHandle<A> {
    fn eq(&self, other: &ManagedHandle<B>) -> bool {
        self.address == other.address && self.descriptor == other.descriptor
    }
}

impl<K: HandleKind> Eq for ManagedHandle<K> {}

impl<K: HandleKind> Hash for ManagedHandle<K> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        K::TAG.hash(state);
        self.address.hash(state);
    }
}

impl<K: HandleKind> fmt::Debug for ManagedHandle<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(address={})", K::TAG.type_name(), self.address)
    }
}

pub type Album = ManagedHandle<kind::Album>;
pub type AlbumBrowse = ManagedHandle<kind::AlbumBrowse>;
pub type Artist = ManagedHandle<kind::Artist>;
pub type ArtistBrowse = ManagedHandle<kind::ArtistBrowse>;
pub type Image = ManagedHandle<kind::Image>;
pub type Inbox = ManagedHandle<kind::Inbox>;
pub type Link = ManagedHandle<kind::Link>;
pub type Playlist = ManagedHandle<kind::Playlist>;
pub type PlaylistContainer = ManagedHandle<kind::PlaylistContainer>;
pub type Search = ManagedHandle<kind::Search>;
pub type ToplistBrowse = ManagedHandle<kind::ToplistBrowse>;
pub type Track = ManagedHandle<kind::Track>;
pub type User = ManagedHandle<kind::User>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::test_support::{CaptureSink, RecordingSurface};
    use crate::{Error, ErrorCode};
    use std::collections::HashSet;
    use std::sync::Arc;

    fn library(surface: &Arc<RecordingSurface>) -> Library {
        Library::builder(Arc::clone(surface))
            .config(Config::default())
            .build()
    }

    #[test]
    fn test_adopted_handle_releases_once() {
        let surface = RecordingSurface::new();
        let lib = library(&surface);

        let track: Track = lib.adopt(Address::new(0x1000));
        assert!(surface.calls().is_empty());
        drop(track);

        assert_eq!(surface.calls(), vec![("track_release".to_string(), Address::new(0x1000))]);
    }

    #[test]
    fn test_retained_handle_balances_count() {
        let surface = RecordingSurface::new();
        surface.set_count(Address::new(0x2000), 3);
        let lib = library(&surface);

        let album: Album = lib.retain(Address::new(0x2000)).unwrap();
        assert_eq!(surface.count(Address::new(0x2000)), 4);
        drop(album);
        assert_eq!(surface.count(Address::new(0x2000)), 3);
        assert_eq!(surface.calls().len(), 2);
    }

    #[test]
    fn test_null_handle_makes_no_calls() {
        let surface = RecordingSurface::new();
        let lib = library(&surface);

        let user: User = lib.retain(Address::NULL).unwrap();
        assert!(user.is_null());
        user.retain().unwrap();
        user.release().unwrap();

        let playlist: Playlist = lib.adopt(Address::NULL);
        drop(playlist);

        assert!(surface.calls().is_empty());
    }

    #[test]
    fn test_explicit_release_is_not_repeated_on_drop() {
        let surface = RecordingSurface::new();
        let lib = library(&surface);

        let image: Image = lib.adopt(Address::new(0x40));
        image.release().unwrap();
        assert_eq!(surface.calls().len(), 1);
    }

    #[test]
    fn test_failed_release_reported_once_and_not_retried() {
        let surface = RecordingSurface::new();
        surface.fail_with(ErrorCode::OtherPermanent);
        let lib = library(&surface);

        let link: Link = lib.adopt(Address::new(0x50));
        let err = link.release().unwrap_err();
        assert_eq!(err.code(), Some(ErrorCode::OtherPermanent));
        assert_eq!(surface.calls().len(), 1);
    }

    #[test]
    fn test_cleanup_failure_is_swallowed() {
        let surface = RecordingSurface::new();
        surface.fail_with(ErrorCode::OtherTransient);
        let lib = library(&surface);

        let search: Search = lib.adopt(Address::new(0x60));
        drop(search);
        assert_eq!(surface.calls().len(), 1);
    }

    #[test]
    fn test_failed_retain_creates_no_handle() {
        let surface = RecordingSurface::new();
        surface.fail_with(ErrorCode::ResourceNotLoaded);
        let lib = library(&surface);

        let result: Result<Artist> = lib.retain(Address::new(0x70));
        assert!(matches!(
            result,
            Err(Error::Native { code: ErrorCode::ResourceNotLoaded, .. })
        ));
        // Only the failed add_ref; nothing released for a reference never taken.
        assert_eq!(surface.calls(), vec![("artist_add_ref".to_string(), Address::new(0x70))]);
    }

    #[test]
    fn test_explicit_retain_is_callers_to_balance() {
        let surface = RecordingSurface::new();
        let lib = library(&surface);

        let inbox: Inbox = lib.adopt(Address::new(0x80));
        inbox.retain().unwrap();
        inbox.retain().unwrap();
        drop(inbox);

        assert_eq!(surface.count(Address::new(0x80)), 1);
    }

    #[test]
    fn test_try_clone_owns_its_own_reference() {
        let surface = RecordingSurface::new();
        let lib = library(&surface);

        let first: Playlist = lib.retain(Address::new(0x90)).unwrap();
        let second = first.try_clone().unwrap();
        assert_eq!(first, second);
        assert_eq!(surface.count(Address::new(0x90)), 2);

        drop(first);
        assert_eq!(surface.count(Address::new(0x90)), 1);
        drop(second);
        assert_eq!(surface.count(Address::new(0x90)), 0);
    }

    #[test]
    fn test_into_raw_leaks() {
        let surface = RecordingSurface::new();
        let lib = library(&surface);

        let track: Track = lib.adopt(Address::new(0xa0));
        assert_eq!(track.into_raw(), Address::new(0xa0));
        assert!(surface.calls().is_empty());
    }

    #[test]
    fn test_equality_across_retention_and_kind() {
        let surface = RecordingSurface::new();
        let lib = library(&surface);
        let address = Address::new(0xb0);

        let plain: Track = lib.adopt(address);
        let retained: Track = lib.retain(address).unwrap();
        let album: Album = lib.adopt(address);
        let other: Track = lib.adopt(Address::new(0xb8));

        assert_eq!(plain, retained);
        assert_eq!(retained, plain);
        assert!(plain != album);
        assert!(album != plain);
        assert_ne!(plain, other);
    }

    #[test]
    fn test_hash_consistent_with_equality() {
        let surface = RecordingSurface::new();
        let lib = library(&surface);

        let mut set = HashSet::new();
        let a: Track = lib.adopt(Address::new(0xc0));
        let b: Track = lib.retain(Address::new(0xc0)).unwrap();
        assert!(set.insert(a));
        assert!(!set.insert(b));
    }

    #[test]
    fn test_debug_format() {
        let surface = RecordingSurface::new();
        let lib = library(&surface);

        let container: PlaylistContainer = lib.adopt(Address::new(0x1000));
        assert_eq!(format!("{container:?}"), "PlaylistContainer(address=0x1000)");
        assert_eq!(container.kind(), KindTag::PlaylistContainer);
        assert!(surface.calls().is_empty());
    }

    #[test]
    fn test_diagnostic_lines() {
        let surface = RecordingSurface::new();
        let sink = Arc::new(CaptureSink::default());
        let lib = Library::builder(Arc::clone(&surface))
            .config(Config::default().with_debug(true))
            .diagnostic_sink(Arc::clone(&sink))
            .build();

        let browse: ToplistBrowse = lib.retain(Address::new(0x1000)).unwrap();
        drop(browse);
        let null: ToplistBrowse = lib.adopt(Address::NULL);
        drop(null);

        assert_eq!(
            sink.lines(),
            vec!["toplistbrowse_add_ref(0x1000)", "toplistbrowse_release(0x1000)"]
        );
    }

    #[test]
    fn test_as_ptr_matches_sys_pointer_type() {
        let surface = RecordingSurface::new();
        let lib = library(&surface);

        let track: Track = lib.adopt(Address::new(0x1000));
        let ptr: *mut libc::c_void = track.as_ptr();
        let raw: *mut crate::sys::sp_track = ptr.cast();
        assert_eq!(raw as usize, 0x1000);
        assert_eq!(track.into_raw(), Address::new(0x1000));
    }

    #[test]
    fn test_handles_are_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Track>();
        assert_send_sync::<Library>();
    }
}
