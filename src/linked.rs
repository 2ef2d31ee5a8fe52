//! Surface over the linked libspotify.
//!
//! Reference-count functions are looked up by name in a table built once per
//! process. Typed wrappers take the native lock and hand back managed
//! handles.

use crate::error::{ErrorCode, Result};
use crate::handle::{Album, Artist, Link, Track};
use crate::library::Library;
use crate::lock::with_native_lock;
use crate::surface::{Address, NativeSurface};
use crate::sys;
use libc::{c_char, c_void};
use std::collections::HashMap;
use std::ffi::{CStr, CString};
use std::sync::OnceLock;

type RefCountFn = fn(*mut c_void) -> sys::sp_error;

macro_rules! ref_count_table {
    ($($name:literal => $add_ref:ident, $release:ident;)+) => {
        fn build_table() -> HashMap<&'static str, RefCountFn> {
            let mut table: HashMap<&'static str, RefCountFn> = HashMap::new();
            $(
                table.insert(
                    concat!($name, "_add_ref"),
                    |ptr| unsafe { sys::$add_ref(ptr.cast()) },
                );
                table.insert(
                    concat!($name, "_release"),
                    |ptr| unsafe { sys::$release(ptr.cast()) },
                );
            )+
            table
        }
    };
}

ref_count_table! {
    "album" => sp_album_add_ref, sp_album_release;
    "albumbrowse" => sp_albumbrowse_add_ref, sp_albumbrowse_release;
    "artist" => sp_artist_add_ref, sp_artist_release;
    "artistbrowse" => sp_artistbrowse_add_ref, sp_artistbrowse_release;
    "image" => sp_image_add_ref, sp_image_release;
    "inbox" => sp_inbox_add_ref, sp_inbox_release;
    "link" => sp_link_add_ref, sp_link_release;
    "playlist" => sp_playlist_add_ref, sp_playlist_release;
    "playlistcontainer" => sp_playlistcontainer_add_ref, sp_playlistcontainer_release;
    "search" => sp_search_add_ref, sp_search_release;
    "toplistbrowse" => sp_toplistbrowse_add_ref, sp_toplistbrowse_release;
    "track" => sp_track_add_ref, sp_track_release;
    "user" => sp_user_add_ref, sp_user_release;
}

fn table() -> &'static HashMap<&'static str, RefCountFn> {
    static TABLE: OnceLock<HashMap<&'static str, RefCountFn>> = OnceLock::new();
    TABLE.get_or_init(build_table)
}

/// The real native surface.
#[derive(Debug, Default, Clone, Copy)]
pub struct LinkedSurface;

impl NativeSurface for LinkedSurface {
    fn ref_count(&self, symbol: &str, address: Address) -> Option<i32> {
        table().get(symbol).map(|f| f(address.as_ptr()))
    }
}

/// Copy a borrowed C string owned by the library.
///
/// # Safety
///
/// `ptr` must be null or point to a valid null-terminated string.
unsafe fn borrowed_string(ptr: *const c_char) -> Option<String> {
    if ptr.is_null() {
        return None;
    }
    let cstr = unsafe { CStr::from_ptr(ptr) };
    Some(cstr.to_string_lossy().into_owned())
}

/// Native message for `code`, as reported by the library itself.
pub fn error_message(code: ErrorCode) -> Option<String> {
    with_native_lock(|| unsafe { borrowed_string(sys::sp_error_message(code.as_raw())) })
}

pub fn track_name(track: &Track) -> Option<String> {
    with_native_lock(|| unsafe { borrowed_string(sys::sp_track_name(track.as_ptr().cast())) })
}

/// Album of `track`. The library lends the pointer, so it is retained
/// before the lock is given up.
pub fn track_album(track: &Track) -> Result<Album> {
    track
        .library()
        .retain_borrowed(|| unsafe { sys::sp_track_album(track.as_ptr().cast()) })
}

/// Artist of `album`. The library lends the pointer, so it is retained.
pub fn album_artist(album: &Album) -> Result<Artist> {
    album
        .library()
        .retain_borrowed(|| unsafe { sys::sp_album_artist(album.as_ptr().cast()) })
}

/// Parse a Spotify URI. The returned link already carries a reference.
pub fn link_create_from_string(library: &Library, uri: &str) -> Option<Link> {
    let uri = CString::new(uri).ok()?;
    let link = with_native_lock(|| unsafe { sys::sp_link_create_from_string(uri.as_ptr()) });
    let link: Link = library.adopt(Address::from_ptr(link));
    (!link.is_null()).then_some(link)
}

/// Track a link points at. The library lends the pointer, so it is retained.
pub fn link_as_track(link: &Link) -> Result<Track> {
    link
        .library()
        .retain_borrowed(|| unsafe { sys::sp_link_as_track(link.as_ptr().cast()) })
}
