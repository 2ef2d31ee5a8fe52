//! Safe handles and serialized calls over the libspotify C API.
//!
//! This crate wraps the opaque, reference-counted objects libspotify hands
//! out (tracks, albums, playlists, …) in typed owners that release them
//! exactly once, and funnels every native call through one process-wide
//! re-entrant lock.
//!
//! # Thread Safety
//!
//! libspotify is not thread-safe. Every native invocation made by this crate
//! runs inside [`with_native_lock`]; code calling [`sys`] directly must do
//! the same. Callbacks fired by the library should run through
//! [`callback::guard`].
//!
//! # Memory Management
//!
//! - A [`ManagedHandle`] owns one native reference and releases it on drop
//! - Pointers returned with a reference already counted are wrapped with
//!   [`Library::adopt`]; borrowed pointers with [`Library::retain`]
//! - Null pointers are never retained or released
//!
//! # Feature Flags
//!
//! - `link`: link against libspotify and expose [`linked`]
//!
//! # Diagnostics
//!
//! Set `SPOTIFY_DEBUG=1` (or [`Config::debug`]) to print every native
//! retain/release as `<kind>_add_ref(<address>)` / `<kind>_release(<address>)`.

pub mod callback;
mod config;
mod diagnostics;
mod error;
mod handle;
pub mod kind;
mod library;
#[cfg(feature = "link")]
pub mod linked;
mod lock;
mod surface;
pub mod sys;

#[cfg(test)]
mod test_support;

pub use config::{Config, DEBUG_ENV};
pub use diagnostics::{DiagnosticSink, StderrSink};
pub use error::{Error, ErrorCode, Result, check, message_for};
pub use handle::{
    Album, AlbumBrowse, Artist, ArtistBrowse, Image, Inbox, Link, ManagedHandle, Playlist,
    PlaylistContainer, Search, ToplistBrowse, Track, User,
};
pub use kind::{HandleKind, KindDescriptor, KindTag, Retention};
pub use library::{Library, LibraryBuilder};
pub use lock::{depth as native_lock_depth, is_held_by_current_thread, with_native_lock};
pub use surface::{Address, NativeSurface};
