//! Raw libspotify declarations.
//!
//! Types are always available so records can be built and inspected without
//! the library. Functions are declared only with the `link` feature.
//!
//! Nothing here takes the native lock. Call through
//! [`with_native_lock`](crate::with_native_lock) or the wrappers in
//! [`linked`](crate::linked).

#![allow(non_camel_case_types)]

use libc::{c_char, c_int, c_void, size_t};

pub type sp_error = c_int;
pub type sp_bitrate = c_int;
pub type sp_connectionstate = c_int;

pub const SP_ERROR_OK: sp_error = 0;
pub const SPOTIFY_API_VERSION: c_int = 12;

macro_rules! opaque_records {
    ($($name:ident),+ $(,)?) => {
        $(
            #[repr(C)]
            pub struct $name {
                _private: [u8; 0],
            }
        )+
    };
}

opaque_records! {
    sp_session,
    sp_track,
    sp_album,
    sp_albumbrowse,
    sp_artist,
    sp_artistbrowse,
    sp_image,
    sp_inbox,
    sp_link,
    sp_playlist,
    sp_playlistcontainer,
    sp_search,
    sp_toplistbrowse,
    sp_user,
}

/// Audio format of delivered PCM frames.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default)]
pub struct sp_audioformat {
    pub sample_type: c_int,
    pub sample_rate: c_int,
    pub channels: c_int,
}

/// Playback buffer statistics.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default)]
pub struct sp_audio_buffer_stats {
    pub samples: c_int,
    pub stutter: c_int,
}

/// Data for an offline sync in progress.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default)]
pub struct sp_offline_sync_status {
    pub queued_tracks: c_int,
    pub queued_bytes: u64,
    pub done_tracks: c_int,
    pub done_bytes: u64,
    pub copied_tracks: c_int,
    pub copied_bytes: u64,
    pub willnotcopy_tracks: c_int,
    pub error_tracks: c_int,
    pub syncing: bool,
}

pub type session_error_cb = unsafe extern "C" fn(session: *mut sp_session, error: sp_error);
pub type session_cb = unsafe extern "C" fn(session: *mut sp_session);
pub type session_message_cb = unsafe extern "C" fn(session: *mut sp_session, message: *const c_char);
pub type music_delivery_cb = unsafe extern "C" fn(
    session: *mut sp_session,
    format: *const sp_audioformat,
    frames: *const c_void,
    num_frames: c_int,
) -> c_int;
pub type audio_buffer_stats_cb =
    unsafe extern "C" fn(session: *mut sp_session, stats: *mut sp_audio_buffer_stats);

/// Session event notifications. Unset entries are `None`.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default)]
pub struct sp_session_callbacks {
    pub logged_in: Option<session_error_cb>,
    pub logged_out: Option<session_cb>,
    pub metadata_updated: Option<session_cb>,
    pub connection_error: Option<session_error_cb>,
    pub message_to_user: Option<session_message_cb>,
    pub notify_main_thread: Option<session_cb>,
    pub music_delivery: Option<music_delivery_cb>,
    pub play_token_lost: Option<session_cb>,
    pub log_message: Option<session_message_cb>,
    pub end_of_track: Option<session_cb>,
    pub streaming_error: Option<session_error_cb>,
    pub userinfo_updated: Option<session_cb>,
    pub start_playback: Option<session_cb>,
    pub stop_playback: Option<session_cb>,
    pub get_audio_buffer_stats: Option<audio_buffer_stats_cb>,
    pub offline_status_updated: Option<session_cb>,
    pub offline_error: Option<session_error_cb>,
    pub credentials_blob_updated: Option<session_message_cb>,
    pub connectionstate_updated: Option<session_cb>,
    pub scrobble_error: Option<session_error_cb>,
    pub private_session_mode_changed:
        Option<unsafe extern "C" fn(session: *mut sp_session, is_private: bool)>,
}

/// Session configuration; embeds the callback table by pointer.
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct sp_session_config {
    pub api_version: c_int,
    pub cache_location: *const c_char,
    pub settings_location: *const c_char,
    pub application_key: *const c_void,
    pub application_key_size: size_t,
    pub user_agent: *const c_char,
    pub callbacks: *const sp_session_callbacks,
    pub userdata: *mut c_void,
    pub compress_playlists: bool,
    pub dont_save_metadata_for_playlists: bool,
    pub initially_unload_playlists: bool,
    pub device_id: *const c_char,
    pub proxy: *const c_char,
    pub proxy_username: *const c_char,
    pub proxy_password: *const c_char,
    pub ca_certs_filename: *const c_char,
    pub tracefile: *const c_char,
}

impl Default for sp_session_config {
    fn default() -> Self {
        Self {
            api_version: SPOTIFY_API_VERSION,
            cache_location: std::ptr::null(),
            settings_location: std::ptr::null(),
            application_key: std::ptr::null(),
            application_key_size: 0,
            user_agent: std::ptr::null(),
            callbacks: std::ptr::null(),
            userdata: std::ptr::null_mut(),
            compress_playlists: false,
            dont_save_metadata_for_playlists: false,
            initially_unload_playlists: false,
            device_id: std::ptr::null(),
            proxy: std::ptr::null(),
            proxy_username: std::ptr::null(),
            proxy_password: std::ptr::null(),
            ca_certs_filename: std::ptr::null(),
            tracefile: std::ptr::null(),
        }
    }
}

#[cfg(feature = "link")]
#[link(name = "spotify")]
unsafe extern "C" {
    pub fn sp_error_message(error: sp_error) -> *const c_char;

    pub fn sp_session_create(
        config: *const sp_session_config,
        session: *mut *mut sp_session,
    ) -> sp_error;
    pub fn sp_session_release(session: *mut sp_session) -> sp_error;
    pub fn sp_session_process_events(session: *mut sp_session, next_timeout: *mut c_int)
    -> sp_error;
    pub fn sp_session_connectionstate(session: *mut sp_session) -> sp_connectionstate;

    pub fn sp_track_name(track: *mut sp_track) -> *const c_char;
    pub fn sp_track_album(track: *mut sp_track) -> *mut sp_album;
    pub fn sp_track_error(track: *mut sp_track) -> sp_error;
    pub fn sp_album_artist(album: *mut sp_album) -> *mut sp_artist;
    pub fn sp_album_name(album: *mut sp_album) -> *const c_char;
    pub fn sp_artist_name(artist: *mut sp_artist) -> *const c_char;

    pub fn sp_link_create_from_string(link: *const c_char) -> *mut sp_link;
    pub fn sp_link_as_track(link: *mut sp_link) -> *mut sp_track;

    pub fn sp_album_add_ref(album: *mut sp_album) -> sp_error;
    pub fn sp_album_release(album: *mut sp_album) -> sp_error;
    pub fn sp_albumbrowse_add_ref(alb: *mut sp_albumbrowse) -> sp_error;
    pub fn sp_albumbrowse_release(alb: *mut sp_albumbrowse) -> sp_error;
    pub fn sp_artist_add_ref(artist: *mut sp_artist) -> sp_error;
    pub fn sp_artist_release(artist: *mut sp_artist) -> sp_error;
    pub fn sp_artistbrowse_add_ref(arb: *mut sp_artistbrowse) -> sp_error;
    pub fn sp_artistbrowse_release(arb: *mut sp_artistbrowse) -> sp_error;
    pub fn sp_image_add_ref(image: *mut sp_image) -> sp_error;
    pub fn sp_image_release(image: *mut sp_image) -> sp_error;
    pub fn sp_inbox_add_ref(inbox: *mut sp_inbox) -> sp_error;
    pub fn sp_inbox_release(inbox: *mut sp_inbox) -> sp_error;
    pub fn sp_link_add_ref(link: *mut sp_link) -> sp_error;
    pub fn sp_link_release(link: *mut sp_link) -> sp_error;
    pub fn sp_playlist_add_ref(playlist: *mut sp_playlist) -> sp_error;
    pub fn sp_playlist_release(playlist: *mut sp_playlist) -> sp_error;
    pub fn sp_playlistcontainer_add_ref(pc: *mut sp_playlistcontainer) -> sp_error;
    pub fn sp_playlistcontainer_release(pc: *mut sp_playlistcontainer) -> sp_error;
    pub fn sp_search_add_ref(search: *mut sp_search) -> sp_error;
    pub fn sp_search_release(search: *mut sp_search) -> sp_error;
    pub fn sp_toplistbrowse_add_ref(tlb: *mut sp_toplistbrowse) -> sp_error;
    pub fn sp_toplistbrowse_release(tlb: *mut sp_toplistbrowse) -> sp_error;
    pub fn sp_track_add_ref(track: *mut sp_track) -> sp_error;
    pub fn sp_track_release(track: *mut sp_track) -> sp_error;
    pub fn sp_user_add_ref(user: *mut sp_user) -> sp_error;
    pub fn sp_user_release(user: *mut sp_user) -> sp_error;
}
