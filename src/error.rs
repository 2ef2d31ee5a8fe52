//! Error handling for the binding layer.
//!
//! This module provides the closed table of native `sp_error` codes, their
//! human-readable messages, and the crate-level [`Error`] type.

use serde::Serialize;
use thiserror::Error;

/// Error codes returned by native functions.
///
/// Discriminants are the raw `sp_error` values and are stable.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    /// No error
    Ok = 0,

    // Version and initialization (1-2)
    /// Library version does not match the headers
    BadApiVersion = 1,
    /// Library failed to initialize
    ApiInitializationFailed = 2,

    // Content state (3-4)
    /// Track is not playable
    TrackNotPlayable = 3,
    /// Resource has not been loaded yet
    ResourceNotLoaded = 4,

    // Authentication and client identity (6-12)
    /// Username or password rejected
    BadUsernameOrPassword = 6,
    /// Account has been banned
    UserBanned = 7,
    /// Could not reach the service
    UnableToContactServer = 8,
    /// Client must be upgraded
    ClientTooOld = 9,
    /// Unspecified permanent failure
    OtherPermanent = 10,
    /// User agent string rejected
    BadUserAgent = 11,
    /// A required callback was not provided
    MissingCallback = 12,

    // Input (13-14)
    /// Invalid input data
    InvalidIndata = 13,
    /// Index out of range
    IndexOutOfRange = 14,

    // Permissions and availability (15-22)
    /// Operation requires a premium account
    UserNeedsPremium = 15,
    /// Unspecified transient failure, retry later
    OtherTransient = 16,
    /// Resource is still loading
    IsLoading = 17,
    /// No stream available for playback
    NoStreamAvailable = 18,
    /// Permission denied
    PermissionDenied = 19,
    /// Recipient inbox is full
    InboxIsFull = 20,
    /// No cache configured
    NoCache = 21,
    /// No such user
    NoSuchUser = 22,
}

impl ErrorCode {
    /// Every defined code, in ascending numeric order.
    pub const ALL: [ErrorCode; 22] = [
        ErrorCode::Ok,
        ErrorCode::BadApiVersion,
        ErrorCode::ApiInitializationFailed,
        ErrorCode::TrackNotPlayable,
        ErrorCode::ResourceNotLoaded,
        ErrorCode::BadUsernameOrPassword,
        ErrorCode::UserBanned,
        ErrorCode::UnableToContactServer,
        ErrorCode::ClientTooOld,
        ErrorCode::OtherPermanent,
        ErrorCode::BadUserAgent,
        ErrorCode::MissingCallback,
        ErrorCode::InvalidIndata,
        ErrorCode::IndexOutOfRange,
        ErrorCode::UserNeedsPremium,
        ErrorCode::OtherTransient,
        ErrorCode::IsLoading,
        ErrorCode::NoStreamAvailable,
        ErrorCode::PermissionDenied,
        ErrorCode::InboxIsFull,
        ErrorCode::NoCache,
        ErrorCode::NoSuchUser,
    ];

    /// Look up a raw native code. Returns `None` outside the closed set.
    pub fn from_raw(code: i32) -> Option<Self> {
        Self::ALL.into_iter().find(|c| *c as i32 == code)
    }

    /// Raw native value.
    pub fn as_raw(self) -> i32 {
        self as i32
    }

    /// Human-readable message for this code.
    pub fn message(self) -> &'static str {
        match self {
            ErrorCode::Ok => "No error",
            ErrorCode::BadApiVersion => "Invalid library version",
            ErrorCode::ApiInitializationFailed => "Initialization failed",
            ErrorCode::TrackNotPlayable => "Track not playable",
            ErrorCode::ResourceNotLoaded => "Resource not loaded",
            ErrorCode::BadUsernameOrPassword => "Incorrect username or password",
            ErrorCode::UserBanned => "User banned",
            ErrorCode::UnableToContactServer => "Unable to contact server",
            ErrorCode::ClientTooOld => "Client too old",
            ErrorCode::OtherPermanent => "Unknown permanent error",
            ErrorCode::BadUserAgent => "Invalid user agent string",
            ErrorCode::MissingCallback => "Missing callback",
            ErrorCode::InvalidIndata => "Invalid input data",
            ErrorCode::IndexOutOfRange => "Index out of range",
            ErrorCode::UserNeedsPremium => "A premium account is required",
            ErrorCode::OtherTransient => "Transient error, try again later",
            ErrorCode::IsLoading => "Resource is loading",
            ErrorCode::NoStreamAvailable => "Could not find any suitable stream to play",
            ErrorCode::PermissionDenied => "Permission denied",
            ErrorCode::InboxIsFull => "Inbox is full",
            ErrorCode::NoCache => "No cache available",
            ErrorCode::NoSuchUser => "No such user",
        }
    }

    pub fn is_ok(self) -> bool {
        self == ErrorCode::Ok
    }

    /// `IsLoading` is a poll-again state rather than a failure.
    pub fn is_loading(self) -> bool {
        self == ErrorCode::IsLoading
    }
}

/// Translate a raw native error code into its message.
///
/// Pure lookup. Fails with [`Error::UnknownErrorCode`] for codes outside the
/// closed set.
pub fn message_for(code: i32) -> Result<&'static str> {
    ErrorCode::from_raw(code)
        .map(ErrorCode::message)
        .ok_or(Error::UnknownErrorCode(code))
}

/// Convert a raw native return code into a `Result`.
///
/// Any defined code other than `Ok` becomes [`Error::Native`], including
/// `IsLoading`. Callers that poll against loading state should inspect
/// [`ErrorCode::from_raw`] instead.
pub fn check(code: i32) -> Result<()> {
    match ErrorCode::from_raw(code) {
        Some(ErrorCode::Ok) => Ok(()),
        Some(code) => Err(Error::Native {
            code,
            message: code.message(),
        }),
        None => Err(Error::UnknownErrorCode(code)),
    }
}

/// Errors raised by the binding layer.
#[derive(Debug, Error)]
pub enum Error {
    /// A native call reported a non-success code.
    #[error("{message} ({code:?}, code {})", .code.as_raw())]
    Native {
        code: ErrorCode,
        message: &'static str,
    },

    /// A raw code outside the closed `sp_error` table.
    #[error("unknown native error code: {0}")]
    UnknownErrorCode(i32),

    /// The native surface has no function with this name.
    #[error("native surface has no function named `{0}`")]
    UnknownSymbol(String),

    /// Configuration could not be parsed.
    #[error("invalid configuration: {0}")]
    Config(#[from] serde_json::Error),
}

impl Error {
    /// Native code carried by this error, if any.
    pub fn code(&self) -> Option<ErrorCode> {
        match self {
            Error::Native { code, .. } => Some(*code),
            _ => None,
        }
    }
}

/// Result type for binding operations.
pub type Result<T> = std::result::Result<T, Error>;
