//! # Native Status Codes
//!
//! Result convention of every native primitive: a status code, where
//! "buffer too small" is a distinguished, non-fatal code carrying the
//! required size.

/// Status returned by a native primitive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NativeStatus {
    Success,
    /// The supplied buffer cannot hold the result; `required` is the size
    /// the native layer asks for. `required == 0` means "no data at all",
    /// not a growth request.
    BufferTooSmall { required: u32 },
    /// Any other native error, by code. See [`codes`].
    Error(u32),
}

impl NativeStatus {
    pub fn is_success(self) -> bool {
        matches!(self, NativeStatus::Success)
    }
}

/// Native error codes surfaced by the dial layer.
///
/// Numeric values follow the RAS convention so logs line up with OS
/// documentation.
pub mod codes {
    /// A port or handle is already open for this attempt.
    pub const ERROR_PORT_ALREADY_OPEN: u32 = 602;
    /// The supplied buffer is too small (paired with a required size).
    pub const ERROR_BUFFER_TOO_SMALL: u32 = 603;
    /// The referenced handle is invalid or already closed.
    pub const ERROR_INVALID_HANDLE: u32 = 609;
    /// The named entry does not exist in the phonebook.
    pub const ERROR_CANNOT_FIND_PHONEBOOK_ENTRY: u32 = 623;
    /// The attempt was cancelled by user request.
    pub const ERROR_USER_DISCONNECTION: u32 = 631;
    /// The remote side rejected the supplied credentials.
    pub const ERROR_AUTHENTICATION_FAILURE: u32 = 691;
}
