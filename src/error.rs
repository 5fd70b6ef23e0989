//! Error types shared across the crate.

use thiserror::Error;

/// Result type for digest and transport operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors produced by the digest engine and the frame transport.
///
/// Every variant is recoverable: the transport layer renders them as
/// textual error frames for the remote peer, and local state is left
/// ready for the next request.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// A message exceeds what the receiver can hold, or a fast-path input
    /// exceeds the single-block limit. The `Display` form is the exact
    /// reason text sent over the wire.
    #[error("msg too long. got len {len}.")]
    MessageTooLong { len: usize, max: usize },

    /// Caller-provided output storage is too small for the rendering
    /// requested. Retry with adequate storage.
    #[error("output buffer too small. need {needed} bytes, got {have}.")]
    BufferTooSmall { needed: usize, have: usize },

    /// A header frame too short to carry the 4-byte length prefix.
    #[error("truncated header frame. got {len} bytes.")]
    TruncatedHeader { len: usize },
}
