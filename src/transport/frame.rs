//! Frame constants, the outbound response frame, and host-side request
//! framing.

use core::fmt::{self, Write};

use crate::digest::Digest;
use crate::error::{Error, Result};

/// Fixed size of one transport frame in bytes.
pub const FRAME_SIZE: usize = 64;

/// Bytes of length metadata at the start of a header frame.
pub const HEADER_SIZE: usize = 4;

/// One outbound frame, backed by fixed storage. The three shapes on the
/// wire are a zero-length ack, a 32-byte hex digest, and an ASCII error
/// string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    buf: [u8; FRAME_SIZE],
    len: usize,
}

impl Response {
    /// Zero-length acknowledgment: more payload expected.
    pub(crate) fn ack() -> Self {
        Self {
            buf: [0u8; FRAME_SIZE],
            len: 0,
        }
    }

    /// Digest frame: 32 lowercase hex characters.
    pub(crate) fn digest(digest: &Digest) -> Result<Self> {
        let mut resp = Self::ack();
        resp.len = digest.write_hex(&mut resp.buf)?.len();
        Ok(resp)
    }

    /// Error frame: `"error: <reason>"`, truncated at the frame size if
    /// the reason does not fit.
    pub(crate) fn error(err: &Error) -> Self {
        let mut resp = Self::ack();
        let mut writer = FrameWriter {
            buf: &mut resp.buf,
            len: 0,
        };
        // FrameWriter never errors; it truncates instead
        let _ = write!(writer, "error: {err}");
        resp.len = writer.len;
        resp
    }

    /// The bytes to put on the wire.
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf[..self.len]
    }

    /// True for the zero-length acknowledgment frame.
    pub fn is_ack(&self) -> bool {
        self.len == 0
    }
}

/// `fmt::Write` over a fixed buffer. Output past the end is dropped: a
/// truncated error frame still has to reach the peer.
struct FrameWriter<'a> {
    buf: &'a mut [u8; FRAME_SIZE],
    len: usize,
}

impl Write for FrameWriter<'_> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        let take = s.len().min(FRAME_SIZE - self.len);
        self.buf[self.len..self.len + take].copy_from_slice(&s.as_bytes()[..take]);
        self.len += take;
        Ok(())
    }
}

/// Host-side framing: prepends the little-endian u32 total length and
/// chops the combined stream into frames of at most [`FRAME_SIZE`] bytes.
///
/// The device side never allocates; this helper is for the sending host,
/// where it is the exact counterpart of the reassembler.
pub fn encode_request(message: &[u8]) -> Vec<Vec<u8>> {
    let mut stream = Vec::with_capacity(HEADER_SIZE + message.len());
    stream.extend_from_slice(&(message.len() as u32).to_le_bytes());
    stream.extend_from_slice(message);

    stream.chunks(FRAME_SIZE).map(<[u8]>::to_vec).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::digest::md5_digest;

    #[test]
    fn encode_request_chops_length_prefixed_stream() {
        let message = vec![0x42u8; 1016];
        let frames = encode_request(&message);

        // 4-byte header + 1016 payload = 1020 bytes = 15 full frames + 60
        assert_eq!(frames.len(), 16);
        assert!(frames[..15].iter().all(|f| f.len() == FRAME_SIZE));
        assert_eq!(frames[15].len(), 60);
        assert_eq!(frames[0][..4], 1016u32.to_le_bytes());
        assert_eq!(&frames[0][4..], &message[..60]);
    }

    #[test]
    fn encode_request_empty_message_is_one_header_frame() {
        let frames = encode_request(b"");
        assert_eq!(frames.len(), 1);
        assert_eq!(frames[0], 0u32.to_le_bytes());
    }

    #[test]
    fn ack_is_empty() {
        let resp = Response::ack();
        assert!(resp.is_ack());
        assert!(resp.as_bytes().is_empty());
    }

    #[test]
    fn digest_response_is_32_hex_bytes() {
        let resp = Response::digest(&md5_digest(b"abc")).unwrap();
        assert_eq!(resp.as_bytes(), b"900150983cd24fb0d6963f7d28e17f72");
    }

    #[test]
    fn error_response_carries_wire_text() {
        let resp = Response::error(&Error::MessageTooLong { len: 5000, max: 4096 });
        assert_eq!(resp.as_bytes(), b"error: msg too long. got len 5000.");
    }

    #[test]
    fn error_response_fits_one_frame() {
        let resp = Response::error(&Error::MessageTooLong {
            len: usize::MAX,
            max: 0,
        });
        assert!(resp.as_bytes().len() <= FRAME_SIZE);
        assert!(resp.as_bytes().starts_with(b"error: "));
    }

    #[test]
    fn frame_writer_truncates_at_capacity() {
        let mut buf = [0u8; FRAME_SIZE];
        let mut writer = FrameWriter { buf: &mut buf, len: 0 };
        let _ = write!(writer, "{}", "x".repeat(2 * FRAME_SIZE));
        assert_eq!(writer.len, FRAME_SIZE);
    }
}
