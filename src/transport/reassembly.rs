//! Frame reassembly: reconstructing a digest request out of 64-byte
//! frames.
//!
//! A [`Reassembler`] is a two-state machine. In `AwaitingHeader` the next
//! frame opens a request: its first four bytes announce the total message
//! length, the rest is payload. In `AwaitingBody` every frame appends
//! payload until the announced length is met, at which point the buffered
//! message is digested and the hex result goes back to the host.
//!
//! Frames must be processed in arrival order; later frames land at buffer
//! offsets established by earlier ones. `accept` takes `&mut self`, so a
//! session has a single consumer by construction. Nothing on this path
//! allocates; the receive buffer is fixed capacity and reused across
//! requests.

use core::convert::TryInto;

use log::{debug, trace, warn};

use crate::digest::{md5_digest, md5_digest_words, SHORT_MESSAGE_MAX_WORDS};
use crate::error::{Error, Result};
use crate::transport::frame::{Response, HEADER_SIZE};

/// Receive-buffer capacity used by [`Reassembler`] unless overridden.
pub const DEFAULT_CAPACITY: usize = 4096;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    /// No bytes of the current message received yet.
    AwaitingHeader,
    /// A message of known total length is partially buffered.
    AwaitingBody,
}

/// Reassembly session for one transport connection.
///
/// `CAP` bounds the largest acceptable message; requests announcing more
/// are refused with an error frame and the session stays ready for the
/// next header. The session is reset by the next header frame rather
/// than destroyed.
#[derive(Debug, Clone)]
pub struct Reassembler<const CAP: usize = 4096> {
    state: State,
    buf: [u8; CAP],
    /// Bytes of the current message already received.
    received: usize,
    /// Bytes still owed by the sender.
    remaining: usize,
}

impl<const CAP: usize> Reassembler<CAP> {
    /// Creates an empty session awaiting a header frame.
    pub fn new() -> Self {
        Self {
            state: State::AwaitingHeader,
            buf: [0u8; CAP],
            received: 0,
            remaining: 0,
        }
    }

    /// Consumes one inbound frame and produces exactly one outbound
    /// frame: an ack while payload is still owed, the hex digest on
    /// completion, or an error frame. Every path replies; a silent
    /// receiver would stall the sender forever.
    pub fn accept(&mut self, frame: &[u8]) -> Response {
        match self.state {
            State::AwaitingHeader => self.accept_header(frame),
            State::AwaitingBody => self.accept_body(frame),
        }
    }

    fn accept_header(&mut self, frame: &[u8]) -> Response {
        if frame.len() < HEADER_SIZE {
            warn!("header frame of {} bytes, need {}", frame.len(), HEADER_SIZE);
            return Response::error(&Error::TruncatedHeader { len: frame.len() });
        }

        let length = u32::from_le_bytes(frame[..HEADER_SIZE].try_into().unwrap()) as usize;
        if length > CAP {
            warn!("refusing {length}-byte request, capacity is {CAP}");
            return Response::error(&Error::MessageTooLong { len: length, max: CAP });
        }

        let take = (frame.len() - HEADER_SIZE).min(length);
        self.buf[..take].copy_from_slice(&frame[HEADER_SIZE..HEADER_SIZE + take]);
        self.received = take;
        self.remaining = length.saturating_sub(take);
        trace!("header: announced {length}, buffered {take}, remaining {}", self.remaining);

        if self.remaining > 0 {
            self.state = State::AwaitingBody;
            Response::ack()
        } else {
            self.complete()
        }
    }

    fn accept_body(&mut self, frame: &[u8]) -> Response {
        let take = frame.len().min(self.remaining);
        self.buf[self.received..self.received + take].copy_from_slice(&frame[..take]);
        self.received += take;
        self.remaining -= take;
        trace!("body: buffered {take}, remaining {}", self.remaining);

        if self.remaining > 0 {
            Response::ack()
        } else {
            self.complete()
        }
    }

    /// Digests the buffered message and renders the reply. Any failure
    /// becomes an error frame; this never withholds a response.
    fn complete(&mut self) -> Response {
        self.state = State::AwaitingHeader;
        match self.digest_buffered() {
            Ok(resp) => resp,
            Err(err) => {
                warn!("digest of buffered message failed: {err}");
                Response::error(&err)
            }
        }
    }

    fn digest_buffered(&self) -> Result<Response> {
        let message = &self.buf[..self.received];

        // whole-word messages short enough for one block skip the general
        // padding logic; both paths produce identical digests
        let digest = if message.len() % 4 == 0 && message.len() / 4 <= SHORT_MESSAGE_MAX_WORDS {
            let mut words = [0u32; SHORT_MESSAGE_MAX_WORDS];
            let count = message.len() / 4;
            for (word, chunk) in words[..count].iter_mut().zip(message.chunks_exact(4)) {
                *word = u32::from_le_bytes(chunk.try_into().unwrap());
            }
            md5_digest_words(&words[..count])?
        } else {
            md5_digest(message)
        };

        debug!("request complete: {} bytes -> {digest}", message.len());
        Response::digest(&digest)
    }
}

impl<const CAP: usize> Default for Reassembler<CAP> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::digest::md5_digest;
    use crate::transport::frame::encode_request;

    /// Runs a full request through the machine, asserting the
    /// one-response-per-frame invariant, and returns the final frame.
    fn run_request<const CAP: usize>(
        session: &mut Reassembler<CAP>,
        message: &[u8],
    ) -> Response {
        let frames = encode_request(message);
        let mut responses: Vec<Response> = frames.iter().map(|f| session.accept(f)).collect();
        assert_eq!(responses.len(), frames.len());

        let last = responses.pop().unwrap();
        assert!(responses.iter().all(Response::is_ack), "non-final frames get acks");
        last
    }

    #[test]
    fn multi_frame_request_yields_acks_then_hex() {
        let message: Vec<u8> = (0..1016u32).map(|i| (i % 251) as u8).collect();
        let mut session = Reassembler::<4096>::new();

        let frames = encode_request(&message);
        assert_eq!(frames.len(), 16);

        let responses: Vec<Response> = frames.iter().map(|f| session.accept(f)).collect();
        assert!(responses[..15].iter().all(Response::is_ack));
        assert_eq!(responses[15].as_bytes(), md5_digest(&message).to_hex().as_bytes());
    }

    #[test]
    fn single_frame_request_completes_immediately() {
        let mut session = Reassembler::<4096>::new();
        let resp = run_request(&mut session, b"Hello, World!");
        assert_eq!(resp.as_bytes(), b"65a8e27d8879283831b664bd8b7f0ad4");
    }

    #[test]
    fn empty_request_digests_the_empty_message() {
        let mut session = Reassembler::<4096>::new();
        let resp = run_request(&mut session, b"");
        assert_eq!(resp.as_bytes(), b"d41d8cd98f00b204e9800998ecf8427e");
    }

    #[test]
    fn word_aligned_short_request_matches_general_path() {
        // 52 bytes = 13 words, the largest fast-path message
        let message = [0x5au8; 52];
        let mut session = Reassembler::<4096>::new();
        let resp = run_request(&mut session, &message);
        assert_eq!(resp.as_bytes(), md5_digest(&message).to_hex().as_bytes());
    }

    #[test]
    fn oversized_request_is_refused_and_session_survives() {
        let mut session = Reassembler::<64>::new();

        let mut header = vec![0u8; 64];
        header[..4].copy_from_slice(&100u32.to_le_bytes());
        let resp = session.accept(&header);
        assert_eq!(resp.as_bytes(), b"error: msg too long. got len 100.");

        // still AwaitingHeader: the next request is served normally
        let resp = run_request(&mut session, b"abc");
        assert_eq!(resp.as_bytes(), b"900150983cd24fb0d6963f7d28e17f72");
    }

    #[test]
    fn truncated_header_frame_gets_error_reply() {
        let mut session = Reassembler::<64>::new();
        let resp = session.accept(&[0x01, 0x02]);
        assert_eq!(resp.as_bytes(), b"error: truncated header frame. got 2 bytes.");

        let resp = run_request(&mut session, b"abc");
        assert_eq!(resp.as_bytes(), b"900150983cd24fb0d6963f7d28e17f72");
    }

    #[test]
    fn session_is_reusable_across_requests() {
        let mut session = Reassembler::<4096>::new();
        for message in [&b"abc"[..], &[0x77u8; 500], b"", b"message digest"] {
            let resp = run_request(&mut session, message);
            assert_eq!(resp.as_bytes(), md5_digest(message).to_hex().as_bytes());
        }
    }

    #[test]
    fn header_payload_beyond_announced_length_is_ignored() {
        // announce 3 bytes but fill the whole frame; only 3 count
        let mut frame = vec![0u8; 64];
        frame[..4].copy_from_slice(&3u32.to_le_bytes());
        frame[4..7].copy_from_slice(b"abc");
        frame[7..].fill(0xee);

        let mut session = Reassembler::<4096>::new();
        let resp = session.accept(&frame);
        assert_eq!(resp.as_bytes(), b"900150983cd24fb0d6963f7d28e17f72");
    }
}
