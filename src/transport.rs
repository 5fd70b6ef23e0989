//! Frame transport: wire format, request framing, and reassembly.
//!
//! The transport exchanges fixed-size frames (64 bytes) with a host over a
//! constrained serial/USB-like link. A digest request is a length-prefixed
//! byte stream chopped into frames:
//! - header frame: bytes `[0..4)` = little-endian u32 total message
//!   length, bytes `[4..)` = first chunk of payload
//! - continuation frames: payload only, until the announced length is met
//!
//! The device answers every inbound frame with exactly one outbound frame:
//! a zero-length acknowledgment while more payload is expected, the
//! 32-character lowercase hex digest once the message is complete, or an
//! ASCII `"error: <reason>"` frame. A transport that never receives a
//! reply stalls forever, so every path replies.

pub mod frame;
pub mod reassembly;

pub use frame::{encode_request, Response, FRAME_SIZE, HEADER_SIZE};
pub use reassembly::{Reassembler, DEFAULT_CAPACITY};
