pub mod digest;
pub mod error;
pub mod transport;

pub use digest::{md5, md5_digest, md5_digest_words, Digest, Md5, MD5_OUTPUT_SIZE};
pub use error::{Error, Result};
pub use transport::{encode_request, Reassembler, Response, FRAME_SIZE, HEADER_SIZE};
