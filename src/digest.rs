//! Message digest implementations.
//!
//! This module provides the MD5 message-digest engine used by the frame
//! transport:
//! - One-shot digesting of arbitrary-length byte messages
//! - A streaming context for incremental input
//! - A single-block fast path for messages of at most 13 words
//!
//! The digest value itself lives here as [`Digest`], together with its
//! canonical lowercase-hex rendering.

use core::fmt;

use crate::error::{Error, Result};

pub mod md5;

pub use md5::{md5_digest, md5_digest_words, Md5, MD5_OUTPUT_SIZE, SHORT_MESSAGE_MAX_WORDS};

/// Number of ASCII characters in the canonical hex rendering of a digest.
pub const HEX_DIGEST_LEN: usize = 2 * MD5_OUTPUT_SIZE;

/// A 128-bit MD5 digest, held as the four 32-bit state words the
/// algorithm accumulates.
///
/// The words are in machine-native arithmetic order; the canonical byte
/// and hex renderings serialize each word little-endian, per the MD5
/// specification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Digest {
    words: [u32; 4],
}

impl Digest {
    pub(crate) fn new(words: [u32; 4]) -> Self {
        Self { words }
    }

    /// The four accumulator words (A, B, C, D).
    pub fn words(&self) -> [u32; 4] {
        self.words
    }

    /// The 16 digest bytes, each word serialized little-endian.
    pub fn to_bytes(&self) -> [u8; MD5_OUTPUT_SIZE] {
        let mut out = [0u8; MD5_OUTPUT_SIZE];
        for (chunk, word) in out.chunks_exact_mut(4).zip(self.words) {
            chunk.copy_from_slice(&word.to_le_bytes());
        }
        out
    }

    /// Renders the digest as 32 lowercase hex characters into
    /// caller-provided storage, returning the rendered prefix as `&str`.
    ///
    /// Fails with [`Error::BufferTooSmall`] if `out` holds fewer than 32
    /// bytes. Does not allocate.
    pub fn write_hex<'a>(&self, out: &'a mut [u8]) -> Result<&'a str> {
        if out.len() < HEX_DIGEST_LEN {
            return Err(Error::BufferTooSmall {
                needed: HEX_DIGEST_LEN,
                have: out.len(),
            });
        }
        let dst = &mut out[..HEX_DIGEST_LEN];
        // cannot fail: dst is exactly twice the input length
        hex::encode_to_slice(self.to_bytes(), dst).expect("hex output length mismatch");
        Ok(core::str::from_utf8(dst).expect("hex output is ASCII"))
    }

    /// Convenience rendering into an owned `String`.
    pub fn to_hex(&self) -> String {
        hex::encode(self.to_bytes())
    }
}

impl fmt::Display for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for word in self.words {
            // byte-swap so the word renders in memory (little-endian) order
            write!(f, "{:08x}", word.swap_bytes())?;
        }
        Ok(())
    }
}
