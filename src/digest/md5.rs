//! DISCLAIMER: This is the MD5 (legacy) hash function in pure Rust. MD5 is
//! cryptographically broken; it is implemented here because the frame
//! transport it serves is pedagogical, not security-critical. Absolutely DO
//! NOT use it for real cryptographic or security-sensitive operations. If
//! you need a secure hash, use a vetted, modern library (e.g. SHA-2 or
//! SHA-3 from RustCrypto).

use core::convert::TryInto;

use crate::digest::Digest;
use crate::error::{Error, Result};

/// The size of the MD5 digest in bytes (128 bits = 16 bytes).
pub const MD5_OUTPUT_SIZE: usize = 16;

/// The size of one compression block in bytes (512 bits).
pub const MD5_BLOCK_SIZE: usize = 64;

/// Largest message the single-block fast path accepts, in 32-bit words.
pub const SHORT_MESSAGE_MAX_WORDS: usize = 13;

/// The initial values for (A, B, C, D) from the MD5 specification.
static INIT_STATE: [u32; 4] = [0x67452301, 0xEFCDAB89, 0x98BADCFE, 0x10325476];

/// The sine table constants (K) in MD5 (32 bits).
/// K[i] = floor(2^32 * abs(sin(i+1))) for i=0..63, derived in double
/// precision; a lower-precision derivation can be off by one unit and
/// break interoperability.
static K: [u32; 64] = [
    0xd76aa478, 0xe8c7b756, 0x242070db, 0xc1bdceee,
    0xf57c0faf, 0x4787c62a, 0xa8304613, 0xfd469501,
    0x698098d8, 0x8b44f7af, 0xffff5bb1, 0x895cd7be,
    0x6b901122, 0xfd987193, 0xa679438e, 0x49b40821,
    0xf61e2562, 0xc040b340, 0x265e5a51, 0xe9b6c7aa,
    0xd62f105d, 0x02441453, 0xd8a1e681, 0xe7d3fbc8,
    0x21e1cde6, 0xc33707d6, 0xf4d50d87, 0x455a14ed,
    0xa9e3e905, 0xfcefa3f8, 0x676f02d9, 0x8d2a4c8a,
    0xfffa3942, 0x8771f681, 0x6d9d6122, 0xfde5380c,
    0xa4beea44, 0x4bdecfa9, 0xf6bb4b60, 0xbebfbc70,
    0x289b7ec6, 0xeaa127fa, 0xd4ef3085, 0x04881d05,
    0xd9d4d039, 0xe6db99e5, 0x1fa27cf8, 0xc4ac5665,
    0xf4292244, 0x432aff97, 0xab9423a7, 0xfc93a039,
    0x655b59c3, 0x8f0ccc92, 0xffeff47d, 0x85845dd1,
    0x6fa87e4f, 0xfe2ce6e0, 0xa3014314, 0x4e0811a1,
    0xf7537e82, 0xbd3af235, 0x2ad7d2bb, 0xeb86d391,
];

/// The amount of left rotation performed in each MD5 round: four 4-entry
/// cycles, one per round group, each replicated across the group's 16
/// rounds.
static S: [u32; 64] = [
    // Round 1
    7, 12, 17, 22,  7, 12, 17, 22,  7, 12, 17, 22,  7, 12, 17, 22,
    // Round 2
    5, 9, 14, 20,   5, 9, 14, 20,   5, 9, 14, 20,   5, 9, 14, 20,
    // Round 3
    4, 11, 16, 23,  4, 11, 16, 23,  4, 11, 16, 23,  4, 11, 16, 23,
    // Round 4
    6, 10, 15, 21,  6, 10, 15, 21,  6, 10, 15, 21,  6, 10, 15, 21,
];

/// Runs the 64-round MD5 compression schedule over one 16-word block,
/// returning the updated state.
///
/// Pure: no allocation, no side effects, and every addition wraps modulo
/// 2^32, so no input can make it trap.
fn compress(state: [u32; 4], words: &[u32; 16]) -> [u32; 4] {
    let [mut a, mut b, mut c, mut d] = state;

    for i in 0..64 {
        let (f, g) = if i < 16 {
            // F function
            ((b & c) | ((!b) & d), i)
        } else if i < 32 {
            // G function
            ((b & d) | (c & (!d)), (5 * i + 1) % 16)
        } else if i < 48 {
            // H function
            (b ^ c ^ d, (3 * i + 5) % 16)
        } else {
            // I function
            (c ^ (b | (!d)), (7 * i) % 16)
        };

        let temp = a
            .wrapping_add(f)
            .wrapping_add(words[g])
            .wrapping_add(K[i]);
        let temp = temp.rotate_left(S[i]).wrapping_add(b);

        a = d;
        d = c;
        c = b;
        b = temp;
    }

    [
        state[0].wrapping_add(a),
        state[1].wrapping_add(b),
        state[2].wrapping_add(c),
        state[3].wrapping_add(d),
    ]
}

/// Reads a 64-byte block as 16 little-endian words and compresses it.
fn compress_block(state: [u32; 4], block: &[u8]) -> [u32; 4] {
    debug_assert_eq!(block.len(), MD5_BLOCK_SIZE);
    let mut words = [0u32; 16];
    for (word, chunk) in words.iter_mut().zip(block.chunks_exact(4)) {
        *word = u32::from_le_bytes(chunk.try_into().unwrap());
    }
    compress(state, &words)
}

/// Builds the padding region that closes a message of `total_len` bytes
/// whose trailing partial block is `tail`: the 0x80 terminator, zero fill
/// to 56 mod 64, and the 64-bit little-endian bit length.
///
/// Returns the region and its length, which is one block when
/// `total_len % 64 < 56` and two blocks otherwise.
fn padding_tail(total_len: usize, tail: &[u8]) -> ([u8; 2 * MD5_BLOCK_SIZE], usize) {
    debug_assert_eq!(tail.len(), total_len % MD5_BLOCK_SIZE);

    let mut region = [0u8; 2 * MD5_BLOCK_SIZE];
    region[..tail.len()].copy_from_slice(tail);
    region[tail.len()] = 0x80;

    let region_len = if tail.len() < 56 {
        MD5_BLOCK_SIZE
    } else {
        2 * MD5_BLOCK_SIZE
    };

    // the last 8 bytes always hold the original length in bits
    let bit_len = (total_len as u64).wrapping_mul(8);
    region[region_len - 8..region_len].copy_from_slice(&bit_len.to_le_bytes());

    (region, region_len)
}

/// Computes the MD5 digest of a byte message in one shot. Never fails.
pub fn md5_digest(data: &[u8]) -> Digest {
    let mut state = INIT_STATE;

    let full_blocks = data.len() / MD5_BLOCK_SIZE;
    for block in data.chunks_exact(MD5_BLOCK_SIZE) {
        state = compress_block(state, block);
    }

    let (region, region_len) = padding_tail(data.len(), &data[full_blocks * MD5_BLOCK_SIZE..]);
    for block in region[..region_len].chunks_exact(MD5_BLOCK_SIZE) {
        state = compress_block(state, block);
    }

    Digest::new(state)
}

/// Single-block fast path for messages of at most 13 whole 32-bit words.
///
/// Folds the padding directly into one 16-word block: the message words,
/// the 0x80 terminator in the low byte of the next word, and the bit
/// length in word 14. Word 15 stays zero since the length here never
/// exceeds 32 bits. Produces bit-identical output to [`md5_digest`] on
/// the equivalent little-endian byte string.
///
/// Fails with [`Error::MessageTooLong`] when more than 13 words are given.
pub fn md5_digest_words(words: &[u32]) -> Result<Digest> {
    if words.len() > SHORT_MESSAGE_MAX_WORDS {
        return Err(Error::MessageTooLong {
            len: words.len(),
            max: SHORT_MESSAGE_MAX_WORDS,
        });
    }

    let mut block = [0u32; 16];
    block[..words.len()].copy_from_slice(words);
    block[words.len()] = 0x80;
    block[14] = (words.len() as u32) * 32;

    Ok(Digest::new(compress(INIT_STATE, &block)))
}

/// A streaming MD5 context for incremental input.
#[derive(Debug, Clone)]
pub struct Md5 {
    state: [u32; 4],
    /// 64-byte block buffer
    buffer: [u8; MD5_BLOCK_SIZE],
    /// Current buffer length
    buffer_len: usize,
    /// Total message length in bytes
    length: u64,
}

impl Md5 {
    /// Creates a new MD5 context.
    pub fn new() -> Self {
        Self {
            state: INIT_STATE,
            buffer: [0u8; MD5_BLOCK_SIZE],
            buffer_len: 0,
            length: 0,
        }
    }

    /// Feeds more message bytes into the context.
    pub fn update(&mut self, data: &[u8]) {
        self.length = self.length.wrapping_add(data.len() as u64);

        let mut rest = data;
        if self.buffer_len > 0 {
            let take = rest.len().min(MD5_BLOCK_SIZE - self.buffer_len);
            self.buffer[self.buffer_len..self.buffer_len + take].copy_from_slice(&rest[..take]);
            self.buffer_len += take;
            rest = &rest[take..];

            if self.buffer_len == MD5_BLOCK_SIZE {
                self.state = compress_block(self.state, &self.buffer);
                self.buffer_len = 0;
            }
        }

        for block in rest.chunks_exact(MD5_BLOCK_SIZE) {
            self.state = compress_block(self.state, block);
        }

        let tail = rest.chunks_exact(MD5_BLOCK_SIZE).remainder();
        self.buffer[..tail.len()].copy_from_slice(tail);
        self.buffer_len += tail.len();
    }

    /// Finalizes the hash, consuming the context.
    pub fn finalize(self) -> Digest {
        let mut state = self.state;
        let (region, region_len) =
            padding_tail(self.length as usize, &self.buffer[..self.buffer_len]);
        for block in region[..region_len].chunks_exact(MD5_BLOCK_SIZE) {
            state = compress_block(state, block);
        }
        Digest::new(state)
    }
}

impl Default for Md5 {
    fn default() -> Self {
        Self::new()
    }
}
