//! Seeded and unseeded random byte generation.
//!
//! The algorithm is fixed: ChaCha with 8 rounds ([`ChaCha8Rng`]), keyed by
//! `SeedableRng::seed_from_u64(seed as u64)`. Output is the generator's
//! successive `u32` words in little-endian order, so the byte stream is the
//! plain ChaCha8 keystream and does not depend on how it is chunked.
//!
//! Seed 42 starts with `a1 5b 5d 39 b5 bf 90 ae 88 91 79 25 c6 3f 45 f3`.

use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Upper bound for `/bytes/{n}`.
pub const MAX_BYTES: usize = 100 * 1024;

/// Default and upper bound for the `/stream-bytes` chunk size.
pub const MAX_CHUNK_SIZE: usize = 10 * 1024;

/// Upper bound on chunks per stream.
pub const MAX_CHUNKS: usize = 100;

/// Parse a `seed` query value. Anything that is not an `i64` means unseeded.
#[inline]
pub fn parse_seed(raw: Option<&str>) -> Option<i64> {
    raw.and_then(|s| s.trim().parse().ok())
}

/// Effective length for `/bytes/{n}`: unparseable ⇒ max, negative ⇒ 0, clamped to max.
///
/// Like every numeric parameter here, surrounding whitespace is ignored.
pub fn clamp_bytes(raw: &str) -> usize {
    match raw.trim().parse::<i64>() {
        Ok(n) if n < 0 => 0,
        Ok(n) => (n as u64).min(MAX_BYTES as u64) as usize,
        Err(_) => MAX_BYTES,
    }
}

/// Effective chunk size: missing, unparseable or non-positive ⇒ default, clamped to max.
pub fn clamp_chunk_size(raw: Option<&str>) -> usize {
    match raw.and_then(|s| s.trim().parse::<i64>().ok()) {
        Some(n) if n > 0 => (n as u64).min(MAX_CHUNK_SIZE as u64) as usize,
        _ => MAX_CHUNK_SIZE,
    }
}

/// Effective total for `/stream-bytes/{n}`: unparseable ⇒ `100 × chunk`,
/// negative ⇒ 0, clamped to `100 × chunk`.
pub fn clamp_stream_total(raw: &str, chunk_size: usize) -> usize {
    let max = MAX_CHUNKS * chunk_size;
    match raw.trim().parse::<i64>() {
        Ok(n) if n < 0 => 0,
        Ok(n) => (n as u64).min(max as u64) as usize,
        Err(_) => max,
    }
}

/// Build a generator for one request.
fn new_rng(seed: Option<i64>) -> ChaCha8Rng {
    match seed {
        Some(seed) => ChaCha8Rng::seed_from_u64(seed as u64),
        None => ChaCha8Rng::from_entropy(),
    }
}

/// Generate exactly `len` bytes.
pub fn generate(len: usize, seed: Option<i64>) -> Vec<u8> {
    let mut stream = RandomStream::new(len, seed);
    stream.next_chunk(len).unwrap_or_default()
}

/// Bounded byte stream consumed in chunks.
///
/// Owns its generator; nothing is shared between requests.
pub struct RandomStream {
    rng: ChaCha8Rng,
    // Unused tail of the last generated word
    spill: Vec<u8>,
    remaining: usize,
}

impl RandomStream {
    pub fn new(total: usize, seed: Option<i64>) -> Self {
        Self {
            rng: new_rng(seed),
            spill: Vec::with_capacity(4),
            remaining: total,
        }
    }

    /// Bytes not yet produced.
    #[inline]
    pub fn remaining(&self) -> usize {
        self.remaining
    }

    /// Next `size` bytes (fewer at the end), or `None` once exhausted.
    pub fn next_chunk(&mut self, size: usize) -> Option<Vec<u8>> {
        if self.remaining == 0 || size == 0 {
            return None;
        }

        let want = size.min(self.remaining);
        let mut out = Vec::with_capacity(want);

        let from_spill = want.min(self.spill.len());
        out.extend(self.spill.drain(..from_spill));

        while out.len() < want {
            let word = self.rng.next_u32().to_le_bytes();
            let take = (want - out.len()).min(4);
            out.extend_from_slice(&word[..take]);
            self.spill.extend_from_slice(&word[take..]);
        }

        self.remaining -= want;
        Some(out)
    }
}
