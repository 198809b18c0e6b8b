//! Hash functions for Bloom filter
//!
//! Two schemes produce the k bit positions of an element:
//!
//! - `SeededFnv1a` re-hashes the element k times through FNV-1a (64-bit),
//!   each time behind a distinct `"{i}:"` prefix. This approximates k
//!   independent hash functions with a single hash family. It is fine for
//!   benign membership tests and is NOT adversarially robust.
//! - `DoubleMurmur3` uses the Kirsch-Mitzenmacher construction
//!   h(i) = h1 + i * h2 over MurmurHash3.
//!
//! Both yield exactly k positions and are fully deterministic.

use std::io::Cursor;

use serde::{Deserialize, Serialize};

const FNV_OFFSET_BASIS: u64 = 14_695_981_039_346_656_037;
const FNV_PRIME: u64 = 1_099_511_628_211;

/// Strategy used to derive the k bit positions of an element
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HashScheme {
    /// FNV-1a over `"{i}:" ++ element` for each i in 0..k
    #[default]
    SeededFnv1a,
    /// Double hashing over MurmurHash3 x64-128
    DoubleMurmur3,
}

/// FNV-1a, 64-bit, over a sequence of byte chunks
///
/// Feeding chunks is equivalent to hashing their concatenation.
pub fn fnv1a_64(chunks: &[&[u8]]) -> u64 {
    let mut hash = FNV_OFFSET_BASIS;
    for chunk in chunks {
        for &byte in *chunk {
            hash ^= byte as u64;
            hash = hash.wrapping_mul(FNV_PRIME);
        }
    }
    hash
}

/// Hash an element with MurmurHash3 using a seed
pub fn murmur_hash(element: &[u8], seed: u32) -> u64 {
    let mut cursor = Cursor::new(element);

    // Use murmur3 128-bit hash and take the lower 64 bits
    let hash = murmur3::murmur3_x64_128(&mut cursor, seed).unwrap_or(0);
    hash as u64
}

/// Compute k hash positions for an element in a filter of `m` bits
///
/// Returns an empty vector for a zero-sized filter.
pub fn compute_hash_positions(element: &[u8], k: usize, m: usize, scheme: HashScheme) -> Vec<usize> {
    if m == 0 {
        return Vec::new();
    }

    match scheme {
        HashScheme::SeededFnv1a => (0..k)
            .map(|i| {
                let prefix = format!("{}:", i);
                let hash = fnv1a_64(&[prefix.as_bytes(), element]);
                (hash % m as u64) as usize
            })
            .collect(),
        HashScheme::DoubleMurmur3 => {
            let h1 = murmur_hash(element, 0);
            let h2 = murmur_hash(element, 1);

            (0..k)
                .map(|i| {
                    let hash = h1.wrapping_add((i as u64).wrapping_mul(h2));
                    (hash % m as u64) as usize
                })
                .collect()
        }
    }
}
