//! Core Bloom Filter implementation
//!
//! INVARIANTS:
//! - Size and hash count never change after construction
//! - Bits are only ever set, never cleared (no deletion)
//! - No false negatives: if inserted, contains() MUST return true
//!
//! Wire format: `ceil(size / 8)` bytes, bit `i` at byte `i / 8`, bit
//! position `i % 8` counted from the least-significant bit, hex-encoded.

use bitvec::prelude::*;
use serde::{Deserialize, Serialize};

use super::config::{MAX_FILTER_SIZE, MAX_HASH_COUNT};
use super::hash_functions::{compute_hash_positions, HashScheme};
use crate::error::DecodeError;

/// Bloom filter for probabilistic membership testing
///
/// The filter keeps no record of what was inserted; it is a write-only
/// membership set. False positives are possible, false negatives are not.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BloomFilter {
    /// Bit array storing the filter state
    bits: BitVec<u8, Lsb0>,
    /// Number of hash functions (k)
    k: usize,
    /// Size in bits (m)
    m: usize,
    /// Number of insert calls (n), informational only
    n: usize,
    /// Position derivation scheme
    scheme: HashScheme,
}

/// Portable form of a filter: `(size, hash_count, hex_bits)`
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportedBloomFilter {
    pub size: usize,
    pub hash_count: usize,
    pub bits_hex: String,
}

impl BloomFilter {
    /// Create a new Bloom filter using the default hash scheme
    ///
    /// # Arguments
    /// * `m` - Size in bits
    /// * `k` - Number of hash functions
    pub fn new(m: usize, k: usize) -> Self {
        Self::with_scheme(m, k, HashScheme::default())
    }

    /// Create a new Bloom filter with an explicit hash scheme
    ///
    /// A zero-size filter holds no bits and derives no positions, so its
    /// `contains` is vacuously `true` for every element. Decoded filters
    /// never have zero size.
    pub fn with_scheme(m: usize, k: usize, scheme: HashScheme) -> Self {
        Self {
            bits: bitvec![u8, Lsb0; 0; m],
            k,
            m,
            n: 0,
            scheme,
        }
    }

    fn positions(&self, element: &str) -> Vec<usize> {
        let normalized = element.to_lowercase();
        compute_hash_positions(normalized.as_bytes(), self.k, self.m, self.scheme)
    }

    /// Insert an element into the filter
    ///
    /// The element is lowercased first, so lookups are case-insensitive.
    pub fn insert(&mut self, element: &str) {
        for pos in self.positions(element) {
            self.bits.set(pos, true);
        }
        self.n += 1;
    }

    /// Test if an element might be in the filter
    ///
    /// Returns:
    /// - `true` if the element might be in the set (could be false positive)
    /// - `false` if the element is definitely NOT in the set
    pub fn contains(&self, element: &str) -> bool {
        self.positions(element).iter().all(|&pos| self.bits[pos])
    }

    /// Test membership without early exit
    ///
    /// Every position is read regardless of earlier misses. Use this when the
    /// filter is probed by parties that should not learn its contents from timing.
    pub fn contains_constant_time(&self, element: &str) -> bool {
        let mut result: u8 = 1;
        for pos in self.positions(element) {
            result &= self.bits[pos] as u8;
        }
        result == 1
    }

    /// OR another filter into this one
    ///
    /// Bits beyond this filter's size are ignored.
    pub fn union_with(&mut self, other: &BloomFilter) {
        let self_raw = self.bits.as_raw_mut_slice();
        let other_raw = other.bits.as_raw_slice();
        for (s, o) in self_raw.iter_mut().zip(other_raw.iter()) {
            *s |= *o;
        }
        // Clear any bits OR-ed into the tail padding of the last byte.
        let tail = self.m % 8;
        if tail != 0 {
            if let Some(last) = self.bits.as_raw_mut_slice().last_mut() {
                *last &= (1u8 << tail) - 1;
            }
        }
        self.n += other.n;
    }

    /// Jaccard similarity of the two filters' set bits
    ///
    /// `|A AND B| / |A OR B|`, or 0.0 when neither filter has a bit set.
    /// Filters of different length compare as if the shorter one were
    /// zero-padded.
    pub fn jaccard_similarity(&self, other: &BloomFilter) -> f64 {
        let a = self.bits.as_raw_slice();
        let b = other.bits.as_raw_slice();

        let mut intersection = 0u32;
        let mut union = 0u32;
        for i in 0..a.len().max(b.len()) {
            let x = a.get(i).copied().unwrap_or(0);
            let y = b.get(i).copied().unwrap_or(0);
            intersection += (x & y).count_ones();
            union += (x | y).count_ones();
        }

        if union == 0 {
            0.0
        } else {
            intersection as f64 / union as f64
        }
    }

    /// Estimated false positive rate: `(bits_set / size) ^ hash_count`
    ///
    /// This is a structural estimate from the current fill ratio. It is
    /// deliberately NOT the classical `(1 - e^(-kn/m))^k`, which needs the
    /// true number of distinct inserted items. Exported metadata depends on
    /// this exact formula.
    pub fn false_positive_rate(&self) -> f64 {
        if self.m == 0 {
            return 0.0;
        }
        self.fill_ratio().powi(self.k as i32)
    }

    /// Fraction of bits currently set
    pub fn fill_ratio(&self) -> f64 {
        if self.m == 0 {
            return 0.0;
        }
        self.bits_set() as f64 / self.m as f64
    }

    /// Get the number of bits set in the filter
    pub fn bits_set(&self) -> usize {
        self.bits.count_ones()
    }

    /// Get the filter size in bits
    pub fn size_bits(&self) -> usize {
        self.m
    }

    /// Get the number of hash functions
    pub fn hash_count(&self) -> usize {
        self.k
    }

    /// Get the number of insert calls
    pub fn elements_inserted(&self) -> usize {
        self.n
    }

    pub fn scheme(&self) -> HashScheme {
        self.scheme
    }

    /// Packed bytes, LSB-first within each byte
    pub fn to_bytes(&self) -> Vec<u8> {
        self.bits.as_raw_slice().to_vec()
    }

    /// Hex encoding of [`to_bytes`](Self::to_bytes)
    pub fn to_hex(&self) -> String {
        hex::encode(self.bits.as_raw_slice())
    }

    /// Rebuild a filter from its hex encoding using the default hash scheme
    ///
    /// Bits beyond the decoded byte length are left unset; decoded bits
    /// beyond `size` are dropped.
    pub fn from_hex(hex_bits: &str, size: usize, hash_count: usize) -> Result<Self, DecodeError> {
        Self::from_hex_with_scheme(hex_bits, size, hash_count, HashScheme::default())
    }

    /// Rebuild a filter from its hex encoding with an explicit hash scheme
    ///
    /// `size` must be in `1..=MAX_FILTER_SIZE` and `hash_count` in
    /// `1..=MAX_HASH_COUNT`.
    pub fn from_hex_with_scheme(
        hex_bits: &str,
        size: usize,
        hash_count: usize,
        scheme: HashScheme,
    ) -> Result<Self, DecodeError> {
        if !(1..=MAX_FILTER_SIZE).contains(&size)
            || !(1..=MAX_HASH_COUNT).contains(&hash_count)
        {
            return Err(DecodeError::InvalidParameters { size, hash_count });
        }

        let bytes = hex::decode(hex_bits.trim())?;
        let decoded = bytes.view_bits::<Lsb0>();
        let copied = decoded.len().min(size);

        let mut filter = Self::with_scheme(size, hash_count, scheme);
        filter.bits[..copied].copy_from_bitslice(&decoded[..copied]);
        Ok(filter)
    }

    /// Export as `(size, hash_count, hex_bits)`
    pub fn export(&self) -> ExportedBloomFilter {
        ExportedBloomFilter {
            size: self.m,
            hash_count: self.k,
            bits_hex: self.to_hex(),
        }
    }
}
