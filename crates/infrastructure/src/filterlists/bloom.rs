use rustc_hash::FxHasher;
use std::hash::{Hash, Hasher};

/// Per-source bloom filter over the set of entity keys. Negative answers
/// are exact; positives are confirmed against the on-disk store.
///
/// Parameters are persisted with each source so readers rebuild an
/// identical filter from the same entry set.
pub struct ListBloom {
    words: Vec<u64>,
    mask: u64,
    num_hashes: usize,
}

impl ListBloom {
    pub fn with_params(capacity: usize, fp_rate: f64) -> Self {
        let capacity = capacity.max(1);
        let num_bits = Self::optimal_num_bits(capacity, fp_rate);
        let num_hashes = Self::optimal_num_hashes(capacity, num_bits);
        Self {
            words: vec![0u64; num_bits.div_ceil(64)],
            mask: (num_bits as u64) - 1,
            num_hashes,
        }
    }

    #[inline]
    pub fn insert<K: Hash + ?Sized>(&mut self, key: &K) {
        let (h1, h2) = Self::double_hash(key);
        for i in 0..self.num_hashes as u64 {
            let idx = Self::nth_hash(h1, h2, i, self.mask);
            self.words[idx / 64] |= 1u64 << (idx % 64);
        }
    }

    #[inline]
    pub fn check<K: Hash + ?Sized>(&self, key: &K) -> bool {
        let (h1, h2) = Self::double_hash(key);
        for i in 0..self.num_hashes as u64 {
            let idx = Self::nth_hash(h1, h2, i, self.mask);
            if self.words[idx / 64] & (1u64 << (idx % 64)) == 0 {
                return false;
            }
        }
        true
    }

    #[inline]
    fn double_hash<K: Hash + ?Sized>(key: &K) -> (u64, u64) {
        let mut hasher = FxHasher::default();
        key.hash(&mut hasher);
        let h1 = hasher.finish();
        let h2 = h1.wrapping_mul(0x517cc1b727220a95).rotate_right(17);
        (h1, h2)
    }

    #[inline]
    fn nth_hash(h1: u64, h2: u64, n: u64, mask: u64) -> usize {
        (h1.wrapping_add(n.wrapping_mul(h2)) & mask) as usize
    }

    fn optimal_num_bits(capacity: usize, fp_rate: f64) -> usize {
        let n = capacity as f64;
        let p = fp_rate.clamp(f64::MIN_POSITIVE, 0.5);
        let m = (-(n * p.ln()) / (2.0_f64.ln().powi(2))).ceil() as usize;
        m.next_power_of_two().max(64)
    }

    fn optimal_num_hashes(capacity: usize, num_bits: usize) -> usize {
        let n = capacity as f64;
        let m = num_bits as f64;
        (((m / n) * 2.0_f64.ln()).ceil() as usize).max(1)
    }
}
