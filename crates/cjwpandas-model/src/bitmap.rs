#![forbid(unsafe_code)]

/// A fixed-length bit set, used to track which categories a column references.
///
/// Bits are stored little-endian within each `u64` word:
/// - bit 0 is the LSB of word 0
/// - bit 63 is the MSB of word 0
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct BitVec {
    words: Vec<u64>,
    len: usize,
    ones: usize,
}

impl BitVec {
    pub(crate) fn with_len_all_false(bits: usize) -> Self {
        Self {
            words: vec![0u64; bits.div_ceil(64)],
            len: bits,
            ones: 0,
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.len
    }

    /// Set bit `index`; returns whether it was previously unset.
    pub(crate) fn insert(&mut self, index: usize) -> bool {
        debug_assert!(index < self.len, "BitVec index out of bounds");
        let mask = 1u64 << (index % 64);
        let word = &mut self.words[index / 64];
        if *word & mask != 0 {
            return false;
        }
        *word |= mask;
        self.ones += 1;
        true
    }

    pub(crate) fn count_ones(&self) -> usize {
        self.ones
    }

    pub(crate) fn all_true(&self) -> bool {
        self.ones == self.len
    }

    /// Index of the lowest unset bit.
    pub(crate) fn first_zero(&self) -> Option<usize> {
        self.words
            .iter()
            .enumerate()
            .find(|(_, w)| **w != u64::MAX)
            .map(|(i, w)| i * 64 + (!w).trailing_zeros() as usize)
            .filter(|idx| *idx < self.len)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tracks_ones_and_first_zero_across_words() {
        let mut bits = BitVec::with_len_all_false(130);
        assert_eq!(bits.len(), 130);
        assert_eq!(bits.first_zero(), Some(0));

        for i in 0..70 {
            assert!(bits.insert(i));
        }
        assert!(!bits.insert(3));
        assert_eq!(bits.count_ones(), 70);
        assert!(!bits.insert(69));
        assert_eq!(bits.first_zero(), Some(70));

        for i in 70..130 {
            bits.insert(i);
        }
        assert!(bits.all_true());
        assert_eq!(bits.first_zero(), None);
    }

    #[test]
    fn empty_bitvec_is_all_true() {
        let bits = BitVec::with_len_all_false(0);
        assert!(bits.all_true());
        assert_eq!(bits.first_zero(), None);
    }
}
