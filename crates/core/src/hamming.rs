//! Systematic Hamming(7,4) code with syndrome decoding.
//!
//! # Codeword Layout
//!
//! ```text
//! position:  0    1    2    3    4    5    6
//!           d0   d1   d2   d3   p0   p1   p2
//!
//! p0 = d0 ^ d1 ^ d2
//! p1 = d0 ^ d1 ^ d3
//! p2 = d0 ^ d2 ^ d3
//! ```
//!
//! # Syndrome Table
//!
//! ```text
//! s0 = r0 ^ r1 ^ r2 ^ r4        s0 s1 s2   correction
//! s1 = r0 ^ r1 ^ r3 ^ r5         0  0  0   none
//! s2 = r0 ^ r2 ^ r3 ^ r6         1  1  1   flip 0
//!                                1  1  0   flip 1
//!                                1  0  1   flip 2
//!                                0  1  1   flip 3
//!                                1  0  0   flip 4
//!                                0  1  0   flip 5
//!                                0  0  1   flip 6
//! ```
//!
//! The decoder flips at most one bit. Error patterns of weight two or more
//! are silently decoded to a wrong codeword; this is the code's minimum
//! distance at work, and the trial engine counts exactly these cases.

/// Number of information bits per codeword.
pub const DATA_BITS: usize = 4;

/// Number of bits per codeword.
pub const CODE_BITS: usize = 7;

/// A 7-bit word `(d0, d1, d2, d3, p0, p1, p2)`, one bit per byte.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Codeword([u8; CODE_BITS]);

impl Codeword {
    /// Build a word from raw bits; only the lowest bit of each byte is kept.
    pub fn from_bits(bits: [u8; CODE_BITS]) -> Self {
        Self(bits.map(|b| b & 1))
    }

    pub fn bits(&self) -> [u8; CODE_BITS] {
        self.0
    }

    /// The information bits `(d0, d1, d2, d3)`.
    pub fn data(&self) -> [u8; DATA_BITS] {
        [self.0[0], self.0[1], self.0[2], self.0[3]]
    }

    /// Number of ones in the word.
    pub fn weight(&self) -> u32 {
        self.0.iter().map(|&b| b as u32).sum()
    }

    /// Number of positions in which two words differ.
    pub fn distance(&self, other: &Codeword) -> u32 {
        self.0
            .iter()
            .zip(other.0.iter())
            .map(|(&a, &b)| (a ^ b) as u32)
            .sum()
    }

    /// Return a copy with bit `k` inverted.
    pub fn flipped(&self, k: usize) -> Self {
        let mut bits = self.0;
        bits[k] ^= 1;
        Self(bits)
    }

    /// Pack into the low 7 bits of a byte, bit `k` at position `k`.
    pub fn to_u8(&self) -> u8 {
        self.0
            .iter()
            .enumerate()
            .fold(0u8, |acc, (k, &b)| acc | (b << k))
    }

    /// Inverse of [`Codeword::to_u8`]; bit 7 is ignored.
    pub fn from_u8(value: u8) -> Self {
        let mut bits = [0u8; CODE_BITS];
        for (k, bit) in bits.iter_mut().enumerate() {
            *bit = (value >> k) & 1;
        }
        Self(bits)
    }
}

/// Three-bit syndrome `(s0, s1, s2)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Syndrome(u8);

impl Syndrome {
    pub fn new(s0: u8, s1: u8, s2: u8) -> Self {
        Self(((s0 & 1) << 2) | ((s1 & 1) << 1) | (s2 & 1))
    }

    /// Table index `s0 << 2 | s1 << 1 | s2`.
    pub fn index(&self) -> usize {
        self.0 as usize
    }

    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }
}

/// Action taken by the decoder for a syndrome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Correction {
    /// Syndrome 000: the word is accepted as received.
    None,
    /// Invert the bit at this position.
    Flip(usize),
}

/// Decoder actions indexed by [`Syndrome::index`].
pub const CORRECTION_TABLE: [Correction; 8] = [
    Correction::None,    // 000
    Correction::Flip(6), // 001
    Correction::Flip(5), // 010
    Correction::Flip(3), // 011
    Correction::Flip(4), // 100
    Correction::Flip(2), // 101
    Correction::Flip(1), // 110
    Correction::Flip(0), // 111
];

/// Encode four information bits into a systematic codeword.
pub fn encode(data: [u8; DATA_BITS]) -> Codeword {
    let [d0, d1, d2, d3] = data.map(|b| b & 1);
    Codeword([d0, d1, d2, d3, d0 ^ d1 ^ d2, d0 ^ d1 ^ d3, d0 ^ d2 ^ d3])
}

/// XOR a codeword with a 7-bit error pattern.
pub fn corrupt(codeword: Codeword, errors: [u8; CODE_BITS]) -> Codeword {
    let mut bits = codeword.0;
    for (bit, e) in bits.iter_mut().zip(errors) {
        *bit ^= e & 1;
    }
    Codeword(bits)
}

/// Compute the syndrome of a received word.
pub fn syndrome(received: &Codeword) -> Syndrome {
    let r = received.0;
    Syndrome::new(
        r[0] ^ r[1] ^ r[2] ^ r[4],
        r[0] ^ r[1] ^ r[3] ^ r[5],
        r[0] ^ r[2] ^ r[3] ^ r[6],
    )
}

/// Look up the decoder action for a syndrome.
pub fn correction(syndrome: Syndrome) -> Correction {
    CORRECTION_TABLE[syndrome.index()]
}

/// Correct at most one bit of a received word.
pub fn decode(received: &Codeword) -> Codeword {
    match correction(syndrome(received)) {
        Correction::None => *received,
        Correction::Flip(k) => received.flipped(k),
    }
}

/// Number of ones in an error pattern.
pub fn error_weight(errors: &[u8; CODE_BITS]) -> u32 {
    errors.iter().map(|&e| (e & 1) as u32).sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn all_data() -> impl Iterator<Item = [u8; DATA_BITS]> {
        (0u8..16).map(|v| [v & 1, (v >> 1) & 1, (v >> 2) & 1, (v >> 3) & 1])
    }

    #[test]
    fn test_encode_known_codewords() {
        assert_eq!(encode([0, 0, 0, 0]).bits(), [0, 0, 0, 0, 0, 0, 0]);
        assert_eq!(encode([1, 0, 0, 0]).bits(), [1, 0, 0, 0, 1, 1, 1]);
        assert_eq!(encode([0, 1, 0, 0]).bits(), [0, 1, 0, 0, 1, 1, 0]);
        assert_eq!(encode([1, 1, 1, 1]).bits(), [1, 1, 1, 1, 1, 1, 1]);
    }

    #[test]
    fn test_codewords_have_zero_syndrome() {
        for data in all_data() {
            let codeword = encode(data);
            assert!(syndrome(&codeword).is_zero());
            assert_eq!(codeword.data(), data);
        }
    }

    #[test]
    fn test_round_trip_without_errors() {
        for data in all_data() {
            let codeword = encode(data);
            let received = corrupt(codeword, [0; CODE_BITS]);
            assert_eq!(decode(&received), codeword);
        }
    }

    #[test]
    fn test_single_errors_corrected() {
        for data in all_data() {
            let codeword = encode(data);
            for k in 0..CODE_BITS {
                let mut errors = [0u8; CODE_BITS];
                errors[k] = 1;
                let received = corrupt(codeword, errors);
                assert_eq!(received.distance(&codeword), 1);
                assert_eq!(decode(&received), codeword, "data {data:?}, flip {k}");
            }
        }
    }

    #[test]
    fn test_syndrome_table_is_bijection() {
        let actions: HashSet<Correction> = CORRECTION_TABLE.iter().copied().collect();
        assert_eq!(actions.len(), 8);
        assert!(actions.contains(&Correction::None));
        for k in 0..CODE_BITS {
            assert!(actions.contains(&Correction::Flip(k)));
        }

        // Each single-bit error lands on the table entry that undoes it.
        for k in 0..CODE_BITS {
            let s = syndrome(&Codeword::default().flipped(k));
            assert_eq!(correction(s), Correction::Flip(k));
        }
    }

    #[test]
    fn test_double_errors_miscorrected() {
        let codeword = encode([1, 0, 1, 1]);
        for i in 0..CODE_BITS {
            for j in (i + 1)..CODE_BITS {
                let received = codeword.flipped(i).flipped(j);
                let decoded = decode(&received);
                assert_ne!(decoded, codeword);
                // lands on the neighbouring codeword at distance 3
                assert!(syndrome(&decoded).is_zero());
                assert_eq!(decoded.distance(&codeword), 3);
            }
        }
    }

    #[test]
    fn test_syndrome_depends_only_on_error_pattern() {
        let errors = [0, 1, 0, 0, 1, 0, 1];
        let reference = syndrome(&Codeword::from_bits(errors));
        for data in all_data() {
            assert_eq!(syndrome(&corrupt(encode(data), errors)), reference);
        }
    }

    #[test]
    fn test_packing() {
        let codeword = encode([1, 1, 0, 1]);
        assert_eq!(Codeword::from_u8(codeword.to_u8()), codeword);
        assert_eq!(Codeword::from_u8(0b0000001).bits(), [1, 0, 0, 0, 0, 0, 0]);
        assert_eq!(error_weight(&[1, 1, 0, 0, 0, 1, 0]), 3);
        assert_eq!(Syndrome::new(1, 0, 1).index(), 0b101);
    }
}
