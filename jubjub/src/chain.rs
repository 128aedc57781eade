//! Fixed exponentiation schedules.
//!
//! An [`AdditionChain`] is a list of steps derived from a public exponent at
//! compile time. Evaluating it against a base performs the same sequence of
//! squarings and multiplications for every base, so exponentiation by a fixed
//! exponent (inversion, Legendre symbol, square-root helpers) does not branch
//! on the base.
//!
//! The schedule is a left-to-right 4-bit window: the exponent is cut into
//! nibbles from the most significant end, runs of zero nibbles are folded
//! into the squaring count of the next nonzero one, and each nonzero nibble
//! becomes a multiplication by a precomputed power `a^nibble`.

use crate::arithmetic::sub_word;

/// Number of bits consumed per step.
pub const WINDOW_BITS: u32 = 4;

/// Size of the power table a chain indexes into: `a^0 .. a^15`.
pub const TABLE_SIZE: usize = 1 << WINDOW_BITS;

const MAX_STEPS: usize = 64;

/// Square the accumulator `squarings` times, then multiply by `a^multiplier`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ChainStep {
    pub squarings: u32,
    pub multiplier: u8,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct AdditionChain {
    first: u8,
    steps: [ChainStep; MAX_STEPS],
    len: usize,
    trailing_squarings: u32,
}

#[inline]
const fn nibble(exp: &[u64; 4], index: usize) -> u8 {
    ((exp[index / 16] >> ((index % 16) * 4)) & 0xf) as u8
}

impl AdditionChain {
    /// Derive the chain computing `a^exp`.
    pub const fn new(exp: &[u64; 4]) -> Self {
        let mut chain = AdditionChain {
            first: 0,
            steps: [ChainStep {
                squarings: 0,
                multiplier: 0,
            }; MAX_STEPS],
            len: 0,
            trailing_squarings: 0,
        };

        let mut pos = MAX_STEPS;
        while pos > 0 && nibble(exp, pos - 1) == 0 {
            pos -= 1;
        }
        if pos == 0 {
            // a^0: the table's first entry, one
            return chain;
        }
        pos -= 1;
        chain.first = nibble(exp, pos);

        let mut pending = 0;
        while pos > 0 {
            pos -= 1;
            pending += WINDOW_BITS;
            let n = nibble(exp, pos);
            if n != 0 {
                chain.steps[chain.len] = ChainStep {
                    squarings: pending,
                    multiplier: n,
                };
                chain.len += 1;
                pending = 0;
            }
        }
        chain.trailing_squarings = pending;
        chain
    }

    /// The chain for `a^(m-2)`, Fermat inversion modulo the prime `m`.
    pub const fn inversion(modulus: &[u64; 4]) -> Self {
        Self::new(&sub_word(modulus, 2))
    }

    /// Table index the accumulator starts from.
    #[inline]
    pub const fn first(&self) -> u8 {
        self.first
    }

    #[inline]
    pub fn steps(&self) -> &[ChainStep] {
        &self.steps[..self.len]
    }

    /// Squarings applied after the last multiplication.
    #[inline]
    pub const fn trailing_squarings(&self) -> u32 {
        self.trailing_squarings
    }

    /// Total multiplications and squarings needed to evaluate, table included.
    pub fn cost(&self) -> (usize, u32) {
        let squarings = self.steps().iter().map(|s| s.squarings).sum::<u32>()
            + self.trailing_squarings;
        (TABLE_SIZE - 2 + self.len, squarings)
    }

    /// Evaluate over plain integers modulo `m`. Test oracle for the schedule
    /// itself, independent of any field type.
    #[cfg(test)]
    pub(crate) fn evaluate_u128(&self, base: u128, m: u128) -> u128 {
        let mut table = [1u128; TABLE_SIZE];
        for i in 1..TABLE_SIZE {
            table[i] = table[i - 1] * base % m;
        }
        let mut acc = table[self.first as usize];
        for step in self.steps() {
            for _ in 0..step.squarings {
                acc = acc * acc % m;
            }
            acc = acc * table[step.multiplier as usize] % m;
        }
        for _ in 0..self.trailing_squarings {
            acc = acc * acc % m;
        }
        acc
    }
}
