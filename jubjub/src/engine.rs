//! Montgomery arithmetic over four 64-bit limbs, parameterized by modulus.
//!
//! Every routine here takes and returns limbs in Montgomery form (`a * R mod m`,
//! `R = 2^256`) except where noted. All of them are straight-line code: the
//! only reductions are conditional subtractions driven by a borrow mask, so
//! the running time does not depend on the operand values.
//!
//! The moduli served by this engine are below `2^255`, which keeps the sum of
//! two reduced values inside four limbs.

use crate::arithmetic::{adc, mac, sbb};

/// The constants that fully describe one Montgomery field.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct MontgomeryParams {
    /// The prime modulus `m`, little-endian limbs.
    pub modulus: [u64; 4],
    /// `-m^{-1} mod 2^64`
    pub inv: u64,
    /// `2^256 mod m`
    pub r: [u64; 4],
    /// `2^512 mod m`
    pub r2: [u64; 4],
    /// `2^768 mod m`
    pub r3: [u64; 4],
}

impl MontgomeryParams {
    /// `a - b mod m`. Adds the modulus back under the final borrow mask.
    #[inline]
    pub const fn sub(&self, a: &[u64; 4], b: &[u64; 4]) -> [u64; 4] {
        let m = &self.modulus;
        let (d0, borrow) = sbb(a[0], b[0], 0);
        let (d1, borrow) = sbb(a[1], b[1], borrow);
        let (d2, borrow) = sbb(a[2], b[2], borrow);
        let (d3, borrow) = sbb(a[3], b[3], borrow);

        let (d0, carry) = adc(d0, m[0] & borrow, 0);
        let (d1, carry) = adc(d1, m[1] & borrow, carry);
        let (d2, carry) = adc(d2, m[2] & borrow, carry);
        let (d3, _) = adc(d3, m[3] & borrow, carry);
        [d0, d1, d2, d3]
    }

    /// `a + b mod m`.
    #[inline]
    pub const fn add(&self, a: &[u64; 4], b: &[u64; 4]) -> [u64; 4] {
        let (d0, carry) = adc(a[0], b[0], 0);
        let (d1, carry) = adc(a[1], b[1], carry);
        let (d2, carry) = adc(a[2], b[2], carry);
        let (d3, _) = adc(a[3], b[3], carry);

        // at most one subtraction of m brings the sum back into range
        self.sub(&[d0, d1, d2, d3], &self.modulus)
    }

    #[inline]
    pub const fn double(&self, a: &[u64; 4]) -> [u64; 4] {
        self.add(a, a)
    }

    /// `m - a`, or zero when `a` is zero.
    #[inline]
    pub const fn neg(&self, a: &[u64; 4]) -> [u64; 4] {
        let m = &self.modulus;
        let (d0, borrow) = sbb(m[0], a[0], 0);
        let (d1, borrow) = sbb(m[1], a[1], borrow);
        let (d2, borrow) = sbb(m[2], a[2], borrow);
        let (d3, _) = sbb(m[3], a[3], borrow);

        // all ones unless a == 0
        let mask = (((a[0] | a[1] | a[2] | a[3]) == 0) as u64).wrapping_sub(1);
        [d0 & mask, d1 & mask, d2 & mask, d3 & mask]
    }

    /// Montgomery product `a * b * R^{-1} mod m`.
    #[inline]
    pub const fn mul(&self, a: &[u64; 4], b: &[u64; 4]) -> [u64; 4] {
        let mut t = [0u64; 8];
        let mut i = 0;
        while i < 4 {
            let mut carry = 0;
            let mut j = 0;
            while j < 4 {
                let (lo, hi) = mac(t[i + j], a[i], b[j], carry);
                t[i + j] = lo;
                carry = hi;
                j += 1;
            }
            t[i + 4] = carry;
            i += 1;
        }
        self.montgomery_reduce(&t)
    }

    /// Montgomery square. Cross products are computed once and doubled with a
    /// shift before the diagonal is added.
    #[inline]
    pub const fn square(&self, a: &[u64; 4]) -> [u64; 4] {
        let mut t = [0u64; 8];
        let mut i = 0;
        while i < 3 {
            let mut carry = 0;
            let mut j = i + 1;
            while j < 4 {
                let (lo, hi) = mac(t[i + j], a[i], a[j], carry);
                t[i + j] = lo;
                carry = hi;
                j += 1;
            }
            t[i + 4] = carry;
            i += 1;
        }

        t[7] = t[6] >> 63;
        let mut k = 6;
        while k > 1 {
            t[k] = (t[k] << 1) | (t[k - 1] >> 63);
            k -= 1;
        }
        t[1] <<= 1;

        let mut carry = 0;
        let mut i = 0;
        while i < 4 {
            let (lo, hi) = mac(t[2 * i], a[i], a[i], carry);
            t[2 * i] = lo;
            let (lo, hi) = adc(t[2 * i + 1], 0, hi);
            t[2 * i + 1] = lo;
            carry = hi;
            i += 1;
        }
        self.montgomery_reduce(&t)
    }

    /// Reduce an eight-limb value `T < m * R` to `T * R^{-1} mod m`.
    #[inline]
    pub const fn montgomery_reduce(&self, wide: &[u64; 8]) -> [u64; 4] {
        let m = &self.modulus;
        let mut t = *wide;
        let mut carry2 = 0;
        let mut i = 0;
        while i < 4 {
            let k = t[i].wrapping_mul(self.inv);
            let (_, mut carry) = mac(t[i], k, m[0], 0);
            let mut j = 1;
            while j < 4 {
                let (lo, hi) = mac(t[i + j], k, m[j], carry);
                t[i + j] = lo;
                carry = hi;
                j += 1;
            }
            let (lo, hi) = adc(t[i + 4], carry2, carry);
            t[i + 4] = lo;
            carry2 = hi;
            i += 1;
        }
        self.sub(&[t[4], t[5], t[6], t[7]], m)
    }

    /// Lift canonical limbs into Montgomery form.
    #[inline]
    pub const fn to_montgomery(&self, a: &[u64; 4]) -> [u64; 4] {
        self.mul(a, &self.r2)
    }

    /// Leave Montgomery form: the canonical integer in `[0, m)`.
    #[inline]
    pub const fn to_canonical(&self, a: &[u64; 4]) -> [u64; 4] {
        self.montgomery_reduce(&[a[0], a[1], a[2], a[3], 0, 0, 0, 0])
    }

    /// Reduce the 512-bit integer `lo + hi * 2^256` into Montgomery form.
    ///
    /// Each half is first brought down by one conditional subtraction. The low
    /// half is then scaled by `R^2` and the high half by `R^3`.
    pub const fn reduce_wide(&self, lo: &[u64; 4], hi: &[u64; 4]) -> [u64; 4] {
        let lo = self.sub(lo, &self.modulus);
        let hi = self.sub(hi, &self.modulus);
        self.add(&self.mul(&lo, &self.r2), &self.mul(&hi, &self.r3))
    }

    /// Whether canonical limbs `a` are strictly below the modulus.
    #[inline]
    pub const fn is_canonical(&self, a: &[u64; 4]) -> bool {
        let m = &self.modulus;
        let (_, borrow) = sbb(a[0], m[0], 0);
        let (_, borrow) = sbb(a[1], m[1], borrow);
        let (_, borrow) = sbb(a[2], m[2], borrow);
        let (_, borrow) = sbb(a[3], m[3], borrow);
        borrow != 0
    }
}
