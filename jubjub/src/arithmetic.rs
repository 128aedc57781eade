//! Carry-propagating primitives over 64-bit limbs.

/// Compute `a + b + carry`, returning the low word and the carry out.
#[inline(always)]
pub const fn adc(a: u64, b: u64, carry: u64) -> (u64, u64) {
    let sum = (a as u128) + (b as u128) + (carry as u128);
    (sum as u64, (sum >> 64) as u64)
}

/// Compute `a - (b + borrow)`, returning the low word and the borrow out.
///
/// The borrow is carried as a mask: `0` or `u64::MAX`. Only its top bit is
/// read on input.
#[inline(always)]
pub const fn sbb(a: u64, b: u64, borrow: u64) -> (u64, u64) {
    let diff = (a as u128).wrapping_sub((b as u128) + ((borrow >> 63) as u128));
    (diff as u64, (diff >> 64) as u64)
}

/// Compute `acc + (a * b) + carry`, returning the low word and the carry out.
#[inline(always)]
pub const fn mac(acc: u64, a: u64, b: u64, carry: u64) -> (u64, u64) {
    let wide = (acc as u128) + (a as u128) * (b as u128) + (carry as u128);
    (wide as u64, (wide >> 64) as u64)
}

/// Subtract a single word from a 256-bit integer. Wraps on underflow.
pub(crate) const fn sub_word(a: &[u64; 4], w: u64) -> [u64; 4] {
    let (d0, borrow) = sbb(a[0], w, 0);
    let (d1, borrow) = sbb(a[1], 0, borrow);
    let (d2, borrow) = sbb(a[2], 0, borrow);
    let (d3, _) = sbb(a[3], 0, borrow);
    [d0, d1, d2, d3]
}
