//! Constant-time lookup tables for 4-bit windowed scalar multiplication.

use subtle::{ConditionallySelectable, ConstantTimeEq};

use crate::extended::ExtendedPoint;
use crate::niels::ExtendedNielsPoint;

/// The sixteen multiples `0*P, 1*P, ..., 15*P` of a point in addend form.
#[derive(Copy, Clone, Debug)]
pub struct LookupTable<T>(pub(crate) [T; 16]);

impl<T: Copy + ConditionallySelectable> LookupTable<T> {
    /// Fetch `x * P` for `x` in `0..16`, touching every entry.
    pub fn select(&self, x: u8) -> T {
        debug_assert!(x < 16);

        let mut t = self.0[0];
        for j in 1..16 {
            let c = (j as u8).ct_eq(&x);
            t.conditional_assign(&self.0[j], c);
        }
        t
    }

    /// Direct indexing for public windows.
    #[inline]
    pub(crate) fn get_vartime(&self, x: u8) -> T {
        self.0[x as usize]
    }
}

impl<'a> From<&'a ExtendedPoint> for LookupTable<ExtendedNielsPoint> {
    fn from(p: &'a ExtendedPoint) -> Self {
        let mut points = [ExtendedNielsPoint::identity(); 16];
        let mut acc = ExtendedPoint::identity();
        for entry in points.iter_mut().skip(1) {
            acc += *p;
            *entry = acc.to_niels();
        }
        LookupTable(points)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Group;

    #[test]
    fn test_select_matches_multiples() {
        let g = ExtendedPoint::generator();
        let table = LookupTable::<ExtendedNielsPoint>::from(&g);
        for j in 0..16u8 {
            let expected = g.mul_u64(j as u64);
            assert_eq!(ExtendedPoint::identity() + &table.select(j), expected);
            assert_eq!(table.select(j), table.get_vartime(j));
        }
    }
}
