//! Precomputed addends for the extended-coordinate addition law.
//!
//! Both forms cache `V + U` and `V - U` together with `2d` times the product
//! of the coordinates, which is what the HWCD unified addition actually
//! consumes. The affine form additionally drops `Z`, saving one
//! multiplication per addition.

use core::ops::Neg;

use subtle::{Choice, ConditionallySelectable};

use crate::basefield::BaseField;

/// `(V + U, V - U, 2d * U * V)` for an affine point.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct AffineNielsPoint {
    pub(crate) v_plus_u: BaseField,
    pub(crate) v_minus_u: BaseField,
    pub(crate) t2d: BaseField,
}

/// `(V + U, V - U, Z, 2d * T1 * T2)` for an extended point.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ExtendedNielsPoint {
    pub(crate) v_plus_u: BaseField,
    pub(crate) v_minus_u: BaseField,
    pub(crate) z: BaseField,
    pub(crate) t2d: BaseField,
}

impl AffineNielsPoint {
    pub const fn identity() -> Self {
        AffineNielsPoint {
            v_plus_u: BaseField::ONE,
            v_minus_u: BaseField::ONE,
            t2d: BaseField::ZERO,
        }
    }
}

impl ExtendedNielsPoint {
    pub const fn identity() -> Self {
        ExtendedNielsPoint {
            v_plus_u: BaseField::ONE,
            v_minus_u: BaseField::ONE,
            z: BaseField::ONE,
            t2d: BaseField::ZERO,
        }
    }
}

impl Default for AffineNielsPoint {
    fn default() -> Self {
        Self::identity()
    }
}

impl Default for ExtendedNielsPoint {
    fn default() -> Self {
        Self::identity()
    }
}

impl ConditionallySelectable for AffineNielsPoint {
    fn conditional_select(a: &Self, b: &Self, choice: Choice) -> Self {
        AffineNielsPoint {
            v_plus_u: BaseField::conditional_select(&a.v_plus_u, &b.v_plus_u, choice),
            v_minus_u: BaseField::conditional_select(&a.v_minus_u, &b.v_minus_u, choice),
            t2d: BaseField::conditional_select(&a.t2d, &b.t2d, choice),
        }
    }
}

impl ConditionallySelectable for ExtendedNielsPoint {
    fn conditional_select(a: &Self, b: &Self, choice: Choice) -> Self {
        ExtendedNielsPoint {
            v_plus_u: BaseField::conditional_select(&a.v_plus_u, &b.v_plus_u, choice),
            v_minus_u: BaseField::conditional_select(&a.v_minus_u, &b.v_minus_u, choice),
            z: BaseField::conditional_select(&a.z, &b.z, choice),
            t2d: BaseField::conditional_select(&a.t2d, &b.t2d, choice),
        }
    }
}

// Negating U swaps the two sums and flips the sign of the product term.
impl Neg for AffineNielsPoint {
    type Output = Self;

    fn neg(self) -> Self {
        AffineNielsPoint {
            v_plus_u: self.v_minus_u,
            v_minus_u: self.v_plus_u,
            t2d: -self.t2d,
        }
    }
}

impl Neg for ExtendedNielsPoint {
    type Output = Self;

    fn neg(self) -> Self {
        ExtendedNielsPoint {
            v_plus_u: self.v_minus_u,
            v_minus_u: self.v_plus_u,
            z: self.z,
            t2d: -self.t2d,
        }
    }
}
