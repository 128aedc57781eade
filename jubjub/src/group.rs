use core::ops::{Add, AddAssign, Neg, Sub, SubAssign};

/// Access to the canonical little-endian limbs of a scalar.
pub trait ScalarBits {
    fn to_u64_limbs(&self) -> [u64; 4];
}

/// A prime-order group written additively.
///
/// Implementors supply the constant-time operations; the `_vartime` and
/// integer helpers have default implementations in terms of them.
pub trait Group:
    Sized + Copy + Add<Output = Self> + AddAssign + Sub<Output = Self> + SubAssign + Neg<Output = Self>
{
    type Scalar: ScalarBits;

    fn identity() -> Self;
    fn is_identity(&self) -> bool;
    fn generator() -> Self;
    fn double(&self) -> Self;
    fn negate(&self) -> Self;

    /// `scalar * self` in constant time.
    fn scalar_mul(&self, scalar: &Self::Scalar) -> Self;

    /// `scalar * generator()` in constant time.
    fn mul_generator(scalar: &Self::Scalar) -> Self {
        Self::generator().scalar_mul(scalar)
    }

    /// `scalar * self` by double-and-add, most significant bit first.
    ///
    /// Branches on every scalar bit. Never use it with a secret scalar.
    fn scalar_mul_vartime(&self, scalar: &Self::Scalar) -> Self {
        let mut result = Self::identity();
        for &limb in scalar.to_u64_limbs().iter().rev() {
            for i in (0..64).rev() {
                result = result.double();
                if (limb >> i) & 1 == 1 {
                    result += *self;
                }
            }
        }
        result
    }

    /// Multiply by a small public integer.
    fn mul_u64(&self, n: u64) -> Self {
        if n == 0 {
            return Self::identity();
        }
        if n == 1 {
            return *self;
        }

        let mut result = Self::identity();
        let mut temp = *self;
        let mut bits = n;

        while bits > 0 {
            if bits & 1 == 1 {
                result += temp;
            }
            temp = temp.double();
            bits >>= 1;
        }

        result
    }

    /// `sum(scalars[i] * points[i])`.
    fn multi_scalar_mul(points: &[Self], scalars: &[Self::Scalar]) -> Self {
        assert_eq!(
            points.len(),
            scalars.len(),
            "Points and scalars must have same length"
        );

        let mut result = Self::identity();
        for (point, scalar) in points.iter().zip(scalars.iter()) {
            result += point.scalar_mul(scalar);
        }
        result
    }
}
