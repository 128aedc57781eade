//! Extended twisted Edwards coordinates and the curve group law.
//!
//! An [`ExtendedPoint`] `(U, V, Z, T1, T2)` stands for the affine point
//! `(U/Z, V/Z)` with `T1 * T2 * Z = U * V`. Keeping `T = T1 * T2` split in two
//! factors lets the addition output skip one multiplication.
//!
//! Every addition and doubling goes through [`CompletedPoint`]
//! `((U:Z), (V:T))`, the natural output of the unified formulas of Hisil,
//! Wong, Carter and Dawson, and is folded straight back into extended form.
//! Because `d` is not a square in the base field the unified formulas are
//! complete: they are correct for every pair of inputs, identity and
//! doublings included, so none of the group operations branch.

use core::iter::Sum;
use core::ops::{Add, AddAssign, Mul, MulAssign, Neg, Sub, SubAssign};

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use subtle::{Choice, ConditionallySelectable, ConstantTimeEq};

use crate::affine::AffinePoint;
use crate::basefield::{BaseField, EDWARDS_D2};
use crate::error::JubjubError;
use crate::field::{limbs_to_le_bytes, FieldParams};
use crate::generator_table;
use crate::group::Group;
use crate::niels::{AffineNielsPoint, ExtendedNielsPoint};
use crate::scalarfield::{ScalarField, ScalarParams};
use crate::serialization;
use crate::window::LookupTable;

/// Curve point in extended coordinates. The working representation for all
/// group arithmetic.
#[derive(Copy, Clone, Debug)]
pub struct ExtendedPoint {
    u: BaseField,
    v: BaseField,
    z: BaseField,
    t1: BaseField,
    t2: BaseField,
}

/// `((U:Z), (V:T))`, the transient output of the addition and doubling laws.
#[derive(Copy, Clone, Debug)]
pub(crate) struct CompletedPoint {
    u: BaseField,
    v: BaseField,
    z: BaseField,
    t: BaseField,
}

impl CompletedPoint {
    #[inline]
    pub(crate) fn into_extended(self) -> ExtendedPoint {
        ExtendedPoint {
            u: self.u * self.t,
            v: self.v * self.z,
            z: self.z * self.t,
            t1: self.u,
            t2: self.v,
        }
    }
}

impl ExtendedPoint {
    pub const fn identity() -> Self {
        ExtendedPoint {
            u: BaseField::ZERO,
            v: BaseField::ONE,
            z: BaseField::ONE,
            t1: BaseField::ZERO,
            t2: BaseField::ONE,
        }
    }

    pub fn generator() -> Self {
        Self::from(AffinePoint::generator())
    }

    pub fn is_identity(&self) -> Choice {
        self.u.ct_eq(&BaseField::ZERO) & self.v.ct_eq(&self.z)
    }

    pub fn to_affine(&self) -> AffinePoint {
        let zinv = self.z.invert_or_zero();
        AffinePoint::from_raw_unchecked(self.u * zinv, self.v * zinv)
    }

    /// Convert many points to affine form with a single field inversion.
    pub fn batch_normalize(points: &[Self]) -> Vec<AffinePoint> {
        let mut zs: Vec<BaseField> = points.iter().map(|p| p.z).collect();
        BaseField::batch_invert(&mut zs);
        points
            .iter()
            .zip(zs)
            .map(|(p, zinv)| AffinePoint::from_raw_unchecked(p.u * zinv, p.v * zinv))
            .collect()
    }

    pub fn to_niels(&self) -> ExtendedNielsPoint {
        ExtendedNielsPoint {
            v_plus_u: self.v + self.u,
            v_minus_u: self.v - self.u,
            z: self.z,
            t2d: self.t1 * self.t2 * EDWARDS_D2,
        }
    }

    /// Checks `Z != 0`, the curve equation for `(U/Z, V/Z)` and the
    /// consistency of `T1 * T2`.
    pub fn is_on_curve_vartime(&self) -> bool {
        if self.z.is_zero() {
            return false;
        }
        self.to_affine().is_on_curve_vartime() && self.t1 * self.t2 * self.z == self.u * self.v
    }

    pub fn double(&self) -> Self {
        let uu = self.u.square();
        let vv = self.v.square();
        let zz2 = self.z.square().double();
        let uv2 = (self.u + self.v).square();
        let vv_plus_uu = vv + uu;
        let vv_minus_uu = vv - uu;

        CompletedPoint {
            u: uv2 - vv_plus_uu,
            v: vv_plus_uu,
            z: vv_minus_uu,
            t: zz2 - vv_minus_uu,
        }
        .into_extended()
    }

    fn add_extended_niels(&self, other: &ExtendedNielsPoint) -> CompletedPoint {
        let a = (self.v - self.u) * other.v_minus_u;
        let b = (self.v + self.u) * other.v_plus_u;
        let c = self.t1 * self.t2 * other.t2d;
        let d = (self.z * other.z).double();

        CompletedPoint {
            u: b - a,
            v: b + a,
            z: d + c,
            t: d - c,
        }
    }

    fn sub_extended_niels(&self, other: &ExtendedNielsPoint) -> CompletedPoint {
        let a = (self.v - self.u) * other.v_plus_u;
        let b = (self.v + self.u) * other.v_minus_u;
        let c = self.t1 * self.t2 * other.t2d;
        let d = (self.z * other.z).double();

        CompletedPoint {
            u: b - a,
            v: b + a,
            z: d - c,
            t: d + c,
        }
    }

    // Same as the extended form with Z' = 1.
    fn add_affine_niels(&self, other: &AffineNielsPoint) -> CompletedPoint {
        let a = (self.v - self.u) * other.v_minus_u;
        let b = (self.v + self.u) * other.v_plus_u;
        let c = self.t1 * self.t2 * other.t2d;
        let d = self.z.double();

        CompletedPoint {
            u: b - a,
            v: b + a,
            z: d + c,
            t: d - c,
        }
    }

    fn sub_affine_niels(&self, other: &AffineNielsPoint) -> CompletedPoint {
        let a = (self.v - self.u) * other.v_plus_u;
        let b = (self.v + self.u) * other.v_minus_u;
        let c = self.t1 * self.t2 * other.t2d;
        let d = self.z.double();

        CompletedPoint {
            u: b - a,
            v: b + a,
            z: d - c,
            t: d + c,
        }
    }

    /// Multiply by the cofactor 8.
    pub fn mul_by_cofactor(&self) -> Self {
        self.double().double().double()
    }

    /// Whether the point lies in the torsion subgroup of order 8.
    pub fn is_small_order(&self) -> Choice {
        self.mul_by_cofactor().is_identity()
    }

    /// Whether `r * self` is the identity, i.e. the point has no component in
    /// the small-order subgroup.
    pub fn is_torsion_free_vartime(&self) -> bool {
        let r = limbs_to_le_bytes(&ScalarParams::PARAMS.modulus);
        self.mul_bytes_vartime(&r).is_identity().into()
    }

    /// Whether the point generates the prime-order subgroup.
    pub fn is_prime_order_vartime(&self) -> bool {
        self.is_torsion_free_vartime() && !bool::from(self.is_identity())
    }

    /// Multiply by a 256-bit little-endian integer in constant time.
    ///
    /// Fixed 4-bit windows from the top: every window performs four doublings
    /// and one addition of an entry fetched by a full table scan.
    pub fn mul_bytes(&self, by: &[u8; 32]) -> Self {
        let table = LookupTable::<ExtendedNielsPoint>::from(self);
        let mut acc = Self::identity();
        for byte in by.iter().rev() {
            for nibble in [byte >> 4, byte & 0x0f] {
                acc = acc.double().double().double().double();
                acc += &table.select(nibble);
            }
        }
        acc
    }

    /// Multiply by a 256-bit little-endian integer, double-and-add from the
    /// top bit.
    ///
    /// The sequence of operations reveals the integer. Only for public
    /// multipliers such as the group order.
    pub fn mul_bytes_vartime(&self, by: &[u8; 32]) -> Self {
        let addend = self.to_niels();
        let mut acc = Self::identity();
        for byte in by.iter().rev() {
            for i in (0..8).rev() {
                acc = acc.double();
                if (byte >> i) & 1 == 1 {
                    acc += &addend;
                }
            }
        }
        acc
    }

    /// `scalar * generator()` from the precomputed fixed-base table.
    pub fn mul_generator(scalar: &ScalarField) -> Self {
        generator_table::mul_generator(scalar)
    }

    pub fn to_bytes(&self) -> [u8; 32] {
        self.to_affine().to_bytes()
    }

    pub fn from_bytes(bytes: &[u8; 32]) -> Result<Self, JubjubError> {
        AffinePoint::from_bytes(bytes).map(Self::from)
    }
}

impl Default for ExtendedPoint {
    fn default() -> Self {
        Self::identity()
    }
}

impl ConstantTimeEq for ExtendedPoint {
    fn ct_eq(&self, other: &Self) -> Choice {
        (self.u * other.z).ct_eq(&(other.u * self.z)) & (self.v * other.z).ct_eq(&(other.v * self.z))
    }
}

impl PartialEq for ExtendedPoint {
    fn eq(&self, other: &Self) -> bool {
        self.ct_eq(other).into()
    }
}

impl Eq for ExtendedPoint {}

impl ConditionallySelectable for ExtendedPoint {
    fn conditional_select(a: &Self, b: &Self, choice: Choice) -> Self {
        ExtendedPoint {
            u: BaseField::conditional_select(&a.u, &b.u, choice),
            v: BaseField::conditional_select(&a.v, &b.v, choice),
            z: BaseField::conditional_select(&a.z, &b.z, choice),
            t1: BaseField::conditional_select(&a.t1, &b.t1, choice),
            t2: BaseField::conditional_select(&a.t2, &b.t2, choice),
        }
    }
}

impl Group for ExtendedPoint {
    type Scalar = ScalarField;

    #[inline]
    fn identity() -> Self {
        Self::identity()
    }

    #[inline]
    fn is_identity(&self) -> bool {
        Self::is_identity(self).into()
    }

    #[inline]
    fn generator() -> Self {
        Self::generator()
    }

    #[inline]
    fn double(&self) -> Self {
        Self::double(self)
    }

    #[inline]
    fn negate(&self) -> Self {
        -*self
    }

    #[inline]
    fn scalar_mul(&self, scalar: &ScalarField) -> Self {
        self.mul_bytes(&scalar.to_bytes())
    }

    #[inline]
    fn mul_generator(scalar: &ScalarField) -> Self {
        Self::mul_generator(scalar)
    }
}

// Addition laws
impl<'b> Add<&'b ExtendedNielsPoint> for &ExtendedPoint {
    type Output = ExtendedPoint;

    fn add(self, other: &'b ExtendedNielsPoint) -> ExtendedPoint {
        self.add_extended_niels(other).into_extended()
    }
}

impl<'b> Sub<&'b ExtendedNielsPoint> for &ExtendedPoint {
    type Output = ExtendedPoint;

    fn sub(self, other: &'b ExtendedNielsPoint) -> ExtendedPoint {
        self.sub_extended_niels(other).into_extended()
    }
}

impl<'b> Add<&'b AffineNielsPoint> for &ExtendedPoint {
    type Output = ExtendedPoint;

    fn add(self, other: &'b AffineNielsPoint) -> ExtendedPoint {
        self.add_affine_niels(other).into_extended()
    }
}

impl<'b> Sub<&'b AffineNielsPoint> for &ExtendedPoint {
    type Output = ExtendedPoint;

    fn sub(self, other: &'b AffineNielsPoint) -> ExtendedPoint {
        self.sub_affine_niels(other).into_extended()
    }
}

impl<'b> Add<&'b ExtendedNielsPoint> for ExtendedPoint {
    type Output = ExtendedPoint;

    fn add(self, other: &'b ExtendedNielsPoint) -> ExtendedPoint {
        &self + other
    }
}

impl<'b> Sub<&'b ExtendedNielsPoint> for ExtendedPoint {
    type Output = ExtendedPoint;

    fn sub(self, other: &'b ExtendedNielsPoint) -> ExtendedPoint {
        &self - other
    }
}

impl<'b> Add<&'b AffineNielsPoint> for ExtendedPoint {
    type Output = ExtendedPoint;

    fn add(self, other: &'b AffineNielsPoint) -> ExtendedPoint {
        &self + other
    }
}

impl<'b> Sub<&'b AffineNielsPoint> for ExtendedPoint {
    type Output = ExtendedPoint;

    fn sub(self, other: &'b AffineNielsPoint) -> ExtendedPoint {
        &self - other
    }
}

impl<'b> AddAssign<&'b ExtendedNielsPoint> for ExtendedPoint {
    fn add_assign(&mut self, other: &'b ExtendedNielsPoint) {
        *self = &*self + other;
    }
}

impl<'b> SubAssign<&'b ExtendedNielsPoint> for ExtendedPoint {
    fn sub_assign(&mut self, other: &'b ExtendedNielsPoint) {
        *self = &*self - other;
    }
}

impl<'b> AddAssign<&'b AffineNielsPoint> for ExtendedPoint {
    fn add_assign(&mut self, other: &'b AffineNielsPoint) {
        *self = &*self + other;
    }
}

impl<'b> SubAssign<&'b AffineNielsPoint> for ExtendedPoint {
    fn sub_assign(&mut self, other: &'b AffineNielsPoint) {
        *self = &*self - other;
    }
}

impl Add for ExtendedPoint {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        &self + &other.to_niels()
    }
}

impl AddAssign for ExtendedPoint {
    fn add_assign(&mut self, other: Self) {
        *self = *self + other;
    }
}

impl Sub for ExtendedPoint {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        &self - &other.to_niels()
    }
}

impl SubAssign for ExtendedPoint {
    fn sub_assign(&mut self, other: Self) {
        *self = *self - other;
    }
}

impl Neg for ExtendedPoint {
    type Output = Self;

    fn neg(self) -> Self {
        ExtendedPoint {
            u: -self.u,
            v: self.v,
            z: self.z,
            t1: -self.t1,
            t2: self.t2,
        }
    }
}

impl Sum for ExtendedPoint {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::identity(), |acc, p| acc + p)
    }
}

// Scalar multiplication
impl Mul<ScalarField> for ExtendedPoint {
    type Output = Self;

    fn mul(self, scalar: ScalarField) -> Self {
        <Self as Group>::scalar_mul(&self, &scalar)
    }
}

impl Mul<&ScalarField> for ExtendedPoint {
    type Output = Self;

    fn mul(self, scalar: &ScalarField) -> Self {
        <Self as Group>::scalar_mul(&self, scalar)
    }
}

impl Mul<ExtendedPoint> for ScalarField {
    type Output = ExtendedPoint;

    fn mul(self, point: ExtendedPoint) -> ExtendedPoint {
        <ExtendedPoint as Group>::scalar_mul(&point, &self)
    }
}

impl Mul<&ExtendedPoint> for ScalarField {
    type Output = ExtendedPoint;

    fn mul(self, point: &ExtendedPoint) -> ExtendedPoint {
        <ExtendedPoint as Group>::scalar_mul(point, &self)
    }
}

impl MulAssign<ScalarField> for ExtendedPoint {
    fn mul_assign(&mut self, scalar: ScalarField) {
        *self = *self * scalar;
    }
}

// Conversions
impl From<AffinePoint> for ExtendedPoint {
    fn from(point: AffinePoint) -> Self {
        ExtendedPoint {
            u: point.u(),
            v: point.v(),
            z: BaseField::ONE,
            t1: point.u(),
            t2: point.v(),
        }
    }
}

impl From<&AffinePoint> for ExtendedPoint {
    fn from(point: &AffinePoint) -> Self {
        Self::from(*point)
    }
}

impl From<ExtendedPoint> for AffinePoint {
    fn from(point: ExtendedPoint) -> Self {
        point.to_affine()
    }
}

impl From<&ExtendedPoint> for AffinePoint {
    fn from(point: &ExtendedPoint) -> Self {
        point.to_affine()
    }
}

impl Serialize for ExtendedPoint {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serialization::serialize_bytes32(&self.to_bytes(), serializer)
    }
}

impl<'de> Deserialize<'de> for ExtendedPoint {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let bytes = serialization::deserialize_bytes32(deserializer, "a curve point")?;
        ExtendedPoint::from_bytes(&bytes).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::RandomField;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn random_point(rng: &mut StdRng) -> ExtendedPoint {
        ExtendedPoint::generator() * ScalarField::random(rng)
    }

    // order-2 point (0, -1)
    fn torsion_point() -> ExtendedPoint {
        ExtendedPoint::from(AffinePoint::from_raw_unchecked(
            BaseField::ZERO,
            -BaseField::ONE,
        ))
    }

    #[test]
    fn test_identity() {
        let id = ExtendedPoint::identity();
        assert!(bool::from(id.is_identity()));
        assert!(id.is_on_curve_vartime());
        assert_eq!(id.to_affine(), AffinePoint::identity());

        let g = ExtendedPoint::generator();
        assert_eq!(g + id, g);
        assert_eq!(id + g, g);
        assert_eq!(id.double(), id);
    }

    #[test]
    fn test_generator_on_curve() {
        let g = ExtendedPoint::generator();
        assert!(g.is_on_curve_vartime(), "Generator point is not on the curve");
        assert!(!bool::from(g.is_identity()));
        assert!(g.is_prime_order_vartime());
    }

    #[test]
    fn test_point_doubling() {
        let g = ExtendedPoint::generator();
        let g2 = g.double();
        assert!(g2.is_on_curve_vartime(), "Doubled point is not on the curve");
        assert_eq!(g + g, g2);
    }

    #[test]
    fn test_addition_variants_agree() {
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..10 {
            let p = random_point(&mut rng);
            let q = random_point(&mut rng);
            let q_affine = q.to_affine();

            let sum = p + q;
            assert_eq!(p + &q.to_niels(), sum);
            assert_eq!(p + &q_affine.to_niels(), sum);
            assert!(sum.is_on_curve_vartime());

            let diff = p - q;
            assert_eq!(p - &q.to_niels(), diff);
            assert_eq!(p - &q_affine.to_niels(), diff);
            assert_eq!(diff + q, p);
        }
    }

    #[test]
    fn test_associativity_commutativity() {
        let mut rng = StdRng::seed_from_u64(7);
        let a = random_point(&mut rng);
        let b = random_point(&mut rng);
        let c = random_point(&mut rng);
        assert_eq!((a + b) + c, a + (b + c));
        assert_eq!(a + b, b + a);
    }

    #[test]
    fn test_point_negation() {
        let g = ExtendedPoint::generator();
        let neg_g = -g;
        assert!(neg_g.is_on_curve_vartime());
        assert_eq!(g + neg_g, ExtendedPoint::identity());
        assert_eq!(-neg_g, g);
        assert_eq!(neg_g.to_affine(), -g.to_affine());
    }

    #[test]
    fn test_equality_across_representations() {
        let g = ExtendedPoint::generator();
        // 3G computed two ways ends up with different Z
        let a = g.double() + g;
        let b = g + g + g;
        assert_eq!(a, b);
        assert_eq!(a.to_affine(), b.to_affine());
        assert_ne!(a, g);
    }

    #[test]
    fn test_scalar_mul_zero_one() {
        let g = ExtendedPoint::generator();
        assert_eq!(g * ScalarField::ZERO, ExtendedPoint::identity());
        assert_eq!(g * ScalarField::ONE, g);
        assert_eq!(
            ExtendedPoint::identity() * ScalarField::from_u64(12345),
            ExtendedPoint::identity()
        );
    }

    #[test]
    fn test_scalar_multiplication() {
        let g = ExtendedPoint::generator();
        let scalar = ScalarField::from_u64(5);
        let result = g * scalar;
        let expected = g + g + g + g + g;
        assert_eq!(result, expected);
        assert!(result.is_on_curve_vartime());
        assert_eq!(scalar * g, result);
    }

    #[test]
    fn test_constant_time_matches_vartime() {
        let mut rng = StdRng::seed_from_u64(1234);
        let p = random_point(&mut rng);
        for _ in 0..5 {
            let k = ScalarField::random(&mut rng);
            assert_eq!(p.mul_bytes(&k.to_bytes()), p.mul_bytes_vartime(&k.to_bytes()));
            assert_eq!(p.scalar_mul(&k), p.scalar_mul_vartime(&k));
        }
    }

    #[test]
    fn test_scalar_distributivity() {
        let g = ExtendedPoint::generator();
        let a = ScalarField::from_u64(3);
        let b = ScalarField::from_u64(5);
        assert_eq!(g * (a + b), g * a + g * b);
        assert_eq!((g * a) * b, g * (a * b));
    }

    #[test]
    fn test_order_times_generator() {
        let g = ExtendedPoint::generator();
        // (r - 1) * G = -G
        assert_eq!(g * -ScalarField::ONE, -g);
        let r = limbs_to_le_bytes(&ScalarParams::PARAMS.modulus);
        assert_eq!(g.mul_bytes(&r), ExtendedPoint::identity());
    }

    #[test]
    fn test_cofactor_and_torsion() {
        let t = torsion_point();
        assert!(t.is_on_curve_vartime());
        assert!(bool::from(t.is_small_order()));
        assert!(!t.is_torsion_free_vartime());
        assert_eq!(t.double(), ExtendedPoint::identity());

        let g = ExtendedPoint::generator();
        assert!(!bool::from(g.is_small_order()));
        assert_eq!(g.mul_by_cofactor(), g.mul_u64(8));

        // a mixed point is neither small nor torsion-free; clearing the
        // cofactor removes the torsion part
        let mixed = g + t;
        assert!(!mixed.is_torsion_free_vartime());
        assert!(mixed.mul_by_cofactor().is_torsion_free_vartime());
        assert_eq!(mixed.mul_by_cofactor(), g.mul_by_cofactor());
    }

    #[test]
    fn test_mul_u64() {
        let g = ExtendedPoint::generator();
        let n = 42u64;
        assert_eq!(g.mul_u64(n), g * ScalarField::from_u64(n));
        assert_eq!(g.mul_u64(0), ExtendedPoint::identity());
    }

    #[test]
    fn test_multi_scalar_mul() {
        let g = ExtendedPoint::generator();
        let h = g.mul_u64(99);
        let a = ScalarField::from_u64(7);
        let b = ScalarField::from_u64(11);

        let result = <ExtendedPoint as Group>::multi_scalar_mul(&[g, h], &[a, b]);
        assert_eq!(result, g * a + h * b);
        assert_eq!(result, g.mul_u64(7 + 11 * 99));
    }

    #[test]
    fn test_batch_normalize() {
        let g = ExtendedPoint::generator();
        let points = vec![
            g,
            g.double(),
            g.double() + g,
            ExtendedPoint::identity(),
        ];
        let affine_points = ExtendedPoint::batch_normalize(&points);
        assert_eq!(affine_points.len(), 4);
        for (ext, aff) in points.iter().zip(affine_points.iter()) {
            assert_eq!(ext.to_affine(), *aff);
        }
    }

    #[test]
    fn test_is_on_curve_detects_bad_t() {
        let mut p = ExtendedPoint::generator().double();
        assert!(p.is_on_curve_vartime());
        p.t1 = p.t1 + BaseField::ONE;
        assert!(!p.is_on_curve_vartime());

        let mut z0 = ExtendedPoint::generator();
        z0.z = BaseField::ZERO;
        assert!(!z0.is_on_curve_vartime());
    }

    #[test]
    fn test_sum() {
        let g = ExtendedPoint::generator();
        let total: ExtendedPoint = (1..=4).map(|k| g.mul_u64(k)).sum();
        assert_eq!(total, g.mul_u64(10));
    }

    #[test]
    fn test_bytes_roundtrip() {
        let mut rng = StdRng::seed_from_u64(5);
        let p = random_point(&mut rng);
        assert_eq!(ExtendedPoint::from_bytes(&p.to_bytes()), Ok(p));
    }

    #[test]
    fn test_serde_roundtrip() {
        let g = ExtendedPoint::generator().double();
        let encoded = bincode::serialize(&g).expect("serialize");
        assert_eq!(encoded.len(), 32);
        let decoded: ExtendedPoint = bincode::deserialize(&encoded).expect("deserialize");
        assert_eq!(decoded, g);
    }
}
