use core::ops::Neg;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use subtle::{Choice, ConditionallyNegatable, ConditionallySelectable, ConstantTimeEq};

use crate::basefield::{BaseField, EDWARDS_D, EDWARDS_D2};
use crate::error::JubjubError;
use crate::extended::ExtendedPoint;
use crate::niels::AffineNielsPoint;
use crate::serialization;

/// Affine point `(u, v)` on the twisted Edwards curve
/// `-u^2 + v^2 = 1 + d * u^2 * v^2`.
///
/// The identity is `(0, 1)`. There is no separate point at infinity: the
/// curve is complete.
#[derive(Copy, Clone, Debug)]
pub struct AffinePoint {
    u: BaseField,
    v: BaseField,
}

impl AffinePoint {
    pub const IDENTITY: Self = AffinePoint {
        u: BaseField::ZERO,
        v: BaseField::ONE,
    };

    /// Fixed generator of the prime-order subgroup: eight times the curve point
    /// with `v = 11` and odd `u`.
    pub const GENERATOR: Self = AffinePoint {
        u: BaseField::from_montgomery([
            0x264ab2ae27790d7a,
            0x7715419fe4328d1b,
            0x26e742fccd3474ae,
            0x0edae7e0e475434b,
        ]),
        v: BaseField::from_montgomery([
            0x30b42f35b6518e59,
            0x599e51c9ec7ab10a,
            0x3798281a9e12a20f,
            0x30af1cc0df805b82,
        ]),
    };

    #[inline]
    pub const fn identity() -> Self {
        Self::IDENTITY
    }

    #[inline]
    pub const fn generator() -> Self {
        Self::GENERATOR
    }

    /// Build a point from coordinates without checking the curve equation.
    pub const fn from_raw_unchecked(u: BaseField, v: BaseField) -> Self {
        AffinePoint { u, v }
    }

    #[inline]
    pub fn u(&self) -> BaseField {
        self.u
    }

    #[inline]
    pub fn v(&self) -> BaseField {
        self.v
    }

    pub fn is_identity(&self) -> Choice {
        self.ct_eq(&Self::IDENTITY)
    }

    pub fn is_on_curve_vartime(&self) -> bool {
        let u2 = self.u.square();
        let v2 = self.v.square();
        v2 - u2 == BaseField::ONE + EDWARDS_D * u2 * v2
    }

    pub fn to_niels(&self) -> AffineNielsPoint {
        AffineNielsPoint {
            v_plus_u: self.v + self.u,
            v_minus_u: self.v - self.u,
            t2d: self.u * self.v * EDWARDS_D2,
        }
    }

    pub fn mul_by_cofactor(&self) -> ExtendedPoint {
        ExtendedPoint::from(*self).mul_by_cofactor()
    }

    /// 32-byte encoding: the canonical bytes of `v` with the parity of `u`
    /// in the top bit.
    pub fn to_bytes(&self) -> [u8; 32] {
        let mut bytes = self.v.to_bytes();
        bytes[31] |= self.u.is_odd().unwrap_u8() << 7;
        bytes
    }

    /// Decode a 32-byte encoding, recovering `u` from the curve equation.
    ///
    /// Variable-time: the square root branches on its input. Points are
    /// public data wherever this is used.
    pub fn from_bytes(bytes: &[u8; 32]) -> Result<Self, JubjubError> {
        let mut b = *bytes;
        let sign = Choice::from(b[31] >> 7);
        b[31] &= 0x7f;

        let v = BaseField::from_bytes(&b)?;

        // u^2 = (v^2 - 1) / (d * v^2 + 1). The denominator never vanishes
        // because d is not a square.
        let v2 = v.square();
        let u2 = (v2 - BaseField::ONE) * (EDWARDS_D * v2 + BaseField::ONE).invert_or_zero();
        let mut u = u2
            .sqrt_vartime()
            .map_err(|_| JubjubError::NotOnCurve)?;

        // zero has no negative, so a set sign bit cannot be honored
        if u.is_zero() && bool::from(sign) {
            return Err(JubjubError::NonCanonicalEncoding);
        }
        let flip = u.is_odd() ^ sign;
        u.conditional_negate(flip);

        Ok(AffinePoint { u, v })
    }

    /// Decode and additionally require the point to lie in the prime-order
    /// subgroup.
    pub fn from_bytes_prime_order(bytes: &[u8; 32]) -> Result<Self, JubjubError> {
        let point = Self::from_bytes(bytes)?;
        if !ExtendedPoint::from(point).is_prime_order_vartime() {
            return Err(JubjubError::NotInSubgroup);
        }
        Ok(point)
    }
}

impl Default for AffinePoint {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl ConstantTimeEq for AffinePoint {
    fn ct_eq(&self, other: &Self) -> Choice {
        self.u.ct_eq(&other.u) & self.v.ct_eq(&other.v)
    }
}

impl PartialEq for AffinePoint {
    fn eq(&self, other: &Self) -> bool {
        self.ct_eq(other).into()
    }
}

impl Eq for AffinePoint {}

impl ConditionallySelectable for AffinePoint {
    fn conditional_select(a: &Self, b: &Self, choice: Choice) -> Self {
        AffinePoint {
            u: BaseField::conditional_select(&a.u, &b.u, choice),
            v: BaseField::conditional_select(&a.v, &b.v, choice),
        }
    }
}

impl Neg for AffinePoint {
    type Output = Self;

    fn neg(self) -> Self {
        AffinePoint {
            u: -self.u,
            v: self.v,
        }
    }
}

impl Serialize for AffinePoint {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serialization::serialize_bytes32(&self.to_bytes(), serializer)
    }
}

impl<'de> Deserialize<'de> for AffinePoint {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let bytes = serialization::deserialize_bytes32(deserializer, "a curve point")?;
        AffinePoint::from_bytes(&bytes).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{RandomField, ScalarField};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn hex32(s: &str) -> [u8; 32] {
        let mut out = [0u8; 32];
        for (i, byte) in out.iter_mut().enumerate() {
            *byte = u8::from_str_radix(&s[2 * i..2 * i + 2], 16).expect("hex digit");
        }
        out
    }

    #[test]
    fn test_identity_on_curve() {
        let id = AffinePoint::identity();
        assert!(id.is_on_curve_vartime());
        assert!(bool::from(id.is_identity()));
    }

    #[test]
    fn test_generator_on_curve() {
        let g = AffinePoint::generator();
        assert!(g.is_on_curve_vartime(), "Generator point is not on the curve");
        assert!(!bool::from(g.is_identity()));
        assert!(bool::from(g.u().is_odd()));
    }

    #[test]
    fn test_generator_encoding() {
        let expected = hex32("cb550cd538ea0cc1138480408e6eaab9b36c613f0dd3f7784fdb6eea837b13d7");
        let g = AffinePoint::generator();
        assert_eq!(g.to_bytes(), expected);
        assert_eq!(AffinePoint::from_bytes(&expected), Ok(g));
    }

    #[test]
    fn test_identity_encoding() {
        let mut expected = [0u8; 32];
        expected[0] = 1;
        assert_eq!(AffinePoint::identity().to_bytes(), expected);
        assert_eq!(AffinePoint::from_bytes(&expected), Ok(AffinePoint::identity()));
    }

    #[test]
    fn test_bytes_roundtrip() {
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..10 {
            let k = ScalarField::random(&mut rng);
            let p = ExtendedPoint::mul_generator(&k).to_affine();
            let decoded = AffinePoint::from_bytes(&p.to_bytes()).expect("valid encoding");
            assert_eq!(decoded, p);
            assert!(decoded.is_on_curve_vartime());

            let n = -p;
            assert_eq!(AffinePoint::from_bytes(&n.to_bytes()), Ok(n));
        }
    }

    #[test]
    fn test_sign_bit_selects_negation() {
        let g = AffinePoint::generator();
        let mut bytes = g.to_bytes();
        bytes[31] ^= 0x80;
        assert_eq!(AffinePoint::from_bytes(&bytes), Ok(-g));
    }

    #[test]
    fn test_reject_non_canonical_v() {
        // v = q, which is not below the modulus
        let q = hex32("01000000fffffffffe5bfeff02a4bd5305d8a10908d83933487d9d2953a7ed73");
        assert_eq!(
            AffinePoint::from_bytes(&q),
            Err(JubjubError::NonCanonicalEncoding)
        );
    }

    #[test]
    fn test_reject_zero_u_with_sign() {
        let mut bytes = AffinePoint::identity().to_bytes();
        bytes[31] |= 0x80;
        assert_eq!(
            AffinePoint::from_bytes(&bytes),
            Err(JubjubError::NonCanonicalEncoding)
        );
    }

    #[test]
    fn test_reject_not_on_curve() {
        // walk v = 2, 3, ... until some v has no matching u
        let mut found = false;
        for n in 2..64u64 {
            let bytes = BaseField::from_u64(n).to_bytes();
            match AffinePoint::from_bytes(&bytes) {
                Ok(p) => assert!(p.is_on_curve_vartime()),
                Err(e) => {
                    assert_eq!(e, JubjubError::NotOnCurve);
                    found = true;
                }
            }
        }
        assert!(found);
    }

    #[test]
    fn test_prime_order_decoding() {
        let g = AffinePoint::generator();
        assert_eq!(AffinePoint::from_bytes_prime_order(&g.to_bytes()), Ok(g));

        // (0, -1) has order two
        let torsion = AffinePoint::from_raw_unchecked(BaseField::ZERO, -BaseField::ONE);
        assert!(torsion.is_on_curve_vartime());
        assert_eq!(
            AffinePoint::from_bytes_prime_order(&torsion.to_bytes()),
            Err(JubjubError::NotInSubgroup)
        );
        assert_eq!(
            AffinePoint::from_bytes_prime_order(&AffinePoint::identity().to_bytes()),
            Err(JubjubError::NotInSubgroup)
        );
    }

    #[test]
    fn test_negation() {
        let g = AffinePoint::generator();
        assert_eq!(-(-g), g);
        assert!((-g).is_on_curve_vartime());
        assert_eq!(-AffinePoint::identity(), AffinePoint::identity());
    }

    #[test]
    fn test_serde_roundtrip() {
        let g = AffinePoint::generator();
        let encoded = bincode::serialize(&g).expect("serialize");
        assert_eq!(encoded, g.to_bytes().to_vec());
        let decoded: AffinePoint = bincode::deserialize(&encoded).expect("deserialize");
        assert_eq!(decoded, g);
    }
}
