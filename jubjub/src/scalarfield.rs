//! Scalar field of the prime-order subgroup. r = 0x0e7db4ea6533afa906673b0101343b00a6682093ccc81082d0970e5ed6f72cb7
//!
//! This implementation uses Montgomery form for efficient modular arithmetic.
//! The field element is represented as [u64; 4] in little-endian order.

use digest::consts::U64;
use digest::Digest;
use sha2::Sha512;

use crate::engine::MontgomeryParams;
use crate::field::{FieldParams, Fp};
use crate::group::ScalarBits;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct ScalarParams;

impl FieldParams for ScalarParams {
    const NAME: &'static str = "ScalarField";

    const PARAMS: MontgomeryParams = MontgomeryParams {
        modulus: [
            0xd0970e5ed6f72cb7,
            0xa6682093ccc81082,
            0x06673b0101343b00,
            0x0e7db4ea6533afa9,
        ],
        inv: 0x1ba3a358ef788ef9,
        r: [
            0x25f80bb3b99607d9,
            0xf315d62f66b6e750,
            0x932514eeeb8814f4,
            0x09a6fc6f479155c6,
        ],
        r2: [
            0x67719aa495e57731,
            0x51b0cef09ce3fc26,
            0x69dab7fac026e9a5,
            0x04f6547b8d127688,
        ],
        r3: [
            0xe0d6c6563d830544,
            0x323e3883598d0f85,
            0xf0fea3004c2e2ba8,
            0x05874f84946737ec,
        ],
    };
}

/// Scalar field element, the exponent type for point multiplication.
pub type ScalarField = Fp<ScalarParams>;

impl ScalarField {
    /// Hash `input` with `D` and reduce the 64-byte digest modulo `r`.
    pub fn hash_from_bytes<D>(input: &[u8]) -> Self
    where
        D: Digest<OutputSize = U64> + Default,
    {
        let mut hash = D::default();
        hash.update(input);
        let mut output = [0u8; 64];
        output.copy_from_slice(hash.finalize().as_slice());
        Self::from_bytes_wide(&output)
    }

    /// [`hash_from_bytes`](Self::hash_from_bytes) with SHA-512.
    pub fn hash_to_scalar(msg: &[u8]) -> Self {
        Self::hash_from_bytes::<Sha512>(msg)
    }
}

impl ScalarBits for ScalarField {
    #[inline]
    fn to_u64_limbs(&self) -> [u64; 4] {
        self.to_canonical_limbs()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arithmetic::sub_word;
    use crate::chain::AdditionChain;
    use crate::error::JubjubError;
    use crate::RandomField;
    use num_bigint::BigUint;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_modulus_value() {
        let expected = BigUint::parse_bytes(
            b"0e7db4ea6533afa906673b0101343b00a6682093ccc81082d0970e5ed6f72cb7",
            16,
        )
        .expect("valid hex");
        assert_eq!(ScalarField::modulus(), expected);
    }

    #[test]
    fn test_subtraction() {
        let a = ScalarField::from_u64(10);
        let b = ScalarField::from_u64(3);
        assert_eq!(a - b, ScalarField::from_u64(7));
        assert_eq!(b - a, -ScalarField::from_u64(7));
    }

    #[test]
    fn test_negation() {
        let a = ScalarField::from_u64(5);
        assert_eq!(a + (-a), ScalarField::ZERO);
        assert_eq!(-ScalarField::ZERO, ScalarField::ZERO);
    }

    #[test]
    fn test_inverse() {
        let a = ScalarField::from_u64(5);
        let a_inv = a.invert().expect("5 is invertible");
        assert_eq!(a * a_inv, ScalarField::ONE);
        assert_eq!(ScalarField::ZERO.invert(), Err(JubjubError::ZeroInversion));
    }

    #[test]
    fn test_inversion_chain_derived_from_r() {
        let exp = sub_word(&ScalarParams::PARAMS.modulus, 2);
        assert_eq!(exp[0], 0xd0970e5ed6f72cb5);
        assert_eq!(ScalarParams::INVERSION_CHAIN, AdditionChain::new(&exp));
    }

    #[test]
    fn test_inverse_random() {
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..20 {
            let a = ScalarField::random(&mut rng);
            assert_eq!(a * a.invert().expect("nonzero"), ScalarField::ONE);
        }
    }

    #[test]
    fn test_to_u64_limbs_is_canonical() {
        assert_eq!(ScalarField::from_u64(42).to_u64_limbs(), [42, 0, 0, 0]);
        let minus_one = -ScalarField::ONE;
        assert_eq!(
            minus_one.to_u64_limbs(),
            sub_word(&ScalarParams::PARAMS.modulus, 1)
        );
    }

    #[test]
    fn test_hash_to_scalar_deterministic() {
        let a = ScalarField::hash_to_scalar(b"jubjub");
        let b = ScalarField::hash_to_scalar(b"jubjub");
        let c = ScalarField::hash_to_scalar(b"jubjub!");
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(a, ScalarField::hash_from_bytes::<Sha512>(b"jubjub"));
    }

    #[test]
    fn test_hash_to_scalar_matches_wide_reduction() {
        let digest = Sha512::digest(b"scalar");
        let expected = BigUint::from_bytes_le(digest.as_slice()) % ScalarField::modulus();
        assert_eq!(ScalarField::hash_to_scalar(b"scalar").to_biguint(), expected);
    }
}
