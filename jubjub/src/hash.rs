//! Deterministic hashing of byte strings onto the curve.
//!
//! Try-and-increment: reduce the digest to a candidate `v`, solve the curve
//! equation for `u^2`, and bump `v` by one until a square root exists. About
//! half of all candidates succeed, so the expected number of attempts is two.
//! The attempt count leaks through timing, which is acceptable only because
//! the inputs are public.

use digest::consts::U64;
use digest::Digest;
use sha2::Sha512;
use subtle::{Choice, ConditionallyNegatable};

use crate::affine::AffinePoint;
use crate::basefield::{BaseField, EDWARDS_D};
use crate::extended::ExtendedPoint;

impl ExtendedPoint {
    /// Map a 64-byte digest to a curve point. Variable-time.
    ///
    /// `v` starts at the wide reduction of the digest. The parity of `u` is
    /// taken from bit 255 of the digest, the same position the point
    /// encoding uses for the sign of `u`.
    ///
    /// The result is on the curve but not necessarily in the prime-order
    /// subgroup; see [`hash_to_subgroup`](Self::hash_to_subgroup).
    pub fn hash_from_digest(digest: &[u8; 64]) -> Self {
        let sign = Choice::from(digest[31] >> 7);
        let mut v = BaseField::from_bytes_wide(digest);
        let mut attempts = 1u32;

        loop {
            let v2 = v.square();
            let numerator = v2 - BaseField::ONE;
            let candidate = (EDWARDS_D * v2 + BaseField::ONE)
                .invert()
                .and_then(|den_inv| (numerator * den_inv).sqrt_vartime());

            match candidate {
                Ok(mut u) => {
                    let flip = u.is_odd() ^ sign;
                    u.conditional_negate(flip);
                    if attempts > 1 {
                        log::debug!("hash to point succeeded after {} attempts", attempts);
                    }
                    return ExtendedPoint::from(AffinePoint::from_raw_unchecked(u, v));
                }
                Err(err) => {
                    log::trace!("hash to point attempt {} rejected: {}", attempts, err);
                    v += BaseField::ONE;
                    attempts += 1;
                }
            }
        }
    }

    /// Hash `input` with `D` and map the digest to a curve point.
    pub fn hash_from_bytes<D>(input: &[u8]) -> Self
    where
        D: Digest<OutputSize = U64> + Default,
    {
        let mut hash = D::default();
        hash.update(input);
        let mut output = [0u8; 64];
        output.copy_from_slice(hash.finalize().as_slice());
        Self::hash_from_digest(&output)
    }

    /// [`hash_from_bytes`](Self::hash_from_bytes) with SHA-512.
    pub fn hash_to_point(msg: &[u8]) -> Self {
        Self::hash_from_bytes::<Sha512>(msg)
    }

    /// Hash to the prime-order subgroup by clearing the cofactor.
    pub fn hash_to_subgroup(msg: &[u8]) -> Self {
        Self::hash_to_point(msg).mul_by_cofactor()
    }
}
