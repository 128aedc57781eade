use rand::distr::{Distribution, StandardUniform};
use rand::Rng;

use crate::field::{FieldParams, Fp};

/// Helper trait for sampling random field elements.
pub trait RandomField: Sized {
    fn random<R: Rng + ?Sized>(rng: &mut R) -> Self;
}

// 64 bytes per sample, so the bias of the reduction is negligible.
impl<P: FieldParams> Distribution<Fp<P>> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Fp<P> {
        let lo: [u8; 32] = rng.random();
        let hi: [u8; 32] = rng.random();
        let mut wide = [0u8; 64];
        wide[..32].copy_from_slice(&lo);
        wide[32..].copy_from_slice(&hi);
        Fp::from_bytes_wide(&wide)
    }
}

impl<P: FieldParams> RandomField for Fp<P> {
    #[inline]
    fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        StandardUniform.sample(rng)
    }
}
