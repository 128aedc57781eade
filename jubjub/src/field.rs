//! Prime field elements in Montgomery form, generic over the modulus.
//!
//! [`Fp<P>`] is the one element type behind both [`BaseField`](crate::BaseField)
//! and [`ScalarField`](crate::ScalarField). The modulus and its Montgomery
//! constants come from the [`FieldParams`] descriptor `P`; the arithmetic is
//! delegated to [`MontgomeryParams`].
//!
//! The element is represented as `[u64; 4]` in little-endian order holding
//! `a * R mod m` with `R = 2^256`, always fully reduced.

use core::cmp::Ordering;
use core::fmt::{self, Debug, Display, Formatter};
use core::hash::{Hash, Hasher};
use core::iter::{Product, Sum};
use core::marker::PhantomData;
use core::ops::{Add, AddAssign, Mul, MulAssign, Neg, Sub, SubAssign};

use num_bigint::BigUint;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use subtle::{Choice, ConditionallySelectable, ConstantTimeEq};

use crate::chain::{AdditionChain, TABLE_SIZE};
use crate::engine::MontgomeryParams;
use crate::error::JubjubError;
use crate::serialization;

/// Compile-time description of one prime field.
pub trait FieldParams:
    'static + Copy + Clone + Debug + Default + PartialEq + Eq + Hash + Send + Sync
{
    /// Name used by the `Debug` output.
    const NAME: &'static str;

    const PARAMS: MontgomeryParams;

    /// Exponentiation schedule for `a^(m-2)`, derived from this modulus.
    const INVERSION_CHAIN: AdditionChain = AdditionChain::inversion(&Self::PARAMS.modulus);
}

/// An element of the prime field described by `P`.
#[derive(Copy, Clone, Default)]
pub struct Fp<P: FieldParams> {
    /// Montgomery form: value * R mod m
    limbs: [u64; 4],
    _params: PhantomData<P>,
}

pub(crate) fn limbs_from_le_bytes(bytes: &[u8; 32]) -> [u64; 4] {
    let mut limbs = [0u64; 4];
    for (limb, chunk) in limbs.iter_mut().zip(bytes.chunks_exact(8)) {
        let mut word = [0u8; 8];
        word.copy_from_slice(chunk);
        *limb = u64::from_le_bytes(word);
    }
    limbs
}

pub(crate) fn limbs_to_le_bytes(limbs: &[u64; 4]) -> [u8; 32] {
    let mut bytes = [0u8; 32];
    for (chunk, limb) in bytes.chunks_exact_mut(8).zip(limbs.iter()) {
        chunk.copy_from_slice(&limb.to_le_bytes());
    }
    bytes
}

impl<P: FieldParams> Fp<P> {
    pub const ZERO: Self = Self::from_montgomery([0, 0, 0, 0]);

    /// One, stored as `R mod m`.
    pub const ONE: Self = Self::from_montgomery(P::PARAMS.r);

    #[inline]
    pub(crate) const fn from_montgomery(limbs: [u64; 4]) -> Self {
        Fp {
            limbs,
            _params: PhantomData,
        }
    }

    /// Build an element from little-endian canonical limbs. Values at or above
    /// the modulus are reduced.
    #[inline]
    pub const fn from_raw(limbs: [u64; 4]) -> Self {
        Self::from_montgomery(P::PARAMS.to_montgomery(&limbs))
    }

    #[inline]
    pub const fn from_u64(val: u64) -> Self {
        Self::from_raw([val, 0, 0, 0])
    }

    /// The canonical integer in `[0, m)` as little-endian limbs.
    #[inline]
    pub const fn to_canonical_limbs(&self) -> [u64; 4] {
        P::PARAMS.to_canonical(&self.limbs)
    }

    /// Decode 32 little-endian bytes, rejecting values `>= m`.
    pub fn from_bytes(bytes: &[u8; 32]) -> Result<Self, JubjubError> {
        let limbs = limbs_from_le_bytes(bytes);
        if !P::PARAMS.is_canonical(&limbs) {
            return Err(JubjubError::NonCanonicalEncoding);
        }
        Ok(Self::from_raw(limbs))
    }

    /// Canonical 32-byte little-endian encoding.
    pub fn to_bytes(&self) -> [u8; 32] {
        limbs_to_le_bytes(&self.to_canonical_limbs())
    }

    /// Reduce 64 little-endian bytes modulo `m`. Suitable for turning hash
    /// output or random bytes into a nearly uniform element.
    pub fn from_bytes_wide(bytes: &[u8; 64]) -> Self {
        let mut lo = [0u8; 32];
        let mut hi = [0u8; 32];
        lo.copy_from_slice(&bytes[..32]);
        hi.copy_from_slice(&bytes[32..]);
        Self::from_montgomery(
            P::PARAMS.reduce_wide(&limbs_from_le_bytes(&lo), &limbs_from_le_bytes(&hi)),
        )
    }

    #[inline]
    pub const fn square(&self) -> Self {
        Self::from_montgomery(P::PARAMS.square(&self.limbs))
    }

    #[inline]
    pub const fn double(&self) -> Self {
        Self::from_montgomery(P::PARAMS.double(&self.limbs))
    }

    #[inline]
    pub fn is_zero(&self) -> bool {
        self.ct_eq(&Self::ZERO).into()
    }

    /// Parity of the canonical value.
    #[inline]
    pub fn is_odd(&self) -> Choice {
        Choice::from((self.to_canonical_limbs()[0] & 1) as u8)
    }

    /// `self^exp` by left-to-right square-and-multiply. Branches on the bits of
    /// `exp`, so `exp` must be public.
    pub fn pow_vartime(&self, exp: &[u64; 4]) -> Self {
        let mut res = Self::ONE;
        for limb in exp.iter().rev() {
            for i in (0..64).rev() {
                res = res.square();
                if (limb >> i) & 1 == 1 {
                    res *= *self;
                }
            }
        }
        res
    }

    /// `self^e` for the exponent the chain was derived from. The sequence of
    /// operations depends only on the chain.
    pub fn pow_chain(&self, chain: &AdditionChain) -> Self {
        let mut table = [Self::ONE; TABLE_SIZE];
        table[1] = *self;
        for i in 2..TABLE_SIZE {
            table[i] = table[i - 1] * *self;
        }

        let mut acc = table[chain.first() as usize];
        for step in chain.steps() {
            for _ in 0..step.squarings {
                acc = acc.square();
            }
            acc *= table[step.multiplier as usize];
        }
        for _ in 0..chain.trailing_squarings() {
            acc = acc.square();
        }
        acc
    }

    /// Multiplicative inverse. The whole exponentiation always runs; zero is
    /// rejected only afterwards.
    pub fn invert(&self) -> Result<Self, JubjubError> {
        let inv = self.invert_or_zero();
        if self.is_zero() {
            return Err(JubjubError::ZeroInversion);
        }
        Ok(inv)
    }

    /// Inverse, mapping zero to zero.
    #[inline]
    pub(crate) fn invert_or_zero(&self) -> Self {
        self.pow_chain(&P::INVERSION_CHAIN)
    }

    /// Invert every nonzero element in place with a single field inversion.
    /// Zero entries are left as zero.
    pub fn batch_invert(elements: &mut [Self]) {
        let mut acc = Self::ONE;
        let mut prefix = Vec::with_capacity(elements.len());
        for e in elements.iter() {
            prefix.push(acc);
            let skip = e.ct_eq(&Self::ZERO);
            acc = Self::conditional_select(&(acc * *e), &acc, skip);
        }

        acc = acc.invert_or_zero();

        for (e, before) in elements.iter_mut().zip(prefix).rev() {
            let skip = e.ct_eq(&Self::ZERO);
            let inv = acc * before;
            acc = Self::conditional_select(&(acc * *e), &acc, skip);
            *e = Self::conditional_select(&inv, &Self::ZERO, skip);
        }
    }

    pub fn to_biguint(&self) -> BigUint {
        BigUint::from_bytes_le(&self.to_bytes())
    }

    pub fn modulus() -> BigUint {
        BigUint::from_bytes_le(&limbs_to_le_bytes(&P::PARAMS.modulus))
    }
}

impl<P: FieldParams> ConstantTimeEq for Fp<P> {
    fn ct_eq(&self, other: &Self) -> Choice {
        self.limbs[0].ct_eq(&other.limbs[0])
            & self.limbs[1].ct_eq(&other.limbs[1])
            & self.limbs[2].ct_eq(&other.limbs[2])
            & self.limbs[3].ct_eq(&other.limbs[3])
    }
}

impl<P: FieldParams> ConditionallySelectable for Fp<P> {
    fn conditional_select(a: &Self, b: &Self, choice: Choice) -> Self {
        Self::from_montgomery([
            u64::conditional_select(&a.limbs[0], &b.limbs[0], choice),
            u64::conditional_select(&a.limbs[1], &b.limbs[1], choice),
            u64::conditional_select(&a.limbs[2], &b.limbs[2], choice),
            u64::conditional_select(&a.limbs[3], &b.limbs[3], choice),
        ])
    }
}

impl<P: FieldParams> PartialEq for Fp<P> {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.ct_eq(other).into()
    }
}

impl<P: FieldParams> Eq for Fp<P> {}

impl<P: FieldParams> Hash for Fp<P> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.limbs.hash(state);
    }
}

// Ordered by canonical value, not by Montgomery limbs.
impl<P: FieldParams> Ord for Fp<P> {
    fn cmp(&self, other: &Self) -> Ordering {
        let a = self.to_canonical_limbs();
        let b = other.to_canonical_limbs();
        a.iter().rev().cmp(b.iter().rev())
    }
}

impl<P: FieldParams> PartialOrd for Fp<P> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<P: FieldParams> From<u64> for Fp<P> {
    fn from(val: u64) -> Self {
        Self::from_u64(val)
    }
}

// Arithmetic operations
impl<P: FieldParams> Add for Fp<P> {
    type Output = Self;

    #[inline]
    fn add(self, rhs: Self) -> Self {
        Self::from_montgomery(P::PARAMS.add(&self.limbs, &rhs.limbs))
    }
}

impl<P: FieldParams> AddAssign for Fp<P> {
    #[inline]
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl<P: FieldParams> Sub for Fp<P> {
    type Output = Self;

    #[inline]
    fn sub(self, rhs: Self) -> Self {
        Self::from_montgomery(P::PARAMS.sub(&self.limbs, &rhs.limbs))
    }
}

impl<P: FieldParams> SubAssign for Fp<P> {
    #[inline]
    fn sub_assign(&mut self, rhs: Self) {
        *self = *self - rhs;
    }
}

impl<P: FieldParams> Neg for Fp<P> {
    type Output = Self;

    #[inline]
    fn neg(self) -> Self {
        Self::from_montgomery(P::PARAMS.neg(&self.limbs))
    }
}

impl<P: FieldParams> Neg for &Fp<P> {
    type Output = Fp<P>;

    #[inline]
    fn neg(self) -> Fp<P> {
        -*self
    }
}

impl<P: FieldParams> Mul for Fp<P> {
    type Output = Self;

    #[inline]
    fn mul(self, rhs: Self) -> Self {
        Self::from_montgomery(P::PARAMS.mul(&self.limbs, &rhs.limbs))
    }
}

impl<P: FieldParams> MulAssign for Fp<P> {
    #[inline]
    fn mul_assign(&mut self, rhs: Self) {
        *self = *self * rhs;
    }
}

impl<P: FieldParams> Sum for Fp<P> {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, |acc, x| acc + x)
    }
}

impl<P: FieldParams> Product for Fp<P> {
    fn product<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ONE, |acc, x| acc * x)
    }
}

// Display and Debug
impl<P: FieldParams> Display for Fp<P> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let canonical = self.to_canonical_limbs();
        write!(
            f,
            "0x{:016x}{:016x}{:016x}{:016x}",
            canonical[3], canonical[2], canonical[1], canonical[0]
        )
    }
}

impl<P: FieldParams> Debug for Fp<P> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", P::NAME, self)
    }
}

impl<P: FieldParams> Serialize for Fp<P> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serialization::serialize_bytes32(&self.to_bytes(), serializer)
    }
}

impl<'de, P: FieldParams> Deserialize<'de> for Fp<P> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let bytes = serialization::deserialize_bytes32(deserializer, "a canonical field element")?;
        Fp::from_bytes(&bytes).map_err(serde::de::Error::custom)
    }
}
