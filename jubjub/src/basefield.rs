//! Base field of the curve. q = 0x73eda753299d7d483339d80809a1d80553bda402fffe5bfeffffffff00000001
//!
//! Point coordinates live here. Besides the generic field operations this
//! module provides the curve constants and a Tonelli–Shanks square root, which
//! point decompression and hash-to-point rely on.

use crate::chain::AdditionChain;
use crate::engine::MontgomeryParams;
use crate::error::JubjubError;
use crate::field::{FieldParams, Fp};

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct BaseParams;

impl FieldParams for BaseParams {
    const NAME: &'static str = "BaseField";

    const PARAMS: MontgomeryParams = MontgomeryParams {
        modulus: [
            0xffffffff00000001,
            0x53bda402fffe5bfe,
            0x3339d80809a1d805,
            0x73eda753299d7d48,
        ],
        inv: 0xfffffffeffffffff,
        r: [
            0x00000001fffffffe,
            0x5884b7fa00034802,
            0x998c4fefecbc4ff5,
            0x1824b159acc5056f,
        ],
        r2: [
            0xc999e990f3f29c6d,
            0x2b6cedcb87925c23,
            0x05d314967254398f,
            0x0748d9d99f59ff11,
        ],
        r3: [
            0xc62c1807439b73af,
            0x1b3e0d188cf06990,
            0x73d13c71c7b5f418,
            0x6e2a5bb9c8db33e9,
        ],
    };
}

/// Element of the base field `F_q`.
pub type BaseField = Fp<BaseParams>;

/// `d = -(10240/10241)`, the twisted Edwards coefficient. Not a square in `F_q`.
pub const EDWARDS_D: BaseField = BaseField::from_montgomery([
    0x2a522455b974f6b0,
    0xfc6cc9ef0d9acab3,
    0x7a08fb94c27628d1,
    0x57f8f6a8fe0e262e,
]);

/// `2d`
pub const EDWARDS_D2: BaseField = BaseField::from_montgomery([
    0x54a448ac72e9ed5f,
    0xa51befdb1b373967,
    0xc0d81f217b4a799e,
    0x3c0445fed27ecf14,
]);

/// `q - 1 = t * 2^S` with `t` odd.
pub const S: u32 = 32;

/// `7^t`, a primitive `2^S`-th root of unity.
pub const ROOT_OF_UNITY: BaseField = BaseField::from_montgomery([
    0xb9b58d8c5f0e466a,
    0x5b1b4c801819d7ec,
    0x0af53ae352a31e64,
    0x5bf3adda19e9b27b,
]);

// (q - 1) / 2
const LEGENDRE_CHAIN: AdditionChain = AdditionChain::new(&[
    0x7fffffff80000000,
    0xa9ded2017fff2dff,
    0x199cec0404d0ec02,
    0x39f6d3a994cebea4,
]);

// t
const T_CHAIN: AdditionChain = AdditionChain::new(&[
    0xfffe5bfeffffffff,
    0x09a1d80553bda402,
    0x299d7d483339d808,
    0x0000000073eda753,
]);

// (t + 1) / 2
const T_PLUS_ONE_HALF_CHAIN: AdditionChain = AdditionChain::new(&[
    0x7fff2dff80000000,
    0x04d0ec02a9ded201,
    0x94cebea4199cec04,
    0x0000000039f6d3a9,
]);

impl BaseField {
    /// Legendre symbol `self^((q-1)/2)`: `1` for a nonzero square, `-1` for a
    /// non-residue, `0` for zero.
    pub fn legendre_symbol_vartime(&self) -> i8 {
        let s = self.pow_chain(&LEGENDRE_CHAIN);
        if s.is_zero() {
            0
        } else if s == Self::ONE {
            1
        } else {
            -1
        }
    }

    /// Square root by Tonelli–Shanks. Variable-time; use only on public values.
    ///
    /// Returns zero for zero and [`JubjubError::NonResidue`] when no root exists.
    /// Which of the two roots is returned is unspecified.
    pub fn sqrt_vartime(&self) -> Result<Self, JubjubError> {
        match self.legendre_symbol_vartime() {
            0 => return Ok(Self::ZERO),
            -1 => return Err(JubjubError::NonResidue),
            _ => {}
        }

        let mut r = self.pow_chain(&T_PLUS_ONE_HALF_CHAIN);
        let mut t = self.pow_chain(&T_CHAIN);
        let mut c = ROOT_OF_UNITY;
        let mut m = S;

        // invariant: r^2 = self * t, and t has order dividing 2^(m-1)
        while t != Self::ONE {
            let mut i = 1;
            let mut t2i = t.square();
            while t2i != Self::ONE {
                t2i = t2i.square();
                i += 1;
            }

            for _ in 0..(m - i - 1) {
                c = c.square();
            }
            r *= c;
            c = c.square();
            t *= c;
            m = i;
        }

        Ok(r)
    }
}
