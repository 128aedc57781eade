//! Prime-order group arithmetic on the Jubjub twisted Edwards curve.
//!
//! This crate provides the two 256-bit prime fields (the base field holding
//! coordinates and the scalar field of the prime-order subgroup), affine and
//! extended curve points with the complete addition law, constant-time scalar
//! multiplication, deterministic hashing to points and scalars, and the
//! 32-byte encodings. The curve is `-u^2 + v^2 = 1 + d * u^2 * v^2` with
//! `d = -(10240/10241)` over the base field.
//!
//! Operations that branch on their inputs carry a `_vartime` suffix and must
//! only see public data. Hash-to-point and point decoding are variable-time
//! as well.

mod affine;
mod arithmetic;
mod basefield;
mod chain;
mod engine;
mod error;
mod extended;
mod field;
mod generator_table;
mod group;
mod hash;
mod msm;
mod niels;
mod random;
mod scalarfield;
mod serialization;
mod window;

pub use affine::AffinePoint;
pub use arithmetic::{adc, mac, sbb};
pub use basefield::{BaseField, BaseParams, EDWARDS_D, EDWARDS_D2, ROOT_OF_UNITY, S};
pub use chain::{AdditionChain, ChainStep};
pub use engine::MontgomeryParams;
pub use error::JubjubError;
pub use extended::ExtendedPoint;
pub use field::{FieldParams, Fp};
pub use generator_table::mul_generator;
pub use group::{Group, ScalarBits};
pub use msm::double_scalar_mul_basepoint_vartime;
pub use niels::{AffineNielsPoint, ExtendedNielsPoint};
pub use random::RandomField;
pub use scalarfield::{ScalarField, ScalarParams};
pub use window::LookupTable;
