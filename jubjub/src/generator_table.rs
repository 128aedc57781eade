use std::sync::OnceLock;

use crate::extended::ExtendedPoint;
use crate::niels::AffineNielsPoint;
use crate::scalarfield::ScalarField;
use crate::window::LookupTable;

/// One 4-bit window per nibble of a 256-bit scalar.
const WINDOWS: usize = 64;

/// Table `i` holds `j * 16^i * G` for `j` in `0..16`.
pub(crate) type GeneratorTable = [LookupTable<AffineNielsPoint>; WINDOWS];

static GENERATOR_TABLE: OnceLock<Box<GeneratorTable>> = OnceLock::new();

fn build_table() -> Box<GeneratorTable> {
    let mut multiples = Vec::with_capacity(WINDOWS * 16);
    let mut base = ExtendedPoint::generator();
    for _ in 0..WINDOWS {
        let mut acc = ExtendedPoint::identity();
        for _ in 0..16 {
            multiples.push(acc);
            acc += base;
        }
        base = acc;
    }

    let affine = ExtendedPoint::batch_normalize(&multiples);
    let mut tables = Box::new([LookupTable([AffineNielsPoint::identity(); 16]); WINDOWS]);
    for (table, chunk) in tables.iter_mut().zip(affine.chunks_exact(16)) {
        for (entry, point) in table.0.iter_mut().zip(chunk) {
            *entry = point.to_niels();
        }
    }

    log::debug!(
        "built fixed-base generator table: {} windows of 16 points",
        WINDOWS
    );
    tables
}

pub(crate) fn generator_table() -> &'static GeneratorTable {
    GENERATOR_TABLE.get_or_init(build_table)
}

/// `scalar * G` with one mixed addition per nibble and no doublings.
pub fn mul_generator(scalar: &ScalarField) -> ExtendedPoint {
    let tables = generator_table();
    let bytes = scalar.to_bytes();
    let mut acc = ExtendedPoint::identity();
    for (i, table) in tables.iter().enumerate() {
        let nibble = (bytes[i / 2] >> (4 * (i % 2))) & 0x0f;
        acc += &table.select(nibble);
    }
    acc
}
