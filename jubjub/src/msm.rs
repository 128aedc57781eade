use crate::extended::ExtendedPoint;
use crate::generator_table::generator_table;
use crate::niels::ExtendedNielsPoint;
use crate::scalarfield::ScalarField;
use crate::window::LookupTable;

/// Compute `a * G + b * P`, sharing the doublings between both products.
///
/// Skips zero windows and indexes the tables directly, so the running time
/// depends on both scalars. Meant for verification equations where all
/// inputs are public.
pub fn double_scalar_mul_basepoint_vartime(
    a: &ScalarField,
    b: &ScalarField,
    point: &ExtendedPoint,
) -> ExtendedPoint {
    let base_table = &generator_table()[0];
    let point_table = LookupTable::<ExtendedNielsPoint>::from(point);

    let a_bytes = a.to_bytes();
    let b_bytes = b.to_bytes();
    let mut result = ExtendedPoint::identity();

    for (a_byte, b_byte) in a_bytes.iter().zip(b_bytes.iter()).rev() {
        for shift in [4, 0] {
            result = result.double().double().double().double();

            let a_window = (a_byte >> shift) & 0x0f;
            if a_window != 0 {
                result += &base_table.get_vartime(a_window);
            }

            let b_window = (b_byte >> shift) & 0x0f;
            if b_window != 0 {
                result += &point_table.get_vartime(b_window);
            }
        }
    }

    result
}
