use core::fmt;

/// Errors from the fallible arithmetic and decoding entry points.
///
/// Arithmetic on valid elements is total. Only inversion, square roots and
/// decoding of untrusted bytes can fail.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum JubjubError {
    /// Zero has no multiplicative inverse.
    ZeroInversion,

    /// The element is not a quadratic residue, so it has no square root.
    NonResidue,

    /// The 32 bytes do not hold a value below the modulus, or a point
    /// encoding sets the sign bit on a coordinate that is zero.
    NonCanonicalEncoding,

    /// No point on the curve has the encoded `v` coordinate.
    NotOnCurve,

    /// The point decoded correctly but lies outside the prime-order subgroup.
    NotInSubgroup,
}

impl fmt::Display for JubjubError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JubjubError::ZeroInversion => write!(f, "attempted to invert zero"),
            JubjubError::NonResidue => write!(f, "element is not a quadratic residue"),
            JubjubError::NonCanonicalEncoding => write!(f, "non-canonical encoding"),
            JubjubError::NotOnCurve => write!(f, "encoded point is not on the curve"),
            JubjubError::NotInSubgroup => write!(f, "point is not in the prime-order subgroup"),
        }
    }
}

impl std::error::Error for JubjubError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        assert_eq!(JubjubError::ZeroInversion.to_string(), "attempted to invert zero");
        assert_eq!(
            JubjubError::NotOnCurve.to_string(),
            "encoded point is not on the curve"
        );
    }

    #[test]
    fn test_boxed_error() {
        let err: Box<dyn std::error::Error> = Box::new(JubjubError::NonResidue);
        assert_eq!(err.to_string(), "element is not a quadratic residue");
    }
}
