use crate::core::data::complex_point::ComplexPoint;

/// Counts how many steps of `z <- z² + c`, starting from `z0`, stay below `threshold`.
///
/// The count is taken before each step: a start point already at or beyond the threshold
/// returns 0, an orbit that never escapes returns `max_iterations`. `threshold` is compared
/// against the squared modulus.
#[must_use]
pub fn escape_iterations(
    z0: ComplexPoint,
    c: ComplexPoint,
    max_iterations: u32,
    threshold: f64,
) -> u32 {
    let mut z = z0;

    for iteration in 0..max_iterations {
        if z.norm_sqr() >= threshold {
            return iteration;
        }
        z = z * z + c;
    }

    max_iterations
}
