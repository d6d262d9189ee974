/// Converts a series impedance `Z = r + jx` to admittance `Y = g + jb`.
///
/// Returns `(g, b)`. Fails if the impedance is zero.
pub fn z2y(r: f64, x: f64) -> Result<(f64, f64), String> {
    let z2 = r * r + x * x;
    if z2 == 0.0 {
        return Err("zero impedance".to_string());
    }
    Ok((r / z2, -x / z2))
}

#[cfg(test)]
mod tests {
    use super::z2y;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_z2y_simple() {
        assert_eq!(z2y(0.0, 1.0), Ok((0.0, -1.0)));
    }

    #[test]
    fn test_z2y_normal() {
        let (g, b) = z2y(0.02, 0.2).unwrap();
        assert_abs_diff_eq!(g, 0.495049504950495, epsilon = 1e-12);
        assert_abs_diff_eq!(b, -4.9504950495049505, epsilon = 1e-12);
    }

    #[test]
    fn test_z2y_zero() {
        assert!(z2y(0.0, 0.0).is_err());
    }
}
