use ndarray::Array1;

/// Round `x` to the nearest integer and clamp it to `[0, max]`.
///
/// Overshooting velocities saturate at the bounds; they never wrap around.
/// NaN maps to 0.
pub fn clamp_position(x: f64, max: f64) -> f64 {
    if x.is_nan() {
        return 0.0;
    }
    x.round().clamp(0.0, max)
}

pub(crate) fn apply_clamp(x: &mut Array1<f64>, upper: &Array1<f64>) {
    for i in 0..x.len() {
        x[i] = clamp_position(x[i], upper[i]);
    }
}
