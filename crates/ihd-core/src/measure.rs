//! Derived measurements.

/// Round to two decimal places.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Body mass index from weight (kg) and height (cm), rounded to 2 decimals.
///
/// Returns `None` unless both inputs are positive. BMI is never accepted as
/// independent input; it is re-derived whenever weight or height change.
pub fn derive_bmi(weight_kg: f64, height_cm: f64) -> Option<f64> {
    if !(weight_kg > 0.0 && height_cm > 0.0) {
        return None;
    }
    let height_m = height_cm / 100.0;
    let bmi = weight_kg / (height_m * height_m);
    bmi.is_finite().then(|| round2(bmi))
}
