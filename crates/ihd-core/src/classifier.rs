//! Risk classifier: percentage → ordinal tier.
//!
//! Thresholds are half-open with an inclusive lower bound:
//!
//! | Percentage  | Tier      |
//! |-------------|-----------|
//! | `< 10`      | Low       |
//! | `[10, 20)`  | Moderate  |
//! | `[20, 30)`  | High      |
//! | `>= 30`     | Very High |
//!
//! The function is total. Values outside [0, 100] are not rejected: negative
//! input lands in `Low`, anything above 30 in `VeryHigh`, and `NaN` (which
//! has no magnitude to compare) in `Low`.

use ihd_contracts::risk::RiskTier;

/// Classify a risk percentage.
pub fn classify(percentage: f64) -> RiskTier {
    match percentage {
        p if p >= RiskTier::VeryHigh.lower_bound() => RiskTier::VeryHigh,
        p if p >= RiskTier::High.lower_bound() => RiskTier::High,
        p if p >= RiskTier::Moderate.lower_bound() => RiskTier::Moderate,
        _ => RiskTier::Low,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn boundaries_are_lower_inclusive() {
        assert_eq!(classify(9.99), RiskTier::Low);
        assert_eq!(classify(10.0), RiskTier::Moderate);
        assert_eq!(classify(19.99), RiskTier::Moderate);
        assert_eq!(classify(20.0), RiskTier::High);
        assert_eq!(classify(29.99), RiskTier::High);
        assert_eq!(classify(30.0), RiskTier::VeryHigh);
    }

    #[test]
    fn out_of_range_input_falls_to_nearest_tier() {
        assert_eq!(classify(-5.0), RiskTier::Low);
        assert_eq!(classify(0.0), RiskTier::Low);
        assert_eq!(classify(100.0), RiskTier::VeryHigh);
        assert_eq!(classify(1.0e9), RiskTier::VeryHigh);
        assert_eq!(classify(f64::INFINITY), RiskTier::VeryHigh);
        assert_eq!(classify(f64::NEG_INFINITY), RiskTier::Low);
        assert_eq!(classify(f64::NAN), RiskTier::Low);
    }

    #[test]
    fn classification_is_deterministic() {
        for p in [0.0, 9.5, 15.0, 25.0, 45.0] {
            assert_eq!(classify(p), classify(p));
        }
    }
}
