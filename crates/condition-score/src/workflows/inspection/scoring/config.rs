use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Pass/fail thresholds applied to a computed score.
///
/// Setting either deduction limit to `None` leaves only the shared score floor
/// (plus life-threatening findings) deciding the verdict.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringPolicy {
    pub minimum_passing_score: Decimal,
    pub interior_deduction_limit: Option<Decimal>,
    pub common_deduction_limit: Option<Decimal>,
    pub display_decimals: u32,
}

impl Default for ScoringPolicy {
    fn default() -> Self {
        Self {
            minimum_passing_score: Decimal::from(60),
            interior_deduction_limit: Some(Decimal::from(30)),
            common_deduction_limit: Some(Decimal::from(40)),
            display_decimals: 2,
        }
    }
}
