use serde::{Deserialize, Serialize};

/// Thresholds and bonus weights for the rating rubric.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RatingConfig {
    /// value_ratio thresholds for base ratings 5, 4, 3, and 2; anything
    /// below `developing_value_ratio` earns the floor rating of 1.
    pub elite_value_ratio: f64,
    pub strong_value_ratio: f64,
    pub solid_value_ratio: f64,
    pub developing_value_ratio: f64,
    /// Won-deal counts that unlock the volume bonuses (inclusive).
    pub high_volume_threshold: u64,
    pub steady_volume_threshold: u64,
    pub high_volume_bonus: f64,
    pub steady_volume_bonus: f64,
    /// Multiples of the population average deal value that unlock the
    /// quality bonuses (strict comparisons).
    pub premium_quality_multiplier: f64,
    pub elevated_quality_multiplier: f64,
    pub premium_quality_bonus: f64,
    pub elevated_quality_bonus: f64,
    pub rating_ceiling: f64,
}

impl Default for RatingConfig {
    fn default() -> Self {
        Self {
            elite_value_ratio: 0.9,
            strong_value_ratio: 0.7,
            solid_value_ratio: 0.5,
            developing_value_ratio: 0.3,
            high_volume_threshold: 10,
            steady_volume_threshold: 5,
            high_volume_bonus: 0.5,
            steady_volume_bonus: 0.25,
            premium_quality_multiplier: 1.5,
            elevated_quality_multiplier: 1.2,
            premium_quality_bonus: 0.5,
            elevated_quality_bonus: 0.25,
            rating_ceiling: 5.0,
        }
    }
}
