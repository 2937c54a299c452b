use super::config::RatingConfig;

/// Fraction of the population maximum this agent's won value represents.
/// Defined as 0 when the maximum itself is 0, so a population with no won
/// deals rates uniformly at the floor instead of dividing by zero.
pub(crate) fn value_ratio(total_won_value: f64, max_value: f64) -> f64 {
    if max_value <= 0.0 {
        0.0
    } else {
        total_won_value / max_value
    }
}

pub(crate) fn base_rating(value_ratio: f64, config: &RatingConfig) -> f64 {
    if value_ratio >= config.elite_value_ratio {
        5.0
    } else if value_ratio >= config.strong_value_ratio {
        4.0
    } else if value_ratio >= config.solid_value_ratio {
        3.0
    } else if value_ratio >= config.developing_value_ratio {
        2.0
    } else {
        1.0
    }
}

/// Tier boundaries are inclusive: exactly `high_volume_threshold` wins earns
/// the full bonus.
pub(crate) fn volume_bonus(won_count: u64, config: &RatingConfig) -> f64 {
    if won_count >= config.high_volume_threshold {
        config.high_volume_bonus
    } else if won_count >= config.steady_volume_threshold {
        config.steady_volume_bonus
    } else {
        0.0
    }
}

/// Rewards agents whose average deal value exceeds the population average by
/// the configured multiples. Comparisons are strict.
pub(crate) fn quality_bonus(avg_deal_value: f64, population_avg: f64, config: &RatingConfig) -> f64 {
    if avg_deal_value > population_avg * config.premium_quality_multiplier {
        config.premium_quality_bonus
    } else if avg_deal_value > population_avg * config.elevated_quality_multiplier {
        config.elevated_quality_bonus
    } else {
        0.0
    }
}

/// Declared contract: the final score is rounded to one decimal place even
/// though the additive steps land on quarter points.
pub(crate) fn round_to_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
