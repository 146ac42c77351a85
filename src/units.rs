//! Angular rate conversions between the TLE convention (revolutions per day
//! and its derivatives) and the SGP4 one (radians per minute).

use crate::constants::{MINUTES_PER_DAY, RADIANS_PER_REVOLUTION};

/// rev/day -> rad/min
pub fn rev_per_day_to_rad_per_min(rev_per_day: f64) -> f64 {
    rev_per_day * RADIANS_PER_REVOLUTION / MINUTES_PER_DAY
}

/// rev/day² -> rad/min²
pub fn rev_per_day2_to_rad_per_min2(rev_per_day2: f64) -> f64 {
    rev_per_day2 * RADIANS_PER_REVOLUTION / MINUTES_PER_DAY.powi(2)
}

/// rev/day³ -> rad/min³
pub fn rev_per_day3_to_rad_per_min3(rev_per_day3: f64) -> f64 {
    rev_per_day3 * RADIANS_PER_REVOLUTION / MINUTES_PER_DAY.powi(3)
}

/// rad/min -> rev/day
pub fn rad_per_min_to_rev_per_day(rad_per_min: f64) -> f64 {
    rad_per_min * MINUTES_PER_DAY / RADIANS_PER_REVOLUTION
}

/// rad/min² -> rev/day²
pub fn rad_per_min2_to_rev_per_day2(rad_per_min2: f64) -> f64 {
    rad_per_min2 * MINUTES_PER_DAY.powi(2) / RADIANS_PER_REVOLUTION
}

/// rad/min³ -> rev/day³
pub fn rad_per_min3_to_rev_per_day3(rad_per_min3: f64) -> f64 {
    rad_per_min3 * MINUTES_PER_DAY.powi(3) / RADIANS_PER_REVOLUTION
}
