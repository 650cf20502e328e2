//! Experience level curve.
//!
//! Levels follow geometric growth: completing level `n` costs
//! `floor(100 * 1.058^(n-1))` XP, so each level is ~5.8% harder than the
//! one before. The curve is pure arithmetic; level state itself lives in
//! the profile and is advanced only by the XP ledger.

use serde::{Deserialize, Serialize};

/// XP required to complete the given level (advance to `level + 1`).
///
/// `level` is always >= 1 by construction in the profile.
pub fn xp_for_level(level: u32) -> i64 {
    let exponent = level.saturating_sub(1) as i32;
    (100.0 * 1.058f64.powi(exponent)).floor() as i64
}

/// Lifetime XP needed to reach `level` from a fresh profile.
///
/// Sum of every threshold below `level`; level 1 costs nothing to reach.
pub fn cumulative_xp_for_level(level: u32) -> i64 {
    (1..level).map(xp_for_level).sum()
}

/// Derived level/progress view of a profile's raw XP counters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelInfo {
    pub level: u32,
    pub current_xp: i64,
    pub total_xp: i64,
    /// XP required to complete the current level.
    pub xp_needed: i64,
    /// 0.0 ..= 100.0 progress within the current level.
    pub progress_percent: f64,
}

/// Build the derived view for a profile's stored counters.
pub fn level_info(level: u32, current_xp: i64, total_xp: i64) -> LevelInfo {
    let xp_needed = xp_for_level(level);
    let progress_percent = if xp_needed > 0 {
        (current_xp as f64 / xp_needed as f64 * 100.0).min(100.0)
    } else {
        0.0
    };
    LevelInfo {
        level,
        current_xp,
        total_xp,
        xp_needed,
        progress_percent,
    }
}
