//! Scoring module - line clear rewards, level progression and gravity curves
//!
//! Line clears pay a table value that grows super-linearly with the number of
//! rows (a four-row clear pays far more than four singles) multiplied by
//! `level + 1`. Drops pay a flat amount per row, independent of level.
//!
//! Level is derived from cumulative lines and never decreases; the gravity
//! interval is a non-increasing function of level.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::types::{DROP_INTERVALS, HARD_DROP_POINTS, LINES_PER_LEVEL, LINE_SCORES, SOFT_DROP_POINTS};

/// Level at which the computed curves stop getting faster
pub const MAX_CURVE_LEVEL: u32 = 30;

/// NES frames-per-row by level, 60 frames per second
const CLASSIC_FRAMES: [u32; 30] = [
    48, 43, 38, 33, 28, 23, 18, 13, 8, 6, 5, 5, 5, 4, 4, 4, 3, 3, 3, 2, 2, 2, 2, 2, 2, 2, 2, 2, 2, 1,
];

/// Point values for clears and drops
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringRules {
    /// Base points for clearing 0..=4 rows at once
    pub line_scores: [u32; 5],
    pub soft_drop_points: u32,
    pub hard_drop_points: u32,
    /// Cumulative lines needed per level step
    pub lines_per_level: u32,
}

impl Default for ScoringRules {
    fn default() -> Self {
        Self {
            line_scores: LINE_SCORES,
            soft_drop_points: SOFT_DROP_POINTS,
            hard_drop_points: HARD_DROP_POINTS,
            lines_per_level: LINES_PER_LEVEL,
        }
    }
}

impl ScoringRules {
    /// Calculate line clear score
    /// lines: number of lines cleared (1-4)
    /// level: current level (0-based)
    pub fn line_clear_points(&self, lines: usize, level: u32) -> u32 {
        if lines == 0 || lines >= self.line_scores.len() {
            return 0;
        }
        self.line_scores[lines].saturating_mul(level.saturating_add(1))
    }

    /// Points for dropping `rows` rows
    pub fn drop_points(&self, rows: u32, hard: bool) -> u32 {
        let per_row = if hard {
            self.hard_drop_points
        } else {
            self.soft_drop_points
        };
        rows.saturating_mul(per_row)
    }

    /// Level after `total_lines` cumulative lines, never below `current`
    pub fn level_for(&self, current: u32, start_level: u32, total_lines: u32) -> u32 {
        let earned = total_lines / self.lines_per_level.max(1);
        current.max(start_level.saturating_add(earned))
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.lines_per_level == 0 {
            return Err(ConfigError::LinesPerLevel);
        }
        // Multi-line clears must always beat the same number of singles
        let singles = self.line_scores[1];
        if singles == 0
            || (2..self.line_scores.len())
                .any(|k| self.line_scores[k] <= singles.saturating_mul(k as u32))
        {
            return Err(ConfigError::LineScores);
        }
        Ok(())
    }
}

/// Gravity interval as a function of level
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GravityCurve {
    /// Milliseconds per row indexed by level; the last entry repeats
    Table(Vec<u32>),
    /// NES frame counts converted to milliseconds
    Classic,
    /// Guideline formula `(0.8 - (level - 1) * 0.007) ^ (level - 1)` seconds
    Modern,
}

impl Default for GravityCurve {
    fn default() -> Self {
        GravityCurve::Table(DROP_INTERVALS.to_vec())
    }
}

impl GravityCurve {
    /// Parse `classic`, `modern` or a comma-separated millisecond table
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "classic" => Some(GravityCurve::Classic),
            "modern" => Some(GravityCurve::Modern),
            other => {
                let table: Option<Vec<u32>> = other
                    .split(',')
                    .map(|part| part.trim().parse().ok())
                    .collect();
                table.filter(|t| !t.is_empty()).map(GravityCurve::Table)
            }
        }
    }

    /// Get drop interval for a level (in milliseconds)
    pub fn interval_ms(&self, level: u32) -> u32 {
        match self {
            GravityCurve::Table(table) => {
                let idx = (level as usize).min(table.len().saturating_sub(1));
                table.get(idx).copied().unwrap_or(DROP_INTERVALS[0])
            }
            GravityCurve::Classic => {
                let idx = (level as usize).min(CLASSIC_FRAMES.len() - 1);
                (CLASSIC_FRAMES[idx] * 1000 / 60).max(1)
            }
            GravityCurve::Modern => {
                let level = level.min(MAX_CURVE_LEVEL);
                if level == 0 {
                    return 1000;
                }
                let n = (level - 1) as i32;
                let seconds = (0.8 - f64::from(level - 1) * 0.007).powi(n);
                ((seconds * 1000.0).round() as u32).max(1)
            }
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let GravityCurve::Table(table) = self else {
            return Ok(());
        };
        if table.is_empty() {
            return Err(ConfigError::EmptyGravityTable);
        }
        let mut prev = u32::MAX;
        for (index, &value) in table.iter().enumerate() {
            if value == 0 || value > prev {
                return Err(ConfigError::GravityTableOrder { index, value });
            }
            prev = value;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classic_line_scores() {
        let rules = ScoringRules::default();
        // Level 0
        assert_eq!(rules.line_clear_points(1, 0), 40);
        assert_eq!(rules.line_clear_points(2, 0), 100);
        assert_eq!(rules.line_clear_points(3, 0), 300);
        assert_eq!(rules.line_clear_points(4, 0), 1200);

        // Level 5
        assert_eq!(rules.line_clear_points(1, 5), 40 * 6);
        assert_eq!(rules.line_clear_points(4, 5), 1200 * 6);

        assert_eq!(rules.line_clear_points(0, 3), 0);
        assert_eq!(rules.line_clear_points(5, 3), 0);
    }

    #[test]
    fn test_drop_scores() {
        let rules = ScoringRules::default();
        assert_eq!(rules.drop_points(10, false), 10); // Soft drop 10 cells
        assert_eq!(rules.drop_points(10, true), 20); // Hard drop 10 cells
    }

    #[test]
    fn test_level_calculation() {
        let rules = ScoringRules::default();
        assert_eq!(rules.level_for(0, 0, 0), 0);
        assert_eq!(rules.level_for(0, 0, 9), 0);
        assert_eq!(rules.level_for(0, 0, 10), 1);
        assert_eq!(rules.level_for(1, 0, 29), 2);
        assert_eq!(rules.level_for(0, 5, 12), 6);
        // Never below the current level
        assert_eq!(rules.level_for(7, 0, 12), 7);
    }

    #[test]
    fn test_rules_validation() {
        assert!(ScoringRules::default().validate().is_ok());

        let flat = ScoringRules {
            line_scores: [0, 100, 200, 300, 400],
            ..ScoringRules::default()
        };
        assert_eq!(flat.validate(), Err(ConfigError::LineScores));

        let no_levels = ScoringRules {
            lines_per_level: 0,
            ..ScoringRules::default()
        };
        assert_eq!(no_levels.validate(), Err(ConfigError::LinesPerLevel));
    }

    #[test]
    fn test_drop_intervals() {
        let curve = GravityCurve::default();
        assert_eq!(curve.interval_ms(0), 1000);
        assert_eq!(curve.interval_ms(8), 160);
        assert_eq!(curve.interval_ms(9), 120);
        assert_eq!(curve.interval_ms(20), 120); // Floor at 120
    }

    #[test]
    fn test_curves_never_speed_down() {
        for curve in [GravityCurve::default(), GravityCurve::Classic, GravityCurve::Modern] {
            let mut prev = u32::MAX;
            for level in 0..40 {
                let interval = curve.interval_ms(level);
                assert!(interval >= 1);
                assert!(interval <= prev, "{curve:?} level {level}");
                prev = interval;
            }
        }
    }

    #[test]
    fn test_classic_and_modern_values() {
        assert_eq!(GravityCurve::Classic.interval_ms(0), 800);
        assert_eq!(GravityCurve::Classic.interval_ms(29), 16);
        assert_eq!(GravityCurve::Modern.interval_ms(1), 1000);
        assert_eq!(GravityCurve::Modern.interval_ms(2), 793);
        assert_eq!(GravityCurve::Modern.interval_ms(100), GravityCurve::Modern.interval_ms(30));
    }

    #[test]
    fn test_table_validation() {
        assert_eq!(
            GravityCurve::Table(vec![]).validate(),
            Err(ConfigError::EmptyGravityTable)
        );
        assert_eq!(
            GravityCurve::Table(vec![500, 600]).validate(),
            Err(ConfigError::GravityTableOrder { index: 1, value: 600 })
        );
        assert_eq!(
            GravityCurve::Table(vec![500, 0]).validate(),
            Err(ConfigError::GravityTableOrder { index: 1, value: 0 })
        );
        assert!(GravityCurve::Table(vec![500, 500, 100]).validate().is_ok());
    }

    #[test]
    fn test_parse_curve() {
        assert_eq!(GravityCurve::from_str("Classic"), Some(GravityCurve::Classic));
        assert_eq!(
            GravityCurve::from_str("900, 700,500"),
            Some(GravityCurve::Table(vec![900, 700, 500]))
        );
        assert_eq!(GravityCurve::from_str("fast"), None);
    }
}
