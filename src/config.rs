use crate::error::{BundleError, Result};

/// Tunable knobs for the bundle engine, validated once at construction.
///
/// Mirrors the teacher's validated-construction pattern (`TunerConfig` /
/// `KnobRanges`): invalid values are rejected here rather than deep inside a
/// solver.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    /// Percent of a prior CP solution's items that must differ in the next
    /// one. Range 1..=100.
    min_solution_diversity_percent: u32,
    /// Per-solve wall-clock cap for the CP/MILP solver, in milliseconds.
    max_time_per_solution_ms: u64,
    /// Gate for solver-internal `debug!`/`trace!` spans.
    enable_detailed_logging: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            min_solution_diversity_percent: 30,
            max_time_per_solution_ms: 300,
            enable_detailed_logging: false,
        }
    }
}

impl EngineConfig {
    pub fn new(
        min_solution_diversity_percent: u32,
        max_time_per_solution_ms: u64,
        enable_detailed_logging: bool,
    ) -> Result<Self> {
        if !(1..=100).contains(&min_solution_diversity_percent) {
            return Err(BundleError::InvalidConfig(format!(
                "minSolutionDiversityPercent must be 1..=100, got {}",
                min_solution_diversity_percent
            )));
        }

        if max_time_per_solution_ms == 0 {
            return Err(BundleError::InvalidConfig(
                "maxTimePerSolutionMs must be > 0".to_string(),
            ));
        }

        Ok(Self {
            min_solution_diversity_percent,
            max_time_per_solution_ms,
            enable_detailed_logging,
        })
    }

    #[inline]
    pub fn min_solution_diversity_percent(&self) -> u32 {
        self.min_solution_diversity_percent
    }

    #[inline]
    pub fn max_time_per_solution_ms(&self) -> u64 {
        self.max_time_per_solution_ms
    }

    #[inline]
    pub fn enable_detailed_logging(&self) -> bool {
        self.enable_detailed_logging
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let cfg = EngineConfig::default();
        assert_eq!(cfg.min_solution_diversity_percent(), 30);
        assert_eq!(cfg.max_time_per_solution_ms(), 300);
        assert!(!cfg.enable_detailed_logging());
    }

    #[test]
    fn rejects_out_of_range_diversity_percent() {
        assert!(EngineConfig::new(0, 300, false).is_err());
        assert!(EngineConfig::new(101, 300, false).is_err());
        assert!(EngineConfig::new(1, 300, false).is_ok());
        assert!(EngineConfig::new(100, 300, false).is_ok());
    }

    #[test]
    fn rejects_zero_time_cap() {
        assert!(EngineConfig::new(30, 0, false).is_err());
        assert!(EngineConfig::new(30, 1, false).is_ok());
    }
}
