use crate::errors::ConfigError;
use serde::{
    Deserialize,
    Serialize,
};

/// Default speed of light in the detector medium [cm/ns].
pub const LIGHT_SPEED_IN_WATER: f32 = 21.5833;

/// Search settings for the capture-candidate scan.
///
/// Time widths are in nanoseconds, in the same scale as the hit times.
/// The start-time bounds are in microseconds since hit times are recorded
/// in global trigger time and the admissible region spans hundreds of us.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Width of the primary (cluster tightness) window [ns].
    pub primary_window: f32,
    /// Lower bound on the primary-window count for a hit to define a peak.
    pub min_primary_count: usize,
    /// Upper bound (inclusive) on the primary-window count.
    pub max_primary_count: usize,
    /// Width of the secondary (local activity) window [ns].
    pub wide_window: f32,
    /// A pending peak with a wide-window count at or above this is rejected.
    pub max_wide_count: usize,
    /// Minimum separation between accepted peaks [ns]. Peaks closer than
    /// this merge into one group.
    pub min_peak_separation: f32,
    /// Hits earlier than this are not admissible [us].
    pub start_time_floor: f32,
    /// Upper bound of the admissible start-time region [us].
    pub start_time_ceiling: f32,
    /// Speed of light in the medium [cm/ns], used for ToF subtraction.
    pub light_speed: f32,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            primary_window: 10.0,
            min_primary_count: 7,
            max_primary_count: 50,
            wide_window: 200.0,
            max_wide_count: 200,
            min_peak_separation: 50.0,
            start_time_floor: 5.0,
            start_time_ceiling: 535.0,
            light_speed: LIGHT_SPEED_IN_WATER,
        }
    }
}

impl SearchConfig {
    /// Checks the thresholds for consistency. Meant to be called once,
    /// before any event is processed.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.min_primary_count > self.max_primary_count {
            return Err(ConfigError::InvertedCountBounds {
                min: self.min_primary_count,
                max: self.max_primary_count,
            });
        }
        for (field, value) in [
            ("primary_window", self.primary_window),
            ("wide_window", self.wide_window),
            ("min_peak_separation", self.min_peak_separation),
        ] {
            if !(value > 0.0) {
                return Err(ConfigError::NonPositiveWindow { field, value });
            }
        }
        if self.start_time_floor > self.start_time_ceiling {
            return Err(ConfigError::InvertedTimeBounds {
                floor: self.start_time_floor,
                ceiling: self.start_time_ceiling,
            });
        }
        if !(self.light_speed > 0.0) {
            return Err(ConfigError::NonPositiveLightSpeed {
                value: self.light_speed,
            });
        }
        Ok(())
    }
}

/// Settings for the raw-hit accumulator.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AccumulatorConfig {
    /// Per-sensor dead time [us]. A hit on a sensor that already fired
    /// within this window is dropped.
    pub deadtime: f32,
    /// Tolerance [ns] for matching a hit against the truth series when
    /// tagging signal flags.
    pub signal_match_window: f32,
}

impl Default for AccumulatorConfig {
    fn default() -> Self {
        Self {
            deadtime: 6.0,
            signal_match_window: 1e-3,
        }
    }
}
