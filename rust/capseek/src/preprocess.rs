//! Raw hit accumulation ahead of the search.
//!
//! Incoming hits arrive per sensor in arbitrary order. The accumulator
//! applies the per-sensor dead time veto, optionally tags each kept hit
//! against a truth series, and hands back one [`HitSeries`] per event.

use crate::config::AccumulatorConfig;
use crate::models::HitSeries;
use crate::search::NS_TO_US;
use std::collections::HashMap;
use tracing::debug;

/// Counters reported after an event is accumulated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AccumulatorStats {
    pub num_kept: usize,
    pub num_vetoed: usize,
    pub num_signal: usize,
}

/// Collects one event's raw hits, applying the dead time veto as they
/// arrive.
///
/// The veto is keyed on the last accepted time per sensor, so a sensor
/// that has not fired yet always accepts its first hit.
#[derive(Debug)]
pub struct HitAccumulator {
    config: AccumulatorConfig,
    times: Vec<f32>,
    charges: Vec<f32>,
    sensor_ids: Vec<i32>,
    last_hit_on_sensor: HashMap<i32, f32>,
    num_vetoed: usize,
}

impl HitAccumulator {
    pub fn new(config: AccumulatorConfig) -> Self {
        Self {
            config,
            times: Vec::new(),
            charges: Vec::new(),
            sensor_ids: Vec::new(),
            last_hit_on_sensor: HashMap::new(),
            num_vetoed: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.times.len()
    }

    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    /// Offers one hit to the accumulator. Returns whether it was kept.
    pub fn add_hit(&mut self, time: f32, charge: f32, sensor_id: i32) -> bool {
        let deadtime_ns = self.config.deadtime / NS_TO_US;
        if let Some(&last) = self.last_hit_on_sensor.get(&sensor_id) {
            if (time - last).abs() < deadtime_ns {
                self.num_vetoed += 1;
                return false;
            }
        }
        self.last_hit_on_sensor.insert(sensor_id, time);
        self.times.push(time);
        self.charges.push(charge);
        self.sensor_ids.push(sensor_id);
        true
    }

    /// Consumes the accumulator, producing the event series without
    /// signal flags.
    pub fn into_series(self) -> (HitSeries, AccumulatorStats) {
        let stats = AccumulatorStats {
            num_kept: self.times.len(),
            num_vetoed: self.num_vetoed,
            num_signal: 0,
        };
        debug!(
            num_kept = stats.num_kept,
            num_vetoed = stats.num_vetoed,
            "accumulated event"
        );
        let series = HitSeries {
            times: self.times,
            charges: self.charges,
            sensor_ids: self.sensor_ids,
            signal_flags: None,
        };
        (series, stats)
    }

    /// Consumes the accumulator, tagging each kept hit against the given
    /// truth series. A hit is flagged as signal when the truth series
    /// contains a hit with the same sensor id whose time agrees within the
    /// configured tolerance.
    pub fn into_tagged_series(self, truth: &HitSeries) -> (HitSeries, AccumulatorStats) {
        let tolerance = self.config.signal_match_window;
        let flags: Vec<u8> = self
            .times
            .iter()
            .zip(self.sensor_ids.iter())
            .map(|(&t, &id)| {
                let matched = truth
                    .times
                    .iter()
                    .zip(truth.sensor_ids.iter())
                    .any(|(&tt, &tid)| tid == id && (tt - t).abs() < tolerance);
                matched as u8
            })
            .collect();
        let num_signal = flags.iter().filter(|&&f| f == 1).count();
        let stats = AccumulatorStats {
            num_kept: self.times.len(),
            num_vetoed: self.num_vetoed,
            num_signal,
        };
        debug!(
            num_kept = stats.num_kept,
            num_vetoed = stats.num_vetoed,
            num_signal = stats.num_signal,
            "accumulated event with truth tags"
        );
        let series = HitSeries {
            times: self.times,
            charges: self.charges,
            sensor_ids: self.sensor_ids,
            signal_flags: Some(flags),
        };
        (series, stats)
    }
}
