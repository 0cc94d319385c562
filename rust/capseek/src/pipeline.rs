//! Per-event orchestration: correct, sort, scan, extract.

use crate::config::SearchConfig;
use crate::errors::{
    CapseekError,
    Result,
};
use crate::models::{
    HitSeries,
    SensorArray,
    TankShape,
    Vertex,
};
use crate::search::{
    build_candidate,
    scan,
    Candidate,
};
use crate::tof::correct_and_sort;
use rayon::prelude::*;
use serde::Serialize;
use tracing::{
    debug,
    warn,
};

/// Event-level summary alongside the candidate list.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct EventSummary {
    pub num_hits: usize,
    pub num_candidates: usize,
    /// Corrected time [ns] of the earliest admissible hit.
    pub first_hit_time: Option<f32>,
    /// Largest wide-window count seen in the scan, and where.
    pub max_wide_count: usize,
    pub max_wide_time: Option<f32>,
}

/// Everything the search produces for one event.
#[derive(Debug, Clone, Serialize)]
pub struct EventReport {
    pub candidates: Vec<Candidate>,
    pub summary: EventSummary,
}

/// The full search over single events or batches.
///
/// Holds the detector geometry and the search settings; both are fixed at
/// construction so batch processing can share them across threads.
#[derive(Debug, Clone)]
pub struct EventProcessor {
    sensors: SensorArray,
    tank: TankShape,
    config: SearchConfig,
}

impl EventProcessor {
    pub fn new(sensors: SensorArray, tank: TankShape, config: SearchConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            sensors,
            tank,
            config,
        })
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Runs the search on one event.
    ///
    /// Candidates come back ordered by corrected trigger time, each with
    /// its feature vector fully populated.
    pub fn process_event(&self, vertex: Vertex, raw: &HitSeries) -> Result<EventReport> {
        let sorted = correct_and_sort(raw, vertex, &self.sensors, self.config.light_speed, true)?;
        let scan_output = scan(&sorted, &self.config)?;

        let mut candidates = Vec::with_capacity(scan_output.triggers.len());
        for (candidate_id, &trigger) in scan_output.triggers.iter().enumerate() {
            let candidate = build_candidate(
                candidate_id,
                trigger,
                &sorted,
                raw,
                vertex,
                &self.sensors,
                self.tank,
                &self.config,
            )?;
            candidates.push(candidate);
        }

        let summary = EventSummary {
            num_hits: raw.len(),
            num_candidates: candidates.len(),
            first_hit_time: scan_output.first_hit_time,
            max_wide_count: scan_output.max_wide_count,
            max_wide_time: scan_output.max_wide_time,
        };
        debug!(
            num_hits = summary.num_hits,
            num_candidates = summary.num_candidates,
            "processed event"
        );
        Ok(EventReport {
            candidates,
            summary,
        })
    }

    /// Runs the search over a batch of events in parallel.
    ///
    /// Events are independent, so the batch maps one task per event. A
    /// failing event is logged and reported in place as its error; it does
    /// not abort the rest of the batch.
    pub fn process_events(
        &self,
        events: &[(Vertex, HitSeries)],
    ) -> Vec<std::result::Result<EventReport, CapseekError>> {
        events
            .par_iter()
            .enumerate()
            .map(|(event_idx, (vertex, raw))| {
                self.process_event(*vertex, raw).map_err(|e| {
                    warn!(event_idx, error = ?e, "event failed");
                    e
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LIGHT_SPEED_IN_WATER;

    fn processor(min_primary_count: usize) -> EventProcessor {
        // Every sensor at the vertex: the ToF term vanishes and corrected
        // times equal raw times.
        let sensors = SensorArray::uniform(16, [0.0, 0.0, 0.0]);
        let tank = TankShape::new(1690.0, 1810.0);
        let config = SearchConfig {
            min_primary_count,
            start_time_floor: 0.0,
            light_speed: LIGHT_SPEED_IN_WATER,
            ..Default::default()
        };
        EventProcessor::new(sensors, tank, config).unwrap()
    }

    fn burst_event() -> (Vertex, HitSeries) {
        let times = vec![100.0, 101.0, 102.0, 200.0, 201.0, 400.0];
        let n = times.len();
        (
            Vertex::new(0.0, 0.0, 0.0),
            HitSeries::new(times, vec![1.0; n], vec![1, 2, 3, 4, 5, 6], None).unwrap(),
        )
    }

    #[test]
    fn test_invalid_config_rejected_at_construction() {
        let sensors = SensorArray::uniform(4, [0.0, 0.0, 0.0]);
        let tank = TankShape::new(1690.0, 1810.0);
        let config = SearchConfig {
            min_primary_count: 9,
            max_primary_count: 3,
            ..Default::default()
        };
        assert!(EventProcessor::new(sensors, tank, config).is_err());
    }

    #[test]
    fn test_process_event_finds_both_groups() {
        let processor = processor(2);
        let (vertex, raw) = burst_event();
        let report = processor.process_event(vertex, &raw).unwrap();

        assert_eq!(report.summary.num_candidates, 2);
        assert_eq!(report.candidates[0].trigger_index, 0);
        assert_eq!(report.candidates[0].primary_count, 3);
        assert_eq!(report.candidates[1].trigger_index, 3);
        assert_eq!(report.candidates[1].primary_count, 2);
        assert_eq!(report.summary.first_hit_time, Some(100.0));
        assert_eq!(report.summary.num_hits, 6);
    }

    #[test]
    fn test_quiet_event_yields_empty_report() {
        let processor = processor(7);
        let (vertex, raw) = burst_event();
        let report = processor.process_event(vertex, &raw).unwrap();
        assert!(report.candidates.is_empty());
        assert_eq!(report.summary.num_candidates, 0);
    }

    #[test]
    fn test_batch_matches_sequential() {
        let processor = processor(2);
        let events: Vec<_> = (0..8).map(|_| burst_event()).collect();
        let reports = processor.process_events(&events);

        assert_eq!(reports.len(), 8);
        for report in reports {
            let report = report.unwrap();
            assert_eq!(report.summary.num_candidates, 2);
        }
    }

    #[test]
    fn test_batch_reports_per_event_errors() {
        let processor = processor(2);
        let good = burst_event();
        // Sensor id 99 does not exist in the 16-sensor array.
        let bad = (
            Vertex::new(0.0, 0.0, 0.0),
            HitSeries::new(vec![100.0], vec![1.0], vec![99], None).unwrap(),
        );
        let reports = processor.process_events(&[good, bad]);
        assert!(reports[0].is_ok());
        assert!(reports[1].is_err());
    }
}
