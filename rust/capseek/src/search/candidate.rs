//! Building self-contained candidate records from accepted triggers.

use super::features::{
    FeatureVector,
    FeatureVectorBuilder,
};
use super::scanner::Trigger;
use super::{
    N1300_WINDOW,
    N200_WINDOW,
    N50_WINDOW,
};
use crate::config::SearchConfig;
use crate::errors::DataProcessingError;
use crate::models::{
    HitSeries,
    Point,
    SensorArray,
    SortedHitSeries,
    TankShape,
    Vertex,
};
use crate::utils::angles::{
    beta_coefficients,
    mean_direction,
    opening_angle_stats,
};
use crate::utils::math::{
    rms,
    skewness,
};
use crate::utils::window_stats::{
    charge_sum,
    count_in_window,
    time_spread,
    window_slice,
};
use serde::Serialize;

/// One nominated capture candidate.
///
/// Immutable once built. Owns deep copies of its window slices, so it
/// stays valid after the parent event's series is cleared or reused.
#[derive(Debug, Clone, Serialize)]
pub struct Candidate {
    /// Position of this candidate within its event's output, in time order.
    pub candidate_id: usize,
    /// Index of the trigger hit in the sorted corrected series.
    pub trigger_index: usize,
    /// The accepted primary-window count.
    pub primary_count: usize,
    /// Raw (pre-correction) times of the window hits, index-aligned with
    /// the other slices.
    pub raw_times: Vec<f32>,
    /// ToF-corrected times of the window hits.
    pub res_times: Vec<f32>,
    pub charges: Vec<f32>,
    pub sensor_ids: Vec<i32>,
    /// Signal flags for the window hits, when the event carried them.
    pub signal_flags: Option<Vec<u8>>,
    pub features: FeatureVector,
}

/// Builds one [`Candidate`] per trigger emitted by the scanner.
///
/// A trigger index outside the series or an empty primary-window slice is
/// a defect in the scanner's contract and comes back as an error rather
/// than a degenerate candidate.
pub fn build_candidate(
    candidate_id: usize,
    trigger: Trigger,
    sorted: &SortedHitSeries,
    raw: &HitSeries,
    vertex: Vertex,
    sensors: &SensorArray,
    tank: TankShape,
    config: &SearchConfig,
) -> Result<Candidate, DataProcessingError> {
    let idx = trigger.index;
    if idx >= sorted.len() {
        return Err(DataProcessingError::IndexOutOfBounds {
            index: idx,
            len: sorted.len(),
            context: "build_candidate trigger".to_string(),
        });
    }

    let res_times = window_slice(&sorted.times, idx, config.primary_window).to_vec();
    let n = res_times.len();
    if n == 0 {
        return Err(DataProcessingError::ExpectedNonEmptyData {
            context: Some("build_candidate primary window".to_string()),
        });
    }
    debug_assert_eq!(n, trigger.primary_count);

    // Map the window hits back to their raw-order positions to recover
    // the pre-correction times of the same physical hits.
    let raw_times: Vec<f32> = sorted.permutation.sorted_to_raw[idx..idx + n]
        .iter()
        .map(|&raw_idx| raw.times[raw_idx])
        .collect();

    let charges = sorted.charges[idx..idx + n].to_vec();
    let sensor_ids = sorted.sensor_ids[idx..idx + n].to_vec();
    let signal_flags = sorted
        .signal_flags
        .as_ref()
        .map(|flags| flags[idx..idx + n].to_vec());

    let features = extract_features(
        trigger, sorted, &res_times, &sensor_ids, vertex, sensors, tank, config,
    )?;

    Ok(Candidate {
        candidate_id,
        trigger_index: idx,
        primary_count: n,
        raw_times,
        res_times,
        charges,
        sensor_ids,
        signal_flags,
        features,
    })
}

#[allow(clippy::too_many_arguments)]
fn extract_features(
    trigger: Trigger,
    sorted: &SortedHitSeries,
    res_times: &[f32],
    sensor_ids: &[i32],
    vertex: Vertex,
    sensors: &SensorArray,
    tank: TankShape,
    config: &SearchConfig,
) -> Result<FeatureVector, DataProcessingError> {
    let idx = trigger.index;
    let times = &sorted.times;

    let counts = [
        res_times.len() as u32,
        count_in_window(times, idx, N50_WINDOW) as u32,
        count_in_window(times, idx, N200_WINDOW) as u32,
        count_in_window(times, idx, N1300_WINDOW) as u32,
    ];

    let qsum = charge_sum(times, &sorted.charges, idx, config.primary_window)?;

    let mut dirs: Vec<Point> = Vec::with_capacity(sensor_ids.len());
    for &id in sensor_ids {
        dirs.push(sensors.direction_from(vertex, id)?);
    }
    let betas = beta_coefficients(&dirs);
    let angle_stats = opening_angle_stats(&dirs);
    let mean_dir = mean_direction(&dirs);

    FeatureVectorBuilder::default()
        .with_counts(counts)
        .with_recon_ct(times[idx])
        .with_qsum(qsum)
        .with_time_shape(rms(res_times), time_spread(res_times), skewness(res_times))
        .with_betas(betas)
        .with_angle_stats(angle_stats.mean, angle_stats.stdev, angle_stats.skew)
        .with_walls(
            tank.distance_to_wall(vertex.as_point()),
            tank.distance_to_wall_along(vertex.as_point(), mean_dir),
        )
        .finalize()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::HitPermutation;

    fn fixture() -> (SortedHitSeries, HitSeries) {
        // Raw order [102, 100, 101, ...] so the permutation is not trivial.
        let raw = HitSeries::new(
            vec![102.0, 100.0, 101.0, 200.0, 201.0, 400.0],
            vec![4.0, 1.0, 2.0, 8.0, 16.0, 32.0],
            vec![3, 1, 2, 1, 2, 3],
            Some(vec![1, 1, 0, 0, 0, 0]),
        )
        .unwrap();
        let perm = HitPermutation::from_sorted_to_raw(vec![1, 2, 0, 3, 4, 5]);
        let sorted = SortedHitSeries {
            times: vec![100.0, 101.0, 102.0, 200.0, 201.0, 400.0],
            charges: vec![1.0, 2.0, 4.0, 8.0, 16.0, 32.0],
            sensor_ids: vec![1, 2, 3, 1, 2, 3],
            signal_flags: Some(vec![1, 0, 1, 0, 0, 0]),
            permutation: perm,
        };
        (sorted, raw)
    }

    fn fixture_geometry() -> (Vertex, SensorArray, TankShape) {
        (
            Vertex::new(0.0, 0.0, 0.0),
            SensorArray::new(vec![
                [1690.0, 0.0, 0.0],
                [0.0, 1690.0, 0.0],
                [0.0, 0.0, 1810.0],
            ]),
            TankShape::new(1690.0, 1810.0),
        )
    }

    fn test_config() -> SearchConfig {
        SearchConfig {
            min_primary_count: 2,
            start_time_floor: 0.0,
            ..Default::default()
        }
    }

    #[test]
    fn test_candidate_slices_are_aligned_copies() {
        let (sorted, raw) = fixture();
        let (vertex, sensors, tank) = fixture_geometry();
        let trigger = Trigger {
            index: 0,
            primary_count: 3,
        };
        let cand = build_candidate(
            0,
            trigger,
            &sorted,
            &raw,
            vertex,
            &sensors,
            tank,
            &test_config(),
        )
        .unwrap();

        assert_eq!(cand.res_times, vec![100.0, 101.0, 102.0]);
        // Raw times follow the permutation back to raw order.
        assert_eq!(cand.raw_times, vec![100.0, 101.0, 102.0]);
        assert_eq!(cand.charges, vec![1.0, 2.0, 4.0]);
        assert_eq!(cand.sensor_ids, vec![1, 2, 3]);
        assert_eq!(cand.signal_flags, Some(vec![1, 0, 1]));
    }

    #[test]
    fn test_feature_values() {
        let (sorted, raw) = fixture();
        let (vertex, sensors, tank) = fixture_geometry();
        let trigger = Trigger {
            index: 0,
            primary_count: 3,
        };
        let cand = build_candidate(
            0,
            trigger,
            &sorted,
            &raw,
            vertex,
            &sensors,
            tank,
            &test_config(),
        )
        .unwrap();
        let f = &cand.features;

        assert_eq!(f.n10, 3);
        assert_eq!(f.n50, 3);
        assert_eq!(f.n200, 5);
        assert_eq!(f.n1300, 6);
        assert_eq!(f.recon_ct, 100.0);
        assert_eq!(f.qsum, 7.0);
        assert_eq!(f.tspread, 2.0);
        // The three hit directions are mutually orthogonal.
        assert!((f.angle_mean - 90.0).abs() < 1e-3);
        assert_eq!(f.dwall, 1690.0);
        assert!(f.iter().all(|(_, v)| v.is_finite()));
    }

    #[test]
    fn test_out_of_bounds_trigger_is_an_error() {
        let (sorted, raw) = fixture();
        let (vertex, sensors, tank) = fixture_geometry();
        let trigger = Trigger {
            index: 99,
            primary_count: 1,
        };
        let err = build_candidate(
            0,
            trigger,
            &sorted,
            &raw,
            vertex,
            &sensors,
            tank,
            &test_config(),
        );
        assert!(matches!(
            err,
            Err(DataProcessingError::IndexOutOfBounds { index: 99, .. })
        ));
    }

    #[test]
    fn test_minimum_size_candidate_is_fully_populated() {
        let (vertex, sensors, tank) = fixture_geometry();
        let sorted = SortedHitSeries {
            times: vec![100.0],
            charges: vec![2.5],
            sensor_ids: vec![1],
            signal_flags: None,
            permutation: HitPermutation::identity(1),
        };
        let raw = HitSeries::new(vec![100.0], vec![2.5], vec![1], None).unwrap();
        let trigger = Trigger {
            index: 0,
            primary_count: 1,
        };
        let cand = build_candidate(
            0,
            trigger,
            &sorted,
            &raw,
            vertex,
            &sensors,
            tank,
            &test_config(),
        )
        .unwrap();

        // Single-hit cluster: every statistic degrades to its sentinel
        // but the vector is complete and finite.
        assert_eq!(cand.features.n10, 1);
        assert_eq!(cand.features.trms, 0.0);
        assert_eq!(cand.features.beta1, 0.0);
        assert_eq!(cand.features.angle_mean, 0.0);
        assert!(cand.features.iter().all(|(_, v)| v.is_finite()));
    }
}
