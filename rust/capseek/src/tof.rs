//! Time-of-flight subtraction and the corrected-time sort.
//!
//! Subtracting the light travel time from the assumed vertex to each hit
//! sensor aligns causally related hits in time, which is what makes the
//! narrow-window counting in the scanner meaningful.

use crate::errors::DataProcessingError;
use crate::models::{
    distance,
    HitPermutation,
    HitSeries,
    SensorArray,
    SortedHitSeries,
    Vertex,
};

/// Light travel time [ns] from the vertex to the sensor with the given
/// 1-based id.
pub fn time_of_flight(
    vertex: Vertex,
    sensors: &SensorArray,
    sensor_id: i32,
    light_speed: f32,
) -> Result<f32, DataProcessingError> {
    let pos = sensors.position(sensor_id)?;
    Ok(distance(vertex.as_point(), pos) / light_speed)
}

/// ToF-subtracted copies of the raw hit times, in raw order.
pub fn correct(
    raw: &HitSeries,
    vertex: Vertex,
    sensors: &SensorArray,
    light_speed: f32,
) -> Result<Vec<f32>, DataProcessingError> {
    if raw.times.len() != raw.sensor_ids.len() {
        return Err(DataProcessingError::ExpectedSlicesSameLength {
            expected: raw.times.len(),
            other: raw.sensor_ids.len(),
            context: "tof::correct".to_string(),
        });
    }
    let mut corrected = Vec::with_capacity(raw.len());
    for (&t, &id) in raw.times.iter().zip(raw.sensor_ids.iter()) {
        corrected.push(t - time_of_flight(vertex, sensors, id, light_speed)?);
    }
    Ok(corrected)
}

/// Subtracts ToF from every raw hit and, if `sort` is set, stably
/// re-orders the corrected series ascending by time.
///
/// The returned series carries the permutation pair mapping sorted
/// positions back to raw indices (and its inverse), so callers can always
/// recover raw-order alignment explicitly. With `sort` unset the
/// permutation is the identity.
pub fn correct_and_sort(
    raw: &HitSeries,
    vertex: Vertex,
    sensors: &SensorArray,
    light_speed: f32,
    sort: bool,
) -> Result<SortedHitSeries, DataProcessingError> {
    let corrected = correct(raw, vertex, sensors, light_speed)?;

    if !sort {
        return Ok(SortedHitSeries {
            times: corrected,
            charges: raw.charges.clone(),
            sensor_ids: raw.sensor_ids.clone(),
            signal_flags: raw.signal_flags.clone(),
            permutation: HitPermutation::identity(raw.len()),
        });
    }

    let mut order: Vec<usize> = (0..corrected.len()).collect();
    // Stable, so equal corrected times keep their raw order.
    order.sort_by(|&a, &b| {
        corrected[a]
            .partial_cmp(&corrected[b])
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let times: Vec<f32> = order.iter().map(|&i| corrected[i]).collect();
    let charges: Vec<f32> = order.iter().map(|&i| raw.charges[i]).collect();
    let sensor_ids: Vec<i32> = order.iter().map(|&i| raw.sensor_ids[i]).collect();
    let signal_flags = raw
        .signal_flags
        .as_ref()
        .map(|flags| order.iter().map(|&i| flags[i]).collect());

    Ok(SortedHitSeries {
        times,
        charges,
        sensor_ids,
        signal_flags,
        permutation: HitPermutation::from_sorted_to_raw(order),
    })
}
