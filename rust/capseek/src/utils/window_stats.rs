//! Window statistics over an ascending-sorted time series.
//!
//! These are the pure counting/summing primitives the scanner and the
//! feature extractor call in their inner loops. All of them require the
//! time slice to be sorted ascending; the behavior on an unsorted slice
//! is undefined (the scanner checks that precondition once per event).

use crate::errors::DataProcessingError;

/// Number of hits within `width` ns starting from `start_index`.
///
/// Counts elements j >= start_index with `times[j] - times[start_index] <
/// width`. Returns 0 if `start_index` is out of range.
pub fn count_in_window(times: &[f32], start_index: usize, width: f32) -> usize {
    if start_index >= times.len() {
        return 0;
    }
    let t0 = times[start_index];
    let mut count = 0;
    for &t in &times[start_index..] {
        if t - t0 >= width {
            break;
        }
        count += 1;
    }
    count
}

/// Number of hits within the half-open window `[center - width/2,
/// center + width/2)`.
pub fn count_centered(times: &[f32], center: f32, width: f32) -> usize {
    let lo = center - width / 2.0;
    let hi = center + width / 2.0;
    times.iter().filter(|&&t| t >= lo && t < hi).count()
}

/// Summed charge of the hits counted by [`count_in_window`].
pub fn charge_sum(
    times: &[f32],
    charges: &[f32],
    start_index: usize,
    width: f32,
) -> Result<f32, DataProcessingError> {
    if times.len() != charges.len() {
        return Err(DataProcessingError::ExpectedSlicesSameLength {
            expected: times.len(),
            other: charges.len(),
            context: "charge_sum".to_string(),
        });
    }
    if start_index >= times.len() {
        return Ok(0.0);
    }
    let n = count_in_window(times, start_index, width);
    Ok(charges[start_index..start_index + n].iter().sum())
}

/// The sub-slice of `times` spanning the window counted by
/// [`count_in_window`]. Empty if `start_index` is out of range.
pub fn window_slice(times: &[f32], start_index: usize, width: f32) -> &[f32] {
    if start_index >= times.len() {
        return &[];
    }
    let n = count_in_window(times, start_index, width);
    &times[start_index..start_index + n]
}

/// Max - min of a sorted, non-empty slice; 0.0 otherwise.
pub fn time_spread(sorted_times: &[f32]) -> f32 {
    match (sorted_times.first(), sorted_times.last()) {
        (Some(first), Some(last)) => last - first,
        _ => 0.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TIMES: [f32; 6] = [100.0, 101.0, 102.0, 200.0, 201.0, 400.0];

    #[test]
    fn test_count_in_window() {
        assert_eq!(count_in_window(&TIMES, 0, 10.0), 3);
        assert_eq!(count_in_window(&TIMES, 3, 10.0), 2);
        assert_eq!(count_in_window(&TIMES, 5, 10.0), 1);
        assert_eq!(count_in_window(&TIMES, 6, 10.0), 0);
    }

    #[test]
    fn test_count_in_window_boundary_is_exclusive() {
        // A hit exactly `width` away from the start is outside.
        let times = [0.0, 10.0, 20.0];
        assert_eq!(count_in_window(&times, 0, 10.0), 1);
        assert_eq!(count_in_window(&times, 0, 10.1), 2);
    }

    #[test]
    fn test_count_may_grow_with_start_index() {
        // The count is anchored at the start hit, so a later index can
        // see more: an isolated hit followed by a burst.
        let times = [0.0, 100.0, 101.0, 102.0];
        assert_eq!(count_in_window(&times, 0, 10.0), 1);
        assert_eq!(count_in_window(&times, 1, 10.0), 3);
    }

    #[test]
    fn test_count_monotone_in_width() {
        let mut prev = 0;
        for w in [1.0, 5.0, 50.0, 150.0, 500.0] {
            let n = count_in_window(&TIMES, 0, w);
            assert!(n >= prev);
            prev = n;
        }
    }

    #[test]
    fn test_count_centered_half_open() {
        // Window [95, 105): takes 100, 101, 102.
        assert_eq!(count_centered(&TIMES, 100.0, 10.0), 3);
        // Window [195, 205): takes 200, 201.
        assert_eq!(count_centered(&TIMES, 200.0, 10.0), 2);
        // Upper edge exclusive, lower edge inclusive.
        let times = [0.0, 5.0];
        assert_eq!(count_centered(&times, 2.5, 5.0), 1);
        assert_eq!(count_centered(&times, 0.0, 0.0), 0);
    }

    #[test]
    fn test_charge_sum() {
        let charges = [1.0, 2.0, 4.0, 8.0, 16.0, 32.0];
        assert_eq!(charge_sum(&TIMES, &charges, 0, 10.0).unwrap(), 7.0);
        assert_eq!(charge_sum(&TIMES, &charges, 3, 10.0).unwrap(), 24.0);
    }

    #[test]
    fn test_charge_sum_length_mismatch() {
        assert!(charge_sum(&TIMES, &[1.0], 0, 10.0).is_err());
    }

    #[test]
    fn test_window_slice() {
        assert_eq!(window_slice(&TIMES, 0, 10.0), &[100.0, 101.0, 102.0]);
        assert_eq!(window_slice(&TIMES, 6, 10.0), &[] as &[f32]);
    }

    #[test]
    fn test_out_of_range_start_index_past_len() {
        // Indices beyond the slice length, not just at it, stay in the
        // membership-test contract: empty window, zero sum, zero count.
        assert_eq!(count_in_window(&TIMES, 9, 10.0), 0);
        assert_eq!(window_slice(&TIMES, 9, 10.0), &[] as &[f32]);
        let charges = [1.0; 6];
        assert_eq!(charge_sum(&TIMES, &charges, 9, 10.0).unwrap(), 0.0);
    }

    #[test]
    fn test_time_spread() {
        assert_eq!(time_spread(&[100.0, 101.0, 102.0]), 2.0);
        assert_eq!(time_spread(&[5.0]), 0.0);
        assert_eq!(time_spread(&[]), 0.0);
    }
}
