use crate::errors::DataProcessingError;
use serde::Serialize;

/// Index-aligned columns describing the recorded hits of one event.
///
/// `times[i]`, `charges[i]` and `sensor_ids[i]` describe the same physical
/// hit. The signal flag column is present only when the input carried truth
/// information (1: signal, 0: background).
#[derive(Debug, Clone, Default, Serialize)]
pub struct HitSeries {
    /// Hit times [ns].
    pub times: Vec<f32>,
    /// Deposited charge [p.e.].
    pub charges: Vec<f32>,
    /// 1-based sensor cable ids.
    pub sensor_ids: Vec<i32>,
    /// Optional per-hit signal flags.
    pub signal_flags: Option<Vec<u8>>,
}

impl HitSeries {
    pub fn new(
        times: Vec<f32>,
        charges: Vec<f32>,
        sensor_ids: Vec<i32>,
        signal_flags: Option<Vec<u8>>,
    ) -> Result<Self, DataProcessingError> {
        let n = times.len();
        for (len, context) in [
            (charges.len(), "HitSeries charges"),
            (sensor_ids.len(), "HitSeries sensor_ids"),
        ] {
            if len != n {
                return Err(DataProcessingError::ExpectedSlicesSameLength {
                    expected: n,
                    other: len,
                    context: context.to_string(),
                });
            }
        }
        if let Some(flags) = &signal_flags {
            if flags.len() != n {
                return Err(DataProcessingError::ExpectedSlicesSameLength {
                    expected: n,
                    other: flags.len(),
                    context: "HitSeries signal_flags".to_string(),
                });
            }
        }
        Ok(Self {
            times,
            charges,
            sensor_ids,
            signal_flags,
        })
    }

    pub fn len(&self) -> usize {
        self.times.len()
    }

    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }
}

/// The permutation produced by sorting a corrected series, kept as an
/// explicit value pair so raw-order alignment is always passed around
/// rather than read from a side channel.
#[derive(Debug, Clone, Serialize)]
pub struct HitPermutation {
    /// `sorted_to_raw[k]` is the raw-series index of the hit at sorted
    /// position k.
    pub sorted_to_raw: Vec<usize>,
    /// Inverse map: `raw_to_sorted[sorted_to_raw[k]] == k`.
    pub raw_to_sorted: Vec<usize>,
}

impl HitPermutation {
    pub fn identity(n: usize) -> Self {
        Self {
            sorted_to_raw: (0..n).collect(),
            raw_to_sorted: (0..n).collect(),
        }
    }

    pub fn from_sorted_to_raw(sorted_to_raw: Vec<usize>) -> Self {
        let mut raw_to_sorted = vec![0usize; sorted_to_raw.len()];
        for (sorted_idx, &raw_idx) in sorted_to_raw.iter().enumerate() {
            raw_to_sorted[raw_idx] = sorted_idx;
        }
        Self {
            sorted_to_raw,
            raw_to_sorted,
        }
    }

    pub fn len(&self) -> usize {
        self.sorted_to_raw.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sorted_to_raw.is_empty()
    }

    pub fn is_consistent(&self) -> bool {
        self.sorted_to_raw.len() == self.raw_to_sorted.len()
            && self
                .sorted_to_raw
                .iter()
                .enumerate()
                .all(|(k, &raw)| raw < self.raw_to_sorted.len() && self.raw_to_sorted[raw] == k)
    }
}

/// The ToF-corrected hit columns of one event, re-ordered ascending by
/// corrected time, together with the permutation back to raw order.
#[derive(Debug, Clone, Serialize)]
pub struct SortedHitSeries {
    /// ToF-subtracted hit times [ns], ascending.
    pub times: Vec<f32>,
    /// Charges aligned to `times`.
    pub charges: Vec<f32>,
    /// Sensor ids aligned to `times`.
    pub sensor_ids: Vec<i32>,
    /// Signal flags aligned to `times`, if the raw series carried them.
    pub signal_flags: Option<Vec<u8>>,
    pub permutation: HitPermutation,
}

impl SortedHitSeries {
    pub fn len(&self) -> usize {
        self.times.len()
    }

    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    /// Checks the ascending-time precondition the scanner relies on.
    pub fn check_sorted(&self, context: &str) -> Result<(), DataProcessingError> {
        if self.times.windows(2).any(|w| w[0] > w[1]) {
            return Err(DataProcessingError::ExpectedSortedData {
                context: context.to_string(),
            });
        }
        Ok(())
    }
}
