//! Small numeric helpers shared by the window statistics and the feature
//! extractor.
//!
//! All statistics accumulate in source order and divide at the end
//! (sum-then-divide, not Welford), since the downstream classifier weights
//! were trained against that exact numeric behavior. Degenerate inputs
//! yield 0.0 rather than NaN so feature vectors are always fully populated.

/// Arithmetic mean. Returns 0.0 for an empty slice.
pub fn mean(vals: &[f32]) -> f32 {
    if vals.is_empty() {
        return 0.0;
    }
    let sum: f32 = vals.iter().sum();
    sum / vals.len() as f32
}

/// Median of a slice (average of the two middle elements for even length).
/// Returns 0.0 for an empty slice.
pub fn median(vals: &[f32]) -> f32 {
    if vals.is_empty() {
        return 0.0;
    }
    let mut sorted = vals.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 1 {
        sorted[mid]
    } else {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    }
}

/// Population (biased, divide-by-N) standard deviation.
///
/// Used as the time-spread compactness measure; smaller values mean a
/// tighter cluster. A single-element slice has an RMS of 0, and the value
/// is invariant under a constant time shift.
pub fn rms(vals: &[f32]) -> f32 {
    if vals.is_empty() {
        return 0.0;
    }
    let m = mean(vals);
    let sqsum: f32 = vals.iter().map(|x| (x - m) * (x - m)).sum();
    (sqsum / vals.len() as f32).sqrt()
}

/// Third standardized moment, biased (moments divided by N).
/// Returns 0.0 when the variance vanishes.
pub fn skewness(vals: &[f32]) -> f32 {
    if vals.len() < 2 {
        return 0.0;
    }
    let m = mean(vals);
    let n = vals.len() as f32;
    let m2: f32 = vals.iter().map(|x| (x - m).powi(2)).sum::<f32>() / n;
    let m3: f32 = vals.iter().map(|x| (x - m).powi(3)).sum::<f32>() / n;
    if m2 <= 0.0 {
        return 0.0;
    }
    m3 / m2.powf(1.5)
}

/// Legendre polynomial P_n(x) for x in [-1, 1].
///
/// Orders up to 5 are the ones used by the multipole coefficients; higher
/// orders fall back to the Bonnet recurrence.
pub fn legendre(order: usize, x: f32) -> f32 {
    match order {
        0 => 1.0,
        1 => x,
        2 => (3.0 * x * x - 1.0) / 2.0,
        3 => (5.0 * x * x * x - 3.0 * x) / 2.0,
        4 => (35.0 * x.powi(4) - 30.0 * x * x + 3.0) / 8.0,
        5 => (63.0 * x.powi(5) - 70.0 * x.powi(3) + 15.0 * x) / 8.0,
        n => {
            let mut p_prev = legendre(4, x);
            let mut p = legendre(5, x);
            for k in 5..n {
                let k_f = k as f32;
                let next = ((2.0 * k_f + 1.0) * x * p - k_f * p_prev) / (k_f + 1.0);
                p_prev = p;
                p = next;
            }
            p
        }
    }
}
