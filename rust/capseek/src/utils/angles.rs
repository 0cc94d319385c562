//! Angular statistics of hit directions as seen from a vertex.
//!
//! The inputs are unit vectors from the assumed vertex to each hit sensor.
//! Pairwise opening angles measure isotropy of the hit pattern; the
//! Legendre-weighted multipole ("beta") coefficients summarize the same
//! angular distribution for the classifier.

use crate::models::{
    norm,
    Point,
};
use crate::utils::math::{
    legendre,
    mean,
    rms,
    skewness,
};

/// Number of multipole coefficients computed (orders 1 through 5).
pub const NUM_BETAS: usize = 5;

#[derive(Debug, Clone, Copy, Default)]
pub struct OpeningAngleStats {
    /// Mean pairwise opening angle [deg].
    pub mean: f32,
    /// Population standard deviation of the angles [deg].
    pub stdev: f32,
    /// Skewness of the angle distribution.
    pub skew: f32,
}

fn dot(a: Point, b: Point) -> f32 {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
}

/// All pairwise opening angles [deg] between the given unit directions,
/// in (i, j) source order with i < j.
pub fn opening_angles(dirs: &[Point]) -> Vec<f32> {
    let mut angles = Vec::with_capacity(dirs.len() * (dirs.len().saturating_sub(1)) / 2);
    for i in 0..dirs.len() {
        for j in (i + 1)..dirs.len() {
            let c = dot(dirs[i], dirs[j]).clamp(-1.0, 1.0);
            angles.push(c.acos().to_degrees());
        }
    }
    angles
}

/// Mean, stdev and skewness of the pairwise opening angles.
/// Fewer than two directions yield all-zero statistics.
pub fn opening_angle_stats(dirs: &[Point]) -> OpeningAngleStats {
    let angles = opening_angles(dirs);
    if angles.is_empty() {
        return OpeningAngleStats::default();
    }
    OpeningAngleStats {
        mean: mean(&angles),
        stdev: rms(&angles),
        skew: skewness(&angles),
    }
}

/// Multipole coefficients of a hit cluster.
///
/// `beta_l = 2 / (N (N - 1)) * sum_{i<j} P_l(cos theta_ij)` for l = 1..5,
/// following Eq. (5) of the SNO review (arXiv:1602.02469). The returned
/// array is indexed by order; element 0 is a dummy 0 so `betas[l]` reads
/// naturally. Fewer than two directions yield all zeros.
pub fn beta_coefficients(dirs: &[Point]) -> [f32; NUM_BETAS + 1] {
    let mut betas = [0.0f32; NUM_BETAS + 1];
    let n = dirs.len();
    if n < 2 {
        return betas;
    }
    for i in 0..n {
        for j in (i + 1)..n {
            let c = dot(dirs[i], dirs[j]).clamp(-1.0, 1.0);
            for (order, beta) in betas.iter_mut().enumerate().skip(1) {
                *beta += legendre(order, c);
            }
        }
    }
    let pair_norm = 2.0 / (n as f32 * (n as f32 - 1.0));
    for beta in betas.iter_mut() {
        *beta *= pair_norm;
    }
    betas
}

/// The beta14 composite used as a single isotropy discriminant.
pub fn beta14(betas: &[f32; NUM_BETAS + 1]) -> f32 {
    betas[1] + 4.0 * betas[4]
}

/// Normalized vector sum of the directions; zero if they cancel.
pub fn mean_direction(dirs: &[Point]) -> Point {
    let mut sum = [0.0f32; 3];
    for d in dirs {
        sum[0] += d[0];
        sum[1] += d[1];
        sum[2] += d[2];
    }
    let n = norm(sum);
    if n == 0.0 {
        return [0.0, 0.0, 0.0];
    }
    [sum[0] / n, sum[1] / n, sum[2] / n]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_opening_angles_orthogonal() {
        let dirs = [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0]];
        let angles = opening_angles(&dirs);
        assert_eq!(angles.len(), 1);
        assert!((angles[0] - 90.0).abs() < 1e-3);
    }

    #[test]
    fn test_opening_angle_stats_degenerate() {
        let stats = opening_angle_stats(&[[1.0, 0.0, 0.0]]);
        assert_eq!(stats.mean, 0.0);
        assert_eq!(stats.stdev, 0.0);
        assert_eq!(stats.skew, 0.0);
    }

    #[test]
    fn test_betas_collinear_cluster() {
        // All hits in the same direction: cos = 1, so every P_l(1) = 1
        // and every beta saturates at 1.
        let dirs = [[0.0, 0.0, 1.0]; 4];
        let betas = beta_coefficients(&dirs);
        assert_eq!(betas[0], 0.0);
        for l in 1..=NUM_BETAS {
            assert!((betas[l] - 1.0).abs() < 1e-5, "beta{} = {}", l, betas[l]);
        }
        assert!((beta14(&betas) - 5.0).abs() < 1e-4);
    }

    #[test]
    fn test_betas_antipodal_pair() {
        // cos = -1: beta_l = P_l(-1) = (-1)^l.
        let dirs = [[0.0, 0.0, 1.0], [0.0, 0.0, -1.0]];
        let betas = beta_coefficients(&dirs);
        assert!((betas[1] + 1.0).abs() < 1e-5);
        assert!((betas[2] - 1.0).abs() < 1e-5);
        assert!((betas[3] + 1.0).abs() < 1e-5);
        assert!((betas[4] - 1.0).abs() < 1e-5);
        assert!((betas[5] + 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_betas_single_direction_is_zero() {
        let betas = beta_coefficients(&[[1.0, 0.0, 0.0]]);
        assert_eq!(betas, [0.0; NUM_BETAS + 1]);
    }

    #[test]
    fn test_mean_direction() {
        let dirs = [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0]];
        let d = mean_direction(&dirs);
        let expect = 1.0 / 2.0f32.sqrt();
        assert!((d[0] - expect).abs() < 1e-5);
        assert!((d[1] - expect).abs() < 1e-5);
        assert_eq!(d[2], 0.0);
    }

    #[test]
    fn test_mean_direction_cancels_to_zero() {
        let dirs = [[0.0, 0.0, 1.0], [0.0, 0.0, -1.0]];
        assert_eq!(mean_direction(&dirs), [0.0, 0.0, 0.0]);
    }
}
