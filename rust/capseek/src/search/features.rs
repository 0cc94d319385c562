//! The fixed feature schema of a capture candidate.
//!
//! Every candidate, in every event, populates the same statically
//! enumerated list of named slots; there is no "first candidate defines
//! the schema" behavior. Names are stable strings consumed by the
//! external classifier. Integer- and real-valued features coexist.

use crate::errors::DataProcessingError;
use serde::Serialize;

/// The schema, in iteration order.
pub const FEATURE_NAMES: [&str; 20] = [
    "n10",
    "n50",
    "n200",
    "n1300",
    "recon_ct",
    "qsum",
    "trms",
    "tspread",
    "time_skew",
    "beta1",
    "beta2",
    "beta3",
    "beta4",
    "beta5",
    "beta14",
    "angle_mean",
    "angle_stdev",
    "angle_skew",
    "dwall",
    "dwall_meandir",
];

/// A single feature value. Counts stay integral; everything else is real.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum FeatureValue {
    Int(u32),
    Float(f32),
}

impl FeatureValue {
    pub fn as_f32(&self) -> f32 {
        match self {
            FeatureValue::Int(x) => *x as f32,
            FeatureValue::Float(x) => *x,
        }
    }

    pub fn is_finite(&self) -> bool {
        match self {
            FeatureValue::Int(_) => true,
            FeatureValue::Float(x) => x.is_finite(),
        }
    }
}

/// The numeric summary of one candidate handed to the classifier.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct FeatureVector {
    /// Hit count in the primary (10 ns) window.
    pub n10: u32,
    /// Hit counts at the wider scales, from the same trigger hit.
    pub n50: u32,
    pub n200: u32,
    pub n1300: u32,
    /// Corrected time of the trigger hit [ns].
    pub recon_ct: f32,
    /// Summed charge in the primary window [p.e.].
    pub qsum: f32,
    /// Biased RMS of the primary-window times.
    pub trms: f32,
    /// Max - min of the primary-window times.
    pub tspread: f32,
    /// Skewness of the primary-window times.
    pub time_skew: f32,
    /// Legendre multipole coefficients of the hit directions.
    pub beta1: f32,
    pub beta2: f32,
    pub beta3: f32,
    pub beta4: f32,
    pub beta5: f32,
    /// beta1 + 4 * beta4.
    pub beta14: f32,
    /// Pairwise opening-angle statistics [deg].
    pub angle_mean: f32,
    pub angle_stdev: f32,
    pub angle_skew: f32,
    /// Vertex distance to the nearest tank wall [cm].
    pub dwall: f32,
    /// Distance to the wall along the mean hit direction [cm].
    pub dwall_meandir: f32,
}

impl FeatureVector {
    /// Iterates `(name, value)` pairs in schema order.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, FeatureValue)> + '_ {
        use FeatureValue::{
            Float,
            Int,
        };
        [
            ("n10", Int(self.n10)),
            ("n50", Int(self.n50)),
            ("n200", Int(self.n200)),
            ("n1300", Int(self.n1300)),
            ("recon_ct", Float(self.recon_ct)),
            ("qsum", Float(self.qsum)),
            ("trms", Float(self.trms)),
            ("tspread", Float(self.tspread)),
            ("time_skew", Float(self.time_skew)),
            ("beta1", Float(self.beta1)),
            ("beta2", Float(self.beta2)),
            ("beta3", Float(self.beta3)),
            ("beta4", Float(self.beta4)),
            ("beta5", Float(self.beta5)),
            ("beta14", Float(self.beta14)),
            ("angle_mean", Float(self.angle_mean)),
            ("angle_stdev", Float(self.angle_stdev)),
            ("angle_skew", Float(self.angle_skew)),
            ("dwall", Float(self.dwall)),
            ("dwall_meandir", Float(self.dwall_meandir)),
        ]
        .into_iter()
    }

    pub fn get(&self, name: &str) -> Option<FeatureValue> {
        self.iter().find(|(n, _)| *n == name).map(|(_, v)| v)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub enum SetField<T> {
    Some(T),
    #[default]
    None,
}

impl<T> SetField<T> {
    pub fn expect_some(self, field_name: &'static str) -> Result<T, DataProcessingError> {
        match self {
            Self::Some(v) => Ok(v),
            Self::None => Err(DataProcessingError::ExpectedSetField { field: field_name }),
        }
    }
}

/// Assembles a [`FeatureVector`] slot by slot. A slot left unset is a
/// construction error, not a silently missing feature.
#[derive(Debug, Default)]
pub struct FeatureVectorBuilder {
    counts: SetField<[u32; 4]>,
    recon_ct: SetField<f32>,
    qsum: SetField<f32>,
    time_shape: SetField<(f32, f32, f32)>,
    betas: SetField<[f32; 6]>,
    angles: SetField<(f32, f32, f32)>,
    walls: SetField<(f32, f32)>,
}

impl FeatureVectorBuilder {
    /// Counts at the 10/50/200/1300 ns widths, in that order.
    pub fn with_counts(mut self, counts: [u32; 4]) -> Self {
        self.counts = SetField::Some(counts);
        self
    }

    pub fn with_recon_ct(mut self, recon_ct: f32) -> Self {
        self.recon_ct = SetField::Some(recon_ct);
        self
    }

    pub fn with_qsum(mut self, qsum: f32) -> Self {
        self.qsum = SetField::Some(qsum);
        self
    }

    /// RMS, spread and skewness of the primary-window times.
    pub fn with_time_shape(mut self, trms: f32, tspread: f32, time_skew: f32) -> Self {
        self.time_shape = SetField::Some((trms, tspread, time_skew));
        self
    }

    /// The order-indexed beta array (element 0 is the dummy).
    pub fn with_betas(mut self, betas: [f32; 6]) -> Self {
        self.betas = SetField::Some(betas);
        self
    }

    pub fn with_angle_stats(mut self, mean: f32, stdev: f32, skew: f32) -> Self {
        self.angles = SetField::Some((mean, stdev, skew));
        self
    }

    pub fn with_walls(mut self, dwall: f32, dwall_meandir: f32) -> Self {
        self.walls = SetField::Some((dwall, dwall_meandir));
        self
    }

    pub fn finalize(self) -> Result<FeatureVector, DataProcessingError> {
        let [n10, n50, n200, n1300] = self.counts.expect_some("counts")?;
        let (trms, tspread, time_skew) = self.time_shape.expect_some("time_shape")?;
        let [_, beta1, beta2, beta3, beta4, beta5] = self.betas.expect_some("betas")?;
        let (angle_mean, angle_stdev, angle_skew) = self.angles.expect_some("angles")?;
        let (dwall, dwall_meandir) = self.walls.expect_some("walls")?;

        Ok(FeatureVector {
            n10,
            n50,
            n200,
            n1300,
            recon_ct: self.recon_ct.expect_some("recon_ct")?,
            qsum: self.qsum.expect_some("qsum")?,
            trms,
            tspread,
            time_skew,
            beta1,
            beta2,
            beta3,
            beta4,
            beta5,
            beta14: beta1 + 4.0 * beta4,
            angle_mean,
            angle_stdev,
            angle_skew,
            dwall,
            dwall_meandir,
        })
    }
}
