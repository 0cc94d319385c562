mod candidate;
mod features;
mod scanner;

pub use candidate::{
    build_candidate,
    Candidate,
};
pub use features::{
    FeatureValue,
    FeatureVector,
    FeatureVectorBuilder,
    FEATURE_NAMES,
};
pub use scanner::{
    scan,
    ScanOutput,
    Trigger,
    NS_TO_US,
};

/// Widths [ns] of the fixed secondary count windows, all anchored at the
/// trigger hit like the primary window.
pub const N50_WINDOW: f32 = 50.0;
pub const N200_WINDOW: f32 = 200.0;
pub const N1300_WINDOW: f32 = 1300.0;
