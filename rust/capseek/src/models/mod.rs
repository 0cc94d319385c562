mod geometry;
mod hit_series;

pub use geometry::{
    distance,
    norm,
    Point,
    SensorArray,
    TankShape,
    Vertex,
};
pub use hit_series::{
    HitPermutation,
    HitSeries,
    SortedHitSeries,
};
