pub mod config;
pub mod errors;
pub mod models;
pub mod pipeline;
pub mod preprocess;
pub mod search;
pub mod tof;
pub mod utils;

pub use config::{
    AccumulatorConfig,
    SearchConfig,
};
pub use errors::{
    CapseekError,
    Result,
};
pub use models::{
    HitSeries,
    SensorArray,
    SortedHitSeries,
    TankShape,
    Vertex,
};
pub use pipeline::{
    EventProcessor,
    EventReport,
    EventSummary,
};
pub use search::Candidate;
