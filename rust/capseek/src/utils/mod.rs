pub mod angles;
pub mod math;
pub mod window_stats;
