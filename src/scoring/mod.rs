pub mod engine;

pub use engine::{
    breakdown, compute_daily_points, compute_progress_percent, compute_quran_merit,
    PointsBreakdown,
};
