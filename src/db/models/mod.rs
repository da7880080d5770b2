mod stat_snapshot;
mod video_statistics;

pub use stat_snapshot::StatSnapshot;
pub use video_statistics::VideoStatistics;
