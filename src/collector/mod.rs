//! One-shot statistics collection.
//!
//! A run is three independently failing steps: make sure the table exists,
//! fetch the counters, append one row. Scheduling runs is left to whatever
//! invokes the binary.

use chrono::Local;
use log::info;

use crate::config::Settings;
use crate::db::{models::StatSnapshot, Database};
use crate::error::StatsError;
use crate::youtube::YoutubeClient;

/// Collects and stores a single snapshot for the configured video.
///
/// Any failure aborts the run. Schema creation may already be committed by
/// then. The insert is the last step, so a failed run adds no row.
pub async fn collect_once(settings: &Settings) -> Result<StatSnapshot, StatsError> {
    info!("Starting collection run...");
    let start = std::time::Instant::now();

    let db = Database::new(&settings.storage);
    db.migrate().await?;

    let client = YoutubeClient::new(&settings.youtube)?;
    let stats = client.fetch_statistics(&settings.youtube.video_id).await?;

    let timestamp = Local::now().naive_local();
    let id = db.insert_snapshot(timestamp, stats).await?;

    info!(
        "Saved snapshot #{}: {} views, {} likes, {} comments",
        id, stats.views, stats.likes, stats.comments
    );
    info!("Collection run completed in {:?}", start.elapsed());

    Ok(StatSnapshot::new(
        id,
        timestamp,
        Some(stats.views),
        Some(stats.likes),
        Some(stats.comments),
    ))
}
