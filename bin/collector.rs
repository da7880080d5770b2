use anyhow::Context;
use jemallocator::Jemalloc;
use log::{error, info, LevelFilter};
use simple_logger::SimpleLogger;

#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

use viewtrack::{collect_once, Settings};

/// Runs one collection and exits; a non-zero status tells the scheduler it failed.
#[tokio::main()]
async fn main() -> anyhow::Result<()> {
    SimpleLogger::new()
        .with_level(LevelFilter::Info)
        .init()
        .context("Failed to initialise logger")?;

    let settings = Settings::new().context("Failed to load configuration")?;

    match collect_once(&settings).await {
        Ok(snapshot) => {
            let counters = snapshot.counters();
            info!(
                "Collection finished: {} views, {} likes, {} comments",
                counters.views, counters.likes, counters.comments
            );
            Ok(())
        },
        Err(e) => {
            error!("Error during collection: {:#}", e);
            Err(e).context("Collection run failed")
        },
    }
}
