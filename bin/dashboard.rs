use anyhow::Context;
use jemallocator::Jemalloc;
use log::{error, info, LevelFilter};
use simple_logger::SimpleLogger;
use tokio_util::sync::CancellationToken;

#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

use viewtrack::{dashboard, Settings};

#[tokio::main()]
async fn main() -> anyhow::Result<()> {
    SimpleLogger::new()
        .with_level(LevelFilter::Info)
        .init()
        .context("Failed to initialise logger")?;

    let settings = Settings::new().context("Failed to load configuration")?;

    let cancellation_token = CancellationToken::new();

    let server_token = cancellation_token.child_token();
    let mut server_handle = tokio::spawn(async move {
        let result = dashboard::serve(&settings, server_token).await;
        if let Err(e) = &result {
            error!("Dashboard failed: {:#}", e);
        }
        result
    });

    #[cfg(unix)]
    let mut sigterm_stream = {
        use tokio::signal::unix::{signal, SignalKind};
        signal(SignalKind::terminate()).context("Failed to install SIGTERM handler")?
    };

    info!("Dashboard running. Press Ctrl+C to stop.");

    #[cfg(unix)]
    {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                info!("Received shutdown signal (Ctrl+C), exiting gracefully...");
            },
            _ = sigterm_stream.recv() => {
                info!("Received SIGTERM, exiting gracefully...");
            },
            result = &mut server_handle => {
                return result.context("Dashboard task panicked")?;
            },
        };
    }

    #[cfg(not(unix))]
    {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                info!("Received shutdown signal (Ctrl+C), exiting gracefully...");
            },
            result = &mut server_handle => {
                return result.context("Dashboard task panicked")?;
            },
        };
    }

    cancellation_token.cancel();
    server_handle.await.context("Dashboard task panicked")?
}
