pub mod collector;
pub mod config;
pub mod dashboard;
pub mod db;
pub mod error;
pub mod youtube;

pub use collector::collect_once;
pub use config::Settings;
pub use dashboard::{derive_insights, load_history, HistoryCache};
pub use db::Database;
pub use error::StatsError;
pub use youtube::YoutubeClient;
