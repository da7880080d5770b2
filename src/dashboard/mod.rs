//! Read-only analytics over the collected snapshots.
//!
//! - [`history`] - loading the table, degrading to empty on any problem
//! - [`cache`] - time-windowed memoization of the loaded history
//! - [`insights`] - derived series (views gained, engagement, discussion)
//! - [`render`] - HTML page with SVG charts
//! - [`server`] - axum routes

pub mod cache;
pub mod history;
pub mod insights;
pub mod render;
pub mod server;

pub use cache::HistoryCache;
pub use history::{load_history, History, Notice, NoticeLevel};
pub use insights::{derive_insights, InsightRow, Insights};
pub use server::{router, serve, DashboardState};
