//! Client for the YouTube Data API `videos.list` endpoint.

mod client;
mod response;

pub use client::YoutubeClient;
pub use response::{Counter, Statistics, VideoItem, VideoListResponse};
