pub mod client;
pub mod ops;

pub use client::SqliteClient;
pub use ops::parse_timestamp;
