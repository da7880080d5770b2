mod settings;

pub use settings::{DashboardSettings, Settings, StorageSettings, YoutubeSettings, API_KEY_ENV};
