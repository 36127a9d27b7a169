pub mod client;
pub mod config;
pub mod directory;
pub mod form;

pub use client::{ApiClient, ApiError, PlantBackend, PlantRecord};
pub use config::{Config, ConfigError, ConfigFile, Overrides};
pub use directory::{
    fetch_directory, statuses_or_fallback, station_types_or_fallback, DirectoryCache,
    FALLBACK_STATUSES,
};
pub use form::PlantForm;
