pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

pub use adapters::csv_catalog::{CatalogFiles, CsvCatalog};
pub use adapters::memory_catalog::MemoryCatalog;
pub use adapters::storage::{LocalStorage, MemoryStorage};
pub use config::AppConfig;
pub use crate::core::service::{Sizing, SizingRequest, SizingService};
pub use crate::core::sizing::compute;
pub use domain::model::{
    Client, ClientDetails, ClientId, LoudspeakerModel, Project, ProjectId, ReverbClass,
    RoomGeometry, RoomProfile, SizingResult,
};
pub use utils::error::{AcousticError, Result};
