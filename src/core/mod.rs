pub mod service;
pub mod sizing;

pub use crate::domain::model::{
    Client, ClientDetails, ClientId, LoudspeakerModel, Project, ProjectId, ReverbClass,
    RoomGeometry, RoomProfile, SizingResult,
};
pub use crate::domain::ports::{CatalogStore, ConfigProvider, Storage};
pub use crate::utils::error::Result;
