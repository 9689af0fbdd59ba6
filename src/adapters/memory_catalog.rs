use crate::core::{CatalogStore, Client, ClientId, LoudspeakerModel, Project, RoomProfile};
use crate::utils::error::{AcousticError, Result};
use async_trait::async_trait;
use tokio::sync::RwLock;

#[derive(Debug, Default)]
struct Tables {
    rooms: Vec<RoomProfile>,
    speakers: Vec<LoudspeakerModel>,
    clients: Vec<Client>,
    projects: Vec<Project>,
}

/// `CatalogStore` kept entirely in memory.
#[derive(Debug, Default)]
pub struct MemoryCatalog {
    tables: RwLock<Tables>,
}

impl MemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_records(rooms: Vec<RoomProfile>, speakers: Vec<LoudspeakerModel>) -> Self {
        Self {
            tables: RwLock::new(Tables {
                rooms,
                speakers,
                ..Default::default()
            }),
        }
    }
}

pub(crate) fn duplicate(field: &str, entity: &str, key: &str) -> AcousticError {
    AcousticError::invalid_input(field, format!("{} '{}' already exists", entity, key))
}

#[async_trait]
impl CatalogStore for MemoryCatalog {
    async fn find_room_profile(&self, name: &str) -> Result<RoomProfile> {
        let tables = self.tables.read().await;
        tables
            .rooms
            .iter()
            .find(|r| r.name == name)
            .cloned()
            .ok_or_else(|| AcousticError::not_found("Room profile", name))
    }

    async fn find_loudspeaker_model(&self, model: &str) -> Result<LoudspeakerModel> {
        let tables = self.tables.read().await;
        tables
            .speakers
            .iter()
            .find(|s| s.model == model)
            .cloned()
            .ok_or_else(|| AcousticError::not_found("Loudspeaker model", model))
    }

    async fn find_client(&self, id: ClientId) -> Result<Client> {
        let tables = self.tables.read().await;
        tables
            .clients
            .iter()
            .find(|c| c.id == id)
            .cloned()
            .ok_or_else(|| AcousticError::not_found("Client", id.to_string()))
    }

    async fn list_room_profiles(&self) -> Result<Vec<RoomProfile>> {
        Ok(self.tables.read().await.rooms.clone())
    }

    async fn list_loudspeaker_models(&self) -> Result<Vec<LoudspeakerModel>> {
        Ok(self.tables.read().await.speakers.clone())
    }

    async fn list_clients(&self) -> Result<Vec<Client>> {
        Ok(self.tables.read().await.clients.clone())
    }

    async fn list_projects(&self) -> Result<Vec<Project>> {
        Ok(self.tables.read().await.projects.clone())
    }

    async fn add_room_profile(&self, profile: RoomProfile) -> Result<()> {
        let mut tables = self.tables.write().await;
        if tables.rooms.iter().any(|r| r.name == profile.name) {
            return Err(duplicate("name", "Room profile", &profile.name));
        }
        tables.rooms.push(profile);
        Ok(())
    }

    async fn add_loudspeaker_model(&self, model: LoudspeakerModel) -> Result<()> {
        let mut tables = self.tables.write().await;
        if tables.speakers.iter().any(|s| s.model == model.model) {
            return Err(duplicate("model", "Loudspeaker model", &model.model));
        }
        tables.speakers.push(model);
        Ok(())
    }

    async fn add_client(&self, client: Client) -> Result<()> {
        let mut tables = self.tables.write().await;
        if tables.clients.iter().any(|c| c.id == client.id) {
            return Err(duplicate("id", "Client", &client.id.to_string()));
        }
        tables.clients.push(client);
        Ok(())
    }

    async fn append_project(&self, project: Project) -> Result<()> {
        let mut tables = self.tables.write().await;
        if tables.projects.iter().any(|p| p.id == project.id) {
            return Err(duplicate("id", "Project", &project.id.to_string()));
        }
        tables.projects.push(project);
        Ok(())
    }
}
