use crate::core::sizing::compute;
use crate::core::{
    CatalogStore, Client, ClientDetails, ClientId, LoudspeakerModel, Project, ProjectId,
    RoomGeometry, RoomProfile, SizingResult,
};
use crate::utils::error::Result;
use crate::utils::validation::Validate;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Catalog keys plus the measured room.
#[derive(Debug, Clone, PartialEq)]
pub struct SizingRequest {
    pub room_profile: String,
    pub loudspeaker_model: String,
    pub geometry: RoomGeometry,
}

/// 計算結果連同解析後的目錄紀錄
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sizing {
    pub room: RoomProfile,
    pub speaker: LoudspeakerModel,
    pub geometry: RoomGeometry,
    pub result: SizingResult,
}

pub struct SizingService<C: CatalogStore> {
    catalog: C,
}

impl<C: CatalogStore> SizingService<C> {
    pub fn new(catalog: C) -> Self {
        Self { catalog }
    }

    pub fn catalog(&self) -> &C {
        &self.catalog
    }

    pub async fn size(&self, request: &SizingRequest) -> Result<Sizing> {
        tracing::debug!(
            "Resolving room profile '{}' and loudspeaker '{}'",
            request.room_profile,
            request.loudspeaker_model
        );
        let room = self.catalog.find_room_profile(&request.room_profile).await?;
        let speaker = self
            .catalog
            .find_loudspeaker_model(&request.loudspeaker_model)
            .await?;

        let result = compute(&request.geometry, &room, &speaker)?;
        tracing::info!(
            "📐 {} with {}: {} unit(s), {:.0} W total, RT60 {:.2} s ({})",
            room.name,
            speaker.model,
            result.speaker_count_required,
            result.total_power_required,
            result.reverberation_time,
            result.classification
        );

        Ok(Sizing {
            room,
            speaker,
            geometry: request.geometry,
            result,
        })
    }

    pub async fn save_project(
        &self,
        client_id: ClientId,
        sizing: &Sizing,
        created_on: NaiveDate,
    ) -> Result<Project> {
        let client = self.catalog.find_client(client_id).await?;
        let existing = self.catalog.list_projects().await?;
        let id = ProjectId::next_after(existing.iter().map(|p| p.id));

        let project = Project::from_sizing(
            id,
            client.id,
            &sizing.room,
            &sizing.speaker,
            &sizing.result,
            created_on,
        );
        self.catalog.append_project(project.clone()).await?;
        tracing::info!("💾 Project {} saved for client {} ({})", id, client.id, client.name);

        Ok(project)
    }

    pub async fn projects(&self) -> Result<Vec<Project>> {
        self.catalog.list_projects().await
    }

    pub async fn register_client(&self, details: ClientDetails) -> Result<Client> {
        details.validate()?;
        let existing = self.catalog.list_clients().await?;
        let id = ClientId::next_after(existing.iter().map(|c| c.id));

        let client = details.into_client(id);
        self.catalog.add_client(client.clone()).await?;
        tracing::info!("👤 Client {} registered: {}", client.id, client.name);

        Ok(client)
    }

    pub async fn register_room_profile(&self, profile: RoomProfile) -> Result<()> {
        profile.validate()?;
        let name = profile.name.clone();
        self.catalog.add_room_profile(profile).await?;
        tracing::info!("🏛️ Room profile '{}' added", name);
        Ok(())
    }

    pub async fn register_loudspeaker_model(&self, model: LoudspeakerModel) -> Result<()> {
        model.validate()?;
        let key = model.model.clone();
        self.catalog.add_loudspeaker_model(model).await?;
        tracing::info!("🔊 Loudspeaker '{}' added", key);
        Ok(())
    }
}
