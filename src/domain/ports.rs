use crate::domain::model::{Client, ClientId, LoudspeakerModel, Project, RoomProfile};
use crate::utils::error::Result;
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
    fn append_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn data_dir(&self) -> &str;
    fn rooms_file(&self) -> &str;
    fn speakers_file(&self) -> &str;
    fn clients_file(&self) -> &str;
    fn projects_file(&self) -> &str;
    fn full_report(&self) -> bool;
}

/// Room, loudspeaker, client and project catalogs.
///
/// Lists come back in insertion order. Adding a record whose key already exists
/// fails with `InvalidInput`.
#[async_trait]
pub trait CatalogStore: Send + Sync {
    async fn find_room_profile(&self, name: &str) -> Result<RoomProfile>;
    async fn find_loudspeaker_model(&self, model: &str) -> Result<LoudspeakerModel>;
    async fn find_client(&self, id: ClientId) -> Result<Client>;

    async fn list_room_profiles(&self) -> Result<Vec<RoomProfile>>;
    async fn list_loudspeaker_models(&self) -> Result<Vec<LoudspeakerModel>>;
    async fn list_clients(&self) -> Result<Vec<Client>>;
    async fn list_projects(&self) -> Result<Vec<Project>>;

    async fn add_room_profile(&self, profile: RoomProfile) -> Result<()>;
    async fn add_loudspeaker_model(&self, model: LoudspeakerModel) -> Result<()>;
    async fn add_client(&self, client: Client) -> Result<()>;
    async fn append_project(&self, project: Project) -> Result<()>;
}
