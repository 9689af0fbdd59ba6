use crate::adapters::memory_catalog::duplicate;
use crate::core::{
    CatalogStore, Client, ClientId, ConfigProvider, LoudspeakerModel, Project, RoomProfile,
    Storage,
};
use crate::utils::error::{AcousticError, Result};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::sync::Mutex;

/// 四個目錄檔案的名稱（相對於儲存根目錄）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogFiles {
    pub rooms: String,
    pub speakers: String,
    pub clients: String,
    pub projects: String,
}

impl CatalogFiles {
    pub fn from_config<C: ConfigProvider + ?Sized>(config: &C) -> Self {
        Self {
            rooms: config.rooms_file().to_string(),
            speakers: config.speakers_file().to_string(),
            clients: config.clients_file().to_string(),
            projects: config.projects_file().to_string(),
        }
    }
}

impl Default for CatalogFiles {
    fn default() -> Self {
        Self {
            rooms: "rooms.csv".to_string(),
            speakers: "speakers.csv".to_string(),
            clients: "clients.csv".to_string(),
            projects: "projects.csv".to_string(),
        }
    }
}

/// `CatalogStore` backed by flat CSV files with a fixed header schema.
///
/// A missing file reads as an empty table. New records are appended as rows; the
/// header is written only when the file is empty. Writes go through one async mutex
/// so that concurrent appends from the same process do not interleave.
pub struct CsvCatalog<S: Storage> {
    storage: S,
    files: CatalogFiles,
    write_lock: Mutex<()>,
}

impl<S: Storage> CsvCatalog<S> {
    pub fn new(storage: S, files: CatalogFiles) -> Self {
        Self {
            storage,
            files,
            write_lock: Mutex::new(()),
        }
    }

    pub fn files(&self) -> &CatalogFiles {
        &self.files
    }

    async fn read_raw(&self, path: &str) -> Result<Vec<u8>> {
        match self.storage.read_file(path).await {
            Ok(data) => Ok(data),
            Err(AcousticError::IoError(e)) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!("Catalog file '{}' does not exist yet, treating as empty", path);
                Ok(Vec::new())
            }
            Err(e) => Err(e),
        }
    }

    async fn read_table<T: DeserializeOwned>(&self, path: &str) -> Result<Vec<T>> {
        let data = self.read_raw(path).await?;
        parse_rows(&data)
    }

    /// 在寫入鎖內讀取現有資料、檢查鍵值重複，再附加一列
    async fn append_unique<T, F>(&self, path: &str, record: &T, is_duplicate: F) -> Result<()>
    where
        T: Serialize + DeserializeOwned + Send + Sync,
        F: Fn(&T) -> Option<AcousticError> + Send,
    {
        let _guard = self.write_lock.lock().await;

        let existing = self.read_raw(path).await?;
        let rows: Vec<T> = parse_rows(&existing)?;
        if let Some(err) = rows.iter().find_map(&is_duplicate) {
            return Err(err);
        }

        let needs_header = existing.iter().all(u8::is_ascii_whitespace);
        let mut data = Vec::new();
        if !needs_header && !existing.ends_with(b"\n") {
            data.push(b'\n');
        }
        data.extend(encode_row(record, needs_header)?);

        self.storage.append_file(path, &data).await?;
        tracing::debug!("Appended 1 row to '{}' ({} existing)", path, rows.len());
        Ok(())
    }
}

fn parse_rows<T: DeserializeOwned>(data: &[u8]) -> Result<Vec<T>> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(data);
    reader
        .deserialize()
        .map(|row| row.map_err(AcousticError::from))
        .collect()
}

fn encode_row<T: Serialize>(record: &T, with_header: bool) -> Result<Vec<u8>> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(with_header)
        .from_writer(Vec::new());
    writer.serialize(record)?;
    writer
        .into_inner()
        .map_err(|e| AcousticError::storage(format!("failed to flush CSV row: {}", e)))
}

#[async_trait]
impl<S: Storage> CatalogStore for CsvCatalog<S> {
    async fn find_room_profile(&self, name: &str) -> Result<RoomProfile> {
        self.read_table::<RoomProfile>(&self.files.rooms)
            .await?
            .into_iter()
            .find(|r| r.name == name)
            .ok_or_else(|| AcousticError::not_found("Room profile", name))
    }

    async fn find_loudspeaker_model(&self, model: &str) -> Result<LoudspeakerModel> {
        self.read_table::<LoudspeakerModel>(&self.files.speakers)
            .await?
            .into_iter()
            .find(|s| s.model == model)
            .ok_or_else(|| AcousticError::not_found("Loudspeaker model", model))
    }

    async fn find_client(&self, id: ClientId) -> Result<Client> {
        self.read_table::<Client>(&self.files.clients)
            .await?
            .into_iter()
            .find(|c| c.id == id)
            .ok_or_else(|| AcousticError::not_found("Client", id.to_string()))
    }

    async fn list_room_profiles(&self) -> Result<Vec<RoomProfile>> {
        self.read_table(&self.files.rooms).await
    }

    async fn list_loudspeaker_models(&self) -> Result<Vec<LoudspeakerModel>> {
        self.read_table(&self.files.speakers).await
    }

    async fn list_clients(&self) -> Result<Vec<Client>> {
        self.read_table(&self.files.clients).await
    }

    async fn list_projects(&self) -> Result<Vec<Project>> {
        self.read_table(&self.files.projects).await
    }

    async fn add_room_profile(&self, profile: RoomProfile) -> Result<()> {
        self.append_unique(&self.files.rooms, &profile, |r: &RoomProfile| {
            (r.name == profile.name).then(|| duplicate("name", "Room profile", &r.name))
        })
        .await
    }

    async fn add_loudspeaker_model(&self, model: LoudspeakerModel) -> Result<()> {
        self.append_unique(&self.files.speakers, &model, |s: &LoudspeakerModel| {
            (s.model == model.model).then(|| duplicate("model", "Loudspeaker model", &s.model))
        })
        .await
    }

    async fn add_client(&self, client: Client) -> Result<()> {
        self.append_unique(&self.files.clients, &client, |c: &Client| {
            (c.id == client.id).then(|| duplicate("id", "Client", &c.id.to_string()))
        })
        .await
    }

    async fn append_project(&self, project: Project) -> Result<()> {
        self.append_unique(&self.files.projects, &project, |p: &Project| {
            (p.id == project.id).then(|| duplicate("id", "Project", &p.id.to_string()))
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::storage::MemoryStorage;
    use crate::core::{ProjectId, ReverbClass};
    use chrono::NaiveDate;

    fn catalog() -> (CsvCatalog<MemoryStorage>, MemoryStorage) {
        let storage = MemoryStorage::new();
        (
            CsvCatalog::new(storage.clone(), CatalogFiles::default()),
            storage,
        )
    }

    fn project(id: u32) -> Project {
        Project {
            id: ProjectId::new(id),
            client_id: ClientId::new(1),
            room_profile: "Auditorium".to_string(),
            loudspeaker_model: "DZR12".to_string(),
            target_spl: 85.0,
            adjusted_spl: 99.77,
            total_power: 1800.0,
            rt60: 1.61,
            classification: ReverbClass::HighReverb,
            created_on: NaiveDate::from_ymd_opt(2024, 5, 17).unwrap(),
        }
    }

    #[tokio::test]
    async fn test_missing_files_read_as_empty() {
        let (catalog, _) = catalog();
        assert!(catalog.list_room_profiles().await.unwrap().is_empty());
        assert!(catalog.list_projects().await.unwrap().is_empty());
        assert!(matches!(
            catalog.find_room_profile("Auditorium").await,
            Err(AcousticError::NotFound { entity: "Room profile", .. })
        ));
    }

    #[tokio::test]
    async fn test_append_writes_header_once() {
        let (catalog, storage) = catalog();
        catalog.append_project(project(1)).await.unwrap();
        catalog.append_project(project(2)).await.unwrap();

        let content = String::from_utf8(storage.get_file("projects.csv").await.unwrap()).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(
            lines[0],
            "id,client_id,room_profile,loudspeaker_model,target_spl,adjusted_spl,total_power,rt60,classification,created_on"
        );
        assert_eq!(lines.len(), 3);
        assert!(lines[1].starts_with("P001,C001,Auditorium,DZR12,"));
        assert!(lines[1].ends_with(",HIGH_REVERB,2024-05-17"));

        let ids: Vec<ProjectId> = catalog
            .list_projects()
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.id)
            .collect();
        assert_eq!(ids, vec![ProjectId::new(1), ProjectId::new(2)]);
    }

    #[tokio::test]
    async fn test_duplicate_project_is_rejected() {
        let (catalog, _) = catalog();
        catalog.append_project(project(1)).await.unwrap();
        let err = catalog.append_project(project(1)).await.unwrap_err();
        assert!(matches!(err, AcousticError::InvalidInput { .. }));
        assert_eq!(catalog.list_projects().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_reads_hand_written_catalog() {
        let (catalog, storage) = catalog();
        storage
            .write_file(
                "speakers.csv",
                b"brand,model,kind,sensitivity,rated_power_rms,coverage_area\n\
                  Yamaha, DZR12 ,active 12in,95,300,35\n\
                  JBL,EON715,,96,650,40",
            )
            .await
            .unwrap();

        let speaker = catalog.find_loudspeaker_model("DZR12").await.unwrap();
        assert_eq!(speaker.rated_power_rms, 300.0);
        assert_eq!(speaker.kind, "active 12in");

        // 檔案結尾沒有換行時，新的一列仍須獨立成行
        catalog
            .add_loudspeaker_model(LoudspeakerModel {
                brand: "QSC".to_string(),
                model: "K12.2".to_string(),
                kind: String::new(),
                sensitivity: 97.0,
                rated_power_rms: 1000.0,
                coverage_area: 50.0,
            })
            .await
            .unwrap();
        let models: Vec<String> = catalog
            .list_loudspeaker_models()
            .await
            .unwrap()
            .into_iter()
            .map(|s| s.model)
            .collect();
        assert_eq!(models, vec!["DZR12", "EON715", "K12.2"]);
    }

    #[tokio::test]
    async fn test_malformed_row_is_a_storage_error() {
        let (catalog, storage) = catalog();
        storage
            .write_file(
                "rooms.csv",
                b"name,target_spl,target_rt60,mean_absorption,standard_coverage_area\nHall,loud,1.0,0.3,40\n",
            )
            .await
            .unwrap();

        let err = catalog.list_room_profiles().await.unwrap_err();
        assert_eq!(err.category(), crate::utils::error::ErrorCategory::Storage);
    }
}
