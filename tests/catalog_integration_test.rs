use acoustic_calc::core::CatalogStore;
use acoustic_calc::{
    AcousticError, CatalogFiles, ClientDetails, CsvCatalog, LocalStorage, ReverbClass,
    RoomGeometry, SizingRequest, SizingService,
};
use anyhow::Result;
use chrono::NaiveDate;
use tempfile::TempDir;

fn service_in(dir: &TempDir) -> SizingService<CsvCatalog<LocalStorage>> {
    let storage = LocalStorage::new(dir.path());
    SizingService::new(CsvCatalog::new(storage, CatalogFiles::default()))
}

async fn seed_catalogs(dir: &TempDir) -> Result<()> {
    tokio::fs::write(
        dir.path().join("rooms.csv"),
        "name,target_spl,target_rt60,mean_absorption,standard_coverage_area\n\
         Auditorium,85,1.0,0.3,40\n\
         Studio,75,0.3,0.9,20\n",
    )
    .await?;
    tokio::fs::write(
        dir.path().join("speakers.csv"),
        "brand,model,kind,sensitivity,rated_power_rms,coverage_area\n\
         Yamaha,DZR12,active 12in,95,300,35\n",
    )
    .await?;
    Ok(())
}

/// 完整流程：讀取目錄、計算、建立客戶、儲存專案並重新開啟
#[tokio::test]
async fn test_end_to_end_sizing_with_csv_catalog() -> Result<()> {
    let temp_dir = TempDir::new()?;
    seed_catalogs(&temp_dir).await?;
    let service = service_in(&temp_dir);

    let sizing = service
        .size(&SizingRequest {
            room_profile: "Auditorium".to_string(),
            loudspeaker_model: "DZR12".to_string(),
            geometry: RoomGeometry::new(20.0, 10.0, 3.0),
        })
        .await?;
    assert_eq!(sizing.result.speaker_count_required, 6);
    assert!((sizing.result.total_power_required - 1800.0).abs() < 1e-9);
    assert_eq!(sizing.result.classification, ReverbClass::HighReverb);

    let client = service
        .register_client(ClientDetails {
            name: "Teatro Municipal".to_string(),
            contact: "contato@teatro.example".to_string(),
            city: "Santos".to_string(),
            state: "SP".to_string(),
            ..Default::default()
        })
        .await?;

    let date = NaiveDate::from_ymd_opt(2024, 5, 17).unwrap();
    let saved = service.save_project(client.id, &sizing, date).await?;
    assert_eq!(saved.id.to_string(), "P001");

    let content = tokio::fs::read_to_string(temp_dir.path().join("projects.csv")).await?;
    assert!(content.starts_with("id,client_id,room_profile,loudspeaker_model,"));
    assert!(content.contains("P001,C001,Auditorium,DZR12,85.0,"));

    // 重新開啟同一個目錄，紀錄必須還在
    let reopened = service_in(&temp_dir);
    let projects = reopened.projects().await?;
    assert_eq!(projects, vec![saved]);

    let clients = reopened.catalog().list_clients().await?;
    assert_eq!(clients.len(), 1);
    assert_eq!(clients[0].name, "Teatro Municipal");
    assert_eq!(clients[0].id, client.id);

    Ok(())
}

#[tokio::test]
async fn test_project_ids_continue_after_reopen() -> Result<()> {
    let temp_dir = TempDir::new()?;
    seed_catalogs(&temp_dir).await?;
    let date = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();

    let request = SizingRequest {
        room_profile: "Studio".to_string(),
        loudspeaker_model: "DZR12".to_string(),
        geometry: RoomGeometry::new(6.0, 5.0, 2.2),
    };

    let first = service_in(&temp_dir);
    let client = first
        .register_client(ClientDetails {
            name: "Estúdio Norte".to_string(),
            ..Default::default()
        })
        .await?;
    let sizing = first.size(&request).await?;
    assert_eq!(sizing.result.classification, ReverbClass::Dry);
    first.save_project(client.id, &sizing, date).await?;

    let second = service_in(&temp_dir);
    let sizing = second.size(&request).await?;
    let project = second.save_project(client.id, &sizing, date).await?;
    assert_eq!(project.id.to_string(), "P002");

    let ids: Vec<String> = second
        .projects()
        .await?
        .iter()
        .map(|p| p.id.to_string())
        .collect();
    assert_eq!(ids, vec!["P001", "P002"]);

    Ok(())
}

#[tokio::test]
async fn test_empty_data_dir_and_lookup_failures() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let service = service_in(&temp_dir);

    assert!(service.projects().await?.is_empty());
    assert!(service.catalog().list_room_profiles().await?.is_empty());

    let err = service
        .size(&SizingRequest {
            room_profile: "Auditorium".to_string(),
            loudspeaker_model: "DZR12".to_string(),
            geometry: RoomGeometry::new(20.0, 10.0, 3.0),
        })
        .await
        .unwrap_err();
    assert!(matches!(err, AcousticError::NotFound { entity: "Room profile", .. }));

    Ok(())
}

#[tokio::test]
async fn test_registered_records_are_usable_for_sizing() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let service = service_in(&temp_dir);

    service
        .register_room_profile(acoustic_calc::RoomProfile {
            name: "Church".to_string(),
            target_spl: 90.0,
            target_rt60: 1.8,
            mean_absorption: 0.15,
            standard_coverage_area: 60.0,
        })
        .await?;
    service
        .register_loudspeaker_model(acoustic_calc::LoudspeakerModel {
            brand: "JBL".to_string(),
            model: "EON715".to_string(),
            kind: "active 15in".to_string(),
            sensitivity: 96.0,
            rated_power_rms: 650.0,
            coverage_area: 40.0,
        })
        .await?;

    let duplicate = service
        .register_room_profile(acoustic_calc::RoomProfile {
            name: "Church".to_string(),
            target_spl: 85.0,
            target_rt60: 1.5,
            mean_absorption: 0.2,
            standard_coverage_area: 50.0,
        })
        .await;
    assert!(matches!(duplicate, Err(AcousticError::InvalidInput { .. })));

    let sizing = service
        .size(&SizingRequest {
            room_profile: "Church".to_string(),
            loudspeaker_model: "EON715".to_string(),
            geometry: RoomGeometry::new(30.0, 12.0, 8.0),
        })
        .await?;
    assert_eq!(sizing.result.speaker_count_required, 9);
    assert_eq!(sizing.result.classification, ReverbClass::HighReverb);

    let rooms = service.catalog().list_room_profiles().await?;
    assert_eq!(rooms.len(), 1);

    Ok(())
}
