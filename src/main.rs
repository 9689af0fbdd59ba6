use acoustic_calc::app::report;
use acoustic_calc::config::cli::{
    ClientCommand, Cli, Command, ComputeArgs, RoomCommand, SpeakerCommand,
};
use acoustic_calc::core::{CatalogStore, ConfigProvider};
use acoustic_calc::utils::error::ErrorSeverity;
use acoustic_calc::utils::{logger, validation::Validate};
use acoustic_calc::{
    AcousticError, AppConfig, CatalogFiles, ClientId, CsvCatalog, LocalStorage, SizingRequest,
    SizingService,
};
use clap::Parser;

type Service = SizingService<CsvCatalog<LocalStorage>>;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // 初始化日誌
    if cli.json_logs {
        logger::init_json_logger(cli.verbose);
    } else {
        logger::init_cli_logger(cli.verbose);
    }
    tracing::debug!("CLI args: {:?}", cli);

    if let Err(e) = run(cli).await {
        tracing::error!(
            "❌ Command failed: {} (Category: {:?}, Severity: {:?})",
            e,
            e.category(),
            e.severity()
        );
        tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 {}", e.recovery_suggestion());

        let exit_code = match e.severity() {
            ErrorSeverity::High => 1,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::Critical => 3,
        };
        std::process::exit(exit_code);
    }
}

async fn run(cli: Cli) -> Result<(), AcousticError> {
    let mut config = AppConfig::load(cli.config.as_deref())?;
    cli.apply_overrides(&mut config);
    config.validate()?;
    tracing::debug!("✅ Configuration loaded and validated");

    let storage = LocalStorage::new(config.data_dir());
    let catalog = CsvCatalog::new(storage, CatalogFiles::from_config(&config));
    let service = SizingService::new(catalog);

    match cli.command {
        Command::Compute(args) => compute(&service, &config, args).await,
        Command::Projects => {
            print!("{}", report::render_projects(&service.projects().await?));
            Ok(())
        }
        Command::Clients(ClientCommand::List) => {
            print!("{}", report::render_clients(&service.catalog().list_clients().await?));
            Ok(())
        }
        Command::Clients(ClientCommand::Add(args)) => {
            let client = service.register_client(args.into()).await?;
            println!("✅ Client saved as {}", client.id);
            Ok(())
        }
        Command::Rooms(RoomCommand::List) => {
            let rooms = service.catalog().list_room_profiles().await?;
            print!("{}", report::render_room_profiles(&rooms));
            Ok(())
        }
        Command::Rooms(RoomCommand::Add(args)) => {
            service.register_room_profile(args.into()).await?;
            println!("✅ Room profile added");
            Ok(())
        }
        Command::Speakers(SpeakerCommand::List) => {
            let speakers = service.catalog().list_loudspeaker_models().await?;
            print!("{}", report::render_loudspeakers(&speakers));
            Ok(())
        }
        Command::Speakers(SpeakerCommand::Add(args)) => {
            service.register_loudspeaker_model(args.into()).await?;
            println!("✅ Loudspeaker added");
            Ok(())
        }
        Command::Config => {
            display_config_summary(&config);
            Ok(())
        }
    }
}

async fn compute(service: &Service, config: &AppConfig, args: ComputeArgs) -> Result<(), AcousticError> {
    let request = SizingRequest {
        room_profile: args.room.clone(),
        loudspeaker_model: args.speaker.clone(),
        geometry: args.geometry(),
    };
    let sizing = service.size(&request).await?;

    if args.json {
        println!("{}", report::render_sizing_json(&sizing)?);
    } else {
        print!("{}", report::render_sizing(&sizing, config.full_report()));
    }

    if args.save {
        let client_id: ClientId = args
            .client
            .as_deref()
            .ok_or_else(|| AcousticError::invalid_input("client", "--save needs --client"))?
            .parse()?;
        let today = chrono::Local::now().date_naive();
        let project = service.save_project(client_id, &sizing, today).await?;
        println!("💾 Project {} saved", project.id);
    }

    Ok(())
}

fn display_config_summary(config: &AppConfig) {
    println!("📋 Configuration Summary:");
    println!("  Data directory: {}", config.data_dir());
    println!("  Rooms:          {}", config.rooms_file());
    println!("  Loudspeakers:   {}", config.speakers_file());
    println!("  Clients:        {}", config.clients_file());
    println!("  Projects:       {}", config.projects_file());
    println!("  Full report:    {}", config.full_report());
}
