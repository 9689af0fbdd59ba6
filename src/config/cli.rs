use crate::config::toml_config::AppConfig;
use crate::core::{ClientDetails, LoudspeakerModel, RoomGeometry, RoomProfile};
use clap::{Args, Parser, Subcommand};

#[derive(Debug, Clone, Parser)]
#[command(name = "acoustic-calc")]
#[command(about = "Loudspeaker sizing and room acoustics estimates for sound reinforcement")]
pub struct Cli {
    /// Path to TOML configuration file (defaults to ./acoustic-calc.toml when present)
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Override the directory holding the catalog CSV files
    #[arg(long, global = true)]
    pub data_dir: Option<String>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Size loudspeakers and estimate RT60 for a room
    Compute(ComputeArgs),
    /// List saved projects
    Projects,
    /// Manage clients
    #[command(subcommand)]
    Clients(ClientCommand),
    /// Manage room profiles
    #[command(subcommand)]
    Rooms(RoomCommand),
    /// Manage loudspeaker models
    #[command(subcommand)]
    Speakers(SpeakerCommand),
    /// Show the resolved configuration
    Config,
}

#[derive(Debug, Clone, Args)]
pub struct ComputeArgs {
    /// Room profile name
    #[arg(long)]
    pub room: String,

    /// Loudspeaker model
    #[arg(long)]
    pub speaker: String,

    /// Room length (m)
    #[arg(long)]
    pub length: f64,

    /// Room width (m)
    #[arg(long)]
    pub width: f64,

    /// Ceiling height (m)
    #[arg(long)]
    pub height: f64,

    /// Hide area, volume and propagation loss
    #[arg(long)]
    pub compact: bool,

    /// Print the result as JSON
    #[arg(long)]
    pub json: bool,

    /// Save the result as a new project
    #[arg(long, requires = "client")]
    pub save: bool,

    /// Client ID the project belongs to (e.g. C001)
    #[arg(long)]
    pub client: Option<String>,
}

impl ComputeArgs {
    pub fn geometry(&self) -> RoomGeometry {
        RoomGeometry::new(self.length, self.width, self.height)
    }
}

#[derive(Debug, Clone, Subcommand)]
pub enum ClientCommand {
    List,
    Add(ClientArgs),
}

#[derive(Debug, Clone, Args)]
pub struct ClientArgs {
    #[arg(long)]
    pub name: String,
    /// Phone or e-mail
    #[arg(long, default_value = "")]
    pub contact: String,
    #[arg(long, default_value = "")]
    pub address: String,
    #[arg(long, default_value = "")]
    pub city: String,
    #[arg(long, default_value = "")]
    pub state: String,
}

impl From<ClientArgs> for ClientDetails {
    fn from(args: ClientArgs) -> Self {
        Self {
            name: args.name,
            contact: args.contact,
            address: args.address,
            city: args.city,
            state: args.state,
        }
    }
}

#[derive(Debug, Clone, Subcommand)]
pub enum RoomCommand {
    List,
    Add(RoomArgs),
}

#[derive(Debug, Clone, Args)]
pub struct RoomArgs {
    #[arg(long)]
    pub name: String,
    /// Target SPL (dB, 60-110)
    #[arg(long, default_value = "85")]
    pub target_spl: f64,
    /// Target RT60 (s)
    #[arg(long, default_value = "1.0")]
    pub target_rt60: f64,
    /// Mean absorption coefficient (0-1]
    #[arg(long, default_value = "0.3")]
    pub absorption: f64,
    /// Standard coverage area (m²)
    #[arg(long, default_value = "40")]
    pub coverage: f64,
}

impl From<RoomArgs> for RoomProfile {
    fn from(args: RoomArgs) -> Self {
        Self {
            name: args.name,
            target_spl: args.target_spl,
            target_rt60: args.target_rt60,
            mean_absorption: args.absorption,
            standard_coverage_area: args.coverage,
        }
    }
}

#[derive(Debug, Clone, Subcommand)]
pub enum SpeakerCommand {
    List,
    Add(SpeakerArgs),
}

#[derive(Debug, Clone, Args)]
pub struct SpeakerArgs {
    #[arg(long)]
    pub brand: String,
    #[arg(long)]
    pub model: String,
    /// Free text, e.g. "active 12in"
    #[arg(long, default_value = "")]
    pub kind: String,
    /// Sensitivity (dB @ 1W/1m)
    #[arg(long, default_value = "95")]
    pub sensitivity: f64,
    /// Rated RMS power (W)
    #[arg(long, default_value = "300")]
    pub power: f64,
    /// Coverage area (m²)
    #[arg(long, default_value = "35")]
    pub coverage: f64,
}

impl From<SpeakerArgs> for LoudspeakerModel {
    fn from(args: SpeakerArgs) -> Self {
        Self {
            brand: args.brand,
            model: args.model,
            kind: args.kind,
            sensitivity: args.sensitivity,
            rated_power_rms: args.power,
            coverage_area: args.coverage,
        }
    }
}

impl Cli {
    /// 命令列參數覆蓋設定檔
    pub fn apply_overrides(&self, config: &mut AppConfig) {
        if let Some(data_dir) = &self.data_dir {
            config.storage.data_dir = data_dir.clone();
            tracing::info!("🔧 Data directory overridden to: {}", data_dir);
        }
        if let Command::Compute(args) = &self.command {
            if args.compact {
                config.report.full_mode = false;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ConfigProvider;

    #[test]
    fn test_parse_compute_command() {
        let cli = Cli::try_parse_from([
            "acoustic-calc",
            "compute",
            "--room",
            "Auditorium",
            "--speaker",
            "DZR12",
            "--length",
            "20",
            "--width",
            "10",
            "--height",
            "3",
            "--data-dir",
            "/tmp/catalog",
            "--compact",
        ])
        .unwrap();

        let Command::Compute(args) = &cli.command else {
            panic!("expected compute command");
        };
        assert_eq!(args.geometry(), RoomGeometry::new(20.0, 10.0, 3.0));
        assert!(!args.save);

        let mut config = AppConfig::default();
        cli.apply_overrides(&mut config);
        assert_eq!(config.data_dir(), "/tmp/catalog");
        assert!(!config.full_report());
    }

    #[test]
    fn test_save_requires_client() {
        let result = Cli::try_parse_from([
            "acoustic-calc", "compute", "--room", "A", "--speaker", "B", "--length", "20",
            "--width", "10", "--height", "3", "--save",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_add_speaker() {
        let cli = Cli::try_parse_from([
            "acoustic-calc", "speakers", "add", "--brand", "JBL", "--model", "EON715",
            "--power", "650",
        ])
        .unwrap();

        let Command::Speakers(SpeakerCommand::Add(args)) = cli.command else {
            panic!("expected speakers add");
        };
        let model = LoudspeakerModel::from(args);
        assert_eq!(model.rated_power_rms, 650.0);
        assert_eq!(model.sensitivity, 95.0);
    }
}
