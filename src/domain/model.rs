use crate::utils::error::{AcousticError, Result};
use crate::utils::validation::{
    validate_half_open_range, validate_non_empty_string, validate_positive, validate_range,
    Validate,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// 室內類型：目標聲壓級、目標殘響時間、平均吸音係數
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoomProfile {
    pub name: String,
    /// dB
    pub target_spl: f64,
    /// 秒
    pub target_rt60: f64,
    pub mean_absorption: f64,
    /// m²
    pub standard_coverage_area: f64,
}

impl RoomProfile {
    pub const MIN_TARGET_SPL: f64 = 60.0;
    pub const MAX_TARGET_SPL: f64 = 110.0;
}

impl Validate for RoomProfile {
    fn validate(&self) -> Result<()> {
        validate_non_empty_string("name", &self.name)?;
        validate_range(
            "target_spl",
            self.target_spl,
            Self::MIN_TARGET_SPL,
            Self::MAX_TARGET_SPL,
        )?;
        validate_positive("target_rt60", self.target_rt60)?;
        validate_half_open_range("mean_absorption", self.mean_absorption, 0.0, 1.0)?;
        validate_positive("standard_coverage_area", self.standard_coverage_area)?;
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoudspeakerModel {
    pub brand: String,
    pub model: String,
    /// 例如 "active 12in"
    #[serde(default)]
    pub kind: String,
    /// dB @ 1W/1m
    pub sensitivity: f64,
    /// W
    pub rated_power_rms: f64,
    /// m²
    pub coverage_area: f64,
}

impl Validate for LoudspeakerModel {
    fn validate(&self) -> Result<()> {
        validate_non_empty_string("brand", &self.brand)?;
        validate_non_empty_string("model", &self.model)?;
        validate_positive("sensitivity", self.sensitivity)?;
        validate_positive("rated_power_rms", self.rated_power_rms)?;
        validate_positive("coverage_area", self.coverage_area)?;
        Ok(())
    }
}

/// Room dimensions in meters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RoomGeometry {
    pub length: f64,
    pub width: f64,
    pub ceiling_height: f64,
}

impl RoomGeometry {
    pub fn new(length: f64, width: f64, ceiling_height: f64) -> Self {
        Self {
            length,
            width,
            ceiling_height,
        }
    }

    pub fn area(&self) -> f64 {
        self.length * self.width
    }

    pub fn volume(&self) -> f64 {
        self.area() * self.ceiling_height
    }
}

impl Validate for RoomGeometry {
    fn validate(&self) -> Result<()> {
        validate_positive("length", self.length)?;
        validate_positive("width", self.width)?;
        validate_positive("ceiling_height", self.ceiling_height)?;
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReverbClass {
    Dry,
    Adequate,
    HighReverb,
}

impl ReverbClass {
    pub const DRY_BELOW: f64 = 0.4;
    pub const HIGH_ABOVE: f64 = 1.5;

    /// 0.4 與 1.5 兩個邊界值都屬於 `Adequate`
    pub fn from_rt60(reverberation_time: f64) -> Self {
        if reverberation_time > Self::HIGH_ABOVE {
            Self::HighReverb
        } else if reverberation_time < Self::DRY_BELOW {
            Self::Dry
        } else {
            Self::Adequate
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Self::Dry => "DRY",
            Self::Adequate => "ADEQUATE",
            Self::HighReverb => "HIGH_REVERB",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Dry => "Dry room",
            Self::Adequate => "Adequate acoustics",
            Self::HighReverb => "High reverberation",
        }
    }
}

impl fmt::Display for ReverbClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SizingResult {
    pub area: f64,
    pub volume: f64,
    pub propagation_loss: f64,
    pub adjusted_spl: f64,
    pub spl_deficit: f64,
    pub required_power_per_unit: f64,
    pub speaker_count_required: u32,
    pub total_power_required: f64,
    pub reverberation_time: f64,
    pub classification: ReverbClass,
}

/// Sequential identifier rendered with a one-letter prefix and three padded digits.
macro_rules! sequential_id {
    ($name:ident, $prefix:literal) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(u32);

        impl $name {
            pub const PREFIX: char = $prefix;

            pub fn new(value: u32) -> Self {
                Self(value)
            }

            pub fn value(&self) -> u32 {
                self.0
            }

            /// 目前最大編號 + 1，沒有紀錄時從 1 開始
            pub fn next_after<I: IntoIterator<Item = Self>>(existing: I) -> Self {
                Self(existing.into_iter().map(|id| id.0).max().unwrap_or(0) + 1)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}{:03}", Self::PREFIX, self.0)
            }
        }

        impl FromStr for $name {
            type Err = AcousticError;

            fn from_str(s: &str) -> Result<Self> {
                let trimmed = s.trim();
                let digits = trimmed
                    .strip_prefix(Self::PREFIX)
                    .or_else(|| trimmed.strip_prefix(Self::PREFIX.to_ascii_lowercase()))
                    .ok_or_else(|| {
                        AcousticError::invalid_input(
                            stringify!($name),
                            format!("'{}' must start with '{}'", trimmed, Self::PREFIX),
                        )
                    })?;
                let value = digits.parse::<u32>().map_err(|e| {
                    AcousticError::invalid_input(
                        stringify!($name),
                        format!("'{}' is not a valid identifier: {}", trimmed, e),
                    )
                })?;
                Ok(Self(value))
            }
        }

        impl TryFrom<String> for $name {
            type Error = AcousticError;

            fn try_from(value: String) -> Result<Self> {
                value.parse()
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> String {
                id.to_string()
            }
        }
    };
}

sequential_id!(ClientId, 'C');
sequential_id!(ProjectId, 'P');

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Client {
    pub id: ClientId,
    pub name: String,
    #[serde(default)]
    pub contact: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub state: String,
}

/// 新客戶資料，編號由服務層分配
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClientDetails {
    pub name: String,
    pub contact: String,
    pub address: String,
    pub city: String,
    pub state: String,
}

impl ClientDetails {
    pub fn into_client(self, id: ClientId) -> Client {
        Client {
            id,
            name: self.name,
            contact: self.contact,
            address: self.address,
            city: self.city,
            state: self.state,
        }
    }
}

impl Validate for ClientDetails {
    fn validate(&self) -> Result<()> {
        validate_non_empty_string("name", &self.name)
    }
}

/// A saved sizing. Written once, never updated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub id: ProjectId,
    pub client_id: ClientId,
    pub room_profile: String,
    pub loudspeaker_model: String,
    pub target_spl: f64,
    pub adjusted_spl: f64,
    pub total_power: f64,
    pub rt60: f64,
    pub classification: ReverbClass,
    pub created_on: NaiveDate,
}

impl Project {
    pub fn from_sizing(
        id: ProjectId,
        client_id: ClientId,
        room: &RoomProfile,
        speaker: &LoudspeakerModel,
        result: &SizingResult,
        created_on: NaiveDate,
    ) -> Self {
        Self {
            id,
            client_id,
            room_profile: room.name.clone(),
            loudspeaker_model: speaker.model.clone(),
            target_spl: room.target_spl,
            adjusted_spl: result.adjusted_spl,
            total_power: result.total_power_required,
            rt60: result.reverberation_time,
            classification: result.classification,
            created_on,
        }
    }
}
