use crate::core::{LoudspeakerModel, ReverbClass, RoomGeometry, RoomProfile, SizingResult};
use crate::utils::error::{AcousticError, Result};
use crate::utils::validation::Validate;

/// Sabine constant (s/m).
pub const SABINE_CONSTANT: f64 = 0.161;

/// Every +3 dB doubles the electrical power.
pub const DB_PER_POWER_DOUBLING: f64 = 3.0;

/// Free-field inverse-square loss from 1 m to `distance` meters.
pub fn propagation_loss(distance: f64) -> Result<f64> {
    if !(distance > 0.0) {
        return Err(AcousticError::invalid_input(
            "length",
            format!("listening distance must be greater than zero, got {}", distance),
        ));
    }
    Ok(20.0 * distance.log10())
}

/// Sabine reverberation time.
pub fn sabine_rt60(volume: f64, area: f64, mean_absorption: f64) -> Result<f64> {
    let absorption = area * mean_absorption;
    if !(absorption > 0.0) {
        return Err(AcousticError::invalid_input(
            "mean_absorption",
            format!("absorbing area must be greater than zero, got {}", absorption),
        ));
    }
    Ok(SABINE_CONSTANT * volume / absorption)
}

/// 聲壓級與喇叭數量、功率及殘響時間的估算。
///
/// 聆聽距離取房間長度的一半。任何輸入不合法時整個計算失敗，不回傳部分結果。
pub fn compute(
    geometry: &RoomGeometry,
    room: &RoomProfile,
    speaker: &LoudspeakerModel,
) -> Result<SizingResult> {
    geometry.validate()?;
    room.validate()?;
    speaker.validate()?;

    let area = geometry.area();
    let volume = geometry.volume();

    let mean_distance = geometry.length / 2.0;
    let propagation_loss = propagation_loss(mean_distance)?;

    let adjusted_spl =
        speaker.sensitivity + 10.0 * speaker.rated_power_rms.log10() - propagation_loss;
    let spl_deficit = (room.target_spl - adjusted_spl).max(0.0);
    let required_power_per_unit =
        speaker.rated_power_rms * 2f64.powf(spl_deficit / DB_PER_POWER_DOUBLING);

    let speaker_count_required = speaker_count(area, speaker.coverage_area)?;
    let total_power_required = required_power_per_unit * f64::from(speaker_count_required);

    let reverberation_time = sabine_rt60(volume, area, room.mean_absorption)?;
    let classification = ReverbClass::from_rt60(reverberation_time);

    ensure_finite("area", area)?;
    ensure_finite("ceiling_height", volume)?;
    ensure_finite("sensitivity", adjusted_spl)?;
    ensure_finite("rated_power_rms", total_power_required)?;
    ensure_finite("mean_absorption", reverberation_time)?;

    tracing::debug!(
        area,
        volume,
        adjusted_spl,
        spl_deficit,
        speaker_count_required,
        total_power_required,
        reverberation_time,
        "sizing computed"
    );

    Ok(SizingResult {
        area,
        volume,
        propagation_loss,
        adjusted_spl,
        spl_deficit,
        required_power_per_unit,
        speaker_count_required,
        total_power_required,
        reverberation_time,
        classification,
    })
}

/// `ceil(area / coverage_area)`, at least 1.
pub fn speaker_count(area: f64, coverage_area: f64) -> Result<u32> {
    let units = (area / coverage_area).ceil().max(1.0);
    if !units.is_finite() || units > f64::from(u32::MAX) {
        return Err(AcousticError::invalid_input(
            "coverage_area",
            format!(
                "{} m² over {} m² per unit needs {} units, more than {} supported",
                area,
                coverage_area,
                units,
                u32::MAX
            ),
        ));
    }
    Ok(units as u32)
}

fn ensure_finite(field: &str, value: f64) -> Result<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(AcousticError::invalid_input(
            field,
            format!("value produces a non-finite result ({})", value),
        ))
    }
}
