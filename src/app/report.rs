use crate::core::service::Sizing;
use crate::core::{Client, LoudspeakerModel, Project, RoomProfile};
use crate::utils::error::Result;

/// 文字報告；`full_mode` 額外顯示面積、體積、傳播損失等數據
pub fn render_sizing(sizing: &Sizing, full_mode: bool) -> String {
    let result = &sizing.result;

    let mut lines = vec![
        "📈 Results".to_string(),
        format!(
            "  Room profile:      {} (target {:.0} dB, RT60 {:.1} s)",
            sizing.room.name, sizing.room.target_spl, sizing.room.target_rt60
        ),
        format!(
            "  Loudspeaker:       {} {}",
            sizing.speaker.brand, sizing.speaker.model
        ),
    ];

    if full_mode {
        lines.push(format!("  Area:              {:.1} m²", result.area));
        lines.push(format!("  Volume:            {:.1} m³", result.volume));
        lines.push(format!("  Propagation loss:  {:.1} dB", result.propagation_loss));
        lines.push(format!("  SPL deficit:       {:.1} dB", result.spl_deficit));
        lines.push(format!(
            "  Power per unit:    {:.0} W",
            result.required_power_per_unit
        ));
    }

    lines.push(format!("  Adjusted SPL:      {:.1} dB", result.adjusted_spl));
    lines.push(format!("  Speakers needed:   {}", result.speaker_count_required));
    lines.push(format!("  Total power:       {:.0} W", result.total_power_required));
    lines.push(format!("  RT60:              {:.2} s", result.reverberation_time));
    lines.push(format!(
        "  Classification:    {} ({})",
        result.classification.label(),
        result.classification
    ));

    join_lines(lines)
}

pub fn render_sizing_json(sizing: &Sizing) -> Result<String> {
    Ok(serde_json::to_string_pretty(sizing)?)
}

pub fn render_projects(projects: &[Project]) -> String {
    if projects.is_empty() {
        return "No saved projects yet.\n".to_string();
    }

    let header = format!(
        "{:<8} {:<8} {:<20} {:<16} {:<12} {}",
        "ID", "Client", "Room", "Loudspeaker", "Class", "Date"
    );
    let rows = projects.iter().map(|p| {
        format!(
            "{:<8} {:<8} {:<20} {:<16} {:<12} {}",
            p.id.to_string(),
            p.client_id.to_string(),
            p.room_profile,
            p.loudspeaker_model,
            p.classification.code(),
            p.created_on.format("%Y-%m-%d")
        )
    });
    join_lines(std::iter::once(header).chain(rows))
}

pub fn render_clients(clients: &[Client]) -> String {
    if clients.is_empty() {
        return "No clients registered yet.\n".to_string();
    }

    join_lines(clients.iter().map(|c| {
        format!(
            "{}  {}  {}  {}/{}",
            c.id, c.name, c.contact, c.city, c.state
        )
    }))
}

pub fn render_room_profiles(rooms: &[RoomProfile]) -> String {
    join_lines(rooms.iter().map(|r| {
        format!(
            "{:<20} SPL {:>5.1} dB  RT60 {:.1} s  α {:.2}  {:.0} m²",
            r.name, r.target_spl, r.target_rt60, r.mean_absorption, r.standard_coverage_area
        )
    }))
}

pub fn render_loudspeakers(speakers: &[LoudspeakerModel]) -> String {
    join_lines(speakers.iter().map(|s| {
        format!(
            "{:<16} {:<12} {:>5.1} dB  {:>6.0} W  {:>5.0} m²  {}",
            s.model, s.brand, s.sensitivity, s.rated_power_rms, s.coverage_area, s.kind
        )
    }))
}

/// 每一行以換行結尾
fn join_lines<I: IntoIterator<Item = String>>(lines: I) -> String {
    lines.into_iter().map(|line| line + "\n").collect()
}
