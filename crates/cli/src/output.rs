//! Terminal rendering of run events and on-disk asset output.

use cf_core::naming::file_safe;
use cf_protocol::asset_models::Asset;
use cf_protocol::ipc::Event;
use cf_protocol::log_models::LogStatus;
use cf_protocol::run_models::RunState;
use colored::Colorize;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

pub fn success(message: &str) -> String {
    message.green().bold().to_string()
}

/// One printable line per event; `None` for events the log already covers.
pub fn format_event(event: &Event) -> Option<String> {
    match event {
        Event::RunStarted { topic, .. } => {
            Some(format!("Generating content for \"{topic}\"").bold().to_string())
        }
        Event::StageStarted { .. } => None,
        Event::LogAppended { entry, .. } => Some(match entry.status {
            LogStatus::Info => format!("  {}", entry.message).blue().to_string(),
            LogStatus::Pending => format!("  {}", entry.message).yellow().to_string(),
            LogStatus::Success => format!("  {}", entry.message).green().to_string(),
            LogStatus::Error => format!("  {}", entry.message).red().to_string(),
        }),
        Event::ProgressUpdated { progress, .. } => {
            Some(format!("  [{progress:5.1}%]").dimmed().to_string())
        }
        Event::AssetCreated { asset, .. } => {
            let location = asset.remote_url.as_deref().unwrap_or("not uploaded");
            Some(format!(
                "  + {} {} ({} bytes, {location})",
                asset.kind.label(),
                asset.name,
                asset.size()
            ))
        }
        Event::RunCompleted { .. } => Some(success("Done.")),
        Event::RunFailed { error, .. } => {
            Some(format!("Run failed: {error}").red().bold().to_string())
        }
        Event::RunRefused { reason, .. } => {
            Some(format!("Run refused: {reason}").red().bold().to_string())
        }
    }
}

/// Asset summary, most recent first.
pub fn asset_table(state: &RunState) -> Vec<String> {
    state
        .assets_newest_first()
        .map(|asset| {
            format!(
                "{:<10} {:<60} {}",
                asset.kind.label(),
                asset.name,
                asset.remote_url.as_deref().unwrap_or("-")
            )
        })
        .collect()
}

/// Write every asset payload into `dir`, creating it if needed.
pub fn write_assets(dir: &Path, assets: &[Asset]) -> io::Result<Vec<PathBuf>> {
    fs::create_dir_all(dir)?;
    assets
        .iter()
        .map(|asset| {
            let path = dir.join(file_safe(&asset.name));
            fs::write(&path, &asset.data)?;
            Ok(path)
        })
        .collect()
}
