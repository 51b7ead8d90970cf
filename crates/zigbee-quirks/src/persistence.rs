//! Custom quirk files (JSON array of descriptors)

use crate::error::QuirkError;
use crate::quirk::QuirkDescriptor;
use std::path::Path;
use tokio::fs;

/// Read quirks from a JSON file, failing on I/O or parse errors
#[allow(clippy::missing_errors_doc)]
pub async fn read_quirks(path: &Path) -> Result<Vec<QuirkDescriptor>, QuirkError> {
    let contents = fs::read_to_string(path).await?;
    Ok(serde_json::from_str(&contents)?)
}

/// Load user-defined quirks for registry startup
///
/// A missing file yields no quirks; an unreadable or malformed one is logged
/// and ignored so the built-in quirks still load.
pub async fn load_custom_quirks(path: &Path) -> Vec<QuirkDescriptor> {
    match read_quirks(path).await {
        Ok(quirks) => {
            tracing::info!("Loaded {} custom quirks from {:?}", quirks.len(), path);
            quirks
        }
        Err(QuirkError::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!("No custom quirks file at {:?}", path);
            Vec::new()
        }
        Err(e) => {
            tracing::warn!("Ignoring custom quirks file {:?}: {}", path, e);
            Vec::new()
        }
    }
}

/// Export quirks as a JSON file usable as a custom quirks file
///
/// The file is replaced atomically through a `.json.tmp` sibling.
#[allow(clippy::missing_errors_doc)]
pub async fn save_quirks(path: &Path, quirks: &[QuirkDescriptor]) -> Result<(), QuirkError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).await?;
    }

    let json = serde_json::to_string_pretty(quirks)?;
    let tmp_path = path.with_extension("json.tmp");
    fs::write(&tmp_path, &json).await?;
    fs::rename(&tmp_path, path).await?;

    tracing::debug!("Exported {} quirks to {:?}", quirks.len(), path);
    Ok(())
}
