//! Group descriptor persistence

use std::path::Path;

use frostgen_dkg::FrostGroup;
use tracing::{error, info};

use crate::error::{CliError, Result};

/// Write the group descriptor as compact JSON
///
/// Written once, after a round is accepted. A failure here loses the
/// generated keys, so it is logged at `error` before being returned.
pub fn write_group(path: &Path, group: &FrostGroup) -> Result<()> {
    let json = serde_json::to_string(group)?;

    if let Err(source) = std::fs::write(path, json) {
        error!(path = %path.display(), error = %source, "Failed to write frost group");
        return Err(CliError::Persistence {
            path: path.to_path_buf(),
            source,
        });
    }

    info!(path = %path.display(), gkx = %group.gkx, "Wrote frost group");
    Ok(())
}

/// Read back a previously written descriptor
pub fn read_group(path: &Path) -> Result<FrostGroup> {
    let content = std::fs::read_to_string(path).map_err(|source| CliError::Persistence {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(serde_json::from_str(&content)?)
}
