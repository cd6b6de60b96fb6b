use crate::models::Records;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::fs;
use tracing::{error, info};

#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("failed to read records snapshot {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse records snapshot {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Reads the records snapshot. A missing file is an empty program, not an error.
pub async fn read_records(path: &Path) -> Result<Records, SnapshotError> {
    let bytes = match fs::read(path).await {
        Ok(bytes) => bytes,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            info!(path = %path.display(), "no records snapshot yet, starting empty");
            return Ok(Records::default());
        }
        Err(source) => {
            return Err(SnapshotError::Read {
                path: path.to_path_buf(),
                source,
            });
        }
    };

    serde_json::from_slice(&bytes).map_err(|source| SnapshotError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

/// Startup load: a broken snapshot is logged and replaced by empty records so
/// the dashboards still come up.
pub async fn load_records(path: &Path) -> Records {
    match read_records(path).await {
        Ok(records) => records,
        Err(err) => {
            error!("{err}");
            Records::default()
        }
    }
}
