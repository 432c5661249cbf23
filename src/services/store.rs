use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

use tokio::fs;
use tracing::warn;

use crate::{error::AppError, models::trip::TripRecord};

const TOKEN_FILE: &str = "access_token";
const TRIP_ID_FILE: &str = "current_trip_id";
const TRIP_FILE: &str = "current_trip.json";

/// File-backed stand-in for the browser's local storage. Exactly three
/// values survive across page loads: the bearer token, the current trip id
/// and the current trip snapshot. Everything else is refetched.
#[derive(Clone)]
pub struct StateStore {
    root: Arc<PathBuf>,
}

impl StateStore {
    pub fn new(root: PathBuf) -> Self {
        Self {
            root: Arc::new(root),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub async fn ensure_structure(&self) -> Result<(), AppError> {
        fs::create_dir_all(self.root()).await?;
        Ok(())
    }

    pub async fn load_token(&self) -> Result<Option<String>, AppError> {
        match self.read_file(TOKEN_FILE).await? {
            Some(raw) => {
                let token = String::from_utf8_lossy(&raw).trim().to_string();
                Ok((!token.is_empty()).then_some(token))
            }
            None => Ok(None),
        }
    }

    pub async fn save_token(&self, token: &str) -> Result<(), AppError> {
        self.ensure_structure().await?;
        fs::write(self.root().join(TOKEN_FILE), token.as_bytes()).await?;
        Ok(())
    }

    pub async fn load_current_trip_id(&self) -> Result<Option<i64>, AppError> {
        match self.read_file(TRIP_ID_FILE).await? {
            Some(raw) => Ok(String::from_utf8_lossy(&raw).trim().parse().ok()),
            None => Ok(None),
        }
    }

    /// Loads the persisted snapshot. A corrupt snapshot is treated as
    /// absent rather than fatal: the cache is never the source of truth,
    /// so the worst case is one extra authoritative fetch.
    pub async fn load_current_trip(&self) -> Result<Option<TripRecord>, AppError> {
        let Some(raw) = self.read_file(TRIP_FILE).await? else {
            return Ok(None);
        };
        match serde_json::from_slice(&raw) {
            Ok(trip) => Ok(Some(trip)),
            Err(err) => {
                warn!("discarding unreadable trip snapshot: {err}");
                Ok(None)
            }
        }
    }

    /// Persists the snapshot and the id pointer together so they cannot
    /// drift apart across page loads.
    pub async fn save_current_trip(&self, trip: &TripRecord) -> Result<(), AppError> {
        self.ensure_structure().await?;
        let data =
            serde_json::to_vec_pretty(trip).map_err(|err| AppError::Other(err.into()))?;
        fs::write(self.root().join(TRIP_FILE), data).await?;
        fs::write(self.root().join(TRIP_ID_FILE), trip.id.to_string()).await?;
        Ok(())
    }

    pub async fn clear_current_trip(&self) -> Result<(), AppError> {
        self.remove_file(TRIP_FILE).await?;
        self.remove_file(TRIP_ID_FILE).await?;
        Ok(())
    }

    /// Logout path: drops the token and the active-trip pointer.
    pub async fn clear(&self) -> Result<(), AppError> {
        self.remove_file(TOKEN_FILE).await?;
        self.clear_current_trip().await?;
        Ok(())
    }

    async fn read_file(&self, name: &str) -> Result<Option<Vec<u8>>, AppError> {
        let path = self.root().join(name);
        if !fs::try_exists(&path).await? {
            return Ok(None);
        }
        let raw = fs::read(&path).await?;
        if raw.is_empty() {
            return Ok(None);
        }
        Ok(Some(raw))
    }

    async fn remove_file(&self, name: &str) -> Result<(), AppError> {
        let path = self.root().join(name);
        match fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }
}
