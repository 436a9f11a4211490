//! Main application state

use std::path::Path;
use std::sync::Arc;
use tracing::info;
use versecast_core::{EditorConfig, EditorSession, SqliteThemeGateway, Storage, ThemeVariant};

/// Backend services shared by every command
pub struct AppState {
    /// Database storage
    pub storage: Arc<Storage>,
    /// Theme store and display broadcast
    pub gateway: SqliteThemeGateway,
    /// Editor settings loaded at startup
    pub config: EditorConfig,
}

impl AppState {
    pub fn open(data_dir: &Path) -> anyhow::Result<Self> {
        let storage = Arc::new(Storage::new_with_path(data_dir)?);
        Ok(Self::with_storage(storage))
    }

    pub fn with_storage(storage: Arc<Storage>) -> Self {
        let config = storage.load_editor_config();
        info!(
            "Editor config: saved status {}ms, {} boxes max",
            config.saved_status_display_ms,
            config.box_capacity()
        );
        let gateway = SqliteThemeGateway::new(storage.clone());

        Self {
            storage,
            gateway,
            config,
        }
    }

    /// Open a stored theme for editing
    pub async fn open_session(&self, variant: ThemeVariant, id: &str) -> EditorSession {
        EditorSession::open(&self.gateway, variant, id, self.config.clone()).await
    }

    pub fn new_session(&self, variant: ThemeVariant) -> EditorSession {
        EditorSession::new(variant, self.config.clone())
    }
}
