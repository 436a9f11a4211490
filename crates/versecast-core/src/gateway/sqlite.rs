//! [`ThemeGateway`] backed by the local SQLite store

use super::{ThemeBroadcast, ThemeGateway};
use crate::error::{Error, LoadError, PersistenceError, Result};
use crate::storage::{self, Storage};
use crate::types::{ThemeRecord, ThemeVariant};
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::{debug, info};

const BROADCAST_CAPACITY: usize = 16;

/// Stores themes in SQLite and announces applied themes to subscribers
pub struct SqliteThemeGateway {
    storage: Arc<Storage>,
    broadcast_tx: broadcast::Sender<ThemeBroadcast>,
}

impl SqliteThemeGateway {
    pub fn new(storage: Arc<Storage>) -> Self {
        let (broadcast_tx, _) = broadcast::channel(BROADCAST_CAPACITY);
        Self {
            storage,
            broadcast_tx,
        }
    }

    /// Receive every theme applied from now on
    pub fn subscribe(&self) -> broadcast::Receiver<ThemeBroadcast> {
        self.broadcast_tx.subscribe()
    }

    pub fn storage(&self) -> &Arc<Storage> {
        &self.storage
    }
}

#[async_trait]
impl ThemeGateway for SqliteThemeGateway {
    async fn fetch(&self, variant: ThemeVariant, id: &str) -> Result<Option<serde_json::Value>> {
        let conn = self
            .storage
            .connection()
            .map_err(|e| LoadError::Transport(e.to_string()))?;
        let stored = storage::get_theme(&conn, variant, id)
            .map_err(|e| LoadError::Transport(e.to_string()))?;

        Ok(stored.map(|theme| theme.into_raw_record()))
    }

    async fn create(&self, variant: ThemeVariant, payload: &ThemeRecord) -> Result<String> {
        let id = uuid::Uuid::new_v4().to_string();
        let conn = self
            .storage
            .connection()
            .map_err(|e| PersistenceError::CreateFailed(e.to_string()))?;
        storage::insert_theme(&conn, variant, &id, payload, false)
            .map_err(|e| PersistenceError::CreateFailed(e.to_string()))?;

        info!("Created {} theme '{}' ({})", variant, payload.name, id);
        Ok(id)
    }

    async fn update(&self, variant: ThemeVariant, id: &str, payload: &ThemeRecord) -> Result<()> {
        let update_failed = |reason: String| {
            Error::from(PersistenceError::UpdateFailed {
                id: id.to_string(),
                reason,
            })
        };

        let conn = self
            .storage
            .connection()
            .map_err(|e| update_failed(e.to_string()))?;
        let updated = storage::update_theme(&conn, variant, id, payload)
            .map_err(|e| update_failed(e.to_string()))?;
        if !updated {
            return Err(update_failed(format!(
                "no editable theme in {}",
                variant.namespace()
            )));
        }

        debug!("Updated {} theme {}", variant, id);
        Ok(())
    }

    async fn apply(&self, variant: ThemeVariant, record: &ThemeRecord) -> Result<()> {
        let id = record.id.clone().ok_or_else(|| PersistenceError::ApplyFailed {
            id: String::new(),
            reason: "record has no id".to_string(),
        })?;
        let apply_failed = |reason: String| {
            Error::from(PersistenceError::ApplyFailed {
                id: id.clone(),
                reason,
            })
        };

        let conn = self
            .storage
            .connection()
            .map_err(|e| apply_failed(e.to_string()))?;
        storage::set_active_theme(&conn, variant, &id).map_err(|e| apply_failed(e.to_string()))?;

        let message = ThemeBroadcast {
            variant,
            theme: record.clone(),
            applied_at: chrono::Utc::now(),
        };
        match self.broadcast_tx.send(message) {
            Ok(receivers) => info!("Applied {} theme {} to {} display(s)", variant, id, receivers),
            Err(_) => debug!("Applied {} theme {} with no displays listening", variant, id),
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editor::EditorSession;
    use crate::normalize::to_write_payload;
    use crate::storage::builtin_theme_id;
    use crate::types::{EditorConfig, LinePosition, SaveStatus, Theme};
    use pretty_assertions::assert_eq;

    fn gateway() -> SqliteThemeGateway {
        SqliteThemeGateway::new(Arc::new(Storage::in_memory().unwrap()))
    }

    fn payload(name: &str) -> ThemeRecord {
        let mut theme = Theme::new_default(ThemeVariant::Song);
        theme.name = name.to_string();
        to_write_payload(&theme)
    }

    #[tokio::test]
    async fn test_create_then_fetch() {
        let gateway = gateway();
        let id = gateway.create(ThemeVariant::Song, &payload("Chorus")).await.unwrap();

        let raw = gateway.fetch(ThemeVariant::Song, &id).await.unwrap().unwrap();
        assert_eq!(raw["id"], id.as_str());
        assert_eq!(raw["name"], "Chorus");
        assert_eq!(raw["isBuiltIn"], false);

        assert!(gateway.fetch(ThemeVariant::Bible, &id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_update_of_built_in_fails() {
        let gateway = gateway();
        let id = builtin_theme_id(ThemeVariant::Song);

        let err = gateway
            .update(ThemeVariant::Song, &id, &payload("Hacked"))
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            Error::Persistence(PersistenceError::UpdateFailed { .. })
        ));
    }

    #[tokio::test]
    async fn test_apply_requires_id() {
        let gateway = gateway();
        let err = gateway
            .apply(ThemeVariant::Song, &payload("Anonymous"))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            Error::Persistence(PersistenceError::ApplyFailed { .. })
        ));
    }

    #[tokio::test]
    async fn test_apply_of_unknown_theme_fails() {
        let gateway = gateway();
        let record = payload("Ghost").with_id("missing");
        assert!(gateway.apply(ThemeVariant::Song, &record).await.is_err());
    }

    #[tokio::test]
    async fn test_apply_broadcasts_and_activates() {
        let gateway = gateway();
        let mut rx = gateway.subscribe();
        let id = gateway.create(ThemeVariant::Song, &payload("Bridge")).await.unwrap();
        let record = payload("Bridge").with_id(id.clone());

        gateway.apply(ThemeVariant::Song, &record).await.unwrap();

        let message = rx.recv().await.unwrap();
        assert_eq!(message.variant, ThemeVariant::Song);
        assert_eq!(message.theme, record);

        let conn = gateway.storage().connection().unwrap();
        assert_eq!(
            storage::get_active_theme(&conn, ThemeVariant::Song).unwrap(),
            Some(id)
        );
    }

    #[test]
    fn test_session_saves_through_store() {
        tokio_test::block_on(async {
            let gateway = gateway();
            let mut rx = gateway.subscribe();

            let mut session = EditorSession::new(ThemeVariant::Bible, EditorConfig::default());
            session.set_name("Sunday Service");
            session.set_position("reference", LinePosition::new(50.0, 90.0, 40.0, 6.0));
            session.add_box().unwrap();
            session.save(&gateway).await.unwrap();

            assert_eq!(session.save_status(), SaveStatus::Saved);
            assert!(!session.is_dirty());
            let id = session.theme().id.clone();
            assert!(!id.is_empty());
            assert_eq!(rx.recv().await.unwrap().theme.id, Some(id.clone()));

            let reopened =
                EditorSession::open(&gateway, ThemeVariant::Bible, &id, EditorConfig::default())
                    .await;
            assert_eq!(reopened.theme(), session.theme());

            // Second save updates in place
            session.set_name("Sunday Evening");
            session.save(&gateway).await.unwrap();
            assert_eq!(session.theme().id, id);
            let conn = gateway.storage().connection().unwrap();
            assert_eq!(storage::list_themes(&conn, ThemeVariant::Bible).unwrap().len(), 2);
        });
    }

    #[tokio::test]
    async fn test_overlapping_saves_of_new_theme_share_one_record() {
        let gateway = gateway();
        let mut session = EditorSession::new(ThemeVariant::Song, EditorConfig::default());

        session.set_name("A");
        let first = session.begin_save().unwrap();
        session.set_name("B");
        let second = session.begin_save().unwrap();

        let (first_outcome, second_outcome) =
            tokio::join!(first.submit(&gateway), second.submit(&gateway));
        session.finish_save(first, first_outcome).unwrap();
        session.finish_save(second, second_outcome).unwrap();

        let conn = gateway.storage().connection().unwrap();
        let user_themes: Vec<_> = storage::list_themes(&conn, ThemeVariant::Song)
            .unwrap()
            .into_iter()
            .filter(|t| !t.is_built_in)
            .collect();
        assert_eq!(user_themes.len(), 1);
        assert_eq!(user_themes[0].id, session.theme().id);
        assert_eq!(user_themes[0].name, "B");
        assert!(!session.is_dirty());
    }

    #[tokio::test]
    async fn test_open_built_in_is_read_only() {
        let gateway = gateway();
        let id = builtin_theme_id(ThemeVariant::Generic);

        let mut session =
            EditorSession::open(&gateway, ThemeVariant::Generic, &id, EditorConfig::default())
                .await;

        assert!(session.is_read_only());
        assert!(session.save(&gateway).await.is_err());
    }
}
