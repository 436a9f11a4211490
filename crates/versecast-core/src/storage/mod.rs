//! SQLite-based theme store
//!
//! This module provides:
//! - Database initialization and migrations
//! - Theme, active theme and settings queries
//! - Built-in theme seeding and editor config persistence
//! - Connection pooling

mod migrations;
mod queries;

pub use migrations::run_migrations;
pub use queries::*;

use crate::error::{Error, Result, StorageError};
use crate::normalize::to_write_payload;
use crate::types::{EditorConfig, Theme, ThemeVariant};
use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Database connection pool type
pub type DbPool = Pool<SqliteConnectionManager>;

/// Settings key holding the serialized [`EditorConfig`]
pub const EDITOR_CONFIG_KEY: &str = "editor_config";

/// Id of the built-in theme seeded for `variant`
pub fn builtin_theme_id(variant: ThemeVariant) -> String {
    format!("builtin-{}", variant.namespace())
}

/// Storage manager for database operations
pub struct Storage {
    pool: DbPool,
    db_path: PathBuf,
}

impl Storage {
    /// Open (or create) `versecast.db` inside `data_dir`
    pub fn new_with_path(data_dir: impl AsRef<Path>) -> Result<Self> {
        let data_dir = data_dir.as_ref();

        std::fs::create_dir_all(data_dir).map_err(|e| {
            Error::Storage(StorageError::Database(format!(
                "Failed to create data directory: {}",
                e
            )))
        })?;

        let db_path = data_dir.join("versecast.db");
        info!("Database path: {:?}", db_path);

        Self::from_path(db_path)
    }

    pub fn from_path(db_path: PathBuf) -> Result<Self> {
        let manager = SqliteConnectionManager::file(&db_path)
            .with_init(|conn| conn.execute_batch("PRAGMA foreign_keys = ON;"));
        let pool = Pool::builder()
            .max_size(10)
            .build(manager)
            .map_err(|e| Error::Storage(StorageError::Pool(e.to_string())))?;

        let storage = Self { pool, db_path };
        storage.initialize()?;

        Ok(storage)
    }

    /// Create in-memory storage (for testing)
    pub fn in_memory() -> Result<Self> {
        let manager = SqliteConnectionManager::memory()
            .with_init(|conn| conn.execute_batch("PRAGMA foreign_keys = ON;"));
        let pool = Pool::builder()
            .max_size(1)
            .build(manager)
            .map_err(|e| Error::Storage(StorageError::Pool(e.to_string())))?;

        let storage = Self {
            pool,
            db_path: PathBuf::from(":memory:"),
        };

        storage.initialize()?;

        Ok(storage)
    }

    fn initialize(&self) -> Result<()> {
        {
            let conn = self.connection()?;
            run_migrations(&conn)?;
        }
        self.seed_builtin_themes()?;
        info!("Database initialized successfully");
        Ok(())
    }

    /// Get a connection from the pool
    pub fn connection(&self) -> Result<r2d2::PooledConnection<SqliteConnectionManager>> {
        self.pool
            .get()
            .map_err(|e| Error::Storage(StorageError::Pool(e.to_string())))
    }

    pub fn db_path(&self) -> &PathBuf {
        &self.db_path
    }

    pub fn pool(&self) -> &DbPool {
        &self.pool
    }

    /// Insert the read-only default theme of every variant, once
    ///
    /// A variant with nothing applied yet gets its built-in marked active.
    pub fn seed_builtin_themes(&self) -> Result<()> {
        let conn = self.connection()?;

        for variant in ThemeVariant::ALL {
            let id = builtin_theme_id(variant);
            if get_theme(&conn, variant, &id)?.is_none() {
                let mut theme = Theme::new_default(variant);
                theme.name = format!("Default {}", variant);
                insert_theme(&conn, variant, &id, &to_write_payload(&theme), true)?;
                info!("Seeded built-in theme {}", id);
            }

            if get_active_theme(&conn, variant)?.is_none() {
                set_active_theme(&conn, variant, &id)?;
                debug!("Activated built-in theme for {}", variant.namespace());
            }
        }

        Ok(())
    }

    /// Stored editor config, falling back to defaults when missing or unreadable
    pub fn load_editor_config(&self) -> EditorConfig {
        let raw = match self
            .connection()
            .and_then(|conn| get_setting(&conn, EDITOR_CONFIG_KEY))
        {
            Ok(Some(raw)) => raw,
            Ok(None) => return EditorConfig::default(),
            Err(e) => {
                warn!("Failed to read editor config: {}, using defaults", e);
                return EditorConfig::default();
            }
        };

        serde_json::from_str(&raw).unwrap_or_else(|e| {
            warn!("Invalid editor config: {}, using defaults", e);
            EditorConfig::default()
        })
    }

    pub fn save_editor_config(&self, config: &EditorConfig) -> Result<()> {
        let conn = self.connection()?;
        set_setting(&conn, EDITOR_CONFIG_KEY, &serde_json::to_string(config)?)?;
        info!("Saved editor config");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::normalize_for_variant;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_in_memory_storage() {
        let storage = Storage::in_memory().unwrap();
        assert!(storage.connection().is_ok());
    }

    #[test]
    fn test_builtin_themes_are_seeded_and_active() {
        let storage = Storage::in_memory().unwrap();
        let conn = storage.connection().unwrap();

        for variant in ThemeVariant::ALL {
            let themes = list_themes(&conn, variant).unwrap();
            assert_eq!(themes.len(), 1);
            assert!(themes[0].is_built_in);
            assert!(themes[0].is_active);
            assert_eq!(themes[0].id, builtin_theme_id(variant));
        }
    }

    #[test]
    fn test_seeded_theme_normalizes_as_built_in() {
        let storage = Storage::in_memory().unwrap();
        let conn = storage.connection().unwrap();

        let raw = get_theme(&conn, ThemeVariant::Bible, "builtin-bible-themes")
            .unwrap()
            .unwrap()
            .into_raw_record();
        let theme = normalize_for_variant(ThemeVariant::Bible, &raw);

        assert!(theme.is_built_in);
        assert_eq!(theme.name, "Default bible");
        assert_eq!(theme, {
            let mut expected = Theme::new_default(ThemeVariant::Bible);
            expected.id = "builtin-bible-themes".to_string();
            expected.name = "Default bible".to_string();
            expected.is_built_in = true;
            expected
        });
    }

    #[test]
    fn test_seeding_is_idempotent() {
        let storage = Storage::in_memory().unwrap();
        storage.seed_builtin_themes().unwrap();

        let conn = storage.connection().unwrap();
        assert_eq!(list_themes(&conn, ThemeVariant::Song).unwrap().len(), 1);
    }

    #[test]
    fn test_editor_config_round_trip() {
        let storage = Storage::in_memory().unwrap();
        assert_eq!(storage.load_editor_config(), EditorConfig::default());

        let config = EditorConfig {
            saved_status_display_ms: 750,
            max_background_boxes: 2,
        };
        storage.save_editor_config(&config).unwrap();
        assert_eq!(storage.load_editor_config(), config);
    }

    #[test]
    fn test_invalid_editor_config_falls_back() {
        let storage = Storage::in_memory().unwrap();
        let conn = storage.connection().unwrap();
        set_setting(&conn, EDITOR_CONFIG_KEY, "not json").unwrap();
        drop(conn);

        assert_eq!(storage.load_editor_config(), EditorConfig::default());
    }

    #[test]
    fn test_file_storage_persists() {
        let dir = tempfile::tempdir().unwrap();
        {
            let storage = Storage::new_with_path(dir.path()).unwrap();
            let mut theme = Theme::new_default(ThemeVariant::Song);
            theme.name = "Chorus".to_string();
            let conn = storage.connection().unwrap();
            insert_theme(&conn, ThemeVariant::Song, "s-1", &to_write_payload(&theme), false).unwrap();
        }

        let storage = Storage::new_with_path(dir.path()).unwrap();
        assert!(storage.db_path().ends_with("versecast.db"));
        let conn = storage.connection().unwrap();
        let names: Vec<String> = list_themes(&conn, ThemeVariant::Song)
            .unwrap()
            .into_iter()
            .map(|t| t.name)
            .collect();
        assert_eq!(names, vec!["Default song".to_string(), "Chorus".to_string()]);
    }
}
