//! Persistence and broadcast boundary
//!
//! The editor never talks to a store directly. It is handed a [`ThemeGateway`]
//! and drives it through fetch -> (create | update) -> apply.

mod sqlite;

pub use sqlite::SqliteThemeGateway;

use crate::error::Result;
use crate::types::{ThemeRecord, ThemeVariant};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Theme store plus broadcast to the rendering surfaces
///
/// Every call is scoped to a variant namespace; the shape is identical
/// across variants.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ThemeGateway: Send + Sync {
    /// Raw stored record, possibly in a legacy shape
    async fn fetch(&self, variant: ThemeVariant, id: &str) -> Result<Option<serde_json::Value>>;

    /// Persist a new theme, returning its assigned id
    async fn create(&self, variant: ThemeVariant, payload: &ThemeRecord) -> Result<String>;

    async fn update(&self, variant: ThemeVariant, id: &str, payload: &ThemeRecord) -> Result<()>;

    /// Make `record` the active theme on every display surface
    async fn apply(&self, variant: ThemeVariant, record: &ThemeRecord) -> Result<()>;
}

/// Message published to display surfaces when a theme is applied
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ThemeBroadcast {
    pub variant: ThemeVariant,
    pub theme: ThemeRecord,
    pub applied_at: chrono::DateTime<chrono::Utc>,
}
