//! VerseCast Core Library
//!
//! This crate provides the theme engine behind VerseCast's live text
//! overlays, including:
//! - Line-type schemas for generic, Bible and song themes
//! - Normalization of stored (possibly legacy) theme records
//! - The editing session: selection, background boxes, layer reordering, save flow
//! - SQLite-based theme store with broadcast to display surfaces
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                     versecast-core                          │
//! ├─────────────────────────────────────────────────────────────┤
//! │  schema/       - Line types and defaults per variant        │
//! │  normalize/    - Raw record -> Theme, Theme -> record       │
//! │  editor/       - Editing session, boxes, reorder, save      │
//! │  gateway/      - Persistence/broadcast trait, SQLite impl   │
//! │  storage/      - SQLite database, queries                   │
//! │  types/        - Shared type definitions                    │
//! │  error.rs      - Error types                                │
//! └─────────────────────────────────────────────────────────────┘
//! ```

pub mod editor;
pub mod error;
pub mod gateway;
pub mod normalize;
pub mod schema;
pub mod storage;
pub mod types;

// Re-export commonly used types
pub use error::{Error, Result};
pub use types::*;

pub use editor::{
    move_item, ActiveDrag, DragState, EditorSession, LayerMove, LayerReorderEngine, SaveOutcome,
    SaveTicket,
};
pub use gateway::{SqliteThemeGateway, ThemeBroadcast, ThemeGateway};
pub use normalize::{normalize, normalize_for_variant, to_record, to_write_payload};
pub use schema::{LineDefinition, LineKind, LineTypeSchema, ReferenceDefinition};
pub use storage::Storage;
