//! Theme editor session
//!
//! An [`EditorSession`] owns exactly one canonical [`Theme`] for its lifetime.
//! All edits go through its mutators, which keep the dirty flag honest; the
//! save flow lives in `save.rs`, background boxes in `boxes.rs` and drag
//! reordering in `reorder.rs`.

mod boxes;
mod reorder;
mod save;

pub(crate) use boxes::default_box;
pub use reorder::{move_item, ActiveDrag, DragState, LayerMove, LayerReorderEngine};
pub use save::{SaveOutcome, SaveTicket};

use save::PendingCreate;

use crate::gateway::ThemeGateway;
use crate::normalize::normalize;
use crate::schema::LineTypeSchema;
use crate::types::*;
use std::collections::BTreeMap;
use tokio::time::Instant;
use tracing::{debug, info, warn};

/// In-memory editing state for one theme
#[derive(Debug)]
pub struct EditorSession {
    theme: Theme,
    selection: Selection,
    dirty: bool,
    /// Bumped on every mutation; lets a save tell whether it captured the latest state
    revision: u64,
    save_status: SaveStatus,
    saved_until: Option<Instant>,
    save_generation: u64,
    /// Create shared by saves started before the theme had an id
    pending_create: Option<PendingCreate>,
    preview_text: BTreeMap<LineTypeId, String>,
    reorder: LayerReorderEngine,
    config: EditorConfig,
}

impl EditorSession {
    /// Session over a brand new theme built from schema defaults
    pub fn new(variant: ThemeVariant, config: EditorConfig) -> Self {
        Self::from_theme(Theme::new_default(variant), config)
    }

    pub fn from_theme(theme: Theme, config: EditorConfig) -> Self {
        let preview_text = theme
            .schema()
            .definitions()
            .map(|d| (d.id.clone(), d.sample_text.to_string()))
            .collect();

        Self {
            theme,
            selection: Selection::None,
            dirty: false,
            revision: 0,
            save_status: SaveStatus::Idle,
            saved_until: None,
            save_generation: 0,
            pending_create: None,
            preview_text,
            reorder: LayerReorderEngine::new(),
            config,
        }
    }

    /// Load a stored theme, degrading to schema defaults if it cannot be fetched
    pub async fn open(
        gateway: &dyn ThemeGateway,
        variant: ThemeVariant,
        id: &str,
        config: EditorConfig,
    ) -> Self {
        let raw = match gateway.fetch(variant, id).await {
            Ok(Some(raw)) => raw,
            Ok(None) => {
                warn!("Theme {} not found in {}, opening defaults", id, variant.namespace());
                serde_json::Value::Null
            }
            Err(e) => {
                warn!("Failed to fetch theme {}: {}, opening defaults", id, e);
                serde_json::Value::Null
            }
        };

        let theme = normalize(LineTypeSchema::for_variant(variant), &raw);
        info!("Opened {} theme '{}' ({})", variant, theme.name, theme.id);
        Self::from_theme(theme, config)
    }

    pub fn theme(&self) -> &Theme {
        &self.theme
    }

    pub fn schema(&self) -> &'static LineTypeSchema {
        self.theme.schema()
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Whether the session may be dropped without asking the operator
    pub fn can_discard(&self) -> bool {
        !self.dirty
    }

    /// Built-in themes hide save/apply
    pub fn is_read_only(&self) -> bool {
        self.theme.is_built_in
    }

    fn mark_dirty(&mut self) {
        self.dirty = true;
        self.revision += 1;
    }

    // ===== Line mutators =====

    pub fn set_position(&mut self, id: impl Into<LineTypeId>, position: LinePosition) {
        let id = id.into();
        debug!("Set position of {}", id);
        self.theme.set_position(&id, position);
        self.mark_dirty();
    }

    pub fn set_style(&mut self, id: impl Into<LineTypeId>, style: LineStyle) {
        let id = id.into();
        debug!("Set style of {}", id);
        self.theme.set_style(&id, style);
        self.mark_dirty();
    }

    // ===== Theme mutators =====

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.theme.name = name.into();
        self.mark_dirty();
    }

    pub fn set_viewer_background(&mut self, background: ViewerBackground) {
        self.theme.viewer_background = background;
        self.mark_dirty();
    }

    pub fn set_canvas_dimensions(&mut self, dimensions: CanvasDimensions) {
        self.theme.canvas_dimensions = dimensions;
        self.mark_dirty();
    }

    // ===== Selection =====

    pub fn select(&mut self, selection: Selection) {
        self.selection = selection;
    }

    /// Select a line, tagging it as a reference line where the schema says so
    pub fn select_line(&mut self, id: impl Into<LineTypeId>) {
        let id = id.into();
        self.selection = if self.schema().is_reference(&id) {
            Selection::Reference(id)
        } else {
            Selection::Line(id)
        };
    }

    pub fn clear_selection(&mut self) {
        self.selection = Selection::None;
    }

    // ===== Preview text =====

    /// Sample text shown on the canvas; never persisted
    pub fn preview_text(&self, id: &LineTypeId) -> Option<&str> {
        self.preview_text.get(id).map(String::as_str)
    }

    pub fn set_preview_text(&mut self, id: impl Into<LineTypeId>, text: impl Into<String>) {
        self.preview_text.insert(id.into(), text.into());
    }

    // ===== Reordering =====

    pub fn drag_state(&self) -> &DragState {
        self.reorder.state()
    }

    pub fn start_drag(&mut self, kind: LayerKind, id: impl Into<String>, source_index: usize) {
        self.reorder.start_drag(kind, id, source_index);
    }

    pub fn drag_over(&mut self, kind: LayerKind, target_index: usize) {
        self.reorder.drag_over(kind, target_index);
    }

    /// Finish the active drag at `target_index`; returns whether anything moved
    pub fn drop_on(&mut self, kind: LayerKind, target_index: usize) -> bool {
        let Some(layer_move) = self.reorder.drop(kind, target_index) else {
            return false;
        };

        let moved = match layer_move.kind {
            LayerKind::Line => {
                let from = resolve_index(&self.theme.line_order, &layer_move, |id| id.as_str());
                from.is_some_and(|from| move_item(&mut self.theme.line_order, from, layer_move.to))
            }
            LayerKind::Box => {
                let from =
                    resolve_index(&self.theme.background_boxes, &layer_move, |b| b.id.as_str());
                from.is_some_and(|from| {
                    move_item(&mut self.theme.background_boxes, from, layer_move.to)
                })
            }
        };

        if moved {
            debug!(
                "Moved {:?} '{}' from {} to {}",
                layer_move.kind, layer_move.id, layer_move.from, layer_move.to
            );
            self.mark_dirty();
        } else {
            warn!("Ignoring drop of {:?} '{}'", layer_move.kind, layer_move.id);
        }
        moved
    }

    /// Drag-end signal; cancels whether or not a drop happened
    pub fn end_drag(&mut self) {
        self.reorder.end_drag();
    }
}

/// Current index of the dragged element, tolerating edits made mid-drag
fn resolve_index<T>(items: &[T], layer_move: &LayerMove, id_of: impl Fn(&T) -> &str) -> Option<usize> {
    match items.get(layer_move.from) {
        Some(item) if id_of(item) == layer_move.id => Some(layer_move.from),
        _ => items.iter().position(|item| id_of(item) == layer_move.id),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::MockThemeGateway;
    use crate::error::{Error, LoadError};
    use pretty_assertions::assert_eq;

    fn ids(raw: &[&str]) -> Vec<LineTypeId> {
        raw.iter().map(|s| LineTypeId::from(*s)).collect()
    }

    fn bible_session() -> EditorSession {
        EditorSession::new(ThemeVariant::Bible, EditorConfig::default())
    }

    #[test]
    fn test_new_session_is_clean() {
        let session = bible_session();
        assert!(!session.is_dirty());
        assert!(session.can_discard());
        assert!(session.selection().is_none());
        assert_eq!(session.theme().id, "");
        assert_eq!(
            session.preview_text(&"referenceEnglish".into()),
            Some("Genesis 1:1")
        );
    }

    #[test]
    fn test_every_mutator_sets_dirty() {
        let mutations: Vec<Box<dyn Fn(&mut EditorSession)>> = vec![
            Box::new(|s: &mut EditorSession| s.set_name("Renamed")),
            Box::new(|s: &mut EditorSession| s.set_viewer_background(ViewerBackground::Transparent)),
            Box::new(|s: &mut EditorSession| s.set_canvas_dimensions(CanvasDimensions::new(1280, 720))),
            Box::new(|s: &mut EditorSession| s.set_position("english", LinePosition::new(0.0, 0.0, 50.0, 10.0))),
            Box::new(|s: &mut EditorSession| s.set_style("hebrew", LineStyle::new(4.0, FontWeight::Light, "#000"))),
        ];

        for mutate in mutations {
            let mut session = bible_session();
            mutate(&mut session);
            assert!(session.is_dirty());
            assert!(!session.can_discard());
        }
    }

    #[test]
    fn test_reference_style_goes_to_reference_field() {
        let mut session = bible_session();
        let hidden = session
            .schema()
            .default_style(&"reference".into())
            .unwrap()
            .hidden();

        session.set_style("reference", hidden.clone());

        assert_eq!(session.theme().reference.as_ref().unwrap().style, hidden);
        assert!(!session.theme().line_styles.contains_key(&LineTypeId::from("reference")));
        assert!(session.is_dirty());
    }

    #[test]
    fn test_selection_and_preview_are_not_edits() {
        let mut session = bible_session();
        session.select_line("referenceEnglish");
        assert_eq!(
            session.selection(),
            &Selection::Reference("referenceEnglish".into())
        );
        session.select_line("hebrew");
        assert_eq!(session.selection(), &Selection::Line("hebrew".into()));
        session.set_preview_text("hebrew", "שָׁלוֹם");
        session.clear_selection();

        assert!(session.selection().is_none());
        assert_eq!(session.preview_text(&"hebrew".into()), Some("שָׁלוֹם"));
        assert!(!session.is_dirty());
    }

    #[test]
    fn test_drop_moves_line_and_sets_dirty() {
        let mut session = bible_session();
        session.start_drag(LayerKind::Line, "hebrew", 0);
        session.drag_over(LayerKind::Line, 2);
        assert_eq!(session.theme().line_order[0], "hebrew");

        assert!(session.drop_on(LayerKind::Line, 3));
        assert_eq!(
            session.theme().line_order,
            ids(&["english", "reference", "referenceEnglish", "hebrew"])
        );
        assert!(session.is_dirty());
        assert_eq!(session.drag_state(), &DragState::Idle);
    }

    #[test]
    fn test_drop_on_other_collection_is_ignored() {
        let mut session = bible_session();
        let before = session.theme().line_order.clone();
        session.start_drag(LayerKind::Line, "hebrew", 0);

        assert!(!session.drop_on(LayerKind::Box, 1));
        assert_eq!(session.theme().line_order, before);
        assert!(!session.is_dirty());
        assert_eq!(session.drag_state(), &DragState::Idle);
    }

    #[test]
    fn test_drop_in_place_is_not_an_edit() {
        let mut session = bible_session();
        session.start_drag(LayerKind::Line, "english", 1);
        assert!(!session.drop_on(LayerKind::Line, 1));
        assert!(!session.is_dirty());
    }

    #[test]
    fn test_drop_follows_box_that_shifted_mid_drag() {
        let mut session = bible_session();
        let first = session.add_box().unwrap();
        let second = session.add_box().unwrap();
        let third = session.add_box().unwrap();

        session.start_drag(LayerKind::Box, third.clone(), 2);
        session.delete_box(&first);
        assert!(session.drop_on(LayerKind::Box, 0));

        let order: Vec<&str> = session
            .theme()
            .background_boxes
            .iter()
            .map(|b| b.id.as_str())
            .collect();
        assert_eq!(order, vec![third.as_str(), second.as_str()]);
    }

    #[test]
    fn test_end_drag_cancels() {
        let mut session = bible_session();
        session.start_drag(LayerKind::Line, "hebrew", 0);
        session.end_drag();
        assert!(!session.drop_on(LayerKind::Line, 3));
        assert_eq!(session.theme().line_order[0], "hebrew");
    }

    #[tokio::test]
    async fn test_open_normalizes_fetched_record() {
        let mut gateway = MockThemeGateway::new();
        gateway
            .expect_fetch()
            .withf(|variant, id| *variant == ThemeVariant::Bible && id == "t-1")
            .returning(|_, _| {
                Ok(Some(serde_json::json!({
                    "id": "t-1",
                    "name": "Shabbat",
                    "lineOrder": ["english", "hebrew"]
                })))
            });

        let session =
            EditorSession::open(&gateway, ThemeVariant::Bible, "t-1", EditorConfig::default())
                .await;

        assert_eq!(session.theme().id, "t-1");
        assert_eq!(session.theme().name, "Shabbat");
        assert_eq!(
            session.theme().line_order,
            ids(&["english", "hebrew", "reference", "referenceEnglish"])
        );
        assert!(!session.is_dirty());
    }

    #[tokio::test]
    async fn test_open_falls_back_to_defaults_on_fetch_error() {
        let mut gateway = MockThemeGateway::new();
        gateway.expect_fetch().returning(|_, id| {
            Err(Error::Load(LoadError::Transport(format!("timeout fetching {}", id))))
        });

        let session =
            EditorSession::open(&gateway, ThemeVariant::Song, "gone", EditorConfig::default())
                .await;

        assert_eq!(session.theme(), &Theme::new_default(ThemeVariant::Song));
    }
}
