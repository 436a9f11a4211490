//! Subcommand implementations
//!
//! Each command returns the text to print so it can be exercised without a
//! terminal.

use crate::cli::Command;
use crate::state::AppState;
use anyhow::{bail, Context};
use tracing::info;
use versecast_core::storage;
use versecast_core::{
    to_record, EditorSession, LayerKind, LineTypeId, ThemeGateway, ThemeVariant,
};

pub async fn run(state: &AppState, command: Command) -> anyhow::Result<String> {
    match command {
        Command::List { variant } => list(state, variant.variant),
        Command::Show { variant, id } => show(state, variant.variant, &id).await,
        Command::New { variant, name } => create(state, variant.variant, &name).await,
        Command::Apply { variant, id } => apply(state, variant.variant, &id).await,
        Command::Delete { variant, id } => delete(state, variant.variant, &id),
        Command::AddBox { variant, id } => add_box(state, variant.variant, &id).await,
        Command::MoveLine {
            variant,
            id,
            from,
            to,
        } => move_line(state, variant.variant, &id, from, to).await,
        Command::HideLine {
            variant,
            id,
            line,
            show,
        } => set_line_visibility(state, variant.variant, &id, &line, show).await,
        Command::Config {
            saved_status_ms,
            max_boxes,
        } => config(state, saved_status_ms, max_boxes),
    }
}

fn list(state: &AppState, variant: ThemeVariant) -> anyhow::Result<String> {
    let conn = state.storage.connection()?;
    let themes = storage::list_themes(&conn, variant)?;

    let lines: Vec<String> = themes
        .iter()
        .map(|t| {
            format!(
                "{} {}  {}{}",
                if t.is_active { "*" } else { " " },
                t.id,
                t.name,
                if t.is_built_in { " (built-in)" } else { "" }
            )
        })
        .collect();
    Ok(lines.join("\n"))
}

async fn show(state: &AppState, variant: ThemeVariant, id: &str) -> anyhow::Result<String> {
    let session = open_existing(state, variant, id).await?;
    Ok(serde_json::to_string_pretty(&to_record(session.theme()))?)
}

async fn create(state: &AppState, variant: ThemeVariant, name: &str) -> anyhow::Result<String> {
    let mut session = state.new_session(variant);
    session.set_name(name);
    session.save(&state.gateway).await?;

    info!("Created theme '{}'", name);
    Ok(session.theme().id.clone())
}

async fn apply(state: &AppState, variant: ThemeVariant, id: &str) -> anyhow::Result<String> {
    let session = open_existing(state, variant, id).await?;
    state
        .gateway
        .apply(variant, &to_record(session.theme()))
        .await?;
    Ok(format!("Applied '{}'", session.theme().name))
}

fn delete(state: &AppState, variant: ThemeVariant, id: &str) -> anyhow::Result<String> {
    let conn = state.storage.connection()?;
    if !storage::delete_theme(&conn, variant, id)? {
        bail!("No deletable {} theme with id {}", variant, id);
    }
    Ok(format!("Deleted {}", id))
}

async fn add_box(state: &AppState, variant: ThemeVariant, id: &str) -> anyhow::Result<String> {
    let mut session = open_editable(state, variant, id).await?;
    let box_id = session.add_box()?;
    session.save(&state.gateway).await?;
    Ok(box_id)
}

async fn move_line(
    state: &AppState,
    variant: ThemeVariant,
    id: &str,
    from: usize,
    to: usize,
) -> anyhow::Result<String> {
    let mut session = open_editable(state, variant, id).await?;
    let line = session
        .theme()
        .line_order
        .get(from)
        .cloned()
        .with_context(|| format!("No line at position {}", from))?;

    session.start_drag(LayerKind::Line, line.as_str(), from);
    if !session.drop_on(LayerKind::Line, to) {
        bail!("Cannot move '{}' from {} to {}", line, from, to);
    }
    session.save(&state.gateway).await?;

    Ok(order_text(&session))
}

async fn set_line_visibility(
    state: &AppState,
    variant: ThemeVariant,
    id: &str,
    line: &str,
    visible: bool,
) -> anyhow::Result<String> {
    let mut session = open_editable(state, variant, id).await?;
    let line = LineTypeId::from(line);
    let mut style = session
        .theme()
        .style(&line)
        .cloned()
        .with_context(|| format!("Theme has no line '{}'", line))?;

    style.visible = visible;
    session.set_style(line.clone(), style);
    session.save(&state.gateway).await?;

    Ok(format!(
        "{} '{}'",
        if visible { "Showing" } else { "Hid" },
        line
    ))
}

fn config(
    state: &AppState,
    saved_status_ms: Option<u64>,
    max_boxes: Option<usize>,
) -> anyhow::Result<String> {
    let mut config = state.config.clone();
    if saved_status_ms.is_none() && max_boxes.is_none() {
        return Ok(serde_json::to_string_pretty(&config)?);
    }

    if let Some(ms) = saved_status_ms {
        config.saved_status_display_ms = ms;
    }
    if let Some(max) = max_boxes {
        config.max_background_boxes = max;
    }
    state.storage.save_editor_config(&config)?;
    Ok(serde_json::to_string_pretty(&config)?)
}

async fn open_existing(
    state: &AppState,
    variant: ThemeVariant,
    id: &str,
) -> anyhow::Result<EditorSession> {
    let session = state.open_session(variant, id).await;
    if session.theme().id != id {
        bail!("No {} theme with id {}", variant, id);
    }
    Ok(session)
}

async fn open_editable(
    state: &AppState,
    variant: ThemeVariant,
    id: &str,
) -> anyhow::Result<EditorSession> {
    let session = open_existing(state, variant, id).await?;
    if session.is_read_only() {
        bail!("'{}' is built-in; create a new theme to customize it", session.theme().name);
    }
    Ok(session)
}

fn order_text(session: &EditorSession) -> String {
    session
        .theme()
        .line_order
        .iter()
        .map(|id| id.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}
