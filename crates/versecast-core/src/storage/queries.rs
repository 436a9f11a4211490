//! Database query implementations

use crate::error::Result;
use crate::types::{ThemeRecord, ThemeSummary, ThemeVariant};
use rusqlite::{params, Connection, OptionalExtension, Row};
use serde_json::{Map, Value};
use tracing::warn;

/// Theme row as stored
#[derive(Debug, Clone)]
pub struct StoredTheme {
    pub id: String,
    pub variant: ThemeVariant,
    pub name: String,
    pub is_built_in: bool,
    pub data: Value,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl StoredTheme {
    /// Raw record for the normalizer, with the store-owned fields filled in
    pub fn into_raw_record(self) -> Value {
        let mut fields = match self.data {
            Value::Object(fields) => fields,
            _ => Map::new(),
        };
        fields.insert("id".to_string(), Value::String(self.id));
        fields.insert("isBuiltIn".to_string(), Value::Bool(self.is_built_in));
        fields
            .entry("name".to_string())
            .or_insert(Value::String(self.name));
        Value::Object(fields)
    }
}

// ===== Theme Queries =====

/// Insert a new theme
pub fn insert_theme(
    conn: &Connection,
    variant: ThemeVariant,
    id: &str,
    record: &ThemeRecord,
    is_built_in: bool,
) -> Result<()> {
    let now = chrono::Utc::now().to_rfc3339();
    conn.execute(
        r#"
        INSERT INTO themes (id, variant, name, is_built_in, data, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?, ?, ?)
        "#,
        params![
            id,
            variant.as_str(),
            record.name,
            is_built_in as i32,
            serde_json::to_string(&payload_only(record))?,
            now,
            now,
        ],
    )?;

    Ok(())
}

/// Overwrite a user theme; returns false if no such editable theme exists
pub fn update_theme(
    conn: &Connection,
    variant: ThemeVariant,
    id: &str,
    record: &ThemeRecord,
) -> Result<bool> {
    let changed = conn.execute(
        r#"
        UPDATE themes
        SET name = ?, data = ?, updated_at = ?
        WHERE id = ? AND variant = ? AND is_built_in = 0
        "#,
        params![
            record.name,
            serde_json::to_string(&payload_only(record))?,
            chrono::Utc::now().to_rfc3339(),
            id,
            variant.as_str(),
        ],
    )?;

    Ok(changed > 0)
}

/// Get theme by ID
pub fn get_theme(conn: &Connection, variant: ThemeVariant, id: &str) -> Result<Option<StoredTheme>> {
    let result = conn
        .query_row(
            r#"
            SELECT id, variant, name, is_built_in, data, created_at, updated_at
            FROM themes
            WHERE id = ? AND variant = ?
            "#,
            params![id, variant.as_str()],
            |row| stored_theme_from_row(row, variant),
        )
        .optional()?;

    Ok(result)
}

/// List themes of one variant, built-ins first
pub fn list_themes(conn: &Connection, variant: ThemeVariant) -> Result<Vec<ThemeSummary>> {
    let mut stmt = conn.prepare(
        r#"
        SELECT t.id, t.name, t.is_built_in, t.updated_at, a.theme_id IS NOT NULL
        FROM themes t
        LEFT JOIN active_themes a ON a.variant = t.variant AND a.theme_id = t.id
        WHERE t.variant = ?
        ORDER BY t.is_built_in DESC, t.name
        "#,
    )?;

    let themes = stmt
        .query_map(params![variant.as_str()], |row| {
            let id: String = row.get(0)?;
            let name: String = row.get(1)?;
            let is_built_in: i32 = row.get(2)?;
            let updated_at: String = row.get(3)?;
            let is_active: bool = row.get(4)?;

            Ok(ThemeSummary {
                id,
                variant,
                name,
                is_built_in: is_built_in != 0,
                is_active,
                updated_at: parse_timestamp(&updated_at),
            })
        })?
        .filter_map(|r| r.ok())
        .collect();

    Ok(themes)
}

/// Delete a user theme; built-ins are never deleted
pub fn delete_theme(conn: &Connection, variant: ThemeVariant, id: &str) -> Result<bool> {
    let deleted = conn.execute(
        "DELETE FROM themes WHERE id = ? AND variant = ? AND is_built_in = 0",
        params![id, variant.as_str()],
    )?;
    Ok(deleted > 0)
}

// ===== Active Theme Queries =====

/// Record the theme broadcast for a variant
pub fn set_active_theme(conn: &Connection, variant: ThemeVariant, theme_id: &str) -> Result<()> {
    conn.execute(
        r#"
        INSERT INTO active_themes (variant, theme_id, applied_at)
        VALUES (?, ?, ?)
        ON CONFLICT(variant) DO UPDATE SET theme_id = excluded.theme_id, applied_at = excluded.applied_at
        "#,
        params![variant.as_str(), theme_id, chrono::Utc::now().to_rfc3339()],
    )?;

    Ok(())
}

/// Get the active theme id for a variant
pub fn get_active_theme(conn: &Connection, variant: ThemeVariant) -> Result<Option<String>> {
    let result = conn
        .query_row(
            "SELECT theme_id FROM active_themes WHERE variant = ?",
            params![variant.as_str()],
            |row| row.get(0),
        )
        .optional()?;

    Ok(result)
}

// ===== Settings Queries =====

/// Get a setting value
pub fn get_setting(conn: &Connection, key: &str) -> Result<Option<String>> {
    let result = conn
        .query_row(
            "SELECT value FROM settings WHERE key = ?",
            params![key],
            |row| row.get(0),
        )
        .optional()?;

    Ok(result)
}

/// Set a setting value
pub fn set_setting(conn: &Connection, key: &str, value: &str) -> Result<()> {
    conn.execute(
        r#"
        INSERT INTO settings (key, value, updated_at)
        VALUES (?, ?, CURRENT_TIMESTAMP)
        ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = CURRENT_TIMESTAMP
        "#,
        params![key, value],
    )?;

    Ok(())
}

// ===== Helper Functions =====

/// Store-owned fields live in their own columns, never inside `data`
fn payload_only(record: &ThemeRecord) -> ThemeRecord {
    ThemeRecord {
        id: None,
        is_built_in: None,
        ..record.clone()
    }
}

fn stored_theme_from_row(row: &Row<'_>, variant: ThemeVariant) -> rusqlite::Result<StoredTheme> {
    let id: String = row.get(0)?;
    let raw_variant: String = row.get(1)?;
    let name: String = row.get(2)?;
    let is_built_in: i32 = row.get(3)?;
    let data: String = row.get(4)?;
    let created_at: String = row.get(5)?;
    let updated_at: String = row.get(6)?;

    let data = serde_json::from_str(&data).unwrap_or_else(|e| {
        warn!("Theme {} has unreadable data: {}", id, e);
        Value::Null
    });

    Ok(StoredTheme {
        variant: raw_variant.parse().unwrap_or(variant),
        id,
        name,
        is_built_in: is_built_in != 0,
        data,
        created_at: parse_timestamp(&created_at),
        updated_at: parse_timestamp(&updated_at),
    })
}

fn parse_timestamp(s: &str) -> chrono::DateTime<chrono::Utc> {
    chrono::DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&chrono::Utc))
        .unwrap_or_else(|_| chrono::Utc::now())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::to_write_payload;
    use crate::types::Theme;

    fn setup_db() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        crate::storage::run_migrations(&conn).unwrap();
        conn
    }

    fn payload(name: &str) -> ThemeRecord {
        let mut theme = Theme::new_default(ThemeVariant::Bible);
        theme.name = name.to_string();
        to_write_payload(&theme)
    }

    #[test]
    fn test_theme_crud() {
        let conn = setup_db();

        // Insert
        insert_theme(&conn, ThemeVariant::Bible, "t-1", &payload("Morning"), false).unwrap();

        // Get
        let stored = get_theme(&conn, ThemeVariant::Bible, "t-1").unwrap().unwrap();
        assert_eq!(stored.name, "Morning");
        assert!(!stored.is_built_in);
        assert!(stored.data.get("id").is_none());

        // Update
        assert!(update_theme(&conn, ThemeVariant::Bible, "t-1", &payload("Evening")).unwrap());
        let raw = get_theme(&conn, ThemeVariant::Bible, "t-1")
            .unwrap()
            .unwrap()
            .into_raw_record();
        assert_eq!(raw["name"], "Evening");
        assert_eq!(raw["id"], "t-1");
        assert_eq!(raw["isBuiltIn"], false);

        // Delete
        assert!(delete_theme(&conn, ThemeVariant::Bible, "t-1").unwrap());
        assert!(get_theme(&conn, ThemeVariant::Bible, "t-1").unwrap().is_none());
    }

    #[test]
    fn test_variants_are_separate_namespaces() {
        let conn = setup_db();
        insert_theme(&conn, ThemeVariant::Bible, "t-1", &payload("Morning"), false).unwrap();

        assert!(get_theme(&conn, ThemeVariant::Song, "t-1").unwrap().is_none());
        assert!(!update_theme(&conn, ThemeVariant::Song, "t-1", &payload("X")).unwrap());
        assert!(list_themes(&conn, ThemeVariant::Song).unwrap().is_empty());
    }

    #[test]
    fn test_built_in_themes_are_protected() {
        let conn = setup_db();
        insert_theme(&conn, ThemeVariant::Bible, "builtin", &payload("Default"), true).unwrap();

        assert!(!update_theme(&conn, ThemeVariant::Bible, "builtin", &payload("Hacked")).unwrap());
        assert!(!delete_theme(&conn, ThemeVariant::Bible, "builtin").unwrap());

        let stored = get_theme(&conn, ThemeVariant::Bible, "builtin").unwrap().unwrap();
        assert_eq!(stored.name, "Default");
        assert!(stored.is_built_in);
    }

    #[test]
    fn test_active_theme_is_listed() {
        let conn = setup_db();
        insert_theme(&conn, ThemeVariant::Bible, "a", &payload("Alpha"), false).unwrap();
        insert_theme(&conn, ThemeVariant::Bible, "b", &payload("Beta"), false).unwrap();

        set_active_theme(&conn, ThemeVariant::Bible, "a").unwrap();
        set_active_theme(&conn, ThemeVariant::Bible, "b").unwrap();

        assert_eq!(
            get_active_theme(&conn, ThemeVariant::Bible).unwrap(),
            Some("b".to_string())
        );
        let themes = list_themes(&conn, ThemeVariant::Bible).unwrap();
        let active: Vec<&str> = themes
            .iter()
            .filter(|t| t.is_active)
            .map(|t| t.id.as_str())
            .collect();
        assert_eq!(active, vec!["b"]);
    }

    #[test]
    fn test_unreadable_data_still_loads() {
        let conn = setup_db();
        conn.execute(
            "INSERT INTO themes (id, variant, name, is_built_in, data, created_at, updated_at)
             VALUES ('x', 'bible', 'Broken', 0, '{not json', '2024-01-01T00:00:00Z', '2024-01-01T00:00:00Z')",
            [],
        )
        .unwrap();

        let raw = get_theme(&conn, ThemeVariant::Bible, "x")
            .unwrap()
            .unwrap()
            .into_raw_record();
        assert_eq!(raw["name"], "Broken");
        assert_eq!(raw["id"], "x");
    }

    #[test]
    fn test_settings() {
        let conn = setup_db();

        set_setting(&conn, "editor_config", "{}").unwrap();
        assert_eq!(
            get_setting(&conn, "editor_config").unwrap(),
            Some("{}".to_string())
        );
        assert!(get_setting(&conn, "nonexistent").unwrap().is_none());
    }
}
