use rusqlite::types::Type;
use rusqlite::{Connection, OptionalExtension, Result as SqliteResult, Row};
use std::path::Path;

use chrono::{DateTime, Utc};

use crate::models::{AppSettings, ConnectionRecord, CreateSavedQuery, QueryRecord};

const SAVED_QUERY_COLUMNS: &str =
    "id, name, query_text, tags, created_by, connection_id, modified_date, chart_configuration";

/// Initialize the SQLite database and create tables if they don't exist
pub fn init_database(data_dir: &Path) -> SqliteResult<Connection> {
    std::fs::create_dir_all(data_dir).ok();
    let db_path = data_dir.join("catalog.db");

    let conn = Connection::open(&db_path)?;
    create_schema(&conn)?;
    log::info!("Opened query catalog at {}", db_path.display());

    Ok(conn)
}

pub fn create_schema(conn: &Connection) -> SqliteResult<()> {
    conn.execute_batch(
        r#"
        -- Connections saved queries can be bound to
        CREATE TABLE IF NOT EXISTS connections (
            id TEXT PRIMARY KEY,
            name TEXT NOT NULL
        );

        -- Saved queries
        CREATE TABLE IF NOT EXISTS saved_queries (
            id TEXT PRIMARY KEY,
            name TEXT NOT NULL,
            query_text TEXT NOT NULL,
            tags TEXT NOT NULL DEFAULT '[]',
            created_by TEXT NOT NULL,
            connection_id TEXT,
            modified_date TEXT NOT NULL,
            chart_configuration TEXT,
            FOREIGN KEY (connection_id) REFERENCES connections(id) ON DELETE SET NULL
        );

        -- App settings (single row)
        CREATE TABLE IF NOT EXISTS app_settings (
            id INTEGER PRIMARY KEY CHECK (id = 1),
            settings_json TEXT NOT NULL,
            updated_at TEXT DEFAULT CURRENT_TIMESTAMP
        );
        "#,
    )
}

// ==================== Connections ====================

/// Save a connection to the database
pub fn save_connection(conn: &Connection, connection: &ConnectionRecord) -> SqliteResult<()> {
    conn.execute(
        r#"
        INSERT INTO connections (id, name)
        VALUES (?1, ?2)
        ON CONFLICT(id) DO UPDATE SET name = excluded.name
        "#,
        (&connection.id, &connection.name),
    )?;
    Ok(())
}

/// Load all connections from the database
pub fn load_connections(conn: &Connection) -> SqliteResult<Vec<ConnectionRecord>> {
    let mut stmt = conn.prepare("SELECT id, name FROM connections ORDER BY name")?;

    let connections = stmt.query_map([], |row| {
        Ok(ConnectionRecord {
            id: row.get(0)?,
            name: row.get(1)?,
        })
    })?;

    connections.collect()
}

// ==================== Saved Queries ====================

/// Create a new saved query with a fresh id
pub fn create_saved_query(conn: &Connection, query: &CreateSavedQuery) -> SqliteResult<QueryRecord> {
    let record = QueryRecord {
        id: uuid::Uuid::new_v4().to_string(),
        name: query.name.clone(),
        query_text: query.query_text.clone(),
        tags: query.tags.clone(),
        created_by: query.created_by.clone(),
        connection_id: query.connection_id.clone(),
        modified_date: Utc::now(),
        chart_configuration: query.chart_configuration.clone(),
    };
    save_saved_query(conn, &record)?;
    Ok(record)
}

/// Insert or replace a saved query
pub fn save_saved_query(conn: &Connection, query: &QueryRecord) -> SqliteResult<()> {
    let tags = to_json(&query.tags)?;
    let chart = query
        .chart_configuration
        .as_ref()
        .map(to_json)
        .transpose()?;

    conn.execute(
        r#"
        INSERT INTO saved_queries (id, name, query_text, tags, created_by, connection_id, modified_date, chart_configuration)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
        ON CONFLICT(id) DO UPDATE SET
            name = excluded.name,
            query_text = excluded.query_text,
            tags = excluded.tags,
            created_by = excluded.created_by,
            connection_id = excluded.connection_id,
            modified_date = excluded.modified_date,
            chart_configuration = excluded.chart_configuration
        "#,
        (
            &query.id,
            &query.name,
            &query.query_text,
            &tags,
            &query.created_by,
            &query.connection_id,
            query.modified_date.to_rfc3339(),
            &chart,
        ),
    )?;
    Ok(())
}

/// Load all saved queries
pub fn load_saved_queries(conn: &Connection) -> SqliteResult<Vec<QueryRecord>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {SAVED_QUERY_COLUMNS} FROM saved_queries ORDER BY modified_date DESC"
    ))?;

    let queries = stmt.query_map([], saved_query_from_row)?;

    queries.collect()
}

/// Get a single saved query by ID
pub fn get_saved_query(conn: &Connection, query_id: &str) -> SqliteResult<Option<QueryRecord>> {
    conn.query_row(
        &format!("SELECT {SAVED_QUERY_COLUMNS} FROM saved_queries WHERE id = ?1"),
        [query_id],
        saved_query_from_row,
    )
    .optional()
}

/// Delete a saved query
pub fn delete_saved_query(conn: &Connection, query_id: &str) -> SqliteResult<bool> {
    let rows_affected = conn.execute("DELETE FROM saved_queries WHERE id = ?1", [query_id])?;
    Ok(rows_affected > 0)
}

fn saved_query_from_row(row: &Row<'_>) -> SqliteResult<QueryRecord> {
    let tags: String = row.get(3)?;
    let modified: String = row.get(6)?;
    let chart: Option<String> = row.get(7)?;

    Ok(QueryRecord {
        id: row.get(0)?,
        name: row.get(1)?,
        query_text: row.get(2)?,
        tags: from_json(3, &tags)?,
        created_by: row.get(4)?,
        connection_id: row.get(5)?,
        modified_date: DateTime::parse_from_rfc3339(&modified)
            .map(|d| d.with_timezone(&Utc))
            .map_err(|e| rusqlite::Error::FromSqlConversionFailure(6, Type::Text, Box::new(e)))?,
        chart_configuration: chart.map(|json| from_json(7, &json)).transpose()?,
    })
}

fn to_json<T: serde::Serialize>(value: &T) -> SqliteResult<String> {
    serde_json::to_string(value).map_err(|e| rusqlite::Error::ToSqlConversionFailure(Box::new(e)))
}

fn from_json<T: serde::de::DeserializeOwned>(column: usize, json: &str) -> SqliteResult<T> {
    serde_json::from_str(json)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(column, Type::Text, Box::new(e)))
}

// ==================== App Settings ====================

/// Stored settings, or the defaults when none were saved or the stored JSON no longer parses
pub fn load_settings(conn: &Connection) -> SqliteResult<AppSettings> {
    let stored: Option<String> = conn
        .query_row("SELECT settings_json FROM app_settings WHERE id = 1", [], |row| row.get(0))
        .optional()?;

    Ok(stored
        .and_then(|json| {
            from_json(0, &json)
                .map_err(|e| log::warn!("Ignoring unreadable settings, using defaults: {}", e))
                .ok()
        })
        .unwrap_or_default())
}

pub fn save_settings(conn: &Connection, settings: &AppSettings) -> SqliteResult<()> {
    conn.execute(
        "INSERT OR REPLACE INTO app_settings (id, settings_json, updated_at) VALUES (1, ?1, CURRENT_TIMESTAMP)",
        [to_json(settings)?],
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ChartConfiguration, SortBy};

    fn open() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        create_schema(&conn).unwrap();
        conn
    }

    fn new_query(name: &str) -> CreateSavedQuery {
        CreateSavedQuery {
            name: name.to_string(),
            query_text: "select 1".to_string(),
            tags: vec!["hr".to_string(), "weekly".to_string()],
            created_by: "bob".to_string(),
            connection_id: None,
            chart_configuration: Some(ChartConfiguration {
                chart_type: Some("bar".to_string()),
                ..Default::default()
            }),
        }
    }

    #[test]
    fn saved_query_round_trips_through_sqlite() {
        let conn = open();
        let created = create_saved_query(&conn, &new_query("Users")).unwrap();

        let loaded = get_saved_query(&conn, &created.id).unwrap().unwrap();
        assert_eq!(loaded.name, "Users");
        assert_eq!(loaded.tags, vec!["hr", "weekly"]);
        assert_eq!(loaded.chart_label(), Some("Bar - Horizontal"));
        assert_eq!(loaded.modified_date.timestamp(), created.modified_date.timestamp());
    }

    #[test]
    fn delete_reports_whether_a_row_was_removed() {
        let conn = open();
        let created = create_saved_query(&conn, &new_query("Users")).unwrap();

        assert!(delete_saved_query(&conn, &created.id).unwrap());
        assert!(!delete_saved_query(&conn, &created.id).unwrap());
        assert!(get_saved_query(&conn, &created.id).unwrap().is_none());
        assert!(load_saved_queries(&conn).unwrap().is_empty());
    }

    #[test]
    fn connections_load_sorted_by_name() {
        let conn = open();
        save_connection(&conn, &ConnectionRecord::new("b", "Warehouse")).unwrap();
        save_connection(&conn, &ConnectionRecord::new("a", "Analytics")).unwrap();
        save_connection(&conn, &ConnectionRecord::new("b", "Warehouse (prod)")).unwrap();

        let names: Vec<String> = load_connections(&conn)
            .unwrap()
            .into_iter()
            .map(|c| c.name)
            .collect();
        assert_eq!(names, vec!["Analytics", "Warehouse (prod)"]);
    }

    #[test]
    fn settings_round_trip_and_fall_back_on_bad_json() {
        let conn = open();
        assert_eq!(load_settings(&conn).unwrap(), AppSettings::default());

        let mut settings = AppSettings::default();
        settings.catalog.default_sort_by = SortBy::Name;
        save_settings(&conn, &settings).unwrap();
        assert_eq!(load_settings(&conn).unwrap(), settings);

        settings.catalog.restore_on_delete_failure = false;
        save_settings(&conn, &settings).unwrap();
        assert_eq!(load_settings(&conn).unwrap(), settings);

        conn.execute("UPDATE app_settings SET settings_json = 'nope' WHERE id = 1", [])
            .unwrap();
        assert_eq!(load_settings(&conn).unwrap(), AppSettings::default());
    }
}
