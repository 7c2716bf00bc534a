//! Event record repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Persist `events` rows and their owned `images` rows.
//! - Keep SQL details inside the core persistence boundary.
//!
//! # Invariants
//! - Write paths call `NewEventRecord::validate()` before SQL mutations.
//! - An event and its image rows are inserted and deleted in one
//!   transaction.
//! - Image rows are returned in insertion (upload) order.
//! - Lists are ordered by `event_date DESC, id DESC`.

use crate::db::DbError;
use crate::model::event::{
    stored_image_name, EventId, EventRecord, EventValidationError, NewEventRecord, WaitTime,
};
use chrono::NaiveDate;
use rusqlite::{params, Connection, Row, Transaction, TransactionBehavior};
use std::error::Error;
use std::fmt::{Display, Formatter};

const EVENT_SELECT_SQL: &str = "SELECT
    id,
    event_date,
    venue,
    companion,
    spending,
    items,
    tags,
    wait_time,
    notes
FROM events";

const REQUIRED_COLUMNS: &[(&str, &[&str])] = &[
    (
        "events",
        &[
            "id",
            "event_date",
            "venue",
            "companion",
            "spending",
            "items",
            "tags",
            "wait_time",
            "notes",
        ],
    ),
    ("images", &["id", "event_id", "filename"]),
];

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for event persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Validation(EventValidationError),
    Db(DbError),
    NotFound(EventId),
    InvalidData(String),
    MissingRequiredTable(&'static str),
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "event record not found: {id}"),
            Self::InvalidData(message) => write!(f, "invalid persisted event data: {message}"),
            Self::MissingRequiredTable(table) => write!(f, "missing required table `{table}`"),
            Self::MissingRequiredColumn { table, column } => {
                write!(f, "missing required column `{table}.{column}`")
            }
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<EventValidationError> for RepoError {
    fn from(value: EventValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Query options for listing event records.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventListQuery {
    /// Substring matched against the raw tag string.
    pub tag: Option<String>,
}

/// Repository interface for event records and their image rows.
pub trait EventRepository {
    /// Inserts one record plus one image row per attachment.
    ///
    /// Returns the persisted record with store-derived image filenames.
    fn create_event(&mut self, record: &NewEventRecord) -> RepoResult<EventRecord>;
    fn get_event(&self, id: EventId) -> RepoResult<Option<EventRecord>>;
    fn list_events(&self, query: &EventListQuery) -> RepoResult<Vec<EventRecord>>;
    /// Raw tag strings of every record, in list order.
    fn list_raw_tags(&self) -> RepoResult<Vec<String>>;
    /// Removes image rows then the record row. Returns removed filenames.
    fn delete_event(&mut self, id: EventId) -> RepoResult<Vec<String>>;
}

/// SQLite-backed event repository.
pub struct SqliteEventRepository<'conn> {
    conn: &'conn mut Connection,
}

impl<'conn> SqliteEventRepository<'conn> {
    /// Constructs a repository from a migrated connection.
    pub fn try_new(conn: &'conn mut Connection) -> RepoResult<Self> {
        ensure_event_connection_ready(conn)?;
        Ok(Self { conn })
    }
}

impl EventRepository for SqliteEventRepository<'_> {
    fn create_event(&mut self, record: &NewEventRecord) -> RepoResult<EventRecord> {
        record.validate()?;

        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        tx.execute(
            "INSERT INTO events (
                event_date,
                venue,
                companion,
                spending,
                items,
                tags,
                wait_time,
                notes
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8);",
            params![
                record.date,
                record.venue.as_str(),
                record.companion.as_str(),
                record.spending,
                record.items.as_str(),
                record.tags.as_str(),
                record.wait_time.label(),
                record.notes.as_str(),
            ],
        )?;
        let id = tx.last_insert_rowid();

        let mut images = Vec::with_capacity(record.images.len());
        for upload in &record.images {
            let filename = stored_image_name(id, &upload.original_name);
            tx.execute(
                "INSERT INTO images (event_id, filename) VALUES (?1, ?2);",
                params![id, filename.as_str()],
            )?;
            images.push(filename);
        }
        tx.commit()?;

        Ok(EventRecord {
            id,
            date: record.date,
            venue: record.venue.clone(),
            companion: record.companion.clone(),
            spending: record.spending,
            items: record.items.clone(),
            tags: record.tags.clone(),
            wait_time: record.wait_time,
            notes: record.notes.clone(),
            images,
        })
    }

    fn get_event(&self, id: EventId) -> RepoResult<Option<EventRecord>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{EVENT_SELECT_SQL} WHERE id = ?1;"))?;
        let mut rows = stmt.query([id])?;
        if let Some(row) = rows.next()? {
            let mut record = parse_event_row(row)?;
            record.images = load_image_filenames(self.conn, record.id)?;
            return Ok(Some(record));
        }

        Ok(None)
    }

    fn list_events(&self, query: &EventListQuery) -> RepoResult<Vec<EventRecord>> {
        let mut sql = format!("{EVENT_SELECT_SQL} WHERE 1 = 1");
        let pattern = query.tag.as_deref().map(like_contains_pattern);
        if pattern.is_some() {
            sql.push_str(" AND tags LIKE ?1 ESCAPE '\\'");
        }
        sql.push_str(" ORDER BY event_date DESC, id DESC;");

        let mut stmt = self.conn.prepare(&sql)?;
        let mut rows = match pattern.as_deref() {
            Some(pattern) => stmt.query([pattern])?,
            None => stmt.query([])?,
        };

        let mut records = Vec::new();
        while let Some(row) = rows.next()? {
            records.push(parse_event_row(row)?);
        }
        for record in &mut records {
            record.images = load_image_filenames(self.conn, record.id)?;
        }

        Ok(records)
    }

    fn list_raw_tags(&self) -> RepoResult<Vec<String>> {
        let mut stmt = self
            .conn
            .prepare("SELECT tags FROM events ORDER BY event_date DESC, id DESC;")?;
        let mut rows = stmt.query([])?;
        let mut tags = Vec::new();
        while let Some(row) = rows.next()? {
            tags.push(row.get(0)?);
        }
        Ok(tags)
    }

    fn delete_event(&mut self, id: EventId) -> RepoResult<Vec<String>> {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        if !event_exists_in_tx(&tx, id)? {
            return Err(RepoError::NotFound(id));
        }

        let filenames = load_image_filenames(&tx, id)?;
        tx.execute("DELETE FROM images WHERE event_id = ?1;", [id])?;
        tx.execute("DELETE FROM events WHERE id = ?1;", [id])?;
        tx.commit()?;

        Ok(filenames)
    }
}

/// Builds a `LIKE` pattern matching `value` anywhere, with wildcards escaped.
pub fn like_contains_pattern(value: &str) -> String {
    let mut pattern = String::with_capacity(value.len() + 2);
    pattern.push('%');
    for ch in value.chars() {
        if matches!(ch, '\\' | '%' | '_') {
            pattern.push('\\');
        }
        pattern.push(ch);
    }
    pattern.push('%');
    pattern
}

fn parse_event_row(row: &Row<'_>) -> RepoResult<EventRecord> {
    let id: EventId = row.get("id")?;
    let date: NaiveDate = row.get("event_date")?;

    let wait_time_text: String = row.get("wait_time")?;
    let wait_time = WaitTime::from_label(&wait_time_text).ok_or_else(|| {
        RepoError::InvalidData(format!(
            "invalid wait time `{wait_time_text}` in events.wait_time"
        ))
    })?;

    let spending: i64 = row.get("spending")?;
    if spending < 0 {
        return Err(RepoError::InvalidData(format!(
            "negative spending `{spending}` in events.spending"
        )));
    }

    Ok(EventRecord {
        id,
        date,
        venue: row.get("venue")?,
        companion: row.get("companion")?,
        spending,
        items: row.get("items")?,
        tags: row.get("tags")?,
        wait_time,
        notes: row.get("notes")?,
        images: Vec::new(),
    })
}

fn load_image_filenames(conn: &Connection, event_id: EventId) -> RepoResult<Vec<String>> {
    let mut stmt =
        conn.prepare("SELECT filename FROM images WHERE event_id = ?1 ORDER BY id ASC;")?;
    let mut rows = stmt.query([event_id])?;
    let mut filenames = Vec::new();
    while let Some(row) = rows.next()? {
        filenames.push(row.get(0)?);
    }
    Ok(filenames)
}

fn event_exists_in_tx(tx: &Transaction<'_>, id: EventId) -> RepoResult<bool> {
    let exists: i64 = tx.query_row(
        "SELECT EXISTS(SELECT 1 FROM events WHERE id = ?1);",
        [id],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

fn ensure_event_connection_ready(conn: &Connection) -> RepoResult<()> {
    for &(table, columns) in REQUIRED_COLUMNS {
        if !table_exists(conn, table)? {
            return Err(RepoError::MissingRequiredTable(table));
        }
        for &column in columns {
            if !table_has_column(conn, table, column)? {
                return Err(RepoError::MissingRequiredColumn { table, column });
            }
        }
    }
    Ok(())
}

fn table_exists(conn: &Connection, table: &str) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

fn table_has_column(conn: &Connection, table: &str, column: &str) -> RepoResult<bool> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table});"))?;
    let mut rows = stmt.query([])?;
    while let Some(row) = rows.next()? {
        let current: String = row.get(1)?;
        if current == column {
            return Ok(true);
        }
    }
    Ok(false)
}

#[cfg(test)]
mod tests {
    use super::{like_contains_pattern, RepoError, SqliteEventRepository};
    use rusqlite::Connection;

    #[test]
    fn like_pattern_escapes_wildcards() {
        assert_eq!(like_contains_pattern("a"), "%a%");
        assert_eq!(like_contains_pattern("50%_off"), "%50\\%\\_off%");
        assert_eq!(like_contains_pattern("a\\b"), "%a\\\\b%");
    }

    #[test]
    fn try_new_rejects_unmigrated_connections() {
        let mut conn = Connection::open_in_memory().unwrap();
        assert!(matches!(
            SqliteEventRepository::try_new(&mut conn),
            Err(RepoError::MissingRequiredTable("events"))
        ));

        conn.execute_batch(
            "CREATE TABLE events (
                id INTEGER PRIMARY KEY,
                event_date TEXT NOT NULL,
                venue TEXT,
                companion TEXT,
                spending INTEGER,
                items TEXT,
                tags TEXT,
                wait_time TEXT
            );",
        )
        .unwrap();
        assert!(matches!(
            SqliteEventRepository::try_new(&mut conn),
            Err(RepoError::MissingRequiredColumn {
                table: "events",
                column: "notes"
            })
        ));

        conn.execute_batch("ALTER TABLE events ADD COLUMN notes TEXT;")
            .unwrap();
        assert!(matches!(
            SqliteEventRepository::try_new(&mut conn),
            Err(RepoError::MissingRequiredTable("images"))
        ));
    }
}
