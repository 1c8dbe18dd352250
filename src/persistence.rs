//! # SQLite Record Store
//!
//! [`RecordStore`] backed by a single SQLite table. Rows are keyed by an
//! autoincrement `seq` column so reads come back in insertion order even
//! across sessions that restart record indices.

use chrono::{DateTime, SecondsFormat, Utc};
use log::info;
use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension, Row};

use crate::error::Result;
use crate::record::LogRecord;
use crate::store::RecordStore;

const SELECT_COLUMNS: &str = "idx, timestamp, latitude, longitude, speed_kmh, altitude_m, \
     segment_distance_m, elevation_delta_m, grade_percent, total_distance_m, \
     curvature_percent, curve_radius_m";

/// SQLite-backed record store.
pub struct SqliteRecordStore {
    db: Connection,
}

impl SqliteRecordStore {
    /// Open (or create) a store at `db_path`.
    pub fn new(db_path: &str) -> Result<Self> {
        let db = Connection::open(db_path)?;
        Self::init_schema(&db)?;
        info!("[RecordStore] Opened {}", db_path);
        Ok(Self { db })
    }

    /// Create an in-memory database (for testing).
    pub fn in_memory() -> Result<Self> {
        Self::new(":memory:")
    }

    fn init_schema(conn: &Connection) -> Result<()> {
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS log_records (
                seq INTEGER PRIMARY KEY AUTOINCREMENT,
                idx INTEGER NOT NULL,
                timestamp TEXT NOT NULL,
                latitude REAL NOT NULL,
                longitude REAL NOT NULL,
                speed_kmh REAL NOT NULL,
                altitude_m REAL NOT NULL,
                segment_distance_m REAL NOT NULL,
                elevation_delta_m REAL,
                grade_percent REAL,
                total_distance_m REAL NOT NULL,
                curvature_percent REAL,
                curve_radius_m REAL
            );
            "#,
        )?;
        Ok(())
    }

    fn read_row(row: &Row<'_>) -> rusqlite::Result<LogRecord> {
        let index: i64 = row.get(0)?;
        let timestamp: String = row.get(1)?;
        let timestamp = DateTime::parse_from_rfc3339(&timestamp)
            .map_err(|e| rusqlite::Error::FromSqlConversionFailure(1, Type::Text, Box::new(e)))?
            .with_timezone(&Utc);
        Ok(LogRecord {
            index: index as u64,
            timestamp,
            latitude: row.get(2)?,
            longitude: row.get(3)?,
            speed_kmh: row.get(4)?,
            altitude_m: row.get(5)?,
            segment_distance_m: row.get(6)?,
            elevation_delta_m: row.get(7)?,
            grade_percent: row.get(8)?,
            total_distance_m: row.get(9)?,
            curvature_percent: row.get(10)?,
            curve_radius_m: row.get(11)?,
        })
    }
}

impl RecordStore for SqliteRecordStore {
    fn append(&mut self, records: &[LogRecord]) -> Result<()> {
        let tx = self.db.transaction()?;
        {
            let mut stmt = tx.prepare(
                "INSERT INTO log_records (idx, timestamp, latitude, longitude, speed_kmh, \
                 altitude_m, segment_distance_m, elevation_delta_m, grade_percent, \
                 total_distance_m, curvature_percent, curve_radius_m) \
                 VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
            )?;
            for record in records {
                stmt.execute(params![
                    record.index as i64,
                    // Full precision; export keeps milliseconds only
                    record.timestamp.to_rfc3339_opts(SecondsFormat::AutoSi, true),
                    record.latitude,
                    record.longitude,
                    record.speed_kmh,
                    record.altitude_m,
                    record.segment_distance_m,
                    record.elevation_delta_m,
                    record.grade_percent,
                    record.total_distance_m,
                    record.curvature_percent,
                    record.curve_radius_m,
                ])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    fn load_all(&self) -> Result<Vec<LogRecord>> {
        let mut stmt = self.db.prepare(&format!(
            "SELECT {} FROM log_records ORDER BY seq",
            SELECT_COLUMNS
        ))?;
        let records = stmt
            .query_map([], Self::read_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(records)
    }

    fn last(&self) -> Result<Option<LogRecord>> {
        let record = self
            .db
            .query_row(
                &format!(
                    "SELECT {} FROM log_records ORDER BY seq DESC LIMIT 1",
                    SELECT_COLUMNS
                ),
                [],
                Self::read_row,
            )
            .optional()?;
        Ok(record)
    }

    fn count(&self) -> Result<usize> {
        let count: i64 = self
            .db
            .query_row("SELECT COUNT(*) FROM log_records", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    fn clear(&mut self) -> Result<()> {
        self.db.execute("DELETE FROM log_records", [])?;
        info!("[RecordStore] Cleared");
        Ok(())
    }
}
