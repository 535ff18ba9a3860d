//! SQLite-backed row store.
//!
//! One write connection guarded by a mutex (transactions are opened with
//! `BEGIN IMMEDIATE`, so writers are serialized) and a small pool of read-only
//! connections handed out round-robin. The database runs in WAL mode so
//! readers never block the writer.

use super::error::{StoreError, StoreResult};
use super::models::{Album, Artist, Track};
use super::schema::CATALOG_VERSIONED_SCHEMAS;
use super::trait_def::{Field, Row, RowStore, RowTransaction, TableName};
use crate::sqlite_persistence::BASE_DB_VERSION;
use anyhow::{bail, Context};
use rusqlite::{params, Connection, OpenFlags};
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{debug, info};

#[derive(Clone)]
pub struct SqliteRowStore {
    read_pool: Vec<Arc<Mutex<Connection>>>,
    write_conn: Arc<Mutex<Connection>>,
    read_index: Arc<AtomicUsize>,
}

fn prepare_schema(conn: &mut Connection) -> anyhow::Result<()> {
    let db_version: i64 = conn.query_row("PRAGMA user_version", [], |r| r.get(0))?;

    let latest_version = CATALOG_VERSIONED_SCHEMAS.len() - 1;
    let latest_schema = &CATALOG_VERSIONED_SCHEMAS[latest_version];

    let table_count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM sqlite_master WHERE type='table' AND name NOT LIKE 'sqlite_%'",
        [],
        |r| r.get(0),
    )?;

    if table_count == 0 {
        info!("Creating catalog db schema at version {}", latest_version);
        let tx = conn.transaction()?;
        latest_schema.create(&tx)?;
        tx.commit()?;
        return Ok(());
    }

    if db_version < BASE_DB_VERSION as i64 {
        bail!(
            "Database has user_version {} and {} tables but was not created by this server",
            db_version,
            table_count
        );
    }

    let current_version = (db_version - BASE_DB_VERSION as i64) as usize;
    if current_version != latest_version {
        bail!(
            "Database schema version {} does not match the supported version {}",
            current_version,
            latest_version
        );
    }

    latest_schema
        .validate(conn)
        .context("Catalog database schema validation failed")
}

impl SqliteRowStore {
    /// Open (creating if needed) the catalog database at `db_path`.
    ///
    /// # Arguments
    /// * `db_path` - Path to the SQLite database file
    /// * `read_pool_size` - Number of read-only connections (at least 1)
    pub fn new<P: AsRef<Path>>(db_path: P, read_pool_size: usize) -> StoreResult<Self> {
        let db_path_ref = db_path.as_ref();

        let mut write_conn = Connection::open_with_flags(
            db_path_ref,
            OpenFlags::SQLITE_OPEN_READ_WRITE
                | OpenFlags::SQLITE_OPEN_CREATE
                | OpenFlags::SQLITE_OPEN_URI
                | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )?;

        prepare_schema(&mut write_conn)
            .with_context(|| format!("Failed to prepare catalog database {:?}", db_path_ref))?;

        write_conn.pragma_update(None, "journal_mode", "WAL")?;

        let artist_count: i64 = write_conn.query_row("SELECT COUNT(*) FROM artists", [], |r| r.get(0))?;
        let album_count: i64 = write_conn.query_row("SELECT COUNT(*) FROM albums", [], |r| r.get(0))?;
        let track_count: i64 = write_conn.query_row("SELECT COUNT(*) FROM tracks", [], |r| r.get(0))?;

        info!(
            "Opened catalog: {} artists, {} albums, {} tracks",
            artist_count, album_count, track_count
        );

        let read_pool_size = read_pool_size.max(1);
        let mut read_pool = Vec::with_capacity(read_pool_size);
        for _ in 0..read_pool_size {
            let read_conn = Connection::open_with_flags(
                db_path_ref,
                OpenFlags::SQLITE_OPEN_READ_ONLY
                    | OpenFlags::SQLITE_OPEN_URI
                    | OpenFlags::SQLITE_OPEN_NO_MUTEX,
            )?;
            read_pool.push(Arc::new(Mutex::new(read_conn)));
        }

        Ok(SqliteRowStore {
            read_pool,
            write_conn: Arc::new(Mutex::new(write_conn)),
            read_index: Arc::new(AtomicUsize::new(0)),
        })
    }

    fn get_read_conn(&self) -> &Mutex<Connection> {
        let index = self.read_index.fetch_add(1, Ordering::SeqCst) % self.read_pool.len();
        &self.read_pool[index]
    }
}

impl RowStore for SqliteRowStore {
    fn begin(&self) -> StoreResult<Box<dyn RowTransaction + '_>> {
        let conn = self.write_conn.lock()?;
        conn.execute("BEGIN IMMEDIATE", [])?;
        Ok(Box::new(SqliteTransaction { conn, open: true }))
    }

    fn begin_read(&self) -> StoreResult<Box<dyn RowTransaction + '_>> {
        let conn = self.get_read_conn().lock()?;
        conn.execute("BEGIN", [])?;
        Ok(Box::new(SqliteTransaction { conn, open: true }))
    }
}

/// A transaction holding its connection's lock until commit or drop.
struct SqliteTransaction<'a> {
    conn: MutexGuard<'a, Connection>,
    open: bool,
}

fn select_columns(table: TableName) -> &'static str {
    match table {
        TableName::Artists => "id, name, age",
        TableName::Albums => "id, artist_id, name, genre",
        TableName::Tracks => "id, album_id, artist_id, name, duration, times_played",
    }
}

fn parse_row(table: TableName, row: &rusqlite::Row) -> rusqlite::Result<Row> {
    Ok(match table {
        TableName::Artists => Row::Artist(Artist {
            id: row.get(0)?,
            name: row.get(1)?,
            age: row.get(2)?,
        }),
        TableName::Albums => Row::Album(Album {
            id: row.get(0)?,
            artist_id: row.get(1)?,
            name: row.get(2)?,
            genre: row.get(3)?,
        }),
        TableName::Tracks => Row::Track(Track {
            id: row.get(0)?,
            album_id: row.get(1)?,
            artist_id: row.get(2)?,
            name: row.get(3)?,
            duration: row.get(4)?,
            times_played: row.get::<_, i64>(5)?.max(0) as u64,
        }),
    })
}

fn times_played_param(times_played: u64) -> i64 {
    i64::try_from(times_played).unwrap_or(i64::MAX)
}

impl RowTransaction for SqliteTransaction<'_> {
    fn get_by_key(&self, table: TableName, id: &str) -> StoreResult<Option<Row>> {
        let mut stmt = self.conn.prepare_cached(&format!(
            "SELECT {} FROM {} WHERE id = ?1",
            select_columns(table),
            table
        ))?;

        match stmt.query_row(params![id], |row| parse_row(table, row)) {
            Ok(row) => Ok(Some(row)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn get_where(&self, table: TableName, field: Field, value: &str) -> StoreResult<Vec<Row>> {
        field.check(table)?;
        let mut stmt = self.conn.prepare_cached(&format!(
            "SELECT {} FROM {} WHERE {} = ?1",
            select_columns(table),
            table,
            field.column()
        ))?;
        let rows = stmt
            .query_map(params![value], |row| parse_row(table, row))?
            .collect::<Result<Vec<Row>, _>>()?;
        Ok(rows)
    }

    fn get_all(&self, table: TableName) -> StoreResult<Vec<Row>> {
        let mut stmt = self.conn.prepare_cached(&format!(
            "SELECT {} FROM {} ORDER BY rowid",
            select_columns(table),
            table
        ))?;
        let rows = stmt
            .query_map([], |row| parse_row(table, row))?
            .collect::<Result<Vec<Row>, _>>()?;
        Ok(rows)
    }

    fn insert(&self, row: &Row) -> StoreResult<()> {
        let result = match row {
            Row::Artist(artist) => self.conn.execute(
                "INSERT INTO artists (id, name, age) VALUES (?1, ?2, ?3)",
                params![&artist.id, &artist.name, artist.age],
            ),
            Row::Album(album) => self.conn.execute(
                "INSERT INTO albums (id, artist_id, name, genre) VALUES (?1, ?2, ?3, ?4)",
                params![&album.id, &album.artist_id, &album.name, &album.genre],
            ),
            Row::Track(track) => self.conn.execute(
                "INSERT INTO tracks (id, album_id, artist_id, name, duration, times_played)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![
                    &track.id,
                    &track.album_id,
                    &track.artist_id,
                    &track.name,
                    track.duration,
                    times_played_param(track.times_played)
                ],
            ),
        };

        match result {
            Ok(_) => Ok(()),
            Err(rusqlite::Error::SqliteFailure(err, _))
                if err.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_PRIMARYKEY
                    || err.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE =>
            {
                debug!("Key violation inserting {} into {}", row.id(), row.table());
                Err(StoreError::KeyViolation {
                    table: row.table(),
                    id: row.id().to_string(),
                })
            }
            Err(e) => Err(e.into()),
        }
    }

    fn update(&self, row: &Row) -> StoreResult<bool> {
        let changed = match row {
            Row::Artist(artist) => self.conn.execute(
                "UPDATE artists SET name = ?1, age = ?2 WHERE id = ?3",
                params![&artist.name, artist.age, &artist.id],
            )?,
            Row::Album(album) => self.conn.execute(
                "UPDATE albums SET artist_id = ?1, name = ?2, genre = ?3 WHERE id = ?4",
                params![&album.artist_id, &album.name, &album.genre, &album.id],
            )?,
            Row::Track(track) => self.conn.execute(
                "UPDATE tracks SET album_id = ?1, artist_id = ?2, name = ?3, duration = ?4, times_played = ?5
                 WHERE id = ?6",
                params![
                    &track.album_id,
                    &track.artist_id,
                    &track.name,
                    track.duration,
                    times_played_param(track.times_played),
                    &track.id
                ],
            )?,
        };
        Ok(changed > 0)
    }

    fn delete(&self, table: TableName, id: &str) -> StoreResult<bool> {
        let deleted = self
            .conn
            .execute(&format!("DELETE FROM {} WHERE id = ?1", table), params![id])?;
        Ok(deleted > 0)
    }

    fn commit(mut self: Box<Self>) -> StoreResult<()> {
        self.conn.execute("COMMIT", [])?;
        self.open = false;
        Ok(())
    }
}

impl Drop for SqliteTransaction<'_> {
    fn drop(&mut self) {
        if self.open {
            let _ = self.conn.execute("ROLLBACK", []);
        }
    }
}
