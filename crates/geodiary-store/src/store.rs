//! Main store implementation.

use std::path::Path;

use rand::Rng;
use rand::distr::Alphanumeric;
use rusqlite::{Connection, OptionalExtension};
use tracing::{debug, info};

use geodiary_types::{DeviceId, Point, SyncOutcome};

use crate::error::{Error, Result};
use crate::schema;

/// Store key holding the device identity token.
const KEY_DEVICE_ID: &str = "deviceId";

/// Store key holding the JSON-encoded point queue.
const KEY_LOCATIONS: &str = "locations";

/// SQLite-backed store for the device identity and the point queue.
///
/// Constructed once at startup and handed to every consumer; it is the only
/// owner of the persisted queue representation. Every mutation is written
/// through before the call returns, so a crash after an `append` never loses
/// the point.
pub struct Store {
    conn: Connection,
}

impl Store {
    /// Open or create a database at the given path.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            if !parent.exists() {
                std::fs::create_dir_all(parent).map_err(|e| Error::CreateDirectory {
                    path: parent.to_path_buf(),
                    source: e,
                })?;
            }
        }

        info!("Opening database at {}", path.display());
        let conn = Connection::open(path)?;

        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA synchronous = NORMAL;",
        )?;

        schema::initialize(&conn)?;

        Ok(Self { conn })
    }

    /// Open the default database location.
    pub fn open_default() -> Result<Self> {
        Self::open(crate::default_db_path())
    }

    /// Open an in-memory database (for testing).
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        schema::initialize(&conn)?;
        Ok(Self { conn })
    }

    // === Keyed string state ===

    fn kv_get(&self, key: &str) -> Result<Option<String>> {
        let value = self
            .conn
            .query_row("SELECT value FROM kv WHERE key = ?", [key], |row| {
                row.get(0)
            })
            .optional()?;
        Ok(value)
    }

    fn kv_set(&self, key: &str, value: &str) -> Result<()> {
        self.conn.execute(
            "INSERT INTO kv (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = ?2",
            rusqlite::params![key, value],
        )?;
        Ok(())
    }

    fn kv_delete(&self, key: &str) -> Result<()> {
        self.conn.execute("DELETE FROM kv WHERE key = ?", [key])?;
        Ok(())
    }
}

// Device identity
impl Store {
    /// Return the persisted device id, generating and persisting a fresh one
    /// on first use.
    ///
    /// Idempotent within and across sessions; the token is never regenerated
    /// while the local state survives.
    pub fn device_id(&self) -> Result<DeviceId> {
        if let Some(token) = self.kv_get(KEY_DEVICE_ID)? {
            return Ok(DeviceId::new(token));
        }

        let token = generate_token();
        self.kv_set(KEY_DEVICE_ID, &token)?;
        info!("Generated device id {}", token);
        Ok(DeviceId::new(token))
    }
}

/// Generate a fresh identity token.
///
/// `web-` plus eight random lowercase-alphanumeric characters: collision
/// resistant enough for client-side attribution, not a secret.
fn generate_token() -> String {
    let suffix: String = rand::rng()
        .sample_iter(Alphanumeric)
        .take(8)
        .map(|b| (b as char).to_ascii_lowercase())
        .collect();
    format!("web-{suffix}")
}

// Point queue
impl Store {
    /// Append one point to the end of the queue and persist it.
    pub fn append(&self, point: &Point) -> Result<()> {
        point.validate()?;

        let mut queue = self.all()?;
        queue.push(point.clone());
        self.write_queue(&queue)?;

        debug!(
            "Appended point ({:.5}, {:.5}), queue length {}",
            point.latitude,
            point.longitude,
            queue.len()
        );
        Ok(())
    }

    /// Decoded snapshot of the queue, oldest first.
    ///
    /// Mutating the returned vector does not affect stored state. Legacy
    /// timestamp and key shapes are normalized during decode; an entry that
    /// cannot be normalized is an error rather than silent data loss.
    pub fn all(&self) -> Result<Vec<Point>> {
        let raw = match self.kv_get(KEY_LOCATIONS)? {
            Some(raw) => raw,
            None => return Ok(Vec::new()),
        };

        let queue: Vec<Point> = serde_json::from_str(&raw)?;
        for point in &queue {
            point.validate()?;
        }
        Ok(queue)
    }

    /// Number of queued points.
    pub fn len(&self) -> Result<usize> {
        Ok(self.all()?.len())
    }

    /// Whether the queue is empty.
    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }

    /// Remove exactly one point at `index` (0-based, oldest first).
    ///
    /// Later elements shift down by one, so previously captured indexes are
    /// stale afterwards and must be re-derived from a fresh [`Store::all`].
    ///
    /// # Errors
    ///
    /// [`Error::IndexOutOfRange`] when `index` is not in `[0, len)`; the
    /// queue is left unchanged.
    pub fn delete_at(&self, index: usize) -> Result<()> {
        let mut queue = self.all()?;
        if index >= queue.len() {
            return Err(Error::IndexOutOfRange {
                index,
                len: queue.len(),
            });
        }

        queue.remove(index);
        self.write_queue(&queue)?;
        Ok(())
    }

    /// Empty the queue unconditionally.
    pub fn clear(&self) -> Result<()> {
        self.kv_delete(KEY_LOCATIONS)?;
        debug!("Cleared point queue");
        Ok(())
    }

    /// Remove exactly the submitted points that the outcome confirms
    /// delivered, leaving failed ones in place in their original relative
    /// order so a retry resubmits only the undelivered subset.
    ///
    /// Returns the number of points removed. A failed request removes
    /// nothing; a partial sequential success removes only the confirmed
    /// points, never the whole queue.
    pub fn reconcile_after_sync(
        &self,
        outcome: &SyncOutcome,
        submitted: &[Point],
    ) -> Result<usize> {
        let flags = outcome.delivered_flags(submitted.len());
        let mut queue = self.all()?;
        let mut removed = 0;

        for (point, delivered) in submitted.iter().zip(flags) {
            if !delivered {
                continue;
            }
            if let Some(pos) = queue.iter().position(|queued| queued == point) {
                queue.remove(pos);
                removed += 1;
            }
        }

        self.write_queue(&queue)?;
        info!(
            "Reconciled sync outcome: {} delivered, {} still queued",
            removed,
            queue.len()
        );
        Ok(removed)
    }

    fn write_queue(&self, queue: &[Point]) -> Result<()> {
        let encoded = serde_json::to_string(queue)?;
        self.kv_set(KEY_LOCATIONS, &encoded)
    }
}
