use std::{path::Path, sync::Mutex};

use log::{debug, info, trace};
use rusqlite::{Connection, OptionalExtension};

use super::{Error, Result, Storage};

/// [`Storage`] backed by a single SQLite table.
pub struct SqliteStorage {
    conn: Mutex<Connection>,
}

/// Build the storage.
impl SqliteStorage {
    pub fn open(path: impl AsRef<Path>) -> Result<SqliteStorage> {
        let path = path.as_ref();
        let conn = Connection::open(path)?;
        trace!("Opened storage at {}", path.display());
        SqliteStorage::init(conn)
    }

    /// Storage that lives as long as the value does. Mostly for tests.
    pub fn open_in_memory() -> Result<SqliteStorage> {
        SqliteStorage::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> Result<SqliteStorage> {
        trace!("Initializing storage...");

        conn.execute(
            "CREATE TABLE IF NOT EXISTS storage (
                key   TEXT PRIMARY KEY,
                value TEXT NOT NULL
            )",
            (),
        )?;

        info!("Finished initializing storage");

        Ok(SqliteStorage {
            conn: Mutex::new(conn),
        })
    }

    fn conn(&self) -> Result<std::sync::MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|_| Error::Poisoned)
    }
}

impl Storage for SqliteStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        debug!("Getting {}", key);
        let value = self
            .conn()?
            .query_row("SELECT value FROM storage WHERE key=?1", (key,), |row| {
                row.get::<usize, String>(0)
            })
            .optional()?;
        Ok(value)
    }

    fn set_item(&self, key: &str, value: &str) -> Result<()> {
        debug!("Setting {}", key);
        self.conn()?.execute(
            "INSERT INTO storage (key, value) VALUES (?1, ?2)
                ON CONFLICT(key) DO UPDATE SET value=excluded.value",
            (key, value),
        )?;
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<()> {
        debug!("Removing {}", key);
        self.conn()?
            .execute("DELETE FROM storage WHERE key=?1", (key,))?;
        Ok(())
    }
}
