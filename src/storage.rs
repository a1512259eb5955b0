//! Durable key-value storage for the client.
//!
//! Plays the part `localStorage` plays for a browser client: a handful of
//! string keys that survive restarts.

mod memory;
mod sqlite;

pub use memory::MemoryStorage;
pub use sqlite::SqliteStorage;

/// Every key this client writes is namespaced with `@GoBarber:`.
pub const TOKEN_KEY: &str = "@GoBarber:token";
pub const USER_KEY: &str = "@GoBarber:user";

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("sqlite: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("storage lock poisoned")]
    Poisoned,
}

pub trait Storage: Send + Sync {
    fn get_item(&self, key: &str) -> Result<Option<String>>;
    fn set_item(&self, key: &str, value: &str) -> Result<()>;
    /// Removing a key that isn't there is not an error.
    fn remove_item(&self, key: &str) -> Result<()>;
}
