mod session_store;

pub use session_store::{Error, SessionStore};
