use crate::{config, storage, toast};

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("config: {0}")]
    Config(#[from] config::Error),
    #[error("storage: {0}")]
    Storage(#[from] storage::Error),
    #[error("toasts: {0}")]
    Toast(#[from] toast::Error),
    #[error("templates: {0}")]
    Template(#[from] tera::Error),
    #[error("logger: {0}")]
    Logger(#[from] log::SetLoggerError),
    #[error("server: {0}")]
    Server(Box<dyn std::error::Error + Send + Sync>),
}
