use thiserror::Error;

#[derive(Debug, Error)]
pub enum TracebenchError {
    #[error("data format error: {0}")]
    DataFormat(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("io error: {0}")]
    Io(String),
}

pub type Result<T> = std::result::Result<T, TracebenchError>;
