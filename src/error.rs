#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("Failed to parse config module")]
    ParseModule(swc_ecma_parser::error::Error),
    #[error("Invalid config: {0}")]
    Config(String),
    #[error("{0}")]
    Error(String),
}
