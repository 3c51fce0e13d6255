
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CellariumError {
    #[error("Config error: {0}")]
    Config(String),
    #[error("Source error: {0}")]
    Source(String),
    #[error("No data found in sheet")]
    EmptySheet,
    #[error("No header row found in sheet")]
    MissingHeader,
    #[error("Invalid parameters: {0}")]
    Parameters(String),
    #[error("Unknown tool: {0}")]
    UnknownTool(String),
    #[error("Server error: {0}")]
    Server(String),
}

pub type Result<T> = std::result::Result<T, CellariumError>;
