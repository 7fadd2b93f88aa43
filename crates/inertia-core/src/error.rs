use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to install input filter: {0}")]
    FilterInstall(String),

    #[error("Failed to post synthetic scroll event: {0}")]
    Synthesis(String),

    #[error("Async runtime unavailable: {0}")]
    Runtime(String),

    #[error("{0}")]
    Other(String),
}

impl From<toml::de::Error> for Error {
    fn from(e: toml::de::Error) -> Self {
        Error::Config(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
