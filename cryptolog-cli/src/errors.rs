use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("config error: {0}")]
    Config(#[from] crate::config::ConfigError),
    #[error("{0}")]
    Core(#[from] cryptolog_core::CryptologError),
    #[error("cannot create output file {path}: {source}")]
    Output {
        path: String,
        #[source]
        source: std::io::Error,
    },
}
