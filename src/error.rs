use std::io;

use thiserror::Error;

use crate::config::ConfigError;
use crate::surface::SelectorError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error("configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("selector: {0}")]
    Selector(#[from] SelectorError),
}

pub type Result<T, E = AppError> = std::result::Result<T, E>;
