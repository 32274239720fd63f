//! Dialog error type.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DialogError {
    #[error(transparent)]
    Engine(#[from] cnc_engine::EngineError),

    #[error(transparent)]
    Core(#[from] cnc_core::CoreError),
}

pub type Result<T> = std::result::Result<T, DialogError>;
