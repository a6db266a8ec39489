use thiserror::Error;

use crate::domain::handle::value_object::NativeHandle;

/// Errors produced inside the bridge.
///
/// None of these are ever raised back into the native SDK. Callback paths log and absorb them,
/// only the operations that create listeners or parse configuration return them to the caller.
#[derive(Debug, Error)]
pub enum Error {
    #[error("{0}")]
    LocalError(String),
    #[error("failed to marshal payload: {error}")]
    SerdeError {
        #[from]
        error: serde_json::Error,
    },
    #[error("managed runtime error: {0}")]
    RuntimeError(String),
    #[error("managed reference for {0} listener is not valid")]
    InvalidTarget(&'static str),
    #[error("native handle {0} is stale or unknown")]
    StaleHandle(NativeHandle),
}

impl Error {
    pub fn create_local_error(message: &str) -> Error {
        Error::LocalError(message.to_string())
    }

    pub fn create_runtime_error(message: &str) -> Error {
        Error::RuntimeError(message.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
