use api_client::ApiError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TrackerError {
    #[error("integration {0} already has a running task")]
    AlreadyTracked(String),

    #[error("no task is tracked for integration {0}")]
    NotTracked(String),

    #[error(transparent)]
    Api(#[from] ApiError),
}

pub type TrackerResult<T> = Result<T, TrackerError>;
