use thiserror::Error;

#[derive(Debug, Error)]
pub enum NavImpactError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Storage(#[from] navimpact_storage::StorageError),

    #[error(transparent)]
    Api(#[from] navimpact_client::ApiError),
}
