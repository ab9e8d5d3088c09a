use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("validation failed: {0}")]
    Validation(String),
    #[error("NORAD id {0} is already registered")]
    DuplicateNoradId(u32),
}
