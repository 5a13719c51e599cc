use makhzan_core::StoreError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SequenceError {
    #[error("counter store failed: {0}")]
    Counter(#[from] StoreError),
}
