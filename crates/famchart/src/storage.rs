//! Persistence boundary.
//!
//! The core never performs I/O; a wrapper application that wants saved
//! charts implements this trait. The methods are runtime-agnostic async:
//! they return boxed futures and prescribe no executor. The chart core is
//! single-threaded, so the futures are local (no `Send` bound), which
//! keeps wasm and interior-mutability backends trivial; tests typically
//! drive them with `futures::executor::block_on`.

use famchart_core::Person;
use futures::future::LocalBoxFuture;

#[derive(Debug, thiserror::Error)]
#[error("storage backend error: {message}")]
pub struct StorageError {
    pub message: String,
}

impl StorageError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

pub trait PersonStorage {
    /// Upserts one person record.
    fn save_person<'a>(
        &'a self,
        person: &'a Person,
    ) -> LocalBoxFuture<'a, Result<(), StorageError>>;

    /// Removes one person record.
    fn delete_person<'a>(&'a self, id: &'a str) -> LocalBoxFuture<'a, Result<(), StorageError>>;
}
