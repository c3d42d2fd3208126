//! Document store seam.
//!
//! Handlers never talk to MongoDB directly; they go through `DocumentStore`,
//! carried in `AppState` as `Arc<dyn DocumentStore>`.

pub mod mongo;

#[cfg(test)]
pub mod memory;

use async_trait::async_trait;
use bson::{oid::ObjectId, Bson, Document};
use futures_util::stream::BoxStream;
use thiserror::Error;

/// Lazy, single-pass sequence of documents from the store.
pub type DocumentStream = BoxStream<'static, Result<Document, StoreError>>;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{0}")]
    Backend(String),

    #[error("Failed to encode document: {0}")]
    Encode(#[from] bson::ser::Error),
}

/// Counts reported by a single-document update.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UpdateOutcome {
    pub matched: u64,
    pub modified: u64,
}

/// One join of a lookup: match `local_field` against `_id` in `from`, and
/// attach the zero-or-one matches as an array under `as_field`.
#[derive(Debug, Clone)]
pub struct Join {
    pub from: &'static str,
    pub local_field: &'static str,
    pub as_field: String,
}

#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Finds the document whose `_id` equals `key` exactly (no type coercion).
    async fn find_by_key(&self, collection: &str, key: &Bson)
        -> Result<Option<Document>, StoreError>;

    async fn insert(&self, collection: &str, document: Document) -> Result<ObjectId, StoreError>;

    /// `$set` of the given fields on one document.
    async fn set_fields(
        &self,
        collection: &str,
        id: ObjectId,
        fields: Document,
    ) -> Result<UpdateOutcome, StoreError>;

    /// `$unset` of one field on one document.
    async fn unset_field(
        &self,
        collection: &str,
        id: ObjectId,
        field: &str,
    ) -> Result<UpdateOutcome, StoreError>;

    /// Returns the number of deleted documents (0 or 1).
    async fn delete(&self, collection: &str, id: ObjectId) -> Result<u64, StoreError>;

    /// Enumerates `collection` (or the single document `filter`), augmenting
    /// each document per `joins`. A join with no match yields an empty array.
    async fn lookup(
        &self,
        collection: &str,
        filter: Option<ObjectId>,
        joins: &[Join],
    ) -> Result<DocumentStream, StoreError>;
}
