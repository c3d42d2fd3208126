//! In-memory `DocumentStore` for tests. Mirrors MongoDB semantics that the
//! resolution layer depends on: insertion order, exact-type `_id` matching in
//! lookups, and matched/modified counts on updates.

use std::collections::HashMap;

use async_trait::async_trait;
use bson::{oid::ObjectId, Bson, Document};
use futures_util::{stream, StreamExt};
use tokio::sync::RwLock;

use crate::db::{DocumentStore, DocumentStream, Join, StoreError, UpdateOutcome};

#[derive(Default)]
pub struct MemoryStore {
    collections: RwLock<HashMap<String, Vec<Document>>>,
    unavailable: bool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store whose every operation fails, as if the server were unreachable.
    pub fn unavailable() -> Self {
        Self {
            unavailable: true,
            ..Self::default()
        }
    }

    /// Seeds a raw document as-is, bypassing any validation.
    pub async fn put(&self, collection: &str, document: Document) {
        self.collections
            .write()
            .await
            .entry(collection.to_string())
            .or_default()
            .push(document);
    }

    pub async fn get(&self, collection: &str, id: ObjectId) -> Option<Document> {
        let key = Bson::ObjectId(id);
        self.collections
            .read()
            .await
            .get(collection)
            .and_then(|docs| docs.iter().find(|d| d.get("_id") == Some(&key)).cloned())
    }

    pub async fn count(&self, collection: &str) -> usize {
        self.collections
            .read()
            .await
            .get(collection)
            .map_or(0, Vec::len)
    }

    fn check(&self) -> Result<(), StoreError> {
        if self.unavailable {
            return Err(StoreError::Backend("store unavailable".into()));
        }
        Ok(())
    }
}

fn position(docs: &[Document], key: &Bson) -> Option<usize> {
    docs.iter().position(|d| d.get("_id") == Some(key))
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn find_by_key(
        &self,
        collection: &str,
        key: &Bson,
    ) -> Result<Option<Document>, StoreError> {
        self.check()?;
        let collections = self.collections.read().await;
        Ok(collections
            .get(collection)
            .and_then(|docs| position(docs, key).map(|i| docs[i].clone())))
    }

    async fn insert(
        &self,
        collection: &str,
        mut document: Document,
    ) -> Result<ObjectId, StoreError> {
        self.check()?;
        let id = match document.get("_id") {
            Some(Bson::ObjectId(id)) => *id,
            _ => {
                let id = ObjectId::new();
                document.insert("_id", id);
                id
            }
        };
        self.put(collection, document).await;
        Ok(id)
    }

    async fn set_fields(
        &self,
        collection: &str,
        id: ObjectId,
        fields: Document,
    ) -> Result<UpdateOutcome, StoreError> {
        self.check()?;
        let mut collections = self.collections.write().await;
        let Some(docs) = collections.get_mut(collection) else {
            return Ok(UpdateOutcome::default());
        };
        let Some(index) = position(docs, &Bson::ObjectId(id)) else {
            return Ok(UpdateOutcome::default());
        };

        let target = &mut docs[index];
        let mut changed = false;
        for (key, value) in fields {
            if target.get(&key) != Some(&value) {
                target.insert(key, value);
                changed = true;
            }
        }
        Ok(UpdateOutcome {
            matched: 1,
            modified: u64::from(changed),
        })
    }

    async fn unset_field(
        &self,
        collection: &str,
        id: ObjectId,
        field: &str,
    ) -> Result<UpdateOutcome, StoreError> {
        self.check()?;
        let mut collections = self.collections.write().await;
        let Some(docs) = collections.get_mut(collection) else {
            return Ok(UpdateOutcome::default());
        };
        let Some(index) = position(docs, &Bson::ObjectId(id)) else {
            return Ok(UpdateOutcome::default());
        };

        let removed = docs[index].remove(field).is_some();
        Ok(UpdateOutcome {
            matched: 1,
            modified: u64::from(removed),
        })
    }

    async fn delete(&self, collection: &str, id: ObjectId) -> Result<u64, StoreError> {
        self.check()?;
        let mut collections = self.collections.write().await;
        let Some(docs) = collections.get_mut(collection) else {
            return Ok(0);
        };
        match position(docs, &Bson::ObjectId(id)) {
            Some(index) => {
                docs.remove(index);
                Ok(1)
            }
            None => Ok(0),
        }
    }

    async fn lookup(
        &self,
        collection: &str,
        filter: Option<ObjectId>,
        joins: &[Join],
    ) -> Result<DocumentStream, StoreError> {
        self.check()?;
        let collections = self.collections.read().await;
        let empty = Vec::new();
        let source = collections.get(collection).unwrap_or(&empty);

        let mut results = Vec::new();
        for document in source {
            if let Some(id) = filter {
                if document.get("_id") != Some(&Bson::ObjectId(id)) {
                    continue;
                }
            }
            let mut augmented = document.clone();
            for join in joins {
                let local = document.get(join.local_field);
                let matches: Vec<Bson> = collections
                    .get(join.from)
                    .into_iter()
                    .flatten()
                    .filter(|target| local.is_some() && target.get("_id") == local)
                    .cloned()
                    .map(Bson::Document)
                    .collect();
                augmented.insert(join.as_field.clone(), Bson::Array(matches));
            }
            results.push(Ok(augmented));
        }

        Ok(stream::iter(results).boxed())
    }
}
