use async_trait::async_trait;
use bson::{doc, oid::ObjectId, Bson, Document};
use futures_util::{StreamExt, TryStreamExt};
use mongodb::{Client, Collection, Database};
use tracing::{debug, info};

use crate::db::{DocumentStore, DocumentStream, Join, StoreError, UpdateOutcome};

/// MongoDB-backed document store. The driver pools connections internally,
/// so one instance is built at startup and shared by every request.
#[derive(Clone)]
pub struct MongoStore {
    db: Database,
}

impl MongoStore {
    /// Connects and pings the database so misconfiguration fails at startup.
    pub async fn connect(uri: &str, db_name: &str) -> Result<Self, StoreError> {
        info!("Connecting to MongoDB...");

        let client = Client::with_uri_str(uri)
            .await
            .map_err(|e| StoreError::Backend(format!("Failed to connect to MongoDB: {e}")))?;

        let db = client.database(db_name);
        db.run_command(doc! { "ping": 1 })
            .await
            .map_err(|e| StoreError::Backend(format!("MongoDB ping failed: {e}")))?;

        info!("Connected to MongoDB database '{db_name}'");
        Ok(Self { db })
    }

    fn collection(&self, name: &str) -> Collection<Document> {
        self.db.collection::<Document>(name)
    }
}

#[async_trait]
impl DocumentStore for MongoStore {
    async fn find_by_key(
        &self,
        collection: &str,
        key: &Bson,
    ) -> Result<Option<Document>, StoreError> {
        self.collection(collection)
            .find_one(doc! { "_id": key.clone() })
            .await
            .map_err(|e| StoreError::Backend(format!("Find in '{collection}' failed: {e}")))
    }

    async fn insert(&self, collection: &str, document: Document) -> Result<ObjectId, StoreError> {
        let result = self
            .collection(collection)
            .insert_one(document)
            .await
            .map_err(|e| StoreError::Backend(format!("Insert into '{collection}' failed: {e}")))?;

        result
            .inserted_id
            .as_object_id()
            .ok_or_else(|| StoreError::Backend("Inserted document has no ObjectId".into()))
    }

    async fn set_fields(
        &self,
        collection: &str,
        id: ObjectId,
        fields: Document,
    ) -> Result<UpdateOutcome, StoreError> {
        let result = self
            .collection(collection)
            .update_one(doc! { "_id": id }, doc! { "$set": fields })
            .await
            .map_err(|e| StoreError::Backend(format!("Update in '{collection}' failed: {e}")))?;

        Ok(UpdateOutcome {
            matched: result.matched_count,
            modified: result.modified_count,
        })
    }

    async fn unset_field(
        &self,
        collection: &str,
        id: ObjectId,
        field: &str,
    ) -> Result<UpdateOutcome, StoreError> {
        let mut unset = Document::new();
        unset.insert(field, "");

        let result = self
            .collection(collection)
            .update_one(doc! { "_id": id }, doc! { "$unset": unset })
            .await
            .map_err(|e| StoreError::Backend(format!("Update in '{collection}' failed: {e}")))?;

        Ok(UpdateOutcome {
            matched: result.matched_count,
            modified: result.modified_count,
        })
    }

    async fn delete(&self, collection: &str, id: ObjectId) -> Result<u64, StoreError> {
        let result = self
            .collection(collection)
            .delete_one(doc! { "_id": id })
            .await
            .map_err(|e| StoreError::Backend(format!("Delete from '{collection}' failed: {e}")))?;

        Ok(result.deleted_count)
    }

    async fn lookup(
        &self,
        collection: &str,
        filter: Option<ObjectId>,
        joins: &[Join],
    ) -> Result<DocumentStream, StoreError> {
        let pipeline = lookup_pipeline(filter, joins);
        debug!("Aggregating '{collection}' with {} stage(s)", pipeline.len());

        let cursor = self
            .collection(collection)
            .aggregate(pipeline)
            .await
            .map_err(|e| StoreError::Backend(format!("Aggregate on '{collection}' failed: {e}")))?;

        Ok(cursor
            .map_err(|e| StoreError::Backend(format!("Cursor read failed: {e}")))
            .boxed())
    }
}

/// `$match` on the id (when filtered) followed by one `$lookup` per join.
fn lookup_pipeline(filter: Option<ObjectId>, joins: &[Join]) -> Vec<Document> {
    let mut pipeline = Vec::with_capacity(joins.len() + 1);
    if let Some(id) = filter {
        pipeline.push(doc! { "$match": { "_id": id } });
    }
    for join in joins {
        pipeline.push(doc! {
            "$lookup": {
                "from": join.from,
                "localField": join.local_field,
                "foreignField": "_id",
                "as": join.as_field.as_str(),
            }
        });
    }
    pipeline
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pipeline_without_filter_only_has_lookups() {
        let joins = vec![Join {
            from: "fields",
            local_field: "field",
            as_field: "__joined_field".to_string(),
        }];
        let pipeline = lookup_pipeline(None, &joins);
        assert_eq!(pipeline.len(), 1);

        let lookup = pipeline[0].get_document("$lookup").unwrap();
        assert_eq!(lookup.get_str("from").unwrap(), "fields");
        assert_eq!(lookup.get_str("localField").unwrap(), "field");
        assert_eq!(lookup.get_str("foreignField").unwrap(), "_id");
        assert_eq!(lookup.get_str("as").unwrap(), "__joined_field");
    }

    #[test]
    fn test_pipeline_filter_comes_first() {
        let id = ObjectId::new();
        let pipeline = lookup_pipeline(Some(id), &[]);
        assert_eq!(pipeline.len(), 1);
        let stage = pipeline[0].get_document("$match").unwrap();
        assert_eq!(stage.get_object_id("_id").unwrap(), id);
    }
}
