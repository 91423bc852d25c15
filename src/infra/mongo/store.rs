use std::time::Duration;

use futures_util::TryStreamExt;
use mongodb::{
    bson::{doc, Document},
    error::{Error as mongoError, ErrorKind, WriteError, WriteFailure},
    options::{ClientOptions, IndexOptions},
    Client, Collection, Database, IndexModel,
};
use thiserror::Error;
use tracing::info;

use super::types::{DeleteAck, UpdateAck};

const DUPLICATE_KEY: i32 = 11000;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("error querying value")]
    QueryError(#[from] mongoError),
    #[error("duplicate key in collection {0}")]
    DuplicateKey(String),
    #[error("store lock poisoned")]
    Poisoned,
}

/// Storage seam shared by every data-access object.
///
/// Filters are equality matches on top-level fields, optionally with
/// `{"$in": [..]}`. `update_one` applies `changes` as a `$set`.
#[rocket::async_trait]
pub trait DocumentStore: Send + Sync {
    async fn insert_one(&self, collection: &str, document: Document) -> Result<(), StoreError>;

    async fn find(&self, collection: &str, filter: Document) -> Result<Vec<Document>, StoreError>;

    async fn find_one(
        &self,
        collection: &str,
        filter: Document,
    ) -> Result<Option<Document>, StoreError>;

    async fn update_one(
        &self,
        collection: &str,
        filter: Document,
        changes: Document,
    ) -> Result<UpdateAck, StoreError>;

    async fn delete_one(&self, collection: &str, filter: Document) -> Result<DeleteAck, StoreError>;

    async fn delete_many(&self, collection: &str, filter: Document)
        -> Result<DeleteAck, StoreError>;

    /// Uniform sample of at most `size` documents, without replacement.
    async fn sample(&self, collection: &str, size: usize) -> Result<Vec<Document>, StoreError>;

    async fn create_unique_index(&self, collection: &str, keys: &[&str])
        -> Result<(), StoreError>;
}

pub struct MongoStore {
    database: Database,
}

impl MongoStore {
    pub async fn connect(
        uri: &str,
        database: &str,
        max_pool_size: u32,
        server_selection_timeout: Duration,
    ) -> Result<Self, StoreError> {
        let mut options = ClientOptions::parse(uri).await?;
        options.app_name = Some(String::from("cookbook-back"));
        options.max_pool_size = Some(max_pool_size);
        options.server_selection_timeout = Some(server_selection_timeout);
        let client = Client::with_options(options)?;
        info!(database, "connected mongo client");
        Ok(MongoStore {
            database: client.database(database),
        })
    }

    fn collection(&self, name: &str) -> Collection<Document> {
        self.database.collection(name)
    }
}

fn map_write_error(collection: &str, error: mongoError) -> StoreError {
    let duplicate = matches!(
        error.kind.as_ref(),
        ErrorKind::Write(WriteFailure::WriteError(WriteError {
            code: DUPLICATE_KEY,
            ..
        }))
    );
    if duplicate {
        StoreError::DuplicateKey(String::from(collection))
    } else {
        StoreError::from(error)
    }
}

#[rocket::async_trait]
impl DocumentStore for MongoStore {
    async fn insert_one(&self, collection: &str, document: Document) -> Result<(), StoreError> {
        self.collection(collection)
            .insert_one(document, None)
            .await
            .map_err(|e| map_write_error(collection, e))?;
        Ok(())
    }

    async fn find(&self, collection: &str, filter: Document) -> Result<Vec<Document>, StoreError> {
        let cursor = self.collection(collection).find(filter, None).await?;
        let documents: Vec<Document> = cursor.try_collect().await?;
        Ok(documents)
    }

    async fn find_one(
        &self,
        collection: &str,
        filter: Document,
    ) -> Result<Option<Document>, StoreError> {
        Ok(self.collection(collection).find_one(filter, None).await?)
    }

    async fn update_one(
        &self,
        collection: &str,
        filter: Document,
        changes: Document,
    ) -> Result<UpdateAck, StoreError> {
        let result = self
            .collection(collection)
            .update_one(filter, doc! { "$set": changes }, None)
            .await
            .map_err(|e| map_write_error(collection, e))?;
        Ok(UpdateAck::new(result.matched_count, result.modified_count))
    }

    async fn delete_one(&self, collection: &str, filter: Document) -> Result<DeleteAck, StoreError> {
        let result = self.collection(collection).delete_one(filter, None).await?;
        Ok(DeleteAck::new(result.deleted_count))
    }

    async fn delete_many(
        &self,
        collection: &str,
        filter: Document,
    ) -> Result<DeleteAck, StoreError> {
        let result = self.collection(collection).delete_many(filter, None).await?;
        Ok(DeleteAck::new(result.deleted_count))
    }

    async fn sample(&self, collection: &str, size: usize) -> Result<Vec<Document>, StoreError> {
        let pipeline = vec![doc! { "$sample": { "size": size as i64 } }];
        let cursor = self.collection(collection).aggregate(pipeline, None).await?;
        let documents: Vec<Document> = cursor.try_collect().await?;
        Ok(documents)
    }

    async fn create_unique_index(
        &self,
        collection: &str,
        keys: &[&str],
    ) -> Result<(), StoreError> {
        let mut index_keys = Document::new();
        for key in keys {
            index_keys.insert(*key, 1);
        }
        let index = IndexModel::builder()
            .keys(index_keys)
            .options(IndexOptions::builder().unique(true).build())
            .build();
        self.collection(collection).create_index(index, None).await?;
        Ok(())
    }
}
