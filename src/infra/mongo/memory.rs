use std::collections::HashMap;
use std::sync::RwLock;

use mongodb::bson::{Bson, Document};
use rand::seq::SliceRandom;

use super::store::{DocumentStore, StoreError};
use super::types::{DeleteAck, UpdateAck};

/// In-process document store, used by the test suite and `STORE=memory`.
#[derive(Default)]
pub struct MemoryStore {
    collections: RwLock<HashMap<String, MemoryCollection>>,
}

#[derive(Default)]
struct MemoryCollection {
    documents: Vec<Document>,
    unique: Vec<Vec<String>>,
}

impl MemoryCollection {
    fn violates_unique(&self, candidate: &Document, skip: Option<usize>) -> bool {
        self.unique.iter().any(|keys| {
            self.documents
                .iter()
                .enumerate()
                .filter(|(i, _)| Some(*i) != skip)
                .any(|(_, existing)| keys.iter().all(|k| field(existing, k) == field(candidate, k)))
        })
    }
}

fn field(document: &Document, key: &str) -> Bson {
    document.get(key).cloned().unwrap_or(Bson::Null)
}

fn matches(document: &Document, filter: &Document) -> bool {
    filter.iter().all(|(key, expected)| {
        let actual = field(document, key);
        match expected {
            Bson::Document(op) if op.contains_key("$in") => match op.get("$in") {
                Some(Bson::Array(values)) => values.contains(&actual),
                _ => false,
            },
            _ => actual == *expected,
        }
    })
}

#[rocket::async_trait]
impl DocumentStore for MemoryStore {
    async fn insert_one(&self, collection: &str, document: Document) -> Result<(), StoreError> {
        let mut collections = self.collections.write().map_err(|_| StoreError::Poisoned)?;
        let target = collections.entry(String::from(collection)).or_default();
        if target.violates_unique(&document, None) {
            return Err(StoreError::DuplicateKey(String::from(collection)));
        }
        target.documents.push(document);
        Ok(())
    }

    async fn find(&self, collection: &str, filter: Document) -> Result<Vec<Document>, StoreError> {
        let collections = self.collections.read().map_err(|_| StoreError::Poisoned)?;
        Ok(collections
            .get(collection)
            .map(|c| {
                c.documents
                    .iter()
                    .filter(|d| matches(d, &filter))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn find_one(
        &self,
        collection: &str,
        filter: Document,
    ) -> Result<Option<Document>, StoreError> {
        let collections = self.collections.read().map_err(|_| StoreError::Poisoned)?;
        Ok(collections
            .get(collection)
            .and_then(|c| c.documents.iter().find(|d| matches(d, &filter)).cloned()))
    }

    async fn update_one(
        &self,
        collection: &str,
        filter: Document,
        changes: Document,
    ) -> Result<UpdateAck, StoreError> {
        let mut collections = self.collections.write().map_err(|_| StoreError::Poisoned)?;
        let target = match collections.get_mut(collection) {
            Some(target) => target,
            None => return Ok(UpdateAck::new(0, 0)),
        };
        let index = match target.documents.iter().position(|d| matches(d, &filter)) {
            Some(index) => index,
            None => return Ok(UpdateAck::new(0, 0)),
        };
        let mut updated = target.documents[index].clone();
        for (key, value) in changes {
            updated.insert(key, value);
        }
        if updated == target.documents[index] {
            return Ok(UpdateAck::new(1, 0));
        }
        if target.violates_unique(&updated, Some(index)) {
            return Err(StoreError::DuplicateKey(String::from(collection)));
        }
        target.documents[index] = updated;
        Ok(UpdateAck::new(1, 1))
    }

    async fn delete_one(&self, collection: &str, filter: Document) -> Result<DeleteAck, StoreError> {
        let mut collections = self.collections.write().map_err(|_| StoreError::Poisoned)?;
        let deleted = match collections.get_mut(collection) {
            Some(target) => match target.documents.iter().position(|d| matches(d, &filter)) {
                Some(index) => {
                    target.documents.remove(index);
                    1
                }
                None => 0,
            },
            None => 0,
        };
        Ok(DeleteAck::new(deleted))
    }

    async fn delete_many(
        &self,
        collection: &str,
        filter: Document,
    ) -> Result<DeleteAck, StoreError> {
        let mut collections = self.collections.write().map_err(|_| StoreError::Poisoned)?;
        let deleted = match collections.get_mut(collection) {
            Some(target) => {
                let before = target.documents.len();
                target.documents.retain(|d| !matches(d, &filter));
                (before - target.documents.len()) as u64
            }
            None => 0,
        };
        Ok(DeleteAck::new(deleted))
    }

    async fn sample(&self, collection: &str, size: usize) -> Result<Vec<Document>, StoreError> {
        let collections = self.collections.read().map_err(|_| StoreError::Poisoned)?;
        let documents = match collections.get(collection) {
            Some(c) => &c.documents,
            None => return Ok(Vec::new()),
        };
        let mut rng = rand::thread_rng();
        Ok(documents.choose_multiple(&mut rng, size).cloned().collect())
    }

    async fn create_unique_index(
        &self,
        collection: &str,
        keys: &[&str],
    ) -> Result<(), StoreError> {
        let mut collections = self.collections.write().map_err(|_| StoreError::Poisoned)?;
        let target = collections.entry(String::from(collection)).or_default();
        let keys: Vec<String> = keys.iter().map(|k| String::from(*k)).collect();
        if !target.unique.contains(&keys) {
            target.unique.push(keys);
        }
        Ok(())
    }
}
