use std::sync::Arc;

use mongodb::bson::{self, doc, oid::ObjectId, Document};
use serde::de::DeserializeOwned;

use super::api::{decode_all, DaoError};
use super::store::DocumentStore;
use super::types::DeleteAck;

/// Collection and field names of a user/recipe join collection.
#[derive(Debug, Clone, Copy)]
pub struct Relation {
    pub collection: &'static str,
    pub recipe_key: &'static str,
    pub user_key: &'static str,
}

pub const LIKES: Relation = Relation {
    collection: "likes",
    recipe_key: "likedRecipe",
    user_key: "likedBy",
};

pub const COOKBOOK: Relation = Relation {
    collection: "cookbook",
    recipe_key: "bookmarkedRecipe",
    user_key: "bookmarkedBy",
};

/// Add, remove and query (recipe, user) pairs of one relation.
#[derive(Clone)]
pub struct RelationDao {
    store: Arc<dyn DocumentStore>,
    relation: Relation,
}

impl RelationDao {
    pub fn new(store: Arc<dyn DocumentStore>, relation: Relation) -> Self {
        RelationDao { store, relation }
    }

    fn pair(&self, rid: ObjectId, uid: ObjectId) -> Document {
        doc! { self.relation.recipe_key: rid, self.relation.user_key: uid }
    }

    pub async fn create_indexes(&self) -> Result<(), DaoError> {
        Ok(self
            .store
            .create_unique_index(
                self.relation.collection,
                &[self.relation.recipe_key, self.relation.user_key],
            )
            .await?)
    }

    pub async fn add<T: DeserializeOwned>(&self, rid: ObjectId, uid: ObjectId) -> Result<T, DaoError> {
        let record = doc! {
            "_id": ObjectId::new(),
            self.relation.recipe_key: rid,
            self.relation.user_key: uid,
        };
        self.store
            .insert_one(self.relation.collection, record.clone())
            .await?;
        Ok(bson::from_document(record)?)
    }

    pub async fn remove(&self, rid: ObjectId, uid: ObjectId) -> Result<DeleteAck, DaoError> {
        Ok(self
            .store
            .delete_many(self.relation.collection, self.pair(rid, uid))
            .await?)
    }

    pub async fn exists(&self, rid: ObjectId, uid: ObjectId) -> Result<bool, DaoError> {
        Ok(self
            .store
            .find_one(self.relation.collection, self.pair(rid, uid))
            .await?
            .is_some())
    }

    pub async fn find_by_user<T: DeserializeOwned>(&self, uid: ObjectId) -> Result<Vec<T>, DaoError> {
        decode_all(
            self.store
                .find(self.relation.collection, doc! { self.relation.user_key: uid })
                .await?,
        )
    }

    pub async fn find_by_recipe<T: DeserializeOwned>(
        &self,
        rid: ObjectId,
    ) -> Result<Vec<T>, DaoError> {
        decode_all(
            self.store
                .find(self.relation.collection, doc! { self.relation.recipe_key: rid })
                .await?,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::mongo::memory::MemoryStore;
    use crate::infra::mongo::types::Like;

    #[rocket::async_test]
    async fn test_without_unique_index_pairs_duplicate() {
        let dao = RelationDao::new(Arc::new(MemoryStore::default()), LIKES);
        let (rid, uid) = (ObjectId::new(), ObjectId::new());
        let first: Like = dao.add(rid, uid).await.unwrap();
        let second: Like = dao.add(rid, uid).await.unwrap();
        assert_ne!(first.id, second.id);
        assert_eq!(dao.find_by_user::<Like>(uid).await.unwrap().len(), 2);

        assert_eq!(dao.remove(rid, uid).await.unwrap().deleted_count, 2);
        assert!(!dao.exists(rid, uid).await.unwrap());
    }

    #[rocket::async_test]
    async fn test_unique_index_rejects_second_pair() {
        let dao = RelationDao::new(Arc::new(MemoryStore::default()), COOKBOOK);
        dao.create_indexes().await.unwrap();
        let (rid, uid) = (ObjectId::new(), ObjectId::new());
        dao.add::<Document>(rid, uid).await.unwrap();
        let err = dao.add::<Document>(rid, uid).await.unwrap_err();
        assert!(err.is_duplicate());
        assert_eq!(dao.find_by_recipe::<Document>(rid).await.unwrap().len(), 1);
    }
}
