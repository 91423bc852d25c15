use std::sync::Arc;

use mongodb::bson::{self, doc, oid::ObjectId};

use super::api::{decode_all, DaoError};
use super::store::DocumentStore;
use super::types::Ingredient;

const COLLECTION: &str = "ingredients";

#[derive(Clone)]
pub struct IngredientDao {
    store: Arc<dyn DocumentStore>,
}

impl IngredientDao {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        IngredientDao { store }
    }

    pub async fn create(&self, mut ingredient: Ingredient) -> Result<Ingredient, DaoError> {
        ingredient.id = Some(ObjectId::new());
        self.store
            .insert_one(COLLECTION, bson::to_document(&ingredient)?)
            .await?;
        Ok(ingredient)
    }

    /// Exact-match lookup. An empty name never reaches storage.
    pub async fn find_by_name(&self, name: &str) -> Result<Vec<Ingredient>, DaoError> {
        if name.is_empty() {
            return Ok(Vec::new());
        }
        decode_all(self.store.find(COLLECTION, doc! { "name": name }).await?)
    }
}
