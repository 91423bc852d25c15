use std::collections::HashMap;
use std::sync::Arc;

use mongodb::bson::{self, doc, oid::ObjectId, DateTime, Document};

use super::api::{decode_all, decode_one, DaoError};
use super::store::DocumentStore;
use super::types::{DeleteAck, NewRecipe, Recipe, RecipePatch, RecipeView, UpdateAck};
use super::users::UserDao;

const COLLECTION: &str = "recipes";

#[derive(Clone)]
pub struct RecipeDao {
    store: Arc<dyn DocumentStore>,
    users: UserDao,
}

impl RecipeDao {
    pub fn new(store: Arc<dyn DocumentStore>, users: UserDao) -> Self {
        RecipeDao { store, users }
    }

    /// Stores a recipe owned by `uid`, who must exist.
    pub async fn create(&self, uid: ObjectId, recipe: NewRecipe) -> Result<Recipe, DaoError> {
        if self.users.find_by_id(uid).await?.is_none() {
            return Err(DaoError::NotFound("user"));
        }
        let recipe = Recipe {
            id: Some(ObjectId::new()),
            title: recipe.title,
            chef: uid,
            steps: recipe.steps,
            dish_id: recipe.dish_id,
            posted_on: DateTime::now(),
            image: recipe.image,
        };
        self.store
            .insert_one(COLLECTION, bson::to_document(&recipe)?)
            .await?;
        Ok(recipe)
    }

    pub async fn update(&self, rid: ObjectId, patch: RecipePatch) -> Result<UpdateAck, DaoError> {
        let changes = bson::to_document(&patch)?;
        if changes.is_empty() {
            let matched = self.find_raw_by_id(rid).await?.is_some() as u64;
            return Ok(UpdateAck::new(matched, 0));
        }
        Ok(self
            .store
            .update_one(COLLECTION, doc! { "_id": rid }, changes)
            .await?)
    }

    pub async fn delete(&self, rid: ObjectId) -> Result<DeleteAck, DaoError> {
        Ok(self.store.delete_one(COLLECTION, doc! { "_id": rid }).await?)
    }

    pub async fn find_by_id(&self, rid: ObjectId) -> Result<Option<RecipeView>, DaoError> {
        match self.find_raw_by_id(rid).await? {
            Some(recipe) => Ok(self.populate(vec![recipe]).await?.pop()),
            None => Ok(None),
        }
    }

    pub async fn find_all_by_user(&self, uid: ObjectId) -> Result<Vec<RecipeView>, DaoError> {
        self.find_populated(doc! { "chef": uid }).await
    }

    pub async fn find_by_dish_id(&self, did: &str) -> Result<Vec<RecipeView>, DaoError> {
        self.find_populated(doc! { "dishId": did }).await
    }

    /// All recipes in storage order.
    pub async fn find_all(&self) -> Result<Vec<RecipeView>, DaoError> {
        self.find_populated(doc! {}).await
    }

    /// Uniform sample of up to `size` distinct recipes.
    pub async fn find_random(&self, size: usize) -> Result<Vec<RecipeView>, DaoError> {
        let recipes = decode_all(self.store.sample(COLLECTION, size).await?)?;
        self.populate(recipes).await
    }

    pub(crate) async fn find_raw_by_id(&self, rid: ObjectId) -> Result<Option<Recipe>, DaoError> {
        decode_one(self.store.find_one(COLLECTION, doc! { "_id": rid }).await?)
    }

    pub(crate) async fn find_by_ids(
        &self,
        ids: Vec<ObjectId>,
    ) -> Result<HashMap<ObjectId, Recipe>, DaoError> {
        if ids.is_empty() {
            return Ok(HashMap::new());
        }
        let recipes: Vec<Recipe> =
            decode_all(self.store.find(COLLECTION, doc! { "_id": { "$in": ids } }).await?)?;
        Ok(recipes
            .into_iter()
            .filter_map(|r| r.id.map(|id| (id, r)))
            .collect())
    }

    pub(crate) async fn find_views_by_ids(
        &self,
        ids: Vec<ObjectId>,
    ) -> Result<HashMap<ObjectId, RecipeView>, DaoError> {
        let recipes = self.find_by_ids(ids).await?.into_values().collect();
        Ok(self
            .populate(recipes)
            .await?
            .into_iter()
            .filter_map(|r| r.id.map(|id| (id, r)))
            .collect())
    }

    async fn find_populated(&self, filter: Document) -> Result<Vec<RecipeView>, DaoError> {
        let recipes = decode_all(self.store.find(COLLECTION, filter).await?)?;
        self.populate(recipes).await
    }

    async fn populate(&self, recipes: Vec<Recipe>) -> Result<Vec<RecipeView>, DaoError> {
        let chefs = self
            .users
            .find_by_ids(recipes.iter().map(|r| r.chef).collect())
            .await?;
        Ok(recipes
            .into_iter()
            .map(|r| {
                let chef = chefs.get(&r.chef).cloned();
                RecipeView::new(r, chef)
            })
            .collect())
    }
}
