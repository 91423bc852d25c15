use std::sync::Arc;

use mongodb::bson::oid::ObjectId;

use super::api::DaoError;
use super::recipes::RecipeDao;
use super::relation::{RelationDao, COOKBOOK};
use super::store::DocumentStore;
use super::types::{Bookmark, BookmarkedRecipe, DeleteAck};

#[derive(Clone)]
pub struct CookbookDao {
    bookmarks: RelationDao,
    recipes: RecipeDao,
}

impl CookbookDao {
    pub fn new(store: Arc<dyn DocumentStore>, recipes: RecipeDao) -> Self {
        CookbookDao {
            bookmarks: RelationDao::new(store, COOKBOOK),
            recipes,
        }
    }

    pub async fn create_indexes(&self) -> Result<(), DaoError> {
        self.bookmarks.create_indexes().await
    }

    pub async fn add(&self, rid: ObjectId, uid: ObjectId) -> Result<Bookmark, DaoError> {
        self.bookmarks.add(rid, uid).await
    }

    pub async fn remove(&self, rid: ObjectId, uid: ObjectId) -> Result<DeleteAck, DaoError> {
        self.bookmarks.remove(rid, uid).await
    }

    pub async fn exists(&self, rid: ObjectId, uid: ObjectId) -> Result<bool, DaoError> {
        self.bookmarks.exists(rid, uid).await
    }

    pub async fn find_by_user(&self, uid: ObjectId) -> Result<Vec<BookmarkedRecipe>, DaoError> {
        let bookmarks: Vec<Bookmark> = self.bookmarks.find_by_user(uid).await?;
        let recipes = self
            .recipes
            .find_by_ids(bookmarks.iter().map(|b| b.bookmarked_recipe).collect())
            .await?;
        Ok(bookmarks
            .into_iter()
            .map(|b| BookmarkedRecipe {
                id: b.id,
                bookmarked_recipe: recipes.get(&b.bookmarked_recipe).cloned(),
                bookmarked_by: b.bookmarked_by,
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::mongo::api::testing::{create_user, init_repo};
    use crate::infra::mongo::types::NewRecipe;

    #[rocket::async_test]
    async fn test_bookmark_lifecycle() {
        let repo = init_repo().await;
        let uid = create_user(&repo, "julia@example.com").await.id.unwrap();
        let recipe = NewRecipe {
            title: String::from("Tarte Tatin"),
            steps: vec![String::from("caramelize")],
            dish_id: Some(String::from("dessert")),
            image: None,
        };
        let rid = repo.recipes.create(uid, recipe).await.unwrap().id.unwrap();

        assert!(repo.cookbook.find_by_user(uid).await.unwrap().is_empty());
        let bookmark = repo.cookbook.add(rid, uid).await.unwrap();
        assert_eq!(bookmark.bookmarked_recipe, rid);
        assert!(repo.cookbook.exists(rid, uid).await.unwrap());
        assert!(repo.cookbook.add(rid, uid).await.unwrap_err().is_duplicate());

        let saved = repo.cookbook.find_by_user(uid).await.unwrap();
        assert_eq!(saved.len(), 1);
        assert_eq!(saved[0].bookmarked_recipe.as_ref().unwrap().title, "Tarte Tatin");

        repo.recipes.delete(rid).await.unwrap();
        let saved = repo.cookbook.find_by_user(uid).await.unwrap();
        assert!(saved[0].bookmarked_recipe.is_none());

        assert_eq!(repo.cookbook.remove(rid, uid).await.unwrap().deleted_count, 1);
        assert!(!repo.cookbook.exists(rid, uid).await.unwrap());
    }
}
