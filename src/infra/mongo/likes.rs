use std::sync::Arc;

use mongodb::bson::oid::ObjectId;

use super::api::DaoError;
use super::recipes::RecipeDao;
use super::relation::{RelationDao, LIKES};
use super::store::DocumentStore;
use super::types::{DeleteAck, Like, LikedRecipe, LikingUser};
use super::users::UserDao;

#[derive(Clone)]
pub struct LikeDao {
    likes: RelationDao,
    users: UserDao,
    recipes: RecipeDao,
}

impl LikeDao {
    pub fn new(store: Arc<dyn DocumentStore>, users: UserDao, recipes: RecipeDao) -> Self {
        LikeDao {
            likes: RelationDao::new(store, LIKES),
            users,
            recipes,
        }
    }

    pub async fn create_indexes(&self) -> Result<(), DaoError> {
        self.likes.create_indexes().await
    }

    pub async fn add(&self, rid: ObjectId, uid: ObjectId) -> Result<Like, DaoError> {
        self.likes.add(rid, uid).await
    }

    pub async fn remove(&self, rid: ObjectId, uid: ObjectId) -> Result<DeleteAck, DaoError> {
        self.likes.remove(rid, uid).await
    }

    pub async fn exists(&self, rid: ObjectId, uid: ObjectId) -> Result<bool, DaoError> {
        self.likes.exists(rid, uid).await
    }

    /// Likes of a user, each with the recipe and its chef resolved.
    pub async fn find_by_user(&self, uid: ObjectId) -> Result<Vec<LikedRecipe>, DaoError> {
        let likes: Vec<Like> = self.likes.find_by_user(uid).await?;
        let recipes = self
            .recipes
            .find_views_by_ids(likes.iter().map(|l| l.liked_recipe).collect())
            .await?;
        Ok(likes
            .into_iter()
            .map(|l| LikedRecipe {
                id: l.id,
                liked_recipe: recipes.get(&l.liked_recipe).cloned(),
                liked_by: l.liked_by,
            })
            .collect())
    }

    pub async fn find_by_recipe(&self, rid: ObjectId) -> Result<Vec<LikingUser>, DaoError> {
        let likes: Vec<Like> = self.likes.find_by_recipe(rid).await?;
        let users = self
            .users
            .find_by_ids(likes.iter().map(|l| l.liked_by).collect())
            .await?;
        Ok(likes
            .into_iter()
            .map(|l| LikingUser {
                id: l.id,
                liked_recipe: l.liked_recipe,
                liked_by: users.get(&l.liked_by).cloned(),
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::mongo::api::testing::{create_user, init_repo};
    use crate::infra::mongo::types::NewRecipe;

    async fn recipe_for(repo: &crate::infra::mongo::api::Repository, chef: ObjectId) -> ObjectId {
        let recipe = NewRecipe {
            title: String::from("Ratatouille"),
            steps: vec![],
            dish_id: None,
            image: None,
        };
        repo.recipes.create(chef, recipe).await.unwrap().id.unwrap()
    }

    #[rocket::async_test]
    async fn test_like_then_unlike() {
        let repo = init_repo().await;
        let uid = create_user(&repo, "julia@example.com").await.id.unwrap();
        let rid = recipe_for(&repo, uid).await;

        assert!(!repo.likes.exists(rid, uid).await.unwrap());
        let like = repo.likes.add(rid, uid).await.unwrap();
        assert_eq!((like.liked_recipe, like.liked_by), (rid, uid));
        assert!(repo.likes.exists(rid, uid).await.unwrap());

        assert_eq!(repo.likes.remove(rid, uid).await.unwrap().deleted_count, 1);
        assert!(!repo.likes.exists(rid, uid).await.unwrap());
        assert_eq!(repo.likes.remove(rid, uid).await.unwrap().deleted_count, 0);
    }

    #[rocket::async_test]
    async fn test_second_like_is_rejected() {
        let repo = init_repo().await;
        let uid = create_user(&repo, "julia@example.com").await.id.unwrap();
        let rid = recipe_for(&repo, uid).await;
        repo.likes.add(rid, uid).await.unwrap();
        assert!(repo.likes.add(rid, uid).await.unwrap_err().is_duplicate());
        assert_eq!(repo.likes.find_by_recipe(rid).await.unwrap().len(), 1);
    }

    #[rocket::async_test]
    async fn test_find_by_user_resolves_recipe_and_chef() {
        let repo = init_repo().await;
        let chef = create_user(&repo, "julia@example.com").await;
        let fan = create_user(&repo, "jacques@example.com").await.id.unwrap();
        let rid = recipe_for(&repo, chef.id.unwrap()).await;
        repo.likes.add(rid, fan).await.unwrap();

        let liked = repo.likes.find_by_user(fan).await.unwrap();
        assert_eq!(liked.len(), 1);
        let recipe = liked[0].liked_recipe.as_ref().unwrap();
        assert_eq!(recipe.id, Some(rid));
        assert_eq!(recipe.chef.as_ref().unwrap().id, chef.id);
        assert!(repo.likes.find_by_user(chef.id.unwrap()).await.unwrap().is_empty());
    }

    #[rocket::async_test]
    async fn test_find_by_recipe_lists_users() {
        let repo = init_repo().await;
        let chef = create_user(&repo, "julia@example.com").await.id.unwrap();
        let fan = create_user(&repo, "jacques@example.com").await.id.unwrap();
        let rid = recipe_for(&repo, chef).await;
        repo.likes.add(rid, chef).await.unwrap();
        repo.likes.add(rid, fan).await.unwrap();

        let users = repo.likes.find_by_recipe(rid).await.unwrap();
        let mut emails: Vec<_> = users
            .iter()
            .map(|l| l.liked_by.as_ref().unwrap().email.clone())
            .collect();
        emails.sort();
        assert_eq!(emails, vec!["jacques@example.com", "julia@example.com"]);
        assert!(users.iter().all(|l| l.liked_by.as_ref().unwrap().password.is_empty()));
    }
}
