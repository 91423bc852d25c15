use std::sync::Arc;

use mongodb::bson::{self, doc, oid::ObjectId, DateTime};

use super::api::{decode_all, DaoError};
use super::recipes::RecipeDao;
use super::store::DocumentStore;
use super::types::{Comment, CommentView, NewComment, RecipeRef};
use super::users::UserDao;

const COLLECTION: &str = "comments";

#[derive(Clone)]
pub struct CommentDao {
    store: Arc<dyn DocumentStore>,
    users: UserDao,
    recipes: RecipeDao,
}

impl CommentDao {
    pub fn new(store: Arc<dyn DocumentStore>, users: UserDao, recipes: RecipeDao) -> Self {
        CommentDao {
            store,
            users,
            recipes,
        }
    }

    /// Appends a comment. Both the recipe and the author must exist; the
    /// comment stores bare references to them.
    pub async fn create(
        &self,
        rid: ObjectId,
        uid: ObjectId,
        comment: NewComment,
    ) -> Result<Comment, DaoError> {
        if self.users.find_by_id(uid).await?.is_none() {
            return Err(DaoError::NotFound("user"));
        }
        if self.recipes.find_raw_by_id(rid).await?.is_none() {
            return Err(DaoError::NotFound("recipe"));
        }
        let comment = Comment {
            id: Some(ObjectId::new()),
            comment: comment.comment,
            recipe: rid,
            posted_by: uid,
            posted_on: DateTime::now(),
        };
        self.store
            .insert_one(COLLECTION, bson::to_document(&comment)?)
            .await?;
        Ok(comment)
    }

    /// Comments on `rid`, authors resolved. The recipe stays a bare id.
    pub async fn find(&self, rid: ObjectId) -> Result<Vec<CommentView>, DaoError> {
        let comments: Vec<Comment> =
            decode_all(self.store.find(COLLECTION, doc! { "recipe": rid }).await?)?;
        self.populate(comments, |c| Some(RecipeRef::Id(c.recipe)))
            .await
    }

    /// Comments by `uid`, with author and recipe resolved.
    pub async fn find_by_user(&self, uid: ObjectId) -> Result<Vec<CommentView>, DaoError> {
        let comments: Vec<Comment> =
            decode_all(self.store.find(COLLECTION, doc! { "postedBy": uid }).await?)?;
        let recipes = self
            .recipes
            .find_by_ids(comments.iter().map(|c| c.recipe).collect())
            .await?;
        self.populate(comments, |c| {
            recipes.get(&c.recipe).cloned().map(RecipeRef::Resolved)
        })
        .await
    }

    async fn populate<F>(&self, comments: Vec<Comment>, recipe: F) -> Result<Vec<CommentView>, DaoError>
    where
        F: Fn(&Comment) -> Option<RecipeRef>,
    {
        let authors = self
            .users
            .find_by_ids(comments.iter().map(|c| c.posted_by).collect())
            .await?;
        Ok(comments
            .into_iter()
            .map(|c| CommentView {
                recipe: recipe(&c),
                posted_by: authors.get(&c.posted_by).cloned(),
                id: c.id,
                comment: c.comment,
                posted_on: c.posted_on,
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::mongo::api::testing::{create_user, init_repo};
    use crate::infra::mongo::types::NewRecipe;

    fn new_comment(text: &str) -> NewComment {
        NewComment {
            comment: String::from(text),
        }
    }

    fn new_recipe() -> NewRecipe {
        NewRecipe {
            title: String::from("Cassoulet"),
            steps: vec![String::from("soak beans")],
            dish_id: None,
            image: None,
        }
    }

    #[rocket::async_test]
    async fn test_comment_on_recipe_resolves_author() {
        let repo = init_repo().await;
        let user = create_user(&repo, "julia@example.com").await;
        let uid = user.id.unwrap();
        let rid = repo.recipes.create(uid, new_recipe()).await.unwrap().id.unwrap();
        let comment = repo
            .comments
            .create(rid, uid, new_comment("Magnifique"))
            .await
            .unwrap();

        let found = repo.comments.find(rid).await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, comment.id);
        assert_eq!(found[0].comment, "Magnifique");
        let author = found[0].posted_by.as_ref().unwrap();
        assert_eq!(author.id, user.id);
        assert_eq!(author.email, "julia@example.com");
        assert_eq!(author.password, "");
        assert_eq!(found[0].recipe, Some(RecipeRef::Id(rid)));
    }

    #[rocket::async_test]
    async fn test_comment_requires_existing_user_and_recipe() {
        let repo = init_repo().await;
        let uid = create_user(&repo, "julia@example.com").await.id.unwrap();
        let rid = repo.recipes.create(uid, new_recipe()).await.unwrap().id.unwrap();

        let err = repo
            .comments
            .create(rid, ObjectId::new(), new_comment("hi"))
            .await
            .unwrap_err();
        assert!(matches!(err, DaoError::NotFound("user")));
        let err = repo
            .comments
            .create(ObjectId::new(), uid, new_comment("hi"))
            .await
            .unwrap_err();
        assert!(matches!(err, DaoError::NotFound("recipe")));
        assert!(repo.comments.find(rid).await.unwrap().is_empty());
    }

    #[rocket::async_test]
    async fn test_find_by_user() {
        let repo = init_repo().await;
        let julia = create_user(&repo, "julia@example.com").await.id.unwrap();
        let jacques = create_user(&repo, "jacques@example.com").await.id.unwrap();
        let rid = repo.recipes.create(julia, new_recipe()).await.unwrap().id.unwrap();
        repo.comments.create(rid, julia, new_comment("first")).await.unwrap();
        repo.comments.create(rid, jacques, new_comment("second")).await.unwrap();
        repo.comments.create(rid, jacques, new_comment("third")).await.unwrap();

        let by_jacques = repo.comments.find_by_user(jacques).await.unwrap();
        assert_eq!(by_jacques.len(), 2);
        assert!(by_jacques.iter().all(|c| matches!(
            &c.recipe,
            Some(RecipeRef::Resolved(recipe)) if recipe.id == Some(rid) && recipe.title == "Cassoulet"
        )));
        assert_eq!(repo.comments.find(rid).await.unwrap().len(), 3);
    }
}
