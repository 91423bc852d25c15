use std::sync::Arc;

use mongodb::bson::{self, oid::ObjectId, Document};
use rocket::tokio::task::JoinError;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::info;

use super::comments::CommentDao;
use super::cookbook::CookbookDao;
use super::ingredients::IngredientDao;
use super::likes::LikeDao;
use super::recipes::RecipeDao;
use super::store::{DocumentStore, StoreError};
use super::users::UserDao;

#[derive(Error, Debug)]
pub enum DaoError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("error encoding document")]
    Encode(#[from] bson::ser::Error),
    #[error("error decoding document")]
    Decode(#[from] bson::de::Error),
    #[error("invalid identifier {0}")]
    InvalidId(String),
    #[error("{0} not found")]
    NotFound(&'static str),
    #[error("unknown user type {0}")]
    UnknownUserType(String),
    #[error("error hashing password")]
    Hash(#[from] bcrypt::BcryptError),
    #[error("hashing task failed")]
    Task(#[from] JoinError),
}

impl DaoError {
    pub fn is_duplicate(&self) -> bool {
        matches!(self, DaoError::Store(StoreError::DuplicateKey(_)))
    }
}

pub fn parse_id(raw: &str) -> Result<ObjectId, DaoError> {
    ObjectId::parse_str(raw).map_err(|_| DaoError::InvalidId(String::from(raw)))
}

pub(crate) fn decode_all<T: DeserializeOwned>(documents: Vec<Document>) -> Result<Vec<T>, DaoError> {
    documents
        .into_iter()
        .map(|d| bson::from_document(d).map_err(DaoError::from))
        .collect()
}

pub(crate) fn decode_one<T: DeserializeOwned>(
    document: Option<Document>,
) -> Result<Option<T>, DaoError> {
    document
        .map(|d| bson::from_document(d).map_err(DaoError::from))
        .transpose()
}

/// One data-access object per resource, all sharing a single store.
#[derive(Clone)]
pub struct Repository {
    pub users: UserDao,
    pub recipes: RecipeDao,
    pub ingredients: IngredientDao,
    pub comments: CommentDao,
    pub likes: LikeDao,
    pub cookbook: CookbookDao,
}

impl Repository {
    pub fn new(store: Arc<dyn DocumentStore>, hash_cost: u32) -> Self {
        let users = UserDao::new(store.clone(), hash_cost);
        let recipes = RecipeDao::new(store.clone(), users.clone());
        Repository {
            ingredients: IngredientDao::new(store.clone()),
            comments: CommentDao::new(store.clone(), users.clone(), recipes.clone()),
            likes: LikeDao::new(store.clone(), users.clone(), recipes.clone()),
            cookbook: CookbookDao::new(store, recipes.clone()),
            users,
            recipes,
        }
    }

    /// Builds the repository and creates the unique indexes it relies on.
    pub async fn init(store: Arc<dyn DocumentStore>, hash_cost: u32) -> Result<Self, DaoError> {
        let repository = Repository::new(store, hash_cost);
        repository.users.create_indexes().await?;
        repository.likes.create_indexes().await?;
        repository.cookbook.create_indexes().await?;
        info!("repository indexes ready");
        Ok(repository)
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use std::sync::Arc;

    use mongodb::bson::Document;

    use super::Repository;
    use crate::infra::mongo::memory::MemoryStore;
    use crate::infra::mongo::store::{DocumentStore, StoreError};
    use crate::infra::mongo::types::{DeleteAck, NewUser, UpdateAck, User};

    pub const TEST_COST: u32 = 4;

    pub async fn init_repo() -> Repository {
        Repository::init(Arc::new(MemoryStore::default()), TEST_COST)
            .await
            .unwrap()
    }

    pub fn new_user(email: &str) -> NewUser {
        NewUser {
            firstname: String::from("Julia"),
            lastname: String::from("Child"),
            username: None,
            password: String::from("bouillabaisse"),
            email: String::from(email),
            profile_photo: None,
            user_type: String::from("chef"),
        }
    }

    pub async fn create_user(repo: &Repository, email: &str) -> User {
        repo.users.create(new_user(email)).await.unwrap()
    }

    /// Fails every call, for asserting that an operation never reaches storage.
    pub struct FailingStore;

    #[rocket::async_trait]
    impl DocumentStore for FailingStore {
        async fn insert_one(&self, _: &str, _: Document) -> Result<(), StoreError> {
            Err(StoreError::Poisoned)
        }

        async fn find(&self, _: &str, _: Document) -> Result<Vec<Document>, StoreError> {
            Err(StoreError::Poisoned)
        }

        async fn find_one(&self, _: &str, _: Document) -> Result<Option<Document>, StoreError> {
            Err(StoreError::Poisoned)
        }

        async fn update_one(
            &self,
            _: &str,
            _: Document,
            _: Document,
        ) -> Result<UpdateAck, StoreError> {
            Err(StoreError::Poisoned)
        }

        async fn delete_one(&self, _: &str, _: Document) -> Result<DeleteAck, StoreError> {
            Err(StoreError::Poisoned)
        }

        async fn delete_many(&self, _: &str, _: Document) -> Result<DeleteAck, StoreError> {
            Err(StoreError::Poisoned)
        }

        async fn sample(&self, _: &str, _: usize) -> Result<Vec<Document>, StoreError> {
            Err(StoreError::Poisoned)
        }

        async fn create_unique_index(&self, _: &str, _: &[&str]) -> Result<(), StoreError> {
            Err(StoreError::Poisoned)
        }
    }
}
