use std::collections::HashMap;
use std::str::FromStr;
use std::sync::Arc;

use mongodb::bson::{self, doc, oid::ObjectId};
use rocket::tokio::task;

use super::api::{decode_all, decode_one, DaoError};
use super::store::DocumentStore;
use super::types::{DeleteAck, NewUser, UpdateAck, User, UserPatch, UserType};

const COLLECTION: &str = "users";

#[derive(Clone)]
pub struct UserDao {
    store: Arc<dyn DocumentStore>,
    hash_cost: u32,
}

impl UserDao {
    pub fn new(store: Arc<dyn DocumentStore>, hash_cost: u32) -> Self {
        UserDao { store, hash_cost }
    }

    pub async fn create_indexes(&self) -> Result<(), DaoError> {
        Ok(self.store.create_unique_index(COLLECTION, &["email"]).await?)
    }

    async fn hash(&self, password: String) -> Result<String, DaoError> {
        let cost = self.hash_cost;
        Ok(task::spawn_blocking(move || bcrypt::hash(password, cost)).await??)
    }

    /// Persists a new user with its password hashed. The returned user still
    /// carries the hash; callers redact it before it leaves the service.
    pub async fn create(&self, user: NewUser) -> Result<User, DaoError> {
        let user_type = UserType::from_str(&user.user_type)?;
        let password = self.hash(user.password).await?;
        let user = User {
            id: Some(ObjectId::new()),
            firstname: user.firstname,
            lastname: user.lastname,
            username: user.username,
            password,
            email: user.email,
            profile_photo: user.profile_photo,
            user_type,
        };
        self.store
            .insert_one(COLLECTION, bson::to_document(&user)?)
            .await?;
        Ok(user)
    }

    pub async fn update(&self, uid: ObjectId, patch: UserPatch) -> Result<UpdateAck, DaoError> {
        if let Some(user_type) = &patch.user_type {
            UserType::from_str(user_type)?;
        }
        let mut changes = bson::to_document(&patch)?;
        if let Some(password) = patch.password {
            changes.insert("password", self.hash(password).await?);
        }
        if changes.is_empty() {
            let matched = self.find_by_id(uid).await?.is_some() as u64;
            return Ok(UpdateAck::new(matched, 0));
        }
        Ok(self
            .store
            .update_one(COLLECTION, doc! { "_id": uid }, changes)
            .await?)
    }

    pub async fn delete(&self, uid: ObjectId) -> Result<DeleteAck, DaoError> {
        Ok(self.store.delete_one(COLLECTION, doc! { "_id": uid }).await?)
    }

    /// Removes every user. Only meant for resetting test fixtures.
    pub async fn delete_all(&self) -> Result<DeleteAck, DaoError> {
        Ok(self.store.delete_many(COLLECTION, doc! {}).await?)
    }

    pub async fn find_by_id(&self, uid: ObjectId) -> Result<Option<User>, DaoError> {
        decode_one(self.store.find_one(COLLECTION, doc! { "_id": uid }).await?)
    }

    pub async fn find_all(&self) -> Result<Vec<User>, DaoError> {
        decode_all(self.store.find(COLLECTION, doc! {}).await?)
    }

    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>, DaoError> {
        decode_one(self.store.find_one(COLLECTION, doc! { "email": email }).await?)
    }

    pub async fn find_by_credentials(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Option<User>, DaoError> {
        let user = match self.find_by_email(email).await? {
            Some(user) => user,
            None => return Ok(None),
        };
        let hash = user.password.clone();
        let password = String::from(password);
        let verified = task::spawn_blocking(move || bcrypt::verify(password, &hash)).await?;
        // legacy plaintext or malformed hashes never match
        Ok(verified.unwrap_or(false).then_some(user))
    }

    /// Redacted users keyed by id, for resolving references.
    pub async fn find_by_ids(
        &self,
        ids: Vec<ObjectId>,
    ) -> Result<HashMap<ObjectId, User>, DaoError> {
        if ids.is_empty() {
            return Ok(HashMap::new());
        }
        let users: Vec<User> =
            decode_all(self.store.find(COLLECTION, doc! { "_id": { "$in": ids } }).await?)?;
        Ok(users
            .into_iter()
            .filter_map(|u| u.id.map(|id| (id, u.redacted())))
            .collect())
    }
}
