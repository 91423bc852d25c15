use std::str::FromStr;

use mongodb::bson::{oid::ObjectId, DateTime};
use serde::{Deserialize, Serialize};

use super::api::DaoError;

pub const PASSWORD_MASK: &str = "*****";

#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum UserType {
    Chef,
    Moderator,
    User,
}

impl FromStr for UserType {
    type Err = DaoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "chef" => Ok(UserType::Chef),
            "moderator" => Ok(UserType::Moderator),
            "user" => Ok(UserType::User),
            other => Err(DaoError::UnknownUserType(String::from(other))),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub firstname: String,
    pub lastname: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default)]
    pub password: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_photo: Option<String>,
    pub user_type: UserType,
}

impl User {
    /// Clears the password hash before the user leaves the service.
    pub fn redacted(mut self) -> Self {
        self.password.clear();
        self
    }

    pub fn masked(mut self) -> Self {
        self.password = String::from(PASSWORD_MASK);
        self
    }
}

fn default_user_type() -> String {
    String::from("user")
}

/// Signup and create payload; `password` is plaintext until hashed.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewUser {
    pub firstname: String,
    pub lastname: String,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: String,
    pub email: String,
    #[serde(default)]
    pub profile_photo: Option<String>,
    #[serde(default = "default_user_type")]
    pub user_type: String,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub firstname: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lastname: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile_photo: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_type: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Recipe {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub title: String,
    pub chef: ObjectId,
    #[serde(default)]
    pub steps: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dish_id: Option<String>,
    pub posted_on: DateTime,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewRecipe {
    pub title: String,
    #[serde(default)]
    pub steps: Vec<String>,
    #[serde(default)]
    pub dish_id: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecipePatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub steps: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dish_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

/// Recipe with its chef resolved; `chef` is `None` when the user is gone.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RecipeView {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub title: String,
    pub chef: Option<User>,
    pub steps: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dish_id: Option<String>,
    pub posted_on: DateTime,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

impl RecipeView {
    pub fn new(recipe: Recipe, chef: Option<User>) -> Self {
        RecipeView {
            id: recipe.id,
            title: recipe.title,
            chef,
            steps: recipe.steps,
            dish_id: recipe.dish_id,
            posted_on: recipe.posted_on,
            image: recipe.image,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct Ingredient {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub name: String,
    #[serde(default)]
    pub calories: f64,
    #[serde(default)]
    pub fat: f64,
    #[serde(default)]
    pub protein: f64,
    #[serde(default)]
    pub carbs: f64,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub comment: String,
    pub recipe: ObjectId,
    pub posted_by: ObjectId,
    pub posted_on: DateTime,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewComment {
    pub comment: String,
}

/// Recipe a comment belongs to, resolved or left as its id.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(untagged)]
pub enum RecipeRef {
    Resolved(Recipe),
    Id(ObjectId),
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CommentView {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub comment: String,
    pub recipe: Option<RecipeRef>,
    pub posted_by: Option<User>,
    pub posted_on: DateTime,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Like {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub liked_recipe: ObjectId,
    pub liked_by: ObjectId,
}

/// A like with the recipe, and that recipe's chef, resolved.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LikedRecipe {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub liked_recipe: Option<RecipeView>,
    pub liked_by: ObjectId,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LikingUser {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub liked_recipe: ObjectId,
    pub liked_by: Option<User>,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Bookmark {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub bookmarked_recipe: ObjectId,
    pub bookmarked_by: ObjectId,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BookmarkedRecipe {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub bookmarked_recipe: Option<Recipe>,
    pub bookmarked_by: ObjectId,
}

#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAck {
    pub acknowledged: bool,
    pub matched_count: u64,
    pub modified_count: u64,
}

impl UpdateAck {
    pub fn new(matched_count: u64, modified_count: u64) -> Self {
        UpdateAck {
            acknowledged: true,
            matched_count,
            modified_count,
        }
    }
}

#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DeleteAck {
    pub acknowledged: bool,
    pub deleted_count: u64,
}

impl DeleteAck {
    pub fn new(deleted_count: u64) -> Self {
        DeleteAck {
            acknowledged: true,
            deleted_count,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user() -> User {
        User {
            id: Some(ObjectId::new()),
            firstname: String::from("Julia"),
            lastname: String::from("Child"),
            username: None,
            password: String::from("$2b$04$hash"),
            email: String::from("julia@example.com"),
            profile_photo: None,
            user_type: UserType::Chef,
        }
    }

    #[test]
    fn test_user_type_from_str() {
        assert_eq!(UserType::from_str("chef").unwrap(), UserType::Chef);
        assert_eq!(UserType::from_str("moderator").unwrap(), UserType::Moderator);
        assert_eq!(UserType::from_str("user").unwrap(), UserType::User);
    }

    #[test]
    #[should_panic(expected = "UnknownUserType")]
    fn test_user_type_rejects_unknown() {
        UserType::from_str("admin").unwrap();
    }

    #[test]
    fn test_redacted_and_masked_password() {
        assert_eq!(user().redacted().password, "");
        assert_eq!(user().masked().password, PASSWORD_MASK);
    }

    #[test]
    fn test_patch_serializes_only_named_fields() {
        let patch = UserPatch {
            profile_photo: Some(String::from("me.png")),
            ..UserPatch::default()
        };
        let document = mongodb::bson::to_document(&patch).unwrap();
        assert_eq!(document.len(), 1);
        assert_eq!(document.get_str("profilePhoto").unwrap(), "me.png");
    }
}
