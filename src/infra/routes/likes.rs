use rocket::serde::json::Json;
use rocket::State;

use crate::infra::{parse_id, ApiError, DeleteAck, Like, LikedRecipe, LikingUser, Repository, Session};

#[post("/likes/<rid>/users/<uid>")]
pub async fn user_likes_recipe(
    db: &State<Repository>,
    session: Session,
    rid: &str,
    uid: &str,
) -> Result<Json<Like>, ApiError> {
    let uid = session.resolve(uid)?;
    Ok(Json(db.likes.add(parse_id(rid)?, uid).await?))
}

#[delete("/likes/<rid>/users/<uid>")]
pub async fn user_unlikes_recipe(
    db: &State<Repository>,
    session: Session,
    rid: &str,
    uid: &str,
) -> Result<Json<DeleteAck>, ApiError> {
    let uid = session.resolve(uid)?;
    Ok(Json(db.likes.remove(parse_id(rid)?, uid).await?))
}

#[get("/likes/users/<uid>")]
pub async fn find_recipes_liked_by_user(
    db: &State<Repository>,
    session: Session,
    uid: &str,
) -> Result<Json<Vec<LikedRecipe>>, ApiError> {
    let uid = session.resolve(uid)?;
    Ok(Json(db.likes.find_by_user(uid).await?))
}

#[get("/likes/<rid>/users", rank = 2)]
pub async fn find_users_that_liked_recipe(
    db: &State<Repository>,
    rid: &str,
) -> Result<Json<Vec<LikingUser>>, ApiError> {
    Ok(Json(db.likes.find_by_recipe(parse_id(rid)?).await?))
}

#[get("/likes/<rid>/users/<uid>")]
pub async fn is_liked_by_user(
    db: &State<Repository>,
    session: Session,
    rid: &str,
    uid: &str,
) -> Result<Json<bool>, ApiError> {
    let uid = session.resolve(uid)?;
    Ok(Json(db.likes.exists(parse_id(rid)?, uid).await?))
}
