use rocket::serde::json::Json;
use rocket::State;

use crate::infra::{ApiError, DaoError, DeleteAck, NewUser, Repository, Session, UpdateAck, User, UserPatch};

#[post("/users", data = "<user>")]
pub async fn create_user(db: &State<Repository>, user: Json<NewUser>) -> Result<Json<User>, ApiError> {
    Ok(Json(db.users.create(user.into_inner()).await?.redacted()))
}

#[get("/users")]
pub async fn find_all_users(db: &State<Repository>) -> Result<Json<Vec<User>>, ApiError> {
    let users = db.users.find_all().await?;
    Ok(Json(users.into_iter().map(User::redacted).collect()))
}

#[get("/users/<uid>")]
pub async fn find_user_by_id(
    db: &State<Repository>,
    session: Session,
    uid: &str,
) -> Result<Json<User>, ApiError> {
    let uid = session.resolve(uid)?;
    let user = db.users.find_by_id(uid).await?.ok_or(DaoError::NotFound("user"))?;
    Ok(Json(user.redacted()))
}

#[get("/users/email/<email>")]
pub async fn find_user_by_email(db: &State<Repository>, email: &str) -> Result<Json<User>, ApiError> {
    let user = db.users.find_by_email(email).await?.ok_or(DaoError::NotFound("user"))?;
    Ok(Json(user.redacted()))
}

#[put("/users/<uid>", data = "<patch>")]
pub async fn update_user(
    db: &State<Repository>,
    session: Session,
    uid: &str,
    patch: Json<UserPatch>,
) -> Result<Json<UpdateAck>, ApiError> {
    let uid = session.resolve(uid)?;
    Ok(Json(db.users.update(uid, patch.into_inner()).await?))
}

#[delete("/users/<uid>")]
pub async fn delete_user(
    db: &State<Repository>,
    session: Session,
    uid: &str,
) -> Result<Json<DeleteAck>, ApiError> {
    let uid = session.resolve(uid)?;
    Ok(Json(db.users.delete(uid).await?))
}

#[delete("/users")]
pub async fn delete_all_users(db: &State<Repository>) -> Result<Json<DeleteAck>, ApiError> {
    Ok(Json(db.users.delete_all().await?))
}
