use rocket::serde::json::Json;
use rocket::State;

use crate::infra::{parse_id, ApiError, Bookmark, BookmarkedRecipe, DeleteAck, Repository, Session};

#[post("/cookbook/<rid>/users/<uid>")]
pub async fn user_bookmarks_recipe(
    db: &State<Repository>,
    session: Session,
    rid: &str,
    uid: &str,
) -> Result<Json<Bookmark>, ApiError> {
    let uid = session.resolve(uid)?;
    Ok(Json(db.cookbook.add(parse_id(rid)?, uid).await?))
}

#[delete("/cookbook/<rid>/users/<uid>")]
pub async fn user_unbookmarks_recipe(
    db: &State<Repository>,
    session: Session,
    rid: &str,
    uid: &str,
) -> Result<Json<DeleteAck>, ApiError> {
    let uid = session.resolve(uid)?;
    Ok(Json(db.cookbook.remove(parse_id(rid)?, uid).await?))
}

#[get("/cookbook/users/<uid>")]
pub async fn find_recipes_bookmarked_by_user(
    db: &State<Repository>,
    session: Session,
    uid: &str,
) -> Result<Json<Vec<BookmarkedRecipe>>, ApiError> {
    let uid = session.resolve(uid)?;
    Ok(Json(db.cookbook.find_by_user(uid).await?))
}

#[get("/cookbook/<rid>/users/<uid>")]
pub async fn is_bookmarked_by_user(
    db: &State<Repository>,
    session: Session,
    rid: &str,
    uid: &str,
) -> Result<Json<bool>, ApiError> {
    let uid = session.resolve(uid)?;
    Ok(Json(db.cookbook.exists(parse_id(rid)?, uid).await?))
}
