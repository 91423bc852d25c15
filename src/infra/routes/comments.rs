use rocket::serde::json::Json;
use rocket::State;

use crate::infra::{parse_id, ApiError, Comment, CommentView, NewComment, Repository, Session};

#[post("/comments/<rid>/users/<uid>", data = "<comment>")]
pub async fn create_comment(
    db: &State<Repository>,
    session: Session,
    rid: &str,
    uid: &str,
    comment: Json<NewComment>,
) -> Result<Json<Comment>, ApiError> {
    let uid = session.resolve(uid)?;
    let comment = db
        .comments
        .create(parse_id(rid)?, uid, comment.into_inner())
        .await?;
    Ok(Json(comment))
}

#[get("/comments/<rid>")]
pub async fn find_comments(db: &State<Repository>, rid: &str) -> Result<Json<Vec<CommentView>>, ApiError> {
    Ok(Json(db.comments.find(parse_id(rid)?).await?))
}

#[get("/users/<uid>/comments", rank = 2)]
pub async fn find_comments_by_user(
    db: &State<Repository>,
    session: Session,
    uid: &str,
) -> Result<Json<Vec<CommentView>>, ApiError> {
    let uid = session.resolve(uid)?;
    Ok(Json(db.comments.find_by_user(uid).await?))
}
