use rocket::http::{CookieJar, Status};
use rocket::serde::json::Json;
use rocket::State;
use tracing::info;

use crate::infra::{ApiError, Credentials, NewUser, Repository, SessionStore, User};

#[post("/auth/signup", data = "<user>")]
pub async fn signup(
    db: &State<Repository>,
    sessions: &State<SessionStore>,
    cookies: &CookieJar<'_>,
    user: Json<NewUser>,
) -> Result<Json<User>, ApiError> {
    let user = user.into_inner();
    if db.users.find_by_email(&user.email).await?.is_some() {
        return Err(ApiError::Forbidden);
    }
    let inserted = match db.users.create(user).await {
        // lost the race against a concurrent signup for the same email
        Err(e) if e.is_duplicate() => return Err(ApiError::Forbidden),
        result => result?.redacted(),
    };
    info!(email = %inserted.email, "user signed up");
    sessions.establish(cookies, inserted.clone());
    Ok(Json(inserted))
}

#[post("/auth/login", data = "<credentials>")]
pub async fn login(
    db: &State<Repository>,
    sessions: &State<SessionStore>,
    cookies: &CookieJar<'_>,
    credentials: Json<Credentials>,
) -> Result<Json<User>, ApiError> {
    let user = db
        .users
        .find_by_credentials(&credentials.email, &credentials.password)
        .await?
        .ok_or(ApiError::Forbidden)?
        .masked();
    info!(email = %user.email, "user logged in");
    sessions.establish(cookies, user.clone());
    Ok(Json(user))
}

fn current_profile(sessions: &SessionStore, cookies: &CookieJar<'_>) -> Result<Json<User>, ApiError> {
    sessions
        .profile(cookies)
        .map(|profile| Json(profile.redacted()))
        .ok_or(ApiError::Forbidden)
}

#[get("/auth/profile")]
pub fn profile(
    sessions: &State<SessionStore>,
    cookies: &CookieJar<'_>,
) -> Result<Json<User>, ApiError> {
    current_profile(sessions, cookies)
}

#[post("/auth/profile")]
pub fn profile_post(
    sessions: &State<SessionStore>,
    cookies: &CookieJar<'_>,
) -> Result<Json<User>, ApiError> {
    current_profile(sessions, cookies)
}

#[post("/auth/logout")]
pub fn logout(sessions: &State<SessionStore>, cookies: &CookieJar<'_>) -> Status {
    sessions.destroy(cookies);
    info!("session destroyed");
    Status::Ok
}
