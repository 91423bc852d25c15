use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};
use std::time::{Duration, Instant};

use mongodb::bson::oid::ObjectId;
use rocket::http::{Cookie, CookieJar};
use rocket::request::{FromRequest, Outcome, Request};
use rocket::time::{Duration as CookieDuration, OffsetDateTime};
use tracing::debug;
use uuid::Uuid;

use super::error::ApiError;
use super::mongo::{parse_id, User};

pub const SESSION_COOKIE: &str = "sid";

/// Lifetime of a session, matching Rocket's private cookie default.
pub const SESSION_TTL: Duration = Duration::from_secs(7 * 24 * 60 * 60);

/// Path token standing for the user of the current session.
pub const ME: &str = "me";

/// Server-side profiles keyed by the session id held in a private cookie.
///
/// Entries expire after `ttl`, the same lifetime given to the cookie.
/// Expired entries read as absent and are pruned whenever the map is locked
/// for writing.
pub struct SessionStore {
    ttl: Duration,
    profiles: RwLock<HashMap<String, Entry>>,
}

struct Entry {
    profile: User,
    expires_at: Instant,
}

impl Entry {
    fn is_live(&self, now: Instant) -> bool {
        now < self.expires_at
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        SessionStore::new(SESSION_TTL)
    }
}

impl SessionStore {
    pub fn new(ttl: Duration) -> Self {
        SessionStore {
            ttl,
            profiles: RwLock::new(HashMap::new()),
        }
    }

    /// Binds `profile` to the caller's session, starting one if needed.
    pub fn establish(&self, cookies: &CookieJar<'_>, profile: User) {
        let sid = match cookies.get_private(SESSION_COOKIE) {
            Some(cookie) => String::from(cookie.value()),
            None => Uuid::new_v4().to_string(),
        };
        // cookie and entry share one lifetime
        let mut cookie = Cookie::new(SESSION_COOKIE, sid.clone());
        cookie.set_max_age(CookieDuration::seconds(self.ttl.as_secs() as i64));
        cookie.set_expires(OffsetDateTime::now_utc() + self.ttl);
        cookies.add_private(cookie);

        let now = Instant::now();
        let mut profiles = self.profiles.write().unwrap_or_else(PoisonError::into_inner);
        profiles.retain(|_, entry| entry.is_live(now));
        profiles.insert(
            sid,
            Entry {
                profile,
                expires_at: now + self.ttl,
            },
        );
    }

    pub fn profile(&self, cookies: &CookieJar<'_>) -> Option<User> {
        let cookie = cookies.get_private(SESSION_COOKIE)?;
        let now = Instant::now();
        let mut profiles = self.profiles.write().unwrap_or_else(PoisonError::into_inner);
        match profiles.get(cookie.value()) {
            Some(entry) if entry.is_live(now) => Some(entry.profile.clone()),
            Some(_) => {
                debug!("session expired");
                profiles.remove(cookie.value());
                None
            }
            None => None,
        }
    }

    pub fn destroy(&self, cookies: &CookieJar<'_>) {
        if let Some(cookie) = cookies.get_private(SESSION_COOKIE) {
            self.profiles
                .write()
                .unwrap_or_else(PoisonError::into_inner)
                .remove(cookie.value());
        }
        cookies.remove_private(Cookie::from(SESSION_COOKIE));
    }

    /// Number of live sessions; expired entries are dropped first.
    pub fn len(&self) -> usize {
        let now = Instant::now();
        let mut profiles = self.profiles.write().unwrap_or_else(PoisonError::into_inner);
        profiles.retain(|_, entry| entry.is_live(now));
        profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Profile of the current session, if any.
pub struct Session(pub Option<User>);

impl Session {
    /// Resolves a `:uid` path segment, mapping `me` to the session user.
    pub fn resolve(&self, uid: &str) -> Result<ObjectId, ApiError> {
        if uid != ME {
            return Ok(parse_id(uid)?);
        }
        self.0
            .as_ref()
            .and_then(|profile| profile.id)
            .ok_or(ApiError::Forbidden)
    }
}

#[rocket::async_trait]
impl<'r> FromRequest<'r> for Session {
    type Error = std::convert::Infallible;

    async fn from_request(request: &'r Request<'_>) -> Outcome<Self, Self::Error> {
        let profile = request
            .rocket()
            .state::<SessionStore>()
            .and_then(|store| store.profile(request.cookies()));
        Outcome::Success(Session(profile))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::mongo::UserType;

    fn profile() -> User {
        User {
            id: Some(ObjectId::new()),
            firstname: String::from("Julia"),
            lastname: String::from("Child"),
            username: None,
            password: String::new(),
            email: String::from("julia@example.com"),
            profile_photo: None,
            user_type: UserType::Chef,
        }
    }

    #[test]
    fn test_resolve_literal_id() {
        let id = ObjectId::new();
        assert_eq!(Session(None).resolve(&id.to_hex()).unwrap(), id);
    }

    #[test]
    fn test_resolve_me_uses_session() {
        let user = profile();
        assert_eq!(Session(Some(user.clone())).resolve(ME).unwrap(), user.id.unwrap());
    }

    #[test]
    fn test_resolve_me_without_session_is_forbidden() {
        assert!(matches!(Session(None).resolve(ME), Err(ApiError::Forbidden)));
    }

    #[test]
    fn test_resolve_garbage_is_bad_request() {
        let err = Session(None).resolve("not-an-id").unwrap_err();
        assert_eq!(err.status(), rocket::http::Status::BadRequest);
    }
}
