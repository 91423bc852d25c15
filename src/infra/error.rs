use rocket::http::Status;
use rocket::response::{self, Responder};
use rocket::serde::json::{json, Json, Value};
use rocket::Request;
use thiserror::Error;
use tracing::{error, warn};

use super::mongo::{DaoError, StoreError};

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("forbidden")]
    Forbidden,
    #[error(transparent)]
    Dao(#[from] DaoError),
}

impl ApiError {
    pub fn status(&self) -> Status {
        match self {
            ApiError::Forbidden => Status::Forbidden,
            ApiError::Dao(DaoError::NotFound(_)) => Status::NotFound,
            ApiError::Dao(DaoError::InvalidId(_)) | ApiError::Dao(DaoError::UnknownUserType(_)) => {
                Status::BadRequest
            }
            ApiError::Dao(DaoError::Store(StoreError::DuplicateKey(_))) => Status::Conflict,
            ApiError::Dao(_) => Status::InternalServerError,
        }
    }
}

impl<'r> Responder<'r, 'static> for ApiError {
    fn respond_to(self, request: &'r Request<'_>) -> response::Result<'static> {
        let status = self.status();
        if status.code >= 500 {
            error!(uri = %request.uri(), error = ?self, "request failed");
        } else {
            warn!(uri = %request.uri(), %status, error = %self, "request rejected");
        }
        (status, Json(json!({ "error": self.to_string() }))).respond_to(request)
    }
}

/// Framework errors (unknown route, malformed body) share the same body shape.
#[catch(default)]
pub fn default_catcher(status: Status, _request: &Request) -> Json<Value> {
    Json(json!({ "error": status.reason_lossy() }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(ApiError::Forbidden.status(), Status::Forbidden);
        assert_eq!(
            ApiError::from(DaoError::NotFound("recipe")).status(),
            Status::NotFound
        );
        assert_eq!(
            ApiError::from(DaoError::InvalidId(String::from("x"))).status(),
            Status::BadRequest
        );
        assert_eq!(
            ApiError::from(DaoError::UnknownUserType(String::from("admin"))).status(),
            Status::BadRequest
        );
        assert_eq!(
            ApiError::from(DaoError::Store(StoreError::DuplicateKey(String::from("likes"))))
                .status(),
            Status::Conflict
        );
        assert_eq!(
            ApiError::from(DaoError::Store(StoreError::Poisoned)).status(),
            Status::InternalServerError
        );
    }
}
