pub mod cors;
pub mod error;
pub mod mongo;
pub mod routes;
pub mod session;

pub use cors::CORS;
pub use error::ApiError;
pub use mongo::*;
pub use session::{Session, SessionStore, SESSION_TTL};
