pub mod api;
pub mod comments;
pub mod cookbook;
pub mod ingredients;
pub mod likes;
pub mod memory;
pub mod recipes;
pub mod relation;
pub mod store;
pub mod types;
pub mod users;

pub use api::{parse_id, DaoError, Repository};
pub use memory::MemoryStore;
pub use store::{DocumentStore, MongoStore, StoreError};
pub use types::*;
