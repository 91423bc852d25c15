#[macro_use]
extern crate rocket;

pub mod config;
pub mod infra;

use rocket::figment::Figment;
use rocket::{Build, Rocket};

use infra::CORS;

pub use config::{Config, ConfigError, StoreKind};
pub use infra::{Repository, SessionStore};

/// Rocket figment for `config`, layered over the usual `Rocket.toml`/`ROCKET_*` sources.
pub fn figment(config: &Config) -> Figment {
    rocket::Config::figment()
        .merge(("address", config.address.clone()))
        .merge(("port", config.port))
}

pub fn build(figment: Figment, repository: Repository, sessions: SessionStore) -> Rocket<Build> {
    rocket::custom(figment)
        .manage(repository)
        .manage(sessions)
        .mount("/api", infra::routes::routes())
        .mount("/", routes![infra::cors::preflight])
        .register("/", catchers![infra::error::default_catcher])
        .attach(CORS)
}
