use std::sync::Arc;

use cookbook_back::infra::{DocumentStore, MemoryStore, MongoStore};
use cookbook_back::{build, figment, Config, Repository, SessionStore, StoreKind};
use dotenv::dotenv;
use tracing::{info, warn};
use tracing_subscriber::{fmt, EnvFilter};

#[rocket::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv().ok();
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    let config = Config::load()?;
    let store: Arc<dyn DocumentStore> = match config.store {
        StoreKind::Mongo => Arc::new(
            MongoStore::connect(
                &config.mongo_uri,
                &config.database,
                config.max_pool_size,
                config.server_selection_timeout,
            )
            .await?,
        ),
        StoreKind::Memory => {
            warn!("using in-memory store, data is lost on shutdown");
            Arc::new(MemoryStore::default())
        }
    };
    let repository = Repository::init(store, config.bcrypt_cost).await?;

    info!(port = config.port, "starting server");
    let sessions = SessionStore::new(config.session_ttl);
    let _rocket = build(figment(&config), repository, sessions).launch().await?;
    info!("server shut down");
    Ok(())
}
