use crate::memory::MemoryStore;
use crate::mongo::MongoStore;
use crate::store::SocialStore;
use lazy_static::lazy_static;
use std::env;
use std::str::FromStr;
use std::sync::Arc;
use thoughtnet_common::errors::ThoughtnetError;
use tracing::{info, warn};

lazy_static! {
    pub static ref MONGODB_URI: String = runtime_or_default("MONGODB_URI", env!("MONGODB_URI"));
    pub static ref DATABASE_NAME: String =
        runtime_or_default("DATABASE_NAME", env!("DATABASE_NAME"));
    pub static ref STORE_BACKEND: String =
        runtime_or_default("THOUGHTNET_STORE", env!("THOUGHTNET_STORE"));
    pub static ref PORT: u16 = runtime_or_default("PORT", env!("PORT"))
        .parse()
        .unwrap_or(DEFAULT_PORT);
}

const DEFAULT_PORT: u16 = 3001;

fn runtime_or_default(var: &str, default: &str) -> String {
    env::var(var).unwrap_or(default.to_string())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    Mongo,
    Memory,
}

impl FromStr for StoreBackend {
    type Err = ThoughtnetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mongo" | "mongodb" => Ok(StoreBackend::Mongo),
            "memory" => Ok(StoreBackend::Memory),
            other => Err(ThoughtnetError::ConfigError(format!(
                "unknown store backend `{}`",
                other
            ))),
        }
    }
}

/**
 * Open the document store selected by THOUGHTNET_STORE
 * @notice - called once at startup, the handle is shared by every request
 *
 * @returns - the store handle to inject into the integrity service
 */
pub async fn connect_store() -> Result<Arc<dyn SocialStore>, ThoughtnetError> {
    let backend = match STORE_BACKEND.parse::<StoreBackend>() {
        Ok(backend) => backend,
        Err(e) => {
            warn!("{}, falling back to mongo", e);
            StoreBackend::Mongo
        }
    };
    match backend {
        StoreBackend::Mongo => {
            info!(
                "Connecting to mongo at {} (database {})",
                &**MONGODB_URI, &**DATABASE_NAME
            );
            let store = MongoStore::init(&MONGODB_URI, &DATABASE_NAME).await?;
            Ok(Arc::new(store))
        }
        StoreBackend::Memory => {
            info!("Using in-memory store, nothing will be persisted");
            Ok(Arc::new(MemoryStore::default()))
        }
    }
}
