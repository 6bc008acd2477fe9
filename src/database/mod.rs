pub mod store;

#[cfg(test)]
pub mod memory;

pub use store::*;

use crate::utils::AppError;
use mongodb::{Client, Collection, Database};
use std::time::Duration;

const DEFAULT_DATABASE: &str = "LibreChat";

pub const USERS: &str = "users";
pub const BALANCES: &str = "balances";

#[derive(Clone)]
pub struct MongoDB {
    db: Database,
}

impl MongoDB {
    pub async fn new(uri: &str) -> Result<Self, AppError> {
        let mut client_options = mongodb::options::ClientOptions::parse(uri).await?;

        // One sequential run: a tiny pool is plenty
        client_options.max_pool_size = Some(2);
        client_options.connect_timeout = Some(Duration::from_secs(5));
        client_options.server_selection_timeout = Some(Duration::from_secs(5));
        client_options.app_name = Some("set-balance".to_string());

        let db_name = client_options
            .default_database
            .clone()
            .unwrap_or_else(|| DEFAULT_DATABASE.to_string());

        let client = Client::with_options(client_options)?;
        let db = client.database(&db_name);

        // Test connection
        db.list_collection_names().await?;
        log::debug!("Connected to MongoDB database: {}", db_name);

        Ok(Self { db })
    }

    pub fn collection<T: Send + Sync>(&self, name: &str) -> Collection<T> {
        self.db.collection(name)
    }
}
