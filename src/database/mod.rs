mod mongo_store;
mod store;

#[cfg(test)]
pub mod memory;

pub use store::*;

use mongodb::bson::doc;
use mongodb::options::IndexOptions;
use mongodb::{Client, Collection, Database, IndexModel};
use std::error::Error;

pub const USERS: &str = "user";
pub const MENU: &str = "menu";
pub const REVIEWS: &str = "review";
pub const CARTS: &str = "Cart";
pub const PAYMENTS: &str = "payment";

#[derive(Clone)]
pub struct MongoDB {
    db: Database,
}

impl MongoDB {
    pub async fn new(uri: &str, db_name: &str) -> Result<Self, Box<dyn Error>> {
        let mut client_options = mongodb::options::ClientOptions::parse(uri).await?;

        client_options.app_name = Some("bistro-service".to_string());
        client_options.max_pool_size = Some(20);
        client_options.min_pool_size = Some(2);
        client_options.max_idle_time = Some(std::time::Duration::from_secs(300));

        client_options.connect_timeout = Some(std::time::Duration::from_secs(5));
        client_options.server_selection_timeout = Some(std::time::Duration::from_secs(5));

        let client = Client::with_options(client_options)?;
        let db = client.database(db_name);

        // Test connection
        db.run_command(doc! { "ping": 1 }).await?;

        let mongodb = Self { db };
        mongodb.ensure_indexes().await;

        Ok(mongodb)
    }

    /// Index failures are logged, not fatal: pre-existing duplicate emails
    /// must not keep the service from starting.
    async fn ensure_indexes(&self) {
        log::info!("🔧 Creating database indexes...");

        let users = self.collection::<mongodb::bson::Document>(USERS);
        let unique_email = IndexModel::builder()
            .keys(doc! { "email": 1 })
            .options(IndexOptions::builder().unique(true).build())
            .build();

        match users.create_index(unique_email).await {
            Ok(_) => log::info!("   ✅ Index created: user(email) unique"),
            Err(e) => log::warn!("   ⚠️  Could not create unique index on user(email): {}", e),
        }

        for name in [CARTS, PAYMENTS] {
            let index = IndexModel::builder().keys(doc! { "email": 1 }).build();
            match self.collection::<mongodb::bson::Document>(name).create_index(index).await {
                Ok(_) => log::info!("   ✅ Index created: {}(email)", name),
                Err(e) => log::debug!("   ℹ️  Index on {}(email) not created: {}", name, e),
            }
        }

        log::info!("✅ Database indexes ready");
    }

    pub fn collection<T: Send + Sync>(&self, name: &str) -> Collection<T> {
        self.db.collection(name)
    }
}
