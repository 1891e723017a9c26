use std::sync::Arc;

use meilisearch_sdk::client::Client;
use redis::aio::ConnectionManager;

use catalog::model::Catalog;
use catalog::{get_catalog, get_catalog_remote};

use super::{config::Config, database::init_redis, search::init_meilisearch};

pub struct AppState {
    pub catalog: Catalog,
    pub config: Config,
    pub redis_connection: ConnectionManager,
    pub meili_client: Arc<Client>,
}

impl AppState {
    pub async fn new() -> Arc<Self> {
        let config = Config::load();

        let catalog = match &config.catalog_url {
            Some(url) => get_catalog_remote(url).await.unwrap(),
            None => get_catalog(&config.catalog_path).unwrap(),
        };

        let (redis_connection, vote_counts) = init_redis(&config.redis_url, &catalog).await;
        let meili_client =
            init_meilisearch(&config.meili_url, &config.meili_key, &catalog, &vote_counts).await;

        Arc::new(Self {
            catalog,
            config,
            redis_connection,
            meili_client,
        })
    }
}
