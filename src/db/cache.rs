use redis::aio::MultiplexedConnection;
use redis::Client;
use serde_json::Value;
use tracing::{debug, error, warn};

use super::{CacheError, DocumentStore};
use crate::models::{empty_document, Document};

/// Documents stored at the root path of RedisJSON keys
pub struct RedisJsonStore {
    client: Client,
    connection: Option<MultiplexedConnection>,
}

impl RedisJsonStore {
    /// Create a store for `redis://host:port/db`. No connection is made until
    /// the first read or write.
    pub fn new(host: &str, port: u16, db: i64) -> Result<Self, CacheError> {
        let client = Client::open(format!("redis://{}:{}/{}", host, port, db))?;
        Ok(Self {
            client,
            connection: None,
        })
    }

    async fn connection(&mut self) -> Result<MultiplexedConnection, CacheError> {
        if let Some(conn) = &self.connection {
            return Ok(conn.clone());
        }
        debug!("Connecting to Redis");
        let conn = self.client.get_multiplexed_async_connection().await?;
        self.connection = Some(conn.clone());
        Ok(conn)
    }

    pub async fn try_set(&mut self, key: &str, document: &Document) -> Result<(), CacheError> {
        let payload = serde_json::to_string(document)?;
        let mut conn = self.connection().await?;

        let _: () = redis::cmd("JSON.SET")
            .arg(key)
            .arg("$")
            .arg(payload)
            .query_async(&mut conn)
            .await?;

        debug!("Stored document under '{}'", key);
        Ok(())
    }

    /// `Ok(None)` on a miss
    pub async fn try_get(&mut self, key: &str) -> Result<Option<Document>, CacheError> {
        let mut conn = self.connection().await?;

        let raw: Option<String> = redis::cmd("JSON.GET").arg(key).query_async(&mut conn).await?;
        let Some(raw) = raw else {
            return Ok(None);
        };

        match serde_json::from_str::<Value>(&raw)? {
            Value::Object(document) => Ok(Some(document)),
            _ => {
                warn!("Value under '{}' is not a JSON object", key);
                Ok(None)
            }
        }
    }
}

impl DocumentStore for RedisJsonStore {
    async fn set(&mut self, key: &str, document: &Document) {
        if let Err(e) = self.try_set(key, document).await {
            println!("Redis set error: {}", e);
            error!("Redis set error: {}", e);
        }
    }

    async fn get(&mut self, key: &str) -> Document {
        match self.try_get(key).await {
            Ok(Some(document)) => document,
            Ok(None) => {
                debug!("Cache miss for '{}'", key);
                empty_document()
            }
            Err(e) => {
                println!("Redis get error: {}", e);
                error!("Redis get error: {}", e);
                empty_document()
            }
        }
    }
}
