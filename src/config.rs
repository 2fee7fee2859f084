use std::env;
use std::sync::Arc;

use crate::shipping::{FreeShipping, ShippingPolicy, TieredShipping};

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub shipping_policy: String,
    pub notification_queue_depth: usize,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = env::var("DATABASE_URL")?;
        let host = env::var("APP_HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("APP_PORT")
            .ok()
            .and_then(|p| p.parse::<u16>().ok())
            .unwrap_or(3000);
        let shipping_policy =
            env::var("SHIPPING_POLICY").unwrap_or_else(|_| "tiered".to_string());
        let notification_queue_depth = env::var("NOTIFY_QUEUE_DEPTH")
            .ok()
            .and_then(|d| d.parse::<usize>().ok())
            .unwrap_or(256);
        Ok(Self {
            database_url,
            host,
            port,
            shipping_policy,
            notification_queue_depth,
        })
    }

    /// Resolve the configured shipping strategy; unknown names fail fast at
    /// startup rather than silently defaulting.
    pub fn shipping(&self) -> anyhow::Result<Arc<dyn ShippingPolicy>> {
        match self.shipping_policy.as_str() {
            "tiered" => Ok(Arc::new(TieredShipping)),
            "free" => Ok(Arc::new(FreeShipping)),
            other => anyhow::bail!("unknown SHIPPING_POLICY: {other}"),
        }
    }
}
