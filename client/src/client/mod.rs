mod client_config;
pub use client_config::PoolClientConfig;

mod pool_client;
pub use pool_client::PoolClient;
