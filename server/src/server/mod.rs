mod pool_server;
pub use pool_server::{PoolServer, Spawned};

mod server_config;
pub use server_config::{ExhaustedPolicy, PoolServerConfig};

mod shared_pool_server;
pub use shared_pool_server::SharedPoolServer;
