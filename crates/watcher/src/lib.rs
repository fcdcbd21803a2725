mod chain_poller;
mod config;
mod error;
mod rpc_client;
mod scheduler;

pub use chain_poller::ChainHeadPoller;
pub use config::WatcherConfig;
pub use error::WatchError;
pub use rpc_client::RpcClient;
pub use scheduler::HeadScheduler;
