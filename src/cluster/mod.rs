mod builder;
mod config;
mod metadata;
mod node_address;
mod session_manager;

pub use builder::ClusterBuilder;
pub use config::{
    ClusterConfig, ClusterConfigBuilder, Consistency, LoadBalancing, MetricsOptions,
    PoolingOptions, QueryOptions, SocketOptions,
};
pub use metadata::{ClusterMetadata, NodeInfo};
pub use node_address::NodeAddress;
pub use session_manager::{SessionManager, SessionManagerBuilder};
