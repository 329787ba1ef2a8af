//! WebSocket connection management: lifecycle, pool, handles, identity
//! registry, heartbeat, setup authentication.

pub mod authenticator;
pub mod handle;
pub mod heartbeat;
pub mod manager;
pub mod pool;
pub mod registry;

pub use authenticator::SetupAuthenticator;
pub use handle::ConnectionHandle;
pub use heartbeat::HeartbeatConfig;
pub use manager::ConnectionManager;
pub use pool::ConnectionPool;
pub use registry::ConnectionRegistry;
