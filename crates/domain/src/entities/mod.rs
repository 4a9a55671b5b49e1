pub mod pool;
pub mod session;

// Re-export for easier access
pub use pool::{PoolGroup, PoolRecord};
pub use session::ShownPoolsState;
