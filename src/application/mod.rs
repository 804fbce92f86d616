mod gateway;
mod navigation;
mod operations;
pub mod properties;
pub mod session;
mod symlink;
pub mod upload;

pub use gateway::GatewaySession;
pub use navigation::Navigator;
pub use operations::FileOperations;
pub use properties::PropertyObserver;
pub use symlink::SymlinkResolver;
