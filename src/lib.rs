pub mod application;
pub mod config;
pub mod domain;
pub mod infra;

pub use application::GatewaySession;
pub use config::GatewayConfig;
pub use domain::{SessionDescriptor, SessionEvent};
