pub mod interface;
mod manager;
mod sender;
pub mod state;

pub use manager::SessionManager;
pub use sender::OperationSender;
pub use state::SessionState;
