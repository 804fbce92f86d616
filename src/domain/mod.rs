mod chan;
mod event;
mod file;
pub mod frame;
mod history;
mod operation;
mod session;

pub use chan::MutexChannel;
pub use event::SessionEvent;
pub use event::ToastLevel;
pub use file::FileEntry;
pub use file::FileKind;
pub use file::PermissionTriad;
pub use file::Permissions;
pub use file::format_mode;
pub use file::format_octal;
pub use file::format_size;
pub use file::full_path;
pub use file::normalize_path;
pub use file::parent_path;
pub use frame::Frame;
pub use frame::FrameError;
pub use history::NavigationHistory;
pub use operation::Operation;
pub use session::SessionDescriptor;
pub use session::SessionEndpoint;
