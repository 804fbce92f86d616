pub mod interface;
mod queue;

pub use queue::UploadQueue;
pub use queue::UploadTask;
