use crate::{application::session::OperationSender, domain::Operation};
use serde_json::json;

/// Typed mutation requests against the remote filesystem. Each returns
/// whether the frame was accepted for sending; the acknowledgement
/// arrives as a fresh directory listing, never as a delta.
#[derive(Clone)]
pub struct FileOperations {
    sender: OperationSender,
}

impl FileOperations {
    pub(crate) fn new(sender: OperationSender) -> Self {
        Self { sender }
    }

    pub fn create_file(&self, path: &str) -> bool {
        self.sender
            .send(Operation::CreateFile, &json!({ "path": path }))
    }

    pub fn create_folder(&self, path: &str) -> bool {
        self.sender
            .send(Operation::CreateFolder, &json!({ "path": path }))
    }

    pub fn delete_file(&self, path: &str) -> bool {
        self.sender
            .send(Operation::DeleteFile, &json!({ "path": path }))
    }

    pub fn delete_folder(&self, path: &str) -> bool {
        self.sender
            .send(Operation::DeleteFolder, &json!({ "path": path }))
    }

    pub fn rename(&self, path: &str, new_path: &str) -> bool {
        self.sender.send(
            Operation::RenameFile,
            &json!({ "path": path, "newPath": new_path }),
        )
    }

    pub fn move_files(&self, sources: &[String], destination: &str) -> bool {
        self.sender.send(
            Operation::MoveFiles,
            &json!({ "sources": sources, "destination": destination }),
        )
    }

    pub fn copy_files(&self, sources: &[String], destination: &str) -> bool {
        self.sender.send(
            Operation::CopyFiles,
            &json!({ "sources": sources, "destination": destination }),
        )
    }

    pub fn chmod(&self, path: &str, mode: u32) -> bool {
        self.sender
            .send(Operation::Chmod, &json!({ "path": path, "mode": mode }))
    }
}
