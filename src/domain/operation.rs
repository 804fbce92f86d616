/// File-gateway operations, one byte on the wire.
///
/// Values 0x02 and 0x03 belonged to a retired chunked-upload scheme and
/// stay unassigned so acknowledgements from older gateways are never
/// misread.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Ready = 0x00,
    ListFiles = 0x01,
    CreateFile = 0x04,
    CreateFolder = 0x05,
    DeleteFile = 0x06,
    DeleteFolder = 0x07,
    RenameFile = 0x08,
    Error = 0x09,
    SearchDirectories = 0x0A,
    ResolveSymlink = 0x0B,
    MoveFiles = 0x0C,
    CopyFiles = 0x0D,
    Chmod = 0x0E,
    Stat = 0x0F,
    Checksum = 0x10,
    FolderSize = 0x11,
}

impl Operation {
    pub fn from_byte(byte: u8) -> Option<Self> {
        Some(match byte {
            0x00 => Self::Ready,
            0x01 => Self::ListFiles,
            0x04 => Self::CreateFile,
            0x05 => Self::CreateFolder,
            0x06 => Self::DeleteFile,
            0x07 => Self::DeleteFolder,
            0x08 => Self::RenameFile,
            0x09 => Self::Error,
            0x0A => Self::SearchDirectories,
            0x0B => Self::ResolveSymlink,
            0x0C => Self::MoveFiles,
            0x0D => Self::CopyFiles,
            0x0E => Self::Chmod,
            0x0F => Self::Stat,
            0x10 => Self::Checksum,
            0x11 => Self::FolderSize,
            _ => return None,
        })
    }

    pub fn as_byte(self) -> u8 {
        self as u8
    }

    /// Mutation acknowledgements carry no payload of interest; each one
    /// triggers a fresh listing of the current directory.
    pub fn is_mutation_ack(self) -> bool {
        matches!(
            self,
            Self::CreateFile
                | Self::CreateFolder
                | Self::DeleteFile
                | Self::DeleteFolder
                | Self::RenameFile
                | Self::MoveFiles
                | Self::CopyFiles
                | Self::Chmod
        )
    }

    pub fn all() -> [Self; 16] {
        [
            Self::Ready,
            Self::ListFiles,
            Self::CreateFile,
            Self::CreateFolder,
            Self::DeleteFile,
            Self::DeleteFolder,
            Self::RenameFile,
            Self::Error,
            Self::SearchDirectories,
            Self::ResolveSymlink,
            Self::MoveFiles,
            Self::CopyFiles,
            Self::Chmod,
            Self::Stat,
            Self::Checksum,
            Self::FolderSize,
        ]
    }
}
