//! Activity kinds and action verbs.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The kind of item an activity is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActivityType {
    File,
    Folder,
}

impl ActivityType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::File => "File",
            Self::Folder => "Folder",
        }
    }
}

impl fmt::Display for ActivityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The mutation an activity records.
///
/// The stored verb is upper-case with spaces, e.g. `"CREATE FILE"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActivityAction {
    CreateFile,
    MoveFile,
    CopyFile,
    RenameFile,
    TrashFile,
    RestoreFile,
    DeleteFile,
    LockFile,
    UnlockFile,
    ShareFile,
    CreateFolder,
    DeleteFolder,
}

impl ActivityAction {
    /// The stored verb.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CreateFile => "CREATE FILE",
            Self::MoveFile => "MOVE FILE",
            Self::CopyFile => "COPY FILE",
            Self::RenameFile => "RENAME FILE",
            Self::TrashFile => "TRASH FILE",
            Self::RestoreFile => "RESTORE FILE",
            Self::DeleteFile => "DELETE FILE",
            Self::LockFile => "LOCK FILE",
            Self::UnlockFile => "UNLOCK FILE",
            Self::ShareFile => "SHARE FILE",
            Self::CreateFolder => "CREATE FOLDER",
            Self::DeleteFolder => "DELETE FOLDER",
        }
    }

    /// The kind of item this action applies to.
    pub fn activity_type(&self) -> ActivityType {
        match self {
            Self::CreateFolder | Self::DeleteFolder => ActivityType::Folder,
            _ => ActivityType::File,
        }
    }
}

impl fmt::Display for ActivityAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
