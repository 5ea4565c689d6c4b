//! Repository implementations for all DriveBox entities.

pub mod activity;
pub mod file;
pub mod folder;
pub mod share;
pub mod snapshot;
pub mod user;

pub use activity::ActivityRepository;
pub use file::FileRepository;
pub use folder::FolderRepository;
pub use share::ShareRepository;
pub use snapshot::StorageSnapshotRepository;
pub use user::UserRepository;
