//! Folder services: root folders, destination lookup, and folder creation.

pub mod service;

pub use service::FolderService;
