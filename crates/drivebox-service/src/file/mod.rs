//! File services: listing, metadata operations, deletion, and byte access.

pub mod service;

pub use service::FileService;
