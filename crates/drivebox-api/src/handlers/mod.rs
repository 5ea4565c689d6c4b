//! Request handlers, grouped by resource.

pub mod file;
pub mod folder;
pub mod health;
pub mod share;
pub mod storage;
pub mod upload;
