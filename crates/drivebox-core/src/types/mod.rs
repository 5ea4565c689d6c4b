//! Core type definitions used across the DriveBox workspace.

pub mod id;

pub use id::*;
