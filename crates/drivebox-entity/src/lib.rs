//! # drivebox-entity
//!
//! Domain entity models for DriveBox. Every struct in this crate
//! represents a database table row or a domain value object. Row types
//! derive `sqlx::FromRow` and serialize with camelCase keys, which is the
//! shape the web client consumes.

pub mod activity;
pub mod file;
pub mod folder;
pub mod share;
pub mod storage;
pub mod user;
