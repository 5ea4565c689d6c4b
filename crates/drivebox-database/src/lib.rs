//! # drivebox-database
//!
//! PostgreSQL connection management, embedded migrations, and concrete
//! repository implementations for all DriveBox entities.
//!
//! Methods that take an `executor` argument can run either directly on the
//! pool (`repo.pool()`) or inside a caller-owned transaction (`&mut *tx`).

pub mod connection;
pub mod migration;
pub mod repositories;

pub use connection::DatabasePool;
